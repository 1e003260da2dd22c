//! Bring-up configuration.
//!
//! [`Config::default`] reproduces the stock firmware setup: quaternion output
//! from 6-axis fusion on raw data, 100 Hz quaternion rate, 1000 µT / 8 g /
//! 2000 dps full scale and a 12.9° declination correction.
//!
//! ```no_run
//! use em7180::{Backoff, Config};
//!
//! let mut cfg = Config::default();
//! cfg.declination_deg = 3.2;
//! cfg.require_eeprom_upload = true;
//! cfg.timeouts.param_ack = Backoff::new(500, 200);
//! ```

use crate::{defs::*, AlgorithmControl, Events};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
  /// Coprocessor I2C address.
  pub address: u8,
  /// EEPROM I2C address, reachable in passthrough.
  pub eeprom_address: u8,
  pub rates: Rates,
  /// Run-mode algorithm control.
  pub mode: AlgorithmControl,
  /// Events that raise the host interrupt.
  pub events: Events,
  pub full_scale: FullScale,
  /// Stillness-mode parameter (id 73).
  pub stillness: bool,
  /// Subtracted from yaw, degrees.
  pub declination_deg: f32,
  /// Load the warm-start block from EEPROM and replay it during bring-up.
  pub warm_start: bool,
  /// Abort bring-up when the EEPROM upload never completes instead of
  /// continuing with whatever the device holds.
  pub require_eeprom_upload: bool,
  pub timeouts: Timeouts,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      address: ADDR_EM7180,
      eeprom_address: ADDR_EEPROM,
      rates: Rates::default(),
      mode: AlgorithmControl::run_default(),
      events: Events::fusion(),
      full_scale: FullScale::default(),
      stillness: false,
      declination_deg: 12.9,
      warm_start: false,
      require_eeprom_upload: false,
      timeouts: Timeouts::default(),
    }
  }
}

/// Output rate registers, written verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rates {
  /// Quaternion rate = gyro rate / (1 + divisor).
  pub quaternion_divisor: u8,
  /// Magnetometer rate in Hz.
  pub mag_hz: u8,
  /// Accelerometer rate in units of 10 Hz.
  pub accel_10hz: u8,
  /// Gyroscope rate in units of 10 Hz.
  pub gyro_10hz: u8,
}

impl Default for Rates {
  fn default() -> Self {
    Self { quaternion_divisor: 0x02, mag_hz: 0x1E, accel_10hz: 0x0A, gyro_10hz: 0x14 }
  }
}

/// Sensor full-scale ranges as stored in parameters 74 and 75.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FullScale {
  pub mag_ut: u16,
  pub accel_g: u16,
  pub gyro_dps: u16,
}

impl Default for FullScale {
  fn default() -> Self {
    Self { mag_ut: 1000, accel_g: 8, gyro_dps: 2000 }
  }
}

/// Poll interval and bound for one kind of wait.
///
/// The total budget is roughly `interval_us * max_polls`; the injected delay
/// provider is the only clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Backoff {
  pub interval_us: u32,
  /// Reads before giving up, at least 1.
  pub max_polls: u32,
}

impl Backoff {
  pub const fn new(interval_us: u32, max_polls: u32) -> Self {
    Self { interval_us, max_polls }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeouts {
  /// PassThruStatus toggling on entry and exit.
  pub passthrough: Backoff,
  /// Algorithm leaving standby after passthrough.
  pub algorithm: Backoff,
  /// ParamAcknowledge echoing a request.
  pub param_ack: Backoff,
  /// Reset requests issued while waiting for the EEPROM upload.
  pub upload_retries: u8,
  /// Delay after each of those resets, ms.
  pub upload_retry_ms: u32,
}

impl Default for Timeouts {
  fn default() -> Self {
    Self {
      passthrough: Backoff::new(5_000, 200),
      algorithm: Backoff::new(5_000, 200),
      param_ack: Backoff::new(1_000, 500),
      upload_retries: 10,
      upload_retry_ms: 500,
    }
  }
}
