#![no_std]
#![doc = include_str!("../README.md")]
//!
//! ## Design Principles
//!
//! - **Bounded**: every wait on the device is a poll loop with an explicit bound
//! - **Blocking**: built on `embedded-hal` 1.0 I2C and delay traits
//! - **Stateful handle**: all protocol state lives in [`Em7180`], no globals
//! - **Explicit codecs**: byte/float conversions spell out their endianness
//!
//! ## Module Organization
//!
//! - [`codec`]: Little/big-endian float and i16 packing
//! - [`calib`]: EEPROM calibration and warm-start blocks
//! - [`config`]: Bring-up configuration and wait bounds
//! - [`passthrough`]: Bus handover to the EEPROM behind the coprocessor
//! - [`param`]: Parameter transfer handshake
//! - [`poll`]: Event polling and orientation output
//! - [`sensors`]: Raw sensor readout and diagnostics
//! - [`status`]: Bit-level status and control registers
//!
//! ## Basic Usage
//!
//! ```no_run
//! # fn example<I, D, E>(i2c: I, delay: D) -> Result<(), em7180::Error<E>>
//! # where I: embedded_hal::i2c::I2c<Error = E>, D: embedded_hal::delay::DelayNs {
//! use em7180::Em7180;
//!
//! let mut sentral = Em7180::new(i2c, delay);
//! let info = sentral.begin()?;
//!
//! loop {
//!   let events = sentral.poll()?;
//!   if events.quaternion {
//!     let o = sentral.orientation();
//!     // o.yaw, o.pitch, o.roll
//!   }
//! }
//! # }
//! ```

#[macro_use]
mod fmt;

pub mod calib;
pub mod codec;
pub mod config;
mod defs;
#[cfg(feature = "events")]
mod events;
mod lifecycle;
pub mod param;
pub mod passthrough;
pub mod poll;
pub(crate) mod rw;
pub mod sensors;
pub mod status;

use embedded_hal::{delay::DelayNs, i2c::*};

pub use calib::{AccelCalibration, WarmStart};
pub use config::{Backoff, Config, FullScale, Rates, Timeouts};
#[cfg(feature = "events")]
pub use events::*;
pub use lifecycle::DeviceInfo;
pub use passthrough::PassthroughState;
pub use poll::{quaternion_to_euler, Orientation};
pub use sensors::ActualRates;
pub use status::*;

/// Driver error type.
///
/// Wraps the underlying I2C error and adds the coprocessor protocol failures.
/// Device-reported faults are not errors; see [`Em7180::fault`].
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// I2C communication error
  I2c(E),
  /// A bounded wait expired; the device stopped responding
  Timeout(Wait),
  /// A bounded wait expired during [`Em7180::begin`]
  Init(Wait),
  /// Product ID mismatch (expected 0x80)
  InvalidProductId(u8),
  /// Calibration record has `max == min` on the given axis
  InvalidCalibration { axis: usize },
  /// Parameter id outside `1..=127`
  InvalidParam(u8),
  /// EEPROM access attempted while the coprocessor owns its bus
  NotInPassthrough,
  /// Operation not allowed in the current lifecycle or passthrough state
  InvalidState,
  /// Register contents could not be packed or unpacked
  Data,
}

/// The condition a timed-out wait was polling for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wait {
  /// PassThruStatus to reach the requested state
  Passthrough,
  /// AlgorithmStatus standby bit to clear
  AlgorithmSettle,
  /// ParamAcknowledge to echo the request byte (contained)
  ParamAck(u8),
  /// SentralStatus to report an uploaded configuration
  EepromUpload,
}

/// Lifecycle of the coprocessor as seen by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
  Uninitialized,
  Resetting,
  AwaitingEepromUpload,
  Configuring,
  Running,
  Sleeping,
}

/// EM7180 device driver instance.
///
/// Owns the I2C bus and delay provider and every piece of protocol state:
/// the configured algorithm-control byte, passthrough and lifecycle state,
/// the fault flag and the latest orientation sample.
///
/// # Type Parameters
///
/// - `I`: I2C implementation (must implement `embedded_hal::i2c::I2c`)
/// - `D`: Delay provider, also the clock for every bounded wait
pub struct Em7180<I, D: DelayNs> {
  i2c: I,
  delay: D,
  config: Config,
  state: State,
  passthrough: PassthroughState,
  control: AlgorithmControl,
  algorithm_status: u8,
  faulty: bool,
  fault: Option<Fault>,
  orientation: Orientation,
  #[cfg(feature = "events")]
  dequeue: heapless::Deque<Event, 16>,
}

impl<I, D, E> Em7180<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Create a driver with the default configuration.
  ///
  /// No bus traffic happens until [`begin`](Self::begin).
  pub fn new(i2c: I, delay: D) -> Self {
    Self::with_config(i2c, delay, Config::default())
  }

  /// Create a driver with an explicit configuration.
  pub fn with_config(i2c: I, delay: D, config: Config) -> Self {
    Self {
      i2c,
      delay,
      control: config.mode,
      config,
      state: State::Uninitialized,
      passthrough: PassthroughState::Direct,
      algorithm_status: 0,
      faulty: false,
      fault: None,
      orientation: Orientation::default(),
      #[cfg(feature = "events")]
      dequeue: heapless::Deque::new(),
    }
  }

  /// Give back the bus and delay provider.
  pub fn release(self) -> (I, D) {
    (self.i2c, self.delay)
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn state(&self) -> State {
    self.state
  }

  /// Algorithm-control value the driver last configured (run mode).
  pub fn algorithm_control(&self) -> AlgorithmControl {
    self.control
  }

  /// Algorithm status byte cached by the last [`poll`](Self::poll).
  pub fn algorithm_status(&self) -> u8 {
    self.algorithm_status
  }

  /// `true` if the last poll saw the error event.
  pub fn is_faulty(&self) -> bool {
    self.faulty
  }

  /// Decoded error register from the last poll that saw the error event.
  pub fn fault(&self) -> Option<Fault> {
    self.fault
  }

  /// Latest orientation sample. Zeroed until the first quaternion event.
  pub fn orientation(&self) -> &Orientation {
    &self.orientation
  }

  /// Poll `reg` until `done` accepts its value, sleeping `backoff.interval_us`
  /// between reads. Returns the accepted value.
  pub(crate) fn wait_for(
    &mut self,
    reg: defs::Reg,
    backoff: Backoff,
    wait: Wait,
    done: impl Fn(u8) -> bool,
  ) -> Result<u8, Error<E>> {
    let mut polls: u32 = 0;
    loop {
      let v = self.read_u8(reg)?;
      if done(v) {
        return Ok(v);
      }

      polls += 1;
      if polls >= backoff.max_polls {
        warn!("wait {} expired after {} polls", wait, polls);
        return Err(Error::Timeout(wait));
      }
      self.delay.delay_us(backoff.interval_us);
    }
  }
}
