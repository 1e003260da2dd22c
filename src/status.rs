//! Bit-level status and control registers.
//!
//! Each register is a one-byte packed struct; fields are listed from bit 0
//! upwards.

/// `ALGORITHM_CONTROL` (0x54).
///
/// The driver caches the configured value and writes it back after every
/// passthrough exit and parameter transfer, so the register always matches
/// [`Em7180::algorithm_control`](crate::Em7180::algorithm_control).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
pub struct AlgorithmControl {
  /// Put the fusion algorithm in standby.
  #[bits(1)]
  pub standby: bool,
  /// Report raw instead of scaled sensor data.
  #[bits(1)]
  pub raw_data: bool,
  /// Output heading/pitch/roll in the quaternion registers instead of a quaternion.
  #[bits(1)]
  pub hpr_output: bool,
  /// 6-axis fusion (no magnetometer) instead of 9-axis.
  #[bits(1)]
  pub six_axis: bool,
  #[skip(3)]
  /// Start a parameter transfer.
  #[bits(1)]
  pub param_transfer: bool,
}

impl AlgorithmControl {
  /// Quaternion output, raw data, 6-axis fusion, algorithm running.
  pub const fn run_default() -> Self {
    Self { standby: false, raw_data: true, hpr_output: false, six_axis: true, param_transfer: false }
  }
}

impl Default for AlgorithmControl {
  fn default() -> Self {
    Self::run_default()
  }
}

/// Event bits shared by `ENABLE_EVENTS` (0x33) and `EVENT_STATUS` (0x35).
///
/// `EVENT_STATUS` is clear-on-read: each set bit is seen by exactly one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
pub struct Events {
  /// Coprocessor CPU reset; it needs to be brought up again.
  #[bits(1)]
  pub cpu_reset: bool,
  /// Error register holds a new code.
  #[bits(1)]
  pub error: bool,
  /// New quaternion result.
  #[bits(1)]
  pub quaternion: bool,
  #[bits(1)]
  pub mag: bool,
  #[bits(1)]
  pub accel: bool,
  #[bits(1)]
  pub gyro: bool,
}

impl Events {
  pub const fn none() -> Self {
    Self { cpu_reset: false, error: false, quaternion: false, mag: false, accel: false, gyro: false }
  }

  /// Host interrupts for reset, error and new quaternion.
  pub const fn fusion() -> Self {
    Self { cpu_reset: true, error: true, quaternion: true, ..Self::none() }
  }
}

impl Default for Events {
  fn default() -> Self {
    Self::fusion()
  }
}

/// `SENTRAL_STATUS` (0x37).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
pub struct SentralStatus {
  #[bits(1)]
  pub eeprom_detected: bool,
  /// Configuration file uploaded from EEPROM.
  #[bits(1)]
  pub config_uploaded: bool,
  #[bits(1)]
  pub crc_bad: bool,
  #[bits(1)]
  pub initialized: bool,
  #[bits(1)]
  pub no_eeprom: bool,
}

/// `ALGORITHM_STATUS` (0x38).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
pub struct AlgorithmStatus {
  #[bits(1)]
  pub standby: bool,
  #[bits(1)]
  pub slow: bool,
  #[bits(1)]
  pub stillness: bool,
  #[bits(1)]
  pub mag_cal_complete: bool,
  #[bits(1)]
  pub magnetic_anomaly: bool,
  #[bits(1)]
  pub unreliable_data: bool,
}

/// `SENSOR_STATUS` (0x36). NACK bits mean the sensor stopped answering the
/// coprocessor; ID bits mean it answered with an unexpected device ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
pub struct SensorStatus {
  #[bits(1)]
  pub mag_nack: bool,
  #[bits(1)]
  pub accel_nack: bool,
  #[bits(1)]
  pub gyro_nack: bool,
  #[skip(1)]
  #[bits(1)]
  pub mag_id_error: bool,
  #[bits(1)]
  pub accel_id_error: bool,
  #[bits(1)]
  pub gyro_id_error: bool,
}

/// `RUN_STATUS` (0x92).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[packbits::pack(bytes = 1)]
pub struct RunStatus {
  /// Normal run mode.
  #[bits(1)]
  pub running: bool,
}

/// Decoded `ERROR_REGISTER` (0x50).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
  /// Magnetometer stopped producing data (0x11)
  MagFailure,
  /// Accelerometer stopped producing data (0x12)
  AccelFailure,
  /// Gyroscope stopped producing data (0x14)
  GyroFailure,
  /// Magnetometer initialization failed (0x21)
  MagInit,
  /// Accelerometer initialization failed (0x22)
  AccelInit,
  /// Gyroscope initialization failed (0x24)
  GyroInit,
  /// Mathematical error (0x30)
  Math,
  /// Invalid sample rate selected (0x80)
  InvalidSampleRate,
  /// Code outside the documented set
  Unknown(u8),
}

impl Fault {
  /// Decode an error register value. `0x00` means no error.
  pub fn from_code(code: u8) -> Option<Self> {
    use Fault::*;
    Some(match code {
      0x00 => return None,
      0x11 => MagFailure,
      0x12 => AccelFailure,
      0x14 => GyroFailure,
      0x21 => MagInit,
      0x22 => AccelInit,
      0x24 => GyroInit,
      0x30 => Math,
      0x80 => InvalidSampleRate,
      other => Unknown(other),
    })
  }

  pub fn code(self) -> u8 {
    use Fault::*;
    match self {
      MagFailure => 0x11,
      AccelFailure => 0x12,
      GyroFailure => 0x14,
      MagInit => 0x21,
      AccelInit => 0x22,
      GyroInit => 0x24,
      Math => 0x30,
      InvalidSampleRate => 0x80,
      Unknown(c) => c,
    }
  }
}
