#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reg {
  Qx = 0x00,
  Mx = 0x12,
  Ax = 0x1A,
  Gx = 0x22,
  QRateDivisor = 0x32,
  EnableEvents = 0x33,
  HostControl = 0x34,
  EventStatus = 0x35,
  SensorStatus = 0x36,
  SentralStatus = 0x37,
  AlgorithmStatus = 0x38,
  ParamAcknowledge = 0x3A,
  SavedParamByte0 = 0x3B,
  ActualMagRate = 0x45,
  ActualAccelRate = 0x46,
  ActualGyroRate = 0x47,
  ErrorRegister = 0x50,
  AlgorithmControl = 0x54,
  MagRate = 0x55,
  AccelRate = 0x56,
  GyroRate = 0x57,
  Gp36 = 0x5B,
  Gp37 = 0x5C,
  Gp38 = 0x5D,
  Gp39 = 0x5E,
  Gp40 = 0x5F,
  LoadParamByte0 = 0x60,
  LoadParamByte1 = 0x61,
  LoadParamByte2 = 0x62,
  LoadParamByte3 = 0x63,
  ParamRequest = 0x64,
  Gp50 = 0x69,
  Gp51 = 0x6A,
  Gp52 = 0x6B,
  Gp53 = 0x6C,
  Gp54 = 0x6D,
  Gp55 = 0x6E,
  Gp56 = 0x6F,
  RomVersion1 = 0x70,
  RomVersion2 = 0x71,
  RamVersion1 = 0x72,
  RamVersion2 = 0x73,
  ProductId = 0x90,
  RevisionId = 0x91,
  RunStatus = 0x92,
  ResetRequest = 0x9B,
  PassThruStatus = 0x9E,
  PassThruControl = 0xA0,
}

impl From<Reg> for u8 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u8
  }
}

/// Register pairs (LSB, MSB) receiving the accelerometer calibration words:
/// three scales followed by three offsets.
pub(crate) const ACCEL_CAL_REGS: [(Reg, Reg); 6] = [
  (Reg::Gp36, Reg::Gp37),
  (Reg::Gp38, Reg::Gp39),
  (Reg::Gp40, Reg::Gp50),
  (Reg::Gp51, Reg::Gp52),
  (Reg::Gp53, Reg::Gp54),
  (Reg::Gp55, Reg::Gp56),
];

/// Load registers for a parameter payload, byte 0 first.
pub(crate) const LOAD_PARAM_REGS: [Reg; 4] =
  [Reg::LoadParamByte0, Reg::LoadParamByte1, Reg::LoadParamByte2, Reg::LoadParamByte3];

// I2C addresses
pub(crate) const ADDR_EM7180: u8 = 0x28;
pub(crate) const ADDR_EEPROM: u8 = 0x50;

pub(crate) const EM7180_PRODUCT_ID: u8 = 0x80;

// Host control values
pub(crate) const HOST_CTRL_INITIALIZED: u8 = 0x00;
pub(crate) const HOST_CTRL_RUN: u8 = 0x01;

pub(crate) const RESET_REQUEST: u8 = 0x01;
pub(crate) const PASSTHROUGH_ON: u8 = 0x01;
pub(crate) const PASSTHROUGH_OFF: u8 = 0x00;

/// Algorithm control value used while the device hands its bus over.
pub(crate) const ALGO_CTRL_STANDBY: u8 = 0x01;
/// Algorithm control value that starts a parameter transfer.
pub(crate) const ALGO_CTRL_PARAM_TRANSFER: u8 = 0x80;
/// ParamRequest flag marking a write (cleared for queries).
pub(crate) const PARAM_WRITE: u8 = 0x80;
pub(crate) const PARAM_END: u8 = 0x00;

// Parameter ids
pub(crate) const PARAM_STILLNESS: u8 = 73;
pub(crate) const PARAM_MAG_ACC_FS: u8 = 74;
pub(crate) const PARAM_GYRO_FS: u8 = 75;

// EEPROM layout (two-byte addresses, high byte first)
pub(crate) const EEPROM_ACCEL_CAL: u16 = 0x7F8C;
pub(crate) const EEPROM_WARM_START_HEAD: u16 = 0x7F00;
pub(crate) const EEPROM_WARM_START_TAIL: u16 = 0x7F80;

// Timing (ms)
pub(crate) const RESET_SETTLE_DELAY: u32 = 500;
pub(crate) const UPLOAD_SETTLE_DELAY: u32 = 100;
pub(crate) const RUN_MODE_DELAY: u32 = 100;
pub(crate) const PASSTHROUGH_STEP_DELAY: u32 = 5;
pub(crate) const WARM_START_PAGE_DELAY: u32 = 100;
