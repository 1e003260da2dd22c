use embedded_hal::{delay::DelayNs, i2c::*};

use crate::{
  defs::*, sensors::ActualRates, AlgorithmStatus, Em7180, Error, PassthroughState, RunStatus, SensorStatus,
  SentralStatus, State, WarmStart,
};

/// What [`Em7180::begin`] learned about the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceInfo {
  /// ROM_VERSION1..2, LSB first.
  pub rom_version: u16,
  /// RAM_VERSION1..2, LSB first.
  pub ram_version: u16,
  pub product_id: u8,
  pub revision_id: u8,
  /// Status after the EEPROM upload wait.
  pub sentral_status: SentralStatus,
  /// Reset requests issued while waiting for the upload.
  pub upload_retries: u8,
  pub run_status: RunStatus,
  pub algorithm_status: AlgorithmStatus,
  pub sensor_status: SensorStatus,
  pub actual_rates: ActualRates,
}

impl<I, D, E> Em7180<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Reset and configure the coprocessor, leaving it in run mode.
  ///
  /// 1. Reset request, then read identification registers.
  /// 2. Wait for the EEPROM configuration upload, re-resetting up to
  ///    `timeouts.upload_retries` times.
  /// 3. Passthrough: load the accelerometer calibration (and warm start).
  /// 4. Apply calibration, program rates, algorithm control and events.
  /// 5. Run mode, stillness and full-scale parameters, status snapshot.
  ///
  /// Any expired wait is reported as [`Error::Init`].
  pub fn begin(&mut self) -> Result<DeviceInfo, Error<E>> {
    self.bring_up().map_err(|e| match e {
      Error::Timeout(w) => Error::Init(w),
      other => other,
    })
  }

  fn bring_up(&mut self) -> Result<DeviceInfo, Error<E>> {
    self.state = State::Resetting;
    self.passthrough = PassthroughState::Direct;
    self.control = self.config.mode;
    self.faulty = false;
    self.fault = None;

    self.write_u8(Reg::ResetRequest, RESET_REQUEST)?;
    self.delay.delay_ms(RESET_SETTLE_DELAY);

    let rom_version = u16::from_le_bytes([self.read_u8(Reg::RomVersion1)?, self.read_u8(Reg::RomVersion2)?]);
    let ram_version = u16::from_le_bytes([self.read_u8(Reg::RamVersion1)?, self.read_u8(Reg::RamVersion2)?]);
    let product_id = self.read_u8(Reg::ProductId)?;
    let revision_id = self.read_u8(Reg::RevisionId)?;
    info!(
      "EM7180 rom {:#x} ram {:#x} product {:#x} revision {:#x}",
      rom_version, ram_version, product_id, revision_id
    );
    if product_id != EM7180_PRODUCT_ID {
      return Err(Error::InvalidProductId(product_id));
    }

    self.state = State::AwaitingEepromUpload;
    let (sentral_status, upload_retries) = self.await_eeprom_upload()?;
    if sentral_status.crc_bad {
      warn!("EEPROM configuration CRC bad");
    }
    self.delay.delay_ms(UPLOAD_SETTLE_DELAY);

    self.state = State::Configuring;

    self.enter_passthrough()?;
    let loaded = self.load_calibration_blocks();
    self.leave_passthrough()?;
    let (cal, warm) = loaded?;

    self.write_u8(Reg::HostControl, HOST_CTRL_INITIALIZED)?;
    self.write_u8(Reg::PassThruControl, PASSTHROUGH_OFF)?;

    self.apply_accel_calibration(&cal)?;
    self.write_u8(Reg::HostControl, HOST_CTRL_RUN)?;
    if let Some(ws) = warm {
      self.apply_warm_start(&ws)?;
    }
    self.write_u8(Reg::HostControl, HOST_CTRL_INITIALIZED)?;

    let rates = self.config.rates;
    self.write_u8(Reg::QRateDivisor, rates.quaternion_divisor)?;
    self.write_u8(Reg::MagRate, rates.mag_hz)?;
    self.write_u8(Reg::AccelRate, rates.accel_10hz)?;
    self.write_u8(Reg::GyroRate, rates.gyro_10hz)?;

    self.write_algorithm_control()?;
    let events = self.config.events;
    self.write(Reg::EnableEvents, events)?;

    self.write_u8(Reg::HostControl, HOST_CTRL_RUN)?;
    self.delay.delay_ms(RUN_MODE_DELAY);

    let stillness = self.config.stillness;
    self.set_integer_param(PARAM_STILLNESS, stillness as u32)?;
    let fs = self.config.full_scale;
    self.set_mag_accel_full_scale(fs.mag_ut, fs.accel_g)?;
    self.set_gyro_full_scale(fs.gyro_dps)?;

    let run_status: RunStatus = self.read(Reg::RunStatus)?;
    let algorithm_status: AlgorithmStatus = self.read(Reg::AlgorithmStatus)?;
    let passthrough_status = self.read_u8(Reg::PassThruStatus)?;
    let sensor_status: SensorStatus = self.read(Reg::SensorStatus)?;
    let actual_rates = self.actual_rates()?;
    debug!(
      "run {} algorithm {} passthrough {:#x} sensors {}",
      run_status, algorithm_status, passthrough_status, sensor_status
    );

    self.state = State::Running;
    info!("EM7180 running");

    Ok(DeviceInfo {
      rom_version,
      ram_version,
      product_id,
      revision_id,
      sentral_status,
      upload_retries,
      run_status,
      algorithm_status,
      sensor_status,
      actual_rates,
    })
  }

  /// Poll SENTRAL_STATUS for "configuration uploaded", issuing a reset
  /// request and waiting `upload_retry_ms` between checks.
  fn await_eeprom_upload(&mut self) -> Result<(SentralStatus, u8), Error<E>> {
    let max = self.config.timeouts.upload_retries;
    let mut retries = 0u8;
    loop {
      let status: SentralStatus = self.read(Reg::SentralStatus)?;
      if status.config_uploaded {
        return Ok((status, retries));
      }
      if retries >= max {
        if self.config.require_eeprom_upload {
          return Err(Error::Init(crate::Wait::EepromUpload));
        }
        warn!("EEPROM upload not confirmed after {} resets", retries);
        return Ok((status, retries));
      }

      self.write_u8(Reg::ResetRequest, RESET_REQUEST)?;
      self.delay.delay_ms(self.config.timeouts.upload_retry_ms);
      retries += 1;
    }
  }

  fn load_calibration_blocks(&mut self) -> Result<(crate::AccelCalibration, Option<WarmStart>), Error<E>> {
    let cal = self.load_accel_calibration()?;
    cal.registers().map_err(|axis| Error::InvalidCalibration { axis })?;
    let warm = if self.config.warm_start {
      Some(self.load_warm_start()?)
    } else {
      None
    };
    Ok((cal, warm))
  }
}
