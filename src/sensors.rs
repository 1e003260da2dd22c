//! Raw sensor readout and diagnostic registers.
//!
//! With raw data enabled in the algorithm control, the coprocessor mirrors
//! each sensor's last sample into MX/AX/GX as three LE words.
//!
//! ```no_run
//! # fn demo<I, D, E>(s: &mut em7180::Em7180<I, D>) -> Result<(), em7180::Error<E>>
//! # where I: embedded_hal::i2c::I2c<Error = E>, D: embedded_hal::delay::DelayNs {
//! let a = s.read_accel()?; // g
//! let g = s.read_gyro()?; // dps
//! let rates = s.actual_rates()?;
//! # Ok(()) }
//! ```

use embedded_hal::{delay::DelayNs, i2c::*};
use micromath::vector::Vector3d;

use crate::{codec, defs::*, AlgorithmStatus, Em7180, Error, RunStatus, SensorStatus, SentralStatus};

/// g per LSB at ±8 g (the configured accel full scale).
const ACCEL_SCALE: f32 = 0.000488;
/// dps per LSB at ±2000 dps (the configured gyro full scale).
const GYRO_SCALE: f32 = 0.153;
/// mG per LSB.
const MAG_SCALE: f32 = 0.32768;

/// Sensor rates the coprocessor actually settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActualRates {
  pub mag_hz: u16,
  pub accel_hz: u16,
  pub gyro_hz: u16,
}

impl<I, D, E> Em7180<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  pub fn read_accel_raw(&mut self) -> Result<Vector3d<i16>, Error<E>> {
    self.read_vector(Reg::Ax)
  }

  pub fn read_gyro_raw(&mut self) -> Result<Vector3d<i16>, Error<E>> {
    self.read_vector(Reg::Gx)
  }

  pub fn read_mag_raw(&mut self) -> Result<Vector3d<i16>, Error<E>> {
    self.read_vector(Reg::Mx)
  }

  /// Acceleration in g.
  pub fn read_accel(&mut self) -> Result<Vector3d<f32>, Error<E>> {
    Ok(scale(self.read_accel_raw()?, ACCEL_SCALE))
  }

  /// Angular rate in dps.
  pub fn read_gyro(&mut self) -> Result<Vector3d<f32>, Error<E>> {
    Ok(scale(self.read_gyro_raw()?, GYRO_SCALE))
  }

  /// Magnetic field in mG.
  pub fn read_mag(&mut self) -> Result<Vector3d<f32>, Error<E>> {
    Ok(scale(self.read_mag_raw()?, MAG_SCALE))
  }

  pub fn sentral_status(&mut self) -> Result<SentralStatus, Error<E>> {
    self.read(Reg::SentralStatus)
  }

  pub fn sensor_status(&mut self) -> Result<SensorStatus, Error<E>> {
    self.read(Reg::SensorStatus)
  }

  pub fn run_status(&mut self) -> Result<RunStatus, Error<E>> {
    self.read(Reg::RunStatus)
  }

  /// Fresh ALGORITHM_STATUS read. Unlike [`algorithm_status`](Self::algorithm_status)
  /// this touches the bus.
  pub fn algorithm_status_reg(&mut self) -> Result<AlgorithmStatus, Error<E>> {
    self.read(Reg::AlgorithmStatus)
  }

  pub fn actual_rates(&mut self) -> Result<ActualRates, Error<E>> {
    let mag = self.read_u8(Reg::ActualMagRate)?;
    let accel = self.read_u8(Reg::ActualAccelRate)?;
    let gyro = self.read_u8(Reg::ActualGyroRate)?;
    Ok(ActualRates { mag_hz: mag as u16, accel_hz: accel as u16 * 10, gyro_hz: gyro as u16 * 10 })
  }

  /// Product and revision ID.
  pub fn device_ids(&mut self) -> Result<(u8, u8), Error<E>> {
    let mut b = [0u8; 2];
    self.read_bytes(Reg::ProductId, &mut b)?;
    Ok((b[0], b[1]))
  }

  fn read_vector(&mut self, reg: Reg) -> Result<Vector3d<i16>, Error<E>> {
    let mut b = [0u8; 6];
    self.read_bytes(reg, &mut b)?;
    let [x, y, z] = codec::i16x3_from_le(&b);
    Ok(Vector3d { x, y, z })
  }
}

fn scale(v: Vector3d<i16>, k: f32) -> Vector3d<f32> {
  Vector3d { x: v.x as f32 * k, y: v.y as f32 * k, z: v.z as f32 * k }
}
