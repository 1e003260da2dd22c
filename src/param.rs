//! Parameter transfer handshake.
//!
//! The coprocessor keeps its tuning values (full-scale ranges, stillness
//! mode, warm-start state, ...) in an internal parameter space addressed by a
//! 7-bit id. A write goes through staging registers:
//!
//! 1. payload into `LOAD_PARAM_BYTE0..3`
//! 2. `PARAM_REQUEST = id | 0x80` (high bit marks a write)
//! 3. `ALGORITHM_CONTROL = 0x80` (first parameter of a transfer only)
//! 4. poll `PARAM_ACKNOWLEDGE` until it echoes the request byte
//! 5. after the last parameter: `PARAM_REQUEST = 0x00`, then the configured
//!    algorithm control is written back
//!
//! A query is the same with the high bit clear; the value shows up in
//! `SAVED_PARAM_BYTE0..3` once acknowledged.

use embedded_hal::{delay::DelayNs, i2c::*};

use crate::{codec, defs::*, Em7180, Error, FullScale, Wait};

impl<I, D, E> Em7180<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Write a 32-bit integer parameter (little-endian payload).
  pub fn set_integer_param(&mut self, id: u8, value: u32) -> Result<(), Error<E>> {
    self.require_direct()?;
    self.param_transfer([(id, value.to_le_bytes())])
  }

  /// Write a float parameter. The coprocessor expects the IEEE-754 bytes
  /// big-endian.
  pub fn set_float_param(&mut self, id: u8, value: f32) -> Result<(), Error<E>> {
    self.require_direct()?;
    self.param_transfer([(id, codec::f32_to_be(value))])
  }

  /// Gyroscope full scale in dps (parameter 75).
  pub fn set_gyro_full_scale(&mut self, dps: u16) -> Result<(), Error<E>> {
    self.require_direct()?;
    let [lo, hi] = dps.to_le_bytes();
    self.param_transfer([(PARAM_GYRO_FS, [lo, hi, 0x00, 0x00])])
  }

  /// Magnetometer full scale in µT and accelerometer full scale in g (parameter 74).
  pub fn set_mag_accel_full_scale(&mut self, mag_ut: u16, accel_g: u16) -> Result<(), Error<E>> {
    self.require_direct()?;
    let [m0, m1] = mag_ut.to_le_bytes();
    let [a0, a1] = accel_g.to_le_bytes();
    self.param_transfer([(PARAM_MAG_ACC_FS, [m0, m1, a0, a1])])
  }

  /// Query a parameter's raw 4-byte value.
  pub fn read_param(&mut self, id: u8) -> Result<[u8; 4], Error<E>> {
    self.require_direct()?;
    check_id(id)?;

    self.write_u8(Reg::ParamRequest, id)?;
    let result = self.write_u8(Reg::AlgorithmControl, ALGO_CTRL_PARAM_TRANSFER).and_then(|_| {
      let backoff = self.config.timeouts.param_ack;
      self.wait_for(Reg::ParamAcknowledge, backoff, Wait::ParamAck(id), |ack| ack == id)?;
      let mut b = [0u8; 4];
      self.read_bytes(Reg::SavedParamByte0, &mut b)?;
      Ok(b)
    });

    let end = self.end_param_transfer();
    let b = result?;
    end?;
    Ok(b)
  }

  /// Full-scale ranges currently held in parameters 74 and 75.
  pub fn full_scales(&mut self) -> Result<FullScale, Error<E>> {
    let ma = self.read_param(PARAM_MAG_ACC_FS)?;
    let g = self.read_param(PARAM_GYRO_FS)?;
    Ok(FullScale {
      mag_ut: u16::from_le_bytes([ma[0], ma[1]]),
      accel_g: u16::from_le_bytes([ma[2], ma[3]]),
      gyro_dps: u16::from_le_bytes([g[0], g[1]]),
    })
  }

  /// Run one transfer session over `params` (id, payload) and close it.
  ///
  /// The closing writes are attempted even when a parameter fails, as long as
  /// anything reached the bus; the first error wins.
  pub(crate) fn param_transfer(&mut self, params: impl IntoIterator<Item = (u8, [u8; 4])>) -> Result<(), Error<E>> {
    let mut sent = 0usize;
    let result = self.send_params(params, &mut sent);
    if sent == 0 {
      return result;
    }

    let end = self.end_param_transfer();
    result.and(end)
  }

  fn send_params(
    &mut self,
    params: impl IntoIterator<Item = (u8, [u8; 4])>,
    sent: &mut usize,
  ) -> Result<(), Error<E>> {
    let backoff = self.config.timeouts.param_ack;
    for (id, payload) in params {
      check_id(id)?;
      let request = id | PARAM_WRITE;
      let first = *sent == 0;
      *sent += 1;

      for (reg, byte) in LOAD_PARAM_REGS.iter().zip(payload) {
        self.write_u8(*reg, byte)?;
      }
      self.write_u8(Reg::ParamRequest, request)?;
      if first {
        self.write_u8(Reg::AlgorithmControl, ALGO_CTRL_PARAM_TRANSFER)?;
      }

      self.wait_for(Reg::ParamAcknowledge, backoff, Wait::ParamAck(request), |ack| ack == request)?;
      trace!("param {} acknowledged", id);
    }
    Ok(())
  }

  fn end_param_transfer(&mut self) -> Result<(), Error<E>> {
    self.write_u8(Reg::ParamRequest, PARAM_END)?;
    self.write_algorithm_control()
  }
}

fn check_id<E>(id: u8) -> Result<(), Error<E>> {
  match id {
    1..=0x7F => Ok(()),
    _ => Err(Error::InvalidParam(id)),
  }
}
