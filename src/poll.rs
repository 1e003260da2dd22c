//! Event polling, orientation output and standby.
//!
//! `EVENT_STATUS` clears on read, so [`Em7180::poll`] reads it exactly once
//! per call and hands the decoded set back to the caller; nothing re-reads it
//! within the same cycle.

use core::f32::consts::PI;

use embedded_hal::{delay::DelayNs, i2c::*};
use micromath::F32Ext;

use crate::{codec, defs::*, Em7180, Error, Events, Fault, State};

const RAD_TO_DEG: f32 = 180.0 / PI;

/// Latest fused orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Orientation {
  /// QX, QY, QZ, QW as laid out in the registers (not scalar-first).
  pub quaternion: [f32; 4],
  /// Degrees, declination subtracted.
  pub yaw: f32,
  pub pitch: f32,
  pub roll: f32,
}

impl Orientation {
  /// Build a sample from the 16 quaternion register bytes.
  ///
  /// Yaw, pitch and roll are the first three components scaled from radians
  /// to degrees. Use [`quaternion_to_euler`] for the trigonometric conversion.
  pub fn from_registers(raw: &[u8; 16], declination_deg: f32) -> Self {
    let q = codec::f32x4_from_le(raw);
    Self {
      quaternion: q,
      yaw: q[0] * 180.0 / PI - declination_deg,
      pitch: q[1] * 180.0 / PI,
      roll: q[2] * 180.0 / PI,
    }
  }
}

/// Standard quaternion to (yaw, pitch, roll) in degrees for a register-order
/// quaternion `[x, y, z, w]`, with `declination_deg` subtracted from yaw.
pub fn quaternion_to_euler(q: [f32; 4], declination_deg: f32) -> (f32, f32, f32) {
  let [x, y, z, w] = q;
  let yaw = F32Ext::atan2(2.0 * (x * y + w * z), w * w + x * x - y * y - z * z);
  let pitch = -F32Ext::asin(2.0 * (x * z - w * y));
  let roll = F32Ext::atan2(2.0 * (w * x + y * z), w * w - x * x - y * y + z * z);
  (yaw * RAD_TO_DEG - declination_deg, pitch * RAD_TO_DEG, roll * RAD_TO_DEG)
}

impl<I, D, E> Em7180<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Run one polling cycle.
  ///
  /// - Reads `EVENT_STATUS` once (clear-on-read).
  /// - Error event: reads and decodes `ERROR_REGISTER`, sets the fault flag.
  ///   Otherwise clears the flag.
  /// - Refreshes the cached algorithm status.
  /// - Quaternion event: reads the 16 quaternion bytes and updates
  ///   [`orientation`](Self::orientation).
  ///
  /// Device faults are not errors; only bus failures are.
  pub fn poll(&mut self) -> Result<Events, Error<E>> {
    if !matches!(self.state, State::Running | State::Sleeping) {
      return Err(Error::InvalidState);
    }

    let events: Events = self.read(Reg::EventStatus)?;

    if events.error {
      let code = self.read_u8(Reg::ErrorRegister)?;
      self.fault = Fault::from_code(code);
      self.faulty = true;
      warn!("coprocessor error {:#x}", code);
    } else {
      self.fault = None;
      self.faulty = false;
    }

    self.algorithm_status = self.read_u8(Reg::AlgorithmStatus)?;

    if events.quaternion {
      let mut raw = [0u8; 16];
      self.read_bytes(Reg::Qx, &mut raw)?;
      self.orientation = Orientation::from_registers(&raw, self.config.declination_deg);
    }

    #[cfg(feature = "events")]
    self.push_events(events);

    Ok(events)
  }

  /// Put the fusion algorithm in standby. Other control bits are kept.
  pub fn sleep(&mut self) -> Result<(), Error<E>> {
    if !matches!(self.state, State::Running | State::Sleeping) {
      return Err(Error::InvalidState);
    }
    self.control.standby = true;
    self.write_algorithm_control()?;
    self.state = State::Sleeping;
    Ok(())
  }

  /// Leave standby. Other control bits are kept.
  pub fn wake(&mut self) -> Result<(), Error<E>> {
    if !matches!(self.state, State::Running | State::Sleeping) {
      return Err(Error::InvalidState);
    }
    self.control.standby = false;
    self.write_algorithm_control()?;
    self.state = State::Running;
    Ok(())
  }
}
