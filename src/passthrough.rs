//! Passthrough: handing the coprocessor's sensor bus to the host.
//!
//! The factory calibration lives in an EEPROM that only the coprocessor can
//! normally reach. In passthrough the coprocessor parks its algorithm and
//! forwards host transactions to that bus, so the EEPROM answers at its own
//! address. EEPROM reads are refused outside [`PassthroughState::Passthrough`],
//! and calibration writes are refused outside [`PassthroughState::Direct`].
//!
//! ```no_run
//! # fn demo<I, D, E>(s: &mut em7180::Em7180<I, D>) -> Result<(), em7180::Error<E>>
//! # where I: embedded_hal::i2c::I2c<Error = E>, D: embedded_hal::delay::DelayNs {
//! s.enter_passthrough()?;
//! let cal = s.load_accel_calibration()?;
//! s.leave_passthrough()?;
//! s.apply_accel_calibration(&cal)?;
//! # Ok(()) }
//! ```

use embedded_hal::{delay::DelayNs, i2c::*};

use crate::{defs::*, Em7180, Error, Wait};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PassthroughState {
  /// Coprocessor owns its sensor bus.
  Direct,
  /// Passthrough requested, not yet confirmed. Also left here after a timeout.
  EnteringPassthrough,
  /// Host can address the EEPROM.
  Passthrough,
  /// Passthrough released, algorithm not yet running. Also left here after a timeout.
  LeavingPassthrough,
}

impl<I, D, E> Em7180<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  pub fn passthrough_state(&self) -> PassthroughState {
    self.passthrough
  }

  /// Put the algorithm in standby and hand the sensor bus to the host.
  ///
  /// Sequence:
  /// - `ALGORITHM_CONTROL = 0x01` (standby)
  /// - `PASSTHRU_CONTROL = 0x01`
  /// - poll `PASSTHRU_STATUS` until bit 0 is set
  pub fn enter_passthrough(&mut self) -> Result<(), Error<E>> {
    if self.passthrough != PassthroughState::Direct {
      return Err(Error::InvalidState);
    }
    self.passthrough = PassthroughState::EnteringPassthrough;

    self.write_u8(Reg::AlgorithmControl, ALGO_CTRL_STANDBY)?;
    self.delay.delay_ms(PASSTHROUGH_STEP_DELAY);
    self.write_u8(Reg::PassThruControl, PASSTHROUGH_ON)?;
    self.delay.delay_ms(PASSTHROUGH_STEP_DELAY);

    let backoff = self.config.timeouts.passthrough;
    self.wait_for(Reg::PassThruStatus, backoff, Wait::Passthrough, |s| s & 0x01 != 0)?;

    self.passthrough = PassthroughState::Passthrough;
    debug!("passthrough entered");
    Ok(())
  }

  /// Take the bus back and restart the algorithm.
  ///
  /// Sequence:
  /// - `PASSTHRU_CONTROL = 0x00`
  /// - poll `PASSTHRU_STATUS` until bit 0 clears
  /// - `ALGORITHM_CONTROL = <configured run mode>`
  /// - poll `ALGORITHM_STATUS` until the standby bit matches the control byte
  ///   (cleared when running, set when the handle is sleeping)
  ///
  /// Also accepted from a state left behind by a timed-out transition, so a
  /// caller can retry the exit.
  pub fn leave_passthrough(&mut self) -> Result<(), Error<E>> {
    if self.passthrough == PassthroughState::Direct {
      return Err(Error::InvalidState);
    }
    self.passthrough = PassthroughState::LeavingPassthrough;

    self.write_u8(Reg::PassThruControl, PASSTHROUGH_OFF)?;
    self.delay.delay_ms(PASSTHROUGH_STEP_DELAY);

    let backoff = self.config.timeouts.passthrough;
    self.wait_for(Reg::PassThruStatus, backoff, Wait::Passthrough, |s| s & 0x01 == 0)?;

    self.write_algorithm_control()?;
    self.delay.delay_ms(PASSTHROUGH_STEP_DELAY);

    let backoff = self.config.timeouts.algorithm;
    let standby = self.control.standby;
    self.wait_for(Reg::AlgorithmStatus, backoff, Wait::AlgorithmSettle, |s| (s & 0x01 != 0) == standby)?;

    self.passthrough = PassthroughState::Direct;
    debug!("passthrough left");
    Ok(())
  }

  /// Write the cached run-mode algorithm control byte.
  pub(crate) fn write_algorithm_control(&mut self) -> Result<(), Error<E>> {
    let control = self.control;
    self.write(Reg::AlgorithmControl, control)
  }

  pub(crate) fn require_direct(&self) -> Result<(), Error<E>> {
    match self.passthrough {
      PassthroughState::Direct => Ok(()),
      _ => Err(Error::InvalidState),
    }
  }
}
