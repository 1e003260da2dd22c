//! Factory calibration and warm-start data stored in the EEPROM.
//!
//! Both blocks are read in passthrough and written back to the coprocessor
//! once it owns its bus again:
//! - [`AccelCalibration`] becomes six 16-bit words in the general purpose
//!   registers.
//! - [`WarmStart`] is replayed through the parameter transfer as ids 1..=35.

use embedded_hal::{delay::DelayNs, i2c::*};

use crate::{codec, defs::*, Em7180, Error};

/// Per-axis accelerometer extremes (raw codes, ±1 g) recorded at the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelCalibration {
  pub max: [i16; 3],
  pub min: [i16; 3],
}

impl AccelCalibration {
  /// Decode the 12-byte EEPROM record: three LE maxima, then three LE minima.
  pub fn from_bytes(b: &[u8; 12]) -> Self {
    let mut max = [0i16; 3];
    let mut min = [0i16; 3];
    for axis in 0..3 {
      max[axis] = codec::i16_from_le(b[2 * axis], b[2 * axis + 1]);
      min[axis] = codec::i16_from_le(b[2 * axis + 6], b[2 * axis + 7]);
    }
    Self { max, min }
  }

  /// Register words in write order: X/Y/Z scale, then X/Y/Z offset.
  ///
  /// - `scale = 4096000000 / (max - min) - 1000000`
  /// - `offset = ((2048 - max) + (-2048 - min)) * 100000 / 4096`, negated on Z
  ///
  /// Integer arithmetic truncating toward zero, narrowed to 16 bits.
  pub fn registers(&self) -> Result<[i16; 6], usize> {
    let mut out = [0i16; 6];
    for axis in 0..3 {
      let max = self.max[axis] as i64;
      let min = self.min[axis] as i64;
      let span = max - min;
      if span == 0 {
        return Err(axis);
      }

      out[axis] = (4_096_000_000i64 / span - 1_000_000) as i16;

      let offset = (((2048 - max) + (-2048 - min)) * 100_000 / 4096) as i16;
      out[axis + 3] = if axis == 2 { offset.wrapping_neg() } else { offset };
    }
    Ok(out)
  }
}

pub const WARM_START_PARAMS: usize = 35;

/// Snapshot of the coprocessor's internal state, 35 opaque 4-byte parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WarmStart {
  pub params: [[u8; 4]; WARM_START_PARAMS],
}

impl WarmStart {
  pub fn from_bytes(b: &[u8; WARM_START_PARAMS * 4]) -> Self {
    let mut params = [[0u8; 4]; WARM_START_PARAMS];
    for (p, chunk) in params.iter_mut().zip(b.chunks_exact(4)) {
      p.copy_from_slice(chunk);
    }
    Self { params }
  }
}

impl<I, D, E> Em7180<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Read the accelerometer calibration record. Passthrough only.
  pub fn load_accel_calibration(&mut self) -> Result<AccelCalibration, Error<E>> {
    let mut b = [0u8; 12];
    self.eeprom_read_bytes(EEPROM_ACCEL_CAL, &mut b)?;
    let cal = AccelCalibration::from_bytes(&b);
    debug!("accel calibration max={} min={}", cal.max, cal.min);
    Ok(cal)
  }

  /// Write the calibration words to GP36..GP56. Direct mode only.
  ///
  /// Every axis is checked before the first write, so a degenerate record
  /// leaves the device untouched.
  pub fn apply_accel_calibration(&mut self, cal: &AccelCalibration) -> Result<(), Error<E>> {
    self.require_direct()?;
    let words = cal.registers().map_err(|axis| Error::InvalidCalibration { axis })?;
    for (regs, word) in ACCEL_CAL_REGS.iter().zip(words) {
      self.write_i16(*regs, word)?;
    }
    Ok(())
  }

  /// Read the 140-byte warm-start block spread over pages 254 and 255.
  /// Passthrough only.
  pub fn load_warm_start(&mut self) -> Result<WarmStart, Error<E>> {
    let mut b = [0u8; WARM_START_PARAMS * 4];
    self.eeprom_read_bytes(EEPROM_WARM_START_TAIL, &mut b[128..])?;
    self.delay.delay_ms(WARM_START_PAGE_DELAY);
    self.eeprom_read_bytes(EEPROM_WARM_START_HEAD, &mut b[..128])?;
    Ok(WarmStart::from_bytes(&b))
  }

  /// Replay a warm-start block as parameters 1..=35 in one transfer. Direct mode only.
  pub fn apply_warm_start(&mut self, ws: &WarmStart) -> Result<(), Error<E>> {
    self.require_direct()?;
    let params = ws.params.iter().enumerate().map(|(i, p)| (i as u8 + 1, *p));
    self.param_transfer(params)
  }
}
