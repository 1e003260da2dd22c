use embedded_hal::{delay::DelayNs, i2c::*};

use crate::{defs::Reg, Em7180, Error, PassthroughState};

impl<I, D, E> Em7180<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  pub(crate) fn read<const N: usize, T: TryFrom<[u8; N]>>(&mut self, reg: Reg) -> Result<T, Error<E>> {
    let mut b = [0u8; N];
    self.read_bytes(reg, &mut b)?;
    TryFrom::try_from(b).map_err(|_| Error::Data)
  }

  pub(crate) fn read_u8(&mut self, reg: Reg) -> Result<u8, Error<E>> {
    let mut b = [0u8; 1];
    self.read_bytes(reg, &mut b)?;
    Ok(b[0])
  }

  pub(crate) fn read_bytes(&mut self, reg: Reg, buf: &mut [u8]) -> Result<(), Error<E>> {
    let address = self.config.address;
    self.read_register_block(address, reg.into(), buf)
  }

  pub(crate) fn write<const N: usize, T: TryInto<[u8; N]>>(&mut self, reg: Reg, v: T) -> Result<(), Error<E>> {
    let b: [u8; N] = v.try_into().map_err(|_| Error::Data)?;
    for (i, byte) in b.iter().enumerate() {
      self.write_u8_at(u8::from(reg) + i as u8, *byte)?;
    }
    Ok(())
  }

  pub(crate) fn write_u8(&mut self, reg: Reg, value: u8) -> Result<(), Error<E>> {
    self.write_u8_at(reg.into(), value)
  }

  fn write_u8_at(&mut self, reg: u8, value: u8) -> Result<(), Error<E>> {
    let address = self.config.address;
    self.write_register(address, reg, value)
  }

  /// Write a 16-bit word LSB first into two (not necessarily adjacent) registers.
  pub(crate) fn write_i16(&mut self, (lsb, msb): (Reg, Reg), value: i16) -> Result<(), Error<E>> {
    let [lo, hi] = value.to_le_bytes();
    self.write_u8(lsb, lo)?;
    self.write_u8(msb, hi)
  }

  /// Single register read from any device on the bus.
  pub fn read_register(&mut self, address: u8, reg: u8) -> Result<u8, Error<E>> {
    let mut b = [0u8; 1];
    self.read_register_block(address, reg, &mut b)?;
    Ok(b[0])
  }

  /// Register address write, repeated start, then exactly `buf.len()` bytes.
  pub fn read_register_block(&mut self, address: u8, reg: u8, buf: &mut [u8]) -> Result<(), Error<E>> {
    self.i2c.write_read(address, &[reg], buf).map_err(Error::I2c)
  }

  /// Register address and value in one transaction.
  pub fn write_register(&mut self, address: u8, reg: u8, value: u8) -> Result<(), Error<E>> {
    self.i2c.write(address, &[reg, value]).map_err(Error::I2c)
  }

  /// Read one byte from the EEPROM behind the coprocessor.
  ///
  /// Only valid in [`PassthroughState::Passthrough`].
  pub fn eeprom_read_byte(&mut self, addr: u16) -> Result<u8, Error<E>> {
    let mut b = [0u8; 1];
    self.eeprom_read_bytes(addr, &mut b)?;
    Ok(b[0])
  }

  /// Read a block from the EEPROM. The 16-bit address goes out high byte
  /// (page) first, then low byte (offset).
  ///
  /// Only valid in [`PassthroughState::Passthrough`].
  pub fn eeprom_read_bytes(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), Error<E>> {
    if self.passthrough != PassthroughState::Passthrough {
      return Err(Error::NotInPassthrough);
    }
    let eeprom = self.config.eeprom_address;
    self.i2c.write_read(eeprom, &addr.to_be_bytes(), buf).map_err(Error::I2c)
  }
}
