//! Simulated EM7180 behind a blocking I2C bus.
//!
//! Register semantics that the driver relies on are modelled:
//! - EVENT_STATUS clears on read
//! - PASSTHRU_STATUS follows PASSTHRU_CONTROL
//! - ALGORITHM_STATUS standby bit follows ALGORITHM_CONTROL
//! - PARAM_ACKNOWLEDGE echoes PARAM_REQUEST after a configurable number of reads
//! - the EEPROM only answers while passthrough is active
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use em7180::{Config, Em7180};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation, SevenBitAddress};

pub const SENTRAL: u8 = 0x28;
pub const EEPROM: u8 = 0x50;

pub const QX: u8 = 0x00;
pub const MX: u8 = 0x12;
pub const AX: u8 = 0x1A;
pub const GX: u8 = 0x22;
pub const ENABLE_EVENTS: u8 = 0x33;
pub const HOST_CONTROL: u8 = 0x34;
pub const EVENT_STATUS: u8 = 0x35;
pub const SENTRAL_STATUS: u8 = 0x37;
pub const ALGORITHM_STATUS: u8 = 0x38;
pub const PARAM_ACK: u8 = 0x3A;
pub const ERROR_REGISTER: u8 = 0x50;
pub const ALGORITHM_CONTROL: u8 = 0x54;
pub const LOAD_PARAM: u8 = 0x60;
pub const PARAM_REQUEST: u8 = 0x64;
pub const PRODUCT_ID: u8 = 0x90;
pub const RESET_REQUEST: u8 = 0x9B;
pub const PASSTHRU_STATUS: u8 = 0x9E;
pub const PASSTHRU_CONTROL: u8 = 0xA0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
  Read { address: u8, reg: u8, len: usize },
  Write { address: u8, reg: u8, value: u8 },
}

#[derive(Debug)]
pub struct SimState {
  pub regs: [u8; 256],
  pub eeprom: Vec<u8>,
  pub log: Vec<Access>,
  /// Reset requests seen so far.
  pub resets: u32,
  /// Upload completes on this reset request; `None` never completes.
  pub upload_on_reset: Option<u32>,
  /// PARAM_ACKNOWLEDGE reads answered with 0 before the echo.
  pub ack_after: u32,
  pub never_ack: bool,
  pub never_passthrough: bool,
  /// Parameter writes in arrival order, id without the write bit.
  pub param_log: Vec<(u8, [u8; 4])>,
  pub params: HashMap<u8, [u8; 4]>,
  transfer: bool,
  ack_reads: u32,
  pub ack_polls: u32,
}

impl SimState {
  fn new() -> Self {
    let mut regs = [0u8; 256];
    regs[0x70] = 0xE6; // ROM version
    regs[0x71] = 0x02;
    regs[0x72] = 0x05; // RAM version
    regs[0x73] = 0x01;
    regs[PRODUCT_ID as usize] = 0x80;
    regs[0x91] = 0x02; // revision
    regs[0x92] = 0x01; // run status
    regs[SENTRAL_STATUS as usize] = 0x01; // EEPROM detected
    regs[0x45] = 30; // actual mag rate
    regs[0x46] = 10;
    regs[0x47] = 20;

    let mut eeprom = vec![0xFFu8; 0x8000];
    for i in 0..140usize {
      eeprom[0x7F00 + i] = i as u8;
    }
    eeprom[0x7F8C..0x7F98].copy_from_slice(&golden_accel_record());

    Self {
      regs,
      eeprom,
      log: Vec::new(),
      resets: 0,
      upload_on_reset: Some(1),
      ack_after: 2,
      never_ack: false,
      never_passthrough: false,
      param_log: Vec::new(),
      params: HashMap::new(),
      transfer: false,
      ack_reads: 0,
      ack_polls: 0,
    }
  }

  pub fn writes_to(&self, reg: u8) -> Vec<u8> {
    self
      .log
      .iter()
      .filter_map(|a| match *a {
        Access::Write { address: SENTRAL, reg: r, value } if r == reg => Some(value),
        _ => None,
      })
      .collect()
  }

  pub fn reads_of(&self, reg: u8) -> usize {
    self.log.iter().filter(|a| matches!(a, Access::Read { address: SENTRAL, reg: r, .. } if *r == reg)).count()
  }

  pub fn eeprom_accesses(&self) -> usize {
    self.log.iter().filter(|a| matches!(a, Access::Read { address: EEPROM, .. })).count()
  }

  fn write_reg(&mut self, reg: u8, value: u8) {
    self.log.push(Access::Write { address: SENTRAL, reg, value });
    self.regs[reg as usize] = value;

    match reg {
      RESET_REQUEST if value & 0x01 != 0 => {
        self.resets += 1;
        if self.upload_on_reset.map_or(false, |n| self.resets >= n) {
          self.regs[SENTRAL_STATUS as usize] |= 0x0A;
        }
      }
      PASSTHRU_CONTROL if !self.never_passthrough => {
        self.regs[PASSTHRU_STATUS as usize] = value & 0x01;
      }
      ALGORITHM_CONTROL => {
        let status = &mut self.regs[ALGORITHM_STATUS as usize];
        *status = (*status & !0x01) | (value & 0x01);
        self.transfer = value & 0x80 != 0;
        self.ack_reads = 0;
      }
      PARAM_REQUEST => {
        self.ack_reads = 0;
        if value == 0 {
          self.regs[PARAM_ACK as usize] = 0;
        } else if value & 0x80 != 0 {
          let l = LOAD_PARAM as usize;
          let payload = [self.regs[l], self.regs[l + 1], self.regs[l + 2], self.regs[l + 3]];
          self.params.insert(value & 0x7F, payload);
          self.param_log.push((value & 0x7F, payload));
        } else {
          let saved = self.params.get(&value).copied().unwrap_or_default();
          self.regs[0x3B..0x3F].copy_from_slice(&saved);
        }
      }
      _ => {}
    }
  }

  fn read_reg(&mut self, reg: u8) -> u8 {
    match reg {
      EVENT_STATUS => core::mem::take(&mut self.regs[reg as usize]),
      PARAM_ACK => {
        self.ack_polls += 1;
        let request = self.regs[PARAM_REQUEST as usize];
        if !self.transfer || self.never_ack || request == 0 {
          return 0;
        }
        self.ack_reads += 1;
        if self.ack_reads > self.ack_after {
          request
        } else {
          0
        }
      }
      _ => self.regs[reg as usize],
    }
  }

  fn passthrough(&self) -> bool {
    self.regs[PASSTHRU_STATUS as usize] & 0x01 != 0
  }
}

/// X/Y/Z maxima of 2032 and minima of -2064, little-endian.
pub fn golden_accel_record() -> [u8; 12] {
  [0xF0, 0x07, 0xF0, 0x07, 0xF0, 0x07, 0xF0, 0xF7, 0xF0, 0xF7, 0xF0, 0xF7]
}

#[derive(Debug, Clone)]
pub struct Sim(Rc<RefCell<SimState>>);

impl Sim {
  pub fn new() -> Self {
    Self(Rc::new(RefCell::new(SimState::new())))
  }

  pub fn state(&self) -> std::cell::RefMut<'_, SimState> {
    self.0.borrow_mut()
  }

  pub fn reg(&self, reg: u8) -> u8 {
    self.0.borrow().regs[reg as usize]
  }

  pub fn set_reg(&self, reg: u8, value: u8) {
    self.0.borrow_mut().regs[reg as usize] = value;
  }

  pub fn set_block(&self, reg: u8, bytes: &[u8]) {
    let r = reg as usize;
    self.0.borrow_mut().regs[r..r + bytes.len()].copy_from_slice(bytes);
  }
}

impl ErrorType for Sim {
  type Error = ErrorKind;
}

impl I2c<SevenBitAddress> for Sim {
  fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
    let mut s = self.0.borrow_mut();
    match address {
      SENTRAL => {
        let mut pointer = 0u8;
        for op in operations {
          match op {
            Operation::Write(bytes) => {
              let Some((&reg, values)) = bytes.split_first() else { continue };
              pointer = reg;
              for (i, v) in values.iter().enumerate() {
                s.write_reg(reg.wrapping_add(i as u8), *v);
              }
            }
            Operation::Read(buf) => {
              s.log.push(Access::Read { address, reg: pointer, len: buf.len() });
              for (i, b) in buf.iter_mut().enumerate() {
                *b = s.read_reg(pointer.wrapping_add(i as u8));
              }
            }
          }
        }
        Ok(())
      }
      EEPROM if s.passthrough() => {
        let mut pointer = 0usize;
        for op in operations {
          match op {
            Operation::Write(bytes) if bytes.len() == 2 => {
              pointer = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
            }
            Operation::Write(_) => return Err(ErrorKind::Other),
            Operation::Read(buf) => {
              s.log.push(Access::Read { address, reg: 0, len: buf.len() });
              let end = pointer + buf.len();
              buf.copy_from_slice(&s.eeprom[pointer..end]);
              pointer = end;
            }
          }
        }
        Ok(())
      }
      _ => Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
    }
  }
}

/// Delay provider that only accumulates the requested time.
#[derive(Debug, Clone, Default)]
pub struct SimDelay(Rc<Cell<u64>>);

impl SimDelay {
  pub fn elapsed_us(&self) -> u64 {
    self.0.get() / 1_000
  }
}

impl DelayNs for SimDelay {
  fn delay_ns(&mut self, ns: u32) {
    self.0.set(self.0.get() + ns as u64);
  }
}

pub fn device(config: Config) -> (Em7180<Sim, SimDelay>, Sim, SimDelay) {
  let sim = Sim::new();
  let delay = SimDelay::default();
  (Em7180::with_config(sim.clone(), delay.clone(), config), sim, delay)
}

/// A device that has completed bring-up with the default configuration.
pub fn running() -> (Em7180<Sim, SimDelay>, Sim, SimDelay) {
  let (mut dev, sim, delay) = device(Config::default());
  dev.begin().unwrap();
  {
    let mut s = sim.state();
    s.log.clear();
    s.param_log.clear();
    s.ack_polls = 0;
  }
  (dev, sim, delay)
}
