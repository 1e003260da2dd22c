use embedded_hal::{delay::DelayNs, i2c::*};

use super::{Em7180, Events, Fault, Orientation};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
  /// The coprocessor restarted and has to be brought up again.
  CpuReset,
  /// The error register held a fault; `Fault::Unknown(0)` if it read back zero.
  Error(Fault),
  Quaternion(Orientation),
  MagData,
  AccelData,
  GyroData,
}

impl<I, D, E> Em7180<I, D>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Oldest event queued by [`poll`](Self::poll), if any.
  pub fn next_event(&mut self) -> Option<Event> {
    self.dequeue.pop_front()
  }

  /// Queue what one poll decoded, in bit order.
  pub(crate) fn push_events(&mut self, events: Events) {
    if events.cpu_reset {
      self.push_event(Event::CpuReset);
    }
    if events.error {
      self.push_event(Event::Error(self.fault.unwrap_or(Fault::Unknown(0))));
    }
    if events.quaternion {
      self.push_event(Event::Quaternion(self.orientation));
    }
    if events.mag {
      self.push_event(Event::MagData);
    }
    if events.accel {
      self.push_event(Event::AccelData);
    }
    if events.gyro {
      self.push_event(Event::GyroData);
    }
  }

  #[inline]
  fn push_event(&mut self, e: Event) {
    if self.dequeue.is_full() {
      let _ = self.dequeue.pop_front();
    }
    let _ = self.dequeue.push_back(e);
  }
}
