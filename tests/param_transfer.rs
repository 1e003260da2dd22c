mod common;

use common::*;
use em7180::{Backoff, Config, Error, FullScale, WarmStart, Wait};

#[test]
fn float_parameter_is_loaded_big_endian() {
  let (mut dev, sim, _) = running();
  dev.set_float_param(10, 1.0).unwrap();

  let s = sim.state();
  assert_eq!(s.param_log, vec![(10, [0x3F, 0x80, 0x00, 0x00])]);
  assert_eq!(s.writes_to(PARAM_REQUEST), vec![0x8A, 0x00]);
  // Transfer trigger, then the configured control restored.
  assert_eq!(s.writes_to(ALGORITHM_CONTROL), vec![0x80, 0x0A]);
}

#[test]
fn integer_parameter_is_loaded_little_endian() {
  let (mut dev, sim, _) = running();
  dev.set_integer_param(20, 0x1234_5678).unwrap();
  assert_eq!(sim.state().param_log, vec![(20, [0x78, 0x56, 0x34, 0x12])]);
}

#[test]
fn handshake_waits_for_the_echo() {
  let (mut dev, sim, delay) = running();
  sim.state().ack_after = 5;
  let before = delay.elapsed_us();

  dev.set_gyro_full_scale(500).unwrap();

  assert_eq!(sim.state().ack_polls, 6);
  assert_eq!(delay.elapsed_us() - before, 5 * 1_000);
  assert_eq!(sim.state().params[&75], [0xF4, 0x01, 0x00, 0x00]);
  assert_eq!(sim.reg(PARAM_REQUEST), 0x00);
}

#[test]
fn missing_ack_times_out_and_still_closes_the_transfer() {
  let (mut dev, sim, delay) = running();
  sim.state().never_ack = true;
  let before = delay.elapsed_us();

  assert!(matches!(dev.set_float_param(10, 2.5), Err(Error::Timeout(Wait::ParamAck(0x8A)))));
  assert_eq!(sim.state().ack_polls, 500);
  assert_eq!(delay.elapsed_us() - before, 499 * 1_000);
  assert_eq!(sim.reg(PARAM_REQUEST), 0x00);
  assert_eq!(sim.reg(ALGORITHM_CONTROL), 0x0A);
}

#[test]
fn ack_bound_is_configurable() {
  let mut cfg = Config::default();
  cfg.timeouts.param_ack = Backoff::new(250, 3);
  let (mut dev, sim, delay) = device(cfg);
  sim.state().never_ack = true;

  assert!(matches!(dev.set_integer_param(1, 0), Err(Error::Timeout(Wait::ParamAck(0x81)))));
  assert_eq!(sim.state().ack_polls, 3);
  assert_eq!(delay.elapsed_us(), 2 * 250);
}

#[test]
fn out_of_range_ids_touch_nothing() {
  let (mut dev, sim, _) = running();

  assert!(matches!(dev.set_integer_param(0, 1), Err(Error::InvalidParam(0))));
  assert!(matches!(dev.set_float_param(0x80, 1.0), Err(Error::InvalidParam(0x80))));
  assert!(matches!(dev.read_param(0), Err(Error::InvalidParam(0))));
  assert!(sim.state().log.is_empty());
}

#[test]
fn parameters_are_refused_in_passthrough() {
  let (mut dev, _, _) = running();
  dev.enter_passthrough().unwrap();
  assert!(matches!(dev.set_gyro_full_scale(2000), Err(Error::InvalidState)));
}

#[test]
fn full_scales_read_back() {
  let (mut dev, sim, _) = running();
  assert_eq!(dev.full_scales().unwrap(), FullScale::default());

  dev.set_mag_accel_full_scale(1300, 16).unwrap();
  assert_eq!(dev.read_param(74).unwrap(), [0x14, 0x05, 0x10, 0x00]);
  assert_eq!(sim.reg(PARAM_REQUEST), 0x00);
  assert_eq!(sim.reg(ALGORITHM_CONTROL), 0x0A);
}

#[test]
fn warm_start_uses_one_session() {
  let (mut dev, sim, _) = running();
  let mut params = [[0u8; 4]; 35];
  for (i, p) in params.iter_mut().enumerate() {
    *p = [i as u8, 0xAA, 0x55, 0xFF];
  }
  dev.apply_warm_start(&WarmStart { params }).unwrap();

  let s = sim.state();
  assert_eq!(s.param_log.len(), 35);
  assert_eq!(s.param_log[34], (35, [34, 0xAA, 0x55, 0xFF]));
  // Single trigger, single close.
  assert_eq!(s.writes_to(ALGORITHM_CONTROL), vec![0x80, 0x0A]);
  let requests = s.writes_to(PARAM_REQUEST);
  assert_eq!(requests.len(), 36);
  assert_eq!(requests[0], 0x81);
  assert_eq!(requests[34], 0xA3);
  assert_eq!(requests[35], 0x00);
}
