mod common;

use ccs811_rs::chardev::{Command, GET_MODE, SET_MODE};
use ccs811_rs::registers::addr;
use ccs811_rs::{CharDevice, Ccs811, Config, Error, MeasurementMode, SharedCcs811};
use common::{FakeBus, RecordingDelay};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;

type Shared = SharedCcs811<NoopRawMutex, FakeBus, RecordingDelay>;

fn shared(bus: &FakeBus) -> Shared {
    SharedCcs811::new(Ccs811::with_bus(bus.clone(), RecordingDelay::new(), Config::default()))
}

#[test]
fn read_renders_one_line() {
    let bus = FakeBus::healthy();
    bus.set(addr::ALG_RESULT_DATA, &[0x01, 0x90, 0x00, 0x64, 0x98, 0x00, 0x00, 0x00]);
    let sensor = shared(&bus);
    let dev = CharDevice::new(&sensor);

    let mut buf = [0u8; 32];
    let n = dev.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"CO2=400 PPM, TVOC=100 PPB\n");
}

#[test]
fn read_fits_largest_line() {
    let bus = FakeBus::healthy();
    bus.set(addr::ALG_RESULT_DATA, &[0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]);
    let sensor = shared(&bus);
    let dev = CharDevice::new(&sensor);

    let mut buf = [0u8; 30];
    let n = dev.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"CO2=65535 PPM, TVOC=65535 PPB\n");
}

#[test]
fn read_into_small_buffer_fails() {
    let bus = FakeBus::healthy();
    bus.set(addr::ALG_RESULT_DATA, &[0x01, 0x90, 0x00, 0x64, 0, 0, 0, 0]);
    let sensor = shared(&bus);
    let dev = CharDevice::new(&sensor);

    let mut buf = [0u8; 8];
    assert_eq!(dev.read(&mut buf), Err(Error::OutOfRange));
}

#[test]
fn read_reports_short_transfer() {
    let bus = FakeBus::healthy();
    bus.set_short_recv(true);
    let sensor = shared(&bus);
    let dev = CharDevice::new(&sensor);

    let mut buf = [0u8; 32];
    assert_eq!(dev.read(&mut buf), Err(Error::Io));
}

#[test]
fn ioctl_sets_and_gets_mode() {
    let bus = FakeBus::healthy();
    let sensor = shared(&bus);
    let dev = CharDevice::new(&sensor);

    let mut payload = 3u32.to_ne_bytes();
    dev.ioctl(SET_MODE, &mut payload).unwrap();
    assert_eq!(bus.get(addr::MEAS_MODE), Some(vec![0x30]));

    let mut payload = [0u8; 4];
    dev.ioctl(GET_MODE, &mut payload).unwrap();
    assert_eq!(u32::from_ne_bytes(payload), 3);
}

#[test]
fn ioctl_get_mode_reports_reserved_drive_mode() {
    let bus = FakeBus::healthy();
    bus.set(addr::MEAS_MODE, &[0x40]);
    let sensor = shared(&bus);
    let dev = CharDevice::new(&sensor);

    let mut payload = [0u8; 4];
    dev.ioctl(GET_MODE, &mut payload).unwrap();
    assert_eq!(u32::from_ne_bytes(payload), 4);
}

#[test]
fn ioctl_rejects_bad_mode_and_unknown_codes() {
    let bus = FakeBus::healthy();
    let sensor = shared(&bus);
    let dev = CharDevice::new(&sensor);

    let mut payload = 7u32.to_ne_bytes();
    assert_eq!(dev.ioctl(SET_MODE, &mut payload), Err(Error::OutOfRange));
    assert_eq!(dev.ioctl(55, &mut payload), Err(Error::UnsupportedCommand(55)));
    assert_eq!(bus.transaction_count(), 0);
}

#[test]
fn command_decoding() {
    let cmd = Command::decode::<()>(SET_MODE, &1u32.to_ne_bytes()).unwrap();
    assert_eq!(cmd, Command::SetMode(MeasurementMode::ConstantPower1s));
    let cmd = Command::decode::<()>(GET_MODE, &[0xFF; 4]).unwrap();
    assert_eq!(cmd, Command::GetMode);
}

#[test]
fn shared_handle_runs_lifecycle() {
    let bus = FakeBus::healthy();
    let sensor = shared(&bus);
    sensor.start().unwrap();
    sensor.set_mode(MeasurementMode::PulseHeating10s).unwrap();
    assert_eq!(sensor.get_mode().unwrap(), 2);
    assert_eq!(sensor.state(), ccs811_rs::DeviceState::Measuring);

    let dev = sensor.into_inner();
    let (_, delay) = dev.release();
    assert_eq!(delay.micros(), vec![2_000, 1_000]);
}

#[test]
fn with_runs_driver_calls_under_one_lock() {
    let bus = FakeBus::healthy();
    let sensor = shared(&bus);
    let (id, version) = sensor.with(|dev| (dev.hardware_id(), dev.hardware_version()));
    assert_eq!(id, Ok(0x81));
    assert_eq!(version, Ok(0x12));
}

#[test]
#[should_panic]
fn nested_with_on_same_handle_panics() {
    let bus = FakeBus::healthy();
    let sensor = shared(&bus);
    sensor.with(|_| sensor.state());
}
