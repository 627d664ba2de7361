use ccs811_rs::data_types::{Measurement, MeasurementMode};
use ccs811_rs::registers::{
    MeasModeBits, REGISTERS, StatusBits, addr, be_value, decode_drive_mode, encode_drive_mode,
    humidity_to_env, is_readable, is_writable, register_width, temperature_to_env,
};

#[test]
fn widths_match_register_map() {
    let widths = [
        (addr::STATUS, 1),
        (addr::MEAS_MODE, 1),
        (addr::ALG_RESULT_DATA, 8),
        (addr::RAW_DATA, 2),
        (addr::ENV_DATA, 4),
        (addr::THRESHOLDS, 4),
        (addr::BASELINE, 2),
        (addr::HW_ID, 1),
        (addr::HW_VERSION, 1),
        (addr::FW_BOOT_VERSION, 2),
        (addr::FW_APP_VERSION, 2),
        (addr::INTERNAL_STATE, 1),
        (addr::ERROR_ID, 1),
        (addr::APP_ERASE, 4),
        (addr::APP_DATA, 9),
        (addr::APP_VERIFY, 0),
        (addr::APP_START, 0),
        (addr::SW_RESET, 4),
    ];
    for (reg, width) in widths {
        assert_eq!(register_width(reg), width, "register {reg:#04x}");
    }
    assert_eq!(register_width(0x42), 0);
    assert_eq!(register_width(0xFE), 0);
}

#[test]
fn access_permissions() {
    assert!(is_readable(addr::MEAS_MODE) && is_writable(addr::MEAS_MODE));
    assert!(is_readable(addr::BASELINE) && is_writable(addr::BASELINE));
    assert!(is_readable(addr::ALG_RESULT_DATA) && !is_writable(addr::ALG_RESULT_DATA));
    assert!(!is_readable(addr::SW_RESET) && is_writable(addr::SW_RESET));
    assert!(!is_readable(addr::INTERNAL_STATE) && !is_writable(addr::INTERNAL_STATE));
    assert!(!is_readable(0x42) && !is_writable(0x42));

    let readable = REGISTERS.iter().filter(|d| d.readable).count();
    let writable = REGISTERS.iter().filter(|d| d.writable).count();
    assert_eq!(readable, 10);
    assert_eq!(writable, 9);
}

#[test]
fn drive_mode_packing() {
    assert_eq!(encode_drive_mode(1), 0x10);
    assert_eq!(encode_drive_mode(3), 0x30);
    assert_eq!(decode_drive_mode(0x3C), 3);
    assert_eq!(decode_drive_mode(0x8C), 0);
    assert_eq!(encode_drive_mode(4), MeasModeBits::DRIVE_MODE2.bits());
    assert_eq!(encode_drive_mode(0x0F), 0x70);
    let interrupts =
        MeasModeBits::DRIVE_MODE0 | MeasModeBits::INT_DATARDY | MeasModeBits::INT_THRESH;
    assert_eq!(decode_drive_mode(interrupts.bits()), 1);
    assert_eq!(decode_drive_mode(0x40), 4);
    assert_eq!(MeasurementMode::from_meas_mode(0x40), None);
    assert_eq!(MeasurementMode::try_from(2u32), Ok(MeasurementMode::PulseHeating10s));
    assert!(MeasurementMode::try_from(4u32).is_err());
    assert!(MeasurementMode::try_from(0x1_0001u32).is_err());
}

#[test]
fn status_flags_are_masked() {
    let status = StatusBits::from_bits_truncate(0x01);
    assert!(status.contains(StatusBits::ERROR));
    assert!(!status.contains(StatusBits::APP_VALID));

    let status = StatusBits::from_bits_truncate(0x90);
    assert!(status.contains(StatusBits::APP_VALID));
    assert!(status.contains(StatusBits::FW_MODE));
    assert!(!status.contains(StatusBits::ERROR));
}

#[test]
fn big_endian_value() {
    assert_eq!(be_value(&[0x81]), 0x81);
    assert_eq!(be_value(&[0x12, 0x34]), 0x1234);
    assert_eq!(be_value(&[0x01, 0x90, 0x00, 0x64, 0, 0, 0, 0]), 0x0190_0064_0000_0000);
}

#[test]
fn environment_encoding_clamps() {
    assert_eq!(humidity_to_env(0), 0);
    assert_eq!(humidity_to_env(150_000), humidity_to_env(100_000));
    assert_eq!(temperature_to_env(-25_000), 0);
    assert_eq!(temperature_to_env(-40_000), 0);
    assert_eq!(temperature_to_env(i32::MAX), 0xFFFE);
}

#[test]
fn measurement_text_line() {
    let sample = Measurement::from_bytes(&[0x01, 0x90, 0x00, 0x64, 0, 0, 0, 0]);
    let mut line = String::new();
    sample.write_line(&mut line).unwrap();
    assert_eq!(line, "CO2=400 PPM, TVOC=100 PPB\n");
}
