//! Register map and constants for CCS811.
//! Addresses, widths and bit positions follow the datasheet register overview.

/// Default I2C address when the ADDR pin is low.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x5A;
/// Alternate I2C address when the ADDR pin is high.
pub const ALT_I2C_ADDRESS: u8 = 0x5B;

/// Register addresses.
pub mod addr {
    pub const STATUS: u8 = 0x00;
    /// Measurement mode and interrupt control.
    pub const MEAS_MODE: u8 = 0x01;
    /// eCO2, TVOC, STATUS, ERROR_ID and RAW_DATA in one 8-byte burst.
    pub const ALG_RESULT_DATA: u8 = 0x02;
    pub const RAW_DATA: u8 = 0x03;
    /// Humidity and temperature compensation input.
    pub const ENV_DATA: u8 = 0x05;
    pub const THRESHOLDS: u8 = 0x10;
    pub const BASELINE: u8 = 0x11;
    pub const HW_ID: u8 = 0x20;
    pub const HW_VERSION: u8 = 0x21;
    pub const FW_BOOT_VERSION: u8 = 0x23;
    pub const FW_APP_VERSION: u8 = 0x24;
    pub const INTERNAL_STATE: u8 = 0xA0;
    pub const ERROR_ID: u8 = 0xE0;
    // Bootloader registers.
    pub const APP_ERASE: u8 = 0xF1;
    pub const APP_DATA: u8 = 0xF2;
    pub const APP_VERIFY: u8 = 0xF3;
    pub const APP_START: u8 = 0xF4;
    pub const SW_RESET: u8 = 0xFF;
}

/// Largest register payload in bytes (APP_DATA).
pub const MAX_REG_LEN: usize = 9;

/// Fixed HW_ID value of every CCS811.
pub const HW_ID_VALUE: u8 = 0x81;

/// Magic sequence written to SW_RESET to trigger a software reset.
pub const RESET_SEQUENCE: [u8; 4] = [0x11, 0xE5, 0x72, 0x8A];

/// Settling time after a software reset (µs).
pub const WAIT_AFTER_RESET_US: u32 = 2_000;
/// Settling time after APP_START (µs).
pub const WAIT_AFTER_APP_START_US: u32 = 1_000;

/// Static description of one register.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RegisterDescriptor {
    pub address: u8,
    pub width: u8,
    pub readable: bool,
    pub writable: bool,
}

const fn reg(address: u8, width: u8, readable: bool, writable: bool) -> RegisterDescriptor {
    RegisterDescriptor {
        address,
        width,
        readable,
        writable,
    }
}

/// Register catalogue.
pub const REGISTERS: [RegisterDescriptor; 18] = [
    reg(addr::STATUS, 1, true, false),
    reg(addr::MEAS_MODE, 1, true, true),
    reg(addr::ALG_RESULT_DATA, 8, true, false),
    reg(addr::RAW_DATA, 2, true, false),
    reg(addr::ENV_DATA, 4, false, true),
    reg(addr::THRESHOLDS, 4, false, true),
    reg(addr::BASELINE, 2, true, true),
    reg(addr::HW_ID, 1, true, false),
    reg(addr::HW_VERSION, 1, true, false),
    reg(addr::FW_BOOT_VERSION, 2, true, false),
    reg(addr::FW_APP_VERSION, 2, true, false),
    // Sized but not accessible through this driver.
    reg(addr::INTERNAL_STATE, 1, false, false),
    reg(addr::ERROR_ID, 1, true, false),
    reg(addr::APP_ERASE, 4, false, true),
    reg(addr::APP_DATA, 9, false, true),
    reg(addr::APP_VERIFY, 0, false, true),
    reg(addr::APP_START, 0, false, true),
    reg(addr::SW_RESET, 4, false, true),
];

/// Look up the descriptor for an address.
pub fn descriptor(address: u8) -> Option<&'static RegisterDescriptor> {
    REGISTERS.iter().find(|d| d.address == address)
}

/// Payload width of a register in bytes; 0 for unknown addresses.
pub fn register_width(address: u8) -> u8 {
    descriptor(address).map_or(0, |d| d.width)
}

pub fn is_readable(address: u8) -> bool {
    descriptor(address).is_some_and(|d| d.readable)
}

pub fn is_writable(address: u8) -> bool {
    descriptor(address).is_some_and(|d| d.writable)
}

bitflags::bitflags! {
    /// STATUS register bits (0x00).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct StatusBits: u8 {
        /// Bit 7: 0 = boot mode, 1 = application mode.
        const FW_MODE    = 1 << 7;
        // Bits 6-5 reserved.
        /// Bit 4: valid application firmware loaded.
        const APP_VALID  = 1 << 4;
        /// Bit 3: a new data sample is ready in ALG_RESULT_DATA.
        const DATA_READY = 1 << 3;
        // Bits 2-1 reserved.
        /// Bit 0: an error occurred, see ERROR_ID.
        const ERROR      = 1 << 0;
    }

    /// MEAS_MODE register bits (0x01).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct MeasModeBits: u8 {
        // Bit 7 reserved.
        const DRIVE_MODE0 = 1 << 4;
        const DRIVE_MODE1 = 1 << 5;
        const DRIVE_MODE2 = 1 << 6;
        /// Bit 3: nINT asserts when a new sample is ready.
        const INT_DATARDY = 1 << 3;
        /// Bit 2: nINT only asserts on threshold crossings.
        const INT_THRESH  = 1 << 2;
        // Bits 1-0 reserved.
    }

    /// ERROR_ID register bits (0xE0).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct ErrorIdBits: u8 {
        const WRITE_REG_INVALID = 1 << 0;
        const READ_REG_INVALID  = 1 << 1;
        const MEASMODE_INVALID  = 1 << 2;
        const MAX_RESISTANCE    = 1 << 3;
        const HEATER_FAULT      = 1 << 4;
        const HEATER_SUPPLY     = 1 << 5;
    }
}

/// Drive mode index bits, least significant first.
const DRIVE_MODE_BITS: [MeasModeBits; 3] = [
    MeasModeBits::DRIVE_MODE0,
    MeasModeBits::DRIVE_MODE1,
    MeasModeBits::DRIVE_MODE2,
];

/// Pack a drive mode index into MEAS_MODE, all other bits zero.
pub fn encode_drive_mode(mode: u8) -> u8 {
    let mut bits = MeasModeBits::empty();
    for (i, flag) in DRIVE_MODE_BITS.iter().enumerate() {
        bits.set(*flag, mode & (1u8 << i) != 0);
    }
    bits.bits()
}

/// Extract the drive mode index (bits 6-4) from MEAS_MODE.
pub fn decode_drive_mode(meas_mode: u8) -> u8 {
    let bits = MeasModeBits::from_bits_truncate(meas_mode);
    DRIVE_MODE_BITS
        .iter()
        .enumerate()
        .filter(|(_, flag)| bits.contains(**flag))
        .fold(0u8, |acc, (i, _)| acc | (1u8 << i))
}

/// Interpret register bytes as a big-endian unsigned integer (up to 8 bytes).
pub fn be_value(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

/// Encode relative humidity (milli-%RH) into ENV_DATA format (1/512 %RH steps).
pub fn humidity_to_env(milli_percent: u32) -> u16 {
    let code = milli_percent.min(100_000) * 512 / 1_000;
    code.min(u32::from(u16::MAX)) as u16
}

/// Encode temperature (milli-°C) into ENV_DATA format (1/512 °C steps, offset by 25 °C).
pub fn temperature_to_env(milli_celsius: i32) -> u16 {
    // 0xFFFF / 512 °C is the top of the representable range.
    let offset = milli_celsius.saturating_add(25_000).clamp(0, 127_998) as u32;
    (offset * 512 / 1_000) as u16
}
