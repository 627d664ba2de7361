#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use ccs811_rs::Bus;
use ccs811_rs::registers::addr;

/// Register model: single-byte sends select a register, longer sends store a payload.
#[derive(Clone, Default)]
pub struct FakeBus {
    pub state: Rc<RefCell<FakeState>>,
}

#[derive(Default)]
pub struct FakeState {
    pub regs: HashMap<u8, Vec<u8>>,
    pub selected: Option<u8>,
    pub sends: Vec<Vec<u8>>,
    pub recvs: usize,
    /// Deliver one byte fewer than requested on every receive.
    pub short_recv: bool,
    /// Accept one byte fewer than offered on every multi-byte send.
    pub short_send: bool,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sensor that passes the startup sequence.
    pub fn healthy() -> Self {
        let bus = Self::new();
        bus.set(addr::HW_ID, &[0x81]);
        bus.set(addr::HW_VERSION, &[0x12]);
        bus.set(addr::STATUS, &[0x90]);
        bus.set(addr::FW_BOOT_VERSION, &[0x10, 0x00]);
        bus.set(addr::FW_APP_VERSION, &[0x20, 0x00]);
        bus.set(addr::MEAS_MODE, &[0x00]);
        bus
    }

    pub fn set(&self, reg: u8, bytes: &[u8]) {
        self.state.borrow_mut().regs.insert(reg, bytes.to_vec());
    }

    pub fn get(&self, reg: u8) -> Option<Vec<u8>> {
        self.state.borrow().regs.get(&reg).cloned()
    }

    pub fn sends(&self) -> Vec<Vec<u8>> {
        self.state.borrow().sends.clone()
    }

    pub fn transaction_count(&self) -> usize {
        let state = self.state.borrow();
        state.sends.len() + state.recvs
    }

    pub fn set_short_recv(&self, short: bool) {
        self.state.borrow_mut().short_recv = short;
    }

    pub fn set_short_send(&self, short: bool) {
        self.state.borrow_mut().short_send = short;
    }
}

impl Bus for FakeBus {
    type Error = ();

    fn send(&mut self, bytes: &[u8]) -> Result<usize, ()> {
        let mut state = self.state.borrow_mut();
        state.sends.push(bytes.to_vec());
        let reg = bytes[0];
        if bytes.len() == 1 {
            state.selected = Some(reg);
            return Ok(1);
        }
        state.regs.insert(reg, bytes[1..].to_vec());
        if state.short_send {
            Ok(bytes.len() - 1)
        } else {
            Ok(bytes.len())
        }
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let mut state = self.state.borrow_mut();
        state.recvs += 1;
        let data = state
            .selected
            .and_then(|reg| state.regs.get(&reg).cloned())
            .unwrap_or_default();
        buf.fill(0);
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        if state.short_recv {
            Ok(buf.len().saturating_sub(1))
        } else {
            Ok(buf.len())
        }
    }
}

/// Delay that records requested durations instead of sleeping.
#[derive(Default)]
pub struct RecordingDelay {
    pub ns: Vec<u64>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn micros(&self) -> Vec<u64> {
        self.ns.iter().map(|ns| ns / 1_000).collect()
    }
}

impl embedded_hal::delay::DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.ns.push(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.ns.push(u64::from(us) * 1_000);
    }
}
