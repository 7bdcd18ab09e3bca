//! Simulated two-wire bus for host tests
//!
//! Models both lines as wired-AND open-drain signals: a line reads high
//! only if neither the master nor any slave pulls it low. Slave devices
//! decode START, STOP and data bits purely from line edges, the same way
//! real silicon does, so a misordered transition in the engine shows up
//! as a wrong byte, a missing ACK or a missing STOP.

use std::vec::Vec;

use softwire_hal::{Level, Line, LineDriver};

/// A slave device on the simulated bus
#[derive(Debug, Clone)]
pub struct SimDevice {
    pub address: u8,
    /// Written data bytes to acknowledge; `None` acknowledges everything
    pub ack_limit: Option<usize>,
    /// Bytes returned to master reads, 0xFF once exhausted
    pub read_data: Vec<u8>,
    /// Number of bytes loaded for transmission to the master
    pub read_pos: usize,
    /// Acknowledged bytes written by the master
    pub received: Vec<u8>,
}

impl SimDevice {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            ack_limit: None,
            read_data: Vec::new(),
            read_pos: 0,
            received: Vec::new(),
        }
    }

    pub fn with_ack_limit(mut self, limit: usize) -> Self {
        self.ack_limit = Some(limit);
        self
    }

    pub fn with_read_data(mut self, data: &[u8]) -> Self {
        self.read_data = data.to_vec();
        self
    }

    fn next_read_byte(&mut self) -> u8 {
        let byte = self.read_data.get(self.read_pos).copied().unwrap_or(0xFF);
        self.read_pos += 1;
        byte
    }
}

/// Slave-side protocol decoder
#[derive(Debug, Default)]
struct Decoder {
    active: bool,
    /// Clock pulses seen in the current byte; 8 = ACK slot next, 9 = in ACK slot
    bit_count: u8,
    shift: u8,
    address_phase: bool,
    reading: bool,
    selected: Option<usize>,
    tx_byte: u8,
    master_nacked: bool,
}

/// Simulated bus with any number of devices
#[derive(Debug)]
pub struct SimBus {
    master_scl: Level,
    master_sda: Level,
    slave_sda_low: bool,
    stretch: u32,
    stretch_remaining: u32,
    decoder: Decoder,

    pub devices: Vec<SimDevice>,
    /// Every address byte seen after a START
    pub address_bytes: Vec<u8>,
    /// Master ACK (true) / NACK (false) after each byte read from a slave
    pub master_acks: Vec<bool>,
    pub starts: usize,
    pub stops: usize,
    /// Rising edges of the effective clock
    pub clock_pulses: usize,
    /// Calls to `set_line`
    pub transitions: usize,
    /// Clock reads answered low because a slave was stretching
    pub stretch_polls: usize,
    pub claimed: bool,
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBus {
    /// Idle bus (both lines pulled up) with no devices
    pub fn new() -> Self {
        Self {
            master_scl: Level::High,
            master_sda: Level::High,
            slave_sda_low: false,
            stretch: 0,
            stretch_remaining: 0,
            decoder: Decoder::default(),
            devices: Vec::new(),
            address_bytes: Vec::new(),
            master_acks: Vec::new(),
            starts: 0,
            stops: 0,
            clock_pulses: 0,
            transitions: 0,
            stretch_polls: 0,
            claimed: false,
        }
    }

    /// Bus whose pins the master left driven low
    pub fn driven_low() -> Self {
        Self {
            master_scl: Level::Low,
            master_sda: Level::Low,
            ..Self::new()
        }
    }

    pub fn with_device(mut self, device: SimDevice) -> Self {
        self.devices.push(device);
        self
    }

    /// Hold the clock low for `polls` reads after every release
    pub fn with_stretch(mut self, polls: u32) -> Self {
        self.stretch = polls;
        self
    }

    /// Effective clock level
    pub fn clock(&self) -> Level {
        Level::from(self.scl())
    }

    /// Effective data level
    pub fn data(&self) -> Level {
        Level::from(self.sda())
    }

    fn scl(&self) -> bool {
        self.master_scl.is_high() && self.stretch_remaining == 0
    }

    fn sda(&self) -> bool {
        self.master_sda.is_high() && !self.slave_sda_low
    }

    /// Dispatch whatever edge happened since `before`
    fn settle(&mut self, (scl0, sda0): (bool, bool)) {
        let (scl1, sda1) = (self.scl(), self.sda());
        if scl0 && scl1 && sda0 != sda1 {
            if sda1 {
                self.on_stop();
            } else {
                self.on_start();
            }
        } else if !scl0 && scl1 {
            self.clock_pulses += 1;
            self.on_clock_rise(sda1);
        } else if scl0 && !scl1 {
            self.on_clock_fall();
        }
    }

    fn on_start(&mut self) {
        self.starts += 1;
        self.slave_sda_low = false;
        self.decoder = Decoder {
            active: true,
            address_phase: true,
            ..Decoder::default()
        };
    }

    fn on_stop(&mut self) {
        self.stops += 1;
        self.slave_sda_low = false;
        self.decoder.active = false;
    }

    fn on_clock_rise(&mut self, sda: bool) {
        let d = &mut self.decoder;
        if !d.active {
            return;
        }
        match d.bit_count {
            0..=7 => {
                if d.address_phase || !d.reading {
                    d.shift = (d.shift << 1) | sda as u8;
                }
                d.bit_count += 1;
            }
            8 => {
                if d.reading && !d.address_phase {
                    self.master_acks.push(!sda);
                    d.master_nacked = sda;
                }
                d.bit_count = 9;
            }
            _ => {}
        }
    }

    fn on_clock_fall(&mut self) {
        let d = &mut self.decoder;
        if !d.active {
            return;
        }
        match d.bit_count {
            8 => {
                let byte = d.shift;
                if d.address_phase {
                    self.address_bytes.push(byte);
                    d.reading = byte & 1 == 1;
                    d.selected = self.devices.iter().position(|dev| dev.address == byte >> 1);
                    self.slave_sda_low = d.selected.is_some();
                } else if d.reading {
                    // Let the master answer
                    self.slave_sda_low = false;
                } else if let Some(index) = d.selected {
                    let device = &mut self.devices[index];
                    let ack = device
                        .ack_limit
                        .map_or(true, |limit| device.received.len() < limit);
                    if ack {
                        device.received.push(byte);
                    }
                    self.slave_sda_low = ack;
                }
            }
            9 => {
                self.slave_sda_low = false;
                d.bit_count = 0;
                d.shift = 0;
                if d.address_phase {
                    d.address_phase = false;
                    if d.selected.is_none() {
                        d.active = false;
                        return;
                    }
                }
                if d.reading && !d.master_nacked {
                    if let Some(index) = d.selected {
                        d.tx_byte = self.devices[index].next_read_byte();
                        self.slave_sda_low = d.tx_byte & 0x80 == 0;
                    }
                }
            }
            1..=7 if d.reading && !d.address_phase && !d.master_nacked => {
                let bit = 7 - d.bit_count;
                self.slave_sda_low = (d.tx_byte >> bit) & 1 == 0;
            }
            _ => {}
        }
    }
}

impl LineDriver for SimBus {
    fn set_line(&mut self, line: Line, level: Level) {
        self.transitions += 1;
        let before = (self.scl(), self.sda());
        match line {
            Line::Clock => {
                if level.is_high() && !before.0 {
                    self.stretch_remaining = self.stretch;
                } else {
                    self.stretch_remaining = 0;
                }
                self.master_scl = level;
            }
            Line::Data => self.master_sda = level,
        }
        self.settle(before);
    }

    fn read_line(&mut self, line: Line) -> Level {
        match line {
            Line::Clock => {
                if self.stretch_remaining > 0 && self.master_scl.is_high() {
                    self.stretch_polls += 1;
                    let before = (self.scl(), self.sda());
                    self.stretch_remaining -= 1;
                    self.settle(before);
                    return Level::Low;
                }
                self.clock()
            }
            Line::Data => self.data(),
        }
    }

    fn claim(&mut self) {
        self.claimed = true;
    }

    fn release(&mut self) {
        self.claimed = false;
        self.set_line(Line::Clock, Level::High);
        self.set_line(Line::Data, Level::High);
    }
}
