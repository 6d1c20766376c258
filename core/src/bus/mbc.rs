//! Cartridge bank-switching state: a tagged union over `{None, MBC1, MBC3}`,
//! each variant carrying only the fields its family needs.

use crate::cartridge::Cartridge;
use crate::error::MbcKind;

const CYCLES_PER_RTC_SECOND: u32 = 4_194_304;
const DAY_OVERFLOW_SECONDS: u64 = 44_236_800;

/// A snapshot of the MBC3 real-time clock, taken by the 0-then-1 latch
/// write sequence to 0x6000-0x7FFF.
#[derive(Debug, Clone, Copy, Default)]
pub struct RtcRegisters {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub day_low: u8,
    pub day_high: u8,
}

pub enum MbcState {
    None {
        ram: Vec<u8>,
    },
    Mbc1 {
        mode: u8,
        rom_bank_low: u8,
        secondary: u8,
        ram: Vec<u8>,
    },
    Mbc3 {
        rom_bank: u8,
        ram_bank_or_rtc: u8,
        ram: Vec<u8>,
        rtc_seconds: u64,
        rtc_cycle_accum: u32,
        rtc_halted: bool,
        day_overflow: bool,
        latch_prev: u8,
        latched: RtcRegisters,
    },
}

impl MbcState {
    pub fn from_cartridge(cart: &Cartridge) -> Self {
        let ram = vec![0u8; cart.header().ram_size_bytes];
        match cart.header().mbc_kind {
            MbcKind::None => MbcState::None { ram },
            MbcKind::Mbc1 => MbcState::Mbc1 {
                mode: 0,
                rom_bank_low: 1,
                secondary: 0,
                ram,
            },
            MbcKind::Mbc3 => MbcState::Mbc3 {
                rom_bank: 1,
                ram_bank_or_rtc: 0,
                ram,
                rtc_seconds: 0,
                rtc_cycle_accum: 0,
                rtc_halted: false,
                day_overflow: false,
                latch_prev: 0,
                latched: RtcRegisters::default(),
            },
            other => {
                // The loader rejects unsupported families before a `Cartridge`
                // is ever handed to a bus; reaching here means that guard was
                // skipped. Fall back to an unbanked cartridge rather than panic.
                log::error!("cartridge claims unsupported MBC kind {other:?}; treating as unbanked");
                MbcState::None { ram }
            }
        }
    }

    pub fn rom_bank(&self) -> u8 {
        match self {
            MbcState::None { .. } => 1,
            MbcState::Mbc1 {
                mode,
                rom_bank_low,
                secondary,
                ..
            } => {
                let low = if *rom_bank_low == 0 { 1 } else { *rom_bank_low };
                let high = if *mode == 0 { *secondary } else { 0 };
                (high << 5) | low
            }
            MbcState::Mbc3 { rom_bank, .. } => {
                if *rom_bank == 0 {
                    1
                } else {
                    *rom_bank
                }
            }
        }
    }

    fn ram_bank(&self) -> usize {
        match self {
            MbcState::None { .. } => 0,
            MbcState::Mbc1 { mode, secondary, .. } => {
                if *mode == 1 {
                    *secondary as usize
                } else {
                    0
                }
            }
            MbcState::Mbc3 {
                ram_bank_or_rtc, ..
            } => (*ram_bank_or_rtc & 0x03) as usize,
        }
    }

    pub fn read_ram(&self, addr: u16) -> u8 {
        match self {
            MbcState::None { ram } | MbcState::Mbc1 { ram, .. } => {
                ram_byte(ram, self.ram_bank(), addr)
            }
            MbcState::Mbc3 {
                ram,
                ram_bank_or_rtc,
                latched,
                ..
            } => match *ram_bank_or_rtc {
                0x00..=0x03 => ram_byte(ram, self.ram_bank(), addr),
                0x08 => latched.seconds,
                0x09 => latched.minutes,
                0x0A => latched.hours,
                0x0B => latched.day_low,
                0x0C => latched.day_high,
                _ => 0xFF,
            },
        }
    }

    pub fn write_ram(&mut self, addr: u16, value: u8) {
        match self {
            MbcState::None { ram } | MbcState::Mbc1 { ram, .. } => {
                let bank = self.ram_bank();
                write_ram_byte(ram, bank, addr, value);
            }
            MbcState::Mbc3 {
                ram,
                ram_bank_or_rtc,
                rtc_seconds,
                rtc_halted,
                day_overflow,
                ..
            } => {
                let selector = *ram_bank_or_rtc;
                match selector {
                    0x00..=0x03 => {
                        let bank = (selector & 0x03) as usize;
                        write_ram_byte(ram, bank, addr, value);
                    }
                    0x08..=0x0C => {
                        write_live_rtc(rtc_seconds, rtc_halted, day_overflow, selector, value)
                    }
                    _ => {}
                }
            }
        }
    }

    pub fn write_control(&mut self, addr: u16, value: u8) {
        match self {
            MbcState::None { .. } => {}
            MbcState::Mbc1 {
                mode,
                rom_bank_low,
                secondary,
                ..
            } => match addr {
                0x0000..=0x1FFF => {}
                0x2000..=0x3FFF => *rom_bank_low = value & 0x1F,
                0x4000..=0x5FFF => *secondary = value & 0x03,
                0x6000..=0x7FFF => *mode = value & 0x01,
                _ => {}
            },
            MbcState::Mbc3 {
                rom_bank,
                ram_bank_or_rtc,
                rtc_seconds,
                rtc_halted,
                day_overflow,
                latch_prev,
                latched,
                ..
            } => match addr {
                0x0000..=0x1FFF => {}
                0x2000..=0x3FFF => *rom_bank = value & 0x7F,
                0x4000..=0x5FFF => *ram_bank_or_rtc = value,
                0x6000..=0x7FFF => {
                    if *latch_prev == 0 && value & 1 == 1 {
                        *latched = latch_from_seconds(*rtc_seconds, *rtc_halted, *day_overflow);
                    }
                    *latch_prev = value & 1;
                }
                _ => {}
            },
        }
    }

    /// Advance the MBC3 RTC's running counter by `dt` cycles. A no-op for
    /// every other variant.
    pub fn tick_rtc(&mut self, dt: u8) {
        if let MbcState::Mbc3 {
            rtc_seconds,
            rtc_cycle_accum,
            rtc_halted,
            day_overflow,
            ..
        } = self
        {
            if *rtc_halted {
                return;
            }
            *rtc_cycle_accum += dt as u32;
            while *rtc_cycle_accum >= CYCLES_PER_RTC_SECOND {
                *rtc_cycle_accum -= CYCLES_PER_RTC_SECOND;
                *rtc_seconds += 1;
                if *rtc_seconds > DAY_OVERFLOW_SECONDS {
                    *day_overflow = true;
                }
            }
        }
    }
}

fn ram_byte(ram: &[u8], bank: usize, addr: u16) -> u8 {
    let index = bank * 0x2000 + (addr - 0xA000) as usize;
    ram.get(index).copied().unwrap_or(0xFF)
}

fn write_ram_byte(ram: &mut [u8], bank: usize, addr: u16, value: u8) {
    let index = bank * 0x2000 + (addr - 0xA000) as usize;
    if let Some(slot) = ram.get_mut(index) {
        *slot = value;
    }
}

fn latch_from_seconds(total: u64, halted: bool, overflow: bool) -> RtcRegisters {
    let seconds = (total % 60) as u8;
    let minutes = ((total / 60) % 60) as u8;
    let hours = ((total / 3600) % 24) as u8;
    let days = total / 86_400;
    let day_low = (days & 0xFF) as u8;
    let day_high = ((days >> 8) & 1) as u8
        | if halted { 0x40 } else { 0 }
        | if overflow { 0x80 } else { 0 };
    RtcRegisters {
        seconds,
        minutes,
        hours,
        day_low,
        day_high,
    }
}

/// A direct write to one of the live RTC registers (as opposed to the
/// latched snapshot), as real MBC3 hardware allows for setting the clock.
fn write_live_rtc(
    rtc_seconds: &mut u64,
    rtc_halted: &mut bool,
    day_overflow: &mut bool,
    selector: u8,
    value: u8,
) {
    let total = *rtc_seconds;
    let seconds = total % 60;
    let minutes = (total / 60) % 60;
    let hours = (total / 3600) % 24;
    let days = total / 86_400;

    let new_total = match selector {
        0x08 => days * 86_400 + hours * 3600 + minutes * 60 + (value as u64 & 0x3F),
        0x09 => days * 86_400 + hours * 3600 + (value as u64 & 0x3F) * 60 + seconds,
        0x0A => days * 86_400 + (value as u64 & 0x1F) * 3600 + minutes * 60 + seconds,
        0x0B => {
            let new_days = (days & !0xFFu64) | value as u64;
            new_days * 86_400 + hours * 3600 + minutes * 60 + seconds
        }
        0x0C => {
            *rtc_halted = value & 0x40 != 0;
            if value & 0x80 == 0 {
                *day_overflow = false;
            }
            let day_high_bit = (value & 1) as u64;
            let new_days = (days & 0xFF) | (day_high_bit << 8);
            new_days * 86_400 + hours * 3600 + minutes * 60 + seconds
        }
        _ => total,
    };
    *rtc_seconds = new_total;
}
