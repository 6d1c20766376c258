//! `GameBoy`: the single public entry point this crate exposes. Owns the
//! CPU, the memory bus (and through it, the cartridge/MBC and joypad), and
//! the PPU, and drives them through a fixed step order: interrupt dispatch,
//! instruction effects, clock accounting, DIV/TIMA, then PPU advance.

use log::trace;

use crate::bus::{Bus, MemoryBus};
use crate::cartridge::Cartridge;
use crate::error::Result;
use crate::joypad::Joypad;
use crate::ppu::Ppu;
use crate::sm83::Cpu;

/// Total cycles in one 60 Hz DMG frame: 154 scanlines * 456 cycles/line.
pub const CYCLES_PER_FRAME: u64 = 70_224;

pub struct GameBoy {
    cpu: Cpu,
    bus: MemoryBus,
    ppu: Ppu,
}

impl GameBoy {
    pub fn new(cartridge: Cartridge) -> Self {
        GameBoy {
            cpu: Cpu::new(),
            bus: MemoryBus::new(cartridge),
            ppu: Ppu::new(),
        }
    }

    /// Runs one CPU step (instruction or halted idle), then advances the
    /// PPU and the MBC3 RTC by the same `dt`. Returns the cycles consumed.
    pub fn step_instruction(&mut self) -> Result<u8> {
        let dt = self.cpu.step(&mut self.bus)?;
        self.ppu.update(dt, &mut self.bus);
        self.bus.tick_rtc(dt);
        Ok(dt)
    }

    /// Steps instructions until the CPU clock has advanced by one frame's
    /// worth of cycles (`CYCLES_PER_FRAME`).
    pub fn step_frame(&mut self) -> Result<()> {
        let start = self.cpu.clock;
        while self.cpu.clock.wrapping_sub(start) < CYCLES_PER_FRAME {
            self.step_instruction()?;
        }
        trace!(
            "frame complete: clock={} (+{})",
            self.cpu.clock,
            self.cpu.clock.wrapping_sub(start)
        );
        Ok(())
    }

    /// The 160x144 framebuffer of 2-bit DMG palette indices.
    pub fn framebuffer(&self) -> &[u8; crate::ppu::SCREEN_WIDTH * crate::ppu::SCREEN_HEIGHT] {
        self.ppu.framebuffer()
    }

    pub fn joypad(&self) -> &Joypad {
        &self.bus.joypad
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }
}
