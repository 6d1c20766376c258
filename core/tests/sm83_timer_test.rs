//! DIV/TIMA timer periods (including a TAC write taking effect on the next
//! step rather than after the previously selected period elapses), TIMA
//! overflow reload from TMA, and the timer interrupt request that overflow
//! raises.

mod common;

use common::TestBus;
use dmg_core::bus::Bus;
use dmg_core::sm83::Cpu;

const TIMA_ADDR: u16 = 0xFF05;
const TMA_ADDR: u16 = 0xFF06;
const TAC_ADDR: u16 = 0xFF07;
const IF_ADDR: u16 = 0xFF0F;
const DIV_ADDR: u16 = 0xFF04;

#[test]
fn div_increments_once_per_256_cycles() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.regs.pc = 0x0100;
    bus.load(0x0100, &[0x00; 64]); // NOPs, 4 cycles each

    for _ in 0..63 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(bus.memory[DIV_ADDR as usize], 0, "252 cycles must not yet roll DIV over");
    cpu.step(&mut bus).unwrap();
    assert_eq!(bus.memory[DIV_ADDR as usize], 1, "the 64th NOP crosses the 256-cycle boundary");
}

#[test]
fn tima_disabled_by_tac_bit_two_never_increments() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.regs.pc = 0x0100;
    bus.write(TAC_ADDR, 0x00); // enable bit clear
    bus.load(0x0100, &[0x00; 300]);
    for _ in 0..300 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(bus.memory[TIMA_ADDR as usize], 0);
}

#[test]
fn tima_at_fastest_rate_increments_every_sixteen_cycles() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.regs.pc = 0x0100;
    // TAC is written before the timer has ever been stepped, same as a
    // cartridge enabling the timer early in its init routine. The new rate
    // must apply from the very first step, not after the 1024-cycle window
    // the power-on (disabled) TAC value would otherwise have primed.
    bus.write(TAC_ADDR, 0b101); // enabled, clock select 01 -> every 16 cycles
    bus.load(0x0100, &[0x00; 4]); // 4 NOPs = 16 cycles
    for _ in 0..3 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(
        bus.memory[TIMA_ADDR as usize], 0,
        "12 cycles must not yet cross the newly selected 16-cycle period"
    );
    cpu.step(&mut bus).unwrap();
    assert_eq!(bus.memory[TIMA_ADDR as usize], 1, "the 16-cycle period must apply from the TAC write, not after a stale window");
}

#[test]
fn tima_rate_change_takes_effect_immediately_not_after_stale_period() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.regs.pc = 0x0100;
    bus.load(0x0100, &[0x00; 64]);

    // Run a few slow (1024-cycle) ticks at the power-on rate, then switch to
    // the fastest rate mid-flight. The switch must reload the countdown to
    // the new period immediately, not let the stale 1024-cycle window run out.
    bus.write(TAC_ADDR, 0x04); // enabled, clock select 00 -> every 1024 cycles
    for _ in 0..10 {
        cpu.step(&mut bus).unwrap(); // 40 cycles in, nowhere near 1024
    }
    assert_eq!(bus.memory[TIMA_ADDR as usize], 0);

    bus.write(TAC_ADDR, 0b101); // switch to every 16 cycles
    for _ in 0..4 {
        cpu.step(&mut bus).unwrap(); // another 16 cycles
    }
    assert_eq!(
        bus.memory[TIMA_ADDR as usize], 1,
        "the rate change must apply starting from the TAC write, not the old 1024-cycle window"
    );
}

#[test]
fn tima_overflow_reloads_from_tma_and_requests_interrupt() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.regs.pc = 0x0100;
    bus.write(TAC_ADDR, 0b101); // every 16 cycles
    bus.write(TMA_ADDR, 0xAB);
    bus.memory[TIMA_ADDR as usize] = 0xFF;
    bus.load(0x0100, &[0x00; 4]); // 4 NOPs = 16 cycles, exactly one tick
    for _ in 0..4 {
        cpu.step(&mut bus).unwrap();
    }
    assert_eq!(bus.memory[TIMA_ADDR as usize], 0xAB, "overflow must reload TMA, not wrap to 0x00");
    assert_eq!(bus.read(IF_ADDR) & 0x04, 0x04, "overflow must request the timer interrupt");
}
