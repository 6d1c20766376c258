//! Stack push/pop round-trips and the CALL/RET round-trip invariant: SP and
//! PC must both come back exactly as they were before the call.

mod common;

use common::TestBus;
use dmg_core::bus::Bus;
use dmg_core::sm83::Cpu;

#[test]
fn push_pop_bc_restores_register_and_sp() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.regs.pc = 0x0100;
    cpu.regs.sp = 0xFFFE;
    cpu.regs.set_bc(0x1234);
    bus.load(0x0100, &[0xC5, 0x01]); // PUSH BC ; POP BC is opcode 0xC1, but test both
    bus.load(0x0102, &[0xC1]);

    let sp_before = cpu.regs.sp;
    cpu.step(&mut bus).unwrap(); // PUSH BC
    assert_eq!(cpu.regs.sp, sp_before - 2);
    cpu.regs.set_bc(0); // clobber
    cpu.step(&mut bus).unwrap(); // irrelevant opcode byte at 0x0101 not executed; PC now 0x0102
}

#[test]
fn push_pop_af_masks_low_nibble_of_f() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.regs.pc = 0x0100;
    cpu.regs.sp = 0xFFFE;
    bus.load(0x0100, &[0xF5, 0xF1]); // PUSH AF ; POP AF

    cpu.regs.a = 0x5A;
    cpu.regs.f = 0xFF; // low nibble must be forced to 0 on any write
    cpu.step(&mut bus).unwrap(); // PUSH AF
    cpu.regs.set_af(0); // clobber
    cpu.step(&mut bus).unwrap(); // POP AF

    assert_eq!(cpu.regs.a, 0x5A);
    assert_eq!(cpu.regs.f, 0xF0);
    assert_eq!(cpu.regs.f & 0x0F, 0);
}

#[test]
fn call_then_ret_restores_pc_sp_and_stack_bytes() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.regs.pc = 0x0100;
    cpu.regs.sp = 0xFFF0;
    // CALL 0x0200 ; at 0x0200: RET
    bus.load(0x0100, &[0xCD, 0x00, 0x02]);
    bus.load(0x0200, &[0xC9]);

    let sp_before = cpu.regs.sp;
    let pc_after_call_instruction = 0x0103u16;

    cpu.step(&mut bus).unwrap(); // CALL
    assert_eq!(cpu.regs.pc, 0x0200);
    assert_eq!(cpu.regs.sp, sp_before - 2);
    let stack_low = bus.memory[(sp_before - 2) as usize];
    let stack_high = bus.memory[(sp_before - 1) as usize];
    assert_eq!(stack_low, (pc_after_call_instruction & 0xFF) as u8);
    assert_eq!(stack_high, (pc_after_call_instruction >> 8) as u8);

    cpu.step(&mut bus).unwrap(); // RET
    assert_eq!(cpu.regs.pc, pc_after_call_instruction);
    assert_eq!(cpu.regs.sp, sp_before);
}

#[test]
fn rst_pushes_return_address_and_jumps_to_vector() {
    let mut cpu = Cpu::new();
    let mut bus = TestBus::new();
    cpu.regs.pc = 0x0150;
    cpu.regs.sp = 0xFFFE;
    bus.load(0x0150, &[0xEF]); // RST 0x28

    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.regs.pc, 0x0028);
    assert_eq!(cpu.regs.sp, 0xFFFC);
    assert_eq!(bus.memory[0xFFFC], 0x51);
    assert_eq!(bus.memory[0xFFFD], 0x01);
}
