//! CB-prefixed bit-manipulation sub-table, plus the rotate primitives the
//! unprefixed RLCA/RLA/RRCA/RRA opcodes also use.
//!
//! Dispatch reads the quadrant from `opcode >> 6`, the sub-operation (for
//! quadrant 0) from `(opcode >> 3) & 7`, the bit index (for BIT/RES/SET)
//! from the same field, and the operand register from `opcode & 7`. One
//! dedicated handler per logical operation — never a shared `flags.C`
//! intermediate the way a half-finished table would.

use crate::bus::Bus;
use crate::sm83::{Cpu, FLAG_C, FLAG_H, FLAG_N, FLAG_Z};

use super::{get_r8, set_r8};

pub fn rlc(regs: &mut crate::sm83::Registers, value: u8) -> u8 {
    let carry = value & 0x80 != 0;
    let result = value.rotate_left(1);
    set_shift_flags(regs, result, carry);
    result
}

pub fn rrc(regs: &mut crate::sm83::Registers, value: u8) -> u8 {
    let carry = value & 0x01 != 0;
    let result = value.rotate_right(1);
    set_shift_flags(regs, result, carry);
    result
}

pub fn rl(regs: &mut crate::sm83::Registers, value: u8) -> u8 {
    let carry_in = if regs.flag(FLAG_C) { 1 } else { 0 };
    let carry_out = value & 0x80 != 0;
    let result = (value << 1) | carry_in;
    set_shift_flags(regs, result, carry_out);
    result
}

pub fn rr(regs: &mut crate::sm83::Registers, value: u8) -> u8 {
    let carry_in = if regs.flag(FLAG_C) { 0x80 } else { 0 };
    let carry_out = value & 0x01 != 0;
    let result = (value >> 1) | carry_in;
    set_shift_flags(regs, result, carry_out);
    result
}

fn set_shift_flags(regs: &mut crate::sm83::Registers, result: u8, carry_out: bool) {
    regs.set_flag(FLAG_Z, result == 0);
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, false);
    regs.set_flag(FLAG_C, carry_out);
}

/// The non-CB accumulator rotates: same shifts, but Z is always cleared.
pub fn rotate_accumulator(regs: &mut crate::sm83::Registers, result: u8, carry_out: bool) {
    regs.set_flag(FLAG_Z, false);
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, false);
    regs.set_flag(FLAG_C, carry_out);
    regs.a = result;
}

fn sla(regs: &mut crate::sm83::Registers, value: u8) -> u8 {
    let carry = value & 0x80 != 0;
    let result = value << 1;
    set_shift_flags(regs, result, carry);
    result
}

fn sra(regs: &mut crate::sm83::Registers, value: u8) -> u8 {
    let carry = value & 0x01 != 0;
    let result = (value >> 1) | (value & 0x80);
    set_shift_flags(regs, result, carry);
    result
}

fn swap(regs: &mut crate::sm83::Registers, value: u8) -> u8 {
    let result = value.rotate_left(4);
    regs.set_flag(FLAG_Z, result == 0);
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, false);
    regs.set_flag(FLAG_C, false);
    result
}

fn srl(regs: &mut crate::sm83::Registers, value: u8) -> u8 {
    let carry = value & 0x01 != 0;
    let result = value >> 1;
    set_shift_flags(regs, result, carry);
    result
}

fn bit(regs: &mut crate::sm83::Registers, value: u8, index: u8) {
    regs.set_flag(FLAG_Z, value & (1 << index) == 0);
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, true);
}

/// Dispatches one CB-prefixed opcode and returns its cycle cost: 8 for a
/// plain register operand, 16 for a `(HL)` read-modify-write, except
/// `BIT b,(HL)` which only reads `(HL)` and so costs 12.
pub fn dispatch<B: Bus>(cpu: &mut Cpu, bus: &mut B, opcode: u8) -> u8 {
    let operand = opcode & 0x07;
    let index = (opcode >> 3) & 0x07;
    let quadrant = opcode >> 6;
    let is_hl = operand == 6;

    match quadrant {
        0 => {
            let value = get_r8(cpu, bus, operand);
            let result = match index {
                0 => rlc(&mut cpu.regs, value),
                1 => rrc(&mut cpu.regs, value),
                2 => rl(&mut cpu.regs, value),
                3 => rr(&mut cpu.regs, value),
                4 => sla(&mut cpu.regs, value),
                5 => sra(&mut cpu.regs, value),
                6 => swap(&mut cpu.regs, value),
                7 => srl(&mut cpu.regs, value),
                _ => unreachable!(),
            };
            set_r8(cpu, bus, operand, result);
            if is_hl { 16 } else { 8 }
        }
        1 => {
            let value = get_r8(cpu, bus, operand);
            bit(&mut cpu.regs, value, index);
            if is_hl { 12 } else { 8 }
        }
        2 => {
            let value = get_r8(cpu, bus, operand) & !(1 << index);
            set_r8(cpu, bus, operand, value);
            if is_hl { 16 } else { 8 }
        }
        3 => {
            let value = get_r8(cpu, bus, operand) | (1 << index);
            set_r8(cpu, bus, operand, value);
            if is_hl { 16 } else { 8 }
        }
        _ => unreachable!(),
    }
}
