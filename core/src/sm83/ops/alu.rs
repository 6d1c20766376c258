//! 8-bit and 16-bit arithmetic/logic, with the flag semantics from the
//! authoritative tables: every half-carry and carry test here is the
//! corrected form, not the `(a & 7) >= (b & 7)` half-carry bug the early
//! source revisions shipped for SUB/CP.

use crate::sm83::{Registers, FLAG_C, FLAG_H, FLAG_N, FLAG_Z};

fn add_impl(regs: &mut Registers, value: u8, carry_in: u8) {
    let a = regs.a;
    let sum = a as u16 + value as u16 + carry_in as u16;
    let half = (a & 0xF) + (value & 0xF) + carry_in > 0xF;
    regs.a = sum as u8;
    regs.set_flag(FLAG_Z, regs.a == 0);
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, half);
    regs.set_flag(FLAG_C, sum > 0xFF);
}

pub fn add(regs: &mut Registers, value: u8) {
    add_impl(regs, value, 0);
}

pub fn adc(regs: &mut Registers, value: u8) {
    let carry_in = if regs.flag(FLAG_C) { 1 } else { 0 };
    add_impl(regs, value, carry_in);
}

fn sub_impl(regs: &mut Registers, value: u8, carry_in: u8) -> u8 {
    let a = regs.a;
    let half = (a & 0xF) < (value & 0xF) + carry_in;
    let borrow = (a as u16) < (value as u16) + (carry_in as u16);
    let result = a.wrapping_sub(value).wrapping_sub(carry_in);
    regs.set_flag(FLAG_Z, result == 0);
    regs.set_flag(FLAG_N, true);
    regs.set_flag(FLAG_H, half);
    regs.set_flag(FLAG_C, borrow);
    result
}

pub fn sub(regs: &mut Registers, value: u8) {
    regs.a = sub_impl(regs, value, 0);
}

pub fn sbc(regs: &mut Registers, value: u8) {
    let carry_in = if regs.flag(FLAG_C) { 1 } else { 0 };
    regs.a = sub_impl(regs, value, carry_in);
}

pub fn cp(regs: &mut Registers, value: u8) {
    // Same flag computation as SUB, but A is left untouched.
    sub_impl(regs, value, 0);
}

pub fn and(regs: &mut Registers, value: u8) {
    regs.a &= value;
    regs.set_flag(FLAG_Z, regs.a == 0);
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, true);
    regs.set_flag(FLAG_C, false);
}

pub fn or(regs: &mut Registers, value: u8) {
    regs.a |= value;
    regs.set_flag(FLAG_Z, regs.a == 0);
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, false);
    regs.set_flag(FLAG_C, false);
}

pub fn xor(regs: &mut Registers, value: u8) {
    regs.a ^= value;
    regs.set_flag(FLAG_Z, regs.a == 0);
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, false);
    regs.set_flag(FLAG_C, false);
}

pub fn inc8(regs: &mut Registers, value: u8) -> u8 {
    let result = value.wrapping_add(1);
    regs.set_flag(FLAG_Z, result == 0);
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, value & 0xF == 0xF);
    result
}

pub fn dec8(regs: &mut Registers, value: u8) -> u8 {
    let result = value.wrapping_sub(1);
    regs.set_flag(FLAG_Z, result == 0);
    regs.set_flag(FLAG_N, true);
    regs.set_flag(FLAG_H, value & 0xF == 0);
    result
}

pub fn add_hl(regs: &mut Registers, value: u16) {
    let hl = regs.hl();
    let half = (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF;
    let carry = hl as u32 + value as u32 > 0xFFFF;
    regs.set_hl(hl.wrapping_add(value));
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, half);
    regs.set_flag(FLAG_C, carry);
}

/// Shared by `ADD SP,s8` and `LD HL,SP+s8` — both compute the result as
/// unsigned low-byte arithmetic on SP, then sign-extend the offset.
pub fn add_sp_signed(regs: &mut Registers, offset: i8) -> u16 {
    let sp = regs.sp;
    let e = offset as i16 as u16;
    let half = (sp & 0x0F) + (e & 0x0F) > 0x0F;
    let carry = (sp & 0xFF) + (e & 0xFF) > 0xFF;
    regs.set_flag(FLAG_Z, false);
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, half);
    regs.set_flag(FLAG_C, carry);
    sp.wrapping_add(e)
}

pub fn daa(regs: &mut Registers) {
    let mut a = regs.a;
    let n = regs.flag(FLAG_N);
    let mut carry = regs.flag(FLAG_C);
    let half = regs.flag(FLAG_H);

    if !n {
        if carry || a > 0x99 {
            a = a.wrapping_add(0x60);
            carry = true;
        }
        if half || (a & 0x0F) > 0x09 {
            a = a.wrapping_add(0x06);
        }
    } else {
        if carry {
            a = a.wrapping_sub(0x60);
        }
        if half {
            a = a.wrapping_sub(0x06);
        }
    }

    regs.a = a;
    regs.set_flag(FLAG_Z, a == 0);
    regs.set_flag(FLAG_H, false);
    regs.set_flag(FLAG_C, carry);
}

pub fn cpl(regs: &mut Registers) {
    regs.a = !regs.a;
    regs.set_flag(FLAG_N, true);
    regs.set_flag(FLAG_H, true);
}

pub fn scf(regs: &mut Registers) {
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, false);
    regs.set_flag(FLAG_C, true);
}

pub fn ccf(regs: &mut Registers) {
    let carry = regs.flag(FLAG_C);
    regs.set_flag(FLAG_N, false);
    regs.set_flag(FLAG_H, false);
    regs.set_flag(FLAG_C, !carry);
}
