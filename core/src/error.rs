//! Fatal error taxonomy for the emulator core.
//!
//! Every variant here is fatal: the machine that raises one is no longer
//! safe to step. Callers surface the error (with the CPU's PC, the
//! offending byte, and a register dump where relevant) and stop.

use thiserror::Error;

use crate::sm83::CpuSnapshot;

/// An error that aborts emulation.
#[derive(Debug, Error)]
pub enum EmulatorError {
    /// The CPU fetched a byte with no defined instruction encoding.
    #[error("illegal opcode {opcode:#04X} at PC={pc:#06X} ({registers})")]
    IllegalOpcode {
        opcode: u8,
        pc: u16,
        registers: CpuSnapshot,
    },

    /// The cartridge header names an MBC family this crate does not model.
    #[error("unimplemented MBC kind {0:?}")]
    UnimplementedMbc(MbcKind),

    /// Loading the cartridge image from disk failed.
    #[error("failed to load ROM from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An MBC3 RTC register selector outside 0x08..=0x0C reached the RTC path.
    #[error("invalid RTC register selector {0:#04X}")]
    InvalidRtcRegister(u8),
}

/// Cartridge header byte 0x0147, grouped by the MBC family it selects:
/// {0,8,9} -> None, {1,2,3} -> MBC1, {5,6} -> MBC2 (out of scope),
/// {0x0F..=0x13} -> MBC3, {0x19..=0x1E} -> MBC5 (out of scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MbcKind {
    None,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc5,
}

impl MbcKind {
    pub fn from_header_byte(byte: u8) -> Self {
        match byte {
            0x00 | 0x08 | 0x09 => MbcKind::None,
            0x01..=0x03 => MbcKind::Mbc1,
            0x05 | 0x06 => MbcKind::Mbc2,
            0x0F..=0x13 => MbcKind::Mbc3,
            0x19..=0x1E => MbcKind::Mbc5,
            _ => MbcKind::None,
        }
    }

    /// Whether this crate actually implements the family (vs. just
    /// recognizing it well enough to report `UnimplementedMbc`).
    pub fn is_supported(self) -> bool {
        matches!(self, MbcKind::None | MbcKind::Mbc1 | MbcKind::Mbc3)
    }
}

pub type Result<T> = std::result::Result<T, EmulatorError>;
