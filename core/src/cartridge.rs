//! Cartridge ROM image and header parsing.
//!
//! Loading the bytes off disk is a collaborator concern (the frontend
//! binary); this module only knows how to interpret a byte buffer that is
//! already in memory.

use crate::error::{EmulatorError, MbcKind};

pub const ENTRY_POINT: u16 = 0x0100;
const TITLE_RANGE: std::ops::Range<usize> = 0x0134..0x0144;
const MBC_KIND_ADDR: usize = 0x0147;
const ROM_SIZE_ADDR: usize = 0x0148;
const RAM_SIZE_ADDR: usize = 0x0149;

/// Read-only metadata pulled from the cartridge header at load time.
#[derive(Debug, Clone)]
pub struct CartridgeHeader {
    pub title: String,
    pub mbc_kind: MbcKind,
    pub rom_size_bytes: usize,
    pub ram_size_bytes: usize,
}

impl CartridgeHeader {
    fn parse(rom: &[u8]) -> Self {
        let title = rom
            .get(TITLE_RANGE)
            .map(|bytes| {
                bytes
                    .iter()
                    .take_while(|&&b| b != 0)
                    .map(|&b| b as char)
                    .collect()
            })
            .unwrap_or_default();
        let mbc_kind = MbcKind::from_header_byte(rom.get(MBC_KIND_ADDR).copied().unwrap_or(0));
        let rom_size_bytes = match rom.get(ROM_SIZE_ADDR).copied().unwrap_or(0) {
            code @ 0x00..=0x08 => 32 * 1024 << code,
            _ => rom.len(),
        };
        let ram_size_bytes = match rom.get(RAM_SIZE_ADDR).copied().unwrap_or(0) {
            0x00 => 0,
            0x01 => 2 * 1024,
            0x02 => 8 * 1024,
            0x03 => 32 * 1024,
            0x04 => 128 * 1024,
            0x05 => 64 * 1024,
            _ => 0,
        };
        CartridgeHeader {
            title,
            mbc_kind,
            rom_size_bytes,
            ram_size_bytes,
        }
    }
}

/// The raw ROM image plus its parsed header.
pub struct Cartridge {
    rom: Vec<u8>,
    header: CartridgeHeader,
}

impl Cartridge {
    /// Builds a cartridge from an in-memory ROM image, rejecting MBC
    /// families this crate does not model.
    pub fn new(rom: Vec<u8>) -> Result<Self, EmulatorError> {
        let header = CartridgeHeader::parse(&rom);
        if !header.mbc_kind.is_supported() {
            return Err(EmulatorError::UnimplementedMbc(header.mbc_kind));
        }
        if rom.len() < header.rom_size_bytes {
            log::warn!(
                "ROM image is {} bytes, header declares {}",
                rom.len(),
                header.rom_size_bytes
            );
        }
        Ok(Cartridge { rom, header })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn rom_byte(&self, offset: usize) -> u8 {
        self.rom.get(offset).copied().unwrap_or(0xFF)
    }
}
