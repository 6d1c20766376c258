//! The machine-level facade: wires the CPU, bus, and PPU into the single
//! cycle-synchronized loop a host runs.

pub mod machine;

pub use machine::{GameBoy, CYCLES_PER_FRAME};
