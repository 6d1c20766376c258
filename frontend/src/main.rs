use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dmg_core::cartridge::Cartridge;
use dmg_core::core::GameBoy;
use dmg_core::error::EmulatorError;

mod config;
mod emulator;
mod input;
mod overlay;
mod rom_path;
mod video;

/// Default ROM path used when none is given on the command line, per
/// spec.md §6 ("default supplied if omitted").
const DEFAULT_ROM_PATH: &str = "rom.gb";

#[derive(Parser, Debug)]
#[command(name = "dmg", about = "A DMG (original Game Boy) emulator")]
struct Args {
    /// Path to the cartridge ROM image (plain .gb, or a ZIP archive
    /// containing one).
    rom: Option<PathBuf>,

    /// Integer window scale factor.
    #[arg(long, default_value_t = 3)]
    scale: u32,

    /// Log level forwarded to env_logger's filter.
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Optional TOML config file (key bindings, default scale). Resolved
    /// via the platform config directory when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overlay the measured frames-per-second in the top-left corner.
    #[arg(long)]
    show_fps: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let config = config::Config::load(args.config.as_deref());

    let rom_path = args.rom.unwrap_or_else(|| PathBuf::from(DEFAULT_ROM_PATH));
    let rom_bytes = match rom_path::load_rom_bytes(&rom_path) {
        Ok(bytes) => bytes,
        Err(source) => {
            let err = EmulatorError::Io {
                path: rom_path.display().to_string(),
                source,
            };
            log::error!("{err}");
            return exit_code_for(&err);
        }
    };

    let cartridge = match Cartridge::new(rom_bytes) {
        Ok(cart) => cart,
        Err(e) => {
            log::error!("{e}");
            return exit_code_for(&e);
        }
    };
    log::info!(
        "loaded {:?} ({:?})",
        cartridge.header().title,
        cartridge.header().mbc_kind
    );

    let mut gb = GameBoy::new(cartridge);

    let mut key_map = input::KeyMap::default();
    config.keys.apply(&mut key_map);
    let scale = config.scale.unwrap_or(args.scale);

    match emulator::run(&mut gb, &key_map, scale, args.show_fps) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("emulation aborted: {err}");
            exit_code_for(&err)
        }
    }
}

/// Maps each fatal error kind to the exit code spec.md §6 asks for
/// ("nonzero on illegal opcode or unimplemented MBC"), extended with
/// distinct codes for the other two fatal kinds so a wrapping script can
/// tell them apart.
fn exit_code_for(err: &EmulatorError) -> ExitCode {
    match err {
        EmulatorError::IllegalOpcode { .. } | EmulatorError::InvalidRtcRegister(_) => {
            ExitCode::from(1)
        }
        EmulatorError::UnimplementedMbc(_) => ExitCode::from(2),
        EmulatorError::Io { .. } => ExitCode::from(3),
    }
}
