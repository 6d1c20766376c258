use dmg_core::core::GameBoy;
use dmg_core::error::Result;
use dmg_core::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH};
use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use crate::input::KeyMap;
use crate::overlay;
use crate::video::{shade_framebuffer, Video};

/// Drives the SDL event loop: poll input, run one frame, present it.
/// Runs until the window closes, Escape is pressed, or the core raises a
/// fatal error (returned to the caller, which maps it to the documented
/// nonzero exit code).
pub fn run(gb: &mut GameBoy, key_map: &KeyMap, scale: u32, show_fps: bool) -> Result<()> {
    let sdl_context = sdl2::init().expect("Failed to initialize SDL2");
    let sdl_video = sdl_context.video().expect("Failed to init SDL video");

    let mut video = Video::new(
        &sdl_video,
        "DMG",
        SCREEN_WIDTH as u32,
        SCREEN_HEIGHT as u32,
        scale,
    );
    let mut event_pump = sdl_context.event_pump().expect("Failed to get event pump");

    let mut rgb = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * 3];

    let mut frame_count: u32 = 0;
    let mut fps_window_start = std::time::Instant::now();
    let mut fps_text = String::from("0.0");

    'main: loop {
        // Poll all pending SDL events, translate to joypad input.
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'main,

                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'main,

                Event::KeyDown {
                    scancode: Some(sc),
                    repeat: false,
                    ..
                } => {
                    if let Some(button) = key_map.get(sc) {
                        gb.joypad().set_button(button, true);
                    }
                }

                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(button) = key_map.get(sc) {
                        gb.joypad().set_button(button, false);
                    }
                }

                _ => {}
            }
        }

        // Run one 70,224-cycle frame of emulation.
        gb.step_frame()?;

        shade_framebuffer(gb.framebuffer(), &mut rgb);
        if show_fps {
            overlay::draw_fps(&mut rgb, SCREEN_WIDTH, &fps_text);
        }
        video.present(&rgb);

        frame_count += 1;
        let elapsed = fps_window_start.elapsed();
        if elapsed >= std::time::Duration::from_secs(1) {
            let fps = frame_count as f32 / elapsed.as_secs_f32();
            fps_text = format!("{fps:.1}");
            frame_count = 0;
            fps_window_start = std::time::Instant::now();
        }
    }

    Ok(())
}
