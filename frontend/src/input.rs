//! Maps SDL scancodes to the eight DMG joypad buttons.

use std::collections::HashMap;

use dmg_core::joypad::Button;
use sdl2::keyboard::Scancode;
use serde::{Deserialize, Serialize};

/// A scancode-to-button table. Looked up once per key event, not per frame.
pub struct KeyMap {
    map: HashMap<Scancode, Button>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn bind(&mut self, scancode: Scancode, button: Button) {
        self.map.insert(scancode, button);
    }

    pub fn get(&self, scancode: Scancode) -> Option<Button> {
        self.map.get(&scancode).copied()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut km = Self::new();
        for (scancode, button) in default_bindings() {
            km.bind(scancode, button);
        }
        km
    }
}

/// The suggested mapping from spec.md §6: arrows -> d-pad, Z -> A, X -> B,
/// Enter -> Start, Backspace -> Select.
fn default_bindings() -> [(Scancode, Button); 8] {
    [
        (Scancode::Right, Button::Right),
        (Scancode::Left, Button::Left),
        (Scancode::Up, Button::Up),
        (Scancode::Down, Button::Down),
        (Scancode::Z, Button::A),
        (Scancode::X, Button::B),
        (Scancode::Return, Button::Start),
        (Scancode::Backspace, Button::Select),
    ]
}

/// On-disk key binding override, loaded from the optional TOML config file.
/// Scancode names are matched against SDL2's `Scancode` variant names
/// (e.g. "Left", "Z", "Return").
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeyBindingConfig {
    #[serde(default)]
    pub up: Option<String>,
    #[serde(default)]
    pub down: Option<String>,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
    #[serde(default)]
    pub a: Option<String>,
    #[serde(default)]
    pub b: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub select: Option<String>,
}

impl KeyBindingConfig {
    /// Applies any overrides this config specifies on top of the default
    /// key map. Unrecognized scancode names are logged and skipped rather
    /// than treated as a fatal configuration error.
    pub fn apply(&self, key_map: &mut KeyMap) {
        let overrides = [
            (&self.up, Button::Up),
            (&self.down, Button::Down),
            (&self.left, Button::Left),
            (&self.right, Button::Right),
            (&self.a, Button::A),
            (&self.b, Button::B),
            (&self.start, Button::Start),
            (&self.select, Button::Select),
        ];
        for (name, button) in overrides {
            let Some(name) = name else { continue };
            match Scancode::from_name(name) {
                Some(scancode) => key_map.bind(scancode, button),
                None => log::warn!("config: unrecognized scancode {name:?}, ignoring"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_cover_all_eight_buttons() {
        let km = KeyMap::default();
        assert_eq!(km.get(Scancode::Left), Some(Button::Left));
        assert_eq!(km.get(Scancode::Z), Some(Button::A));
        assert_eq!(km.get(Scancode::Return), Some(Button::Start));
        assert_eq!(km.get(Scancode::Backspace), Some(Button::Select));
    }

    #[test]
    fn config_override_rebinds_a_button() {
        let mut km = KeyMap::default();
        let cfg = KeyBindingConfig {
            a: Some("Space".to_string()),
            ..Default::default()
        };
        cfg.apply(&mut km);
        assert_eq!(km.get(Scancode::Space), Some(Button::A));
        // Old binding for A is untouched (Z still maps too, if it was set);
        // config only adds/overrides the scancode it names.
        assert_eq!(km.get(Scancode::Z), Some(Button::A));
    }

    #[test]
    fn unrecognized_scancode_name_is_ignored() {
        let mut km = KeyMap::default();
        let cfg = KeyBindingConfig {
            a: Some("NotARealKey".to_string()),
            ..Default::default()
        };
        cfg.apply(&mut km);
        assert_eq!(km.get(Scancode::Z), Some(Button::A));
    }
}
