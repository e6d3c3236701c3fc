//! Avatar generation
//!
//! Assigns each connection a visual identity: a color from a fixed
//! 8-color palette and the uppercase first letter of the username.
//! A fresh avatar is generated on every join or room switch, so the
//! same username can carry different colors over time.

use rand::Rng;
use serde::Serialize;

/// Fixed avatar color palette
pub const AVATAR_COLORS: [&str; 8] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
];

/// Visual identity assigned to a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Avatar {
    /// Hex color from [`AVATAR_COLORS`]
    pub color: String,
    /// Uppercase first character of the username (empty for an empty username)
    pub initial: String,
}

impl Avatar {
    /// Generate an avatar for a username using the given color picker
    ///
    /// An empty username yields an empty initial rather than an error.
    pub fn generate(username: &str, picker: &mut dyn ColorPicker) -> Self {
        let color = picker.pick(&AVATAR_COLORS).to_string();
        let initial = username
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default();
        Self { color, initial }
    }
}

/// Color selection capability
///
/// Injectable so tests can pin the choice while production code
/// picks uniformly at random. Lives inside the server actor, whose
/// future moves across threads, hence the Send + Sync bound.
pub trait ColorPicker: Send + Sync {
    /// Pick one color from the palette
    fn pick(&mut self, palette: &[&'static str]) -> &'static str;
}

/// Uniform random color selection (production picker)
#[derive(Debug, Default)]
pub struct RandomPicker;

impl ColorPicker for RandomPicker {
    fn pick(&mut self, palette: &[&'static str]) -> &'static str {
        palette[rand::thread_rng().gen_range(0..palette.len())]
    }
}

/// Always picks the color at a fixed palette index
#[derive(Debug)]
pub struct FixedPicker(pub usize);

impl ColorPicker for FixedPicker {
    fn pick(&mut self, palette: &[&'static str]) -> &'static str {
        palette[self.0 % palette.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_initial_uppercase() {
        let avatar = Avatar::generate("alice", &mut FixedPicker(0));
        assert_eq!(avatar.initial, "A");
        assert_eq!(avatar.color, AVATAR_COLORS[0]);
    }

    #[test]
    fn test_generate_empty_username() {
        let avatar = Avatar::generate("", &mut FixedPicker(3));
        assert_eq!(avatar.initial, "");
        assert_eq!(avatar.color, AVATAR_COLORS[3]);
    }

    #[test]
    fn test_random_picker_stays_in_palette() {
        let mut picker = RandomPicker;
        for _ in 0..32 {
            let color = picker.pick(&AVATAR_COLORS);
            assert!(AVATAR_COLORS.contains(&color));
        }
    }

    #[test]
    fn test_avatar_serializes_fields() {
        let avatar = Avatar::generate("bob", &mut FixedPicker(1));
        let json = serde_json::to_string(&avatar).unwrap();
        assert!(json.contains("\"color\":\"#4ECDC4\""));
        assert!(json.contains("\"initial\":\"B\""));
    }
}
