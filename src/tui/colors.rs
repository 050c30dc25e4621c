//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Priority;

/// Used for High priority
pub const DARK_RED: Color = Color::Rgb(170, 30, 30);
/// Used for Medium priority and the focused form field
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for Low priority and the progress gauge
pub const DARK_GREEN: Color = Color::Rgb(0, 120, 0);
/// Header and status bar background
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

/// Foreground color for a priority badge.
pub fn priority_color(priority: &Priority) -> Color {
    match priority {
        Priority::High => DARK_RED,
        Priority::Medium => GOLD,
        Priority::Low => DARK_GREEN,
        Priority::Other(_) => Color::Gray,
    }
}
