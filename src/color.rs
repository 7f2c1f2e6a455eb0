// File: ./src/color.rs

// Maps calendar color settings to terminal colors.
// Accepts the classic sixteen terminal color names as well as "#RRGGBB" hex strings.

use crossterm::style::Color;

/// Parse a hex color string like "#RRGGBB" or "RRGGBB" into u8 tuple.
pub fn parse_hex_to_u8(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Resolves a configured color name. Names are case-insensitive and
/// surrounding whitespace is ignored.
pub fn parse_color(name: &str) -> Option<Color> {
    let normalized = name.trim().to_lowercase();
    let color = match normalized.as_str() {
        "black" => Color::Black,
        "dark red" => Color::DarkRed,
        "dark green" => Color::DarkGreen,
        "brown" => Color::DarkYellow,
        "dark blue" => Color::DarkBlue,
        "dark magenta" => Color::DarkMagenta,
        "dark cyan" => Color::DarkCyan,
        "light gray" | "light grey" => Color::Grey,
        "dark gray" | "dark grey" => Color::DarkGrey,
        "light red" => Color::Red,
        "light green" => Color::Green,
        "yellow" => Color::Yellow,
        "light blue" => Color::Blue,
        "light magenta" => Color::Magenta,
        "light cyan" => Color::Cyan,
        "white" => Color::White,
        other => {
            let (r, g, b) = parse_hex_to_u8(other)?;
            Color::Rgb { r, g, b }
        }
    };
    Some(color)
}

/// Like [`parse_color`], but logs unknown names instead of failing.
pub fn resolve(name: Option<&str>) -> Option<Color> {
    let name = name?;
    let color = parse_color(name);
    if color.is_none() {
        log::warn!("Unknown color '{}', rendering uncolored", name);
    }
    color
}
