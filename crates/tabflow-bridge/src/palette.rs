//! Mapping arbitrary CSS colors onto the native group palette.
//!
//! Lossy but deterministic: the same input always lands on the same slot.
//! Parsable hex colors go to the nearest hue; anything else is hashed.

use tabflow_protocols::platform::GroupColor;

/// Saturation below which a color is treated as grey.
const GREY_SATURATION: f32 = 0.15;

/// Map any color string to a member of the native palette. Never fails.
pub fn map_to_group_color(color: &str) -> GroupColor {
    match parse_hex(color) {
        Some((r, g, b)) => nearest_by_hue(r, g, b),
        None => hashed(color),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 | 4 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        6 | 8 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

fn nearest_by_hue(r: u8, g: u8, b: u8) -> GroupColor {
    let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let lightness = (max + min) / 2.0;

    let saturation = if delta == 0.0 {
        0.0
    } else {
        delta / (1.0 - (2.0 * lightness - 1.0).abs())
    };
    if saturation < GREY_SATURATION || lightness < 0.08 || lightness > 0.95 {
        return GroupColor::Grey;
    }

    let hue = if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    match hue {
        h if h < 15.0 => GroupColor::Red,
        h if h < 45.0 => GroupColor::Orange,
        h if h < 70.0 => GroupColor::Yellow,
        h if h < 165.0 => GroupColor::Green,
        h if h < 200.0 => GroupColor::Cyan,
        h if h < 250.0 => GroupColor::Blue,
        h if h < 300.0 => GroupColor::Purple,
        h if h < 345.0 => GroupColor::Pink,
        _ => GroupColor::Red,
    }
}

/// FNV-1a over the raw bytes.
fn hashed(color: &str) -> GroupColor {
    let hash = color
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |acc, byte| {
            (acc ^ byte as u64).wrapping_mul(0x0000_0100_0000_01b3)
        });
    GroupColor::ALL[(hash % GroupColor::ALL.len() as u64) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(map_to_group_color("#ef4444"), GroupColor::Red);
        assert_eq!(map_to_group_color("#f59e0b"), GroupColor::Orange);
        assert_eq!(map_to_group_color("#10b981"), GroupColor::Green);
        assert_eq!(map_to_group_color("#3b82f6"), GroupColor::Blue);
        assert_eq!(map_to_group_color("#8b5cf6"), GroupColor::Purple);
        assert_eq!(map_to_group_color("#ec4899"), GroupColor::Pink);
        assert_eq!(map_to_group_color("#06b6d4"), GroupColor::Cyan);
        assert_eq!(map_to_group_color("#facc15"), GroupColor::Yellow);
    }

    #[test]
    fn test_greys() {
        assert_eq!(map_to_group_color("#808080"), GroupColor::Grey);
        assert_eq!(map_to_group_color("#111"), GroupColor::Grey);
        assert_eq!(map_to_group_color("#ffffff"), GroupColor::Grey);
    }

    #[test]
    fn test_short_and_alpha_forms() {
        assert_eq!(map_to_group_color("#f00"), GroupColor::Red);
        assert_eq!(map_to_group_color("#ff0000cc"), GroupColor::Red);
        assert_eq!(map_to_group_color("  #00f  "), GroupColor::Blue);
    }

    #[test]
    fn test_deterministic() {
        for input in ["#3b82f6", "teal", "", "not-a-color", "#zzzzzz"] {
            assert_eq!(map_to_group_color(input), map_to_group_color(input));
        }
    }

    #[test]
    fn test_total_over_garbage() {
        for input in ["", "#", "#12", "#12345", "rgb(1,2,3)", "ü", "#ééé", "#1234567890"] {
            let color = map_to_group_color(input);
            assert!(GroupColor::ALL.contains(&color));
        }
    }
}
