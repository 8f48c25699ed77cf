//! Colour palette for regions and maps.

use crate::error::ColorError;

pub const BLACK: &str = "black";
pub const GRAY: &str = "#7f7f7f";
pub const LIGHT_GRAY: &str = "gainsboro";
pub const DARK_GRAY: &str = "#404040";

pub const BLUE: &str = "#1f77b4";
pub const ORANGE: &str = "#ff7f0e";
pub const GREEN: &str = "#2ca02c";
pub const RED: &str = "#d62728";
pub const PURPLE: &str = "#9467bd";
pub const BROWN: &str = "#8c564b";
pub const PINK: &str = "#e377c2";

// The base colours at 0.2 opacity over white
pub const LIGHT_BLUE: &str = "#d2e3f0";
pub const LIGHT_ORANGE: &str = "#ffe5ce";
pub const LIGHT_GREEN: &str = "#d4ecd4";
pub const LIGHT_RED: &str = "#f6d3d4";
pub const LIGHT_PURPLE: &str = "#e9e0f1";
pub const LIGHT_BROWN: &str = "#e8dddb";
pub const LIGHT_PINK: &str = "#f9e3f2";

/// (region, colour, background colour)
pub const REGION_COLORS: [(&str, &str, &str); 7] = [
    ("North America", PURPLE, LIGHT_PURPLE),
    ("Western Europe", PINK, LIGHT_PINK),
    ("Eastern Europe and Central Asia", ORANGE, LIGHT_ORANGE),
    ("Latin America and the Caribbean", GREEN, LIGHT_GREEN),
    ("Asia and Australasia", BLUE, LIGHT_BLUE),
    ("Middle East and North Africa", RED, LIGHT_RED),
    ("Sub-Saharan Africa", BROWN, LIGHT_BROWN),
];

/// Number of bins in the diverging change scale.
pub const SCALE_BINS: usize = 8;

pub fn region_color(region: &str) -> Option<&'static str> {
    REGION_COLORS.iter().find(|(name, _, _)| *name == region).map(|(_, c, _)| *c)
}

pub fn region_background(region: &str) -> Option<&'static str> {
    REGION_COLORS.iter().find(|(name, _, _)| *name == region).map(|(_, _, bg)| *bg)
}

/// The opaque colour that `hex` drawn at `transparency` over white looks
/// like. `transparency` runs from 0 (invisible) to 1 (fully opaque).
pub fn opaque_hex_from_transparency(hex: &str, transparency: f64) -> Result<String, ColorError> {
    if !(0.0..=1.0).contains(&transparency) {
        return Err(ColorError::InvalidTransparency(transparency));
    }
    let [r, g, b] = parse_hex(hex)?;
    let blend = |c: u8| (255.0 - transparency * (255.0 - f64::from(c))) as u8;
    Ok(to_hex([blend(r), blend(g), blend(b)]))
}

/// Red-white-green scale for index changes, as `(position, colour)` stops.
///
/// Each of the [`SCALE_BINS`] bins is a flat band, so every colour appears
/// at both ends of its band.
pub fn diverging_colorscale() -> Result<Vec<(f64, String)>, ColorError> {
    let red = parse_hex(RED)?;
    let green = parse_hex(GREEN)?;
    let white = [255u8; 3];

    let mut stops = Vec::with_capacity(SCALE_BINS * 2);
    for i in 0..SCALE_BINS {
        let x = i as f64 / (SCALE_BINS - 1) as f64;
        let color = if x <= 0.5 { lerp(red, white, x * 2.0) } else { lerp(white, green, (x - 0.5) * 2.0) };
        let start = i as f64 / SCALE_BINS as f64;
        stops.push((start, color.clone()));
        stops.push((start + 1.0 / SCALE_BINS as f64, color));
    }
    Ok(stops)
}

fn lerp(from: [u8; 3], to: [u8; 3], t: f64) -> String {
    let channel = |a: u8, b: u8| {
        let a = f64::from(a) / 255.0;
        let b = f64::from(b) / 255.0;
        ((a + (b - a) * t) * 255.0).round() as u8
    };
    to_hex([channel(from[0], to[0]), channel(from[1], to[1]), channel(from[2], to[2])])
}

fn parse_hex(hex: &str) -> Result<[u8; 3], ColorError> {
    let digits = hex.trim_start_matches('#');
    let invalid = || ColorError::InvalidHex(hex.to_string());
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

fn to_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_from_transparency() {
        assert_eq!(opaque_hex_from_transparency("#1f77b4", 0.2).unwrap(), "#d2e3f0");
        assert_eq!(opaque_hex_from_transparency("#ff7f0e", 0.2).unwrap(), "#ffe5ce");
    }

    #[test]
    fn test_light_palette_matches_blend() {
        for (_, base, light) in REGION_COLORS {
            assert_eq!(opaque_hex_from_transparency(base, 0.2).unwrap(), light);
        }
    }

    #[test]
    fn test_transparency_bounds() {
        assert_eq!(opaque_hex_from_transparency("#123456", 1.0).unwrap(), "#123456");
        assert_eq!(opaque_hex_from_transparency("#123456", 0.0).unwrap(), "#ffffff");
        assert!(matches!(
            opaque_hex_from_transparency("#123456", 1.5),
            Err(ColorError::InvalidTransparency(_))
        ));
    }

    #[test]
    fn test_invalid_hex() {
        assert!(matches!(opaque_hex_from_transparency("gainsboro", 0.5), Err(ColorError::InvalidHex(_))));
        assert!(opaque_hex_from_transparency("#12345", 0.5).is_err());
    }

    #[test]
    fn test_region_lookup() {
        assert_eq!(region_color("North America"), Some(PURPLE));
        assert_eq!(region_background("Sub-Saharan Africa"), Some(LIGHT_BROWN));
        assert_eq!(region_color("Atlantis"), None);
    }

    #[test]
    fn test_diverging_colorscale() {
        let scale = diverging_colorscale().unwrap();
        assert_eq!(scale.len(), 16);
        assert_eq!(scale[0], (0.0, RED.to_string()));
        assert_eq!(scale[15], (1.0, GREEN.to_string()));
        // bands are flat
        assert_eq!(scale[2].1, scale[3].1);
        assert!((scale[2].0 - 0.125).abs() < 1e-12);
    }
}
