//! Built-in 8x8 bitmap patterns

/// A named 8x8 bitmap, one byte per row, MSB = leftmost pixel
pub struct Pattern {
    /// Name used on the command line
    pub name: &'static str,
    /// Short description for listings
    pub description: &'static str,
    /// The raster data
    pub raster: [u8; 8],
}

/// All built-in patterns
pub const BUILTINS: &[Pattern] = &[
    Pattern {
        name: "smiley",
        description: "Smiley face",
        raster: [0x3C, 0x42, 0xA5, 0x81, 0xA5, 0x99, 0x42, 0x3C],
    },
    Pattern {
        name: "heart",
        description: "Heart shape",
        raster: [0x00, 0x66, 0xFF, 0xFF, 0xFF, 0x7E, 0x3C, 0x18],
    },
];

/// Look up a built-in pattern by name (case-insensitive)
pub fn find(name: &str) -> Option<&'static Pattern> {
    BUILTINS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Render a raster as an 8-line ASCII preview
pub fn preview(raster: &[u8; 8]) -> String {
    let mut out = String::with_capacity(8 * 9);
    for &row in raster {
        for bit in (0..8).rev() {
            out.push(if row & (1 << bit) != 0 { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_case_insensitive() {
        assert!(find("smiley").is_some());
        assert!(find("Heart").is_some());
        assert!(find("dragon").is_none());
    }

    #[test]
    fn preview_renders_msb_first() {
        let raster = [0x80, 0, 0, 0, 0, 0, 0, 0x01];
        let rendered = preview(&raster);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "#.......");
        assert_eq!(lines[7], ".......#");
    }
}
