//! The shared 256-entry color palette.

/// Number of palette slots.
pub const PALETTE_SIZE: usize = 256;

/// Fixed color lookup table shared by every model in a document.
///
/// Slot `i` holds the color for color byte `i + 1`; the file format reserves
/// color byte 0 for "empty", so an `RGBA` chunk carries 255 usable colors
/// followed by 4 reserved bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Colors in `0xAARRGGBB` order, alpha always opaque for filled slots.
    pub colors: [u32; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: [0; PALETTE_SIZE],
        }
    }
}

impl Palette {
    /// Color for a voxel's color byte, or 0 for the reserved byte 0.
    #[must_use]
    pub fn color_for(&self, color: u8) -> u32 {
        if color == 0 {
            0
        } else {
            self.colors[usize::from(color) - 1]
        }
    }
}

/// Convert a file-order RGBA color to in-memory ARGB with forced alpha.
///
/// The file stores bytes R, G, B, A; read as a little-endian u32 that puts R
/// in the low byte. The renderable form is `(0xFF << 24) | (R << 16) |
/// (G << 8) | B`.
#[must_use]
pub fn patch_color(rgba: u32) -> u32 {
    let r = rgba & 0x0000_00ff;
    let g = (rgba & 0x0000_ff00) >> 8;
    let b = (rgba & 0x00ff_0000) >> 16;
    (0xff << 24) | (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_color_swaps_channels() {
        // File bytes R=0x11, G=0x22, B=0x33, A=0x44 -> LE u32 0x44332211.
        let patched = patch_color(0x4433_2211);
        assert_eq!(patched, 0xff11_2233);
    }

    #[test]
    fn test_patch_color_forces_alpha() {
        assert_eq!(patch_color(0x0000_0000) >> 24, 0xff);
    }

    #[test]
    fn test_color_for() {
        let mut palette = Palette::default();
        palette.colors[0] = 0xff10_2030;
        assert_eq!(palette.color_for(1), 0xff10_2030);
        assert_eq!(palette.color_for(0), 0);
    }
}
