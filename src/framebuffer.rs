/// display width in pixels
pub const DISPLAY_WIDTH: usize = 64;

/// display height in pixels
pub const DISPLAY_HEIGHT: usize = 32;

/// The 64x32 monochrome display. The machine is the only writer; hosts get
/// a shared reference once per frame and render it however they like.
///
/// Sprite rows are 8 pixels wide, most-significant bit leftmost, combined
/// into the grid by XOR: a set source bit flips the pixel under it. The
/// sprite's origin wraps modulo the display size; pixels that then run off
/// the right or bottom edge are clipped, not wrapped around.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    /// every pixel off, in one step
    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y][x]
    }

    /// row-major pixel rows, for rendering
    pub fn rows(&self) -> &[[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT] {
        &self.pixels
    }

    /// XOR-blit one sprite, one byte per row. Returns the collision flag:
    /// true iff any previously-lit pixel went dark.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let ox = x as usize % DISPLAY_WIDTH;
        let oy = y as usize % DISPLAY_HEIGHT;
        let mut collision = false;
        for (r, &row) in rows.iter().enumerate() {
            let py = oy + r;
            if py >= DISPLAY_HEIGHT {
                break;
            }
            for c in 0..8 {
                let px = ox + c;
                if px >= DISPLAY_WIDTH {
                    break;
                }
                if row & (0x80 >> c) != 0 {
                    collision |= self.pixels[py][px];
                    self.pixels[py][px] ^= true;
                }
            }
        }
        collision
    }

    /// unpack a 256-byte 1bpp image (MSB leftmost, as sprite rows are) into
    /// a full frame; used for display test patterns
    pub fn from_packed(data: &[u8; DISPLAY_WIDTH * DISPLAY_HEIGHT / 8]) -> Self {
        let mut fb = Framebuffer::new();
        for (i, row) in fb.pixels.iter_mut().enumerate() {
            for (j, px) in row.iter_mut().enumerate() {
                let bit = i * DISPLAY_WIDTH + j;
                *px = data[bit / 8] & (0x80 >> (bit % 8)) != 0;
            }
        }
        fb
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_dark() {
        let fb = Framebuffer::new();
        assert!(fb.rows().iter().flatten().all(|&px| !px));
    }

    #[test]
    fn test_draw_lights_msb_leftmost() {
        let mut fb = Framebuffer::new();
        let hit = fb.draw_sprite(3, 2, &[0b1010_0001]);
        assert!(!hit);
        assert!(fb.get(3, 2));
        assert!(!fb.get(4, 2));
        assert!(fb.get(5, 2));
        assert!(fb.get(10, 2));
        assert!(!fb.get(11, 2));
    }

    #[test]
    fn test_draw_twice_is_involution() {
        let mut fb = Framebuffer::new();
        let sprite = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        let first = fb.draw_sprite(12, 7, &sprite);
        assert!(!first);
        let second = fb.draw_sprite(12, 7, &sprite);
        assert!(second);
        assert_eq!(fb, Framebuffer::new());
    }

    #[test]
    fn test_collision_only_on_unlit_transition() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(0, 0, &[0b1000_0000]);
        // disjoint bits of the same row: no pixel goes dark
        assert!(!fb.draw_sprite(0, 0, &[0b0100_0000]));
        assert!(fb.draw_sprite(0, 0, &[0b1100_0000]));
    }

    #[test]
    fn test_origin_wraps() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(64, 32, &[0x80]);
        assert!(fb.get(0, 0));
    }

    #[test]
    fn test_overhang_clips() {
        let mut fb = Framebuffer::new();
        // 8-wide row starting 2 pixels from the right edge
        fb.draw_sprite(62, 0, &[0xFF]);
        assert!(fb.get(62, 0));
        assert!(fb.get(63, 0));
        assert!(!fb.get(0, 0));
        // 2-row sprite starting on the bottom row
        fb.draw_sprite(0, 31, &[0x80, 0x80]);
        assert!(fb.get(0, 31));
        assert!(!fb.get(0, 0));
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(5, 5, &[0xFF, 0xFF]);
        fb.clear();
        assert_eq!(fb, Framebuffer::new());
    }

    #[test]
    fn test_from_packed_corners() {
        let mut data = [0u8; 256];
        data[0] = 0x80; // top-left
        data[255] = 0x01; // bottom-right
        let fb = Framebuffer::from_packed(&data);
        assert!(fb.get(0, 0));
        assert!(fb.get(63, 31));
        assert!(!fb.get(1, 0));
    }
}
