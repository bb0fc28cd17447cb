use crate::error::FaultKind;

pub const CHIP8_DISPLAY_WIDTH: usize = 64;
pub const CHIP8_DISPLAY_HEIGHT: usize = 32;

/// bytes needed for one bitplane at 1bpp
pub const CHIP8_DISPLAY_BYTES: usize = CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT / 8;

/// 64x32 monochrome bitmap, packed row-major 8 pixels to a byte with the
/// leftmost pixel in the MSB; the same layout the COSMAC VIP kept in its
/// display page, so renderers can take the bytes as-is
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    bytes: [u8; CHIP8_DISPLAY_BYTES],
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            bytes: [0; CHIP8_DISPLAY_BYTES],
        }
    }

    pub fn clear(&mut self) {
        self.bytes = [0; CHIP8_DISPLAY_BYTES];
    }

    pub fn width(&self) -> usize {
        CHIP8_DISPLAY_WIDTH
    }

    pub fn height(&self) -> usize {
        CHIP8_DISPLAY_HEIGHT
    }

    /// raw packed pixels, for renderers
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// is the pixel at (x, y) lit; coordinates wrap
    pub fn get(&self, x: usize, y: usize) -> bool {
        let (byte, mask) = Self::locate(x % CHIP8_DISPLAY_WIDTH, y % CHIP8_DISPLAY_HEIGHT);
        self.bytes[byte] & mask != 0
    }

    /// XOR one pixel on at (x, y), wrapping both coordinates.
    /// returns true if the pixel was lit and is now dark (a collision)
    pub fn plot(&mut self, x: usize, y: usize) -> Result<bool, FaultKind> {
        let (x, y) = (x % CHIP8_DISPLAY_WIDTH, y % CHIP8_DISPLAY_HEIGHT);
        let (byte, mask) = Self::locate(x, y);
        let cell = self
            .bytes
            .get_mut(byte)
            .ok_or(FaultKind::PixelOutOfRange { x, y })?;
        let collided = *cell & mask != 0;
        *cell ^= mask;
        Ok(collided)
    }

    /// XOR a row of 8 pixels (MSB leftmost) starting at (x, y).
    /// returns true if any lit pixel went dark
    pub fn plot_row(&mut self, x: usize, y: usize, row: u8) -> Result<bool, FaultKind> {
        let mut collided = false;
        for bit in 0..8 {
            if row & (0x80 >> bit) != 0 {
                collided |= self.plot(x + bit, y)?;
            }
        }
        Ok(collided)
    }

    /// rows of pixels, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = bool> + '_> + '_ {
        (0..CHIP8_DISPLAY_HEIGHT).map(move |y| (0..CHIP8_DISPLAY_WIDTH).map(move |x| self.get(x, y)))
    }

    fn locate(x: usize, y: usize) -> (usize, u8) {
        let n = y * CHIP8_DISPLAY_WIDTH + x;
        (n / 8, 0x80 >> (n % 8))
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row.map(|px| if px { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
