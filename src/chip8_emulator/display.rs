use std::fmt::{Display, Formatter};

use crate::chip8_emulator::config::{MAX_SPRITE_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Row-major copy of the screen handed to renderers.
pub type Framebuffer = [bool; SCREEN_WIDTH * SCREEN_HEIGHT];

#[derive(Debug, Clone)]
pub struct DisplayBuffer {
    pixels: Framebuffer,
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self {
            pixels: [false; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }
}

impl DisplayBuffer {
    pub fn clear(&mut self) {
        self.pixels = [false; SCREEN_WIDTH * SCREEN_HEIGHT];
    }

    /// XORs an 8-pixel-wide sprite onto the screen at `(x, y)`, wrapping on
    /// both axes. Returns true if any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collided = false;

        for (row, sprite_row) in sprite.iter().take(MAX_SPRITE_HEIGHT).enumerate() {
            let y_pos = (y + row) % SCREEN_HEIGHT;

            for bit in 0..8 {
                if (sprite_row >> (7 - bit)) & 0x1 == 0 {
                    continue;
                }

                let x_pos = (x + bit) % SCREEN_WIDTH;
                let location = x_pos + (y_pos * SCREEN_WIDTH);
                if self.pixels[location] {
                    collided = true;
                }
                self.pixels[location] ^= true;
            }
        }

        collided
    }

    /// Out-of-range coordinates read as unset.
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        self.pixels[x + (y * SCREEN_WIDTH)]
    }

    pub fn snapshot(&self) -> Framebuffer {
        self.pixels
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|pixel| **pixel).count()
    }
}

impl Display for DisplayBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.pixels.chunks(SCREEN_WIDTH) {
            let line: String = row.iter().map(|lit| if *lit { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
