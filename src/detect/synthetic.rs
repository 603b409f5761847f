//! Synthetic rectified board images.
//!
//! Draws a board the way the rectification step delivers it: wooden
//! background, grid lines with the outer lines on the image edges, and flat
//! stones. Per-pixel noise comes from a seeded `ChaCha8Rng`, so the same
//! renderer and board always produce the same image.
//!
//! ```
//! use kifu_recorder::core::{BoardSize, BoardState};
//! use kifu_recorder::detect::synthetic::BoardRenderer;
//!
//! let image = BoardRenderer::new(7).render(&BoardState::new(BoardSize::Nine));
//! assert_eq!(image.side(), 500);
//! ```

use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::image::{BoardImage, REFERENCE_IMAGE_SIZE};
use crate::core::{BoardState, Stone};

const WOOD: [u8; 3] = [220, 179, 92];
const LINE: [u8; 3] = [40, 30, 20];
const BLACK_STONE: [u8; 3] = [18, 18, 18];
const WHITE_STONE: [u8; 3] = [235, 235, 240];

/// Renders boards into rectified images.
#[derive(Clone, Debug)]
pub struct BoardRenderer {
    seed: u64,
    side: u32,
    noise: u8,
    line_width: u32,
    stone_scale: f64,
}

impl BoardRenderer {
    /// A 500×500 renderer with light noise.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            side: REFERENCE_IMAGE_SIZE,
            noise: 6,
            line_width: 2,
            stone_scale: 0.45,
        }
    }

    /// Create a new renderer with a custom image side.
    #[must_use]
    pub fn with_side(mut self, side: u32) -> Self {
        self.side = side.max(2);
        self
    }

    /// Create a new renderer with a custom noise amplitude (per channel).
    #[must_use]
    pub fn with_noise(mut self, noise: u8) -> Self {
        self.noise = noise;
        self
    }

    /// Create a new renderer with a custom stone radius, as a fraction of
    /// the grid spacing.
    #[must_use]
    pub fn with_stone_scale(mut self, scale: f64) -> Self {
        self.stone_scale = scale;
        self
    }

    /// Draw `board`.
    #[must_use]
    pub fn render(&self, board: &BoardState) -> BoardImage {
        let side = self.side;
        let last = (board.dimension() - 1) as u32;
        let spacing = f64::from(side) / f64::from(last);
        let stone_radius = spacing * self.stone_scale;

        let mut pixels = RgbaImage::from_pixel(side, side, rgba(WOOD));

        for i in 0..=last {
            let at = (i * side / last).min(side - self.line_width);
            for offset in 0..self.line_width {
                for t in 0..side {
                    pixels.put_pixel(at + offset, t, rgba(LINE));
                    pixels.put_pixel(t, at + offset, rgba(LINE));
                }
            }
        }

        for (position, stone) in board.iter() {
            let color = match stone {
                Stone::Empty => continue,
                Stone::Black => BLACK_STONE,
                Stone::White => WHITE_STONE,
            };
            let cx = f64::from(u32::from(position.col) * side / last);
            let cy = f64::from(u32::from(position.row) * side / last);
            fill_disc(&mut pixels, cx, cy, stone_radius, rgba(color));
        }

        if self.noise > 0 {
            self.add_noise(&mut pixels);
        }

        BoardImage::from_square(pixels)
    }

    fn add_noise(&self, pixels: &mut RgbaImage) {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let amplitude = i16::from(self.noise);
        for pixel in pixels.pixels_mut() {
            for channel in pixel.0.iter_mut().take(3) {
                let delta = rng.gen_range(-amplitude..=amplitude);
                *channel = (i16::from(*channel) + delta).clamp(0, 255) as u8;
            }
        }
    }
}

fn rgba([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

fn fill_disc(pixels: &mut RgbaImage, cx: f64, cy: f64, radius: f64, color: Rgba<u8>) {
    let side = f64::from(pixels.width());
    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = (cx + radius).ceil().min(side - 1.0) as u32;
    let y1 = (cy + radius).ceil().min(side - 1.0) as u32;
    let r2 = radius * radius;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = f64::from(x) + 0.5 - cx;
            let dy = f64::from(y) + 0.5 - cy;
            if dx * dx + dy * dy <= r2 {
                pixels.put_pixel(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoardSize, Color, Position};

    #[test]
    fn test_render_is_deterministic() {
        let board = BoardState::new(BoardSize::Nine)
            .with_stone(Position::new(4, 4), Color::Black)
            .unwrap();
        let a = BoardRenderer::new(1).render(&board);
        let b = BoardRenderer::new(1).render(&board);
        let c = BoardRenderer::new(2).render(&board);
        assert_eq!(a.pixels(), b.pixels());
        assert_ne!(a.pixels(), c.pixels());
    }

    #[test]
    fn test_stones_are_drawn() {
        let board = BoardState::new(BoardSize::Nine)
            .with_stone(Position::new(4, 4), Color::Black)
            .unwrap()
            .with_stone(Position::new(2, 6), Color::White)
            .unwrap();
        let image = BoardRenderer::new(3).with_noise(0).render(&board);

        // Centre of (4, 4) is (250, 250); (2, 6) is (375, 125)
        assert_eq!(image.pixels().get_pixel(255, 255).0, [18, 18, 18, 255]);
        assert_eq!(image.pixels().get_pixel(380, 130).0, [235, 235, 240, 255]);
        assert_eq!(image.pixels().get_pixel(100, 400).0, [220, 179, 92, 255]);
    }
}
