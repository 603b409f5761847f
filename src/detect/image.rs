//! Rectified board images and intersection sampling.
//!
//! The image is a square, top-down RGBA view of the board whose edges are
//! the outer grid lines, so intersection `(row, col)` sits at pixel
//! `(col * side / (n - 1), row * side / (n - 1))`. Each intersection is
//! sampled as the mean colour of a square window around that point, a bit
//! smaller than half a stone.

use image::RgbaImage;

use super::color::ColorSample;
use crate::core::{BoardSize, Position};
use crate::error::{KifuError, Result};

/// Side length, in pixels, the window radii are tuned for.
pub const REFERENCE_IMAGE_SIZE: u32 = 500;

/// Window radius for a board size on a [`REFERENCE_IMAGE_SIZE`] image.
#[must_use]
pub const fn window_radius(size: BoardSize) -> u32 {
    match size {
        BoardSize::Nine => 21,
        BoardSize::Thirteen => 14,
        BoardSize::Nineteen => 9,
    }
}

/// A rectified, square board image.
#[derive(Clone, Debug)]
pub struct BoardImage {
    pixels: RgbaImage,
}

impl BoardImage {
    /// Wrap an RGBA image. Fails if it is empty or not square.
    pub fn new(pixels: RgbaImage) -> Result<Self> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(KifuError::InvalidImage("image is empty".to_string()));
        }
        if width != height {
            return Err(KifuError::InvalidImage(format!(
                "expected a square image, got {width}x{height}"
            )));
        }
        Ok(Self { pixels })
    }

    /// Wrap an image already known to be square and non-empty.
    pub(crate) fn from_square(pixels: RgbaImage) -> Self {
        debug_assert!(pixels.width() > 0 && pixels.width() == pixels.height());
        Self { pixels }
    }

    /// Wrap a raw RGBA buffer (row-major, 4 bytes per pixel).
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        let pixels = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            KifuError::InvalidImage(format!(
                "expected {expected} bytes for {width}x{height} RGBA, got {actual}"
            ))
        })?;
        Self::new(pixels)
    }

    /// Side length in pixels.
    #[must_use]
    pub fn side(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    #[must_use]
    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// Mean colour of the whole image.
    #[must_use]
    pub fn mean_color(&self) -> ColorSample {
        self.region_mean(0, 0, self.side(), self.side())
    }

    /// Mean colour of the half-open pixel rectangle `[x0, x1) × [y0, y1)`.
    fn region_mean(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> ColorSample {
        let mut sum = [0u64; 4];
        for y in y0..y1 {
            for x in x0..x1 {
                let pixel = self.pixels.get_pixel(x, y);
                for (acc, channel) in sum.iter_mut().zip(pixel.0) {
                    *acc += u64::from(channel);
                }
            }
        }

        let count = u64::from(x1 - x0) * u64::from(y1 - y0);
        if count == 0 {
            return ColorSample::default();
        }
        let n = count as f64;
        ColorSample([
            sum[0] as f64 / n,
            sum[1] as f64 / n,
            sum[2] as f64 / n,
            sum[3] as f64 / n,
        ])
    }

    /// Pixel coordinates `(x, y)` of an intersection.
    #[must_use]
    pub fn intersection_center(&self, size: BoardSize, position: Position) -> (u32, u32) {
        let last = (size.dimension() - 1) as u32;
        let side = self.side();
        (
            u32::from(position.col) * side / last,
            u32::from(position.row) * side / last,
        )
    }

    /// Mean colour around an intersection, using a window of `radius`
    /// pixels clipped to the image.
    #[must_use]
    pub fn sample(&self, size: BoardSize, position: Position, radius: u32) -> ColorSample {
        let (x, y) = self.intersection_center(size, position);
        let side = self.side();
        let x0 = x.saturating_sub(radius).min(side - 1);
        let y0 = y.saturating_sub(radius).min(side - 1);
        let x1 = (x + radius).min(side).max(x0 + 1);
        let y1 = (y + radius).min(side).max(y0 + 1);
        self.region_mean(x0, y0, x1, y1)
    }

    /// Sample every intersection in row-major order.
    #[must_use]
    pub fn sample_all(&self, size: BoardSize, radius: u32) -> Vec<ColorSample> {
        size.positions()
            .map(|position| self.sample(size, position, radius))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn uniform(side: u32, color: [u8; 4]) -> BoardImage {
        BoardImage::new(RgbaImage::from_pixel(side, side, Rgba(color))).unwrap()
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(
            BoardImage::new(RgbaImage::new(10, 20)),
            Err(KifuError::InvalidImage(_))
        ));
        assert!(BoardImage::new(RgbaImage::new(0, 0)).is_err());
        assert!(BoardImage::from_raw(2, 2, vec![0; 15]).is_err());
        assert!(BoardImage::from_raw(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_intersection_centers() {
        let image = uniform(500, [0, 0, 0, 255]);
        let size = BoardSize::Nineteen;
        assert_eq!(image.intersection_center(size, Position::new(0, 0)), (0, 0));
        assert_eq!(image.intersection_center(size, Position::new(1, 2)), (55, 27));
        assert_eq!(image.intersection_center(size, Position::new(18, 18)), (500, 500));
    }

    #[test]
    fn test_uniform_sample() {
        let image = uniform(100, [200, 150, 100, 255]);
        let sample = image.sample(BoardSize::Nine, Position::new(8, 8), 21);
        assert_eq!(sample, ColorSample::new(200.0, 150.0, 100.0, 255.0));
        assert_eq!(image.mean_color(), sample);
    }

    #[test]
    fn test_window_is_clipped() {
        // Left half black, right half white
        let pixels = RgbaImage::from_fn(40, 40, |x, _| {
            if x < 20 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let image = BoardImage::new(pixels).unwrap();

        // Column 0 sits at x = 0: window [0, 10) is all black
        let corner = image.sample(BoardSize::Nine, Position::new(0, 0), 10);
        assert_eq!(corner.red(), 0.0);

        // Column 4 sits at x = 20: window [10, 30) is half and half
        let middle = image.sample(BoardSize::Nine, Position::new(4, 4), 10);
        assert!((middle.red() - 127.5).abs() < 1e-9);

        assert_eq!(image.sample_all(BoardSize::Nine, 10).len(), 81);
    }

    #[test]
    fn test_window_radius_table() {
        assert_eq!(window_radius(BoardSize::Nine), 21);
        assert_eq!(window_radius(BoardSize::Thirteen), 14);
        assert_eq!(window_radius(BoardSize::Nineteen), 9);
    }
}
