//! # Image Element
//!
//! Prints a bitmap as an ESC/POS raster image. Images wider than the
//! print head are scaled down; pixels are binarized with a fixed luma
//! threshold (rendering fidelity is out of scope here; callers wanting
//! dithered output should binarize before constructing the element).

use std::path::Path;

use image::{DynamicImage, imageops::FilterType};

use crate::error::BoletaError;
use crate::protocol::commands::{self, Alignment};

use super::{Encoding, Printable};

/// Maximum printable width in dots (58mm paper).
const MAX_WIDTH_DOTS: u32 = 384;

/// Luma values below this print black.
const BLACK_THRESHOLD: u8 = 128;

/// A bitmap image block element.
#[derive(Debug, Clone)]
pub struct TicketImage {
    image: DynamicImage,
    max_width: u32,
}

impl TicketImage {
    /// Wrap an already-decoded image.
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            max_width: MAX_WIDTH_DOTS,
        }
    }

    /// Load an image from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BoletaError> {
        let image = image::open(path.as_ref())
            .map_err(|e| BoletaError::Image(format!("{}: {}", path.as_ref().display(), e)))?;
        Ok(Self::new(image))
    }

    /// Constrain the printed width in dots (default 384).
    pub fn max_width(mut self, dots: u32) -> Self {
        self.max_width = dots.max(8);
        self
    }

    /// Grayscale, downscale to the width budget, threshold to 1 bit per
    /// dot, and pack rows MSB-first.
    ///
    /// Returns `None` when the rendered dimensions leave the u16 domain of
    /// the raster header; a header declaring fewer rows than the payload
    /// carries would desynchronize the printer's command parser.
    fn to_raster(&self) -> Option<(u16, u16, Vec<u8>)> {
        let gray = if self.image.width() > self.max_width {
            self.image
                .resize(self.max_width, u32::MAX, FilterType::Triangle)
                .to_luma8()
        } else {
            self.image.to_luma8()
        };

        let width = gray.width() as usize;
        let height = gray.height() as usize;
        let width_bytes = width.div_ceil(8);
        let header_width = u16::try_from(width_bytes).ok()?;
        let header_height = u16::try_from(height).ok()?;
        let mut data = vec![0u8; width_bytes * height];

        for (x, y, pixel) in gray.enumerate_pixels() {
            if pixel.0[0] < BLACK_THRESHOLD {
                let x = x as usize;
                data[y as usize * width_bytes + x / 8] |= 0x80 >> (x % 8);
            }
        }

        Some((header_width, header_height, data))
    }
}

impl Printable for TicketImage {
    fn data(&self, _encoding: Encoding) -> Vec<u8> {
        let Some((width_bytes, height, raster)) = self.to_raster() else {
            return Vec::new();
        };
        if height == 0 || width_bytes == 0 {
            return Vec::new();
        }

        let mut out = commands::align(Alignment::Center);
        out.extend(commands::raster(width_bytes, height, &raster));
        out.extend(commands::align(Alignment::Left));
        out
    }
}
