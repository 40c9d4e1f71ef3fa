use image::RgbaImage;
use serde::{Deserialize, Serialize};

pub mod replay;

/// Pixel rectangle relative to the top-left of a capture rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// One capture as supplied by the driver, in capture order.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub match_id: String,
    pub page_index: usize,
    pub frame: RgbaImage,
    /// Set on the final capture of a match.
    pub is_last: bool,
}

/// A capture that could not be decoded, with enough context to find it.
#[derive(Debug, thiserror::Error)]
#[error("failed to load page {page_index} of match {match_id} from {}: {source}", .path.display())]
pub struct CaptureError {
    pub match_id: String,
    pub page_index: usize,
    pub is_last: bool,
    pub path: std::path::PathBuf,
    #[source]
    pub source: image::ImageError,
}

/// Crop a region from a captured frame, clamped to the frame bounds.
pub fn crop_region(frame: &RgbaImage, region: &PixelRect) -> RgbaImage {
    let (w, h) = (frame.width(), frame.height());

    let x = region.x.min(w.saturating_sub(1));
    let y = region.y.min(h.saturating_sub(1));
    let rw = region.width.min(w - x);
    let rh = region.height.min(h - y);

    image::imageops::crop_imm(frame, x, y, rw, rh).to_image()
}

/// Overwrite a region of `image` with a flat color, clamped to its bounds.
pub fn fill_region(image: &mut RgbaImage, region: &PixelRect, color: image::Rgba<u8>) {
    let right = region.right().min(image.width());
    let bottom = region.bottom().min(image.height());
    for y in region.y..bottom {
        for x in region.x..right {
            image.put_pixel(x, y, color);
        }
    }
}
