use image::{GrayImage, Luma, Rgba, RgbaImage};
use sp_capture::{crop_region, PixelRect};
use sp_state::Slots;
use tracing::debug;

use crate::portrait_matcher::{take_books, take_portraits, PortraitCrop};
use crate::LayoutConfig;

/// Features isolated from one strip, not yet recognized.
#[derive(Debug, Clone)]
pub struct LineFeatures {
    pub actor: RgbaImage,
    pub timer: RgbaImage,
    /// Binarized text column, ink black on white.
    pub text: GrayImage,
    pub portraits: Slots<PortraitCrop>,
    pub books: Slots<[u8; 3]>,
}

/// Slice a frame into its line strips, top first. Strips that would run
/// past the bottom of a short frame are left out.
pub fn extract(frame: &RgbaImage, layout: &LayoutConfig) -> Vec<RgbaImage> {
    let strips: Vec<_> = (0..layout.line_count)
        .map(|i| layout.strip_rect(i))
        .take_while(|rect| rect.bottom() <= frame.height())
        .map(|rect| crop_region(frame, &rect))
        .collect();
    if strips.len() < layout.line_count {
        debug!(
            "Frame {}x{} holds only {} of {} strips",
            frame.width(),
            frame.height(),
            strips.len(),
            layout.line_count
        );
    }
    strips
}

/// Split one strip into its features, or `None` when nothing is drawn on it.
///
/// Portraits and book markers are painted over with the background before
/// anything else is cut out, so the remaining columns hold only their own pixels.
pub fn extract_line(mut strip: RgbaImage, layout: &LayoutConfig) -> Option<LineFeatures> {
    normalize_highlight(&mut strip, layout);
    let portraits = take_portraits(&mut strip, layout);
    let books = take_books(&mut strip, layout);

    if is_blank(&strip, layout.background_rgba()) {
        return None;
    }

    let text = crop_region(&strip, &layout.column_rect(layout.text));
    Some(LineFeatures {
        actor: crop_region(&strip, &layout.column_rect(layout.actor)),
        timer: crop_region(&strip, &layout.column_rect(layout.timer)),
        text: binarize(&text, layout.threshold),
        portraits,
        books,
    })
}

/// Turn a highlighted strip back into a plain one.
///
/// A strip is highlighted when its top-left pixel has the highlight color.
/// The bar spans the top row's leading run of highlight pixels. Its
/// anti-aliased edge sits `aa_offset` columns past the last bar pixel and
/// is erased. Highlight-colored pixels right of the bar are ink and stay.
pub fn normalize_highlight(strip: &mut RgbaImage, layout: &LayoutConfig) -> bool {
    let [r, g, b] = layout.highlight;
    let highlight = Rgba([r, g, b, 255]);
    if strip.get_pixel_checked(0, 0) != Some(&highlight) {
        return false;
    }

    let background = layout.background_rgba();
    let bar_end = (0..strip.width())
        .take_while(|&x| *strip.get_pixel(x, 0) == highlight)
        .last()
        .unwrap_or(0);
    let edge = bar_end + layout.aa_offset;
    if edge < strip.width() {
        for y in 0..strip.height() {
            strip.put_pixel(edge, y, background);
        }
    }

    for y in 0..strip.height() {
        for x in 0..=bar_end {
            if *strip.get_pixel(x, y) == highlight {
                strip.put_pixel(x, y, background);
            }
        }
    }
    true
}

pub fn is_blank(image: &RgbaImage, background: Rgba<u8>) -> bool {
    image.pixels().all(|p| *p == background)
}

/// Bright pixels (text) become black, everything else white.
pub fn binarize(image: &RgbaImage, threshold: u8) -> GrayImage {
    let gray = image::imageops::grayscale(image);
    let (w, h) = gray.dimensions();

    GrayImage::from_fn(w, h, |x, y| {
        if gray.get_pixel(x, y)[0] > threshold {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    })
}

/// True when a binarized image has at least one ink pixel.
pub fn has_ink(image: &GrayImage) -> bool {
    image.pixels().any(|p| p[0] == 0)
}

/// Crop a binarized image, clamped to its bounds.
pub fn crop_ink(image: &GrayImage, region: &PixelRect) -> GrayImage {
    let (w, h) = image.dimensions();
    let x = region.x.min(w);
    let y = region.y.min(h);
    let rw = region.width.min(w - x);
    let rh = region.height.min(h - y);

    image::imageops::crop_imm(image, x, y, rw, rh).to_image()
}
