use image::{Rgba, RgbaImage};
use sp_capture::{crop_region, fill_region, PixelRect};
use sp_state::Slots;

use crate::layout::BandConfig;
use crate::LayoutConfig;

/// One cast portrait cut out of a strip.
#[derive(Debug, Clone, PartialEq)]
pub struct PortraitCrop {
    /// Portrait without its one-pixel border, so the role color does not
    /// change the fingerprint.
    pub interior: RgbaImage,
    /// Top-left border pixel, which carries the role color.
    pub border: [u8; 3],
}

/// First and last non-background pixel of the band's probe row.
fn scan_band(strip: &RgbaImage, band: &BandConfig, background: Rgba<u8>) -> Option<(u32, u32)> {
    if band.probe_y >= strip.height() {
        return None;
    }
    let end = band.span.end().min(strip.width());
    let mut hits = (band.span.x..end).filter(|&x| *strip.get_pixel(x, band.probe_y) != background);
    let first = hits.next()?;
    let last = hits.last().unwrap_or(first);
    Some((first, last))
}

/// Left edges of the items drawn in a band.
pub fn item_offsets(strip: &RgbaImage, band: &BandConfig, background: Rgba<u8>) -> Slots<u32> {
    match scan_band(strip, band, background) {
        None => Slots::Zero,
        Some((first, last)) if last - first + 1 > band.single_max_span => {
            Slots::Two(first, first + band.spacing)
        }
        Some((first, _)) => Slots::One(first),
    }
}

fn rgb_at(strip: &RgbaImage, x: u32, y: u32, fallback: [u8; 3]) -> [u8; 3] {
    strip
        .get_pixel_checked(x, y)
        .map(|p| [p[0], p[1], p[2]])
        .unwrap_or(fallback)
}

/// Cut the cast portraits out of a strip and paint their cells over.
pub fn take_portraits(strip: &mut RgbaImage, layout: &LayoutConfig) -> Slots<PortraitCrop> {
    let band = &layout.portraits;
    let offsets = item_offsets(strip, band, layout.background_rgba());

    let crops = offsets.map(|&x| {
        let cell = band.item_rect(x);
        let inset = PixelRect::new(
            cell.x + 1,
            cell.y + 1,
            cell.width.saturating_sub(2),
            cell.height.saturating_sub(2),
        );
        PortraitCrop {
            interior: crop_region(strip, &inset),
            border: rgb_at(strip, cell.x, cell.y, layout.background),
        }
    });

    for &x in offsets.iter() {
        fill_region(strip, &band.item_rect(x), layout.background_rgba());
    }
    crops
}

/// Sample the book markers of a strip and paint their cells over.
pub fn take_books(strip: &mut RgbaImage, layout: &LayoutConfig) -> Slots<[u8; 3]> {
    let band = &layout.books;
    let offsets = item_offsets(strip, band, layout.background_rgba());

    let colors = offsets.map(|&x| rgb_at(strip, x + band.item_width / 2, band.probe_y, layout.background));

    for &x in offsets.iter() {
        fill_region(strip, &band.item_rect(x), layout.background_rgba());
    }
    colors
}
