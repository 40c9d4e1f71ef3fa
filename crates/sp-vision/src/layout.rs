use serde::{Deserialize, Serialize};
use sp_capture::PixelRect;

/// Horizontal extent of a column inside a line strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub x: u32,
    pub width: u32,
}

impl Span {
    pub const fn new(x: u32, width: u32) -> Self {
        Self { x, width }
    }

    pub fn end(&self) -> u32 {
        self.x + self.width
    }
}

/// A column of zero, one or two equally sized items (portraits or book markers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandConfig {
    pub span: Span,
    /// Strip row scanned for the first and last non-background pixel.
    pub probe_y: u32,
    pub item_y: u32,
    pub item_width: u32,
    pub item_height: u32,
    /// Distance from the first item's left edge to the second's.
    pub spacing: u32,
    /// A scanned span wider than this holds two items.
    pub single_max_span: u32,
}

impl BandConfig {
    pub fn item_rect(&self, x: u32) -> PixelRect {
        PixelRect::new(x, self.item_y, self.item_width, self.item_height)
    }
}

/// Every fixed coordinate of the captured event log, relative to each strip.
///
/// A different capture resolution is a different `LayoutConfig`, not a code change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub frame_width: u32,
    pub line_count: usize,
    pub line_height: u32,
    /// Vertical distance between the tops of consecutive strips.
    pub line_stride: u32,
    pub actor: Span,
    pub timer: Span,
    /// Marker glyph telling the two timer formats apart, relative to the timer.
    pub timer_probe: PixelRect,
    /// Glyph x-offsets inside the timer for "M:SS.D".
    pub remaining_slots: Vec<u32>,
    /// Glyph x-offsets inside the timer for "SSS.D".
    pub elapsed_slots: Vec<u32>,
    pub digit_width: u32,
    pub text: Span,
    pub portraits: BandConfig,
    pub books: BandConfig,
    pub background: [u8; 3],
    pub highlight: [u8; 3],
    /// Columns past the end of a highlight bar holding its anti-aliased edge.
    pub aa_offset: u32,
    /// Luma above which a pixel counts as ink.
    pub threshold: u8,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            frame_width: 640,
            line_count: 30,
            line_height: 20,
            line_stride: 20,
            actor: Span::new(0, 40),
            timer: Span::new(44, 52),
            timer_probe: PixelRect::new(0, 0, 4, 20),
            remaining_slots: vec![4, 12, 20, 28, 36, 44],
            elapsed_slots: vec![12, 20, 28, 36, 44],
            digit_width: 8,
            text: Span::new(100, 360),
            portraits: BandConfig {
                span: Span::new(460, 120),
                probe_y: 10,
                item_y: 1,
                item_width: 18,
                item_height: 18,
                spacing: 22,
                single_max_span: 18,
            },
            books: BandConfig {
                span: Span::new(580, 60),
                probe_y: 10,
                item_y: 0,
                item_width: 8,
                item_height: 20,
                spacing: 12,
                single_max_span: 8,
            },
            background: [24, 24, 32],
            highlight: [255, 255, 255],
            aa_offset: 1,
            threshold: 128,
        }
    }
}

impl LayoutConfig {
    /// Height of a full frame.
    pub fn frame_height(&self) -> u32 {
        self.line_stride * self.line_count.saturating_sub(1) as u32 + self.line_height
    }

    /// Strip `index` of a frame, counted from the top.
    pub fn strip_rect(&self, index: usize) -> PixelRect {
        PixelRect::new(
            0,
            self.line_stride * index as u32,
            self.frame_width,
            self.line_height,
        )
    }

    pub fn column_rect(&self, span: Span) -> PixelRect {
        PixelRect::new(span.x, 0, span.width, self.line_height)
    }

    pub fn background_rgba(&self) -> image::Rgba<u8> {
        let [r, g, b] = self.background;
        image::Rgba([r, g, b, 255])
    }
}
