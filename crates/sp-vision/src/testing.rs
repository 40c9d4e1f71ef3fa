//! Synthetic frames with a vocabulary that recognizes exactly what was drawn.

use image::{GrayImage, Luma, Rgba, RgbaImage};
use sp_capture::{fill_region, PixelRect};
use sp_data::{Actor, Character, Fingerprint, TimerFormat, Vocabulary};

use crate::LayoutConfig;

const INK: Rgba<u8> = Rgba([255, 255, 255, 255]);
const ACTOR_INK: Rgba<u8> = Rgba([200, 40, 40, 255]);
const FACE: Rgba<u8> = Rgba([90, 70, 60, 255]);
const FACE_INK: Rgba<u8> = Rgba([220, 190, 150, 255]);

/// Pseudo-random glyph pixels for `seed`, kept one pixel clear of the edges.
fn ink_points(seed: &str, width: u32, height: u32) -> Vec<(u32, u32)> {
    let mut h: u32 = 0x811c_9dc5;
    for b in seed.bytes() {
        h = (h ^ b as u32).wrapping_mul(0x0100_0193);
    }
    h |= 1;

    let mut points = Vec::new();
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            h ^= h << 13;
            h ^= h >> 17;
            h ^= h << 5;
            if h % 4 == 0 {
                points.push((x, y));
            }
        }
    }
    if points.is_empty() {
        points.push((width / 2, height / 2));
    }
    points
}

fn ink_image(seed: &str, width: u32, height: u32) -> GrayImage {
    let mut image = GrayImage::from_pixel(width, height, Luma([255]));
    for (x, y) in ink_points(seed, width, height) {
        image.put_pixel(x, y, Luma([0]));
    }
    image
}

fn colored_image(seed: &str, width: u32, height: u32, base: Rgba<u8>, ink: Rgba<u8>) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(width, height, base);
    for (x, y) in ink_points(seed, width, height) {
        image.put_pixel(x, y, ink);
    }
    image
}

fn format_seed(format: TimerFormat) -> &'static str {
    match format {
        TimerFormat::Remaining => "probe:remaining",
        TimerFormat::Elapsed => "probe:elapsed",
    }
}

pub struct Painter {
    layout: LayoutConfig,
    frame: RgbaImage,
    vocabulary: Vocabulary,
}

impl Painter {
    pub fn new(layout: LayoutConfig) -> Self {
        let frame = RgbaImage::from_pixel(
            layout.frame_width,
            layout.frame_height(),
            layout.background_rgba(),
        );
        let mut vocabulary = Vocabulary::default();

        let probe = layout.timer_probe;
        for format in [TimerFormat::Remaining, TimerFormat::Elapsed] {
            let glyph = ink_image(format_seed(format), probe.width, probe.height);
            vocabulary
                .timer_formats
                .insert(Fingerprint::of(glyph.as_raw()), format);
        }
        for c in "0123456789:.-".chars() {
            let glyph = ink_image(&format!("glyph:{}", c), layout.digit_width, layout.line_height);
            vocabulary.digits.insert(Fingerprint::of(glyph.as_raw()), c);
        }
        for actor in [Actor::Spy, Actor::Sniper, Actor::Game] {
            let icon = Self::actor_icon(&layout, actor);
            vocabulary.actors.insert(Fingerprint::of(icon.as_raw()), actor);
        }

        Self {
            layout,
            frame,
            vocabulary,
        }
    }

    fn actor_icon(layout: &LayoutConfig, actor: Actor) -> RgbaImage {
        colored_image(
            &format!("actor:{}", actor),
            layout.actor.width,
            layout.line_height,
            layout.background_rgba(),
            ACTOR_INK,
        )
    }

    fn top(&self, line: usize) -> u32 {
        self.layout.strip_rect(line).y
    }

    fn blit(&mut self, image: &RgbaImage, x: u32, y: u32, background: Rgba<u8>) {
        for (ix, iy, p) in image.enumerate_pixels() {
            if *p != background {
                self.frame.put_pixel(x + ix, y + iy, *p);
            }
        }
    }

    fn blit_ink(&mut self, seed: &str, x: u32, y: u32, width: u32) {
        for (ix, iy) in ink_points(seed, width, self.layout.line_height) {
            self.frame.put_pixel(x + ix, y + iy, INK);
        }
    }

    /// A complete line: actor icon, timer and text.
    pub fn line(&mut self, line: usize, actor: Actor, timer: Option<&str>, text: &str) {
        self.actor(line, actor);
        self.timer(line, timer);
        self.text(line, text);
    }

    pub fn actor(&mut self, line: usize, actor: Actor) {
        let icon = Self::actor_icon(&self.layout, actor);
        let (x, y) = (self.layout.actor.x, self.top(line));
        self.blit(&icon, x, y, self.layout.background_rgba());
    }

    /// Six glyphs draw a remaining-time reading, five an elapsed one.
    pub fn timer(&mut self, line: usize, glyphs: Option<&str>) {
        let Some(glyphs) = glyphs else {
            return;
        };
        let format = if glyphs.chars().count() == self.layout.remaining_slots.len() {
            TimerFormat::Remaining
        } else {
            TimerFormat::Elapsed
        };
        let slots = match format {
            TimerFormat::Remaining => self.layout.remaining_slots.clone(),
            TimerFormat::Elapsed => self.layout.elapsed_slots.clone(),
        };
        let (x, y) = (self.layout.timer.x, self.top(line));
        let probe = self.layout.timer_probe;

        for (px, py) in ink_points(format_seed(format), probe.width, probe.height) {
            self.frame.put_pixel(x + probe.x + px, y + probe.y + py, INK);
        }
        for (offset, c) in slots.into_iter().zip(glyphs.chars()) {
            if c != ' ' {
                self.blit_ink(&format!("glyph:{}", c), x + offset, y, self.layout.digit_width);
            }
        }
    }

    pub fn text(&mut self, line: usize, text: &str) {
        let span = self.layout.text;
        let expected = ink_image(&format!("text:{}", text), span.width, self.layout.line_height);
        self.vocabulary
            .events
            .insert(Fingerprint::of(expected.as_raw()), text.to_string());
        let y = self.top(line);
        self.blit_ink(&format!("text:{}", text), span.x, y, span.width);
    }

    pub fn forget_event(&mut self, text: &str) {
        self.vocabulary.events.retain(|_, v| v != text);
    }

    /// Portrait of `character` framed in `role_color`, with its left edge at `x`.
    pub fn portrait(&mut self, line: usize, x: u32, character: Character, role_color: [u8; 3]) {
        let band = self.layout.portraits;
        let (w, h) = (band.item_width - 2, band.item_height - 2);
        let interior = colored_image(&format!("portrait:{:?}", character), w, h, FACE, FACE_INK);
        self.vocabulary
            .portraits
            .insert(Fingerprint::of(interior.as_raw()), character);

        let y = self.top(line) + band.item_y;
        let [r, g, b] = role_color;
        fill_region(
            &mut self.frame,
            &PixelRect::new(x, y, band.item_width, band.item_height),
            Rgba([r, g, b, 255]),
        );
        self.blit(&interior, x + 1, y + 1, Rgba([0, 0, 0, 0]));
    }

    pub fn book(&mut self, line: usize, x: u32, color: [u8; 3]) {
        let band = self.layout.books;
        let y = self.top(line) + band.item_y;
        let [r, g, b] = color;
        fill_region(
            &mut self.frame,
            &PixelRect::new(x, y, band.item_width, band.item_height),
            Rgba([r, g, b, 255]),
        );
    }

    /// Highlight bar over the actor column, with an anti-aliased trailing edge.
    pub fn highlight(&mut self, line: usize) {
        let [r, g, b] = self.layout.highlight;
        let bar = Rgba([r, g, b, 255]);
        let background = self.layout.background_rgba();
        let top = self.top(line);
        let end = self.layout.actor.end();
        for y in top..top + self.layout.line_height {
            for x in 0..end {
                if *self.frame.get_pixel(x, y) == background {
                    self.frame.put_pixel(x, y, bar);
                }
            }
            self.frame
                .put_pixel(end - 1 + self.layout.aa_offset, y, Rgba([140, 140, 150, 255]));
        }
    }

    pub fn vocabulary_mut(&mut self) -> &mut Vocabulary {
        &mut self.vocabulary
    }

    pub fn finish(self) -> (RgbaImage, Vocabulary) {
        (self.frame, self.vocabulary)
    }
}
