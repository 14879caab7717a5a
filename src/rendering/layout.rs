/// Text measuring and card layout
///
/// Wrapping works one character at a time, not per word: the card text is
/// usually CJK, which may break between any two characters.

use font8x8::{
    UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, HIRAGANA_FONTS, LATIN_FONTS,
    MISC_FONTS,
};

/// Space below the text reserved for decorations and a signature
pub const BOTTOM_MARGIN: u32 = 60;

/// Line height as a multiple of the font size
pub const LINE_HEIGHT_RATIO: f32 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Something that can report the rendered width of a run of text in pixels
pub trait TextMeasure {
    fn measure(&self, text: &str) -> f32;
}

/// The built-in face: 8x8 bitmap glyphs stretched to the requested size.
///
/// Half-width characters advance `ceil(0.6 * size)` pixels, full-width (CJK
/// and other East Asian) characters advance `size` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    pub size: u32,
}

impl BitmapFont {
    pub fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }

    pub fn is_wide(ch: char) -> bool {
        matches!(ch as u32,
            0x1100..=0x115F
            | 0x2E80..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x20000..=0x3FFFD)
    }

    pub fn advance(&self, ch: char) -> u32 {
        if Self::is_wide(ch) {
            self.size
        } else {
            self.size.saturating_mul(3).div_ceil(5)
        }
    }

    /// 8x8 bitmap for `ch`, one byte per row, least significant bit leftmost.
    /// `None` when the face has no glyph (painted as a hollow box).
    pub fn glyph(ch: char) -> Option<[u8; 8]> {
        BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .or_else(|| GREEK_FONTS.get(ch))
            .or_else(|| HIRAGANA_FONTS.get(ch))
            .or_else(|| BOX_FONTS.get(ch))
            .or_else(|| BLOCK_FONTS.get(ch))
            .or_else(|| MISC_FONTS.get(ch))
    }
}

impl TextMeasure for BitmapFont {
    fn measure(&self, text: &str) -> f32 {
        text.chars().map(|c| u64::from(self.advance(c))).sum::<u64>() as f32
    }
}

/// Greedy character-level wrap.
///
/// A character joins the current line while the measured width of the
/// extended line stays strictly below `max_width`. An empty line always
/// accepts its first character, so a character wider than `max_width` ends
/// up alone on its own line. `\n` forces a break.
pub fn wrap_chars<M: TextMeasure + ?Sized>(text: &str, max_width: f32, measure: &M) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        match ch {
            '\r' => continue,
            '\n' => {
                lines.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }

        if current.is_empty() {
            current.push(ch);
            continue;
        }

        current.push(ch);
        if measure.measure(&current) >= max_width {
            current.pop();
            lines.push(std::mem::replace(&mut current, ch.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// One wrapped line with its measured width and placement
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub text: String,
    pub rect: Rect,
}

/// Geometry of a whole card
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub line_height: f32,
    pub lines: Vec<LayoutLine>,
}

impl CardLayout {
    /// Width available to text between the side paddings
    pub fn content_width(&self) -> u32 {
        self.width.saturating_sub(self.padding.saturating_mul(2))
    }
}

/// Lay out `text` on a card `width` pixels wide.
///
/// Lines are centered horizontally and stacked from `padding` down at
/// `font_size * 1.5` intervals. The card height is the text block rounded up
/// plus both paddings plus [`BOTTOM_MARGIN`].
pub fn layout_card<M: TextMeasure + ?Sized>(
    text: &str,
    width: u32,
    padding: u32,
    font_size: u32,
    measure: &M,
) -> CardLayout {
    let usable = width.saturating_sub(padding.saturating_mul(2)) as f32;
    let line_height = font_size as f32 * LINE_HEIGHT_RATIO;

    let lines: Vec<LayoutLine> = wrap_chars(text, usable, measure)
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let line_w = measure.measure(&text);
            let x = ((width as f32 - line_w) / 2.0).floor() as i32;
            let y = (padding as f32 + i as f32 * line_height).floor() as i32;
            LayoutLine {
                rect: Rect {
                    x,
                    y,
                    width: line_w.ceil() as u32,
                    height: font_size,
                },
                text,
            }
        })
        .collect();

    // Float-to-int casts saturate, so oversized input pins at u32::MAX
    let text_height = (lines.len() as f32 * line_height).ceil() as u32;
    let height = text_height
        .saturating_add(padding.saturating_mul(2))
        .saturating_add(BOTTOM_MARGIN);

    CardLayout {
        width,
        height,
        padding,
        line_height,
        lines,
    }
}
