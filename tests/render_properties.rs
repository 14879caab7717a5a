//! Pixel-level checks on rendered cards

use word2pic::rendering::layout::{wrap_chars, BitmapFont, TextMeasure, BOTTOM_MARGIN};
use word2pic::{render_text, Error, RenderRequest, StyleProfile, TextImageRenderer};

struct Decoded {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Decoded {
    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }
}

fn decode(png_data: &[u8]) -> Decoded {
    let decoder = png::Decoder::new(png_data);
    let mut reader = decoder.read_info().expect("decode");
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).expect("frame");
    assert_eq!(info.color_type, png::ColorType::Rgba);
    buf.truncate(info.buffer_size());
    Decoded {
        width: info.width,
        height: info.height,
        rgba: buf,
    }
}

fn background(style: &str) -> [u8; 4] {
    StyleProfile::resolve(style).background.to_array()
}

#[test]
fn width_is_fixed_and_height_never_shrinks() {
    for style in ["simple", "literary", "business", "colorful"] {
        let mut last_height = 0;
        let mut text = String::new();
        for i in 0..60 {
            text.push(if i % 3 == 0 { '字' } else { 'a' });
            let card = render_text(&text, style).unwrap();
            assert_eq!(card.width, 300);
            assert!(card.height >= last_height, "{} shrank at {} chars", style, i + 1);
            last_height = card.height;
        }
    }
}

#[test]
fn png_dimensions_match_result() {
    let card = render_text("一二三四五六七八九十一二三四五六七八九十", "colorful").unwrap();
    let img = decode(&card.png_data);
    assert_eq!((img.width, img.height), (card.width, card.height));
    assert_eq!(card.line_count, 2);
}

#[test]
fn wrapped_lines_stay_inside_usable_width() {
    let font = BitmapFont::new(18);
    let text = "The quick brown fox 跳过了懒狗 and keeps running across the field, 一直跑到天黑。";
    for usable in [30.0, 100.0, 240.0] {
        for line in wrap_chars(text, usable, &font) {
            assert!(
                font.measure(&line) < usable || line.chars().count() == 1,
                "line {:?} too wide for {}",
                line,
                usable
            );
        }
    }
}

#[test]
fn two_lines_of_a_have_exact_height() {
    // 21 glyphs of 11px fit in 240px, the 22nd would not
    let card = render_text(&"A".repeat(22), "simple").unwrap();
    assert_eq!(card.line_count, 2);
    assert_eq!(card.height, 2 * 27 + 2 * 30 + BOTTOM_MARGIN);

    let one = render_text(&"A".repeat(21), "simple").unwrap();
    assert_eq!(one.line_count, 1);
}

#[test]
fn oversized_glyphs_still_render() {
    let req = RenderRequest::new("字字", "simple").with_width(70).with_font_size(40);
    let card = TextImageRenderer::new().render(&req).unwrap();
    assert_eq!(card.line_count, 2);
    assert_eq!(card.width, 70);
}

#[test]
fn only_colorful_has_a_gradient() {
    for style in ["simple", "literary", "business", "colorful"] {
        let card = render_text("hi", style).unwrap();
        let img = decode(&card.png_data);
        let top = img.pixel(0, 0);
        let bottom = img.pixel(0, img.height - 1);
        if style == "colorful" {
            assert_eq!(top, [0xff, 0x9a, 0x9e, 255]);
            assert_eq!(bottom, [0xfa, 0xd0, 0xc4, 255]);
        } else {
            assert_eq!(top, background(style), "{}", style);
            assert!((0..img.height).all(|y| img.pixel(0, y) == top), "{} not uniform", style);
        }
    }
}

#[test]
fn unknown_style_renders_like_simple() {
    let fallback = render_text("fallback", "vaporwave").unwrap();
    let simple = render_text("fallback", "simple").unwrap();
    assert_eq!(fallback.digest(), simple.digest());
    assert_eq!(fallback.height, simple.height);
}

/// Whether any pixel in the box differs from the left edge of its row.
/// Backgrounds are uniform along a row, gradient included.
fn region_touched(img: &Decoded, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> bool {
    ys.into_iter()
        .any(|y| xs.clone().any(|x| img.pixel(x, y) != img.pixel(0, y)))
}

// Quote glyphs are 36px wide cells centered on x = 40 and x = width - 40.
// Only the top 15 rows of the 60px glyph carry ink.

#[test]
fn upper_left_quote_only_on_literary() {
    for style in ["simple", "literary", "business", "colorful"] {
        let img = decode(&render_text("hi", style).unwrap().png_data);
        assert_eq!(region_touched(&img, 22..58, 40..100), style == "literary", "{}", style);
    }
}

#[test]
fn lower_right_quote_only_on_literary() {
    for style in ["simple", "literary", "business", "colorful"] {
        let img = decode(&render_text("hi", style).unwrap().png_data);
        let (w, h) = (img.width, img.height);
        assert_eq!(
            region_touched(&img, w - 58..w - 22, h - 80..h - 60),
            style == "literary",
            "{}",
            style
        );
    }
}

#[test]
fn quotes_are_faint() {
    let img = decode(&render_text("hi", "literary").unwrap().png_data);
    let bg = background("literary");
    let ink = StyleProfile::resolve("literary").text_color.to_array();
    let y = img.height - 80;
    let touched: Vec<_> = (img.width - 58..img.width - 22)
        .map(|x| img.pixel(x, y))
        .filter(|p| *p != bg)
        .collect();
    assert!(!touched.is_empty());
    for p in touched {
        assert_ne!(p, ink);
        // 10% of the way from background to text color
        for c in 0..3 {
            let expected = f32::from(bg[c]) + (f32::from(ink[c]) - f32::from(bg[c])) * 0.1;
            assert!((f32::from(p[c]) - expected).abs() <= 1.0, "{:?}", p);
        }
    }
}

#[test]
fn height_covers_padding_and_one_line_for_every_style() {
    for style in ["simple", "literary", "business", "colorful"] {
        let padding = StyleProfile::resolve(style).padding;
        for size in [12, 18, 25, 40] {
            let req = RenderRequest::new("x", style).with_font_size(size);
            let card = TextImageRenderer::new().render(&req).unwrap();
            let line_height = (size as f32 * 1.5).ceil() as u32;
            assert!(
                card.height >= 2 * padding + line_height,
                "{} at {}px: {}",
                style,
                size,
                card.height
            );
            assert_eq!(card.height, 2 * padding + line_height + BOTTOM_MARGIN);
        }
    }
}

#[test]
fn rule_only_on_business() {
    let has_rule = |style: &str| {
        let card = render_text("hi", style).unwrap();
        let img = decode(&card.png_data);
        let y = img.height - 40;
        // inside the rule span vs. outside it on the same row
        img.pixel(150, y) != img.pixel(5, y)
    };
    assert!(has_rule("business"));
    assert!(!has_rule("simple"));
    assert!(!has_rule("colorful"));
    assert!(!has_rule("literary"));
}

#[test]
fn blank_text_is_rejected() {
    assert!(matches!(render_text("\n  \t", "business"), Err(Error::InvalidInput(_))));
}
