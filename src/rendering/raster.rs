/// Software rasterizer for paint commands, plus PNG encoding

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::rendering::layout::BitmapFont;
use crate::rendering::paint::PaintCommand;
use crate::Result;

/// Source-over blend of `src` onto `dst`
fn blend_pixel(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let a = f32::from(src[3]) / 255.0;
    if a <= 0.0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }
    let inv = 1.0 - a;
    let mix = |d: u8, s: u8| (f32::from(d) * inv + f32::from(s) * a).round().clamp(0.0, 255.0) as u8;
    let out_a = (f32::from(dst[3]) + f32::from(src[3]) * inv).round().clamp(0.0, 255.0) as u8;
    Rgba([mix(dst[0], src[0]), mix(dst[1], src[1]), mix(dst[2], src[2]), out_a])
}

fn rgba((r, g, b, a): (u8, u8, u8, u8)) -> Rgba<u8> {
    Rgba([r, g, b, a])
}

fn put_blended(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let dst = *img.get_pixel(x as u32, y as u32);
    img.put_pixel(x as u32, y as u32, blend_pixel(dst, color));
}

fn fill_rect(img: &mut RgbaImage, x: i32, y: i32, width: u32, height: u32, color: Rgba<u8>) {
    for py in y..y + height as i32 {
        for px in x..x + width as i32 {
            put_blended(img, px, py, color);
        }
    }
}

fn fill_gradient(img: &mut RgbaImage, x: i32, y: i32, width: u32, height: u32, top: Rgba<u8>, bottom: Rgba<u8>) {
    let span = height.saturating_sub(1).max(1) as f32;
    for row in 0..height {
        let t = row as f32 / span;
        let lerp = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        let color = Rgba([
            lerp(top[0], bottom[0]),
            lerp(top[1], bottom[1]),
            lerp(top[2], bottom[2]),
            lerp(top[3], bottom[3]),
        ]);
        for px in x..x + width as i32 {
            put_blended(img, px, y + row as i32, color);
        }
    }
}

/// Draw one glyph cell of `cell_w` x `size` pixels with nearest-neighbour
/// sampling of the 8x8 bitmap. Characters without a bitmap get a hollow box.
fn draw_glyph(img: &mut RgbaImage, ch: char, x: i32, y: i32, cell_w: u32, size: u32, color: Rgba<u8>) {
    let Some(bitmap) = BitmapFont::glyph(ch) else {
        if ch.is_whitespace() {
            return;
        }
        let inset = (size / 8).max(1) as i32;
        let (x0, y0) = (x + inset, y + inset);
        let (x1, y1) = (x + cell_w as i32 - inset - 1, y + size as i32 - inset - 1);
        for px in x0..=x1 {
            put_blended(img, px, y0, color);
            put_blended(img, px, y1, color);
        }
        for py in y0 + 1..y1 {
            put_blended(img, x0, py, color);
            put_blended(img, x1, py, color);
        }
        return;
    };

    for gy in 0..size {
        let row = bitmap[(gy * 8 / size) as usize];
        if row == 0 {
            continue;
        }
        for gx in 0..cell_w {
            let col = gx * 8 / cell_w;
            if (row >> col) & 1 == 1 {
                put_blended(img, x + gx as i32, y + gy as i32, color);
            }
        }
    }
}

fn draw_text(img: &mut RgbaImage, x: i32, y: i32, text: &str, size: u32, color: Rgba<u8>) {
    let font = BitmapFont::new(size);
    let mut cursor_x = x;
    for ch in text.chars() {
        let adv = font.advance(ch);
        draw_glyph(img, ch, cursor_x, y, adv, font.size, color);
        cursor_x += adv as i32;
    }
}

/// Execute `commands` in order on a fresh transparent surface
pub fn rasterize(width: u32, height: u32, commands: &[PaintCommand]) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    for cmd in commands {
        match cmd {
            PaintCommand::SolidRect { x, y, width, height, rgba: c } => {
                fill_rect(&mut img, *x, *y, *width, *height, rgba(*c));
            }
            PaintCommand::LinearGradient { x, y, width, height, top, bottom } => {
                fill_gradient(&mut img, *x, *y, *width, *height, rgba(*top), rgba(*bottom));
            }
            PaintCommand::Text { x, y, text, size, rgba: c } => {
                draw_text(&mut img, *x, *y, text, *size, rgba(*c));
            }
            PaintCommand::HLine { x0, x1, y, thickness, rgba: c } => {
                let width = (x1 - x0).max(0) as u32;
                fill_rect(&mut img, *x0, *y, width, *thickness, rgba(*c));
            }
        }
    }
    img
}

/// Encode a surface as PNG
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}
