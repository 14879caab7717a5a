/// Paint commands for a laid-out card

use crate::rendering::layout::{BitmapFont, CardLayout};
use crate::style::{Color, Decoration, StyleProfile};

/// Size of the decorative quotation marks
pub const QUOTE_GLYPH_SIZE: u32 = 60;
/// Inset of the quotation marks from the left/top and right/bottom edges
pub const QUOTE_INSET: i32 = 40;
/// The rule sits this far above the bottom edge
pub const RULE_OFFSET: u32 = 40;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        rgba: (u8, u8, u8, u8),
    },
    /// Vertical gradient, `top` on the first row and `bottom` on the last
    LinearGradient {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        top: (u8, u8, u8, u8),
        bottom: (u8, u8, u8, u8),
    },
    /// Text whose top-left corner is at (x, y)
    Text {
        x: i32,
        y: i32,
        text: String,
        size: u32,
        rgba: (u8, u8, u8, u8),
    },
    HLine {
        x0: i32,
        x1: i32,
        y: i32,
        thickness: u32,
        rgba: (u8, u8, u8, u8),
    },
}

fn tuple(c: Color) -> (u8, u8, u8, u8) {
    (c.r, c.g, c.b, c.a)
}

/// Build the full display list for a card: background, text, decoration.
pub fn build_display_list(layout: &CardLayout, style: &StyleProfile, font_size: u32) -> Vec<PaintCommand> {
    let mut cmds = Vec::with_capacity(layout.lines.len() + 3);

    cmds.push(match style.gradient {
        Some(g) => PaintCommand::LinearGradient {
            x: 0,
            y: 0,
            width: layout.width,
            height: layout.height,
            top: tuple(g.top),
            bottom: tuple(g.bottom),
        },
        None => PaintCommand::SolidRect {
            x: 0,
            y: 0,
            width: layout.width,
            height: layout.height,
            rgba: tuple(style.background),
        },
    });

    for line in &layout.lines {
        if line.text.is_empty() {
            continue;
        }
        cmds.push(PaintCommand::Text {
            x: line.rect.x,
            y: line.rect.y,
            text: line.text.clone(),
            size: font_size,
            rgba: tuple(style.text_color),
        });
    }

    cmds.extend(decoration_commands(layout, style));
    cmds
}

fn decoration_commands(layout: &CardLayout, style: &StyleProfile) -> Vec<PaintCommand> {
    let width = layout.width as i32;
    let height = layout.height as i32;

    match style.decoration {
        Decoration::None => Vec::new(),
        Decoration::QuoteMarks => {
            let rgba = tuple(style.text_color.with_opacity(0.1));
            // Anchors are glyph centers horizontally, glyph tops vertically
            let half = BitmapFont::new(QUOTE_GLYPH_SIZE).advance('"') as i32 / 2;
            vec![
                PaintCommand::Text {
                    x: QUOTE_INSET - half,
                    y: QUOTE_INSET,
                    text: "\"".into(),
                    size: QUOTE_GLYPH_SIZE,
                    rgba,
                },
                PaintCommand::Text {
                    x: width - QUOTE_INSET - half,
                    y: height - 2 * QUOTE_INSET,
                    text: "\"".into(),
                    size: QUOTE_GLYPH_SIZE,
                    rgba,
                },
            ]
        }
        Decoration::UnderlineRule => vec![PaintCommand::HLine {
            x0: layout.padding as i32,
            x1: width - layout.padding as i32,
            y: height - RULE_OFFSET as i32,
            thickness: 1,
            rgba: tuple(Color::WHITE.with_opacity(0.3)),
        }],
    }
}
