//! Text-to-image rendering
//!
//! [`TextImageRenderer::render`] lays out the text ([`layout`]), turns the
//! layout into a display list ([`paint`]), executes it on an RGBA surface and
//! encodes PNG ([`raster`]). Every call owns its own surface.

pub mod layout;
pub mod paint;
pub mod raster;

use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::style::StyleProfile;
use crate::{Error, Result};
use layout::{layout_card, BitmapFont};

pub const DEFAULT_WIDTH: u32 = 300;
pub const DEFAULT_FONT_SIZE: u32 = 18;

/// Widest card accepted by [`TextImageRenderer::render`]
pub const MAX_WIDTH: u32 = 4096;
/// Largest font size accepted by [`TextImageRenderer::render`]
pub const MAX_FONT_SIZE: u32 = 512;
/// Upper bound on `width * height` of a laid-out card
pub const MAX_PIXELS: u64 = 4096 * 8192;

/// Input to a single render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub text: String,
    pub style: StyleProfile,
    /// Card width in pixels; the output is always exactly this wide
    pub width: u32,
    pub font_size: u32,
}

impl RenderRequest {
    /// Request with default width and font size. Unknown style ids use `simple`.
    pub fn new(text: impl Into<String>, style_id: &str) -> Self {
        Self {
            text: text.into(),
            style: StyleProfile::resolve(style_id).clone(),
            width: DEFAULT_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }
}

/// A rendered card
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
    pub line_count: usize,
}

impl RenderResult {
    /// Hex SHA-256 of the PNG bytes
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }

    /// `data:image/png;base64,...` form for embedding or previews
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png_data)
        )
    }
}

/// Stateless renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct TextImageRenderer;

impl TextImageRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, request: &RenderRequest) -> Result<RenderResult> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("text is empty".into()));
        }
        if request.width == 0 || request.font_size == 0 {
            return Err(Error::InvalidInput(format!(
                "width and font size must be positive (got {}x{})",
                request.width, request.font_size
            )));
        }
        if request.width > MAX_WIDTH || request.font_size > MAX_FONT_SIZE {
            return Err(Error::InvalidInput(format!(
                "width must be at most {} and font size at most {} (got {}x{})",
                MAX_WIDTH, MAX_FONT_SIZE, request.width, request.font_size
            )));
        }

        let style = &request.style;
        let font = BitmapFont::new(request.font_size);
        let layout = layout_card(text, request.width, style.padding, request.font_size, &font);
        log::debug!(
            "laid out {} line(s) on a {}x{} '{}' card",
            layout.lines.len(),
            layout.width,
            layout.height,
            style.id
        );
        if u64::from(layout.width) * u64::from(layout.height) > MAX_PIXELS {
            return Err(Error::RenderError(format!(
                "{}x{} card exceeds the {} pixel limit",
                layout.width, layout.height, MAX_PIXELS
            )));
        }

        let commands = paint::build_display_list(&layout, style, request.font_size);
        let surface = raster::rasterize(layout.width, layout.height, &commands);
        let png_data = raster::encode_png(&surface)?;

        Ok(RenderResult {
            width: layout.width,
            height: layout.height,
            png_data,
            line_count: layout.lines.len(),
        })
    }
}

/// Render `text` with the given style id at default size
pub fn render_text(text: &str, style_id: &str) -> Result<RenderResult> {
    TextImageRenderer::new().render(&RenderRequest::new(text, style_id))
}
