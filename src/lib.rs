//! word2pic
//!
//! Turn a snippet of text into a shareable PNG card, with optional help from a
//! remote model provider.
//!
//! # Features
//!
//! - **Local rendering**: character-level wrapping, adaptive card height and a
//!   handful of style presets (`simple`, `literary`, `business`, `colorful`)
//! - **Remote provider** (`remote`, default): summarize text or replace the
//!   local card with a generated picture
//! - **Popup controller**: one dispatch table for both modes, with persisted
//!   last text / last image and per-control cooldowns after failures
//!
//! # Example
//!
//! ```
//! use word2pic::{RenderRequest, TextImageRenderer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = RenderRequest::new("床前明月光，疑是地上霜。", "literary");
//! let card = TextImageRenderer::new().render(&request)?;
//! assert_eq!(card.width, 300);
//! assert_eq!(&card.png_data[1..4], b"PNG");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{ApiConfig, AppConfig, RenderMode};

pub mod style;
pub use style::{Color, Decoration, Gradient, StyleProfile};

pub mod rendering;
pub use rendering::{render_text, RenderRequest, RenderResult, TextImageRenderer};

// Summarization / image generation provider; the HTTP client is behind `remote`
pub mod ai;

pub mod export;
pub mod popup;
pub mod session;
pub mod store;

pub use popup::{Outcome, Output, Popup};
pub use session::{HostEvent, SessionHandle};
