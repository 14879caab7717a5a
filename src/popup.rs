//! The popup controller.
//!
//! One component for both output modes: [`RenderMode::Local`] draws the card
//! with [`TextImageRenderer`], [`RenderMode::Remote`] asks the provider for a
//! picture instead. UI events arrive by name and are routed through a
//! dispatch table.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::ai::ModelProvider;
use crate::config::{AppConfig, RenderMode};
use crate::export::{self, ClipboardSink, MemoryClipboard};
use crate::rendering::{RenderRequest, RenderResult, TextImageRenderer};
use crate::session::SessionHandle;
use crate::store::{ImageRef, JsonFileStore, MemoryStore, SavedState, StateStore};
use crate::style::StyleProfile;
use crate::{Error, Result};

pub const EV_INPUT: &str = "input";
pub const EV_SELECT_STYLE: &str = "select-style";
pub const EV_GENERATE: &str = "generate";
pub const EV_SUMMARIZE: &str = "summarize";
pub const EV_SAVE: &str = "save";
pub const EV_COPY: &str = "copy";
pub const EV_PIN: &str = "pin";

type Handler = fn(&mut Popup, Option<&str>) -> Result<Outcome>;

/// What the popup is currently showing
#[derive(Debug, Clone)]
pub enum Output {
    Rendered(RenderResult),
    Remote { url: String },
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    TextUpdated,
    StyleSelected(&'static str),
    Rendered {
        width: u32,
        height: u32,
        line_count: usize,
    },
    RemoteImage { url: String },
    Summarized(String),
    Saved(PathBuf),
    Copied,
    Pinned(bool),
}

pub struct Popup {
    config: AppConfig,
    renderer: TextImageRenderer,
    store: Arc<dyn StateStore>,
    provider: Option<Arc<dyn ModelProvider>>,
    clipboard: Arc<dyn ClipboardSink>,
    session: Option<SessionHandle>,

    text: String,
    style: &'static str,
    output: Option<Output>,
    restored: Option<ImageRef>,
    disabled_until: HashMap<&'static str, Instant>,
    handlers: HashMap<&'static str, Handler>,
}

impl fmt::Debug for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Popup")
            .field("mode", &self.config.mode)
            .field("style", &self.style)
            .field("text_len", &self.text.len())
            .field("has_output", &self.output.is_some())
            .finish_non_exhaustive()
    }
}

impl Popup {
    /// Popup with the configured store, an in-memory clipboard and no provider
    pub fn new(config: AppConfig) -> Self {
        let store: Arc<dyn StateStore> = match &config.store_path {
            Some(path) => {
                let store = JsonFileStore::new(path.clone());
                log::debug!("popup state file: {}", store.path().display());
                Arc::new(store)
            }
            None => Arc::new(MemoryStore::new()),
        };
        let style = StyleProfile::resolve(&config.default_style).id;

        let mut handlers: HashMap<&'static str, Handler> = HashMap::new();
        handlers.insert(EV_INPUT, Popup::on_input);
        handlers.insert(EV_SELECT_STYLE, Popup::on_select_style);
        handlers.insert(EV_GENERATE, Popup::on_generate);
        handlers.insert(EV_SUMMARIZE, Popup::on_summarize);
        handlers.insert(EV_SAVE, Popup::on_save);
        handlers.insert(EV_COPY, Popup::on_copy);
        handlers.insert(EV_PIN, Popup::on_pin);

        Self {
            config,
            renderer: TextImageRenderer::new(),
            store,
            provider: None,
            clipboard: Arc::new(MemoryClipboard::new()),
            session: None,
            text: String::new(),
            style,
            output: None,
            restored: None,
            disabled_until: HashMap::new(),
            handlers,
        }
    }

    /// Popup wired to the HTTP provider when an API key is configured
    pub fn from_config(config: AppConfig) -> Result<Self> {
        #[cfg(feature = "remote")]
        {
            if config.api.api_key.is_some() {
                let client = crate::ai::ArkClient::new(config.api.clone())?;
                return Ok(Self::new(config).with_provider(Arc::new(client)));
            }
        }
        Ok(Self::new(config))
    }

    pub fn with_provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_session(mut self, session: SessionHandle) -> Self {
        self.session = Some(session);
        self
    }

    /// Restore the last text and image reference from the store.
    ///
    /// Unreadable saved state is logged and replaced by the empty state; the
    /// next successful action overwrites it.
    pub fn open(&mut self) -> Result<SavedState> {
        let saved = match self.store.load() {
            Ok(saved) => saved,
            Err(Error::StorageError(e)) => {
                log::warn!("ignoring unreadable saved state: {}", e);
                SavedState::default()
            }
            Err(e) => return Err(e),
        };
        if let Some(text) = &saved.last_text {
            self.text = text.clone();
        }
        self.restored = saved.last_image.clone();
        log::debug!("popup opened, restored text: {}", saved.last_text.is_some());
        Ok(saved)
    }

    /// Route a named UI event to its handler
    pub fn dispatch(&mut self, event: &str, arg: Option<&str>) -> Result<Outcome> {
        let handler = *self
            .handlers
            .get(event)
            .ok_or_else(|| Error::Other(format!("unknown event '{}'", event)))?;
        handler(self, arg)
    }

    pub fn events(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &'static str {
        self.style
    }

    pub fn mode(&self) -> RenderMode {
        self.config.mode
    }

    pub fn output(&self) -> Option<&Output> {
        self.output.as_ref()
    }

    /// Image reference restored by [`Popup::open`]
    pub fn restored_image(&self) -> Option<&ImageRef> {
        self.restored.as_ref()
    }

    /// Whether `control` can be triggered right now
    pub fn is_enabled(&self, control: &str) -> bool {
        self.disabled_until
            .get(control)
            .map_or(true, |until| Instant::now() >= *until)
    }

    fn ensure_enabled(&self, control: &'static str) -> Result<()> {
        if let Some(until) = self.disabled_until.get(control) {
            let now = Instant::now();
            if now < *until {
                return Err(Error::Cooldown {
                    control: control.to_string(),
                    remaining_ms: (*until - now).as_millis() as u64,
                });
            }
        }
        Ok(())
    }

    /// Run a remote call for `control`, disabling it for the cooldown on failure
    fn remote_call<T>(
        &mut self,
        control: &'static str,
        call: impl FnOnce(&dyn ModelProvider) -> Result<T>,
    ) -> Result<T> {
        self.ensure_enabled(control)?;
        let provider = self
            .provider
            .clone()
            .ok_or_else(|| Error::ConfigError("no model provider configured".into()))?;

        match call(provider.as_ref()) {
            Ok(v) => {
                self.disabled_until.remove(control);
                Ok(v)
            }
            Err(e) => {
                if e.is_remote_failure() {
                    log::warn!("{} failed: {}", control, e);
                    self.disabled_until
                        .insert(control, Instant::now() + self.config.cooldown());
                }
                Err(e)
            }
        }
    }

    fn current_text(&self) -> Result<&str> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("please enter some text".into()));
        }
        Ok(text)
    }

    fn persist(&self, image: Option<ImageRef>) {
        let state = SavedState {
            last_text: Some(self.text.clone()),
            last_image: image.or_else(|| self.restored.clone()),
        };
        if let Err(e) = self.store.save(&state) {
            log::warn!("failed to persist popup state: {}", e);
        }
    }

    fn render_local(&mut self) -> Result<Outcome> {
        let request = RenderRequest {
            text: self.current_text()?.to_string(),
            style: StyleProfile::resolve(self.style).clone(),
            width: self.config.width,
            font_size: self.config.font_size,
        };
        let result = self.renderer.render(&request)?;
        let outcome = Outcome::Rendered {
            width: result.width,
            height: result.height,
            line_count: result.line_count,
        };
        let image = ImageRef::rendered(&result, None);
        self.restored = Some(image.clone());
        self.output = Some(Output::Rendered(result));
        self.persist(Some(image));
        Ok(outcome)
    }

    fn rendered(&self) -> Result<&RenderResult> {
        match &self.output {
            Some(Output::Rendered(r)) => Ok(r),
            _ => Err(Error::ExportError("no rendered image yet".into())),
        }
    }

    fn on_input(&mut self, arg: Option<&str>) -> Result<Outcome> {
        self.text = arg.unwrap_or_default().to_string();
        Ok(Outcome::TextUpdated)
    }

    fn on_select_style(&mut self, arg: Option<&str>) -> Result<Outcome> {
        let id = arg.ok_or_else(|| Error::InvalidInput("no style given".into()))?;
        self.style = StyleProfile::resolve(id).id;
        if matches!(self.output, Some(Output::Rendered(_))) {
            return self.render_local();
        }
        Ok(Outcome::StyleSelected(self.style))
    }

    fn on_generate(&mut self, _arg: Option<&str>) -> Result<Outcome> {
        match self.config.mode {
            RenderMode::Local => self.render_local(),
            RenderMode::Remote => {
                let prompt = self.current_text()?.to_string();
                let url = self.remote_call(EV_GENERATE, |p| p.generate_image(&prompt))?;
                let image = ImageRef::Remote { url: url.clone() };
                self.restored = Some(image.clone());
                self.output = Some(Output::Remote { url: url.clone() });
                self.persist(Some(image));
                Ok(Outcome::RemoteImage { url })
            }
        }
    }

    fn on_summarize(&mut self, _arg: Option<&str>) -> Result<Outcome> {
        let text = self.current_text()?.to_string();
        let summary = self.remote_call(EV_SUMMARIZE, |p| p.summarize(&text))?;
        self.text = summary.clone();
        self.persist(None);
        Ok(Outcome::Summarized(summary))
    }

    fn on_save(&mut self, arg: Option<&str>) -> Result<Outcome> {
        let dir = PathBuf::from(arg.unwrap_or("."));
        let result = self.rendered()?;
        let path = export::save_to_dir(result, &dir)?;
        let image = ImageRef::rendered(result, Some(path.clone()));
        self.restored = Some(image.clone());
        self.persist(Some(image));
        Ok(Outcome::Saved(path))
    }

    fn on_copy(&mut self, _arg: Option<&str>) -> Result<Outcome> {
        let result = self.rendered()?;
        self.clipboard.copy_png(&result.png_data)?;
        Ok(Outcome::Copied)
    }

    fn on_pin(&mut self, arg: Option<&str>) -> Result<Outcome> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| Error::ConfigError("no session attached".into()))?;
        let pinned = match arg.map(str::trim) {
            Some("true") | Some("on") | Some("1") => true,
            Some("false") | Some("off") | Some("0") => false,
            None => !session.is_pinned()?,
            Some(other) => {
                return Err(Error::InvalidInput(format!("bad pin value '{}'", other)));
            }
        };
        session.set_pinned(pinned)?;
        Ok(Outcome::Pinned(pinned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_table_lists_every_event() {
        let p = Popup::new(AppConfig::default());
        assert_eq!(
            p.events(),
            vec!["copy", "generate", "input", "pin", "save", "select-style", "summarize"]
        );
    }

    #[test]
    fn unknown_event_is_an_error() {
        let mut p = Popup::new(AppConfig::default());
        assert!(matches!(p.dispatch("explode", None), Err(Error::Other(_))));
    }

    #[test]
    fn generate_without_text_is_invalid_input() {
        let mut p = Popup::new(AppConfig::default());
        p.dispatch(EV_INPUT, Some("   ")).unwrap();
        assert!(matches!(p.dispatch(EV_GENERATE, None), Err(Error::InvalidInput(_))));
        assert!(p.output().is_none());
    }

    #[test]
    fn style_change_rerenders_existing_card() {
        let mut p = Popup::new(AppConfig::default());
        assert_eq!(p.dispatch(EV_SELECT_STYLE, Some("business")).unwrap(), Outcome::StyleSelected("business"));

        p.dispatch(EV_INPUT, Some("hello")).unwrap();
        p.dispatch(EV_GENERATE, None).unwrap();
        let first = match p.output() {
            Some(Output::Rendered(r)) => r.digest(),
            _ => panic!("expected rendered output"),
        };

        let outcome = p.dispatch(EV_SELECT_STYLE, Some("literary")).unwrap();
        assert!(matches!(outcome, Outcome::Rendered { line_count: 1, .. }));
        match p.output() {
            Some(Output::Rendered(r)) => assert_ne!(r.digest(), first),
            _ => panic!("expected rendered output"),
        }
        assert_eq!(p.style(), "literary");
    }

    #[test]
    fn save_and_copy_need_a_rendered_card() {
        let mut p = Popup::new(AppConfig::default());
        assert!(matches!(p.dispatch(EV_COPY, None), Err(Error::ExportError(_))));
        assert!(matches!(p.dispatch(EV_SAVE, Some("/nonexistent")), Err(Error::ExportError(_))));
    }

    #[test]
    fn summarize_without_provider_is_config_error() {
        let mut p = Popup::new(AppConfig::default());
        p.dispatch(EV_INPUT, Some("text")).unwrap();
        assert!(matches!(p.dispatch(EV_SUMMARIZE, None), Err(Error::ConfigError(_))));
        // not a remote failure, so no cooldown
        assert!(p.is_enabled(EV_SUMMARIZE));
    }

    #[test]
    fn pin_toggles_through_session() {
        let mut p = Popup::new(AppConfig::default());
        assert!(matches!(p.dispatch(EV_PIN, None), Err(Error::ConfigError(_))));

        let session = SessionHandle::spawn();
        let mut p = p.with_session(session.clone());
        assert_eq!(p.dispatch(EV_PIN, None).unwrap(), Outcome::Pinned(true));
        assert!(session.is_pinned().unwrap());
        assert_eq!(p.dispatch(EV_PIN, Some("off")).unwrap(), Outcome::Pinned(false));
        assert!(matches!(p.dispatch(EV_PIN, Some("maybe")), Err(Error::InvalidInput(_))));
    }
}
