//! Session state with a single owner.
//!
//! A worker thread owns the "pinned" flag. Everything else talks to it over a
//! channel: each command carries a oneshot sender for its reply, and
//! [`SessionHandle`] offers blocking and async accessors on top.

use std::sync::mpsc::{self, Sender};
use std::thread;

use tokio::sync::oneshot;

use crate::{Error, Result};

/// Host events that may bring a pinned popup back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// A tab changed; `complete` when it finished loading
    TabUpdated { complete: bool },
    /// Focus moved; `None` when no window has focus
    FocusChanged { window: Option<u32> },
}

#[derive(Debug, Default)]
struct SessionState {
    pinned: bool,
}

impl SessionState {
    fn should_reopen(&self, event: HostEvent) -> bool {
        if !self.pinned {
            return false;
        }
        match event {
            HostEvent::TabUpdated { complete } => complete,
            HostEvent::FocusChanged { window } => window.is_some(),
        }
    }
}

enum Command {
    SetPinned(bool, oneshot::Sender<()>),
    IsPinned(oneshot::Sender<bool>),
    Notify(HostEvent, oneshot::Sender<bool>),
    Close(oneshot::Sender<()>),
}

/// Cloneable handle to the session worker
#[derive(Clone)]
pub struct SessionHandle {
    cmd_tx: Sender<Command>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle").finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// Spawn the worker thread that owns the session state
    pub fn spawn() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            let mut state = SessionState::default();
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::SetPinned(pinned, resp) => {
                        log::info!("popup pinned: {}", pinned);
                        state.pinned = pinned;
                        let _ = resp.send(());
                    }
                    Command::IsPinned(resp) => {
                        let _ = resp.send(state.pinned);
                    }
                    Command::Notify(event, resp) => {
                        let reopen = state.should_reopen(event);
                        if reopen {
                            log::debug!("{:?} while pinned, reopening popup", event);
                        }
                        let _ = resp.send(reopen);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
        });

        Self { cmd_tx }
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| Error::Other("session worker has stopped".into()))
    }

    fn closed(e: oneshot::error::RecvError) -> Error {
        Error::Other(format!("session reply canceled: {}", e))
    }

    pub fn set_pinned(&self, pinned: bool) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::SetPinned(pinned, tx))?;
        rx.blocking_recv().map_err(Self::closed)
    }

    pub fn is_pinned(&self) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::IsPinned(tx))?;
        rx.blocking_recv().map_err(Self::closed)
    }

    /// Whether the popup should reopen in response to `event`
    pub fn should_reopen(&self, event: HostEvent) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Notify(event, tx))?;
        rx.blocking_recv().map_err(Self::closed)
    }

    pub async fn set_pinned_async(&self, pinned: bool) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::SetPinned(pinned, tx))?;
        rx.await.map_err(Self::closed)
    }

    pub async fn is_pinned_async(&self) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::IsPinned(tx))?;
        rx.await.map_err(Self::closed)
    }

    /// Stop the worker. Other clones fail afterwards.
    pub fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Close(tx))?;
        rx.blocking_recv().map_err(Self::closed)
    }
}
