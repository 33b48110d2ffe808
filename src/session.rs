// session.rs
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::address::{self, AddressError, Target};
use crate::history::HistoryLog;
use crate::navigation::NavigationStack;
use crate::relay::{FetchError, Relay};
use crate::rewrite;

/// Shown under every fetch failure.
pub const EMBED_NOTE: &str = "Note: Some websites might block proxy access or have Content \
    Security Policies that prevent them from loading in a proxy.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("{0}")]
    InvalidUrl(#[from] AddressError),
    #[error("{0}")]
    Fetch(String),
}

impl LoadError {
    pub fn note(&self) -> Option<&'static str> {
        match self {
            LoadError::InvalidUrl(_) => None,
            LoadError::Fetch(_) => Some(EMBED_NOTE),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    Idle,
    Loading { target: Target },
    Error(LoadError),
    Loaded { target: Target, markup: String },
}

/// A fetch the caller must run and hand back to [`Session::finish`].
#[derive(Debug, Clone)]
pub struct LoadTicket {
    pub generation: u64,
    pub target: Target,
}

/// All per-window state, mutated only through the methods below.
pub struct Session {
    /// Address field contents.
    pub input: String,
    relay: Relay,
    current: Option<Target>,
    state: RenderState,
    navigation: NavigationStack,
    history: HistoryLog,
    show_history: bool,
    /// Bumped on every action that supersedes an in-flight fetch.
    generation: u64,
}

impl Session {
    pub fn new(relay: Relay) -> Self {
        Self {
            input: String::new(),
            relay,
            current: None,
            state: RenderState::Idle,
            navigation: NavigationStack::new(),
            history: HistoryLog::new(),
            show_history: false,
            generation: 0,
        }
    }

    pub fn relay(&self) -> &Relay {
        &self.relay
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn navigation(&self) -> &NavigationStack {
        &self.navigation
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn show_history(&self) -> bool {
        self.show_history
    }

    /// The page being shown or loaded, before rewriting.
    pub fn current(&self) -> Option<&Target> {
        self.current.as_ref()
    }

    /// Relay request address for the current page.
    pub fn relay_url(&self) -> Option<Url> {
        self.current.as_ref().map(|t| self.relay.relay_url(t))
    }

    /// Shareable link that reopens the current page.
    pub fn location(&self, share_base: &Url) -> Option<Url> {
        self.current
            .as_ref()
            .map(|t| address::location_link(share_base, t))
    }

    pub fn submit(&mut self) -> Option<LoadTicket> {
        if self.input.is_empty() {
            return None;
        }
        let input = self.input.clone();
        self.load(&input)
    }

    /// Normalizes `raw` and starts loading it as a new visit.
    pub fn load(&mut self, raw: &str) -> Option<LoadTicket> {
        self.start(raw, true)
    }

    pub fn back(&mut self) -> Option<LoadTicket> {
        let url = self.navigation.back()?.to_string();
        self.start(&url, false)
    }

    pub fn forward(&mut self) -> Option<LoadTicket> {
        let url = self.navigation.forward()?.to_string();
        self.start(&url, false)
    }

    pub fn open_history_item(&mut self, url: &str) -> Option<LoadTicket> {
        self.show_history = false;
        self.load(url)
    }

    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
    }

    pub fn close_history(&mut self) {
        self.show_history = false;
    }

    /// Back to the empty state. Navigation and history are kept.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.input.clear();
        self.current = None;
        self.state = RenderState::Idle;
    }

    fn start(&mut self, raw: &str, visit: bool) -> Option<LoadTicket> {
        self.generation += 1;
        let target = match address::normalize(raw) {
            Ok(target) => target,
            Err(e) => {
                warn!("rejected address {:?}", raw);
                self.state = RenderState::Error(e.into());
                return None;
            }
        };

        if visit {
            self.navigation.visit(target.as_str());
        }
        self.history.record(&target);
        self.input = target.as_str().to_string();
        self.current = Some(target.clone());
        self.state = RenderState::Loading {
            target: target.clone(),
        };
        Some(LoadTicket {
            generation: self.generation,
            target,
        })
    }

    /// Applies a fetch outcome. Returns false when the ticket was superseded.
    pub fn finish(&mut self, generation: u64, result: Result<String, FetchError>) -> bool {
        if generation != self.generation {
            debug!(
                "dropping stale load {} (current {})",
                generation, self.generation
            );
            return false;
        }
        let RenderState::Loading { target } = &self.state else {
            return false;
        };
        let target = target.clone();

        self.state = match result {
            Ok(body) => RenderState::Loaded {
                markup: rewrite::rewrite(&body, target.url()),
                target,
            },
            Err(e) => {
                warn!("load of {} failed: {}", target, e);
                RenderState::Error(LoadError::Fetch(e.to_string()))
            }
        };
        true
    }
}
