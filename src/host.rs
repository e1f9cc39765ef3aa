//! Optional embedding host.
//!
//! When the client runs inside a container app (a chat app's mini-app shell,
//! say), the shell signals readiness and asks to take the whole window. The
//! host never hands data back to the submission flow.

use std::sync::Arc;

use iced::window;

/// Environment variable naming the embedding host, e.g. `telegram`.
pub const EMBED_HOST_ENV: &str = "VORTEX_EMBED_HOST";

pub trait HostAdapter: Send + Sync {
    fn is_embedded(&self) -> bool;

    /// Tell the host the UI is about to show.
    fn ready(&self);

    /// Take up as much of the host as possible.
    fn expand(&self, window: &mut window::Settings);
}

/// Used when there is no host.
pub struct NoHost;

impl HostAdapter for NoHost {
    fn is_embedded(&self) -> bool {
        false
    }

    fn ready(&self) {}

    fn expand(&self, _window: &mut window::Settings) {}
}

pub struct EmbeddedHost {
    name: String,
}

impl HostAdapter for EmbeddedHost {
    fn is_embedded(&self) -> bool {
        true
    }

    fn ready(&self) {
        tracing::info!(host = %self.name, "embedded host ready");
    }

    fn expand(&self, window: &mut window::Settings) {
        window.maximized = true;
    }
}

/// Picks an adapter from the value of [`EMBED_HOST_ENV`].
pub fn detect(host: Option<String>) -> Arc<dyn HostAdapter> {
    match host.map(|h| h.trim().to_string()).filter(|h| !h.is_empty()) {
        Some(name) => Arc::new(EmbeddedHost { name }),
        None => Arc::new(NoHost),
    }
}

pub fn detect_from_env() -> Arc<dyn HostAdapter> {
    detect(std::env::var(EMBED_HOST_ENV).ok())
}
