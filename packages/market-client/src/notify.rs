//! User feedback: transient status messages and navigation.

use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Loading(String),
    Success(String),
    Error(String),
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Writes notices to the log. Used by the binary, where the terminal is the UI.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Loading(msg) => info!(status = "loading", "{msg}"),
            Notice::Success(msg) => info!(status = "success", "{msg}"),
            Notice::Error(msg) => error!(status = "error", "{msg}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        info!(path, "Navigate");
    }
}
