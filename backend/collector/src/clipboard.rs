//! Host clipboard access.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::Result;

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// The desktop clipboard via `arboard`.
///
/// The handle is opened on first use and then kept: on X11 and Wayland the
/// copied text is served by this process and disappears with the handle.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Arc<Mutex<Option<arboard::Clipboard>>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let handle = self.handle.clone();
        let text = text.to_string();

        // arboard blocks while talking to the display server.
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut guard = handle.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if guard.is_none() {
                *guard = Some(arboard::Clipboard::new()?);
            }
            if let Some(clipboard) = guard.as_mut() {
                clipboard.set_text(text)?;
            }
            Ok(())
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CollectorError;

    #[tokio::test]
    async fn headless_failure_is_a_clipboard_error() {
        // CI machines usually have no display; either outcome is fine as long
        // as a failure surfaces as an error value.
        let clipboard = SystemClipboard::new();
        match clipboard.write_text("Name: Alice").await {
            Ok(()) => {}
            Err(CollectorError::Clipboard(_)) => {}
            Err(other) => panic!("unexpected error kind: {other}"),
        }
    }

    #[tokio::test]
    async fn handle_is_kept_after_a_successful_write() {
        let clipboard = SystemClipboard::new();
        if clipboard.write_text("Project: Atlas").await.is_ok() {
            assert!(clipboard.handle.lock().unwrap().is_some());
        }
    }
}
