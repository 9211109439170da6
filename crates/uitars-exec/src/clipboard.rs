//! Clipboard-mediated text injection.
//!
//! Synthesising keystrokes per character is unreliable for non-ASCII text, so
//! text is staged on the clipboard and pasted. The user's clipboard is
//! snapshotted first and restored afterwards on every exit path.

use std::thread;
use std::time::Duration;

use uitars_core::ExecutorConfig;

use crate::backend::{ClipboardBackend, InputBackend};

/// Holds a clipboard snapshot and puts it back when dropped.
pub struct ClipboardGuard<'a> {
    clipboard: &'a dyn ClipboardBackend,
    saved: String,
    restored: bool,
}

impl<'a> ClipboardGuard<'a> {
    /// Snapshot the current clipboard text. An unreadable clipboard (empty,
    /// or holding non-text data) snapshots as the empty string.
    pub fn acquire(clipboard: &'a dyn ClipboardBackend) -> Self {
        let saved = clipboard.get_text().unwrap_or_else(|e| {
            log::warn!("Clipboard: could not read current contents ({e}), will restore empty text");
            String::new()
        });
        Self { clipboard, saved, restored: false }
    }

    pub fn saved(&self) -> &str {
        &self.saved
    }

    /// Put the snapshot back, reporting failure to the caller.
    pub fn restore(mut self) -> anyhow::Result<()> {
        self.restored = true;
        self.clipboard.set_text(&self.saved)
    }
}

impl Drop for ClipboardGuard<'_> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.clipboard.set_text(&self.saved) {
            log::error!("Clipboard: failed to restore previous contents: {e}");
        }
    }
}

/// Paste `text` into the focused control via the clipboard, then press Enter
/// if `press_enter` is set. The previous clipboard text is restored whether or
/// not any step fails.
pub fn paste_text(
    input: &dyn InputBackend,
    clipboard: &dyn ClipboardBackend,
    text: &str,
    press_enter: bool,
    cfg: &ExecutorConfig,
) -> anyhow::Result<()> {
    let guard = ClipboardGuard::acquire(clipboard);

    clipboard.set_text(text)?;
    pause(cfg.clipboard_settle_ms);

    input.press_keys_combo(&cfg.paste_chord())?;
    pause(cfg.paste_settle_ms);

    if press_enter {
        pause(cfg.enter_delay_ms);
        log::info!("Clipboard: pressing enter");
        input.press_key("enter")?;
    }

    guard.restore()?;
    pause(cfg.post_type_delay_ms);
    Ok(())
}

fn pause(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_backend::{InputEvent, MockBackend, MockClipboard};

    #[test]
    fn guard_restores_on_drop() {
        let clipboard = MockClipboard::with_text("original");
        {
            let guard = ClipboardGuard::acquire(&clipboard);
            assert_eq!(guard.saved(), "original");
            clipboard.set_text("scratch").unwrap();
        }
        assert_eq!(clipboard.text(), "original");
    }

    #[test]
    fn guard_restore_is_not_repeated_on_drop() {
        let clipboard = MockClipboard::with_text("original");
        let guard = ClipboardGuard::acquire(&clipboard);
        clipboard.set_text("scratch").unwrap();
        guard.restore().unwrap();
        assert_eq!(clipboard.writes(), vec!["scratch".to_string(), "original".to_string()]);
    }

    #[test]
    fn unreadable_clipboard_snapshots_empty() {
        let clipboard = MockClipboard::with_text("image data").failing_reads();
        let guard = ClipboardGuard::acquire(&clipboard);
        assert_eq!(guard.saved(), "");
    }

    #[test]
    fn paste_stages_pastes_and_restores() {
        let input = MockBackend::new(1920, 1080);
        let clipboard = MockClipboard::with_text("keep me");
        paste_text(&input, &clipboard, "你好", true, &ExecutorConfig::instant()).unwrap();

        assert_eq!(clipboard.writes(), vec!["你好".to_string(), "keep me".to_string()]);
        assert_eq!(clipboard.text(), "keep me");
        let events = input.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], InputEvent::KeyCombo(keys) if keys.len() == 2));
        assert_eq!(events[1], InputEvent::PressKey("enter".into()));
    }

    #[test]
    fn paste_failure_still_restores() {
        let input = MockBackend::new(1920, 1080).failing_on("press_keys_combo");
        let clipboard = MockClipboard::with_text("keep me");
        let err = paste_text(&input, &clipboard, "text", false, &ExecutorConfig::instant()).unwrap_err();
        assert!(err.to_string().contains("press_keys_combo"));
        assert_eq!(clipboard.text(), "keep me");
    }
}
