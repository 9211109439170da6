//! Mock input and clipboard backends for exercising the executor without a desktop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::{ClipboardBackend, InputBackend};

/// One primitive call recorded by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    MoveTo { x: i32, y: i32 },
    SmoothMoveTo { x: i32, y: i32, duration_ms: u64 },
    Click { x: i32, y: i32 },
    DoubleClick { x: i32, y: i32 },
    RightClick { x: i32, y: i32 },
    MouseDown,
    MouseUp,
    PressKey(String),
    KeyCombo(Vec<String>),
    ScrollVertical(i32),
    ScrollHorizontal(i32),
}

/// Records every primitive instead of driving hardware.
///
/// Clones share the same event log, so a test can hand one clone to the
/// executor and inspect the other afterwards.
#[derive(Clone)]
pub struct MockBackend {
    width: u32,
    height: u32,
    events: Arc<Mutex<Vec<InputEvent>>>,
    fail_on: Option<&'static str>,
}

impl MockBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, events: Arc::default(), fail_on: None }
    }

    /// Make the named primitive (e.g. `"click"`) return an error.
    pub fn failing_on(mut self, primitive: &'static str) -> Self {
        self.fail_on = Some(primitive);
        self
    }

    pub fn events(&self) -> Vec<InputEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn record(&self, primitive: &str, event: InputEvent) -> anyhow::Result<()> {
        if self.fail_on == Some(primitive) {
            anyhow::bail!("mock device fault in {primitive}");
        }
        log::debug!("MockBackend: {event:?}");
        self.events
            .lock()
            .map_err(|_| anyhow::anyhow!("mock event log poisoned"))?
            .push(event);
        Ok(())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl InputBackend for MockBackend {
    fn move_to(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.record("move_to", InputEvent::MoveTo { x, y })
    }

    fn smooth_move_to(&self, x: i32, y: i32, duration: Duration) -> anyhow::Result<()> {
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.record("smooth_move_to", InputEvent::SmoothMoveTo { x, y, duration_ms })
    }

    fn click(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.record("click", InputEvent::Click { x, y })
    }

    fn double_click(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.record("double_click", InputEvent::DoubleClick { x, y })
    }

    fn right_click(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.record("right_click", InputEvent::RightClick { x, y })
    }

    fn mouse_down(&self) -> anyhow::Result<()> {
        self.record("mouse_down", InputEvent::MouseDown)
    }

    fn mouse_up(&self) -> anyhow::Result<()> {
        self.record("mouse_up", InputEvent::MouseUp)
    }

    fn press_key(&self, key: &str) -> anyhow::Result<()> {
        self.record("press_key", InputEvent::PressKey(key.to_string()))
    }

    fn press_keys_combo(&self, keys: &[String]) -> anyhow::Result<()> {
        self.record("press_keys_combo", InputEvent::KeyCombo(keys.to_vec()))
    }

    fn scroll_vertical(&self, clicks: i32) -> anyhow::Result<()> {
        self.record("scroll_vertical", InputEvent::ScrollVertical(clicks))
    }

    fn scroll_horizontal(&self, clicks: i32) -> anyhow::Result<()> {
        self.record("scroll_horizontal", InputEvent::ScrollHorizontal(clicks))
    }

    fn screen_size(&self) -> anyhow::Result<(u32, u32)> {
        if self.fail_on == Some("screen_size") {
            anyhow::bail!("mock device fault in screen_size");
        }
        Ok((self.width, self.height))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// In-memory clipboard that keeps a history of writes.
#[derive(Clone, Default)]
pub struct MockClipboard {
    text: Arc<Mutex<String>>,
    writes: Arc<Mutex<Vec<String>>>,
    fail_reads: bool,
    /// Reject writes of exactly this text.
    reject_write: Option<String>,
}

impl MockClipboard {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: Arc::new(Mutex::new(text.into())), ..Self::default() }
    }

    /// Reads fail, as when the clipboard holds non-text data.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn rejecting_write_of(mut self, text: impl Into<String>) -> Self {
        self.reject_write = Some(text.into());
        self
    }

    pub fn text(&self) -> String {
        self.text.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl ClipboardBackend for MockClipboard {
    fn get_text(&self) -> anyhow::Result<String> {
        if self.fail_reads {
            anyhow::bail!("mock clipboard holds no text");
        }
        Ok(self.text())
    }

    fn set_text(&self, text: &str) -> anyhow::Result<()> {
        if self.reject_write.as_deref() == Some(text) {
            anyhow::bail!("mock clipboard rejected write");
        }
        *self.text.lock().map_err(|_| anyhow::anyhow!("mock clipboard poisoned"))? = text.to_string();
        self.writes
            .lock()
            .map_err(|_| anyhow::anyhow!("mock clipboard poisoned"))?
            .push(text.to_string());
        Ok(())
    }
}
