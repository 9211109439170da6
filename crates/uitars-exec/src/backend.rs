//! Device-layer traits. Native implementations live in `native` (behind the
//! `native` feature), recording fakes in `mock_backend`.

use std::time::Duration;

/// Mouse and keyboard injection.
///
/// Coordinates are absolute device pixels. Scroll amounts follow wheel
/// conventions: positive `scroll_vertical` scrolls up, positive
/// `scroll_horizontal` scrolls right.
pub trait InputBackend: Send + Sync {
    fn move_to(&self, x: i32, y: i32) -> anyhow::Result<()>;

    /// Move to `(x, y)` gradually over `duration`, e.g. while a button is held.
    fn smooth_move_to(&self, x: i32, y: i32, duration: Duration) -> anyhow::Result<()>;

    /// Move to `(x, y)` and left-click.
    fn click(&self, x: i32, y: i32) -> anyhow::Result<()>;

    fn double_click(&self, x: i32, y: i32) -> anyhow::Result<()>;

    fn right_click(&self, x: i32, y: i32) -> anyhow::Result<()>;

    /// Press the left button at the current position.
    fn mouse_down(&self) -> anyhow::Result<()>;

    /// Release the left button at the current position.
    fn mouse_up(&self) -> anyhow::Result<()>;

    /// Tap a single named key (`"enter"`, `"tab"`, `"a"`...).
    fn press_key(&self, key: &str) -> anyhow::Result<()>;

    /// Hold every key in order, then release in reverse (`["ctrl", "v"]`).
    fn press_keys_combo(&self, keys: &[String]) -> anyhow::Result<()>;

    fn scroll_vertical(&self, clicks: i32) -> anyhow::Result<()>;

    fn scroll_horizontal(&self, clicks: i32) -> anyhow::Result<()>;

    /// Primary screen size in pixels, `(width, height)`.
    fn screen_size(&self) -> anyhow::Result<(u32, u32)>;

    /// Human-readable backend name (e.g. "enigo", "mock").
    fn name(&self) -> &str;
}

/// Plain-text system clipboard.
pub trait ClipboardBackend: Send + Sync {
    fn get_text(&self) -> anyhow::Result<String>;
    fn set_text(&self, text: &str) -> anyhow::Result<()>;
}
