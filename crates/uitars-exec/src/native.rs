//! Native desktop backends: enigo for mouse/keyboard, arboard for the clipboard.

use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use arboard::Clipboard;
use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

use crate::backend::{ClipboardBackend, InputBackend};

/// Interval between intermediate pointer positions during a smooth move.
const SMOOTH_MOVE_STEP: Duration = Duration::from_millis(10);

pub struct EnigoBackend {
    enigo: Mutex<Enigo>,
}

impl EnigoBackend {
    pub fn new() -> anyhow::Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow!("failed to init enigo: {e}"))?;
        Ok(Self { enigo: Mutex::new(enigo) })
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Enigo>> {
        self.enigo.lock().map_err(|_| anyhow!("enigo lock poisoned"))
    }

    fn click_at(&self, x: i32, y: i32, button: Button, count: usize) -> anyhow::Result<()> {
        let mut enigo = self.lock()?;
        enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| anyhow!("move to ({x}, {y}) failed: {e}"))?;
        for _ in 0..count {
            enigo
                .button(button, Direction::Click)
                .map_err(|e| anyhow!("{button:?} click failed: {e}"))?;
        }
        Ok(())
    }
}

impl InputBackend for EnigoBackend {
    fn move_to(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.lock()?
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| anyhow!("move to ({x}, {y}) failed: {e}"))
    }

    fn smooth_move_to(&self, x: i32, y: i32, duration: Duration) -> anyhow::Result<()> {
        let mut enigo = self.lock()?;
        let (from_x, from_y) = enigo.location().map_err(|e| anyhow!("pointer location failed: {e}"))?;
        let steps = (duration.as_millis() / SMOOTH_MOVE_STEP.as_millis()).max(1) as i32;
        let started = Instant::now();
        for step in 1..=steps {
            let px = from_x + (x - from_x) * step / steps;
            let py = from_y + (y - from_y) * step / steps;
            enigo
                .move_mouse(px, py, Coordinate::Abs)
                .map_err(|e| anyhow!("move to ({px}, {py}) failed: {e}"))?;
            if step < steps {
                let target = SMOOTH_MOVE_STEP * step as u32;
                if let Some(remaining) = target.checked_sub(started.elapsed()) {
                    thread::sleep(remaining);
                }
            }
        }
        Ok(())
    }

    fn click(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.click_at(x, y, Button::Left, 1)
    }

    fn double_click(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.click_at(x, y, Button::Left, 2)
    }

    fn right_click(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.click_at(x, y, Button::Right, 1)
    }

    fn mouse_down(&self) -> anyhow::Result<()> {
        self.lock()?
            .button(Button::Left, Direction::Press)
            .map_err(|e| anyhow!("mouse down failed: {e}"))
    }

    fn mouse_up(&self) -> anyhow::Result<()> {
        self.lock()?
            .button(Button::Left, Direction::Release)
            .map_err(|e| anyhow!("mouse up failed: {e}"))
    }

    fn press_key(&self, key: &str) -> anyhow::Result<()> {
        let k = map_key(key)?;
        self.lock()?
            .key(k, Direction::Click)
            .map_err(|e| anyhow!("key press '{key}' failed: {e}"))
    }

    fn press_keys_combo(&self, keys: &[String]) -> anyhow::Result<()> {
        let mapped = keys.iter().map(|k| map_key(k)).collect::<anyhow::Result<Vec<_>>>()?;
        let mut enigo = self.lock()?;
        let mut held = Vec::with_capacity(mapped.len());
        let mut outcome = Ok(());
        for key in &mapped {
            if let Err(e) = enigo.key(*key, Direction::Press) {
                outcome = Err(anyhow!("key down {key:?} failed: {e}"));
                break;
            }
            held.push(*key);
        }
        // Release whatever went down, even after a failure.
        for key in held.iter().rev() {
            if let Err(e) = enigo.key(*key, Direction::Release) {
                log::warn!("EnigoBackend: key up {key:?} failed: {e}");
            }
        }
        outcome
    }

    fn scroll_vertical(&self, clicks: i32) -> anyhow::Result<()> {
        // enigo scrolls down for positive lengths.
        self.lock()?
            .scroll(-clicks, Axis::Vertical)
            .map_err(|e| anyhow!("vertical scroll failed: {e}"))
    }

    fn scroll_horizontal(&self, clicks: i32) -> anyhow::Result<()> {
        self.lock()?
            .scroll(clicks, Axis::Horizontal)
            .map_err(|e| anyhow!("horizontal scroll failed: {e}"))
    }

    fn screen_size(&self) -> anyhow::Result<(u32, u32)> {
        let (w, h) = self
            .lock()?
            .main_display()
            .map_err(|e| anyhow!("display size query failed: {e}"))?;
        Ok((u32::try_from(w)?, u32::try_from(h)?))
    }

    fn name(&self) -> &str {
        "enigo"
    }
}

/// Translate a key name as models write it (`ctrl`, `Enter`, `f5`, `a`) into an enigo key.
pub fn map_key(key: &str) -> anyhow::Result<Key> {
    let lower = key.to_lowercase();
    let mapped = match lower.as_str() {
        "enter" | "return" => Key::Return,
        "tab" => Key::Tab,
        "escape" | "esc" => Key::Escape,
        "backspace" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "space" => Key::Space,
        "ctrl" | "control" => Key::Control,
        "shift" => Key::Shift,
        "alt" | "option" => Key::Alt,
        "meta" | "command" | "cmd" | "super" | "win" | "windows" => Key::Meta,
        "capslock" => Key::CapsLock,
        "up" | "arrowup" => Key::UpArrow,
        "down" | "arrowdown" => Key::DownArrow,
        "left" | "arrowleft" => Key::LeftArrow,
        "right" | "arrowright" => Key::RightArrow,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" | "pgup" => Key::PageUp,
        "pagedown" | "pgdn" => Key::PageDown,
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        _ => {
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Unicode(c),
                _ => anyhow::bail!("unsupported key: {key}"),
            }
        }
    };
    Ok(mapped)
}

pub struct ArboardClipboard {
    clipboard: Mutex<Clipboard>,
}

impl ArboardClipboard {
    pub fn new() -> anyhow::Result<Self> {
        let clipboard = Clipboard::new().map_err(|e| anyhow!("failed to open clipboard: {e}"))?;
        Ok(Self { clipboard: Mutex::new(clipboard) })
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Clipboard>> {
        self.clipboard.lock().map_err(|_| anyhow!("clipboard lock poisoned"))
    }
}

impl ClipboardBackend for ArboardClipboard {
    fn get_text(&self) -> anyhow::Result<String> {
        self.lock()?.get_text().map_err(|e| anyhow!("clipboard read failed: {e}"))
    }

    fn set_text(&self, text: &str) -> anyhow::Result<()> {
        self.lock()?
            .set_text(text.to_owned())
            .map_err(|e| anyhow!("clipboard write failed: {e}"))
    }
}
