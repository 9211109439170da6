//! Executor — performs parsed actions on the device and reports an
//! [`ExecutionResult`] for each one.
//!
//! Every call is self-contained: validate parameters, resolve coordinates,
//! drive the backend, report. Nothing is retried and no state is carried
//! between calls. `execute` takes `&mut self` so one executor serialises all
//! access to the device; hosts sharing it across threads wrap it in a mutex.

use std::thread;

use serde_json::json;
use uitars_core::action::{CONTENT, DIRECTION, END_BOX, KEY, START_BOX};
use uitars_core::{Action, ActionKind, ExecutorConfig, ScrollDirection};

use crate::backend::{ClipboardBackend, InputBackend};
use crate::clipboard;
use crate::coords::{self, DeviceCoordinate, ScreenSize};
use crate::result::ExecutionResult;

type Outcome = anyhow::Result<ExecutionResult>;

pub struct Executor {
    input: Box<dyn InputBackend>,
    clipboard: Box<dyn ClipboardBackend>,
    config: ExecutorConfig,
    screen: ScreenSize,
}

impl Executor {
    /// Build an executor. Screen size comes from the config when both
    /// dimensions are set, otherwise from the input backend.
    pub fn new(
        cfg: &ExecutorConfig,
        input: Box<dyn InputBackend>,
        clipboard: Box<dyn ClipboardBackend>,
    ) -> anyhow::Result<Self> {
        let screen = match (cfg.screen_width, cfg.screen_height) {
            (Some(width), Some(height)) => ScreenSize::new(width, height),
            _ => {
                let (width, height) = input.screen_size()?;
                ScreenSize::new(width, height)
            }
        };
        if screen.width == 0 || screen.height == 0 {
            anyhow::bail!("invalid screen size {}x{}", screen.width, screen.height);
        }

        log::info!(
            "Executor: backend={}, screen={}x{}, scroll_amount={}",
            input.name(),
            screen.width,
            screen.height,
            cfg.scroll_amount,
        );

        Ok(Self { input, clipboard, config: cfg.clone(), screen })
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Execute the action from a parsed turn, if there is one.
    pub fn execute(&mut self, action: Option<&Action>) -> ExecutionResult {
        match action {
            Some(action) => self.execute_action(action),
            None => ExecutionResult::error("no action to execute"),
        }
    }

    /// Single entry point for every action kind. Never fails: validation
    /// problems and device faults both come back as error results.
    pub fn execute_action(&mut self, action: &Action) -> ExecutionResult {
        log::info!("Executor: {action}");

        if action.kind == ActionKind::Unknown {
            log::warn!("Executor: unknown action type {:?}", action.raw);
            return ExecutionResult::error("unknown action type");
        }
        if let Some(param) = action.missing_param() {
            log::warn!("Executor: {} missing {param}", action.kind);
            return ExecutionResult::error(format!("{param} missing"));
        }

        let outcome = match action.kind {
            ActionKind::Click => self.click(action),
            ActionKind::LeftDouble => self.double_click(action),
            ActionKind::RightSingle => self.right_click(action),
            ActionKind::Drag => self.drag(action),
            ActionKind::Hotkey => self.hotkey(action),
            ActionKind::Type => self.type_text(action),
            ActionKind::Scroll => self.scroll(action),
            ActionKind::Wait => self.wait(),
            ActionKind::Finished => self.finished(action),
            ActionKind::Unknown => Ok(ExecutionResult::error("unknown action type")),
        };

        let result = outcome.unwrap_or_else(|e| {
            log::error!("Executor: {} failed: {e:#}", action.kind);
            ExecutionResult::error(format!("execution failed: {e:#}"))
        });
        log::info!(
            "  → {}: {}",
            if result.is_success() { "ok" } else { "err" },
            result.message
        );
        result
    }

    /// Resolve a box parameter, or the error result to return instead.
    fn point(&self, action: &Action, param: &str) -> Result<DeviceCoordinate, ExecutionResult> {
        let raw = action.param(param).unwrap_or_default();
        coords::resolve(raw, self.screen).ok_or_else(|| {
            log::warn!("Executor: cannot resolve {param}={raw:?}");
            ExecutionResult::error(format!("cannot resolve coordinates from {param}"))
        })
    }

    fn click(&mut self, action: &Action) -> Outcome {
        let p = match self.point(action, START_BOX) {
            Ok(p) => p,
            Err(result) => return Ok(result),
        };
        self.input.click(p.x, p.y)?;
        Ok(ExecutionResult::ok(format!("clicked at {p}")).with("coords", json!(p)))
    }

    fn double_click(&mut self, action: &Action) -> Outcome {
        let p = match self.point(action, START_BOX) {
            Ok(p) => p,
            Err(result) => return Ok(result),
        };
        self.input.double_click(p.x, p.y)?;
        Ok(ExecutionResult::ok(format!("double-clicked at {p}")).with("coords", json!(p)))
    }

    fn right_click(&mut self, action: &Action) -> Outcome {
        let p = match self.point(action, START_BOX) {
            Ok(p) => p,
            Err(result) => return Ok(result),
        };
        self.input.right_click(p.x, p.y)?;
        Ok(ExecutionResult::ok(format!("right-clicked at {p}")).with("coords", json!(p)))
    }

    fn drag(&mut self, action: &Action) -> Outcome {
        let (start, end) = match (self.point(action, START_BOX), self.point(action, END_BOX)) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(result), _) | (_, Err(result)) => return Ok(result),
        };
        self.input.move_to(start.x, start.y)?;
        self.input.mouse_down()?;
        let moved = self.input.smooth_move_to(end.x, end.y, self.config.drag_duration());
        // Never leave the button held, even if the move failed.
        let released = self.input.mouse_up();
        moved?;
        released?;
        Ok(ExecutionResult::ok(format!("dragged from {start} to {end}"))
            .with("start", json!(start))
            .with("end", json!(end)))
    }

    fn hotkey(&mut self, action: &Action) -> Outcome {
        let key = action.param(KEY).unwrap_or_default();
        let keys: Vec<String> = key.split_whitespace().map(str::to_string).collect();
        if keys.is_empty() {
            return Ok(ExecutionResult::error("key is empty"));
        }
        self.input.press_keys_combo(&keys)?;
        Ok(ExecutionResult::ok(format!("pressed hotkey {key}")).with("key", key))
    }

    fn type_text(&mut self, action: &Action) -> Outcome {
        let raw = action.param(CONTENT).unwrap_or_default();
        let (content, press_enter) = match raw.strip_suffix('\n') {
            Some(stripped) => (stripped, true),
            None => (raw, false),
        };
        log::info!("Executor: typing {} chars, enter={press_enter}", content.chars().count());

        let delay = std::time::Duration::from_millis(self.config.pre_type_delay_ms);
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        clipboard::paste_text(&*self.input, &*self.clipboard, content, press_enter, &self.config)?;

        let message = if press_enter {
            format!("typed {content:?} and pressed enter")
        } else {
            format!("typed {content:?}")
        };
        Ok(ExecutionResult::ok(message)
            .with("content", content)
            .with("enter_pressed", press_enter))
    }

    fn scroll(&mut self, action: &Action) -> Outcome {
        let p = match self.point(action, START_BOX) {
            Ok(p) => p,
            Err(result) => return Ok(result),
        };
        let direction: ScrollDirection = match action.param(DIRECTION).unwrap_or_default().parse() {
            Ok(direction) => direction,
            Err(e) => return Ok(ExecutionResult::error(e.to_string())),
        };
        let clicks = self.config.scroll_amount;

        self.input.move_to(p.x, p.y)?;
        match direction {
            ScrollDirection::Up => self.input.scroll_vertical(clicks)?,
            ScrollDirection::Down => self.input.scroll_vertical(-clicks)?,
            ScrollDirection::Left => self.input.scroll_horizontal(-clicks)?,
            ScrollDirection::Right => self.input.scroll_horizontal(clicks)?,
        }
        Ok(ExecutionResult::ok(format!("scrolled {} at {p}", direction.as_str()))
            .with("coords", json!(p))
            .with("direction", direction.as_str()))
    }

    fn wait(&mut self) -> Outcome {
        let duration = self.config.wait_duration();
        log::info!("Executor: waiting {}s", duration.as_secs());
        thread::sleep(duration);
        Ok(ExecutionResult::ok(format!("waited {}s", duration.as_secs())))
    }

    fn finished(&mut self, action: &Action) -> Outcome {
        let content = action.param(CONTENT).unwrap_or_default();
        log::info!("Executor: task finished: {content}");
        Ok(ExecutionResult::ok(format!("task finished: {content}")).with("content", content))
    }
}
