//! Config — executor tuning knobs, loaded from a JSON file with per-field defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ── Executor section ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Overrides the screen width reported by the input backend.
    #[serde(default)]
    pub screen_width: Option<u32>,
    /// Overrides the screen height reported by the input backend.
    #[serde(default)]
    pub screen_height: Option<u32>,
    /// Wheel clicks per `scroll` action.
    #[serde(default = "default_scroll_amount")]
    pub scroll_amount: i32,
    #[serde(default = "default_drag_duration_ms")]
    pub drag_duration_ms: u64,
    #[serde(default = "default_wait_secs")]
    pub wait_secs: u64,
    /// Pause before typing so the focused field is ready for input.
    #[serde(default = "default_pre_type_delay_ms")]
    pub pre_type_delay_ms: u64,
    /// Pause after staging text on the clipboard, before pasting.
    #[serde(default = "default_clipboard_settle_ms")]
    pub clipboard_settle_ms: u64,
    /// Pause after the paste chord.
    #[serde(default = "default_paste_settle_ms")]
    pub paste_settle_ms: u64,
    #[serde(default = "default_enter_delay_ms")]
    pub enter_delay_ms: u64,
    /// Pause after the clipboard is restored.
    #[serde(default = "default_post_type_delay_ms")]
    pub post_type_delay_ms: u64,
    /// Whitespace-separated key chord used to paste.
    #[serde(default = "default_paste_keys")]
    pub paste_keys: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            screen_width: None,
            screen_height: None,
            scroll_amount: default_scroll_amount(),
            drag_duration_ms: default_drag_duration_ms(),
            wait_secs: default_wait_secs(),
            pre_type_delay_ms: default_pre_type_delay_ms(),
            clipboard_settle_ms: default_clipboard_settle_ms(),
            paste_settle_ms: default_paste_settle_ms(),
            enter_delay_ms: default_enter_delay_ms(),
            post_type_delay_ms: default_post_type_delay_ms(),
            paste_keys: default_paste_keys(),
        }
    }
}

impl ExecutorConfig {
    /// Same as the defaults but with every delay set to zero.
    pub fn instant() -> Self {
        Self {
            drag_duration_ms: 0,
            wait_secs: 0,
            pre_type_delay_ms: 0,
            clipboard_settle_ms: 0,
            paste_settle_ms: 0,
            enter_delay_ms: 0,
            post_type_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn drag_duration(&self) -> Duration {
        Duration::from_millis(self.drag_duration_ms)
    }

    pub fn wait_duration(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }

    pub fn paste_chord(&self) -> Vec<String> {
        self.paste_keys.split_whitespace().map(str::to_string).collect()
    }
}

// ── Top-level config ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub executor: ExecutorConfig,
}

// ── Defaults ───────────────────────────────────────────────────────────────

fn default_scroll_amount() -> i32 { 10 }
fn default_drag_duration_ms() -> u64 { 500 }
fn default_wait_secs() -> u64 { 5 }
fn default_pre_type_delay_ms() -> u64 { 500 }
fn default_clipboard_settle_ms() -> u64 { 200 }
fn default_paste_settle_ms() -> u64 { 300 }
fn default_enter_delay_ms() -> u64 { 200 }
fn default_post_type_delay_ms() -> u64 { 300 }
fn default_paste_keys() -> String {
    if cfg!(target_os = "macos") { "command v".into() } else { "ctrl v".into() }
}

// ── Load / save ────────────────────────────────────────────────────────────

/// `config.json` next to the running binary, falling back to the working directory.
pub fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.join("config.json")))
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

/// Load config from `path`. A missing or malformed file yields the defaults.
pub fn load_config(path: &Path) -> Config {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => {
            log::info!("No config at {:?}, using defaults", path);
            return Config::default();
        }
    };
    parse_config(&contents).unwrap_or_else(|e| {
        log::warn!("Failed to parse {:?}: {e}. Using defaults.", path);
        Config::default()
    })
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    Ok(serde_json::from_str(contents)?)
}

pub fn save_config(path: &Path, cfg: &Config) {
    match serde_json::to_string_pretty(cfg) {
        Ok(contents) => {
            if let Err(e) = std::fs::write(path, contents) {
                log::error!("Failed to write {:?}: {e}", path);
            }
        }
        Err(e) => log::error!("Failed to serialize config: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.executor.scroll_amount, 10);
        assert_eq!(cfg.executor.wait_duration(), Duration::from_secs(5));
        assert_eq!(cfg.executor.drag_duration(), Duration::from_millis(500));
        assert!(cfg.executor.screen_width.is_none());
        assert_eq!(cfg.executor.paste_chord().len(), 2);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg = parse_config(r#"{"executor": {"screen_width": 1920, "scroll_amount": 3}}"#).unwrap();
        assert_eq!(cfg.executor.screen_width, Some(1920));
        assert_eq!(cfg.executor.screen_height, None);
        assert_eq!(cfg.executor.scroll_amount, 3);
        assert_eq!(cfg.executor.pre_type_delay_ms, 500);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(parse_config("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(parse_config("{ executor: ").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let cfg = load_config(Path::new("/nonexistent/uitars/config.json"));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("uitars-config-{}.json", std::process::id()));
        let mut cfg = Config::default();
        cfg.executor.paste_keys = "shift insert".into();
        cfg.executor.screen_height = Some(1080);
        save_config(&path, &cfg);
        let loaded = load_config(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_instant_zeroes_delays() {
        let cfg = ExecutorConfig::instant();
        assert_eq!(cfg.wait_duration(), Duration::ZERO);
        assert_eq!(cfg.drag_duration(), Duration::ZERO);
        assert_eq!(cfg.scroll_amount, 10);
    }

    #[test]
    fn test_paste_chord_splits_on_whitespace() {
        let cfg = ExecutorConfig { paste_keys: " ctrl  v ".into(), ..ExecutorConfig::default() };
        assert_eq!(cfg.paste_chord(), vec!["ctrl".to_string(), "v".to_string()]);
    }
}
