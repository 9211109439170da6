//! uitars-exec — carries out UI-TARS actions on a real or simulated desktop.
//!
//! Takes an [`Action`](uitars_core::Action) parsed by `uitars-core`, maps its
//! 0–1000 model coordinates onto the screen, and drives an injected
//! [`InputBackend`] / [`ClipboardBackend`]. Every call produces an
//! [`ExecutionResult`]; nothing propagates past [`Executor::execute`].

pub mod backend;
pub mod clipboard;
pub mod coords;
pub mod executor;
pub mod mock_backend;
#[cfg(feature = "native")]
pub mod native;
pub mod result;

pub use backend::{ClipboardBackend, InputBackend};
pub use coords::{DeviceCoordinate, NormalizedBox, ScreenSize};
pub use executor::Executor;
pub use mock_backend::{MockBackend, MockClipboard};
pub use result::{ExecutionResult, Status};

use uitars_core::ExecutorConfig;

/// Executor wired to the desktop through enigo and arboard.
#[cfg(feature = "native")]
pub fn native_executor(cfg: &ExecutorConfig) -> anyhow::Result<Executor> {
    let input = native::EnigoBackend::new()?;
    let clipboard = native::ArboardClipboard::new()?;
    Executor::new(cfg, Box::new(input), Box::new(clipboard))
}

/// Executor that records actions against an in-memory desktop of the given size.
pub fn dry_run_executor(cfg: &ExecutorConfig, width: u32, height: u32) -> anyhow::Result<Executor> {
    Executor::new(cfg, Box::new(MockBackend::new(width, height)), Box::new(MockClipboard::default()))
}
