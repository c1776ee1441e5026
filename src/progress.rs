//! Progress reporting and cooperative cancellation for a running search

use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use signal_hook::consts::SIGINT;
use signal_hook::flag;

/// Receives per-target progress from the driver.
///
/// `report` is called once before each target is searched; returning `true`
/// asks the driver to stop there and return what it has so far.
pub trait ProgressReporter {
    fn report(&mut self, progress: f32, label: &str) -> bool;

    /// Called once when the search ends, however it ends
    fn clear(&mut self) {}
}

impl<F> ProgressReporter for F
where
    F: FnMut(f32, &str) -> bool,
{
    fn report(&mut self, progress: f32, label: &str) -> bool {
        self(progress, label)
    }
}

/// Shared cancellation request, settable from another thread
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Cancel on the first SIGINT. A second SIGINT exits with status 130.
    pub fn cancel_on_interrupt(&self) -> std::io::Result<()> {
        // 順序が重要: 終了判定はフラグが立つ前に登録する
        flag::register_conditional_shutdown(SIGINT, 130, Arc::clone(&self.cancelled))?;
        flag::register(SIGINT, Arc::clone(&self.cancelled))?;
        Ok(())
    }
}

/// Single-line progress on stderr, shown only when stderr is a terminal
pub struct ConsoleProgress {
    title: String,
    cancel: CancelToken,
    interactive: bool,
    drawn: bool,
}

impl ConsoleProgress {
    pub fn new(title: impl Into<String>, cancel: CancelToken) -> Self {
        Self {
            title: title.into(),
            cancel,
            interactive: std::io::stderr().is_terminal(),
            drawn: false,
        }
    }
}

impl ProgressReporter for ConsoleProgress {
    fn report(&mut self, progress: f32, label: &str) -> bool {
        log::debug!("{} [{:.2}] {}", self.title, progress, label);
        if self.interactive {
            let mut stderr = std::io::stderr();
            // 表示失敗は検索に影響させない
            let _ = write!(stderr, "\r\x1b[2K{} - {}", self.title, label);
            let _ = stderr.flush();
            self.drawn = true;
        }
        self.cancel.is_cancelled()
    }

    fn clear(&mut self) {
        if self.drawn {
            let _ = write!(std::io::stderr(), "\r\x1b[2K");
            self.drawn = false;
        }
    }
}

/// Format the label shown for one target: `"{percent}% : {file name}"`
pub fn progress_label(progress: f32, file_name: &str) -> String {
    format!("{}% : {}", (progress * 100.0) as u32, file_name)
}
