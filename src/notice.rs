//! Injected progress/warning sink
//!
//! The core never prints directly; it hands human-readable lines to a
//! [`Notice`] collaborator so tests can capture output and the CLI can
//! format it.

use tracing::warn;

/// Write-only, fire-and-forget sink for progress and warning lines
pub trait Notice: Send + Sync {
    fn notice(&self, msg: &str);

    fn warning(&self, msg: &str) {
        self.notice(&format!("warning: {msg}"));
    }
}

/// Console implementation used by the CLI
pub struct ConsoleNotice;

impl Notice for ConsoleNotice {
    fn notice(&self, msg: &str) {
        println!("{msg}");
    }

    fn warning(&self, msg: &str) {
        warn!("{msg}");
        println!("⚠️  {msg}");
    }
}

#[cfg(test)]
pub mod testing {
    use super::Notice;
    use std::sync::Mutex;

    /// Records every line for later assertions
    #[derive(Default)]
    pub struct RecordingNotice {
        pub lines: Mutex<Vec<String>>,
    }

    impl RecordingNotice {
        pub fn contains(&self, needle: &str) -> bool {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .any(|l| l.contains(needle))
        }
    }

    impl Notice for RecordingNotice {
        fn notice(&self, msg: &str) {
            self.lines.lock().unwrap().push(msg.to_string());
        }
    }
}
