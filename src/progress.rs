//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Rows between spinner message refreshes
const REFRESH_INTERVAL: u64 = 10_000;

/// Progress reporter for a delta run: index, classify, write
#[derive(Debug)]
pub struct ProgressReporter {
    pub index_pb: Option<ProgressBar>,
    pub classify_pb: Option<ProgressBar>,
    pub write_pb: Option<ProgressBar>,
    show_progress: bool,
    start_time: std::time::Instant,
}

impl ProgressReporter {
    /// Create progress reporter for a delta run
    pub fn new_for_delta() -> Self {
        // Only the first spinner exists up front; later phases start lazily
        let index_pb = create_spinner("Indexing reference snapshot...");

        Self {
            index_pb: Some(index_pb),
            classify_pb: None,
            write_pb: None,
            show_progress: true,
            start_time: std::time::Instant::now(),
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            index_pb: None,
            classify_pb: None,
            write_pb: None,
            show_progress: false,
            start_time: std::time::Instant::now(),
        }
    }

    fn ensure_classify_pb(&mut self) {
        if self.show_progress && self.classify_pb.is_none() {
            self.classify_pb = Some(create_spinner("Classifying current snapshot..."));
        }
    }

    fn ensure_write_pb(&mut self) {
        if self.show_progress && self.write_pb.is_none() {
            self.write_pb = Some(create_spinner("Writing delta files..."));
        }
    }

    /// Report rows indexed so far
    pub fn update_indexed(&self, rows: u64) {
        if let Some(pb) = &self.index_pb {
            update_count(pb, rows, "Indexing reference snapshot");
        }
    }

    /// Finish indexing and start the classification spinner
    pub fn finish_index(&mut self, message: &str) {
        if let Some(pb) = self.index_pb.take() {
            pb.finish_with_message(message.to_string());
        }
        self.ensure_classify_pb();
    }

    /// Report rows classified so far
    pub fn update_classified(&self, rows: u64) {
        if let Some(pb) = &self.classify_pb {
            update_count(pb, rows, "Classifying current snapshot");
        }
    }

    /// Finish classification and start the write spinner
    pub fn finish_classify(&mut self, message: &str) {
        if let Some(pb) = self.classify_pb.take() {
            pb.finish_with_message(message.to_string());
        }
        self.ensure_write_pb();
    }

    pub fn finish_write(&mut self, message: &str) {
        if let Some(pb) = self.write_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        // Clear anything still spinning, e.g. after an early error
        for pb in [self.index_pb.take(), self.classify_pb.take(), self.write_pb.take()]
            .into_iter()
            .flatten()
        {
            pb.finish_and_clear();
        }
    }
}

fn update_count(pb: &ProgressBar, rows: u64, label: &str) {
    pb.set_position(rows);
    if rows % REFRESH_INTERVAL == 0 {
        pb.set_message(format!("{}... {} rows", label, rows));
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
