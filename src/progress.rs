//! Progress bar display for bundle extraction

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for unpacking archive entries
pub struct ExtractProgress {
    entry_pb: ProgressBar,
}

impl ExtractProgress {
    /// Create a progress bar over `total_entries` archive entries
    pub fn new(total_entries: u64) -> Self {
        let entry_pb = ProgressBar::new(total_entries);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("  [{bar:40.green/yellow}] {pos}/{len} files {msg}")
        {
            entry_pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        Self { entry_pb }
    }

    /// A progress display that draws nothing
    pub fn hidden() -> Self {
        Self {
            entry_pb: ProgressBar::hidden(),
        }
    }

    /// Set the total once the archive has been opened
    pub fn set_total(&self, total_entries: u64) {
        self.entry_pb.set_length(total_entries);
    }

    /// Advance past one entry
    pub fn entry(&self, entry_name: &str) {
        // Truncate long paths for display
        let display_name = if entry_name.chars().count() > 50 {
            let tail: String = entry_name
                .chars()
                .rev()
                .take(47)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("...{tail}")
        } else {
            entry_name.to_string()
        };
        self.entry_pb.set_message(display_name);
        self.entry_pb.inc(1);
    }

    /// Clear the bar once extraction is complete
    pub fn finish(&self) {
        self.entry_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.entry_pb.abandon();
    }
}
