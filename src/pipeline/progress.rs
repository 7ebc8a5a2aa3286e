// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for ingestion runs
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestionStats {
    pub pages_extracted: usize,
    pub fragments_read: usize,
    pub fragments_skipped: usize,
    pub sections_built: usize,
    pub total_bytes_processed: u64,
    pub duration_ms: u64,
}

impl IngestionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.pages_extracted as f64 * 1000.0 / self.duration_ms as f64
    }

    /// Share of fragments that carried text, in percent.
    pub fn usable_fragment_rate(&self) -> f64 {
        if self.fragments_read == 0 {
            return 0.0;
        }
        let usable = self.fragments_read - self.fragments_skipped.min(self.fragments_read);
        (usable as f64 / self.fragments_read as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    pages_extracted: AtomicUsize,
    fragments_read: AtomicUsize,
    fragments_skipped: AtomicUsize,
    sections_built: AtomicUsize,
    bytes_processed: AtomicU64,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(total_pages: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();
        Self::build(multi_progress, total_pages, colored)
    }

    /// Tracks counts without drawing anything.
    pub fn hidden() -> Self {
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        Self::build(multi_progress, 0, false)
    }

    fn build(multi_progress: MultiProgress, total_pages: usize, colored: bool) -> Self {
        let main_bar = create_progress_bar(&multi_progress, total_pages as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            pages_extracted: AtomicUsize::new(0),
            fragments_read: AtomicUsize::new(0),
            fragments_skipped: AtomicUsize::new(0),
            sections_built: AtomicUsize::new(0),
            bytes_processed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn set_total_pages(&self, total: usize) {
        self.main_bar.set_length(total as u64);
    }

    pub fn inc_pages_extracted(&self) {
        self.pages_extracted.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn add_fragments(&self, read: usize, skipped: usize) {
        self.fragments_read.fetch_add(read, Ordering::SeqCst);
        self.fragments_skipped.fetch_add(skipped, Ordering::SeqCst);
        self.update_detail_bar();
    }

    pub fn set_sections_built(&self, sections: usize) {
        self.sections_built.store(sections, Ordering::SeqCst);
        self.update_detail_bar();
    }

    pub fn add_bytes_processed(&self, bytes: u64) {
        self.bytes_processed.fetch_add(bytes, Ordering::SeqCst);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Ingestion complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn abandon(&self, reason: &str) {
        self.main_bar.abandon_with_message(reason.to_string());
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> IngestionStats {
        IngestionStats {
            pages_extracted: self.pages_extracted.load(Ordering::SeqCst),
            fragments_read: self.fragments_read.load(Ordering::SeqCst),
            fragments_skipped: self.fragments_skipped.load(Ordering::SeqCst),
            sections_built: self.sections_built.load(Ordering::SeqCst),
            total_bytes_processed: self.bytes_processed.load(Ordering::SeqCst),
            duration_ms: self.start_time.elapsed().as_millis() as u64,
        }
    }

    fn update_detail_bar(&self) {
        let fragments = self.fragments_read.load(Ordering::SeqCst);
        let skipped = self.fragments_skipped.load(Ordering::SeqCst);
        let sections = self.sections_built.load(Ordering::SeqCst);

        let message = format!(
            "Fragments: {} | Skipped: {} | Sections: {}",
            fragments, skipped, sections
        );

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        if !self.main_bar.is_finished() {
            self.finish();
        }
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] page {pos}/{len} {msg}"
    } else {
        "{spinner} [{elapsed_precise}] [{bar:40}] page {pos}/{len} {msg}"
    };
    let chars = if colored { "█▓▒░" } else { "=>-" };

    match ProgressStyle::default_bar().template(template) {
        Ok(style) => bar.set_style(style.progress_chars(chars)),
        Err(e) => tracing::warn!("Invalid progress bar template: {}", e),
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
