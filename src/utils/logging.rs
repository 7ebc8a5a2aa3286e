// file: src/utils/logging.rs
// description: Tracing subscriber initialization and colored terminal formatting

use crate::models::ScoreGrade;
use crate::search::Segment;
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init_logger(colored_output: bool, verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(verbose)
        .with_line_number(verbose)
        .with_writer(std::io::stderr)
        .compact()
        .with_ansi(colored_output);

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg.green())
}

pub fn format_error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg.red())
}

pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "⚠".yellow().bold(), msg.yellow())
}

pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}

pub fn format_step(step: usize, total: usize, msg: &str) -> String {
    format!("{} {}", format!("[{}/{}]", step, total).cyan().bold(), msg)
}

pub fn format_score(label: &str, score: f64) -> String {
    let value = format!("{:.0}%", score * 100.0);
    let value = match ScoreGrade::from_score(score) {
        ScoreGrade::Good => value.green(),
        ScoreGrade::Fair => value.yellow(),
        ScoreGrade::Poor => value.red(),
    };
    format!("{:<22} {}", label, value.bold())
}

/// Renders highlighted segments in bold yellow.
pub fn format_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| {
            if segment.highlighted {
                segment.text.yellow().bold().to_string()
            } else {
                segment.text.clone()
            }
        })
        .collect()
}
