// ============================================================================
// proxyforge-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: UI Components and Styling
//
// Sections, status lines and the end-of-run summary. Everything here goes to
// stdout; diagnostics go through the logger on stderr. console::style drops
// its colors on its own when stdout is not a terminal.

use proxyforge_core::utils::{calculate_size_reduction, format_bytes, format_duration};
use proxyforge_core::{BatchSummary, TranscodeOutcome};

use console::style;

use std::fs;

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const ERROR_SYMBOL: &str = "✗";
    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";
    pub const STATUS_INDENT: &str = "  ";
    pub const STATUS_LABEL_WIDTH: usize = 15;
}

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    println!();
    println!(
        "{}{}{}",
        styling::SECTION_PREFIX,
        style(title.to_uppercase()).cyan().bold(),
        styling::SECTION_SUFFIX
    );
}

/// Print a status line (key-value pair)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let label = format!("{label}:");
    let value = if highlight {
        style(value).bold().to_string()
    } else {
        value.to_string()
    };
    println!(
        "{}{:<width$} {}",
        styling::STATUS_INDENT,
        label,
        value,
        width = styling::STATUS_LABEL_WIDTH + 1
    );
}

pub fn print_success(message: &str) {
    println!("{}{} {}", styling::STATUS_INDENT, styling::SUCCESS_SYMBOL, message);
}

/// Print an error with an optional hint. Goes to stderr.
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    eprintln!("{} {}", styling::ERROR_SYMBOL, style(title).red().bold());
    eprintln!("  Message:    {message}");
    if let Some(suggestion) = suggestion {
        eprintln!("  Suggestion: {suggestion}");
    }
}

fn print_outcome(outcome: &TranscodeOutcome) {
    let name = outcome.item.file_name();
    if outcome.succeeded {
        let source_size = fs::metadata(outcome.item.source_path())
            .map(|m| m.len())
            .unwrap_or(0);
        let proxy_size = outcome.proxy_size.unwrap_or(0);
        println!(
            "{}{} {} ({} -> {}, {}% smaller, {})",
            styling::STATUS_INDENT,
            styling::SUCCESS_SYMBOL,
            name,
            format_bytes(source_size),
            format_bytes(proxy_size),
            calculate_size_reduction(source_size, proxy_size),
            format_duration(outcome.elapsed.as_secs_f64())
        );
    } else {
        println!(
            "{}{} {}",
            styling::STATUS_INDENT,
            styling::ERROR_SYMBOL,
            style(name).red()
        );
    }
}

/// Prints one line per item, then the batch totals and any failures.
pub fn print_batch_summary(outcomes: &[TranscodeOutcome], summary: &BatchSummary) {
    print_section("Results");
    for outcome in outcomes {
        print_outcome(outcome);
    }

    print_section("Summary");
    print_status(
        "Succeeded",
        &format!("{}/{}", summary.succeeded, summary.items_total),
        true,
    );
    print_status("Frames", &summary.frames_processed.to_string(), false);
    print_status("Proxy size", &format_bytes(summary.proxy_bytes), false);
    print_status(
        "Total time",
        &format_duration(summary.elapsed.as_secs_f64()),
        true,
    );

    if !summary.all_succeeded() {
        print_section("Failures");
        for failure in &summary.failures {
            println!(
                "{}{} {}",
                styling::STATUS_INDENT,
                styling::ERROR_SYMBOL,
                style(failure.source_path.display()).red().bold()
            );
            for line in failure.detail.lines() {
                println!("{}{}{}", styling::STATUS_INDENT, styling::STATUS_INDENT, line);
            }
        }
    }
}
