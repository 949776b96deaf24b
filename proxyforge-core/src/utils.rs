//! Formatting helpers shared by the core and the CLI.

/// Clock-style elapsed time, `HH:MM:SS`; hours are not wrapped at 24.
///
/// Negative or non-finite input renders as `--:--:--`.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "--:--:--".to_string();
    }
    let whole = seconds.trunc() as u64;
    format!(
        "{:02}:{:02}:{:02}",
        whole / 3600,
        whole / 60 % 60,
        whole % 60
    )
}

/// Human-readable size in binary units, two decimals above one KiB.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// Percentage of `source_size` saved by the proxy. 0 when nothing was saved.
#[must_use]
pub fn calculate_size_reduction(source_size: u64, proxy_size: u64) -> u64 {
    if source_size == 0 || proxy_size >= source_size {
        0
    } else {
        100 - ((u128::from(proxy_size) * 100) / u128::from(source_size)) as u64
    }
}

/// Formats a frame count against an optional total ("120/1000" or "120").
#[must_use]
pub fn format_frames(frames_done: u64, frames_total: Option<u64>) -> String {
    match frames_total {
        Some(total) => format!("{frames_done}/{total}"),
        None => frames_done.to_string(),
    }
}
