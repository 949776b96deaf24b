//! Start timecode normalization.
//!
//! Probers report the first-frame timecode as `HH:MM:SS:FF` for non-drop-frame
//! material and `HH:MM:SS;FF` (sometimes `.` or `,`) for drop-frame material.
//! The frame field separator is canonicalized against the rounded frame rate:
//! only the 30 and 60 fps families may keep a drop-frame `;`, every other rate
//! is forced to `:`. The canonical string is then escaped so it can be placed
//! inside a drawtext `timecode='...'` option verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

static TIMECODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})([:;.,])(\d{2,3})$").expect("valid timecode regex")
});

/// Rounded rates whose timecode may be drop-frame.
pub const DROP_FRAME_RATES: [u32; 2] = [30, 60];

#[must_use]
pub fn is_drop_frame_rate(rate: u32) -> bool {
    DROP_FRAME_RATES.contains(&rate)
}

/// Validates `raw` and rewrites its frame separator for `rate`.
///
/// Returns `None` when the string is not a timecode or a field is out of
/// range. Escaped input is accepted, so canonicalizing an already normalized
/// value after [`unescape_timecode`] is stable.
#[must_use]
pub fn canonicalize_timecode(raw: &str, rate: u32) -> Option<String> {
    let cleaned = unescape_timecode(raw.trim());
    let caps = TIMECODE_RE.captures(&cleaned)?;

    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    let seconds: u32 = caps[3].parse().ok()?;
    let frames: u32 = caps[5].parse().ok()?;
    if hours > 23 || minutes > 59 || seconds > 59 || (rate > 0 && frames >= rate) {
        return None;
    }

    let separator = match &caps[4] {
        ";" | "." | "," if is_drop_frame_rate(rate) => ';',
        _ => ':',
    };

    Some(format!(
        "{}:{}:{}{}{}",
        &caps[1], &caps[2], &caps[3], separator, &caps[5]
    ))
}

/// Backslash-escapes every `:` and `;`.
#[must_use]
pub fn escape_timecode(canonical: &str) -> String {
    let mut escaped = String::with_capacity(canonical.len() + 4);
    for c in canonical.chars() {
        if c == ':' || c == ';' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Removes the escaping added by [`escape_timecode`].
#[must_use]
pub fn unescape_timecode(escaped: &str) -> String {
    escaped.replace("\\:", ":").replace("\\;", ";")
}

/// Canonicalizes and escapes a raw prober timecode in one step.
#[must_use]
pub fn normalize_timecode(raw: &str, rate: u32) -> Option<String> {
    canonicalize_timecode(raw, rate).map(|canonical| escape_timecode(&canonical))
}
