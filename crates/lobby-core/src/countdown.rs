/// Format remaining milliseconds as `HH:MM:SS`, floor-truncated. Negative or
/// non-finite input clamps to `00:00:00`. Hours are not wrapped at 24.
pub fn format_remaining(ms: f64) -> String {
    let total = if ms.is_finite() && ms > 0.0 {
        (ms / 1000.0).floor() as u64
    } else {
        0
    };
    let hh = total / 3600;
    let mm = (total % 3600) / 60;
    let ss = total % 60;
    format!("{:02}:{:02}:{:02}", hh, mm, ss)
}

/// Countdown label for a target timestamp: empty unless the target is still
/// in the future.
pub fn countdown_text(target_ms: f64, now_ms: f64) -> String {
    if target_ms > 0.0 && target_ms > now_ms {
        format_remaining(target_ms - now_ms)
    } else {
        String::new()
    }
}
