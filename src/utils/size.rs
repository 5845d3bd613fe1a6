//! Human-readable byte sizes using 1024-based units.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Decimal places used by [`format_bytes_default`].
pub const DEFAULT_DECIMALS: usize = 2;

/// Formats `bytes` with the largest unit whose scaled value is at least one.
///
/// The value is rounded to `decimals` places and trailing zeros are dropped,
/// so 1536 bytes is `"1.5 KB"` and 1024 bytes is `"1 KB"`. Sizes past the GB
/// range stay in GB.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale: u64 = 1;
    while unit + 1 < UNITS.len() && bytes / scale >= 1024 {
        scale *= 1024;
        unit += 1;
    }

    let value = bytes as f64 / scale as f64;
    let fixed = format!("{value:.decimals$}");
    format!("{} {}", trim_fraction(&fixed), UNITS[unit])
}

/// [`format_bytes`] with two decimal places.
pub fn format_bytes_default(bytes: u64) -> String {
    format_bytes(bytes, DEFAULT_DECIMALS)
}

fn trim_fraction(fixed: &str) -> &str {
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed
    }
}
