//! Human-readable file sizes.

/// Unit prefixes for successive powers of 1024, starting at 1024^1.
/// Six entries cover every `u64`.
const UNIT_PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Formats a byte count for the status bar.
///
/// Sizes below 1024 are shown as `"<n> B"`. Larger sizes are scaled by the
/// largest power of 1024 not exceeding them and shown with one decimal,
/// e.g. `"1.5 KB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    // floor(log1024(bytes)), computed exactly.
    let mut exp = 0;
    let mut rest = bytes;
    while rest >= 1024 && exp < UNIT_PREFIXES.len() {
        rest /= 1024;
        exp += 1;
    }

    let value = bytes as f64 / 1024f64.powi(exp as i32);
    // Half away from zero, so 1.25 KB reads "1.3 KB".
    let rounded = (value * 10.0).round() / 10.0;
    format!("{:.1} {}B", rounded, UNIT_PREFIXES[exp - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes() {
        for b in 0..1024u64 {
            assert_eq!(format_size(b), format!("{} B", b));
        }
    }

    #[test]
    fn test_kilobytes() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1280), "1.3 KB");
        assert_eq!(format_size(10 * 1024 + 102), "10.1 KB");
    }

    #[test]
    fn test_just_below_next_unit() {
        assert_eq!(format_size(1024 * 1024 - 1), "1024.0 KB");
    }

    #[test]
    fn test_larger_units() {
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
        assert_eq!(format_size(1 << 30), "1.0 GB");
        assert_eq!(format_size(1 << 40), "1.0 TB");
        assert_eq!(format_size(1 << 50), "1.0 PB");
        assert_eq!(format_size(1 << 60), "1.0 EB");
    }

    #[test]
    fn test_max_size() {
        assert_eq!(format_size(u64::MAX), "16.0 EB");
    }
}
