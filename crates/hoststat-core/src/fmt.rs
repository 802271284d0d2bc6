//! Shared formatting helpers for command-line output.
//!
//! Pure functions only. Functions that differ between compact table columns
//! and verbose detail lines are parameterized via [`FmtStyle`].

/// Controls compact (table columns) vs verbose (detail lines) output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FmtStyle {
    /// Compact: no spaces, short suffixes ("1.5G", "3.2s")
    Compact,
    /// Detail: spaces, full suffixes ("1.5 GiB")
    Detail,
}

/// Format byte count as human-readable size.
///
/// Compact: `"1.5G"`, `"100.3M"`, `"50.0K"`, `"512B"`
/// Detail:  `"1.5 GiB"`, `"100.3 MiB"`, `"50.0 KiB"`, `"512 B"`
pub fn format_bytes(bytes: u64, style: FmtStyle) -> String {
    let (t, g, m, k, b) = match style {
        FmtStyle::Compact => ("T", "G", "M", "K", "B"),
        FmtStyle::Detail => (" TiB", " GiB", " MiB", " KiB", " B"),
    };
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;
    const TIB: u64 = GIB * 1024;

    let f = bytes as f64;
    if bytes >= TIB {
        format!("{:.1}{}", f / TIB as f64, t)
    } else if bytes >= GIB {
        format!("{:.1}{}", f / GIB as f64, g)
    } else if bytes >= MIB {
        format!("{:.1}{}", f / MIB as f64, m)
    } else if bytes >= KIB {
        format!("{:.1}{}", f / KIB as f64, k)
    } else {
        format!("{}{}", bytes, b)
    }
}

/// Format milliseconds as human-readable.
///
/// Compact has an hour case (`>= 3_600_000` -> `"1.5h"`); Detail stops at seconds.
pub fn format_ms(ms: u64, style: FmtStyle) -> String {
    let f = ms as f64;
    match style {
        FmtStyle::Compact => {
            if ms >= 3_600_000 {
                format!("{:.1}h", f / 3_600_000.0)
            } else if ms >= 60_000 {
                format!("{:.1}m", f / 60_000.0)
            } else if ms >= 1_000 {
                format!("{:.1}s", f / 1_000.0)
            } else {
                format!("{}ms", ms)
            }
        }
        FmtStyle::Detail => {
            if ms >= 1000 {
                format!("{:.1}s", f / 1000.0)
            } else {
                format!("{}ms", ms)
            }
        }
    }
}

/// Format a percentage with one decimal, e.g. `"48.8%"`.
pub fn format_percent(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Truncate string to `max_len` characters with unicode ellipsis (`…`).
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// Replace control characters with visible escapes for single-line display.
///
/// Serial numbers read from sysfs keep their trailing newline; this makes it visible.
pub fn escape_control(s: &str) -> String {
    s.chars().flat_map(char::escape_default).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512, FmtStyle::Compact), "512B");
        assert_eq!(format_bytes(1536, FmtStyle::Compact), "1.5K");
        assert_eq!(format_bytes(8 << 30, FmtStyle::Compact), "8.0G");
        assert_eq!(format_bytes(8 << 30, FmtStyle::Detail), "8.0 GiB");
        assert_eq!(format_bytes(3 << 40, FmtStyle::Detail), "3.0 TiB");
        assert_eq!(format_bytes(0, FmtStyle::Detail), "0 B");
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(250, FmtStyle::Compact), "250ms");
        assert_eq!(format_ms(12_500, FmtStyle::Compact), "12.5s");
        assert_eq!(format_ms(90_000, FmtStyle::Compact), "1.5m");
        assert_eq!(format_ms(5_400_000, FmtStyle::Compact), "1.5h");
        assert_eq!(format_ms(90_000, FmtStyle::Detail), "90.0s");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(48.8), "48.8%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("/dev/ada0p2", 20), "/dev/ada0p2");
        assert_eq!(truncate("zroot/ROOT/default", 8), "zroot/R…");
        assert_eq!(truncate("ñññññ", 3), "ññ…");
    }

    #[test]
    fn test_escape_control() {
        assert_eq!(escape_control("WDC\n_XYZ\n"), "WDC\\n_XYZ\\n");
        assert_eq!(escape_control("ABC123"), "ABC123");
    }
}
