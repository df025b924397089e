// File: crates/dash-core/src/format.rs
// Summary: Display formatting for prices, percentages and counts, plus markup escaping.

/// `$123.45`
pub fn money(v: f64) -> String {
    if v < 0.0 {
        format!("-${:.2}", -v)
    } else {
        format!("${v:.2}")
    }
}

/// `12.34%`
pub fn pct(v: f64) -> String {
    format!("{v:.2}%")
}

/// `+12.34%` / `-1.20%`
pub fn signed_pct(v: f64) -> String {
    format!("{v:+.2}%")
}

/// Rounded count with thousands separators: `1,234,567`.
pub fn count(v: f64) -> String {
    if !v.is_finite() {
        return "n/a".to_string();
    }
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Escape text for HTML or SVG content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats() {
        assert_eq!(money(182.5), "$182.50");
        assert_eq!(money(-3.0), "-$3.00");
        assert_eq!(pct(0.0), "0.00%");
        assert_eq!(signed_pct(10.0), "+10.00%");
        assert_eq!(signed_pct(-1.2), "-1.20%");
        assert_eq!(count(1234567.4), "1,234,567");
        assert_eq!(count(999.0), "999");
        assert_eq!(count(-1000.0), "-1,000");
        assert_eq!(count(f64::NAN), "n/a");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<a href=\"x\">B&B</a>"), "&lt;a href=&quot;x&quot;&gt;B&amp;B&lt;/a&gt;");
        assert_eq!(escape("O'Neil"), "O&#39;Neil");
    }
}
