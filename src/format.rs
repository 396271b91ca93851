//! Display helpers for dates, prices and counts.

use chrono::{DateTime, Utc};

/// "Jan 5, 2024"; "unknown date" when the backend sent none.
pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => "unknown date".to_string(),
    }
}

/// Whole amounts print without decimals, the rest with two.
pub fn format_price(price: f64) -> String {
    let sign = if price < 0.0 { "-" } else { "" };
    let amount = price.abs();
    if amount.fract() == 0.0 {
        format!("{}${}", sign, group_digits(&format!("{:.0}", amount)))
    } else {
        format!("{}${:.2}", sign, amount)
    }
}

/// 2845 -> "2,845"
pub fn group_thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Cuts `text` to at most `max_chars` characters, ending with "…" when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wraps to `width` and keeps at most `max_lines`, marking the cut with "…".
pub fn clamp_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines = wrap(text, width);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = truncate(&format!("{} …", last), width);
            if !last.ends_with('…') {
                last.push('…');
            }
        }
    }
    lines
}

/// Upper-cases the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 23, 59, 0).unwrap();
        assert_eq!(format_date(Some(&date)), "Jan 5, 2024");
        assert_eq!(format_date(None), "unknown date");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(99.0), "$99");
        assert_eq!(format_price(0.0), "$0");
        assert_eq!(format_price(12.5), "$12.50");
        assert_eq!(format_price(18750.0), "$18,750");
        assert_eq!(format_price(-5.0), "-$5");
        assert_eq!(format_price(-2.25), "-$2.25");
        assert_eq!(format_price(1e20), "$100,000,000,000,000,000,000");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(2845), "2,845");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer sentence", 9), "a longer…");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(
            wrap("one two three four", 9),
            vec!["one two", "three", "four"]
        );
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn test_clamp_lines() {
        let lines = clamp_lines("aaa bbb ccc ddd eee", 7, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "aaa bbb");
        assert!(lines[1].ends_with('…'));
        assert!(lines[1].chars().count() <= 8);

        assert_eq!(clamp_lines("fits", 10, 2), vec!["fits"]);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("frontend"), "Frontend");
        assert_eq!(capitalize(""), "");
    }
}
