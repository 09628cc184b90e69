pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Parses the leading integer of `value`, ignoring surrounding whitespace and
/// any trailing non-digit text (`"500+"` -> 500). Returns `None` when no digit
/// follows the optional sign. Values too wide for `i64` saturate.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .bytes()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].bytes().fold(0_i64, |total, digit| {
        total
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

pub fn short_label(name: &str) -> String {
    const MAX_CHARS: usize = 15;

    if name.chars().count() > MAX_CHARS {
        let head = name.chars().take(MAX_CHARS).collect::<String>();
        format!("{head}...")
    } else {
        name.to_owned()
    }
}
