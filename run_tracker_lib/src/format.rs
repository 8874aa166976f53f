/// Formats a duration as zero-padded `HH:MM:SS`. Hours are not wrapped at
/// 24. A negative duration is a contract violation on the caller's side
/// and is a hard error rather than a nonsense string.
pub fn format_duration(ms: i64) -> Result<String, &'static str> {
    if ms < 0 {
        return Err("Duration must be non-negative");
    }

    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    Ok(format!("{:02}:{:02}:{:02}", hours, minutes, seconds))
}

/// Fixed-decimal number rendering, Danish convention: comma as the decimal
/// separator, dot as the thousands separator.
pub fn format_number(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value);
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped},{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
