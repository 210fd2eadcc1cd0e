/// Parsing of human-readable YouTube counts ("1.2K subscribers", "10,234 views")

/// Convert an abbreviated count into an integer.
///
/// The first numeric run (digits, `,` separators, `.`) is read, including a decimal point
/// directly in front of its first digit (".5K"). If a standalone magnitude
/// letter (`K`, `M` or `B`, any case) follows it, the value is scaled and rounded; otherwise the
/// separators are dropped and the integer part is parsed. Returns `None` when there is no
/// numeric content so callers can tell "absent" from zero.
pub fn parse_count(text: &str) -> Option<u64> {
    let chars: Vec<char> = text.chars().collect();
    let first_digit = chars.iter().position(|c| c.is_ascii_digit())?;
    let start = match first_digit.checked_sub(1) {
        Some(point) if chars[point] == '.' => point,
        _ => first_digit,
    };

    let mut end = first_digit;
    while end < chars.len() && (chars[end].is_ascii_digit() || chars[end] == '.' || chars[end] == ',') {
        end += 1;
    }
    let mut numeric = String::new();
    if start < first_digit {
        numeric.push('0');
    }
    numeric.extend(chars[start..end].iter().filter(|c| **c != ','));

    let multiplier = match magnitude_suffix(&chars[end..]) {
        Some('K') => 1_000f64,
        Some('M') => 1_000_000f64,
        Some('B') => 1_000_000_000f64,
        _ => return parse_plain_integer(&numeric),
    };

    let value: f64 = numeric.trim_end_matches('.').parse().ok()?;
    Some((value * multiplier).round() as u64)
}

/// Magnitude letter directly after a number, ignoring whitespace.
///
/// The letter has to stand alone: "63 subscribers" has no suffix even though it contains a `b`.
fn magnitude_suffix(rest: &[char]) -> Option<char> {
    let mut iter = rest.iter().skip_while(|c| c.is_whitespace());
    let letter = iter.next()?.to_ascii_uppercase();
    if !matches!(letter, 'K' | 'M' | 'B') {
        return None;
    }
    match iter.next() {
        Some(next) if next.is_alphabetic() => None,
        _ => Some(letter),
    }
}

/// Integer part of a separator-free number ("1234", "12.7" -> 12)
fn parse_plain_integer(numeric: &str) -> Option<u64> {
    let digits: String = numeric.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Leading integer after stripping thousands separators ("1,234 videos" -> 1234).
///
/// Used for the channel video count, which YouTube renders without magnitude suffixes.
pub fn parse_grouped_integer(text: &str) -> Option<u64> {
    let stripped = text.replace(',', "");
    parse_plain_integer(stripped.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_suffixes() {
        assert_eq!(parse_count("1.2K"), Some(1200));
        assert_eq!(parse_count("3M"), Some(3_000_000));
        assert_eq!(parse_count("2.5b"), Some(2_500_000_000));
        assert_eq!(parse_count("1.25K"), Some(1250));
        assert_eq!(parse_count("7 K"), Some(7000));
    }

    #[test]
    fn test_leading_decimal_point() {
        assert_eq!(parse_count(".5K"), Some(500));
        assert_eq!(parse_count(".5K subscribers"), Some(500));
        assert_eq!(parse_count(".25M"), Some(250_000));
        assert_eq!(parse_count(".5"), Some(0));
    }

    #[test]
    fn test_grouped_numbers() {
        assert_eq!(parse_count("10,234"), Some(10234));
        assert_eq!(parse_count("520 views"), Some(520));
        assert_eq!(parse_count("1,204,551 views"), Some(1_204_551));
    }

    #[test]
    fn test_trailing_words_do_not_scale() {
        // "subscribers" contains two b's; they must not be read as billions
        assert_eq!(parse_count("63 subscribers"), Some(63));
        assert_eq!(parse_count("1.2K subscribers"), Some(1200));
        assert_eq!(parse_count("4.7M views"), Some(4_700_000));
        assert_eq!(parse_count("5 billion"), Some(5));
    }

    #[test]
    fn test_absent_is_not_zero() {
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("garbage"), None);
        assert_eq!(parse_count("No views"), None);
        assert_eq!(parse_count("0"), Some(0));
    }

    #[test]
    fn test_grouped_integer() {
        assert_eq!(parse_grouped_integer("1,234"), Some(1234));
        assert_eq!(parse_grouped_integer("20 videos"), Some(20));
        assert_eq!(parse_grouped_integer("videos"), None);
    }
}
