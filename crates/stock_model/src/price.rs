use crate::LocaleNumber;

/// Converts a price in the Macedonian locale format ("1.234,56") to a number.
///
/// Numbers pass through unchanged and a missing value is `0`. Text has every
/// `.` removed and its first `,` turned into `.` before parsing, so
/// malformed text yields `NaN` instead of an error.
pub fn format_price(price: Option<&LocaleNumber>) -> f64 {
    match price {
        Some(LocaleNumber::Number(value)) => *value,
        Some(LocaleNumber::Text(text)) => parse_float(&text.replace('.', "").replacen(',', ".", 1)),
        Some(LocaleNumber::Other(_)) | None => 0.0,
    }
}

/// Parses the longest numeric prefix of `input`, ignoring leading whitespace
/// and any trailing garbage. Returns `NaN` when no prefix is a number.
pub fn parse_float(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if trimmed[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    // exponent only counts when digits follow it
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    trimmed[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
