//! Floating-point conversion boundary.
//!
//! Formatting takes the shortest round-trip digits from ryu and re-emits
//! them under ECMAScript-style notation rules: decimal notation while the
//! scientific exponent lies in [-6, 21), otherwise exponent notation with
//! an explicit sign, `-0` collapsed to `0`, `1e5000` for infinities and
//! `null` for NaN.
//!
//! Parsing is partial: it tolerates leading whitespace, a case-insensitive
//! exponent marker and arbitrary trailing junk, and reports the number of
//! bytes it consumed. A non-positive count means no number was found.

/// Append the shortest round-trip rendering of a double.
pub(crate) fn format_double(value: f64, out: &mut String) {
    if value.is_nan() {
        out.push_str("null");
        return;
    }
    if value.is_infinite() {
        out.push_str(if value < 0.0 { "-1e5000" } else { "1e5000" });
        return;
    }
    if value == 0.0 {
        out.push('0');
        return;
    }
    let mut buffer = ryu::Buffer::new();
    reemit(buffer.format_finite(value), out);
}

/// Append the shortest round-trip rendering of a single.
pub(crate) fn format_single(value: f32, out: &mut String) {
    if value.is_nan() {
        out.push_str("null");
        return;
    }
    if value.is_infinite() {
        out.push_str(if value < 0.0 { "-1e5000" } else { "1e5000" });
        return;
    }
    if value == 0.0 {
        out.push('0');
        return;
    }
    let mut buffer = ryu::Buffer::new();
    reemit(buffer.format_finite(value), out);
}

// Re-emit a non-zero shortest-form literal ("3.14", "1e20", "-1.5e-7", ...)
// with the decimal point moved into the [-6, 21) notation window.
fn reemit(shortest: &str, out: &mut String) {
    let s = shortest.as_bytes();
    let mut i = 0;
    let negative = s[0] == b'-';
    if negative {
        i += 1;
    }

    let mut digits: Vec<u8> = Vec::with_capacity(s.len());
    let mut point: i32 = 0;
    let mut seen_dot = false;
    while i < s.len() {
        match s[i] {
            b'.' => seen_dot = true,
            b'e' | b'E' => break,
            digit => {
                digits.push(digit);
                if !seen_dot {
                    point += 1;
                }
            }
        }
        i += 1;
    }
    if i < s.len() {
        i += 1;
        let mut sign = 1i32;
        if s[i] == b'+' {
            i += 1;
        } else if s[i] == b'-' {
            sign = -1;
            i += 1;
        }
        let mut exponent = 0i32;
        while i < s.len() {
            exponent = exponent * 10 + i32::from(s[i] - b'0');
            i += 1;
        }
        point += sign * exponent;
    }

    // The value is digits interpreted as 0.DDD... scaled by 10^point; strip
    // the zeros ryu keeps around the decimal point.
    let mut first = 0;
    while first < digits.len() && digits[first] == b'0' {
        first += 1;
        point -= 1;
    }
    let mut last = digits.len();
    while last > first && digits[last - 1] == b'0' {
        last -= 1;
    }
    let digits = &digits[first..last];

    if negative {
        out.push('-');
    }
    let sci = point - 1;
    if (-6..21).contains(&sci) {
        if point <= 0 {
            out.push_str("0.");
            for _ in point..0 {
                out.push('0');
            }
            push_digits(out, digits);
        } else if point as usize >= digits.len() {
            push_digits(out, digits);
            for _ in digits.len()..point as usize {
                out.push('0');
            }
        } else {
            push_digits(out, &digits[..point as usize]);
            out.push('.');
            push_digits(out, &digits[point as usize..]);
        }
    } else {
        push_digits(out, &digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            push_digits(out, &digits[1..]);
        }
        out.push('e');
        out.push(if sci < 0 { '-' } else { '+' });
        let mut scratch = itoa::Buffer::new();
        out.push_str(scratch.format(sci.abs()));
    }
}

fn push_digits(out: &mut String, digits: &[u8]) {
    for &digit in digits {
        out.push(digit as char);
    }
}

/// Partial string-to-double parse.
///
/// Returns the value and the number of bytes consumed from the front of
/// `bytes`; a consumed count of zero or less means failure. The exponent
/// part is only consumed when at least one digit follows the marker, so a
/// literal like `1e]` leaves the cursor right before the `e`.
pub(crate) fn parse_partial(bytes: &[u8]) -> (f64, isize) {
    let mut i = 0;
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C) {
        i += 1;
    }
    let start = i;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let mut digits = 0usize;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        let mut j = i + 1;
        let mut fraction = 0usize;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
            fraction += 1;
        }
        if digits > 0 || fraction > 0 {
            i = j;
            digits += fraction;
        }
    }
    if digits == 0 {
        return (0.0, 0);
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let mut exponent = 0usize;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
            exponent += 1;
        }
        if exponent > 0 {
            i = j;
        }
    }
    let literal = match std::str::from_utf8(&bytes[start..i]) {
        Ok(literal) => literal,
        Err(_) => return (0.0, 0),
    };
    match literal.parse::<f64>() {
        Ok(value) => (value, i as isize),
        Err(_) => (0.0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: f64) -> String {
        let mut out = String::new();
        format_double(value, &mut out);
        out
    }

    #[test]
    fn test_format_zero_is_unique() {
        assert_eq!(fmt(0.0), "0");
        assert_eq!(fmt(-0.0), "0");
    }

    #[test]
    fn test_format_decimal_window() {
        assert_eq!(fmt(1.0), "1");
        assert_eq!(fmt(100.0), "100");
        assert_eq!(fmt(3.14), "3.14");
        assert_eq!(fmt(-0.5), "-0.5");
        assert_eq!(fmt(1e20), "100000000000000000000");
        assert_eq!(fmt(1e-6), "0.000001");
        assert_eq!(fmt(0.0000015), "0.0000015");
    }

    #[test]
    fn test_format_exponent_window() {
        assert_eq!(fmt(1e21), "1e+21");
        assert_eq!(fmt(1e-7), "1e-7");
        assert_eq!(fmt(2.5e-7), "2.5e-7");
        assert_eq!(fmt(-1.2312312312312312e29), "-1.2312312312312312e+29");
        assert_eq!(fmt(5e-324), "5e-324");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(fmt(f64::NAN), "null");
        assert_eq!(fmt(f64::INFINITY), "1e5000");
        assert_eq!(fmt(f64::NEG_INFINITY), "-1e5000");
    }

    #[test]
    fn test_format_single() {
        let mut out = String::new();
        format_single(0.25f32, &mut out);
        assert_eq!(out, "0.25");
        out.clear();
        format_single(f32::NEG_INFINITY, &mut out);
        assert_eq!(out, "-1e5000");
    }

    #[test]
    fn test_format_round_trips() {
        for value in [
            1.5,
            -9876.54321,
            0.123456789e-12,
            1.234567890e34,
            f64::MAX,
            f64::MIN_POSITIVE,
        ] {
            let text = fmt(value);
            assert_eq!(text.parse::<f64>().ok(), Some(value), "literal {text}");
        }
    }

    #[test]
    fn test_parse_partial_plain() {
        assert_eq!(parse_partial(b"3.14]"), (3.14, 4));
        assert_eq!(parse_partial(b"-12,"), (-12.0, 3));
        assert_eq!(parse_partial(b"1E5 "), (100000.0, 3));
    }

    #[test]
    fn test_parse_partial_stops_before_bad_exponent() {
        assert_eq!(parse_partial(b"1e"), (1.0, 1));
        assert_eq!(parse_partial(b"1e+"), (1.0, 1));
        assert_eq!(parse_partial(b"2.5ex"), (2.5, 3));
    }

    #[test]
    fn test_parse_partial_underflow_and_junk() {
        let (value, consumed) = parse_partial(b"123.456e-789");
        assert_eq!(consumed, 12);
        assert_eq!(value, 0.0);
        assert_eq!(parse_partial(b"junk").1, 0);
        assert_eq!(parse_partial(b"-").1, 0);
        assert_eq!(parse_partial(b"").1, 0);
    }

    #[test]
    fn test_parse_partial_leading_whitespace() {
        assert_eq!(parse_partial(b"  2.5"), (2.5, 5));
    }
}
