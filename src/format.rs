//! en-US style decimal rendering.

/// Render `value` the way `en-US` number formatting does with a cap on
/// fraction digits: round half away from zero, drop trailing zeros, group the
/// integer part by thousands.
///
/// Rounding works on the shortest decimal representation of `value`, so
/// `1.005` rounds up to `1.01` even though the nearest `f64` sits just below it.
///
/// ```
/// use marquee::format::format_decimal;
///
/// assert_eq!(format_decimal(3.14159, 2), "3.14");
/// assert_eq!(format_decimal(1234567.0, 2), "1,234,567");
/// ```
pub fn format_decimal(value: f64, max_fraction_digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let repr = value.abs().to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut int_len = int_part.len();
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(max_fraction_digits))
        .map(|b| b - b'0')
        .collect();

    let round_up = frac_part
        .as_bytes()
        .get(max_fraction_digits)
        .is_some_and(|&d| d >= b'5');
    if round_up && !increment(&mut digits) {
        digits.insert(0, 1);
        int_len += 1;
    }

    let (int_digits, frac_digits) = digits.split_at(int_len);
    let frac_len = frac_digits
        .iter()
        .rposition(|&d| d != 0)
        .map_or(0, |last| last + 1);
    let frac_digits = &frac_digits[..frac_len];

    let is_zero = int_digits.iter().chain(frac_digits).all(|&d| d == 0);
    let mut out = String::with_capacity(digits.len() + int_len / 3 + 2);
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    for (i, d) in int_digits.iter().enumerate() {
        if i > 0 && (int_len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(char::from(b'0' + d));
    }
    if !frac_digits.is_empty() {
        out.push('.');
        out.extend(frac_digits.iter().map(|d| char::from(b'0' + d)));
    }
    out
}

/// Add one unit in the last place. Returns false when the carry runs off the front.
fn increment(digits: &mut [u8]) -> bool {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_have_no_fraction() {
        assert_eq!(format_decimal(0.0, 2), "0");
        assert_eq!(format_decimal(3.0, 2), "3");
        assert_eq!(format_decimal(2.5, 2), "2.5");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_decimal(3.14159, 2), "3.14");
        assert_eq!(format_decimal(2.675, 2), "2.68");
        assert_eq!(format_decimal(1.005, 2), "1.01");
        assert_eq!(format_decimal(-1.005, 2), "-1.01");
        assert_eq!(format_decimal(2.5, 0), "3");
    }

    #[test]
    fn carry_propagates_into_integer_part() {
        assert_eq!(format_decimal(2.999, 2), "3");
        assert_eq!(format_decimal(9.995, 2), "10");
        assert_eq!(format_decimal(999.999, 2), "1,000");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_decimal(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_decimal(-12345.0, 2), "-12,345");
        assert_eq!(format_decimal(100.0, 2), "100");
    }

    #[test]
    fn negative_values_rounding_to_zero_drop_the_sign() {
        assert_eq!(format_decimal(-0.001, 2), "0");
        assert_eq!(format_decimal(-0.0, 2), "0");
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(format_decimal(f64::NAN, 2), "NaN");
        assert_eq!(format_decimal(f64::INFINITY, 2), "∞");
        assert_eq!(format_decimal(f64::NEG_INFINITY, 2), "-∞");
    }
}
