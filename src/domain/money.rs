use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision issues.
/// For USD, 1 unit = 100 cents, so $50.00 = 5000 cents.
pub type Cents = i64;

/// Liquidity a bank starts with when none is given ($10.00).
pub const DEFAULT_LIQUIDITY: Cents = 1000;

/// Fee retained by the bank on every deposit and opening balance, in percent.
pub const FEE_PERCENT: Cents = 5;

/// Fee charged on a deposit of `amount`: 5%, truncated toward zero.
/// Example: 1700 -> 85, 10000 -> 500, 19 -> 0
pub fn compute_fee(amount: Cents) -> Cents {
    // Split so `amount * 5` never overflows for large amounts.
    (amount / 100) * FEE_PERCENT + (amount % 100) * FEE_PERCENT / 100
}

/// Format cents as a human-readable currency string.
/// Example: 5000 -> "$50.00", -1234 -> "-$12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}${}.{:02}", sign, units, remainder)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "$100" -> 10000
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, input) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let input = input.strip_prefix('$').unwrap_or(input);

    let (units_str, decimal_str) = match input.split_once('.') {
        Some((units, decimals)) => (units, Some(decimals)),
        None => (input, None),
    };

    let units: i64 = match (units_str.is_empty(), decimal_str) {
        // ".50" is fine, "" and "." are not
        (true, Some(d)) if !d.is_empty() => 0,
        _ => parse_digits(units_str)?,
    };

    let decimal_cents: i64 = match decimal_str {
        None => 0,
        Some(d) => match d.len() {
            0 => 0,
            // Single digit like "5" means 50 cents
            1 => parse_digits(d)? * 10,
            2 => parse_digits(d)?,
            // More than 2 decimal places - truncate
            _ => {
                parse_digits(d)?;
                parse_digits(&d[..2])?
            }
        },
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(ParseCentsError::OutOfRange)?;
    Ok(if negative { -cents } else { cents })
}

fn parse_digits(s: &str) -> Result<i64, ParseCentsError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat);
    }
    s.parse().map_err(|_| ParseCentsError::OutOfRange)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    OutOfRange,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::OutOfRange => write!(f, "amount out of range"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_fee() {
        assert_eq!(compute_fee(1700), 85);
        assert_eq!(compute_fee(10000), 500);
        assert_eq!(compute_fee(19), 0);
        assert_eq!(compute_fee(20), 1);
        assert_eq!(compute_fee(1), 0);
        assert_eq!(compute_fee(39), 1);
    }

    #[test]
    fn test_compute_fee_does_not_overflow() {
        assert_eq!(compute_fee(i64::MAX), i64::MAX / 100 * 5 + 7 * 5 / 100);
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "$50.00");
        assert_eq!(format_cents(1234), "$12.34");
        assert_eq!(format_cents(100), "$1.00");
        assert_eq!(format_cents(1), "$0.01");
        assert_eq!(format_cents(0), "$0.00");
        assert_eq!(format_cents(-5000), "-$50.00");
        assert_eq!(format_cents(-1), "-$0.01");
        assert_eq!(format_cents(i64::MIN), "-$92233720368547758.08");
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("50.00"), Ok(5000));
        assert_eq!(parse_cents("50"), Ok(5000));
        assert_eq!(parse_cents("12.34"), Ok(1234));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents("0.01"), Ok(1));
        assert_eq!(parse_cents(".50"), Ok(50));
        assert_eq!(parse_cents("$17.00"), Ok(1700));
        assert_eq!(parse_cents("-50.00"), Ok(-5000));
        assert_eq!(parse_cents("-$0.50"), Ok(-50));
        assert_eq!(parse_cents("100.999"), Ok(10099)); // Truncates
    }

    #[test]
    fn test_parse_cents_invalid() {
        assert_eq!(parse_cents("abc"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("12.34.56"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents(""), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("."), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("1.x"), Err(ParseCentsError::InvalidFormat));
        // At most one sign and one currency symbol
        assert_eq!(parse_cents("--5"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("$$5"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("-$-5"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(parse_cents("$-5"), Err(ParseCentsError::InvalidFormat));
        assert_eq!(
            parse_cents("99999999999999999999"),
            Err(ParseCentsError::OutOfRange)
        );
    }
}
