use rust_decimal::Decimal;

/// Format an amount with thousands separators and two decimals: 1,234.56
pub fn money(val: Decimal) -> String {
    let rounded = val.round_dp(2);
    let negative = rounded < Decimal::ZERO;
    let cents = format!("{:.2}", rounded.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

/// Like `money`, but shows a dash for a missing amount.
pub fn money_opt(val: Option<Decimal>) -> String {
    val.map(money).unwrap_or_else(|| "\u{2014}".to_string())
}

/// Compact axis label: 950, 2.5k, 12k, 1.2M.
pub fn compact(val: f64) -> String {
    if val >= 1_000_000.0 {
        let m = val / 1_000_000.0;
        if m == m.floor() {
            format!("{}M", m as u64)
        } else {
            format!("{:.1}M", m)
        }
    } else if val >= 1000.0 {
        let k = val / 1000.0;
        if k == k.floor() {
            format!("{}k", k as u64)
        } else {
            format!("{:.1}k", k)
        }
    } else {
        format!("{}", val.max(0.0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(dec("1234.56")), "1,234.56");
        assert_eq!(money(dec("-500")), "-500.00");
        assert_eq!(money(Decimal::ZERO), "0.00");
        assert_eq!(money(dec("1000000.99")), "1,000,000.99");
        assert_eq!(money(dec("42.1")), "42.10");
        assert_eq!(money(dec("12.345")), "12.34");
        assert_eq!(money(dec("-0.001")), "0.00");
    }

    #[test]
    fn test_money_opt_missing() {
        assert_eq!(money_opt(None), "\u{2014}");
        assert_eq!(money_opt(Some(Decimal::from(5))), "5.00");
    }

    #[test]
    fn test_compact() {
        assert_eq!(compact(950.0), "950");
        assert_eq!(compact(2500.0), "2.5k");
        assert_eq!(compact(12000.0), "12k");
        assert_eq!(compact(1_200_000.0), "1.2M");
    }
}
