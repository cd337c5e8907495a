/// Format integer cents as a pt-BR amount with thousands separators: 1.234,56
pub fn money(cents: i64) -> String {
    let negative = cents < 0;
    let abs = cents.unsigned_abs();
    let int_part = (abs / 100).to_string();
    let dec_part = abs % 100;

    let mut with_dots = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_dots.push('.');
        }
        with_dots.push(c);
    }
    let with_dots: String = with_dots.chars().rev().collect();

    if negative {
        format!("-{with_dots},{dec_part:02}")
    } else {
        format!("{with_dots},{dec_part:02}")
    }
}

/// Parse a pt-BR currency string ("R$ 1.234,56") into integer cents.
/// Dots are thousands separators and the comma is the decimal mark.
pub fn parse_brl(raw: &str) -> Option<i64> {
    let s = raw.replace("R$", "").replace('"', "");
    let s = s.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, s),
    };
    let s = s.replace('.', "");

    let (int_part, dec_part) = match s.split_once(',') {
        Some((i, d)) => (i, d),
        None => (s.as_str(), "00"),
    };
    if int_part.is_empty() && dec_part.is_empty() {
        return None;
    }

    let int: i64 = if int_part.is_empty() { 0 } else { int_part.parse().ok()? };
    let mut dec = dec_part.to_string();
    dec.truncate(2);
    while dec.len() < 2 {
        dec.push('0');
    }
    let dec: i64 = dec.parse().ok()?;

    let cents = int * 100 + dec;
    Some(if negative { -cents } else { cents })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(123_456), "1.234,56");
        assert_eq!(money(-50_000), "-500,00");
        assert_eq!(money(0), "0,00");
        assert_eq!(money(100_000_099), "1.000.000,99");
        assert_eq!(money(4_210), "42,10");
    }

    #[test]
    fn test_parse_brl() {
        assert_eq!(parse_brl("1.234,56"), Some(123_456));
        assert_eq!(parse_brl("R$ 150,00"), Some(15_000));
        assert_eq!(parse_brl("\"2.000,00\""), Some(200_000));
        assert_eq!(parse_brl("  -42,50  "), Some(-4_250));
        assert_eq!(parse_brl("0"), Some(0));
        assert_eq!(parse_brl("not_a_number"), None);
    }

    #[test]
    fn test_parse_brl_roundtrips_money() {
        for cents in [0, 1, 99, 15_000, 123_456, -4_250] {
            assert_eq!(parse_brl(&money(cents)), Some(cents));
        }
    }
}
