/// Parses a screener volume cell.
///
/// Every character in `thousands_separators` is removed before parsing. The
/// remainder must be a finite, non-negative decimal; anything else (empty
/// text, `nan`, unit suffixes such as `1.2M`) is `None`.
pub fn parse_volume(input: &str, thousands_separators: &[char]) -> Option<f64> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|ch| !thousands_separators.contains(ch))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    // `f64::from_str` also accepts "inf"/"NaN" spellings; require digits.
    if !cleaned
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    let value = cleaned.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMA: &[char] = &[','];

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_volume("1,234", COMMA), Some(1234.0));
        assert_eq!(parse_volume(" 12,345,678 ", COMMA), Some(12_345_678.0));
        assert_eq!(parse_volume("1500.5", COMMA), Some(1500.5));
    }

    #[test]
    fn rejects_non_numeric_content() {
        assert_eq!(parse_volume("abc", COMMA), None);
        assert_eq!(parse_volume("1.2M", COMMA), None);
        assert_eq!(parse_volume("", COMMA), None);
        assert_eq!(parse_volume("nan", COMMA), None);
        assert_eq!(parse_volume("inf", COMMA), None);
    }

    #[test]
    fn rejects_negative_volume() {
        assert_eq!(parse_volume("-10", COMMA), None);
    }

    #[test]
    fn honours_custom_separators() {
        assert_eq!(parse_volume("1 234 567", &[' ']), Some(1_234_567.0));
        assert_eq!(parse_volume("1,234", &[]), None);
    }
}
