//! Natural-language rendering of classified signals.

pub mod headline;
pub mod sector;
pub mod summary;

/// `+1.25` style signed percentage, or `n/a`.
pub(crate) fn signed(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:+.2}", v),
        None => "n/a".to_string(),
    }
}

/// Rounds to a whole number and groups thousands with commas.
pub(crate) fn thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed() {
        assert_eq!(signed(Some(1.234)), "+1.23");
        assert_eq!(signed(Some(-0.5)), "-0.50");
        assert_eq!(signed(None), "n/a");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(1234567.4), "1,234,567");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(-45000.0), "-45,000");
        assert_eq!(thousands(0.2), "0");
    }
}
