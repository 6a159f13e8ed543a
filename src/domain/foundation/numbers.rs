//! Small sanitizers for values that arrive from loosely-typed records.

/// Keeps only ASCII digits.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Returns `value` when it is finite and strictly positive, otherwise `fallback`.
pub fn positive_or(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_only_strips_formatting() {
        assert_eq!(digits_only("C.P. 54-030"), "54030");
        assert_eq!(digits_only("+52 (55) 5555 5555"), "525555555555");
        assert_eq!(digits_only("abc"), "");
    }

    #[test]
    fn positive_or_rejects_degenerate_values() {
        assert_eq!(positive_or(Some(2.5), 1.0), 2.5);
        assert_eq!(positive_or(Some(0.0), 1.0), 1.0);
        assert_eq!(positive_or(Some(-3.0), 1.0), 1.0);
        assert_eq!(positive_or(Some(f64::NAN), 1.0), 1.0);
        assert_eq!(positive_or(None, 10.0), 10.0);
    }
}
