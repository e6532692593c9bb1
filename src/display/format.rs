//! Compact one-line formatting
//!
//! Used by the `summary` output format: one line per panel, suitable for CI
//! logs and quick scanning.

/// Trait for types that can be summarised on a single line
pub trait CompactFormat {
    /// The output must not contain newlines
    fn to_compact_format(&self) -> String;
}

/// Collapse embedded line breaks so a value stays on one line
pub fn single_line(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        name: String,
        count: usize,
    }

    impl CompactFormat for Sample {
        fn to_compact_format(&self) -> String {
            format!("{}: {} rows", single_line(&self.name), self.count)
        }
    }

    #[test]
    fn test_compact_format_single_line() {
        let sample = Sample { name: "Multi\nLine\r\nTitle".to_string(), count: 3 };
        let compact = sample.to_compact_format();
        assert!(!compact.contains('\n'));
        assert!(!compact.contains('\r'));
        assert_eq!(compact.lines().count(), 1);
    }
}
