//! Domain-specific assertion macros for hospital-qa harnesses.
//!
//! These wrap `pretty_assertions` and say *which* log property broke.

/// Assert that the raw log file begins with exactly one header line and that
/// the header does not reappear further down.
#[macro_export]
macro_rules! assert_single_header {
    ($path:expr) => {{
        let text = std::fs::read_to_string(&$path).expect("log file must be readable");
        assert!(
            text.starts_with("timestamp,question,answer\n"),
            "assert_single_header! failed: log does not start with the header.\n  first line: {:?}",
            text.lines().next()
        );
        let count = text
            .lines()
            .filter(|l| *l == "timestamp,question,answer")
            .count();
        assert_eq!(count, 1, "assert_single_header! failed: header appears {} times", count);
    }};
}

/// Assert two record sequences are equal, field for field, in order.
#[macro_export]
macro_rules! assert_records_eq {
    ($actual:expr, $expected:expr) => {{
        let actual: &[hospital_qa::LogRecord] = &$actual;
        let expected: &[hospital_qa::LogRecord] = &$expected;
        pretty_assertions::assert_eq!(
            actual.len(),
            expected.len(),
            "assert_records_eq! failed: record count differs"
        );
        for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            pretty_assertions::assert_eq!(a, e, "assert_records_eq! failed at record {}", i);
        }
    }};
}
