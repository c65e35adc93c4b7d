//! Error Message Tests.

use rstest::rstest;

use vmsim_core::ReplacementPolicy;
use vmsim_core::common::{ConfigError, PageNumber, SimError, TraceError};

#[rstest]
#[case(
    ConfigError::Missing { field: "number of pages" },
    "missing number of pages in configuration header"
)]
#[case(
    ConfigError::NonPositive { field: "page size" },
    "invalid page size: must be greater than zero"
)]
#[case(
    ConfigError::NoHeader,
    "trace has no configuration header; pass a JSON configuration instead"
)]
#[case(
    ConfigError::UnknownPolicy("CLOCK".to_string()),
    "unknown replacement policy \"CLOCK\" (expected FIFO, LRU or OPTIMAL)"
)]
#[case(
    ConfigError::BackingStoreTooSmall { slots: 4, pages: 8 },
    "backing store has 4 slots but the page table has 8 pages"
)]
fn config_error_messages(#[case] err: ConfigError, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[test]
fn trace_error_messages() {
    let malformed = TraceError::MalformedRecord {
        line_no: 7,
        line: "x12".to_string(),
    };
    assert_eq!(malformed.to_string(), "line 7: malformed access record \"x12\"");

    let range = TraceError::PageOutOfRange {
        page: PageNumber(9),
        num_pages: 8,
    };
    assert_eq!(range.to_string(), "page 9 is outside the page table (0..8)");

    assert_eq!(TraceError::MissingHeader.to_string(), "trace has no configuration header");
}

#[test]
fn sim_error_is_transparent() {
    let err: SimError = TraceError::MissingHeader.into();
    assert_eq!(err.to_string(), "trace has no configuration header");

    let err: SimError = ConfigError::NonPositive { field: "number of frames" }.into();
    assert_eq!(err.to_string(), "invalid number of frames: must be greater than zero");

    assert!(SimError::LookaheadRequired.to_string().contains("run_batch"));

    let err = SimError::NoVictim {
        policy: ReplacementPolicy::Lru,
        page: PageNumber(4),
    };
    assert_eq!(err.to_string(), "replacement policy LRU chose no victim for page 4");
}
