use super::common::*;
use crate::workflows::admission::domain::{ReviewDecision, ReviewRecordId, ReviewerId};
use crate::workflows::admission::fold_effective_records;

#[test]
fn later_record_supersedes_earlier_from_same_reviewer() {
    let records = vec![
        record(1, 10, 1, ReviewDecision::Reject, 0),
        record(2, 10, 1, ReviewDecision::Pass, 60),
    ];

    let folded = fold_effective_records(&records, 1);
    assert_eq!(folded.len(), 1);
    assert_eq!(folded[0].id, ReviewRecordId(2));
    assert_eq!(folded[0].decision, ReviewDecision::Pass);
}

#[test]
fn arrival_order_does_not_matter() {
    let records = vec![
        record(2, 10, 1, ReviewDecision::Pass, 60),
        record(1, 10, 1, ReviewDecision::Reject, 0),
    ];

    let folded = fold_effective_records(&records, 1);
    assert_eq!(folded.len(), 1);
    assert_eq!(folded[0].decision, ReviewDecision::Pass);
}

#[test]
fn timestamp_tie_resolves_to_higher_record_id() {
    let records = vec![
        record(7, 10, 1, ReviewDecision::Pass, 30),
        record(3, 10, 1, ReviewDecision::Reject, 30),
    ];

    let folded = fold_effective_records(&records, 1);
    assert_eq!(folded.len(), 1);
    assert_eq!(folded[0].id, ReviewRecordId(7));
}

#[test]
fn records_against_other_versions_are_ignored() {
    let records = vec![
        record(1, 10, 1, ReviewDecision::Reject, 0),
        record(2, 11, 2, ReviewDecision::Pass, 10),
        record(3, 12, 3, ReviewDecision::Pass, 20),
    ];

    let folded = fold_effective_records(&records, 2);
    assert_eq!(folded.len(), 1);
    assert_eq!(folded[0].reviewer_id, ReviewerId(11));
}

#[test]
fn output_is_ordered_by_reviewer_id() {
    let records = vec![
        record(1, 30, 1, ReviewDecision::Pass, 0),
        record(2, 10, 1, ReviewDecision::Pass, 5),
        record(3, 20, 1, ReviewDecision::Reject, 10),
    ];

    let folded = fold_effective_records(&records, 1);
    let reviewers: Vec<u64> = folded.iter().map(|rec| rec.reviewer_id.0).collect();
    assert_eq!(reviewers, vec![10, 20, 30]);
}

#[test]
fn empty_input_folds_to_empty() {
    assert!(fold_effective_records(&[], 1).is_empty());
}
