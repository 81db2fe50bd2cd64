use std::collections::BTreeMap;

use super::super::domain::{ReviewRecord, ReviewerId};

/// Collapse raw review records into at most one effective record per reviewer
/// for the given material version (last-write-wins by creation time).
///
/// Records cast against any other version are ignored. Timestamp ties are
/// broken by the higher record id, which follows insertion order, so the fold
/// is deterministic even when two records share a timestamp. Pure function
/// over the supplied data; output is ordered by reviewer id.
pub fn fold_effective_records(records: &[ReviewRecord], target_version: u32) -> Vec<ReviewRecord> {
    let mut effective: BTreeMap<ReviewerId, &ReviewRecord> = BTreeMap::new();

    for record in records {
        if record.material_version != target_version {
            continue;
        }

        match effective.get(&record.reviewer_id) {
            Some(incumbent) if !supersedes(record, incumbent) => {}
            _ => {
                effective.insert(record.reviewer_id, record);
            }
        }
    }

    effective.into_values().cloned().collect()
}

fn supersedes(candidate: &ReviewRecord, incumbent: &ReviewRecord) -> bool {
    candidate.created_at > incumbent.created_at
        || (candidate.created_at == incumbent.created_at && candidate.id > incumbent.id)
}
