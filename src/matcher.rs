//! Merge-target resolution for near-duplicate phrases.
//!
//! Decides whether a normalized candidate phrase should collapse into an
//! existing bucket instead of creating a new one. The policy is ordered and
//! fully deterministic so it can be unit tested in isolation from the
//! ledger: exact match first, then containment either way, never relying on
//! hash iteration order.

use crate::types::PhraseBucket;

/// Find the existing bucket a candidate phrase should merge into.
///
/// Rules, first match wins:
/// 1. Exact match against an existing key.
/// 2. Containment: the candidate is a substring of an existing key or vice
///    versa, provided the shorter of the two is at least `min_match_len`
///    characters (avoids merging on trivial fragments).
///
/// When several keys qualify under rule 2 the one with the highest
/// displayed count wins; ties go to the shortest key (the most general
/// bucket absorbs variants), then to creation order.
///
/// `ignore` excludes one key from consideration; the rename operation uses
/// it so a row being renamed cannot match itself.
pub fn find_merge_target<'a>(
    candidate: &str,
    buckets: &'a [PhraseBucket],
    min_match_len: usize,
    ignore: Option<&str>,
) -> Option<&'a str> {
    if candidate.is_empty() {
        return None;
    }

    // Rule 1: exact match
    for bucket in buckets {
        if ignore == Some(bucket.phrase.as_str()) {
            continue;
        }
        if bucket.phrase == candidate {
            return Some(&bucket.phrase);
        }
    }

    // Rule 2: containment, best qualifier wins
    let mut best: Option<&PhraseBucket> = None;
    for bucket in buckets {
        if ignore == Some(bucket.phrase.as_str()) {
            continue;
        }
        if !contains_either(candidate, &bucket.phrase, min_match_len) {
            continue;
        }
        best = match best {
            None => Some(bucket),
            Some(current) if beats(bucket, current) => Some(bucket),
            Some(current) => Some(current),
        };
    }

    best.map(|b| b.phrase.as_str())
}

/// Containment either direction, gated on the shorter string's length
fn contains_either(a: &str, b: &str, min_match_len: usize) -> bool {
    let shorter = a.len().min(b.len());
    if shorter < min_match_len {
        return false;
    }
    a.contains(b) || b.contains(a)
}

/// Whether `challenger` outranks the `current` best containment match.
/// Strict comparisons keep earlier buckets ahead on full ties.
fn beats(challenger: &PhraseBucket, current: &PhraseBucket) -> bool {
    if challenger.count() != current.count() {
        return challenger.count() > current.count();
    }
    challenger.phrase.len() < current.phrase.len()
}
