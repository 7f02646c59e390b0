//! Active-index search over time-spanned sequences
//!
//! Called on every scheduling tick, once for the flat word sequence and
//! once for the display lines, so the lookup must not rescan the whole
//! list per frame. The search is hinted-incremental: during steady
//! playback the previous tick's index is either still correct or one
//! step behind, so a hint hit or a short bounded walk resolves almost
//! every call in O(1). Large seeks fall back to binary search.

/// Half-open time interval `[start_s, stop_s)` in seconds
pub trait TimeSpan {
    fn start_s(&self) -> f64;
    fn stop_s(&self) -> f64;

    fn contains(&self, time_s: f64) -> bool {
        self.start_s() <= time_s && time_s < self.stop_s()
    }
}

/// Maximum items the local walk inspects before giving up on locality
const MAX_WALK_STEPS: usize = 8;

/// Find the index whose interval contains `time_s`, or `None` if the
/// time sits in a gap (a valid state, not an error).
///
/// `hint` is the previously resolved index. Items are assumed sorted
/// ascending by start time; malformed input yields an unspecified but
/// in-bounds result, never a panic.
pub fn resolve_active_index<T: TimeSpan>(
    items: &[T],
    time_s: f64,
    hint: Option<usize>,
) -> Option<usize> {
    if items.is_empty() || time_s.is_nan() {
        return None;
    }

    if let Some(hint) = hint.filter(|&h| h < items.len()) {
        if items[hint].contains(time_s) {
            return Some(hint);
        }

        if time_s >= items[hint].stop_s() {
            // Walk forward: normal playback progress or a small scrub ahead
            let end = (hint + 1 + MAX_WALK_STEPS).min(items.len());
            for index in hint + 1..end {
                if items[index].contains(time_s) {
                    return Some(index);
                }
                if time_s < items[index].start_s() {
                    // Landed in a gap before this item
                    return None;
                }
            }
        } else if time_s < items[hint].start_s() {
            // Walk backward: a small scrub behind
            let start = hint.saturating_sub(MAX_WALK_STEPS);
            for index in (start..hint).rev() {
                if items[index].contains(time_s) {
                    return Some(index);
                }
                if time_s >= items[index].stop_s() {
                    // Gap between this item and the next
                    return None;
                }
            }
        }
    }

    // Cold path: large seek, out-of-range hint, or no hint at all
    let candidate = rightmost_started_index(items, time_s)?;
    items[candidate].contains(time_s).then_some(candidate)
}

/// Rightmost index whose `start_s <= time_s`, containment not required.
///
/// Unlike [`resolve_active_index`] this keeps advancing through
/// inter-item gaps, which is what the line cursor needs so already
/// finished lines stay classified as past.
pub fn rightmost_started_index<T: TimeSpan>(items: &[T], time_s: f64) -> Option<usize> {
    if time_s.is_nan() {
        return None;
    }
    let started = items.partition_point(|item| item.start_s() <= time_s);
    started.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    struct Span(f64, f64);

    impl TimeSpan for Span {
        fn start_s(&self) -> f64 {
            self.0
        }

        fn stop_s(&self) -> f64 {
            self.1
        }
    }

    /// Contiguous spans 0.0-0.5, 0.5-1.0, ... plus a gap before a final span
    fn spans_with_gap() -> Vec<Span> {
        vec![
            Span(0.0, 0.5),
            Span(0.5, 1.0),
            Span(1.0, 1.5),
            Span(2.5, 3.0),
        ]
    }

    /// Brute-force reference: first index whose interval contains the time
    fn reference(items: &[Span], time_s: f64) -> Option<usize> {
        items.iter().position(|s| s.contains(time_s))
    }

    #[test]
    fn test_hint_fast_path() {
        let items = spans_with_gap();
        assert_eq!(resolve_active_index(&items, 0.7, Some(1)), Some(1));
    }

    #[test]
    fn test_hint_one_before_and_after() {
        let items = spans_with_gap();
        // Hint one behind the answer (normal forward progress)
        assert_eq!(resolve_active_index(&items, 0.7, Some(0)), Some(1));
        // Hint one ahead of the answer (small backward scrub)
        assert_eq!(resolve_active_index(&items, 0.7, Some(2)), Some(1));
    }

    #[test]
    fn test_cold_path_matches_hinted() {
        let items = spans_with_gap();
        for step in 0..70 {
            let time_s = step as f64 * 0.05;
            let cold = resolve_active_index(&items, time_s, None);
            assert_eq!(cold, reference(&items, time_s), "t={time_s}");
            for hint in 0..items.len() {
                assert_eq!(
                    resolve_active_index(&items, time_s, Some(hint)),
                    cold,
                    "t={time_s} hint={hint}"
                );
            }
            // Out-of-range hints take the cold path
            assert_eq!(resolve_active_index(&items, time_s, Some(99)), cold);
        }
    }

    #[test]
    fn test_monotonic_forward_consistency() {
        // Carrying the hint across a forward time series must match
        // computing every step cold
        let items: Vec<Span> = (0..40).map(|i| Span(i as f64, i as f64 + 0.8)).collect();
        let mut hint = None;
        let mut time_s = 0.0;
        while time_s < 40.0 {
            let carried = resolve_active_index(&items, time_s, hint);
            let cold = resolve_active_index(&items, time_s, None);
            assert_eq!(carried, cold, "t={time_s}");
            hint = carried.or(hint);
            time_s += 0.07;
        }
    }

    #[test]
    fn test_large_seek_beyond_walk_bound() {
        let items: Vec<Span> = (0..100).map(|i| Span(i as f64, i as f64 + 1.0)).collect();
        // Forward and backward jumps far past MAX_WALK_STEPS
        assert_eq!(resolve_active_index(&items, 90.5, Some(3)), Some(90));
        assert_eq!(resolve_active_index(&items, 3.5, Some(90)), Some(3));
    }

    #[test]
    fn test_gap_returns_none() {
        let items = spans_with_gap();
        assert_eq!(resolve_active_index(&items, 2.0, None), None);
        assert_eq!(resolve_active_index(&items, 2.0, Some(2)), None);
        assert_eq!(resolve_active_index(&items, 2.0, Some(3)), None);
    }

    #[test]
    fn test_half_open_boundaries() {
        let items = spans_with_gap();
        // start is inclusive, stop is exclusive
        assert_eq!(resolve_active_index(&items, 0.5, None), Some(1));
        assert_eq!(resolve_active_index(&items, 0.5, Some(0)), Some(1));
        assert_eq!(resolve_active_index(&items, 3.0, None), None);
    }

    #[test]
    fn test_untrusted_times() {
        let items = spans_with_gap();
        assert_eq!(resolve_active_index(&items, f64::NAN, Some(1)), None);
        assert_eq!(resolve_active_index(&items, -5.0, Some(1)), None);
        assert_eq!(resolve_active_index(&items, 1e12, Some(1)), None);
        assert_eq!(rightmost_started_index(&items, f64::NAN), None);
        assert_eq!(rightmost_started_index(&items, -5.0), None);
    }

    #[test]
    fn test_empty_and_single() {
        let empty: Vec<Span> = Vec::new();
        assert_eq!(resolve_active_index(&empty, 1.0, None), None);
        assert_eq!(rightmost_started_index(&empty, 1.0), None);

        let single = vec![Span(1.0, 2.0)];
        assert_eq!(resolve_active_index(&single, 1.5, None), Some(0));
        assert_eq!(resolve_active_index(&single, 0.5, Some(0)), None);
        assert_eq!(resolve_active_index(&single, 2.5, Some(0)), None);
    }

    #[test]
    fn test_rightmost_started_index() {
        let items = spans_with_gap();
        assert_eq!(rightmost_started_index(&items, -0.1), None);
        assert_eq!(rightmost_started_index(&items, 0.0), Some(0));
        assert_eq!(rightmost_started_index(&items, 0.7), Some(1));
        // Keeps pointing at the last started item through the gap
        assert_eq!(rightmost_started_index(&items, 2.0), Some(2));
        assert_eq!(rightmost_started_index(&items, 10.0), Some(3));
    }

    #[test]
    fn test_cursor_monotonicity() {
        let items = spans_with_gap();
        let mut last = None;
        let mut time_s = 0.0;
        while time_s < 4.0 {
            let cursor = rightmost_started_index(&items, time_s);
            assert!(cursor >= last, "cursor went backward at t={time_s}");
            last = cursor;
            time_s += 0.03;
        }
    }

    #[test]
    fn test_malformed_input_terminates() {
        // Overlapping and out-of-order spans: result unspecified, but the
        // search must stay in bounds and return
        let items = vec![Span(5.0, 6.0), Span(0.0, 3.0), Span(1.0, 2.0)];
        for step in 0..80 {
            let time_s = step as f64 * 0.1;
            for hint in [None, Some(0), Some(1), Some(2), Some(7)] {
                if let Some(index) = resolve_active_index(&items, time_s, hint) {
                    assert!(index < items.len());
                }
            }
        }
    }
}
