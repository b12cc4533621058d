//! Fractional Card Positioning
//!
//! Gap indexing for drag-and-drop reordering: a new sort key is computed
//! strictly between the intended neighbors (or outside the range at the
//! boundaries), so repositioning a card touches exactly one row. Siblings
//! are never renumbered.

/// Position assigned to the first card of an empty column, and the gap left
/// above the tail on every append. Leaves room for many midpoint inserts
/// before float precision becomes a concern.
pub const BASE_POSITION: f64 = 1000.0;

/// Floor for head inserts. Repeated drops at the top of a column halve the
/// head position each time; clamping here keeps it from drifting toward zero.
pub const MIN_HEAD_POSITION: f64 = 1.0;

/// Compute the sort key for a card dropped at `target_index` in a column.
///
/// `neighbors` are the positions of the destination column's cards sorted
/// ascending, excluding the card being moved. Including the moving card in
/// its own neighbor list corrupts the gap calculation, so callers must
/// filter it out first.
///
/// An out-of-range index is clamped rather than rejected; drag-and-drop
/// measurements race against data mutation, and an off-by-one drop should
/// land at the nearest edge instead of failing.
pub fn position_for_insert(neighbors: &[f64], target_index: usize) -> f64 {
    if neighbors.is_empty() {
        return BASE_POSITION;
    }
    let index = target_index.min(neighbors.len());

    if index == 0 {
        let half = neighbors[0] / 2.0;
        if half < MIN_HEAD_POSITION {
            MIN_HEAD_POSITION
        } else {
            half
        }
    } else if index == neighbors.len() {
        neighbors[neighbors.len() - 1] + BASE_POSITION
    } else {
        (neighbors[index - 1] + neighbors[index]) / 2.0
    }
}

/// Append key for a new card: after the current tail, or the baseline for an
/// empty column.
pub fn position_for_append(neighbors: &[f64]) -> f64 {
    position_for_insert(neighbors, neighbors.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_column() {
        assert_eq!(position_for_insert(&[], 0), 1000.0);
    }

    #[test]
    fn test_head_insert() {
        assert_eq!(position_for_insert(&[2000.0, 3000.0], 0), 1000.0);
    }

    #[test]
    fn test_head_insert_clamps_near_zero() {
        // Halving 1.0 would give 0.5; the floor keeps it at 1.0
        assert_eq!(position_for_insert(&[1.0, 2.0], 0), 1.0);
    }

    #[test]
    fn test_tail_insert() {
        assert_eq!(position_for_insert(&[1000.0, 2000.0], 2), 3000.0);
    }

    #[test]
    fn test_middle_insert() {
        assert_eq!(position_for_insert(&[1000.0, 3000.0], 1), 2000.0);
    }

    #[test]
    fn test_out_of_range_index_clamps_to_tail() {
        assert_eq!(position_for_insert(&[1000.0], 99), 2000.0);
    }

    #[test]
    fn test_append() {
        assert_eq!(position_for_append(&[]), 1000.0);
        assert_eq!(position_for_append(&[500.0]), 1500.0);
    }

    /// Sorting by position always reproduces the order implied by the
    /// sequence of insert requests, for arbitrary valid indices.
    #[test]
    fn test_insert_sequence_preserves_requested_order() {
        // (label, requested index) pairs applied one after another
        let inserts = [
            ("a", 0),
            ("b", 1),
            ("c", 0),
            ("d", 2),
            ("e", 4),
            ("f", 3),
            ("g", 0),
            ("h", 5),
        ];

        let mut expected: Vec<&str> = Vec::new();
        let mut placed: Vec<(&str, f64)> = Vec::new();

        for (label, index) in inserts {
            let neighbors: Vec<f64> = {
                let mut sorted = placed.clone();
                sorted.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
                sorted.iter().map(|(_, p)| *p).collect()
            };
            let pos = position_for_insert(&neighbors, index);
            expected.insert(index.min(expected.len()), label);
            placed.push((label, pos));
        }

        placed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
        let actual: Vec<&str> = placed.iter().map(|(l, _)| *l).collect();
        assert_eq!(actual, expected);
    }

    /// Many repeated head inserts never go below the floor and never panic.
    #[test]
    fn test_repeated_head_inserts_stay_at_or_above_floor() {
        let mut positions = vec![1000.0];
        for _ in 0..64 {
            let pos = position_for_insert(&positions, 0);
            assert!(pos >= MIN_HEAD_POSITION);
            positions.insert(0, pos);
        }
    }
}
