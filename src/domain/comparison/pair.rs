//! Unordered judgment pairs and the explicit record of which were answered.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An unordered pair `{i, j}` with `i != j`, stored as `(min, max)`.
///
/// Orders row-major over the upper triangle, which is the elicitation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PairFields")]
pub struct PairIndex {
    row: usize,
    col: usize,
}

#[derive(Deserialize)]
struct PairFields {
    row: usize,
    col: usize,
}

impl TryFrom<PairFields> for PairIndex {
    type Error = String;

    fn try_from(fields: PairFields) -> Result<Self, Self::Error> {
        PairIndex::new(fields.row, fields.col)
            .ok_or_else(|| format!("pair ({}, {}) compares an element with itself", fields.row, fields.col))
    }
}

impl PairIndex {
    /// Returns `None` for a self-pair.
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { row: a, col: b }),
            std::cmp::Ordering::Greater => Some(Self { row: b, col: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Smaller index of the pair.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Larger index of the pair.
    pub fn col(&self) -> usize {
        self.col
    }

    /// Position in the row-major upper-triangle layout of an `n`-sized matrix.
    pub(crate) fn triangle_offset(&self, n: usize) -> usize {
        self.row * (2 * n - self.row - 1) / 2 + (self.col - self.row - 1)
    }
}

impl fmt::Display for PairIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Number of distinct pairs in an `n`-sized matrix.
pub fn required_pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Set of pairs that have received a judgment.
///
/// Kept separate from matrix values: a stored 1 may be "judged equal" or
/// "not asked yet", and only this set tells them apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnsweredSet {
    size: usize,
    pairs: BTreeSet<PairIndex>,
}

impl AnsweredSet {
    /// Empty answered set for an `n`-sized matrix.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            pairs: BTreeSet::new(),
        }
    }

    /// Returns true if the pair was newly inserted.
    ///
    /// Pairs that reach outside the matrix are ignored.
    pub fn insert(&mut self, pair: PairIndex) -> bool {
        pair.col < self.size && self.pairs.insert(pair)
    }

    pub fn remove(&mut self, pair: &PairIndex) -> bool {
        self.pairs.remove(pair)
    }

    pub fn contains(&self, pair: &PairIndex) -> bool {
        self.pairs.contains(pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// `n(n-1)/2` pairs must be answered for completion.
    pub fn required(&self) -> usize {
        required_pairs(self.size)
    }

    pub fn is_complete(&self) -> bool {
        self.len() == self.required()
    }

    /// Answered pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &PairIndex> {
        self.pairs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_unordered() {
        assert_eq!(PairIndex::new(2, 0), PairIndex::new(0, 2));
        assert!(PairIndex::new(1, 1).is_none());
    }

    #[test]
    fn pairs_sort_row_major() {
        let mut pairs = vec![
            PairIndex::new(1, 2).unwrap(),
            PairIndex::new(0, 2).unwrap(),
            PairIndex::new(0, 1).unwrap(),
        ];
        pairs.sort();
        let flat: Vec<_> = pairs.iter().map(|p| (p.row(), p.col())).collect();
        assert_eq!(flat, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn triangle_offset_is_dense_and_ordered() {
        let n = 5;
        let mut expected = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                assert_eq!(PairIndex::new(i, j).unwrap().triangle_offset(n), expected);
                expected += 1;
            }
        }
        assert_eq!(expected, required_pairs(n));
    }

    #[test]
    fn required_pairs_handles_boundary_sizes() {
        assert_eq!(required_pairs(0), 0);
        assert_eq!(required_pairs(1), 0);
        assert_eq!(required_pairs(2), 1);
        assert_eq!(required_pairs(4), 6);
    }

    #[test]
    fn answered_set_tracks_completion() {
        let mut answered = AnsweredSet::new(3);
        assert!(!answered.is_complete());

        assert!(answered.insert(PairIndex::new(0, 1).unwrap()));
        assert!(!answered.insert(PairIndex::new(1, 0).unwrap()));
        answered.insert(PairIndex::new(0, 2).unwrap());
        answered.insert(PairIndex::new(1, 2).unwrap());

        assert_eq!(answered.len(), 3);
        assert!(answered.is_complete());
    }

    #[test]
    fn answered_set_ignores_out_of_range_pairs() {
        let mut answered = AnsweredSet::new(2);
        assert!(!answered.insert(PairIndex::new(0, 5).unwrap()));
        assert!(answered.is_empty());
    }

    #[test]
    fn pair_deserialization_normalizes_and_rejects_self_pairs() {
        let pair: PairIndex = serde_json::from_str(r#"{"row": 3, "col": 1}"#).unwrap();
        assert_eq!((pair.row(), pair.col()), (1, 3));
        assert!(serde_json::from_str::<PairIndex>(r#"{"row": 2, "col": 2}"#).is_err());
    }

    #[test]
    fn single_element_set_is_complete_when_empty() {
        assert!(AnsweredSet::new(1).is_complete());
    }
}
