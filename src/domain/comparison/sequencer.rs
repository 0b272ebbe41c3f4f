//! Deterministic elicitation order and the Answering/Complete workflow.
//!
//! Pairs are asked in row-major order over the upper triangle. The order is
//! stable for a given size, so resuming a partially judged matrix always asks
//! the same next question.

use serde::{Deserialize, Serialize};

use super::{
    AnsweredSet, ComparisonError, ComparisonMatrix, JudgmentOutcome, PairIndex, ScaleLevel,
};
use crate::domain::foundation::{StateMachine, ValidationError};

/// What to ask next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextComparison {
    Pair { row: usize, col: usize },
    Complete,
}

impl From<Option<PairIndex>> for NextComparison {
    fn from(pair: Option<PairIndex>) -> Self {
        match pair {
            Some(pair) => NextComparison::Pair {
                row: pair.row(),
                col: pair.col(),
            },
            None => NextComparison::Complete,
        }
    }
}

/// Elicitation phase for one matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElicitationPhase {
    Answering,
    Complete,
}

impl StateMachine for ElicitationPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ElicitationPhase::*;
        matches!(
            (self, target),
            (Answering, Answering) | (Answering, Complete) | (Complete, Answering)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ElicitationPhase::*;
        match self {
            Answering => vec![Answering, Complete],
            // Revising or resetting a pair reopens elicitation.
            Complete => vec![Answering],
        }
    }
}

/// Stateless sequencing over an answered set.
pub struct ComparisonSequencer;

impl ComparisonSequencer {
    /// First unanswered pair in row-major order, or `Complete`.
    pub fn next(answered: &AnsweredSet) -> NextComparison {
        Self::pending(answered).next().into()
    }

    pub fn phase(answered: &AnsweredSet) -> ElicitationPhase {
        if answered.is_complete() {
            ElicitationPhase::Complete
        } else {
            ElicitationPhase::Answering
        }
    }

    /// `(answered, required)` pair counts.
    pub fn progress(answered: &AnsweredSet) -> (usize, usize) {
        (answered.len(), answered.required())
    }

    /// Every unanswered pair, in the order they will be asked.
    pub fn remaining(answered: &AnsweredSet) -> Vec<PairIndex> {
        Self::pending(answered).collect()
    }

    fn pending(answered: &AnsweredSet) -> impl Iterator<Item = PairIndex> + '_ {
        let n = answered.size();
        (0..n)
            .flat_map(move |i| ((i + 1)..n).filter_map(move |j| PairIndex::new(i, j)))
            .filter(move |pair| !answered.contains(pair))
    }
}

/// Headless "ask next pair" session over one matrix.
///
/// Phase transitions are validated through [`StateMachine`]; the phase is
/// never inferred from matrix contents.
#[derive(Debug, Clone)]
pub struct ElicitationSession {
    matrix: ComparisonMatrix,
    phase: ElicitationPhase,
}

impl ElicitationSession {
    pub fn new(size: usize) -> Result<Self, ComparisonError> {
        Ok(Self::resume(ComparisonMatrix::create(size)?))
    }

    /// Picks up a partially (or fully) judged matrix.
    pub fn resume(matrix: ComparisonMatrix) -> Self {
        let phase = ComparisonSequencer::phase(matrix.answered());
        Self { matrix, phase }
    }

    pub fn phase(&self) -> ElicitationPhase {
        self.phase
    }

    pub fn matrix(&self) -> &ComparisonMatrix {
        &self.matrix
    }

    pub fn next(&self) -> NextComparison {
        ComparisonSequencer::next(self.matrix.answered())
    }

    pub fn progress(&self) -> (usize, usize) {
        ComparisonSequencer::progress(self.matrix.answered())
    }

    /// Answers the pair returned by [`next`](Self::next).
    pub fn answer(&mut self, value: f64) -> Result<PairIndex, ComparisonError> {
        let pair = match self.next() {
            NextComparison::Pair { row, col } => PairIndex::new(row, col),
            NextComparison::Complete => None,
        }
        .ok_or(ComparisonError::ElicitationComplete)?;

        self.matrix.set_judgment(pair.row(), pair.col(), value)?;
        self.sync_phase()?;
        Ok(pair)
    }

    pub fn answer_level(&mut self, level: ScaleLevel) -> Result<PairIndex, ComparisonError> {
        self.answer(super::SaatyScale::encode(level))
    }

    /// Rewrites any pair, answered or not.
    pub fn revise(
        &mut self,
        row: usize,
        col: usize,
        value: f64,
    ) -> Result<JudgmentOutcome, ComparisonError> {
        let outcome = self.matrix.set_judgment(row, col, value)?;
        self.sync_phase()?;
        Ok(outcome)
    }

    /// Clears a pair so it will be asked again.
    pub fn reset(&mut self, row: usize, col: usize) -> Result<bool, ComparisonError> {
        let cleared = self.matrix.reset_judgment(row, col)?;
        self.sync_phase()?;
        Ok(cleared)
    }

    pub fn into_matrix(self) -> ComparisonMatrix {
        self.matrix
    }

    fn sync_phase(&mut self) -> Result<(), ComparisonError> {
        let target = ComparisonSequencer::phase(self.matrix.answered());
        if target != self.phase {
            self.phase = self
                .phase
                .transition_to(target)
                .map_err(|e: ValidationError| ComparisonError::invalid_judgment(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::comparison::Intensity;
    use proptest::prelude::*;

    #[test]
    fn asks_pairs_in_row_major_order() {
        let mut session = ElicitationSession::new(3).unwrap();
        let mut asked = Vec::new();
        while let NextComparison::Pair { row, col } = session.next() {
            asked.push((row, col));
            session.answer(2.0).unwrap();
        }
        assert_eq!(asked, vec![(0, 1), (0, 2), (1, 2)]);
        assert_eq!(session.phase(), ElicitationPhase::Complete);
    }

    #[test]
    fn single_element_is_immediately_complete() {
        let session = ElicitationSession::new(1).unwrap();
        assert_eq!(session.next(), NextComparison::Complete);
        assert_eq!(session.phase(), ElicitationPhase::Complete);
        assert_eq!(session.progress(), (0, 0));
    }

    #[test]
    fn judged_equal_pairs_are_not_asked_again() {
        let mut session = ElicitationSession::new(2).unwrap();
        session.answer_level(ScaleLevel::equal()).unwrap();
        assert_eq!(session.next(), NextComparison::Complete);
    }

    #[test]
    fn skips_pairs_answered_out_of_order() {
        let mut matrix = ComparisonMatrix::create(3).unwrap();
        matrix.set_judgment(0, 1, 3.0).unwrap();
        matrix.set_judgment(2, 1, 4.0).unwrap();

        assert_eq!(
            ComparisonSequencer::next(matrix.answered()),
            NextComparison::Pair { row: 0, col: 2 }
        );
        assert_eq!(
            ComparisonSequencer::remaining(matrix.answered()),
            vec![PairIndex::new(0, 2).unwrap()]
        );
    }

    #[test]
    fn answering_after_completion_fails() {
        let mut session = ElicitationSession::new(2).unwrap();
        session.answer(5.0).unwrap();
        assert_eq!(session.answer(5.0), Err(ComparisonError::ElicitationComplete));
    }

    #[test]
    fn reset_reopens_completed_session() {
        let mut session = ElicitationSession::new(2).unwrap();
        session
            .answer_level(ScaleLevel::row(Intensity::Strong))
            .unwrap();
        assert_eq!(session.phase(), ElicitationPhase::Complete);

        assert!(session.reset(0, 1).unwrap());
        assert_eq!(session.phase(), ElicitationPhase::Answering);
        assert_eq!(session.next(), NextComparison::Pair { row: 0, col: 1 });
    }

    #[test]
    fn revise_reports_replacement() {
        let mut session = ElicitationSession::new(2).unwrap();
        session.answer(3.0).unwrap();
        let outcome = session.revise(0, 1, 6.0).unwrap();
        assert_eq!(outcome, JudgmentOutcome::Replaced { previous: 3.0 });
        assert_eq!(session.phase(), ElicitationPhase::Complete);
    }

    #[test]
    fn resume_derives_phase_from_answered_set() {
        let mut matrix = ComparisonMatrix::create(2).unwrap();
        matrix.set_judgment(0, 1, 1.0).unwrap();
        let session = ElicitationSession::resume(matrix);
        assert_eq!(session.phase(), ElicitationPhase::Complete);
        assert_eq!(session.into_matrix().get(1, 0).unwrap(), 1.0);
    }

    #[test]
    fn complete_phase_only_reopens() {
        assert!(ElicitationPhase::Complete.can_transition_to(&ElicitationPhase::Answering));
        assert!(!ElicitationPhase::Complete.can_transition_to(&ElicitationPhase::Complete));
        assert!(!ElicitationPhase::Answering.is_terminal());
    }

    proptest! {
        #[test]
        fn never_returns_answered_pair(
            n in 1usize..9,
            answers in prop::collection::vec((0usize..9, 0usize..9), 0..40),
        ) {
            let mut matrix = ComparisonMatrix::create(n).unwrap();
            for (i, j) in answers {
                let _ = matrix.set_judgment(i, j, 2.0);
            }
            let answered = matrix.answered();
            match ComparisonSequencer::next(answered) {
                NextComparison::Pair { row, col } => {
                    let pair = PairIndex::new(row, col).unwrap();
                    prop_assert!(!answered.contains(&pair));
                    prop_assert!(answered.len() < answered.required());
                }
                NextComparison::Complete => {
                    prop_assert_eq!(answered.len(), n * (n - 1) / 2);
                }
            }
        }
    }
}
