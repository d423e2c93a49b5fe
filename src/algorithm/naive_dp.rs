use super::{scoring::SegmentScoring, vector::TScore, DiffOp};

#[derive(Clone, Copy, Debug)]
struct DpState {
    score: TScore,
    previous_step: Option<DiffOp>,
}

impl Default for DpState {
    fn default() -> Self {
        DpState {
            score: TScore::NEG_INFINITY,
            previous_step: None,
        }
    }
}

// Ties keep the earliest op, so a match wins over a gap and a delete over an insert.
const STEP_PRIORITY: [DiffOp; 3] = [DiffOp::Match, DiffOp::Delete, DiffOp::Insert];

fn compute_dp_matrix(scoring: &SegmentScoring, row_range: usize) -> Vec<Vec<DpState>> {
    let sizes = scoring.size();
    let mut result = vec![vec![DpState::default(); sizes[1] + 1]; row_range];

    for canonical_index in 0..=sizes[0] {
        for legacy_index in 0..=sizes[1] {
            let mut state = DpState::default();
            if canonical_index == 0 && legacy_index == 0 {
                state.score = 0.0;
            }
            for op in STEP_PRIORITY {
                let movement = op.movement();
                if canonical_index < movement[0] || legacy_index < movement[1] {
                    continue;
                }
                let before = &result[(canonical_index - movement[0]) % row_range][legacy_index - movement[1]];
                let proposed_score = before.score + scoring.step_score([canonical_index, legacy_index], op);
                if proposed_score > state.score {
                    state = DpState {
                        score: proposed_score,
                        previous_step: Some(op),
                    };
                }
            }
            result[canonical_index % row_range][legacy_index] = state;
        }
    }

    result
}

/// Optimal global alignment as a sequence of ops from (0, 0) to (n, m).
pub(super) fn naive_dp(scoring: &SegmentScoring) -> Vec<DiffOp> {
    let sizes = scoring.size();
    let matrix = compute_dp_matrix(scoring, sizes[0] + 1);

    let mut result = vec![];
    let mut indices = sizes;
    while indices[0] > 0 || indices[1] > 0 {
        // Every cell except the origin is reachable, so it has a previous step.
        let Some(op) = matrix[indices[0]][indices[1]].previous_step else {
            unreachable!("DP cell {indices:?} has no previous step");
        };
        result.push(op);
        for side in 0..2 {
            indices[side] -= op.movement()[side];
        }
    }
    result.reverse();
    result
}

/// Value of the optimal alignment, computed with two rows of the table.
pub(super) fn compute_score(scoring: &SegmentScoring) -> TScore {
    let sizes = scoring.size();
    let matrix = compute_dp_matrix(scoring, 2);
    matrix[sizes[0] % 2][sizes[1]].score
}

/// Value of a given op sequence, for checking a backtracked path.
pub(super) fn alignment_score(scoring: &SegmentScoring, alignment: &[DiffOp]) -> TScore {
    let mut indices = [0, 0];
    let mut score = 0.0;
    for &op in alignment {
        for side in 0..2 {
            indices[side] += op.movement()[side];
        }
        score += scoring.step_score(indices, op);
    }
    score
}
