use std::ops::Range;

use float_ord::FloatOrd;
use log::trace;

use super::{
    params::AlignerConfig, scoring::SegmentScoring, vector::TScore, AlignmentStatus, AlignmentStep, DiffOp, Segment,
};

#[derive(Clone, Debug, PartialEq)]
enum Piece {
    /// Unmatched runs on both sides between two correspondences.
    Gap([Range<usize>; 2]),
    Correspondence { ranges: [Range<usize>; 2], score: TScore },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Backward,
    Forward,
}

/// Splits the DP path into correspondences and the gap regions between them.
/// Matches at or below the ambiguous threshold count as gaps on both sides.
fn make_pieces(scoring: &SegmentScoring, path: &[DiffOp], ambiguous_threshold: TScore) -> Vec<Piece> {
    let mut pieces = vec![];
    let mut indices = [0, 0];
    let mut gap = [0..0, 0..0];

    for &op in path {
        if op == DiffOp::Match {
            let score = scoring.match_score(indices);
            if score > ambiguous_threshold {
                if gap.iter().any(|range| !range.is_empty()) {
                    pieces.push(Piece::Gap(gap));
                }
                pieces.push(Piece::Correspondence {
                    ranges: indices.map(|i| i..i + 1),
                    score,
                });
                indices = indices.map(|i| i + 1);
                gap = indices.map(|i| i..i);
                continue;
            }
        }
        for side in 0..2 {
            indices[side] += op.movement()[side];
            gap[side].end = indices[side];
        }
    }
    if gap.iter().any(|range| !range.is_empty()) {
        pieces.push(Piece::Gap(gap));
    }
    pieces
}

fn neighbour_gap(pieces: &[Piece], index: usize, direction: Direction) -> Option<usize> {
    let neighbour = match direction {
        Direction::Backward => index.checked_sub(1)?,
        Direction::Forward => index + 1,
    };
    match pieces.get(neighbour) {
        Some(Piece::Gap(_)) => Some(neighbour),
        _ => None,
    }
}

/// A correspondence grows on one side only, so it stays one-to-many.
fn growable_sides(ranges: &[Range<usize>; 2]) -> &'static [usize] {
    match (ranges[0].len() > 1, ranges[1].len() > 1) {
        (true, _) => &[0],
        (_, true) => &[1],
        _ => &[0, 1],
    }
}

/// Pulls adjacent unmatched segments into the correspondence at `index` while
/// the combined text scores above the merge threshold and better than before.
fn absorb_neighbours(pieces: &mut [Piece], index: usize, scoring: &SegmentScoring, merge_threshold: TScore) {
    loop {
        let Piece::Correspondence { ranges, score } = &pieces[index] else {
            return;
        };

        let mut best: Option<(FloatOrd<TScore>, usize, usize, [Range<usize>; 2])> = None;
        for &side in growable_sides(ranges) {
            for direction in [Direction::Backward, Direction::Forward] {
                let Some(gap_index) = neighbour_gap(pieces, index, direction) else {
                    continue;
                };
                let Piece::Gap(gap) = &pieces[gap_index] else {
                    continue;
                };
                if gap[side].is_empty() {
                    continue;
                }
                let mut grown = ranges.clone();
                match direction {
                    Direction::Backward => grown[side].start -= 1,
                    Direction::Forward => grown[side].end += 1,
                }
                let grown_score = FloatOrd(scoring.range_score(grown.clone()));
                if best.as_ref().map_or(true, |(best_score, ..)| grown_score > *best_score) {
                    best = Some((grown_score, side, gap_index, grown));
                }
            }
        }

        let Some((FloatOrd(grown_score), side, gap_index, grown)) = best else {
            return;
        };
        if grown_score < merge_threshold || grown_score <= *score {
            return;
        }
        trace!("growing {ranges:?} to {grown:?}, score {score:.4} -> {grown_score:.4}");

        if let Piece::Gap(gap) = &mut pieces[gap_index] {
            if gap_index < index {
                gap[side].end -= 1;
            } else {
                gap[side].start += 1;
            }
        }
        pieces[index] = Piece::Correspondence {
            ranges: grown,
            score: grown_score,
        };
    }
}

fn classify(ranges: &[Range<usize>; 2], score: TScore, config: &AlignerConfig) -> AlignmentStatus {
    if ranges[0].len() > 1 {
        AlignmentStatus::Merged
    } else if ranges[1].len() > 1 {
        AlignmentStatus::Split
    } else if score >= config.match_threshold() {
        AlignmentStatus::Matched
    } else {
        AlignmentStatus::Ambiguous
    }
}

fn ids_in(canonical: &[Segment], range: &Range<usize>) -> Vec<String> {
    canonical[range.clone()]
        .iter()
        .filter_map(|segment| segment.id().map(str::to_owned))
        .collect()
}

pub(super) fn build_steps(
    scoring: &SegmentScoring,
    path: &[DiffOp],
    canonical: &[Segment],
    config: &AlignerConfig,
) -> Vec<AlignmentStep> {
    let mut pieces = make_pieces(scoring, path, config.ambiguous_threshold());
    for index in 0..pieces.len() {
        absorb_neighbours(&mut pieces, index, scoring, config.merge_threshold());
    }

    let mut steps = vec![];
    for piece in pieces {
        match piece {
            Piece::Gap([deleted, inserted]) => {
                if !deleted.is_empty() {
                    steps.push(AlignmentStep {
                        ids: ids_in(canonical, &deleted),
                        canonical: deleted.clone(),
                        legacy: inserted.start..inserted.start,
                        score: None,
                        status: AlignmentStatus::Deleted,
                    });
                }
                if !inserted.is_empty() {
                    steps.push(AlignmentStep {
                        ids: vec![],
                        canonical: deleted.end..deleted.end,
                        legacy: inserted,
                        score: None,
                        status: AlignmentStatus::Inserted,
                    });
                }
            }
            Piece::Correspondence { ranges, score } => {
                let status = classify(&ranges, score, config);
                let [canonical_range, legacy_range] = ranges;
                steps.push(AlignmentStep {
                    ids: ids_in(canonical, &canonical_range),
                    canonical: canonical_range,
                    legacy: legacy_range,
                    score: Some(score),
                    status,
                });
            }
        }
    }
    steps
}
