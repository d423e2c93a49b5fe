use std::ops::Range;

use string_interner::{StringInterner, Symbol as _};

use super::{
    params::AlignerConfig,
    vector::{TScore, TermVector, Vectorizer},
    DiffOp, Segment,
};

/// Per-call scoring state: one vector per distinct text and the full
/// canonical × legacy similarity matrix.
pub(super) struct SegmentScoring {
    vectors: Vec<TermVector>,
    vector_ids: [Vec<usize>; 2],
    similarities: Vec<TScore>,
    gap_penalty: TScore,
}

impl SegmentScoring {
    pub fn new(texts: [&[Segment]; 2], config: &AlignerConfig) -> Self {
        let vectorizer = Vectorizer::new(config.vectorizer());
        let mut interner: StringInterner = StringInterner::default();
        let mut vectors = vec![];
        let vector_ids = texts.map(|segments| {
            segments
                .iter()
                .map(|segment| {
                    let symbol = interner.get_or_intern(segment.text()).to_usize();
                    if symbol == vectors.len() {
                        vectors.push(vectorizer.vectorize(segment.text()));
                    }
                    symbol
                })
                .collect::<Vec<usize>>()
        });

        let sizes = vector_ids.each_ref().map(Vec::len);
        let mut similarities = Vec::with_capacity(sizes[0] * sizes[1]);
        for &canonical_id in &vector_ids[0] {
            for &legacy_id in &vector_ids[1] {
                similarities.push(vectors[canonical_id].similarity(&vectors[legacy_id]));
            }
        }

        SegmentScoring {
            vectors,
            vector_ids,
            similarities,
            gap_penalty: config.gap_penalty(),
        }
    }

    pub fn size(&self) -> [usize; 2] {
        [self.vector_ids[0].len(), self.vector_ids[1].len()]
    }

    pub fn distinct_texts(&self) -> usize {
        self.vectors.len()
    }

    pub fn vector(&self, side: usize, index: usize) -> &TermVector {
        &self.vectors[self.vector_ids[side][index]]
    }

    pub fn match_score(&self, part_indices: [usize; 2]) -> TScore {
        self.similarities[part_indices[0] * self.size()[1] + part_indices[1]]
    }

    /// Score of entering the DP cell at `dp_position` with `step`.
    pub fn step_score(&self, dp_position: [usize; 2], step: DiffOp) -> TScore {
        match step {
            DiffOp::Match => self.match_score(dp_position.map(|i| i - 1)),
            DiffOp::Delete | DiffOp::Insert => self.gap_penalty,
        }
    }

    /// Similarity between the concatenation of two runs of segments.
    pub fn range_score(&self, ranges: [Range<usize>; 2]) -> TScore {
        let [canonical, legacy] = [0, 1].map(|side| TermVector::sum(ranges[side].clone().map(|i| self.vector(side, i))));
        canonical.similarity(&legacy)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::{canonical_sequence, legacy_sequence};

    #[test]
    fn repeated_texts_are_vectorized_once() {
        let canonical = canonical_sequence([(None, "alpha beta"), (None, "gamma delta"), (None, "alpha beta")]);
        let legacy = legacy_sequence(["gamma delta", "epsilon"]);
        let scoring = SegmentScoring::new([&canonical, &legacy], &AlignerConfig::default());
        assert_eq!(scoring.size(), [3, 2]);
        assert_eq!(scoring.distinct_texts(), 3);
        assert_eq!(scoring.match_score([1, 0]), 1.0);
        assert_eq!(scoring.match_score([0, 0]), 0.0);
        assert_eq!(scoring.match_score([2, 1]), 0.0);
    }

    #[test]
    fn range_score_sums_vectors() {
        let canonical = canonical_sequence([(None, "The quick fox"), (None, "jumps over the dog")]);
        let legacy = legacy_sequence(["The quick fox jumps over the dog"]);
        let scoring = SegmentScoring::new([&canonical, &legacy], &AlignerConfig::default());
        assert_eq!(scoring.range_score([0..2, 0..1]), 1.0);
        assert!(scoring.range_score([1..2, 0..1]) < 1.0);
        assert_eq!(scoring.range_score([0..0, 0..1]), 0.0);
    }

    #[test]
    fn gap_steps_use_penalty() {
        let config = AlignerConfig::builder().gap_penalty(-0.25).build().unwrap();
        let canonical = canonical_sequence([(None, "alpha")]);
        let scoring = SegmentScoring::new([&canonical, &[]], &config);
        assert_eq!(scoring.step_score([1, 0], DiffOp::Delete), -0.25);
    }
}
