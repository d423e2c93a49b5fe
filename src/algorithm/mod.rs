mod naive_dp;
pub mod params;
mod postprocess;
mod scoring;
pub mod vector;


pub use self::{
    params::{AlignerConfig, AlignerConfigBuilder, ConfigError},
    vector::{normalize, similarity, vectorize, TScore, TermVector, Vectorizer, VectorizerConfig},
};

use self::scoring::SegmentScoring;
use log::debug;
use rayon::prelude::*;
use serde::Serialize;
use std::{collections::BTreeMap, fmt, ops::Range};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum DiffOp {
    Match,
    Insert,
    Delete,
}

impl DiffOp {
    /// How far the op advances on the canonical and legacy side.
    pub fn movement(&self) -> [usize; 2] {
        match self {
            DiffOp::Delete => [1, 0],
            DiffOp::Insert => [0, 1],
            DiffOp::Match => [1, 1],
        }
    }
}

/// One unit of text, positioned in its own sequence. Canonical segments carry
/// an identifier; legacy paragraphs usually don't.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    index: usize,
    id: Option<String>,
    text: String,
}

impl Segment {
    pub fn canonical(index: usize, id: Option<String>, text: impl Into<String>) -> Self {
        Segment {
            index,
            id,
            text: text.into(),
        }
    }

    pub fn legacy(index: usize, text: impl Into<String>) -> Self {
        Segment {
            index,
            id: None,
            text: text.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

pub fn canonical_sequence<T: Into<String>>(items: impl IntoIterator<Item = (Option<String>, T)>) -> Vec<Segment> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, (id, text))| Segment::canonical(index, id, text))
        .collect()
}

pub fn legacy_sequence<T: Into<String>>(texts: impl IntoIterator<Item = T>) -> Vec<Segment> {
    texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| Segment::legacy(index, text))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlignmentStatus {
    /// One-to-one, similarity at or above the match threshold.
    Matched,
    /// One canonical segment spread over several legacy paragraphs.
    Split,
    /// Several canonical segments covered by one legacy paragraph.
    Merged,
    /// One-to-one, but too weak to trust without review.
    Ambiguous,
    /// Canonical segments with no legacy counterpart.
    Deleted,
    /// Legacy paragraphs with no canonical counterpart.
    Inserted,
}

impl AlignmentStatus {
    pub const ALL: [AlignmentStatus; 6] = [
        AlignmentStatus::Matched,
        AlignmentStatus::Split,
        AlignmentStatus::Merged,
        AlignmentStatus::Ambiguous,
        AlignmentStatus::Deleted,
        AlignmentStatus::Inserted,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AlignmentStatus::Matched => "MATCHED",
            AlignmentStatus::Split => "SPLIT",
            AlignmentStatus::Merged => "MERGED",
            AlignmentStatus::Ambiguous => "AMBIGUOUS",
            AlignmentStatus::Deleted => "DELETED",
            AlignmentStatus::Inserted => "INSERTED",
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, AlignmentStatus::Deleted | AlignmentStatus::Inserted)
    }
}

impl fmt::Display for AlignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentStep {
    pub canonical: Range<usize>,
    pub legacy: Range<usize>,
    /// Identifiers of the canonical segments in `canonical`, in order.
    pub ids: Vec<String>,
    /// Absent for gaps.
    pub score: Option<TScore>,
    pub status: AlignmentStatus,
}

impl AlignmentStep {
    pub fn range(&self, side: usize) -> &Range<usize> {
        match side {
            0 => &self.canonical,
            _ => &self.legacy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alignment {
    steps: Vec<AlignmentStep>,
    counts: BTreeMap<AlignmentStatus, usize>,
    canonical_len: usize,
    legacy_len: usize,
}

impl Alignment {
    fn new(steps: Vec<AlignmentStep>, sizes: [usize; 2]) -> Self {
        let mut counts = BTreeMap::new();
        for step in &steps {
            *counts.entry(step.status).or_insert(0) += 1;
        }
        Alignment {
            steps,
            counts,
            canonical_len: sizes[0],
            legacy_len: sizes[1],
        }
    }

    pub fn steps(&self) -> &[AlignmentStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<AlignmentStep> {
        self.steps
    }

    /// Number of steps with the given status.
    pub fn count(&self, status: AlignmentStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> impl Iterator<Item = (AlignmentStatus, usize)> + '_ {
        AlignmentStatus::ALL.into_iter().map(|status| (status, self.count(status)))
    }

    pub fn canonical_len(&self) -> usize {
        self.canonical_len
    }

    pub fn legacy_len(&self) -> usize {
        self.legacy_len
    }

    pub fn is_identity(&self) -> bool {
        self.steps.iter().all(|step| step.status == AlignmentStatus::Matched)
            && self.steps.len() == self.canonical_len
            && self.canonical_len == self.legacy_len
    }
}

#[derive(Clone, Debug, Default)]
pub struct Aligner {
    config: AlignerConfig,
}

impl Aligner {
    pub fn new(config: AlignerConfig) -> Self {
        Aligner { config }
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    pub fn align(&self, canonical: &[Segment], legacy: &[Segment]) -> Alignment {
        let scoring = SegmentScoring::new([canonical, legacy], &self.config);
        debug!(
            "aligning {} canonical segments with {} legacy paragraphs ({} distinct texts)",
            canonical.len(),
            legacy.len(),
            scoring.distinct_texts()
        );

        let path = naive_dp::naive_dp(&scoring);
        debug!("optimal path score {:.4}", naive_dp::alignment_score(&scoring, &path));

        let steps = postprocess::build_steps(&scoring, &path, canonical, &self.config);
        let alignment = Alignment::new(steps, scoring.size());
        debug!(
            "alignment summary: {}",
            alignment
                .counts()
                .filter(|&(_, count)| count > 0)
                .map(|(status, count)| format!("{status}={count}"))
                .collect::<Vec<_>>()
                .join(" ")
        );
        alignment
    }

    /// Best cumulative DP value, without backtracking.
    pub fn optimal_score(&self, canonical: &[Segment], legacy: &[Segment]) -> TScore {
        naive_dp::compute_score(&SegmentScoring::new([canonical, legacy], &self.config))
    }

    /// Aligns independent pairs in parallel.
    pub fn align_batch<C, L>(&self, pairs: &[(C, L)]) -> Vec<Alignment>
    where
        C: AsRef<[Segment]> + Sync,
        L: AsRef<[Segment]> + Sync,
    {
        pairs
            .par_iter()
            .map(|(canonical, legacy)| self.align(canonical.as_ref(), legacy.as_ref()))
            .collect()
    }
}

pub fn align(canonical: &[Segment], legacy: &[Segment], config: &AlignerConfig) -> Alignment {
    Aligner::new(config.clone()).align(canonical, legacy)
}
