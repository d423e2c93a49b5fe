use thiserror::Error;

use super::vector::{TScore, VectorizerConfig};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("min_word must be at least 1, got {0}")]
    MinWord(usize),

    #[error("{name} must be a number in [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: TScore },

    #[error("ambiguous_threshold ({ambiguous}) must be lower than match_threshold ({matched})")]
    ThresholdOrder { ambiguous: TScore, matched: TScore },

    #[error("gap_penalty must be a finite number <= 0, got {0}")]
    GapPenalty(TScore),
}

/// Validated parameters of one aligner. Build with [`AlignerConfig::builder`].
#[derive(Clone, Debug, PartialEq)]
pub struct AlignerConfig {
    vectorizer: VectorizerConfig,
    gap_penalty: TScore,
    merge_threshold: TScore,
    match_threshold: TScore,
    ambiguous_threshold: TScore,
}

impl AlignerConfig {
    pub const DEFAULT_GAP_PENALTY: TScore = 0.0;
    pub const DEFAULT_MERGE_THRESHOLD: TScore = 0.5;
    pub const DEFAULT_MATCH_THRESHOLD: TScore = 0.6;
    pub const DEFAULT_AMBIGUOUS_THRESHOLD: TScore = 0.2;

    pub fn builder() -> AlignerConfigBuilder {
        AlignerConfigBuilder::default()
    }

    pub fn vectorizer(&self) -> &VectorizerConfig {
        &self.vectorizer
    }

    pub fn gap_penalty(&self) -> TScore {
        self.gap_penalty
    }

    pub fn merge_threshold(&self) -> TScore {
        self.merge_threshold
    }

    pub fn match_threshold(&self) -> TScore {
        self.match_threshold
    }

    pub fn ambiguous_threshold(&self) -> TScore {
        self.ambiguous_threshold
    }
}

impl Default for AlignerConfig {
    fn default() -> Self {
        AlignerConfig {
            vectorizer: VectorizerConfig::default(),
            gap_penalty: Self::DEFAULT_GAP_PENALTY,
            merge_threshold: Self::DEFAULT_MERGE_THRESHOLD,
            match_threshold: Self::DEFAULT_MATCH_THRESHOLD,
            ambiguous_threshold: Self::DEFAULT_AMBIGUOUS_THRESHOLD,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AlignerConfigBuilder {
    config: AlignerConfig,
}

impl Default for AlignerConfigBuilder {
    fn default() -> Self {
        AlignerConfigBuilder {
            config: AlignerConfig::default(),
        }
    }
}

impl AlignerConfigBuilder {
    pub fn vectorizer(mut self, vectorizer: VectorizerConfig) -> Self {
        self.config.vectorizer = vectorizer;
        self
    }

    pub fn gap_penalty(mut self, gap_penalty: TScore) -> Self {
        self.config.gap_penalty = gap_penalty;
        self
    }

    pub fn merge_threshold(mut self, threshold: TScore) -> Self {
        self.config.merge_threshold = threshold;
        self
    }

    pub fn match_threshold(mut self, threshold: TScore) -> Self {
        self.config.match_threshold = threshold;
        self
    }

    pub fn ambiguous_threshold(mut self, threshold: TScore) -> Self {
        self.config.ambiguous_threshold = threshold;
        self
    }

    pub fn build(self) -> Result<AlignerConfig, ConfigError> {
        let config = self.config;
        for (name, value) in [
            ("merge_threshold", config.merge_threshold),
            ("match_threshold", config.match_threshold),
            ("ambiguous_threshold", config.ambiguous_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if config.ambiguous_threshold >= config.match_threshold {
            return Err(ConfigError::ThresholdOrder {
                ambiguous: config.ambiguous_threshold,
                matched: config.match_threshold,
            });
        }
        if !config.gap_penalty.is_finite() || config.gap_penalty > 0.0 {
            return Err(ConfigError::GapPenalty(config.gap_penalty));
        }
        Ok(config)
    }
}
