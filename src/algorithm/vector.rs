use std::collections::HashMap;

use log::trace;

use super::params::ConfigError;

pub type TScore = f64;

/// Sparse term-frequency vector.
///
/// Every stored count is positive; absent terms count as zero. The sum of
/// squared counts is computed once when the vector is built, so the value is
/// never mutated after construction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TermVector {
    counts: HashMap<String, u32>,
    sum_of_squares: TScore,
}

impl TermVector {
    fn from_counts(counts: HashMap<String, u32>) -> Self {
        let sum_of_squares = counts.values().map(|&v| TScore::from(v) * TScore::from(v)).sum();
        TermVector { counts, sum_of_squares }
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, term: &str) -> u32 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(term, &count)| (term.as_str(), count))
    }

    pub fn norm(&self) -> TScore {
        self.sum_of_squares.sqrt()
    }

    pub fn dot(&self, other: &TermVector) -> TScore {
        // Iterating the smaller side gives the same sum.
        let (small, large) = if self.len() <= other.len() { (self, other) } else { (other, self) };
        small
            .counts
            .iter()
            .map(|(term, &count)| TScore::from(count) * TScore::from(large.get(term)))
            .sum()
    }

    /// Terms present in both vectors, each mapped to the product of its counts.
    pub fn intersect(&self, other: &TermVector) -> TermVector {
        let counts = self
            .counts
            .iter()
            .filter_map(|(term, &count)| {
                let other_count = other.get(term);
                (other_count > 0).then(|| (term.clone(), count.saturating_mul(other_count)))
            })
            .collect();
        TermVector::from_counts(counts)
    }

    /// Cosine similarity in `[0, 1]`; zero when either side is empty.
    pub fn similarity(&self, other: &TermVector) -> TScore {
        let denominator = (self.sum_of_squares * other.sum_of_squares).sqrt();
        if denominator == 0.0 {
            return 0.0;
        }
        TScore::min(self.dot(other) / denominator, 1.0)
    }

    /// Term-wise sum, used to score a run of segments as one text.
    pub fn sum<'a>(vectors: impl IntoIterator<Item = &'a TermVector>) -> TermVector {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for vector in vectors {
            for (term, &count) in &vector.counts {
                *counts.entry(term.clone()).or_insert(0) += count;
            }
        }
        TermVector::from_counts(counts)
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for TermVector {
    /// Repeated terms are summed and zero counts are dropped.
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for (term, count) in iter {
            if count > 0 {
                *counts.entry(term.into()).or_insert(0) += count;
            }
        }
        TermVector::from_counts(counts)
    }
}

pub fn similarity(a: &TermVector, b: &TermVector) -> TScore {
    a.similarity(b)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorizerConfig {
    min_word: usize,
    term_replacements: HashMap<String, String>,
}

impl VectorizerConfig {
    pub const DEFAULT_MIN_WORD: usize = 3;

    /// Keys and values of `term_replacements` are lower-cased here, so lookups
    /// during vectorization are case-insensitive.
    pub fn new<K, V>(min_word: usize, term_replacements: impl IntoIterator<Item = (K, V)>) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if min_word < 1 {
            return Err(ConfigError::MinWord(min_word));
        }
        let term_replacements = term_replacements
            .into_iter()
            .map(|(from, to)| (from.as_ref().to_lowercase(), to.as_ref().to_lowercase()))
            .collect();
        Ok(VectorizerConfig {
            min_word,
            term_replacements,
        })
    }

    pub fn min_word(&self) -> usize {
        self.min_word
    }

    pub fn term_replacements(&self) -> &HashMap<String, String> {
        &self.term_replacements
    }
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            min_word: Self::DEFAULT_MIN_WORD,
            term_replacements: HashMap::new(),
        }
    }
}

const STRIPPED_PUNCTUATION: &[char] = &['.', ',', '_', ':', ';', '"', '\'', '“', '”', '‘', '’', '!', '?'];

/// Lower-cases, trims, splits hyphens and strips punctuation. Tokenizing the
/// output of this function yields the same terms as tokenizing its input.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .replace('-', " ")
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect()
}

#[derive(Clone, Copy, Debug)]
pub struct Vectorizer<'a> {
    config: &'a VectorizerConfig,
}

impl<'a> Vectorizer<'a> {
    pub fn new(config: &'a VectorizerConfig) -> Self {
        Vectorizer { config }
    }

    pub fn vectorize(&self, text: &str) -> TermVector {
        let normalized = normalize(text);
        let mut counts: HashMap<String, u32> = HashMap::new();
        // Splitting on a single space keeps empty tokens between repeated spaces.
        for token in normalized.split(' ') {
            let term = match self.config.term_replacements.get(token) {
                Some(replacement) => {
                    trace!("replacing term {token:?} with {replacement:?}");
                    replacement.as_str()
                }
                None => token,
            };
            if term.chars().count() >= self.config.min_word {
                *counts.entry(term.to_owned()).or_insert(0) += 1;
            }
        }
        TermVector::from_counts(counts)
    }
}

pub fn vectorize(text: &str, config: &VectorizerConfig) -> TermVector {
    Vectorizer::new(config).vectorize(text)
}

#[cfg(test)]
mod test {
    use super::*;

    fn vector(terms: &[(&str, u32)]) -> TermVector {
        terms.iter().map(|&(term, count)| (term, count)).collect()
    }

    #[test]
    fn vectorize_counts_terms() {
        let v = vectorize("The quick fox jumps over the dog", &VectorizerConfig::default());
        assert_eq!(v, vector(&[("the", 2), ("quick", 1), ("fox", 1), ("jumps", 1), ("over", 1), ("dog", 1)]));
        assert_eq!(v.len(), 6);
        assert_eq!(v.norm(), 3.0);
    }

    #[test]
    fn vectorize_drops_short_terms() {
        let config = VectorizerConfig::new(4, Vec::<(String, String)>::new()).unwrap();
        let v = vectorize("a cat and a horse", &config);
        assert_eq!(v, vector(&[("horse", 1)]));
        assert_eq!(v.get("cat"), 0);
    }

    #[test]
    fn vectorize_strips_punctuation_and_hyphens() {
        let v = vectorize("  “Well-said!” she said: ‘yes’; no?  ", &VectorizerConfig::default());
        assert_eq!(v, vector(&[("well", 1), ("said", 2), ("she", 1), ("yes", 1)]));
    }

    #[test]
    fn vectorize_keeps_non_ascii() {
        let v = vectorize("Le Bienheureux séjournait à Sāvatthi.", &VectorizerConfig::default());
        assert_eq!(v.get("séjournait"), 1);
        assert_eq!(v.get("sāvatthi"), 1);
        // 'à' is one char, below the minimum.
        assert_eq!(v.get("à"), 0);
    }

    #[test]
    fn vectorize_counts_empty_tokens_when_allowed() {
        let config = VectorizerConfig::new(1, Vec::<(String, String)>::new()).unwrap();
        assert_eq!(vectorize("ab  cd", &config), vector(&[("ab", 1), ("cd", 1)]));
        // Empty tokens have length 0, so only a zero minimum could keep them.
        assert!(vectorize("", &config).is_empty());
    }

    #[test]
    fn replacements_are_case_insensitive() {
        let config = VectorizerConfig::new(3, [("Bhikkhus", "Monks"), ("MENDICANTS", "monks")]).unwrap();
        let v = vectorize("Mendicants, the bhikkhus listened", &config);
        assert_eq!(v.get("monks"), 2);
        assert_eq!(v.get("bhikkhus"), 0);
        assert_eq!(v.get("listened"), 1);
    }

    #[test]
    fn replacement_below_min_word_is_dropped() {
        let config = VectorizerConfig::new(3, [("thus", "so")]).unwrap();
        assert!(vectorize("thus", &config).is_empty());
    }

    #[test]
    fn zero_min_word_is_rejected() {
        assert_eq!(
            VectorizerConfig::new(0, Vec::<(String, String)>::new()),
            Err(ConfigError::MinWord(0))
        );
    }

    #[test]
    fn vectorization_is_idempotent() {
        let config = VectorizerConfig::default();
        for text in [
            "The quick-brown FOX, jumped!",
            "“Quoted” words: ‘inner’ and more.",
            "Ainsi ai-je entendu : une fois le Bienheureux",
            "",
        ] {
            assert_eq!(vectorize(&normalize(text), &config), vectorize(text, &config), "{text:?}");
        }
    }

    #[test]
    fn similarity_bounds() {
        let vectors = [
            vector(&[]),
            vector(&[("alpha", 1)]),
            vector(&[("alpha", 3), ("beta", 1)]),
            vector(&[("beta", 2), ("gamma", 5)]),
            vector(&[("delta", 1)]),
        ];
        for a in &vectors {
            assert_eq!(similarity(a, &TermVector::default()), 0.0);
            for b in &vectors {
                let s = similarity(a, b);
                assert!((0.0..=1.0).contains(&s), "{s}");
                assert_eq!(s, similarity(b, a));
            }
        }
    }

    #[test]
    fn self_similarity_is_exactly_one() {
        let v = vectorize("the quick fox jumps over the lazy dog dog", &VectorizerConfig::default());
        assert_eq!(v.similarity(&v), 1.0);
    }

    #[test]
    fn similarity_matches_cosine() {
        let a = vector(&[("the", 1), ("quick", 1), ("fox", 1)]);
        let b = vector(&[("the", 2), ("quick", 1), ("fox", 1), ("jumps", 1), ("over", 1), ("dog", 1)]);
        assert_eq!(a.dot(&b), 4.0);
        let expected = 4.0 / (3f64.sqrt() * 3.0);
        assert!((a.similarity(&b) - expected).abs() < 1e-12);
    }

    #[test]
    fn intersect_multiplies_shared_counts() {
        let a = vector(&[("alpha", 2), ("beta", 1)]);
        let b = vector(&[("alpha", 3), ("gamma", 1)]);
        assert_eq!(a.intersect(&b), vector(&[("alpha", 6)]));
        assert!(a.intersect(&TermVector::default()).is_empty());
    }

    #[test]
    fn intersect_saturates_large_counts() {
        let a = vector(&[("alpha", u32::MAX)]);
        let b = vector(&[("alpha", 2)]);
        assert_eq!(a.intersect(&b).get("alpha"), u32::MAX);
    }

    #[test]
    fn sum_adds_counts() {
        let a = vector(&[("alpha", 2), ("beta", 1)]);
        let b = vector(&[("alpha", 1), ("gamma", 1)]);
        assert_eq!(TermVector::sum([&a, &b]), vector(&[("alpha", 3), ("beta", 1), ("gamma", 1)]));
    }

    #[test]
    fn from_iter_drops_zero_counts() {
        let v: TermVector = [("alpha", 0), ("beta", 2)].into_iter().collect();
        assert_eq!(v.len(), 1);
        assert_eq!(v.get("alpha"), 0);
    }
}
