use crate::algorithm::{AlignerConfig, ConfigError, TScore, VectorizerConfig};
use anyhow::Context as _;
use clap::{Args, ValueEnum};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Print the alignment with `{:#?}`.
    Debug,
    /// Side-by-side table of canonical and legacy text.
    Table,
    /// One JSON document per aligned pair.
    Json,
}

macro_rules! config_structs {
    {
        $(
            $( #[config_opt($attr:meta)] )*
            pub $name:ident: $typ:ty,
        )*
        $(
            #[config_alias($atarget:ident = $avalue:expr)]
            $( #[config_opt($aattr:meta)] )*
            pub $aname:ident: bool,
        )*
    } => {
        #[derive(Clone, Debug, PartialEq)]
        pub struct Config {
            $( pub $name: $typ, )*
        }

        #[derive(Args, Deserialize, Default, Debug)]
        pub struct ConfigOpt {
            $( $( #[$aattr] )* #[serde(skip)] pub $aname: bool, )*
            $( $( #[$attr] )* pub $name: Option<$typ>, )*
        }

        impl Config {
            pub fn update(self, mut opt: ConfigOpt) -> Config {
                $(
                    if opt.$aname {
                        opt.$atarget = Some($avalue);
                    }
                )*
                Config {
                    $( $name: opt.$name.unwrap_or(self.$name), )*
                }
            }
        }
    }
}

config_structs! {
    #[config_opt(arg(short, long))]
    pub mode: OutputMode,

    #[config_opt(arg(long, value_name = "NUM"))]
    pub min_word: usize,

    #[config_opt(arg(long, value_name = "SCORE", allow_hyphen_values = true))]
    pub gap_penalty: TScore,

    #[config_opt(arg(long, value_name = "SCORE"))]
    pub merge_threshold: TScore,

    #[config_opt(arg(long, value_name = "SCORE"))]
    pub match_threshold: TScore,

    #[config_opt(arg(long, value_name = "SCORE"))]
    pub ambiguous_threshold: TScore,

    #[config_opt(arg(long, require_equals = true, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL", group = "color_group"))]
    pub color: bool,

    #[config_opt(arg(long, value_name = "NUM"))]
    pub column_width: usize,

    #[config_opt(arg(skip))]
    pub term_replacements: BTreeMap<String, String>,

    #[config_alias(color = false)]
    #[config_opt(arg(long, group = "color_group"))]
    pub no_color: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            mode: OutputMode::Table,
            min_word: VectorizerConfig::DEFAULT_MIN_WORD,
            gap_penalty: AlignerConfig::DEFAULT_GAP_PENALTY,
            merge_threshold: AlignerConfig::DEFAULT_MERGE_THRESHOLD,
            match_threshold: AlignerConfig::DEFAULT_MATCH_THRESHOLD,
            ambiguous_threshold: AlignerConfig::DEFAULT_AMBIGUOUS_THRESHOLD,
            color: atty::is(atty::Stream::Stdout),
            column_width: 40,
            term_replacements: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Validates the alignment parameters. Nothing is aligned with a config that fails here.
    pub fn aligner_config(&self) -> Result<AlignerConfig, ConfigError> {
        AlignerConfig::builder()
            .vectorizer(VectorizerConfig::new(self.min_word, &self.term_replacements)?)
            .gap_penalty(self.gap_penalty)
            .merge_threshold(self.merge_threshold)
            .match_threshold(self.match_threshold)
            .ambiguous_threshold(self.ambiguous_threshold)
            .build()
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("segalign").join("config.toml"))
}

pub fn parse_config_file(content: &str) -> anyhow::Result<ConfigOpt> {
    Ok(toml::from_str(content)?)
}

/// Reads the config file at `path`, or at the default location when `path` is
/// `None`. A missing default file is not an error; a missing explicit one is.
pub fn read_config_file(path: Option<&Path>) -> anyhow::Result<ConfigOpt> {
    let (path, required) = match path {
        Some(path) => (path.to_owned(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(ConfigOpt::default()),
        },
    };
    if !required && !path.exists() {
        log::debug!("no config file at {}", path.display());
        return Ok(ConfigOpt::default());
    }
    let content = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    parse_config_file(&content).with_context(|| format!("parsing {}", path.display()))
}
