use anyhow::Error;
use serde::Deserialize;
use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error as DError;

#[derive(Debug, Clone, DError, PartialEq)]
pub enum ConfigError {
    #[error("neighbor_count must be a positive integer")]
    ZeroNeighborCount,

    #[error("train_fraction must be in (0, 1), got {0}")]
    InvalidTrainFraction(f64),

    #[error("Unknown strategy '{0}', expected user-based or item-based")]
    UnknownStrategy(String),
}

/// Which axis the neighborhood is built on
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    UserBased,
    ItemBased,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::UserBased
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user-based" | "user" => Ok(Self::UserBased),
            "item-based" | "item" => Ok(Self::ItemBased),
            other => Err(ConfigError::UnknownStrategy(other.into())),
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::UserBased => write!(f, "User-Based CF"),
            Strategy::ItemBased => write!(f, "Item-Based CF"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub neighbor_count: usize,
    pub strategy: Strategy,
    pub recommendation_count: usize,
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            neighbor_count: 50,
            strategy: Strategy::default(),
            recommendation_count: 10,
            parallel: true,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.neighbor_count == 0 {
            return Err(ConfigError::ZeroNeighborCount);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    pub train_fraction: f64,
    pub seed: u64,
    pub max_test_triples: Option<usize>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            train_fraction: 0.8,
            seed: 42,
            max_test_triples: Some(1000),
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fraction = self.train_fraction;
        if fraction.is_nan() || fraction <= 0.0 || fraction >= 1.0 {
            return Err(ConfigError::InvalidTrainFraction(self.train_fraction));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub matrix: PathBuf,
    pub ratings: PathBuf,
    pub means: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            matrix: "data/user_item_matrix.csv".into(),
            ratings: "data/ratings_processed.csv".into(),
            means: Some("data/user_means.csv".into()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub evaluation: EvaluationConfig,
    pub data: DataConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let parsed: Self = toml::from_str(&contents)?;
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.evaluation.validate()
    }
}
