use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_MAX_CARDS: u32 = 12;

/// Root sweep configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChartConfig {
    pub run_id: String,
    #[serde(default)]
    pub sweep: SweepConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ChartConfig {
    /// Load and validate a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let mut cfg: ChartConfig = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        cfg.validate()
            .map_err(|source| ConfigError::Invalid { path, source })?;
        Ok(cfg)
    }

    /// Check every block without touching the filesystem. Called again after
    /// CLI overrides are applied.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.sweep.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Substitute `{run_id}` placeholders and turn the output templates into
    /// concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            cells_jsonl: resolve_template(&self.run_id, &self.outputs.cells_jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
            plots_dir: resolve_template(&self.run_id, &self.outputs.plots_dir),
        }
    }
}

/// Grid bounds for the (hand, discard) sweep.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SweepConfig {
    #[serde(default = "default_max_cards")]
    pub max_cards: u32,
}

impl SweepConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_cards == 0 {
            return Err(ValidationError::InvalidField {
                field: "sweep.max_cards".to_string(),
                message: "sweep bound must be at least 1 card".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_cards: DEFAULT_MAX_CARDS,
        }
    }
}

fn default_max_cards() -> u32 {
    DEFAULT_MAX_CARDS
}

/// Where the run writes its artifacts. All three fields accept a `{run_id}`
/// placeholder.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub cells_jsonl: String,
    pub summary_md: String,
    pub plots_dir: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        validate_output_path("outputs.cells_jsonl", &self.cells_jsonl, run_id)?;
        validate_output_path("outputs.summary_md", &self.summary_md, run_id)?;
        validate_output_path("outputs.plots_dir", &self.plots_dir, run_id)?;
        Ok(())
    }
}

fn validate_output_path(field: &str, template: &str, run_id: &str) -> Result<(), ValidationError> {
    if template.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: field.to_string(),
            message: "output path must not be empty".to_string(),
        });
    }
    if resolve_template(run_id, template).components().count() == 0 {
        return Err(ValidationError::InvalidField {
            field: field.to_string(),
            message: "resolved output path is invalid".to_string(),
        });
    }
    Ok(())
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub cell_details: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            cell_details: false,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    /// Parse the configured level name, `None` for anything unrecognized.
    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    let valid = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
    if !run_id.chars().all(valid) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only use ASCII alphanumerics, '.', '_' and '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub cells_jsonl: PathBuf,
    pub summary_md: PathBuf,
    pub plots_dir: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "stage0_smoke"
outputs:
  cells_jsonl: "charts/out/{run_id}/cells.jsonl"
  summary_md: "charts/out/{run_id}/summary.md"
  plots_dir: "charts/out/{run_id}/plots"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: ChartConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.sweep.max_cards, DEFAULT_MAX_CARDS);
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.cells_jsonl,
            PathBuf::from("charts/out/stage0_smoke/cells.jsonl")
        );
    }

    #[test]
    fn explicit_sweep_bound_overrides_default() {
        let yaml = format!("{BASIC_YAML}sweep:\n  max_cards: 20\n");
        let mut cfg: ChartConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("validate");
        assert_eq!(cfg.sweep.max_cards, 20);
    }

    #[test]
    fn rejects_zero_card_sweeps() {
        let yaml = format!("{BASIC_YAML}sweep:\n  max_cards: 0\n");
        let mut cfg: ChartConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("zero bound should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "sweep.max_cards"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("stage0_smoke", "stage 0 smoke");
        let mut cfg: ChartConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn rejects_empty_output_path() {
        let yaml = BASIC_YAML.replace("charts/out/{run_id}/summary.md", "");
        let mut cfg: ChartConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("empty path should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "outputs.summary_md"
        ));
    }

    #[test]
    fn outputs_resolve_template_multiple_occurrences() {
        let yaml = BASIC_YAML.replace(
            "charts/out/{run_id}/plots",
            "charts/out/{run_id}/{run_id}/plots",
        );
        let mut cfg: ChartConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.plots_dir,
            PathBuf::from("charts/out/stage0_smoke/stage0_smoke/plots")
        );
    }

    #[test]
    fn blank_tracing_level_normalizes_to_info() {
        let yaml = BASIC_YAML.replace("\"debug\"", "\"  \"");
        let mut cfg: ChartConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("validate");
        assert_eq!(cfg.logging.tracing_level, "info");
        assert_eq!(cfg.logging.level(), Some(Level::INFO));
    }
}
