//! Config command implementation and configuration loading.
//!
//! The effective configuration is the file given by `--config` (or the
//! defaults), with `--max-rounds` applied on top.

use std::io::Write;
use std::path::Path;

use shake_agent::EngineConfig;

use crate::error::CliError;
use crate::output::OutputFormat;

/// Loads the engine configuration and applies command-line overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the result is invalid.
pub fn resolve_config(
    path: Option<&Path>,
    max_rounds: Option<u32>,
) -> Result<EngineConfig, CliError> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(max_rounds) = max_rounds {
        config.max_rounds = max_rounds;
    }
    config.validate()?;
    Ok(config)
}

/// Prints the effective engine configuration.
pub struct ConfigCommand<'a> {
    config: &'a EngineConfig,
}

impl<'a> ConfigCommand<'a> {
    /// Create a new config command.
    #[must_use]
    pub const fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        format.write(writer, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;

    #[test]
    fn resolve_defaults_and_overrides() {
        let config = resolve_config(None, None).unwrap();
        assert_eq!(config, EngineConfig::default());

        let config = resolve_config(None, Some(6)).unwrap();
        assert_eq!(config.max_rounds, 6);

        assert!(resolve_config(None, Some(0)).is_err());
    }

    #[test]
    fn resolve_file_then_override() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, r#"{{"max_rounds": 4, "accept_within_percent": 2.0}}"#).expect("write");

        let config = resolve_config(Some(file.path()), None).unwrap();
        assert_eq!(config.max_rounds, 4);
        assert!((config.accept_within_percent - 2.0).abs() < f64::EPSILON);

        let config = resolve_config(Some(file.path()), Some(2)).unwrap();
        assert_eq!(config.max_rounds, 2);
    }

    #[test]
    fn prints_json_config() {
        let config = EngineConfig::builder().max_rounds(5).build().unwrap();
        let mut out = Vec::new();
        ConfigCommand::new(&config)
            .execute(&mut out, &OutputFormat::new(Format::Json))
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["max_rounds"], 5);
        assert_eq!(parsed["thresholds"]["auto_accept_score"], 85);
    }
}
