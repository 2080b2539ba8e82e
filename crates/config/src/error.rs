//! Configuration errors
use figment::providers::{Format, Toml};
use std::{collections::HashSet, fmt};

/// The header printed before the individual extraction failures.
pub const FAILED_TO_EXTRACT_CONFIG_MSG: &str = "failed to extract crowdchain config:";

/// Errors that can occur while loading the [`Config`](crate::Config).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// One or more providers produced values that could not be extracted.
    #[error("{}", ExtractErrors(.0))]
    Extract(#[from] figment::Error),
    /// A setting without a usable default was never supplied.
    #[error(
        "missing required setting `{key}`; set it in {file} or via the {env} environment variable",
        file = crate::Config::FILE_NAME,
        env = crate::Config::env_var(.key)
    )]
    Missing { key: &'static str },
}

impl ConfigError {
    pub const fn missing(key: &'static str) -> Self {
        Self::Missing { key }
    }
}

/// Renders every unique extraction failure on its own line, tagging the ones that came from
/// the toml file.
struct ExtractErrors<'a>(&'a figment::Error);

impl fmt::Display for ExtractErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut unique = HashSet::with_capacity(self.0.count());
        writeln!(f, "{FAILED_TO_EXTRACT_CONFIG_MSG}")?;
        for err in self.0.clone() {
            let from_toml = err
                .metadata
                .as_ref()
                .map(|meta| meta.name.contains(Toml::NAME))
                .unwrap_or_default();
            let mut line = String::new();
            if from_toml {
                line.push_str(crate::Config::FILE_NAME);
                line.push_str(" error: ");
            }
            line.push_str(&err.to_string());
            if !err.path.is_empty() {
                line.push_str(&format!(" for setting `{}`", err.path.join(".")));
            }
            if unique.insert(line.clone()) {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}
