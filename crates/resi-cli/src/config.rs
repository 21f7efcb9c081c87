//! Credentials from an env file with a process environment fallback.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Backend base URL keys, in lookup order.
pub const BASE_URL_KEYS: [&str; 2] = ["VITE_SUPABASE_URL", "SUPABASE_URL"];
/// Backend access key keys, in lookup order.
pub const ACCESS_KEY_KEYS: [&str; 2] = ["VITE_SUPABASE_ANON_KEY", "SUPABASE_ANON_KEY"];
pub const GEMINI_KEY_KEYS: [&str; 1] = ["GEMINI_API_KEY"];

pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The env file exists but could not be parsed.
    #[error("failed to read env file {path}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// A required credential is absent from both sources.
    #[error("missing {name}: set one of {keys} in {path} or the environment")]
    MissingCredential {
        name: &'static str,
        keys: String,
        path: PathBuf,
    },
}

/// Variables from the env file and the process, file first.
///
/// The process environment is only read, never modified.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    path: PathBuf,
    file: HashMap<String, String>,
    process: HashMap<String, String>,
}

impl EnvSource {
    /// Load `path` (a missing file is treated as empty) plus the process env.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = read_env_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            process: std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
                .collect(),
        })
    }

    pub fn from_maps(
        path: impl Into<PathBuf>,
        file: HashMap<String, String>,
        process: HashMap<String, String>,
    ) -> Self {
        Self {
            path: path.into(),
            file,
            process,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First non-blank value for any of `keys`, checking the whole file before
    /// the process environment.
    pub fn get(&self, keys: &[&str]) -> Option<&str> {
        lookup(&self.file, keys).or_else(|| lookup(&self.process, keys))
    }

    fn require(&self, name: &'static str, keys: &[&str]) -> Result<String, ConfigError> {
        self.get(keys)
            .map(str::to_string)
            .ok_or_else(|| ConfigError::MissingCredential {
                name,
                keys: keys.join(" or "),
                path: self.path.clone(),
            })
    }
}

fn lookup<'a>(vars: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| vars.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(error) if error.not_found() => {
            tracing::debug!(path = %path.display(), "no env file");
            return Ok(HashMap::new());
        }
        Err(source) => {
            return Err(ConfigError::EnvFile {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        })?;
        vars.insert(key, value);
    }
    tracing::debug!(path = %path.display(), keys = vars.len(), "loaded env file");
    Ok(vars)
}

/// Backend endpoint and access key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub base_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    pub fn from_env(env: &EnvSource) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env.require("backend URL", &BASE_URL_KEYS)?,
            api_key: env.require("backend access key", &ACCESS_KEY_KEYS)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn file_values_win_over_process_env() {
        let env = EnvSource::from_maps(
            ".env",
            vars(&[("SUPABASE_URL", "https://file.supabase.co")]),
            vars(&[
                ("VITE_SUPABASE_URL", "https://process.supabase.co"),
                ("VITE_SUPABASE_ANON_KEY", "process-key"),
            ]),
        );
        let credentials = Credentials::from_env(&env).unwrap();
        assert_eq!(credentials.base_url, "https://file.supabase.co");
        assert_eq!(credentials.api_key, "process-key");
    }

    #[test]
    fn blank_values_count_as_missing() {
        let env = EnvSource::from_maps(
            ".env",
            vars(&[("VITE_SUPABASE_URL", "https://x.supabase.co"), ("VITE_SUPABASE_ANON_KEY", "  ")]),
            HashMap::new(),
        );
        let error = Credentials::from_env(&env).unwrap_err();
        assert!(error.to_string().contains("VITE_SUPABASE_ANON_KEY or SUPABASE_ANON_KEY"));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let credentials = Credentials {
            base_url: "https://x.supabase.co".into(),
            api_key: "secret".into(),
        };
        assert!(!format!("{credentials:?}").contains("secret"));
    }
}
