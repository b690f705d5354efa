use std::{env, ffi::OsString, num::NonZeroUsize, path::PathBuf, str::FromStr};

use anyhow::Context;
use directories::BaseDirs;
use log::LevelFilter;

use crate::{env::PathEnv, execution::MAX_SEGMENTS};

pub const MAX_LINE_LENGTH: usize = 512;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub prompt: String,
    pub path_env: PathEnv,
    pub max_line_length: usize,
    pub max_segments: usize,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "$ ".to_string(),
            path_env: PathEnv::new(),
            max_line_length: MAX_LINE_LENGTH,
            max_segments: MAX_SEGMENTS,
            log_level: LevelFilter::Off,
            log_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var_os(key))
    }

    /// Builds the config from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let string = |key: &str| -> anyhow::Result<Option<String>> {
            var(key)
                .map(|value| {
                    value
                        .into_string()
                        .map_err(|_| anyhow::anyhow!("{key} is not valid UTF-8"))
                })
                .transpose()
        };

        let mut config = Config {
            path_env: PathEnv::from_path_var(var("PATH").as_deref()),
            ..Config::default()
        };

        if let Some(prompt) = string("PIPESH_PROMPT")? {
            config.prompt = prompt;
        }
        if let Some(value) = string("PIPESH_MAX_LINE")? {
            config.max_line_length = parse_var("PIPESH_MAX_LINE", &value)?;
        }
        if let Some(value) = string("PIPESH_MAX_SEGMENTS")? {
            // a zero bound would reject every line, even an empty one
            let max: NonZeroUsize = parse_var("PIPESH_MAX_SEGMENTS", &value)?;
            config.max_segments = max.get();
        }
        if let Some(value) = string("PIPESH_LOG")? {
            config.log_level = parse_var("PIPESH_LOG", &value)?;
        }

        config.log_file = match var("PIPESH_LOG_FILE") {
            Some(path) => Some(PathBuf::from(path)),
            None => default_log_file(),
        };

        Ok(config)
    }
}

fn parse_var<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {key}: {value:?}"))
}

fn default_log_file() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.data_local_dir().join("pipesh").join("pipesh.log"))
}
