use log::LevelFilter;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::error::{JigsawError, Result};

const DATA_DIR_DEFAULT: &str = "data";
const INPUT_NAME_DEFAULT: &str = "day20";
const RENDER_SCALE_DEFAULT: u32 = 8;

pub const ENV_DATA_DIR: &str = "JIGSAW_DATA_DIR";
pub const ENV_LOG: &str = "JIGSAW_LOG";
pub const ENV_LOG_FILE: &str = "JIGSAW_LOG_FILE";
pub const ENV_RENDER: &str = "JIGSAW_RENDER";

/// Which puzzle file to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputKind {
    /// The small worked example, `<name>_test.txt`
    Test,
    /// The full puzzle, `<name>.txt`
    #[default]
    Real,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub input_name: String,
    pub log_level: LevelFilter,
    /// Also log to this file when set
    pub log_file: Option<PathBuf>,
    /// Write the oriented picture as a PNG when set
    pub render_path: Option<PathBuf>,
    pub render_scale: u32,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            data_dir: PathBuf::from(DATA_DIR_DEFAULT),
            input_name: INPUT_NAME_DEFAULT.to_string(),
            log_level: LevelFilter::Info,
            log_file: None,
            render_path: None,
            render_scale: RENDER_SCALE_DEFAULT,
        };
    }
}

impl Config {
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        return self;
    }

    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        return self;
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        return self;
    }

    pub fn with_render_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.render_path = Some(path.into());
        return self;
    }

    pub fn from_env() -> Result<Self> {
        return Self::from_lookup(|key| std::env::var(key).ok());
    }

    /// Builds a config from the `JIGSAW_*` keys `lookup` knows about,
    /// falling back to defaults for the rest
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config = config.with_data_dir(dir);
        }
        if let Some(level) = lookup(ENV_LOG) {
            let parsed = LevelFilter::from_str(level.trim()).map_err(|_| JigsawError::InvalidConfig {
                key: ENV_LOG.to_string(),
                value: level.clone(),
            })?;
            config = config.with_log_level(parsed);
        }
        if let Some(path) = lookup(ENV_LOG_FILE) {
            config = config.with_log_file(path);
        }
        if let Some(path) = lookup(ENV_RENDER) {
            config = config.with_render_path(path);
        }
        return Ok(config);
    }

    pub fn input_path(&self, kind: InputKind) -> PathBuf {
        let file = match kind {
            InputKind::Test => format!("{}_test.txt", self.input_name),
            InputKind::Real => format!("{}.txt", self.input_name),
        };
        return Path::new(&self.data_dir).join(file);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        return move |key: &str| map.get(key).cloned();
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.input_path(InputKind::Real), PathBuf::from("data/day20.txt"));
        assert_eq!(config.input_path(InputKind::Test), PathBuf::from("data/day20_test.txt"));
    }

    #[test]
    fn environment_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_DATA_DIR, "/tmp/puzzles"),
            (ENV_LOG, "debug"),
            (ENV_RENDER, "out.png"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.render_path, Some(PathBuf::from("out.png")));
        assert_eq!(config.log_file, None);
        assert_eq!(config.input_path(InputKind::Test), PathBuf::from("/tmp/puzzles/day20_test.txt"));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[(ENV_LOG, "loud")])).unwrap_err();
        assert!(matches!(err, JigsawError::InvalidConfig { .. }));
    }
}
