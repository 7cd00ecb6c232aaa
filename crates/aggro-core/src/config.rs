//! Engine configuration: tunables, UCI option validation, TOML defaults.

use std::fmt;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use crate::error::ConfigError;

/// Engine used when neither the command line nor a config file names one
pub const DEFAULT_ENGINE_PATH: &str = "stockfish";

pub const DEFAULT_MULTIPV: u32 = 5;
pub const MIN_MULTIPV: i64 = 1;
pub const MAX_MULTIPV: i64 = 100;

pub const DEFAULT_MIN_SCORE: i32 = -50;
pub const MIN_MIN_SCORE: i64 = -10_000;
pub const MAX_MIN_SCORE: i64 = 10_000;

pub const DEFAULT_MAX_LOSS: i32 = 50;
pub const MIN_MAX_LOSS: i64 = 0;
pub const MAX_MAX_LOSS: i64 = 20_000;

/// Values shown in the handshake while Hash/Threads are left to the engine
pub const DISPLAY_HASH_MB: i64 = 16;
pub const DISPLAY_THREADS: i64 = 1;
pub const MIN_HASH_MB: i64 = 1;
pub const MAX_HASH_MB: i64 = 33_554_432;
pub const MIN_THREADS: i64 = 1;
pub const MAX_THREADS: i64 = 1024;

pub const DEFAULT_MOVETIME_MS: u64 = 1000;
pub const MAX_DEFAULT_MOVETIME_MS: i64 = 3_600_000;
pub const MAX_DEFAULT_DEPTH: i64 = 255;

pub const DEFAULT_OWN_NAME: &str = "Aggro";
pub const DEFAULT_OPPONENT_NAME: &str = "Opponent";

/// Options accepted by `setoption`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyOption {
    EnginePath,
    MultiPv,
    Hash,
    Threads,
    MinScore,
    MaxLoss,
}

impl ProxyOption {
    pub const ALL: [ProxyOption; 6] = [
        ProxyOption::EnginePath,
        ProxyOption::MultiPv,
        ProxyOption::Hash,
        ProxyOption::Threads,
        ProxyOption::MinScore,
        ProxyOption::MaxLoss,
    ];

    /// Name as advertised over UCI (and forwarded to the wrapped engine)
    pub fn name(self) -> &'static str {
        match self {
            ProxyOption::EnginePath => "EnginePath",
            ProxyOption::MultiPv => "MultiPV",
            ProxyOption::Hash => "Hash",
            ProxyOption::Threads => "Threads",
            ProxyOption::MinScore => "MinScore",
            ProxyOption::MaxLoss => "MaxLoss",
        }
    }

    /// Case-insensitive lookup
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|opt| opt.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Inclusive bounds for numeric options, `None` for strings
    pub fn range(self) -> Option<(i64, i64)> {
        match self {
            ProxyOption::EnginePath => None,
            ProxyOption::MultiPv => Some((MIN_MULTIPV, MAX_MULTIPV)),
            ProxyOption::Hash => Some((MIN_HASH_MB, MAX_HASH_MB)),
            ProxyOption::Threads => Some((MIN_THREADS, MAX_THREADS)),
            ProxyOption::MinScore => Some((MIN_MIN_SCORE, MAX_MIN_SCORE)),
            ProxyOption::MaxLoss => Some((MIN_MAX_LOSS, MAX_MAX_LOSS)),
        }
    }

    /// Whether a changed value must be sent to a running engine
    pub fn forwarded(self) -> bool {
        matches!(self, ProxyOption::MultiPv | ProxyOption::Hash | ProxyOption::Threads)
    }
}

impl fmt::Display for ProxyOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tunable parameters of the proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub engine_path: String,
    /// Lines requested from the wrapped engine
    pub multipv: u32,
    /// Lowest normalized score a candidate may have
    pub min_score: i32,
    /// Largest tolerated drop below the best candidate
    pub max_loss: i32,
    /// Forwarded as-is; `None` leaves the engine's own default
    pub hash_mb: Option<u32>,
    pub threads: Option<u32>,
    /// Player names used for the hypothetical games handed to the evaluator
    pub own_name: String,
    pub opponent_name: String,
    /// Search limit used when `go` carries no limit of its own
    pub default_movetime_ms: Option<u64>,
    pub default_depth: Option<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_path: DEFAULT_ENGINE_PATH.to_string(),
            multipv: DEFAULT_MULTIPV,
            min_score: DEFAULT_MIN_SCORE,
            max_loss: DEFAULT_MAX_LOSS,
            hash_mb: None,
            threads: None,
            own_name: DEFAULT_OWN_NAME.to_string(),
            opponent_name: DEFAULT_OPPONENT_NAME.to_string(),
            default_movetime_ms: Some(DEFAULT_MOVETIME_MS),
            default_depth: None,
        }
    }
}

/// Parse an integer and check it against `[min, max]`
fn parse_in_range(name: &str, val: &str, min: i64, max: i64) -> Result<i64, ConfigError> {
    let v = val.trim().parse::<i64>().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: val.to_string(),
    })?;
    check_range(name, v, min, max)
}

fn check_range(name: &str, v: i64, min: i64, max: i64) -> Result<i64, ConfigError> {
    if !(min..=max).contains(&v) {
        return Err(ConfigError::OutOfRange {
            name: name.to_string(),
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

impl EngineConfig {
    /// Apply a `setoption`. Nothing is mutated unless the whole value is valid.
    ///
    /// Returns the option that changed so the caller can propagate it.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<ProxyOption, ConfigError> {
        let opt =
            ProxyOption::from_name(name).ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;
        let value = value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingValue(opt.name().to_string()))?;

        match opt {
            ProxyOption::EnginePath => {
                self.engine_path = value.to_string();
            }
            _ => {
                // range() は数値オプションでは常に Some
                let (min, max) = opt.range().unwrap_or((i64::MIN, i64::MAX));
                let v = parse_in_range(opt.name(), value, min, max)?;
                match opt {
                    ProxyOption::MultiPv => self.multipv = v as u32,
                    ProxyOption::Hash => self.hash_mb = Some(v as u32),
                    ProxyOption::Threads => self.threads = Some(v as u32),
                    ProxyOption::MinScore => self.min_score = v as i32,
                    ProxyOption::MaxLoss => self.max_loss = v as i32,
                    ProxyOption::EnginePath => {}
                }
            }
        }
        debug!("option {opt} = {value}");
        Ok(opt)
    }

    /// Current value of an option as text
    pub fn option_value(&self, opt: ProxyOption) -> String {
        match opt {
            ProxyOption::EnginePath => self.engine_path.clone(),
            ProxyOption::MultiPv => self.multipv.to_string(),
            ProxyOption::Hash => self.hash_mb.map_or(DISPLAY_HASH_MB, i64::from).to_string(),
            ProxyOption::Threads => self.threads.map_or(DISPLAY_THREADS, i64::from).to_string(),
            ProxyOption::MinScore => self.min_score.to_string(),
            ProxyOption::MaxLoss => self.max_loss.to_string(),
        }
    }

    /// Values that must reach the wrapped engine when it is (re)initialized
    pub fn engine_settings(&self) -> Vec<(&'static str, String)> {
        let mut settings = Vec::new();
        if let Some(hash) = self.hash_mb {
            settings.push((ProxyOption::Hash.name(), hash.to_string()));
        }
        if let Some(threads) = self.threads {
            settings.push((ProxyOption::Threads.name(), threads.to_string()));
        }
        settings.push((ProxyOption::MultiPv.name(), self.multipv.to_string()));
        settings
    }

    /// Load defaults from a TOML file, falling back to built-in defaults
    /// for keys it does not set
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        file.into_config()
    }
}

/// On-disk form; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    engine_path: Option<String>,
    multipv: Option<i64>,
    min_score: Option<i64>,
    max_loss: Option<i64>,
    hash: Option<i64>,
    threads: Option<i64>,
    own_name: Option<String>,
    opponent_name: Option<String>,
    default_movetime_ms: Option<i64>,
    default_depth: Option<i64>,
}

impl ConfigFile {
    fn into_config(self) -> Result<EngineConfig, ConfigError> {
        let mut config = EngineConfig::default();

        if let Some(path) = self.engine_path {
            if path.trim().is_empty() {
                return Err(ConfigError::MissingValue("engine_path".to_string()));
            }
            config.engine_path = path;
        }
        if let Some(v) = self.multipv {
            config.multipv = check_range("multipv", v, MIN_MULTIPV, MAX_MULTIPV)? as u32;
        }
        if let Some(v) = self.min_score {
            config.min_score = check_range("min_score", v, MIN_MIN_SCORE, MAX_MIN_SCORE)? as i32;
        }
        if let Some(v) = self.max_loss {
            config.max_loss = check_range("max_loss", v, MIN_MAX_LOSS, MAX_MAX_LOSS)? as i32;
        }
        if let Some(v) = self.hash {
            config.hash_mb = Some(check_range("hash", v, MIN_HASH_MB, MAX_HASH_MB)? as u32);
        }
        if let Some(v) = self.threads {
            config.threads = Some(check_range("threads", v, MIN_THREADS, MAX_THREADS)? as u32);
        }
        if let Some(name) = self.own_name {
            config.own_name = name;
        }
        if let Some(name) = self.opponent_name {
            config.opponent_name = name;
        }
        if let Some(v) = self.default_movetime_ms {
            config.default_movetime_ms =
                Some(check_range("default_movetime_ms", v, 1, MAX_DEFAULT_MOVETIME_MS)? as u64);
        }
        if let Some(v) = self.default_depth {
            config.default_depth = Some(check_range("default_depth", v, 1, MAX_DEFAULT_DEPTH)? as u32);
        }
        if config.own_name == config.opponent_name {
            return Err(ConfigError::InvalidValue {
                name: "opponent_name".to_string(),
                value: config.opponent_name,
            });
        }

        Ok(config)
    }
}
