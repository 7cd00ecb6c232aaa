//! UCI option advertisements

use std::fmt;

use aggro_core::config::{EngineConfig, ProxyOption};

/// Option types the proxy advertises
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOption {
    /// Spin (numeric) option
    Spin {
        name: String,
        default: i64,
        min: i64,
        max: i64,
    },

    /// Free-text option
    String { name: String, default: String },
}

impl EngineOption {
    pub fn spin(name: impl Into<String>, default: i64, min: i64, max: i64) -> Self {
        EngineOption::Spin {
            name: name.into(),
            default,
            min,
            max,
        }
    }

    pub fn string(name: impl Into<String>, default: impl Into<String>) -> Self {
        EngineOption::String {
            name: name.into(),
            default: default.into(),
        }
    }
}

impl fmt::Display for EngineOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineOption::Spin {
                name,
                default,
                min,
                max,
            } => {
                write!(f, "option name {name} type spin default {default} min {min} max {max}")
            }
            EngineOption::String { name, default } => {
                write!(f, "option name {name} type string default {default}")
            }
        }
    }
}

/// Every configurable option, advertised with its current value as default
pub fn option_table(config: &EngineConfig) -> Vec<EngineOption> {
    ProxyOption::ALL
        .into_iter()
        .map(|opt| {
            let current = config.option_value(opt);
            match opt.range() {
                Some((min, max)) => {
                    // option_value は数値オプションでは常に整数
                    let default = current.parse::<i64>().unwrap_or(min).clamp(min, max);
                    EngineOption::spin(opt.name(), default, min, max)
                }
                None => EngineOption::string(opt.name(), current),
            }
        })
        .collect()
}
