//! Runtime configuration: CLI flag, then environment variable, then default.

use std::path::PathBuf;

use stockpile_inventory::LoadPolicy;
use stockpile_observability::LogFormat;

use crate::args::GlobalArgs;

pub const FILE_ENV: &str = "STOCKPILE_FILE";
pub const SKIP_MALFORMED_ENV: &str = "STOCKPILE_SKIP_MALFORMED";
pub const LOG_FORMAT_ENV: &str = "STOCKPILE_LOG_FORMAT";

pub const DEFAULT_FILE: &str = "inventory.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_file: PathBuf,
    pub load_policy: LoadPolicy,
    pub log_format: LogFormat,
    /// Problems found while resolving; logged once logging is up.
    pub warnings: Vec<String>,
}

impl Config {
    /// Resolve configuration from parsed flags and an environment lookup.
    pub fn resolve<E>(args: &GlobalArgs, env: E) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        let data_file = args
            .file
            .clone()
            .or_else(|| env(FILE_ENV).filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE));

        let skip_malformed = args.skip_malformed
            || match env(SKIP_MALFORMED_ENV) {
                None => false,
                Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                    warnings.push(format!(
                        "{SKIP_MALFORMED_ENV}={raw:?} is not a boolean; using strict loading"
                    ));
                    false
                }),
            };
        let load_policy = if skip_malformed {
            LoadPolicy::SkipMalformed
        } else {
            LoadPolicy::Strict
        };

        let log_format = match args.log_format {
            Some(format) => format,
            None => match env(LOG_FORMAT_ENV) {
                None => LogFormat::default(),
                Some(raw) => raw.parse().unwrap_or_else(|e| {
                    warnings.push(format!("{LOG_FORMAT_ENV}: {e}; using text"));
                    LogFormat::default()
                }),
            },
        };

        Self {
            data_file,
            load_policy,
            log_format,
            warnings,
        }
    }

    pub fn from_env(args: &GlobalArgs) -> Self {
        Self::resolve(args, |key| std::env::var(key).ok())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
