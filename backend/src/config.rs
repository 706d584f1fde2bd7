use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CONFIG_PATH: &str = "config/analysis.yaml";

pub const DEFAULT_INSTRUCTION: &str = "Analyze this facial image for skin health. Determine if the person would benefit from a professional facial treatment.
Look for signs of:
1. Congestion/blackheads/clogged pores
2. Dehydration or flakiness
3. Dullness or uneven tone
4. Redness or inflammation
5. Texture issues

Provide a detailed analysis in JSON format. Be professional, encouraging, and clinical in tone.";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid analysis config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Optional overrides loaded from `config/analysis.yaml`.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisOverrides {
    pub model: Option<String>,
    pub instruction: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl AnalysisOverrides {
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(serde_yaml::from_str(&raw)?))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub instruction: String,
    pub timeout: Duration,
    pub port: u16,
    pub frontend_dir: String,
    pub max_payload_bytes: usize,
}

/// Default JSON body limit. Covers the base64 form of the largest upload the
/// frontend accepts plus the request envelope.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 20 * 1024 * 1024;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(|key| std::env::var(key).ok())
    }

    /// Builds the config from environment lookups and the YAML file named by
    /// `ANALYSIS_CONFIG`. Environment variables win over the file, the file
    /// wins over built-in defaults.
    pub fn from_sources<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let overrides_path =
            lookup("ANALYSIS_CONFIG").unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let overrides = match AnalysisOverrides::load(Path::new(&overrides_path))? {
            Some(overrides) => {
                log::info!("Loaded analysis overrides from {}", overrides_path);
                overrides
            }
            None => AnalysisOverrides::default(),
        };

        Self::resolve(&lookup, overrides)
    }

    fn resolve<F>(lookup: &F, overrides: AnalysisOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .unwrap_or_default();

        let frontend_dir = lookup("FRONTEND_DIR").unwrap_or_else(|| {
            match lookup("CARGO_MANIFEST_DIR") {
                Some(manifest_dir) => format!("{}/../frontend/dist", manifest_dir),
                None => "/usr/src/app/frontend/dist".to_string(),
            }
        });

        let timeout_secs = match overrides.timeout_secs {
            Some(0) => {
                return Err(ConfigError::InvalidNumber {
                    key: "timeout_secs",
                    value: "0".to_string(),
                });
            }
            Some(secs) => secs,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            model: lookup("GEMINI_MODEL")
                .or(overrides.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            instruction: overrides
                .instruction
                .unwrap_or_else(|| DEFAULT_INSTRUCTION.to_string()),
            timeout: Duration::from_secs(parse_number(
                lookup,
                "ANALYSIS_TIMEOUT_SECS",
                timeout_secs,
            )?),
            port: parse_number(lookup, "PORT", 8081)?,
            frontend_dir,
            max_payload_bytes: parse_number(
                lookup,
                "MAX_PAYLOAD_BYTES",
                DEFAULT_MAX_PAYLOAD_BYTES,
            )?,
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

fn parse_number<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialOrd + Default,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) if parsed > T::default() => Ok(parsed),
            _ => Err(ConfigError::InvalidNumber { key, value }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn env_only(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        AppConfig::resolve(&lookup_from(pairs), AnalysisOverrides::default())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = env_only(&[]).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.port, 8081);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_payload_bytes, DEFAULT_MAX_PAYLOAD_BYTES);
        assert_eq!(config.frontend_dir, "/usr/src/app/frontend/dist");
        assert!(!config.has_api_key());
    }

    #[test]
    fn api_key_falls_back_to_generic_variable() {
        let config = env_only(&[("API_KEY", "generic")]).unwrap();
        assert_eq!(config.api_key, "generic");

        let config =
            env_only(&[("API_KEY", "generic"), ("GEMINI_API_KEY", "specific")]).unwrap();
        assert_eq!(config.api_key, "specific");
        assert!(config.has_api_key());
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = env_only(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { key: "PORT", .. }));

        let err = env_only(&[("ANALYSIS_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                key: "ANALYSIS_TIMEOUT_SECS",
                ..
            }
        ));
    }

    fn overrides(yaml: &str) -> AnalysisOverrides {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn yaml_overrides_replace_defaults() {
        let config = AppConfig::resolve(
            &lookup_from(&[]),
            overrides("model: gemini-2.5-flash\ninstruction: Assess the skin.\ntimeout_secs: 15\n"),
        )
        .unwrap();

        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.instruction, "Assess the skin.");
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn environment_wins_over_yaml() {
        let config = AppConfig::resolve(
            &lookup_from(&[
                ("GEMINI_MODEL", "gemini-2.5-pro"),
                ("ANALYSIS_TIMEOUT_SECS", "15"),
            ]),
            overrides("model: gemini-3-flash-preview\ntimeout_secs: 60\n"),
        )
        .unwrap();

        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn environment_wins_over_shipped_config_file() {
        let shipped = concat!(env!("CARGO_MANIFEST_DIR"), "/../config/analysis.yaml");
        let config = AppConfig::from_sources(lookup_from(&[
            ("ANALYSIS_CONFIG", shipped),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("ANALYSIS_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn zero_timeout_in_yaml_is_rejected() {
        let err = AppConfig::resolve(&lookup_from(&[]), overrides("timeout_secs: 0\n")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber {
                key: "timeout_secs",
                ..
            }
        ));
    }

    #[test]
    fn default_payload_limit_fits_largest_upload() {
        let encoded = shared::image::MAX_UPLOAD_BYTES.div_ceil(3) * 4;
        assert!(encoded + 1024 < DEFAULT_MAX_PAYLOAD_BYTES as u64);
    }

    #[test]
    fn missing_override_file_is_not_an_error() {
        let loaded = AnalysisOverrides::load(Path::new("does/not/exist.yaml")).unwrap();
        assert!(loaded.is_none());
    }
}
