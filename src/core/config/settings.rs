use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::validation::validate_settings;
use crate::core::errors::AgentError;

const REDACT_PLACEHOLDER: &str = "****";

const SENSITIVE_PATTERNS: [&str; 6] = [
    "api_key",
    "secret",
    "password",
    "_token",
    "credential",
    "access_key",
];

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_CITY: &str = "London";
pub const DEFAULT_COLLECTION: &str = "pdf_documents";
pub const DEFAULT_VECTOR_STORE_PATH: &str = "vector_store_local";
pub const DEFAULT_LANGSMITH_ENDPOINT: &str = "https://api.smith.langchain.com";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Measurement system requested from the weather provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }
}

impl FromStr for Units {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            other => Err(AgentError::configuration(format!(
                "OPENWEATHER_UNITS must be one of metric, imperial, standard (got '{}')",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model_name: String,
    pub base_url: String,
    pub embedding_model: String,
}

#[derive(Clone)]
pub struct WeatherSettings {
    /// Only required when a weather question is actually asked.
    pub api_key: Option<String>,
    pub base_url: String,
    pub units: Units,
    pub default_city: String,
}

#[derive(Debug, Clone)]
pub struct PdfSettings {
    pub pdf_path: PathBuf,
    pub collection_name: String,
    pub store_path: PathBuf,
}

#[derive(Clone)]
pub struct EvaluationSettings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub dataset_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub log_dir: Option<PathBuf>,
}

/// Process settings, read once from the environment at startup.
#[derive(Clone)]
pub struct Settings {
    pub openai: OpenAiSettings,
    pub weather: WeatherSettings,
    pub pdf: PdfSettings,
    pub evaluation: EvaluationSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from process environment variables, reading `.env` first
    /// when one exists in the working directory.
    pub fn from_env() -> Result<Self, AgentError> {
        if let Err(err) = dotenv::dotenv() {
            if !err.not_found() {
                tracing::warn!("Failed to read .env file: {}", err);
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AgentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let api_key = get("OPENAI_API_KEY").ok_or_else(|| {
            AgentError::configuration(
                "OPENAI_API_KEY is not set. Please configure it in your environment or .env file.",
            )
        })?;

        let pdf_path = get("PDF_PATH").ok_or_else(|| {
            AgentError::configuration("PDF_PATH is not set. Provide a path to the PDF used for RAG.")
        })?;

        let units = match get("OPENWEATHER_UNITS") {
            Some(raw) => raw.parse::<Units>()?,
            None => Units::default(),
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                AgentError::configuration(format!("PORT must be a valid port number (got '{}')", raw))
            })?,
            None => DEFAULT_PORT,
        };

        let allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let settings = Settings {
            openai: OpenAiSettings {
                api_key,
                model_name: get_or("OPENAI_MODEL_NAME", DEFAULT_OPENAI_MODEL),
                base_url: get_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
                embedding_model: get_or("OPENAI_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            },
            weather: WeatherSettings {
                api_key: get("OPENWEATHER_API_KEY"),
                base_url: get_or("OPENWEATHER_BASE_URL", DEFAULT_WEATHER_BASE_URL),
                units,
                default_city: get_or("OPENWEATHER_DEFAULT_CITY", DEFAULT_CITY),
            },
            pdf: PdfSettings {
                pdf_path: PathBuf::from(pdf_path),
                collection_name: get_or("PDF_COLLECTION_NAME", DEFAULT_COLLECTION),
                store_path: PathBuf::from(get_or("VECTOR_STORE_PATH", DEFAULT_VECTOR_STORE_PATH)),
            },
            evaluation: EvaluationSettings {
                api_key: get("LANGSMITH_API_KEY"),
                endpoint: get_or("LANGSMITH_ENDPOINT", DEFAULT_LANGSMITH_ENDPOINT),
                dataset_id: get("LANGSMITH_DATASET_ID"),
            },
            server: ServerSettings {
                host: get_or("HOST", DEFAULT_HOST),
                port,
                allowed_origins,
                log_dir: get("LOG_DIR").map(PathBuf::from),
            },
        };

        validate_settings(&settings)?;
        Ok(settings)
    }

    /// Settings as JSON with secrets replaced, for startup logging.
    pub fn redacted(&self) -> Value {
        redact_sensitive_values(&self.to_value())
    }

    fn to_value(&self) -> Value {
        json!({
            "openai": {
                "api_key": self.openai.api_key,
                "model_name": self.openai.model_name,
                "base_url": self.openai.base_url,
                "embedding_model": self.openai.embedding_model,
            },
            "weather": {
                "api_key": self.weather.api_key,
                "base_url": self.weather.base_url,
                "units": self.weather.units.as_str(),
                "default_city": self.weather.default_city,
            },
            "pdf": {
                "pdf_path": self.pdf.pdf_path.display().to_string(),
                "collection_name": self.pdf.collection_name,
                "store_path": self.pdf.store_path.display().to_string(),
            },
            "evaluation": {
                "api_key": self.evaluation.api_key,
                "endpoint": self.evaluation.endpoint,
                "dataset_id": self.evaluation.dataset_id,
            },
            "server": {
                "host": self.server.host,
                "port": self.server.port,
                "allowed_origins": self.server.allowed_origins,
                "log_dir": self.server.log_dir.as_ref().map(|p| p.display().to_string()),
            },
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Settings({})", self.redacted())
    }
}

fn redact_sensitive_values(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut redacted = Map::new();
            for (key, val) in map {
                if is_sensitive_key(key) && !val.is_null() {
                    redacted.insert(key.clone(), Value::String(REDACT_PLACEHOLDER.to_string()));
                } else {
                    redacted.insert(key.clone(), redact_sensitive_values(val));
                }
            }
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact_sensitive_values).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    SENSITIVE_PATTERNS
        .iter()
        .any(|pattern| key_lower.contains(pattern))
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

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![("OPENAI_API_KEY", "sk-test"), ("PDF_PATH", "docs/manual.pdf")]
    }

    #[test]
    fn missing_openai_key_is_a_configuration_error() {
        let err = Settings::from_lookup(lookup_from(&[("PDF_PATH", "a.pdf")])).unwrap_err();
        assert!(matches!(err, AgentError::Configuration(msg) if msg.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn missing_pdf_path_is_a_configuration_error() {
        let err = Settings::from_lookup(lookup_from(&[("OPENAI_API_KEY", "sk")])).unwrap_err();
        assert!(matches!(err, AgentError::Configuration(msg) if msg.contains("PDF_PATH")));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let err = Settings::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "   "),
            ("PDF_PATH", "a.pdf"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AgentError::Configuration(_)));
    }

    #[test]
    fn defaults_are_applied() {
        let settings = Settings::from_lookup(lookup_from(&required())).unwrap();

        assert_eq!(settings.openai.model_name, DEFAULT_OPENAI_MODEL);
        assert_eq!(settings.openai.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert!(settings.weather.api_key.is_none());
        assert_eq!(settings.weather.units, Units::Metric);
        assert_eq!(settings.weather.default_city, "London");
        assert_eq!(settings.weather.base_url, DEFAULT_WEATHER_BASE_URL);
        assert_eq!(settings.pdf.collection_name, "pdf_documents");
        assert_eq!(settings.pdf.store_path, PathBuf::from(DEFAULT_VECTOR_STORE_PATH));
        assert!(settings.evaluation.api_key.is_none());
        assert_eq!(settings.server.port, DEFAULT_PORT);
        assert!(settings.server.allowed_origins.is_empty());
    }

    #[test]
    fn overrides_are_read() {
        let mut pairs = required();
        pairs.extend([
            ("OPENAI_MODEL_NAME", "gpt-4o"),
            ("OPENWEATHER_API_KEY", "wx"),
            ("OPENWEATHER_UNITS", "Imperial"),
            ("OPENWEATHER_DEFAULT_CITY", "Boston"),
            ("PDF_COLLECTION_NAME", "handbook"),
            ("PORT", "9100"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
        ]);
        let settings = Settings::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(settings.openai.model_name, "gpt-4o");
        assert_eq!(settings.weather.api_key.as_deref(), Some("wx"));
        assert_eq!(settings.weather.units, Units::Imperial);
        assert_eq!(settings.weather.default_city, "Boston");
        assert_eq!(settings.pdf.collection_name, "handbook");
        assert_eq!(settings.server.port, 9100);
        assert_eq!(
            settings.server.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn invalid_units_are_rejected() {
        let mut pairs = required();
        pairs.push(("OPENWEATHER_UNITS", "kelvinish"));
        let err = Settings::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, AgentError::Configuration(msg) if msg.contains("OPENWEATHER_UNITS")));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut pairs = required();
        pairs.push(("PORT", "eighty"));
        assert!(Settings::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn redacted_hides_secrets() {
        let mut pairs = required();
        pairs.push(("OPENWEATHER_API_KEY", "wx-secret"));
        let settings = Settings::from_lookup(lookup_from(&pairs)).unwrap();

        let redacted = settings.redacted();
        assert_eq!(redacted["openai"]["api_key"], "****");
        assert_eq!(redacted["weather"]["api_key"], "****");
        assert!(redacted["evaluation"]["api_key"].is_null());
        assert_eq!(redacted["openai"]["model_name"], DEFAULT_OPENAI_MODEL);

        let debug = format!("{:?}", settings);
        assert!(!debug.contains("sk-test"));
        assert!(!debug.contains("wx-secret"));
    }

    #[test]
    fn units_round_trip_through_str() {
        for units in [Units::Metric, Units::Imperial, Units::Standard] {
            assert_eq!(units.as_str().parse::<Units>().unwrap(), units);
        }
    }
}
