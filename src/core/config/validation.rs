use reqwest::Url;

use super::settings::Settings;
use crate::core::errors::AgentError;

pub fn validate_settings(settings: &Settings) -> Result<(), AgentError> {
    validate_http_url("OPENAI_BASE_URL", &settings.openai.base_url)?;
    validate_http_url("OPENWEATHER_BASE_URL", &settings.weather.base_url)?;
    validate_http_url("LANGSMITH_ENDPOINT", &settings.evaluation.endpoint)?;

    validate_identifier("PDF_COLLECTION_NAME", &settings.pdf.collection_name)?;

    for (index, origin) in settings.server.allowed_origins.iter().enumerate() {
        validate_http_url(&format!("CORS_ALLOWED_ORIGINS[{}]", index), origin)?;
    }

    Ok(())
}

fn validate_http_url(name: &str, value: &str) -> Result<(), AgentError> {
    let url = Url::parse(value).map_err(|err| {
        AgentError::configuration(format!("Invalid config at '{}': {} ({})", name, err, value))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(AgentError::configuration(format!(
            "Invalid config at '{}': expected http or https URL, got scheme '{}'",
            name, scheme
        ))),
    }
}

/// Collection names double as SQL values and log labels; keep them plain.
fn validate_identifier(name: &str, value: &str) -> Result<(), AgentError> {
    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(AgentError::configuration(format!(
            "Invalid config at '{}': only letters, digits, '_' and '-' are allowed (got '{}')",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_urls_pass() {
        assert!(validate_http_url("X", "https://api.openai.com/v1").is_ok());
        assert!(validate_http_url("X", "http://127.0.0.1:1234").is_ok());
    }

    #[test]
    fn non_http_urls_fail() {
        assert!(validate_http_url("X", "ftp://example.com").is_err());
        assert!(validate_http_url("X", "not a url").is_err());
    }

    #[test]
    fn collection_identifier_rules() {
        assert!(validate_identifier("C", "pdf_documents").is_ok());
        assert!(validate_identifier("C", "handbook-2024").is_ok());
        let err = validate_identifier("C", "pdf docs;").unwrap_err();
        assert!(err.to_string().contains("C"));
    }
}
