use serde_json::Value;

use super::city::extract_city;
use super::client::WeatherSource;
use crate::core::errors::AgentError;
use crate::llm::ChatModel;

/// Prompt embedding the question and the provider's raw JSON.
pub fn build_weather_prompt(question: &str, weather_json: &Value) -> String {
    let pretty = serde_json::to_string_pretty(weather_json).unwrap_or_else(|_| weather_json.to_string());
    format!(
        "You are a helpful weather assistant. \
         Use only the JSON weather data below to answer the user's question.\n\n\
         User question: {question}\n\n\
         Weather data (OpenWeatherMap JSON):\n\
         {pretty}\n\n\
         Provide a concise, user-friendly answer, including temperature, conditions, and any other important details."
    )
}

/// Answer a weather question: extract city, fetch, summarize.
///
/// Returns the generated text and the untouched provider payload. Fetch
/// errors are returned as-is; nothing here retries.
pub async fn answer_weather_question(
    question: &str,
    default_city: &str,
    source: &dyn WeatherSource,
    model: &dyn ChatModel,
) -> Result<(String, Value), AgentError> {
    let city = extract_city(question, default_city);
    tracing::info!("Extracted city: {}", city);

    let weather_json = source.fetch(&city).await?;

    let prompt = build_weather_prompt(question, &weather_json);
    let answer = model.generate(&prompt).await?;

    Ok((answer, weather_json))
}
