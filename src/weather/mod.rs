//! Live weather answering: city extraction, provider client and the
//! fetch-then-summarize pipeline.

pub mod city;
pub mod client;
pub mod pipeline;

pub use city::extract_city;
pub use client::{WeatherClient, WeatherQuery, WeatherSource};
pub use pipeline::{answer_weather_question, build_weather_prompt};
