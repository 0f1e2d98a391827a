pub mod paths;
pub mod settings;
pub mod validation;

pub use paths::AppPaths;
pub use settings::{
    EvaluationSettings, OpenAiSettings, PdfSettings, ServerSettings, Settings, Units,
    WeatherSettings,
};
