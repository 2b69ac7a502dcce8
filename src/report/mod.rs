mod forecast;
pub mod markdown;

pub use forecast::ForecastReport;
pub use forecast::MIN_COMPLETED_FOR_FORECAST;
pub use markdown::MarkdownReport;
