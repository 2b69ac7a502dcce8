mod config;
mod record;
mod result;
#[cfg(test)]
pub mod test_support;
mod wip;

pub use config::ForecastConfig;
pub use config::RollingStat;
pub use record::year_week;
pub use record::Records;
pub use record::TransitionRecord;
pub use result::Result;
pub use wip::WipCategory;
pub use wip::WipMapping;
