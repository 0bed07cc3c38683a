pub mod config;
pub mod error;

pub use config::TaxonomistConfig;
pub use error::{Result, TaxonomistError};
