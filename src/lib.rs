pub mod config;
pub mod evaluator;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use config::{ChannelChoice, Settings, WatchConfig};
pub use models::Product;
pub use pipeline::{PriceWatch, RunSummary};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
