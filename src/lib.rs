// Financial Chatbot - Core Library
// Keyword-driven Q&A over a static table of company financial metrics.
// Exposes the dataset index and resolver for use in the CLI, the web
// server and tests.

pub mod dataset;
pub mod resolver;

// Re-export commonly used types
pub use dataset::{load_csv, CompanySummary, DatasetIndex, FinancialRecord};
pub use resolver::{group_thousands, process_query, Metric, FALLBACK_RESPONSE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default data file path, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "k10_trends.csv";
