pub mod types;
pub mod time;
pub mod error;
pub mod logging;
pub mod parser;
pub mod codec;
pub mod reader;
pub mod config;

// Re-export core types for convenience
pub use types::{MarketDataType, Record, Resolution, SubscriptionConfig, Symbol};

// Re-export the row parser
pub use parser::{
    ColumnMapping, MissingColumnPolicy, ParsedLine, Provider, RowParser, DEFAULT_VALUE_COLUMN,
    DEFAULT_VALUE_INDEX,
};

// Re-export error types
pub use error::{ErrorSeverity, FeedError, FeedResult};

// Re-export the streaming reader and configuration
pub use config::{Config, ConfigError, FeedConfig};
pub use reader::FeedReader;

// Re-export logging functions
pub use logging::{init_logging, init_test_logging, log_feed_error, log_record};
