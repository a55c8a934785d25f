// Product Search - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod catalog;
pub mod config;
pub mod db;
pub mod report;
pub mod search;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod error;

// Re-export commonly used types
pub use catalog::{CatalogSource, InMemoryCatalog, SqliteCatalog};
pub use config::ServerConfig;
pub use db::{count_products, get_all_products, insert_products, load_csv, setup_database, ProductItem};
pub use report::{ReportAggregator, SearchReport, KEY_TERMS};
pub use search::{search_products, MatchMode, ParsedQuery, ProductSearchService};

#[cfg(feature = "server")]
pub use api::{build_router, AppState};
#[cfg(feature = "server")]
pub use error::{ApiError, ApiResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the fmt subscriber on stderr. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
