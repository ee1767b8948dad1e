//! Org directory server
//!
//! Employee directory with an org chart and CSV bulk import.
//!
//! # Module layout
//!
//! ```text
//! org-server/src/
//! ├── core/          # config, shared state, server lifecycle
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── directory/     # hierarchy builder, persistence trait, member operations
//! ├── import/        # CSV parsing and two-phase reconciliation
//! ├── api/           # HTTP routes and handlers
//! ├── middleware/    # request logging
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod directory;
pub mod import;
pub mod middleware;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use directory::{DirectoryStore, SqliteStore};
pub use import::CsvReconciler;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env` and initialize logging from the resulting configuration
pub fn setup_environment() -> Config {
    // a missing .env file is fine
    let _ = dotenv::dotenv();
    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        config.is_production(),
        config.log_dir.as_deref(),
    );
    config
}

pub fn print_banner() {
    println!(
        r#"
  ___             ____  _               _
 / _ \ _ __ __ _ |  _ \(_)_ __ ___  ___| |_ ___  _ __ _   _
| | | | '__/ _` || | | | | '__/ _ \/ __| __/ _ \| '__| | | |
| |_| | | | (_| || |_| | | | |  __/ (__| || (_) | |  | |_| |
 \___/|_|  \__, ||____/|_|_|  \___|\___|\__\___/|_|   \__, |
           |___/                                      |___/
    "#
    );
}
