//! Verdant Server - members-only marketplace backend
//!
//! # Module structure
//!
//! ```text
//! verdant-server/src/
//! ├── core/          # config, state, HTTP server assembly
//! ├── auth/          # JWT authentication, request principals
//! ├── api/           # HTTP routes and handlers
//! ├── verification/  # registration gate and admin review
//! ├── access/        # approved-member access gate
//! ├── transactions/  # gated transaction lifecycle
//! ├── documents/     # content-addressed identity document store
//! ├── services/      # bootstrap tasks
//! ├── db/            # SQLite pool and repositories
//! └── utils/         # errors, validation, logging
//! ```

pub mod access;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod documents;
pub mod services;
pub mod transactions;
pub mod utils;
pub mod verification;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_app, build_router};
pub use utils::{AppError, AppResponse, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};

// Security event logging, routed to the "security" target so the
// subscriber can split it out from application logs.
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
 _   _              _             _
| | | |            | |           | |
| | | | ___ _ __ __| | __ _ _ __ | |_
| | | |/ _ \ '__/ _` |/ _` | '_ \| __|
\ \_/ /  __/ | | (_| | (_| | | | | |_
 \___/ \___|_|  \__,_|\__,_|_| |_|\__|
    "#
    );
}

/// Load .env, resolve configuration and initialize logging.
///
/// Returns the resolved [`Config`] so `main` does not read the
/// environment twice.
pub fn setup_environment() -> Result<Config, Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    init_logger_with_file(Some(&config.log_level), log_dir.to_str());

    Ok(config)
}
