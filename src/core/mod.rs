//! Core infrastructure module.
//!
//! This module provides the foundational pieces shared by the loader, the
//! forest graph and the scorer:
//!
//! - [`types`]: identifier and score types
//! - [`constants`]: format literals and configuration defaults
//! - [`error`]: error taxonomy and the crate-wide `Result`
//!
//! ```rust
//! use dtree_rust::core::{
//!     types::{FeatureId, NodeId, Score},
//!     constants::MODEL_HEADER,
//!     error::{ForestError, Result},
//! };
//!
//! let id: NodeId = 17;
//! let feature: FeatureId = 5;
//! let score: Score = 0.25;
//! assert_eq!(MODEL_HEADER, "dtree");
//! # let _ = (id, feature, score);
//! ```

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{ForestError, MalformedModelError, Result};
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

static CORE_INIT: Once = Once::new();
static CORE_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize the global core state: installs an `env_logger` logger
/// defaulting to `info` when `RUST_LOG` is unset. Later calls are no-ops.
pub fn initialize_core() -> Result<()> {
    CORE_INIT.call_once(|| {
        initialize_logging();
        CORE_INITIALIZED.store(true, Ordering::Release);
        log::info!("dtree-rust {} initialized", DTREE_RUST_VERSION);
    });
    Ok(())
}

/// Check if the core module is initialized
pub fn is_core_initialized() -> bool {
    CORE_INITIALIZED.load(Ordering::Acquire)
}

fn initialize_logging() {
    let env = env_logger::Env::default().default_filter_or("info");

    // Another logger may already be installed by the host application
    let _ = env_logger::Builder::from_env(env).try_init();
}
