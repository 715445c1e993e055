//! # office-core
//!
//! Core library for Star Office: a single "activity state" record (idle,
//! writing, researching, ...) persisted to disk, read by the UI poller and
//! written by the `set-state` control tool.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. The server wraps store calls
//!   in `spawn_blocking`.
//! - **Lazy decay**: Stale working states are reset to idle when read, not by a
//!   timer. See [`state`].
//! - **Graceful degradation**: Missing or corrupt files read as the default
//!   idle record, never as errors. Only writes can fail.
//! - **No globals**: One [`StateStore`] per process, passed by handle.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use office_core::{ActivityState, StateStore, StateUpdate, StorageConfig};
//!
//! let storage = StorageConfig::resolve()?;
//! let store = StateStore::open(storage.state_file())?;
//! store.write_state(StateUpdate::new(ActivityState::Writing, "drafting"))?;
//! let record = store.read_current_state();
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod state;
pub mod storage;

pub use config::{load_server_config, ServerConfig};
pub use error::{OfficeError, Result};
pub use state::{
    ActivityState, InvalidState, RecordTimestamp, StateRecord, StateStore, StateUpdate,
};
pub use storage::StorageConfig;
