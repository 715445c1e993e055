//! Activity State (single record, lazy auto-idle)
//!
//! Holds the one "what is the assistant doing right now" record that the office
//! UI renders.
//!
//! # Architecture
//!
//! ```text
//! set-state CLI ──write_state──▶ state.json ◀──read_current_state── office-server ◀── UI poller
//!    (writer)                    (storage)          (reader)             (HTTP)        (display)
//! ```
//!
//! There is no background process. A working state (`writing`, `researching`,
//! `executing`) that has not been refreshed within its TTL is reset to idle by
//! whichever reader sees it first, and that reader writes the idle record back
//! so every other poller converges on the same answer.
//!
//! # Failure Model
//!
//! - Reads are total: missing, empty, corrupt or non-object files read as
//!   the default idle record. Mistyped fields are coerced one by one.
//! - Timestamps that cannot be parsed never force idle (fail open).
//! - Writes surface [`OfficeError::Persistence`](crate::OfficeError::Persistence).
//!   The auto-idle write-back is the exception: it is best-effort.
//!
//! # Module Structure
//!
//! - [`types`]: Record, update and state-name types
//! - [`timestamp`]: Zoned/naive `updated_at` parsing and age computation
//! - [`decay`]: The auto-idle rule
//! - [`store`]: File-backed [`StateStore`]

pub mod decay;
mod store;
pub mod timestamp;
pub mod types;


pub use store::StateStore;
pub use timestamp::RecordTimestamp;
pub use types::{ActivityState, InvalidState, StateRecord, StateUpdate};
