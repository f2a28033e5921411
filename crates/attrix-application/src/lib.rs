//! Application layer of the Attrix SDK: the `Tracker` service hosts
//! embed, plus the session context and sync engine it is built from.

pub mod session;
pub mod sync;
pub mod tracker;

pub use crate::session::SessionContext;
pub use crate::sync::SyncEngine;
pub use crate::tracker::{Tracker, TrackerRepositories};
