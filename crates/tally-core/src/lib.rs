//! tally-core - UI-agnostic sheet model, propagation and storage.

pub mod error;
pub mod sheet;
pub mod storage;

pub use error::{Result, TallyError};
pub use sheet::Sheet;

pub use tally_engine::engine::{Cell, CellId, CellKind};
