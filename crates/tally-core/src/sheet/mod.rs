//! Sheet state and edit logic (UI-agnostic).

mod io;
mod ops;
mod render;
mod state;

pub use state::Sheet;
