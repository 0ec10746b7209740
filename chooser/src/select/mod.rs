//! Select widget - a headless dropdown select with reactive state.

pub mod events;
mod state;

pub use state::{Select, SelectId};
