//! FILENAME: core/pivot-engine/src/lib.rs
//! Cross-tab (pivot) tables over a TagMatrix.
//!
//! This crate builds two-dimensional count tables as a standalone module,
//! separate from the counting engine. It depends on `engine` only through
//! the public matrix API (range and count queries).
//!
//! Layers:
//! - `definition`: Configuration (what the table IS)
//! - `view`: Renderable output (WHAT we display)
//! - `engine`: Calculation (HOW we calculate)

pub mod definition;
pub mod view;
pub mod engine;

pub use definition::*;
pub use view::*;
pub use self::engine::{generate_table, TableCalculator};
