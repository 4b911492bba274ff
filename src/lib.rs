//! Charge/discharge curve viewer for Li-S battery cycling data.
//!
//! A cycler export is loaded into a [`data::model::RecordSet`], cleaned down
//! to the constant-current steps, grouped per cycle and drawn as overlaid
//! voltage–capacity curves. [`pipeline::render`] runs the whole chain;
//! [`pipeline::Session`] keeps the intermediate results for the UI.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod render;

pub use config::ViewerConfig;
pub use error::{ParseError, Result, SchemaError, ViewerError};
pub use pipeline::Session;
