pub use crate::errors::{ParamuxError, Result};

pub mod assemble;
pub mod cli;
pub mod document;
pub mod engine;
pub mod errors;
pub mod multiplex;
pub mod params;
pub mod pipeline;
pub mod presets;
pub mod requirements;
