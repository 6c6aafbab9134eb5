//! Variables module for mjau
//!
//! This module provides the variable store, the template interpolation
//! engine with its inline functions, and JSON path extraction.

pub mod functions;
pub mod json_path;
pub mod store;
pub mod substitution;

pub use functions::{call_inline_function, InlineFunction, VarError};
pub use json_path::extract;
pub use store::{
    Namespace, Variable, VariableStore, ENVIRONMENT_PREFIX, REQUEST_PREFIX, RESPONSE_PREFIX,
};
pub use substitution::{find_placeholders, interpolate};
