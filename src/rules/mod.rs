//! Field rules: preprocessors, single-field validators and cross-field validators.

pub mod cross_field;
pub mod preprocess;
pub mod validate;

pub use cross_field::{CrossFieldKind, CrossFieldRule};
pub use preprocess::{CoerceTarget, Preprocessor, apply_chain};
pub use validate::Validator;
