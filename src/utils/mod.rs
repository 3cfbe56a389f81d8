//! Auth primitives and request extractors shared by the API layer.

pub mod jwt;
pub mod password;
pub mod validate;

pub use validate::{ValidatedJson, ValidatedQuery};
