//! Service layer providing business-oriented CRUD operations on top of models.
//! - Composes store queries from raw filter inputs.
//! - Translates store-level failures into the error taxonomy the HTTP layer
//!   maps to status codes.

pub mod errors;
pub mod pagination;
pub mod query;
#[cfg(test)]
mod test_support;
pub mod user_service;
