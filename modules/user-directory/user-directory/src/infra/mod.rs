//! Infrastructure adapters.

pub mod auth0;
