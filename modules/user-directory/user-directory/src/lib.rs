//! User Directory Module
//!
//! Resolves caller-supplied identifiers (bearer tokens, canonical subjects,
//! usernames) into directory user records and updates the caller's own
//! metadata behind a scope-checked token.
//!
//! Provides [`UserDirectoryClient`](user_directory_sdk::UserDirectoryClient)
//! through [`module::UserDirectoryModule::build`], with Auth0 adapters for
//! the directory, the M2M credential and token verification.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;
pub mod module;
pub mod redaction;

pub use config::UserDirectoryConfig;
pub use module::UserDirectoryModule;
