//! Domain layer for the user directory.

pub mod directory;
pub mod disambiguation;
pub mod error;
pub mod local_client;
pub mod lookup;
pub mod ports;
pub mod service;

mod service_test;

pub use directory::{DirectoryUser, Identity, IdentityUserId, PASSWORD_CONNECTION};
pub use error::DomainError;
pub use local_client::UserDirectoryLocalClient;
pub use ports::{DirectoryGateway, GatewayError};
pub use service::{Service, ServiceConfig};
