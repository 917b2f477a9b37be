// Server side of the AI uplink: the only component that ever holds the API key.

pub mod credentials;
pub mod handler;
pub mod upstream;

pub use credentials::{EnvCredentials, StaticCredentials};
pub use handler::{ProxyEvent, ProxyHandler, ProxyResponse};
