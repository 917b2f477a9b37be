// Adapters layer: concrete completion backends for the assistant session.

pub mod proxy_client;

pub use proxy_client::{InProcessProxy, ProxyClient};
