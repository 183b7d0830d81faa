pub mod gateway;
pub mod transport;

pub use gateway::{ProxyGateway, DEFAULT_PROXY_ENDPOINT};
pub use transport::{HttpTransport, Transport};
