//! PayOS payment gateway adapter.

mod payos_gateway;
mod types;

pub use payos_gateway::{sign_webhook_body, PayOsConfig, PayOsGateway};
