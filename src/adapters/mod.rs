//! Adapters - Implementations of port interfaces.
//!
//! - `postgres` / `memory` - Storage ports
//! - `payos` / `stripe` - Payment gateways
//! - `auth` - Access token validation
//! - `email` - Outbound mail
//! - `background` - Bounded worker pool
//! - `http` - axum router

pub mod auth;
pub mod background;
pub mod email;
pub mod http;
pub mod memory;
pub mod payos;
pub mod postgres;
pub mod stripe;
