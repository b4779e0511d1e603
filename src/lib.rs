//! Birdlens Billing - payment order ledger and subscription grants.
//!
//! Issues PayOS and Stripe checkout links, reconciles gateway webhooks with
//! the order ledger, grants subscriptions, and rewards referrers when a
//! referred user publishes their first post.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
