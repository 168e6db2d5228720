pub mod client;
pub mod envelope;

pub use client::{BigCommerceClient, BigCommerceConfig};
