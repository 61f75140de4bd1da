//! Video-conferencing provider: session handling and meeting management
//! over the provider's XML service.

pub mod client;
pub mod config;
pub mod xml;

pub use client::VideoClient;
pub use config::VideoConfig;
