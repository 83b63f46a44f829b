//! Data models and configuration.

pub mod alert;
pub mod config;
pub mod invoice;
pub mod product;
