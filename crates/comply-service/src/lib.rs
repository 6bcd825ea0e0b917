//! # comply-service
//!
//! Application layer orchestrating the two pipelines: label compliance
//! checking (upload, vision extraction, rule scoring) and regulatory source
//! monitoring (scrape, diff analysis, suggestion review). Services own all
//! business rules; repositories and provider clients are injected through
//! [`ServiceContext`].

pub mod dto;
pub mod services;

pub use services::{ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult};
