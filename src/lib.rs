//! Spam Sift: SMS spam classification service.

pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod pipeline;
pub mod samples;
pub mod text;
