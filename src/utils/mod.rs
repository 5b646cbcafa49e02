//! Small helpers shared across message builders

pub mod markdown;
pub mod mime;
