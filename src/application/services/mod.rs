//! Application services

pub mod document;

pub use document::{DocumentService, InputFormat, LoadedDocument};
