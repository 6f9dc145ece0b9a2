//! Application layer: export, exploration and document services
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod explorer;
pub mod export;
pub mod report;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use explorer::{Command, Explorer, Flow, NavigationError, UnknownCommand};
pub use export::{export, import, write_export, ExportedNode};
pub use report::{render_report, write_report};
