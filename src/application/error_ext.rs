//! Error conversion helpers for I/O at the application boundary
//!
//! Failures keep the underlying `io::Error` as source, so the CLI can tell a
//! missing input apart from other I/O problems.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Attach the action and the path to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.write(&path, &json)
    ///     .with_path_context("write export", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| path_error(action, path, e))
    }
}

/// Error for an input path that is absent or not a regular file.
pub fn missing_input(path: &Path) -> ApplicationError {
    path_error(
        "open input",
        path,
        io::Error::new(io::ErrorKind::NotFound, "no such file"),
    )
}

fn path_error(action: &str, path: &Path, source: io::Error) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: format!("{}: {}", action, path.display()),
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_missing_input_then_source_is_not_found() {
        let err = missing_input(Path::new("page.html"));

        let ApplicationError::OperationFailed { context, source } = err else {
            panic!("expected OperationFailed");
        };
        assert_eq!(context, "open input: page.html");
        let io_err = source.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }
}
