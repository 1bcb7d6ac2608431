/*!
This module contains error types specific to Depot as well as wrappers and `From` implementations
for common errors to enable error propagation.
*/

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result that wraps [`DepotError`].
pub type DepotResult<T> = Result<T, DepotError>;

/// Top-level storage errors.
#[derive(Debug)]
pub enum DepotError {
    /// Variant for a target path that does not exist.
    NotFound(PathBuf),

    /// Variant for a destination path that is already occupied.
    AlreadyExists(PathBuf),

    /// Variant for a target that exists but is not a regular file.
    NotAFile(PathBuf),

    /// Variant for a path that would resolve outside of the storage root.
    OutsideRoot(PathBuf),

    /// Variant aggregating per-item failures from bulk operations.
    Multiple(Vec<DepotError>),

    /// Variant for errors stemming from underlying I/O operations.
    IO(io::Error),
}

impl std::error::Error for DepotError {}

impl fmt::Display for DepotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepotError::NotFound(path) => {
                write!(f, "{path} does not exist", path = path.display())
            }
            DepotError::AlreadyExists(path) => {
                write!(f, "{path} already exists", path = path.display())
            }
            DepotError::NotAFile(path) => {
                write!(f, "{path} is not a regular file", path = path.display())
            }
            DepotError::OutsideRoot(path) => {
                write!(
                    f,
                    "{path} resolves outside of the storage root",
                    path = path.display()
                )
            }
            DepotError::Multiple(errors) => {
                write!(f, "{count} operations failed", count = errors.len())?;
                for error in errors {
                    write!(f, "; {error}")?;
                }
                Ok(())
            }
            DepotError::IO(base_err) => write!(f, "{}", base_err),
        }
    }
}

impl From<io::Error> for DepotError {
    fn from(err: io::Error) -> Self {
        DepotError::IO(err)
    }
}
