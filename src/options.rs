/*!
This module holds the option structures that can be passed when initializing storage backends.
*/

use std::env;
use std::path::{Path, PathBuf};

/**
Holds options to control the behavior of the local storage backend.

The root folder may be provided as an absolute path or as a path relative to the process working
directory. It is canonicalized to an absolute path when the backend is constructed.
*/
#[derive(Clone, Debug)]
pub struct LocalStorageOptions {
    /**
    The path of the directory that all managed files live under.

    **This defaults to the current working directory.**
    */
    root_folder: PathBuf,
}

/// Public methods
impl LocalStorageOptions {
    /// Create options rooted at the provided folder.
    pub fn new<P: Into<PathBuf>>(root_folder: P) -> Self {
        LocalStorageOptions {
            root_folder: root_folder.into(),
        }
    }

    /// Get the root folder.
    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }
}

impl Default for LocalStorageOptions {
    fn default() -> Self {
        LocalStorageOptions {
            root_folder: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}
