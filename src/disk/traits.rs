/*!
Storage backend traits to enable different implementations of storage providers to be used.

The primary purpose of this wrapper is to expose one uniform operation contract over a backing
store, whether that is the local disk or a remote object store.
*/

use core::fmt::Debug;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::errors::DepotResult;

/**
An interface for the uniform set of file operations supported by a storage backend.

Unless stated otherwise, path arguments are interpreted relative to the root folder the backend
was initialized with. Every operation is a synchronous, one-shot transaction against the backing
store; no state is retained between calls and any handles opened by an operation are closed
before it returns.
*/
pub trait Disk: Send + Sync {
    /// Return the name of the storage backend being used.
    fn get_name(&self) -> String;

    /// Get a descriptor for the file or directory at the provided path.
    fn file_info(&self, path: &Path) -> DepotResult<FileInfo>;

    /**
    Copy a file into the root folder from an external location.

    `source` is the full path to the external file. The stored file keeps the source file's name.
    */
    fn put(&self, source: &Path) -> DepotResult<()>;

    /// Same as [`Disk::put`] except the stored file is given the provided name.
    fn put_as(&self, source: &Path, name: &str) -> DepotResult<()>;

    /**
    Copy a file to the provided destination folder, keeping its name.

    Missing destination directories are created. The source file is untouched.
    */
    fn copy(&self, path: &Path, dest_folder: &Path) -> DepotResult<()>;

    /// Same as [`Disk::copy`] except the duplicate is given the provided name.
    fn copy_as(&self, path: &Path, dest_folder: &Path, new_name: &str) -> DepotResult<()>;

    /**
    Move a file to the provided destination folder, keeping its name.

    When the source and destination share a volume this is an atomic rename. Otherwise the file
    is copied and the source is removed afterwards; a failure between those two steps leaves both
    copies in place.
    */
    fn move_file(&self, path: &Path, dest_folder: &Path) -> DepotResult<()>;

    /// Same as [`Disk::move_file`] except the moved file is given the provided name.
    fn move_file_as(&self, path: &Path, dest_folder: &Path, new_name: &str) -> DepotResult<()>;

    /// Rename a regular file.
    fn rename(&self, from: &Path, to: &Path) -> DepotResult<()>;

    /// Remove a regular file.
    fn delete(&self, path: &Path) -> DepotResult<()>;

    /**
    Remove a batch of regular files.

    Entries that are missing or are not regular files are skipped and the rest of the batch is
    still processed. Failures removing individual entries are collected and reported together via
    [`DepotError::Multiple`](crate::DepotError::Multiple).
    */
    fn delete_multiple(&self, paths: &[PathBuf]) -> DepotResult<()>;

    /// Create a new file holding the provided content. Missing parent directories are created.
    fn create(&self, path: &Path, content: &[u8]) -> DepotResult<()>;

    /// Append the provided content to an existing file.
    fn append(&self, path: &Path, content: &[u8]) -> DepotResult<()>;

    /**
    Check if a path is present under the root folder.

    Absence is reported as `Ok(false)`, not as an error. Any stat failure other than "not found"
    (e.g. permission denied) surfaces as an error.
    */
    fn exists(&self, path: &Path) -> DepotResult<bool>;

    /// The inverse of [`Disk::exists`].
    fn missing(&self, path: &Path) -> DepotResult<bool>;

    /// Read the full contents of a file.
    fn read(&self, path: &Path) -> DepotResult<Vec<u8>>;

    /// Get descriptors for the immediate file children of a directory. Directories are excluded.
    fn files(&self, dir: &Path) -> DepotResult<Vec<FileInfo>>;

    /// Get descriptors for all file descendants of a directory, recursively.
    fn all_files(&self, dir: &Path) -> DepotResult<Vec<FileInfo>>;

    /// Get the paths of the immediate child directories of a directory.
    fn directories(&self, dir: &Path) -> DepotResult<Vec<PathBuf>>;

    /**
    Get the paths of all descendant directories of a directory, recursively.

    The queried directory itself is not included in the listing.
    */
    fn all_directories(&self, dir: &Path) -> DepotResult<Vec<PathBuf>>;

    /**
    Create a directory along with any missing parents.

    `mode` carries POSIX permission bits and is passed through to the operating system unmodified
    on Unix targets. It is ignored elsewhere.
    */
    fn make_directory(&self, dir: &Path, mode: u32) -> DepotResult<()>;

    /// Rename a directory.
    fn rename_directory(&self, from: &Path, to: &Path) -> DepotResult<()>;

    /// Remove a directory and everything under it.
    fn delete_directory(&self, dir: &Path) -> DepotResult<()>;
}

impl Debug for dyn Disk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

/**
A descriptor for one entry under the root folder.

Descriptors are produced on demand by the query operations and are never persisted; the values
reflect the state of the entry at the time of the call that created the descriptor.
*/
#[derive(Clone, Debug)]
pub struct FileInfo {
    /// The file name, including any extension.
    pub name: String,

    /// The file name with its extension removed.
    pub name_without_extension: String,

    /// The extension without its leading dot. Empty when the entry has no extension.
    pub extension: String,

    /// The size of the entry in bytes.
    pub size: u64,

    /// The last modification time reported by the platform.
    pub last_modified: SystemTime,

    /// The absolute path of the directory containing the entry.
    pub path: PathBuf,

    /// True when the entry is a directory.
    pub is_directory: bool,

    /// The platform file status backing this descriptor.
    pub metadata: Metadata,
}
