/*!
Depot is a storage abstraction layer that exposes a uniform set of file operations (put, copy,
move, rename, delete, read, append, list, directory management) behind a single interface. The
local disk is the only backend wired to a real implementation; the registry names the remote
object storage providers so that callers can select them once they exist.

All paths handed to an operation are interpreted relative to the root folder the backend was
initialized with and may not escape it.

# Example

```no_run
use std::path::Path;

use depot::{Disk, LocalStorageOptions, Storage};

fn main() -> depot::DepotResult<()> {
    let mut storage = Storage::new();
    storage.init_local_storage(LocalStorageOptions::new("/tmp/depot-root"))?;

    let disk = storage.local_storage().unwrap();
    disk.create(Path::new("notes.md"), b"hello")?;
    let content = disk.read(Path::new("notes.md"))?;
    assert_eq!(content, b"hello");

    Ok(())
}
```
*/

#![warn(missing_debug_implementations, missing_docs)]

pub mod disk;
pub use disk::{Disk, FileInfo, LocalStorage, TmpStorage};

mod errors;
pub use errors::{DepotError, DepotResult};

pub mod options;
pub use options::LocalStorageOptions;

mod paths;

pub mod storage;
pub use storage::{Storage, StorageKind};
