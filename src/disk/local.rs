/*!
This module contains the storage backends that are served by the local disk.
*/

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::errors::{DepotError, DepotResult};
use crate::options::LocalStorageOptions;
use crate::paths::PathResolver;

use super::traits::{Disk, FileInfo};

/// The size of the buffer used when copying file contents.
const COPY_CHUNK_SIZE: usize = 8 * 1024;

/**
Storage backend that keeps files in a folder on the local disk.

All operations are direct, blocking filesystem calls. The backend holds no state other than the
immutable root folder, so concurrent callers race at the filesystem level exactly as raw OS calls
would.
*/
#[derive(Clone, Debug)]
pub struct LocalStorage {
    resolver: PathResolver,
}

/// Public methods.
impl LocalStorage {
    /**
    Create an instance of [`LocalStorage`] rooted per the provided options.

    The root folder is created if it does not exist yet and is canonicalized to an absolute path,
    so a root that is relative to the process working directory stays stable even if the process
    later changes directory.
    */
    pub fn new(options: LocalStorageOptions) -> DepotResult<Self> {
        fs::create_dir_all(options.root_folder())?;
        let root = options.root_folder().canonicalize()?;
        log::info!(
            "Initializing local storage rooted at {root}",
            root = root.display()
        );

        Ok(LocalStorage {
            resolver: PathResolver::new(root),
        })
    }

    /// Get the root folder that this backend operates under.
    pub fn root_path(&self) -> &Path {
        self.resolver.root()
    }
}

/// Private methods.
impl LocalStorage {
    /// Stat a path, mapping the "not found" case to [`DepotError::NotFound`].
    fn stat(&self, full_path: &Path) -> DepotResult<fs::Metadata> {
        match fs::metadata(full_path) {
            Ok(metadata) => Ok(metadata),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(DepotError::NotFound(full_path.to_path_buf()))
            }
            Err(err) => Err(DepotError::IO(err)),
        }
    }

    /// Stat a path and require that it is a regular file.
    fn stat_regular_file(&self, full_path: &Path) -> DepotResult<fs::Metadata> {
        let metadata = self.stat(full_path)?;
        if !metadata.is_file() {
            return Err(DepotError::NotAFile(full_path.to_path_buf()));
        }

        Ok(metadata)
    }

    /// Fail with [`DepotError::AlreadyExists`] if anything is present at the path.
    fn require_vacant(&self, full_path: &Path) -> DepotResult<()> {
        match fs::symlink_metadata(full_path) {
            Ok(_) => Err(DepotError::AlreadyExists(full_path.to_path_buf())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(DepotError::IO(err)),
        }
    }

    /**
    Copy the contents of `source` to a newly created file at `dest` in fixed-size chunks.

    The first read or write error is propagated immediately. A partially written destination is
    left in place on error.
    */
    fn copy_contents(&self, source: &Path, dest: &Path) -> DepotResult<()> {
        let mut reader = File::open(source)?;
        let mut writer = OpenOptions::new().write(true).create_new(true).open(dest)?;

        let mut buf = [0u8; COPY_CHUNK_SIZE];
        loop {
            let bytes_read = reader.read(&mut buf)?;
            if bytes_read == 0 {
                break;
            }
            writer.write_all(&buf[..bytes_read])?;
        }

        Ok(())
    }

    /**
    Resolve the source file and destination path for a transfer within the root folder.

    The destination folder is created if it is missing. Errors from that creation propagate
    rather than being deferred to the transfer itself.
    */
    fn prepare_transfer(
        &self,
        path: &Path,
        dest_folder: &Path,
        new_name: Option<&str>,
    ) -> DepotResult<(PathBuf, PathBuf)> {
        let source = self.resolver.resolve(path)?;
        self.stat_regular_file(&source)?;

        let dest_dir = self.resolver.resolve(dest_folder)?;
        fs::create_dir_all(&dest_dir)?;

        let dest = match new_name {
            Some(name) => self.resolver.resolve(&dest_dir.join(name))?,
            None => {
                let name = source
                    .file_name()
                    .ok_or_else(|| DepotError::NotAFile(source.clone()))?;
                dest_dir.join(name)
            }
        };
        self.require_vacant(&dest)?;

        Ok((source, dest))
    }

    /**
    Move the file at `source` to `dest`.

    A plain rename is attempted first. When the rename fails because the paths live on different
    volumes, the contents are copied and the source is removed afterwards.
    */
    fn relocate(&self, source: &Path, dest: &Path) -> DepotResult<()> {
        match fs::rename(source, dest) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
                log::debug!(
                    "Moving {source} to {dest} crosses devices. Falling back to copy and delete.",
                    source = source.display(),
                    dest = dest.display()
                );
                self.copy_contents(source, dest)?;
                Ok(fs::remove_file(source)?)
            }
            Err(err) => Err(DepotError::IO(err)),
        }
    }

    /// List the contents of a directory in sorted order.
    fn sorted_entries(&self, dir_path: &Path) -> DepotResult<Vec<PathBuf>> {
        let mut entries = fs::read_dir(dir_path)?
            .map(|maybe_entry| maybe_entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, io::Error>>()?;
        entries.sort();

        Ok(entries)
    }

    /// Build a [`FileInfo`] descriptor from a full path and the metadata read for it.
    fn describe(&self, full_path: &Path, metadata: fs::Metadata) -> DepotResult<FileInfo> {
        let name = full_path
            .file_name()
            .map(|part| part.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name_without_extension = full_path
            .file_stem()
            .map(|part| part.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = full_path
            .extension()
            .map(|part| part.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size = metadata.len();
        let last_modified = metadata.modified()?;
        let is_directory = metadata.is_dir();
        let path = full_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(FileInfo {
            name,
            name_without_extension,
            extension,
            size,
            last_modified,
            path,
            is_directory,
            metadata,
        })
    }

    /// Recursively collect descriptors for every file under `dir_path`.
    fn walk_files(&self, dir_path: &Path, files: &mut Vec<FileInfo>) -> DepotResult<()> {
        for entry_path in self.sorted_entries(dir_path)? {
            let metadata = fs::metadata(&entry_path)?;
            if metadata.is_dir() {
                self.walk_files(&entry_path, files)?;
            } else {
                files.push(self.describe(&entry_path, metadata)?);
            }
        }

        Ok(())
    }

    /// Recursively collect the paths of every directory under `dir_path`.
    fn walk_directories(
        &self,
        dir_path: &Path,
        directories: &mut Vec<PathBuf>,
    ) -> DepotResult<()> {
        for entry_path in self.sorted_entries(dir_path)? {
            if fs::metadata(&entry_path)?.is_dir() {
                directories.push(entry_path.clone());
                self.walk_directories(&entry_path, directories)?;
            }
        }

        Ok(())
    }
}

impl Disk for LocalStorage {
    fn get_name(&self) -> String {
        "LocalStorage".to_string()
    }

    fn file_info(&self, path: &Path) -> DepotResult<FileInfo> {
        let full_path = self.resolver.resolve(path)?;
        let metadata = self.stat(&full_path)?;

        self.describe(&full_path, metadata)
    }

    fn put(&self, source: &Path) -> DepotResult<()> {
        self.stat_regular_file(source)?;
        let name = source
            .file_name()
            .ok_or_else(|| DepotError::NotAFile(source.to_path_buf()))?;

        let dest = self.resolver.root().join(name);
        self.require_vacant(&dest)?;

        self.copy_contents(source, &dest)
    }

    fn put_as(&self, source: &Path, name: &str) -> DepotResult<()> {
        self.stat_regular_file(source)?;

        let dest = self.resolver.resolve(Path::new(name))?;
        self.require_vacant(&dest)?;

        self.copy_contents(source, &dest)
    }

    fn copy(&self, path: &Path, dest_folder: &Path) -> DepotResult<()> {
        let (source, dest) = self.prepare_transfer(path, dest_folder, None)?;

        self.copy_contents(&source, &dest)
    }

    fn copy_as(&self, path: &Path, dest_folder: &Path, new_name: &str) -> DepotResult<()> {
        let (source, dest) = self.prepare_transfer(path, dest_folder, Some(new_name))?;

        self.copy_contents(&source, &dest)
    }

    fn move_file(&self, path: &Path, dest_folder: &Path) -> DepotResult<()> {
        let (source, dest) = self.prepare_transfer(path, dest_folder, None)?;

        self.relocate(&source, &dest)
    }

    fn move_file_as(&self, path: &Path, dest_folder: &Path, new_name: &str) -> DepotResult<()> {
        let (source, dest) = self.prepare_transfer(path, dest_folder, Some(new_name))?;

        self.relocate(&source, &dest)
    }

    fn rename(&self, from: &Path, to: &Path) -> DepotResult<()> {
        let source = self.resolver.resolve(from)?;
        self.stat_regular_file(&source)?;
        let dest = self.resolver.resolve(to)?;

        Ok(fs::rename(&source, &dest)?)
    }

    fn delete(&self, path: &Path) -> DepotResult<()> {
        let full_path = self.resolver.resolve(path)?;
        self.stat_regular_file(&full_path)?;

        Ok(fs::remove_file(&full_path)?)
    }

    fn delete_multiple(&self, paths: &[PathBuf]) -> DepotResult<()> {
        let mut failures = vec![];
        for path in paths {
            let full_path = match self.resolver.resolve(path) {
                Ok(resolved) => resolved,
                Err(err) => {
                    failures.push(err);
                    continue;
                }
            };

            match self.stat_regular_file(&full_path) {
                Ok(_) => {}
                Err(DepotError::NotFound(_)) | Err(DepotError::NotAFile(_)) => {
                    log::debug!(
                        "Skipping {path} during a bulk delete because it is missing or is not a \
                        regular file.",
                        path = full_path.display()
                    );
                    continue;
                }
                Err(err) => {
                    failures.push(err);
                    continue;
                }
            }

            if let Err(err) = fs::remove_file(&full_path) {
                failures.push(DepotError::IO(err));
            }
        }

        if failures.is_empty() {
            return Ok(());
        }

        Err(DepotError::Multiple(failures))
    }

    fn create(&self, path: &Path, content: &[u8]) -> DepotResult<()> {
        let full_path = self.resolver.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.require_vacant(&full_path)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)?;
        file.write_all(content)?;

        Ok(())
    }

    fn append(&self, path: &Path, content: &[u8]) -> DepotResult<()> {
        let full_path = self.resolver.resolve(path)?;
        self.stat_regular_file(&full_path)?;

        let mut file = OpenOptions::new().append(true).open(&full_path)?;
        file.write_all(content)?;

        Ok(())
    }

    fn exists(&self, path: &Path) -> DepotResult<bool> {
        let full_path = self.resolver.resolve(path)?;
        match fs::metadata(&full_path) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(DepotError::IO(err)),
        }
    }

    fn missing(&self, path: &Path) -> DepotResult<bool> {
        self.exists(path).map(|found| !found)
    }

    fn read(&self, path: &Path) -> DepotResult<Vec<u8>> {
        let full_path = self.resolver.resolve(path)?;
        self.stat(&full_path)?;

        Ok(fs::read(&full_path)?)
    }

    fn files(&self, dir: &Path) -> DepotResult<Vec<FileInfo>> {
        let dir_path = self.resolver.resolve(dir)?;
        self.stat(&dir_path)?;

        let mut files = vec![];
        for entry_path in self.sorted_entries(&dir_path)? {
            let metadata = fs::metadata(&entry_path)?;
            if !metadata.is_dir() {
                files.push(self.describe(&entry_path, metadata)?);
            }
        }

        Ok(files)
    }

    fn all_files(&self, dir: &Path) -> DepotResult<Vec<FileInfo>> {
        let dir_path = self.resolver.resolve(dir)?;
        self.stat(&dir_path)?;

        let mut files = vec![];
        self.walk_files(&dir_path, &mut files)?;

        Ok(files)
    }

    fn directories(&self, dir: &Path) -> DepotResult<Vec<PathBuf>> {
        let dir_path = self.resolver.resolve(dir)?;
        self.stat(&dir_path)?;

        let mut directories = vec![];
        for entry_path in self.sorted_entries(&dir_path)? {
            if fs::metadata(&entry_path)?.is_dir() {
                directories.push(entry_path);
            }
        }

        Ok(directories)
    }

    fn all_directories(&self, dir: &Path) -> DepotResult<Vec<PathBuf>> {
        let dir_path = self.resolver.resolve(dir)?;
        self.stat(&dir_path)?;

        let mut directories = vec![];
        self.walk_directories(&dir_path, &mut directories)?;

        Ok(directories)
    }

    #[cfg(target_family = "unix")]
    fn make_directory(&self, dir: &Path, mode: u32) -> DepotResult<()> {
        use std::os::unix::fs::DirBuilderExt;

        let dir_path = self.resolver.resolve(dir)?;
        fs::DirBuilder::new()
            .recursive(true)
            .mode(mode)
            .create(&dir_path)?;

        Ok(())
    }

    #[cfg(not(target_family = "unix"))]
    fn make_directory(&self, dir: &Path, _mode: u32) -> DepotResult<()> {
        let dir_path = self.resolver.resolve(dir)?;
        fs::DirBuilder::new().recursive(true).create(&dir_path)?;

        Ok(())
    }

    fn rename_directory(&self, from: &Path, to: &Path) -> DepotResult<()> {
        let source = self.resolver.resolve(from)?;
        let dest = self.resolver.resolve(to)?;

        Ok(fs::rename(&source, &dest)?)
    }

    fn delete_directory(&self, dir: &Path) -> DepotResult<()> {
        let dir_path = self.resolver.resolve(dir)?;

        Ok(fs::remove_dir_all(&dir_path)?)
    }
}

/**
A [`LocalStorage`] rooted in a temporary directory.

Only the root directory is backed by the `tempfile` crate to take advantage of the auto-cleanup
mechanism; every operation is served by the wrapped [`LocalStorage`]. The whole tree is removed
when the instance is dropped.
*/
#[derive(Debug)]
pub struct TmpStorage {
    root_dir: TempDir,
    storage: LocalStorage,
}

/// Public methods.
impl TmpStorage {
    /// Create a new instance of [`TmpStorage`], optionally inside the provided parent directory.
    pub fn new(parent: Option<&Path>) -> DepotResult<Self> {
        let root_dir = match parent {
            Some(path) => TempDir::new_in(path)?,
            None => TempDir::new()?,
        };
        let storage = LocalStorage::new(LocalStorageOptions::new(root_dir.path()))?;

        Ok(TmpStorage { root_dir, storage })
    }

    /// Get the root path of this temporary storage.
    pub fn root_path(&self) -> PathBuf {
        self.root_dir.path().to_owned()
    }

    /// Get the disk serving operations out of the temporary root.
    pub fn disk(&self) -> &LocalStorage {
        &self.storage
    }
}
