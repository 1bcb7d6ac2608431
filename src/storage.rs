/*!
This module contains the registry that composes configured storage backends behind the uniform
[`Disk`] contract.

Only the local disk backend is wired to a real implementation. The remote object storage kinds
are named by [`StorageKind`] so that callers can select them once they exist, but no initializer
is provided for them yet.
*/

use std::sync::Arc;

use crate::disk::{Disk, LocalStorage};
use crate::errors::DepotResult;
use crate::options::LocalStorageOptions;

/// The kinds of storage backends that the registry can name.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StorageKind {
    /// The local disk backend.
    Local,

    /// Amazon S3. Named by the registry but not implemented.
    S3,

    /// Google Cloud Storage. Named by the registry but not implemented.
    GoogleCloudStorage,

    /// Alibaba Object Storage Service. Named by the registry but not implemented.
    Oss,
}

/**
A registry of configured storage backends.

A registry starts empty and backends are wired in by the per-backend initializer methods. The
registry is an explicit value held by the caller; no process-wide instance exists.
*/
#[derive(Debug, Default)]
pub struct Storage {
    local_storage: Option<Arc<dyn Disk>>,
}

/// Public methods.
impl Storage {
    /// Create an empty registry with no backends configured.
    pub fn new() -> Self {
        Storage {
            local_storage: None,
        }
    }

    /// Initialize the local disk backend with the provided options.
    pub fn init_local_storage(&mut self, options: LocalStorageOptions) -> DepotResult<()> {
        let disk = LocalStorage::new(options)?;
        self.local_storage = Some(Arc::new(disk));

        Ok(())
    }

    /// Get the local disk backend if it has been initialized.
    pub fn local_storage(&self) -> Option<Arc<dyn Disk>> {
        self.local_storage.clone()
    }

    /// Get the backend registered under the provided kind, if any.
    pub fn disk(&self, kind: StorageKind) -> Option<Arc<dyn Disk>> {
        match kind {
            StorageKind::Local => self.local_storage.clone(),
            StorageKind::S3 | StorageKind::GoogleCloudStorage | StorageKind::Oss => None,
        }
    }
}
