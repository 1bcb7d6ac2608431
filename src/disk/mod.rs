mod traits;
pub use self::traits::{Disk, FileInfo};

mod local;
pub use self::local::{LocalStorage, TmpStorage};
