/*!
This module contains utilities for resolving caller-supplied paths against the storage root.

Every operation on a storage backend takes paths that are interpreted relative to the root folder
provided at initialization. Resolution is purely lexical: `.` components are dropped and `..`
components pop previously accepted components. A path that would climb past the root is rejected
rather than being allowed to escape it.
*/

use std::path::{Component, Path, PathBuf};

use crate::errors::{DepotError, DepotResult};

/// Resolves caller-supplied paths to absolute paths anchored at the storage root.
#[derive(Clone, Debug)]
pub(crate) struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Create a new instance of the [`PathResolver`] anchored at `root`.
    pub fn new(root: PathBuf) -> Self {
        PathResolver { root }
    }

    /// Get the root path that all resolutions are anchored at.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /**
    Resolve a caller-supplied path to an absolute path under the root.

    Prefixes that match the root path will be stripped so that callers may pass back paths
    previously returned by the listing operations. A leading path separator on any other path is
    treated as an anchor at the storage root itself. Any `..` sequence that would climb past the
    root fails with [`DepotError::OutsideRoot`].
    */
    pub fn resolve(&self, path: &Path) -> DepotResult<PathBuf> {
        let relative = match path.strip_prefix(&self.root) {
            Ok(stripped) => stripped,
            Err(_) => path,
        };

        let mut resolved = self.root.clone();
        let mut depth: usize = 0;
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::ParentDir => {
                    if depth == 0 {
                        return Err(DepotError::OutsideRoot(path.to_path_buf()));
                    }
                    resolved.pop();
                    depth -= 1;
                }
                // A bare leading separator anchors at the storage root
                Component::RootDir | Component::CurDir => {}
                Component::Prefix(_) => {
                    return Err(DepotError::OutsideRoot(path.to_path_buf()));
                }
            }
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod path_resolver_tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn resolver() -> PathResolver {
        PathResolver::new(PathBuf::from("/tmp/depot-root"))
    }

    #[test]
    fn plain_relative_paths_are_joined_to_the_root() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve(Path::new("notes.md")).unwrap(),
            PathBuf::from("/tmp/depot-root/notes.md")
        );
        assert_eq!(
            resolver.resolve(Path::new("a/b/c.txt")).unwrap(),
            PathBuf::from("/tmp/depot-root/a/b/c.txt")
        );
    }

    #[test]
    fn current_dir_components_are_dropped() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve(Path::new("./a/./b")).unwrap(),
            PathBuf::from("/tmp/depot-root/a/b")
        );
    }

    #[test]
    fn parent_components_pop_within_the_root() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve(Path::new("a/b/../c")).unwrap(),
            PathBuf::from("/tmp/depot-root/a/c")
        );
    }

    #[test]
    fn climbing_past_the_root_is_rejected() {
        let resolver = resolver();

        assert!(matches!(
            resolver.resolve(Path::new("../escape")),
            Err(DepotError::OutsideRoot(_))
        ));
        assert!(matches!(
            resolver.resolve(Path::new("a/../../escape")),
            Err(DepotError::OutsideRoot(_))
        ));
    }

    #[test]
    fn a_leading_separator_anchors_at_the_root() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve(Path::new("/")).unwrap(),
            PathBuf::from("/tmp/depot-root")
        );
        assert_eq!(
            resolver.resolve(Path::new("/docs/readme.md")).unwrap(),
            PathBuf::from("/tmp/depot-root/docs/readme.md")
        );
    }

    #[test]
    fn paths_already_under_the_root_are_rerooted() {
        let resolver = resolver();

        assert_eq!(
            resolver
                .resolve(Path::new("/tmp/depot-root/docs/readme.md"))
                .unwrap(),
            PathBuf::from("/tmp/depot-root/docs/readme.md")
        );
    }

    #[test]
    fn the_empty_path_resolves_to_the_root() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve(Path::new("")).unwrap(),
            PathBuf::from("/tmp/depot-root")
        );
    }
}
