use std::fs;
use std::path::{Path, PathBuf};

use super::ResourceId;

/// Maps a changed path to the resource that owns it.
///
/// Walks up from the changed path until a directory holding a manifest file
/// is found. The walk never goes above `root`: the watched root itself is
/// infrastructure, not a resource.
///
/// Holds no mutable state, so any number of resolutions may run side by side.
#[derive(Debug, Clone)]
pub struct ResourceResolver {
    root: PathBuf,
    manifests: Vec<String>,
}

impl ResourceResolver {
    pub fn new<I, S>(root: impl Into<PathBuf>, manifests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            manifests: manifests.into_iter().map(Into::into).collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `changed` to its owning resource.
    ///
    /// Returns `None` for the root itself, for paths outside the root, for
    /// paths with no resource ancestor, and for paths that vanished before
    /// they could be inspected.
    pub fn resolve(&self, changed: &Path) -> Option<ResourceId> {
        if changed == self.root {
            return None;
        }
        if !changed.starts_with(&self.root) {
            crate::debug!("resolve"; "outside watched tree: {}", changed.display());
            return None;
        }

        let metadata = match fs::metadata(changed) {
            Ok(metadata) => metadata,
            Err(e) => {
                crate::debug!("resolve"; "skip {}: {}", changed.display(), e);
                return None;
            }
        };

        // Files never carry a manifest of their own
        let mut current = if metadata.is_dir() {
            changed
        } else {
            changed.parent()?
        };

        loop {
            if current == self.root || !current.starts_with(&self.root) {
                return None;
            }
            if self.is_resource_root(current) {
                return ResourceId::from_dir(current);
            }
            current = current.parent()?;
        }
    }

    /// A directory is a resource root when a manifest sits directly inside it.
    pub fn is_resource_root(&self, dir: &Path) -> bool {
        self.manifests.iter().any(|name| dir.join(name).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::DEFAULT_MANIFESTS;
    use crate::utils::path::normalize_path;
    use tempfile::TempDir;

    fn make_tree() -> (TempDir, ResourceResolver) {
        let temp = TempDir::new().unwrap();
        let root = normalize_path(temp.path()).join("res");
        fs::create_dir_all(&root).unwrap();
        let resolver = ResourceResolver::new(&root, DEFAULT_MANIFESTS.iter().copied());
        (temp, resolver)
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_file_in_nested_dir_resolves_to_resource() {
        let (_tmp, resolver) = make_tree();
        let root = resolver.root().to_path_buf();
        touch(&root.join("myscript/__resource.lua"));
        let changed = root.join("myscript/client/main.lua");
        touch(&changed);

        assert_eq!(resolver.resolve(&changed), Some(ResourceId::from("myscript")));
    }

    #[test]
    fn test_deeply_nested_path_resolves() {
        let (_tmp, resolver) = make_tree();
        let root = resolver.root().to_path_buf();
        touch(&root.join("hud/fxmanifest.lua"));
        let deep = root.join("hud/html/assets/img/icons/small/a.png");
        touch(&deep);

        assert_eq!(resolver.resolve(&deep), Some(ResourceId::from("hud")));
        // Intermediate directories resolve the same way
        assert_eq!(
            resolver.resolve(&root.join("hud/html/assets")),
            Some(ResourceId::from("hud"))
        );
    }

    #[test]
    fn test_root_is_never_a_resource() {
        let (_tmp, resolver) = make_tree();
        let root = resolver.root().to_path_buf();
        // Even a manifest directly in root does not make root a resource
        touch(&root.join("fxmanifest.lua"));

        assert_eq!(resolver.resolve(&root), None);
        assert_eq!(resolver.resolve(&root.join("fxmanifest.lua")), None);
    }

    #[test]
    fn test_loose_file_under_root_has_no_resource() {
        let (_tmp, resolver) = make_tree();
        let readme = resolver.root().join("readme.txt");
        touch(&readme);

        assert_eq!(resolver.resolve(&readme), None);
    }

    #[test]
    fn test_category_folder_without_manifest_is_skipped() {
        let (_tmp, resolver) = make_tree();
        let root = resolver.root().to_path_buf();
        touch(&root.join("[gameplay]/chat/fxmanifest.lua"));
        let changed = root.join("[gameplay]/chat/server.lua");
        touch(&changed);

        assert_eq!(resolver.resolve(&changed), Some(ResourceId::from("chat")));

        let stray = root.join("[gameplay]/notes.md");
        touch(&stray);
        assert_eq!(resolver.resolve(&stray), None);
    }

    #[test]
    fn test_nearest_resource_wins() {
        let (_tmp, resolver) = make_tree();
        let root = resolver.root().to_path_buf();
        touch(&root.join("outer/fxmanifest.lua"));
        touch(&root.join("outer/inner/fxmanifest.lua"));
        let changed = root.join("outer/inner/client.lua");
        touch(&changed);

        assert_eq!(resolver.resolve(&changed), Some(ResourceId::from("inner")));
    }

    #[test]
    fn test_resource_dir_itself_resolves() {
        let (_tmp, resolver) = make_tree();
        let root = resolver.root().to_path_buf();
        touch(&root.join("spawn/__resource.lua"));

        assert_eq!(
            resolver.resolve(&root.join("spawn")),
            Some(ResourceId::from("spawn"))
        );
    }

    #[test]
    fn test_deleted_path_yields_none() {
        let (_tmp, resolver) = make_tree();
        let root = resolver.root().to_path_buf();
        touch(&root.join("myscript/__resource.lua"));
        let gone = root.join("myscript/removed.lua");

        assert_eq!(resolver.resolve(&gone), None);
    }

    #[test]
    fn test_path_outside_root_yields_none() {
        let (tmp, resolver) = make_tree();
        let outside = normalize_path(tmp.path()).join("elsewhere/fxmanifest.lua");
        touch(&outside);

        assert_eq!(resolver.resolve(&outside), None);
    }

    #[test]
    fn test_custom_manifest_names() {
        let temp = TempDir::new().unwrap();
        let root = normalize_path(temp.path());
        touch(&root.join("mod/resource.toml"));
        touch(&root.join("mod/src/lib.lua"));

        let resolver = ResourceResolver::new(&root, ["resource.toml"]);
        assert_eq!(
            resolver.resolve(&root.join("mod/src/lib.lua")),
            Some(ResourceId::from("mod"))
        );
    }
}
