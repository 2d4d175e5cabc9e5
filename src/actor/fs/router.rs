use rustc_hash::FxHashSet;

use super::filter::{is_ignored, is_update};
use crate::resource::{ResourceId, ResourceResolver};

/// Resolve a raw notify event to the resources it touches.
///
/// One event may carry several paths; each resource appears once, in the
/// order its first path was reported.
pub(super) fn resources_for_event(
    event: &notify::Event,
    resolver: &ResourceResolver,
) -> Vec<ResourceId> {
    if !is_update(&event.kind) {
        return Vec::new();
    }

    crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

    let mut seen = FxHashSet::default();
    let mut resources = Vec::new();
    for path in &event.paths {
        if is_ignored(path) {
            continue;
        }
        let Some(id) = resolver.resolve(path) else {
            crate::debug!("watch"; "no resource for {}", path.display());
            continue;
        };
        if seen.insert(id.clone()) {
            resources.push(id);
        }
    }
    resources
}
