use std::path::Path;

use notify::EventKind;
use notify::event::ModifyKind;

/// Content updates only.
///
/// Creates, removes, renames and metadata-only changes (mtime/atime/chmod
/// noise) never restart anything.
pub(super) fn is_update(kind: &EventKind) -> bool {
    match kind {
        EventKind::Modify(modify) => {
            !matches!(modify, ModifyKind::Metadata(_) | ModifyKind::Name(_))
        }
        _ => false,
    }
}

/// Check if path is a hidden or backup file (editor artifacts).
pub(super) fn is_ignored(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.starts_with('.') || name.ends_with('~')
}
