use std::path::Path;

use notify::EventKind;
use notify::event::ModifyKind;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Renamed,
}

impl ChangeKind {
    /// Map a notify event kind. Metadata, access and remove events carry
    /// no content change and map to `None`.
    pub(super) fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(Self::Created),
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Renamed),
            EventKind::Modify(ModifyKind::Metadata(_)) => None,
            EventKind::Modify(_) => Some(Self::Modified),
            _ => None,
        }
    }

    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Renamed => "renamed",
        }
    }
}

/// One observed change to a file directly inside the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ChangeEvent {
    pub(super) kind: ChangeKind,
    /// Name relative to the project root
    pub(super) file_name: String,
}

impl ChangeEvent {
    /// Split a notify event into per-file changes under `root`.
    ///
    /// Paths in subdirectories or outside `root` are dropped, as is the
    /// `ignore_self` file.
    pub(super) fn from_notify(
        event: &notify::Event,
        root: &Path,
        ignore_self: Option<&str>,
    ) -> Vec<Self> {
        let Some(kind) = ChangeKind::from_notify(&event.kind) else {
            return Vec::new();
        };

        event
            .paths
            .iter()
            .filter_map(|path| crate::utils::path::direct_child_name(root, path))
            .filter(|name| ignore_self != Some(name.as_str()))
            .map(|file_name| Self { kind, file_name })
            .collect()
    }
}
