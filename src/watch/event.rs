// src/watch/event.rs

//! Raw filesystem events and their classification into `DriverEvent`s.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use bitflags::bitflags;
use notify::event::{EventKind, ModifyKind, RenameMode};

use crate::types::{DriverChange, DriverEvent};

bitflags! {
    /// Operations carried by a raw event. One event may carry several.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Op: u8 {
        const CREATE = 1 << 0;
        const REMOVE = 1 << 1;
        const WRITE = 1 << 2;
        const RENAME = 1 << 3;
        const CHMOD = 1 << 4;
    }
}

impl Op {
    /// Map a `notify` event kind onto operation flags.
    ///
    /// Access events and unknown kinds map to the empty set. The destination
    /// half of a move counts as a create, so a directory renamed into the
    /// root is reported. The paired `Both` event stays a rename; inotify
    /// sends it in addition to `To`, and treating it as a create would
    /// report the same move twice.
    pub fn from_kind(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => Op::CREATE,
            EventKind::Remove(_) => Op::REMOVE,
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Op::CREATE,
            EventKind::Modify(ModifyKind::Name(_)) => Op::RENAME,
            EventKind::Modify(ModifyKind::Metadata(_)) => Op::CHMOD,
            EventKind::Modify(_) => Op::WRITE,
            EventKind::Access(_) | EventKind::Any | EventKind::Other => Op::empty(),
        }
    }
}

/// A single operation on a single path, as seen by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub op: Op,
    pub path: PathBuf,
}

impl RawEvent {
    pub fn new(op: Op, path: impl Into<PathBuf>) -> Self {
        Self {
            op,
            path: path.into(),
        }
    }

    /// Synthetic "created" event, as injected by the bootstrap scan.
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(Op::CREATE, path)
    }

    pub fn removed(path: impl Into<PathBuf>) -> Self {
        Self::new(Op::REMOVE, path)
    }

    /// Split a `notify` event into one raw event per path.
    pub fn from_notify(event: notify::Event) -> Vec<RawEvent> {
        let op = Op::from_kind(&event.kind);
        event
            .paths
            .into_iter()
            .map(|path| RawEvent { op, path })
            .collect()
    }
}

/// Outcome of classifying a raw event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Dispatch(DriverEvent),
    /// Create/remove of a reserved directory name.
    Ignored(String),
    /// Neither a create nor a remove.
    Dropped,
}

/// Turn a raw event into the handler-facing event, if it qualifies.
///
/// Create wins over remove when an event carries both flags.
pub fn classify(event: &RawEvent, ignore_names: &BTreeSet<String>) -> Classified {
    let change = if event.op.contains(Op::CREATE) {
        DriverChange::Appeared
    } else if event.op.contains(Op::REMOVE) {
        DriverChange::Removed
    } else {
        return Classified::Dropped;
    };

    let Some(name) = driver_name(&event.path) else {
        return Classified::Dropped;
    };

    if ignore_names.contains(&name) {
        return Classified::Ignored(name);
    }

    Classified::Dispatch(DriverEvent::new(name, change))
}

/// Final path segment, lossily converted to UTF-8.
pub fn driver_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind};

    fn ignore() -> BTreeSet<String> {
        BTreeSet::from(["kubernetes.io".to_string()])
    }

    #[test]
    fn create_and_remove_are_dispatched() {
        let created = classify(&RawEvent::created("/plugins/csi-a"), &ignore());
        assert_eq!(
            created,
            Classified::Dispatch(DriverEvent::new("csi-a", DriverChange::Appeared))
        );

        let removed = classify(&RawEvent::removed("/plugins/csi-a"), &ignore());
        assert_eq!(
            removed,
            Classified::Dispatch(DriverEvent::new("csi-a", DriverChange::Removed))
        );
    }

    #[test]
    fn either_flag_qualifies() {
        let ev = RawEvent::new(Op::WRITE | Op::REMOVE, "/plugins/csi-b");
        assert_eq!(
            classify(&ev, &ignore()),
            Classified::Dispatch(DriverEvent::new("csi-b", DriverChange::Removed))
        );

        let ev = RawEvent::new(Op::CHMOD | Op::CREATE, "/plugins/csi-b");
        assert_eq!(
            classify(&ev, &ignore()),
            Classified::Dispatch(DriverEvent::new("csi-b", DriverChange::Appeared))
        );
    }

    #[test]
    fn ignore_name_is_never_dispatched() {
        for ev in [
            RawEvent::created("/plugins/kubernetes.io"),
            RawEvent::removed("/plugins/kubernetes.io"),
        ] {
            assert_eq!(
                classify(&ev, &ignore()),
                Classified::Ignored("kubernetes.io".to_string())
            );
        }
    }

    #[test]
    fn other_operations_are_dropped() {
        for op in [Op::WRITE, Op::RENAME, Op::CHMOD, Op::empty()] {
            let ev = RawEvent::new(op, "/plugins/csi-c");
            assert_eq!(classify(&ev, &ignore()), Classified::Dropped);
        }
    }

    #[test]
    fn path_without_file_name_is_dropped() {
        let ev = RawEvent::created("/");
        assert_eq!(classify(&ev, &ignore()), Classified::Dropped);
    }

    #[test]
    fn notify_kinds_map_to_flags() {
        assert_eq!(Op::from_kind(&EventKind::Create(CreateKind::Folder)), Op::CREATE);
        assert_eq!(Op::from_kind(&EventKind::Remove(RemoveKind::Folder)), Op::REMOVE);
        assert_eq!(
            Op::from_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::To))),
            Op::CREATE
        );
        for mode in [RenameMode::From, RenameMode::Both, RenameMode::Any] {
            assert_eq!(
                Op::from_kind(&EventKind::Modify(ModifyKind::Name(mode))),
                Op::RENAME
            );
        }
        assert_eq!(
            Op::from_kind(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any))),
            Op::CHMOD
        );
        assert_eq!(
            Op::from_kind(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            Op::WRITE
        );
        assert!(Op::from_kind(&EventKind::Any).is_empty());
    }

    #[test]
    fn notify_event_is_split_per_path() {
        let event = notify::Event::new(EventKind::Create(CreateKind::Folder))
            .add_path(PathBuf::from("/plugins/a"))
            .add_path(PathBuf::from("/plugins/b"));

        let raw = RawEvent::from_notify(event);
        assert_eq!(
            raw,
            vec![
                RawEvent::created("/plugins/a"),
                RawEvent::created("/plugins/b"),
            ]
        );
    }
}
