use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use proptest::prelude::*;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use driverwatch::fs::mock::MockFileSystem;
use driverwatch::types::DriverChange;
use driverwatch::watch::bootstrap::scan_existing;
use driverwatch::watch::dispatch::Dispatcher;
use driverwatch::watch::{classify, event_channels, Classified, EventLoop, Op, RawEvent, SharedHandler};
use driverwatch_test_utils::RecordingHandler;

const ROOT: &str = "/var/lib/kubelet/plugins";
const IGNORE: &str = "kubernetes.io";

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9-]{0,12}",
        Just(IGNORE.to_string()),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    (0u8..32).prop_map(Op::from_bits_truncate)
}

fn ignore_set() -> BTreeSet<String> {
    BTreeSet::from([IGNORE.to_string()])
}

proptest! {
    // Only create/remove of a non-reserved name ever reaches the handler.
    #[test]
    fn classification_respects_flags_and_ignore(name in name_strategy(), op in op_strategy()) {
        let event = RawEvent::new(op, Path::new(ROOT).join(&name));
        let qualifies = op.intersects(Op::CREATE | Op::REMOVE);

        match classify(&event, &ignore_set()) {
            Classified::Dispatch(driver) => {
                prop_assert!(qualifies);
                prop_assert_ne!(driver.name(), IGNORE);
                prop_assert_eq!(driver.name(), name.as_str());
                let expected = if op.contains(Op::CREATE) {
                    DriverChange::Appeared
                } else {
                    DriverChange::Removed
                };
                prop_assert_eq!(driver.change(), expected);
            }
            Classified::Ignored(ignored) => {
                prop_assert!(qualifies);
                prop_assert_eq!(ignored, IGNORE);
            }
            Classified::Dropped => prop_assert!(!qualifies),
        }
    }

    // Every pre-existing, non-reserved directory is reported exactly once.
    #[test]
    fn bootstrap_reports_each_directory_once(
        dirs in proptest::collection::btree_set(name_strategy(), 0..20),
        files in proptest::collection::btree_set("[a-z]{1,8}\\.sock", 0..5),
    ) {
        let fs = MockFileSystem::new();
        fs.add_dir(ROOT);
        for dir in &dirs {
            fs.add_dir(Path::new(ROOT).join(dir));
        }
        for file in &files {
            fs.add_file(Path::new(ROOT).join(file));
        }

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let handler = RecordingHandler::new();
        let recorded = handler.clone();
        rt.block_on(async move {
            let (sinks, sources) = event_channels();
            let tracker = TaskTracker::new();
            let event_loop = EventLoop::new(
                sources,
                CancellationToken::new(),
                Dispatcher::new(SharedHandler::new(handler), tracker.clone()),
                Arc::new(ignore_set()),
            );
            tracker.spawn(event_loop.run());

            scan_existing(&fs, Path::new(ROOT), &ignore_set(), &sinks).unwrap();
            drop(sinks);

            tracker.close();
            tracker.wait().await;
        });

        let expected: Vec<String> = dirs
            .iter()
            .filter(|d| d.as_str() != IGNORE)
            .cloned()
            .collect();
        prop_assert_eq!(recorded.len(), expected.len());
        prop_assert_eq!(recorded.names(DriverChange::Appeared), expected);
    }
}
