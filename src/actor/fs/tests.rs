use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::EventKind;
use notify::event::{CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode};
use tempfile::TempDir;
use tokio::sync::mpsc;

use super::router::{Action, Router};
use super::types::{ChangeEvent, ChangeKind};
use super::FsActor;
use crate::actor::messages::WsMsg;
use crate::compiler::StyleCompiler;
use crate::config::{DevConfig, test_config_with_script};
use crate::core::FileKind;
use crate::utils::path::normalize_path;

/// Stand-in compiler: prints `out.css`, and `err.txt` to stderr if present.
const SCRIPT: &str = "cat out.css 2>/dev/null; if [ -f err.txt ]; then cat err.txt >&2; fi";

fn make_config() -> (TempDir, DevConfig) {
    let temp = TempDir::new().unwrap();
    let root = normalize_path(temp.path());
    let config = test_config_with_script(&root, SCRIPT);
    (temp, config)
}

fn make_router(config: &DevConfig) -> (Router, Arc<StyleCompiler>, mpsc::Receiver<WsMsg>) {
    let (ws_tx, ws_rx) = mpsc::channel(8);
    let compiler = Arc::new(StyleCompiler::new(config));
    let router = Router {
        watch: config.watch.clone(),
        compiler: Arc::clone(&compiler),
        ws_tx,
    };
    (router, compiler, ws_rx)
}

fn make_event(paths: Vec<PathBuf>, kind: EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths,
        attrs: Default::default(),
    }
}

fn change(kind: ChangeKind, name: &str) -> ChangeEvent {
    ChangeEvent {
        kind,
        file_name: name.into(),
    }
}

fn modify_kind() -> EventKind {
    EventKind::Modify(ModifyKind::Data(DataChange::Any))
}

// =============================================================================
// Event mapping
// =============================================================================

#[test]
fn test_change_kind_mapping() {
    let map = ChangeKind::from_notify;

    assert_eq!(
        map(&EventKind::Create(CreateKind::File)),
        Some(ChangeKind::Created)
    );
    assert_eq!(map(&modify_kind()), Some(ChangeKind::Modified));
    assert_eq!(
        map(&EventKind::Modify(ModifyKind::Any)),
        Some(ChangeKind::Modified)
    );
    assert_eq!(
        map(&EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
        Some(ChangeKind::Renamed)
    );
    assert_eq!(
        map(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any))),
        None
    );
    assert_eq!(map(&EventKind::Remove(RemoveKind::File)), None);
}

#[test]
fn test_change_kind_labels() {
    assert_eq!(ChangeKind::Created.label(), "created");
    assert_eq!(ChangeKind::Modified.label(), "modified");
    assert_eq!(ChangeKind::Renamed.label(), "renamed");
}

#[test]
fn test_change_event_keeps_direct_children_only() {
    let (_temp, config) = make_config();
    let root = config.get_root();
    std::fs::create_dir(root.join("nested")).unwrap();

    let event = make_event(
        vec![
            root.join("style.css"),
            root.join("nested/other.css"),
            PathBuf::from("/somewhere/else/index.html"),
        ],
        modify_kind(),
    );

    let changes = ChangeEvent::from_notify(&event, root, Some("twdev.toml"));
    assert_eq!(changes, vec![change(ChangeKind::Modified, "style.css")]);
}

#[test]
fn test_change_event_skips_ignored_file() {
    let (_temp, config) = make_config();
    let root = config.get_root();

    let event = make_event(vec![root.join("twdev.toml")], modify_kind());
    assert!(ChangeEvent::from_notify(&event, root, Some("twdev.toml")).is_empty());

    // A config kept in a watched format is skipped too
    let event = make_event(vec![root.join("dev.config.js")], modify_kind());
    assert!(ChangeEvent::from_notify(&event, root, Some("dev.config.js")).is_empty());
    assert_eq!(
        ChangeEvent::from_notify(&event, root, None),
        vec![change(ChangeKind::Modified, "dev.config.js")]
    );
}

#[test]
fn test_rename_reports_both_names() {
    let (_temp, config) = make_config();
    let root = config.get_root();

    let event = make_event(
        vec![root.join("old.html"), root.join("new.html")],
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
    );

    let changes = ChangeEvent::from_notify(&event, root, Some("twdev.toml"));
    assert_eq!(
        changes,
        vec![
            change(ChangeKind::Renamed, "old.html"),
            change(ChangeKind::Renamed, "new.html"),
        ]
    );
}

#[test]
fn test_action_for_kind() {
    assert_eq!(Action::for_kind(FileKind::Markup), Action::Reload);
    assert_eq!(Action::for_kind(FileKind::Style), Action::Compile);
    assert_eq!(Action::for_kind(FileKind::Script), Action::Compile);
    assert_eq!(Action::for_kind(FileKind::Other), Action::Ignore);
}

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn test_markup_change_reloads_without_compiling() {
    let (_temp, config) = make_config();
    let (router, compiler, mut ws_rx) = make_router(&config);

    let handle = router
        .dispatch(&change(ChangeKind::Modified, "index.html"))
        .await
        .unwrap();

    assert!(handle.is_none());
    assert!(matches!(ws_rx.recv().await, Some(WsMsg::Reload { .. })));
    assert_eq!(compiler.compiles(), 0);
}

#[tokio::test]
async fn test_style_change_compiles_then_reloads() {
    let (temp, config) = make_config();
    std::fs::write(temp.path().join("out.css"), "body{color:red}").unwrap();
    let (router, compiler, mut ws_rx) = make_router(&config);

    let handle = router
        .dispatch(&change(ChangeKind::Modified, "style.css"))
        .await
        .unwrap()
        .expect("style change spawns a compile");
    handle.await.unwrap();

    assert!(matches!(ws_rx.recv().await, Some(WsMsg::Reload { .. })));
    assert_eq!(compiler.compiles(), 1);
    assert_eq!(compiler.css().as_str(), "body{color:red}");
}

#[tokio::test]
async fn test_script_change_failure_reports_error() {
    let (temp, config) = make_config();
    std::fs::write(temp.path().join("err.txt"), "✖ syntax error on line 4").unwrap();
    let (router, compiler, mut ws_rx) = make_router(&config);

    let handle = router
        .dispatch(&change(ChangeKind::Modified, "tailwind.js"))
        .await
        .unwrap()
        .expect("script change spawns a compile");
    handle.await.unwrap();

    match ws_rx.recv().await {
        Some(WsMsg::Error { message }) => assert_eq!(message, "syntax error on line 4"),
        other => panic!("expected error, got {other:?}"),
    }
    assert_eq!(compiler.css().as_str(), "");
}

#[tokio::test]
async fn test_each_event_compiles_once() {
    let (temp, config) = make_config();
    std::fs::write(temp.path().join("out.css"), "a{}").unwrap();
    let (router, compiler, mut ws_rx) = make_router(&config);

    let mut handles = Vec::new();
    for name in ["style.css", "style.css", "tailwind.js"] {
        let handle = router
            .dispatch(&change(ChangeKind::Modified, name))
            .await
            .unwrap();
        handles.extend(handle);
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(compiler.compiles(), 3);
    for _ in 0..3 {
        assert!(matches!(ws_rx.recv().await, Some(WsMsg::Reload { .. })));
    }
}

#[tokio::test]
async fn test_other_change_is_ignored() {
    let (_temp, config) = make_config();
    let (router, compiler, mut ws_rx) = make_router(&config);

    let handle = router
        .dispatch(&change(ChangeKind::Created, "notes.txt"))
        .await
        .unwrap();

    assert!(handle.is_none());
    assert!(ws_rx.try_recv().is_err());
    assert_eq!(compiler.compiles(), 0);
}

#[tokio::test]
async fn test_dispatch_fails_when_ws_actor_is_gone() {
    let (_temp, config) = make_config();
    let (router, _compiler, ws_rx) = make_router(&config);
    drop(ws_rx);

    let result = router
        .dispatch(&change(ChangeKind::Modified, "index.html"))
        .await;
    assert!(result.is_err());
}

// =============================================================================
// Watcher
// =============================================================================

#[tokio::test]
async fn test_watcher_reloads_on_markup_write() {
    let (_temp, config) = make_config();
    let (ws_tx, mut ws_rx) = mpsc::channel(8);
    let compiler = Arc::new(StyleCompiler::new(&config));

    let actor = FsActor::new(&config, compiler, ws_tx).unwrap();
    let handle = tokio::spawn(actor.run());

    std::fs::write(config.root_join("index.html"), "<p>hi</p>").unwrap();

    let msg = tokio::time::timeout(Duration::from_secs(5), ws_rx.recv())
        .await
        .expect("watcher reported the change");
    assert!(matches!(msg, Some(WsMsg::Reload { ref reason }) if reason == "index.html"));

    handle.abort();
}

#[tokio::test]
async fn test_watcher_ignores_subdirectories() {
    let (_temp, config) = make_config();
    let nested = config.root_join("nested");
    std::fs::create_dir(&nested).unwrap();

    let (ws_tx, mut ws_rx) = mpsc::channel(8);
    let compiler = Arc::new(StyleCompiler::new(&config));
    let actor = FsActor::new(&config, compiler, ws_tx).unwrap();
    let handle = tokio::spawn(actor.run());

    std::fs::write(Path::new(&nested).join("page.html"), "<p>hi</p>").unwrap();

    let msg = tokio::time::timeout(Duration::from_millis(500), ws_rx.recv()).await;
    assert!(msg.is_err(), "nested change must not reload");

    handle.abort();
}
