use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lucy_ui::hook::{CallbackResult, Hook, HookEvent, names};
use lucy_ui::{Button, Container, HookError, UiError, UiTree};
use parking_lot::Mutex;

type Log = Arc<Mutex<Vec<&'static str>>>;

fn push(
    log: &Log,
    tag: &'static str,
) -> impl Fn(&HookEvent<'_>) -> CallbackResult + Send + Sync + 'static {
    let log = log.clone();
    move |_: &HookEvent<'_>| {
        log.lock().push(tag);
        Ok(())
    }
}

#[test]
fn test_tree_hooks_run_in_connection_order() {
    let mut tree = UiTree::new();
    let button = tree.add(Button::new("ok")).unwrap();
    let log = Log::default();

    for tag in ["first", "second", "third"] {
        tree.connect(button, names::CLICKED, push(&log, tag)).unwrap();
    }

    assert_eq!(tree.fire(button, names::CLICKED).unwrap(), 3);
    assert_eq!(*log.lock(), vec!["first", "second", "third"]);
}

#[test]
fn test_hooks_are_per_node_and_per_name() {
    let mut tree = UiTree::new();
    let a = tree.add(Button::new("a")).unwrap();
    let b = tree.add(Button::new("b")).unwrap();
    let count = Arc::new(AtomicUsize::new(0));

    let c = count.clone();
    tree.connect(a, names::CLICKED, move |_| {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
    .unwrap();

    assert_eq!(tree.fire(b, names::CLICKED).unwrap(), 0);
    assert_eq!(tree.fire(a, names::PRESSED).unwrap(), 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    assert_eq!(tree.fire(a, names::CLICKED).unwrap(), 1);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_disconnect_stops_callback() {
    let mut tree = UiTree::new();
    let button = tree.add(Button::new("ok")).unwrap();
    let log = Log::default();

    tree.connect(button, names::CLICKED, push(&log, "keep")).unwrap();
    let id = tree
        .connect(button, names::CLICKED, push(&log, "dropped"))
        .unwrap();

    assert!(tree.disconnect(button, names::CLICKED, id).unwrap());
    assert!(!tree.disconnect(button, names::CLICKED, id).unwrap());
    assert!(!tree.disconnect(button, names::PRESSED, id).unwrap());

    tree.fire(button, names::CLICKED).unwrap();
    assert_eq!(*log.lock(), vec!["keep"]);
}

#[test]
fn test_custom_hook_names() {
    let mut tree = UiTree::new();
    let panel = tree.add(Container::vertical()).unwrap();
    let value = Arc::new(Mutex::new(None));

    let v = value.clone();
    tree.connect(panel, "scrolled", move |event| {
        *v.lock() = event.value;
        Ok(())
    })
    .unwrap();

    let event = HookEvent::new("scrolled").with_source(panel).with_value(0.5);
    assert_eq!(tree.fire_event(panel, &event).unwrap(), 1);
    assert_eq!(*value.lock(), Some(0.5));
}

#[test]
fn test_failing_callback_stops_later_ones() {
    let mut tree = UiTree::new();
    let button = tree.add(Button::new("ok")).unwrap();
    let log = Log::default();

    tree.connect(button, names::CLICKED, push(&log, "before"))
        .unwrap();
    tree.connect(button, names::CLICKED, |_| Err("boom".into()))
        .unwrap();
    tree.connect(button, names::CLICKED, push(&log, "after"))
        .unwrap();

    let err = tree.fire(button, names::CLICKED).unwrap_err();
    match err {
        UiError::Hook(HookError::CallbackFailed { hook, index, source }) => {
            assert_eq!(hook, names::CLICKED);
            assert_eq!(index, 1);
            assert_eq!(source.to_string(), "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*log.lock(), vec!["before"]);
}

#[test]
fn test_removed_node_drops_hooks() {
    let mut tree = UiTree::new();
    let root = tree.add(Container::vertical()).unwrap();
    let button = tree.add(Button::new("ok")).unwrap();
    tree.add_child(root, button).unwrap();

    let handle = tree.hook(button, names::CLICKED).unwrap();
    handle.connect(|_| Ok(()));

    tree.remove(root).unwrap();
    assert!(matches!(
        tree.fire(button, names::CLICKED),
        Err(UiError::NodeNotFound(_))
    ));
    assert!(matches!(
        tree.connect(button, names::CLICKED, |_| Ok(())),
        Err(UiError::NodeNotFound(_))
    ));
}

#[test]
fn test_callback_can_reconnect_during_emit() {
    let hook = Hook::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let inner = hook.clone();
    let c = calls.clone();
    hook.connect(move |_| {
        let c = c.clone();
        inner.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        Ok(())
    });

    // The callback added during the first emission only runs from the next one.
    assert_eq!(hook.emit(&HookEvent::new("tick")).unwrap(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(hook.emit(&HookEvent::new("tick")).unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
