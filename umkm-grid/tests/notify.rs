use std::time::{Duration, Instant};

use umkm_grid::notify::{DEFAULT_TOAST_DURATION, Dialog, Notifier, NotifyCenter, Toast, ToastLevel};

#[test]
fn test_toasts_expire_after_their_duration() {
    let center = NotifyCenter::new();
    let start = Instant::now();
    center.toast_at(Toast::success("Saved"), start);
    center.toast_at(
        Toast::error("Upload failed").with_duration(Duration::from_secs(10)),
        start,
    );

    assert_eq!(center.prune(start + Duration::from_secs(1)), 0);
    assert_eq!(center.prune(start + DEFAULT_TOAST_DURATION), 1);

    let left = center.toasts();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].1.level, ToastLevel::Error);
    assert_eq!(center.prune(start + Duration::from_secs(10)), 1);
    assert!(center.toasts().is_empty());
}

#[test]
fn test_dismiss_by_id() {
    let center = NotifyCenter::new();
    let now = Instant::now();
    let first = center.toast_at(Toast::info("One"), now);
    let second = center.toast_at(Toast::from("Two"), now);
    assert_ne!(first, second);

    assert!(center.dismiss(first));
    assert!(!center.dismiss(first));
    assert_eq!(center.toasts()[0].0, second);
    assert_eq!(center.toasts()[0].1.title, "Two");
}

#[test]
fn test_clones_share_the_queue() {
    let center = NotifyCenter::new();
    let handle = center.clone();
    handle.toast(Toast::warning("Heads up").with_body("Session ends soon"));

    let toasts = center.toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].1.body.as_deref(), Some("Session ends soon"));
}

#[tokio::test]
async fn test_confirm_resolves_with_answer() {
    let center = NotifyCenter::new();
    let rx = center.confirm(
        Dialog::new("Delete", "Delete 3 businesses?")
            .labels("Delete", "Keep")
            .danger(),
    );

    let top = center.top_dialog().unwrap();
    assert!(top.danger);
    assert_eq!(top.confirm_label, "Delete");

    assert!(center.answer(true));
    assert_eq!(rx.await, Ok(true));
    assert_eq!(center.dialog_count(), 0);
}

#[tokio::test]
async fn test_dialogs_stack_last_in_first_out() {
    let center = NotifyCenter::new();
    let outer = center.confirm(Dialog::new("Leave", "Discard changes?"));
    let inner = center.confirm(Dialog::new("Really", "This cannot be undone"));

    assert_eq!(center.dialog_count(), 2);
    assert_eq!(center.top_dialog().map(|d| d.title), Some("Really".to_string()));

    center.answer(false);
    center.answer(true);

    assert_eq!(inner.await, Ok(false));
    assert_eq!(outer.await, Ok(true));
    assert!(!center.answer(true));
}

#[tokio::test]
async fn test_answer_after_receiver_dropped() {
    let center = NotifyCenter::new();
    drop(center.confirm(Dialog::new("Gone", "Nobody waits")));
    assert!(center.answer(true));
}
