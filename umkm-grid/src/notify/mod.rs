//! Toast and dialog notifications.
//!
//! Callers receive a [`Notifier`] at construction time instead of reaching
//! for a process-wide handler. [`NotifyCenter`] is the in-memory
//! implementation the presentation layer reads from.

mod dialog;
mod toast;

pub use dialog::Dialog;
pub use toast::{DEFAULT_TOAST_DURATION, Toast, ToastLevel};

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tokio::sync::oneshot;

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Show a toast.
    fn toast(&self, toast: Toast);

    /// Ask for confirmation. The receiver yields `true` on confirm and
    /// `false` on cancel; it errors if the dialog is discarded unanswered.
    fn confirm(&self, dialog: Dialog) -> oneshot::Receiver<bool>;
}

struct ActiveToast {
    id: u64,
    toast: Toast,
    shown_at: Instant,
}

struct PendingDialog {
    dialog: Dialog,
    result_tx: oneshot::Sender<bool>,
}

#[derive(Default)]
struct CenterInner {
    next_id: u64,
    toasts: Vec<ActiveToast>,
    /// Last element is on top.
    dialogs: Vec<PendingDialog>,
}

/// Toast queue plus dialog stack.
///
/// Cheap to clone; clones share the same queue.
#[derive(Clone, Default)]
pub struct NotifyCenter {
    inner: Arc<Mutex<CenterInner>>,
}

impl NotifyCenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CenterInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Show a toast as of `now`. Returns its id.
    pub fn toast_at(&self, toast: Toast, now: Instant) -> u64 {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        log::debug!("[notify] toast {} ({}): {}", id, toast.level.label(), toast.title);
        inner.toasts.push(ActiveToast {
            id,
            toast,
            shown_at: now,
        });
        id
    }

    /// Toasts currently on screen, oldest first.
    pub fn toasts(&self) -> Vec<(u64, Toast)> {
        self.lock()
            .toasts
            .iter()
            .map(|t| (t.id, t.toast.clone()))
            .collect()
    }

    /// Close a toast early.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut inner = self.lock();
        let before = inner.toasts.len();
        inner.toasts.retain(|t| t.id != id);
        inner.toasts.len() != before
    }

    /// Drop toasts whose duration has elapsed at `now`. Returns how many.
    pub fn prune(&self, now: Instant) -> usize {
        let mut inner = self.lock();
        let before = inner.toasts.len();
        inner
            .toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < t.toast.duration);
        before - inner.toasts.len()
    }

    /// The dialog currently on top.
    pub fn top_dialog(&self) -> Option<Dialog> {
        self.lock().dialogs.last().map(|d| d.dialog.clone())
    }

    pub fn dialog_count(&self) -> usize {
        self.lock().dialogs.len()
    }

    /// Answer the top dialog. Returns false when no dialog is open.
    pub fn answer(&self, confirmed: bool) -> bool {
        let Some(pending) = self.lock().dialogs.pop() else {
            return false;
        };
        log::debug!(
            "[notify] dialog `{}` answered {}",
            pending.dialog.title,
            confirmed
        );
        // The asker may have stopped waiting.
        let _ = pending.result_tx.send(confirmed);
        true
    }
}

impl Notifier for NotifyCenter {
    fn toast(&self, toast: Toast) {
        self.toast_at(toast, Instant::now());
    }

    fn confirm(&self, dialog: Dialog) -> oneshot::Receiver<bool> {
        let (result_tx, result_rx) = oneshot::channel();
        log::debug!("[notify] dialog `{}` opened", dialog.title);
        self.lock().dialogs.push(PendingDialog { dialog, result_tx });
        result_rx
    }
}
