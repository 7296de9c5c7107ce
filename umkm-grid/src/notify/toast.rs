use std::time::Duration;

/// Default duration for toast notifications.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);

/// Toast notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn label(self) -> &'static str {
        match self {
            ToastLevel::Info => "info",
            ToastLevel::Success => "success",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
        }
    }
}

/// A toast notification.
///
/// # Example
///
/// ```ignore
/// notifier.toast(Toast::success("Business saved"));
/// notifier.toast(Toast::error("Upload failed").with_body("file exceeds 2 MB"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub body: Option<String>,
    /// How long to show the toast
    pub duration: Duration,
}

impl Toast {
    fn with_level(level: ToastLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            body: None,
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Info, title)
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Success, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Warning, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::with_level(ToastLevel::Error, title)
    }

    /// Add a body to the toast
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

impl From<String> for Toast {
    fn from(message: String) -> Self {
        Toast::info(message)
    }
}

impl From<&str> for Toast {
    fn from(message: &str) -> Self {
        Toast::info(message)
    }
}
