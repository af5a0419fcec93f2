use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Warning,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// One-shot notices shown on the next rendered page, then discarded.
#[derive(Debug, Default)]
pub struct FlashBag {
    messages: Mutex<Vec<Flash>>,
}

impl FlashBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, kind: FlashKind, message: impl Into<String>) {
        self.messages.lock().await.push(Flash {
            kind,
            message: message.into(),
        });
    }

    /// Drains all pending notices.
    pub async fn take(&self) -> Vec<Flash> {
        std::mem::take(&mut *self.messages.lock().await)
    }
}
