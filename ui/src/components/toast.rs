//! Transient notifications.
//!
//! Every user-visible outcome (load fallback, import, export, bulk row
//! actions) goes through one [`ToastManager`] provided at the app root.

use dioxus::prelude::*;

use crate::core::{error::AppError, platform};

const DISMISS_AFTER_MS: u32 = 3000;
const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastSeverity {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastSeverity {
    fn class(self) -> &'static str {
        match self {
            Self::Info => "toast toast--info",
            Self::Success => "toast toast--success",
            Self::Warning => "toast toast--warning",
            Self::Error => "toast toast--error",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Info => "ℹ",
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✕",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub severity: ToastSeverity,
}

/// Access via [`use_toast`] from any component below the provider.
#[derive(Clone, Copy)]
pub struct ToastManager {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u32>,
    enabled: bool,
}

impl ToastManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            toasts: Signal::new(vec![]),
            next_id: Signal::new(0),
            enabled,
        }
    }

    /// Shows a toast that dismisses itself after three seconds.
    /// When notifications are disabled the message is only logged.
    pub fn show(&mut self, message: impl Into<String>, severity: ToastSeverity) {
        let message = message.into();
        match severity {
            ToastSeverity::Error => tracing::error!("{message}"),
            ToastSeverity::Warning => tracing::warn!("{message}"),
            _ => tracing::info!("{message}"),
        }
        if !self.enabled {
            return;
        }

        let id = *self.next_id.peek();
        *self.next_id.write() += 1;

        {
            let mut toasts = self.toasts.write();
            if toasts.len() >= MAX_VISIBLE {
                toasts.remove(0);
            }
            toasts.push(Toast {
                id,
                message,
                severity,
            });
        }

        let mut toasts_signal = self.toasts;
        spawn(async move {
            platform::sleep_ms(DISMISS_AFTER_MS).await;
            toasts_signal.write().retain(|t| t.id != id);
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.show(message, ToastSeverity::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message, ToastSeverity::Success);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.show(message, ToastSeverity::Warning);
    }

    /// Reports a failure; recoverable ones show as warnings.
    pub fn failure(&mut self, context: &str, err: &AppError) {
        let severity = if err.is_warning() {
            ToastSeverity::Warning
        } else {
            ToastSeverity::Error
        };
        self.show(format!("{context}: {err}"), severity);
    }

    pub fn dismiss(&mut self, id: u32) {
        self.toasts.write().retain(|t| t.id != id);
    }
}

pub fn use_toast_provider(enabled: bool) -> ToastManager {
    use_context_provider(|| ToastManager::new(enabled))
}

pub fn use_toast() -> ToastManager {
    use_context::<ToastManager>()
}

/// Renders the active toasts; place once at the end of the layout.
#[component]
pub fn ToastFrame() -> Element {
    let mut manager = use_toast();
    let toasts = manager.toasts.read().clone();

    rsx! {
        div { class: "toast-container", role: "status", "aria-live": "polite",
            for toast in toasts.into_iter() {
                div { key: "{toast.id}", class: toast.severity.class(),
                    span { class: "toast__icon", "{toast.severity.icon()}" }
                    span { class: "toast__message", "{toast.message}" }
                    button {
                        r#type: "button",
                        class: "toast__close",
                        "aria-label": "×",
                        onclick: {
                            let id = toast.id;
                            move |_| manager.dismiss(id)
                        },
                        "×"
                    }
                }
            }
        }
    }
}
