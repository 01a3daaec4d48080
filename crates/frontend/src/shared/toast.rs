use contracts::shared::config::UiConfig;
use contracts::shared::error::ApiError;
use contracts::shared::severity::Severity;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;

use crate::shared::api_utils::config;
use crate::shared::icons::icon;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

/// How long a toast stays on screen. Errors linger longer.
pub fn toast_life_ms(severity: Severity, ui: &UiConfig) -> u32 {
    match severity {
        Severity::Danger => ui.error_toast_life_ms,
        _ => ui.toast_life_ms,
    }
}

/// Transient notifications shown in the corner of every page.
#[derive(Clone, Copy)]
pub struct ToastService {
    toasts: RwSignal<Vec<Toast>>,
}

impl ToastService {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
        }
    }

    pub fn success(&self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Success, summary.into(), detail.into());
    }

    pub fn info(&self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Info, summary.into(), detail.into());
    }

    pub fn warn(&self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Warning, summary.into(), detail.into());
    }

    pub fn error(&self, summary: impl Into<String>, detail: impl Into<String>) {
        self.push(Severity::Danger, summary.into(), detail.into());
    }

    /// Error toast for a failed call; validation problems show as warnings.
    pub fn api_error(&self, summary: &str, err: &ApiError) {
        match err {
            ApiError::Validation(message) => self.warn(summary, message.clone()),
            _ => {
                log::error!("{}: {}", summary, err);
                self.error(summary, err.to_string());
            }
        }
    }

    pub fn dismiss(&self, id: Uuid) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }

    fn push(&self, severity: Severity, summary: String, detail: String) {
        let id = Uuid::new_v4();
        let life = toast_life_ms(severity, &config().ui);
        self.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                severity,
                summary,
                detail,
            })
        });
        let service = *self;
        spawn_local(async move {
            TimeoutFuture::new(life).await;
            service.dismiss(id);
        });
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_toast() -> ToastService {
    expect_context::<ToastService>()
}

fn toast_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "toast toast--success",
        Severity::Info => "toast toast--info",
        Severity::Warning => "toast toast--warning",
        Severity::Danger => "toast toast--error",
    }
}

/// Renders the live toasts. Mounted once at the application root.
#[component]
pub fn ToastHost() -> impl IntoView {
    let service = use_toast();

    view! {
        <div class="toast-host">
            <For
                each=move || service.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast_class(toast.severity)>
                            <div class="toast__body">
                                <div class="toast__summary">{toast.summary}</div>
                                <div class="toast__detail">{toast.detail}</div>
                            </div>
                            <button class="toast__close" on:click=move |_| service.dismiss(id)>
                                {icon("x")}
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_toasts_live_longer() {
        let ui = UiConfig::default();
        assert_eq!(toast_life_ms(Severity::Success, &ui), 3000);
        assert_eq!(toast_life_ms(Severity::Warning, &ui), 3000);
        assert_eq!(toast_life_ms(Severity::Danger, &ui), 5000);
    }
}
