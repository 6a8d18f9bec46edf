//! Browser host services: tasks, toasts, reload and the clock.

use std::cell::Cell;

use futures::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;
use leptos::*;
use library_dapp::Platform;

use crate::config::{MAX_TOASTS, TOAST_DURATION_MS};
use crate::types::Toast;

/// [`Platform`] for the browser.
///
/// Notifications are pushed into a toast signal and removed again after
/// [`TOAST_DURATION_MS`].
pub struct BrowserPlatform {
    toasts: WriteSignal<Vec<Toast>>,
    next_toast: Cell<u64>,
}

impl BrowserPlatform {
    pub fn new(toasts: WriteSignal<Vec<Toast>>) -> Self {
        Self {
            toasts,
            next_toast: Cell::new(1),
        }
    }
}

impl Platform for BrowserPlatform {
    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(future);
    }

    fn notify(&self, message: &str) {
        let id = self.next_toast.get();
        self.next_toast.set(id + 1);
        log::info!("🔔 {}", message);

        let toast = Toast::new(id, message);
        self.toasts.update(|toasts| {
            toasts.push(toast);
            if toasts.len() > MAX_TOASTS {
                toasts.remove(0);
            }
        });

        let toasts = self.toasts;
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(TOAST_DURATION_MS).await;
            toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
        });
    }

    fn reload(&self) {
        if let Err(e) = gloo_utils::window().location().reload() {
            log::error!("❌ Page reload failed: {:?}", e);
        }
    }

    fn now_millis(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}
