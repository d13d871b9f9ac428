use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::{ClientOptions, LunexError, Method, RequestDescriptor, ResponseSummary};

/// Dispatches lifecycle hooks for one logical call.
///
/// Missing hooks are no-ops. A panicking hook is caught and logged; it never
/// changes the outcome of the call.
pub(crate) struct Hooks<'a> {
    options: &'a ClientOptions,
}

impl<'a> Hooks<'a> {
    pub fn new(options: &'a ClientOptions) -> Self {
        Self { options }
    }

    pub fn start(&self, method: Method, url: &str, descriptor: &RequestDescriptor) {
        if let Some(hook) = &self.options.on_request_start {
            guarded("on_request_start", || hook(method, url, descriptor));
        }
    }

    pub fn end(&self, summary: &ResponseSummary) {
        if let Some(hook) = &self.options.on_request_end {
            guarded("on_request_end", || hook(summary));
        }
    }

    pub fn error(&self, err: &LunexError) {
        if let Some(hook) = &self.options.on_request_error {
            guarded("on_request_error", || hook(err));
        }
    }
}

fn guarded(hook_name: &'static str, call: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(call)).is_err() {
        #[cfg(feature = "tracing")]
        tracing::warn!(hook = hook_name, "lifecycle hook panicked; ignoring");

        #[cfg(not(feature = "tracing"))]
        let _ = hook_name;
    }
}
