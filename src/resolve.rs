//! Resolution emitter: request, then a pending marker, then exactly one resolution.
//!
//! DESIGN
//! ======
//! [`track`] wraps any fallible future. It emits [`Signal::Pending`] before
//! polling the work and [`Signal::Settled`] once after it completes. The two
//! calls are straight-line code, so a caller can never observe zero or two
//! resolutions for one invocation.
//!
//! Failures are converted to a two-line danger notification: a human prefix,
//! then `Error: <code>` from the error's [`ErrorCode`]. The error itself is
//! logged and never propagated.

#[cfg(test)]
#[path = "resolve_test.rs"]
mod resolve_test;

use std::fmt;
use std::future::Future;

use tracing::error;

use crate::notify::NotificationData;

/// Grepable error code for user-facing failure messages.
pub trait ErrorCode: fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Text used to describe the outcome of one kind of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveMessages {
    /// First line of the failure notification.
    pub failure_prefix: &'static str,
    /// Success notification text. `None` resolves silently.
    pub success: Option<&'static str>,
}

/// How one tracked operation settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Succeeded { message: Option<String> },
    Failed { prefix: String, code: &'static str },
}

impl Resolution {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Notification to show for this outcome, if any.
    #[must_use]
    pub fn notification(&self) -> Option<NotificationData> {
        match self {
            Self::Succeeded { message } => message.as_deref().map(NotificationData::success),
            Self::Failed { prefix, code } => {
                Some(NotificationData::danger(vec![prefix.clone(), format!("Error: {code}")]))
            }
        }
    }
}

/// Emitted by [`track`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<T> {
    Pending,
    Settled { value: Option<T>, resolution: Resolution },
}

/// Convert a finished result into its resolution, logging failures.
pub fn resolve<T, E: ErrorCode>(
    result: Result<T, E>,
    messages: &ResolveMessages,
) -> (Option<T>, Resolution) {
    match result {
        Ok(value) => {
            (Some(value), Resolution::Succeeded { message: messages.success.map(str::to_owned) })
        }
        Err(err) => {
            let code = err.error_code();
            error!(
                code,
                error = %err,
                retryable = err.retryable(),
                prefix = messages.failure_prefix,
                "operation failed"
            );
            (None, Resolution::Failed { prefix: messages.failure_prefix.to_owned(), code })
        }
    }
}

/// Run `work`, emitting a pending marker first and exactly one settlement after.
pub async fn track<T, E, F>(messages: ResolveMessages, work: F, mut emit: impl FnMut(Signal<T>))
where
    E: ErrorCode,
    F: Future<Output = Result<T, E>>,
{
    emit(Signal::Pending);
    let (value, resolution) = resolve(work.await, &messages);
    emit(Signal::Settled { value, resolution });
}
