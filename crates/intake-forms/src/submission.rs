//! Submission lifecycle.
//!
//! ```text
//! Idle -> Submitting -> Succeeded | Failed
//! ```
//!
//! A successful creation navigates to the success route with the created
//! identifier. Failures are logged, never shown raw, and leave the form
//! editable. A submission that finishes after its form was unmounted applies
//! nothing.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::{FieldErrors, FormError, Result};
use crate::form::FormCore;
use crate::navigation::{Navigator, RoutePattern};
use crate::value::FormValues;

/// Route parameter that receives the created identifier.
pub const ID_PARAM: &str = "id";

/// Error returned by the asynchronous creation call.
pub type SubmitError = Box<dyn std::error::Error + Send + Sync>;

/// Visual state of the submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    /// Submit control enabled.
    #[default]
    Idle,
    /// Creation call in flight; submit control disabled.
    Submitting,
    /// Record created and navigation performed.
    Succeeded,
    /// Creation call failed; form editable again.
    Failed,
}

impl SubmissionStatus {
    /// Whether the submit control should be disabled.
    pub fn is_busy(self) -> bool {
        self == Self::Submitting
    }
}

/// How a started submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The record was created and the navigator sent to `path`.
    Succeeded { id: String, path: String },
    /// The call succeeded without returning a record; nothing to navigate to.
    NoRecord,
    /// The call failed; the error was logged.
    Failed,
    /// The form was unmounted before the call finished; nothing was applied.
    Detached,
}

/// Result of asking a form to submit.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation failed; the errors are now on the form.
    Invalid(FieldErrors),
    /// A submission is already in flight; this request was ignored.
    Busy,
    /// Validation passed and the creation call is under way.
    Started(Submission),
}

impl SubmitOutcome {
    /// The submission, if one was started.
    pub fn started(self) -> Option<Submission> {
        match self {
            Self::Started(submission) => Some(submission),
            Self::Invalid(_) | Self::Busy => None,
        }
    }
}

/// An in-flight submission. Await it (or spawn it) to drive the creation call.
///
/// Dropping it before completion abandons the call and re-enables the form.
#[must_use = "the creation call only runs when the submission is awaited"]
pub struct Submission {
    inner: BoxFuture<'static, SubmissionOutcome>,
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission").finish_non_exhaustive()
    }
}

impl Future for Submission {
    type Output = SubmissionOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

/// Drives submissions for one form and publishes its [`SubmissionStatus`].
pub struct SubmissionLifecycle {
    navigator: Arc<dyn Navigator>,
    success_route: RoutePattern,
    status: Arc<watch::Sender<SubmissionStatus>>,
}

impl fmt::Debug for SubmissionLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionLifecycle")
            .field("success_route", &self.success_route.pattern())
            .field("status", &*self.status.borrow())
            .finish_non_exhaustive()
    }
}

impl SubmissionLifecycle {
    /// Creates a lifecycle that navigates to `success_route` on success.
    ///
    /// The route must have an `{id}` parameter.
    pub fn new(navigator: Arc<dyn Navigator>, success_route: RoutePattern) -> Result<Self> {
        if !success_route.param_names().any(|p| p == ID_PARAM) {
            return Err(FormError::InvalidRoute(format!(
                "success route {:?} has no {{{ID_PARAM}}} parameter",
                success_route.pattern()
            )));
        }

        let (status, _) = watch::channel(SubmissionStatus::Idle);
        Ok(Self {
            navigator,
            success_route,
            status: Arc::new(status),
        })
    }

    /// Current status.
    pub fn status(&self) -> SubmissionStatus {
        *self.status.borrow()
    }

    /// Subscribes to status changes.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionStatus> {
        self.status.subscribe()
    }

    /// Enters `Submitting`, invokes `on_valid` once and returns the future
    /// that completes the cycle. The caller has already set `is_submitting`.
    pub(crate) fn start<F, Fut>(
        &self,
        core: Arc<FormCore>,
        values: FormValues,
        on_valid: F,
    ) -> Submission
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = std::result::Result<Option<String>, SubmitError>> + Send + 'static,
    {
        self.status.send_replace(SubmissionStatus::Submitting);
        info!("submission started");

        let mut guard = InFlight {
            core,
            status: Arc::clone(&self.status),
            armed: true,
        };
        let call = on_valid(values);
        let navigator = Arc::clone(&self.navigator);
        let route = self.success_route.clone();

        let inner = async move {
            let result = call.await;

            if guard.core.is_torn_down() {
                guard.armed = false;
                debug!("submission finished after unmount; result ignored");
                return SubmissionOutcome::Detached;
            }

            match result {
                Ok(Some(id)) => match route.reverse(&[(ID_PARAM, id.as_str())]) {
                    Some(path) => {
                        info!(%id, %path, "record created");
                        navigator.navigate(&path);
                        guard.finish(SubmissionStatus::Succeeded);
                        SubmissionOutcome::Succeeded { id, path }
                    }
                    None => {
                        error!(route = route.pattern(), "cannot build success route");
                        guard.finish(SubmissionStatus::Failed);
                        SubmissionOutcome::Failed
                    }
                },
                Ok(None) => {
                    info!("creation returned no record");
                    guard.finish(SubmissionStatus::Idle);
                    SubmissionOutcome::NoRecord
                }
                Err(err) => {
                    error!(error = %err, "submission failed");
                    guard.finish(SubmissionStatus::Failed);
                    SubmissionOutcome::Failed
                }
            }
        }
        .boxed();

        Submission { inner }
    }
}

/// Re-enables the form when a submission ends, however it ends.
struct InFlight {
    core: Arc<FormCore>,
    status: Arc<watch::Sender<SubmissionStatus>>,
    armed: bool,
}

impl InFlight {
    fn finish(&mut self, status: SubmissionStatus) {
        self.armed = false;
        self.core.end_submission();
        self.status.send_replace(status);
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.armed && !self.core.is_torn_down() {
            warn!("submission dropped before completion");
            self.core.end_submission();
            self.status.send_replace(SubmissionStatus::Idle);
        }
    }
}
