//! Correlation id for one HTTP request.
//!
//! The trace middleware installs a fresh [`TraceId`] around each request
//! future. Anything running inside that future, such as a recipe service
//! building an [`Error`](super::Error), reads it back with
//! [`TraceId::current`]. Work moved to another task does not see it.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Response header echoing the request's trace id.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static ACTIVE: TraceId;
}

/// UUID tagging every log line and error payload of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id of the request being served, or `None` outside a request.
    #[must_use]
    pub fn current() -> Option<Self> {
        ACTIVE.try_with(|id| *id).ok()
    }

    /// Run `work` with `self` as the current id.
    ///
    /// ```
    /// use recipe_backend::TraceId;
    ///
    /// let id: TraceId = "6f1c1f3e-8c1e-4b8e-9a57-0d1f3d9b2a10".parse()?;
    /// let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    /// let seen = runtime.block_on(id.scope(async { TraceId::current() }));
    /// assert_eq!(seen, Some(id));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub async fn scope<F: Future>(self, work: F) -> F::Output {
        ACTIVE.scope(self, work).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw).map(Self)
    }
}
