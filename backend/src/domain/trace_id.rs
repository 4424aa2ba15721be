//! Correlation identifier carried by each request.
//!
//! The [`crate::middleware::Trace`] middleware generates one [`TraceId`] per
//! request and runs the handler inside [`TraceId::scope`]. Anything executing
//! in that task, including [`crate::domain::Error::new`], can read it back via
//! [`TraceId::current`]. Task-locals are not inherited by spawned tasks, so
//! work moved to `spawn_blocking` or `tokio::spawn` must be wrapped again.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Request-scoped UUID.
///
/// # Examples
/// ```
/// use speadwear::TraceId;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let id: TraceId = "6f1c0f6e-5d0a-4a8e-9d5b-0c7a3c1d2e4f".parse().expect("uuid");
/// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
/// assert!(TraceId::current().is_none());
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Identifier of the enclosing scope, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` installed as the current identifier.
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn nested_scopes_shadow_outer_identifier() {
        let outer = TraceId::generate();
        let inner = TraceId::generate();
        let (seen_inner, seen_outer) = TraceId::scope(outer, async move {
            let seen_inner = TraceId::scope(inner, async { TraceId::current() }).await;
            (seen_inner, TraceId::current())
        })
        .await;
        assert_eq!(seen_inner, Some(inner));
        assert_eq!(seen_outer, Some(outer));
    }

    #[rstest]
    #[tokio::test]
    async fn spawned_tasks_do_not_inherit_scope() {
        let id = TraceId::generate();
        let observed = TraceId::scope(id, async {
            tokio::spawn(async { TraceId::current() })
                .await
                .expect("task joins")
        })
        .await;
        assert!(observed.is_none());
    }

    #[rstest]
    fn display_matches_uuid_text() {
        let uuid = Uuid::new_v4();
        assert_eq!(TraceId::from_uuid(uuid).to_string(), uuid.to_string());
    }

    #[rstest]
    fn parsing_rejects_garbage() {
        assert!("not-a-uuid".parse::<TraceId>().is_err());
    }
}
