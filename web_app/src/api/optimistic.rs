//! Local view state that changes before the store confirms a write.
//!
//! A [`LocalCommand`] is applied to the state first, then the remote write is
//! awaited. When the write fails the inverse command is applied so the state is
//! back where it started, and the failure is returned as
//! [`AppError::Persistence`].

use super::errors::{AppError, AppResult};
use std::future::Future;

/// Reversible change to a piece of local view state
pub trait LocalCommand<S> {
    fn apply(&self, state: &mut S);

    fn inverse(&self) -> Self
    where
        Self: Sized;
}

pub async fn apply_optimistically<S, C, F, T>(
    state: &mut S,
    command: C,
    remote: F,
) -> AppResult<T>
where
    C: LocalCommand<S>,
    F: Future<Output = anyhow::Result<T>>,
{
    command.apply(state);

    match remote.await {
        Ok(value) => Ok(value),
        Err(err) => {
            command.inverse().apply(state);
            Err(AppError::persistence(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct Add(i32);

    impl LocalCommand<i32> for Add {
        fn apply(&self, state: &mut i32) {
            *state += self.0;
        }

        fn inverse(&self) -> Self {
            Add(-self.0)
        }
    }

    #[ntex::test]
    async fn test_state_kept_when_remote_succeeds() {
        let mut counter = 1;

        let result = apply_optimistically(&mut counter, Add(2), async { Ok("saved") }).await;

        assert_eq!(result, Ok("saved"));
        assert_eq!(counter, 3);
    }

    #[ntex::test]
    async fn test_inverse_replayed_when_remote_fails() {
        let mut counter = 1;

        let result: AppResult<()> =
            apply_optimistically(&mut counter, Add(2), async { Err(anyhow!("offline")) }).await;

        assert!(matches!(result, Err(AppError::Persistence { .. })));
        assert_eq!(counter, 1);
    }
}
