//! # Favorites API Module
//!
//! Membership of (user, pet) pairs in the favorites set. Toggling is optimistic:
//! the caller's [`FavoritesView`] flips first and flips back if the write fails.

use crate::{metric, models, repo};
use std::collections::HashSet;

use super::errors::AppResult;
use super::optimistic::{LocalCommand, apply_optimistically};

/// Pets liked by one user, used to seed the `liked` flag of listings
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FavoritesView {
    liked: HashSet<i64>,
}

impl FavoritesView {
    pub fn from_pet_ids(pet_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            liked: pet_ids.into_iter().collect(),
        }
    }

    pub fn is_liked(&self, pet_id: i64) -> bool {
        self.liked.contains(&pet_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteCommand {
    Like(i64),
    Unlike(i64),
}

impl LocalCommand<FavoritesView> for FavoriteCommand {
    fn apply(&self, state: &mut FavoritesView) {
        match *self {
            FavoriteCommand::Like(pet_id) => {
                state.liked.insert(pet_id);
            }
            FavoriteCommand::Unlike(pet_id) => {
                state.liked.remove(&pet_id);
            }
        }
    }

    fn inverse(&self) -> Self {
        match *self {
            FavoriteCommand::Like(pet_id) => FavoriteCommand::Unlike(pet_id),
            FavoriteCommand::Unlike(pet_id) => FavoriteCommand::Like(pet_id),
        }
    }
}

/// Loads the set of pets liked by `user_id`.
pub async fn load_favorites_view(
    repo: &repo::ImplAppRepo,
    user_id: i64,
) -> AppResult<FavoritesView> {
    Ok(FavoritesView::from_pet_ids(
        repo.get_user_favorite_pet_ids(user_id).await?,
    ))
}

/// Adds `pet_id` to the user's favorites. Adding twice keeps a single row.
pub async fn add_favorite(repo: &repo::ImplAppRepo, user_id: i64, pet_id: i64) -> AppResult<()> {
    repo.insert_favorite(user_id, pet_id).await?;

    metric::incr_favorite_action_statds("add");
    Ok(())
}

pub async fn remove_favorite(
    repo: &repo::ImplAppRepo,
    user_id: i64,
    pet_id: i64,
) -> AppResult<()> {
    repo.delete_favorite(user_id, pet_id).await?;

    metric::incr_favorite_action_statds("remove");
    Ok(())
}

pub async fn is_favorited(repo: &repo::ImplAppRepo, user_id: i64, pet_id: i64) -> AppResult<bool> {
    Ok(repo.is_pet_favorite(user_id, pet_id).await?)
}

/// Flips the liked state of `pet_id` in `view` and persists it.
///
/// # Arguments
/// * `repo` - Repository instance for database operations
/// * `view` - The caller's current favorites set, updated in place
/// * `user_id` - Owner of the favorites set
/// * `pet_id` - Pet being liked or unliked
///
/// # Returns
/// * `AppResult<bool>` - The liked state after the toggle
///
/// # Errors
/// Returns [`super::errors::AppError::Persistence`] when the write fails; `view`
/// is then left as it was before the call.
pub async fn toggle_favorite(
    repo: &repo::ImplAppRepo,
    view: &mut FavoritesView,
    user_id: i64,
    pet_id: i64,
) -> AppResult<bool> {
    let _span = logfire::span!("toggle_favorite").entered();

    let command = if view.is_liked(pet_id) {
        FavoriteCommand::Unlike(pet_id)
    } else {
        FavoriteCommand::Like(pet_id)
    };

    match command {
        FavoriteCommand::Like(_) => {
            apply_optimistically(view, command, repo.insert_favorite(user_id, pet_id)).await?;
            metric::incr_favorite_action_statds("add");
        }
        FavoriteCommand::Unlike(_) => {
            apply_optimistically(view, command, repo.delete_favorite(user_id, pet_id)).await?;
            metric::incr_favorite_action_statds("remove");
        }
    }

    Ok(view.is_liked(pet_id))
}

/// Favorites of `user_id` with their pet summary, newest first.
pub async fn list_favorites(
    repo: &repo::ImplAppRepo,
    user_id: i64,
) -> AppResult<Vec<models::favorite::FavoriteWithPet>> {
    Ok(repo.get_user_favorites(user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::errors::AppError;
    use crate::repo::{MockAppRepo, testing};
    use anyhow::anyhow;
    use mockall::predicate::*;

    #[ntex::test]
    async fn test_toggle_twice_returns_to_unliked() {
        let repo = testing::setup_test_repo().await;
        let user_id = testing::seed_user(&repo, "a@x.com").await;
        let pet_id = testing::seed_pet(&repo, "max", None).await;
        let repo: repo::ImplAppRepo = Box::new(repo);
        let mut view = load_favorites_view(&repo, user_id).await.unwrap();

        assert!(toggle_favorite(&repo, &mut view, user_id, pet_id).await.unwrap());
        assert!(is_favorited(&repo, user_id, pet_id).await.unwrap());

        assert!(!toggle_favorite(&repo, &mut view, user_id, pet_id).await.unwrap());
        assert!(!is_favorited(&repo, user_id, pet_id).await.unwrap());
        assert_eq!(load_favorites_view(&repo, user_id).await.unwrap(), view);
    }

    #[ntex::test]
    async fn test_toggle_reverts_view_when_write_fails() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_insert_favorite()
            .with(eq(1_i64), eq(7_i64))
            .times(1)
            .returning(|_, _| Err(anyhow!("write refused")));
        let mock_repo: Box<dyn repo::AppRepo> = Box::new(mock_repo);
        let mut view = FavoritesView::default();

        let result = toggle_favorite(&mock_repo, &mut view, 1, 7).await;

        assert!(matches!(result, Err(AppError::Persistence { .. })));
        assert!(!view.is_liked(7));
    }

    #[ntex::test]
    async fn test_unlike_failure_keeps_pet_liked() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_delete_favorite()
            .times(1)
            .returning(|_, _| Err(anyhow!("write refused")));
        let mock_repo: Box<dyn repo::AppRepo> = Box::new(mock_repo);
        let mut view = FavoritesView::from_pet_ids([7]);

        assert!(toggle_favorite(&mock_repo, &mut view, 1, 7).await.is_err());
        assert!(view.is_liked(7));
    }

    #[ntex::test]
    async fn test_view_seeded_only_from_stored_favorites() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_user_favorite_pet_ids()
            .with(eq(1_i64))
            .times(1)
            .returning(|_| Ok(vec![3, 5]));
        let mock_repo: Box<dyn repo::AppRepo> = Box::new(mock_repo);

        let view = load_favorites_view(&mock_repo, 1).await.unwrap();

        assert!(view.is_liked(3) && view.is_liked(5));
        assert!(!view.is_liked(4));
    }
}
