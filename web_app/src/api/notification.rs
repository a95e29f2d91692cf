//! # Notification API Module
//!
//! The per-user inbox: the most recent notifications, an unread counter, and
//! read-state changes applied optimistically against the store.

use crate::{consts, metric, models, repo};
use serde::Serialize;

use super::errors::{AppError, AppResult};
use super::optimistic::{LocalCommand, apply_optimistically};

/// Most recent notifications of one user and how many of them are unread
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct NotificationInbox {
    pub items: Vec<models::notification::Notification>,
    pub unread: usize,
}

impl NotificationInbox {
    pub fn new(items: Vec<models::notification::Notification>) -> Self {
        let unread = items.iter().filter(|n| !n.is_read).count();
        Self { items, unread }
    }

    /// Inbox over a page of `items` where `unread` counts every unread
    /// notification of the user, listed or not.
    pub fn with_unread(items: Vec<models::notification::Notification>, unread: usize) -> Self {
        let listed_unread = items.iter().filter(|n| !n.is_read).count();
        Self {
            items,
            unread: unread.max(listed_unread),
        }
    }

    fn contains(&self, notification_id: i64) -> bool {
        self.items.iter().any(|n| n.id == notification_id)
    }

    /// Prepends a newly delivered notification. Already known ids are ignored.
    pub fn receive(&mut self, notification: models::notification::Notification) {
        if self.items.iter().any(|n| n.id == notification.id) {
            return;
        }

        if !notification.is_read {
            self.unread += 1;
        }
        self.items.insert(0, notification);
    }

    pub fn unread_ids(&self) -> Vec<i64> {
        self.items
            .iter()
            .filter(|n| !n.is_read)
            .map(|n| n.id)
            .collect()
    }

    fn set_read(&mut self, ids: &[i64], is_read: bool) {
        for item in self.items.iter_mut().filter(|n| ids.contains(&n.id)) {
            if item.is_read == is_read {
                continue;
            }
            item.is_read = is_read;
            if is_read {
                self.unread = self.unread.saturating_sub(1);
            } else {
                self.unread += 1;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboxCommand {
    MarkRead(Vec<i64>),
    MarkUnread(Vec<i64>),
    /// Marks the listed `ids` read and drops `unlisted` unread notifications
    /// outside the loaded page from the counter
    MarkAllRead { ids: Vec<i64>, unlisted: usize },
    RestoreUnread { ids: Vec<i64>, unlisted: usize },
}

impl LocalCommand<NotificationInbox> for InboxCommand {
    fn apply(&self, state: &mut NotificationInbox) {
        match self {
            InboxCommand::MarkRead(ids) => state.set_read(ids, true),
            InboxCommand::MarkUnread(ids) => state.set_read(ids, false),
            InboxCommand::MarkAllRead { ids, unlisted } => {
                state.set_read(ids, true);
                state.unread = state.unread.saturating_sub(*unlisted);
            }
            InboxCommand::RestoreUnread { ids, unlisted } => {
                state.set_read(ids, false);
                state.unread += unlisted;
            }
        }
    }

    fn inverse(&self) -> Self {
        match self {
            InboxCommand::MarkRead(ids) => InboxCommand::MarkUnread(ids.clone()),
            InboxCommand::MarkUnread(ids) => InboxCommand::MarkRead(ids.clone()),
            InboxCommand::MarkAllRead { ids, unlisted } => InboxCommand::RestoreUnread {
                ids: ids.clone(),
                unlisted: *unlisted,
            },
            InboxCommand::RestoreUnread { ids, unlisted } => InboxCommand::MarkAllRead {
                ids: ids.clone(),
                unlisted: *unlisted,
            },
        }
    }
}

async fn count_unread(repo: &repo::ImplAppRepo, user_id: i64) -> AppResult<usize> {
    let count = repo.count_unread_notifications(user_id).await?;

    Ok(usize::try_from(count).unwrap_or_default())
}

/// Loads the latest notifications of `user_id` into an inbox. The unread
/// counter covers every stored notification, not only the loaded page.
pub async fn load_inbox(repo: &repo::ImplAppRepo, user_id: i64) -> AppResult<NotificationInbox> {
    let items = repo
        .get_user_notifications(user_id, consts::NOTIFICATIONS_LIST_LIMIT)
        .await?;

    Ok(NotificationInbox::with_unread(
        items,
        count_unread(repo, user_id).await?,
    ))
}

/// Marks one notification as read.
///
/// The inbox counter drops by one when the notification was unread, never
/// below zero. Only items still unread are flipped, so a failed write restores
/// exactly the previous state.
///
/// # Errors
/// * [`AppError::NotFound`] - no notification with that id belongs to `user_id`
/// * [`AppError::Persistence`] - the store rejected the update
pub async fn mark_read(
    repo: &repo::ImplAppRepo,
    inbox: &mut NotificationInbox,
    user_id: i64,
    notification_id: i64,
) -> AppResult<()> {
    let ids: Vec<i64> = inbox
        .unread_ids()
        .into_iter()
        .filter(|id| *id == notification_id)
        .collect();

    let found = apply_optimistically(
        inbox,
        InboxCommand::MarkRead(ids),
        repo.mark_notification_read(user_id, notification_id),
    )
    .await?;

    if !found {
        return Err(AppError::NotFound("Notification not found".into()));
    }

    if !inbox.contains(notification_id) {
        inbox.unread = count_unread(repo, user_id).await?;
    }

    metric::incr_notification_action_statds("mark_read");
    Ok(())
}

/// Marks every unread notification of `user_id` as read in one write,
/// including those outside the loaded page.
///
/// # Returns
/// * `AppResult<u64>` - Number of rows the store updated
pub async fn mark_all_read(
    repo: &repo::ImplAppRepo,
    inbox: &mut NotificationInbox,
    user_id: i64,
) -> AppResult<u64> {
    let ids = inbox.unread_ids();
    if ids.is_empty() && inbox.unread == 0 {
        return Ok(0);
    }
    let unlisted = inbox.unread.saturating_sub(ids.len());

    let updated = apply_optimistically(
        inbox,
        InboxCommand::MarkAllRead { ids, unlisted },
        repo.mark_all_notifications_read(user_id),
    )
    .await?;

    metric::incr_notification_action_statds("mark_all_read");
    Ok(updated)
}
