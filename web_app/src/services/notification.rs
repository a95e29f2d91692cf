//! In-process feed of newly stored notifications.
//!
//! Writers publish after their transaction commits. Each subscriber only sees
//! notifications addressed to its own user, and is released when its
//! [`NotificationSubscription`] is dropped.

use crate::models;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<models::notification::Notification>,
    active: Arc<AtomicUsize>,
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);

        Self {
            sender,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Delivers `notification` to current subscribers. Returns how many
    /// subscriptions received it, `0` when nobody is listening.
    pub fn publish(&self, notification: models::notification::Notification) -> usize {
        self.sender.send(notification).unwrap_or(0)
    }

    pub fn subscribe(&self, user_id: i64) -> NotificationSubscription {
        self.active.fetch_add(1, Ordering::SeqCst);

        NotificationSubscription {
            user_id,
            receiver: self.sender.subscribe(),
            active: Arc::clone(&self.active),
        }
    }

    pub fn active_subscriptions(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

pub struct NotificationSubscription {
    user_id: i64,
    receiver: broadcast::Receiver<models::notification::Notification>,
    active: Arc<AtomicUsize>,
}

impl NotificationSubscription {
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Waits for the next notification addressed to this subscription's user.
    /// Returns `None` once the hub is gone.
    pub async fn next(&mut self) -> Option<models::notification::Notification> {
        loop {
            match self.receiver.recv().await {
                Ok(notification) if notification.user_id == self.user_id => {
                    return Some(notification);
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "notification subscription of user {} skipped {} messages",
                        self.user_id,
                        skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for NotificationSubscription {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification_for(user_id: i64, id: i64) -> models::notification::Notification {
        models::notification::Notification {
            id,
            user_id,
            ..Default::default()
        }
    }

    #[ntex::test]
    async fn test_subscription_only_receives_own_notifications() {
        let hub = NotificationHub::new(16);
        let mut subscription = hub.subscribe(1);

        hub.publish(notification_for(2, 10));
        hub.publish(notification_for(1, 11));

        let received = subscription.next().await.unwrap();
        assert_eq!(received.id, 11);
        assert_eq!(subscription.user_id(), 1);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let hub = NotificationHub::new(16);

        assert_eq!(hub.publish(notification_for(1, 1)), 0);
    }

    #[test]
    fn test_drop_releases_subscription() {
        let hub = NotificationHub::new(16);
        let first = hub.subscribe(1);
        let second = hub.clone().subscribe(2);
        assert_eq!(hub.active_subscriptions(), 2);

        drop(first);
        assert_eq!(hub.active_subscriptions(), 1);

        drop(second);
        assert_eq!(hub.active_subscriptions(), 0);
        assert_eq!(hub.publish(notification_for(1, 1)), 0);
    }

    #[ntex::test]
    async fn test_next_returns_none_when_hub_dropped() {
        let hub = NotificationHub::new(16);
        let mut subscription = hub.subscribe(1);

        drop(hub);

        assert!(subscription.next().await.is_none());
    }
}
