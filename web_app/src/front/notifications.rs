use futures::{
    StreamExt,
    stream::{self, LocalBoxStream},
};
use ntex::{util::Bytes, web};
use serde::Serialize;

use crate::{
    api,
    front::{AppState, middleware},
    models, services,
};

/// Payload of one server-sent event
#[derive(Serialize, Debug)]
struct InboxEvent<'a> {
    notification: Option<&'a models::notification::Notification>,
    unread: usize,
}

fn sse_frame(event: &str, data: &impl Serialize) -> Result<Bytes, std::io::Error> {
    let data = serde_json::to_string(data)?;

    Ok(Bytes::from(format!("event: {event}\ndata: {data}\n\n")))
}

/// Most recent notifications of the caller and the unread count
#[web::get("")]
async fn list_notifications(
    logged_user: models::user_app::User,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let inbox = api::notification::load_inbox(&app_state.repo, logged_user.id).await?;

    Ok(web::HttpResponse::Ok().json(&inbox))
}

#[web::post("/{notification_id}/read")]
async fn mark_read(
    _: middleware::csrf_token::CsrfToken,
    logged_user: models::user_app::User,
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let mut inbox = api::notification::load_inbox(&app_state.repo, logged_user.id).await?;
    api::notification::mark_read(
        &app_state.repo,
        &mut inbox,
        logged_user.id,
        path.into_inner(),
    )
    .await?;

    Ok(web::HttpResponse::Ok().json(&inbox))
}

#[web::post("/read-all")]
async fn mark_all_read(
    _: middleware::csrf_token::CsrfToken,
    logged_user: models::user_app::User,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let mut inbox = api::notification::load_inbox(&app_state.repo, logged_user.id).await?;
    api::notification::mark_all_read(&app_state.repo, &mut inbox, logged_user.id).await?;

    Ok(web::HttpResponse::Ok().json(&inbox))
}

/// Inbox snapshot followed by one `notification` frame per delivery.
///
/// Owns `subscription`, so dropping the stream releases it.
fn inbox_events(
    subscription: services::notification::NotificationSubscription,
    inbox: api::notification::NotificationInbox,
) -> LocalBoxStream<'static, Result<Bytes, std::io::Error>> {
    let snapshot = sse_frame("inbox", &inbox);
    let deliveries = Box::pin(stream::unfold(
        (subscription, inbox),
        |(mut subscription, mut inbox)| async move {
            let notification = subscription.next().await?;
            inbox.receive(notification.clone());
            let frame = sse_frame(
                "notification",
                &InboxEvent {
                    notification: Some(&notification),
                    unread: inbox.unread,
                },
            );

            Some((frame, (subscription, inbox)))
        },
    ));

    stream::once(async move { snapshot })
        .chain(deliveries)
        .boxed_local()
}

/// Live feed of the caller's notifications as server-sent events.
///
/// The first `inbox` event carries the current inbox, then one
/// `notification` event per delivery. The hub subscription is released
/// when the client disconnects.
#[web::get("/stream")]
async fn stream_notifications(
    logged_user: models::user_app::User,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let subscription = app_state.notification_hub.subscribe(logged_user.id);
    let inbox = api::notification::load_inbox(&app_state.repo, logged_user.id).await?;

    Ok(web::HttpResponse::Ok()
        .content_type("text/event-stream")
        .header("cache-control", "no-cache")
        .streaming(inbox_events(subscription, inbox)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sse_frame() {
        let frame = sse_frame(
            "notification",
            &InboxEvent {
                notification: None,
                unread: 2,
            },
        )
        .unwrap();

        assert_eq!(
            frame,
            Bytes::from("event: notification\ndata: {\"notification\":null,\"unread\":2}\n\n")
        );
    }

    fn notification_for(user_id: i64, id: i64) -> models::notification::Notification {
        models::notification::Notification {
            id,
            user_id,
            ..Default::default()
        }
    }

    fn frame_text(frame: Option<Result<Bytes, std::io::Error>>) -> String {
        String::from_utf8(frame.unwrap().unwrap().to_vec()).unwrap()
    }

    #[ntex::test]
    async fn test_inbox_events_snapshot_then_deliveries() {
        let hub = services::notification::NotificationHub::new(16);
        let inbox = api::notification::NotificationInbox::with_unread(
            vec![notification_for(1, 1)],
            3,
        );
        let mut events = inbox_events(hub.subscribe(1), inbox);
        assert_eq!(hub.active_subscriptions(), 1);

        let snapshot = frame_text(events.next().await);
        assert!(snapshot.starts_with("event: inbox\ndata: "));
        assert!(snapshot.contains("\"unread\":3"));

        hub.publish(notification_for(2, 5));
        hub.publish(notification_for(1, 6));

        let delivery = frame_text(events.next().await);
        assert!(delivery.starts_with("event: notification\ndata: "));
        assert!(delivery.contains("\"id\":6"));
        assert!(delivery.contains("\"unread\":4"));

        drop(events);
        assert_eq!(hub.active_subscriptions(), 0);
        assert_eq!(hub.publish(notification_for(1, 7)), 0);
    }

    #[ntex::test]
    async fn test_inbox_events_ends_when_hub_dropped() {
        let hub = services::notification::NotificationHub::new(16);
        let mut events = inbox_events(hub.subscribe(1), Default::default());

        assert!(frame_text(events.next().await).starts_with("event: inbox"));
        drop(hub);
        assert!(events.next().await.is_none());
    }
}
