use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("pet_adopt_statds")
        .with_description("Pet adoption app statistics")
        .with_unit("attempt")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

pub fn incr_user_action_statds(action: &str) {
    incr_statds("user_action".to_string(), action.into())
}

pub fn incr_adoption_action_statds(action: &str) {
    incr_statds("adoption_action".to_string(), action.into())
}

pub fn incr_favorite_action_statds(action: &str) {
    incr_statds("favorite_action".to_string(), action.into())
}

pub fn incr_notification_action_statds(action: &str) {
    incr_statds("notification_action".to_string(), action.into())
}
