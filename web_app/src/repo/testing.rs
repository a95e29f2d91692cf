//! In-memory SQLite fixtures for repository and workflow tests.

use crate::models;
use chrono::{DateTime, Duration, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use super::{AppRepo, sqlite::SqlxSqliteRepo};

const SCHEMA: &str = include_str!("../../../migrations/0001_init.sql");

/// Repo over a fresh in-memory database holding the full schema.
///
/// A single connection that never expires keeps the database alive for the
/// whole test.
pub async fn setup_test_repo() -> SqlxSqliteRepo {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    sqlx::raw_sql(SCHEMA).execute(&db_pool).await.unwrap();

    SqlxSqliteRepo { db_pool }
}

/// Timestamp `minutes` in the past, used to give fixtures a stable order
pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(minutes)
}

pub async fn seed_user(repo: &SqlxSqliteRepo, email: &str) -> i64 {
    repo.insert_user_app(&models::user_app::User::create_default_from_email(email))
        .await
        .unwrap()
}

pub fn pet_fixture(slug: &str, owner_id: Option<i64>) -> models::pet::Pet {
    let mut name = slug.to_string();
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    models::pet::Pet {
        id: 0,
        slug: slug.to_string(),
        name,
        pet_type: models::pet::PetType::Dog,
        breed: "Labrador".into(),
        age: "3 years".into(),
        gender: models::pet::Gender::Male,
        personality: vec!["Playful".into(), "Friendly".into()],
        image_url: Some(format!("https://cdn.test/{slug}.png")),
        owner_id,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        ..Default::default()
    }
}

pub async fn seed_pet(repo: &SqlxSqliteRepo, slug: &str, owner_id: Option<i64>) -> i64 {
    repo.insert_pet(&pet_fixture(slug, owner_id)).await.unwrap()
}

pub fn application_fixture(
    pet_id: i64,
    user_id: Option<i64>,
    email: &str,
    created_at: DateTime<Utc>,
) -> models::adoption::AdoptionApplication {
    models::adoption::AdoptionApplication {
        id: 0,
        user_id,
        pet_id,
        full_name: "Asha Rao".into(),
        email: email.to_string(),
        phone: "+919876543210".into(),
        address: "12 MG Road, Bengaluru".into(),
        housing_type: models::adoption::HousingType::House,
        has_yard: true,
        has_other_pets: false,
        experience: Some("Grew up with dogs".into()),
        why_adopt: "We have room and time for a companion".into(),
        status: models::adoption::ApplicationStatus::Pending,
        created_at,
        updated_at: created_at,
    }
}

pub async fn seed_application(
    repo: &SqlxSqliteRepo,
    pet_id: i64,
    user_id: Option<i64>,
    email: &str,
    created_at: DateTime<Utc>,
) -> i64 {
    repo.insert_adoption_application(&application_fixture(pet_id, user_id, email, created_at))
        .await
        .unwrap()
}
