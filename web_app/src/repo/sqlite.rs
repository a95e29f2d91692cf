use crate::models;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    FromRow, QueryBuilder, Row, Sqlite, SqlitePool,
    query::Query,
    sqlite::{SqliteArguments, SqliteRow},
};

use super::{AppRepo, ApprovalOutcome, ApprovalRequest, sqlite_queries};

#[derive(Clone)]
pub struct SqlxSqliteRepo {
    pub db_pool: SqlitePool,
}

impl FromRow<'_, SqliteRow> for models::user_app::User {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            is_enabled: row.try_get("is_enabled")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::pet::Pet {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            slug: row.try_get("slug")?,
            name: row.try_get("name")?,
            pet_type: row
                .try_get::<String, &str>("pet_type")?
                .parse()
                .unwrap_or_default(),
            breed: row.try_get("breed")?,
            age: row.try_get("age")?,
            gender: row
                .try_get::<String, &str>("gender")?
                .parse()
                .unwrap_or_default(),
            weight: row.try_get("weight")?,
            color: row.try_get("color")?,
            location: row.try_get("location")?,
            description: row.try_get("description")?,
            health_status: row.try_get("health_status")?,
            vaccinated: row.try_get("vaccinated")?,
            neutered: row.try_get("neutered")?,
            personality: serde_json::from_str(row.try_get::<&str, &str>("personality")?)
                .unwrap_or_default(),
            image_url: row.try_get("image_url")?,
            owner_id: row.try_get("owner_id")?,
            is_adopted: row.try_get("is_adopted")?,
            adopted_by: row.try_get("adopted_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::pet::PetSummary {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            slug: row.try_get("slug")?,
            name: row.try_get("name")?,
            breed: row.try_get("breed")?,
            age: row.try_get("age")?,
            gender: row
                .try_get::<String, &str>("gender")?
                .parse()
                .unwrap_or_default(),
            image_url: row.try_get("image_url")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::adoption::AdoptionApplication {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            pet_id: row.try_get("pet_id")?,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            housing_type: row
                .try_get::<String, &str>("housing_type")?
                .parse()
                .unwrap_or_default(),
            has_yard: row.try_get("has_yard")?,
            has_other_pets: row.try_get("has_other_pets")?,
            experience: row.try_get("experience")?,
            why_adopt: row.try_get("why_adopt")?,
            status: row
                .try_get::<String, &str>("status")?
                .parse()
                .unwrap_or_default(),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::adoption::ApplicationWithPet {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let application = models::adoption::AdoptionApplication::from_row(row)?;
        let pet = joined_pet_summary(row, application.pet_id)?;

        Ok(Self { application, pet })
    }
}

impl FromRow<'_, SqliteRow> for models::favorite::FavoriteWithPet {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let pet_id = row.try_get("pet_id")?;

        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            pet_id,
            created_at: row.try_get("created_at")?,
            pet: joined_pet_summary(row, pet_id)?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::notification::Notification {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            notification_type: row
                .try_get::<String, &str>("notification_type")?
                .parse()
                .unwrap_or_default(),
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            is_read: row.try_get("is_read")?,
            metadata: serde_json::from_str(row.try_get::<&str, &str>("metadata")?)
                .unwrap_or_default(),
            created_at: row.try_get("created_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::vet::Vet {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            city: row.try_get("city")?,
            area: row.try_get("area")?,
            address: row.try_get("address")?,
            phone: row.try_get("phone")?,
            services: serde_json::from_str(row.try_get::<&str, &str>("services")?)
                .unwrap_or_default(),
            emergency_available: row.try_get("emergency_available")?,
            rating: row.try_get("rating")?,
            total_reviews: row.try_get("total_reviews")?,
        })
    }
}

/// Reads the `pet_*` columns of a `LEFT JOIN pets`; `None` when no pet matched
fn joined_pet_summary(
    row: &SqliteRow,
    pet_id: i64,
) -> sqlx::Result<Option<models::pet::PetSummary>> {
    let Some(name) = row.try_get::<Option<String>, &str>("pet_name")? else {
        return Ok(None);
    };

    Ok(Some(models::pet::PetSummary {
        id: pet_id,
        slug: row.try_get("pet_slug")?,
        name,
        breed: row.try_get("pet_breed")?,
        age: row.try_get("pet_age")?,
        gender: row
            .try_get::<String, &str>("pet_gender")?
            .parse()
            .unwrap_or_default(),
        image_url: row.try_get("pet_image_url")?,
    }))
}

fn insert_notification_query(
    notification: &models::notification::Notification,
) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    sqlx::query(sqlite_queries::QUERY_INSERT_NOTIFICATION)
        .bind(notification.user_id)
        .bind(notification.notification_type.to_string())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(notification.metadata.to_string())
        .bind(notification.created_at)
}

#[async_trait]
impl AppRepo for SqlxSqliteRepo {
    async fn get_user_app_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<models::user_app::User>> {
        Ok(
            sqlx::query_as::<_, models::user_app::User>(
                sqlite_queries::QUERY_GET_USER_APP_BY_EMAIL,
            )
            .bind(email)
            .fetch_optional(&self.db_pool)
            .await?,
        )
    }

    async fn insert_user_app(&self, app_user: &models::user_app::User) -> anyhow::Result<i64> {
        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_USER_APP)
            .bind(&app_user.email)
            .bind(app_user.is_enabled)
            .bind(app_user.created_at)
            .bind(app_user.updated_at)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid())
    }

    async fn insert_pet(&self, pet: &models::pet::Pet) -> anyhow::Result<i64> {
        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_PET)
            .bind(&pet.slug)
            .bind(&pet.name)
            .bind(pet.pet_type.to_string())
            .bind(&pet.breed)
            .bind(&pet.age)
            .bind(pet.gender.to_string())
            .bind(&pet.weight)
            .bind(&pet.color)
            .bind(&pet.location)
            .bind(&pet.description)
            .bind(&pet.health_status)
            .bind(&pet.vaccinated)
            .bind(&pet.neutered)
            .bind(serde_json::to_string(&pet.personality)?)
            .bind(&pet.image_url)
            .bind(pet.owner_id)
            .bind(pet.is_adopted)
            .bind(pet.adopted_by)
            .bind(pet.created_at)
            .bind(pet.updated_at)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid())
    }

    async fn get_pet_by_id(&self, pet_id: i64) -> anyhow::Result<Option<models::pet::Pet>> {
        Ok(
            sqlx::query_as::<_, models::pet::Pet>(sqlite_queries::QUERY_GET_PET_BY_ID)
                .bind(pet_id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn get_pet_by_slug(&self, slug: &str) -> anyhow::Result<Option<models::pet::Pet>> {
        Ok(
            sqlx::query_as::<_, models::pet::Pet>(sqlite_queries::QUERY_GET_PET_BY_SLUG)
                .bind(slug)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn get_all_pets(&self) -> anyhow::Result<Vec<models::pet::Pet>> {
        Ok(
            sqlx::query_as::<_, models::pet::Pet>(sqlite_queries::QUERY_GET_ALL_PETS)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn get_owned_pet_ids(&self, owner_id: i64) -> anyhow::Result<Vec<i64>> {
        Ok(
            sqlx::query_scalar::<_, i64>(sqlite_queries::QUERY_GET_OWNED_PET_IDS)
                .bind(owner_id)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn get_pet_summaries_by_ids(
        &self,
        pet_ids: &[i64],
    ) -> anyhow::Result<Vec<models::pet::PetSummary>> {
        if pet_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new(sqlite_queries::QUERY_GET_PET_SUMMARIES_BY_IDS_PREFIX);
        builder.push("(");
        let mut separated = builder.separated(",");
        for pet_id in pet_ids {
            separated.push_bind(*pet_id);
        }
        separated.push_unseparated(")");

        Ok(builder
            .build_query_as::<models::pet::PetSummary>()
            .fetch_all(&self.db_pool)
            .await?)
    }

    async fn insert_adoption_application(
        &self,
        application: &models::adoption::AdoptionApplication,
    ) -> anyhow::Result<i64> {
        Ok(
            sqlx::query(sqlite_queries::QUERY_INSERT_ADOPTION_APPLICATION)
                .bind(application.user_id)
                .bind(application.pet_id)
                .bind(&application.full_name)
                .bind(&application.email)
                .bind(&application.phone)
                .bind(&application.address)
                .bind(application.housing_type.to_string())
                .bind(application.has_yard)
                .bind(application.has_other_pets)
                .bind(&application.experience)
                .bind(&application.why_adopt)
                .bind(application.status.to_string())
                .bind(application.created_at)
                .bind(application.updated_at)
                .execute(&self.db_pool)
                .await?
                .last_insert_rowid(),
        )
    }

    async fn get_application_by_id(
        &self,
        application_id: i64,
    ) -> anyhow::Result<Option<models::adoption::AdoptionApplication>> {
        Ok(sqlx::query_as::<_, models::adoption::AdoptionApplication>(
            sqlite_queries::QUERY_GET_APPLICATION_BY_ID,
        )
        .bind(application_id)
        .fetch_optional(&self.db_pool)
        .await?)
    }

    async fn find_applicant_application(
        &self,
        pet_id: i64,
        user_id: Option<i64>,
        email: &str,
    ) -> anyhow::Result<Option<models::adoption::AdoptionApplication>> {
        Ok(sqlx::query_as::<_, models::adoption::AdoptionApplication>(
            sqlite_queries::QUERY_FIND_APPLICANT_APPLICATION,
        )
        .bind(pet_id)
        .bind(user_id)
        .bind(email)
        .fetch_optional(&self.db_pool)
        .await?)
    }

    async fn get_latest_user_application(
        &self,
        user_id: i64,
    ) -> anyhow::Result<Option<models::adoption::AdoptionApplication>> {
        Ok(sqlx::query_as::<_, models::adoption::AdoptionApplication>(
            sqlite_queries::QUERY_GET_LATEST_USER_APPLICATION,
        )
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?)
    }

    async fn get_user_applications(
        &self,
        user_id: i64,
    ) -> anyhow::Result<Vec<models::adoption::ApplicationWithPet>> {
        Ok(sqlx::query_as::<_, models::adoption::ApplicationWithPet>(
            sqlite_queries::QUERY_GET_USER_APPLICATIONS_WITH_PET,
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn get_received_applications(
        &self,
        owner_id: i64,
        status: Option<models::adoption::ApplicationStatus>,
    ) -> anyhow::Result<Vec<models::adoption::ApplicationWithPet>> {
        Ok(sqlx::query_as::<_, models::adoption::ApplicationWithPet>(
            sqlite_queries::QUERY_GET_RECEIVED_APPLICATIONS_WITH_PET,
        )
        .bind(owner_id)
        .bind(status.map(|s| s.to_string()))
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn get_applications_by_pet_ids(
        &self,
        pet_ids: &[i64],
        status: Option<models::adoption::ApplicationStatus>,
    ) -> anyhow::Result<Vec<models::adoption::AdoptionApplication>> {
        if pet_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new(sqlite_queries::QUERY_GET_APPLICATIONS_BY_PET_IDS_PREFIX);
        builder.push("(");
        let mut separated = builder.separated(",");
        for pet_id in pet_ids {
            separated.push_bind(*pet_id);
        }
        separated.push_unseparated(")");
        if let Some(status) = status {
            builder.push(" AND status=");
            builder.push_bind(status.to_string());
        }
        builder.push(" ORDER BY created_at DESC, id DESC");

        Ok(builder
            .build_query_as::<models::adoption::AdoptionApplication>()
            .fetch_all(&self.db_pool)
            .await?)
    }

    async fn approve_application(
        &self,
        request: &ApprovalRequest,
    ) -> anyhow::Result<ApprovalOutcome> {
        let now = Utc::now();
        let mut transaction = self.db_pool.begin().await?;

        let approved = sqlx::query(sqlite_queries::QUERY_APPROVE_PENDING_APPLICATION)
            .bind(request.application_id)
            .bind(now)
            .execute(&mut *transaction)
            .await?
            .rows_affected();
        if approved == 0 {
            transaction.rollback().await?;
            return Ok(ApprovalOutcome::ApplicationNotPending);
        }

        let adopted = sqlx::query(sqlite_queries::QUERY_MARK_PET_ADOPTED)
            .bind(request.pet_id)
            .bind(request.adopter_id)
            .bind(now)
            .execute(&mut *transaction)
            .await?
            .rows_affected();
        if adopted == 0 {
            transaction.rollback().await?;
            return Ok(ApprovalOutcome::PetAlreadyAdopted);
        }

        let rejected_siblings = sqlx::query(sqlite_queries::QUERY_REJECT_PENDING_SIBLINGS)
            .bind(request.pet_id)
            .bind(request.application_id)
            .bind(now)
            .execute(&mut *transaction)
            .await?
            .rows_affected();

        let notification = match &request.notification {
            Some(notification) => {
                let id = insert_notification_query(notification)
                    .execute(&mut *transaction)
                    .await?
                    .last_insert_rowid();
                Some(models::notification::Notification {
                    id,
                    ..notification.clone()
                })
            }
            None => None,
        };

        transaction.commit().await?;

        Ok(ApprovalOutcome::Approved {
            rejected_siblings,
            notification,
        })
    }

    async fn reject_application(&self, application_id: i64) -> anyhow::Result<bool> {
        Ok(
            sqlx::query(sqlite_queries::QUERY_REJECT_PENDING_APPLICATION)
                .bind(application_id)
                .bind(Utc::now())
                .execute(&self.db_pool)
                .await?
                .rows_affected()
                > 0,
        )
    }

    async fn delete_pending_application(
        &self,
        application_id: i64,
        user_id: i64,
    ) -> anyhow::Result<bool> {
        Ok(
            sqlx::query(sqlite_queries::QUERY_DELETE_PENDING_APPLICATION)
                .bind(application_id)
                .bind(user_id)
                .execute(&self.db_pool)
                .await?
                .rows_affected()
                > 0,
        )
    }

    async fn insert_favorite(&self, user_id: i64, pet_id: i64) -> anyhow::Result<()> {
        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_FAVORITE)
            .bind(user_id)
            .bind(pet_id)
            .bind(Utc::now())
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn delete_favorite(&self, user_id: i64, pet_id: i64) -> anyhow::Result<()> {
        Ok(sqlx::query(sqlite_queries::QUERY_DELETE_FAVORITE)
            .bind(user_id)
            .bind(pet_id)
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn is_pet_favorite(&self, user_id: i64, pet_id: i64) -> anyhow::Result<bool> {
        Ok(
            sqlx::query_scalar::<_, bool>(sqlite_queries::QUERY_IS_PET_FAVORITE)
                .bind(user_id)
                .bind(pet_id)
                .fetch_one(&self.db_pool)
                .await?,
        )
    }

    async fn get_user_favorite_pet_ids(&self, user_id: i64) -> anyhow::Result<Vec<i64>> {
        Ok(
            sqlx::query_scalar::<_, i64>(sqlite_queries::QUERY_GET_USER_FAVORITE_PET_IDS)
                .bind(user_id)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn get_user_favorites(
        &self,
        user_id: i64,
    ) -> anyhow::Result<Vec<models::favorite::FavoriteWithPet>> {
        Ok(sqlx::query_as::<_, models::favorite::FavoriteWithPet>(
            sqlite_queries::QUERY_GET_USER_FAVORITES_WITH_PET,
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn insert_notification(
        &self,
        notification: &models::notification::Notification,
    ) -> anyhow::Result<i64> {
        Ok(insert_notification_query(notification)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid())
    }

    async fn get_user_notifications(
        &self,
        user_id: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<models::notification::Notification>> {
        Ok(sqlx::query_as::<_, models::notification::Notification>(
            sqlite_queries::QUERY_GET_USER_NOTIFICATIONS,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn mark_notification_read(
        &self,
        user_id: i64,
        notification_id: i64,
    ) -> anyhow::Result<bool> {
        Ok(
            sqlx::query(sqlite_queries::QUERY_MARK_NOTIFICATION_READ)
                .bind(notification_id)
                .bind(user_id)
                .execute(&self.db_pool)
                .await?
                .rows_affected()
                > 0,
        )
    }

    async fn count_unread_notifications(&self, user_id: i64) -> anyhow::Result<i64> {
        Ok(
            sqlx::query_scalar::<_, i64>(sqlite_queries::QUERY_COUNT_UNREAD_NOTIFICATIONS)
                .bind(user_id)
                .fetch_one(&self.db_pool)
                .await?,
        )
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> anyhow::Result<u64> {
        Ok(
            sqlx::query(sqlite_queries::QUERY_MARK_ALL_NOTIFICATIONS_READ)
                .bind(user_id)
                .execute(&self.db_pool)
                .await?
                .rows_affected(),
        )
    }

    async fn get_vets(&self, city: Option<String>) -> anyhow::Result<Vec<models::vet::Vet>> {
        Ok(
            sqlx::query_as::<_, models::vet::Vet>(sqlite_queries::QUERY_GET_VETS)
                .bind(city)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::adoption::ApplicationStatus;
    use crate::repo::testing::*;

    #[ntex::test]
    async fn test_pet_roundtrip_keeps_personality_order() {
        let repo = setup_test_repo().await;
        let owner_id = seed_user(&repo, "owner@x.com").await;
        let pet_id = seed_pet(&repo, "max", Some(owner_id)).await;

        let pet = repo.get_pet_by_slug("max").await.unwrap().unwrap();

        assert_eq!(pet.id, pet_id);
        assert_eq!(pet.personality, vec!["Playful", "Friendly"]);
        assert_eq!(pet.gender, models::pet::Gender::Male);
        assert!(pet.is_owned_by(owner_id));
        assert!(repo.get_pet_by_slug("missing").await.unwrap().is_none());
    }

    #[ntex::test]
    async fn test_duplicate_slug_is_rejected_by_store() {
        let repo = setup_test_repo().await;
        seed_pet(&repo, "max", None).await;

        let err = repo.insert_pet(&pet_fixture("max", None)).await.unwrap_err();
        let db_err = err.downcast_ref::<sqlx::Error>().unwrap();

        assert!(matches!(db_err, sqlx::Error::Database(_)));
    }

    #[ntex::test]
    async fn test_application_for_missing_pet_violates_foreign_key() {
        let repo = setup_test_repo().await;

        let result = repo
            .insert_adoption_application(&application_fixture(999, None, "a@x.com", minutes_ago(0)))
            .await;

        assert!(result.is_err());
    }

    #[ntex::test]
    async fn test_find_applicant_application_by_user_or_email() {
        let repo = setup_test_repo().await;
        let user_id = seed_user(&repo, "a@x.com").await;
        let pet_id = seed_pet(&repo, "max", None).await;
        let app_id = seed_application(&repo, pet_id, Some(user_id), "a@x.com", minutes_ago(1)).await;

        let by_user = repo
            .find_applicant_application(pet_id, Some(user_id), "other@x.com")
            .await
            .unwrap();
        let by_email = repo
            .find_applicant_application(pet_id, None, "A@X.COM")
            .await
            .unwrap();
        let other = repo
            .find_applicant_application(pet_id, None, "b@x.com")
            .await
            .unwrap();

        assert_eq!(by_user.map(|a| a.id), Some(app_id));
        assert_eq!(by_email.map(|a| a.id), Some(app_id));
        assert!(other.is_none());
    }

    #[ntex::test]
    async fn test_user_applications_newest_first_with_pet() {
        let repo = setup_test_repo().await;
        let user_id = seed_user(&repo, "a@x.com").await;
        let max = seed_pet(&repo, "max", None).await;
        let luna = seed_pet(&repo, "luna", None).await;
        let older = seed_application(&repo, max, Some(user_id), "a@x.com", minutes_ago(10)).await;
        let newer = seed_application(&repo, luna, Some(user_id), "a@x.com", minutes_ago(1)).await;

        let apps = repo.get_user_applications(user_id).await.unwrap();

        assert_eq!(
            apps.iter().map(|a| a.application.id).collect::<Vec<_>>(),
            vec![newer, older]
        );
        assert_eq!(apps[0].pet.as_ref().map(|p| p.slug.as_str()), Some("luna"));
    }

    #[ntex::test]
    async fn test_received_applications_join_matches_two_step_fetch() {
        let repo = setup_test_repo().await;
        let owner_id = seed_user(&repo, "owner@x.com").await;
        let stranger_id = seed_user(&repo, "stranger@x.com").await;
        let owned = seed_pet(&repo, "max", Some(owner_id)).await;
        let not_owned = seed_pet(&repo, "luna", Some(stranger_id)).await;
        let app1 = seed_application(&repo, owned, None, "a@x.com", minutes_ago(5)).await;
        seed_application(&repo, not_owned, None, "b@x.com", minutes_ago(4)).await;
        repo.reject_application(app1).await.unwrap();
        let app2 = seed_application(&repo, owned, None, "c@x.com", minutes_ago(3)).await;

        let joined = repo.get_received_applications(owner_id, None).await.unwrap();
        let pending = repo
            .get_received_applications(owner_id, Some(ApplicationStatus::Pending))
            .await
            .unwrap();
        let pet_ids = repo.get_owned_pet_ids(owner_id).await.unwrap();
        let fetched = repo.get_applications_by_pet_ids(&pet_ids, None).await.unwrap();

        assert_eq!(
            joined.iter().map(|a| a.application.id).collect::<Vec<_>>(),
            vec![app2, app1]
        );
        assert_eq!(
            fetched.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![app2, app1]
        );
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].application.id, app2);
    }

    #[ntex::test]
    async fn test_approve_application_runs_all_effects() {
        let repo = setup_test_repo().await;
        let owner_id = seed_user(&repo, "owner@x.com").await;
        let applicant_id = seed_user(&repo, "a@x.com").await;
        let pet_id = seed_pet(&repo, "max", Some(owner_id)).await;
        let app1 = seed_application(&repo, pet_id, Some(applicant_id), "a@x.com", minutes_ago(3)).await;
        let app2 = seed_application(&repo, pet_id, None, "b@x.com", minutes_ago(2)).await;
        let pet = repo.get_pet_by_id(pet_id).await.unwrap().unwrap();

        let outcome = repo
            .approve_application(&ApprovalRequest {
                application_id: app1,
                pet_id,
                adopter_id: Some(applicant_id),
                notification: Some(models::notification::Notification::application_approved(
                    applicant_id,
                    &pet,
                    app1,
                )),
            })
            .await
            .unwrap();

        let ApprovalOutcome::Approved {
            rejected_siblings,
            notification,
        } = outcome
        else {
            panic!("expected approval, got {outcome:?}");
        };
        assert_eq!(rejected_siblings, 1);
        assert!(notification.is_some_and(|n| n.id > 0));

        let pet = repo.get_pet_by_id(pet_id).await.unwrap().unwrap();
        assert!(pet.is_adopted);
        assert_eq!(pet.adopted_by, Some(applicant_id));

        let app1 = repo.get_application_by_id(app1).await.unwrap().unwrap();
        let app2 = repo.get_application_by_id(app2).await.unwrap().unwrap();
        assert_eq!(app1.status, ApplicationStatus::Approved);
        assert_eq!(app2.status, ApplicationStatus::Rejected);

        let notifications = repo.get_user_notifications(applicant_id, 20).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].metadata["pet_slug"], "max");
    }

    #[ntex::test]
    async fn test_approve_rolls_back_when_pet_already_adopted() {
        let repo = setup_test_repo().await;
        let owner_id = seed_user(&repo, "owner@x.com").await;
        let pet_id = seed_pet(&repo, "max", Some(owner_id)).await;
        let app1 = seed_application(&repo, pet_id, None, "a@x.com", minutes_ago(3)).await;
        let app2 = seed_application(&repo, pet_id, None, "b@x.com", minutes_ago(2)).await;
        let app3 = seed_application(&repo, pet_id, None, "c@x.com", minutes_ago(1)).await;
        sqlx::query("UPDATE pets SET is_adopted=1 WHERE id=$1")
            .bind(pet_id)
            .execute(&repo.db_pool)
            .await
            .unwrap();

        let outcome = repo
            .approve_application(&ApprovalRequest {
                application_id: app1,
                pet_id,
                adopter_id: None,
                notification: None,
            })
            .await
            .unwrap();

        assert_eq!(outcome, ApprovalOutcome::PetAlreadyAdopted);
        for app_id in [app1, app2, app3] {
            let app = repo.get_application_by_id(app_id).await.unwrap().unwrap();
            assert_eq!(app.status, ApplicationStatus::Pending);
        }
    }

    #[ntex::test]
    async fn test_approve_non_pending_application() {
        let repo = setup_test_repo().await;
        let pet_id = seed_pet(&repo, "max", None).await;
        let app_id = seed_application(&repo, pet_id, None, "a@x.com", minutes_ago(1)).await;
        assert!(repo.reject_application(app_id).await.unwrap());

        let outcome = repo
            .approve_application(&ApprovalRequest {
                application_id: app_id,
                pet_id,
                adopter_id: None,
                notification: None,
            })
            .await
            .unwrap();

        assert_eq!(outcome, ApprovalOutcome::ApplicationNotPending);
        assert!(!repo.get_pet_by_id(pet_id).await.unwrap().unwrap().is_adopted);
        assert!(!repo.reject_application(app_id).await.unwrap());
    }

    #[ntex::test]
    async fn test_delete_pending_application_is_scoped_to_applicant() {
        let repo = setup_test_repo().await;
        let user_id = seed_user(&repo, "a@x.com").await;
        let other_id = seed_user(&repo, "b@x.com").await;
        let pet_id = seed_pet(&repo, "max", None).await;
        let app_id = seed_application(&repo, pet_id, Some(user_id), "a@x.com", minutes_ago(1)).await;

        assert!(!repo.delete_pending_application(app_id, other_id).await.unwrap());
        assert!(repo.delete_pending_application(app_id, user_id).await.unwrap());
        assert!(repo.get_application_by_id(app_id).await.unwrap().is_none());
    }

    #[ntex::test]
    async fn test_favorites_are_unique_per_user_and_pet() {
        let repo = setup_test_repo().await;
        let user_id = seed_user(&repo, "a@x.com").await;
        let pet_id = seed_pet(&repo, "max", None).await;

        repo.insert_favorite(user_id, pet_id).await.unwrap();
        repo.insert_favorite(user_id, pet_id).await.unwrap();

        assert_eq!(repo.get_user_favorite_pet_ids(user_id).await.unwrap(), vec![pet_id]);
        assert!(repo.is_pet_favorite(user_id, pet_id).await.unwrap());

        let favorites = repo.get_user_favorites(user_id).await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].pet.as_ref().map(|p| p.name.as_str()), Some("Max"));

        repo.delete_favorite(user_id, pet_id).await.unwrap();
        assert!(!repo.is_pet_favorite(user_id, pet_id).await.unwrap());
    }

    #[ntex::test]
    async fn test_mark_all_notifications_read_only_touches_own_rows() {
        let repo = setup_test_repo().await;
        let user_id = seed_user(&repo, "a@x.com").await;
        let other_id = seed_user(&repo, "b@x.com").await;
        let pet = pet_fixture("max", None);
        for application_id in 1..=3 {
            repo.insert_notification(&models::notification::Notification::application_approved(
                user_id,
                &pet,
                application_id,
            ))
            .await
            .unwrap();
        }
        let theirs = repo
            .insert_notification(&models::notification::Notification::application_approved(
                other_id, &pet, 4,
            ))
            .await
            .unwrap();
        assert_eq!(repo.count_unread_notifications(user_id).await.unwrap(), 3);

        let updated = repo.mark_all_notifications_read(user_id).await.unwrap();

        assert_eq!(updated, 3);
        assert_eq!(repo.count_unread_notifications(user_id).await.unwrap(), 0);
        assert_eq!(repo.count_unread_notifications(other_id).await.unwrap(), 1);
        assert!(!repo.mark_notification_read(user_id, theirs).await.unwrap());
        let others = repo.get_user_notifications(other_id, 20).await.unwrap();
        assert!(!others[0].is_read);
    }

    #[ntex::test]
    async fn test_get_vets_filters_city_case_insensitive() {
        let repo = setup_test_repo().await;
        sqlx::raw_sql(
            r#"
INSERT INTO vets(name,city,services,emergency_available,rating,total_reviews)
VALUES
    ('Paws Clinic','Bengaluru','["Vaccination"]',1,4.2,10),
    ('Happy Tails','Bengaluru','[]',0,4.8,30),
    ('Mumbai Vets','Mumbai','[]',0,4.9,5);
"#,
        )
        .execute(&repo.db_pool)
        .await
        .unwrap();

        let vets = repo.get_vets(Some("bengaluru".into())).await.unwrap();
        let all = repo.get_vets(None).await.unwrap();

        assert_eq!(
            vets.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            vec!["Happy Tails", "Paws Clinic"]
        );
        assert_eq!(vets[1].services, vec!["Vaccination"]);
        assert_eq!(all.len(), 3);
    }
}
