use crate::config;
use anyhow::Context;
use serde::Deserialize;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
};
use std::str::FromStr;

/// Vet reference entry as written in the seed file
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct VetSeed {
    pub name: String,
    pub city: String,
    pub area: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub emergency_available: bool,
    pub rating: Option<f64>,
    pub total_reviews: Option<i64>,
}

const QUERY_INSERT_VET: &str = r#"
INSERT INTO vets(name,city,area,address,phone,services,emergency_available,rating,total_reviews)
VALUES($1,$2,$3,$4,$5,$6,$7,$8,$9);
"#;

pub async fn run_migrations(db_pool: &sqlx::SqlitePool, file_name: &str) -> anyhow::Result<()> {
    let mut tera = tera::Tera::new("../migrations/**/*.sql")?;
    tera.autoescape_on(vec![".sql"]);

    let create_tables_query = tera.render(file_name, &tera::Context::new())?;

    sqlx::raw_sql(&create_tables_query).execute(db_pool).await?;
    Ok(())
}

pub fn parse_vets(raw: &str) -> anyhow::Result<Vec<VetSeed>> {
    let vets: Vec<VetSeed> = serde_json::from_str(raw).context("invalid vets seed file")?;

    if let Some(vet) = vets
        .iter()
        .find(|vet| vet.name.trim().is_empty() || vet.city.trim().is_empty())
    {
        anyhow::bail!("every vet needs a name and a city: {vet:?}");
    }

    Ok(vets)
}

pub fn read_vets_file(path: &str) -> anyhow::Result<Vec<VetSeed>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("cant read {path}"))?;

    parse_vets(&raw)
}

/// Inserts every vet in one transaction
pub async fn seed_vets(db_pool: &SqlitePool, vets: &[VetSeed]) -> anyhow::Result<u64> {
    let mut transaction = db_pool.begin().await?;
    let mut inserted = 0;

    for vet in vets {
        inserted += sqlx::query(QUERY_INSERT_VET)
            .bind(vet.name.trim())
            .bind(vet.city.trim())
            .bind(&vet.area)
            .bind(&vet.address)
            .bind(&vet.phone)
            .bind(serde_json::to_string(&vet.services)?)
            .bind(vet.emergency_available)
            .bind(vet.rating)
            .bind(vet.total_reviews)
            .execute(&mut *transaction)
            .await?
            .rows_affected();
    }

    transaction.commit().await?;
    Ok(inserted)
}

pub async fn setup_sqlite_db_pool(encrypted: bool) -> anyhow::Result<SqlitePool> {
    if encrypted {
        return Ok(SqlitePool::connect_with(
            SqliteConnectOptions::from_str(&config::APP_CONFIG.db_host)?
                .pragma("key", &config::APP_CONFIG.db_pass_encrypt)
                .pragma("cipher_page_size", "1024")
                .pragma("kdf_iter", "64000")
                .pragma("cipher_hmac_algorithm", "HMAC_SHA1")
                .pragma("cipher_kdf_algorithm", "PBKDF2_HMAC_SHA1")
                .pragma("foreign_keys", "ON")
                .journal_mode(SqliteJournalMode::Delete),
        )
        .await?);
    }

    Ok(SqlitePool::connect_with(
        SqliteConnectOptions::from_str(&config::APP_CONFIG.db_host)?.pragma("foreign_keys", "ON"),
    )
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

    const VETS_JSON: &str = r#"[
        {"name": "Paws Clinic", "city": "Pune", "services": ["Surgery", "Vaccination"],
         "emergency_available": true, "rating": 4.6, "total_reviews": 120},
        {"name": "City Vet", "city": "Mumbai", "area": "Bandra"}
    ]"#;

    #[test]
    fn test_parse_vets() {
        let vets = parse_vets(VETS_JSON).unwrap();

        assert_eq!(vets.len(), 2);
        assert_eq!(vets[0].services, vec!["Surgery", "Vaccination"]);
        assert!(!vets[1].emergency_available);
        assert_eq!(vets[1].rating, None);
    }

    #[test]
    fn test_parse_vets_requires_city() {
        assert!(parse_vets(r#"[{"name": "No City", "city": " "}]"#).is_err());
    }

    #[tokio::test]
    async fn test_seed_vets() {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::raw_sql(SCHEMA).execute(&db_pool).await.unwrap();

        let inserted = seed_vets(&db_pool, &parse_vets(VETS_JSON).unwrap())
            .await
            .unwrap();
        let services: String =
            sqlx::query_scalar("SELECT services FROM vets WHERE name='Paws Clinic'")
                .fetch_one(&db_pool)
                .await
                .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(services, r#"["Surgery","Vaccination"]"#);
    }
}
