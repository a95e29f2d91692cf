//! # Vet API Module
//!
//! The reference vet directory and the nearby clinic search.

use crate::{models, repo, services};
use serde::Deserialize;

use super::errors::{AppError, AppResult};

/// Directory entries, best rated first. `city` matches case-insensitively;
/// an empty value lists every city.
pub async fn list_vets(
    repo: &repo::ImplAppRepo,
    city: Option<String>,
) -> AppResult<Vec<models::vet::Vet>> {
    let city = city
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    Ok(repo.get_vets(city).await?)
}

/// Query of the nearby search; both coordinates are required
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Clinics around the given coordinates.
///
/// # Errors
/// * [`AppError::Validation`] - `lat` or `lng` missing
/// * [`AppError::Persistence`] - the search provider failed or is not configured
pub async fn search_nearby_vets(
    nearby_search_service: &services::ImplNearbySearchService,
    query: &NearbyQuery,
) -> AppResult<Vec<models::vet::NearbyVet>> {
    let (Some(lat), Some(lng)) = (query.lat, query.lng) else {
        return Err(AppError::Validation("Missing lat/lng".into()));
    };

    nearby_search_service
        .search_nearby_vets(lat, lng)
        .await
        .map_err(|err| AppError::Persistence {
            code: None,
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::MockAppRepo;
    use crate::services::MockNearbySearchService;
    use anyhow::anyhow;
    use mockall::predicate::*;

    #[ntex::test]
    async fn test_list_vets_blank_city_lists_all() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_vets()
            .with(eq(None::<String>))
            .times(1)
            .returning(|_| Ok(vec![models::vet::Vet::default()]));
        let mock_repo: Box<dyn repo::AppRepo> = Box::new(mock_repo);

        let vets = list_vets(&mock_repo, Some("  ".into())).await.unwrap();

        assert_eq!(vets.len(), 1);
    }

    #[ntex::test]
    async fn test_nearby_requires_both_coordinates() {
        let mut mock_search = MockNearbySearchService::new();
        mock_search.expect_search_nearby_vets().times(0);
        let mock_search: Box<dyn services::NearbySearchService> = Box::new(mock_search);

        let result = search_nearby_vets(
            &mock_search,
            &NearbyQuery {
                lat: Some(12.9),
                lng: None,
            },
        )
        .await;

        assert_eq!(result, Err(AppError::Validation("Missing lat/lng".into())));
    }

    #[ntex::test]
    async fn test_nearby_provider_error_message_is_kept() {
        let mut mock_search = MockNearbySearchService::new();
        mock_search
            .expect_search_nearby_vets()
            .with(eq(12.9), eq(77.5))
            .times(1)
            .returning(|_, _| Err(anyhow!("REQUEST_DENIED")));
        let mock_search: Box<dyn services::NearbySearchService> = Box::new(mock_search);

        let result = search_nearby_vets(
            &mock_search,
            &NearbyQuery {
                lat: Some(12.9),
                lng: Some(77.5),
            },
        )
        .await;

        assert_eq!(
            result,
            Err(AppError::Persistence {
                code: None,
                message: "REQUEST_DENIED".into()
            })
        );
    }
}
