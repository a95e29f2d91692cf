//! Nearby veterinary clinics from the Google Places nearby-search endpoint.

use crate::{consts, models, utils};
use anyhow::{Context, bail};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Clone)]
pub struct GooglePlacesHandler {
    /// Server held key; requests fail when it is missing
    pub api_key: Option<String>,
    pub radius_meters: u32,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    vicinity: Option<String>,
    formatted_address: Option<String>,
    geometry: Option<PlaceGeometry>,
    rating: Option<f64>,
    user_ratings_total: Option<i64>,
    opening_hours: Option<PlaceOpeningHours>,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: Option<PlaceLocation>,
}

#[derive(Debug, Deserialize)]
struct PlaceLocation {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct PlaceOpeningHours {
    open_now: Option<bool>,
}

impl From<PlaceResult> for models::vet::NearbyVet {
    fn from(place: PlaceResult) -> Self {
        let location = place.geometry.and_then(|g| g.location);

        Self {
            id: place.place_id.clone(),
            name: place.name,
            address: place
                .vicinity
                .or(place.formatted_address)
                .unwrap_or_else(|| "No address".to_string()),
            lat: location.as_ref().map(|l| l.lat),
            lng: location.as_ref().map(|l| l.lng),
            rating: place.rating,
            user_ratings_total: place.user_ratings_total,
            open_now: place.opening_hours.and_then(|h| h.open_now),
            place_id: place.place_id,
        }
    }
}

/// Maps a nearby-search body to clinics. Any status other than `OK` or
/// `ZERO_RESULTS` is an error carrying the upstream message, or the status.
fn parse_places_response(body: &str) -> anyhow::Result<Vec<models::vet::NearbyVet>> {
    let response: PlacesResponse =
        serde_json::from_str(body).context("invalid nearby search response")?;

    if response.status != "OK" && response.status != "ZERO_RESULTS" {
        logfire::error!("places_error={status}", status = response.status.clone());
        bail!(response.error_message.unwrap_or(response.status))
    }

    Ok(response.results.into_iter().map(Into::into).collect())
}

#[async_trait]
impl crate::services::NearbySearchService for GooglePlacesHandler {
    async fn search_nearby_vets(
        &self,
        lat: f64,
        lng: f64,
    ) -> anyhow::Result<Vec<models::vet::NearbyVet>> {
        let Some(api_key) = &self.api_key else {
            bail!("Server missing GOOGLE_PLACES_API_KEY")
        };

        let body = utils::REQUEST_CLIENT
            .get(consts::PLACES_NEARBY_ENDPOINT)
            .query(&[
                ("location", format!("{lat},{lng}")),
                ("radius", self.radius_meters.to_string()),
                ("keyword", consts::PLACES_NEARBY_KEYWORD.to_string()),
                ("type", consts::PLACES_NEARBY_TYPE.to_string()),
                ("key", api_key.to_string()),
            ])
            .send()
            .await?
            .text()
            .await?;

        parse_places_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::NearbySearchService;

    #[test]
    fn test_parse_places_response_maps_fields() {
        let body = r#"{
            "status": "OK",
            "results": [
                {
                    "place_id": "abc",
                    "name": "Paws Clinic",
                    "vicinity": "MG Road",
                    "geometry": {"location": {"lat": 12.97, "lng": 77.59}},
                    "rating": 4.5,
                    "user_ratings_total": 120,
                    "opening_hours": {"open_now": true}
                },
                {
                    "place_id": "def",
                    "name": "Happy Tails",
                    "formatted_address": "1 Park Street"
                },
                {
                    "place_id": "ghi",
                    "name": "Corner Vet"
                }
            ]
        }"#;

        let vets = parse_places_response(body).unwrap();

        assert_eq!(vets.len(), 3);
        assert_eq!(vets[0].id, "abc");
        assert_eq!(vets[0].place_id, "abc");
        assert_eq!(vets[0].address, "MG Road");
        assert_eq!(vets[0].lat, Some(12.97));
        assert_eq!(vets[0].open_now, Some(true));
        assert_eq!(vets[1].address, "1 Park Street");
        assert_eq!(vets[1].lat, None);
        assert_eq!(vets[2].address, "No address");
    }

    #[test]
    fn test_parse_places_response_zero_results() {
        let vets = parse_places_response(r#"{"status": "ZERO_RESULTS", "results": []}"#).unwrap();

        assert!(vets.is_empty());
    }

    #[test]
    fn test_parse_places_response_upstream_error() {
        let with_message = parse_places_response(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
        )
        .unwrap_err();
        let without_message =
            parse_places_response(r#"{"status": "OVER_QUERY_LIMIT"}"#).unwrap_err();

        assert_eq!(with_message.to_string(), "The provided API key is invalid.");
        assert_eq!(without_message.to_string(), "OVER_QUERY_LIMIT");
    }

    #[test]
    fn test_nearby_vet_serializes_camel_case() {
        let vet = models::vet::NearbyVet {
            id: "abc".into(),
            user_ratings_total: Some(3),
            open_now: Some(false),
            place_id: "abc".into(),
            ..Default::default()
        };

        let value = serde_json::to_value(&vet).unwrap();

        assert_eq!(value["userRatingsTotal"], 3);
        assert_eq!(value["openNow"], false);
        assert_eq!(value["placeId"], "abc");
    }

    #[ntex::test]
    async fn test_missing_api_key_fails_before_request() {
        let handler = GooglePlacesHandler {
            api_key: None,
            radius_meters: consts::DEFAULT_NEARBY_RADIUS_METERS,
        };

        let err = handler.search_nearby_vets(12.9, 77.5).await.unwrap_err();

        assert_eq!(err.to_string(), "Server missing GOOGLE_PLACES_API_KEY");
    }
}
