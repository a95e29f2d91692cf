use ntex::web;
use serde::Deserialize;
use serde_json::json;

use crate::{api, front::AppState};

#[derive(Deserialize, Debug, Default)]
pub struct CityQuery {
    pub city: Option<String>,
}

/// Reference vet directory, optionally for one city
#[web::get("/vets")]
async fn list_vets(
    query: web::types::Query<CityQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let vets = api::vet::list_vets(&app_state.repo, query.into_inner().city).await?;

    Ok(web::HttpResponse::Ok().json(&vets))
}

/// Clinics near `?lat=&lng=` from the places provider
#[web::get("/api/nearby-vets")]
async fn nearby_vets(
    query: web::types::Query<api::vet::NearbyQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let vets = api::vet::search_nearby_vets(&app_state.nearby_search_service, &query).await?;

    Ok(web::HttpResponse::Ok().json(&json!({ "vets": vets })))
}
