use std::path::Path;

use anyhow::bail;
use futures::TryStreamExt;
use ntex::web;

use crate::{
    api, consts,
    front::{AppState, errors, forms, middleware, utils},
    models,
};

fn get_header_str_value(headers: &ntex::http::HeaderMap, key: &str) -> String {
    let default_header_value = ntex::http::header::HeaderValue::from_static("");

    headers
        .get(key)
        .unwrap_or(&default_header_value)
        .to_str()
        .unwrap_or_default()
        .to_string()
}

/// Value of a `key="value"` parameter of a content disposition header
fn get_disposition_param(content_disposition: &str, key: &str) -> Option<String> {
    let prefix = format!("{key}=");

    content_disposition
        .split(';')
        .map(str::trim)
        .find(|section| section.starts_with(&prefix))
        .map(|section| section[prefix.len()..].trim_matches('"').to_string())
}

fn get_filename_extension(content_disposition: &str) -> anyhow::Result<String> {
    let filename = get_disposition_param(content_disposition, "filename").unwrap_or_default();

    if let Some(extension) = Path::new(&filename).extension().and_then(|ext| ext.to_str()) {
        return Ok(extension.trim().to_lowercase());
    }

    bail!("filename extension couldnt be found in the request content_disposition form")
}

fn set_form_field(form: &mut forms::pet::NewPetForm, name: &str, value: String) {
    match name {
        "slug" => form.slug = value,
        "name" => form.name = value,
        "type" | "pet_type" => form.pet_type = value,
        "breed" => form.breed = value,
        "age" => form.age = value,
        "gender" => form.gender = value,
        "weight" => form.weight = value,
        "color" => form.color = value,
        "location" => form.location = value,
        "description" => form.description = value,
        "health_status" => form.health_status = value,
        "vaccinated" => form.vaccinated = value,
        "neutered" => form.neutered = value,
        "personality" => form.personality = value,
        _ => {}
    }
}

async fn deserialize_pet_form(
    mut payload: ntex_multipart::Multipart,
) -> anyhow::Result<forms::pet::NewPetForm> {
    let mut form = forms::pet::NewPetForm::default();

    while let Ok(Some(field)) = payload.try_next().await {
        let content_disposition = get_header_str_value(field.headers(), "content-disposition");
        let Some(name) = get_disposition_param(&content_disposition, "name") else {
            continue;
        };

        if name == "image" {
            if !field.content_type().essence_str().contains("image") {
                bail!("the uploaded file is not an image")
            }

            let body = utils::get_bytes_value(field).await;
            if body.len() > consts::PIC_PET_MAX_SIZE_BYTES {
                bail!(
                    "image is to big. max size: {}",
                    consts::PIC_PET_MAX_SIZE_BYTES
                )
            }

            form.image = Some(models::Pic {
                filename_extension: get_filename_extension(&content_disposition)?,
                body,
            });

            continue;
        }

        let field_value = ammonia::clean(&utils::get_field_value(field).await);
        set_form_field(&mut form, &name, field_value);
    }

    Ok(form)
}

/// Pets listed for adoption, `?search=&type=&gender=` narrow the list
#[web::get("")]
async fn list_pets(
    logged_user: middleware::logged_user::MaybeLoggedUser,
    filter: web::types::Query<api::pet::PetFilter>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let pets = api::pet::list_pets(&app_state.repo, logged_user.user_id(), &filter).await?;

    Ok(web::HttpResponse::Ok().json(&pets))
}

#[web::get("/{slug}")]
async fn get_pet_detail(
    logged_user: middleware::logged_user::MaybeLoggedUser,
    path: web::types::Path<String>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let pet = api::pet::get_pet_detail(&app_state.repo, logged_user.user_id(), &path).await?;

    Ok(web::HttpResponse::Ok().json(&pet))
}

/// Lists a new pet for adoption, the caller becomes its owner
#[web::post("/new")]
async fn create_pet(
    _: middleware::csrf_token::CsrfToken,
    logged_user: models::user_app::User,
    app_state: web::types::State<AppState>,
    payload: ntex_multipart::Multipart,
) -> Result<impl web::Responder, web::Error> {
    let form = deserialize_pet_form(payload)
        .await
        .map_err(|e| errors::UserError::FormInputValueError(e.to_string()))?;

    let pet = api::pet::create_pet(
        &app_state.repo,
        &app_state.storage_service,
        logged_user.id,
        form,
    )
    .await?;

    Ok(web::HttpResponse::Created().json(&pet))
}
