//! # Pet API Module
//!
//! Pet creation by an owner, the filtered listing, and the detail view.

use crate::{consts, front, models, repo, services};
use serde::{Deserialize, Serialize};

use super::errors::{AppError, AppResult};

/// URL slug from a pet name: lowercase, whitespace runs become `-`, anything
/// outside `[a-z0-9-]` is dropped.
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Comma separated tags, trimmed, empty ones dropped, order kept
pub fn parse_personality(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_age(raw: &str) -> AppResult<String> {
    let raw = raw.trim();
    let age = raw
        .parse::<f64>()
        .ok()
        .filter(|_| !raw.is_empty())
        .ok_or_else(|| AppError::Validation("Age is required".into()))?;

    if age.fract() != 0.0 {
        return Err(AppError::Validation("Age must be a natural number".into()));
    }
    if age < f64::from(consts::PET_MIN_AGE_YEARS) {
        return Err(AppError::Validation("Age must be greater than 0".into()));
    }
    if age > f64::from(consts::PET_MAX_AGE_YEARS) {
        return Err(AppError::Validation("Age seems unrealistic".into()));
    }

    Ok(format!("{age} years"))
}

fn parse_weight(raw: &str) -> AppResult<Option<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let weight = raw
        .parse::<f64>()
        .map_err(|_| AppError::Validation("Weight must be a number".into()))?;

    if weight <= 0.0 {
        return Err(AppError::Validation(
            "Weight must be greater than 0".into(),
        ));
    }
    if weight > consts::PET_MAX_WEIGHT_KG {
        return Err(AppError::Validation("Weight seems unrealistic".into()));
    }

    Ok(Some(format!("{weight} kg")))
}

fn optional_text(raw: String) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

fn required_text(raw: String, message: &str) -> AppResult<String> {
    optional_text(raw).ok_or_else(|| AppError::Validation(message.into()))
}

/// Validates the form into a pet owned by `owner_id` and its picture.
/// `image_url` is left empty until the picture is stored.
fn into_new_pet(
    form: front::forms::pet::NewPetForm,
    owner_id: i64,
) -> AppResult<(models::pet::Pet, models::Pic)> {
    let name = required_text(form.name, "Name is required")?;

    let slug = match optional_text(form.slug) {
        Some(slug) => slugify(&slug),
        None => slugify(&name),
    };
    if slug.is_empty() {
        return Err(AppError::Validation(
            "Please provide at least a pet name.".into(),
        ));
    }

    let pet_type = form
        .pet_type
        .parse::<models::pet::PetType>()
        .map_err(AppError::Validation)?;
    let breed = required_text(form.breed, "Breed is required")?;
    let age = parse_age(&form.age)?;
    let gender = form
        .gender
        .parse::<models::pet::Gender>()
        .map_err(AppError::Validation)?;
    let weight = parse_weight(&form.weight)?;

    let pic = form
        .image
        .ok_or_else(|| AppError::Validation("Please upload an image for this pet.".into()))?;
    if !consts::ACCEPTED_IMAGE_EXTENSIONS.contains(&pic.filename_extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Image must be one of: {}",
            consts::ACCEPTED_IMAGE_EXTENSIONS.join(", ")
        )));
    }
    if pic.body.len() > consts::PIC_PET_MAX_SIZE_BYTES {
        return Err(AppError::Validation(format!(
            "Image is too big, max size: {} bytes",
            consts::PIC_PET_MAX_SIZE_BYTES
        )));
    }

    let now = chrono::Utc::now();
    let pet = models::pet::Pet {
        id: 0,
        slug,
        name,
        pet_type,
        breed,
        age,
        gender,
        weight,
        color: optional_text(form.color),
        location: optional_text(form.location),
        description: optional_text(form.description),
        health_status: optional_text(form.health_status),
        vaccinated: optional_text(form.vaccinated),
        neutered: optional_text(form.neutered),
        personality: parse_personality(&form.personality),
        image_url: None,
        owner_id: Some(owner_id),
        is_adopted: false,
        adopted_by: None,
        created_at: now,
        updated_at: now,
    };

    Ok((pet, pic))
}

/// Creates a pet listed for adoption by `owner_id`.
///
/// # Process
/// 1. Validate the form and derive the slug
/// 2. Check the slug is free
/// 3. Upload the picture as `{slug}-{unix_millis}.{ext}`
/// 4. Insert the pet with the picture's public URL
///
/// # Errors
/// * [`AppError::Validation`] - invalid field, missing picture, or slug already taken
/// * [`AppError::Persistence`] - upload or insert failed
pub async fn create_pet(
    repo: &repo::ImplAppRepo,
    storage_service: &services::ImplStorageService,
    owner_id: i64,
    form: front::forms::pet::NewPetForm,
) -> AppResult<models::pet::Pet> {
    let _span = logfire::span!("create_pet").entered();

    let (mut pet, pic) = into_new_pet(form, owner_id)?;

    if repo.get_pet_by_slug(&pet.slug).await?.is_some() {
        return Err(AppError::Validation(format!(
            "A pet with the slug '{}' already exists",
            pet.slug
        )));
    }

    let filename = format!(
        "{}-{}.{}",
        pet.slug,
        chrono::Utc::now().timestamp_millis(),
        pic.filename_extension
    );
    storage_service.save_pic(&filename, pic.body).await?;
    pet.image_url = Some(storage_service.public_url(&filename));

    pet.id = repo.insert_pet(&pet).await?;

    Ok(pet)
}

/// Query filters of the pet listing; `all` or an empty value disables a filter
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PetFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "type")]
    pub pet_type: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

fn active_filter(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl PetFilter {
    fn matches(
        &self,
        pet: &models::pet::Pet,
        pet_type: Option<models::pet::PetType>,
        gender: Option<models::pet::Gender>,
    ) -> bool {
        let search_ok = active_filter(&self.search)
            .map(|term| {
                let term = term.to_lowercase();
                pet.name.to_lowercase().contains(&term) || pet.breed.to_lowercase().contains(&term)
            })
            .unwrap_or(true);

        search_ok
            && pet_type.is_none_or(|t| t == pet.pet_type)
            && gender.is_none_or(|g| g == pet.gender)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetListing {
    #[serde(flatten)]
    pub pet: models::pet::Pet,
    pub liked: bool,
}

/// Pets matching `filter`, newest first, with the caller's liked flag.
///
/// # Errors
/// * [`AppError::Validation`] - unknown type or gender filter value
pub async fn list_pets(
    repo: &repo::ImplAppRepo,
    user_id: Option<i64>,
    filter: &PetFilter,
) -> AppResult<Vec<PetListing>> {
    let pet_type = active_filter(&filter.pet_type)
        .map(str::parse::<models::pet::PetType>)
        .transpose()
        .map_err(|_| AppError::Validation("Unknown pet type filter".into()))?;
    let gender = active_filter(&filter.gender)
        .map(str::parse::<models::pet::Gender>)
        .transpose()
        .map_err(|_| AppError::Validation("Unknown gender filter".into()))?;

    let favorites = match user_id {
        Some(user_id) => super::favorite::load_favorites_view(repo, user_id).await?,
        None => super::favorite::FavoritesView::default(),
    };

    Ok(repo
        .get_all_pets()
        .await?
        .into_iter()
        .filter(|pet| filter.matches(pet, pet_type, gender))
        .map(|pet| PetListing {
            liked: favorites.is_liked(pet.id),
            pet,
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetDetail {
    #[serde(flatten)]
    pub pet: models::pet::Pet,
    pub is_favorited: bool,
}

pub async fn get_pet_detail(
    repo: &repo::ImplAppRepo,
    user_id: Option<i64>,
    slug: &str,
) -> AppResult<PetDetail> {
    let pet = repo
        .get_pet_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Pet not found".into()))?;

    let is_favorited = match user_id {
        Some(user_id) => repo.is_pet_favorite(user_id, pet.id).await?,
        None => false,
    };

    Ok(PetDetail { pet, is_favorited })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{AppRepo, MockAppRepo, testing};
    use crate::services::MockStorageService;
    use anyhow::anyhow;
    use mockall::predicate::*;

    fn valid_form() -> front::forms::pet::NewPetForm {
        front::forms::pet::NewPetForm {
            name: "Max Power".into(),
            pet_type: "Dog".into(),
            breed: "Beagle".into(),
            age: "4".into(),
            gender: "Male".into(),
            weight: "12.5".into(),
            personality: " Playful, ,Loyal ,".into(),
            image: Some(models::Pic {
                body: vec![1, 2, 3],
                filename_extension: "png".into(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Max  Power "), "max-power");
        assert_eq!(slugify("Mr. Whiskers!"), "mr-whiskers");
        assert_eq!(slugify("Luna 2"), "luna-2");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_new_pet_fields() {
        let (pet, pic) = into_new_pet(valid_form(), 7).unwrap();

        assert_eq!(pet.slug, "max-power");
        assert_eq!(pet.age, "4 years");
        assert_eq!(pet.weight.as_deref(), Some("12.5 kg"));
        assert_eq!(pet.personality, vec!["Playful", "Loyal"]);
        assert_eq!(pet.pet_type, models::pet::PetType::Dog);
        assert_eq!(pet.owner_id, Some(7));
        assert_eq!(pet.color, None);
        assert_eq!(pic.filename_extension, "png");
    }

    #[test]
    fn test_new_pet_validation() {
        let cases: [(fn(&mut front::forms::pet::NewPetForm), &str); 8] = [
            (|f| f.name.clear(), "Name is required"),
            (|f| f.name = "???".into(), "Please provide at least a pet name."),
            (|f| f.pet_type = "bird".into(), "Pet type is required"),
            (|f| f.age = "2.5".into(), "Age must be a natural number"),
            (|f| f.age = "0".into(), "Age must be greater than 0"),
            (|f| f.age = "51".into(), "Age seems unrealistic"),
            (|f| f.weight = "151".into(), "Weight seems unrealistic"),
            (|f| f.image = None, "Please upload an image for this pet."),
        ];

        for (mutate, expected) in cases {
            let mut form = valid_form();
            mutate(&mut form);

            assert_eq!(
                into_new_pet(form, 1).map(|_| ()),
                Err(AppError::Validation(expected.into()))
            );
        }
    }

    #[test]
    fn test_explicit_slug_wins() {
        let mut form = valid_form();
        form.slug = "Max 01".into();

        let (pet, _) = into_new_pet(form, 1).unwrap();

        assert_eq!(pet.slug, "max-01");
    }

    #[ntex::test]
    async fn test_create_pet_uploads_then_inserts() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_pet_by_slug()
            .with(eq("max-power"))
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_insert_pet()
            .withf(|pet| {
                pet.image_url
                    .as_deref()
                    .is_some_and(|url| url.starts_with("https://cdn.test/max-power-"))
            })
            .times(1)
            .returning(|_| Ok(11));
        let mock_repo: Box<dyn repo::AppRepo> = Box::new(mock_repo);

        let mut mock_storage = MockStorageService::new();
        mock_storage
            .expect_save_pic()
            .withf(|path, body| {
                path.starts_with("max-power-") && path.ends_with(".png") && body.as_slice() == [1u8, 2, 3]
            })
            .times(1)
            .returning(|_, _| Ok(()));
        mock_storage
            .expect_public_url()
            .returning(|path| format!("https://cdn.test/{path}"));
        let mock_storage: Box<dyn services::StorageService> = Box::new(mock_storage);

        let pet = create_pet(&mock_repo, &mock_storage, 3, valid_form())
            .await
            .unwrap();

        assert_eq!(pet.id, 11);
        assert_eq!(pet.owner_id, Some(3));
    }

    #[ntex::test]
    async fn test_create_pet_upload_failure_skips_insert() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo.expect_get_pet_by_slug().returning(|_| Ok(None));
        mock_repo.expect_insert_pet().times(0);
        let mock_repo: Box<dyn repo::AppRepo> = Box::new(mock_repo);

        let mut mock_storage = MockStorageService::new();
        mock_storage
            .expect_save_pic()
            .returning(|_, _| Err(anyhow!("bucket unavailable")));
        let mock_storage: Box<dyn services::StorageService> = Box::new(mock_storage);

        let result = create_pet(&mock_repo, &mock_storage, 3, valid_form()).await;

        assert!(matches!(result, Err(AppError::Persistence { .. })));
    }

    #[ntex::test]
    async fn test_list_pets_filters_and_liked_flag() {
        let repo = testing::setup_test_repo().await;
        let user_id = testing::seed_user(&repo, "a@x.com").await;
        let max = testing::seed_pet(&repo, "max", None).await;
        let mut luna = testing::pet_fixture("luna", None);
        luna.pet_type = models::pet::PetType::Cat;
        luna.gender = models::pet::Gender::Female;
        luna.breed = "Siamese".into();
        let luna = repo.insert_pet(&luna).await.unwrap();
        repo.insert_favorite(user_id, luna).await.unwrap();
        let repo: repo::ImplAppRepo = Box::new(repo);

        let all = list_pets(&repo, Some(user_id), &PetFilter::default())
            .await
            .unwrap();
        let cats = list_pets(
            &repo,
            Some(user_id),
            &PetFilter {
                pet_type: Some("cat".into()),
                gender: Some("all".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let by_breed = list_pets(
            &repo,
            None,
            &PetFilter {
                search: Some("LABRA".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(all.len(), 2);
        assert!(all.iter().find(|p| p.pet.id == luna).is_some_and(|p| p.liked));
        assert!(all.iter().find(|p| p.pet.id == max).is_some_and(|p| !p.liked));
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].pet.id, luna);
        assert_eq!(by_breed.len(), 1);
        assert_eq!(by_breed[0].pet.id, max);
        assert!(!by_breed[0].liked);
    }

    #[ntex::test]
    async fn test_list_pets_unknown_filter() {
        let mock_repo: Box<dyn repo::AppRepo> = Box::new(MockAppRepo::new());

        let result = list_pets(
            &mock_repo,
            None,
            &PetFilter {
                gender: Some("other".into()),
                ..Default::default()
            },
        )
        .await;

        assert_eq!(
            result,
            Err(AppError::Validation("Unknown gender filter".into()))
        );
    }

    #[ntex::test]
    async fn test_pet_detail() {
        let repo = testing::setup_test_repo().await;
        let user_id = testing::seed_user(&repo, "a@x.com").await;
        let max = testing::seed_pet(&repo, "max", None).await;
        repo.insert_favorite(user_id, max).await.unwrap();
        let repo: repo::ImplAppRepo = Box::new(repo);

        let detail = get_pet_detail(&repo, Some(user_id), "max").await.unwrap();
        let anonymous = get_pet_detail(&repo, None, "max").await.unwrap();
        let missing = get_pet_detail(&repo, None, "ghost").await;

        assert!(detail.is_favorited);
        assert!(!anonymous.is_favorited);
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
