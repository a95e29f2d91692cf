pub const QUERY_GET_USER_APP_BY_EMAIL: &str = r#"
SELECT id,email,is_enabled,created_at,updated_at
FROM user_app
WHERE email=$1;
"#;

pub const QUERY_INSERT_USER_APP: &str = r#"
INSERT INTO user_app(email,is_enabled,created_at,updated_at)
VALUES($1,$2,$3,$4);
"#;

pub const QUERY_INSERT_PET: &str = r#"
INSERT INTO pets (
    slug,name,pet_type,breed,age,gender,
    weight,color,location,description,
    health_status,vaccinated,neutered,personality,
    image_url,owner_id,is_adopted,adopted_by,
    created_at,updated_at
) VALUES(
    $1,$2,$3,$4,$5,$6,
    $7,$8,$9,$10,
    $11,$12,$13,$14,
    $15,$16,$17,$18,
    $19,$20
);
"#;

pub const QUERY_GET_PET_BY_ID: &str = r#"
SELECT
    id,slug,name,pet_type,breed,age,gender,weight,color,location,description,
    health_status,vaccinated,neutered,personality,image_url,owner_id,
    is_adopted,adopted_by,created_at,updated_at
FROM pets
WHERE id=$1;
"#;

pub const QUERY_GET_PET_BY_SLUG: &str = r#"
SELECT
    id,slug,name,pet_type,breed,age,gender,weight,color,location,description,
    health_status,vaccinated,neutered,personality,image_url,owner_id,
    is_adopted,adopted_by,created_at,updated_at
FROM pets
WHERE slug=$1;
"#;

pub const QUERY_GET_ALL_PETS: &str = r#"
SELECT
    id,slug,name,pet_type,breed,age,gender,weight,color,location,description,
    health_status,vaccinated,neutered,personality,image_url,owner_id,
    is_adopted,adopted_by,created_at,updated_at
FROM pets
ORDER BY created_at DESC, id DESC;
"#;

pub const QUERY_GET_OWNED_PET_IDS: &str = r#"
SELECT id FROM pets WHERE owner_id=$1 ORDER BY id;
"#;

/// Prefix completed with an `IN (...)` list by `sqlx::QueryBuilder`
pub const QUERY_GET_PET_SUMMARIES_BY_IDS_PREFIX: &str = r#"
SELECT id,slug,name,breed,age,gender,image_url
FROM pets
WHERE id IN "#;

pub const QUERY_INSERT_ADOPTION_APPLICATION: &str = r#"
INSERT INTO adoption_applications (
    user_id,pet_id,full_name,email,phone,address,
    housing_type,has_yard,has_other_pets,experience,why_adopt,
    status,created_at,updated_at
) VALUES(
    $1,$2,$3,$4,$5,$6,
    $7,$8,$9,$10,$11,
    $12,$13,$14
);
"#;

pub const QUERY_GET_APPLICATION_BY_ID: &str = r#"
SELECT
    id,user_id,pet_id,full_name,email,phone,address,housing_type,
    has_yard,has_other_pets,experience,why_adopt,status,created_at,updated_at
FROM adoption_applications
WHERE id=$1;
"#;

pub const QUERY_FIND_APPLICANT_APPLICATION: &str = r#"
SELECT
    id,user_id,pet_id,full_name,email,phone,address,housing_type,
    has_yard,has_other_pets,experience,why_adopt,status,created_at,updated_at
FROM adoption_applications
WHERE
    pet_id=$1 AND
    status IN ('pending','approved','rejected') AND
    (
        ($2 IS NOT NULL AND user_id=$2) OR
        lower(email)=lower($3)
    )
ORDER BY created_at DESC, id DESC
LIMIT 1;
"#;

pub const QUERY_GET_LATEST_USER_APPLICATION: &str = r#"
SELECT
    id,user_id,pet_id,full_name,email,phone,address,housing_type,
    has_yard,has_other_pets,experience,why_adopt,status,created_at,updated_at
FROM adoption_applications
WHERE user_id=$1
ORDER BY created_at DESC, id DESC
LIMIT 1;
"#;

pub const QUERY_GET_USER_APPLICATIONS_WITH_PET: &str = r#"
SELECT
    aa.id,aa.user_id,aa.pet_id,aa.full_name,aa.email,aa.phone,aa.address,
    aa.housing_type,aa.has_yard,aa.has_other_pets,aa.experience,aa.why_adopt,
    aa.status,aa.created_at,aa.updated_at,
    p.slug AS pet_slug,
    p.name AS pet_name,
    p.breed AS pet_breed,
    p.age AS pet_age,
    p.gender AS pet_gender,
    p.image_url AS pet_image_url
FROM adoption_applications AS aa
LEFT JOIN pets AS p ON p.id = aa.pet_id
WHERE aa.user_id=$1
ORDER BY aa.created_at DESC, aa.id DESC;
"#;

pub const QUERY_GET_RECEIVED_APPLICATIONS_WITH_PET: &str = r#"
SELECT
    aa.id,aa.user_id,aa.pet_id,aa.full_name,aa.email,aa.phone,aa.address,
    aa.housing_type,aa.has_yard,aa.has_other_pets,aa.experience,aa.why_adopt,
    aa.status,aa.created_at,aa.updated_at,
    p.slug AS pet_slug,
    p.name AS pet_name,
    p.breed AS pet_breed,
    p.age AS pet_age,
    p.gender AS pet_gender,
    p.image_url AS pet_image_url
FROM adoption_applications AS aa
INNER JOIN pets AS p ON p.id = aa.pet_id
WHERE
    p.owner_id=$1 AND
    ($2 IS NULL OR aa.status=$2)
ORDER BY aa.created_at DESC, aa.id DESC;
"#;

/// Prefix completed with an `IN (...)` list, an optional status filter and the
/// ordering clause by `sqlx::QueryBuilder`
pub const QUERY_GET_APPLICATIONS_BY_PET_IDS_PREFIX: &str = r#"
SELECT
    id,user_id,pet_id,full_name,email,phone,address,housing_type,
    has_yard,has_other_pets,experience,why_adopt,status,created_at,updated_at
FROM adoption_applications
WHERE pet_id IN "#;

pub const QUERY_APPROVE_PENDING_APPLICATION: &str = r#"
UPDATE adoption_applications
SET status='approved', updated_at=$2
WHERE id=$1 AND status='pending';
"#;

pub const QUERY_MARK_PET_ADOPTED: &str = r#"
UPDATE pets
SET is_adopted=1, adopted_by=$2, updated_at=$3
WHERE id=$1 AND is_adopted=0;
"#;

pub const QUERY_REJECT_PENDING_SIBLINGS: &str = r#"
UPDATE adoption_applications
SET status='rejected', updated_at=$3
WHERE pet_id=$1 AND id<>$2 AND status='pending';
"#;

pub const QUERY_REJECT_PENDING_APPLICATION: &str = r#"
UPDATE adoption_applications
SET status='rejected', updated_at=$2
WHERE id=$1 AND status='pending';
"#;

pub const QUERY_DELETE_PENDING_APPLICATION: &str = r#"
DELETE FROM adoption_applications
WHERE id=$1 AND user_id=$2 AND status='pending';
"#;

pub const QUERY_INSERT_FAVORITE: &str = r#"
INSERT INTO favorites(user_id,pet_id,created_at)
VALUES($1,$2,$3)
ON CONFLICT(user_id,pet_id) DO NOTHING;
"#;

pub const QUERY_DELETE_FAVORITE: &str = r#"
DELETE FROM favorites WHERE user_id=$1 AND pet_id=$2;
"#;

pub const QUERY_IS_PET_FAVORITE: &str = r#"
SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id=$1 AND pet_id=$2);
"#;

pub const QUERY_GET_USER_FAVORITE_PET_IDS: &str = r#"
SELECT pet_id FROM favorites WHERE user_id=$1;
"#;

pub const QUERY_GET_USER_FAVORITES_WITH_PET: &str = r#"
SELECT
    f.id,f.user_id,f.pet_id,f.created_at,
    p.slug AS pet_slug,
    p.name AS pet_name,
    p.breed AS pet_breed,
    p.age AS pet_age,
    p.gender AS pet_gender,
    p.image_url AS pet_image_url
FROM favorites AS f
LEFT JOIN pets AS p ON p.id = f.pet_id
WHERE f.user_id=$1
ORDER BY f.created_at DESC, f.id DESC;
"#;

pub const QUERY_INSERT_NOTIFICATION: &str = r#"
INSERT INTO notifications(
    user_id,notification_type,title,message,is_read,metadata,created_at
) VALUES($1,$2,$3,$4,$5,$6,$7);
"#;

pub const QUERY_GET_USER_NOTIFICATIONS: &str = r#"
SELECT id,user_id,notification_type,title,message,is_read,metadata,created_at
FROM notifications
WHERE user_id=$1
ORDER BY created_at DESC, id DESC
LIMIT $2;
"#;

pub const QUERY_MARK_NOTIFICATION_READ: &str = r#"
UPDATE notifications SET is_read=1 WHERE id=$1 AND user_id=$2;
"#;

pub const QUERY_COUNT_UNREAD_NOTIFICATIONS: &str = r#"
SELECT COUNT(*) FROM notifications WHERE user_id=$1 AND is_read=0;
"#;

pub const QUERY_MARK_ALL_NOTIFICATIONS_READ: &str = r#"
UPDATE notifications SET is_read=1 WHERE user_id=$1 AND is_read=0;
"#;

pub const QUERY_GET_VETS: &str = r#"
SELECT
    id,name,city,area,address,phone,services,emergency_available,rating,total_reviews
FROM vets
WHERE ($1 IS NULL OR lower(city)=lower($1))
ORDER BY rating IS NULL, rating DESC, name;
"#;
