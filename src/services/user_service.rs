use crate::{
    database::{DocumentStore, USERS},
    models::{Record, Role, UpdateProfileRequest, User, UserDetails, UserStatus},
    services::{records, session_service::Claims},
    utils::AppError,
};
use mongodb::bson::{doc, oid::ObjectId, Document};

const ENTITY: &str = "User";

/// Inserts a user unless the email is already registered.
pub async fn create_user(store: &dyn DocumentStore, user: User) -> Result<Record<User>, AppError> {
    if user.email.trim().is_empty() {
        return Err(AppError::InvalidRequest("email is required".to_string()));
    }

    if find_by_email(store, &user.email).await?.is_some() {
        return Err(AppError::Duplicate(ENTITY.to_string()));
    }

    // The unique index can still reject a concurrent insert of the same email.
    records::create(store, USERS, user).await.map_err(|e| match e {
        AppError::Duplicate(_) => AppError::Duplicate(ENTITY.to_string()),
        other => other,
    })
}

pub async fn find_by_email(store: &dyn DocumentStore, email: &str) -> Result<Option<Record<User>>, AppError> {
    store
        .find_one(USERS, doc! { "email": email })
        .await?
        .map(Record::from_document)
        .transpose()
}

/// All users. An empty collection is reported as `NotFound`.
pub async fn list_users(store: &dyn DocumentStore) -> Result<Vec<Record<User>>, AppError> {
    let users = records::list(store, USERS, doc! {}).await?;
    if users.is_empty() {
        return Err(AppError::NotFound("Users".to_string()));
    }
    Ok(users)
}

pub async fn get_user(store: &dyn DocumentStore, id: ObjectId) -> Result<Record<User>, AppError> {
    records::get(store, USERS, id, ENTITY).await
}

pub async fn get_details(store: &dyn DocumentStore, id: ObjectId) -> Result<UserDetails, AppError> {
    Ok(get_user(store, id).await?.data.into())
}

pub async fn role_of(store: &dyn DocumentStore, email: &str) -> Result<Role, AppError> {
    find_by_email(store, email)
        .await?
        .map(|user| user.data.role)
        .ok_or_else(|| AppError::NotFound(ENTITY.to_string()))
}

pub async fn promote_to_admin(store: &dyn DocumentStore, id: ObjectId) -> Result<Record<User>, AppError> {
    records::update(store, USERS, id, doc! { "role": "admin" }, ENTITY).await
}

pub async fn set_status(
    store: &dyn DocumentStore,
    id: ObjectId,
    status: UserStatus,
) -> Result<Record<User>, AppError> {
    let status = mongodb::bson::to_bson(&status)?;
    records::update(store, USERS, id, doc! { "status": status }, ENTITY).await
}

pub async fn update_profile(
    store: &dyn DocumentStore,
    id: ObjectId,
    request: UpdateProfileRequest,
) -> Result<Record<User>, AppError> {
    let mut update_doc = Document::new();

    if let Some(email) = request.email {
        if email.trim().is_empty() {
            return Err(AppError::InvalidRequest("email cannot be empty".to_string()));
        }
        if let Some(owner) = find_by_email(store, &email).await? {
            if owner.id != id.to_hex() {
                return Err(AppError::Duplicate(ENTITY.to_string()));
            }
        }
        update_doc.insert("email", email);
    }
    if let Some(name) = request.name { update_doc.insert("name", name); }
    if let Some(blood_group) = request.blood_group { update_doc.insert("bloodGroup", blood_group); }
    if let Some(district) = request.district { update_doc.insert("district", district); }
    if let Some(upazila) = request.upazila { update_doc.insert("upazila", upazila); }
    if let Some(photo_url) = request.photo_url { update_doc.insert("photoURL", photo_url); }

    records::update(store, USERS, id, update_doc, ENTITY).await
}

/// Deletes the user only. Bookings referencing the user are left in place.
pub async fn delete_user(store: &dyn DocumentStore, id: ObjectId) -> Result<(), AppError> {
    records::delete(store, USERS, id, ENTITY).await
}

/// Grants the admin role to each configured email, registering the user
/// first when the email is unknown. Blocked users stay blocked.
///
/// This is the only way to get a first admin: every route that promotes a
/// user already requires one.
pub async fn ensure_admins(store: &dyn DocumentStore, emails: &[String]) -> Result<(), AppError> {
    for email in emails {
        match find_by_email(store, email).await? {
            Some(existing) if existing.data.role == Role::Admin => {
                log::debug!("👑 {} is already an admin", email);
            }
            Some(existing) => {
                let id = ObjectId::parse_str(&existing.id)
                    .map_err(|e| AppError::Internal(format!("stored user key '{}': {}", existing.id, e)))?;
                promote_to_admin(store, id).await?;
                log::info!("👑 Promoted {} to admin", email);
            }
            None => {
                let user = User {
                    email: email.clone(),
                    role: Role::Admin,
                    ..User::default()
                };
                create_user(store, user).await?;
                log::info!("👑 Registered admin {}", email);
            }
        }
    }
    Ok(())
}

/// Admin check for privileged routes.
///
/// The role is re-read from storage on every call instead of trusting the
/// token, so promotions, demotions and blocks apply before the token expires.
pub async fn require_admin(store: &dyn DocumentStore, claims: &Claims) -> Result<Record<User>, AppError> {
    let user = find_by_email(store, &claims.email)
        .await?
        .ok_or_else(|| AppError::Forbidden(format!("{} is not a registered user", claims.email)))?;

    if user.data.status == UserStatus::Blocked {
        return Err(AppError::Forbidden(format!("{} is blocked", claims.email)));
    }
    if user.data.role != Role::Admin {
        return Err(AppError::Forbidden(format!("{} is not an admin", claims.email)));
    }
    Ok(user)
}
