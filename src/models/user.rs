use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[serde(alias = "User")]
    User,
    #[serde(alias = "Admin")]
    Admin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    #[serde(alias = "Active")]
    Active,
    #[serde(alias = "Blocked")]
    Blocked,
}

/// Document of the "user" collection. `email` is unique.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upazila: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Keys of tests attached to the user's profile
    #[serde(default)]
    pub tests: Vec<String>,
}

/// PATCH /users/{id} - profile fields, only the present ones are written
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

/// Projection served by GET /users/{id}/details
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub name: Option<String>,
    pub email: String,
    pub role: Role,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub blood_group: Option<String>,
    pub status: UserStatus,
    pub tests: Vec<String>,
}

impl From<User> for UserDetails {
    fn from(user: User) -> Self {
        UserDetails {
            name: user.name,
            email: user.email,
            role: user.role,
            district: user.district,
            upazila: user.upazila,
            blood_group: user.blood_group,
            status: user.status,
            tests: user.tests,
        }
    }
}
