use crate::{
    database::{parse_id, DocumentStore},
    models::{UpdateProfileRequest, UpdateStatusRequest, User, UserDetails},
    services::{user_service, Claims},
    utils::AppError,
};
use actix_web::{web, HttpResponse};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = User,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Email already registered"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    store: web::Data<dyn DocumentStore>,
    claims: web::ReqData<Claims>,
    request: web::Json<User>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 POST /users - email: {} (by {})", request.email, claims.email);

    user_service::require_admin(store.get_ref(), &claims).await?;
    let user = user_service::create_user(store.get_ref(), request.into_inner()).await?;

    log::info!("✅ User created: {}", user.id);
    Ok(HttpResponse::Created().json(user))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 404, description = "No users registered")
    )
)]
pub async fn list_users(store: web::Data<dyn DocumentStore>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /users");
    let users = user_service::list_users(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User key")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /users/{}", path);
    let user = user_service::get_user(store.get_ref(), parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    get,
    path = "/users/{id}/details",
    tag = "Users",
    params(("id" = String, Path, description = "User key")),
    responses(
        (status = 200, description = "Profile projection", body = UserDetails),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_details(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /users/{}/details", path);
    let details = user_service::get_details(store.get_ref(), parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(details))
}

#[utoipa::path(
    get,
    path = "/users/role/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Stored role of the user"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_role(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🎭 GET /users/role/{}", path);
    let role = user_service::role_of(store.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({ "role": role })))
}

#[utoipa::path(
    patch,
    path = "/users/admin/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User key")),
    responses(
        (status = 200, description = "User promoted", body = User),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn make_admin(
    store: web::Data<dyn DocumentStore>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("⭐ PATCH /users/admin/{} (by {})", path, claims.email);

    user_service::require_admin(store.get_ref(), &claims).await?;
    let user = user_service::promote_to_admin(store.get_ref(), parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    patch,
    path = "/users/status/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User key")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = User),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    store: web::Data<dyn DocumentStore>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    request: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔒 PATCH /users/status/{} - {:?} (by {})", path, request.status, claims.email);

    user_service::require_admin(store.get_ref(), &claims).await?;
    let user = user_service::set_status(store.get_ref(), parse_id(&path)?, request.status).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User key")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Nothing to update or email taken"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_profile(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("✏️ PATCH /users/{}", path);
    let user = user_service::update_profile(store.get_ref(), parse_id(&path)?, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User key")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    store: web::Data<dyn DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️ DELETE /users/{}", path);
    user_service::delete_user(store.get_ref(), parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::TestState;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_create_user_requires_token() {
        let state = TestState::new();
        let app = test::init_service(state.app()).await;

        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "email": "a@x.com" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_create_user_requires_admin() {
        let state = TestState::new();
        state.seed_user("plain@x.com", "user").await;
        let app = test::init_service(state.app()).await;

        let req = test::TestRequest::post()
            .uri("/users")
            .insert_header(state.bearer("plain@x.com"))
            .set_json(json!({ "email": "new@x.com" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_admin_creates_user_once() {
        let state = TestState::new();
        state.seed_user("root@x.com", "admin").await;
        let app = test::init_service(state.app()).await;

        let create = || {
            test::TestRequest::post()
                .uri("/users")
                .insert_header(state.bearer("root@x.com"))
                .set_json(json!({ "email": "new@x.com", "name": "New" }))
                .to_request()
        };

        let resp = test::call_service(&app, create()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["email"], "new@x.com");
        assert_eq!(body["role"], "user");
        assert!(body["_id"].is_string());

        let resp = test::call_service(&app, create()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "User already exists");
    }

    #[actix_web::test]
    async fn test_list_users_and_lookup_routes() {
        let state = TestState::new();
        let app = test::init_service(state.app()).await;

        let req = test::TestRequest::get().uri("/users").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let id = state.seed_user("a@x.com", "admin").await;

        let req = test::TestRequest::get().uri("/users").to_request();
        let users: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(users.as_array().map(Vec::len), Some(1));

        let req = test::TestRequest::get().uri("/users/role/a@x.com").to_request();
        let role: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(role, json!({ "role": "admin" }));

        let req = test::TestRequest::get().uri(&format!("/users/{}/details", id)).to_request();
        let details: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(details["email"], "a@x.com");

        let req = test::TestRequest::get().uri("/users/not-a-key").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_block_user_as_admin() {
        let state = TestState::new();
        state.seed_user("root@x.com", "admin").await;
        let target = state.seed_user("b@x.com", "user").await;
        let app = test::init_service(state.app()).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/users/status/{}", target))
            .insert_header(state.bearer("root@x.com"))
            .set_json(json!({ "status": "blocked" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "blocked");

        let req = test::TestRequest::patch()
            .uri(&format!("/users/{}", target))
            .set_json(json!({ "district": "Khulna" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["district"], "Khulna");
        assert_eq!(body["status"], "blocked");

        let req = test::TestRequest::delete().uri(&format!("/users/{}", target)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        let req = test::TestRequest::delete().uri(&format!("/users/{}", target)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
