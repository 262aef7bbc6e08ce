use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HealthTrack Service API",
        version = "1.0.0",
        description = "REST API of the HealthTrack booking platform.\n\n**Authentication:** `POST /jwt` issues a bearer token valid for one hour. Routes marked with a lock require it; user administration routes also require the caller to be an admin.\n\nStored entities are returned with their key as a hex string in `_id`."
    ),
    paths(
        // Auth
        crate::api::auth::issue_token,
        crate::api::auth::logout,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Users
        crate::api::users::create_user,
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::get_user_details,
        crate::api::users::get_role,
        crate::api::users::make_admin,
        crate::api::users::update_status,
        crate::api::users::update_profile,
        crate::api::users::delete_user,

        // Banners
        crate::api::banners::list_banners,
        crate::api::banners::get_active_banner,
        crate::api::banners::get_banner,
        crate::api::banners::create_banner,
        crate::api::banners::activate_banner,
        crate::api::banners::update_banner,
        crate::api::banners::delete_banner,

        // Tests
        crate::api::lab_tests::list_tests,
        crate::api::lab_tests::get_test,
        crate::api::lab_tests::create_test,
        crate::api::lab_tests::update_test,
        crate::api::lab_tests::delete_test,

        // Bookings
        crate::api::bookings::create_booking,
        crate::api::bookings::list_bookings,
        crate::api::bookings::get_booking,
        crate::api::bookings::update_booking_status,
        crate::api::bookings::submit_result,
        crate::api::bookings::delete_booking,
        crate::api::bookings::download_result,

        // Recommendations
        crate::api::recommendations::list_recommendations,
        crate::api::recommendations::create_recommendation,
    ),
    components(
        schemas(
            crate::api::auth::TokenResponse,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
            crate::utils::ErrorBody,
            crate::models::User,
            crate::models::Role,
            crate::models::UserStatus,
            crate::models::UserDetails,
            crate::models::UpdateProfileRequest,
            crate::models::UpdateStatusRequest,
            crate::models::Banner,
            crate::models::CreateBannerRequest,
            crate::models::UpdateBannerRequest,
            crate::models::LabTest,
            crate::models::UpdateLabTestRequest,
            crate::models::Booking,
            crate::models::BookingStatus,
            crate::models::CreateBookingRequest,
            crate::models::UpdateBookingStatusRequest,
            crate::models::SubmitResultRequest,
            crate::models::Recommendation,
            crate::models::UpdateRecommendationRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Token issue and logout."),
        (name = "Health", description = "Liveness and request counters."),
        (name = "Users", description = "User profiles, roles and account status."),
        (name = "Banners", description = "Promotional banners. At most one banner is active at a time."),
        (name = "Tests", description = "Lab test catalog."),
        (name = "Bookings", description = "Test bookings, result delivery and PDF result sheets."),
        (name = "Recommendations", description = "Health recommendations shown to users."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /jwt"))
                        .build(),
                ),
            );
        }
    }
}
