pub mod auth;
pub mod banners;
pub mod bookings;
pub mod health;
pub mod lab_tests;
pub mod metrics;
pub mod recommendations;
pub mod swagger;
pub mod users;

use crate::{middleware::AuthMiddleware, utils::AppError};
use actix_web::{guard, web};

/// Route table of the service.
///
/// Resources are matched in registration order, so fixed segments
/// (`/users/role/..`, `/banners/active`) come before `{id}` captures. A path
/// with both open and protected methods is registered as two resources, the
/// protected one guarded by its method.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::InvalidRequest(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::InvalidRequest(err.to_string()).into()
    }))
    // Health & Metrics
    .service(web::resource("/").route(web::get().to(health::index)))
    .service(web::resource("/health").route(web::get().to(health::health_check)))
    .service(web::resource("/metrics").route(web::get().to(metrics::get_metrics)))
    // Auth
    .service(web::resource("/jwt").route(web::post().to(auth::issue_token)))
    .service(web::resource("/logout").route(web::post().to(auth::logout)))
    // Users
    .service(
        web::resource("/users")
            .guard(guard::Post())
            .wrap(AuthMiddleware)
            .route(web::post().to(users::create_user)),
    )
    .service(web::resource("/users").route(web::get().to(users::list_users)))
    .service(web::resource("/users/role/{email}").route(web::get().to(users::get_role)))
    .service(
        web::resource("/users/admin/{id}")
            .wrap(AuthMiddleware)
            .route(web::patch().to(users::make_admin)),
    )
    .service(
        web::resource("/users/status/{id}")
            .wrap(AuthMiddleware)
            .route(web::patch().to(users::update_status)),
    )
    .service(web::resource("/users/{id}/details").route(web::get().to(users::get_user_details)))
    .service(
        web::resource("/users/{id}")
            .route(web::get().to(users::get_user))
            .route(web::patch().to(users::update_profile))
            .route(web::delete().to(users::delete_user)),
    )
    // Banners
    .service(
        web::resource("/banners")
            .route(web::get().to(banners::list_banners))
            .route(web::post().to(banners::create_banner)),
    )
    .service(web::resource("/banners/active").route(web::get().to(banners::get_active_banner)))
    .service(web::resource("/banners/{id}/active").route(web::patch().to(banners::activate_banner)))
    .service(
        web::resource("/banners/{id}")
            .route(web::get().to(banners::get_banner))
            .route(web::patch().to(banners::update_banner))
            .route(web::delete().to(banners::delete_banner)),
    )
    // Tests
    .service(
        web::resource("/tests")
            .route(web::get().to(lab_tests::list_tests))
            .route(web::post().to(lab_tests::create_test)),
    )
    .service(
        web::resource("/tests/{id}")
            .route(web::get().to(lab_tests::get_test))
            .route(web::patch().to(lab_tests::update_test))
            .route(web::delete().to(lab_tests::delete_test)),
    )
    // Bookings
    .service(
        web::resource("/bookings")
            .route(web::get().to(bookings::list_bookings))
            .route(web::post().to(bookings::create_booking)),
    )
    .service(web::resource("/bookings/{id}/result").route(web::patch().to(bookings::submit_result)))
    .service(
        web::resource("/bookings/{id}")
            .route(web::get().to(bookings::get_booking))
            .route(web::patch().to(bookings::update_booking_status))
            .route(web::delete().to(bookings::delete_booking)),
    )
    .service(
        web::resource("/test-results/{id}/download")
            .wrap(AuthMiddleware)
            .route(web::get().to(bookings::download_result)),
    )
    // Recommendations
    .service(
        web::resource("/recommendations")
            .route(web::get().to(recommendations::list_recommendations))
            .route(web::post().to(recommendations::create_recommendation)),
    )
    .service(
        web::resource("/recommendations/{id}")
            .route(web::get().to(recommendations::get_recommendation))
            .route(web::patch().to(recommendations::update_recommendation))
            .route(web::delete().to(recommendations::delete_recommendation)),
    );
}
