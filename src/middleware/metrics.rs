use crate::api::metrics::{increment_error_count, increment_request_count};
use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    Error,
};

/// Feeds the `/metrics` counters. Any 4xx/5xx response counts as an error.
pub async fn count_requests(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    increment_request_count();

    let res = next.call(req).await;
    match &res {
        Ok(response) if response.status().is_client_error() || response.status().is_server_error() => {
            increment_error_count(Some(response.status()))
        }
        Ok(_) => {}
        Err(e) => increment_error_count(Some(e.as_response_error().status_code())),
    }
    res
}
