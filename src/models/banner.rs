use serde::{Deserialize, Serialize};

/// Promotional banner. At most one banner of the collection is `active`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<f64>,
    #[serde(default)]
    pub active: bool,
}

/// POST /banners body. `active` is not accepted here: new banners
/// start inactive and only the activation endpoint turns one on.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBannerRequest {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub coupon_code: Option<String>,
    pub discount_rate: Option<f64>,
}

impl From<CreateBannerRequest> for Banner {
    fn from(request: CreateBannerRequest) -> Self {
        Banner {
            title: request.title,
            description: request.description,
            image: request.image,
            coupon_code: request.coupon_code,
            discount_rate: request.discount_rate,
            active: false,
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBannerRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub coupon_code: Option<String>,
    pub discount_rate: Option<f64>,
}
