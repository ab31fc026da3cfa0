use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct ApiResponse<T: Serialize> {
    pub code: u16,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(payload: T) -> HttpResponse {
        Self::with_warnings(payload, Vec::new())
    }

    /// Successful response whose payload was computed from degraded inputs.
    pub fn with_warnings(payload: T, warnings: Vec<String>) -> HttpResponse {
        let message = if warnings.is_empty() { "success" } else { "success (degraded)" };
        HttpResponse::Ok().json(Self {
            code: 200,
            message,
            payload: Some(payload),
            warnings,
        })
    }
}
