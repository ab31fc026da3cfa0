use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PointQuery {
    #[validate(custom(function = "crate::validation::validate_lat"))]
    pub lat: f64,
    #[validate(custom(function = "crate::validation::validate_lon"))]
    pub lon: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CrimeSignalQuery {
    #[validate(custom(function = "crate::validation::validate_location_field"))]
    pub location: String,
}
