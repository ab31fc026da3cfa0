use crate::errors::AppError;
use crate::geo::Coordinate;
use std::borrow::Borrow;
use validator::ValidationError;

pub const MAX_LOCATION_LEN: usize = 200;

pub fn validate_lat(lat: impl Borrow<f64>) -> Result<(), ValidationError> {
    let lat = lat.borrow();
    if !lat.is_finite() || *lat < -90.0 || *lat > 90.0 {
        return Err(ValidationError::new("latitude"));
    }
    Ok(())
}

pub fn validate_lon(lon: impl Borrow<f64>) -> Result<(), ValidationError> {
    let lon = lon.borrow();
    if !lon.is_finite() || *lon < -180.0 || *lon > 180.0 {
        return Err(ValidationError::new("longitude"));
    }
    Ok(())
}

pub fn validate_location_field(location: &str) -> Result<(), ValidationError> {
    let trimmed = location.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_LOCATION_LEN {
        return Err(ValidationError::new("location"));
    }
    Ok(())
}

pub fn validate_coordinates(lat: f64, lon: f64) -> Result<Coordinate, AppError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(AppError::Validation(
            "Coordinates must be finite numbers".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::Validation(
            "Latitude must be between -90 and 90".to_string(),
        ));
    }
    Coordinate::new(lat, lon).ok_or_else(|| {
        AppError::Validation("Longitude must be between -180 and 180".to_string())
    })
}

/// Clamp a provider reading into `[lo, hi]`, replacing non-finite values with `default`.
pub fn sanitize_reading(value: f64, lo: f64, hi: f64, default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        default
    }
}
