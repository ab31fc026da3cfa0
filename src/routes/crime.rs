use actix_web::{web, HttpResponse, Result as ActixResult};
use validator::Validate;

use crate::assessment::RiskAssessor;
use crate::errors::AppError;
use crate::models::{CrimeSignalQuery, CrimeSignalsPayload};
use crate::response::ApiResponse;

#[utoipa::path(
    get,
    path = "/crime/signals",
    tag = "Crime Signals",
    summary = "Raw crime-signal corpus",
    description = "Runs the fixed battery of crime-related searches for a place name and returns \
        the deduplicated snippets (at most 20) that would be handed to crime extraction.",
    params(
        ("location" = String, Query, description = "Place name, e.g. \"Panjim, Goa, India\"")
    ),
    responses(
        (status = 200, description = "Crime-signal corpus", body = CrimeSignalsPayload),
        (status = 400, description = "Blank or over-long location")
    )
)]
pub(crate) async fn crime_signals(
    assessor: web::Data<RiskAssessor>,
    query: web::Query<CrimeSignalQuery>,
) -> ActixResult<HttpResponse> {
    query.validate().map_err(|e| {
        AppError::Validation(format!("Validation failed: {e}"))
    })?;

    let location = query.location.trim().to_string();
    let signals = assessor.crime_signals(&location).await;
    let warnings = if signals.failed_queries > 0 {
        vec![format!("{} of {} searches failed", signals.failed_queries, signals.queries)]
    } else {
        Vec::new()
    };

    Ok(ApiResponse::with_warnings(
        CrimeSignalsPayload {
            location,
            queries: signals.queries,
            failed_queries: signals.failed_queries,
            corpus: signals.corpus,
        },
        warnings,
    ))
}
