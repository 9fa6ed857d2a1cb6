//! HTTP handler functions for the crime dashboard API.

use actix_web::{HttpRequest, HttpResponse, web};
use crime_dash_analytics::params::{SelectionInput, parse_profile, view_options};
use crime_dash_analytics::{AnalyticsError, filter, view};
use crime_dash_analytics_models::{ViewOptions, ViewProfile};
use crime_dash_server_models::{ApiError, ApiHealth, ViewQueryParams};

use crate::AppState;
use crate::query::list_param;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        records: state.store.len() as u64,
    })
}

/// `GET /api/options`
///
/// Returns the distinct crime types and areas plus the dataset's date
/// bounds, for populating selector widgets.
pub async fn options(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(filter::filter_options(&state.store))
}

/// `GET /api/dashboard`
///
/// Metrics and charts, filtered by crime type, area and date.
pub async fn dashboard(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<ViewQueryParams>,
) -> HttpResponse {
    render(&req, &state, &params, ViewProfile::Dashboard)
}

/// `GET /api/heatmap`
///
/// Density map filtered by crime type and date. `areas` is ignored.
pub async fn heatmap(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<ViewQueryParams>,
) -> HttpResponse {
    render(&req, &state, &params, ViewProfile::Heatmap)
}

/// `GET /api/view`
///
/// Any profile, chosen with `profile=` (default `full`).
pub async fn view(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<ViewQueryParams>,
) -> HttpResponse {
    let profile = match params.profile.as_deref().map(parse_profile).transpose() {
        Ok(profile) => profile.unwrap_or_default(),
        Err(e) => return bad_request(&e),
    };
    render(&req, &state, &params, profile)
}

/// Reads the `crimeTypes` and `areas` lists from the raw query string.
fn selection_input(
    req: &HttpRequest,
    params: &ViewQueryParams,
) -> Result<SelectionInput, AnalyticsError> {
    let query = req.query_string();
    Ok(SelectionInput {
        crime_types: list_param(query, "crimeTypes")?,
        area_names: list_param(query, "areas")?,
        date_from: params.from.clone(),
        date_to: params.to.clone(),
    })
}

fn render(
    req: &HttpRequest,
    state: &AppState,
    params: &ViewQueryParams,
    profile: ViewProfile,
) -> HttpResponse {
    let options = match view_options(None, params.map_mode.as_deref(), params.top_n) {
        Ok(options) => ViewOptions { profile, ..options },
        Err(e) => return bad_request(&e),
    };

    let selected =
        selection_input(req, params).and_then(|input| input.resolve(&state.store, profile));

    match selected {
        Ok(selection) => HttpResponse::Ok().json(view::build_view(&state.store, &selection, options)),
        Err(e) => bad_request(&e),
    }
}

fn bad_request(e: &AnalyticsError) -> HttpResponse {
    log::debug!("Rejected request: {e}");
    HttpResponse::BadRequest().json(ApiError::new(e))
}
