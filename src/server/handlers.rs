use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use chrono::Local;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::charts::build_charts;
use super::flash::clear_cookie;
use super::render::{render_dashboard, render_index, DashboardPage};
use super::SharedState;
use crate::dashboard::{ErrorBody, RefreshRequest, RefreshResponse};
use crate::flights::{SearchCriteria, SearchForm};
use crate::stats::summarize;

/// Flash shown when a search produced nothing to analyze.
pub const NO_DATA_MESSAGE: &str = "No flight data available for the selected criteria";

/// Flash shown when a refresh body carries no records.
pub const NO_FLIGHT_DATA_ERROR: &str = "No flight data provided";

/// The browser script wiring dashboard controls.
pub const DASHBOARD_SCRIPT: &str = include_str!("../../static/dashboard.js");

/// JSON error response with a non-2xx status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Handle `GET /` - the search form
pub async fn handle_index(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    match state.flash.read(&headers) {
        Some(message) => {
            debug!(flash = %message, "Showing flash message");
            (
                [(header::SET_COOKIE, clear_cookie())],
                Html(render_index(Some(&message))),
            )
                .into_response()
        }
        None => Html(render_index(None)).into_response(),
    }
}

/// Handle `GET /dashboard` - nothing to show without a search
pub async fn handle_dashboard_redirect() -> Response {
    redirect_home(None)
}

/// Handle `POST /dashboard` - run a search and render the dashboard
pub async fn handle_dashboard(
    State(state): State<SharedState>,
    Form(form): Form<SearchForm>,
) -> Response {
    let start = Instant::now();

    let criteria = match SearchCriteria::try_from(form.clone()) {
        Ok(criteria) => criteria,
        Err(e) => {
            warn!(field = e.field(), error = %e, "Search rejected");
            return redirect_home(Some(state.flash.set_cookie(&e.to_string())));
        }
    };

    info!(
        origin = %criteria.origin,
        destination = %criteria.destination,
        start_date = %criteria.start_date,
        end_date = %criteria.end_date,
        "Generating flight data"
    );

    let records = state
        .synthesizer
        .generate(&criteria, Local::now().date_naive());
    if records.is_empty() {
        warn!("Search produced no flights");
        return redirect_home(Some(state.flash.set_cookie(NO_DATA_MESSAGE)));
    }

    let summary = summarize(&records);
    let outcome = state.insights.generate(&summary).await;
    let fallback = outcome.is_fallback();
    let insights = outcome.into_result();
    let charts = build_charts(&records, &summary);

    let html = render_dashboard(&DashboardPage {
        search: &form,
        records: &records,
        summary: &summary,
        insights: &insights,
        charts: &charts,
    });

    info!(
        flights = records.len(),
        fallback_insights = fallback,
        latency_ms = start.elapsed().as_millis(),
        "Dashboard rendered"
    );

    Html(html).into_response()
}

/// Handle `POST /api/refresh-insights`
pub async fn handle_refresh_insights(
    State(state): State<SharedState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Malformed refresh request");
        ApiError::new(e.status(), format!("Invalid request body: {}", e.body_text()))
    })?;

    if request.flight_data.is_empty() {
        return Err(ApiError::bad_request(NO_FLIGHT_DATA_ERROR));
    }

    let summary = summarize(&request.flight_data);
    let outcome = state.insights.generate(&summary).await;

    info!(
        flights = request.flight_data.len(),
        fallback_insights = outcome.is_fallback(),
        "Insights refreshed"
    );

    Ok(Json(RefreshResponse {
        insights: outcome.into_result(),
    }))
}

/// Handle `GET /static/dashboard.js`
pub async fn handle_dashboard_script() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/javascript; charset=utf-8"),
        )],
        DASHBOARD_SCRIPT,
    )
}

/// Handle `GET /health`
pub async fn handle_health(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "ai_insights": state.insights.is_ai_enabled(),
    }))
}

fn redirect_home(flash: Option<HeaderValue>) -> Response {
    let mut response = (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, HeaderValue::from_static("/"))],
    )
        .into_response();
    if let Some(cookie) = flash {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}
