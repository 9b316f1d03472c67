//! The HTTP host.
//!
//! Routes:
//! - `GET /` the page
//! - `GET /_dash-layout` the layout as JSON
//! - `POST /_dash-update-component` runs the callback bound to the changed input
//! - `GET /assets/dashboard.js` the page script

use crate::callbacks::{Callbacks, InputError, UpdateRequest, UpdateResponse};
use crate::controller::Controller;
use crate::layout::Layout;
use crate::model::Dataset;
use crate::render::{self, SCRIPT, SCRIPT_PATH};
use crate::{Config, Result};
use anyhow::Context;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

pub const LAYOUT_PATH: &str = "/_dash-layout";
pub const UPDATE_PATH: &str = "/_dash-update-component";

/// Everything the handlers need, built once at startup and shared read-only.
#[derive(Debug)]
pub struct App {
    page: String,
    layout_json: String,
    callbacks: Callbacks,
}

impl App {
    /// Composes the page from the dataset and registers the callbacks. Fails when the dataset is
    /// missing a column one of the charts needs.
    pub fn new(dataset: Arc<Dataset>) -> Result<Self> {
        let controller = Controller::new(dataset.clone());
        let layout = Layout::compose(&dataset, &controller)?;
        let page = render::page(&layout)?;
        let layout_json =
            serde_json::to_string(&layout).context("Unable to serialize the page layout")?;
        Ok(Self {
            page,
            layout_json,
            callbacks: Callbacks::new(controller),
        })
    }
}

pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route(LAYOUT_PATH, get(handle_layout))
        .route(UPDATE_PATH, post(handle_update))
        .route(SCRIPT_PATH, get(handle_script))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

/// Serves `app` on the configured address until the process receives Ctrl-C.
pub async fn serve(config: &Config, app: Arc<App>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("Unable to listen on {}", config.addr()))?;
    info!("Dashboard listening on http://{}", config.addr());
    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("The HTTP server failed")?;
    info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Unable to listen for Ctrl-C: {e}");
    }
}

async fn handle_index(State(app): State<Arc<App>>) -> Html<String> {
    Html(app.page.clone())
}

async fn handle_layout(State(app): State<Arc<App>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        app.layout_json.clone(),
    )
}

async fn handle_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SCRIPT,
    )
}

async fn handle_update(
    State(app): State<Arc<App>>,
    Json(request): Json<UpdateRequest>,
) -> std::result::Result<Json<UpdateResponse>, ApiError> {
    Ok(Json(app.callbacks.dispatch(&request.input)?))
}

/// Turns an error from a handler into a JSON response. Bad input from the page is a 400,
/// everything else a 500.
pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.downcast_ref::<InputError>().is_some() {
            warn!("Rejected update: {:#}", self.0);
            StatusCode::BAD_REQUEST
        } else {
            error!("Update failed: {:#}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": format!("{:#}", self.0) }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::projects;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(App::new(Arc::new(projects())).unwrap()))
    }

    async fn body(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn update(value: serde_json::Value) -> Request<Body> {
        let body = json!({"input": {"id": "orden_paises", "property": "value", "value": value}});
        Request::builder()
            .method("POST")
            .uri(UPDATE_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body(response).await;
        assert!(html.contains("<title>Dashboard_IFC</title>"));
    }

    #[tokio::test]
    async fn test_layout() {
        let response = app()
            .oneshot(Request::builder().uri(LAYOUT_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let layout: serde_json::Value = serde_json::from_str(&body(response).await).unwrap();
        assert_eq!(layout["title"], "Dashboard_IFC");
    }

    #[tokio::test]
    async fn test_script() {
        let response = app()
            .oneshot(Request::builder().uri(SCRIPT_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body(response).await.contains(UPDATE_PATH));
    }

    #[tokio::test]
    async fn test_update_ascending() {
        let response = app().oneshot(update(json!("asc"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let update: serde_json::Value = serde_json::from_str(&body(response).await).unwrap();
        assert_eq!(update["output"], json!({"id": "fig_pais", "property": "figure"}));
        assert_eq!(
            update["value"]["layout"]["title"]["text"],
            "Top 10 Países con Menor Inversión Aprobada"
        );
        assert_eq!(update["value"]["data"][0]["x"][0], "Egypt");
        assert_eq!(update["value"]["data"][0]["marker"]["colorscale"], "Viridis");
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_value() {
        let response = app().oneshot(update(json!("sideways"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: serde_json::Value = serde_json::from_str(&body(response).await).unwrap();
        assert!(error["error"].as_str().unwrap().contains("sideways"));
    }

    #[test]
    fn test_app_requires_every_chart_column() {
        let dataset = crate::test::countries(&[("Peru", "1")]);
        assert!(App::new(Arc::new(dataset)).is_err());
    }
}
