//! HTTP front end: the HTML form plus a small JSON API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::action::{ActionOutcome, FontSnap, IdentifyFontRequest, SuggestFontsRequest};
use crate::backend::LLMClient;
use crate::flows::{DescribedFont, FontSuggestion};
use crate::media::DataUri;
use crate::render::{FORM_MISSING_IMAGE_MESSAGE, PageState, Tab, render_page};

/// Default request body limit: 10 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Build the router around a shared service.
///
/// Routes:
/// - `GET /` empty form
/// - `POST /` multipart form submission, answered with the rendered page
/// - `POST /api/identify` JSON `IdentifyFontRequest` → `ActionOutcome`
/// - `POST /api/suggest` JSON `SuggestFontsRequest` → `ActionOutcome`
/// - `GET /api/health`
pub fn create_app<C>(service: Arc<FontSnap<C>>, body_limit: usize) -> Router
where
    C: LLMClient + 'static,
{
    Router::new()
        .route("/", get(index).post(submit_form::<C>))
        .route("/api/identify", post(identify_json::<C>))
        .route("/api/suggest", post(suggest_json::<C>))
        .route("/api/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bind `addr` and serve `app` until Ctrl-C.
#[instrument(skip(app))]
pub async fn serve(addr: SocketAddr, app: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("FontSnap listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn index() -> Html<String> {
    Html(render_page(&PageState::default()))
}

/// Fields of the HTML form, as submitted.
#[derive(Debug, Default)]
struct FormSubmission {
    tab: Option<Tab>,
    image_url: String,
    file: Option<(Vec<u8>, String)>,
}

async fn read_form(multipart: &mut Multipart) -> Result<FormSubmission, String> {
    let mut form = FormSubmission::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "imageFile" => {
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| e.to_string())?;
                if !bytes.is_empty() {
                    form.file = Some((bytes.to_vec(), mime_type));
                }
            }
            "imageUrl" => {
                form.image_url = field.text().await.map_err(|e| e.to_string())?.trim().to_string();
            }
            "tab" => {
                form.tab = match field.text().await.map_err(|e| e.to_string())?.as_str() {
                    "url" => Some(Tab::Url),
                    _ => Some(Tab::Upload),
                };
            }
            _ => {}
        }
    }
    Ok(form)
}

async fn submit_form<C>(
    State(service): State<Arc<FontSnap<C>>>,
    mut multipart: Multipart,
) -> (StatusCode, Html<String>)
where
    C: LLMClient + 'static,
{
    let form = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "Failed to read form submission");
            let state = PageState {
                form_error: Some("Could not read the submitted form.".to_string()),
                ..Default::default()
            };
            return (StatusCode::BAD_REQUEST, Html(render_page(&state)));
        }
    };

    let mut state = PageState {
        active_tab: form.tab.unwrap_or_default(),
        image_url: form.image_url.clone(),
        ..Default::default()
    };

    // A chosen file takes precedence, as in the upload tab
    let request = match form.file {
        Some((bytes, mime_type)) if mime_type.starts_with("image/") => {
            let uri = DataUri::from_bytes(&bytes, mime_type).to_string();
            state.active_tab = Tab::Upload;
            state.image_url.clear();
            state.preview = Some(uri.clone());
            IdentifyFontRequest::from_data_uri(uri)
        }
        _ if form.image_url.is_empty() => {
            state.form_error = Some(FORM_MISSING_IMAGE_MESSAGE.to_string());
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(render_page(&state)));
        }
        _ => {
            state.active_tab = Tab::Url;
            state.preview = Some(form.image_url.clone());
            IdentifyFontRequest::from_url(form.image_url)
        }
    };

    let outcome = service.identify_font(&request).await;
    (StatusCode::OK, Html(render_page(&state.with_outcome(outcome))))
}

async fn identify_json<C>(
    State(service): State<Arc<FontSnap<C>>>,
    Json(request): Json<IdentifyFontRequest>,
) -> Json<ActionOutcome<FontSuggestion>>
where
    C: LLMClient + 'static,
{
    Json(service.identify_font(&request).await)
}

async fn suggest_json<C>(
    State(service): State<Arc<FontSnap<C>>>,
    Json(request): Json<SuggestFontsRequest>,
) -> Json<ActionOutcome<DescribedFont>>
where
    C: LLMClient + 'static,
{
    Json(service.suggest_fonts(&request).await)
}
