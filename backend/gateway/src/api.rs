//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use leshan_core::analytics::{self, AnalyticsReport};
use leshan_core::assistant::CHARITY_BOT_FALLBACK;
use leshan_core::{
    catalog, Action, AppState, Certificate, CharityEntity, ChatScreen, DonationFlow, EntityType,
    ImageStudio, Moment, UserInfo, View,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use crate::errors::{GatewayError, Result};
use crate::sessions::{Dispatched, SessionHub};

#[derive(Clone)]
pub struct ApiState {
    pub hub: Arc<SessionHub>,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/catalog/featured", get(featured))
        .route("/catalog/:kind", get(list_catalog))
        .route("/analytics", get(get_analytics))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session))
        .route("/sessions/:id/actions", post(post_action))
        .route("/sessions/:id/chat", post(post_chat))
        .route("/sessions/:id/images", post(post_image))
        .route("/assistant/ask", post(ask_assistant))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct EntityView {
    #[serde(flatten)]
    pub entity: &'static CharityEntity,
    pub progress_percent: u32,
}

impl From<&'static CharityEntity> for EntityView {
    fn from(entity: &'static CharityEntity) -> Self {
        EntityView {
            entity,
            progress_percent: entity.progress_percent(),
        }
    }
}

#[derive(Serialize)]
pub struct FeaturedResponse {
    pub platform_total_yuan: u64,
    pub featured: EntityView,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub kind: EntityType,
    pub title: &'static str,
    pub tabs: &'static [&'static str],
    pub count: usize,
    pub entities: Vec<EntityView>,
}

#[derive(Serialize)]
pub struct DetailView {
    pub entity: EntityView,
    pub tabs: &'static [&'static str; 4],
    pub active_tab: String,
    pub donor_ticker: &'static str,
}

/// Everything a client needs to render the current screen.
#[derive(Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub screen: View,
    pub shows_tab_bar: bool,
    pub user: UserInfo,
    pub detail: Option<DetailView>,
    pub donation: DonationFlow,
    pub moments: Vec<Moment>,
    pub certificate: Option<Certificate>,
    pub is_saving_certificate: bool,
    pub chat: ChatScreen,
    pub studio: ImageStudio,
    pub notice: Option<String>,
}

impl SessionSnapshot {
    pub fn new(session_id: Uuid, state: AppState) -> Self {
        let detail = state.detail.as_ref().and_then(|d| {
            let entity = catalog::find(&d.entity_id)?;
            Some(DetailView {
                entity: entity.into(),
                tabs: catalog::detail_tabs(entity.kind),
                active_tab: d.active_tab.clone(),
                donor_ticker: d.ticker_line(),
            })
        });
        SessionSnapshot {
            session_id,
            screen: state.screen(),
            shows_tab_bar: state.router.shows_tab_bar(),
            detail,
            moments: state.feed.moments().to_vec(),
            user: state.user,
            donation: state.flow,
            certificate: state.certificate,
            is_saving_certificate: state.is_saving_certificate,
            chat: state.chat,
            studio: state.studio,
            notice: state.notice,
        }
    }
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub input: String,
}

#[derive(Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
}

#[derive(Deserialize)]
pub struct AskRequest {
    pub query: String,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub answer: String,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /catalog/featured`
pub async fn featured() -> Json<FeaturedResponse> {
    Json(FeaturedResponse {
        platform_total_yuan: catalog::PLATFORM_TOTAL_YUAN,
        featured: catalog::featured().into(),
    })
}

/// `GET /catalog/:kind`
///
/// `kind` is one of `project`, `fund`, `special_fund`, `market`.
pub async fn list_catalog(Path(kind): Path<String>) -> Result<Json<ListResponse>> {
    let kind: EntityType = kind.parse().map_err(GatewayError::BadRequest)?;
    let entities: Vec<EntityView> = catalog::list_by_type(kind).iter().map(EntityView::from).collect();
    Ok(Json(ListResponse {
        kind,
        title: catalog::list_title(kind),
        tabs: catalog::list_tabs(kind),
        count: entities.len(),
        entities,
    }))
}

/// `GET /analytics`
pub async fn get_analytics() -> Json<AnalyticsReport> {
    Json(analytics::report())
}

/// `POST /sessions`
pub async fn create_session(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let (id, app) = state.hub.create();
    (StatusCode::CREATED, Json(SessionSnapshot::new(id, app)))
}

/// `GET /sessions/:id`
pub async fn get_session(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>> {
    let id = session_id(&id)?;
    Ok(Json(SessionSnapshot::new(id, state.hub.snapshot(id)?)))
}

/// `POST /sessions/:id/actions`
///
/// Body is a tagged action, e.g. `{"type":"select_preset","amount":50}`.
pub async fn post_action(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SessionSnapshot>> {
    let id = session_id(&id)?;
    let action: Action = serde_json::from_value(body)?;
    let done = state.hub.dispatch(id, action)?;
    Ok(Json(SessionSnapshot::new(id, done.state)))
}

/// `POST /sessions/:id/chat`
///
/// Waits for the reply and returns the session with it applied.
pub async fn post_chat(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<SessionSnapshot>> {
    let id = session_id(&id)?;
    let done = state.hub.dispatch(id, Action::SendChat { input: req.input })?;
    finish(&state.hub, id, done).await
}

/// `POST /sessions/:id/images`
pub async fn post_image(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(req): Json<ImageRequest>,
) -> Result<Json<SessionSnapshot>> {
    let id = session_id(&id)?;
    let done = state.hub.dispatch(id, Action::GenerateImage { prompt: req.prompt })?;
    finish(&state.hub, id, done).await
}

/// `POST /assistant/ask`
///
/// Always answers; upstream failures come back as the fallback text.
pub async fn ask_assistant(
    State(state): State<Arc<ApiState>>,
    Json(req): Json<AskRequest>,
) -> Json<AskResponse> {
    let answer = match state.hub.assistant().ask_charity_bot(&req.query).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => CHARITY_BOT_FALLBACK.to_string(),
        Err(e) => {
            warn!("charity bot failed: {e}");
            CHARITY_BOT_FALLBACK.to_string()
        }
    };
    Json(AskResponse { answer })
}

async fn finish(hub: &Arc<SessionHub>, id: Uuid, done: Dispatched) -> Result<Json<SessionSnapshot>> {
    for task in done.tasks {
        if let Err(e) = task.await {
            warn!(%id, "assistant task aborted: {e}");
        }
    }
    Ok(Json(SessionSnapshot::new(id, hub.snapshot(id)?)))
}

fn session_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| GatewayError::SessionNotFound(raw.to_string()))
}
