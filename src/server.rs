use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::dashboard;
use crate::render;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /: fetch everything afresh and render it. Always 200; failures are
/// shown on the page.
async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard =
        dashboard::build_dashboard(&state.platform, &state.config, chrono::Utc::now()).await;
    Html(render::render_page(&dashboard, &state.config.place_url))
}
