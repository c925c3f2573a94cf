//! Content server
//!
//! Serves the raw content files under their usual paths, so the site (or an
//! [`HttpSource`](crate::content::HttpSource)) can fetch them, plus JSON views
//! of the derived posts and projects.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{
    filter_posts, latest, ContentLoader, DirSource, MarkdownRenderer, Post, Project,
};
use crate::Folio;

/// Server state
pub struct ServerState {
    title: String,
    loader: ContentLoader<DirSource>,
    renderer: MarkdownRenderer,
    latest_count: usize,
}

impl ServerState {
    pub fn new(folio: &Folio) -> Self {
        Self {
            title: folio.config.title.clone(),
            // Derived views always come from the directory being served
            loader: ContentLoader::new(
                DirSource::new(&folio.content_dir, &folio.config),
                &folio.config,
            ),
            renderer: folio.renderer(),
            latest_count: folio.config.latest_count,
        }
    }
}

/// Query parameters of the post listing
#[derive(Debug, Default, Deserialize)]
pub struct PostQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
}

#[derive(Serialize)]
struct Rendered<T> {
    #[serde(flatten)]
    document: T,
    html: String,
}

/// Build the application router
pub fn router(folio: &Folio) -> Router {
    let state = Arc::new(ServerState::new(folio));

    Router::new()
        .route("/api/overview", get(overview))
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(get_post))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/:id", get(get_project))
        .fallback_service(ServeDir::new(&folio.content_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let app = router(folio);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!(
        "Serving {} from {:?} at http://{}:{}",
        folio.config.title, folio.content_dir, ip, port
    );
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn overview(State(state): State<Arc<ServerState>>) -> Json<serde_json::Value> {
    // Independent collections are loaded side by side
    let (posts, projects) = tokio::join!(state.loader.load_posts(), state.loader.load_projects());

    Json(json!({
        "title": state.title,
        "posts": latest(&posts.items, state.latest_count),
        "projects": projects.items,
    }))
}

async fn list_posts(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PostQuery>,
) -> Response {
    let batch = state.loader.load_posts().await;
    if let Some(failure) = batch.failure {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load posts", &failure);
    }

    let posts: Vec<&Post> = filter_posts(
        &batch.items,
        query.search.as_deref().unwrap_or(""),
        query.tag.as_deref(),
    );
    Json(posts).into_response()
}

async fn get_post(State(state): State<Arc<ServerState>>, Path(slug): Path<String>) -> Response {
    match state.loader.get_post(&slug).await {
        Some(post) => {
            let html = post.render_html(&state.renderer);
            Json(Rendered {
                document: post,
                html,
            })
            .into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Post not found", &slug),
    }
}

async fn list_projects(State(state): State<Arc<ServerState>>) -> Response {
    let batch = state.loader.load_projects().await;
    if let Some(failure) = batch.failure {
        return error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load projects",
            &failure,
        );
    }
    Json::<Vec<Project>>(batch.items).into_response()
}

async fn get_project(State(state): State<Arc<ServerState>>, Path(id): Path<String>) -> Response {
    match state.loader.get_project(&id).await {
        Some(project) => {
            let html = project.render_html(&state.renderer);
            Json(Rendered {
                document: project,
                html,
            })
            .into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Project not found", &id),
    }
}

fn error(status: StatusCode, message: &str, detail: &str) -> Response {
    tracing::debug!("{}: {}", message, detail);
    (status, Json(json!({ "error": message, "detail": detail }))).into_response()
}
