//! Axum server presenting baseline and fine-tuned NER outputs side by side,
//! ten sentences per page, with a per-sentence legend.
//!
//! Both result files are read, parsed, aligned and rendered once at startup;
//! requests only slice the precomputed views. Data problems collected during
//! loading are logged here (they are invisible on the page by design).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use nerviz_core::{
    build_view, check_alignment, load_results, process_all, Diagnostics, Palette, SentenceView,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Where the result files live and how the viewer paginates. The tool reads
/// two fixed paths; this struct is the one place to change them.
#[derive(Debug, Clone)]
struct VizConfig {
    baseline_path: PathBuf,
    finetuned_path: PathBuf,
    items_per_page: usize,
    /// Fail startup if the files are not row-aligned (default: warn only).
    strict_alignment: bool,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            baseline_path: PathBuf::from("outputs/output_hg.txt"),
            finetuned_path: PathBuf::from("outputs/output_hg_lora.txt"),
            items_per_page: 10,
            strict_alignment: false,
        }
    }
}

/// Precomputed application state shared by all handlers.
struct AppState {
    views: Vec<SentenceView>,
    items_per_page: usize,
    dropped: usize,
}

impl AppState {
    /// Loads, validates, processes and renders both result files.
    fn load(config: &VizConfig) -> anyhow::Result<Self> {
        let mut diags = Diagnostics::new();

        let baseline = load_results(&config.baseline_path, &mut diags)
            .context("loading baseline results")?;
        let finetuned = load_results(&config.finetuned_path, &mut diags)
            .context("loading fine-tuned results")?;
        info!(
            baseline = baseline.len(),
            finetuned = finetuned.len(),
            "result files parsed"
        );

        check_alignment(&baseline, &finetuned, config.strict_alignment, &mut diags)
            .context("validating row alignment between result files")?;

        let (baseline, d) = process_all(&baseline);
        diags.extend(d);
        let (finetuned, d) = process_all(&finetuned);
        diags.extend(d);

        let palette = Palette::default();
        let shared = baseline.len().min(finetuned.len());
        let mut views = Vec::with_capacity(shared);
        for index in 0..shared {
            views.push(build_view(
                index,
                &baseline[index],
                &finetuned[index],
                &palette,
                &mut diags,
            ));
        }

        for diag in diags.iter() {
            warn!(stage = ?diag.stage, input = %diag.input, "{}", diag.reason);
        }
        info!(sentences = views.len(), dropped = diags.len(), "views built");

        Ok(Self {
            views,
            items_per_page: config.items_per_page,
            dropped: diags.len(),
        })
    }

    fn total_pages(&self) -> usize {
        self.views.len().div_ceil(self.items_per_page).max(1)
    }

    /// Clamps a 1-based page number and returns that page's rows.
    fn page(&self, requested: Option<usize>) -> (usize, &[SentenceView]) {
        let page = requested.unwrap_or(1).clamp(1, self.total_pages());
        let start = (page - 1) * self.items_per_page;
        let end = (start + self.items_per_page).min(self.views.len());
        (page, &self.views[start.min(end)..end])
    }
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<usize>,
}

#[derive(Template)]
#[template(path = "viewer.html")]
struct ViewerTemplate {
    page: usize,
    total_pages: usize,
    total_sentences: usize,
    dropped: usize,
    rows: Vec<SentenceView>,
}

#[derive(Serialize)]
struct PageResponse {
    page: usize,
    total_pages: usize,
    total_sentences: usize,
    dropped: usize,
    rows: Vec<SentenceView>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = VizConfig::default();
    let state = Arc::new(AppState::load(&config)?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/api/sentences", get(sentences_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .context("binding 0.0.0.0:3000")?;
    info!("NER viewer listening on http://localhost:3000");
    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}

/// The paginated comparison page.
async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let (page, rows) = state.page(query.page);
    let template = ViewerTemplate {
        page,
        total_pages: state.total_pages(),
        total_sentences: state.views.len(),
        dropped: state.dropped,
        rows: rows.to_vec(),
    };
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

/// The same page data as JSON.
async fn sentences_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let (page, rows) = state.page(query.page);
    Json(PageResponse {
        page,
        total_pages: state.total_pages(),
        total_sentences: state.views.len(),
        dropped: state.dropped,
        rows: rows.to_vec(),
    })
}
