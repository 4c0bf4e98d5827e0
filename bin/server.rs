// Financial Chatbot - Web Server
// Chat UI plus JSON API with Axum.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use financial_chatbot::{load_csv, process_query, DatasetIndex, DEFAULT_DATA_PATH};

/// Shared application state
#[derive(Clone)]
struct AppState {
    index: Arc<DatasetIndex>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

/// Chat request body. A missing `query` field counts as an empty query,
/// which the resolver answers with its fallback sentence.
#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    query: String,
}

/// Chat response body
#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

/// Company summary response (simplified for API)
#[derive(Serialize)]
struct CompanyResponse {
    company: String,
    latest_year: i32,
    years: Vec<i32>,
    revenues: Vec<i64>,
    net_incomes: Vec<i64>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /chat - Answer a user query
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let response = process_query(&request.query, &state.index);
    Json(ChatResponse { response })
}

/// GET /api/companies - Per-company summaries of the loaded dataset
async fn get_companies(State(state): State<AppState>) -> impl IntoResponse {
    let companies: Vec<CompanyResponse> = state
        .index
        .companies()
        .iter()
        .filter_map(|company| {
            state.index.summary(company).map(|summary| CompanyResponse {
                company: company.clone(),
                latest_year: summary.latest_year,
                years: summary.years.clone(),
                revenues: summary.revenues.clone(),
                net_incomes: summary.net_incomes.clone(),
            })
        })
        .collect();

    Json(ApiResponse::ok(companies))
}

/// GET / - Serve the chat page
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("💬 Financial Chatbot - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let data_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let data_path = Path::new(&data_path);

    let index = match load_csv(data_path) {
        Ok(index) => index,
        Err(e) => {
            eprintln!("❌ Failed to load data file {:?}: {:#}", data_path, e);
            std::process::exit(1);
        }
    };
    println!(
        "✓ Loaded {} rows for {} companies from {:?}",
        index.records().len(),
        index.companies().len(),
        data_path
    );

    // Create shared state
    let state = AppState {
        index: Arc::new(index),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/companies", get(get_companies));

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .route("/chat", post(chat))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   Chat UI: http://localhost:3000");
    println!("   API:     http://localhost:3000/api/companies");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
