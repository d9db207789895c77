use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::{HeaderName, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
};
use entity::{DepartmentResponse, EmployeeResponse, EmployeeWithSalary, ProjectResponse};
use platform_api::{ApiError, ApiResult};
use platform_chaos::ChaosStats;
use platform_db::{DatasetStats, Page, ProjectFilter};
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{
    config::AppConfig,
    service::{ApiService, HealthResponse, SearchResponse},
};

#[derive(Clone)]
pub struct AppState {
    pub service: ApiService,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "practice api listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/", get(root_handler))
        .route("/employees", get(list_employees_handler))
        .route("/employees/{id}", get(get_employee_handler))
        .route("/employees/{id}/salary", get(get_employee_salary_handler))
        .route("/departments", get(list_departments_handler))
        .route("/departments/{name}", get(get_department_handler))
        .route("/projects", get(list_projects_handler))
        .route("/projects/{id}", get(get_project_handler))
        .route("/search", get(search_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/chaos/stats", get(chaos_stats_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

type HttpResult<T> = ApiResult<Json<T>>;

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params
        .map(|Query(inner)| inner)
        .map_err(|rejection| ApiError::invalid(rejection.body_text()))
}

fn path_param<T>(param: Result<Path<T>, PathRejection>) -> ApiResult<T> {
    param
        .map(|Path(inner)| inner)
        .map_err(|rejection| ApiError::invalid(rejection.body_text()))
}

/// Empty query values behave as if the parameter was absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Agent Learning API",
        "description": "Simple API for learning agent development",
        "version": crate::service::API_VERSION,
        "endpoints": {
            "employees": "/employees",
            "departments": "/departments",
            "projects": "/projects",
            "search": "/search",
            "health": "/health",
            "stats": "/stats"
        }
    }))
}

#[derive(Debug, Deserialize)]
struct EmployeeListParams {
    department: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

async fn list_employees_handler(
    State(state): State<AppState>,
    params: Result<Query<EmployeeListParams>, QueryRejection>,
) -> HttpResult<Vec<EmployeeResponse>> {
    let params = query_params(params)?;
    let page = Page::new(params.offset, params.limit)?;
    let department = non_empty(params.department);
    let employees = state
        .service
        .list_employees(department.as_deref(), page)
        .await?;
    Ok(Json(employees))
}

async fn get_employee_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> HttpResult<EmployeeResponse> {
    let id = path_param(id)?;
    Ok(Json(state.service.get_employee(id).await?))
}

async fn get_employee_salary_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> HttpResult<EmployeeWithSalary> {
    let id = path_param(id)?;
    Ok(Json(state.service.get_employee_salary(id).await?))
}

async fn list_departments_handler(
    State(state): State<AppState>,
) -> HttpResult<Vec<DepartmentResponse>> {
    Ok(Json(state.service.list_departments().await?))
}

async fn get_department_handler(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
) -> HttpResult<DepartmentResponse> {
    let name = path_param(name)?;
    Ok(Json(state.service.get_department(&name).await?))
}

#[derive(Debug, Deserialize)]
struct ProjectListParams {
    status: Option<String>,
    department: Option<String>,
}

async fn list_projects_handler(
    State(state): State<AppState>,
    params: Result<Query<ProjectListParams>, QueryRejection>,
) -> HttpResult<Vec<ProjectResponse>> {
    let params = query_params(params)?;
    let filter = ProjectFilter {
        status: non_empty(params.status),
        department: non_empty(params.department),
    };
    Ok(Json(state.service.list_projects(&filter).await?))
}

async fn get_project_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> HttpResult<ProjectResponse> {
    let id = path_param(id)?;
    Ok(Json(state.service.get_project(id).await?))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

async fn search_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> HttpResult<SearchResponse> {
    let params = query_params(params)?;
    let query = params
        .q
        .ok_or_else(|| ApiError::invalid("query parameter `q` is required"))?;
    let kind = params.kind.unwrap_or_else(|| "all".to_string());
    Ok(Json(state.service.search(&query, &kind).await?))
}

async fn health_handler(State(state): State<AppState>) -> HttpResult<HealthResponse> {
    Ok(Json(state.service.health()?))
}

async fn stats_handler(State(state): State<AppState>) -> HttpResult<DatasetStats> {
    Ok(Json(state.service.stats().await?))
}

async fn chaos_stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json::<ChaosStats>(state.service.chaos_stats())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
    info!("shutdown signal received");
}
