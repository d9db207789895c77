//! Query handlers.
//!
//! Every data handler pays the simulated latency, then rolls its endpoint's
//! fault check, and only reads the dataset once both pass. A selected fault
//! comes back as `Err` and the lookup never runs.

use std::sync::Arc;

use chrono::Utc;
use entity::{DepartmentResponse, EmployeeResponse, EmployeeWithSalary, ProjectResponse};
use platform_api::{ApiError, ApiResult};
use platform_chaos::{ChaosStats, Endpoint, ErrorRate, FaultInjector};
use platform_db::{Dataset, DatasetStats, Page, ProjectFilter, SearchResults, SearchScope};
use serde::Serialize;
use tracing::instrument;

pub const API_VERSION: &str = "1.0.0";

#[derive(Clone, Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub results: SearchResults,
    pub total_results: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
}

#[derive(Clone, Debug)]
pub struct ApiService {
    dataset: Arc<Dataset>,
    injector: Arc<FaultInjector>,
}

impl ApiService {
    pub fn new(dataset: Arc<Dataset>, injector: Arc<FaultInjector>) -> Self {
        Self { dataset, injector }
    }

    async fn guarded<T>(
        &self,
        endpoint: Endpoint,
        lookup: impl FnOnce(&Dataset) -> ApiResult<T>,
    ) -> ApiResult<T> {
        self.injector.guard(endpoint).await?;
        lookup(&self.dataset)
    }

    #[instrument(name = "api.list_employees", skip_all, fields(department = ?department))]
    pub async fn list_employees(
        &self,
        department: Option<&str>,
        page: Page,
    ) -> ApiResult<Vec<EmployeeResponse>> {
        self.guarded(Endpoint::ListEmployees, |data| {
            Ok(data
                .list_employees(department, page)
                .into_iter()
                .map(EmployeeResponse::from)
                .collect())
        })
        .await
    }

    #[instrument(name = "api.get_employee", skip(self))]
    pub async fn get_employee(&self, id: i64) -> ApiResult<EmployeeResponse> {
        self.guarded(Endpoint::GetEmployee, |data| {
            data.employee(id)
                .map(EmployeeResponse::from)
                .ok_or_else(|| employee_not_found(id))
        })
        .await
    }

    #[instrument(name = "api.get_employee_salary", skip(self))]
    pub async fn get_employee_salary(&self, id: i64) -> ApiResult<EmployeeWithSalary> {
        self.guarded(Endpoint::GetEmployeeSalary, |data| {
            data.employee(id)
                .map(EmployeeWithSalary::from)
                .ok_or_else(|| employee_not_found(id))
        })
        .await
    }

    #[instrument(name = "api.list_departments", skip_all)]
    pub async fn list_departments(&self) -> ApiResult<Vec<DepartmentResponse>> {
        self.guarded(Endpoint::ListDepartments, |data| {
            Ok(data
                .list_departments()
                .into_iter()
                .map(DepartmentResponse::from)
                .collect())
        })
        .await
    }

    #[instrument(name = "api.get_department", skip(self))]
    pub async fn get_department(&self, name: &str) -> ApiResult<DepartmentResponse> {
        self.guarded(Endpoint::GetDepartment, |data| {
            data.department(name)
                .map(DepartmentResponse::from)
                .ok_or_else(|| ApiError::not_found(format!("Department '{name}' not found")))
        })
        .await
    }

    #[instrument(name = "api.list_projects", skip_all, fields(status = ?filter.status, department = ?filter.department))]
    pub async fn list_projects(&self, filter: &ProjectFilter) -> ApiResult<Vec<ProjectResponse>> {
        self.guarded(Endpoint::ListProjects, |data| {
            Ok(data
                .list_projects(filter)
                .into_iter()
                .map(ProjectResponse::from)
                .collect())
        })
        .await
    }

    #[instrument(name = "api.get_project", skip(self))]
    pub async fn get_project(&self, id: i64) -> ApiResult<ProjectResponse> {
        self.guarded(Endpoint::GetProject, |data| {
            data.project(id)
                .map(ProjectResponse::from)
                .ok_or_else(|| ApiError::not_found(format!("Project with ID {id} not found")))
        })
        .await
    }

    #[instrument(name = "api.search", skip(self))]
    pub async fn search(&self, query: &str, kind: &str) -> ApiResult<SearchResponse> {
        self.guarded(Endpoint::Search, |data| {
            let results = data.search(query, SearchScope::parse(kind));
            Ok(SearchResponse {
                query: query.to_string(),
                kind: kind.to_string(),
                total_results: results.total(),
                results,
            })
        })
        .await
    }

    /// Health bypasses the latency path and rolls its own probe.
    #[instrument(name = "api.health", skip_all)]
    pub fn health(&self) -> ApiResult<HealthResponse> {
        let rate = Endpoint::Health
            .error_rate()
            .unwrap_or(ErrorRate::NEVER);
        self.injector
            .health_probe(rate)
            .map_err(|kind| ApiError::fault_with(kind, "Health check failed"))?;
        Ok(HealthResponse {
            status: "healthy",
            timestamp: Utc::now().to_rfc3339(),
            version: API_VERSION,
        })
    }

    /// Live aggregates. Pays latency but never faults.
    #[instrument(name = "api.stats", skip_all)]
    pub async fn stats(&self) -> ApiResult<DatasetStats> {
        self.guarded(Endpoint::Stats, |data| Ok(data.stats())).await
    }

    pub fn chaos_stats(&self) -> ChaosStats {
        self.injector.stats()
    }
}

fn employee_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Employee with ID {id} not found"))
}
