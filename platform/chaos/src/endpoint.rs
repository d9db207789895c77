use serde::Serialize;

use crate::ErrorRate;

/// Call sites that go through the injector. Each one carries its own
/// reliability profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    ListEmployees,
    GetEmployee,
    GetEmployeeSalary,
    ListDepartments,
    GetDepartment,
    ListProjects,
    GetProject,
    Search,
    Health,
    Stats,
}

impl Endpoint {
    pub const ALL: [Endpoint; 10] = [
        Endpoint::ListEmployees,
        Endpoint::GetEmployee,
        Endpoint::GetEmployeeSalary,
        Endpoint::ListDepartments,
        Endpoint::GetDepartment,
        Endpoint::ListProjects,
        Endpoint::GetProject,
        Endpoint::Search,
        Endpoint::Health,
        Endpoint::Stats,
    ];

    /// Built-in error rate, `None` for call sites that only pay latency.
    pub const fn error_rate(self) -> Option<ErrorRate> {
        let rate = match self {
            Endpoint::ListEmployees => 0.05,
            Endpoint::GetEmployee => 0.10,
            Endpoint::GetEmployeeSalary => 0.08,
            Endpoint::ListDepartments => 0.03,
            Endpoint::GetDepartment => 0.05,
            Endpoint::ListProjects => 0.07,
            Endpoint::GetProject => 0.08,
            Endpoint::Search => 0.06,
            Endpoint::Health => 0.02,
            Endpoint::Stats => return None,
        };
        Some(ErrorRate::fixed(rate))
    }

    pub const fn label(self) -> &'static str {
        match self {
            Endpoint::ListEmployees => "list_employees",
            Endpoint::GetEmployee => "get_employee",
            Endpoint::GetEmployeeSalary => "get_employee_salary",
            Endpoint::ListDepartments => "list_departments",
            Endpoint::GetDepartment => "get_department",
            Endpoint::ListProjects => "list_projects",
            Endpoint::GetProject => "get_project",
            Endpoint::Search => "search",
            Endpoint::Health => "health",
            Endpoint::Stats => "stats",
        }
    }
}
