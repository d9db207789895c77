use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub department: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub manager_id: Option<i64>,
    pub salary: i64,
    pub hire_date: String,
}

/// Public view of an employee. Salary is only exposed through
/// [`EmployeeWithSalary`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub phone: Option<String>,
    pub manager_id: Option<i64>,
    pub hire_date: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmployeeWithSalary {
    #[serde(flatten)]
    pub employee: EmployeeResponse,
    pub salary: i64,
}

impl From<&Employee> for EmployeeResponse {
    fn from(model: &Employee) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            department: model.department.clone(),
            phone: model.phone.clone(),
            manager_id: model.manager_id,
            hire_date: model.hire_date.clone(),
        }
    }
}

impl From<&Employee> for EmployeeWithSalary {
    fn from(model: &Employee) -> Self {
        Self {
            employee: EmployeeResponse::from(model),
            salary: model.salary,
        }
    }
}
