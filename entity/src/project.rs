use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub department: String,
    /// Lifecycle label (`planning`, `active`, `delayed`, `completed`, ...).
    /// Kept as a free string; filters compare it exactly.
    pub status: String,
    pub budget: i64,
    pub start_date: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub status: String,
    pub budget: i64,
    pub start_date: String,
}

impl From<&Project> for ProjectResponse {
    fn from(model: &Project) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            department: model.department.clone(),
            status: model.status.clone(),
            budget: model.budget,
            start_date: model.start_date.clone(),
        }
    }
}
