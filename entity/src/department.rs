use serde::{Deserialize, Serialize};

/// Department record. Fixtures key departments separately from the display
/// `name` (the HR department is keyed `HR` but named `Human Resources`).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Department {
    pub name: String,
    pub head: String,
    pub budget: i64,
    pub location: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DepartmentResponse {
    pub name: String,
    pub head: String,
    pub budget: i64,
    pub location: String,
}

impl From<&Department> for DepartmentResponse {
    fn from(model: &Department) -> Self {
        Self {
            name: model.name.clone(),
            head: model.head.clone(),
            budget: model.budget,
            location: model.location.clone(),
        }
    }
}
