use std::{fs, path::Path};

use entity::{Department, Employee, Project};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{DbError, DbResult, fixture};

/// Immutable snapshot of every record the API serves.
///
/// Maps keep insertion order, which is the order list endpoints return.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Dataset {
    #[serde(default)]
    employees: IndexMap<i64, Employee>,
    #[serde(default)]
    departments: IndexMap<String, Department>,
    #[serde(default)]
    projects: IndexMap<i64, Project>,
}

impl Dataset {
    /// Build from record lists. Later duplicates replace earlier ones.
    pub fn from_records(
        employees: impl IntoIterator<Item = Employee>,
        departments: impl IntoIterator<Item = (String, Department)>,
        projects: impl IntoIterator<Item = Project>,
    ) -> Self {
        Self {
            employees: employees.into_iter().map(|e| (e.id, e)).collect(),
            departments: departments.into_iter().collect(),
            projects: projects.into_iter().map(|p| (p.id, p)).collect(),
        }
    }

    /// The sample organisation shipped with the binary.
    pub fn builtin() -> Self {
        Self::from_records(
            fixture::employees(),
            fixture::departments(),
            fixture::projects(),
        )
    }

    pub fn from_json_str(raw: &str) -> DbResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: &Path) -> DbResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| DbError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> DbResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check cross references. Projects pointing at an unknown department
    /// are tolerated and only logged.
    pub fn validate(&self) -> DbResult<()> {
        for (&key, employee) in &self.employees {
            if key != employee.id {
                return Err(DbError::KeyMismatch {
                    table: "employees",
                    key,
                    id: employee.id,
                });
            }
            if !self.departments.contains_key(&employee.department) {
                return Err(DbError::UnknownDepartment {
                    employee_id: employee.id,
                    department: employee.department.clone(),
                });
            }
            if let Some(manager_id) = employee.manager_id {
                if !self.employees.contains_key(&manager_id) {
                    return Err(DbError::DanglingManager {
                        employee_id: employee.id,
                        manager_id,
                    });
                }
            }
        }
        self.check_manager_forest()?;

        for (&key, project) in &self.projects {
            if key != project.id {
                return Err(DbError::KeyMismatch {
                    table: "projects",
                    key,
                    id: project.id,
                });
            }
            if !self.departments.contains_key(&project.department) {
                warn!(
                    project_id = project.id,
                    department = %project.department,
                    "project references unknown department"
                );
            }
        }
        Ok(())
    }

    // A chain longer than the employee count must revisit someone.
    fn check_manager_forest(&self) -> DbResult<()> {
        let bound = self.employees.len();
        for employee in self.employees.values() {
            let mut cursor = employee.manager_id;
            let mut steps = 0;
            while let Some(manager_id) = cursor {
                steps += 1;
                if steps > bound {
                    return Err(DbError::ManagerCycle {
                        employee_id: employee.id,
                    });
                }
                cursor = self
                    .employees
                    .get(&manager_id)
                    .and_then(|manager| manager.manager_id);
            }
        }
        Ok(())
    }

    pub fn employees(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }

    pub fn employee(&self, id: i64) -> Option<&Employee> {
        self.employees.get(&id)
    }

    /// Departments with their lookup key, in fixture order.
    pub fn departments(&self) -> impl Iterator<Item = (&str, &Department)> {
        self.departments
            .iter()
            .map(|(key, department)| (key.as_str(), department))
    }

    /// Exact, case-sensitive key lookup.
    pub fn department(&self, key: &str) -> Option<&Department> {
        self.departments.get(key)
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn project(&self, id: i64) -> Option<&Project> {
        self.projects.get(&id)
    }

    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    pub fn department_count(&self) -> usize {
        self.departments.len()
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_fixture_is_consistent() {
        let dataset = Dataset::builtin();
        dataset.validate().unwrap();
        assert_eq!(dataset.employee_count(), 10);
        assert_eq!(dataset.department_count(), 4);
        assert_eq!(dataset.project_count(), 5);
        assert_eq!(dataset.department("HR").unwrap().name, "Human Resources");
        assert!(dataset.department("hr").is_none());
    }

    #[test]
    fn json_round_trip_keeps_order() {
        let dataset = Dataset::builtin();
        let raw = dataset.to_json_pretty().unwrap();
        let parsed = Dataset::from_json_str(&raw).unwrap();
        assert_eq!(parsed, dataset);
        let ids: Vec<i64> = parsed.employees().map(|e| e.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn fixture_file_is_read_from_disk() {
        let path = std::env::temp_dir().join(format!("fixture-{}.json", std::process::id()));
        fs::write(&path, Dataset::builtin().to_json_pretty().unwrap()).unwrap();
        let loaded = Dataset::from_json_file(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(loaded.project_count(), 5);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Dataset::from_json_file(Path::new("/nonexistent/fixture.json")).unwrap_err();
        assert!(matches!(err, DbError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/fixture.json"));
    }

    fn with_manager(id: i64, manager_id: Option<i64>) -> Employee {
        Employee {
            id,
            name: format!("Employee {id}"),
            department: "Engineering".into(),
            phone: None,
            manager_id,
            salary: 1,
            hire_date: "2024-01-01".into(),
        }
    }

    fn engineering() -> (String, Department) {
        (
            "Engineering".into(),
            Department {
                name: "Engineering".into(),
                head: "Nobody".into(),
                budget: 1,
                location: "Remote".into(),
            },
        )
    }

    #[test]
    fn dangling_manager_is_rejected() {
        let dataset =
            Dataset::from_records([with_manager(1, Some(99))], [engineering()], Vec::new());
        assert!(matches!(
            dataset.validate(),
            Err(DbError::DanglingManager {
                employee_id: 1,
                manager_id: 99
            })
        ));
    }

    #[test]
    fn manager_cycle_is_rejected() {
        let dataset = Dataset::from_records(
            [
                with_manager(1, Some(2)),
                with_manager(2, Some(3)),
                with_manager(3, Some(1)),
            ],
            [engineering()],
            Vec::new(),
        );
        assert!(matches!(
            dataset.validate(),
            Err(DbError::ManagerCycle { .. })
        ));
    }

    #[test]
    fn self_management_is_a_cycle() {
        let dataset = Dataset::from_records([with_manager(7, Some(7))], [engineering()], Vec::new());
        assert!(matches!(
            dataset.validate(),
            Err(DbError::ManagerCycle { employee_id: 7 })
        ));
    }

    #[test]
    fn unknown_employee_department_is_rejected() {
        let mut stray = with_manager(1, None);
        stray.department = "Legal".into();
        let dataset = Dataset::from_records([stray], [engineering()], Vec::new());
        assert!(matches!(
            dataset.validate(),
            Err(DbError::UnknownDepartment { employee_id: 1, .. })
        ));
    }

    #[test]
    fn mismatched_key_is_rejected() {
        let raw = r#"{
            "employees": {
                "2": {"id": 3, "name": "Carol", "department": "Engineering",
                      "salary": 1, "hire_date": "2020-01-01"}
            },
            "departments": {
                "Engineering": {"name": "Engineering", "head": "Eva", "budget": 1, "location": "A"}
            }
        }"#;
        let dataset = Dataset::from_json_str(raw).unwrap();
        assert!(matches!(
            dataset.validate(),
            Err(DbError::KeyMismatch {
                table: "employees",
                key: 2,
                id: 3
            })
        ));
    }
}
