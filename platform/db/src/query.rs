use std::collections::BTreeMap;

use entity::{Department, Employee, Project};
use indexmap::IndexMap;
use serde::Serialize;

use crate::{Dataset, DbError, DbResult};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Validated `offset`/`limit` window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    offset: usize,
    limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    pub fn new(offset: Option<i64>, limit: Option<i64>) -> DbResult<Self> {
        let offset = offset.unwrap_or(0);
        let offset = usize::try_from(offset).map_err(|_| DbError::InvalidOffset(offset))?;
        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(raw) => usize::try_from(raw)
                .ok()
                .filter(|value| (1..=MAX_LIMIT).contains(value))
                .ok_or(DbError::InvalidLimit {
                    got: raw,
                    max: MAX_LIMIT,
                })?,
        };
        Ok(Self { offset, limit })
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }
}

/// Exact-match project filters; both apply when both are set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub status: Option<String>,
    pub department: Option<String>,
}

impl ProjectFilter {
    fn matches(&self, project: &Project) -> bool {
        self.status.as_deref().is_none_or(|s| project.status == s)
            && self
                .department
                .as_deref()
                .is_none_or(|d| project.department == d)
    }
}

/// Which entity types a search covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchScope {
    All,
    Employees,
    Departments,
    Projects,
    /// Unrecognized selector: nothing is searched.
    Nothing,
}

impl SearchScope {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "all" => Self::All,
            "employees" => Self::Employees,
            "departments" => Self::Departments,
            "projects" => Self::Projects,
            _ => Self::Nothing,
        }
    }

    fn employees(self) -> bool {
        matches!(self, Self::All | Self::Employees)
    }

    fn departments(self) -> bool {
        matches!(self, Self::All | Self::Departments)
    }

    fn projects(self) -> bool {
        matches!(self, Self::All | Self::Projects)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub employees: Vec<Employee>,
    pub departments: Vec<Department>,
    pub projects: Vec<Project>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.employees.len() + self.departments.len() + self.projects.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub total_employees: usize,
    pub total_departments: usize,
    pub total_projects: usize,
    /// Keyed by department key, fixture order.
    pub employees_by_department: IndexMap<String, usize>,
    /// One entry per status present in the data, sorted.
    pub projects_by_status: BTreeMap<String, usize>,
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Dataset {
    /// Employees in fixture order, optionally restricted to one department,
    /// then windowed. An offset past the end yields an empty list.
    pub fn list_employees(&self, department: Option<&str>, page: Page) -> Vec<&Employee> {
        self.employees()
            .filter(|employee| department.is_none_or(|d| employee.department == d))
            .skip(page.offset())
            .take(page.limit())
            .collect()
    }

    pub fn list_departments(&self) -> Vec<&Department> {
        self.departments().map(|(_, department)| department).collect()
    }

    pub fn list_projects(&self, filter: &ProjectFilter) -> Vec<&Project> {
        self.projects()
            .filter(|project| filter.matches(project))
            .collect()
    }

    /// Case-insensitive substring search. Employees match on name and
    /// department, departments on name, head and location, projects on name,
    /// department and status.
    pub fn search(&self, query: &str, scope: SearchScope) -> SearchResults {
        let needle = query.to_lowercase();
        let mut results = SearchResults::default();

        if scope.employees() {
            results.employees = self
                .employees()
                .filter(|e| {
                    contains_folded(&e.name, &needle) || contains_folded(&e.department, &needle)
                })
                .cloned()
                .collect();
        }
        if scope.departments() {
            results.departments = self
                .departments()
                .map(|(_, d)| d)
                .filter(|d| {
                    contains_folded(&d.name, &needle)
                        || contains_folded(&d.head, &needle)
                        || contains_folded(&d.location, &needle)
                })
                .cloned()
                .collect();
        }
        if scope.projects() {
            results.projects = self
                .projects()
                .filter(|p| {
                    contains_folded(&p.name, &needle)
                        || contains_folded(&p.department, &needle)
                        || contains_folded(&p.status, &needle)
                })
                .cloned()
                .collect();
        }
        results
    }

    pub fn stats(&self) -> DatasetStats {
        let employees_by_department = self
            .departments()
            .map(|(key, _)| {
                let count = self.employees().filter(|e| e.department == key).count();
                (key.to_string(), count)
            })
            .collect();
        let mut projects_by_status = BTreeMap::new();
        for project in self.projects() {
            *projects_by_status.entry(project.status.clone()).or_insert(0) += 1;
        }
        DatasetStats {
            total_employees: self.employee_count(),
            total_departments: self.department_count(),
            total_projects: self.project_count(),
            employees_by_department,
            projects_by_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<'a>(employees: impl IntoIterator<Item = &'a Employee>) -> Vec<i64> {
        employees.into_iter().map(|e| e.id).collect()
    }

    #[test]
    fn page_defaults_and_bounds() {
        assert_eq!(Page::new(None, None).unwrap(), Page::default());
        assert_eq!(Page::new(Some(3), Some(100)).unwrap().limit(), 100);
        assert!(matches!(
            Page::new(None, Some(0)),
            Err(DbError::InvalidLimit { got: 0, .. })
        ));
        assert!(matches!(
            Page::new(None, Some(101)),
            Err(DbError::InvalidLimit { got: 101, .. })
        ));
        assert!(matches!(
            Page::new(Some(-1), None),
            Err(DbError::InvalidOffset(-1))
        ));
    }

    #[test]
    fn first_page_follows_fixture_order() {
        let dataset = Dataset::builtin();
        let page = Page::new(Some(0), Some(3)).unwrap();
        assert_eq!(ids(dataset.list_employees(None, page)), vec![1, 2, 3]);
    }

    #[test]
    fn trailing_page_is_short() {
        let dataset = Dataset::builtin();
        let page = Page::new(Some(8), Some(10)).unwrap();
        assert_eq!(ids(dataset.list_employees(None, page)), vec![9, 10]);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let dataset = Dataset::builtin();
        let page = Page::new(Some(50), None).unwrap();
        assert!(dataset.list_employees(None, page).is_empty());
    }

    #[test]
    fn department_filter_is_exact() {
        let dataset = Dataset::builtin();
        let engineering = dataset.list_employees(Some("Engineering"), Page::default());
        assert_eq!(ids(engineering), vec![1, 4, 5, 10]);
        assert!(
            dataset
                .list_employees(Some("engineering"), Page::default())
                .is_empty()
        );
    }

    #[test]
    fn project_filters_combine() {
        let dataset = Dataset::builtin();
        let active = dataset.list_projects(&ProjectFilter {
            status: Some("active".into()),
            department: None,
        });
        assert_eq!(active.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 4]);
        assert!(active.iter().all(|p| p.status == "active"));

        let both = dataset.list_projects(&ProjectFilter {
            status: Some("active".into()),
            department: Some("Finance".into()),
        });
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].name, "Financial System Upgrade");

        let partial = dataset.list_projects(&ProjectFilter {
            status: Some("act".into()),
            department: None,
        });
        assert!(partial.is_empty());
    }

    #[test]
    fn search_spans_all_types() {
        let dataset = Dataset::builtin();
        let results = dataset.search("engineering", SearchScope::All);
        assert_eq!(ids(&results.employees), vec![1, 4, 5, 10]);
        assert_eq!(results.departments.len(), 1);
        assert_eq!(results.departments[0].name, "Engineering");
        assert_eq!(results.projects.len(), 2);
        assert_eq!(results.total(), 7);
    }

    #[test]
    fn search_respects_scope() {
        let dataset = Dataset::builtin();
        let results = dataset.search("engineering", SearchScope::Departments);
        assert!(results.employees.is_empty());
        assert!(results.projects.is_empty());
        assert_eq!(results.total(), 1);
        assert_eq!(dataset.search("engineering", SearchScope::Nothing).total(), 0);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let dataset = Dataset::builtin();
        let results = dataset.search("BUILDING A", SearchScope::Departments);
        assert_eq!(results.departments.len(), 2);
        let results = dataset.search("Delayed", SearchScope::Projects);
        assert_eq!(results.projects[0].name, "API Integration");
    }

    #[test]
    fn empty_query_matches_everything() {
        let dataset = Dataset::builtin();
        assert_eq!(dataset.search("", SearchScope::All).total(), 19);
    }

    #[test]
    fn scope_parsing() {
        assert_eq!(SearchScope::parse("all"), SearchScope::All);
        assert_eq!(SearchScope::parse("projects"), SearchScope::Projects);
        assert_eq!(SearchScope::parse("Projects"), SearchScope::Nothing);
    }

    #[test]
    fn stats_groups_sum_to_totals() {
        let stats = Dataset::builtin().stats();
        assert_eq!(stats.total_employees, 10);
        assert_eq!(
            stats.employees_by_department.values().sum::<usize>(),
            stats.total_employees
        );
        assert_eq!(
            stats.projects_by_status.values().sum::<usize>(),
            stats.total_projects
        );
        assert_eq!(stats.employees_by_department["Engineering"], 4);
        assert_eq!(stats.employees_by_department["HR"], 2);
        assert_eq!(stats.projects_by_status["active"], 2);
        assert_eq!(
            stats.projects_by_status.keys().collect::<Vec<_>>(),
            vec!["active", "completed", "delayed", "planning"]
        );
    }
}
