//! Built-in sample records.

use entity::{Department, Employee, Project};

fn employee(
    id: i64,
    name: &str,
    department: &str,
    phone: Option<&str>,
    manager_id: Option<i64>,
    salary: i64,
    hire_date: &str,
) -> Employee {
    Employee {
        id,
        name: name.into(),
        department: department.into(),
        phone: phone.map(Into::into),
        manager_id,
        salary,
        hire_date: hire_date.into(),
    }
}

fn department(name: &str, head: &str, budget: i64, location: &str) -> Department {
    Department {
        name: name.into(),
        head: head.into(),
        budget,
        location: location.into(),
    }
}

fn project(
    id: i64,
    name: &str,
    department: &str,
    status: &str,
    budget: i64,
    start_date: &str,
) -> Project {
    Project {
        id,
        name: name.into(),
        department: department.into(),
        status: status.into(),
        budget,
        start_date: start_date.into(),
    }
}

pub(crate) fn employees() -> Vec<Employee> {
    vec![
        employee(1, "Alice Johnson", "Engineering", Some("+1-555-0101"), Some(5), 95_000, "2022-01-15"),
        employee(2, "Bob Smith", "Marketing", Some("+1-555-0102"), Some(6), 78_000, "2021-03-22"),
        employee(3, "Carol Davis", "HR", None, Some(7), 65_000, "2020-11-08"),
        employee(4, "David Wilson", "Engineering", Some("+1-555-0104"), Some(5), 88_000, "2023-02-14"),
        employee(5, "Eva Martinez", "Engineering", Some("+1-555-0105"), None, 120_000, "2019-05-30"),
        employee(6, "Frank Chen", "Marketing", Some("+1-555-0106"), None, 105_000, "2018-09-12"),
        employee(7, "Grace Lee", "HR", Some("+1-555-0107"), None, 95_000, "2020-01-20"),
        employee(8, "Henry Brown", "Finance", Some("+1-555-0108"), Some(9), 72_000, "2022-07-03"),
        employee(9, "Iris Taylor", "Finance", Some("+1-555-0109"), None, 110_000, "2017-12-01"),
        employee(10, "Jack Anderson", "Engineering", None, Some(5), 82_000, "2023-04-18"),
    ]
}

/// Departments paired with the key employees and projects refer to.
pub(crate) fn departments() -> Vec<(String, Department)> {
    vec![
        (
            "Engineering".into(),
            department("Engineering", "Eva Martinez", 5_000_000, "Building A, Floor 3"),
        ),
        (
            "Marketing".into(),
            department("Marketing", "Frank Chen", 2_000_000, "Building B, Floor 2"),
        ),
        (
            "HR".into(),
            department("Human Resources", "Grace Lee", 800_000, "Building A, Floor 1"),
        ),
        (
            "Finance".into(),
            department("Finance", "Iris Taylor", 1_500_000, "Building C, Floor 1"),
        ),
    ]
}

pub(crate) fn projects() -> Vec<Project> {
    vec![
        project(1, "Mobile App Redesign", "Engineering", "active", 150_000, "2023-06-01"),
        project(2, "Brand Campaign 2024", "Marketing", "planning", 300_000, "2024-01-15"),
        project(3, "Employee Wellness Program", "HR", "completed", 75_000, "2023-03-01"),
        project(4, "Financial System Upgrade", "Finance", "active", 200_000, "2023-08-15"),
        project(5, "API Integration", "Engineering", "delayed", 120_000, "2023-09-01"),
    ]
}
