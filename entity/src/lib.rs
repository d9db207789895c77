//! Record types served by the practice API.
//!
//! Records are plain data: they are loaded once from a fixture and never
//! mutated. Response shapes decide which fields reach the wire.

pub mod department;
pub mod employee;
pub mod project;

pub use department::{Department, DepartmentResponse};
pub use employee::{Employee, EmployeeResponse, EmployeeWithSalary};
pub use project::{Project, ProjectResponse};
