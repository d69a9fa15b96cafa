//! Port abstraction for the department store.
use async_trait::async_trait;

use crate::domain::{Department, DepartmentId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by department repository adapters.
    pub enum DepartmentPersistenceError {
        /// Another department already uses this identifier.
        DuplicateId { id: String } => "department id {id} already exists",
        /// Another department has the same name ignoring case.
        DuplicateName { name: String } => "department name {name} already exists",
        /// Query or mutation failed during execution.
        Query { message: String } => "department repository query failed: {message}",
    }
}

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// Insert a department, checking id and case-insensitive name uniqueness
    /// atomically.
    async fn insert(&self, department: &Department) -> Result<(), DepartmentPersistenceError>;

    async fn find_by_id(
        &self,
        id: &DepartmentId,
    ) -> Result<Option<Department>, DepartmentPersistenceError>;

    /// All departments in insertion order.
    async fn list(&self) -> Result<Vec<Department>, DepartmentPersistenceError>;
}
