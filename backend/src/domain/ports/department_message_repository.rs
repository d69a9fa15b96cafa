//! Port abstraction for department chat logs.
use async_trait::async_trait;

use crate::domain::{DepartmentId, DepartmentMessage};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by department message adapters.
    pub enum DepartmentMessagePersistenceError {
        /// Query or mutation failed during execution.
        Query { message: String } => "department message repository query failed: {message}",
    }
}

#[async_trait]
pub trait DepartmentMessageRepository: Send + Sync {
    /// Append a message to its department's log.
    async fn append(
        &self,
        message: &DepartmentMessage,
    ) -> Result<(), DepartmentMessagePersistenceError>;

    /// Messages for one department, oldest first; equal timestamps keep
    /// append order.
    async fn list_for_department(
        &self,
        department_id: &DepartmentId,
    ) -> Result<Vec<DepartmentMessage>, DepartmentMessagePersistenceError>;
}
