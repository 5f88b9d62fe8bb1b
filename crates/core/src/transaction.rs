//! Transaction and task domain types.
//!
//! A [`Transaction`] is a property sale record with buyer, seller, and an
//! ordered checklist of [`Task`]s. Both carry server-generated ids; clients
//! never supply them. Field names on the wire and on disk are exactly the
//! serde-visible names below (`dueDate` is the one camelCase holdout, kept
//! for client compatibility).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A checklist item owned by exactly one transaction.
///
/// Tasks are created pending, are never deleted or reordered, and support a
/// single mutation: toggling the completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Unique within the owning transaction, assigned by the server.
    pub id: String,
    pub description: String,
    /// Free-form due date, exactly as supplied by the client.
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    pub completed: bool,
}

impl Task {
    /// Creates a new pending task with a generated id.
    pub fn new(description: String, due_date: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description,
            due_date,
            completed: false,
        }
    }

    /// Flip the completion flag. The only transition a task supports.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

/// A property sale record with its task checklist.
///
/// Transactions are never deleted; after creation the only mutation is
/// appending a task (insertion order is display order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    /// Globally unique, assigned by the server.
    pub id: String,
    pub property: String,
    pub buyer: String,
    pub seller: String,
    pub tasks: Vec<Task>,
}

impl Transaction {
    /// Creates a new transaction with a generated id and an empty checklist.
    pub fn new(property: String, buyer: String, seller: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            property,
            buyer,
            seller,
            tasks: Vec::new(),
        }
    }

    /// Mutable lookup of a task by id.
    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }
}
