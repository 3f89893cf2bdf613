/// Audit logging
///
/// Mutations and auth activity emit an [`AuditEvent`] describing who did
/// what. Events are recorded only after persistence confirms the change,
/// so the trail never claims something the database rejected.
///
/// [`AuditLog`] is injected into the services; production uses
/// [`TracingAuditLog`], which writes each event to the structured log
/// stream, and tests swap in a recorder to assert on emitted events.

use uuid::Uuid;

use taskforge_shared::models::task::TaskStatus;

/// One auditable action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    TaskCreated {
        task_id: Uuid,
        user_id: Uuid,
        title: String,
    },
    TaskUpdated {
        task_id: Uuid,
        user_id: Uuid,
    },
    TaskDeleted {
        task_id: Uuid,
        user_id: Uuid,
    },
    TaskStatusToggled {
        task_id: Uuid,
        user_id: Uuid,
        previous_status: TaskStatus,
        new_status: TaskStatus,
    },
    UserRegistered {
        user_id: Uuid,
        email: String,
    },
    UserLoggedIn {
        user_id: Uuid,
        email: String,
    },
    UserLoggedOut {
        user_id: Uuid,
        email: String,
    },
    UserLoggedOutEverywhere {
        user_id: Uuid,
        email: String,
    },
}

/// Sink for audit events
pub trait AuditLog: Send + Sync {
    /// Records one event; implementations must not fail the calling
    /// operation
    fn record(&self, event: AuditEvent);
}

/// Audit sink that writes events to the tracing log stream
#[derive(Debug, Default, Clone)]
pub struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn record(&self, event: AuditEvent) {
        match event {
            AuditEvent::TaskCreated {
                task_id,
                user_id,
                title,
            } => {
                tracing::info!(%task_id, %user_id, title = %title, "Task created");
            }
            AuditEvent::TaskUpdated { task_id, user_id } => {
                tracing::info!(%task_id, %user_id, "Task updated");
            }
            AuditEvent::TaskDeleted { task_id, user_id } => {
                tracing::info!(%task_id, %user_id, "Task deleted");
            }
            AuditEvent::TaskStatusToggled {
                task_id,
                user_id,
                previous_status,
                new_status,
            } => {
                tracing::info!(
                    %task_id,
                    %user_id,
                    previous_status = previous_status.as_str(),
                    new_status = new_status.as_str(),
                    "Task status toggled"
                );
            }
            AuditEvent::UserRegistered { user_id, email } => {
                tracing::info!(%user_id, email = %email, "User registered");
            }
            AuditEvent::UserLoggedIn { user_id, email } => {
                tracing::info!(%user_id, email = %email, "User logged in");
            }
            AuditEvent::UserLoggedOut { user_id, email } => {
                tracing::info!(%user_id, email = %email, "User logged out");
            }
            AuditEvent::UserLoggedOutEverywhere { user_id, email } => {
                tracing::info!(%user_id, email = %email, "User logged out from all devices");
            }
        }
    }
}
