//! Container lifecycle states

use std::fmt;

/// Stage of a storage container's lifecycle.
///
/// Happy path: Created → Configuring → Starting → WaitingReady →
/// Provisioning → Running → Stopped. Any stage before Running may fall to
/// Failed. Stopped and Failed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Created,
    Configuring,
    Starting,
    WaitingReady,
    Provisioning,
    Running,
    Stopped,
    Failed,
}

impl ContainerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerState::Created => "created",
            ContainerState::Configuring => "configuring",
            ContainerState::Starting => "starting",
            ContainerState::WaitingReady => "waiting-ready",
            ContainerState::Provisioning => "provisioning",
            ContainerState::Running => "running",
            ContainerState::Stopped => "stopped",
            ContainerState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ContainerState::Stopped | ContainerState::Failed)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
