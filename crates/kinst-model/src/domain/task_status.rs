use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ExitCode;

/// Current execution state of a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    /// Procedure is executing.
    Running,
    /// Procedure exited with code 0.
    Succeeded,
    /// Procedure exited with a non-zero code (or never started).
    Failed,
}

impl TaskStatus {
    /// Status implied by a terminal exit code.
    pub fn from_exit_code(code: ExitCode) -> Self {
        if code == 0 {
            TaskStatus::Succeeded
        } else {
            TaskStatus::Failed
        }
    }

    /// Returns `true` if the unit won't transition further.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Succeeded | TaskStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(TaskStatus::Succeeded.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
    }

    #[test]
    fn exit_code_mapping() {
        assert_eq!(TaskStatus::from_exit_code(0), TaskStatus::Succeeded);
        assert_eq!(TaskStatus::from_exit_code(2), TaskStatus::Failed);
        assert_eq!(TaskStatus::from_exit_code(-1), TaskStatus::Failed);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&TaskStatus::Succeeded).unwrap();
        assert_eq!(json, r#""succeeded""#);
        assert_eq!(TaskStatus::Failed.to_string(), "failed");
    }
}
