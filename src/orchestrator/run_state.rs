//! 运行状态机
//!
//! ```text
//! NotStarted → Authenticating → Running → Complete
//!                    ↓
//!                 Aborted
//! ```

use std::fmt;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Authenticating,
    Running,
    Complete,
    Aborted,
}

impl RunState {
    pub fn can_transition_to(self, next: RunState) -> bool {
        matches!(
            (self, next),
            (RunState::NotStarted, RunState::Authenticating)
                | (RunState::Authenticating, RunState::Running)
                | (RunState::Authenticating, RunState::Aborted)
                | (RunState::Running, RunState::Complete)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Complete | RunState::Aborted)
    }

    /// 执行跳转，非法跳转返回错误且状态不变
    pub fn transition(&mut self, next: RunState) -> Result<(), AppError> {
        if !self.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }
        tracing::debug!("运行状态: {} -> {}", self, next);
        *self = next;
        Ok(())
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::NotStarted => "NOT_STARTED",
            RunState::Authenticating => "AUTHENTICATING",
            RunState::Running => "RUNNING",
            RunState::Complete => "COMPLETE",
            RunState::Aborted => "ABORTED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut state = RunState::NotStarted;
        state.transition(RunState::Authenticating).unwrap();
        state.transition(RunState::Running).unwrap();
        state.transition(RunState::Complete).unwrap();
        assert!(state.is_terminal());
    }

    #[test]
    fn test_abort_only_from_authenticating() {
        let mut state = RunState::NotStarted;
        assert!(state.transition(RunState::Aborted).is_err());
        assert_eq!(state, RunState::NotStarted);

        state.transition(RunState::Authenticating).unwrap();
        state.transition(RunState::Aborted).unwrap();
        assert!(state.is_terminal());

        let mut running = RunState::Running;
        assert!(running.transition(RunState::Aborted).is_err());
    }

    #[test]
    fn test_terminal_states_are_final() {
        for terminal in [RunState::Complete, RunState::Aborted] {
            for next in [
                RunState::NotStarted,
                RunState::Authenticating,
                RunState::Running,
                RunState::Complete,
                RunState::Aborted,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_cannot_skip_authentication() {
        let mut state = RunState::NotStarted;
        let err = state.transition(RunState::Running).unwrap_err();
        assert!(err.to_string().contains("NOT_STARTED"));
    }
}
