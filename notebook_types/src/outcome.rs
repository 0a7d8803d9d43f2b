//! Execution outcome types
//!
//! Produced by the external language runtime, keyed by block id plus a
//! 1-based line number at the time of production. Line numbers must be
//! re-validated against the block's current line count before display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome class for one source line
///
/// Ordering matters: `Error > Warn > Ok` is the display precedence when a
/// line carries multiple classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeClass {
    /// Line executed without incident
    Ok,
    /// Line produced a warning
    Warn,
    /// Line produced an error
    Error,
}

impl fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeClass::Ok => write!(f, "ok"),
            OutcomeClass::Warn => write!(f, "warn"),
            OutcomeClass::Error => write!(f, "error"),
        }
    }
}

/// Per-line execution statistic reported by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStat {
    /// 1-based line number in the block's source at execution time
    pub line_number: u32,
    /// Outcome class for this statistic
    pub outcome_class: OutcomeClass,
    /// How many times this outcome occurred on the line
    pub count: u32,
}

impl LineStat {
    /// Creates a new line statistic
    pub fn new(line_number: u32, outcome_class: OutcomeClass, count: u32) -> Self {
        Self {
            line_number,
            outcome_class,
            count,
        }
    }
}

/// Final status of one block execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// The block ran to completion
    Completed,
    /// The block failed
    Failed,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStatus::Completed => write!(f, "completed"),
            ExecutionStatus::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_precedence_ordering() {
        assert!(OutcomeClass::Error > OutcomeClass::Warn);
        assert!(OutcomeClass::Warn > OutcomeClass::Ok);
    }

    #[test]
    fn test_line_stat_wire_format() {
        let stat = LineStat::new(3, OutcomeClass::Warn, 2);
        let json = serde_json::to_string(&stat).unwrap();
        assert_eq!(json, r#"{"lineNumber":3,"outcomeClass":"warn","count":2}"#);
    }

    #[test]
    fn test_execution_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ExecutionStatus::Completed).unwrap(),
            r#""completed""#
        );
        assert_eq!(
            serde_json::to_string(&ExecutionStatus::Failed).unwrap(),
            r#""failed""#
        );
    }
}
