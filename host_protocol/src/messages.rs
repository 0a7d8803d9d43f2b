//! Typed message payloads and the per-direction dispatch enums
//!
//! Action strings preserve the observable protocol of the original host
//! boundary; payload fields serialize camelCase on the wire.

use notebook_types::{BlockId, ExecutionStatus, LineStat, RunMode};
use serde::{Deserialize, Serialize};

use crate::envelope::{Envelope, ProtocolError};

/// Outbound: one block execution, issued in document order
pub const ACTION_RUN_REQUEST: &str = "run-request";
/// Outbound: a committed edit or an undo/redo application
pub const ACTION_CONTENT_CHANGED: &str = "content-changed";
/// Outbound: a surface gained focus or its cursor moved while focused
pub const ACTION_CURSOR_MOVED: &str = "cursor-moved";
/// Outbound: ask the host to materialize a block as an editable surface
pub const ACTION_FOCUS_BLOCK_REQUEST: &str = "focus-block-request";
/// Inbound: line-addressed stats plus final status for one block
pub const ACTION_EXECUTION_STATS: &str = "execution-stats";
/// Inbound: the host instructs the router to focus a block
pub const ACTION_FOCUS_BLOCK: &str = "focus-block";
/// Inbound: scroll a block into view (presentational)
pub const ACTION_SCROLL_TO_BLOCK: &str = "scroll-to-block";
/// Inbound: scroll to the newest result entry (presentational)
pub const ACTION_SCROLL_TO_LAST_RESULT: &str = "scroll-to-last-result";

/// Execution request for one target block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub block_id: BlockId,
    pub code: String,
    pub mode: RunMode,
}

/// Authoritative content update for persistence tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChanged {
    pub block_id: BlockId,
    pub content: String,
}

/// Focus gain or cursor movement inside a focused surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorMoved {
    pub block_id: BlockId,
}

/// Request to render a block as an editable surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusBlockRequest {
    pub block_id: BlockId,
}

/// Line-addressed execution statistics for one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStats {
    pub block_id: BlockId,
    pub stats: Vec<LineStat>,
    pub status: ExecutionStatus,
}

/// Host-directed focus move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusBlock {
    pub block_id: BlockId,
}

/// Host-directed scroll to a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollToBlock {
    pub block_id: BlockId,
}

/// Every message the core emits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    RunRequest(RunRequest),
    ContentChanged(ContentChanged),
    CursorMoved(CursorMoved),
    FocusBlockRequest(FocusBlockRequest),
}

impl OutboundMessage {
    /// The envelope action for this message kind
    pub fn action(&self) -> &'static str {
        match self {
            OutboundMessage::RunRequest(_) => ACTION_RUN_REQUEST,
            OutboundMessage::ContentChanged(_) => ACTION_CONTENT_CHANGED,
            OutboundMessage::CursorMoved(_) => ACTION_CURSOR_MOVED,
            OutboundMessage::FocusBlockRequest(_) => ACTION_FOCUS_BLOCK_REQUEST,
        }
    }

    /// Wraps this message in an envelope for transport
    pub fn into_envelope(self) -> Result<Envelope, ProtocolError> {
        match &self {
            OutboundMessage::RunRequest(payload) => Envelope::new(self.action(), payload),
            OutboundMessage::ContentChanged(payload) => Envelope::new(self.action(), payload),
            OutboundMessage::CursorMoved(payload) => Envelope::new(self.action(), payload),
            OutboundMessage::FocusBlockRequest(payload) => Envelope::new(self.action(), payload),
        }
    }
}

/// Every message the core accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    ExecutionStats(ExecutionStats),
    FocusBlock(FocusBlock),
    ScrollToBlock(ScrollToBlock),
    ScrollToLastResult,
}

impl InboundMessage {
    /// Decodes and version-checks an envelope from the host
    pub fn from_envelope(envelope: &Envelope) -> Result<Self, ProtocolError> {
        envelope.check_version()?;
        match envelope.action.as_str() {
            ACTION_EXECUTION_STATS => Ok(InboundMessage::ExecutionStats(envelope.payload()?)),
            ACTION_FOCUS_BLOCK => Ok(InboundMessage::FocusBlock(envelope.payload()?)),
            ACTION_SCROLL_TO_BLOCK => Ok(InboundMessage::ScrollToBlock(envelope.payload()?)),
            ACTION_SCROLL_TO_LAST_RESULT => Ok(InboundMessage::ScrollToLastResult),
            other => Err(ProtocolError::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notebook_types::OutcomeClass;

    #[test]
    fn test_run_request_envelope_roundtrip() {
        let message = OutboundMessage::RunRequest(RunRequest {
            block_id: BlockId::new(),
            code: "x = 1".to_string(),
            mode: RunMode::RunAllFromTop,
        });
        let expected = message.clone();
        let envelope = message.into_envelope().unwrap();
        assert_eq!(envelope.action, ACTION_RUN_REQUEST);

        let decoded: RunRequest = envelope.payload().unwrap();
        assert_eq!(OutboundMessage::RunRequest(decoded), expected);
    }

    #[test]
    fn test_execution_stats_wire_shape() {
        let block_id = BlockId::new();
        let payload = ExecutionStats {
            block_id,
            stats: vec![LineStat::new(1, OutcomeClass::Ok, 1)],
            status: ExecutionStatus::Completed,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"blockId\""));
        assert!(json.contains("\"lineNumber\":1"));
        assert!(json.contains("\"status\":\"completed\""));
    }

    #[test]
    fn test_inbound_dispatch_by_action() {
        let envelope = Envelope::new(
            ACTION_FOCUS_BLOCK,
            &FocusBlock {
                block_id: BlockId::new(),
            },
        )
        .unwrap();
        assert!(matches!(
            InboundMessage::from_envelope(&envelope).unwrap(),
            InboundMessage::FocusBlock(_)
        ));
    }

    #[test]
    fn test_scroll_to_last_result_has_empty_payload() {
        let envelope = Envelope::new(ACTION_SCROLL_TO_LAST_RESULT, &()).unwrap();
        assert_eq!(
            InboundMessage::from_envelope(&envelope).unwrap(),
            InboundMessage::ScrollToLastResult
        );
    }

    #[test]
    fn test_unknown_action_rejected() {
        let envelope = Envelope::new("no-such-action", &()).unwrap();
        assert!(matches!(
            InboundMessage::from_envelope(&envelope),
            Err(ProtocolError::UnknownAction(_))
        ));
    }
}
