//! Host protocol contract tests
//!
//! These tests pin the stable wire contract: action identifiers, the
//! envelope shape, the schema version and payload field names. A failure
//! here means an existing host integration would break.

#[cfg(test)]
mod tests {
    use host_protocol::{
        ContentChanged, Envelope, ExecutionStats, FocusBlock, FocusBlockRequest, InboundMessage,
        OutboundMessage, ProtocolError, RunRequest, SchemaVersion, ACTION_CONTENT_CHANGED,
        ACTION_CURSOR_MOVED, ACTION_EXECUTION_STATS, ACTION_FOCUS_BLOCK,
        ACTION_FOCUS_BLOCK_REQUEST, ACTION_RUN_REQUEST, ACTION_SCROLL_TO_BLOCK,
        ACTION_SCROLL_TO_LAST_RESULT, PROTOCOL_SCHEMA_VERSION,
    };
    use notebook_types::{BlockId, ExecutionStatus, LineStat, OutcomeClass, RunMode};

    #[test]
    fn test_action_identifiers_are_stable() {
        assert_eq!(ACTION_RUN_REQUEST, "run-request");
        assert_eq!(ACTION_CONTENT_CHANGED, "content-changed");
        assert_eq!(ACTION_CURSOR_MOVED, "cursor-moved");
        assert_eq!(ACTION_FOCUS_BLOCK_REQUEST, "focus-block-request");
        assert_eq!(ACTION_EXECUTION_STATS, "execution-stats");
        assert_eq!(ACTION_FOCUS_BLOCK, "focus-block");
        assert_eq!(ACTION_SCROLL_TO_BLOCK, "scroll-to-block");
        assert_eq!(ACTION_SCROLL_TO_LAST_RESULT, "scroll-to-last-result");
    }

    #[test]
    fn test_schema_version_is_1_0() {
        assert_eq!(PROTOCOL_SCHEMA_VERSION, SchemaVersion::new(1, 0));
    }

    #[test]
    fn test_same_major_versions_are_compatible() {
        let current = SchemaVersion::new(1, 0);
        assert!(SchemaVersion::new(1, 3).is_compatible_with(&current));
        assert!(!SchemaVersion::new(2, 0).is_compatible_with(&current));
    }

    #[test]
    fn test_envelope_json_shape() {
        let message = OutboundMessage::ContentChanged(ContentChanged {
            block_id: BlockId::new(),
            content: "x = 1".to_string(),
        });
        let envelope = message.into_envelope().unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&envelope).unwrap()).unwrap();

        assert!(json.get("id").is_some());
        assert_eq!(json["action"], "content-changed");
        assert_eq!(json["schemaVersion"]["major"], 1);
        // The payload travels as an embedded JSON string
        assert!(json["payload"].is_string());
    }

    #[test]
    fn test_run_request_payload_fields() {
        let payload = RunRequest {
            block_id: BlockId::new(),
            code: "x".to_string(),
            mode: RunMode::RunUpToBlock,
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        assert!(json.get("blockId").is_some());
        assert!(json.get("code").is_some());
        assert!(json.get("mode").is_some());
    }

    #[test]
    fn test_execution_stats_payload_fields() {
        let payload = ExecutionStats {
            block_id: BlockId::new(),
            stats: vec![LineStat::new(4, OutcomeClass::Warn, 2)],
            status: ExecutionStatus::Failed,
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        assert_eq!(json["stats"][0]["lineNumber"], 4);
        assert_eq!(json["stats"][0]["outcomeClass"], "warn");
        assert_eq!(json["stats"][0]["count"], 2);
        assert_eq!(json["status"], "failed");
    }

    #[test]
    fn test_inbound_envelope_roundtrip() {
        let block_id = BlockId::new();
        let envelope = Envelope::new(ACTION_FOCUS_BLOCK, &FocusBlock { block_id }).unwrap();
        let wire = serde_json::to_string(&envelope).unwrap();
        let received: Envelope = serde_json::from_str(&wire).unwrap();
        assert_eq!(
            InboundMessage::from_envelope(&received).unwrap(),
            InboundMessage::FocusBlock(FocusBlock { block_id })
        );
    }

    #[test]
    fn test_incompatible_major_version_is_rejected() {
        let envelope =
            Envelope::new(ACTION_FOCUS_BLOCK, &FocusBlock { block_id: BlockId::new() }).unwrap();
        let mut json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&envelope).unwrap()).unwrap();
        json["schemaVersion"]["major"] = serde_json::Value::from(2);
        let received: Envelope = serde_json::from_value(json).unwrap();
        assert!(matches!(
            InboundMessage::from_envelope(&received),
            Err(ProtocolError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_focus_block_request_payload_fields() {
        let payload = FocusBlockRequest {
            block_id: BlockId::new(),
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        assert!(json.get("blockId").is_some());
    }
}
