//! Realtime channel wire format
//!
//! Frames are JSON text messages `{ "event": <name>, "data": <payload> }`.
//! Outbound frames join or leave one pipeline room keyed by execution id;
//! inbound frames carry logs and status updates for that room. Arrival order
//! is the only ordering guarantee; there are no sequence numbers and no acks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::log::LogLine;
use crate::domain::status::{ExecutionId, PipelineStatusEvent, StepStatusEvent};

pub const EVENT_JOIN: &str = "join-pipeline";
pub const EVENT_LEAVE: &str = "leave-pipeline";
pub const EVENT_JOINED: &str = "joined-pipeline";
pub const EVENT_LOG: &str = "pipeline-log";
pub const EVENT_STATUS: &str = "pipeline-status";
pub const EVENT_STEP: &str = "step-status";

/// Raw frame as it appears on the wire
#[derive(Debug, Serialize, Deserialize)]
pub struct Frame {
    pub event: String,
    pub data: Value,
}

/// Decoded inbound message
#[derive(Debug, Clone)]
pub enum InboundEvent {
    Joined(ExecutionId),
    Log(LogLine),
    Status(PipelineStatusEvent),
    Step(StepStatusEvent),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinedPayload {
    execution_id: ExecutionId,
}

/// Encode a join frame for the given execution room.
pub fn encode_join(execution_id: &ExecutionId) -> String {
    encode(EVENT_JOIN, execution_id)
}

/// Encode a leave frame for the given execution room.
pub fn encode_leave(execution_id: &ExecutionId) -> String {
    encode(EVENT_LEAVE, execution_id)
}

fn encode(event: &str, execution_id: &ExecutionId) -> String {
    let frame = Frame {
        event: event.to_string(),
        data: Value::String(execution_id.as_str().to_string()),
    };
    serde_json::to_string(&frame).unwrap_or_else(|_| "{}".to_string())
}

/// Decode one inbound text frame.
///
/// Returns `None` for unrecognized event names or undecodable payloads;
/// the channel counts and logs those rather than failing the stream.
pub fn decode(text: &str) -> Option<InboundEvent> {
    let frame: Frame = serde_json::from_str(text).ok()?;
    match frame.event.as_str() {
        EVENT_JOINED => serde_json::from_value::<JoinedPayload>(frame.data)
            .ok()
            .map(|p| InboundEvent::Joined(p.execution_id)),
        EVENT_LOG => serde_json::from_value(frame.data).ok().map(InboundEvent::Log),
        EVENT_STATUS => serde_json::from_value(frame.data).ok().map(InboundEvent::Status),
        EVENT_STEP => serde_json::from_value(frame.data).ok().map(InboundEvent::Step),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::RunState;

    #[test]
    fn join_and_leave_frames_carry_the_execution_id() {
        let id: ExecutionId = "exec-7".into();
        let join: Frame = serde_json::from_str(&encode_join(&id)).unwrap();
        assert_eq!(join.event, EVENT_JOIN);
        assert_eq!(join.data, serde_json::json!("exec-7"));
        let leave: Frame = serde_json::from_str(&encode_leave(&id)).unwrap();
        assert_eq!(leave.event, EVENT_LEAVE);
    }

    #[test]
    fn decodes_step_status_frame() {
        let text = r#"{
            "event": "step-status",
            "data": {
                "stepName": "deploy",
                "status": "success",
                "timestamp": "2025-01-01T00:00:00Z"
            }
        }"#;
        match decode(text) {
            Some(InboundEvent::Step(step)) => {
                assert_eq!(step.step_name, "deploy");
                assert_eq!(step.status, RunState::Success);
            }
            other => panic!("unexpected decode result: {:?}", other),
        }
    }

    #[test]
    fn decodes_joined_frame() {
        let text = r#"{"event": "joined-pipeline", "data": {"executionId": "exec-3"}}"#;
        match decode(text) {
            Some(InboundEvent::Joined(id)) => assert_eq!(id.as_str(), "exec-3"),
            other => panic!("unexpected decode result: {:?}", other),
        }
    }

    #[test]
    fn unknown_event_is_ignored() {
        assert!(decode(r#"{"event": "heartbeat", "data": {}}"#).is_none());
        assert!(decode("not json").is_none());
    }
}
