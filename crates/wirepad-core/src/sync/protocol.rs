//! Wire frames
//!
//! Two outbound frame kinds: raw text carrying the whole buffer, and a
//! JSON control frame for the save/clear actions. Inbound frames are raw
//! text only - the server pushes the full buffer content of the room and
//! nothing else.

use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::Message;

use crate::room::RoomId;

/// Control actions the server acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "SAVE")]
    Save,
    #[serde(rename = "CLEAR")]
    Clear,
}

/// Structured payload for the save and clear actions.
///
/// Constructed transiently, serialized, never kept around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPayload {
    pub action: Action,
    pub content: String,
    pub room_id: String,
}

impl ActionPayload {
    /// Ask the server to persist `content` for a room.
    pub fn save(content: impl Into<String>, room: &RoomId) -> Self {
        Self {
            action: Action::Save,
            content: content.into(),
            room_id: room.as_str().to_string(),
        }
    }

    /// Ask the server to wipe a room's stored content.
    pub fn clear(room: &RoomId) -> Self {
        Self {
            action: Action::Clear,
            content: String::new(),
            room_id: room.as_str().to_string(),
        }
    }

    /// Encode to the JSON wire form.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).expect("JSON encoding failed")
    }
}

/// Outbound frames on the sync channel.
#[derive(Debug, Clone)]
pub enum OutboundFrame {
    /// Full buffer content, broadcast live to the other viewers.
    Text(String),
    /// Save/clear control payload.
    Control(ActionPayload),
}

impl OutboundFrame {
    /// Convert to a WebSocket message.
    pub fn into_message(self) -> Message {
        match self {
            OutboundFrame::Text(text) => Message::Text(text),
            OutboundFrame::Control(payload) => Message::Text(payload.encode()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_payload_shape() {
        let room = RoomId::from_path("/demo");
        let payload = ActionPayload::save("hello", &room);

        let value: serde_json::Value = serde_json::from_str(&payload.encode()).unwrap();
        assert_eq!(value["action"], "SAVE");
        assert_eq!(value["content"], "hello");
        assert_eq!(value["room_id"], "demo");
    }

    #[test]
    fn test_clear_payload_has_empty_content() {
        let room = RoomId::from_path("/demo");
        let payload = ActionPayload::clear(&room);

        let value: serde_json::Value = serde_json::from_str(&payload.encode()).unwrap();
        assert_eq!(value["action"], "CLEAR");
        assert_eq!(value["content"], "");
        assert_eq!(value["room_id"], "demo");
    }

    #[test]
    fn test_payload_decoding() {
        let json = r#"{"action":"SAVE","content":"text","room_id":"global"}"#;
        let payload: ActionPayload = serde_json::from_str(json).unwrap();

        assert_eq!(payload.action, Action::Save);
        assert_eq!(payload.content, "text");
        assert_eq!(payload.room_id, "global");
    }

    #[test]
    fn test_text_frame_is_unwrapped() {
        // Live-typing broadcasts go out bare, with no envelope.
        let msg = OutboundFrame::Text("hello world".to_string()).into_message();
        assert_eq!(msg, Message::Text("hello world".to_string()));
    }

    #[test]
    fn test_control_frame_is_json() {
        let room = RoomId::from_path("/demo");
        let msg = OutboundFrame::Control(ActionPayload::clear(&room)).into_message();

        let text = msg.into_text().unwrap();
        assert!(serde_json::from_str::<ActionPayload>(&text).is_ok());
    }
}
