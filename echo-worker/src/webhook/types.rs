//! Inbound webhook payload types.
//!
//! The LINE platform posts a JSON envelope holding an ordered list of events.
//! Only message events carry a reply token we act on; every other event type
//! is decoded just far enough to be logged and skipped.

use serde::Deserialize;

/// Name of the `message.type` tag for plain text messages.
const TEXT_MESSAGE_TYPE: &str = "text";

/// Name of the event `type` tag for message events.
const MESSAGE_EVENT_TYPE: &str = "message";

/// Decoded webhook request body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEnvelope {
    /// User ID of the bot that should receive the events
    #[serde(default)]
    pub destination: Option<String>,
    /// Events in delivery order. Empty for the platform's verification ping.
    #[serde(default)]
    pub events: Vec<Event>,
}

/// One webhook event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct Event {
    pub kind: EventKind,
    pub timestamp: Option<i64>,
    pub source: Option<Source>,
    pub webhook_event_id: Option<String>,
    pub mode: Option<String>,
}

/// What the event asks of us.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// A user sent a message; reply with `reply_token`.
    Message {
        reply_token: String,
        message: Message,
    },
    /// follow, unfollow, join, leave, postback, ... carried by name only.
    Other(String),
}

impl Event {
    /// The raw `type` tag as sent by the platform.
    pub fn event_type(&self) -> &str {
        match &self.kind {
            EventKind::Message { .. } => MESSAGE_EVENT_TYPE,
            EventKind::Other(event_type) => event_type,
        }
    }
}

/// Message payload of a message event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawMessage")]
pub enum Message {
    Text { id: Option<String>, text: String },
    /// image, video, audio, file, location, sticker and any kind added later.
    Other { id: Option<String>, kind: String },
}

impl Message {
    pub fn kind(&self) -> &str {
        match self {
            Message::Text { .. } => TEXT_MESSAGE_TYPE,
            Message::Other { kind, .. } => kind,
        }
    }
}

/// Where an event came from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Source {
    User {
        #[serde(rename = "userId")]
        user_id: Option<String>,
    },
    Group {
        #[serde(rename = "groupId")]
        group_id: Option<String>,
        #[serde(rename = "userId")]
        user_id: Option<String>,
    },
    Room {
        #[serde(rename = "roomId")]
        room_id: Option<String>,
        #[serde(rename = "userId")]
        user_id: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

impl Source {
    pub fn kind(&self) -> &'static str {
        match self {
            Source::User { .. } => "user",
            Source::Group { .. } => "group",
            Source::Room { .. } => "room",
            Source::Unknown => "unknown",
        }
    }
}

// =============================================================================
// Wire shapes
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    reply_token: Option<String>,
    message: Option<Message>,
    timestamp: Option<i64>,
    source: Option<Source>,
    webhook_event_id: Option<String>,
    mode: Option<String>,
}

impl TryFrom<RawEvent> for Event {
    type Error = String;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let kind = if raw.event_type == MESSAGE_EVENT_TYPE {
            let reply_token = raw
                .reply_token
                .filter(|t| !t.is_empty())
                .ok_or("message event without replyToken")?;
            let message = raw.message.ok_or("message event without message")?;
            EventKind::Message {
                reply_token,
                message,
            }
        } else {
            EventKind::Other(raw.event_type)
        };

        Ok(Event {
            kind,
            timestamp: raw.timestamp,
            source: raw.source,
            webhook_event_id: raw.webhook_event_id,
            mode: raw.mode,
        })
    }
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    message_type: String,
    id: Option<String>,
    text: Option<String>,
}

impl TryFrom<RawMessage> for Message {
    type Error = String;

    fn try_from(raw: RawMessage) -> Result<Self, Self::Error> {
        if raw.message_type == TEXT_MESSAGE_TYPE {
            let text = raw.text.ok_or("text message without text")?;
            Ok(Message::Text { id: raw.id, text })
        } else {
            Ok(Message::Other {
                id: raw.id,
                kind: raw.message_type,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_message_event() {
        let body = r#"{
            "destination": "U0bot",
            "events": [{
                "type": "message",
                "replyToken": "tok1",
                "timestamp": 1462629479859,
                "mode": "active",
                "webhookEventId": "01FZ74A0TDDPYRVKNK77XKC3ZR",
                "source": {"type": "user", "userId": "U4af498"},
                "message": {"type": "text", "id": "325708", "text": "hello"}
            }]
        }"#;

        let envelope: WebhookEnvelope = serde_json::from_str(body).unwrap();

        assert_eq!(envelope.destination.as_deref(), Some("U0bot"));
        assert_eq!(envelope.events.len(), 1);
        let event = &envelope.events[0];
        assert_eq!(
            event.kind,
            EventKind::Message {
                reply_token: "tok1".to_string(),
                message: Message::Text {
                    id: Some("325708".to_string()),
                    text: "hello".to_string(),
                },
            }
        );
        assert_eq!(event.timestamp, Some(1462629479859));
        assert_eq!(
            event.source,
            Some(Source::User {
                user_id: Some("U4af498".to_string())
            })
        );
        assert_eq!(event.mode.as_deref(), Some("active"));
    }

    #[test]
    fn test_decode_sticker_as_other_message() {
        let body = r#"{"events": [{
            "type": "message",
            "replyToken": "tok2",
            "message": {"type": "sticker", "id": "1", "packageId": "1", "stickerId": "1"}
        }]}"#;

        let envelope: WebhookEnvelope = serde_json::from_str(body).unwrap();

        match &envelope.events[0].kind {
            EventKind::Message { message, .. } => assert_eq!(message.kind(), "sticker"),
            other => panic!("unexpected event kind: {other:?}"),
        }
    }

    #[test]
    fn test_decode_non_message_event() {
        let body = r#"{"events": [{
            "type": "follow",
            "replyToken": "tok3",
            "source": {"type": "group", "groupId": "Ca56f9", "userId": "U4af498"}
        }]}"#;

        let envelope: WebhookEnvelope = serde_json::from_str(body).unwrap();
        let event = &envelope.events[0];

        assert_eq!(event.kind, EventKind::Other("follow".to_string()));
        assert_eq!(event.event_type(), "follow");
        assert_eq!(event.source.as_ref().map(Source::kind), Some("group"));
    }

    #[test]
    fn test_decode_empty_and_missing_events() {
        let empty: WebhookEnvelope = serde_json::from_str(r#"{"events": []}"#).unwrap();
        assert!(empty.events.is_empty());

        let missing: WebhookEnvelope = serde_json::from_str(r#"{"destination": "U0"}"#).unwrap();
        assert!(missing.events.is_empty());
    }

    #[test]
    fn test_group_source_without_group_id() {
        let body = r#"{"events": [{
            "type": "message",
            "replyToken": "t",
            "source": {"type": "group", "userId": "U1"},
            "message": {"type": "text", "text": "hi"}
        }]}"#;

        let envelope: WebhookEnvelope = serde_json::from_str(body).unwrap();
        let event = &envelope.events[0];

        assert_eq!(
            event.source,
            Some(Source::Group {
                group_id: None,
                user_id: Some("U1".to_string())
            })
        );
        assert!(matches!(
            &event.kind,
            EventKind::Message { reply_token, message: Message::Text { text, .. } }
                if reply_token == "t" && text == "hi"
        ));
    }

    #[test]
    fn test_room_source_without_room_id() {
        let body = r#"{"events": [{"type": "leave", "source": {"type": "room"}}]}"#;
        let envelope: WebhookEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(
            envelope.events[0].source,
            Some(Source::Room {
                room_id: None,
                user_id: None
            })
        );
    }

    #[test]
    fn test_unknown_source_type() {
        let body = r#"{"events": [{"type": "unfollow", "source": {"type": "space"}}]}"#;
        let envelope: WebhookEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.events[0].source, Some(Source::Unknown));
    }

    #[test]
    fn test_message_event_without_reply_token_rejected() {
        let body = r#"{"events": [{"type": "message", "message": {"type": "text", "text": "hi"}}]}"#;
        assert!(serde_json::from_str::<WebhookEnvelope>(body).is_err());
    }

    #[test]
    fn test_text_message_without_text_rejected() {
        let body = r#"{"events": [{"type": "message", "replyToken": "t", "message": {"type": "text"}}]}"#;
        assert!(serde_json::from_str::<WebhookEnvelope>(body).is_err());
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(serde_json::from_str::<WebhookEnvelope>("not json").is_err());
        assert!(serde_json::from_str::<WebhookEnvelope>(r#"{"events": {}}"#).is_err());
    }
}
