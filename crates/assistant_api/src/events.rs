use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::AssistantApiError;
use crate::message::ChatMessage;

/// Nested payload of an `on_parser_stream` frame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamChunk {
    pub chunk: String,
}

/// Ordered heading→text sections of a `summary` frame.
///
/// The backend sends a plain JSON object; key order is significant for
/// rendering, so sections are kept as a list instead of a map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummarySections(pub Vec<(String, String)>);

impl<'de> Deserialize<'de> for SummarySections {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SectionsVisitor;

        impl<'de> Visitor<'de> for SectionsVisitor {
            type Value = SummarySections;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of section headings to section text")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut sections = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((heading, text)) = map.next_entry::<String, String>()? {
                    sections.push((heading, text));
                }
                Ok(SummarySections(sections))
            }
        }

        deserializer.deserialize_map(SectionsVisitor)
    }
}

/// Closed set of inbound backend events, tagged by the `event` field.
///
/// Unknown tags and frames missing required fields fail decoding; no event
/// kind is ever coerced into another.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChatEvent {
    AuthSuccess {
        user_id: String,
        user_name: String,
        message: String,
    },
    AuthError {
        message: String,
    },
    OnParserStart {
        run_id: String,
        name: String,
    },
    ThinkingStart {
        run_id: String,
        name: String,
    },
    ThinkingEnd {
        run_id: String,
        name: String,
    },
    OnParserStream {
        run_id: String,
        name: String,
        data: StreamChunk,
    },
    OnGenerationEnd {
        run_id: String,
        name: String,
        message_id: String,
    },
    DocumentExtraction {
        run_id: String,
        name: String,
    },
    DocumentSummarization {
        run_id: String,
        name: String,
    },
    Summary {
        run_id: String,
        name: String,
        data: SummarySections,
    },
    /// The backend omits `run_id` on some download frames, and the download
    /// side effect never correlates with a run, so the field is optional.
    Download {
        #[serde(default)]
        run_id: Option<String>,
        name: String,
        filename: String,
    },
    ChatCreation {
        session_id: String,
    },
    ChatLoad {
        session_id: String,
        history: Vec<ChatMessage>,
    },
}

/// Decode one inbound text frame into a typed event.
pub fn decode_frame(frame: &str) -> Result<ChatEvent, AssistantApiError> {
    serde_json::from_str(frame).map_err(AssistantApiError::Decode)
}

#[cfg(test)]
mod tests {
    use super::{decode_frame, ChatEvent};
    use crate::message::Rating;

    #[test]
    fn stream_frame_decodes_nested_chunk() {
        let event = decode_frame(
            r#"{"event":"on_parser_stream","run_id":"r1","name":"Bot","data":{"chunk":"Hel"}}"#,
        )
        .expect("stream frame decodes");

        match event {
            ChatEvent::OnParserStream { run_id, data, .. } => {
                assert_eq!(run_id, "r1");
                assert_eq!(data.chunk, "Hel");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn summary_sections_preserve_document_order() {
        let event = decode_frame(
            r#"{"event":"summary","run_id":"r2","name":"Bot","data":{"Risk":"Low","Cost":"High","Scope":"Wide"}}"#,
        )
        .expect("summary frame decodes");

        match event {
            ChatEvent::Summary { data, .. } => {
                let headings: Vec<&str> =
                    data.0.iter().map(|(heading, _)| heading.as_str()).collect();
                assert_eq!(headings, vec!["Risk", "Cost", "Scope"]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_is_a_decode_error() {
        assert!(decode_frame(r#"{"event":"mystery","run_id":"r1"}"#).is_err());
    }

    #[test]
    fn missing_required_field_is_a_decode_error() {
        // on_parser_start without run_id must not decode.
        assert!(decode_frame(r#"{"event":"on_parser_start","name":"Bot"}"#).is_err());
    }

    #[test]
    fn extra_fields_are_tolerated() {
        let event = decode_frame(
            r#"{"event":"auth_success","state":"success","message":"pass","user_id":"u1","user_name":"Alice"}"#,
        )
        .expect("auth frame with extra state field decodes");

        assert!(matches!(event, ChatEvent::AuthSuccess { .. }));
    }

    #[test]
    fn download_frame_decodes_without_run_id() {
        let event =
            decode_frame(r#"{"event":"download","name":"Bot","filename":"report.docx"}"#)
                .expect("download frame decodes");

        match event {
            ChatEvent::Download {
                run_id, filename, ..
            } => {
                assert_eq!(run_id, None);
                assert_eq!(filename, "report.docx");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn chat_load_carries_history_snapshots_in_order() {
        let event = decode_frame(
            r#"{"event":"chat_load","session_id":"s9","history":[
                {"id":"1","sender":"Вы","message":"hi"},
                {"id":"2","sender":"Bot","message":"hello","message_id":"m1","rating":"dislike"}
            ]}"#,
        )
        .expect("chat_load frame decodes");

        match event {
            ChatEvent::ChatLoad {
                session_id,
                history,
            } => {
                assert_eq!(session_id, "s9");
                assert_eq!(history.len(), 2);
                assert_eq!(history[0].sender, "Вы");
                assert_eq!(history[1].message_id.as_deref(), Some("m1"));
                assert_eq!(history[1].rating, Some(Rating::Dislike));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
