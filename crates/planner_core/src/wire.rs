//! JSON wire records exchanged with API clients.
//!
//! Outbound records nest as phase → subjects → tasks; notes are flat.
//! Field order in each struct is the field order on the wire.

use crate::model::curriculum::{Phase, PhaseId, Subject, SubjectId, Task, TaskId};
use crate::model::note::{NewNote, Note, NoteId};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NOTE_CONTENT_EMPTY_MESSAGE: &str = "note content must not be empty";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub id: SubjectId,
    pub name: String,
    pub tasks: Vec<TaskRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub id: PhaseId,
    pub number: i64,
    pub name: String,
    pub description: String,
    pub date_range: String,
    pub subjects: Vec<SubjectRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: NoteId,
    pub content: String,
    /// RFC 3339 UTC timestamp, assigned by the server.
    pub created_at: String,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            description: task.description.clone(),
        }
    }
}

impl From<&Subject> for SubjectRecord {
    fn from(subject: &Subject) -> Self {
        Self {
            id: subject.id,
            name: subject.name.clone(),
            tasks: subject.tasks.iter().map(TaskRecord::from).collect(),
        }
    }
}

impl From<&Phase> for PhaseRecord {
    fn from(phase: &Phase) -> Self {
        Self {
            id: phase.id,
            number: phase.number,
            name: phase.name.clone(),
            description: phase.description.clone(),
            date_range: phase.date_range.clone(),
            subjects: phase.subjects.iter().map(SubjectRecord::from).collect(),
        }
    }
}

impl From<&Note> for NoteRecord {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            content: note.content.clone(),
            created_at: note.created_at_rfc3339(),
        }
    }
}

/// Field-keyed rejection of an inbound record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message)
    }
}

impl Error for ValidationError {}

/// Inbound note body. Only `content` is read; `id`, `created_at` and any
/// other supplied field are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoteInput {
    /// JSON numbers are accepted and kept as their text form.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub content: Option<String>,
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TextVisitor)
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a string or a number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        // `Number` renders 5.0 as `5.0`; `f64` display would give `5`.
        let text = serde_json::Number::from_f64(value)
            .map_or_else(|| value.to_string(), |number| number.to_string());
        Ok(Some(text))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl NoteInput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// Parses a raw request body. An empty body is read as `{}`.
    pub fn from_json_bytes(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }

    pub fn validate(&self) -> Result<NewNote, ValidationError> {
        let content = self.content.as_deref().unwrap_or_default();
        NewNote::new(content).map_err(|_| ValidationError {
            field: "content",
            message: NOTE_CONTENT_EMPTY_MESSAGE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn phase_record_nests_subjects_and_tasks_in_order() {
        let phase = Phase {
            id: 5,
            number: 1,
            name: "Foundations".to_string(),
            description: "basics".to_string(),
            date_range: "Sep-Dec".to_string(),
            subjects: vec![Subject {
                id: 7,
                phase_id: 5,
                name: "Math".to_string(),
                tasks: vec![
                    Task {
                        id: 9,
                        subject_id: 7,
                        description: "limits".to_string(),
                    },
                    Task {
                        id: 10,
                        subject_id: 7,
                        description: "series".to_string(),
                    },
                ],
            }],
        };

        let value = serde_json::to_value(PhaseRecord::from(&phase)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 5,
                "number": 1,
                "name": "Foundations",
                "description": "basics",
                "date_range": "Sep-Dec",
                "subjects": [{
                    "id": 7,
                    "name": "Math",
                    "tasks": [
                        {"id": 9, "description": "limits"},
                        {"id": 10, "description": "series"}
                    ]
                }]
            })
        );
    }

    #[test]
    fn phase_record_field_order_matches_wire_contract() {
        let phase = Phase {
            id: 1,
            number: 2,
            name: "n".to_string(),
            description: "d".to_string(),
            date_range: "r".to_string(),
            subjects: Vec::new(),
        };
        let text = serde_json::to_string(&PhaseRecord::from(&phase)).unwrap();
        assert_eq!(
            text,
            r#"{"id":1,"number":2,"name":"n","description":"d","date_range":"r","subjects":[]}"#
        );
    }

    #[test]
    fn note_record_is_flat_with_timestamp_string() {
        let note = Note {
            id: 3,
            phase_id: 5,
            content: "review chapter 1".to_string(),
            created_at: Utc.timestamp_micros(1_760_862_600_000_001).unwrap(),
        };
        let text = serde_json::to_string(&NoteRecord::from(&note)).unwrap();
        assert_eq!(
            text,
            r#"{"id":3,"content":"review chapter 1","created_at":"2025-10-19T08:30:00.000001Z"}"#
        );
    }

    #[test]
    fn note_input_ignores_unknown_and_read_only_fields() {
        let input = NoteInput::from_json_bytes(
            br#"{"content":"hello","created_at":"2000-01-01T00:00:00Z","id":42,"extra":true}"#,
        )
        .unwrap();
        assert_eq!(input, NoteInput::new("hello"));
        assert_eq!(input.validate().unwrap().content(), "hello");
    }

    #[test]
    fn note_input_rejects_missing_null_and_blank_content() {
        let bodies: [&[u8]; 5] = [
            b"",
            b"{}",
            br#"{"content":null}"#,
            br#"{"content":""}"#,
            br#"{"content":"  "}"#,
        ];
        for body in bodies {
            let input = NoteInput::from_json_bytes(body).unwrap();
            let err = input.validate().unwrap_err();
            assert_eq!(err.field, "content");
            assert_eq!(err.message, NOTE_CONTENT_EMPTY_MESSAGE);
        }
    }

    #[test]
    fn note_input_reads_numeric_content_as_text() {
        let input = NoteInput::from_json_bytes(br#"{"content":5}"#).unwrap();
        assert_eq!(input, NoteInput::new("5"));
        let input = NoteInput::from_json_bytes(br#"{"content":-2.5}"#).unwrap();
        assert_eq!(input.validate().unwrap().content(), "-2.5");
        let input = NoteInput::from_json_bytes(br#"{"content":5.0}"#).unwrap();
        assert_eq!(input, NoteInput::new("5.0"));
    }

    #[test]
    fn note_input_rejects_non_text_content() {
        for body in [
            br#"{"content":true}"#.as_slice(),
            br#"{"content":["a"]}"#.as_slice(),
            br#"{"content":{"a":1}}"#.as_slice(),
        ] {
            assert!(NoteInput::from_json_bytes(body).is_err());
        }
    }

    #[test]
    fn note_input_reports_malformed_json() {
        assert!(NoteInput::from_json_bytes(b"{content:").is_err());
    }
}
