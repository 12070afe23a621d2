//! Wire format for a message in flight.

use serde::{Deserialize, Serialize};

/// Body exchanged between ring members.
///
/// `original_text` is fixed when the message enters the ring.
/// `modified_text` carries the latest transformation; empty means the
/// message has not been transformed yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub original_text: String,
    pub modified_text: String,
}

impl Message {
    pub fn new(original_text: impl Into<String>, modified_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            modified_text: modified_text.into(),
        }
    }

    /// A message entering the ring.
    pub fn first_hop(text: impl Into<String>) -> Self {
        Self::new(text, String::new())
    }

    pub fn is_first_hop(&self) -> bool {
        self.modified_text.is_empty()
    }

    /// Text the current hop should transform.
    pub fn transform_input(&self) -> &str {
        if self.is_first_hop() {
            &self.original_text
        } else {
            &self.modified_text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_input() {
        let first = Message::first_hop("hello");
        assert!(first.is_first_hop());
        assert_eq!(first.transform_input(), "hello");

        let later = Message::new("hello", "jello");
        assert!(!later.is_first_hop());
        assert_eq!(later.transform_input(), "jello");
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(Message::new("a", "b")).unwrap();
        assert_eq!(json, serde_json::json!({"original_text": "a", "modified_text": "b"}));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let msg: Message = serde_json::from_str(r#"{"original_text":"hi"}"#).unwrap();
        assert_eq!(msg, Message::first_hop("hi"));
    }
}
