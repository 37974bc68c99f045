//! Outbound message shapes.

use serde_json::Value;

use crate::error::WriterError;

/// The normalized on-wire shape of a message in a batch request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Entry {
    /// Unique within a batch; SQS uses it to report per-entry results.
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "MessageBody")]
    pub body: String,
    /// Required by FIFO queues.
    #[serde(rename = "MessageGroupId", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl Entry {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
            group_id: None,
        }
    }

    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }
}

/// A message handed to the writer.
#[derive(Clone, Debug, PartialEq)]
pub enum OutboundMessage {
    /// Already carries an id and a serialized body; sent as-is.
    Entry(Entry),
    /// Structured data the writer serializes and assigns a fresh id to.
    Payload(Value),
}

impl OutboundMessage {
    /// Converts any serializable value into a payload message.
    pub fn serialize<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self, WriterError> {
        let value = serde_json::to_value(value)?;
        Ok(Self::from(value))
    }
}

impl From<Entry> for OutboundMessage {
    fn from(entry: Entry) -> Self {
        Self::Entry(entry)
    }
}

/// Objects carrying non-empty `Id` and `MessageBody` strings are treated as
/// pre-formed entries, everything else as a payload.
impl From<Value> for OutboundMessage {
    fn from(value: Value) -> Self {
        match preformed_entry(&value) {
            Some(entry) => Self::Entry(entry),
            None => Self::Payload(value),
        }
    }
}

fn preformed_entry(value: &Value) -> Option<Entry> {
    let object = value.as_object()?;
    let id = object.get("Id")?.as_str().filter(|s| !s.is_empty())?;
    let body = object
        .get("MessageBody")?
        .as_str()
        .filter(|s| !s.is_empty())?;
    let group_id = object
        .get("MessageGroupId")
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(Entry {
        id: id.to_string(),
        body: body.to_string(),
        group_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recognizes_preformed_entries() {
        let message = OutboundMessage::from(json!({
            "Id": "msg-1",
            "MessageBody": "{\"a\": 1}",
            "MessageGroupId": "g"
        }));
        assert_eq!(
            message,
            OutboundMessage::Entry(Entry::new("msg-1", "{\"a\": 1}").with_group_id("g"))
        );
    }

    #[test]
    fn incomplete_entries_are_payloads() {
        for value in [
            json!({"Id": "msg-1"}),
            json!({"MessageBody": "hello"}),
            json!({"Id": "", "MessageBody": "hello"}),
            json!({"Id": "msg-1", "MessageBody": ""}),
            json!({"Id": 7, "MessageBody": "hello"}),
            json!("plain text"),
            json!([1, 2, 3]),
        ] {
            assert_eq!(
                OutboundMessage::from(value.clone()),
                OutboundMessage::Payload(value)
            );
        }
    }

    #[test]
    fn serialize_goes_through_value_detection() {
        #[derive(serde::Serialize)]
        struct Order {
            sku: &'static str,
            qty: u32,
        }

        let message = OutboundMessage::serialize(&Order { sku: "A-1", qty: 2 }).unwrap();
        assert_eq!(message, OutboundMessage::Payload(json!({"sku": "A-1", "qty": 2})));

        let entry = Entry::new("x", "y");
        assert_eq!(
            OutboundMessage::serialize(&entry).unwrap(),
            OutboundMessage::Entry(entry)
        );
    }

    #[test]
    fn serialize_failure_is_reported() {
        use std::collections::HashMap;

        // non-string map keys cannot become JSON object keys
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");
        assert!(matches!(
            OutboundMessage::serialize(&map),
            Err(WriterError::Serialization(_))
        ));
    }

    #[test]
    fn entry_wire_shape() {
        let json = serde_json::to_value(Entry::new("1", "body")).unwrap();
        assert_eq!(json, json!({"Id": "1", "MessageBody": "body"}));
    }
}
