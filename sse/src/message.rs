use axum::response::sse::Event;
use std::fmt;
use std::time::Duration;

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// The kind of event carried by a `Message`, written as the SSE `event:` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A payload published to a topic
    Msg,
    /// The synthetic marker sent right before an idle subscription is closed
    Timeout,
}

impl EventType for Kind {
    fn event_type(&self) -> &'static str {
        match self {
            Kind::Msg => "msg",
            Kind::Timeout => "timeout",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.event_type())
    }
}

/// One event delivered to subscribers. Sequence 0 means "no id".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    sequence: u64,
    kind: Kind,
    payload: String,
}

impl Message {
    /// Builds a published message carrying a broker assigned sequence number.
    pub fn new(sequence: u64, payload: impl AsRef<str>) -> Self {
        Self {
            sequence,
            kind: Kind::Msg,
            payload: normalize_line_endings(payload.as_ref()),
        }
    }

    /// Builds the timeout marker for the given idle threshold.
    pub fn timeout(threshold: Duration) -> Self {
        Self {
            sequence: 0,
            kind: Kind::Timeout,
            payload: format_duration(threshold),
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == Kind::Timeout
    }
}

impl EventType for Message {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }
}

// Field order matters: axum writes fields in call order, giving
// `id: N\nevent: K\ndata: P\n\n`.
impl From<&Message> for Event {
    fn from(message: &Message) -> Self {
        let event = Event::default();
        let event = if message.sequence != 0 {
            event.id(message.sequence.to_string())
        } else {
            event
        };

        event.event(message.event_type()).data(&message.payload)
    }
}

impl From<Message> for Event {
    fn from(message: Message) -> Self {
        Event::from(&message)
    }
}

/// Renders a threshold the way it is reported in the timeout marker, e.g. `30s` or `250ms`.
pub fn format_duration(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// SSE can't carry carriage returns, so CRLF and lone CR become LF.
fn normalize_line_endings(payload: &str) -> String {
    if !payload.contains('\r') {
        return payload.to_string();
    }
    payload.replace("\r\n", "\n").replace('\r', "\n")
}
