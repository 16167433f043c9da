use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contact form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    /// Only ever goes from `false` to `true`.
    pub read: bool,
}

impl Message {
    pub fn new(name: String, email: String, subject: String, content: String) -> Self {
        Self {
            id: None,
            name,
            email,
            subject,
            content,
            sent_at: super::timestamp_now(),
            read: false,
        }
    }

    /// Mark the message as read. Returns `false` when it already was.
    pub fn mark_read(&mut self) -> bool {
        if self.read {
            return false;
        }
        self.read = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_read_is_one_way() {
        let mut message = Message::new(
            "Jane".into(),
            "jane@example.com".into(),
            "Hello".into(),
            "Some content here".into(),
        );
        assert!(!message.read);
        assert!(message.mark_read());
        assert!(message.read);
        assert!(!message.mark_read());
        assert!(message.read);
    }
}
