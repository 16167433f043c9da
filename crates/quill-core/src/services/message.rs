use std::sync::Arc;

use crate::domain::{Message, timestamp_now};
use crate::error::{DomainError, DomainResult};
use crate::ports::{BaseRepository, MessageRepository};
use crate::validation;

use super::for_entity;

/// Contact form submissions and their moderation.
pub struct MessageService {
    messages: Arc<dyn MessageRepository>,
}

impl MessageService {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    /// Store a new contact message. It always starts unread.
    pub async fn send(&self, message: Message) -> DomainResult<Message> {
        let message = Message {
            id: None,
            name: message.name.trim().to_string(),
            email: message.email.trim().to_string(),
            subject: message.subject.trim().to_string(),
            content: message.content,
            sent_at: timestamp_now(),
            read: false,
        };
        validation::validate_message(&message).into_result()?;

        let saved = self.messages.save(message).await?;
        tracing::info!(message_id = ?saved.id, "Contact message received");
        Ok(saved)
    }

    pub async fn all_messages(&self) -> DomainResult<Vec<Message>> {
        Ok(self.messages.find_all_newest_first().await?)
    }

    pub async fn unread_messages(&self) -> DomainResult<Vec<Message>> {
        Ok(self.messages.find_by_read_newest_first(false).await?)
    }

    pub async fn unread_count(&self) -> DomainResult<u64> {
        Ok(self.messages.count_by_read(false).await?)
    }

    /// Flag a message as read. Calling it on a read message changes nothing.
    pub async fn mark_as_read(&self, id: i64) -> DomainResult<Message> {
        let mut message = self
            .messages
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Message", id))?;

        if !message.mark_read() {
            return Ok(message);
        }
        Ok(self.messages.save(message).await?)
    }

    pub async fn delete(&self, id: i64) -> DomainResult<()> {
        self.messages
            .delete(id)
            .await
            .map_err(for_entity("Message", id))?;
        tracing::info!(message_id = id, "Contact message deleted");
        Ok(())
    }
}
