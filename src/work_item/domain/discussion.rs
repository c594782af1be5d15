//! Discussion threads attached to backlog items.

use super::{BacklogItemDomainError, ThreadId};
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single message posted to a discussion thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionMessage {
    author: UserId,
    content: String,
    posted_at: DateTime<Utc>,
}

impl DiscussionMessage {
    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the message body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when the message was posted.
    #[must_use]
    pub const fn posted_at(&self) -> DateTime<Utc> {
        self.posted_at
    }
}

/// An ordered conversation about a backlog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionThread {
    id: ThreadId,
    subject: String,
    messages: Vec<DiscussionMessage>,
    created_at: DateTime<Utc>,
}

impl DiscussionThread {
    pub(super) fn new(
        subject: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, BacklogItemDomainError> {
        let trimmed = subject.trim();
        if trimmed.is_empty() {
            return Err(BacklogItemDomainError::EmptyThreadSubject);
        }
        Ok(Self {
            id: ThreadId::new(),
            subject: trimmed.to_owned(),
            messages: Vec::new(),
            created_at,
        })
    }

    /// Returns the thread identifier.
    #[must_use]
    pub const fn id(&self) -> ThreadId {
        self.id
    }

    /// Returns the subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns messages in posting order.
    #[must_use]
    pub fn messages(&self) -> &[DiscussionMessage] {
        &self.messages
    }

    /// Returns when the thread was opened.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns every distinct author, in order of first post.
    #[must_use]
    pub fn participants(&self) -> Vec<UserId> {
        let mut authors = Vec::new();
        for message in &self.messages {
            if !authors.contains(&message.author) {
                authors.push(message.author);
            }
        }
        authors
    }

    pub(super) fn append(&mut self, author: UserId, content: String, posted_at: DateTime<Utc>) {
        self.messages.push(DiscussionMessage {
            author,
            content,
            posted_at,
        });
    }
}
