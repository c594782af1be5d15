//! User aggregate, roles and delivery preferences.

use super::{ParseRoleError, UserDomainError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a user plays in the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Implements backlog items.
    Developer,
    /// Facilitates sprints and watches for impediments.
    ScrumMaster,
    /// Owns the product backlog and decides on releases.
    ProductOwner,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::ScrumMaster => "scrum_master",
            Self::ProductOwner => "product_owner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "developer" => Ok(Self::Developer),
            "scrum_master" => Ok(Self::ScrumMaster),
            "product_owner" => Ok(Self::ProductOwner),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Delivery channel a user can opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Email delivery to [`ContactChannels::email`].
    Email,
    /// Chat delivery to [`ContactChannels::chat_handle`].
    Chat,
}

impl ChannelKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Chat => "chat",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addresses used by delivery channels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactChannels {
    email: Option<String>,
    chat_handle: Option<String>,
}

impl ContactChannels {
    /// Creates an empty set of contact channels.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            email: None,
            chat_handle: None,
        }
    }

    /// Sets the email address.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidEmail`] when the address has no
    /// non-empty local part and domain around a single `@`.
    pub fn with_email(mut self, email: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = email.into();
        let trimmed = raw.trim();
        let is_valid = trimmed
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            });
        if !is_valid {
            return Err(UserDomainError::InvalidEmail(raw));
        }
        self.email = Some(trimmed.to_owned());
        Ok(self)
    }

    /// Sets the chat handle, stripping a leading `@`.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyChatHandle`] when the handle is blank.
    pub fn with_chat_handle(mut self, handle: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = handle.into();
        let normalized = raw.trim().trim_start_matches('@');
        if normalized.is_empty() {
            return Err(UserDomainError::EmptyChatHandle);
        }
        self.chat_handle = Some(normalized.to_owned());
        Ok(self)
    }

    /// Returns the email address, if any.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the chat handle, if any.
    #[must_use]
    pub fn chat_handle(&self) -> Option<&str> {
        self.chat_handle.as_deref()
    }
}

/// A person taking part in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    role: Role,
    contacts: ContactChannels,
    preferences: Vec<ChannelKind>,
}

impl User {
    /// Creates a user without notification preferences.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyName`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        role: Role,
        contacts: ContactChannels,
    ) -> Result<Self, UserDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyName);
        }
        Ok(Self {
            id: UserId::new(),
            name: trimmed.to_owned(),
            role,
            contacts,
            preferences: Vec::new(),
        })
    }

    /// Adds a notification preference; returns the user for chaining.
    #[must_use]
    pub fn with_preference(mut self, kind: ChannelKind) -> Self {
        self.add_preference(kind);
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the user's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the contact channels.
    #[must_use]
    pub const fn contacts(&self) -> &ContactChannels {
        &self.contacts
    }

    /// Returns notification preferences in the order they were added.
    #[must_use]
    pub fn preferences(&self) -> &[ChannelKind] {
        &self.preferences
    }

    /// Adds a notification preference unless already present.
    ///
    /// Returns `true` when the preference was added.
    pub fn add_preference(&mut self, kind: ChannelKind) -> bool {
        if self.preferences.contains(&kind) {
            return false;
        }
        self.preferences.push(kind);
        true
    }

    /// Removes a notification preference if present.
    ///
    /// Returns `true` when the preference was removed.
    pub fn remove_preference(&mut self, kind: ChannelKind) -> bool {
        let before = self.preferences.len();
        self.preferences.retain(|existing| *existing != kind);
        self.preferences.len() != before
    }

    /// Replaces the contact channels.
    pub fn update_contacts(&mut self, contacts: ContactChannels) {
        self.contacts = contacts;
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.role)
    }
}
