//! Session binding between a conversation and a platform user.

use serde::{Deserialize, Serialize};

/// The user a session speaks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
}

/// Identity binding resolved by the host bot for an inbound event.
///
/// Deserializes from the `{ "user": { "id": "..." } }` shape session stores
/// persist; any other fields are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user: SessionUser { id: user_id.into() },
            extra: serde_json::Map::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

/// Whether a context can address a user at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionBinding {
    Bound(Session),
    #[default]
    Unbound,
}

impl SessionBinding {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            SessionBinding::Bound(session) => Some(session.user_id()),
            SessionBinding::Unbound => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, SessionBinding::Bound(_))
    }
}

impl From<Session> for SessionBinding {
    fn from(session: Session) -> Self {
        SessionBinding::Bound(session)
    }
}

impl From<Option<Session>> for SessionBinding {
    fn from(session: Option<Session>) -> Self {
        session.map_or(SessionBinding::Unbound, SessionBinding::Bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_user_id_and_keeps_extra_fields() {
        let session: Session = serde_json::from_value(serde_json::json!({
            "user": { "id": "psid-1" },
            "platform": "messenger",
        }))
        .unwrap();
        assert_eq!(session.user_id(), "psid-1");
        assert_eq!(session.extra["platform"], "messenger");
    }

    #[test]
    fn missing_session_is_unbound() {
        let binding = SessionBinding::from(None::<Session>);
        assert!(!binding.is_bound());
        assert_eq!(binding.user_id(), None);
        assert_eq!(SessionBinding::default(), SessionBinding::Unbound);
    }
}
