use serde::{Deserialize, Serialize};

pub const GLOBAL_SESSION_ID: &str = "global-debate";

/// The pair of debate topics shared by every context.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub topic_a: String,
    pub topic_b: String,
    pub id: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            topic_a: "AI as a Tool".to_string(),
            topic_b: "AI as a Threat".to_string(),
            id: GLOBAL_SESSION_ID.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionUpdate {
    pub topic_a: Option<String>,
    pub topic_b: Option<String>,
}

impl SessionUpdate {
    pub fn topic_a(value: impl Into<String>) -> Self {
        Self {
            topic_a: Some(value.into()),
            topic_b: None,
        }
    }

    pub fn topic_b(value: impl Into<String>) -> Self {
        Self {
            topic_a: None,
            topic_b: Some(value.into()),
        }
    }

    pub fn both(topic_a: impl Into<String>, topic_b: impl Into<String>) -> Self {
        Self {
            topic_a: Some(topic_a.into()),
            topic_b: Some(topic_b.into()),
        }
    }
}

impl SessionState {
    /// Applies the provided fields; the id never changes.
    pub fn merge(&mut self, update: SessionUpdate) {
        if let Some(topic_a) = update.topic_a {
            self.topic_a = topic_a;
        }
        if let Some(topic_b) = update.topic_b {
            self.topic_b = topic_b;
        }
    }

    /// Takes both topics from a remote state, last write wins.
    pub fn replace_topics(&mut self, remote: SessionState) {
        self.topic_a = remote.topic_a;
        self.topic_b = remote.topic_b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_single_field() {
        let mut session = SessionState::default();
        session.merge(SessionUpdate::topic_a("X"));
        assert_eq!(session.topic_a, "X");
        assert_eq!(session.topic_b, "AI as a Threat");
        assert_eq!(session.id, GLOBAL_SESSION_ID);
    }

    #[test]
    fn test_merge_accepts_empty_topics() {
        let mut session = SessionState::default();
        session.merge(SessionUpdate::both("", ""));
        assert_eq!(session.topic_a, "");
        assert_eq!(session.topic_b, "");
    }

    #[test]
    fn test_replace_topics_keeps_id() {
        let mut session = SessionState::default();
        session.replace_topics(SessionState {
            topic_a: "Cats".into(),
            topic_b: "Dogs".into(),
            id: "elsewhere".into(),
        });
        assert_eq!(session.topic_a, "Cats");
        assert_eq!(session.topic_b, "Dogs");
        assert_eq!(session.id, GLOBAL_SESSION_ID);
    }
}
