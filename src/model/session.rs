use serde::{Deserialize, Serialize};

/// Role of the logged-in user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserType {
    Employee,
    Admin,
}

/// Snapshot of the logged-in user, as persisted under the session key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    #[serde(rename = "type")]
    pub user_type: UserType,
    #[serde(default)]
    pub email: String,
}

impl Session {
    pub fn employee(email: impl Into<String>) -> Self {
        Self {
            user_type: UserType::Employee,
            email: email.into(),
        }
    }

    pub fn admin(email: impl Into<String>) -> Self {
        Self {
            user_type: UserType::Admin,
            email: email.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_without_email() {
        let session: Session = serde_json::from_str(r#"{"type":"Employee"}"#).unwrap();
        assert_eq!(session.user_type, UserType::Employee);
        assert!(session.email.is_empty());
        assert!(!session.is_admin());
    }
}
