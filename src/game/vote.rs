use serde::{Deserialize, Serialize};

/// An immutable (voter, approve/reject) pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Vote {
    username: String,
    value: bool,
}

impl Vote {
    pub fn new(username: impl Into<String>, value: bool) -> Self {
        Self { username: username.into(), value }
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_value(&self) -> bool {
        self.value
    }

    pub fn serialize(&self) -> serde_json::Value {
        serde_json::json!({
            "username": self.username,
            "value": self.value,
        })
    }
}
