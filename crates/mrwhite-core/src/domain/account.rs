//! Account-scoped resources: dog profiles, uploaded documents, credits.

use serde::{Deserialize, Serialize};

/// A dog profile the assistant can be asked about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DogProfile {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub breed: Option<String>,
    /// Age in years.
    #[serde(default)]
    pub age: Option<f32>,
    #[serde(default)]
    pub weight: Option<f32>,
    #[serde(default)]
    pub gender: Option<String>,
}

/// A document (vet record, book, upload) the assistant can read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: i64,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Remaining credits and the plan they come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBalance {
    pub credits: i64,
    #[serde(default)]
    pub subscription_tier: Option<String>,
    #[serde(default)]
    pub is_subscribed: bool,
}

impl CreditBalance {
    /// Whether another chat message can be sent.
    #[must_use]
    pub const fn can_chat(&self) -> bool {
        self.is_subscribed || self.credits > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dog_profile_tolerates_missing_optionals() {
        let dog: DogProfile = serde_json::from_str(r#"{"id":1,"name":"Biscuit"}"#).unwrap();
        assert_eq!(dog.name, "Biscuit");
        assert!(dog.breed.is_none());
    }

    #[test]
    fn credit_balance_gates_chat() {
        let empty = CreditBalance {
            credits: 0,
            subscription_tier: None,
            is_subscribed: false,
        };
        assert!(!empty.can_chat());

        let subscribed = CreditBalance {
            is_subscribed: true,
            ..empty.clone()
        };
        assert!(subscribed.can_chat());
    }
}
