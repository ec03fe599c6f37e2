use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// A storefront customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl User {
    pub fn address_or_placeholder(&self) -> &str {
        match self.address.as_deref() {
            Some(address) if !address.trim().is_empty() => address,
            _ => "No address yet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_contact_fields_are_tolerated() {
        let user: User = serde_json::from_value(json!({
            "id": 3,
            "name": "Minh",
            "email": "minh@example.com",
            "address": null
        }))
        .unwrap();
        assert_eq!(user.phone, None);
        assert_eq!(user.address_or_placeholder(), "No address yet");
    }
}
