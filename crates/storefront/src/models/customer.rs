//! Customer domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cartline_core::{CustomerId, Email};

/// A registered customer.
///
/// `password_hash` is an Argon2 PHC string. It is never serialized directly;
/// see [`CustomerView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone_number: String,
    pub address: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A customer that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone_number: String,
    pub address: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// JSON representation of a customer.
///
/// The `password` key is omitted entirely unless the view was built with
/// [`CustomerView::with_password_hash`].
#[derive(Debug, Clone, Serialize)]
pub struct CustomerView {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone_number: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerView {
    /// View without the password hash.
    #[must_use]
    pub fn redacted(customer: Customer) -> Self {
        let mut view = Self::with_password_hash(customer);
        view.password = None;
        view
    }

    /// View that includes the stored password hash.
    ///
    /// Only the address-update and password-change responses use this; API
    /// clients written against those endpoints read the field back.
    #[must_use]
    pub fn with_password_hash(customer: Customer) -> Self {
        Self {
            customer_id: customer.id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            phone_number: customer.phone_number,
            address: customer.address,
            password: Some(customer.password_hash),
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        let now = Utc::now();
        Customer {
            id: CustomerId::new(1),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: Email::parse("a@x.com").unwrap(),
            phone_number: "0812345678".to_owned(),
            address: "1 Analytical Way".to_owned(),
            password_hash: "$argon2id$v=19$hash".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_redacted_view_has_no_password_key() {
        let json = serde_json::to_value(CustomerView::redacted(customer())).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["customer_id"], 1);
        assert_eq!(json["email"], "a@x.com");
    }

    #[test]
    fn test_view_with_password_hash() {
        let json = serde_json::to_value(CustomerView::with_password_hash(customer())).unwrap();
        assert_eq!(json["password"], "$argon2id$v=19$hash");
    }
}
