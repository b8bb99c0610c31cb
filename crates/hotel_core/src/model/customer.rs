//! Customer record.

use serde::{Deserialize, Serialize};

/// Contact record for a guest. Only the id carries any constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Customer {
    pub fn new(
        customer_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}
