//! Customer repository.
//!
//! Plain CRUD over the `customers` collection with no cross-entity coupling.

use crate::model::customer::Customer;
use crate::repo::{
    rejected, text_value, warn_skipped_field, EntityKind, FieldUpdate, RepoError, RepoResult,
    SkipReason,
};
use crate::storage::{Collection, RecordStore};
use log::debug;

/// Collection key for customer records.
pub const CUSTOMERS_KEY: &str = "customers";

const KIND: EntityKind = EntityKind::Customer;

/// Customer CRUD backed by any record store.
#[derive(Debug, Clone)]
pub struct CustomerRepository<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> CustomerRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persists a new customer.
    ///
    /// # Errors
    /// - `AlreadyExists` when `customer_id` is taken.
    pub fn create(
        &self,
        customer_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> RepoResult<Customer> {
        let customer = Customer::new(customer_id, name, email, phone);
        let mut customers = self.load();
        if customers.contains_key(&customer.customer_id) {
            return Err(rejected(
                "customer_create",
                RepoError::already_exists(KIND, &customer.customer_id),
            ));
        }

        customers.insert(customer.customer_id.clone(), customer.clone());
        self.store.save(CUSTOMERS_KEY, &customers);
        debug!(
            "event=customer_create module=repo status=ok customer_id={}",
            customer.customer_id
        );
        Ok(customer)
    }

    /// Removes a customer. Reservations referencing it are left untouched.
    pub fn delete(&self, customer_id: &str) -> RepoResult<()> {
        let mut customers = self.load();
        if customers.remove(customer_id).is_none() {
            return Err(rejected(
                "customer_delete",
                RepoError::not_found(KIND, customer_id),
            ));
        }

        self.store.save(CUSTOMERS_KEY, &customers);
        debug!("event=customer_delete module=repo status=ok customer_id={customer_id}");
        Ok(())
    }

    pub fn get(&self, customer_id: &str) -> RepoResult<Customer> {
        self.load()
            .remove(customer_id)
            .ok_or_else(|| rejected("customer_get", RepoError::not_found(KIND, customer_id)))
    }

    /// Applies editable field changes (`name`, `email`, `phone`).
    ///
    /// Unknown fields and values that are neither text nor numbers are
    /// skipped with a warning; the update still succeeds.
    pub fn update<'a, I>(&self, customer_id: &str, fields: I) -> RepoResult<Customer>
    where
        I: IntoIterator<Item = FieldUpdate<'a>>,
    {
        let mut customers = self.load();
        let Some(customer) = customers.get_mut(customer_id) else {
            return Err(rejected(
                "customer_update",
                RepoError::not_found(KIND, customer_id),
            ));
        };

        for (field, value) in fields {
            let slot = match field {
                "name" => &mut customer.name,
                "email" => &mut customer.email,
                "phone" => &mut customer.phone,
                _ => {
                    warn_skipped_field(KIND, customer_id, field, SkipReason::UnknownField);
                    continue;
                }
            };
            match text_value(&value) {
                Some(text) => *slot = text,
                None => warn_skipped_field(KIND, customer_id, field, SkipReason::InvalidValue),
            }
        }

        let updated = customer.clone();
        self.store.save(CUSTOMERS_KEY, &customers);
        debug!("event=customer_update module=repo status=ok customer_id={customer_id}");
        Ok(updated)
    }

    fn load(&self) -> Collection<Customer> {
        self.store.load(CUSTOMERS_KEY)
    }
}
