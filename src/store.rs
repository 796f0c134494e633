//! In-memory customer store.
//!
//! The store owns the `id → Customer` map and the id counter. It knows
//! nothing about HTTP; failures come back as [`StoreError`] and are turned
//! into responses by [`Rejection`](crate::Rejection).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::customer::Customer;

/// The field an update must carry.
pub const NAME_FIELD: &str = "Name";

/// Caller-supplied fields for an update. A `None` value is an explicit
/// `null`, which is different from the key being absent.
pub type Fields = HashMap<String, Option<String>>;

/// Domain failures. The messages are the exact reasons sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Customer with id '{0}' not found.")]
    NotFound(String),

    #[error("The mandatory argument '{0}' is missing in the request.")]
    MissingField(String),
}

struct Inner {
    customers: HashMap<String, Customer>,
    next_id: u64,
}

/// Shared, mutex-guarded customer map.
///
/// Every operation takes the lock once, so each one is atomic with respect
/// to the others. Ids come from a counter that starts at 1 and is never
/// reused, even after deletes.
pub struct CustomerStore {
    inner: Mutex<Inner>,
}

impl CustomerStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner { customers: HashMap::new(), next_id: 1 }),
        }
    }

    // No critical section can leave the map half-written, so a poisoned lock
    // is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(&self) -> Customer {
        let mut inner = self.lock();
        let id = inner.next_id.to_string();
        inner.next_id += 1;
        let customer = Customer::new(id.clone());
        inner.customers.insert(id, customer.clone());
        customer
    }

    pub fn get(&self, id: &str) -> Result<Customer, StoreError> {
        self.lock()
            .customers
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))
    }

    /// Sets the name from `fields` and stamps `created` with the current time.
    ///
    /// An unknown id wins over a missing `Name` key.
    pub fn update(&self, id: &str, fields: &Fields) -> Result<Customer, StoreError> {
        let mut inner = self.lock();
        let customer = inner
            .customers
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))?;
        let name = fields
            .get(NAME_FIELD)
            .ok_or_else(|| StoreError::MissingField(NAME_FIELD.to_owned()))?;
        customer.name = name.clone();
        customer.created = Some(Utc::now());
        Ok(customer.clone())
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.lock()
            .customers
            .remove(id)
            .map(drop)
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))
    }

    /// All live customers, in no particular order.
    pub fn list(&self) -> Vec<Customer> {
        self.lock().customers.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CustomerStore {
    fn default() -> Self { Self::new() }
}
