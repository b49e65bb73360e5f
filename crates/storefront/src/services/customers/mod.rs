//! Customer service.
//!
//! Registration, password login, address updates and password changes.
//! Methods return the stored [`Customer`]; routes decide whether the password
//! hash appears in the response.

mod error;

pub use error::CustomerError;

use chrono::Utc;
use tracing::instrument;

use cartline_core::{CustomerId, Email};

use crate::db::{RepositoryError, Store};
use crate::models::{Customer, NewCustomer};
use crate::services::password::CredentialHasher;

/// Details supplied when registering.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub password: String,
}

/// Customer account service.
pub struct CustomerService<'a> {
    store: &'a dyn Store,
    hasher: &'a CredentialHasher,
}

impl<'a> CustomerService<'a> {
    /// Create a new customer service.
    #[must_use]
    pub const fn new(store: &'a dyn Store, hasher: &'a CredentialHasher) -> Self {
        Self { store, hasher }
    }

    /// Every registered customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Repository` if the store fails.
    pub async fn list_all(&self) -> Result<Vec<Customer>, CustomerError> {
        Ok(self.store.list_customers().await?)
    }

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::InvalidEmail` if the email format is invalid.
    /// Returns `CustomerError::EmailTaken` if the email is already registered.
    #[instrument(skip_all)]
    pub async fn register(&self, registration: Registration) -> Result<Customer, CustomerError> {
        let email = Email::parse(&registration.email)?;

        if self
            .store
            .customer_by_email(email.as_str())
            .await?
            .is_some()
        {
            return Err(CustomerError::EmailTaken);
        }

        let password_hash = self.hasher.hash(&registration.password)?;

        let now = Utc::now();
        let new_customer = NewCustomer {
            first_name: registration.first_name,
            last_name: registration.last_name,
            email,
            phone_number: registration.phone_number,
            address: registration.address,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        // A concurrent registration can still win the race after the lookup;
        // the unique index reports it as a conflict.
        let customer = self
            .store
            .insert_customer(&new_customer)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => CustomerError::EmailTaken,
                other => CustomerError::Repository(other),
            })?;

        tracing::info!(customer_id = %customer.id, "Customer registered");
        Ok(customer)
    }

    /// Login with email and password.
    ///
    /// The email is matched exactly as given, without format validation.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::InvalidCredentials` if the email is unknown or
    /// the password is wrong.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<Customer, CustomerError> {
        let Some(customer) = self.store.customer_by_email(email).await? else {
            // Same Argon2 cost as a wrong password.
            let _ = self.hasher.verify_absent(password);
            return Err(CustomerError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &customer.password_hash) {
            return Err(CustomerError::InvalidCredentials);
        }

        Ok(customer)
    }

    /// Replace a customer's address.
    ///
    /// `customer_id` is the raw request value; one that is not an integer
    /// cannot match any customer. Only the address and the updated timestamp
    /// are written.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no customer has this id.
    #[instrument(skip(self, new_address))]
    pub async fn update_address(
        &self,
        customer_id: &str,
        new_address: &str,
    ) -> Result<Customer, CustomerError> {
        let id = parse_id(customer_id)?;

        self.store
            .update_customer_address(id, new_address, Utc::now())
            .await
            .map_err(not_found_or_repository)
    }

    /// Change a customer's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no customer has this id.
    /// Returns `CustomerError::WrongOldPassword` if `old_password` is wrong;
    /// the stored hash is left untouched.
    #[instrument(skip(self, old_password, new_password))]
    pub async fn change_password(
        &self,
        customer_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<Customer, CustomerError> {
        let id = parse_id(customer_id)?;
        let customer = self
            .store
            .customer_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound)?;

        if !self.hasher.verify(old_password, &customer.password_hash) {
            return Err(CustomerError::WrongOldPassword);
        }

        let password_hash = self.hasher.hash(new_password)?;
        let customer = self
            .store
            .update_customer_password(id, &password_hash, Utc::now())
            .await
            .map_err(not_found_or_repository)?;

        tracing::info!(customer_id = %customer.id, "Password changed");
        Ok(customer)
    }
}

fn parse_id(customer_id: &str) -> Result<CustomerId, CustomerError> {
    customer_id.parse().map_err(|_| CustomerError::NotFound)
}

fn not_found_or_repository(err: RepositoryError) -> CustomerError {
    match err {
        RepositoryError::NotFound => CustomerError::NotFound,
        other => CustomerError::Repository(other),
    }
}
