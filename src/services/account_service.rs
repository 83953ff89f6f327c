use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AccessToken, AuthError, CredentialVerifier};
use crate::database::models::{Account, Role};
use crate::database::{Collection, DatabaseError};
use crate::error::ApiError;
use crate::filter::Predicate;
use crate::validation::{ValidationErrors, Validator};

/// Sign-up payload, also used by admins creating accounts of other roles.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
    pub national_id: String,
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Email already registered")]
    EmailTaken,

    #[error("National ID already registered")]
    NationalIdTaken,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Account is inactive")]
    Inactive,

    #[error("Account not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Credentials(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(errors) => errors.into(),
            AccountError::EmailTaken | AccountError::NationalIdTaken => ApiError::conflict(err.to_string()),
            AccountError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            AccountError::Inactive => ApiError::forbidden(err.to_string()),
            AccountError::NotFound(_) => ApiError::not_found("Account not found"),
            AccountError::Credentials(e) => e.into(),
            AccountError::Database(e) => e.into(),
        }
    }
}

/// Registration, login and activation of accounts.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn Collection<Account>>,
    credentials: CredentialVerifier,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn Collection<Account>>, credentials: CredentialVerifier) -> Self {
        Self { accounts, credentials }
    }

    /// Validates and stores a new account with `role`.
    pub async fn register(&self, registration: Registration, role: Role) -> Result<Account, AccountError> {
        Validator::new()
            .email("email", &registration.email)
            .required("full_name", &registration.full_name)
            .phone_number("phone_number", &registration.phone_number)
            .national_id("national_id", &registration.national_id)
            .password("password", &registration.password)
            .finish()?;

        let email = normalize_email(&registration.email);
        if self.accounts.find_one(Predicate::eq("email", email.as_str())).await?.is_some() {
            return Err(AccountError::EmailTaken);
        }
        if self
            .accounts
            .find_one(Predicate::eq("national_id", registration.national_id.as_str()))
            .await?
            .is_some()
        {
            return Err(AccountError::NationalIdTaken);
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email,
            full_name: registration.full_name.trim().to_string(),
            phone_number: registration.phone_number,
            national_id: registration.national_id,
            password_hash: self.credentials.hash(&registration.password).await?,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.accounts.insert(account.clone()).await?;
        tracing::info!("Registered {} account {} ({})", account.role, account.id, account.email);
        Ok(account)
    }

    /// Checks an email/password pair. Unknown email and wrong password are indistinguishable.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let Some(account) = self
            .accounts
            .find_one(Predicate::eq("email", normalize_email(email)))
            .await?
        else {
            self.credentials.verify_unknown(password).await?;
            return Err(AccountError::InvalidCredentials);
        };

        if !self.credentials.verify(password, &account.password_hash).await? {
            tracing::debug!("Password mismatch for account {}", account.id);
            return Err(AccountError::InvalidCredentials);
        }
        if !account.is_active {
            return Err(AccountError::Inactive);
        }
        Ok(account)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, AccountError> {
        let account = self.authenticate(email, password).await?;
        Ok(self.credentials.issue(account.id)?)
    }

    /// Flips the active flag and returns the updated account.
    pub async fn toggle_active(&self, id: Uuid) -> Result<Account, AccountError> {
        let mut account = self.accounts.find_by_id(id).await?.ok_or(AccountError::NotFound(id))?;
        account.is_active = !account.is_active;
        account.updated_at = Utc::now();
        self.accounts.update(account.clone()).await?;
        tracing::info!("Account {} is now {}", id, if account.is_active { "active" } else { "inactive" });
        Ok(account)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
