//! User documents and the principal resolved from a token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::records::{Document, RecordError, RecordStore, new_id};

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

/// Access to the `users` collection.
#[derive(Clone)]
pub struct UserDirectory {
    store: RecordStore,
}

impl UserDirectory {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Adds a user. Emails are unique, compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Invalid`] for a blank name, an implausible
    /// email or a duplicate email.
    pub async fn create(&self, new_user: NewUser) -> Result<User, RecordError> {
        let name = new_user.name.trim();
        let email = new_user.email.trim().to_ascii_lowercase();

        if name.is_empty() {
            return Err(RecordError::invalid::<User>("name is required"));
        }
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(RecordError::invalid::<User>(format!("'{email}' is not an email address")));
        }
        if self.find_by_email(&email).await?.is_some() {
            return Err(RecordError::invalid::<User>(format!("'{email}' is already registered")));
        }

        let user = User {
            id: new_id(),
            name: name.to_string(),
            email,
            is_admin: new_user.is_admin,
            created_at: Utc::now(),
        };
        self.store.insert(&user).await?;
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns [`RecordError::Store`] if the lookup fails.
    pub async fn find(&self, id: &str) -> Result<Option<User>, RecordError> {
        self.store.find(id).await
    }

    /// # Errors
    ///
    /// Returns [`RecordError::Store`] if the listing fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RecordError> {
        let email = email.trim().to_ascii_lowercase();
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|user| user.email == email))
    }

    /// # Errors
    ///
    /// Returns [`RecordError::Store`] if the listing fails.
    pub async fn list(&self) -> Result<Vec<User>, RecordError> {
        self.store.all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> UserDirectory {
        UserDirectory::new(RecordStore::memory())
    }

    fn admin(email: &str) -> NewUser {
        NewUser {
            name: "Admin".to_string(),
            email: email.to_string(),
            is_admin: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let users = directory();
        let user = users.create(admin(" Owner@Example.com ")).await.unwrap();
        assert_eq!(user.email, "owner@example.com");
        assert!(user.is_admin);

        let found = users.find(&user.id).await.unwrap().unwrap();
        assert_eq!(found, user);
        assert!(users.find("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let users = directory();
        users.create(admin("a@b.com")).await.unwrap();
        let err = users.create(admin("A@B.com")).await.unwrap_err();
        assert!(matches!(err, RecordError::Invalid { .. }));
        assert_eq!(users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_rejected() {
        let users = directory();
        assert!(users.create(admin("nobody")).await.is_err());
        assert!(
            users
                .create(NewUser {
                    name: "  ".to_string(),
                    email: "a@b.com".to_string(),
                    is_admin: false,
                })
                .await
                .is_err()
        );
    }

    #[test]
    fn test_principal_wire_shape() {
        let principal = Principal {
            id: "u1".to_string(),
            name: "Admin".to_string(),
            email: "a@b.com".to_string(),
            is_admin: true,
        };
        let json = serde_json::to_value(&principal).unwrap();
        assert_eq!(json["_id"], "u1");
        assert_eq!(json["isAdmin"], true);
    }
}
