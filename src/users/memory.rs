use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    repo::UserStore,
    repo_types::{NewUser, ToggleOutcome, User, UserStatus},
};
use crate::weekday::{day_number, Registration};

/// Process-local store for tests and `USER_STORE=memory` runs.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts with an explicit registration time.
    pub async fn insert_at(&self, user: NewUser, register_at: OffsetDateTime) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            address: user.address,
            latitude: user.latitude,
            longitude: user.longitude,
            status: user.status.as_str().to_string(),
            register_at,
        };
        self.users.write().await.push(user.clone());
        user
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    #[cfg(test)]
    pub async fn set_status(&self, id: Uuid, status: &str) {
        if let Some(u) = self.users.write().await.iter_mut().find(|u| u.id == id) {
            u.status = status.to_string();
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            anyhow::bail!("unique violation on users.email");
        }
        Ok(self.insert_at(user, OffsetDateTime::now_utc()).await)
    }

    async fn toggle_statuses(&self) -> anyhow::Result<ToggleOutcome> {
        let mut users = self.users.write().await;
        let mut modified = 0;
        for user in users.iter_mut() {
            if let Ok(status) = user.status.parse::<UserStatus>() {
                user.status = status.toggled().as_str().to_string();
                modified += 1;
            }
        }
        Ok(ToggleOutcome {
            matched: users.len() as u64,
            modified,
        })
    }

    async fn registrations_on(&self, day_numbers: &[u8]) -> anyhow::Result<Vec<Registration>> {
        let users = self.users.read().await;
        let mut rows: Vec<Registration> = users
            .iter()
            .filter(|u| day_numbers.contains(&day_number(u.register_at)))
            .map(|u| Registration {
                name: u.name.clone(),
                email: u.email.clone(),
                register_at: u.register_at,
            })
            .collect();
        rows.sort_by_key(|r| r.register_at);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: email.split('@').next().unwrap_or_default().to_string(),
            email: email.into(),
            password_hash: "hash".into(),
            address: None,
            latitude: None,
            longitude: None,
            status: UserStatus::Active,
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        store.create(new_user("a@example.com")).await.unwrap();
        assert!(store.create(new_user("a@example.com")).await.is_err());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn toggle_twice_restores_and_skips_unknown_statuses() {
        let store = MemoryUserStore::new();
        let a = store.create(new_user("a@example.com")).await.unwrap();
        let mut b = new_user("b@example.com");
        b.status = UserStatus::Inactive;
        let b = store.create(b).await.unwrap();
        let c = store.create(new_user("c@example.com")).await.unwrap();
        store.set_status(c.id, "suspended").await;

        let first = store.toggle_statuses().await.unwrap();
        assert_eq!(first, ToggleOutcome { matched: 3, modified: 2 });
        assert_eq!(store.find_by_id(a.id).await.unwrap().unwrap().status, "inactive");
        assert_eq!(store.find_by_id(b.id).await.unwrap().unwrap().status, "active");
        assert_eq!(store.find_by_id(c.id).await.unwrap().unwrap().status, "suspended");

        store.toggle_statuses().await.unwrap();
        assert_eq!(store.find_by_id(a.id).await.unwrap().unwrap().status, "active");
        assert_eq!(store.find_by_id(b.id).await.unwrap().unwrap().status, "inactive");
        assert_eq!(store.find_by_id(c.id).await.unwrap().unwrap().status, "suspended");
    }

    #[tokio::test]
    async fn toggle_on_empty_store_matches_nothing() {
        let store = MemoryUserStore::new();
        let outcome = store.toggle_statuses().await.unwrap();
        assert_eq!(outcome, ToggleOutcome { matched: 0, modified: 0 });
    }

    #[tokio::test]
    async fn registrations_filter_by_utc_day() {
        let store = MemoryUserStore::new();
        store
            .insert_at(new_user("wed@example.com"), datetime!(2024-01-03 23:59 UTC))
            .await;
        store
            .insert_at(new_user("thu@example.com"), datetime!(2024-01-04 00:00 UTC))
            .await;

        let wed = store.registrations_on(&[4]).await.unwrap();
        assert_eq!(wed.len(), 1);
        assert_eq!(wed[0].email, "wed@example.com");

        let both = store.registrations_on(&[5, 4]).await.unwrap();
        assert_eq!(both.len(), 2);
        assert_eq!(both[0].email, "wed@example.com");
    }
}
