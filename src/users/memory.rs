use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::{
    repo::{StoreError, UserStore},
    repo_types::{age_on, NewUser, User, VerificationStatus},
};

/// In-process store used by the test suite.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("Email"));
        }
        if user.phone.is_some() && users.iter().any(|u| u.phone == user.phone) {
            return Err(StoreError::Duplicate("Phone number"));
        }
        let now = OffsetDateTime::now_utc();
        let record = User {
            id: Uuid::new_v4(),
            age: age_on(user.date_of_birth, now.date()),
            name: user.name,
            email: user.email,
            phone: user.phone,
            password_hash: user.password_hash,
            date_of_birth: user.date_of_birth,
            gender: user.gender,
            address: user.address,
            is_verified: false,
            verification_status: VerificationStatus::Pending,
            verified_at: None,
            profile_image: user.profile_image,
            created_at: now,
            updated_at: now,
        };
        users.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo_types::Gender;
    use time::macros::date;

    fn new_user(email: &str, phone: Option<&str>) -> NewUser {
        NewUser {
            name: "Voter".into(),
            email: email.into(),
            phone: phone.map(Into::into),
            password_hash: "digest".into(),
            date_of_birth: date!(1990 - 01 - 01),
            gender: Gender::Other,
            address: "Block C".into(),
            profile_image: None,
        }
    }

    #[tokio::test]
    async fn email_is_unique() {
        let store = MemoryUserStore::default();
        store.insert(new_user("a@uni.edu", None)).await.unwrap();
        let err = store.insert(new_user("a@uni.edu", None)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("Email")));
    }

    #[tokio::test]
    async fn absent_phone_is_not_a_collision() {
        let store = MemoryUserStore::default();
        store.insert(new_user("a@uni.edu", None)).await.unwrap();
        store.insert(new_user("b@uni.edu", None)).await.unwrap();
        store.insert(new_user("c@uni.edu", Some("+15550001"))).await.unwrap();
        let err = store
            .insert(new_user("d@uni.edu", Some("+15550001")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("Phone number")));
    }

    #[tokio::test]
    async fn insert_derives_age_and_pending_status() {
        let store = MemoryUserStore::default();
        let user = store.insert(new_user("a@uni.edu", None)).await.unwrap();
        let today = OffsetDateTime::now_utc().date();
        assert_eq!(user.age, age_on(date!(1990 - 01 - 01), today));
        assert_eq!(user.verification_status, VerificationStatus::Pending);
        assert!(!user.is_verified);
    }
}
