use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    likes::Like,
    messages::Message,
    profiles::{CandidateQuery, Profile},
};

use super::{
    like_repository::LikeRepository, message_repository::MessageRepository,
    profile_repository::ProfileRepository, StoreError,
};

/// Store double backing all repositories in unit tests.
///
/// `list_candidates` applies the same `CandidateQuery` filter, ordering and
/// limit as the Postgres query. With `set_enforce_references`, writes naming
/// an id with no stored profile fail like the foreign keys do.
#[derive(Default)]
pub struct InMemoryStore {
    likes: Mutex<Vec<Like>>,
    profiles: Mutex<Vec<Profile>>,
    messages: Mutex<Vec<Message>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    enforce_references: AtomicBool,
    reads: AtomicUsize,
    message_writes: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_enforce_references(&self, enforce: bool) {
        self.enforce_references.store(enforce, Ordering::SeqCst);
    }

    pub fn add_profile(&self, profile: Profile) {
        self.profiles.lock().unwrap().push(profile);
    }

    pub fn like_count(&self) -> usize {
        self.likes.lock().unwrap().len()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn message_write_count(&self) -> usize {
        self.message_writes.load(Ordering::SeqCst)
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    fn check_read(&self) -> Result<(), StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read refused".to_string()));
        }
        Ok(())
    }

    fn check_write(&self, references: &[Uuid]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write refused".to_string()));
        }
        if self.enforce_references.load(Ordering::SeqCst) {
            let profiles = self.profiles.lock().unwrap();
            if let Some(missing) = references
                .iter()
                .find(|id| !profiles.iter().any(|p| p.id == **id))
            {
                return Err(StoreError::UnknownReference(missing.to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn insert_like(&self, from_user: Uuid, to_user: Uuid) -> Result<Like, StoreError> {
        self.check_write(&[from_user, to_user])?;
        let mut likes = self.likes.lock().unwrap();
        if likes
            .iter()
            .any(|l| l.from_user == from_user && l.to_user == to_user)
        {
            return Err(StoreError::UniquenessConflict);
        }
        let like = Like {
            from_user,
            to_user,
            created_at: Utc::now(),
        };
        likes.push(like.clone());
        Ok(like)
    }

    async fn find_pair(&self, user_a: Uuid, user_b: Uuid) -> Result<Vec<Like>, StoreError> {
        self.check_read()?;
        let pair = [user_a, user_b];
        Ok(self
            .likes
            .lock()
            .unwrap()
            .iter()
            .filter(|l| pair.contains(&l.from_user) && pair.contains(&l.to_user))
            .cloned()
            .collect())
    }

    async fn list_sent(&self, from_user: Uuid) -> Result<Vec<Like>, StoreError> {
        self.check_read()?;
        Ok(self
            .likes
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.from_user == from_user)
            .cloned()
            .collect())
    }

    async fn list_received(&self, to_user: Uuid) -> Result<Vec<Like>, StoreError> {
        self.check_read()?;
        Ok(self
            .likes
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.to_user == to_user)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        self.check_read()?;
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_candidates(&self, query: &CandidateQuery) -> Result<Vec<Profile>, StoreError> {
        self.check_read()?;
        let mut rows: Vec<Profile> = self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .filter(|p| query.admits(p))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.cmp_activity(b));
        rows.truncate(query.limit);
        Ok(rows)
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn insert_message(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        body: &str,
    ) -> Result<Message, StoreError> {
        self.message_writes.fetch_add(1, Ordering::SeqCst);
        self.check_write(&[sender_id, recipient_id])?;
        let message = Message {
            id: Uuid::new_v4(),
            sender_id,
            recipient_id,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::profiles::{Gender, ProfileRow};

    fn row(gender: &str, profile_type: &str, minutes_ago: i64) -> Profile {
        ProfileRow {
            id: Uuid::new_v4(),
            display_name: "row".to_string(),
            gender: Some(gender.to_string()),
            gender_preference: None,
            profile_type: profile_type.to_string(),
            avatar_url: Some("https://cdn.example/row.jpg".to_string()),
            last_active_at: Some(Utc::now() - Duration::minutes(minutes_ago)),
        }
        .into()
    }

    #[tokio::test]
    async fn test_list_candidates_applies_query_before_limit() {
        let store = InMemoryStore::new();
        let viewer = row("m", "person", 0);
        let venue = row("f", " venue", 1);
        let liked = row("female", "person", 2);
        let first = row("F", "person", 3);
        let second = row(" Female", "person", 4);
        let third = row("f", "person", 5);
        let man = row("male", "person", 6);
        for p in [&viewer, &venue, &liked, &first, &second, &third, &man] {
            store.add_profile(p.clone());
        }

        let query = CandidateQuery {
            viewer: viewer.id,
            gender: Some(Gender::Female),
            exclude: vec![liked.id],
            limit: 2,
        };
        let ids: Vec<Uuid> = store
            .list_candidates(&query)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_enforced_references_reject_unknown_ids() {
        let store = InMemoryStore::new();
        let known = row("f", "person", 0);
        let other = row("m", "person", 0);
        store.add_profile(known.clone());
        store.add_profile(other.clone());
        store.set_enforce_references(true);

        let ghost = Uuid::new_v4();
        let err = store.insert_like(known.id, ghost).await.unwrap_err();
        assert_eq!(err, StoreError::UnknownReference(ghost.to_string()));
        let err = store.insert_message(ghost, known.id, "hi").await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownReference(_)));

        assert!(store.insert_like(known.id, other.id).await.is_ok());
        assert_eq!(store.like_count(), 1);
    }
}
