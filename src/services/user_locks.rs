use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::models::UserId;

/// Fixed set of mutexes serializing preference updates per user.
///
/// A user always maps to the same shard, so two updates for one user never
/// overlap. Unrelated users may share a shard and then simply queue behind
/// each other.
#[derive(Clone)]
pub struct UserLocks {
    shards: Arc<Vec<Mutex<()>>>,
}

impl UserLocks {
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1)).map(|_| Mutex::new(())).collect();
        Self {
            shards: Arc::new(shards),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_index(&self, user_id: UserId) -> usize {
        let mut hasher = DefaultHasher::new();
        user_id.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }

    /// Waits for exclusive access to `user_id`'s preference state
    pub async fn lock(&self, user_id: UserId) -> MutexGuard<'_, ()> {
        self.shards[self.shard_index(user_id)].lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_zero_shards_falls_back_to_one() {
        assert_eq!(UserLocks::new(0).shard_count(), 1);
    }

    #[test]
    fn test_same_user_same_shard() {
        let locks = UserLocks::new(16);
        assert_eq!(locks.shard_index(UserId(99)), locks.shard_index(UserId(99)));
        assert!(locks.shard_index(UserId(12345)) < 16);
    }

    #[tokio::test]
    async fn test_lock_excludes_same_user() {
        let locks = UserLocks::new(4);
        let guard = locks.lock(UserId(1)).await;

        let contender = locks.clone();
        let waiter = tokio::spawn(async move {
            let _g = contender.lock(UserId(1)).await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
