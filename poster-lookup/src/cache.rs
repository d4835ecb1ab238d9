use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::PosterQuery;

/// Answers keyed by query, each valid for `ttl` after insertion.
pub(crate) struct TtlCache {
    ttl: Duration,
    entries: RwLock<HashMap<PosterQuery, (Instant, Option<String>)>>,
}

impl TtlCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Outer `None` on miss or expiry.
    pub(crate) async fn get(&self, key: &PosterQuery) -> Option<Option<String>> {
        let map = self.entries.read().await;
        let (at, value) = map.get(key)?;
        (at.elapsed() < self.ttl).then(|| value.clone())
    }

    pub(crate) async fn put(&self, key: PosterQuery, value: Option<String>) {
        let mut map = self.entries.write().await;
        map.retain(|_, (at, _)| at.elapsed() < self.ttl);
        map.insert(key, (Instant::now(), value));
    }
}
