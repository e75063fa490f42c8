//! Draft pick write path and duplicate-card bookkeeping.
//!
//! All mutations of the draft_picks table go through [`record_pick`], which
//! inserts the row, invalidates the duplicate-card cache, and publishes the
//! domain event that drives live draft boards. Routing every write through
//! one function is what keeps the cache from going stale silently.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use entity::draft_picks::Model;
use entity_api::draft_pick;
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};

/// Process-wide memo of the card ids that occur more than once across all
/// recorded picks.
///
/// The cached set equals the duplicate set as of its last population and is
/// cleared by [`record_pick`] on every write. It is a best-effort
/// accelerator, not a source of truth: it lives only as long as the process
/// and is rebuilt from the database on demand. Constructed explicitly and
/// shared through app state so tests get isolated instances.
pub struct DuplicateCardCache {
    cached: RwLock<Option<Arc<HashSet<String>>>>,
}

impl DuplicateCardCache {
    pub fn new() -> Self {
        Self {
            cached: RwLock::new(None),
        }
    }

    /// Returns the duplicate-card-id set, populating it from the database on
    /// the first call after construction or invalidation. Concurrent callers
    /// racing an invalidation may each run the backing query; there is no
    /// cross-request mutual exclusion here (see [`ScopedDuplicates`] for the
    /// per-request layer).
    pub async fn duplicate_card_ids(
        &self,
        db: &DatabaseConnection,
    ) -> Result<Arc<HashSet<String>>, Error> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            return Ok(Arc::clone(cached));
        }

        let picks = draft_pick::list_all(db).await?;
        let duplicates = Arc::new(duplicates_from(&picks));
        debug!(
            "Populated duplicate-card cache with {} ids from {} picks",
            duplicates.len(),
            picks.len()
        );

        *self.cached.write().await = Some(Arc::clone(&duplicates));
        Ok(duplicates)
    }

    /// Clears the memo unconditionally. The next read repopulates from the
    /// database.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }
}

impl Default for DuplicateCardCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-pass occurrence count over the full pick collection, keeping the
/// ids seen more than once.
fn duplicates_from(picks: &[Model]) -> HashSet<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for pick in picks {
        *counts.entry(pick.card_id.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(card_id, _)| card_id.to_string())
        .collect()
}

/// Request-scoped view over [`DuplicateCardCache`]. Construct one per
/// inbound request: concurrent lookups within the request share a single
/// population, so N readers racing an empty cache issue at most one backing
/// query per request.
#[derive(Default)]
pub struct ScopedDuplicates {
    cell: OnceCell<Arc<HashSet<String>>>,
}

impl ScopedDuplicates {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub async fn get(
        &self,
        cache: &DuplicateCardCache,
        db: &DatabaseConnection,
    ) -> Result<Arc<HashSet<String>>, Error> {
        self.cell
            .get_or_try_init(|| cache.duplicate_card_ids(db))
            .await
            .cloned()
    }

    pub async fn is_duplicate(
        &self,
        cache: &DuplicateCardCache,
        db: &DatabaseConnection,
        card_id: &str,
    ) -> Result<bool, Error> {
        Ok(self.get(cache, db).await?.contains(card_id))
    }
}

/// The single write path for draft picks: validates, inserts the row,
/// invalidates the duplicate-card cache, and publishes
/// [`DomainEvent::DraftPickRecorded`] for live draft boards.
pub async fn record_pick(
    db: &DatabaseConnection,
    cache: &DuplicateCardCache,
    publisher: &EventPublisher,
    model: Model,
) -> Result<Model, Error> {
    if model.card_name.trim().is_empty() {
        return Err(Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                crate::error::EntityErrorKind::Invalid,
            )),
        });
    }

    let pick = draft_pick::create(db, model).await?;

    cache.invalidate().await;

    let payload = serde_json::to_value(&pick).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
            "Failed to serialize draft pick".to_string(),
        )),
    })?;
    publisher
        .publish(DomainEvent::DraftPickRecorded {
            session_id: pick.session_id.clone(),
            pick: payload,
        })
        .await;

    debug!(
        "Recorded pick {} ({}) for session {}",
        pick.pick_number, pick.card_name, pick.session_id
    );

    Ok(pick)
}

/// Pick history for one session, ordered by pick number. Draft boards call
/// this to resync after an SSE reconnect.
pub async fn pick_history(db: &DatabaseConnection, session_id: &str) -> Result<Vec<Model>, Error> {
    Ok(draft_pick::list_by_session(db, session_id).await?)
}
