//! Attendee directory service
//!
//! In-process roster of attendee records synchronized from the store. The
//! cache is rebuilt by `reload` and updated through `apply` only after a
//! store write has been confirmed; it is never mutated speculatively.
//! Lookups go through two separate indexes, one keyed by store ID and one by
//! QR token, so the identifier spaces cannot shadow each other.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::database::repositories::AttendeeRepository;
use crate::models::attendee::{Attendee, AttendeeStats, CreateAttendeeRequest};
use crate::utils::errors::Result;

/// Cached roster state with explicit ID and QR token indexes
#[derive(Debug, Default)]
struct RosterCache {
    order: Vec<i64>,
    by_id: HashMap<i64, Attendee>,
    id_by_token: HashMap<String, i64>,
}

impl RosterCache {
    fn replace_all(&mut self, attendees: Vec<Attendee>) {
        self.order.clear();
        self.by_id.clear();
        self.id_by_token.clear();

        for attendee in attendees {
            self.order.push(attendee.id);
            self.id_by_token.insert(attendee.qr_code.clone(), attendee.id);
            self.by_id.insert(attendee.id, attendee);
        }
    }

    fn apply(&mut self, attendee: Attendee) {
        if !self.by_id.contains_key(&attendee.id) {
            // Fresh inserts sort ahead of older rows, matching store order
            self.order.insert(0, attendee.id);
        }
        self.id_by_token.insert(attendee.qr_code.clone(), attendee.id);
        self.by_id.insert(attendee.id, attendee);
    }

    fn find(&self, identifier: &str) -> Option<&Attendee> {
        if let Ok(id) = identifier.parse::<i64>() {
            if let Some(attendee) = self.by_id.get(&id) {
                return Some(attendee);
            }
        }

        self.id_by_token
            .get(identifier)
            .and_then(|id| self.by_id.get(id))
    }

    fn list(&self) -> Vec<Attendee> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .cloned()
            .collect()
    }

    fn stats(&self) -> AttendeeStats {
        AttendeeStats {
            total: self.by_id.len(),
            checked_in: self.by_id.values().filter(|a| a.checked_in).count(),
            emails_sent: self.by_id.values().filter(|a| a.email_sent).count(),
        }
    }
}

/// Read-through cache over the attendee store
#[derive(Clone)]
pub struct AttendeeDirectory {
    repository: AttendeeRepository,
    cache: Arc<RwLock<RosterCache>>,
}

impl AttendeeDirectory {
    /// Create a new AttendeeDirectory instance with an empty roster
    pub fn new(repository: AttendeeRepository) -> Self {
        Self {
            repository,
            cache: Arc::new(RwLock::new(RosterCache::default())),
        }
    }

    /// Fetch all attendee records, newest first, and replace the roster
    pub async fn reload(&self) -> Result<usize> {
        let attendees = self.repository.list_all().await?;
        let count = attendees.len();

        let mut cache = self.cache.write().await;
        cache.replace_all(attendees);
        info!(count = count, "Attendee roster reloaded from store");

        Ok(count)
    }

    /// Look up an attendee by store ID or QR token
    pub async fn find(&self, identifier: &str) -> Option<Attendee> {
        self.cache.read().await.find(identifier).cloned()
    }

    /// Apply a confirmed store mutation to the local roster
    pub async fn apply(&self, attendee: Attendee) {
        let mut cache = self.cache.write().await;
        cache.apply(attendee);
    }

    /// Write a batch of new attendees, then fold the inserted rows into the
    /// roster. Rows skipped by the store's duplicate handling are absent from
    /// the returned set and leave the roster untouched.
    pub async fn insert_batch(&self, requests: &[CreateAttendeeRequest]) -> Result<Vec<Attendee>> {
        let inserted = self.repository.insert_batch(requests).await?;

        let mut cache = self.cache.write().await;
        for attendee in inserted.iter().rev() {
            cache.apply(attendee.clone());
        }

        Ok(inserted)
    }

    /// Record the email-sent flag in the store, then update the local roster
    pub async fn mark_email_sent(&self, id: i64) -> Result<Attendee> {
        let attendee = self.repository.mark_email_sent(id).await?;
        self.apply(attendee.clone()).await;
        debug!(attendee_id = id, "Email sent flag recorded");
        Ok(attendee)
    }

    /// List all cached attendees, newest first
    pub async fn list(&self) -> Vec<Attendee> {
        self.cache.read().await.list()
    }

    /// Roster counters, computed by linear scan
    pub async fn stats(&self) -> AttendeeStats {
        self.cache.read().await.stats()
    }
}
