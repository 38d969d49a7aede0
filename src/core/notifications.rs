//! Notification feed
//!
//! Holds the most recent page for one recipient. Read markers only touch
//! notifications in that page; older unread rows on the server are left
//! alone by `mark_all_read`.

use crate::core::error::WorkflowResult;
use crate::core::models::Notification;
use crate::core::store::{Gateway, Query, Table};
use crate::{debug, info};
use chrono::Utc;
use serde_json::json;

/// Notifications fetched per load
pub const PAGE_SIZE: usize = 10;

/// Loaded page of a user's notifications
#[derive(Debug, Clone)]
pub struct NotificationFeed {
    gateway: Gateway,
    user_id: String,
    page: Vec<Notification>,
}

impl NotificationFeed {
    /// Empty feed for `user_id`; call [`load`](Self::load) to fill it
    #[must_use]
    pub fn new(gateway: Gateway, user_id: &str) -> Self {
        Self { gateway, user_id: user_id.to_string(), page: Vec::new() }
    }

    /// Fetch the newest [`PAGE_SIZE`] notifications
    ///
    /// # Errors
    /// Store failures; the previous page is kept.
    pub async fn load(&mut self) -> WorkflowResult<&[Notification]> {
        self.load_limit(PAGE_SIZE).await
    }

    /// Fetch the newest `limit` notifications, replacing the page on success
    ///
    /// # Errors
    /// Store failures; the previous page is kept.
    pub async fn load_limit(&mut self, limit: usize) -> WorkflowResult<&[Notification]> {
        let query = Query::new()
            .eq("user_id", self.user_id.as_str())
            .order_desc("created_at")
            .limit(limit);
        let page = self.gateway.fetch_collection(Table::Notifications, &query).await?;
        self.page = page;
        debug!("Loaded {} notifications for {}", self.page.len(), self.user_id);
        Ok(&self.page)
    }

    /// Loaded notifications, newest first
    #[must_use]
    pub fn page(&self) -> &[Notification] {
        &self.page
    }

    /// Unread notifications in the loaded page
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.page.iter().filter(|n| n.is_unread()).count()
    }

    /// Badge text: `None` when nothing is unread, `9+` above nine
    #[must_use]
    pub fn badge(&self) -> Option<String> {
        match self.unread_count() {
            0 => None,
            n if n > 9 => Some("9+".to_string()),
            n => Some(n.to_string()),
        }
    }

    /// Stamp `read_at` on one notification
    ///
    /// Returns `false` without touching the store when the id is not in the
    /// page or is already read.
    ///
    /// # Errors
    /// Store failures; the local page is left unchanged.
    pub async fn mark_read(&mut self, id: &str) -> WorkflowResult<bool> {
        let Some(position) = self.page.iter().position(|n| n.id == id && n.is_unread()) else {
            debug!("Notification {id} already read or not loaded");
            return Ok(false);
        };
        let now = Utc::now();
        self.gateway
            .update(Table::Notifications, id, json!({ "read_at": now }))
            .await?;
        self.page[position].read_at = Some(now);
        Ok(true)
    }

    /// Stamp `read_at` on every unread notification in the loaded page
    ///
    /// Issues a single update for those ids and returns how many were marked.
    ///
    /// # Errors
    /// Store failures; the local page is left unchanged.
    pub async fn mark_all_read(&mut self) -> WorkflowResult<usize> {
        let unread: Vec<String> =
            self.page.iter().filter(|n| n.is_unread()).map(|n| n.id.clone()).collect();
        if unread.is_empty() {
            return Ok(0);
        }
        let now = Utc::now();
        let query = Query::new().in_list("id", unread.iter().map(String::as_str));
        self.gateway
            .update_where(Table::Notifications, &query, json!({ "read_at": now }))
            .await?;
        for notification in self.page.iter_mut().filter(|n| unread.contains(&n.id)) {
            notification.read_at = Some(now);
        }
        info!("Marked {} notifications read", unread.len());
        Ok(unread.len())
    }
}
