//! Paginated list envelopes

use async_graphql::SimpleObject;

use crate::graphql::pagination::{Page, PageInfo};
use crate::models::Event as DbEvent;

use super::event::Event;

/// One page of events
#[derive(SimpleObject)]
pub struct PaginatedEvents {
    pub events: Vec<Event>,
    pub page_info: PageInfo,
    /// Events matching the filter across all pages
    pub total_count: u64,
}

impl From<Page<DbEvent>> for PaginatedEvents {
    fn from(page: Page<DbEvent>) -> Self {
        let page = page.map(Event::from);
        Self {
            events: page.items,
            page_info: page.page_info,
            total_count: page.total_count,
        }
    }
}
