//! Listing request and response types.

use serde::{Deserialize, Serialize};

use crate::model::{MediaFilter, RemoteItem};

/// Fields requested from the listing endpoint.
pub const SEARCH_FIELDS: &str = "camera_model,captured_at,content_title,content_type,created_at,\
gopro_user_id,gopro_media,filename,file_extension,file_size,height,fov,id,item_count,mce_type,\
moments_count,on_public_profile,orientation,play_as,ready_to_edit,ready_to_view,resolution,\
source_duration,token,type,width,submitted_at,thumbnail_available,captured_at_timezone,\
available_labels";

/// Processing states of items worth listing.
pub const PROCESSING_STATES: &str = "rendering,pretranscoding,transcoding,ready";

/// One listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
    pub filter: MediaFilter,
}

impl SearchQuery {
    #[must_use]
    pub fn new(page: u32, per_page: u32, filter: MediaFilter) -> Self {
        Self {
            page,
            per_page,
            filter,
        }
    }

    /// Query-string parameters in request order.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("processing_states", PROCESSING_STATES.to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
            ("type", self.filter.type_query()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(range) = &self.filter.range {
            params.push(("range", range.to_query()));
        }
        params
    }
}

/// Pagination metadata (`_pages`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pages {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// Raw listing response body.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<Embedded>,
    #[serde(rename = "_pages", default)]
    pub pages: Option<Pages>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Embedded {
    #[serde(default)]
    pub media: Vec<RemoteItem>,
}

/// A decoded listing page.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub items: Vec<RemoteItem>,
    pub pages: Pages,
}

impl From<SearchResponse> for SearchPage {
    fn from(response: SearchResponse) -> Self {
        let items = response.embedded.map(|e| e.media).unwrap_or_default();
        let pages = response.pages.unwrap_or_default();
        Self { items, pages }
    }
}

impl SearchPage {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
