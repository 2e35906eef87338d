//! Envelope types shared by many resources, for use with
//! [`StripeClient::request_as`](crate::StripeClient::request_as).
//!
//! Resource payloads themselves stay as `serde_json::Value`; callers that
//! want typed access deserialize into their own structs.

use serde::{Deserialize, Serialize};

/// A page of a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct List<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub url: String,
}

impl<T> List<T> {
    /// Id to pass as `starting_after` for the next page, if there is one.
    pub fn next_cursor(&self) -> Option<&str>
    where
        T: HasId,
    {
        if !self.has_more {
            return None;
        }
        self.data.last().map(HasId::id)
    }
}

/// A page of a search endpoint. Paginate with `page = next_page`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    pub next_page: Option<String>,
}

/// Response of a delete call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub id: String,
    #[serde(default)]
    pub object: String,
    pub deleted: bool,
}

/// Objects addressable by id.
pub trait HasId {
    fn id(&self) -> &str;
}

impl HasId for serde_json::Value {
    fn id(&self) -> &str {
        self.get("id").and_then(|v| v.as_str()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn list_cursor_points_at_last_item() {
        let page: List<Value> = serde_json::from_value(json!({
            "object": "list",
            "data": [{"id": "cus_1"}, {"id": "cus_2"}],
            "has_more": true,
            "url": "/v1/customers"
        }))
        .unwrap();
        assert_eq!(page.next_cursor(), Some("cus_2"));
    }

    #[test]
    fn last_page_has_no_cursor() {
        let page: List<Value> = serde_json::from_value(json!({
            "data": [{"id": "cus_1"}],
            "has_more": false
        }))
        .unwrap();
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn search_result_decodes_next_page() {
        let page: SearchResult<Value> = serde_json::from_value(json!({
            "object": "search_result",
            "data": [],
            "has_more": true,
            "next_page": "page_2"
        }))
        .unwrap();
        assert_eq!(page.next_page.as_deref(), Some("page_2"));
    }
}
