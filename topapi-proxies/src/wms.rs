//! Warehouse serial-number lookup.
//!
//! This endpoint family paginates with `page_index`/`page_size` and nests
//! both the total count and the item list under a `result` object.

use serde_json::Value;
use tracing::warn;

use topapi_core::pagination::DEFAULT_PAGE_SIZE;
use topapi_core::{ApiConfig, ApiRequest, Document, Result};

use crate::Credentials;
use crate::options::SnInfoQuery;

/// One serial-number record, backed by its raw document.
#[derive(Debug, Clone)]
pub struct SerialNumberInfo(Document);

impl SerialNumberInfo {
    /// The warehouse item identifier.
    #[must_use]
    pub fn item_id(&self) -> Option<&str> {
        self.0.get("item_id").and_then(Value::as_str)
    }

    /// The merchant-facing item code.
    #[must_use]
    pub fn item_code(&self) -> Option<&str> {
        self.0.get("item_code").and_then(Value::as_str)
    }

    /// The serial number itself.
    #[must_use]
    pub fn serial_number(&self) -> Option<&str> {
        self.0.get("sn_code").and_then(Value::as_str)
    }

    /// Reads any field of the underlying document.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Proxy for the warehouse management endpoints.
#[derive(Debug, Clone)]
pub struct WmsProxy {
    req: ApiRequest,
}

impl WmsProxy {
    /// Creates a proxy with its own engine client, paginating with this
    /// endpoint family's `page_index` key.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let config = ApiConfig::new(
            credentials.app_key.clone(),
            credentials.session_key.clone(),
        );
        Ok(Self::with_request(ApiRequest::with_config(
            config,
            credentials.app_secret.clone(),
        )?))
    }

    /// Creates a proxy over an already-configured client. The client's
    /// pagination settings are kept, except that this endpoint family's
    /// page keys are enforced.
    #[must_use]
    pub fn with_request(req: ApiRequest) -> Self {
        let pagination = req
            .pagination()
            .clone()
            .with_page_keys("page_index", "page_size");
        Self {
            req: req.with_pagination(pagination),
        }
    }

    /// Lists every serial-number record matching the query.
    pub async fn list_serial_number_infos(
        &self,
        query: &SnInfoQuery,
    ) -> Result<Vec<SerialNumberInfo>> {
        let params = query.to_params();
        let page_size = query.requested_page_size().unwrap_or(DEFAULT_PAGE_SIZE);

        let pages = self
            .req
            .get_all("taobao.wlb.wms.sn.info.query", &params, page_size, |doc| {
                doc.pointer("/result/total_count").and_then(Value::as_u64)
            })
            .await?;

        Ok(flatten_sn_infos(&pages))
    }
}

/// Flattens `result.sn_info_list[].sn_info` across pages, skipping pages
/// without the expected shape.
fn flatten_sn_infos(pages: &[Document]) -> Vec<SerialNumberInfo> {
    let mut infos = Vec::new();
    for page in pages {
        let Some(entries) = page
            .pointer("/result/sn_info_list")
            .and_then(Value::as_array)
        else {
            warn!("page document without sn_info_list, skipping");
            continue;
        };
        infos.extend(
            entries
                .iter()
                .filter_map(|entry| entry.get("sn_info"))
                .cloned()
                .map(SerialNumberInfo),
        );
    }
    infos
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sn_info_accessors() {
        let info = SerialNumberInfo(json!({
            "item_id": "I-1",
            "item_code": "CODE-1",
            "sn_code": "SN-0001"
        }));
        assert_eq!(info.item_id(), Some("I-1"));
        assert_eq!(info.item_code(), Some("CODE-1"));
        assert_eq!(info.serial_number(), Some("SN-0001"));
        assert!(info.get("missing").is_none());
    }

    #[test]
    fn test_flatten_sn_infos() {
        let pages = vec![
            json!({"result": {"total_count": 3, "sn_info_list": [
                {"sn_info": {"sn_code": "SN-1"}},
                {"sn_info": {"sn_code": "SN-2"}},
            ]}}),
            json!({"result": {}}),
            json!({"result": {"total_count": 3, "sn_info_list": [
                {"sn_info": {"sn_code": "SN-3"}},
                {"unexpected": true},
            ]}}),
        ];
        let infos = flatten_sn_infos(&pages);
        let codes: Vec<_> = infos.iter().filter_map(SerialNumberInfo::serial_number).collect();
        assert_eq!(codes, ["SN-1", "SN-2", "SN-3"]);
    }
}
