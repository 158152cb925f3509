//! Trade endpoints: listings and full-detail lookup.

use chrono::{DateTime, Local, Months, NaiveTime};
use serde_json::Value;
use tracing::warn;

use topapi_core::pagination::DEFAULT_PAGE_SIZE;
use topapi_core::{ApiConfig, ApiRequest, DecodeError, Document, Params, Result, time};

use crate::Credentials;

/// Fields requested by the list operations; enough to identify each trade
/// for a later full-detail fetch.
const LIST_FIELDS: &str = "total_results,tid,created";

/// The full-detail field set. The provider only returns what is asked for,
/// so the detail fetch enumerates everything the response can carry.
const FULLINFO_FIELDS: &[&str] = &[
    "payment",
    "post_fee",
    "receiver_name",
    "receiver_state",
    "receiver_address",
    "receiver_zip",
    "receiver_mobile",
    "receiver_phone",
    "consign_time",
    "received_payment",
    "promotion_details",
    "id",
    "gift_item_name",
    "gift_item_id",
    "gift_item_num",
    "has_post_fee",
    "promotion_id",
    "promotion_name",
    "promotion_desc",
    "receiver_country",
    "receiver_town",
    "tid",
    "num_iid",
    "status",
    "title",
    "type",
    "price",
    "discount_fee",
    "total_fee",
    "created",
    "pay_time",
    "buyer_cod_fee",
    "modified",
    "end_time",
    "nr_outer_iid",
    "outer_iid",
    "buyer_nick",
    "credit_card_fee",
    "has_yfx",
    "yfx_fee",
    "step_trade_status",
    "step_paid_fee",
    "shipping_type",
    "adjust_fee",
    "trade_from",
    "service_orders",
    "receiver_city",
    "receiver_district",
    "orders",
    "delivery_time",
    "collect_time",
    "dispatch_time",
    "sign_time",
    "delivery_cps",
    "refund_status",
    "oaid",
    "cid",
    "estimate_con_time",
    "oid",
    "item_oid",
    "service_id",
    "sku_id",
    "item_meal_id",
    "item_meal_name",
    "num",
    "outer_sku_id",
    "order_from",
    "refund_id",
    "is_service_order",
    "bind_oids_all_status",
    "logistics_company",
    "invoice_no",
    "divide_order_fee",
    "part_mjz_discount",
    "store_code",
    "md_fee",
    "customization",
    "inv_type",
    "is_sh_ship",
    "shipper",
    "f_type",
    "f_status",
    "f_term",
    "assembly_rela",
    "assembly_price",
    "assembly_item",
];

/// One trade, backed by its raw document.
///
/// Field presence depends on the field list the fetching call requested, so
/// this stays a dynamic wrapper with accessors rather than a fixed struct.
#[derive(Debug, Clone)]
pub struct Trade(Document);

impl Trade {
    /// The trade identifier.
    #[must_use]
    pub fn tid(&self) -> Option<&str> {
        self.0.get("tid").and_then(Value::as_str)
    }

    /// The creation time, as the provider renders it.
    #[must_use]
    pub fn created(&self) -> Option<&str> {
        self.0.get("created").and_then(Value::as_str)
    }

    /// Reads any field of the underlying document.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Consumes the wrapper, returning the raw document.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.0
    }
}

/// Proxy for the trade endpoint family.
#[derive(Debug, Clone)]
pub struct TradeProxy {
    req: ApiRequest,
}

impl TradeProxy {
    /// Creates a proxy with its own engine client.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let config = ApiConfig::new(
            credentials.app_key.clone(),
            credentials.session_key.clone(),
        );
        Ok(Self {
            req: ApiRequest::with_config(config, credentials.app_secret.clone())?,
        })
    }

    /// Creates a proxy over an already-configured client.
    #[must_use]
    pub fn with_request(req: ApiRequest) -> Self {
        Self { req }
    }

    /// Lists every sold trade in the provider's warranted window.
    ///
    /// The provider only warrants data for the trailing three months, so the
    /// window runs from three months before today at 00:00:00 to yesterday
    /// at 23:59:59.
    pub async fn list_base_trades(&self) -> Result<Vec<Trade>> {
        let (start, end) = warranted_window();
        let mut params = Params::new();
        params.insert("start_created".to_string(), start);
        params.insert("end_created".to_string(), end);

        self.list_trades("taobao.trades.sold.get", params).await
    }

    /// Lists trades modified inside the given window.
    pub async fn list_increment_trades(
        &self,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Vec<Trade>> {
        let mut params = Params::new();
        params.insert("start_modified".to_string(), time::format_datetime(&start));
        params.insert("end_modified".to_string(), time::format_datetime(&end));

        self.list_trades("taobao.trades.sold.increment.get", params)
            .await
    }

    /// Fetches one trade with the full field set.
    pub async fn get_fullinfo_trade(&self, tid: &str) -> Result<Trade> {
        let mut params = Params::new();
        params.insert("tid".to_string(), tid.to_string());
        params.insert("include_oaid".to_string(), "true".to_string());
        params.insert("fields".to_string(), FULLINFO_FIELDS.join(","));

        let doc = self.req.get("taobao.trade.fullinfo.get", &params).await?;
        doc.get("trade")
            .cloned()
            .map(Trade)
            .ok_or_else(|| DecodeError::missing_field("trade").into())
    }

    /// Shared list path: paginate, then flatten every page's `trades` array.
    async fn list_trades(&self, operation: &str, mut params: Params) -> Result<Vec<Trade>> {
        params.insert("fields".to_string(), LIST_FIELDS.to_string());

        let pages = self
            .req
            .get_all(operation, &params, DEFAULT_PAGE_SIZE, |doc| {
                doc.get("total_results").and_then(Value::as_u64)
            })
            .await?;

        Ok(flatten_trades(&pages))
    }
}

/// The provider's warranted query window, rendered as protocol timestamps.
fn warranted_window() -> (String, String) {
    let today = Local::now().date_naive();
    // both dates exist for any real clock value
    let start_day = today
        .checked_sub_months(Months::new(3))
        .expect("date within range");
    let end_day = today.pred_opt().expect("date within range");

    let start = start_day.and_time(NaiveTime::MIN);
    let end = end_day.and_hms_opt(23, 59, 59).expect("valid wall-clock time");
    (time::format_naive(&start), time::format_naive(&end))
}

/// Flattens page documents into trades, skipping pages without the expected
/// array shape.
fn flatten_trades(pages: &[Document]) -> Vec<Trade> {
    let mut trades = Vec::new();
    for page in pages {
        let Some(items) = page.get("trades").and_then(Value::as_array) else {
            warn!("page document without trades array, skipping");
            continue;
        };
        trades.extend(items.iter().cloned().map(Trade));
    }
    trades
}
