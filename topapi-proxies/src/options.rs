//! Query builders for proxy calls.

use chrono::{DateTime, Local};
use topapi_core::{Params, time};

/// Query builder for the warehouse serial-number lookup.
///
/// Every field is optional; only the set ones are rendered into call
/// parameters. Time values use the protocol's `YYYY-MM-DD HH:MM:SS` format.
#[derive(Debug, Clone, Default)]
pub struct SnInfoQuery {
    order_code: Option<String>,
    order_code_type: Option<String>,
    fields: Option<String>,
    page_size: Option<u64>,
    start_created: Option<DateTime<Local>>,
    end_created: Option<DateTime<Local>>,
}

impl SnInfoQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by order code.
    #[must_use]
    pub fn order_code(mut self, order_code: impl Into<String>) -> Self {
        self.order_code = Some(order_code.into());
        self
    }

    /// Sets the order code type accompanying [`Self::order_code`].
    #[must_use]
    pub fn order_code_type(mut self, order_code_type: impl Into<String>) -> Self {
        self.order_code_type = Some(order_code_type.into());
        self
    }

    /// Restricts the returned fields.
    #[must_use]
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Overrides the page size.
    #[must_use]
    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Filters by creation time, lower bound.
    #[must_use]
    pub fn start_created(mut self, start: DateTime<Local>) -> Self {
        self.start_created = Some(start);
        self
    }

    /// Filters by creation time, upper bound.
    #[must_use]
    pub fn end_created(mut self, end: DateTime<Local>) -> Self {
        self.end_created = Some(end);
        self
    }

    /// The page size to paginate with, if one was set.
    #[must_use]
    pub fn requested_page_size(&self) -> Option<u64> {
        self.page_size
    }

    /// Renders the set fields as call parameters.
    #[must_use]
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(order_code) = &self.order_code {
            params.insert("order_code".to_string(), order_code.clone());
        }
        if let Some(order_code_type) = &self.order_code_type {
            params.insert("order_code_type".to_string(), order_code_type.clone());
        }
        if let Some(fields) = &self.fields {
            params.insert("fields".to_string(), fields.clone());
        }
        if let Some(start) = &self.start_created {
            params.insert("start_created".to_string(), time::format_datetime(start));
        }
        if let Some(end) = &self.end_created {
            params.insert("end_created".to_string(), time::format_datetime(end));
        }
        params
    }
}
