//! JSON envelopes returned by the listing endpoint.
//!
//! ```text
//! 200 { "success": true,  "count": 1, "data": [ ... ] }
//! 500 { "success": false, "error": "Server Error" }
//! ```

use serde::{Deserialize, Serialize};

/// Successful listing: `count` always equals `data.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

/// Failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl<T> ListingResponse<T> {
    #[must_use]
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
