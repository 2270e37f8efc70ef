//! Paginated list responses.

use serde::{Deserialize, Serialize};

/// One page of a server-side list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
	pub data: Vec<T>,
	pub total: u64,
	pub page: u32,
	pub page_size: u32,
	pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
	/// Returns `true` when more pages follow this one.
	pub fn has_next(&self) -> bool {
		self.page < self.total_pages
	}
}

/// Page selector used by list endpoints (`?page=&pageSize=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
	pub page: u32,
	pub page_size: u32,
}

impl PageRequest {
	pub const fn new(page: u32, page_size: u32) -> Self {
		Self { page, page_size }
	}

	/// Query string for this page, without the leading `?`.
	pub fn query(&self) -> String {
		format!("page={}&pageSize={}", self.page, self.page_size)
	}
}

impl Default for PageRequest {
	fn default() -> Self {
		Self::new(1, 20)
	}
}
