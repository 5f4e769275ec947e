//! Type definitions shared across the Karrot client workspace
//!
//! This crate holds the contract between the REST boundary and the client-side
//! state modules: the records the server hands out, the cursor-paginated page
//! envelope, and the error taxonomy used by every asynchronous operation.
//!
//! ## Features
//!
//! - **Entity trait**: every record exposes a unique identifier
//! - **Serde support**: records tolerate and preserve unknown fields
//! - **Cursor pagination**: opaque continuation tokens, absence means end of data
//! - **Error taxonomy**: transport failures and field-keyed validation errors
//!
//! ## Example
//!
//! ```rust
//! use karrot_types::{Entity, Page, Record};
//!
//! let page: Page<Record> = serde_json::from_str(
//!     r#"{"results": [{"id": 1}, {"id": 2}], "next": "tok-A"}"#,
//! ).unwrap();
//!
//! assert_eq!(page.results[1].id(), 2);
//! assert_eq!(page.next.unwrap().as_str(), "tok-A");
//! ```

pub mod error;
pub mod page;
pub mod types;

pub use error::*;
pub use page::*;
pub use types::*;
