//! Read-Only Views
//!
//! Display-side rendering of stored state. Views hold no data of their own;
//! every render re-queries the services.

mod table;

pub use table::{RecordRow, SchemaRow, TableRenderer};
