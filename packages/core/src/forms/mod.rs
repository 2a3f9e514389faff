//! Dynamic Forms
//!
//! Schema-driven forms for creating and editing records:
//!
//! - `FormSession` / `FormMode` - create-vs-edit context for one cycle
//! - `FieldInput` - typed widget state per property kind
//! - `FormBuilder` / `RecordForm` - building, editing and submitting
//!
//! Forms are plain data once built; the embedding UI renders them however
//! it likes and mutates widgets through the typed operations.

mod builder;
mod field;
mod session;

pub use builder::{FormBuilder, FormField, RecordForm};
pub use field::{FieldInput, RelationChoice, DATE_FORMAT};
pub use session::{FormMode, FormSession};
