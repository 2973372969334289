//! Style cascade
//!
//! Style text from `<style>` sheets is collected into a `ClassStyleTable`
//! and applied to elements while the document is parsed, in this order
//! (later wins):
//!
//! 1. element-type rules (`rect { ... }`)
//! 2. explicit presentation attributes
//! 3. class rules (`.name { ... }`) in `class` attribute order
//! 4. the inline `style` attribute
//! 5. id rules (`#name { ... }`)

pub mod declarations;
pub mod sheet;
pub mod table;

pub use declarations::{Declaration, Declarations};
pub use sheet::parse_style_sheet;
pub use table::ClassStyleTable;
