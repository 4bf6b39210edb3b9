// Input validation: tax identifiers and form fields

pub mod fields;
pub mod tax_id;

pub use fields::*;
pub use tax_id::*;
