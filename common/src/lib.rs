pub mod constants;
pub mod field_conversion;
pub mod serializable;
