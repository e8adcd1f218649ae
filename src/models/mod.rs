pub mod search_record;

pub use search_record::{FieldErrors, SearchRecord, SearchRequest, ValidSearch};
