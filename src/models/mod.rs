// src/models/mod.rs

pub mod chuira;
pub mod dhaan;
pub mod expense;
pub mod salary;
pub mod sales;
pub mod status;

pub use chuira::*;
pub use dhaan::*;
pub use expense::*;
pub use salary::*;
pub use sales::*;
pub use status::*;

use validator::Validate;
use crate::error::ApiResult;
use crate::validator::FieldReader;

// ==================== COMMON / SHARED ====================

/// Raw request body of a record kind, as posted by the record pages.
///
/// `read` pulls every field through the reader; the provided methods turn the
/// payload into a validated input for insert (POST) or full replace (PUT).
pub trait RecordPayload {
    type Input: Validate;

    /// The `_id` carried by PUT bodies.
    fn record_id(&self) -> Option<&str>;

    fn read(&self, reader: &mut FieldReader) -> Self::Input;

    fn to_create_input(&self) -> ApiResult<Self::Input> {
        let mut reader = FieldReader::new();
        let input = self.read(&mut reader);
        reader.finish()?;
        input.validate()?;
        Ok(input)
    }

    fn to_update_input(&self) -> ApiResult<(String, Self::Input)> {
        let mut reader = FieldReader::new();
        let id = reader.text("_id", self.record_id());
        let input = self.read(&mut reader);
        reader.finish()?;
        input.validate()?;
        Ok((id, input))
    }
}
