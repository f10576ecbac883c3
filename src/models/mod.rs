//! Wire models for the Strata query API.
//!
//! Defines the request and response structures exchanged with the
//! `/v1/api/query` endpoint, including the schema descriptors that drive
//! cell decoding.

pub mod error_detail;
pub mod field_descriptor;
pub mod field_mode;
pub mod field_type;
pub mod query_parameter;
pub mod query_request;
pub mod query_response;

pub use error_detail::ErrorDetail;
pub use field_descriptor::FieldDescriptor;
pub use field_mode::FieldMode;
pub use field_type::FieldType;
pub use query_parameter::QueryParameter;
pub use query_request::QueryRequest;
pub use query_response::QueryResponse;
