//! HTTP protocol layer module
//!
//! Range resolution, conditional validation, MIME lookup and response
//! building, independent of where the payload comes from.

pub mod conditional;
pub mod headers;
pub mod mime;
pub mod range;
pub mod response;
pub mod transmit;

// Re-export commonly used types
pub use conditional::{evaluate, format_http_date, Validation};
pub use headers::ResponseHeaders;
pub use mime::MimeTable;
pub use range::{is_range_request, resolve_range, ByteWindow, RangeOutcome};
pub use response::{build_404_response, build_405_response, build_500_response};
pub use transmit::Transmission;
