//! Custom request extractors.

mod form_body;
mod validated_json;

pub use form_body::FormBody;
pub use validated_json::ValidatedJson;
