// Document processing: PDF upload → text extraction → summary + detected
// topics. The summary degrades to an extractive fallback when the backend
// is unreachable, so an upload never fails because of the model.

pub mod handlers;
pub mod pdf;
pub mod summary;
pub mod topics;
