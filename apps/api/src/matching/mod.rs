// Tutor/buddy compatibility matching.
// Two layers: a fallible scoring pipeline (prompt → generate → extract →
// decode) and a never-fails wrapper that substitutes a zero-score sentinel,
// so the matcher call site always receives a renderable result.

pub mod handlers;
pub mod prompts;
pub mod scoring;
