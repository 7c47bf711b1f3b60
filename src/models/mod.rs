/// Audit rectangles
pub mod annotation;
/// Payloads and decode outcomes
pub mod payload;
/// Candidate regions
pub mod region;

pub use annotation::{Annotation, AnnotationSource};
pub use payload::{DecodeOutcome, OutcomeKind, Payload};
pub use region::CandidateRegion;
