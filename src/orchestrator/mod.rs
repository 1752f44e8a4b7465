//! Orchestration layer
//!
//! ```text
//! app (terminal session: quiz on stdin, then chat)
//!     ↓
//! coordinator (one document: chunks + quiz state + chat)
//!     ↓
//! workflow (quiz state machine / chat request)
//!     ↓
//! services (chunker / ranker / parser / evaluator / prompts)
//!     ↓
//! clients + infrastructure (generation backends, extraction, document store)
//! ```
//!
//! Only this layer holds the generator and the document store.

pub mod app;
pub mod coordinator;

pub use app::App;
pub use coordinator::PipelineCoordinator;
