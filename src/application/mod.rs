// Application layer - the collaborator around the ledger engine.
// It reports every outcome, builds read models, and drives the
// engine from command scripts.

pub mod error;
pub mod reporting;
pub mod script;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use script::*;
pub use service::*;
