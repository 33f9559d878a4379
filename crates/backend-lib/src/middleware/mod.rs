// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the Airavat site server.

pub mod access_guard;
pub mod route_class;

pub use access_guard::{access_guard, decide, EvidenceSource, GuardDecision, SessionEvidence};
pub use route_class::{RouteClass, RouteRules};
