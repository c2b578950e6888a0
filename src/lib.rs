//! No-as-a-Service
//!
//! A small HTTP service that answers `GET /reason` with a random excuse in
//! the requested language. Reason lists are read lazily from
//! `reasons.<lang>.json` files and cached for the life of the process, and
//! every route sits behind a per-client fixed-window rate limiter.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod reasons;
pub mod router;
pub mod state;

pub use error::ReasonError;
pub use rate_limit::{Decision, RateLimiter};
pub use reasons::{FsReasonSource, ReasonSource, ReasonStore};
pub use router::build_router;
pub use state::AppState;
