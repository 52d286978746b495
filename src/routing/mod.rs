//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (ordered route scan)
//!     → matcher.rs (evaluate path patterns)
//!     → Return: matched Route or None
//!
//! Route Compilation (at startup):
//!     RouteConfig[] (declaration order)
//!     → Parse path patterns
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order, not longest prefix)

pub mod matcher;
pub mod router;

pub use matcher::{AnyMatcher, Matcher, PathPattern, PatternError};
pub use router::{Route, RouteTable};
