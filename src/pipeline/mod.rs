//! # Pipeline Module
//!
//! The core processing pipeline shared by both front-ends:
//!
//! ```text
//! Input Parser → Resolver → Selector (artist flow)
//!                         → Resolver only (setlist flow)
//!               → Reconciler → Uploader → Reporter
//! ```
//!
//! Every stage that touches the remote catalog is generic over the
//! [`Catalog`](crate::catalog::Catalog) trait, so the same logic runs against
//! the real Spotify client and against an in-memory fake in tests. Per-query
//! failures never abort the pipeline; they become entries in the
//! [`RunSummary`](summary::RunSummary).

pub mod reconcile;
pub mod resolver;
pub mod selector;
pub mod summary;
pub mod uploader;

pub use reconcile::{fresh_plan, plan, reconcile_setlist, setlist_name, today_key};
pub use resolver::{resolve, unresolved};
pub use selector::select;
pub use summary::RunSummary;
pub use uploader::apply;
