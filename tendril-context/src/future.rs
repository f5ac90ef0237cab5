//! Re-exports of future helpers used across the crate, so dependants don't need to depend on
//! `futures` directly.

pub use futures::future::{BoxFuture, FutureExt};
