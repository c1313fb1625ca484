//! Bot module - Core bot functionality.

pub mod dispatcher;
pub mod liveness;
mod runtime;
mod webhook;

pub use dispatcher::build_dispatcher;
pub use runtime::run;
