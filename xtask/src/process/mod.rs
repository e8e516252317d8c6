//! External process plumbing.

mod invocation;
mod runner;

pub use invocation::Invocation;
pub use runner::{ProcessRunner, RunError, SystemRunner};

#[cfg(test)]
pub use runner::testing;
