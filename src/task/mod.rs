//! # The task façade and its building blocks.
//!
//! This module provides the public face of the crate:
//! - [`Operation`] — trait for implementing async, cancelable operations
//! - [`OpFn`] — function-backed operation implementation
//! - [`OpRef`] — shared reference to an operation (`Arc<dyn Operation>`)
//! - [`Hooks`] — nullable lifecycle callbacks
//! - [`TaskBuilder`] — fluent construction
//! - [`Task`] — the operation handle composing the whole engine

mod builder;
mod facade;
mod hooks;
mod op;

pub use builder::TaskBuilder;
pub use facade::Task;
pub use hooks::Hooks;
pub use op::{OpFn, OpRef, Operation};
