//! A provider-neutral protocol for completion models.
//!
//! The chat session talks to the model through the types in this crate,
//! so the same session can run against a hosted OpenAI-compatible API, a
//! local proxy, or the scripted test model without touching the core.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod completion;
mod error;
mod provider;
mod request;

pub use completion::*;
pub use error::*;
pub use provider::*;
pub use request::*;
