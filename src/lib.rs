//! Typed interactions with chat-completion language models.
//!
//! `llm` is the transport: one authenticated chat-completion exchange per
//! call. `tangible` builds typed requests on top of it (booleans, numbers,
//! enumerations, item lists, groups, JSON values, and CSV tables), including
//! reasoning strategies and a host-function tool loop.

pub mod error;
pub mod llm;
pub mod tangible;
