//! Conversational layer for sellerbot.
//!
//! A query flows through [`conversation::IntentRouter`] (keyword triggers to
//! a structured [`conversation::Intent`]), is answered by
//! [`runtime::AssistantRuntime`] using the deterministic rules in
//! `sellerbot-core`, and comes back as a [`response::QueryResponse`].
//! Each answer leaves an explanation in [`memory::ConversationMemory`] so a
//! follow-up "why?" can be answered without recomputing anything.
//!
//! [`query_loop::QueryLoop`] drives the interactive session over any
//! reader/writer pair.

pub mod conversation;
pub mod memory;
pub mod query_loop;
pub mod response;
pub mod runtime;

pub use conversation::{Intent, IntentKind, IntentRouter, TriggerRule};
pub use memory::ConversationMemory;
pub use query_loop::{LoopExit, LoopSummary, QueryLoop};
pub use response::QueryResponse;
pub use runtime::AssistantRuntime;
