//! Conversation state
//!
//! A [`Session`] owns everything that carries over between turns: the
//! [`ConversationContext`] (subject, role, skill level, last topic) and a
//! bounded [`TurnHistory`].
//!
//! # Example
//!
//! ```rust
//! use summoner_core::conversation::{Role, Session};
//!
//! let mut session = Session::new();
//! session.context.role = Some(Role::Mid);
//! session.commit("salut", "Salut invocateur !");
//! assert_eq!(session.history().len(), 1);
//! ```

mod context;
mod history;
mod session;

pub use context::{ConversationContext, Role, SkillLevel};
pub use history::{Turn, TurnHistory};
pub use session::Session;
