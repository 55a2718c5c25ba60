//! Scripted chat domain for the Long Run prompt.
//!
//! Nothing in this crate sleeps or spawns. [`ChatSession`] is a plain state
//! machine: every operation that needs a delay hands back a [`Scheduled`]
//! directive, and whoever hosts the session (see `longrun-actors`) is
//! responsible for firing it later.
//!
//! # Examples
//!
//! ```rust
//! use longrun_chat::{ChatSession, RevealTiming, Script, Timer};
//!
//! let mut session = ChatSession::new(Script::default(), RevealTiming::default());
//! let think = session.submit_prompt("Running a marathon").expect("accepted");
//! assert!(matches!(think.timer, Timer::Think { .. }));
//!
//! // Drive the session by hand until the reveal settles.
//! let mut next = session.fire(think.timer);
//! while let Some(step) = next {
//!     next = session.fire(step.timer);
//! }
//!
//! let reply = session.messages().last().unwrap();
//! assert_eq!(
//!     reply.display_text(),
//!     "How many runs per week are you doing for training?"
//! );
//! assert!(!session.is_bot_typing());
//! ```
pub mod message;
pub mod script;
pub mod session;
pub mod timing;

pub use message::{Message, MessageId, ProductLink, RevealedWord, TypingState};
pub use script::{Script, ScriptError};
pub use session::{ChatSession, SessionView};
pub use timing::{RevealTiming, Scheduled, Timer};
