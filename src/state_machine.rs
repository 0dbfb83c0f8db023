//! Per-chat conversation state machine
//!
//! Pure transitions in the Elm style: `(session, event) -> (session, effects)`.
//! All I/O (delivery, journaling, audio) happens in the runtime, which
//! executes the returned effects.

mod effect;
pub mod event;
pub mod replies;
pub mod state;
pub(crate) mod transition;


pub use effect::{Effect, Reply};
pub use event::Event;
pub use state::{ChatId, ChatSession, Phase};
pub use transition::{transition, TransitionResult};
