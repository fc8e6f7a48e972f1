//! The turn engine — the heart of Adjutant.
//!
//! One user message drives one **turn**:
//!
//! 1. **Gate** the session so a second message can't interleave
//! 2. **Append** the user message to a working copy of the transcript
//! 3. **Ask the model**, with the system prompt injected call-side
//! 4. **If tool calls**: dispatch each one, append the results, ask again
//! 5. **If plain text**: persist the transcript and return the reply
//!
//! Model failures abort the turn without writing anything back; tool
//! failures are fed to the model as results and never abort anything.

pub mod prompt;
pub mod service;
pub mod turn;

pub use prompt::{system_prompt, DEFAULT_SYSTEM_PROMPT};
pub use service::ChatService;
pub use turn::TurnRunner;
