//! LLM provider implementations for Adjutant.
//!
//! All providers implement the `adjutant_core::Provider` trait. The
//! agent only ever sees that trait; which endpoint actually answers is
//! decided here from configuration.

pub mod openai;

pub use openai::OpenAiProvider;
