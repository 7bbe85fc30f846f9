//! Answering orchestration: pipeline, conversation log, and their types.

pub mod log;
pub mod pipeline;
pub mod types;

pub use log::ConversationLog;
pub use pipeline::{AnswerOptions, AnswerPipeline};
pub use types::{Answer, AnswerPhase, ConversationEntry, ExchangeOutcome};
