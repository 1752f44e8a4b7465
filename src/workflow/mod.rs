pub mod chat_flow;
pub mod quiz_flow;
pub mod quiz_session;

pub use chat_flow::{chat_error_message, ChatRequest};
pub use quiz_flow::{QuizRequest, QuizResponse, QuizState};
pub use quiz_session::{AnswerFeedback, QuizSession};
