mod llm;
mod prompt;

pub use llm::{GeminiGenerator, TextGenerator};
pub use prompt::{daily_prompt, weekly_prompt, WorkHours};
