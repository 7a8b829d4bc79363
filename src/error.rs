use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecideError {
    #[error("could not read a whole number for {subject} from {input:?}")]
    InvalidInput { subject: String, input: String },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("rating {rating} for {option}/{feature} is outside 0..=10")]
    RatingOutOfRange {
        option: String,
        feature: String,
        rating: i32,
    },

    #[error("allocated {allocated} points but the budget is {budget}")]
    BudgetMismatch { allocated: i64, budget: i64 },

    #[error("input ended while waiting for {0}")]
    EmptyInput(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecideError {
    pub fn invalid_input(subject: impl Into<String>, input: impl Into<String>) -> Self {
        Self::InvalidInput {
            subject: subject.into(),
            input: input.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DecideError>;
