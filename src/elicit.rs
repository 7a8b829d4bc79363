//! Elicitation seam between the decision model and whoever answers questions.
//!
//! The model only talks to [`Elicit`]; [`Console`] is the line-oriented
//! implementation used by the binary and, fed from an in-memory buffer, by tests.

use crate::error::{DecideError, Result};
use std::fmt;
use std::io::{BufRead, Write};

/// Unrecognized continuation answers tolerated before giving up.
const MAX_MORE_ATTEMPTS: u32 = 3;
/// Failed radar picks tolerated before falling back.
const MAX_RADAR_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Feature,
    Option,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Feature => write!(f, "feature"),
            Subject::Option => write!(f, "option"),
        }
    }
}

/// Answer to "add another?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoreResponse {
    Yes,
    No,
    /// The answer could not be understood; stop asking.
    Quit,
}

impl MoreResponse {
    pub fn wants_more(self) -> bool {
        matches!(self, MoreResponse::Yes)
    }
}

pub trait Elicit {
    fn request_feature_name(&mut self) -> Result<String>;

    fn request_option_name(&mut self, first: bool) -> Result<String>;

    fn request_more(&mut self, subject: Subject) -> Result<MoreResponse>;

    /// Called once before allocation starts.
    fn announce_budget(&mut self, budget: i64, feature_count: usize) -> Result<()>;

    /// Fails with [`DecideError::InvalidInput`] when the answer is not a
    /// nonnegative whole number.
    fn request_point_allocation(
        &mut self,
        feature: &str,
        remaining_points: i64,
        remaining_features: usize,
    ) -> Result<i64>;

    fn request_rating(&mut self, option: &str, feature: &str) -> Result<i32>;

    /// Picks one or two of `options` for a radar comparison.
    fn request_radar_selection(&mut self, options: &[String]) -> Result<Vec<String>>;
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str, waiting_for: &str) -> Result<String> {
        writeln!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(DecideError::EmptyInput(waiting_for.to_string()));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Elicit for Console<R, W> {
    fn request_feature_name(&mut self) -> Result<String> {
        self.ask(
            "Please enter a feature you will use to make your decision:",
            "a feature name",
        )
    }

    fn request_option_name(&mut self, first: bool) -> Result<String> {
        let prompt = if first {
            "Please enter the first option you need to compare:"
        } else {
            "Please enter the next option you are comparing:"
        };
        self.ask(prompt, "an option name")
    }

    fn request_more(&mut self, subject: Subject) -> Result<MoreResponse> {
        let mut prompt = format!("Would you like to add another {subject}? (Y/N)");
        for _ in 0..MAX_MORE_ATTEMPTS {
            let answer = self.ask(&prompt, "a Y/N answer")?;
            match answer.to_ascii_lowercase().as_str() {
                "y" => return Ok(MoreResponse::Yes),
                "n" => return Ok(MoreResponse::No),
                _ => {
                    tracing::debug!(%answer, "unrecognized continuation answer");
                    prompt = "Sorry, I didn't understand that. Please enter \"Y\" or \"N\".".into();
                }
            }
        }
        self.say("I'm having a hard time understanding you. Please try again later.")?;
        Ok(MoreResponse::Quit)
    }

    fn announce_budget(&mut self, budget: i64, feature_count: usize) -> Result<()> {
        self.say(&format!(
            "Imagine you have {budget} points to assign to your {feature_count} features."
        ))?;
        self.say(&format!(
            "Assign a nonnegative whole number to each of the following features making sure the total sums to {budget}."
        ))
    }

    fn request_point_allocation(
        &mut self,
        feature: &str,
        remaining_points: i64,
        remaining_features: usize,
    ) -> Result<i64> {
        self.say(&format!(
            "You have {remaining_points} points left, and {remaining_features} more features to value."
        ))?;
        let answer = self.ask(&format!("How much do you value {feature}?"), "a point value")?;
        match answer.parse::<i64>() {
            Ok(points) if points >= 0 => Ok(points),
            _ => {
                self.say("You must enter a whole number")?;
                Err(DecideError::invalid_input(feature, answer))
            }
        }
    }

    fn request_rating(&mut self, option: &str, feature: &str) -> Result<i32> {
        let answer = self.ask(
            &format!("Out of 10, how do you rate {option} in terms of {feature}?"),
            "a rating",
        )?;
        answer
            .parse::<i32>()
            .map_err(|_| DecideError::invalid_input(format!("{option}/{feature}"), answer))
    }

    fn request_radar_selection(&mut self, options: &[String]) -> Result<Vec<String>> {
        let Some(fallback) = options.first() else {
            return Err(DecideError::InvariantViolation(
                "radar selection needs at least one option".to_string(),
            ));
        };
        self.say("Choose up to two options to compare on a radar plot.")?;
        self.say(&format!("The options are: {}", options.join(", ")))?;

        let known = |name: &str| options.iter().any(|option| option == name);
        let mut attempts = 0;

        let first = loop {
            let answer = self.ask("Enter the first option to compare:", "an option name")?;
            attempts += 1;
            if known(&answer) {
                break answer;
            }
            if attempts > MAX_RADAR_ATTEMPTS {
                self.say("Sorry, I missed that. I'll use the first option.")?;
                break fallback.clone();
            }
        };

        let mut prompt = "Enter the second option to compare, or type \"none\":";
        let second = loop {
            let answer = self.ask(prompt, "an option name")?;
            if answer.eq_ignore_ascii_case("none") {
                break None;
            }
            attempts += 1;
            if known(&answer) {
                break Some(answer);
            }
            if attempts > MAX_RADAR_ATTEMPTS {
                self.say("Sorry, I missed that. We'll skip this option.")?;
                break None;
            }
            prompt = "Enter the second option to compare, or type \"none\" (check the spelling):";
        };

        let mut selection = vec![first];
        if let Some(second) = second {
            if !selection.contains(&second) {
                selection.push(second);
            }
        }
        Ok(selection)
    }
}
