use dialoguer::Input;

use crate::error::Result;

/// Synchronous request/response port for the human-in-the-loop steps.
/// The engines only ever block on these two calls, so tests (and future
/// non-console frontends) supply scripted answers instead.
pub trait Decisions {
    /// Free-text answer; an empty string means the operator declined.
    fn ask(&mut self, prompt: &str, default: &str) -> Result<String>;

    /// Pick an index into a presented list of `len` candidates.
    /// `None` ends the current loop.
    fn pick(&mut self, prompt: &str, len: usize) -> Result<Option<usize>>;
}

/// Terminal implementation backed by dialoguer.
pub struct Console;

impl Decisions for Console {
    fn ask(&mut self, prompt: &str, default: &str) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?.trim().to_string())
    }

    fn pick(&mut self, prompt: &str, len: usize) -> Result<Option<usize>> {
        loop {
            let raw: String = Input::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?;
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            match raw.parse::<usize>() {
                Ok(idx) if idx < len => return Ok(Some(idx)),
                _ => println!("Invalid choice."),
            }
        }
    }
}

#[cfg(test)]
pub struct Scripted {
    answers: std::collections::VecDeque<String>,
}

#[cfg(test)]
impl Scripted {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
impl Decisions for Scripted {
    fn ask(&mut self, _prompt: &str, default: &str) -> Result<String> {
        let answer = self.answers.pop_front().unwrap_or_default();
        if answer.is_empty() && !default.is_empty() {
            return Ok(default.to_string());
        }
        Ok(answer)
    }

    fn pick(&mut self, _prompt: &str, len: usize) -> Result<Option<usize>> {
        match self.answers.pop_front() {
            Some(raw) if !raw.is_empty() => {
                let idx: usize = raw.parse().expect("scripted pick must be numeric");
                assert!(idx < len, "scripted pick out of range");
                Ok(Some(idx))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_in_order() {
        let mut d = Scripted::new(&["999", "", "acme"]);
        assert_eq!(d.ask("tax id", "").unwrap(), "999");
        assert_eq!(d.ask("name", "fallback").unwrap(), "fallback");
        assert_eq!(d.ask("category", "").unwrap(), "acme");
        assert_eq!(d.ask("exhausted", "").unwrap(), "");
    }

    #[test]
    fn test_scripted_pick_empty_ends_loop() {
        let mut d = Scripted::new(&["1", ""]);
        assert_eq!(d.pick("accept", 3).unwrap(), Some(1));
        assert_eq!(d.pick("accept", 3).unwrap(), None);
        assert_eq!(d.pick("accept", 3).unwrap(), None);
    }
}
