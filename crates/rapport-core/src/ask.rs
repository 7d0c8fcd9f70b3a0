//! Free-form questions about the whole network.
//!
//! Every contact is rendered into one prompt and the question is appended.
//! Transports implement [`AnswerOracle`] and return the answer text as is.

use std::{fmt::Write as _, future::Future};

use strum::IntoEnumIterator as _;

use crate::{
  Error, Result,
  contact::{Contact, Field},
};

/// Render `contacts` and `question` into a single user message.
///
/// Fails with [`Error::BlankQuestion`] if `question` is blank.
pub fn build_ask_prompt(contacts: &[Contact], question: &str) -> Result<String> {
  let question = question.trim();
  if question.is_empty() {
    return Err(Error::BlankQuestion);
  }

  let mut prompt = String::from("You are analyzing a contact network. Here are the contacts:\n");
  for contact in contacts {
    let _ = write!(prompt, "\nContact: {}\n", contact.name);
    for field in Field::iter().filter(|f| *f != Field::Name) {
      let _ = writeln!(prompt, "- {}: {}", field.label(), contact.get(field));
    }
  }
  let _ = write!(
    prompt,
    "\nAnswer the following question:\n{question}\n\n\
     Base the answer on the contacts above. Read all of the data before deciding, \
     and give a detailed response."
  );
  Ok(prompt)
}

/// A transport that answers a free-form prompt.
pub trait AnswerOracle: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn answer<'a>(
    &'a self,
    prompt: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Whether a failed call is worth repeating. Defaults to `true`.
  fn is_retryable(&self, _error: &Self::Error) -> bool { true }
}
