//! Identifier style conversion for generated code and file names.
//!
//! Every input is first split into a word sequence: lower-cased tokens that
//! no longer carry any casing or separator information. The sequence is then
//! re-joined in the requested [`Style`].
//!
//! # Examples
//!
//! ```
//! use go_gen::core::naming::{Style, convert};
//!
//! assert_eq!(convert("UserModel", Style::Snake), "user_model");
//! assert_eq!(convert("user_model", Style::Pascal), "UserModel");
//! assert_eq!(convert("user-model", Style::Camel), "userModel");
//! assert_eq!(convert("User2Model", Style::Kebab), "user2-model");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::core::error::Error;

/// Target casing convention for identifiers and file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    /// `user_model`
    #[default]
    Snake,
    /// `userModel`
    Camel,
    /// `UserModel`
    Pascal,
    /// `user-model`
    Kebab,
}

impl Style {
    /// Returns the style token as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Snake => "snake",
            Self::Camel => "camel",
            Self::Pascal => "pascal",
            Self::Kebab => "kebab",
        }
    }

    /// Returns an iterator over all supported styles
    pub fn all() -> impl Iterator<Item = Self> {
        use Style::*;
        [Snake, Camel, Pascal, Kebab].iter().copied()
    }

    /// Re-join a word sequence in this style
    pub fn join(&self, words: &[String]) -> String {
        match self {
            Self::Snake => words.join("_"),
            Self::Kebab => words.join("-"),
            Self::Camel => words
                .iter()
                .enumerate()
                .map(|(i, word)| {
                    if i == 0 {
                        word.clone()
                    } else {
                        capitalize(word)
                    }
                })
                .collect(),
            Self::Pascal => words.iter().map(|word| capitalize(word)).collect(),
        }
    }
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snake" => Ok(Self::Snake),
            "camel" => Ok(Self::Camel),
            "pascal" => Ok(Self::Pascal),
            "kebab" => Ok(Self::Kebab),
            _ => Err(Error::UnknownStyle(s.to_string())),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Converts `input` to the given style.
///
/// Empty input yields an empty string.
pub fn convert(input: &str, style: Style) -> String {
    if input.is_empty() {
        return String::new();
    }
    style.join(&split_words(input))
}

/// Converts `input` using a style token such as `"kebab"`.
///
/// An unrecognised token returns the input unchanged. Callers that need a
/// hard failure should parse the token into a [`Style`] first.
pub fn convert_token(input: &str, token: &str) -> String {
    match token.parse::<Style>() {
        Ok(style) => convert(input, style),
        Err(_) => input.to_string(),
    }
}

/// Splits an identifier into its lower-cased word sequence.
///
/// `-`, `_` and whitespace separate words. An uppercase letter directly after
/// a non-uppercase character also starts a new word, so acronyms stay
/// together (`HTTPServer` is one word). Digits never start a word on their
/// own and attach to the run before them (`User2Model` -> `user2`, `model`).
pub fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for ch in input.chars() {
        let ch = if ch == '-' { '_' } else { ch };

        if ch == '_' || ch.is_whitespace() {
            flush(&mut current, &mut words);
        } else {
            if ch.is_uppercase() && prev.is_some_and(|p| !p.is_uppercase()) {
                flush(&mut current, &mut words);
            }
            current.push(ch);
        }
        prev = Some(ch);
    }
    flush(&mut current, &mut words);

    words
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(current.to_lowercase());
        current.clear();
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
