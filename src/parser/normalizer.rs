//! Converts raw input text into the initial [`TokenSequence`].
use std::cmp::Ordering;

use super::{
    char_ext::CharExt,
    error::*,
    sequence::{Element, TokenSequence},
};

/// Rewrites braces and guillemets to `(` and `)` and collapses runs of whitespace into a single
/// space. Fails if the input contains a different number of `{` and `}` characters.
pub fn normalize(input: &str) -> Result<TokenSequence, ParseError> {
    normalize_text(input).add_stage(Stage::Normalize)
}

fn normalize_text(input: &str) -> Result<TokenSequence, Reason> {
    let mut opened = 0usize;
    let mut closed = 0usize;
    let mut elements = Vec::with_capacity(input.len());

    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '{' => opened += 1,
            '}' => closed += 1,
            _ => {}
        }

        let ch = if ch.is_whitespace() {
            while chars.next_if(|next| next.is_whitespace()).is_some() {}
            ' '
        } else {
            ch.canonical_bracket().unwrap_or(ch)
        };
        elements.push(Element::Char(ch));
    }

    match opened.cmp(&closed) {
        Ordering::Equal => Ok(elements.into_iter().collect()),
        Ordering::Greater => Err(Reason::BracketImbalance {
            excess: opened - closed,
            side: BracketKind::Opening,
        }),
        Ordering::Less => Err(Reason::BracketImbalance {
            excess: closed - opened,
            side: BracketKind::Closing,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(input: &str) -> String {
        normalize(input).unwrap().to_string()
    }

    #[test]
    fn braces_become_parentheses() {
        assert_eq!(normalized("{a+b}*c"), "(a+b)*c");
        assert_eq!(normalized("«a+b»*c"), "(a+b)*c");
    }

    #[test]
    fn one_element_per_character() {
        let sequence = normalize("2×π").unwrap();
        assert_eq!(sequence.len(), 3);
        assert_eq!(sequence.char_at(1), Some('×'));
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(normalized("a  +\t\tb\n"), "a + b ");
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        for input in ["(a + b) * c", "x = -(1/3)", "2  ** {3}", ""] {
            let once = normalized(input);
            assert_eq!(normalized(&once), once);
        }
    }

    #[test]
    fn extra_closing_brace_is_an_imbalance() {
        let err = normalize("a}").unwrap_err();
        assert_eq!(err.stage(), Stage::Normalize);
        assert_eq!(
            err.reason(),
            &Reason::BracketImbalance {
                excess: 1,
                side: BracketKind::Closing
            }
        );
    }

    #[test]
    fn extra_opening_braces_are_an_imbalance() {
        let err = normalize("{{a}").unwrap_err();
        assert_eq!(
            err.reason(),
            &Reason::BracketImbalance {
                excess: 1,
                side: BracketKind::Opening
            }
        );
        assert_eq!(
            err.to_string(),
            "there are 1 more '{' brackets than '}' characters in the input while normalizing the input"
        );
    }

    #[test]
    fn parentheses_are_not_counted() {
        assert_eq!(normalized("(a"), "(a");
    }
}
