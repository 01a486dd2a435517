//! The token sequence rewritten by the precedence passes.
use std::{
    fmt::{self, Display},
    ops::Range,
    slice::Iter,
};

use super::{char_ext::CharExt, error::Reason, syntax_tree::Expr};

/// A single slot in a [`TokenSequence`]: either a character of the input,
/// or a sub-expression that has already been reduced to a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Char(char),
    Node(Expr),
}

impl Element {
    pub fn as_char(&self) -> Option<char> {
        match self {
            Element::Char(ch) => Some(*ch),
            Element::Node(_) => None,
        }
    }

    pub fn is_opening_bracket(&self) -> bool {
        matches!(self, Element::Char(ch) if ch.is_opening_bracket())
    }

    pub fn is_closing_bracket(&self) -> bool {
        matches!(self, Element::Char(ch) if ch.is_closing_bracket())
    }

    pub fn is_space(&self) -> bool {
        matches!(self, Element::Char(' '))
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Element::Char(ch) => write!(f, "{}", ch),
            Element::Node(expr) => write!(f, "{}", expr),
        }
    }
}

/// An ordered sequence of [`Element`]s. Every edit keeps the indices contiguous,
/// and every slice cut out of it is an independent sequence that owns its elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSequence {
    elements: Vec<Element>,
}

impl TokenSequence {
    /// Creates a sequence with one [`Element::Char`] per character of `text`.
    pub fn from_text(text: &str) -> Self {
        text.chars().map(Element::Char).collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Element, Reason> {
        self.elements.get(index).ok_or(Reason::InvalidIndex {
            index,
            len: self.len(),
        })
    }

    /// Returns the character at `index`, or [`None`] if it is out of range or holds a node.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.elements.get(index).and_then(Element::as_char)
    }

    pub fn is_space(&self, index: usize) -> bool {
        self.elements.get(index).map_or(false, Element::is_space)
    }

    /// Returns `true` if the characters starting at `start` spell out `text`.
    pub fn spells(&self, start: usize, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(offset, ch)| self.char_at(start + offset) == Some(ch))
    }

    /// Inserts `element` before `index`. An index equal to the length appends.
    pub fn insert(&mut self, index: usize, element: Element) -> Result<(), Reason> {
        if index > self.len() {
            return Err(Reason::InvalidIndex {
                index,
                len: self.len(),
            });
        }
        self.elements.insert(index, element);
        Ok(())
    }

    /// Replaces the element at `index`, returning the one that was there.
    pub fn overwrite(&mut self, index: usize, element: Element) -> Result<Element, Reason> {
        let len = self.len();
        let slot = self
            .elements
            .get_mut(index)
            .ok_or(Reason::InvalidIndex { index, len })?;
        Ok(std::mem::replace(slot, element))
    }

    /// Removes the elements in `span` and returns them as a new sequence.
    pub fn cut(&mut self, span: Range<usize>) -> Result<TokenSequence, Reason> {
        if span.start > span.end || span.end > self.len() {
            return Err(Reason::InvalidSpan {
                start: span.start,
                end: span.end,
                len: self.len(),
            });
        }
        Ok(self.elements.drain(span).collect())
    }

    /// Removes leading and trailing spaces.
    pub fn trim(&mut self) {
        let end = self
            .elements
            .iter()
            .rposition(|element| !element.is_space())
            .map_or(0, |last| last + 1);
        self.elements.truncate(end);

        let start = self
            .elements
            .iter()
            .position(|element| !element.is_space())
            .unwrap_or(self.elements.len());
        self.elements.drain(..start);
    }

    /// Renders the elements directly around `index`, for error messages.
    pub fn snippet(&self, index: usize) -> String {
        let start = index.saturating_sub(1).min(self.len());
        let end = index.saturating_add(2).min(self.len());
        self.elements[start..end]
            .iter()
            .map(|element| element.to_string())
            .collect()
    }

    pub fn iter(&self) -> Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}

impl FromIterator<Element> for TokenSequence {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl Display for TokenSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for element in self.elements.iter() {
            write!(f, "{}", element)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_overwrite_keep_indices_contiguous() {
        let mut sequence = TokenSequence::from_text("2+3");

        sequence.insert(3, Element::Char(')')).unwrap();
        sequence.insert(0, Element::Char('(')).unwrap();
        assert_eq!(sequence.to_string(), "(2+3)");

        let old = sequence.overwrite(2, Element::Char('-')).unwrap();
        assert_eq!(old, Element::Char('+'));
        assert_eq!(sequence.to_string(), "(2-3)");
        assert_eq!(sequence.len(), 5);
    }

    #[test]
    fn cut_returns_an_independent_sequence() {
        let mut sequence = TokenSequence::from_text("ab+cd");

        let right = sequence.cut(3..5).unwrap();
        let left = sequence.cut(0..2).unwrap();

        assert_eq!(left.to_string(), "ab");
        assert_eq!(right.to_string(), "cd");
        assert_eq!(sequence.to_string(), "+");
    }

    #[test]
    fn out_of_range_access_is_reported() {
        let mut sequence = TokenSequence::from_text("ab");

        assert_eq!(sequence.get(2), Err(Reason::InvalidIndex { index: 2, len: 2 }));
        assert_eq!(
            sequence.insert(3, Element::Char('c')),
            Err(Reason::InvalidIndex { index: 3, len: 2 })
        );
        assert_eq!(
            sequence.overwrite(2, Element::Char('c')),
            Err(Reason::InvalidIndex { index: 2, len: 2 })
        );
        assert_eq!(
            sequence.cut(0..3),
            Err(Reason::InvalidSpan {
                start: 0,
                end: 3,
                len: 2
            })
        );
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = sequence.cut(2..1);
        assert_eq!(
            reversed,
            Err(Reason::InvalidSpan {
                start: 2,
                end: 1,
                len: 2
            })
        );
    }

    #[test]
    fn nodes_occupy_a_single_slot() {
        let mut sequence = TokenSequence::from_text("x*y");
        sequence
            .overwrite(0, Element::Node(Expr::operand("x")))
            .unwrap();

        assert_eq!(sequence.char_at(0), None);
        assert_eq!(sequence.char_at(1), Some('*'));
        assert!(!sequence.get(0).unwrap().is_opening_bracket());
    }

    #[test]
    fn trim_removes_outer_spaces_only() {
        let mut sequence = TokenSequence::from_text("  a b ");
        sequence.trim();
        assert_eq!(sequence.to_string(), "a b");

        let mut blank = TokenSequence::from_text("   ");
        blank.trim();
        assert!(blank.is_empty());
    }

    #[test]
    fn snippet_is_clamped_to_the_sequence() {
        let sequence = TokenSequence::from_text("(2+3");
        assert_eq!(sequence.snippet(0), "(2");
        assert_eq!(sequence.snippet(2), "2+3");
        assert_eq!(sequence.snippet(3), "+3");
        assert_eq!(sequence.snippet(10), "");
    }
}
