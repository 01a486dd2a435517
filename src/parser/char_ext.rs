//! Character classes for brackets.
pub const BRACKET_OPEN: [char; 2] = ['(', '«'];
pub const BRACKET_CLOSE: [char; 2] = [')', '»'];

pub trait CharExt {
    fn is_opening_bracket(&self) -> bool;

    fn is_closing_bracket(&self) -> bool;

    /// Maps every alternate bracket spelling onto `(` or `)`.
    fn canonical_bracket(&self) -> Option<char>;
}
impl CharExt for char {
    fn is_opening_bracket(&self) -> bool {
        BRACKET_OPEN.contains(self)
    }

    fn is_closing_bracket(&self) -> bool {
        BRACKET_CLOSE.contains(self)
    }

    fn canonical_bracket(&self) -> Option<char> {
        match self {
            '{' | '«' => Some('('),
            '}' | '»' => Some(')'),
            _ => None,
        }
    }
}
