//! Operator precedence, associativity and spelling.
use std::fmt::{self, Display};

use super::sequence::TokenSequence;

/// Operators of equal rank bind equally tightly. Higher ranks bind tighter.
pub type Rank = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

impl Display for Assoc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Assoc::Left => "left",
            Assoc::Right => "right",
        })
    }
}

/// A binary operator, matched either by its canonical symbol or by one of its aliases.
#[derive(Debug, PartialEq, Eq)]
pub struct Operator {
    symbol: char,
    name: &'static str,
    rank: Rank,
    assoc: Assoc,
    aliases: &'static [&'static str],
    sign: bool,
}

/// The operator catalog.
pub static OPERATORS: [Operator; 12] = [
    Operator::new('=', "equals", 0),
    Operator::new('≠', "not_equal", 0).aliases(&["!="]),
    Operator::new('<', "less_than", 0),
    Operator::new('≤', "less_than_or_equal", 0).aliases(&["<="]),
    Operator::new('>', "greater_than", 0),
    Operator::new('≥', "greater_than_or_equal", 0).aliases(&[">="]),
    Operator::new('+', "add", 1).sign(),
    Operator::new('-', "subtract", 1).sign(),
    Operator::new('±', "plus_or_minus", 1).sign(),
    Operator::new('*', "multiply", 2).aliases(&["×"]),
    Operator::new('/', "divide", 2).aliases(&["÷"]),
    Operator::new('^', "power", 3).aliases(&["**"]).right_assoc(),
];

impl Operator {
    const fn new(symbol: char, name: &'static str, rank: Rank) -> Self {
        Self {
            symbol,
            name,
            rank,
            assoc: Assoc::Left,
            aliases: &[],
            sign: false,
        }
    }

    const fn aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    const fn right_assoc(self) -> Self {
        Self {
            assoc: Assoc::Right,
            ..self
        }
    }

    /// Marks an operator that may also prefix an operand as its sign.
    const fn sign(self) -> Self {
        Self { sign: true, ..self }
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn assoc(&self) -> Assoc {
        self.assoc
    }

    pub fn alias_list(&self) -> &'static [&'static str] {
        self.aliases
    }

    /// Returns `true` if this operator can also appear as the sign of an operand,
    /// in which case it has no left operand.
    pub fn is_sign(&self) -> bool {
        self.sign
    }

    /// Returns `true` if `token` is the symbol of this operator or one of its aliases.
    pub fn matches(&self, token: &str) -> bool {
        let mut chars = token.chars();
        let is_symbol = chars.next() == Some(self.symbol) && chars.next().is_none();
        is_symbol || self.aliases.contains(&token)
    }

    pub fn all() -> &'static [Operator] {
        &OPERATORS
    }

    /// Looks up an operator by a single character, which may be its symbol or a one-character alias.
    pub fn by_char(ch: char) -> Option<&'static Operator> {
        let mut buf = [0; 4];
        let token = ch.encode_utf8(&mut buf);
        OPERATORS.iter().find(|op| op.matches(token))
    }

    pub fn with_rank(rank: Rank) -> impl Iterator<Item = &'static Operator> {
        OPERATORS.iter().filter(move |op| op.rank == rank)
    }

    /// The associativity shared by all operators of a rank.
    pub fn assoc_of(rank: Rank) -> Assoc {
        Self::with_rank(rank)
            .map(Operator::assoc)
            .next()
            .unwrap_or(Assoc::Left)
    }

    /// The ranks in the order their passes run: loosest binding first, so tighter operators
    /// end up nested inside the operands of looser ones.
    pub fn pass_order() -> impl Iterator<Item = Rank> {
        let mut ranks: Vec<Rank> = OPERATORS.iter().map(Operator::rank).collect();
        ranks.sort_unstable();
        ranks.dedup();
        ranks.into_iter()
    }

    /// Finds the operator spelled at `start`, preferring the longest spelling, and returns it
    /// along with the number of elements it occupies.
    pub fn find_at(sequence: &TokenSequence, start: usize) -> Option<(&'static Operator, usize)> {
        OPERATORS
            .iter()
            .filter_map(|op| op.width_at(sequence, start).map(|width| (op, width)))
            .max_by_key(|(_, width)| *width)
    }

    /// Finds the operator whose spelling ends at `end` (inclusive), preferring the longest spelling.
    pub fn find_ending_at(
        sequence: &TokenSequence,
        end: usize,
    ) -> Option<(&'static Operator, usize)> {
        OPERATORS
            .iter()
            .filter_map(|op| op.width_ending_at(sequence, end).map(|width| (op, width)))
            .max_by_key(|(_, width)| *width)
    }

    fn width_at(&self, sequence: &TokenSequence, start: usize) -> Option<usize> {
        self.aliases
            .iter()
            .filter(|alias| sequence.spells(start, alias))
            .map(|alias| alias.chars().count())
            .max()
            .or_else(|| (sequence.char_at(start) == Some(self.symbol)).then_some(1))
    }

    fn width_ending_at(&self, sequence: &TokenSequence, end: usize) -> Option<usize> {
        self.aliases
            .iter()
            .map(|alias| (alias, alias.chars().count()))
            .filter(|(alias, width)| end + 1 >= *width && sequence.spells(end + 1 - width, alias))
            .map(|(_, width)| width)
            .max()
            .or_else(|| (sequence.char_at(end) == Some(self.symbol)).then_some(1))
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(text: &str, start: usize) -> Option<(&'static str, usize)> {
        Operator::find_at(&TokenSequence::from_text(text), start).map(|(op, w)| (op.name(), w))
    }

    fn find_ending(text: &str, end: usize) -> Option<(&'static str, usize)> {
        Operator::find_ending_at(&TokenSequence::from_text(text), end)
            .map(|(op, w)| (op.name(), w))
    }

    #[test]
    fn aliases_match_their_operator() {
        let power = Operator::by_char('^').unwrap();
        assert!(power.matches("^"));
        assert!(power.matches("**"));
        assert!(!power.matches("*"));

        assert_eq!(Operator::by_char('×').map(Operator::name), Some("multiply"));
        assert_eq!(Operator::by_char('÷').map(Operator::name), Some("divide"));
        assert_eq!(Operator::by_char('x'), None);
    }

    #[test]
    fn ranks_group_operators() {
        let additive: Vec<_> = Operator::with_rank(1).map(Operator::symbol).collect();
        assert_eq!(additive, vec!['+', '-', '±']);

        assert_eq!(Operator::assoc_of(3), Assoc::Right);
        assert_eq!(Operator::assoc_of(2), Assoc::Left);
    }

    #[test]
    fn passes_run_loosest_first() {
        let order: Vec<_> = Operator::pass_order().collect();
        assert_eq!(order, vec![0, 1, 2, 3]);

        let add = Operator::by_char('+').unwrap();
        let mul = Operator::by_char('*').unwrap();
        let pow = Operator::by_char('^').unwrap();
        let eq = Operator::by_char('=').unwrap();
        assert!(eq.rank() < add.rank());
        assert!(add.rank() < mul.rank());
        assert!(mul.rank() < pow.rank());
    }

    #[test]
    fn longest_spelling_wins() {
        assert_eq!(find("2**3", 1), Some(("power", 2)));
        assert_eq!(find("2*3", 1), Some(("multiply", 1)));
        assert_eq!(find("a<=b", 1), Some(("less_than_or_equal", 2)));
        assert_eq!(find("a<b", 1), Some(("less_than", 1)));
        assert_eq!(find("ab", 1), None);
    }

    #[test]
    fn spellings_are_found_from_their_last_character() {
        assert_eq!(find_ending("2**3", 2), Some(("power", 2)));
        assert_eq!(find_ending("a!=b", 2), Some(("not_equal", 2)));
        assert_eq!(find_ending("a=b", 1), Some(("equals", 1)));
        assert_eq!(find_ending("*3", 0), Some(("multiply", 1)));
    }
}
