use std::fmt::{self, Display};

use super::operator::Operator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A number, identifier, or any other text without an operator at bracket depth zero.
    Operand(String),
    /// An operand made of bracket groups and the text around them, such as `sqrt(x+1)`,
    /// `-(a+b)` or `(a+b)(c+d)`. Each group is reduced to its own expression.
    Juxtaposed(Vec<Term>),
    Binary(Box<BinExpr>),
}

impl Expr {
    pub fn operand(text: impl Into<String>) -> Self {
        Expr::Operand(text.into())
    }

    pub fn binary(lhs: Expr, op: &'static Operator, rhs: Expr) -> Self {
        Expr::Binary(Box::new(BinExpr { lhs, op, rhs }))
    }

    pub fn as_operand(&self) -> Option<&str> {
        match self {
            Expr::Operand(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_juxtaposed(&self) -> Option<&[Term]> {
        match self {
            Expr::Juxtaposed(terms) => Some(terms),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&BinExpr> {
        match self {
            Expr::Binary(bin) => Some(bin),
            _ => None,
        }
    }

    /// Flattens the tree back into its operands and operators, in their original order,
    /// separated by single spaces. Grouping is not preserved, except for the bracket groups
    /// written inside an operand.
    pub fn infix(&self) -> String {
        let mut out = String::new();
        self.write_infix(&mut out);
        out
    }

    fn write_infix(&self, out: &mut String) {
        match self {
            Expr::Operand(text) => out.push_str(text),
            Expr::Juxtaposed(terms) => {
                for term in terms {
                    match term {
                        Term::Text(text) => out.push_str(text),
                        Term::Group(expr) => {
                            out.push('(');
                            expr.write_infix(out);
                            out.push(')');
                        }
                    }
                }
            }
            Expr::Binary(bin) => {
                bin.lhs.write_infix(out);
                out.push(' ');
                out.push(bin.op.symbol());
                out.push(' ');
                bin.rhs.write_infix(out);
            }
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Operand(text) => write!(f, "{}", text),
            Expr::Juxtaposed(terms) => terms.iter().try_for_each(|term| write!(f, "{}", term)),
            Expr::Binary(bin) => write!(f, "{}", bin),
        }
    }
}

/// One piece of a juxtaposed operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Text(String),
    Group(Expr),
}

impl Term {
    pub fn as_group(&self) -> Option<&Expr> {
        match self {
            Term::Group(expr) => Some(expr),
            Term::Text(_) => None,
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Text(text) => write!(f, "{}", text),
            // A binary node already prints its own brackets.
            Term::Group(expr @ Expr::Binary(_)) => write!(f, "{}", expr),
            Term::Group(expr) => write!(f, "({})", expr),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinExpr {
    lhs: Expr,
    op: &'static Operator,
    rhs: Expr,
}

impl BinExpr {
    pub fn lhs(&self) -> &Expr {
        &self.lhs
    }

    pub fn op(&self) -> &'static Operator {
        self.op
    }

    pub fn rhs(&self) -> &Expr {
        &self.rhs
    }
}

impl Display for BinExpr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} {} {})", self.lhs, self.op, self.rhs)
    }
}
