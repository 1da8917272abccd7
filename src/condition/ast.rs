//! Expression tree for skip-logic conditions

use crate::condition::number::OhmageNumber;
use crate::condition::parser::Condition;
use crate::condition::response::NoResponse;
use std::fmt;

/// Leaf value of a condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// Quoted text literal, stored without its quotes
    Text(String),
    /// Numeric literal
    Numeric(OhmageNumber),
    /// Reference to the response of an earlier prompt
    PromptId(String),
    /// `NOT_DISPLAYED` marker
    NotDisplayed,
    /// `SKIPPED` marker
    Skipped,
}

impl Terminal {
    pub fn no_response(marker: NoResponse) -> Self {
        match marker {
            NoResponse::NotDisplayed => Terminal::NotDisplayed,
            NoResponse::Skipped => Terminal::Skipped,
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// Equal (==)
    Equals,
    /// Not equal (!=)
    NotEquals,
    /// Less than (<)
    LessThan,
    /// Less than or equal (<=)
    LessThanOrEquals,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal (>=)
    GreaterThanOrEquals,
}

impl Comparator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Comparator::Equals),
            "!=" => Some(Comparator::NotEquals),
            "<" => Some(Comparator::LessThan),
            "<=" => Some(Comparator::LessThanOrEquals),
            ">" => Some(Comparator::GreaterThan),
            ">=" => Some(Comparator::GreaterThanOrEquals),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Equals => "==",
            Comparator::NotEquals => "!=",
            Comparator::LessThan => "<",
            Comparator::LessThanOrEquals => "<=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterThanOrEquals => ">=",
        }
    }
}

/// Binary logical connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(LogicalOp::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(LogicalOp::Or)
        } else {
            None
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

/// Node of a condition expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Terminal(Terminal),
    /// Logical negation of the wrapped fragment
    Not(Box<Fragment>),
    /// Nested condition written in parentheses
    Parenthetical(Box<Condition>),
    Comparison {
        comparator: Comparator,
        left: Terminal,
        right: Terminal,
    },
    Logical {
        op: LogicalOp,
        left: Box<Fragment>,
        right: Box<Fragment>,
    },
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Text(text) => write!(f, "\"{}\"", text),
            Terminal::Numeric(n) => write!(f, "{}", n),
            Terminal::PromptId(id) => f.write_str(id),
            Terminal::NotDisplayed => f.write_str(NoResponse::NotDisplayed.keyword()),
            Terminal::Skipped => f.write_str(NoResponse::Skipped.keyword()),
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Terminal(t) => write!(f, "{}", t),
            Fragment::Not(inner) => write!(f, "! {}", inner),
            Fragment::Parenthetical(condition) => write!(f, "({})", condition.root()),
            Fragment::Comparison {
                comparator,
                left,
                right,
            } => write!(f, "{} {} {}", left, comparator.symbol(), right),
            Fragment::Logical { op, left, right } => {
                write!(f, "{} {} {}", left, op.keyword(), right)
            }
        }
    }
}
