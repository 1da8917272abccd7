//! Construction-time builders and the left-to-right merge protocol
//!
//! Tokens are turned into builders one at a time and folded into a single
//! root builder with [`FragmentBuilder::merge`]. A builder receiving a merge
//! either absorbs the next builder into one of its free operand slots, or
//! hands itself to the next builder through `accept_left`, which takes the
//! accumulated tree as its left-hand operand. Precedence falls out of which
//! builder gets to absorb:
//!
//! | binds      | token                                  |
//! |------------|----------------------------------------|
//! | tightest   | `==` `!=` `<` `<=` `>` `>=`            |
//! |            | `!`                                    |
//! |            | `and`                                  |
//! | loosest    | `or`                                   |
//!
//! A tighter operator arriving after a complete looser one descends into the
//! looser operator's right-most operand, so `a or b and c` groups as
//! `a or (b and c)`. Operators of equal precedence associate left.

use crate::condition::ast::{Comparator, Fragment, LogicalOp, Terminal};
use crate::condition::number::OhmageNumber;
use crate::condition::parser::Condition;
use crate::condition::response::{NOT_DISPLAYED, SKIPPED};
use crate::error::{ConditionError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

const COMPARISON_PRECEDENCE: u8 = 4;
const NOT_PRECEDENCE: u8 = 3;
const AND_PRECEDENCE: u8 = 2;
const OR_PRECEDENCE: u8 = 1;

static NUMERIC_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid regex"));

static PROMPT_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("valid regex"));

/// Builder for one [`Fragment`] variant
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentBuilder {
    Terminal(Terminal),
    Not(Option<Box<FragmentBuilder>>),
    Parenthetical(Condition),
    Comparison {
        comparator: Comparator,
        left: Option<Terminal>,
        right: Option<Terminal>,
    },
    Logical {
        op: LogicalOp,
        left: Option<Box<FragmentBuilder>>,
        right: Option<Box<FragmentBuilder>>,
    },
}

impl FragmentBuilder {
    /// Classify a single whitespace-delimited word
    pub fn parse_word(word: &str) -> Result<Self> {
        if word.starts_with('"') {
            if word.len() < 2 || !word.ends_with('"') {
                return Err(ConditionError::MalformedText(word.to_string()));
            }
            let text = &word[1..word.len() - 1];
            return Ok(FragmentBuilder::Terminal(Terminal::Text(text.to_string())));
        }

        if word == "!" {
            return Ok(FragmentBuilder::Not(None));
        }

        if let Some(comparator) = Comparator::from_symbol(word) {
            return Ok(FragmentBuilder::Comparison {
                comparator,
                left: None,
                right: None,
            });
        }

        if let Some(op) = LogicalOp::from_word(word) {
            return Ok(FragmentBuilder::Logical {
                op,
                left: None,
                right: None,
            });
        }

        match word {
            NOT_DISPLAYED => return Ok(FragmentBuilder::Terminal(Terminal::NotDisplayed)),
            SKIPPED => return Ok(FragmentBuilder::Terminal(Terminal::Skipped)),
            _ => {}
        }

        if NUMERIC_LITERAL.is_match(word) {
            let number = OhmageNumber::parse(word)?;
            return Ok(FragmentBuilder::Terminal(Terminal::Numeric(number)));
        }

        if PROMPT_ID.is_match(word) {
            return Ok(FragmentBuilder::Terminal(Terminal::PromptId(
                word.to_string(),
            )));
        }

        Err(ConditionError::UnknownToken(word.to_string()))
    }

    /// Fold `next`, the builder to the right of `self`, into the tree
    pub fn merge(self, next: FragmentBuilder) -> Result<Self> {
        match self {
            FragmentBuilder::Terminal(_) | FragmentBuilder::Parenthetical(_) => {
                next.accept_left(self)
            }

            FragmentBuilder::Not(None) => {
                if next.awaits_left() {
                    return Err(ConditionError::MissingOperand(next.describe()));
                }
                Ok(FragmentBuilder::Not(Some(Box::new(next))))
            }
            FragmentBuilder::Not(Some(operand)) => {
                if !operand.is_complete() || next.binds_tighter_than(NOT_PRECEDENCE) {
                    let operand = (*operand).merge(next)?;
                    Ok(FragmentBuilder::Not(Some(Box::new(operand))))
                } else {
                    next.accept_left(FragmentBuilder::Not(Some(operand)))
                }
            }

            FragmentBuilder::Comparison {
                comparator,
                left: None,
                ..
            } => Err(ConditionError::MissingOperand(comparator.symbol().to_string())),
            FragmentBuilder::Comparison {
                comparator,
                left: Some(left),
                right: None,
            } => match next {
                FragmentBuilder::Terminal(right) => Ok(FragmentBuilder::Comparison {
                    comparator,
                    left: Some(left),
                    right: Some(right),
                }),
                FragmentBuilder::Parenthetical(condition) => Err(
                    ConditionError::MisplacedParenthetical(condition.sentence().to_string()),
                ),
                other => Err(ConditionError::InvalidComparisonOperand {
                    comparator: comparator.symbol().to_string(),
                    found: other.describe(),
                }),
            },
            complete @ FragmentBuilder::Comparison { .. } => next.accept_left(complete),

            FragmentBuilder::Logical { op, left: None, .. } => {
                Err(ConditionError::MissingOperand(op.keyword().to_string()))
            }
            FragmentBuilder::Logical {
                op,
                left,
                right: None,
            } => {
                if next.awaits_left() {
                    return Err(ConditionError::MissingOperand(op.keyword().to_string()));
                }
                Ok(FragmentBuilder::Logical {
                    op,
                    left,
                    right: Some(Box::new(next)),
                })
            }
            FragmentBuilder::Logical {
                op,
                left,
                right: Some(right),
            } => {
                if !right.is_complete() || next.binds_tighter_than(op.precedence()) {
                    let right = (*right).merge(next)?;
                    Ok(FragmentBuilder::Logical {
                        op,
                        left,
                        right: Some(Box::new(right)),
                    })
                } else {
                    next.accept_left(FragmentBuilder::Logical {
                        op,
                        left,
                        right: Some(right),
                    })
                }
            }
        }
    }

    /// Take the complete tree `left` as this builder's left-hand operand
    fn accept_left(self, left: FragmentBuilder) -> Result<Self> {
        match self {
            FragmentBuilder::Comparison {
                comparator,
                left: None,
                right: None,
            } => match left {
                FragmentBuilder::Terminal(terminal) => Ok(FragmentBuilder::Comparison {
                    comparator,
                    left: Some(terminal),
                    right: None,
                }),
                FragmentBuilder::Parenthetical(condition) => Err(
                    ConditionError::MisplacedParenthetical(condition.sentence().to_string()),
                ),
                other => Err(ConditionError::InvalidComparisonOperand {
                    comparator: comparator.symbol().to_string(),
                    found: other.describe(),
                }),
            },

            FragmentBuilder::Logical {
                op,
                left: None,
                right: None,
            } => Ok(FragmentBuilder::Logical {
                op,
                left: Some(Box::new(left)),
                right: None,
            }),

            FragmentBuilder::Terminal(terminal) => Err(match left {
                FragmentBuilder::Terminal(previous) => ConditionError::AdjacentTerminals {
                    left: previous.to_string(),
                    right: terminal.to_string(),
                },
                FragmentBuilder::Parenthetical(condition) => {
                    ConditionError::MisplacedParenthetical(condition.sentence().to_string())
                }
                other => ConditionError::MissingOperator {
                    left: other.describe(),
                    right: terminal.to_string(),
                },
            }),

            FragmentBuilder::Parenthetical(condition) => Err(match left {
                FragmentBuilder::Terminal(_) | FragmentBuilder::Comparison { .. } => {
                    ConditionError::MisplacedParenthetical(condition.sentence().to_string())
                }
                other => ConditionError::MissingOperator {
                    left: other.describe(),
                    right: condition.sentence().to_string(),
                },
            }),

            other => Err(ConditionError::MissingOperator {
                left: left.describe(),
                right: other.describe(),
            }),
        }
    }

    /// Finalize into an immutable fragment
    pub fn build(self) -> Result<Fragment> {
        match self {
            FragmentBuilder::Terminal(terminal) => Ok(Fragment::Terminal(terminal)),
            FragmentBuilder::Parenthetical(condition) => {
                Ok(Fragment::Parenthetical(Box::new(condition)))
            }
            FragmentBuilder::Not(Some(operand)) => Ok(Fragment::Not(Box::new(operand.build()?))),
            FragmentBuilder::Not(None) => Err(ConditionError::MissingOperand("!".to_string())),
            FragmentBuilder::Comparison {
                comparator,
                left: Some(left),
                right: Some(right),
            } => Ok(Fragment::Comparison {
                comparator,
                left,
                right,
            }),
            FragmentBuilder::Comparison { comparator, .. } => {
                Err(ConditionError::MissingOperand(comparator.symbol().to_string()))
            }
            FragmentBuilder::Logical {
                op,
                left: Some(left),
                right: Some(right),
            } => Ok(Fragment::Logical {
                op,
                left: Box::new(left.build()?),
                right: Box::new(right.build()?),
            }),
            FragmentBuilder::Logical { op, .. } => {
                Err(ConditionError::MissingOperand(op.keyword().to_string()))
            }
        }
    }

    fn is_complete(&self) -> bool {
        match self {
            FragmentBuilder::Terminal(_) | FragmentBuilder::Parenthetical(_) => true,
            FragmentBuilder::Not(operand) => operand.as_ref().is_some_and(|o| o.is_complete()),
            FragmentBuilder::Comparison { left, right, .. } => left.is_some() && right.is_some(),
            FragmentBuilder::Logical { left, right, .. } => {
                left.is_some() && right.as_ref().is_some_and(|r| r.is_complete())
            }
        }
    }

    /// Binary operator that has not yet received its left-hand operand
    fn awaits_left(&self) -> bool {
        matches!(
            self,
            FragmentBuilder::Comparison { left: None, .. } | FragmentBuilder::Logical { left: None, .. }
        )
    }

    fn binds_tighter_than(&self, precedence: u8) -> bool {
        let own = match self {
            FragmentBuilder::Comparison { left: None, .. } => COMPARISON_PRECEDENCE,
            FragmentBuilder::Logical { op, left: None, .. } => op.precedence(),
            _ => return false,
        };
        own > precedence
    }

    fn describe(&self) -> String {
        match self {
            FragmentBuilder::Terminal(terminal) => terminal.to_string(),
            FragmentBuilder::Not(_) => "!".to_string(),
            FragmentBuilder::Parenthetical(condition) => condition.sentence().to_string(),
            FragmentBuilder::Comparison { comparator, .. } => comparator.symbol().to_string(),
            FragmentBuilder::Logical { op, .. } => op.keyword().to_string(),
        }
    }
}

impl LogicalOp {
    fn precedence(&self) -> u8 {
        match self {
            LogicalOp::And => AND_PRECEDENCE,
            LogicalOp::Or => OR_PRECEDENCE,
        }
    }
}
