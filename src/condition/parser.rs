//! Condition string parser

use crate::condition::ast::Fragment;
use crate::condition::builder::FragmentBuilder;
use crate::error::{ConditionError, Result};
use smallvec::SmallVec;
use tracing::debug;

/// Deepest parenthesis nesting a condition may use
pub const MAX_NESTING_DEPTH: usize = 64;

/// A parsed skip-logic condition
///
/// Holds the exact text it was parsed from (for a nested condition, the
/// text including its surrounding parentheses) and the root of its
/// expression tree. Conditions are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    sentence: String,
    root: Fragment,
}

impl Condition {
    /// Parse a condition string into an expression tree
    pub fn parse(sentence: &str) -> Result<Self> {
        let open = sentence.matches('(').count();
        let close = sentence.matches(')').count();
        if open != close {
            return Err(ConditionError::UnbalancedParentheses {
                sentence: sentence.to_string(),
                open,
                close,
            });
        }

        let (condition, _) = parse_level(sentence, 0, 0)?;
        debug!(condition = sentence, "parsed condition");
        Ok(condition)
    }

    #[inline]
    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    #[inline]
    pub fn root(&self) -> &Fragment {
        &self.root
    }

    /// Every prompt id referenced by this condition, in order of appearance
    pub fn prompt_ids(&self) -> SmallVec<[&str; 4]> {
        let mut ids = SmallVec::new();
        self.root.collect_prompt_ids(&mut ids);
        ids
    }
}

/// Parse one nesting level starting at byte offset `start`
///
/// Returns the condition and the byte offset just past the level. A nested
/// level (`depth > 0`) starts right after its `(` and ends at the matching
/// `)`; the top level runs to the end of the input.
fn parse_level(input: &str, start: usize, depth: usize) -> Result<(Condition, usize)> {
    let mut root: Option<FragmentBuilder> = None;
    let mut word_start: Option<usize> = None;
    let mut pos = start;

    while let Some(c) = input[pos..].chars().next() {
        match c {
            '(' => {
                flush_word(input, &mut word_start, pos, &mut root)?;
                if depth >= MAX_NESTING_DEPTH {
                    return Err(ConditionError::MalformedGrouping(format!(
                        "parentheses nested deeper than {} at offset {} in: {}",
                        MAX_NESTING_DEPTH, pos, input
                    )));
                }
                let (nested, end) = parse_level(input, pos + 1, depth + 1)?;
                push(&mut root, FragmentBuilder::Parenthetical(nested))?;
                pos = end;
                continue;
            }
            ')' => {
                flush_word(input, &mut word_start, pos, &mut root)?;
                if depth == 0 {
                    return Err(ConditionError::MalformedGrouping(format!(
                        "unexpected ')' at offset {} in: {}",
                        pos, input
                    )));
                }
                let end = pos + 1;
                // Include the opening parenthesis that started this level.
                let sentence = &input[start - 1..end];
                return Ok((finish(sentence, root)?, end));
            }
            ' ' | '\t' | '\r' | '\n' => {
                flush_word(input, &mut word_start, pos, &mut root)?;
            }
            _ => {
                if word_start.is_none() {
                    word_start = Some(pos);
                }
            }
        }
        pos += c.len_utf8();
    }

    flush_word(input, &mut word_start, pos, &mut root)?;
    if depth > 0 {
        return Err(ConditionError::MalformedGrouping(format!(
            "missing ')' for '(' at offset {} in: {}",
            start - 1,
            input
        )));
    }

    Ok((finish(&input[start..], root)?, pos))
}

fn flush_word(
    input: &str,
    word_start: &mut Option<usize>,
    end: usize,
    root: &mut Option<FragmentBuilder>,
) -> Result<()> {
    if let Some(begin) = word_start.take() {
        let builder = FragmentBuilder::parse_word(&input[begin..end])?;
        push(root, builder)?;
    }
    Ok(())
}

fn push(root: &mut Option<FragmentBuilder>, next: FragmentBuilder) -> Result<()> {
    let merged = match root.take() {
        Some(current) => current.merge(next)?,
        None => next,
    };
    *root = Some(merged);
    Ok(())
}

fn finish(sentence: &str, root: Option<FragmentBuilder>) -> Result<Condition> {
    let root = root
        .ok_or_else(|| ConditionError::EmptyExpression(sentence.to_string()))?
        .build()?;
    Ok(Condition {
        sentence: sentence.to_string(),
        root,
    })
}
