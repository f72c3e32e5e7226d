use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::TaxBracket;

/// Semantic problems in a bracket set.
///
/// Loading never rejects these on its own; callers decide whether a set
/// with issues is acceptable (see [`BracketSet::validate`]).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BracketIssue {
    #[error("no brackets defined")]
    Empty,

    #[error("bracket {index} has a non-finite rate or upper bound")]
    NonFiniteValue { index: usize },

    #[error("bracket {index} has a negative rate ({rate}%)")]
    NegativeRate { index: usize, rate: f64 },

    #[error("bracket {index} has a rate above 100% ({rate}%)")]
    RateAbovePercent { index: usize, rate: f64 },

    #[error("bracket {index} has a non-positive upper bound ({bound})")]
    NonPositiveBound { index: usize, bound: f64 },

    #[error("more than one bracket ends at {bound}")]
    DuplicateUpperBound { bound: f64 },

    #[error("{count} brackets have no upper bound; only the last one is ever applied")]
    MultipleOpenEnded { count: usize },

    #[error("no open-ended bracket; income above {top_bound} is never taxed")]
    MissingOpenEnded { top_bound: f64 },
}

/// Brackets ordered ascending by upper bound, open-ended brackets last.
///
/// The ordering is established once in [`BracketSet::new`] and the set is
/// immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BracketSet {
    brackets: Vec<TaxBracket>,
}

/// Bounded brackets ascend numerically; an unbounded bracket sorts after
/// every bounded one.
fn by_upper_bound(
    a: &TaxBracket,
    b: &TaxBracket,
) -> Ordering {
    match (a.upper_bound, b.upper_bound) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl BracketSet {
    /// Builds a set from brackets in any order. The sort is stable, so
    /// brackets with equal bounds keep their input order.
    pub fn new(mut brackets: Vec<TaxBracket>) -> Self {
        brackets.sort_by(by_upper_bound);
        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxBracket> {
        self.brackets.iter()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// True when the last bracket has no upper bound.
    pub fn is_open_ended(&self) -> bool {
        self.brackets.last().is_some_and(TaxBracket::is_open_ended)
    }

    /// Highest finite upper bound, if any bracket has one.
    pub fn top_bound(&self) -> Option<f64> {
        self.brackets.iter().rev().find_map(|b| b.upper_bound)
    }

    /// Reports every semantic issue found. An empty vector means the set is
    /// well formed.
    pub fn validate(&self) -> Vec<BracketIssue> {
        if self.brackets.is_empty() {
            return vec![BracketIssue::Empty];
        }

        let mut issues = Vec::new();

        for (index, bracket) in self.brackets.iter().enumerate() {
            let finite_bound = bracket.upper_bound.is_none_or(f64::is_finite);
            if !bracket.rate.is_finite() || !finite_bound {
                issues.push(BracketIssue::NonFiniteValue { index });
                continue;
            }
            if bracket.rate < 0.0 {
                issues.push(BracketIssue::NegativeRate {
                    index,
                    rate: bracket.rate,
                });
            } else if bracket.rate > 100.0 {
                issues.push(BracketIssue::RateAbovePercent {
                    index,
                    rate: bracket.rate,
                });
            }
            if let Some(bound) = bracket.upper_bound {
                if bound <= 0.0 {
                    issues.push(BracketIssue::NonPositiveBound { index, bound });
                }
            }
        }

        let bounds: Vec<f64> = self.brackets.iter().filter_map(|b| b.upper_bound).collect();
        for pair in bounds.windows(2) {
            if pair[0] == pair[1] {
                issues.push(BracketIssue::DuplicateUpperBound { bound: pair[0] });
            }
        }

        let open_ended = self.brackets.len() - bounds.len();
        match (open_ended, bounds.last()) {
            (0, Some(&top_bound)) => issues.push(BracketIssue::MissingOpenEnded { top_bound }),
            (count, _) if count > 1 => issues.push(BracketIssue::MultipleOpenEnded { count }),
            _ => {}
        }

        issues
    }
}

impl From<Vec<TaxBracket>> for BracketSet {
    fn from(brackets: Vec<TaxBracket>) -> Self {
        Self::new(brackets)
    }
}

impl<'a> IntoIterator for &'a BracketSet {
    type Item = &'a TaxBracket;
    type IntoIter = std::slice::Iter<'a, TaxBracket>;

    fn into_iter(self) -> Self::IntoIter {
        self.brackets.iter()
    }
}

impl fmt::Display for BracketSet {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut lower = 0.0;
        for bracket in &self.brackets {
            match bracket.upper_bound {
                Some(upper) => {
                    writeln!(f, "{:>6}%  {lower} - {upper}", bracket.rate)?;
                    lower = upper;
                }
                None => writeln!(f, "{:>6}%  {lower} and above", bracket.rate)?,
            }
        }
        Ok(())
    }
}
