use serde::Serialize;

use crate::config::MatchingConfig;
use crate::report::{present, Operator};

/// How an operator was selected for a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Operator license equals the report's primary driver license.
    License,
    /// Operator name matches the policyholder name.
    Name,
    /// Nothing matched; the first listed operator stands in.
    FirstOperator,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::License => write!(f, "license"),
            Self::Name => write!(f, "name"),
            Self::FirstOperator => write!(f, "first_operator"),
        }
    }
}

/// Outcome of the operator fallback chain for one policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult<'a> {
    Found {
        operator: &'a Operator,
        index: usize,
        strategy: MatchStrategy,
    },
    NotFound,
}

impl<'a> MatchResult<'a> {
    pub fn operator(&self) -> Option<&'a Operator> {
        match self {
            Self::Found { operator, .. } => Some(operator),
            Self::NotFound => None,
        }
    }

    pub fn strategy(&self) -> Option<MatchStrategy> {
        match self {
            Self::Found { strategy, .. } => Some(*strategy),
            Self::NotFound => None,
        }
    }

    /// The operator, only when it was matched on license.
    pub fn license_matched(&self) -> Option<&'a Operator> {
        match self {
            Self::Found { operator, strategy: MatchStrategy::License, .. } => Some(operator),
            _ => None,
        }
    }
}

/// First operator whose trimmed license equals the trimmed target.
pub fn match_by_license<'a>(operators: &'a [Operator], license: &str) -> Option<&'a Operator> {
    position_by_license(operators, license).map(|i| &operators[i])
}

/// Operator whose name matches the policyholder name.
///
/// Exact case-insensitive equality wins. Otherwise the policyholder name is
/// split into lower-cased tokens (dropping the word "and" and stray
/// punctuation) and the first operator whose name contains every token is
/// taken, so "John and Jane Smith" finds "Smith, John & Jane".
pub fn match_by_name<'a>(operators: &'a [Operator], policyholder: &str) -> Option<&'a Operator> {
    position_by_name(operators, policyholder).map(|i| &operators[i])
}

/// Run the configured strategies in order; the first hit wins.
pub fn match_operator<'a>(
    operators: &'a [Operator],
    license: Option<&str>,
    policyholder: Option<&str>,
    config: &MatchingConfig,
) -> MatchResult<'a> {
    let mut chain: Vec<MatchStrategy> = vec![MatchStrategy::License];
    if config.name_fallback {
        chain.push(MatchStrategy::Name);
    }
    if config.first_operator_fallback {
        chain.push(MatchStrategy::FirstOperator);
    }

    chain
        .into_iter()
        .find_map(|strategy| {
            let index = match strategy {
                MatchStrategy::License => license.and_then(|l| position_by_license(operators, l)),
                MatchStrategy::Name => policyholder.and_then(|n| position_by_name(operators, n)),
                MatchStrategy::FirstOperator => (!operators.is_empty()).then_some(0),
            };
            if index.is_none() {
                tracing::trace!(%strategy, "operator strategy had no hit");
            }
            index.map(|index| MatchResult::Found {
                operator: &operators[index],
                index,
                strategy,
            })
        })
        .unwrap_or(MatchResult::NotFound)
}

fn position_by_license(operators: &[Operator], license: &str) -> Option<usize> {
    let target = license.trim();
    if target.is_empty() {
        return None;
    }
    operators
        .iter()
        .position(|op| present(&op.dln) == Some(target))
}

fn position_by_name(operators: &[Operator], policyholder: &str) -> Option<usize> {
    let wanted = policyholder.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    let exact = operators.iter().position(|op| {
        present(&op.operator_name).is_some_and(|name| name.to_lowercase() == wanted)
    });
    if exact.is_some() {
        return exact;
    }

    let tokens = name_tokens(&wanted);
    if tokens.is_empty() {
        return None;
    }
    operators.iter().position(|op| {
        present(&op.operator_name).is_some_and(|name| {
            let name = name.to_lowercase();
            tokens.iter().all(|t| name.contains(t.as_str()))
        })
    })
}

fn name_tokens(name: &str) -> Vec<String> {
    name.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|t| !t.is_empty() && t != "and")
        .collect()
}
