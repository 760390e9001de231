//! Composable structural matchers.
//!
//! A [`ValueMatcher<T>`] is an immutable conjunction of rules over a subject
//! of type `T`. Rules are added builder-style and every builder method
//! returns a new matcher:
//!
//! - [`ValueMatcher::field`] projects a field with an accessor and checks it
//!   against a [`MatchRule`];
//! - [`ValueMatcher::narrow`] projects with an accessor returning `Option`
//!   (usually an `as_*` variant accessor) and fails when it yields `None`;
//! - [`ValueMatcher::matching`] runs a closure predicate;
//! - [`ValueMatcher::bind`] / [`ValueMatcher::bind_with`] record a named
//!   capture.
//!
//! Matching never mutates the subject. [`ValueMatcher::match_captures`]
//! returns the captures only when every rule succeeded; captures recorded by
//! a failed alternative or a failed nested matcher are discarded.

mod expression;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::expr::{Expression, Postfix, SwiftOperator};
use crate::types::SwiftType;

pub use expression::{
    binary, find_any, ident, nil_check, nil_compare, nil_literal, unary, PostfixMatcher,
};

// ── Captures ───────────────────────────────────────────────────────────

/// A value recorded by a `bind` rule.
#[derive(Clone, Debug, PartialEq)]
pub enum Captured {
    Expression(Expression),
    Postfix(Postfix),
    String(String),
    Type(SwiftType),
    Operator(SwiftOperator),
}

impl From<Expression> for Captured {
    fn from(value: Expression) -> Self {
        Captured::Expression(value)
    }
}

impl From<Postfix> for Captured {
    fn from(value: Postfix) -> Self {
        Captured::Postfix(value)
    }
}

impl From<String> for Captured {
    fn from(value: String) -> Self {
        Captured::String(value)
    }
}

impl From<SwiftType> for Captured {
    fn from(value: SwiftType) -> Self {
        Captured::Type(value)
    }
}

impl From<SwiftOperator> for Captured {
    fn from(value: SwiftOperator) -> Self {
        Captured::Operator(value)
    }
}

/// Named captures produced by a successful match.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Captures {
    values: FxHashMap<String, Captured>,
}

impl Captures {
    pub fn get(&self, name: &str) -> Option<&Captured> {
        self.values.get(name)
    }

    pub fn expression(&self, name: &str) -> Option<&Expression> {
        match self.values.get(name)? {
            Captured::Expression(exp) => Some(exp),
            _ => None,
        }
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            Captured::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, name: &str, value: Captured) {
        self.values.insert(name.to_string(), value);
    }

    fn merge(&mut self, other: Captures) {
        self.values.extend(other.values);
    }
}

// ── Match rules ────────────────────────────────────────────────────────

type Predicate<U> = Arc<dyn Fn(&U) -> bool + Send + Sync>;

/// How a projected value is checked.
pub enum MatchRule<U> {
    Any,
    Equals(U),
    Not(Box<MatchRule<U>>),
    AnyOf(Vec<MatchRule<U>>),
    Matcher(ValueMatcher<U>),
    Closure(Predicate<U>),
}

impl<U: PartialEq + 'static> MatchRule<U> {
    pub fn closure(predicate: impl Fn(&U) -> bool + Send + Sync + 'static) -> Self {
        MatchRule::Closure(Arc::new(predicate))
    }

    pub fn not(rule: impl Into<MatchRule<U>>) -> Self {
        MatchRule::Not(Box::new(rule.into()))
    }

    pub fn matches(&self, value: &U) -> bool {
        self.evaluate(value, &mut Captures::default())
    }

    /// Check `value`, merging nested captures into `captures` on success.
    fn evaluate(&self, value: &U, captures: &mut Captures) -> bool {
        match self {
            MatchRule::Any => true,
            MatchRule::Equals(expected) => value == expected,
            MatchRule::Not(rule) => !rule.matches(value),
            MatchRule::AnyOf(rules) => rules.iter().any(|rule| {
                let mut scratch = Captures::default();
                let matched = rule.evaluate(value, &mut scratch);
                if matched {
                    captures.merge(scratch);
                }
                matched
            }),
            MatchRule::Matcher(matcher) => match matcher.match_captures(value) {
                Some(found) => {
                    captures.merge(found);
                    true
                }
                None => false,
            },
            MatchRule::Closure(predicate) => predicate(value),
        }
    }
}

impl<U: Clone> Clone for MatchRule<U> {
    fn clone(&self) -> Self {
        match self {
            MatchRule::Any => MatchRule::Any,
            MatchRule::Equals(value) => MatchRule::Equals(value.clone()),
            MatchRule::Not(rule) => MatchRule::Not(rule.clone()),
            MatchRule::AnyOf(rules) => MatchRule::AnyOf(rules.clone()),
            MatchRule::Matcher(matcher) => MatchRule::Matcher(matcher.clone()),
            MatchRule::Closure(predicate) => MatchRule::Closure(Arc::clone(predicate)),
        }
    }
}

impl<U> From<ValueMatcher<U>> for MatchRule<U> {
    fn from(matcher: ValueMatcher<U>) -> Self {
        MatchRule::Matcher(matcher)
    }
}

impl From<&str> for MatchRule<String> {
    fn from(value: &str) -> Self {
        MatchRule::Equals(value.to_string())
    }
}

impl From<String> for MatchRule<String> {
    fn from(value: String) -> Self {
        MatchRule::Equals(value)
    }
}

impl From<Expression> for MatchRule<Expression> {
    fn from(value: Expression) -> Self {
        MatchRule::Equals(value)
    }
}

impl From<SwiftOperator> for MatchRule<SwiftOperator> {
    fn from(value: SwiftOperator) -> Self {
        MatchRule::Equals(value)
    }
}

impl From<SwiftType> for MatchRule<SwiftType> {
    fn from(value: SwiftType) -> Self {
        MatchRule::Equals(value)
    }
}

// ── Value matcher ──────────────────────────────────────────────────────

type Rule<T> = Arc<dyn Fn(&T, &mut Captures) -> bool + Send + Sync>;

pub struct ValueMatcher<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Clone for ValueMatcher<T> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<T> Default for ValueMatcher<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> fmt::Debug for ValueMatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueMatcher")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl<T: 'static> ValueMatcher<T> {
    /// A matcher with no rules; it matches every subject.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_rule(&self, rule: impl Fn(&T, &mut Captures) -> bool + Send + Sync + 'static) -> Self {
        let mut rules = self.rules.clone();
        rules.push(Arc::new(rule));
        Self { rules }
    }

    /// Project a field and check it against `rule`.
    pub fn field<U, F>(self, accessor: F, rule: impl Into<MatchRule<U>>) -> Self
    where
        U: PartialEq + 'static,
        F: Fn(&T) -> &U + Send + Sync + 'static,
        MatchRule<U>: Send + Sync,
    {
        let rule = rule.into();
        self.with_rule(move |subject, captures| rule.evaluate(accessor(subject), captures))
    }

    /// Narrow the subject with `accessor` and check the result against
    /// `rule`. Fails when the accessor yields `None`.
    pub fn narrow<U, F>(self, accessor: F, rule: impl Into<MatchRule<U>>) -> Self
    where
        U: PartialEq + 'static,
        F: Fn(&T) -> Option<&U> + Send + Sync + 'static,
        MatchRule<U>: Send + Sync,
    {
        let rule = rule.into();
        self.with_rule(move |subject, captures| match accessor(subject) {
            Some(value) => rule.evaluate(value, captures),
            None => false,
        })
    }

    pub fn matching(self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.with_rule(move |subject, _| predicate(subject))
    }

    /// Capture the whole subject under `name`.
    pub fn bind(self, name: &str) -> Self
    where
        T: Clone + Into<Captured>,
    {
        self.bind_with(name, |subject: &T| subject.clone().into())
    }

    /// Capture a projection of the subject under `name`.
    pub fn bind_with(
        self,
        name: &str,
        projection: impl Fn(&T) -> Captured + Send + Sync + 'static,
    ) -> Self {
        let name = name.to_string();
        self.with_rule(move |subject, captures| {
            captures.insert(&name, projection(subject));
            true
        })
    }

    pub fn matches(&self, subject: &T) -> bool {
        self.match_captures(subject).is_some()
    }

    /// Run every rule; captures are returned only if all of them succeeded.
    pub fn match_captures(&self, subject: &T) -> Option<Captures> {
        let mut captures = Captures::default();
        self.evaluate(subject, &mut captures).then_some(captures)
    }

    fn evaluate(&self, subject: &T, captures: &mut Captures) -> bool {
        self.rules.iter().all(|rule| rule(subject, captures))
    }
}
