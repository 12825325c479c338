//! Atomic condition

use crate::condition::comparator::Comparator;
use crate::condition::context::EvaluationContext;
use crate::condition::operator::ComparisonOperator;
use crate::condition::value::ConditionValue;
use crate::error::{FieldsError, Result};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Capability of a condition type: resolve the actual value from the context
pub trait ConditionKind: Send + Sync {
    fn actual_value(&self, ctx: &dyn EvaluationContext) -> ConditionValue;
}

/// Comparator lists are short; four covers every built-in type
pub type ComparatorList = SmallVec<[Comparator; 4]>;

/// A named predicate with an operator and an expected value
#[derive(Clone)]
pub struct Condition {
    condition_type: String,
    comparators: ComparatorList,
    /// Index into `comparators` of the comparator bound to `operator`
    bound: usize,
    operator: ComparisonOperator,
    value: ConditionValue,
    kind: Arc<dyn ConditionKind>,
}

impl Condition {
    /// Create a condition with an ordered comparator list
    ///
    /// The operator starts as `=` when any comparator accepts it, otherwise
    /// as the first operator of the first comparator. A type without
    /// comparators accepts no operator and is rejected.
    pub fn new<K>(
        condition_type: impl Into<String>,
        comparators: impl IntoIterator<Item = Comparator>,
        kind: K,
    ) -> Result<Self>
    where
        K: ConditionKind + 'static,
    {
        let condition_type = condition_type.into();
        let comparators: ComparatorList = comparators.into_iter().collect();
        let (bound, operator) = match comparators
            .iter()
            .position(|c| c.accepts(ComparisonOperator::Equal))
        {
            Some(position) => (position, ComparisonOperator::Equal),
            None => match comparators.first() {
                Some(first) => (0, first.operators()[0]),
                None => {
                    return Err(FieldsError::MalformedCondition(format!(
                        "condition type {} has no comparators",
                        condition_type
                    )))
                }
            },
        };

        Ok(Self {
            condition_type,
            comparators,
            bound,
            operator,
            value: ConditionValue::Null,
            kind: Arc::new(kind),
        })
    }

    pub fn condition_type(&self) -> &str {
        &self.condition_type
    }

    pub fn comparison_operator(&self) -> ComparisonOperator {
        self.operator
    }

    pub fn value(&self) -> &ConditionValue {
        &self.value
    }

    pub fn comparators(&self) -> &[Comparator] {
        &self.comparators
    }

    /// The comparator currently bound to the operator
    pub fn comparator(&self) -> Comparator {
        self.comparators[self.bound]
    }

    /// Set the operator, rebinding to the first comparator that accepts it
    pub fn set_comparison_operator(&mut self, operator: ComparisonOperator) -> Result<()> {
        let position = self
            .comparators
            .iter()
            .position(|c| c.accepts(operator))
            .ok_or_else(|| FieldsError::UnsupportedOperator {
                operator: operator.to_string(),
                condition_type: self.condition_type.clone(),
            })?;

        self.operator = operator;
        self.bound = position;
        Ok(())
    }

    /// Parse and set an operator token such as `"NOT IN"`
    pub fn set_comparison_operator_str(&mut self, operator: &str) -> Result<()> {
        let parsed =
            ComparisonOperator::parse(operator).ok_or_else(|| FieldsError::UnsupportedOperator {
                operator: operator.to_string(),
                condition_type: self.condition_type.clone(),
            })?;
        self.set_comparison_operator(parsed)
    }

    pub fn set_value(&mut self, value: impl Into<ConditionValue>) {
        self.value = value.into();
    }

    /// Evaluate against the request context
    pub fn evaluate(&self, ctx: &dyn EvaluationContext) -> bool {
        let actual = self.kind.actual_value(ctx);
        self.comparator().compare(&self.value, &actual, self.operator)
    }
}

/// Conditions are equal when type, operator and value match
impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.condition_type == other.condition_type
            && self.operator == other.operator
            && self.value == other.value
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("type", &self.condition_type)
            .field("compare", &self.operator)
            .field("value", &self.value)
            .finish()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.condition_type, self.operator, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::context::RequestContext;
    use crate::condition::types::ContextFact;

    fn post_type_condition() -> Condition {
        Condition::new(
            "post_type",
            [Comparator::Equality, Comparator::Contain, Comparator::Custom],
            ContextFact::new("post_type"),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_to_equality() {
        let condition = post_type_condition();
        assert_eq!(condition.comparison_operator(), ComparisonOperator::Equal);
        assert_eq!(condition.comparator(), Comparator::Equality);
        assert!(condition.value().is_null());
    }

    #[test]
    fn test_binds_first_accepting_comparator() {
        let mut condition = post_type_condition();
        condition.set_comparison_operator(ComparisonOperator::In).unwrap();
        assert_eq!(condition.comparator(), Comparator::Contain);

        condition.set_comparison_operator(ComparisonOperator::NotEqual).unwrap();
        assert_eq!(condition.comparator(), Comparator::Equality);
    }

    #[test]
    fn test_rejects_unsupported_operator() {
        let mut condition = post_type_condition();
        let err = condition
            .set_comparison_operator(ComparisonOperator::Greater)
            .unwrap_err();
        assert_eq!(
            err,
            FieldsError::UnsupportedOperator {
                operator: ">".to_string(),
                condition_type: "post_type".to_string(),
            }
        );
        // Previous binding is kept
        assert_eq!(condition.comparison_operator(), ComparisonOperator::Equal);

        assert!(condition.set_comparison_operator_str("LIKE").is_err());
    }

    #[test]
    fn test_evaluate_against_context() {
        let ctx = RequestContext::new().with("post_type", "page");

        let mut condition = post_type_condition();
        condition.set_value("page");
        assert!(condition.evaluate(&ctx));

        condition.set_comparison_operator_str("!=").unwrap();
        assert!(!condition.evaluate(&ctx));

        condition.set_comparison_operator_str("NOT IN").unwrap();
        condition.set_value(vec!["post", "attachment"]);
        assert!(condition.evaluate(&ctx));
    }

    #[test]
    fn test_missing_fact_is_null() {
        let mut condition = post_type_condition();
        condition.set_value("page");
        assert!(!condition.evaluate(&RequestContext::new()));
    }

    #[test]
    fn test_equality_ignores_comparators() {
        let mut a = post_type_condition();
        let mut b =
            Condition::new("post_type", [Comparator::Contain], ContextFact::new("other")).unwrap();
        a.set_value("page");
        b.set_value("page");
        assert_eq!(a, b);

        b.set_comparison_operator(ComparisonOperator::In).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_condition_without_comparators_is_rejected() {
        let result = Condition::new("broken", Vec::<Comparator>::new(), ContextFact::new("broken"));
        assert!(matches!(result, Err(FieldsError::MalformedCondition(_))));
    }

    #[test]
    fn test_default_operator_without_equality() {
        let condition =
            Condition::new("post_level", [Comparator::Scalar], ContextFact::new("post_level"))
                .unwrap();
        assert_eq!(condition.comparison_operator(), ComparisonOperator::Greater);
        assert_eq!(condition.comparator(), Comparator::Scalar);
    }
}
