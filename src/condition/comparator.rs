//! Comparator set
//!
//! Each comparator implements one comparison semantic and declares which
//! operators it accepts. A condition binds to the first comparator in its
//! list that accepts the requested operator.

use crate::condition::operator::ComparisonOperator;
use crate::condition::value::ConditionValue;
use std::cmp::Ordering;

/// Comparison semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `actual == expected` (=, !=)
    Equality,
    /// Set intersection (=, !=, IN, NOT IN)
    Contain,
    /// Ordering (>, >=, <, <=)
    Scalar,
    /// Expected value is a predicate over the actual value (CUSTOM)
    Custom,
}

impl Comparator {
    pub fn operators(&self) -> &'static [ComparisonOperator] {
        use ComparisonOperator::*;

        match self {
            Comparator::Equality => &[Equal, NotEqual],
            Comparator::Contain => &[Equal, NotEqual, In, NotIn],
            Comparator::Scalar => &[Greater, GreaterEqual, Less, LessEqual],
            Comparator::Custom => &[Custom],
        }
    }

    #[inline]
    pub fn accepts(&self, operator: ComparisonOperator) -> bool {
        self.operators().contains(&operator)
    }

    /// Compare `actual` against `expected` with `operator`
    ///
    /// Returns false for operators this comparator does not accept.
    pub fn compare(
        &self,
        expected: &ConditionValue,
        actual: &ConditionValue,
        operator: ComparisonOperator,
    ) -> bool {
        if !self.accepts(operator) {
            return false;
        }

        match self {
            Comparator::Equality => compare_equality(expected, actual, operator),
            Comparator::Contain => compare_contain(expected, actual, operator),
            Comparator::Scalar => compare_scalar(expected, actual, operator),
            Comparator::Custom => compare_custom(expected, actual),
        }
    }
}

fn compare_equality(
    expected: &ConditionValue,
    actual: &ConditionValue,
    operator: ComparisonOperator,
) -> bool {
    let equal = actual.loose_eq(expected);
    if operator.is_negative() {
        !equal
    } else {
        equal
    }
}

fn compare_contain(
    expected: &ConditionValue,
    actual: &ConditionValue,
    operator: ComparisonOperator,
) -> bool {
    let candidates: &[ConditionValue] = match expected {
        ConditionValue::List(items) => items,
        scalar => std::slice::from_ref(scalar),
    };

    let intersects = actual
        .flatten()
        .into_iter()
        .any(|a| candidates.iter().any(|c| a.loose_eq(c)));

    if operator.is_negative() {
        !intersects
    } else {
        intersects
    }
}

fn compare_scalar(
    expected: &ConditionValue,
    actual: &ConditionValue,
    operator: ComparisonOperator,
) -> bool {
    let Some(ordering) = actual.loose_cmp(expected) else {
        return false;
    };

    match operator {
        ComparisonOperator::Greater => ordering == Ordering::Greater,
        ComparisonOperator::GreaterEqual => ordering != Ordering::Less,
        ComparisonOperator::Less => ordering == Ordering::Less,
        ComparisonOperator::LessEqual => ordering != Ordering::Greater,
        _ => false,
    }
}

fn compare_custom(expected: &ConditionValue, actual: &ConditionValue) -> bool {
    match expected.as_callback() {
        Some(callback) => callback.call(actual),
        None => {
            tracing::warn!(
                "CUSTOM comparison without a callable value ({}), treating as unfulfilled",
                expected
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComparisonOperator::*;

    fn v<T: Into<ConditionValue>>(value: T) -> ConditionValue {
        value.into()
    }

    #[test]
    fn test_equality() {
        let cmp = Comparator::Equality;
        assert!(cmp.compare(&v("page"), &v("page"), Equal));
        assert!(!cmp.compare(&v("page"), &v("post"), Equal));
        assert!(cmp.compare(&v("page"), &v("post"), NotEqual));
        assert!(cmp.compare(&v(1), &v("1"), Equal));
        assert!(!cmp.compare(&v(1), &v(1), In));
    }

    #[test]
    fn test_contain_scalar_actual() {
        let cmp = Comparator::Contain;
        let expected = v(vec![1, 2, 3]);
        assert!(cmp.compare(&expected, &v(2), In));
        assert!(!cmp.compare(&expected, &v(5), In));
        assert!(!cmp.compare(&expected, &v(2), NotIn));
        assert!(cmp.compare(&expected, &v(5), NotIn));
    }

    #[test]
    fn test_contain_list_actual() {
        let cmp = Comparator::Contain;
        let roles = v(vec!["editor", "author"]);
        assert!(cmp.compare(&v("editor"), &roles, Equal));
        assert!(cmp.compare(&v(vec!["administrator", "author"]), &roles, In));
        assert!(cmp.compare(&v("administrator"), &roles, NotEqual));
        assert!(!cmp.compare(&v("administrator"), &v(Vec::<i32>::new()), In));
        assert!(cmp.compare(&v("administrator"), &v(Vec::<i32>::new()), NotIn));
    }

    #[test]
    fn test_scalar() {
        let cmp = Comparator::Scalar;
        assert!(cmp.compare(&v(5), &v(10), Greater));
        assert!(cmp.compare(&v(5), &v(5), GreaterEqual));
        assert!(!cmp.compare(&v(5), &v(5), Less));
        assert!(cmp.compare(&v(5), &v(5), LessEqual));
        assert!(cmp.compare(&v("b"), &v("a"), Less));
        assert!(!cmp.compare(&v(5), &ConditionValue::Null, Less));
        assert!(!cmp.compare(&v(5), &v(10), Equal));
    }

    #[test]
    fn test_custom() {
        let cmp = Comparator::Custom;
        let expected = ConditionValue::callback(|actual| actual.as_str() == Some("page"));
        assert!(cmp.compare(&expected, &v("page"), Custom));
        assert!(!cmp.compare(&expected, &v("post"), Custom));
        assert!(!cmp.compare(&v("page"), &v("page"), Custom));
    }
}
