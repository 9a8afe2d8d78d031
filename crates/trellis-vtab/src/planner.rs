//! Index negotiation.
//!
//! The engine calls the planner one or more times while compiling a query,
//! handing it the candidate constraint list. The planner answers with a
//! plan tag, the argument slots it wants filled at execution time, and the
//! constant cost estimates. It is a pure function of its inputs and keeps no
//! state between invocations.

use trellis_common::constants::{ESTIMATED_SCAN_COST, ESTIMATED_SCAN_ROWS};
use trellis_common::error::{TrellisError, TrellisResult};

/// Constraint operators the host engine may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Equality.
    Eq,
    /// Greater than.
    Gt,
    /// Less than or equal.
    Le,
    /// Less than.
    Lt,
    /// Greater than or equal.
    Ge,
    /// MATCH operator.
    Match,
    /// LIKE operator.
    Like,
    /// GLOB operator.
    Glob,
    /// REGEXP operator.
    Regexp,
    /// Inequality.
    Ne,
    /// IS NOT identity operator.
    IsNot,
    /// IS NOT NULL.
    IsNotNull,
    /// IS NULL.
    IsNull,
    /// IS identity operator.
    Is,
}

impl ConstraintOp {
    /// The two identity operators are not supported as pushdown predicates
    /// and are skipped during negotiation.
    #[inline]
    #[must_use]
    pub const fn is_identity(self) -> bool {
        matches!(self, Self::Is | Self::IsNot)
    }
}

/// One candidate constraint offered by the engine.
#[derive(Debug, Clone, Copy)]
pub struct IndexConstraint {
    /// Schema column the constraint applies to.
    pub column: usize,
    /// Constraint operator.
    pub op: ConstraintOp,
    /// Whether the engine can actually supply the right-hand side.
    pub usable: bool,
}

impl IndexConstraint {
    /// Creates a usable constraint.
    #[must_use]
    pub fn usable(column: usize, op: ConstraintOp) -> Self {
        Self {
            column,
            op,
            usable: true,
        }
    }

    /// Creates an unusable constraint.
    #[must_use]
    pub fn unusable(column: usize, op: ConstraintOp) -> Self {
        Self {
            column,
            op,
            usable: false,
        }
    }
}

/// The scan mode a compiled query will run under, as negotiated with the
/// engine.
///
/// Wire encoding consumed by `filter`: `0` full scan, `1` value-equality
/// pushdown on the designated value column, `k + 2` exact-key pushdown on
/// column `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTag {
    /// No constraint selected; scan every key in native order.
    FullScan,
    /// Equality pushdown against the designated value column.
    ValueEquality,
    /// Exact-key pushdown keyed by the given column.
    KeyLookup {
        /// The key column the probe argument applies to.
        column: usize,
    },
}

impl PlanTag {
    /// Encodes the tag into its wire value.
    #[must_use]
    pub fn to_raw(self) -> i32 {
        match self {
            Self::FullScan => 0,
            Self::ValueEquality => 1,
            Self::KeyLookup { column } => column as i32 + 2,
        }
    }

    /// Decodes a wire value back into a tag.
    pub fn from_raw(raw: i32) -> TrellisResult<Self> {
        match raw {
            0 => Ok(Self::FullScan),
            1 => Ok(Self::ValueEquality),
            k if k >= 2 => Ok(Self::KeyLookup {
                column: (k - 2) as usize,
            }),
            _ => Err(TrellisError::InvalidPlanTag { raw }),
        }
    }
}

/// The planner's answer for one compilation attempt.
#[derive(Debug, Clone)]
pub struct IndexPlan {
    /// Selected scan mode.
    pub tag: PlanTag,
    /// `arguments[slot]` is the index of the constraint whose right-hand
    /// side must be supplied in that execution-time argument slot.
    pub arguments: Vec<usize>,
    /// Constant cost estimate; the store exposes no statistics.
    pub estimated_cost: f64,
    /// Constant row estimate.
    pub estimated_rows: u64,
}

impl IndexPlan {
    fn full_scan() -> Self {
        Self {
            tag: PlanTag::FullScan,
            arguments: Vec::new(),
            estimated_cost: ESTIMATED_SCAN_COST,
            estimated_rows: ESTIMATED_SCAN_ROWS,
        }
    }
}

/// Negotiates an index plan from the engine's candidate constraints.
///
/// `key_column` is the schema column holding the store's indexed key, when
/// the store has one. The first usable, non-identity constraint wins: a
/// constraint on the key column becomes an exact-key lookup, anything else
/// becomes a value-equality scan, and the winning constraint is bound to
/// argument slot 0. With no eligible constraint the plan is a full scan.
///
/// Cost and row estimates are constant regardless of plan; the store
/// exposes no statistics, so plans are deliberately not cost-differentiated.
#[must_use]
pub fn plan_index(key_column: Option<usize>, constraints: &[IndexConstraint]) -> IndexPlan {
    for (i, constraint) in constraints.iter().enumerate() {
        if !constraint.usable || constraint.op.is_identity() {
            continue;
        }
        let tag = match key_column {
            Some(key) if constraint.column == key => PlanTag::KeyLookup { column: key },
            _ => PlanTag::ValueEquality,
        };
        return IndexPlan {
            tag,
            arguments: vec![i],
            estimated_cost: ESTIMATED_SCAN_COST,
            estimated_rows: ESTIMATED_SCAN_ROWS,
        };
    }
    IndexPlan::full_scan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_constraint_yields_key_lookup() {
        let plan = plan_index(
            Some(0),
            &[IndexConstraint::usable(0, ConstraintOp::Eq)],
        );
        assert_eq!(plan.tag, PlanTag::KeyLookup { column: 0 });
        assert_eq!(plan.tag.to_raw(), 2);
        assert_eq!(plan.arguments, vec![0]);
        assert_eq!(plan.estimated_rows, ESTIMATED_SCAN_ROWS);
    }

    #[test]
    fn test_no_usable_constraint_yields_full_scan() {
        let plan = plan_index(Some(0), &[]);
        assert_eq!(plan.tag, PlanTag::FullScan);
        assert_eq!(plan.tag.to_raw(), 0);
        assert!(plan.arguments.is_empty());

        let plan = plan_index(
            Some(0),
            &[IndexConstraint::unusable(0, ConstraintOp::Eq)],
        );
        assert_eq!(plan.tag, PlanTag::FullScan);
    }

    #[test]
    fn test_identity_operators_are_skipped() {
        let plan = plan_index(
            Some(0),
            &[
                IndexConstraint::usable(0, ConstraintOp::Is),
                IndexConstraint::usable(0, ConstraintOp::IsNot),
            ],
        );
        assert_eq!(plan.tag, PlanTag::FullScan);

        // An eligible constraint behind identity ones still wins.
        let plan = plan_index(
            Some(0),
            &[
                IndexConstraint::usable(0, ConstraintOp::Is),
                IndexConstraint::usable(0, ConstraintOp::Eq),
            ],
        );
        assert_eq!(plan.tag, PlanTag::KeyLookup { column: 0 });
        assert_eq!(plan.arguments, vec![1]);
    }

    #[test]
    fn test_value_column_constraint_yields_value_scan() {
        let plan = plan_index(
            Some(0),
            &[IndexConstraint::usable(1, ConstraintOp::Eq)],
        );
        assert_eq!(plan.tag, PlanTag::ValueEquality);
        assert_eq!(plan.tag.to_raw(), 1);

        // Keyless store: every constraint is a value-equality candidate.
        let plan = plan_index(None, &[IndexConstraint::usable(0, ConstraintOp::Eq)]);
        assert_eq!(plan.tag, PlanTag::ValueEquality);
    }

    #[test]
    fn test_first_eligible_constraint_wins() {
        let plan = plan_index(
            Some(0),
            &[
                IndexConstraint::usable(2, ConstraintOp::Eq),
                IndexConstraint::usable(0, ConstraintOp::Eq),
            ],
        );
        assert_eq!(plan.tag, PlanTag::ValueEquality);
        assert_eq!(plan.arguments, vec![0]);
    }

    #[test]
    fn test_plan_tag_round_trip() {
        for tag in [
            PlanTag::FullScan,
            PlanTag::ValueEquality,
            PlanTag::KeyLookup { column: 0 },
            PlanTag::KeyLookup { column: 3 },
        ] {
            assert_eq!(PlanTag::from_raw(tag.to_raw()).unwrap(), tag);
        }
        assert!(PlanTag::from_raw(-1).is_err());
    }
}
