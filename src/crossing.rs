//! Isolation crossings at call boundaries.
//!
//! Every call site pairs the isolation of the calling context with the
//! isolation of the callee. The pair determines whether the call needs an
//! implicit hop between domains, and which side's isolation explains the
//! hazard when a diagnostic is emitted.

use crate::isolation::IsolationValue;

/// The source and target isolation of a single call site.
///
/// Immutable once constructed. Records the caller and callee isolation of
/// an apply expression, used for inserting implicit actor hops at
/// implicitly asynchronous calls and for diagnosing data races when
/// non-sendable values cross isolation domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyIsolationCrossing {
    caller_isolation: IsolationValue,
    callee_isolation: IsolationValue,
}

impl ApplyIsolationCrossing {
    /// Create a crossing from the caller's and callee's isolation.
    pub fn new(caller_isolation: IsolationValue, callee_isolation: IsolationValue) -> Self {
        Self {
            caller_isolation,
            callee_isolation,
        }
    }

    /// Whether this crossing exits isolation.
    ///
    /// True iff the callee is not actor-isolated: control is leaving
    /// whatever isolation domain currently holds, regardless of where the
    /// caller stands.
    pub fn exits_isolation(&self) -> bool {
        !self.callee_isolation.is_actor_isolated()
    }

    /// The isolation to use when diagnosing this crossing.
    ///
    /// The callee's isolation normally explains why a hop or check is
    /// needed. When the crossing exits isolation the callee carries no
    /// useful domain, so the caller's isolation is what explains the
    /// hazard instead.
    pub fn diagnose_isolation(&self) -> &IsolationValue {
        if self.exits_isolation() {
            &self.caller_isolation
        } else {
            &self.callee_isolation
        }
    }

    /// The caller's isolation.
    pub fn caller_isolation(&self) -> &IsolationValue {
        &self.caller_isolation
    }

    /// The callee's isolation.
    pub fn callee_isolation(&self) -> &IsolationValue {
        &self.callee_isolation
    }
}

impl Default for ApplyIsolationCrossing {
    /// Both sides unspecified: the state of a call site before the checker
    /// has attached any isolation facts.
    fn default() -> Self {
        Self::new(
            IsolationValue::for_unspecified(),
            IsolationValue::for_unspecified(),
        )
    }
}
