//! # Actor Isolation Checking Core
//!
//! The actor-isolation core of a concurrency-safety checker. Every
//! declaration and lexical context in a checked program belongs to a
//! concurrency domain: a specific actor instance, a global (singleton)
//! actor, explicitly no actor, or nothing declared at all. This crate
//! models that fact as a value, and derives from pairs of such values the
//! decisions the checker makes at every call boundary: which calls must
//! hop between domains, which accesses are safe, and which side of a call
//! to blame when diagnosing a crossing.
//!
//! ## Data Flow
//!
//! ```text
//! Program -> IsolationResolver -> IsolationValue
//!                                      |
//!                 +--------------------+--------------------+
//!                 v                    v                    v
//!          SubstMap::substitute  ApplyIsolationCrossing  keyword codec
//!          (generic boundaries)  (call boundaries)       (textual IR)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use actorck::{ApplyIsolationCrossing, IsolationValue};
//!
//! // A nonisolated callee exits isolation, so the caller's isolation is
//! // what explains the hazard.
//! let caller = IsolationValue::for_unspecified();
//! let callee = IsolationValue::for_nonisolated(false);
//! let crossing = ApplyIsolationCrossing::new(caller.clone(), callee);
//!
//! assert!(crossing.exits_isolation());
//! assert_eq!(crossing.diagnose_isolation(), &caller);
//! ```
//!
//! Values round-trip through the lowered textual form of the program as
//! keywords:
//!
//! ```rust
//! use actorck::IsolationValue;
//!
//! let value = IsolationValue::for_nonisolated(true);
//! let reparsed = IsolationValue::from_intermediate_keyword(&value.to_string()).unwrap();
//! assert_eq!(reparsed, value);
//! ```
//!
//! ## Module Overview
//!
//! - [`hir`] - the resolved program slice the isolation oracles consult
//! - [`isolation`] - the isolation value, its invariants, and the keyword
//!   codec
//! - [`crossing`] - caller/callee pairing at call boundaries
//! - [`subst`] - substitution of isolation payloads under generic
//!   instantiation
//! - [`resolve`] - the resolution protocol, its memoizing wrapper, and the
//!   same-domain check
//!
//! ## Concurrency
//!
//! Every operation here is a pure function over already-resolved data; the
//! one piece of shared mutable state is the
//! [`CachedResolver`](resolve::CachedResolver) cache, which guarantees at
//! most one isolation computation per declaration no matter how many
//! analysis workers ask.

pub mod crossing;
pub mod hir;
pub mod isolation;
pub mod resolve;
pub mod subst;

// Re-export commonly used types
pub use crossing::ApplyIsolationCrossing;
pub use hir::{are_types_equal, DeclId, DeclKind, ExprId, Program, TyParamId, Type, TypeKind, VarId};
pub use isolation::{ActorOwner, IsolationKind, IsolationValue};
pub use resolve::{
    is_same_actor_isolated, is_same_actor_isolated_in, CachedResolver, ClosureIsolationFn,
    IsolationResolver, LexicalContext,
};
pub use subst::SubstMap;
