//! The isolation resolution protocol.
//!
//! The rest of the checker obtains isolation facts through
//! [`IsolationResolver`]: one entry point for declarations, one for lexical
//! contexts. How isolation is inferred from annotations and inheritance is
//! the implementor's business; this module fixes the contract and supplies
//! the memoizing wrapper every caller is expected to go through.
//!
//! # Caching discipline
//!
//! [`CachedResolver`] guarantees at most one underlying computation per
//! declaration, visible to all callers. Concurrent requests for the same
//! declaration observe a single consistent result: recomputing could
//! observe the program tree mid-mutation by another pass, or simply waste
//! work. Closure resolutions routed through an override function are never
//! cached, so speculative analyses cannot publish results into shared
//! state.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::hir::{are_types_equal, DeclId, ExprId, Program};
use crate::isolation::{IsolationKind, IsolationValue};

/// A lexical context whose isolation can be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexicalContext {
    /// The context of a declaration's body.
    Decl(DeclId),
    /// A closure expression, possibly not yet attached to the program
    /// tree.
    Closure(ExprId),
}

/// Supplies isolation for closures that have not been attached to the
/// program tree yet, letting solver-style analyses resolve contexts
/// without mutating shared program state.
pub type ClosureIsolationFn<'a> = &'a dyn Fn(ExprId) -> IsolationValue;

/// Resolves the isolation of declarations and lexical contexts.
///
/// Implementations must be deterministic for a fixed program state. All
/// methods are synchronous, non-blocking computations over
/// already-resolved data.
pub trait IsolationResolver {
    /// Determine how the given declaration is isolated.
    fn resolve_decl(&self, program: &Program, decl: DeclId) -> IsolationValue;

    /// Determine how the given closure is isolated.
    ///
    /// The default treats closures the resolver knows nothing about as
    /// unspecified, the safe answer for not-yet-analyzed code.
    fn resolve_closure(&self, _program: &Program, _closure: ExprId) -> IsolationValue {
        IsolationValue::for_unspecified()
    }

    /// Determine how the given lexical context is isolated.
    ///
    /// `closure_isolation` overrides [`resolve_closure`](Self::resolve_closure)
    /// for closures not yet saved to the program tree.
    fn resolve_context(
        &self,
        program: &Program,
        context: LexicalContext,
        closure_isolation: Option<ClosureIsolationFn<'_>>,
    ) -> IsolationValue {
        match context {
            LexicalContext::Decl(decl) => self.resolve_decl(program, decl),
            LexicalContext::Closure(closure) => match closure_isolation {
                Some(resolve) => resolve(closure),
                None => self.resolve_closure(program, closure),
            },
        }
    }

    /// Whether the given function body's isolation must be tracked per
    /// control-flow path rather than as one fixed value.
    ///
    /// Relevant when an isolated parameter's availability depends on a
    /// conditionally-taken branch. The flow analysis itself lives in the
    /// checker; resolvers that do not track it answer `false`.
    fn uses_flow_sensitive_isolation(&self, _program: &Program, _function: DeclId) -> bool {
        false
    }
}

/// A memoizing wrapper around any [`IsolationResolver`].
///
/// Declaration resolutions are computed once and shared; the shard lock
/// held across the map's entry API makes concurrent first requests for the
/// same declaration single-flight. Context resolution inherits the trait
/// default and therefore hits the declaration cache for `Decl` contexts
/// while leaving override-driven closure resolutions uncached.
pub struct CachedResolver<R> {
    inner: R,
    cache: DashMap<DeclId, IsolationValue>,
    computations: AtomicUsize,
}

impl<R: IsolationResolver> CachedResolver<R> {
    /// Wrap a resolver with an empty cache.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
            computations: AtomicUsize::new(0),
        }
    }

    /// How many underlying declaration computations have run.
    ///
    /// After any number of requests, this reads exactly one per distinct
    /// declaration resolved.
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }

    /// The wrapped resolver.
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: IsolationResolver> IsolationResolver for CachedResolver<R> {
    fn resolve_decl(&self, program: &Program, decl: DeclId) -> IsolationValue {
        self.cache
            .entry(decl)
            .or_insert_with(|| {
                self.computations.fetch_add(1, Ordering::Relaxed);
                self.inner.resolve_decl(program, decl)
            })
            .clone()
    }

    fn resolve_closure(&self, program: &Program, closure: ExprId) -> IsolationValue {
        self.inner.resolve_closure(program, closure)
    }

    fn uses_flow_sensitive_isolation(&self, program: &Program, function: DeclId) -> bool {
        self.inner.uses_flow_sensitive_isolation(program, function)
    }
}

/// Check whether two isolation values bind to the same actor domain.
///
/// True iff both are actor-instance isolation with equal owner references,
/// or both are global-actor isolation with equal global actor types.
/// Non-isolated values are never "the same domain": they have no domain.
/// Payload-free values from the textual form have no owner or type to
/// compare and never match.
pub fn is_same_actor_isolated(a: &IsolationValue, b: &IsolationValue) -> bool {
    match (a.kind(), b.kind()) {
        (IsolationKind::ActorInstance, IsolationKind::ActorInstance) => {
            match (a.actor_owner(), b.actor_owner()) {
                (Some(owner_a), Some(owner_b)) => owner_a == owner_b,
                _ => false,
            }
        }
        (IsolationKind::GlobalActor, IsolationKind::GlobalActor) => {
            match (a.global_actor(), b.global_actor()) {
                (Some(ty_a), Some(ty_b)) => are_types_equal(&ty_a, &ty_b),
                _ => false,
            }
        }
        _ => false,
    }
}

/// Check whether a declaration and a lexical context are isolated to the
/// same actor, resolving both through `resolver`.
pub fn is_same_actor_isolated_in(
    resolver: &dyn IsolationResolver,
    program: &Program,
    decl: DeclId,
    context: LexicalContext,
) -> bool {
    let decl_isolation = resolver.resolve_decl(program, decl);
    let context_isolation = resolver.resolve_context(program, context, None);
    is_same_actor_isolated(&decl_isolation, &context_isolation)
}
