//! Actor isolation values.
//!
//! An [`IsolationValue`] describes the concurrency domain a declaration or
//! lexical context belongs to: a specific actor instance, a global actor,
//! explicitly no actor, or nothing declared at all. The checker derives
//! every hop, access check, and synchronization decision from these values.
//!
//! # Variants
//!
//! | Kind | Payload | Meaning |
//! |------|---------|---------|
//! | `Unspecified` | none | nothing declared; unsafe from any domain |
//! | `ActorInstance` | owner + parameter slot | isolated to one actor instance |
//! | `Nonisolated` | none | usable from any domain, reads no isolated state |
//! | `NonisolatedUnsafe` | none | like `Nonisolated`, unenforced |
//! | `GlobalActor` | global actor type | isolated to a singleton actor |
//!
//! # Parameter slots
//!
//! `ActorInstance` records which value carries the isolating instance.
//! Slot 0 is the receiver of the operation itself; slot `k` (k >= 1) is
//! explicit parameter `k - 1`. Reserving slot 0 keeps the receiver encoding
//! unambiguous.
//!
//! # Textual round trips
//!
//! Values cross the lowered textual form of the program as one of six
//! keywords (see [`IsolationKind::from_keyword`]). The textual form records
//! only the kind, so a reparsed value carries no owner reference or global
//! actor type; such values answer `true` from
//! [`IsolationValue::parsed_from_intermediate_form`] and callers must
//! tolerate the absent payload.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::hir::{DeclId, ExprId, Program, Type, VarId};

/// The kind of actor isolation, without payload.
///
/// Exactly five kinds; the textual vocabulary has a sixth spelling,
/// `global_actor_unsafe`, kept as a parse-only alias for `GlobalActor` to
/// preserve the legacy intermediate form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsolationKind {
    /// No isolation declared. Assumed unsafe to touch from any domain
    /// without further checking.
    Unspecified,
    /// Isolated to the instance of an actor.
    ActorInstance,
    /// Explicitly not isolated to any actor; may not read isolated state.
    Nonisolated,
    /// Like `Nonisolated`, but isolation is not enforced by the checker.
    NonisolatedUnsafe,
    /// Isolated to a global (singleton) actor identified by its type.
    GlobalActor,
}

impl IsolationKind {
    /// Parse a textual keyword into a kind.
    ///
    /// Returns `None` for unrecognized keywords; an unknown spelling is a
    /// plain lookup failure, never an error.
    pub fn from_keyword(keyword: &str) -> Option<IsolationKind> {
        match keyword {
            "unspecified" => Some(IsolationKind::Unspecified),
            "actor_instance" => Some(IsolationKind::ActorInstance),
            "nonisolated" => Some(IsolationKind::Nonisolated),
            "nonisolated_unsafe" => Some(IsolationKind::NonisolatedUnsafe),
            "global_actor" => Some(IsolationKind::GlobalActor),
            // Legacy spelling; collapses to `global_actor` when printed.
            "global_actor_unsafe" => Some(IsolationKind::GlobalActor),
            _ => None,
        }
    }

    /// The canonical keyword for this kind.
    ///
    /// Total over the five kinds; the parse-only alias is never emitted.
    pub fn keyword(self) -> &'static str {
        match self {
            IsolationKind::Unspecified => "unspecified",
            IsolationKind::ActorInstance => "actor_instance",
            IsolationKind::Nonisolated => "nonisolated",
            IsolationKind::NonisolatedUnsafe => "nonisolated_unsafe",
            IsolationKind::GlobalActor => "global_actor",
        }
    }
}

impl fmt::Display for IsolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The reference identifying which actor instance isolates a value.
///
/// All three forms are non-owning ids into [`Program`] storage. The `Expr`
/// form is only legal where an expression, not a declared variable,
/// identifies the isolated instance (an ephemeral isolated parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorOwner {
    /// A named actor type declaration (isolation through `self`).
    Nominal(DeclId),
    /// A captured variable holding the actor instance.
    Captured(VarId),
    /// An expression producing the actor instance.
    Expr(ExprId),
}

impl ActorOwner {
    /// The resolved type of the owning instance, when the program records
    /// one. A nominal owner without a self type yields `None`.
    pub fn ty(&self, program: &Program) -> Option<Type> {
        match self {
            ActorOwner::Nominal(decl) => program.decl(*decl).self_type.clone(),
            ActorOwner::Captured(var) => Some(program.var(*var).ty.clone()),
            ActorOwner::Expr(expr) => Some(program.expr_type(*expr).clone()),
        }
    }
}

/// Per-variant payload. Only `ActorInstance` carries an owner and slot;
/// only `GlobalActor` carries a type. The `Option`s are `None` exactly for
/// values parsed from the textual intermediate form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Payload {
    Unspecified,
    ActorInstance {
        owner: Option<ActorOwner>,
        parameter_slot: u32,
    },
    Nonisolated,
    NonisolatedUnsafe,
    GlobalActor {
        global_actor: Option<Type>,
    },
}

/// The actor isolation of a declaration or lexical context.
///
/// Immutable once constructed; "modifying" a flag produces a new value
/// (see [`IsolationValue::with_preconcurrency`]). Values are cheap to clone
/// and hold only non-owning ids into program storage.
///
/// Two orthogonal flags apply to any kind:
///
/// - `preconcurrency`: the isolation was inferred under legacy, loosened
///   concurrency rules and diagnostics should treat it leniently. Part of
///   the equality rule.
/// - `parsed_from_intermediate_form`: the value came from a textual round
///   trip and carries no payload beyond the kind. Not part of the equality
///   rule, so reparsing a payload-free value yields an equal value.
#[derive(Debug, Clone)]
pub struct IsolationValue {
    pub(crate) payload: Payload,
    pub(crate) preconcurrency: bool,
    pub(crate) parsed_from_intermediate_form: bool,
}

impl IsolationValue {
    pub(crate) fn from_payload(payload: Payload) -> Self {
        Self {
            payload,
            preconcurrency: false,
            parsed_from_intermediate_form: false,
        }
    }

    /// The unspecified isolation.
    pub fn for_unspecified() -> Self {
        Self::from_payload(Payload::Unspecified)
    }

    /// Nonisolated, optionally with the unenforced (`unsafe`) spelling.
    pub fn for_nonisolated(unsafe_: bool) -> Self {
        Self::from_payload(if unsafe_ {
            Payload::NonisolatedUnsafe
        } else {
            Payload::Nonisolated
        })
    }

    /// Isolation to the global actor named by `global_actor`.
    pub fn for_global_actor(global_actor: Type) -> Self {
        Self::from_payload(Payload::GlobalActor {
            global_actor: Some(global_actor),
        })
    }

    /// Isolation of a declaration to the `self` instance of its enclosing
    /// actor, at the receiver slot.
    ///
    /// # Panics
    ///
    /// Panics when `decl` has no enclosing actor; asking for self-isolation
    /// outside an actor is a caller bug, not a recoverable state.
    pub fn for_actor_instance_self(program: &Program, decl: DeclId) -> Self {
        let actor = program.enclosing_actor(decl).unwrap_or_else(|| {
            panic!(
                "{} `{}` has no enclosing actor",
                program.decl(decl).kind.descr(),
                program.decl_name(decl)
            )
        });
        Self::from_payload(Payload::ActorInstance {
            owner: Some(ActorOwner::Nominal(actor)),
            parameter_slot: 0,
        })
    }

    /// Isolation to the actor instance carried by explicit parameter
    /// `index` (zero-based). Stored as slot `index + 1`; slot 0 is reserved
    /// for the receiver.
    pub fn for_actor_instance_parameter(owner: ActorOwner, index: u32) -> Self {
        Self::from_payload(Payload::ActorInstance {
            owner: Some(owner),
            parameter_slot: index + 1,
        })
    }

    /// Isolation to an actor instance captured by a closure.
    pub fn for_actor_instance_capture(captured: VarId) -> Self {
        Self::from_payload(Payload::ActorInstance {
            owner: Some(ActorOwner::Captured(captured)),
            parameter_slot: 0,
        })
    }

    /// Parse a value from its textual intermediate form.
    ///
    /// Returns `None` for unrecognized keywords. The textual form records
    /// only the kind, so the result carries no owner reference or global
    /// actor type and answers `true` from
    /// [`parsed_from_intermediate_form`](Self::parsed_from_intermediate_form).
    pub fn from_intermediate_keyword(keyword: &str) -> Option<Self> {
        let payload = match IsolationKind::from_keyword(keyword)? {
            IsolationKind::Unspecified => Payload::Unspecified,
            IsolationKind::ActorInstance => Payload::ActorInstance {
                owner: None,
                parameter_slot: 0,
            },
            IsolationKind::Nonisolated => Payload::Nonisolated,
            IsolationKind::NonisolatedUnsafe => Payload::NonisolatedUnsafe,
            IsolationKind::GlobalActor => Payload::GlobalActor { global_actor: None },
        };
        Some(Self {
            payload,
            preconcurrency: false,
            parsed_from_intermediate_form: true,
        })
    }

    /// The kind of this isolation.
    pub fn kind(&self) -> IsolationKind {
        match &self.payload {
            Payload::Unspecified => IsolationKind::Unspecified,
            Payload::ActorInstance { .. } => IsolationKind::ActorInstance,
            Payload::Nonisolated => IsolationKind::Nonisolated,
            Payload::NonisolatedUnsafe => IsolationKind::NonisolatedUnsafe,
            Payload::GlobalActor { .. } => IsolationKind::GlobalActor,
        }
    }

    /// Whether no isolation was declared.
    pub fn is_unspecified(&self) -> bool {
        self.kind() == IsolationKind::Unspecified
    }

    /// Whether the value is nonisolated, in either the enforced or the
    /// unenforced spelling.
    pub fn is_nonisolated(&self) -> bool {
        matches!(
            self.kind(),
            IsolationKind::Nonisolated | IsolationKind::NonisolatedUnsafe
        )
    }

    /// Whether the value is isolated to some actor domain: an actor
    /// instance or a global actor.
    pub fn is_actor_isolated(&self) -> bool {
        matches!(
            self.kind(),
            IsolationKind::ActorInstance | IsolationKind::GlobalActor
        )
    }

    /// Whether the value is isolated to a global actor.
    pub fn is_global_actor(&self) -> bool {
        self.kind() == IsolationKind::GlobalActor
    }

    /// The parameter slot carrying the isolating instance.
    ///
    /// Slot 0 is the receiver; slot `k` (k >= 1) is explicit parameter
    /// `k - 1` (callers subtract one to recover the zero-based index).
    ///
    /// # Panics
    ///
    /// Panics unless the kind is `ActorInstance`.
    pub fn actor_instance_parameter(&self) -> u32 {
        match &self.payload {
            Payload::ActorInstance { parameter_slot, .. } => *parameter_slot,
            _ => panic!(
                "actor_instance_parameter on `{}` isolation",
                self.kind().keyword()
            ),
        }
    }

    /// The owner reference identifying the isolating instance.
    ///
    /// `None` only for values parsed from the textual intermediate form.
    ///
    /// # Panics
    ///
    /// Panics unless the kind is `ActorInstance`.
    pub fn actor_owner(&self) -> Option<ActorOwner> {
        match &self.payload {
            Payload::ActorInstance { owner, .. } => *owner,
            _ => panic!("actor_owner on `{}` isolation", self.kind().keyword()),
        }
    }

    /// The named actor type declaration isolating this value, when the
    /// owner is nominal.
    ///
    /// # Panics
    ///
    /// Panics unless the kind is `ActorInstance`.
    pub fn actor(&self) -> Option<DeclId> {
        match self.actor_owner() {
            Some(ActorOwner::Nominal(decl)) => Some(decl),
            _ => None,
        }
    }

    /// The captured variable isolating this value, when the owner is a
    /// capture.
    ///
    /// # Panics
    ///
    /// Panics unless the kind is `ActorInstance`.
    pub fn actor_instance_var(&self) -> Option<VarId> {
        match self.actor_owner() {
            Some(ActorOwner::Captured(var)) => Some(var),
            _ => None,
        }
    }

    /// The expression isolating this value, when the owner is an
    /// expression.
    ///
    /// # Panics
    ///
    /// Panics unless the kind is `ActorInstance`.
    pub fn actor_instance_expr(&self) -> Option<ExprId> {
        match self.actor_owner() {
            Some(ActorOwner::Expr(expr)) => Some(expr),
            _ => None,
        }
    }

    /// The global actor type.
    ///
    /// `None` only for values parsed from the textual intermediate form,
    /// which records the keyword but not the type.
    ///
    /// # Panics
    ///
    /// Panics unless the kind is `GlobalActor`.
    pub fn global_actor(&self) -> Option<Type> {
        match &self.payload {
            Payload::GlobalActor { global_actor } => global_actor.clone(),
            _ => panic!("global_actor on `{}` isolation", self.kind().keyword()),
        }
    }

    /// Whether this isolation names the well-known main-actor domain.
    ///
    /// Delegates to the program's attribute facts rather than storing a
    /// redundant flag.
    pub fn is_main_actor(&self, program: &Program) -> bool {
        match &self.payload {
            Payload::GlobalActor {
                global_actor: Some(ty),
            } => program.is_main_actor_type(ty),
            _ => false,
        }
    }

    /// Whether this isolation binds to a distributed actor instance.
    pub fn is_distributed_actor(&self, program: &Program) -> bool {
        let owner = match &self.payload {
            Payload::ActorInstance {
                owner: Some(owner), ..
            } => *owner,
            _ => return false,
        };
        match owner {
            ActorOwner::Nominal(decl) => program.is_distributed_actor(decl),
            ActorOwner::Captured(_) | ActorOwner::Expr(_) => owner
                .ty(program)
                .and_then(|ty| ty.nominal_decl())
                .map(|decl| program.is_distributed_actor(decl))
                .unwrap_or(false),
        }
    }

    /// Whether this isolation was inferred under legacy concurrency rules
    /// and should be diagnosed leniently.
    pub fn preconcurrency(&self) -> bool {
        self.preconcurrency
    }

    /// A copy of this value with the preconcurrency flag set to `value`.
    pub fn with_preconcurrency(&self, value: bool) -> Self {
        let mut copy = self.clone();
        copy.preconcurrency = value;
        copy
    }

    /// Whether this value came from a textual round trip rather than fresh
    /// resolution. Such values carry no payload beyond the kind.
    pub fn parsed_from_intermediate_form(&self) -> bool {
        self.parsed_from_intermediate_form
    }
}

// Equality compares the variant tag, the owner identity and parameter slot
// for actor instances, the global actor type for global actors, and the
// preconcurrency flag. The parsed-from flag is excluded so that reparsing a
// payload-free value yields an equal value.
impl PartialEq for IsolationValue {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload && self.preconcurrency == other.preconcurrency
    }
}

impl Eq for IsolationValue {}

impl Hash for IsolationValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hashes exactly the fields equality compares.
        self.payload.hash(state);
        self.preconcurrency.hash(state);
    }
}

impl fmt::Display for IsolationValue {
    /// The minimal textual form: the canonical keyword, no payload.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind().keyword())
    }
}
