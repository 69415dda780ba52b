//! Generic substitution over isolation payloads.
//!
//! When an isolation value crosses a generic instantiation boundary, type
//! parameters mentioned by its payload must be replaced with the concrete
//! types of the instantiation. Only two payloads can mention parameters: a
//! global actor type, and the type of an actor-instance owner.
//! [`IsolationValue::requires_substitution`] is the cheap pre-check that
//! lets the common, already-concrete case skip the work entirely.

use rustc_hash::FxHashMap;

use crate::hir::{Program, TyParamId, Type, TypeKind};
use crate::isolation::{IsolationValue, Payload};

/// A mapping from generic type parameters to the concrete types of one
/// instantiation.
#[derive(Debug, Clone, Default)]
pub struct SubstMap {
    map: FxHashMap<TyParamId, Type>,
}

impl SubstMap {
    /// Create an empty substitution map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `param` to `ty`, replacing any earlier mapping.
    pub fn insert(&mut self, param: TyParamId, ty: Type) {
        self.map.insert(param, ty);
    }

    /// The replacement for `param`, if one is mapped.
    pub fn get(&self, param: TyParamId) -> Option<&Type> {
        self.map.get(&param)
    }

    /// Whether the map carries no replacements.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Type {
    /// Replace every mapped type parameter in this type.
    ///
    /// Unmapped parameters are left in place, which keeps partial
    /// instantiation well defined.
    pub fn substitute(&self, subs: &SubstMap) -> Type {
        match self.kind() {
            TypeKind::Param(param) => subs.get(*param).cloned().unwrap_or_else(|| self.clone()),
            TypeKind::Nominal { decl, args } => {
                if args.iter().any(|t| t.has_type_params()) {
                    Type::nominal_with_args(
                        *decl,
                        args.iter().map(|t| t.substitute(subs)).collect(),
                    )
                } else {
                    self.clone()
                }
            }
            TypeKind::Error => self.clone(),
        }
    }
}

impl IsolationValue {
    /// Whether evaluating this isolation under an instantiation requires
    /// substitution at all.
    ///
    /// True only when the payload can mention an unbound generic
    /// parameter: a global actor type that depends on generics, or an
    /// actor-instance owner whose type does. Always false for the
    /// payload-free kinds and for values parsed from the textual form.
    pub fn requires_substitution(&self, program: &Program) -> bool {
        match &self.payload {
            Payload::GlobalActor {
                global_actor: Some(ty),
            } => ty.has_type_params(),
            Payload::ActorInstance {
                owner: Some(owner), ..
            } => owner
                .ty(program)
                .map(|ty| ty.has_type_params())
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Apply a substitution map to this isolation's payload.
    ///
    /// Only the global actor type is stored inside the value, so it is the
    /// only field rewritten; actor-instance owners are stable ids whose
    /// types live in the program tables and are substituted there by the
    /// instantiation machinery. Kind, flags, and parameter slot pass
    /// through unchanged, and the result equals `self` whenever
    /// [`requires_substitution`](Self::requires_substitution) is false.
    pub fn substitute(&self, program: &Program, subs: &SubstMap) -> IsolationValue {
        if !self.requires_substitution(program) {
            return self.clone();
        }
        match &self.payload {
            Payload::GlobalActor {
                global_actor: Some(ty),
            } => {
                let mut copy = self.clone();
                copy.payload = Payload::GlobalActor {
                    global_actor: Some(ty.substitute(subs)),
                };
                copy
            }
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::{DeclKind, Visibility};
    use crate::isolation::ActorOwner;

    fn program_with_generic_actor() -> (Program, crate::hir::DeclId, crate::hir::DeclId) {
        let mut p = Program::new();
        let module = p.add_decl("app", DeclKind::Module, None);
        // Scheduler<T>, a generic global actor.
        let scheduler = p.add_decl("Scheduler", DeclKind::Actor, Some(module));
        p.attrs_mut(scheduler).global_actor = true;
        p.set_self_type(
            scheduler,
            Type::nominal_with_args(scheduler, vec![Type::param(TyParamId::new(0))]),
        );
        let payload_ty = p.add_decl("Job", DeclKind::Struct, Some(module));
        (p, scheduler, payload_ty)
    }

    #[test]
    fn test_type_substitution_rewrites_params() {
        let (_, scheduler, job) = program_with_generic_actor();
        let open = Type::nominal_with_args(scheduler, vec![Type::param(TyParamId::new(0))]);
        let mut subs = SubstMap::new();
        subs.insert(TyParamId::new(0), Type::nominal(job));

        let closed = open.substitute(&subs);
        assert_eq!(
            closed,
            Type::nominal_with_args(scheduler, vec![Type::nominal(job)])
        );
        assert!(!closed.has_type_params());
    }

    #[test]
    fn test_unmapped_params_stay_open() {
        let open = Type::param(TyParamId::new(7));
        let subs = SubstMap::new();
        assert!(subs.is_empty());
        assert_eq!(open.substitute(&subs), open);
    }

    #[test]
    fn test_requires_substitution_global_actor() {
        let (p, scheduler, job) = program_with_generic_actor();
        let open = IsolationValue::for_global_actor(Type::nominal_with_args(
            scheduler,
            vec![Type::param(TyParamId::new(0))],
        ));
        let closed = IsolationValue::for_global_actor(Type::nominal_with_args(
            scheduler,
            vec![Type::nominal(job)],
        ));
        assert!(open.requires_substitution(&p));
        assert!(!closed.requires_substitution(&p));
    }

    #[test]
    fn test_requires_substitution_owner_types() {
        let (mut p, scheduler, _) = program_with_generic_actor();
        let module = p.add_decl("lib", DeclKind::Module, None);

        // A captured variable of generic actor type.
        let generic_var = p.add_var(
            "sched",
            Type::nominal_with_args(scheduler, vec![Type::param(TyParamId::new(0))]),
            false,
            Visibility::Module,
            module,
        );
        assert!(
            IsolationValue::for_actor_instance_capture(generic_var).requires_substitution(&p)
        );

        // A concrete actor owner.
        let plain = p.add_decl("Plain", DeclKind::Actor, Some(module));
        let value =
            IsolationValue::for_actor_instance_parameter(ActorOwner::Nominal(plain), 0);
        assert!(!value.requires_substitution(&p));

        // An isolated-parameter expression of generic type.
        let expr = p.add_expr(Type::param(TyParamId::new(1)));
        assert!(
            IsolationValue::for_actor_instance_parameter(ActorOwner::Expr(expr), 0)
                .requires_substitution(&p)
        );
    }

    #[test]
    fn test_payload_free_kinds_never_require_substitution() {
        let (p, _, _) = program_with_generic_actor();
        for value in [
            IsolationValue::for_unspecified(),
            IsolationValue::for_nonisolated(false),
            IsolationValue::for_nonisolated(true),
            IsolationValue::from_intermediate_keyword("global_actor").unwrap(),
            IsolationValue::from_intermediate_keyword("actor_instance").unwrap(),
        ] {
            assert!(!value.requires_substitution(&p));
        }
    }

    #[test]
    fn test_substitute_closes_global_actor() {
        let (p, scheduler, job) = program_with_generic_actor();
        let open = IsolationValue::for_global_actor(Type::nominal_with_args(
            scheduler,
            vec![Type::param(TyParamId::new(0))],
        ))
        .with_preconcurrency(true);

        let mut subs = SubstMap::new();
        subs.insert(TyParamId::new(0), Type::nominal(job));
        let closed = open.substitute(&p, &subs);

        assert_eq!(
            closed.global_actor(),
            Some(Type::nominal_with_args(scheduler, vec![Type::nominal(job)]))
        );
        // Flags pass through unchanged.
        assert!(closed.preconcurrency());
        assert!(!closed.requires_substitution(&p));
    }

    #[test]
    fn test_substitute_is_noop_when_not_required() {
        let (mut p, scheduler, job) = program_with_generic_actor();
        let module = p.add_decl("lib", DeclKind::Module, None);
        let concrete_var = p.add_var(
            "sched",
            Type::nominal(job),
            false,
            Visibility::Module,
            module,
        );
        let mut subs = SubstMap::new();
        subs.insert(TyParamId::new(0), Type::nominal(job));

        for value in [
            IsolationValue::for_unspecified(),
            IsolationValue::for_nonisolated(true),
            IsolationValue::for_global_actor(Type::nominal(scheduler)),
            IsolationValue::for_actor_instance_capture(concrete_var),
        ] {
            assert!(!value.requires_substitution(&p));
            assert_eq!(value.substitute(&p, &subs), value);
        }
    }
}
