//! Resolved type representation.
//!
//! Isolation payloads reference fully resolved types: the type naming a
//! global actor, the self type of an actor declaration, the type of an
//! isolated parameter. Only the shapes those payloads can take are modeled:
//!
//! - **Nominal types**: an actor or struct declaration applied to zero or
//!   more type arguments
//! - **Type parameters**: unbound generic parameters awaiting substitution
//! - **Error**: a placeholder produced by upstream recovery
//!
//! # Canonical equality
//!
//! Types here are already canonical: name resolution has replaced every
//! spelling with its [`DeclId`] and every alias has been expanded. Structural
//! equality of two [`Type`]s is therefore canonical type equality, and
//! [`are_types_equal`] is the oracle entry point the isolation equality rule
//! consults.

use std::fmt;
use std::sync::Arc;

use super::def::{DeclId, TyParamId};

/// A resolved type.
///
/// The `Arc` wrapper allows efficient cloning and sharing; types are
/// immutable once built and compared structurally.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Type {
    kind: Arc<TypeKind>,
}

/// The shape of a resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A nominal type: a declaration applied to type arguments.
    Nominal {
        /// The declaration this type names.
        decl: DeclId,
        /// Type arguments, empty for non-generic types.
        args: Vec<Type>,
    },
    /// An unbound generic type parameter.
    Param(TyParamId),
    /// An error type (upstream recovery placeholder).
    Error,
}

impl Type {
    /// Create a new type from a kind.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind: Arc::new(kind),
        }
    }

    /// Get the kind of this type.
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Create a non-generic nominal type.
    pub fn nominal(decl: DeclId) -> Self {
        Self::new(TypeKind::Nominal {
            decl,
            args: Vec::new(),
        })
    }

    /// Create a nominal type with type arguments.
    pub fn nominal_with_args(decl: DeclId, args: Vec<Type>) -> Self {
        Self::new(TypeKind::Nominal { decl, args })
    }

    /// Create a type parameter.
    pub fn param(id: TyParamId) -> Self {
        Self::new(TypeKind::Param(id))
    }

    /// Create an error type.
    pub fn error() -> Self {
        Self::new(TypeKind::Error)
    }

    /// The declaration this type names, if it is nominal.
    pub fn nominal_decl(&self) -> Option<DeclId> {
        match self.kind() {
            TypeKind::Nominal { decl, .. } => Some(*decl),
            _ => None,
        }
    }

    /// Check if this type mentions any unbound generic parameter.
    ///
    /// Used as the cheap pre-check before substitution: a type with no
    /// parameters is already concrete and substitution is a no-op.
    pub fn has_type_params(&self) -> bool {
        match self.kind() {
            TypeKind::Param(_) => true,
            TypeKind::Nominal { args, .. } => args.iter().any(|t| t.has_type_params()),
            TypeKind::Error => false,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.kind, f)
    }
}

/// Determine whether two types are canonically equal.
///
/// Types in this subsystem are canonical by construction, so this is
/// structural equality. Declared as a named function because it is the
/// equality oracle the isolation comparison delegates to.
pub fn are_types_equal(a: &Type, b: &Type) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_equality_is_structural() {
        let a = Type::nominal(DeclId::new(1));
        let b = Type::nominal(DeclId::new(1));
        let c = Type::nominal(DeclId::new(2));
        assert!(are_types_equal(&a, &b));
        assert!(!are_types_equal(&a, &c));
    }

    #[test]
    fn test_args_participate_in_equality() {
        let base = DeclId::new(4);
        let a = Type::nominal_with_args(base, vec![Type::nominal(DeclId::new(1))]);
        let b = Type::nominal_with_args(base, vec![Type::nominal(DeclId::new(1))]);
        let c = Type::nominal_with_args(base, vec![Type::nominal(DeclId::new(2))]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_has_type_params() {
        let concrete = Type::nominal(DeclId::new(0));
        assert!(!concrete.has_type_params());

        let param = Type::param(TyParamId::new(0));
        assert!(param.has_type_params());

        let nested = Type::nominal_with_args(
            DeclId::new(1),
            vec![Type::nominal_with_args(DeclId::new(2), vec![param])],
        );
        assert!(nested.has_type_params());

        assert!(!Type::error().has_type_params());
    }

    #[test]
    fn test_nominal_decl() {
        assert_eq!(
            Type::nominal(DeclId::new(9)).nominal_decl(),
            Some(DeclId::new(9))
        );
        assert_eq!(Type::param(TyParamId::new(0)).nominal_decl(), None);
    }
}
