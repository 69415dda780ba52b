//! Identifiers for program-tree nodes.
//!
//! The checker core never owns AST or type storage; it refers into tables
//! owned by the [`Program`](super::Program) through small copyable ids:
//!
//! - [`DeclId`] - a declaration (actor, function, binding, module)
//! - [`VarId`] - a variable, including captured variables
//! - [`ExprId`] - an expression (used when an expression, not a declared
//!   variable, identifies an isolated instance)
//! - [`TyParamId`] - a generic type parameter

use std::fmt;

/// A globally unique identifier for a declaration.
///
/// DeclIds are assigned sequentially by the [`Program`](super::Program)
/// builder and remain stable for the lifetime of the analysis pass. They
/// serve as keys in the declaration table and in the resolution cache.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId {
    /// Program-local index for this declaration.
    pub index: u32,
}

impl DeclId {
    /// Create a new DeclId with the given index.
    pub const fn new(index: u32) -> Self {
        Self { index }
    }

    /// The index of this declaration.
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.index)
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decl{}", self.index)
    }
}

/// A variable identifier.
///
/// Covers both ordinary bindings and variables captured by closures; the
/// distinction is recorded on the variable itself, not in the id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId {
    /// Program-local index for this variable.
    pub index: u32,
}

impl VarId {
    /// Create a new VarId with the given index.
    pub const fn new(index: u32) -> Self {
        Self { index }
    }

    /// The index of this variable.
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarId({})", self.index)
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "var{}", self.index)
    }
}

/// An expression identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId {
    /// Program-local index for this expression.
    pub index: u32,
}

impl ExprId {
    /// Create a new ExprId with the given index.
    pub const fn new(index: u32) -> Self {
        Self { index }
    }

    /// The index of this expression.
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.index)
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expr{}", self.index)
    }
}

/// A generic type parameter identifier.
///
/// Substitution maps are keyed by these ids; see
/// [`SubstMap`](crate::subst::SubstMap).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TyParamId {
    /// Index of the parameter within its generic parameter list.
    pub index: u32,
}

impl TyParamId {
    /// Create a new TyParamId with the given index.
    pub const fn new(index: u32) -> Self {
        Self { index }
    }

    /// The index of this parameter.
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for TyParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TyParamId({})", self.index)
    }
}

impl fmt::Display for TyParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.index)
    }
}

/// The kind of declaration.
///
/// Only the kinds the isolation oracles distinguish are modeled; anything
/// else a real front end produces is irrelevant to this subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    /// An actor type declaration.
    Actor,
    /// A non-actor nominal type declaration.
    Struct,
    /// A function or method.
    Fn,
    /// An immutable module-level binding.
    Let,
    /// A module.
    Module,
}

impl DeclKind {
    /// Returns the name of this kind for diagnostics.
    pub fn descr(&self) -> &'static str {
        match self {
            DeclKind::Actor => "actor",
            DeclKind::Struct => "struct",
            DeclKind::Fn => "function",
            DeclKind::Let => "binding",
            DeclKind::Module => "module",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decl_id_display() {
        let id = DeclId::new(3);
        assert_eq!(format!("{}", id), "decl3");
        assert_eq!(format!("{:?}", id), "DeclId(3)");
        assert_eq!(id.index(), 3);
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // Same index, different id spaces.
        let d = DeclId::new(0);
        let v = VarId::new(0);
        assert_eq!(d.index(), v.index());
        assert_eq!(format!("{}", v), "var0");
        assert_eq!(format!("{}", ExprId::new(7)), "expr7");
        assert_eq!(format!("{}", TyParamId::new(1)), "T1");
    }

    #[test]
    fn test_decl_kind_descr() {
        assert_eq!(DeclKind::Actor.descr(), "actor");
        assert_eq!(DeclKind::Fn.descr(), "function");
    }
}
