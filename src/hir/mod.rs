//! Program model the isolation machinery analyzes.
//!
//! The checker core operates over already-resolved declarations and types;
//! this module holds the minimal slice of that resolved program the
//! isolation oracles consult. Key pieces:
//!
//! - [`Program`] - declaration, variable, and expression tables plus the
//!   name interner
//! - [`Decl`] / [`Var`] - per-node facts: kind, lexical parent, the
//!   attributes the isolation predicates read
//! - [`Type`] - resolved types appearing in isolation payloads
//!
//! The tables own nothing beyond these facts. Bodies, statements, and the
//! rest of a real front end's output never reach this subsystem; isolation
//! values refer back into these tables by id only.

pub mod def;
pub mod ty;

pub use def::{DeclId, DeclKind, ExprId, TyParamId, VarId};
pub use ty::{are_types_equal, Type, TypeKind};

use rustc_hash::FxHashMap;
use string_interner::DefaultStringInterner;

/// Attributes on a declaration that the isolation predicates consult.
///
/// These are facts recorded by the front end; this subsystem only reads
/// them. Storing them here (rather than as flags on isolation values) keeps
/// a single source of truth for the well-known special domains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclAttrs {
    /// The type can be used as a global-actor domain.
    pub global_actor: bool,
    /// The declaration names the well-known main-actor domain.
    pub main: bool,
    /// The actor is a distributed actor.
    pub distributed: bool,
}

/// A declaration record.
#[derive(Debug, Clone)]
pub struct Decl {
    /// Interned declaration name.
    pub name: string_interner::DefaultSymbol,
    /// What kind of declaration this is.
    pub kind: DeclKind,
    /// Lexical parent, `None` for top-level declarations.
    pub parent: Option<DeclId>,
    /// Attribute facts read by the isolation predicates.
    pub attrs: DeclAttrs,
    /// For nominal declarations, the declared self type. Mentions the
    /// declaration's own generic parameters when it is generic.
    pub self_type: Option<Type>,
}

/// Visibility of a variable binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Visible from any module.
    Public,
    /// Visible only within the declaring module.
    Module,
}

/// A variable record.
#[derive(Debug, Clone)]
pub struct Var {
    /// Interned variable name.
    pub name: string_interner::DefaultSymbol,
    /// The variable's resolved type.
    pub ty: Type,
    /// Whether the binding is mutable.
    pub mutable: bool,
    /// Binding visibility.
    pub visibility: Visibility,
    /// The module the variable is declared in.
    pub module: DeclId,
}

/// Per-expression facts.
#[derive(Debug, Clone)]
pub struct ExprInfo {
    /// The expression's resolved type.
    pub ty: Type,
}

/// The resolved program slice the isolation machinery reads.
///
/// Built once by the front end before analysis starts; read-only while
/// analysis workers run. All lookups by id panic on a dangling id, which
/// can only be produced by mixing ids across `Program` instances.
#[derive(Debug, Default)]
pub struct Program {
    decls: FxHashMap<u32, Decl>,
    vars: FxHashMap<u32, Var>,
    exprs: FxHashMap<u32, ExprInfo>,
    interner: DefaultStringInterner,
    next_decl: u32,
    next_var: u32,
    next_expr: u32,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration and return its id.
    ///
    /// Nominal declarations get a non-generic self type automatically; use
    /// [`Program::set_self_type`] to install a generic one.
    pub fn add_decl(&mut self, name: &str, kind: DeclKind, parent: Option<DeclId>) -> DeclId {
        let id = DeclId::new(self.next_decl);
        self.next_decl += 1;
        let name = self.interner.get_or_intern(name);
        let self_type = match kind {
            DeclKind::Actor | DeclKind::Struct => Some(Type::nominal(id)),
            _ => None,
        };
        self.decls.insert(
            id.index(),
            Decl {
                name,
                kind,
                parent,
                attrs: DeclAttrs::default(),
                self_type,
            },
        );
        id
    }

    /// Replace a nominal declaration's self type.
    ///
    /// Used for generic nominals, whose self type mentions their own type
    /// parameters.
    pub fn set_self_type(&mut self, decl: DeclId, self_type: Type) {
        self.decl_mut(decl).self_type = Some(self_type);
    }

    /// Mutable access to a declaration's attributes.
    pub fn attrs_mut(&mut self, decl: DeclId) -> &mut DeclAttrs {
        &mut self.decl_mut(decl).attrs
    }

    /// Add a variable and return its id.
    pub fn add_var(
        &mut self,
        name: &str,
        ty: Type,
        mutable: bool,
        visibility: Visibility,
        module: DeclId,
    ) -> VarId {
        let id = VarId::new(self.next_var);
        self.next_var += 1;
        let name = self.interner.get_or_intern(name);
        self.vars.insert(
            id.index(),
            Var {
                name,
                ty,
                mutable,
                visibility,
                module,
            },
        );
        id
    }

    /// Add an expression and return its id.
    pub fn add_expr(&mut self, ty: Type) -> ExprId {
        let id = ExprId::new(self.next_expr);
        self.next_expr += 1;
        self.exprs.insert(id.index(), ExprInfo { ty });
        id
    }

    /// Look up a declaration.
    pub fn decl(&self, id: DeclId) -> &Decl {
        self.decls
            .get(&id.index())
            .unwrap_or_else(|| panic!("dangling declaration id {id}"))
    }

    fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        self.decls
            .get_mut(&id.index())
            .unwrap_or_else(|| panic!("dangling declaration id {id}"))
    }

    /// Look up a variable.
    pub fn var(&self, id: VarId) -> &Var {
        self.vars
            .get(&id.index())
            .unwrap_or_else(|| panic!("dangling variable id {id}"))
    }

    /// Look up an expression's type.
    pub fn expr_type(&self, id: ExprId) -> &Type {
        &self
            .exprs
            .get(&id.index())
            .unwrap_or_else(|| panic!("dangling expression id {id}"))
            .ty
    }

    /// Resolve a declaration's name.
    pub fn decl_name(&self, id: DeclId) -> &str {
        self.interner
            .resolve(self.decl(id).name)
            .expect("interned name")
    }

    /// Resolve a variable's name.
    pub fn var_name(&self, id: VarId) -> &str {
        self.interner
            .resolve(self.var(id).name)
            .expect("interned name")
    }

    /// Find the innermost actor declaration enclosing `decl`, including
    /// `decl` itself.
    pub fn enclosing_actor(&self, decl: DeclId) -> Option<DeclId> {
        let mut current = Some(decl);
        while let Some(id) = current {
            let d = self.decl(id);
            if d.kind == DeclKind::Actor {
                return Some(id);
            }
            current = d.parent;
        }
        None
    }

    /// Whether `ty` names the well-known main-actor domain.
    ///
    /// Consults the named declaration's attributes; the main actor is a
    /// global actor carrying the `main` attribute.
    pub fn is_main_actor_type(&self, ty: &Type) -> bool {
        match ty.nominal_decl() {
            Some(decl) => {
                let attrs = self.decl(decl).attrs;
                attrs.global_actor && attrs.main
            }
            None => false,
        }
    }

    /// Whether `decl` is a distributed actor declaration.
    pub fn is_distributed_actor(&self, decl: DeclId) -> bool {
        let d = self.decl(decl);
        d.kind == DeclKind::Actor && d.attrs.distributed
    }

    /// Determine whether the `let` can be read from anywhere within the
    /// given module, regardless of the isolation of the reading context.
    ///
    /// Mutable bindings are never accessible this way; immutable ones are
    /// when they are public or declared in `from_module` itself.
    pub fn is_let_accessible_anywhere(&self, from_module: DeclId, var: VarId) -> bool {
        let v = self.var(var);
        if v.mutable {
            return false;
        }
        v.visibility == Visibility::Public || v.module == from_module
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(p: &mut Program) -> DeclId {
        p.add_decl("main_module", DeclKind::Module, None)
    }

    #[test]
    fn test_enclosing_actor_walks_parents() {
        let mut p = Program::new();
        let m = module(&mut p);
        let actor = p.add_decl("Counter", DeclKind::Actor, Some(m));
        let f = p.add_decl("increment", DeclKind::Fn, Some(actor));
        assert_eq!(p.enclosing_actor(f), Some(actor));
        assert_eq!(p.enclosing_actor(actor), Some(actor));

        let free = p.add_decl("free_fn", DeclKind::Fn, Some(m));
        assert_eq!(p.enclosing_actor(free), None);
    }

    #[test]
    fn test_main_actor_type_requires_both_attrs() {
        let mut p = Program::new();
        let m = module(&mut p);
        let main_actor = p.add_decl("MainActor", DeclKind::Actor, Some(m));
        p.attrs_mut(main_actor).global_actor = true;
        p.attrs_mut(main_actor).main = true;

        let other = p.add_decl("UIActor", DeclKind::Actor, Some(m));
        p.attrs_mut(other).global_actor = true;

        assert!(p.is_main_actor_type(&Type::nominal(main_actor)));
        assert!(!p.is_main_actor_type(&Type::nominal(other)));
        assert!(!p.is_main_actor_type(&Type::param(TyParamId::new(0))));
    }

    #[test]
    fn test_distributed_actor_lookup() {
        let mut p = Program::new();
        let m = module(&mut p);
        let dist = p.add_decl("Worker", DeclKind::Actor, Some(m));
        p.attrs_mut(dist).distributed = true;
        let local = p.add_decl("Local", DeclKind::Actor, Some(m));
        // The attribute alone is not enough on a non-actor.
        let s = p.add_decl("Record", DeclKind::Struct, Some(m));
        p.attrs_mut(s).distributed = true;

        assert!(p.is_distributed_actor(dist));
        assert!(!p.is_distributed_actor(local));
        assert!(!p.is_distributed_actor(s));
    }

    #[test]
    fn test_let_accessibility() {
        let mut p = Program::new();
        let home = module(&mut p);
        let other = p.add_decl("other_module", DeclKind::Module, None);
        let ty = Type::nominal(p.add_decl("Config", DeclKind::Struct, Some(home)));

        let public_let = p.add_var("shared", ty.clone(), false, Visibility::Public, home);
        let private_let = p.add_var("local", ty.clone(), false, Visibility::Module, home);
        let public_var = p.add_var("counter", ty, true, Visibility::Public, home);

        assert!(p.is_let_accessible_anywhere(other, public_let));
        assert!(p.is_let_accessible_anywhere(home, private_let));
        assert!(!p.is_let_accessible_anywhere(other, private_let));
        assert!(!p.is_let_accessible_anywhere(home, public_var));
    }

    #[test]
    fn test_names_round_trip_through_interner() {
        let mut p = Program::new();
        let m = module(&mut p);
        let d = p.add_decl("Counter", DeclKind::Actor, Some(m));
        assert_eq!(p.decl_name(d), "Counter");
        let v = p.add_var("state", Type::nominal(d), true, Visibility::Module, m);
        assert_eq!(p.var_name(v), "state");
    }

    #[test]
    #[should_panic(expected = "dangling declaration id")]
    fn test_dangling_decl_id_panics() {
        let p = Program::new();
        p.decl(DeclId::new(42));
    }

    #[test]
    fn test_nominal_decls_get_self_type() {
        let mut p = Program::new();
        let a = p.add_decl("A", DeclKind::Actor, None);
        assert_eq!(p.decl(a).self_type, Some(Type::nominal(a)));

        let f = p.add_decl("f", DeclKind::Fn, Some(a));
        assert_eq!(p.decl(f).self_type, None);

        // Generic actors install their own self type.
        let g = p.add_decl("Box", DeclKind::Actor, None);
        let generic_self = Type::nominal_with_args(g, vec![Type::param(TyParamId::new(0))]);
        p.set_self_type(g, generic_self.clone());
        assert_eq!(p.decl(g).self_type, Some(generic_self));
    }
}
