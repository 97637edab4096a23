//! Hash-consed types of higher-order logic.
//!
//! Every constructor returns the canonical [`Arc<Type>`] for its value, so structurally equal
//! types built anywhere in the process share one allocation for as long as somebody holds them.

use std::{collections::HashMap, fmt, sync::Arc};

use indexmap::IndexSet;
use intern_pool::InterningPool;
use once_cell::sync::Lazy;

/// Name of the function type operator.
pub const FUN: &str = "->";
/// Name of the boolean type operator.
pub const BOOL: &str = "bool";

static POOL: Lazy<InterningPool<Type>> = Lazy::new(InterningPool::new);

/// A HOL type
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// Type variable
    Var(String),
    /// Type operator applied to its arguments
    Op { name: String, args: Vec<Arc<Type>> },
}

impl Type {
    pub fn var(name: impl Into<String>) -> Arc<Type> {
        POOL.intern(Type::Var(name.into()))
    }

    /// Applies `args` to the type operator `name`.
    ///
    /// The arguments are canonicalized too, so it does not matter where they were built.
    pub fn op(name: impl Into<String>, args: Vec<Arc<Type>>) -> Arc<Type> {
        let args = args.into_iter().map(|arg| POOL.intern_arc(arg)).collect();
        POOL.intern(Type::Op {
            name: name.into(),
            args,
        })
    }

    pub fn bool() -> Arc<Type> {
        Type::op(BOOL, vec![])
    }

    pub fn fun(domain: Arc<Type>, codomain: Arc<Type>) -> Arc<Type> {
        Type::op(FUN, vec![domain, codomain])
    }

    /// Type variables in order of first occurrence.
    pub fn type_vars(self: &Arc<Self>) -> IndexSet<Arc<Type>> {
        let mut vars = IndexSet::new();
        self.collect_type_vars(&mut vars);
        vars
    }

    fn collect_type_vars(self: &Arc<Self>, vars: &mut IndexSet<Arc<Type>>) {
        match &**self {
            Type::Var(_) => {
                vars.insert(Arc::clone(self));
            }
            Type::Op { args, .. } => {
                for arg in args {
                    arg.collect_type_vars(vars);
                }
            }
        }
    }

    /// Replaces type variables by name.
    ///
    /// Returns `self` when nothing was replaced.
    pub fn subst(self: &Arc<Self>, subst: &HashMap<String, Arc<Type>>) -> Arc<Type> {
        match &**self {
            Type::Var(name) => match subst.get(name) {
                Some(replacement) => POOL.intern_arc(Arc::clone(replacement)),
                None => Arc::clone(self),
            },
            Type::Op { name, args } => {
                let new_args: Vec<_> = args.iter().map(|arg| arg.subst(subst)).collect();
                if new_args.iter().zip(args).all(|(new, old)| Arc::ptr_eq(new, old)) {
                    Arc::clone(self)
                } else {
                    Type::op(name.clone(), new_args)
                }
            }
        }
    }

    pub fn is_fun(&self) -> bool {
        matches!(self, Type::Op { name, args } if name == FUN && args.len() == 2)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Var(name) => write!(f, "{name}"),
            Type::Op { name, args } if self.is_fun() => {
                write!(f, "({} {name} {})", args[0], args[1])
            }
            Type::Op { name, args } if args.is_empty() => write!(f, "{name}"),
            Type::Op { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}
