use std::collections::HashMap;
use std::fmt;

use larch_syntax::ast::{ClassRef, Expr, Name};
use larch_syntax::NameContext;

use crate::{normalize_class_name, Type, TypeEnv};

/// Read-only typing context for one position in a file.
///
/// Passed explicitly to everything that needs to resolve names or types;
/// nothing here is global.
pub struct Scope<'env> {
    env: &'env dyn TypeEnv,
    names: &'env NameContext,
    class_name: Option<String>,
    locals: HashMap<String, Type>,
}

impl fmt::Debug for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("names", &self.names)
            .field("class_name", &self.class_name)
            .field("locals", &self.locals)
            .finish_non_exhaustive()
    }
}

impl<'env> Scope<'env> {
    pub fn new(env: &'env dyn TypeEnv, names: &'env NameContext) -> Self {
        Self {
            env,
            names,
            class_name: None,
            locals: HashMap::new(),
        }
    }

    /// Scope inside the class with the given fully-qualified name.
    pub fn in_class(mut self, class_name: impl AsRef<str>) -> Self {
        self.class_name = Some(normalize_class_name(class_name.as_ref()));
        self
    }

    /// Declare the type of a local variable (name without `$`).
    pub fn with_local(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.locals.insert(name.into(), ty);
        self
    }

    pub fn env(&self) -> &'env dyn TypeEnv {
        self.env
    }

    pub fn names(&self) -> &'env NameContext {
        self.names
    }

    /// Fully-qualified name of the class this scope is in, when known.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Resolve a class name, including `self` and `parent`. `static` resolves
    /// to the current class as well; callers that care about late static
    /// binding check [`Name::is_special_class_name`] first.
    pub fn resolve_class_name(&self, name: &Name) -> Option<String> {
        if !name.is_special_class_name() {
            return Some(self.names.resolve(name));
        }
        let current = self.class_name.as_deref()?;
        if name.text.eq_ignore_ascii_case("parent") {
            self.env.class(current)?.parent.clone()
        } else {
            Some(current.to_string())
        }
    }

    /// Apparent static type of `expr`.
    pub fn type_of(&self, expr: &Expr) -> Type {
        match expr {
            Expr::String(value) => Type::ConstantString(value.clone()),
            Expr::Int(_) => Type::Int,
            Expr::Variable(name) if name == "this" => self
                .class_name
                .as_deref()
                .map(Type::object)
                .unwrap_or(Type::Mixed),
            Expr::Variable(name) => self.locals.get(name).cloned().unwrap_or(Type::Mixed),
            Expr::ClassConstFetch { class, constant } if constant.eq_ignore_ascii_case("class") => {
                self.class_constant_type(class)
            }
            Expr::New {
                class: ClassRef::Name(name),
                ..
            } => self
                .resolve_class_name(name)
                .map(Type::Object)
                .unwrap_or(Type::Mixed),
            Expr::Assign { value, .. } => self.type_of(value),
            _ => Type::Mixed,
        }
    }

    fn class_constant_type(&self, class: &ClassRef) -> Type {
        match class {
            ClassRef::Name(name) if name.text.eq_ignore_ascii_case("static") => {
                match self.class_name.as_deref() {
                    Some(current) => Type::class_string_of(Type::Static(current.to_string())),
                    None => Type::ClassString(None),
                }
            }
            ClassRef::Name(name) => self
                .resolve_class_name(name)
                .map(Type::ConstantString)
                .unwrap_or(Type::Mixed),
            ClassRef::Expr(expr) => match self.type_of(expr) {
                Type::Object(class_name) | Type::GenericObject { class_name, .. } => {
                    Type::class_string_of(Type::Object(class_name))
                }
                Type::Static(class_name) => Type::class_string_of(Type::Static(class_name)),
                _ => Type::ClassString(None),
            },
        }
    }
}
