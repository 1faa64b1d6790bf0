//! Mapping from syntax (native type hints, PHPDoc type nodes) to [`Type`].

use larch_syntax::ast::{Name, TypeHint};
use larch_syntax::{IdentifierTypeNode, TypeNode};

use crate::{Scope, Type};

#[derive(Debug)]
pub struct StaticTypeMapper<'a, 'env> {
    scope: &'a Scope<'env>,
}

impl<'a, 'env> StaticTypeMapper<'a, 'env> {
    pub fn new(scope: &'a Scope<'env>) -> Self {
        Self { scope }
    }

    /// Type of a native declaration such as a method's return type.
    pub fn map_type_hint(&self, hint: &TypeHint) -> Type {
        match hint {
            TypeHint::Name(name) => self.map_class_name(name),
            TypeHint::Builtin(keyword) => keyword_type(keyword)
                .or_else(|| self.self_like_type(keyword))
                .unwrap_or(Type::Mixed),
            TypeHint::Nullable(inner) => Type::Union(vec![self.map_type_hint(inner), Type::Null]),
            TypeHint::Union(hints) => {
                Type::Union(hints.iter().map(|h| self.map_type_hint(h)).collect())
            }
        }
    }

    /// Type described by a PHPDoc type expression.
    pub fn map_doc_type(&self, node: &TypeNode) -> Type {
        match node {
            TypeNode::Identifier(ident) => self.map_identifier(ident),
            TypeNode::Generic { base, args } => self.map_generic(base, args),
            TypeNode::Union(types) => {
                Type::Union(types.iter().map(|t| self.map_doc_type(t)).collect())
            }
            TypeNode::Nullable(inner) => Type::Union(vec![self.map_doc_type(inner), Type::Null]),
            TypeNode::Array(inner) => Type::Array(Box::new(self.map_doc_type(inner))),
            // Intersections are not modelled.
            TypeNode::Intersection(_) | TypeNode::Invalid(_) => Type::Mixed,
        }
    }

    fn map_identifier(&self, ident: &IdentifierTypeNode) -> Type {
        let name = ident.name.as_str();
        if !name.starts_with('\\') {
            if let Some(ty) = keyword_type(name).or_else(|| self.self_like_type(name)) {
                return ty;
            }
            if name.eq_ignore_ascii_case("class-string") {
                return Type::ClassString(None);
            }
        }
        self.map_class_name(&Name::new(name))
    }

    fn map_generic(&self, base: &IdentifierTypeNode, args: &[TypeNode]) -> Type {
        let base_name = base.name.to_ascii_lowercase();
        let mut mapped: Vec<Type> = args.iter().map(|a| self.map_doc_type(a)).collect();
        match base_name.as_str() {
            "class-string" if mapped.len() == 1 => Type::ClassString(mapped.pop().map(Box::new)),
            "array" | "list" | "iterable" | "non-empty-array" | "non-empty-list" => {
                Type::Array(Box::new(mapped.pop().unwrap_or(Type::Mixed)))
            }
            _ => match self.map_identifier(base) {
                Type::Object(class_name) => Type::GenericObject {
                    class_name,
                    types: mapped,
                },
                other => {
                    tracing::trace!(
                        target: "larch.types",
                        base = %base.name,
                        mapped = %other,
                        "generic base is not a class; type arguments dropped"
                    );
                    other
                }
            },
        }
    }

    fn map_class_name(&self, name: &Name) -> Type {
        if name.is_special_class_name() && name.text.eq_ignore_ascii_case("static") {
            return self.self_like_type("static").unwrap_or(Type::Mixed);
        }
        self.scope
            .resolve_class_name(name)
            .map(Type::Object)
            .unwrap_or(Type::Mixed)
    }

    /// `self`, `static` and `$this` relative to the current class.
    fn self_like_type(&self, keyword: &str) -> Option<Type> {
        let lower = keyword.to_ascii_lowercase();
        let current = self.scope.class_name();
        match lower.as_str() {
            "self" => Some(current.map(Type::object).unwrap_or(Type::Mixed)),
            "static" | "$this" => Some(
                current
                    .map(|c| Type::Static(c.to_string()))
                    .unwrap_or(Type::Mixed),
            ),
            _ => None,
        }
    }
}

fn keyword_type(keyword: &str) -> Option<Type> {
    let ty = match keyword.to_ascii_lowercase().as_str() {
        "int" | "integer" | "positive-int" | "negative-int" => Type::Int,
        "string" | "non-empty-string" => Type::String,
        "bool" | "boolean" | "true" | "false" => Type::Bool,
        "float" | "double" => Type::Float,
        "null" => Type::Null,
        "void" => Type::Void,
        "mixed" | "object" | "callable" => Type::Mixed,
        "array" | "list" | "iterable" => Type::Array(Box::new(Type::Mixed)),
        _ => return None,
    };
    Some(ty)
}
