//! Static types for Larch rules.
//!
//! This is not a PHP type checker. It models the handful of type shapes the
//! rules ask about (objects, generic objects, constant and class strings) and
//! answers "what is the apparent type of this expression" for the expression
//! forms that can carry a class name.

use std::fmt;

use serde::{Deserialize, Serialize};

mod comparator;
mod env;
mod mapper;
mod scope;

pub use comparator::{are_types_equal, class_names_equal};
pub use env::{is_subclass_of, ClassDef, ClassKind, TypeEnv, TypeStore};
pub use mapper::StaticTypeMapper;
pub use scope::Scope;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// An instance of a named class.
    Object(String),
    GenericObject {
        class_name: String,
        types: Vec<Type>,
    },
    /// A string whose only possible value is known.
    ConstantString(String),
    /// `class-string` or `class-string<T>`.
    ClassString(Option<Box<Type>>),
    /// `static` resolved against the given class; late static binding means
    /// the concrete class is not known.
    Static(String),
    String,
    Int,
    Float,
    Bool,
    Null,
    Void,
    Array(Box<Type>),
    Union(Vec<Type>),
    Mixed,
}

impl Type {
    pub fn object(class_name: impl AsRef<str>) -> Self {
        Type::Object(normalize_class_name(class_name.as_ref()))
    }

    pub fn generic_object(class_name: impl AsRef<str>, types: Vec<Type>) -> Self {
        Type::GenericObject {
            class_name: normalize_class_name(class_name.as_ref()),
            types,
        }
    }

    pub fn class_string_of(ty: Type) -> Self {
        Type::ClassString(Some(Box::new(ty)))
    }

    /// Class name of an object or generic object type.
    pub fn object_class_name(&self) -> Option<&str> {
        match self {
            Type::Object(name) | Type::GenericObject {
                class_name: name, ..
            } => Some(name),
            _ => None,
        }
    }

    /// A generic object with its type arguments dropped; any other type is
    /// returned unchanged.
    pub fn without_generics(&self) -> Type {
        match self {
            Type::GenericObject { class_name, .. } => Type::Object(class_name.clone()),
            other => other.clone(),
        }
    }
}

/// Class names are stored without a leading `\`.
pub fn normalize_class_name(name: &str) -> String {
    name.trim_start_matches('\\').to_string()
}

fn write_list(f: &mut fmt::Formatter<'_>, types: &[Type], sep: &str) -> fmt::Result {
    for (idx, ty) in types.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Object(name) => f.write_str(name),
            Type::GenericObject { class_name, types } => {
                write!(f, "{class_name}<")?;
                write_list(f, types, ", ")?;
                f.write_str(">")
            }
            Type::ConstantString(value) => write!(f, "'{value}'"),
            Type::ClassString(None) => f.write_str("class-string"),
            Type::ClassString(Some(inner)) => write!(f, "class-string<{inner}>"),
            Type::Static(class) => write!(f, "static({class})"),
            Type::String => f.write_str("string"),
            Type::Int => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::Bool => f.write_str("bool"),
            Type::Null => f.write_str("null"),
            Type::Void => f.write_str("void"),
            Type::Array(inner) => write!(f, "array<{inner}>"),
            Type::Union(types) => write_list(f, types, "|"),
            Type::Mixed => f.write_str("mixed"),
        }
    }
}
