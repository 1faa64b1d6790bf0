use std::collections::HashMap;

use crate::normalize_class_name;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
}

/// What the type environment knows about a class-like.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    pub kind: ClassKind,
    pub parent: Option<String>,
    pub interfaces: Vec<String>,
}

impl ClassDef {
    pub fn class(name: &str) -> Self {
        Self {
            name: normalize_class_name(name),
            kind: ClassKind::Class,
            parent: None,
            interfaces: Vec::new(),
        }
    }

    pub fn interface(name: &str) -> Self {
        Self {
            kind: ClassKind::Interface,
            ..Self::class(name)
        }
    }

    pub fn extends(mut self, parent: &str) -> Self {
        self.parent = Some(normalize_class_name(parent));
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(normalize_class_name(interface));
        self
    }
}

/// Query interface over the classes known to the host.
///
/// In a real run this is backed by reflection over the analysed project. For
/// unit tests and fixtures [`TypeStore`] provides a small in-memory version.
pub trait TypeEnv {
    /// Look up a class-like by fully-qualified name (case-insensitive, with or
    /// without a leading `\`).
    fn class(&self, name: &str) -> Option<&ClassDef>;
}

/// Whether `class` is `ancestor` or (transitively) extends or implements it.
///
/// Unknown classes are never subclasses of anything but themselves.
pub fn is_subclass_of(env: &dyn TypeEnv, class: &str, ancestor: &str) -> bool {
    let ancestor = normalize_class_name(ancestor);
    let mut pending = vec![normalize_class_name(class)];
    let mut seen: Vec<String> = Vec::new();

    while let Some(current) = pending.pop() {
        if current.eq_ignore_ascii_case(&ancestor) {
            return true;
        }
        if seen.iter().any(|s| s.eq_ignore_ascii_case(&current)) {
            continue;
        }
        if let Some(def) = env.class(&current) {
            pending.extend(def.parent.iter().cloned());
            pending.extend(def.interfaces.iter().cloned());
        }
        seen.push(current);
    }
    false
}

/// In-memory [`TypeEnv`].
#[derive(Clone, Debug, Default)]
pub struct TypeStore {
    // Keyed by lowercased name: PHP class names are case-insensitive.
    classes: HashMap<String, ClassDef>,
}

impl TypeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, def: ClassDef) {
        self.classes.insert(def.name.to_ascii_lowercase(), def);
    }

    pub fn with_class(mut self, def: ClassDef) -> Self {
        self.add_class(def);
        self
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes
            .get(&normalize_class_name(name).to_ascii_lowercase())
    }
}
