use serde::{Deserialize, Serialize};

use crate::ast::{Name, NameKind};

/// A `use Foo\Bar [as Baz];` import.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UseImport {
    pub name: String,
    pub alias: Option<String>,
}

impl UseImport {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim_start_matches('\\').to_string(),
            alias: None,
        }
    }

    pub fn aliased(name: impl AsRef<str>, alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            ..Self::new(name)
        }
    }

    /// The local name this import introduces.
    pub fn local_name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.name.rsplit('\\').next().unwrap_or(&self.name),
        }
    }
}

/// Namespace and class imports in effect for a file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameContext {
    pub namespace: Option<String>,
    pub uses: Vec<UseImport>,
}

impl NameContext {
    pub fn new(namespace: Option<&str>) -> Self {
        Self {
            namespace: namespace
                .map(|ns| ns.trim_matches('\\').to_string())
                .filter(|ns| !ns.is_empty()),
            uses: Vec::new(),
        }
    }

    pub fn with_use(mut self, import: UseImport) -> Self {
        self.uses.push(import);
        self
    }

    /// Resolve a class name written as `text` (as it appears in source or a
    /// docblock) to its fully-qualified form, without a leading `\`.
    pub fn resolve_class_name(&self, text: &str) -> String {
        self.resolve(&Name::new(text))
    }

    /// Resolve a parsed [`Name`]. `self`/`static`/`parent` are returned
    /// unchanged; callers that know the current class handle them.
    pub fn resolve(&self, name: &Name) -> String {
        match name.kind {
            NameKind::FullyQualified => name.text.clone(),
            _ if name.is_special_class_name() => name.text.clone(),
            NameKind::Unqualified => match self.import_for(&name.text) {
                Some(import) => import.name.clone(),
                None => self.prefix_namespace(&name.text),
            },
            NameKind::Qualified => {
                let (first, rest) = name
                    .text
                    .split_once('\\')
                    .unwrap_or((name.text.as_str(), ""));
                if first.eq_ignore_ascii_case("namespace") {
                    return self.prefix_namespace(rest);
                }
                match self.import_for(first) {
                    Some(import) => format!("{}\\{}", import.name, rest),
                    None => self.prefix_namespace(&name.text),
                }
            }
        }
    }

    /// Fully-qualified name of a class-like declared in this file as `short`.
    /// Declarations only take the namespace; imports do not apply.
    pub fn qualify_declaration(&self, short: &str) -> String {
        self.prefix_namespace(short.trim_start_matches('\\'))
    }

    fn import_for(&self, local: &str) -> Option<&UseImport> {
        // Class aliases are case-insensitive in PHP.
        self.uses
            .iter()
            .find(|import| import.local_name().eq_ignore_ascii_case(local))
    }

    fn prefix_namespace(&self, text: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}\\{text}"),
            None => text.to_string(),
        }
    }
}
