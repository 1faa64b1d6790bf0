use serde::Serialize;

use larch_syntax::ast::{ClassLike, ClassLikeKind, SourceFile};
use larch_types::{Scope, TypeEnv};

use crate::Rule;

/// One method rewritten by one rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MethodChange {
    /// Fully-qualified name of the declaring class-like, if it has one.
    pub class: Option<String>,
    pub method: String,
    pub rule: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub changes: Vec<MethodChange>,
}

impl FileReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Applies rules to every method of a file, in rule order.
///
/// Each rule sees the output of the rules before it.
#[derive(Default)]
pub struct RuleRunner {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }

    /// Run all rules over `file`, returning the rewritten file and what
    /// changed. `file` itself is left untouched.
    pub fn run(&self, file: &SourceFile, env: &dyn TypeEnv) -> (SourceFile, FileReport) {
        let mut out = file.clone();
        let mut report = FileReport::default();

        for class_like in &mut out.class_likes {
            let class_name = class_like
                .name
                .as_deref()
                .map(|name| file.names.qualify_declaration(name));
            let mut scope = Scope::new(env, &file.names);
            // Trait methods run in whichever class uses the trait, which is
            // not known here.
            if let (Some(name), false) = (&class_name, class_like.kind == ClassLikeKind::Trait) {
                scope = scope.in_class(name);
            }

            let _span = tracing::debug_span!(
                target: "larch.rules",
                "class_like",
                class = class_name.as_deref().unwrap_or("<anonymous>")
            )
            .entered();

            for idx in 0..class_like.methods.len() {
                for rule in &self.rules {
                    let parent: &ClassLike = class_like;
                    let Some(updated) = rule.refactor(&parent.methods[idx], Some(parent), &scope)
                    else {
                        continue;
                    };
                    report.changes.push(MethodChange {
                        class: class_name.clone(),
                        method: updated.name.as_str().to_string(),
                        rule: rule.name(),
                    });
                    class_like.methods[idx] = updated;
                }
            }
        }

        tracing::debug!(
            target: "larch.rules",
            changes = report.changes.len(),
            "file processed"
        );
        (out, report)
    }
}
