//! Rewrite rules for Larch.
//!
//! Today this crate exposes:
//! - Add Generic Return Type To Relations (`relations`): documents the
//!   related model class on Eloquent relation methods.
//! - A per-file runner applying rules to every method (`runner`).

mod definition;
mod relations;
mod runner;

use larch_syntax::ast::{ClassLike, ClassMethod};
use larch_types::Scope;

pub use definition::{CodeSample, RuleDefinition};
pub use relations::{
    resolve_related_class, AddGenericReturnTypeToRelations, RELATION_METHODS,
    RELATION_WITH_CHILD_METHODS,
};
pub use runner::{FileReport, MethodChange, RuleRunner};

/// A rewrite rule over class methods.
///
/// Rules are best-effort: unsupported input yields `None` ("no change"),
/// never an error. A rule never mutates its input; a change is returned as a
/// new node.
pub trait Rule: Send + Sync {
    /// Stable identifier used in reports and logs.
    fn name(&self) -> &'static str;

    fn definition(&self) -> RuleDefinition;

    /// Rewrite `method`, declared inside `parent` (if it has a class-like
    /// parent at all).
    fn refactor(
        &self,
        method: &ClassMethod,
        parent: Option<&ClassLike>,
        scope: &Scope<'_>,
    ) -> Option<ClassMethod>;
}
