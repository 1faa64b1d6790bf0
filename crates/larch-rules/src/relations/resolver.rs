use larch_syntax::ast::Expr;
use larch_types::{normalize_class_name, Scope, Type};

/// Related model class named by the first argument of a relation call.
///
/// Two argument shapes are understood: a constant string (`Account::class`,
/// `'App\Account'`) and a `class-string<T>` whose `T` is an object type
/// (`$account::class`, a variable typed as `class-string<Account>`).
/// Anything else cannot be pinned to one class and yields `None`.
pub fn resolve_related_class(arg: &Expr, scope: &Scope<'_>) -> Option<String> {
    match scope.type_of(arg) {
        Type::ConstantString(value) => Some(normalize_class_name(&value)),
        Type::ClassString(Some(inner)) => inner.object_class_name().map(normalize_class_name),
        _ => None,
    }
}
