//! Shared fixtures for Larch tests.
//!
//! [`laravel_store`] knows the Eloquent base classes and a few application
//! models; [`user_model`] and [`relation_method`] build the ASTs the rule tests run
//! against.

use std::sync::Once;

use larch_syntax::ast::{ClassLike, ClassMethod, Expr, Stmt, TypeHint};
use larch_syntax::{NameContext, UseImport};
use larch_types::{ClassDef, TypeStore};

pub const MODEL: &str = "Illuminate\\Database\\Eloquent\\Model";
pub const RELATION: &str = "Illuminate\\Database\\Eloquent\\Relations\\Relation";
pub const RELATIONS_NS: &str = "Illuminate\\Database\\Eloquent\\Relations";

/// Relation classes in the shape Laravel ships them.
const RELATION_CLASSES: &[(&str, &str)] = &[
    ("HasOneOrMany", "Relation"),
    ("HasOne", "HasOneOrMany"),
    ("HasMany", "HasOneOrMany"),
    ("MorphOneOrMany", "HasOneOrMany"),
    ("MorphOne", "MorphOneOrMany"),
    ("MorphMany", "MorphOneOrMany"),
    ("BelongsTo", "Relation"),
    ("MorphTo", "BelongsTo"),
    ("BelongsToMany", "Relation"),
    ("MorphToMany", "BelongsToMany"),
    ("HasManyThrough", "Relation"),
    ("HasOneThrough", "HasManyThrough"),
];

pub fn relation_class(short: &str) -> String {
    format!("{RELATIONS_NS}\\{short}")
}

/// Type store with Eloquent's model and relation hierarchy plus
/// `App\User`, `App\Account` (models) and `App\Plain` (not a model).
pub fn laravel_store() -> TypeStore {
    let mut store = TypeStore::new()
        .with_class(ClassDef::class(MODEL))
        .with_class(ClassDef::class(RELATION))
        .with_class(ClassDef::class("App\\User").extends(MODEL))
        .with_class(ClassDef::class("App\\Account").extends(MODEL))
        .with_class(ClassDef::class("App\\Admin").extends("App\\User"))
        .with_class(ClassDef::class("App\\Plain"))
        .with_class(ClassDef::class("App\\Collection"));
    for (short, parent) in RELATION_CLASSES {
        store.add_class(ClassDef::class(&relation_class(short)).extends(&relation_class(parent)));
    }
    store
}

/// `namespace App;` with `Model`, `Account` and every relation class imported.
pub fn app_names() -> NameContext {
    let mut names = NameContext::new(Some("App"))
        .with_use(UseImport::new(MODEL))
        .with_use(UseImport::new("App\\Account"));
    for (short, _) in RELATION_CLASSES {
        names = names.with_use(UseImport::new(relation_class(short)));
    }
    names.with_use(UseImport::new(RELATION))
}

/// `public function {name}(): {ret} { return $this->{relation}({arg}); }`
pub fn relation_method(name: &str, ret: &str, relation: &str, arg: Expr) -> ClassMethod {
    ClassMethod::new(name)
        .with_return_type(TypeHint::name(ret))
        .with_body(vec![Stmt::Return(Some(Expr::this_call(
            relation,
            vec![arg],
        )))])
}

/// `class User extends Model { ...methods }`
pub fn user_model(methods: Vec<ClassMethod>) -> ClassLike {
    methods
        .into_iter()
        .fold(ClassLike::class("User").extending("Model"), |class, m| {
            class.with_method(m)
        })
}

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness' captured stdout.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("larch=trace"))
            .with_test_writer()
            .try_init();
    });
}
