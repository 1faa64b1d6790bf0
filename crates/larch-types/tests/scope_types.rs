use larch_syntax::ast::{ClassRef, Expr, Name};
use larch_syntax::NameContext;
use larch_test_utils::{app_names, laravel_store, relation_class, MODEL, RELATION};
use larch_types::{is_subclass_of, Scope, Type, TypeEnv};

use pretty_assertions::assert_eq;

#[test]
fn relation_hierarchy_is_transitive() {
    let store = laravel_store();

    assert!(is_subclass_of(&store, &relation_class("MorphTo"), RELATION));
    assert!(is_subclass_of(&store, &relation_class("HasMany"), RELATION));
    assert!(is_subclass_of(&store, RELATION, RELATION));
    assert!(is_subclass_of(&store, "\\app\\admin", MODEL));
    assert!(!is_subclass_of(&store, "App\\Plain", MODEL));
    assert!(!is_subclass_of(&store, "App\\Unknown", MODEL));
}

#[test]
fn store_lookup_is_case_insensitive() {
    let store = laravel_store();
    let def = store.class("\\APP\\USER").expect("App\\User is known");
    assert_eq!(def.name, "App\\User");
}

#[test]
fn class_constants_resolve_to_constant_strings() {
    let store = laravel_store();
    let names = app_names();
    let scope = Scope::new(&store, &names).in_class("App\\User");

    assert_eq!(
        scope.type_of(&Expr::class_const("Account")),
        Type::ConstantString("App\\Account".into())
    );
    assert_eq!(
        scope.type_of(&Expr::class_const("\\Vendor\\Thing")),
        Type::ConstantString("Vendor\\Thing".into())
    );
    assert_eq!(
        scope.type_of(&Expr::class_const("self")),
        Type::ConstantString("App\\User".into())
    );
    assert_eq!(
        scope.type_of(&Expr::class_const("parent")),
        Type::ConstantString(MODEL.into())
    );
    assert_eq!(
        scope.type_of(&Expr::class_const("static")),
        Type::class_string_of(Type::Static("App\\User".into()))
    );
}

#[test]
fn class_constant_on_expression_is_a_class_string() {
    let store = laravel_store();
    let names = app_names();
    let scope = Scope::new(&store, &names)
        .in_class("App\\User")
        .with_local("account", Type::object("App\\Account"));

    let on_var = Expr::ClassConstFetch {
        class: ClassRef::Expr(Box::new(Expr::var("account"))),
        constant: "class".into(),
    };
    assert_eq!(
        scope.type_of(&on_var),
        Type::class_string_of(Type::object("App\\Account"))
    );

    let on_new = Expr::ClassConstFetch {
        class: ClassRef::Expr(Box::new(Expr::New {
            class: ClassRef::Name(Name::new("Account")),
            args: vec![],
        })),
        constant: "class".into(),
    };
    assert_eq!(
        scope.type_of(&on_new),
        Type::class_string_of(Type::object("App\\Account"))
    );

    let on_unknown = Expr::ClassConstFetch {
        class: ClassRef::Expr(Box::new(Expr::var("mystery"))),
        constant: "class".into(),
    };
    assert_eq!(scope.type_of(&on_unknown), Type::ClassString(None));
}

#[test]
fn strings_variables_and_this() {
    let store = laravel_store();
    let names = NameContext::default();
    let scope = Scope::new(&store, &names).in_class("App\\User");

    assert_eq!(
        scope.type_of(&Expr::string("App\\Account")),
        Type::ConstantString("App\\Account".into())
    );
    assert_eq!(scope.type_of(&Expr::this()), Type::object("App\\User"));
    assert_eq!(scope.type_of(&Expr::var("unknown")), Type::Mixed);
    assert_eq!(
        scope.type_of(&Expr::this_call("related", vec![])),
        Type::Mixed
    );
}

#[test]
fn self_outside_a_class_is_unknown() {
    let store = laravel_store();
    let names = NameContext::default();
    let scope = Scope::new(&store, &names);

    assert_eq!(scope.class_name(), None);
    assert_eq!(scope.type_of(&Expr::class_const("self")), Type::Mixed);
    assert_eq!(
        scope.type_of(&Expr::class_const("static")),
        Type::ClassString(None)
    );
    assert_eq!(scope.type_of(&Expr::this()), Type::Mixed);
}
