use pretty_assertions::assert_eq;

use crate::ast::{ClassRef, Expr, Name, NameKind, Stmt};
use crate::{
    find_first_method_call, find_first_return_scoped, parse_type, IdentifierTypeNode,
    NameContext, PhpDocChild, PhpDocNode, ReturnTagValue, TypeNode, TypeParseError, UseImport,
};

fn app_models() -> NameContext {
    NameContext::new(Some("App\\Models"))
        .with_use(UseImport::new("Illuminate\\Database\\Eloquent\\Relations\\HasMany"))
        .with_use(UseImport::aliased("App\\Billing\\Account", "BillingAccount"))
        .with_use(UseImport::new("Illuminate\\Database\\Eloquent"))
}

#[test]
fn name_kinds_follow_leading_backslash_and_separators() {
    assert_eq!(Name::new("\\App\\User").kind, NameKind::FullyQualified);
    assert_eq!(Name::new("\\App\\User").text, "App\\User");
    assert_eq!(Name::new("Relations\\HasMany").kind, NameKind::Qualified);
    assert_eq!(Name::new("User").kind, NameKind::Unqualified);
}

#[test]
fn resolves_names_through_imports_and_namespace() {
    let names = app_models();

    assert_eq!(
        names.resolve_class_name("HasMany"),
        "Illuminate\\Database\\Eloquent\\Relations\\HasMany"
    );
    assert_eq!(
        names.resolve_class_name("hasmany"),
        "Illuminate\\Database\\Eloquent\\Relations\\HasMany"
    );
    assert_eq!(
        names.resolve_class_name("BillingAccount"),
        "App\\Billing\\Account"
    );
    assert_eq!(names.resolve_class_name("Post"), "App\\Models\\Post");
    assert_eq!(
        names.resolve_class_name("Eloquent\\Model"),
        "Illuminate\\Database\\Eloquent\\Model"
    );
    assert_eq!(names.resolve_class_name("\\Post"), "Post");
    assert_eq!(names.resolve_class_name("self"), "self");
}

#[test]
fn global_namespace_leaves_names_alone() {
    let names = NameContext::default();
    assert_eq!(names.resolve_class_name("User"), "User");
    assert_eq!(names.resolve_class_name("Foo\\Bar"), "Foo\\Bar");
}

#[test]
fn first_return_skips_closures_and_enters_branches() {
    let body = vec![
        Stmt::Expression(Expr::Closure {
            body: vec![Stmt::Return(Some(Expr::string("inner")))],
        }),
        Stmt::If {
            cond: Expr::var("flag"),
            then_branch: vec![Stmt::Expression(Expr::Other)],
            else_branch: Some(vec![Stmt::Return(Some(Expr::string("outer")))]),
        },
        Stmt::Return(None),
    ];

    assert_eq!(
        find_first_return_scoped(&body),
        Some(Some(&Expr::string("outer")))
    );
    assert_eq!(find_first_return_scoped(&[]), None);
}

#[test]
fn first_method_call_is_the_outermost_of_a_chain() {
    let inner = Expr::this_call("hasMany", vec![Expr::class_const("Account")]);
    let chained = Expr::method_call(inner, "latest", vec![]);

    let found = find_first_method_call(&chained).expect("a method call");
    let Expr::MethodCall { name, .. } = found else {
        panic!("expected method call, got {found:?}");
    };
    assert_eq!(name.as_identifier(), Some("latest"));
}

#[test]
fn first_method_call_looks_inside_arguments() {
    let expr = Expr::FuncCall {
        name: Name::new("tap"),
        args: vec![crate::Arg::new(Expr::this_call("belongsTo", vec![]))],
    };
    assert!(matches!(
        find_first_method_call(&expr),
        Some(Expr::MethodCall { .. })
    ));
    assert_eq!(
        find_first_method_call(&Expr::ClassConstFetch {
            class: ClassRef::Name(Name::new("User")),
            constant: "class".into(),
        }),
        None
    );
}

#[test]
fn parses_generic_union_and_array_types() {
    assert_eq!(
        parse_type("HasMany<Account, User>").unwrap(),
        TypeNode::Generic {
            base: IdentifierTypeNode::new("HasMany"),
            args: vec![TypeNode::identifier("Account"), TypeNode::identifier("User")],
        }
    );
    assert_eq!(
        parse_type("?Foo|int[]").unwrap(),
        TypeNode::Union(vec![
            TypeNode::Nullable(Box::new(TypeNode::identifier("Foo"))),
            TypeNode::Array(Box::new(TypeNode::identifier("int"))),
        ])
    );
    assert_eq!(
        parse_type("class-string<\\App\\User>").unwrap().to_string(),
        "class-string<\\App\\User>"
    );
}

#[test]
fn type_parse_errors_are_reported() {
    assert_eq!(
        parse_type("HasMany<Account"),
        Err(TypeParseError::Expected {
            expected: '>',
            offset: 15
        })
    );
    assert!(matches!(
        parse_type("<>"),
        Err(TypeParseError::ExpectedType { offset: 0 })
    ));
    assert!(matches!(
        parse_type("Foo bar"),
        Err(TypeParseError::TrailingInput { .. })
    ));
}

#[test]
fn parses_return_tag_with_description() {
    let doc = PhpDocNode::parse(
        "/**\n * Accounts owned by the user.\n *\n * @return HasMany<Account> all of them\n * @deprecated use wallets()\n */",
    );

    assert_eq!(
        doc.children[0],
        PhpDocChild::Text("Accounts owned by the user.".into())
    );
    assert_eq!(doc.children[1], PhpDocChild::Text(String::new()));
    assert_eq!(
        doc.return_tag_value(),
        Some(&ReturnTagValue::new(
            parse_type("HasMany<Account>").unwrap(),
            "all of them"
        ))
    );
    assert_eq!(doc.tags().count(), 2);
}

#[test]
fn single_line_doc_round_trips() {
    let text = "/** @return HasMany<Account> */";
    assert_eq!(PhpDocNode::parse(text).to_string(), text);
}

#[test]
fn multi_line_doc_round_trips() {
    let text = "/**\n * Summary.\n *\n * @param int $x\n * @return Foo|null the foo\n */";
    assert_eq!(PhpDocNode::parse(text).to_string(), text);
}

#[test]
fn unreadable_return_type_is_kept_verbatim() {
    let doc = PhpDocNode::parse("/** @return HasMany<Account */");
    assert_eq!(
        doc.return_tag_value().map(|v| &v.ty),
        Some(&TypeNode::Invalid("HasMany<Account".into()))
    );
    assert_eq!(doc.to_string(), "/** @return HasMany<Account */");
}

#[test]
fn replacing_return_type_keeps_description_and_other_tags() {
    let doc = PhpDocNode::parse("/**\n * @param int $x\n * @return Foo the foo\n */");
    let updated = doc
        .with_return_type(TypeNode::Identifier(IdentifierTypeNode::fully_qualified(
            "App\\Bar",
        )))
        .expect("doc has a @return tag");

    assert_eq!(
        updated.to_string(),
        "/**\n * @param int $x\n * @return \\App\\Bar the foo\n */"
    );
    // The input doc is untouched.
    assert_eq!(doc.return_tag_value().unwrap().ty, TypeNode::identifier("Foo"));
}

#[test]
fn appending_return_tag_to_text_only_doc() {
    let doc = PhpDocNode::parse("/**\n * Accounts.\n */");
    assert_eq!(doc.with_return_type(TypeNode::identifier("X")), None);

    let updated = doc.with_return_tag(ReturnTagValue::new(TypeNode::identifier("X"), ""));
    assert_eq!(updated.to_string(), "/**\n * Accounts.\n * @return X\n */");
}

#[test]
fn empty_doc_gains_single_line_return() {
    let doc = PhpDocNode::default();
    assert!(doc.is_empty());
    let updated = doc.with_return_tag(ReturnTagValue::new(TypeNode::identifier("X"), ""));
    assert_eq!(updated.to_string(), "/** @return X */");
}

#[test]
fn rewrite_keeps_other_tags_exactly_as_written() {
    let doc = PhpDocNode::parse(
        "/**\n * @param  int    $x  the x\n * @throws\tException\n *    indented note\n * @return HasMany\n */",
    );
    let updated = doc
        .with_return_type(parse_type("HasMany<X>").unwrap())
        .expect("doc has a @return tag");

    assert_eq!(
        updated.to_string(),
        "/**\n * @param  int    $x  the x\n * @throws\tException\n *    indented note\n * @return HasMany<X>\n */"
    );
}

#[test]
fn indented_doc_keeps_its_margin() {
    let text = "/**\n     * Accounts.\n     *\n     * @return  Foo\n     */";
    let doc = PhpDocNode::parse(text);
    assert_eq!(doc.margin.as_deref(), Some("     "));
    assert_eq!(doc.to_string(), text);

    let updated = doc.with_return_type(TypeNode::identifier("Bar")).unwrap();
    assert_eq!(
        updated.to_string(),
        "/**\n     * Accounts.\n     *\n     * @return Bar\n     */"
    );
}

#[test]
fn undecorated_lines_keep_their_indentation() {
    let doc = PhpDocNode::parse("/** Summary\n    - first\n    - second\n*/");
    assert_eq!(
        doc.children,
        vec![
            PhpDocChild::Text("Summary".into()),
            PhpDocChild::Text("    - first".into()),
            PhpDocChild::Text("    - second".into()),
        ]
    );
}
