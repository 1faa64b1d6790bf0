//! A closed AST over the PHP shapes Larch rules look at.
//!
//! Every node is plain owned data. Rules never mutate a node they were given;
//! they clone the pieces they change and hand back a new node.

use serde::{Deserialize, Serialize};

use crate::names::NameContext;

/// How a class name was written in source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameKind {
    /// `Foo`
    Unqualified,
    /// `Foo\Bar`
    Qualified,
    /// `\Foo\Bar`
    FullyQualified,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    /// Name text without any leading `\`.
    pub text: String,
    pub kind: NameKind,
}

impl Name {
    /// Classify `text` the way the PHP parser would.
    pub fn new(text: impl AsRef<str>) -> Self {
        let text = text.as_ref();
        if let Some(stripped) = text.strip_prefix('\\') {
            Self {
                text: stripped.to_string(),
                kind: NameKind::FullyQualified,
            }
        } else if text.contains('\\') {
            Self {
                text: text.to_string(),
                kind: NameKind::Qualified,
            }
        } else {
            Self {
                text: text.to_string(),
                kind: NameKind::Unqualified,
            }
        }
    }

    pub fn fully_qualified(text: impl AsRef<str>) -> Self {
        Self {
            text: text.as_ref().trim_start_matches('\\').to_string(),
            kind: NameKind::FullyQualified,
        }
    }

    /// `self`, `static` and `parent` refer to the enclosing class rather than
    /// a named one.
    pub fn is_special_class_name(&self) -> bool {
        self.kind == NameKind::Unqualified
            && ["self", "static", "parent"]
                .iter()
                .any(|special| self.text.eq_ignore_ascii_case(special))
    }
}

/// A native (non-doc) type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeHint {
    Name(Name),
    /// `int`, `string`, `array`, `void`, ...
    Builtin(String),
    Nullable(Box<TypeHint>),
    Union(Vec<TypeHint>),
}

impl TypeHint {
    pub fn name(text: impl AsRef<str>) -> Self {
        TypeHint::Name(Name::new(text))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Method name of a call: either a literal identifier or a dynamic expression
/// (`$this->{$name}()`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MethodName {
    Identifier(Identifier),
    Expr(Box<Expr>),
}

impl MethodName {
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            MethodName::Identifier(ident) => Some(ident.as_str()),
            MethodName::Expr(_) => None,
        }
    }
}

/// The left-hand side of `X::something`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClassRef {
    Name(Name),
    Expr(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arg {
    pub value: Expr,
    /// `...$args`
    pub unpack: bool,
}

impl Arg {
    pub fn new(value: Expr) -> Self {
        Self {
            value,
            unpack: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// `$name`, stored without the `$`.
    Variable(String),
    /// A string literal's decoded value.
    String(String),
    Int(i64),
    ClassConstFetch {
        class: ClassRef,
        constant: String,
    },
    MethodCall {
        var: Box<Expr>,
        name: MethodName,
        args: Vec<Arg>,
    },
    StaticCall {
        class: ClassRef,
        name: MethodName,
        args: Vec<Arg>,
    },
    FuncCall {
        name: Name,
        args: Vec<Arg>,
    },
    PropertyFetch {
        var: Box<Expr>,
        name: String,
    },
    New {
        class: ClassRef,
        args: Vec<Arg>,
    },
    Assign {
        var: Box<Expr>,
        value: Box<Expr>,
    },
    /// `function () { ... }`
    Closure {
        body: Vec<Stmt>,
    },
    /// `fn () => ...`
    ArrowFunction {
        expr: Box<Expr>,
    },
    /// Anything the rules have no interest in.
    Other,
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn this() -> Self {
        Expr::Variable("this".to_string())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::String(value.into())
    }

    /// `Name::class`
    pub fn class_const(class: impl AsRef<str>) -> Self {
        Expr::ClassConstFetch {
            class: ClassRef::Name(Name::new(class)),
            constant: "class".to_string(),
        }
    }

    pub fn method_call(var: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodCall {
            var: Box::new(var),
            name: MethodName::Identifier(Identifier(name.into())),
            args: args.into_iter().map(Arg::new).collect(),
        }
    }

    /// `$this->name(args...)`
    pub fn this_call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::method_call(Self::this(), name, args)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Return(Option<Expr>),
    Expression(Expr),
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
}

/// Raw text of a `/** ... */` comment attached to a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocComment(pub String);

impl DocComment {
    pub fn text(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassMethod {
    pub name: Identifier,
    pub return_type: Option<TypeHint>,
    /// `None` for abstract and interface methods.
    pub stmts: Option<Vec<Stmt>>,
    pub doc_comment: Option<DocComment>,
}

impl ClassMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Identifier(name.into()),
            return_type: None,
            stmts: None,
            doc_comment: None,
        }
    }

    pub fn with_return_type(mut self, ty: TypeHint) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn with_body(mut self, stmts: Vec<Stmt>) -> Self {
        self.stmts = Some(stmts);
        self
    }

    pub fn with_doc_comment(mut self, text: impl Into<String>) -> Self {
        self.doc_comment = Some(DocComment(text.into()));
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassLikeKind {
    Class,
    Interface,
    Trait,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassLike {
    pub kind: ClassLikeKind,
    /// Short name as declared; `None` for anonymous classes.
    pub name: Option<String>,
    pub extends: Option<Name>,
    pub methods: Vec<ClassMethod>,
}

impl ClassLike {
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(ClassLikeKind::Class, name)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(ClassLikeKind::Interface, name)
    }

    pub fn trait_(name: impl Into<String>) -> Self {
        Self::new(ClassLikeKind::Trait, name)
    }

    fn new(kind: ClassLikeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            extends: None,
            methods: Vec::new(),
        }
    }

    pub fn extending(mut self, parent: impl AsRef<str>) -> Self {
        self.extends = Some(Name::new(parent));
        self
    }

    pub fn with_method(mut self, method: ClassMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn method(&self, name: &str) -> Option<&ClassMethod> {
        self.methods
            .iter()
            .find(|m| m.name.as_str().eq_ignore_ascii_case(name))
    }
}

/// One PHP file as seen by the rules: its name-resolution context and the
/// class-likes it declares.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub names: NameContext,
    pub class_likes: Vec<ClassLike>,
}

impl SourceFile {
    pub fn new(names: NameContext) -> Self {
        Self {
            names,
            class_likes: Vec::new(),
        }
    }

    pub fn with_class_like(mut self, class_like: ClassLike) -> Self {
        self.class_likes.push(class_like);
        self
    }
}
