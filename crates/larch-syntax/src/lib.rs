//! Syntax model for Larch.
//!
//! Larch does not parse PHP source itself; the traversal driver hands rules an
//! already-built tree. This crate keeps that tree deliberately narrow: only
//! the node shapes rules inspect (class-likes, methods, statements, calls and
//! names) plus the PHPDoc model rules read and write.

pub mod ast;
mod finder;
mod names;
pub mod phpdoc;

pub use ast::{
    Arg, ClassLike, ClassLikeKind, ClassMethod, ClassRef, DocComment, Expr, Identifier,
    MethodName, Name, NameKind, SourceFile, Stmt, TypeHint,
};
pub use finder::{find_first_method_call, find_first_return_scoped, walk_expr};
pub use names::{NameContext, UseImport};
pub use phpdoc::{
    parse_type, IdentifierTypeNode, PhpDocChild, PhpDocNode, PhpDocTag, PhpDocTagValue,
    ReturnTagValue, TypeNode, TypeParseError,
};

#[cfg(test)]
mod tests;
