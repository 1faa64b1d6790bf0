//! PHPDoc comments: a structured model, a parser and a printer.
//!
//! Only `@return` tags are decoded; every other tag and every line of free
//! text is kept verbatim so a rewrite touches nothing it does not own.

use std::fmt;

use serde::{Deserialize, Serialize};

mod type_parser;

pub use type_parser::{parse_type, TypeParseError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierTypeNode {
    /// Name as written, including a leading `\` when fully qualified.
    pub name: String,
}

impl IdentifierTypeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// An identifier that always prints with a leading `\`.
    pub fn fully_qualified(name: &str) -> Self {
        Self {
            name: format!("\\{}", name.trim_start_matches('\\')),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeNode {
    Identifier(IdentifierTypeNode),
    Generic {
        base: IdentifierTypeNode,
        args: Vec<TypeNode>,
    },
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    Nullable(Box<TypeNode>),
    /// `T[]`
    Array(Box<TypeNode>),
    /// Text that did not parse as a type.
    Invalid(String),
}

impl TypeNode {
    pub fn identifier(name: impl Into<String>) -> Self {
        TypeNode::Identifier(IdentifierTypeNode::new(name))
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[TypeNode], sep: &str) -> fmt::Result {
    for (idx, ty) in types.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        // Nested compound types need parentheses to keep their grouping.
        match ty {
            TypeNode::Union(_) | TypeNode::Intersection(_) => write!(f, "({ty})")?,
            _ => write!(f, "{ty}")?,
        }
    }
    Ok(())
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Identifier(ident) => f.write_str(&ident.name),
            TypeNode::Generic { base, args } => {
                write!(f, "{}<", base.name)?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            TypeNode::Union(types) => write_joined(f, types, "|"),
            TypeNode::Intersection(types) => write_joined(f, types, "&"),
            TypeNode::Nullable(inner) => write!(f, "?{inner}"),
            TypeNode::Array(inner) => match inner.as_ref() {
                TypeNode::Union(_) | TypeNode::Intersection(_) => write!(f, "({inner})[]"),
                _ => write!(f, "{inner}[]"),
            },
            TypeNode::Invalid(raw) => f.write_str(raw),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnTagValue {
    pub ty: TypeNode,
    pub description: String,
}

impl ReturnTagValue {
    pub fn new(ty: TypeNode, description: impl Into<String>) -> Self {
        Self {
            ty,
            description: description.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhpDocTagValue {
    Return(ReturnTagValue),
    /// Undecoded value text of any other tag.
    Generic(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhpDocTag {
    /// Tag name including the `@`.
    pub name: String,
    pub value: PhpDocTagValue,
    /// The tag's line as written, printed back verbatim. `None` for tags
    /// built or rewritten here.
    #[serde(default)]
    pub raw: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhpDocChild {
    /// One line of free text as written; empty for a blank line.
    Text(String),
    Tag(PhpDocTag),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhpDocNode {
    pub children: Vec<PhpDocChild>,
    /// Whitespace before the `*` of continuation lines; a single space when
    /// `None`.
    #[serde(default)]
    pub margin: Option<String>,
}

impl PhpDocNode {
    pub fn new(children: Vec<PhpDocChild>) -> Self {
        Self {
            children,
            margin: None,
        }
    }

    /// Parse a `/** ... */` comment. Parsing never fails: a `@return` whose
    /// type cannot be read keeps its text as [`TypeNode::Invalid`].
    pub fn parse(text: &str) -> Self {
        let body = text.trim();
        let body = body.strip_prefix("/**").unwrap_or(body);
        let body = body.strip_suffix("*/").unwrap_or(body);

        let mut margin = None;
        let mut children = Vec::new();
        for (idx, line) in body.lines().enumerate() {
            let content = match line.trim_start().strip_prefix('*') {
                Some(rest) => {
                    if margin.is_none() {
                        margin = Some(leading_whitespace(line).to_string());
                    }
                    rest.strip_prefix(' ').unwrap_or(rest)
                }
                // Text sharing the line with `/**`.
                None if idx == 0 => line.trim_start(),
                None => line,
            };
            children.push(parse_line(content.trim_end()));
        }

        // Drop blank lines produced by the opening and closing delimiters.
        while matches!(children.first(), Some(PhpDocChild::Text(t)) if t.is_empty()) {
            children.remove(0);
        }
        while matches!(children.last(), Some(PhpDocChild::Text(t)) if t.is_empty()) {
            children.pop();
        }

        Self { children, margin }
    }

    pub fn tags(&self) -> impl Iterator<Item = &PhpDocTag> {
        self.children.iter().filter_map(|child| match child {
            PhpDocChild::Tag(tag) => Some(tag),
            PhpDocChild::Text(_) => None,
        })
    }

    /// The first `@return` tag value.
    pub fn return_tag_value(&self) -> Option<&ReturnTagValue> {
        self.tags().find_map(|tag| match &tag.value {
            PhpDocTagValue::Return(value) => Some(value),
            PhpDocTagValue::Generic(_) => None,
        })
    }

    /// Copy of this doc with the type of the first `@return` tag replaced.
    /// The tag's description and all other children are kept.
    ///
    /// Returns `None` when there is no `@return` tag.
    pub fn with_return_type(&self, ty: TypeNode) -> Option<Self> {
        let mut out = self.clone();
        let (value, raw) = out.children.iter_mut().find_map(|child| match child {
            PhpDocChild::Tag(PhpDocTag {
                value: PhpDocTagValue::Return(value),
                raw,
                ..
            }) => Some((value, raw)),
            _ => None,
        })?;
        value.ty = ty;
        *raw = None;
        Some(out)
    }

    /// Copy of this doc with `value` appended as a new `@return` tag.
    pub fn with_return_tag(&self, value: ReturnTagValue) -> Self {
        let mut out = self.clone();
        out.children.push(PhpDocChild::Tag(PhpDocTag {
            name: "@return".to_string(),
            value: PhpDocTagValue::Return(value),
            raw: None,
        }));
        out
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Decode one undecorated line. Tags keep the line in `raw`.
fn parse_line(line: &str) -> PhpDocChild {
    let Some(rest) = line.trim_start().strip_prefix('@') else {
        return PhpDocChild::Text(line.to_string());
    };
    let name_len = rest
        .find(|c: char| c.is_whitespace())
        .unwrap_or(rest.len());
    let name = format!("@{}", &rest[..name_len]);
    let value_text = rest[name_len..].trim();

    let value = if name == "@return" {
        PhpDocTagValue::Return(parse_return_value(value_text))
    } else {
        PhpDocTagValue::Generic(value_text.to_string())
    };
    PhpDocChild::Tag(PhpDocTag {
        name,
        value,
        raw: Some(line.to_string()),
    })
}

fn parse_return_value(text: &str) -> ReturnTagValue {
    match type_parser::parse_type_prefix(text) {
        Ok((ty, rest)) => ReturnTagValue::new(ty, rest.trim()),
        Err(err) => {
            tracing::trace!(
                target: "larch.syntax",
                error = %err,
                text,
                "unreadable @return type kept verbatim"
            );
            ReturnTagValue::new(TypeNode::Invalid(text.to_string()), "")
        }
    }
}

fn write_child(f: &mut fmt::Formatter<'_>, child: &PhpDocChild) -> fmt::Result {
    match child {
        PhpDocChild::Text(text) => f.write_str(text),
        PhpDocChild::Tag(PhpDocTag { raw: Some(raw), .. }) => f.write_str(raw),
        PhpDocChild::Tag(tag) => {
            f.write_str(&tag.name)?;
            let value = match &tag.value {
                PhpDocTagValue::Return(value) if value.description.is_empty() => {
                    value.ty.to_string()
                }
                PhpDocTagValue::Return(value) => format!("{} {}", value.ty, value.description),
                PhpDocTagValue::Generic(text) => text.clone(),
            };
            if !value.is_empty() {
                write!(f, " {value}")?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for PhpDocNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.children.as_slice() {
            [] => f.write_str("/** */"),
            [only @ PhpDocChild::Tag(_)] => {
                f.write_str("/** ")?;
                write_child(f, only)?;
                f.write_str(" */")
            }
            children => {
                let margin = self.margin.as_deref().unwrap_or(" ");
                f.write_str("/**\n")?;
                for child in children {
                    match child {
                        PhpDocChild::Text(text) if text.is_empty() => writeln!(f, "{margin}*")?,
                        _ => {
                            write!(f, "{margin}* ")?;
                            write_child(f, child)?;
                            f.write_str("\n")?;
                        }
                    }
                }
                write!(f, "{margin}*/")
            }
        }
    }
}
