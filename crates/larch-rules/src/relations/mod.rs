//! Add generic return types to Eloquent relation methods.
//!
//! ```php
//! class User extends Model
//! {
//!     /** @return \Illuminate\Database\Eloquent\Relations\HasMany<\App\Account> */
//!     public function accounts(): HasMany
//!     {
//!         return $this->hasMany(Account::class);
//!     }
//! }
//! ```

use larch_config::EloquentConfig;
use larch_syntax::ast::{
    Arg, ClassLike, ClassLikeKind, ClassMethod, DocComment, Expr, TypeHint,
};
use larch_syntax::{
    find_first_method_call, find_first_return_scoped, IdentifierTypeNode, PhpDocNode,
    ReturnTagValue, TypeNode,
};
use larch_types::{are_types_equal, is_subclass_of, Scope, StaticTypeMapper, Type};

use crate::{CodeSample, Rule, RuleDefinition};

mod resolver;

pub use resolver::resolve_related_class;

/// Relation constructors on `Model` this rule understands.
pub const RELATION_METHODS: [&str; 11] = [
    "hasOne",
    "hasOneThrough",
    "morphOne",
    "belongsTo",
    "morphTo",
    "hasMany",
    "hasManyThrough",
    "morphMany",
    "belongsToMany",
    "morphToMany",
    "morphedByMany",
];

/// Relations whose type also records the declaring model (`TChildModel`).
pub const RELATION_WITH_CHILD_METHODS: [&str; 2] = ["belongsTo", "morphTo"];

const RULE_NAME: &str = "add_generic_return_type_to_relations";

/// The relation-constructing call found in a method's `return`.
#[derive(Debug)]
struct RelationCall<'a> {
    name: &'a str,
    args: &'a [Arg],
}

impl RelationCall<'_> {
    fn needs_child_generic(&self) -> bool {
        RELATION_WITH_CHILD_METHODS.contains(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddGenericReturnTypeToRelations {
    model_class: String,
    relation_class: String,
}

impl Default for AddGenericReturnTypeToRelations {
    fn default() -> Self {
        Self::from_config(&EloquentConfig::default())
    }
}

impl AddGenericReturnTypeToRelations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EloquentConfig) -> Self {
        Self {
            model_class: config.model_class.clone(),
            relation_class: config.relation_class.clone(),
        }
    }

    fn should_skip(&self, method: &ClassMethod, parent: Option<&ClassLike>, scope: &Scope<'_>) -> bool {
        if method.stmts.is_none() {
            return true;
        }
        let Some(parent) = parent else {
            return true;
        };
        match parent.kind {
            ClassLikeKind::Class => !self.is_model(parent, scope),
            ClassLikeKind::Interface | ClassLikeKind::Trait => false,
        }
    }

    /// Whether the class (transitively) extends the model base class.
    ///
    /// A class known to the type environment is judged by its own name;
    /// anonymous or unknown classes by the parent they declare.
    fn is_model(&self, class: &ClassLike, scope: &Scope<'_>) -> bool {
        let env = scope.env();
        if let Some(name) = &class.name {
            let fqcn = scope.names().qualify_declaration(name);
            if env.class(&fqcn).is_some() {
                return is_subclass_of(env, &fqcn, &self.model_class);
            }
        }
        class
            .extends
            .as_ref()
            .and_then(|parent| scope.resolve_class_name(parent))
            .is_some_and(|parent| is_subclass_of(env, &parent, &self.model_class))
    }

    fn is_relation(&self, ty: &Type, scope: &Scope<'_>) -> bool {
        match ty {
            Type::Object(class_name) => is_subclass_of(scope.env(), class_name, &self.relation_class),
            _ => false,
        }
    }
}

fn relation_method_call(method: &ClassMethod) -> Option<RelationCall<'_>> {
    let stmts = method.stmts.as_deref()?;
    let returned = find_first_return_scoped(stmts)??;
    let Expr::MethodCall { name, args, .. } = find_first_method_call(returned)? else {
        return None;
    };
    let name = name.as_identifier()?;
    if !RELATION_METHODS.contains(&name) || args.is_empty() {
        return None;
    }
    Some(RelationCall { name, args })
}

/// The class recorded as `TChildModel`, if the relation has one.
///
/// Comes from the scope rather than the AST; without a class scope the
/// annotation silently falls back to a single type argument.
fn class_for_child_generic(scope: &Scope<'_>, call: &RelationCall<'_>) -> Option<String> {
    if !call.needs_child_generic() {
        return None;
    }
    scope.class_name().map(str::to_string)
}

/// The `@return` type describes the native return type, ignoring generics.
fn are_native_and_doc_types_equal(
    mapper: &StaticTypeMapper<'_, '_>,
    native: &Type,
    doc: &ReturnTagValue,
) -> bool {
    let doc_type = mapper.map_doc_type(&doc.ty).without_generics();
    are_types_equal(native, &doc_type)
}

/// The `@return` type already carries exactly the generics we would write.
fn are_generic_types_equal(
    mapper: &StaticTypeMapper<'_, '_>,
    doc: &ReturnTagValue,
    related_class: &str,
    child_class: Option<&str>,
) -> bool {
    let Type::GenericObject { types, .. } = mapper.map_doc_type(&doc.ty) else {
        return false;
    };
    let Some(first) = types.first() else {
        return false;
    };
    if !are_types_equal(first, &Type::object(related_class)) {
        return false;
    }

    match (child_class, types.as_slice()) {
        (None, [_]) => true,
        (Some(child), [_, second]) => are_types_equal(second, &Type::object(child)),
        _ => false,
    }
}

fn generic_types(related_class: &str, child_class: Option<&str>) -> Vec<TypeNode> {
    std::iter::once(related_class)
        .chain(child_class)
        .map(|class| TypeNode::Identifier(IdentifierTypeNode::fully_qualified(class)))
        .collect()
}

impl Rule for AddGenericReturnTypeToRelations {
    fn name(&self) -> &'static str {
        RULE_NAME
    }

    fn definition(&self) -> RuleDefinition {
        RuleDefinition::new(
            format!(
                "Add generic return type to relations in child of {}",
                self.model_class
            ),
            vec![CodeSample::new(
                r#"use App\Account;
use Illuminate\Database\Eloquent\Model;
use Illuminate\Database\Eloquent\Relations\HasMany;

class User extends Model
{
    public function accounts(): HasMany
    {
        return $this->hasMany(Account::class);
    }
}
"#,
                r#"use App\Account;
use Illuminate\Database\Eloquent\Model;
use Illuminate\Database\Eloquent\Relations\HasMany;

class User extends Model
{
    /** @return HasMany<Account> */
    public function accounts(): HasMany
    {
        return $this->hasMany(Account::class);
    }
}
"#,
            )],
        )
    }

    fn refactor(
        &self,
        method: &ClassMethod,
        parent: Option<&ClassLike>,
        scope: &Scope<'_>,
    ) -> Option<ClassMethod> {
        let method_name = method.name.as_str();
        if self.should_skip(method, parent, scope) {
            tracing::trace!(target: "larch.rules", method = method_name, "not a model method with a body");
            return None;
        }

        // Nullable and union return types have no single name.
        let return_hint = method.return_type.as_ref()?;
        let TypeHint::Name(return_name) = return_hint else {
            return None;
        };
        let return_type_name = scope.resolve_class_name(return_name)?;

        let mapper = StaticTypeMapper::new(scope);
        let native_type = mapper.map_type_hint(return_hint);
        if !self.is_relation(&native_type, scope) {
            tracing::trace!(
                target: "larch.rules",
                method = method_name,
                return_type = %native_type,
                "return type is not a relation"
            );
            return None;
        }

        let doc = method
            .doc_comment
            .as_ref()
            .map(|comment| PhpDocNode::parse(comment.text()))
            .unwrap_or_default();
        let existing = doc.return_tag_value();

        // Only add generics to an existing @return; never change the type itself.
        if let Some(existing) = existing {
            if !are_native_and_doc_types_equal(&mapper, &native_type, existing) {
                tracing::debug!(
                    target: "larch.rules",
                    method = method_name,
                    doc_type = %existing.ty,
                    "@return disagrees with the native return type"
                );
                return None;
            }
        }

        let call = relation_method_call(method)?;
        let related_class = resolve_related_class(&call.args[0].value, scope)?;
        let child_class = class_for_child_generic(scope, &call);

        // Keep user-written (possibly short) names when they already say the same thing.
        if let Some(existing) = existing {
            if are_generic_types_equal(&mapper, existing, &related_class, child_class.as_deref()) {
                tracing::trace!(target: "larch.rules", method = method_name, "@return already complete");
                return None;
            }
        }

        let generic = TypeNode::Generic {
            base: IdentifierTypeNode::fully_qualified(&return_type_name),
            args: generic_types(&related_class, child_class.as_deref()),
        };
        tracing::debug!(
            target: "larch.rules",
            method = method_name,
            relation = call.name,
            annotation = %generic,
            "adding generic relation return type"
        );

        let updated_doc = match existing {
            Some(_) => doc.with_return_type(generic)?,
            None => doc.with_return_tag(ReturnTagValue::new(generic, "")),
        };

        let mut updated = method.clone();
        updated.doc_comment = Some(DocComment(updated_doc.to_string()));
        Some(updated)
    }
}
