//! Intention passes run over the whole collection before emission.

use morph_ast::matcher::Captured;
use morph_ast::{MatchRule, SwiftType, ValueMatcher};
use morph_intentions::{IntentionCollection, MethodIntention, TypeIntention};

/// A transformation over the intention collection.
pub trait IntentionPass: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns how many intentions were changed or removed.
    fn apply(&self, intentions: &mut IntentionCollection) -> usize;
}

// ── Property merge ─────────────────────────────────────────────────────

/// Folds explicit accessor methods into the property they access.
///
/// A getter is an instance method named after the property's getter with
/// no parameters returning the property type; a setter is named after its
/// setter, takes one parameter of the property type and returns `Void`.
/// Setters of readonly properties are kept.
#[derive(Debug, Default)]
pub struct PropertyMergePass;

impl PropertyMergePass {
    pub const TAG: &'static str = "PropertyMergePass";
}

impl IntentionPass for PropertyMergePass {
    fn name(&self) -> &'static str {
        Self::TAG
    }

    fn apply(&self, intentions: &mut IntentionCollection) -> usize {
        let mut merged = 0;
        for file in intentions.file_intentions_mut() {
            for ty in file.type_intentions_mut() {
                merged += merge_type(ty);
            }
        }
        tracing::debug!(merged, "merged accessor methods into properties");
        merged
    }
}

fn merge_type(ty: &mut TypeIntention) -> usize {
    let mut merged = 0;
    for index in 0..ty.properties.len() {
        let property = &ty.properties[index];
        if property.is_class_property() {
            continue;
        }
        let getter_name = property.getter_name().to_string();
        let setter_name = property.setter_name();
        let prop_type = property.ty().clone();
        let readonly = property.is_readonly();

        let owner = ty.type_name.clone();
        let getter = getter_matcher(&owner, &getter_name, &prop_type);
        let mut getters = Vec::new();
        ty.remove_methods(|method| take_accessor(&getter, method, &mut getters));
        let mut setters = Vec::new();
        if !readonly {
            let setter = setter_matcher(&owner, &setter_name, &prop_type);
            ty.remove_methods(|method| take_accessor(&setter, method, &mut setters));
        }
        if getters.is_empty() && setters.is_empty() {
            continue;
        }

        let property_desc = ty.properties[index].describe(&owner);
        for getter in &getters {
            ty.history.record(
                PropertyMergePass::TAG,
                format!("Removed method {getter} since deduced it is a getter for property {property_desc}"),
            );
        }
        for setter in &setters {
            ty.history.record(
                PropertyMergePass::TAG,
                format!("Removed method {setter} since deduced it is a setter for property {property_desc}"),
            );
        }

        let property = &mut ty.properties[index];
        let accessors: Vec<&str> = getters.iter().chain(&setters).map(String::as_str).collect();
        property.history.record(
            PropertyMergePass::TAG,
            format!("Merged {} into property {}", accessors.join(" and "), property_desc),
        );
        property.has_merged_accessors = true;
        merged += accessors.len();
    }
    merged
}

/// Runs `matcher` over `method`, collecting the captured accessor
/// description on success.
fn take_accessor(matcher: &ValueMatcher<MethodIntention>, method: &MethodIntention, found: &mut Vec<String>) -> bool {
    let Some(captures) = matcher.match_captures(method) else {
        return false;
    };
    found.extend(captures.string(ACCESSOR).map(str::to_string));
    true
}

// ── Accessor matchers ──────────────────────────────────────────────────

const ACCESSOR: &str = "accessor";

/// An instance method called `name`; binds its description under
/// `accessor`.
fn accessor_matcher(owner: &str, name: &str) -> ValueMatcher<MethodIntention> {
    let owner = owner.to_string();
    ValueMatcher::<MethodIntention>::new()
        .field(|m: &MethodIntention| &m.signature.is_static, MatchRule::Equals(false))
        .field(|m: &MethodIntention| &m.signature.name, name)
        .bind_with(ACCESSOR, move |m: &MethodIntention| Captured::String(m.describe(&owner)))
}

fn getter_matcher(owner: &str, name: &str, ty: &SwiftType) -> ValueMatcher<MethodIntention> {
    accessor_matcher(owner, name)
        .matching(|m: &MethodIntention| m.signature.arity() == 0)
        .field(|m: &MethodIntention| &m.signature.return_type, ty.clone())
}

fn setter_matcher(owner: &str, name: &str, ty: &SwiftType) -> ValueMatcher<MethodIntention> {
    accessor_matcher(owner, name)
        .matching(|m: &MethodIntention| m.signature.arity() == 1)
        .narrow(
            |m: &MethodIntention| m.signature.parameters.first().map(|p| &p.ty),
            ty.clone(),
        )
        .field(|m: &MethodIntention| &m.signature.return_type, SwiftType::void())
}

// ── Empty extensions ───────────────────────────────────────────────────

/// Drops extensions that declare no members or conformances.
#[derive(Debug, Default)]
pub struct RemoveEmptyExtensionsPass;

impl RemoveEmptyExtensionsPass {
    pub const TAG: &'static str = "RemoveEmptyExtensionsPass";
}

impl IntentionPass for RemoveEmptyExtensionsPass {
    fn name(&self) -> &'static str {
        Self::TAG
    }

    fn apply(&self, intentions: &mut IntentionCollection) -> usize {
        let mut removed = 0;
        for file in intentions.file_intentions_mut() {
            let mut names = Vec::new();
            let count = file.remove_types(|ty| {
                let empty = ty.is_extension() && ty.is_empty();
                if empty {
                    names.push(ty.type_name.clone());
                }
                empty
            });
            for name in names {
                file.history
                    .record(Self::TAG, format!("Removed empty extension of {name}"));
            }
            removed += count;
        }
        tracing::debug!(removed, "removed empty extensions");
        removed
    }
}
