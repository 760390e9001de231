//! Intention generation from a parsed header.

use morph_ast::SwiftType;
use morph_common::span::LineIndex;
use morph_intentions::{
    FileIntention, InitIntention, IntentionHistory, MethodIntention, PropertyAttribute,
    PropertyIntention, Provenance, TypeIntention,
};
use morph_parser::ast::{
    MethodData, MethodSelector, Node, Nullability, ObjcType, PropertyData, TypeNameNode,
};
use morph_types::{FunctionSignature, Ownership, ParameterSignature, ValueStorage};

use crate::type_mapper::TypeMapper;

pub const CREATION_TAG: &str = "Creation";

/// Turns the declarations of one header into a [`FileIntention`].
///
/// Nodes whose name failed to parse are skipped; everything else becomes
/// an intention with a provenance pointing back at its node and a
/// `[Creation]` history entry with its source position.
pub struct IntentionGenerator<'a> {
    path: &'a str,
    lines: LineIndex,
}

impl<'a> IntentionGenerator<'a> {
    pub fn new(path: &'a str, source: &str) -> Self {
        Self {
            path,
            lines: LineIndex::new(source),
        }
    }

    pub fn generate(&self, root: &Node) -> FileIntention {
        let mut file = FileIntention::for_header(self.path);
        file.source = Some(provenance(root));

        for (node, data) in root.class_interfaces() {
            let Some(name) = data.name.valid() else {
                continue;
            };
            let mut ty = TypeIntention::class(name.name.as_str());
            ty.supertype = node.superclass().map(|ident| ident.name.clone());
            self.fill_type(&mut ty, node);
            file.add_type(ty);
        }

        for (node, data) in root.protocol_declarations() {
            let Some(name) = data.name.valid() else {
                continue;
            };
            let mut ty = TypeIntention::protocol(name.name.as_str());
            self.fill_type(&mut ty, node);
            file.add_type(ty);
        }

        tracing::debug!(
            path = self.path,
            types = file.type_intentions().len(),
            "generated file intention"
        );
        file
    }

    fn fill_type(&self, ty: &mut TypeIntention, node: &Node) {
        ty.source = Some(provenance(node));
        ty.history = self.creation_history(node);
        for protocol in node.protocols() {
            ty.add_protocol(protocol);
        }

        let mapper = TypeMapper::with_instance_type(ty.type_name.as_str());
        for (prop_node, data) in node.properties() {
            if let Some(property) = self.property(&mapper, prop_node, data) {
                ty.add_property(property);
            }
        }
        for (method_node, data) in node.methods() {
            match self.method(&mapper, data) {
                Some(Member::Method(mut method)) => {
                    method.source = Some(provenance(method_node));
                    method.history = self.creation_history(method_node);
                    ty.add_method(method);
                }
                Some(Member::Init(mut init)) => {
                    init.source = Some(provenance(method_node));
                    init.history = self.creation_history(method_node);
                    ty.add_constructor(init);
                }
                None => {}
            }
        }
    }

    fn property(&self, mapper: &TypeMapper, node: &Node, data: &PropertyData) -> Option<PropertyIntention> {
        let type_name = data.ty.valid()?;
        let name = data.name.valid()?;

        let mut attributes = Vec::new();
        let mut nullability = type_name.nullability;
        let mut ownership = Ownership::Strong;
        for modifier in node.property_modifiers() {
            let attr = match (modifier.name.as_str(), &modifier.value) {
                ("getter", Some(value)) => PropertyAttribute::Getter(value.clone()),
                ("setter", Some(value)) => PropertyAttribute::Setter(value.clone()),
                (other, _) => {
                    if let Some(found) = Nullability::from_qualifier(other) {
                        nullability = nullability.or(Some(found));
                    }
                    match other {
                        "weak" => ownership = Ownership::Weak,
                        "unsafe_unretained" | "assign" if type_name.ty.is_pointer() => {
                            ownership = Ownership::UnownedUnsafe
                        }
                        _ => {}
                    }
                    PropertyAttribute::Attribute(other.to_string())
                }
            };
            attributes.push(attr);
        }

        let mut ty = mapper.swift_type(&type_name.ty, nullability);
        if ownership == Ownership::Weak && !ty.is_optional() {
            ty = SwiftType::optional(ty);
        }
        let mut property = PropertyIntention::new(
            name.name.as_str(),
            ValueStorage {
                ty,
                ownership,
                is_constant: false,
            },
        );
        property.attributes = attributes;
        property.is_optional = data.is_optional;
        property.source = Some(provenance(node));
        property.history = self.creation_history(node);
        Some(property)
    }

    fn method(&self, mapper: &TypeMapper, data: &MethodData) -> Option<Member> {
        let selector = data.selector.valid()?;
        let return_type = swift_type_of(mapper, data.return_type.as_ref());

        let (name, mut parameters) = match selector {
            MethodSelector::Simple(ident) => (ident.name.clone(), Vec::new()),
            MethodSelector::Keywords(args) => {
                let name = args
                    .first()
                    .and_then(|arg| arg.keyword.as_ref())
                    .map(|keyword| keyword.name.clone())
                    .unwrap_or_default();
                let parameters = args
                    .iter()
                    .enumerate()
                    .map(|(i, arg)| {
                        let label = match (&arg.keyword, i) {
                            (Some(keyword), i) if i > 0 => keyword.name.clone(),
                            _ => "_".to_string(),
                        };
                        let ty = swift_type_of(mapper, arg.ty.as_ref());
                        ParameterSignature::new(label, arg.name.name.as_str(), ty)
                    })
                    .collect::<Vec<_>>();
                (name, parameters)
            }
        };

        if !data.is_class_method && is_initializer(&name) {
            if let (Some(first), Some(label)) = (parameters.first_mut(), initializer_label(&name)) {
                first.label = label;
            }
            return Some(Member::Init(InitIntention::new(parameters)));
        }

        let mut signature = FunctionSignature::new(name, parameters, return_type);
        signature.is_static = data.is_class_method;
        let mut method = MethodIntention::new(signature);
        method.is_optional = data.is_optional;
        Some(Member::Method(method))
    }

    fn creation_history(&self, node: &Node) -> IntentionHistory {
        let mut history = IntentionHistory::new();
        let position = match node.range.span() {
            Some(span) => {
                let (line, column) = self.lines.line_col(span.start);
                format!("{} line {} column {}", self.path, line, column)
            }
            None => self.path.to_string(),
        };
        history.record(CREATION_TAG, position);
        history
    }
}

enum Member {
    Method(MethodIntention),
    Init(InitIntention),
}

fn provenance(node: &Node) -> Provenance {
    Provenance {
        node: node.id,
        range: node.range,
    }
}

/// Declared type, `id` when it was omitted.
fn swift_type_of(mapper: &TypeMapper, node: Option<&TypeNameNode>) -> SwiftType {
    match node {
        Some(node) => mapper.swift_type_of(node),
        None => mapper.swift_type(&ObjcType::Id { protocols: Vec::new() }, None),
    }
}

fn is_initializer(name: &str) -> bool {
    name == "init"
        || name
            .strip_prefix("initWith")
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
}

/// `initWithFrame` labels its first argument `frame`.
fn initializer_label(name: &str) -> Option<String> {
    let rest = name.strip_prefix("initWith")?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    Some(format!("{}{}", first.to_ascii_lowercase(), chars.as_str()))
}
