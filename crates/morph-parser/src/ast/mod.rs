//! AST node model for Objective-C headers.
//!
//! The tree is a closed tagged variant: every node is a [`Node`] whose
//! [`NodeKind`] says what it is and carries that kind's fields. Field slots
//! that may fail to parse are [`NodeRef`]s, which distinguish "never set",
//! "parsed" and "recovery happened here".
//!
//! Nodes are built through the [`context::ContextStack`]; once a node's
//! context is popped it is never mutated again.

pub mod context;
pub mod expr;

use std::fmt;

use morph_common::span::Span;
use morph_common::token::TokenKind;

/// Per-parse unique node id, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Source region a node was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRange {
    Valid(Span),
    /// The node consumed no input (recovery, or a synthesized node).
    Invalid,
}

impl SourceRange {
    pub fn span(&self) -> Option<Span> {
        match self {
            SourceRange::Valid(span) => Some(*span),
            SourceRange::Invalid => None,
        }
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRange::Valid(span) => write!(f, "{}..{}", span.start, span.end),
            SourceRange::Invalid => write!(f, "invalid"),
        }
    }
}

/// Marker left in a field slot whose parse failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidNode {
    /// Where the failure was detected.
    pub at: Span,
}

/// A field slot of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeRef<T> {
    Placeholder,
    Valid(T),
    Invalid(InvalidNode),
}

impl<T> Default for NodeRef<T> {
    fn default() -> Self {
        NodeRef::Placeholder
    }
}

impl<T> NodeRef<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            NodeRef::Valid(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, NodeRef::Valid(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, NodeRef::Invalid(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullability {
    Nonnull,
    Nullable,
    NullUnspecified,
}

impl Nullability {
    /// Recognize every spelling of a nullability qualifier.
    pub fn from_qualifier(word: &str) -> Option<Nullability> {
        match word {
            "nonnull" | "_Nonnull" | "__nonnull" => Some(Nullability::Nonnull),
            "nullable" | "_Nullable" | "__nullable" => Some(Nullability::Nullable),
            "null_unspecified" | "_Null_unspecified" | "__null_unspecified" => {
                Some(Nullability::NullUnspecified)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Nullability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nullability::Nonnull => write!(f, "nonnull"),
            Nullability::Nullable => write!(f, "nullable"),
            Nullability::NullUnspecified => write!(f, "null_unspecified"),
        }
    }
}

/// An Objective-C type as written in a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjcType {
    /// A plain name, including multi-word C scalars such as `unsigned int`.
    Struct(String),
    /// `id`, optionally protocol-qualified: `id<A, B>`.
    Id { protocols: Vec<String> },
    /// `NSArray<NSString *>`
    Generic {
        name: String,
        parameters: Vec<ObjcType>,
    },
    Pointer(Box<ObjcType>),
}

impl ObjcType {
    /// The outermost type name, looking through pointers.
    pub fn base_name(&self) -> &str {
        match self {
            ObjcType::Struct(name) | ObjcType::Generic { name, .. } => name,
            ObjcType::Id { .. } => "id",
            ObjcType::Pointer(inner) => inner.base_name(),
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, ObjcType::Pointer(_))
    }
}

impl fmt::Display for ObjcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjcType::Struct(name) => write!(f, "{name}"),
            ObjcType::Id { protocols } if protocols.is_empty() => write!(f, "id"),
            ObjcType::Id { protocols } => write!(f, "id<{}>", protocols.join(", ")),
            ObjcType::Generic { name, parameters } => {
                write!(f, "{name}<")?;
                for (i, param) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ">")
            }
            ObjcType::Pointer(inner) => write!(f, "{inner}*"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNameNode {
    pub ty: ObjcType,
    pub nullability: Option<Nullability>,
    pub span: Span,
}

impl fmt::Display for TypeNameNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nullability {
            Some(nullability) => write!(f, "{nullability} {}", self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}

// ── Node payloads ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassInterfaceData {
    pub name: NodeRef<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProtocolData {
    pub name: NodeRef<Identifier>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyData {
    pub ty: NodeRef<TypeNameNode>,
    pub name: NodeRef<Identifier>,
    /// Declared inside an `@optional` section of a protocol.
    pub is_optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyModifierData {
    pub name: String,
    /// Argument of `getter=`/`setter=` modifiers.
    pub value: Option<String>,
}

/// One `label:(type)name` piece of a keyword selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordArgument {
    /// `None` for an anonymous piece such as `:(id)b` in `a:(id)a :(id)b`.
    pub keyword: Option<Identifier>,
    pub ty: Option<TypeNameNode>,
    pub name: Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSelector {
    Simple(Identifier),
    Keywords(Vec<KeywordArgument>),
}

impl fmt::Display for MethodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodSelector::Simple(ident) => write!(f, "{}", ident.name),
            MethodSelector::Keywords(args) => {
                for arg in args {
                    if let Some(keyword) = &arg.keyword {
                        write!(f, "{}", keyword.name)?;
                    }
                    write!(f, ":")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodData {
    /// `+` methods.
    pub is_class_method: bool,
    /// `None` when the declaration omits the return type (implicitly `id`).
    pub return_type: Option<TypeNameNode>,
    pub selector: NodeRef<MethodSelector>,
    pub is_optional: bool,
}

/// What a node is, with the fields of that kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    GlobalContext,
    ClassInterface(ClassInterfaceData),
    ProtocolDeclaration(ProtocolData),
    SuperclassName(Identifier),
    ProtocolReferenceList(Vec<Identifier>),
    Property(PropertyData),
    PropertyModifierList,
    PropertyModifier(PropertyModifierData),
    MethodDeclaration(MethodData),
    /// An `@`-keyword such as `@interface` or `@end`.
    Keyword(TokenKind),
    /// A structural punctuation token such as `:` or `;`.
    Token(TokenKind),
    /// A region skipped by recovery.
    Invalid,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::GlobalContext => "GlobalContext",
            NodeKind::ClassInterface(_) => "ClassInterface",
            NodeKind::ProtocolDeclaration(_) => "ProtocolDeclaration",
            NodeKind::SuperclassName(_) => "SuperclassName",
            NodeKind::ProtocolReferenceList(_) => "ProtocolReferenceList",
            NodeKind::Property(_) => "Property",
            NodeKind::PropertyModifierList => "PropertyModifierList",
            NodeKind::PropertyModifier(_) => "PropertyModifier",
            NodeKind::MethodDeclaration(_) => "MethodDeclaration",
            NodeKind::Keyword(_) => "Keyword",
            NodeKind::Token(_) => "Token",
            NodeKind::Invalid => "Invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub range: SourceRange,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            range: SourceRange::Invalid,
            children: Vec::new(),
        }
    }

    /// Depth-first pre-order visit of this node and its descendants.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Look a node up by id in this subtree.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    // ── Typed child accessors ──────────────────────────────────────────

    pub fn class_interfaces(&self) -> impl Iterator<Item = (&Node, &ClassInterfaceData)> {
        self.children.iter().filter_map(|node| match &node.kind {
            NodeKind::ClassInterface(data) => Some((node, data)),
            _ => None,
        })
    }

    pub fn protocol_declarations(&self) -> impl Iterator<Item = (&Node, &ProtocolData)> {
        self.children.iter().filter_map(|node| match &node.kind {
            NodeKind::ProtocolDeclaration(data) => Some((node, data)),
            _ => None,
        })
    }

    pub fn properties(&self) -> impl Iterator<Item = (&Node, &PropertyData)> {
        self.children.iter().filter_map(|node| match &node.kind {
            NodeKind::Property(data) => Some((node, data)),
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = (&Node, &MethodData)> {
        self.children.iter().filter_map(|node| match &node.kind {
            NodeKind::MethodDeclaration(data) => Some((node, data)),
            _ => None,
        })
    }

    pub fn superclass(&self) -> Option<&Identifier> {
        self.children.iter().find_map(|node| match &node.kind {
            NodeKind::SuperclassName(ident) => Some(ident),
            _ => None,
        })
    }

    /// Protocol names from this node's `<...>` conformance list.
    pub fn protocols(&self) -> Vec<&str> {
        self.children
            .iter()
            .find_map(|node| match &node.kind {
                NodeKind::ProtocolReferenceList(list) => Some(list),
                _ => None,
            })
            .map(|list| list.iter().map(|ident| ident.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Modifiers of a property node, in source order.
    pub fn property_modifiers(&self) -> Vec<&PropertyModifierData> {
        self.children
            .iter()
            .filter(|node| node.kind == NodeKind::PropertyModifierList)
            .flat_map(|list| list.children.iter())
            .filter_map(|node| match &node.kind {
                NodeKind::PropertyModifier(data) => Some(data),
                _ => None,
            })
            .collect()
    }
}

// ── Debug rendering ────────────────────────────────────────────────────

fn node_ref_label<T: fmt::Display>(slot: &NodeRef<T>) -> String {
    match slot {
        NodeRef::Placeholder => "<placeholder>".to_string(),
        NodeRef::Valid(value) => value.to_string(),
        NodeRef::Invalid(_) => "<invalid>".to_string(),
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn node_label(kind: &NodeKind) -> String {
    match kind {
        NodeKind::GlobalContext => "GlobalContext".to_string(),
        NodeKind::ClassInterface(data) => format!("ClassInterface({})", node_ref_label(&data.name)),
        NodeKind::ProtocolDeclaration(data) => {
            format!("ProtocolDeclaration({})", node_ref_label(&data.name))
        }
        NodeKind::SuperclassName(ident) => format!("SuperclassName({})", ident.name),
        NodeKind::ProtocolReferenceList(list) => {
            let names: Vec<_> = list.iter().map(|ident| ident.name.as_str()).collect();
            format!("ProtocolReferenceList({})", names.join(", "))
        }
        NodeKind::Property(data) => format!(
            "Property({}{} {})",
            if data.is_optional { "optional " } else { "" },
            node_ref_label(&data.ty),
            node_ref_label(&data.name)
        ),
        NodeKind::PropertyModifierList => "PropertyModifierList".to_string(),
        NodeKind::PropertyModifier(data) => match &data.value {
            Some(value) => format!("PropertyModifier({}={})", data.name, value),
            None => format!("PropertyModifier({})", data.name),
        },
        NodeKind::MethodDeclaration(data) => {
            let return_type = data
                .return_type
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "id".to_string());
            format!(
                "MethodDeclaration({}{} ({}){})",
                if data.is_optional { "optional " } else { "" },
                if data.is_class_method { "+" } else { "-" },
                return_type,
                node_ref_label(&data.selector)
            )
        }
        NodeKind::Keyword(kind) => format!("Keyword({})", kind.describe()),
        NodeKind::Token(kind) => format!("Token({})", kind.describe()),
        NodeKind::Invalid => "Invalid".to_string(),
    }
}

/// Indented one-node-per-line rendering of a tree, for tests and debugging.
pub fn debug_tree(root: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0);
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(&node_label(&node.kind));
    out.push('@');
    out.push_str(&node.range.to_string());
    out.push('\n');
    for child in &node.children {
        write_node(out, child, depth + 1);
    }
}
