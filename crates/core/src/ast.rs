//! AST produced by the parser.
//!
//! The tree is read-only once parsing returns. Every list is owned by its
//! parent and the [`Ast`] root owns the top-level nodes, so dropping the root
//! releases the whole document. Consumers walk sibling lists either with
//! slice iterators or with [`Entry::next`].

use serde::Serialize;
use std::fmt;
use std::ops::Deref;

// ──────────────────────────────────────────────
// Sibling traversal
// ──────────────────────────────────────────────

/// A position in an ordered sibling list.
///
/// Method calls through `Deref` borrow from the `Entry` itself, so a child
/// handle reached that way cannot outlive a temporary parent entry. Use
/// [`Entry::get`], which borrows from the owning tree, when chaining:
///
/// ```
/// let ast = ssd_core::parse("service S { fn f(); };").unwrap();
/// let handler = ast.first().unwrap().get().handlers().unwrap();
/// assert_eq!(handler.name(), "f");
/// ```
#[derive(Debug)]
pub struct Entry<'a, T> {
    items: &'a [T],
    index: usize,
}

impl<'a, T> Clone for Entry<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Entry<'a, T> {}

impl<'a, T> Entry<'a, T> {
    /// First element of `items`, or `None` when the list is empty.
    fn first(items: &'a [T]) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Entry { items, index: 0 })
        }
    }

    /// The element, borrowed for the lifetime of the list rather than of
    /// this handle.
    pub fn get(&self) -> &'a T {
        &self.items[self.index]
    }

    /// The following sibling, or `None` at the end of the list.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<Entry<'a, T>> {
        let index = self.index + 1;
        if index < self.items.len() {
            Some(Entry {
                items: self.items,
                index,
            })
        } else {
            None
        }
    }

    /// Zero-based position within the list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// This element and every sibling after it.
    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.items[self.index..].iter()
    }
}

impl<'a, T> Deref for Entry<'a, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

// ──────────────────────────────────────────────
// Attributes
// ──────────────────────────────────────────────

/// `key` or `key = "value"` inside an attribute's parentheses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeParameter {
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl AttributeParameter {
    pub(crate) fn new(key: String, value: Option<String>) -> Self {
        AttributeParameter { key, value }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// One `name(...)` entry of a `#[...]` group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<AttributeParameter>,
}

impl Attribute {
    pub(crate) fn new(name: String, parameters: Vec<AttributeParameter>) -> Self {
        Attribute { name, parameters }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> Option<Entry<'_, AttributeParameter>> {
        Entry::first(&self.parameters)
    }

    pub fn parameter_list(&self) -> &[AttributeParameter] {
        &self.parameters
    }

    /// Look up a parameter by key.
    pub fn parameter(&self, key: &str) -> Option<&AttributeParameter> {
        self.parameters.iter().find(|p| p.key == key)
    }
}

// ──────────────────────────────────────────────
// Types
// ──────────────────────────────────────────────

/// A property, argument or return type.
///
/// `list of T` sets `is_list` without a count; `N of T` sets both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Type {
    name: String,
    is_list: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<i64>,
}

impl Type {
    pub(crate) fn scalar(name: String) -> Self {
        Type {
            name,
            is_list: false,
            count: None,
        }
    }

    pub(crate) fn list(name: String, count: Option<i64>) -> Self {
        Type {
            name,
            is_list: true,
            count,
        }
    }

    /// Element type name; may contain `::`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_list(&self) -> bool {
        self.is_list
    }

    pub fn count(&self) -> Option<i64> {
        self.count
    }

    pub fn is_scalar(&self) -> bool {
        !self.is_list
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_list, self.count) {
            (true, Some(n)) => write!(f, "{} of {}", n, self.name),
            (true, None) => write!(f, "list of {}", self.name),
            (false, _) => f.write_str(&self.name),
        }
    }
}

// ──────────────────────────────────────────────
// Record, enum and service members
// ──────────────────────────────────────────────

/// `name: type` inside a data body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<Attribute>,
    name: String,
    #[serde(rename = "type")]
    ty: Type,
}

impl Property {
    pub(crate) fn new(attributes: Vec<Attribute>, name: String, ty: Type) -> Self {
        Property {
            attributes,
            name,
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn attributes(&self) -> Option<Entry<'_, Attribute>> {
        Entry::first(&self.attributes)
    }

    pub fn attribute_list(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// `Name` or `Name = 3` inside an enum body.
///
/// There is no implicit numbering: a variant written without `= N` has no
/// value, whatever its neighbours carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumVariant {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<Attribute>,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<i64>,
}

impl EnumVariant {
    pub(crate) fn new(attributes: Vec<Attribute>, name: String, value: Option<i64>) -> Self {
        EnumVariant {
            attributes,
            name,
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<i64> {
        self.value
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// The explicit value and `true`, or `(0, false)` when none was written.
    pub fn value_or_default(&self) -> (i64, bool) {
        match self.value {
            Some(v) => (v, true),
            None => (0, false),
        }
    }

    pub fn attributes(&self) -> Option<Entry<'_, Attribute>> {
        Entry::first(&self.attributes)
    }

    pub fn attribute_list(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// `name: type` inside a handler or event parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<Attribute>,
    name: String,
    #[serde(rename = "type")]
    ty: Type,
}

impl Argument {
    pub(crate) fn new(attributes: Vec<Attribute>, name: String, ty: Type) -> Self {
        Argument {
            attributes,
            name,
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn attributes(&self) -> Option<Entry<'_, Attribute>> {
        Entry::first(&self.attributes)
    }

    pub fn attribute_list(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// `fn name(args) -> type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handler {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<Attribute>,
    name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    arguments: Vec<Argument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_type: Option<Type>,
}

impl Handler {
    pub(crate) fn new(
        attributes: Vec<Attribute>,
        name: String,
        arguments: Vec<Argument>,
        return_type: Option<Type>,
    ) -> Self {
        Handler {
            attributes,
            name,
            arguments,
            return_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> Option<Entry<'_, Argument>> {
        Entry::first(&self.arguments)
    }

    pub fn argument_list(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn return_type(&self) -> Option<&Type> {
        self.return_type.as_ref()
    }

    pub fn attributes(&self) -> Option<Entry<'_, Attribute>> {
        Entry::first(&self.attributes)
    }

    pub fn attribute_list(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// `event name(args)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<Attribute>,
    name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    arguments: Vec<Argument>,
}

impl Event {
    pub(crate) fn new(attributes: Vec<Attribute>, name: String, arguments: Vec<Argument>) -> Self {
        Event {
            attributes,
            name,
            arguments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> Option<Entry<'_, Argument>> {
        Entry::first(&self.arguments)
    }

    pub fn argument_list(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn attributes(&self) -> Option<Entry<'_, Attribute>> {
        Entry::first(&self.attributes)
    }

    pub fn attribute_list(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// `depends on path`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<Attribute>,
    path: String,
}

impl Dependency {
    pub(crate) fn new(attributes: Vec<Attribute>, path: String) -> Self {
        Dependency { attributes, path }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn attributes(&self) -> Option<Entry<'_, Attribute>> {
        Entry::first(&self.attributes)
    }

    pub fn attribute_list(&self) -> &[Attribute] {
        &self.attributes
    }
}

// ──────────────────────────────────────────────
// Top-level nodes
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeType {
    Import,
    Data,
    Enum,
    Service,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeType::Import => "import",
            NodeType::Data => "data",
            NodeType::Enum => "enum",
            NodeType::Service => "service",
        })
    }
}

/// Variant payload of a top-level node.
///
/// `Data` always has at least one property, `Enum` at least one variant and
/// `Service` at least one handler or event; the parser rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum NodeKind {
    Import {
        path: String,
    },
    Data {
        name: String,
        properties: Vec<Property>,
    },
    Enum {
        name: String,
        variants: Vec<EnumVariant>,
    },
    Service {
        name: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        dependencies: Vec<Dependency>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        handlers: Vec<Handler>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        events: Vec<Event>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<Attribute>,
    #[serde(flatten)]
    kind: NodeKind,
}

impl Node {
    pub(crate) fn new(attributes: Vec<Attribute>, kind: NodeKind) -> Self {
        Node { attributes, kind }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Import { .. } => NodeType::Import,
            NodeKind::Data { .. } => NodeType::Data,
            NodeKind::Enum { .. } => NodeType::Enum,
            NodeKind::Service { .. } => NodeType::Service,
        }
    }

    pub fn attributes(&self) -> Option<Entry<'_, Attribute>> {
        Entry::first(&self.attributes)
    }

    pub fn attribute_list(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn import_path(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Import { path } => Some(path),
            _ => None,
        }
    }

    pub fn data_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Data { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn enum_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Enum { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn service_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Service { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Declared name of a data, enum or service node. Imports have none.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Import { .. } => None,
            NodeKind::Data { name, .. }
            | NodeKind::Enum { name, .. }
            | NodeKind::Service { name, .. } => Some(name),
        }
    }

    pub fn properties(&self) -> Option<Entry<'_, Property>> {
        match &self.kind {
            NodeKind::Data { properties, .. } => Entry::first(properties),
            _ => None,
        }
    }

    pub fn enum_variants(&self) -> Option<Entry<'_, EnumVariant>> {
        match &self.kind {
            NodeKind::Enum { variants, .. } => Entry::first(variants),
            _ => None,
        }
    }

    pub fn dependencies(&self) -> Option<Entry<'_, Dependency>> {
        match &self.kind {
            NodeKind::Service { dependencies, .. } => Entry::first(dependencies),
            _ => None,
        }
    }

    pub fn handlers(&self) -> Option<Entry<'_, Handler>> {
        match &self.kind {
            NodeKind::Service { handlers, .. } => Entry::first(handlers),
            _ => None,
        }
    }

    pub fn events(&self) -> Option<Entry<'_, Event>> {
        match &self.kind {
            NodeKind::Service { events, .. } => Entry::first(events),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────
// Root
// ──────────────────────────────────────────────

/// One parsed document: a non-empty, source-ordered list of top-level nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub(crate) fn new(nodes: Vec<Node>) -> Self {
        Ast { nodes }
    }

    /// Head of the top-level node list.
    pub fn first(&self) -> Option<Entry<'_, Node>> {
        Entry::first(&self.nodes)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serialize the whole tree.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl<'a> IntoIterator for &'a Ast {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_enum() -> Node {
        Node::new(
            vec![],
            NodeKind::Enum {
                name: "Color".into(),
                variants: vec![
                    EnumVariant::new(vec![], "Red".into(), Some(1)),
                    EnumVariant::new(vec![], "Green".into(), None),
                ],
            },
        )
    }

    #[test]
    fn entry_walks_siblings_in_order() {
        let node = color_enum();
        let first = node.enum_variants().unwrap();
        assert_eq!(first.name(), "Red");
        assert_eq!(first.index(), 0);
        let second = first.next().unwrap();
        assert_eq!(second.name(), "Green");
        assert!(second.next().is_none());
        let names: Vec<_> = first.iter().map(|v| v.name()).collect();
        assert_eq!(names, ["Red", "Green"]);
    }

    #[test]
    fn child_entry_outlives_its_parent_entry() {
        let ast = Ast::new(vec![color_enum()]);
        let green = {
            let parent = ast.first().unwrap();
            parent.get().enum_variants().unwrap().next().unwrap()
        };
        assert_eq!(green.name(), "Green");

        let red = ast.first().unwrap().get().enum_variants().unwrap();
        assert_eq!(red.value(), Some(1));
        assert_eq!(red.next().unwrap().index(), 1);
    }

    #[test]
    fn getters_for_other_variants_are_not_applicable() {
        let node = color_enum();
        assert_eq!(node.node_type(), NodeType::Enum);
        assert_eq!(node.enum_name(), Some("Color"));
        assert_eq!(node.name(), Some("Color"));
        assert!(node.data_name().is_none());
        assert!(node.import_path().is_none());
        assert!(node.service_name().is_none());
        assert!(node.properties().is_none());
        assert!(node.handlers().is_none());
        assert!(node.attributes().is_none());
    }

    #[test]
    fn variant_value_reporting() {
        let node = color_enum();
        let red = node.enum_variants().unwrap();
        assert_eq!(red.value_or_default(), (1, true));
        let green = red.next().unwrap();
        assert_eq!(green.value_or_default(), (0, false));
        assert!(!green.has_value());
    }

    #[test]
    fn type_display_uses_surface_syntax() {
        assert_eq!(Type::scalar("int".into()).to_string(), "int");
        assert_eq!(Type::list("int".into(), None).to_string(), "list of int");
        assert_eq!(Type::list("a::B".into(), Some(5)).to_string(), "5 of a::B");
    }

    #[test]
    fn attribute_parameter_lookup() {
        let attr = Attribute::new(
            "serde".into(),
            vec![
                AttributeParameter::new("rename".into(), Some("x".into())),
                AttributeParameter::new("skip".into(), None),
            ],
        );
        assert_eq!(attr.parameter("rename").and_then(|p| p.value()), Some("x"));
        assert!(attr.parameter("skip").unwrap().value().is_none());
        assert!(attr.parameter("missing").is_none());
        assert!(Attribute::new("flag".into(), vec![]).parameters().is_none());
    }

    #[test]
    fn json_shape() {
        let ast = Ast::new(vec![Node::new(
            vec![],
            NodeKind::Import {
                path: "a::b".into(),
            },
        )]);
        let v = ast.to_json_value();
        assert_eq!(v[0]["node"], "import");
        assert_eq!(v[0]["path"], "a::b");
    }
}
