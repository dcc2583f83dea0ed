//! The type graph: declarations and type nodes.
//!
//! A [`TypeGraph`] is an arena of [`TypeNode`]s plus the interface and enum
//! declarations discovered across all source units of a run. Nodes are
//! addressed by [`TypeId`] handles and never mutated once the graph is built.
//!
//! Graphs are assembled with a [`TypeGraphBuilder`], either by the TypeScript
//! front end or directly by library users and tests.
//!
//! # Example
//!
//! ```
//! use tsexplode_core::{
//!     graph::{PropertyDecl, TypeGraphBuilder},
//!     identifier::Id,
//! };
//!
//! let mut builder = TypeGraphBuilder::new();
//! let unit = builder.add_unit("tag.ts");
//! let string = builder.text("string");
//! let tag = builder.declare_interface(Id::new("Tag"), unit);
//! builder.define_interface(tag, vec![PropertyDecl::new("name", string)], vec![], vec![]);
//! let graph = builder.build();
//!
//! assert_eq!(graph.interfaces().len(), 1);
//! assert_eq!(graph.interfaces()[0].name(), Id::new("Tag"));
//! ```

use std::fmt;

use log::debug;

use crate::{docs::DocComment, identifier::Id};

/// Handle to a node in a [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to an interface declaration in a [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceId(u32);

/// Handle to an enum declaration in a [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumId(u32);

/// Handle to a source unit (file) that contributed declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(u32);

impl UnitId {
    /// Returns the zero-based position of the unit in load order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A property signature of an interface or object literal.
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    name: String,
    optional: bool,
    readonly: bool,
    ty: TypeId,
    docs: Vec<DocComment>,
}

impl PropertyDecl {
    /// Creates a required, mutable, undocumented property.
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            optional: false,
            readonly: false,
            ty,
            docs: Vec::new(),
        }
    }

    /// Marks the property optional (`name?: T`).
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Marks the property `readonly`.
    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Attaches documentation comments.
    pub fn with_docs(mut self, docs: Vec<DocComment>) -> Self {
        self.docs = docs;
        self
    }

    /// Returns the property name exactly as written (quoted names keep their quotes).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Returns the declared type of the property.
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn docs(&self) -> &[DocComment] {
        &self.docs
    }
}

/// A type parameter of a generic interface or type alias.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    name: Id,
    default: Option<TypeId>,
}

impl TypeParameter {
    pub fn new(name: Id) -> Self {
        Self {
            name,
            default: None,
        }
    }

    pub fn with_default(mut self, default: TypeId) -> Self {
        self.default = Some(default);
        self
    }

    pub fn name(&self) -> Id {
        self.name
    }

    /// Returns the type bound when a reference supplies no argument for this
    /// parameter. It may mention earlier parameters of the same declaration.
    pub fn default(&self) -> Option<TypeId> {
        self.default
    }
}

/// A named interface declaration.
#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    id: InterfaceId,
    name: Id,
    unit: UnitId,
    type_parameters: Vec<TypeParameter>,
    properties: Vec<PropertyDecl>,
    extends: Vec<TypeId>,
    docs: Vec<DocComment>,
}

impl InterfaceDecl {
    pub fn id(&self) -> InterfaceId {
        self.id
    }

    pub fn name(&self) -> Id {
        self.name
    }

    /// Returns the source unit that declared this interface.
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn type_parameters(&self) -> &[TypeParameter] {
        &self.type_parameters
    }

    /// Returns the properties declared directly on this interface, in source order.
    pub fn properties(&self) -> &[PropertyDecl] {
        &self.properties
    }

    /// Returns the references listed in the `extends` clause, in source order.
    pub fn extends(&self) -> &[TypeId] {
        &self.extends
    }

    pub fn docs(&self) -> &[DocComment] {
        &self.docs
    }
}

/// The value of an enum member.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumValue {
    /// A string initializer: `A = "a"`.
    String(String),
    /// A numeric initializer or an auto-incremented value.
    Number(f64),
    /// An initializer that is not a literal, kept as source text.
    Computed(String),
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "{value:?}"),
            Self::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                write!(f, "{}", *value as i64)
            }
            Self::Number(value) => write!(f, "{value}"),
            Self::Computed(text) => f.write_str(text),
        }
    }
}

/// A single member of an enum declaration.
#[derive(Debug, Clone)]
pub struct EnumMember {
    name: Id,
    value: EnumValue,
}

impl EnumMember {
    pub fn new(name: Id, value: EnumValue) -> Self {
        Self { name, value }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn value(&self) -> &EnumValue {
        &self.value
    }

    /// Returns `true` if the member has a literal (string or numeric) value.
    pub fn is_literal(&self) -> bool {
        !matches!(self.value, EnumValue::Computed(_))
    }
}

/// A named enum declaration.
#[derive(Debug, Clone)]
pub struct EnumDecl {
    id: EnumId,
    name: Id,
    unit: UnitId,
    is_const: bool,
    members: Vec<EnumMember>,
    docs: Vec<DocComment>,
}

impl EnumDecl {
    pub fn id(&self) -> EnumId {
        self.id
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn is_const(&self) -> bool {
        self.is_const
    }

    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    pub fn docs(&self) -> &[DocComment] {
        &self.docs
    }

    /// Returns `true` if every member has a literal value, which makes the
    /// enum type equivalent to the union of its member literals.
    pub fn is_union_enum(&self) -> bool {
        !self.members.is_empty() && self.members.iter().all(EnumMember::is_literal)
    }
}

/// The structure of a single type node.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Verbatim type text: keywords, literal types, tuples, function types
    /// and well-known global types.
    Text(String),
    /// `T[]`, `Array<T>` or `ReadonlyArray<T>`.
    Array(TypeId),
    /// A reference to a declared interface. Type arguments bind the
    /// declaration's type parameters in order.
    Interface {
        decl: InterfaceId,
        type_arguments: Vec<TypeId>,
    },
    /// An anonymous object literal type with its own properties.
    Object { properties: Vec<PropertyDecl> },
    Union(Vec<TypeId>),
    Intersection(Vec<TypeId>),
    /// A literal reference to one member of an enum.
    EnumMember { decl: EnumId, member: usize },
    /// The type of an enum whose members are not all literals.
    Enum(EnumId),
    /// A reference to a type parameter of the enclosing declaration.
    Parameter(Id),
    /// A named type alias, transparent to every query.
    Alias {
        name: Id,
        type_parameters: Vec<TypeParameter>,
        target: TypeId,
    },
    /// A generic type alias applied to type arguments. Resolves to the alias.
    Instantiation {
        alias: TypeId,
        type_arguments: Vec<TypeId>,
    },
    /// A named reference without a reachable declaration.
    Unresolved { name: Id, text: String },
}

/// A node of the type graph.
#[derive(Debug, Clone)]
pub struct TypeNode {
    kind: TypeKind,
}

impl TypeNode {
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }
}

/// An immutable graph of types and declarations for one run.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    units: Vec<String>,
    nodes: Vec<TypeNode>,
    interfaces: Vec<InterfaceDecl>,
    enums: Vec<EnumDecl>,
}

impl TypeGraph {
    /// Returns the names of the source units, in load order.
    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn unit_name(&self, unit: UnitId) -> &str {
        &self.units[unit.index()]
    }

    /// Returns all interface declarations in discovery order.
    pub fn interfaces(&self) -> &[InterfaceDecl] {
        &self.interfaces
    }

    pub fn interface(&self, id: InterfaceId) -> &InterfaceDecl {
        &self.interfaces[id.0 as usize]
    }

    /// Returns all enum declarations in discovery order.
    pub fn enums(&self) -> &[EnumDecl] {
        &self.enums
    }

    pub fn enum_decl(&self, id: EnumId) -> &EnumDecl {
        &self.enums[id.0 as usize]
    }

    pub fn node(&self, ty: TypeId) -> &TypeNode {
        &self.nodes[ty.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Follows alias nodes and alias instantiations until a node of any
    /// other kind is reached.
    ///
    /// Alias chains are acyclic in graphs produced by the front end; the walk
    /// is still bounded by the node count so that a malformed graph yields the
    /// last alias instead of looping.
    pub fn resolve(&self, ty: TypeId) -> TypeId {
        let mut current = ty;
        for _ in 0..=self.nodes.len() {
            match self.node(current).kind() {
                TypeKind::Alias { target, .. } => current = *target,
                TypeKind::Instantiation { alias, .. } => current = *alias,
                _ => return current,
            }
        }
        current
    }
}

/// Incremental constructor for a [`TypeGraph`].
///
/// Declarations are created in two steps so that mutually recursive types can
/// refer to each other: `declare_*` reserves a handle, `define_*` fills in the
/// body once every referenced handle exists.
#[derive(Debug, Default)]
pub struct TypeGraphBuilder {
    graph: TypeGraph,
}

impl TypeGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source unit and returns its handle.
    pub fn add_unit(&mut self, name: impl Into<String>) -> UnitId {
        self.graph.units.push(name.into());
        UnitId((self.graph.units.len() - 1) as u32)
    }

    /// Adds a node and returns its handle.
    pub fn add_type(&mut self, kind: TypeKind) -> TypeId {
        self.graph.nodes.push(TypeNode { kind });
        TypeId((self.graph.nodes.len() - 1) as u32)
    }

    /// Reserves a node whose kind is set later with [`Self::set_type`].
    pub fn reserve_type(&mut self) -> TypeId {
        self.add_type(TypeKind::Text(String::new()))
    }

    /// Replaces the kind of a previously added or reserved node.
    pub fn set_type(&mut self, ty: TypeId, kind: TypeKind) {
        self.graph.nodes[ty.index()].kind = kind;
    }

    /// Adds a [`TypeKind::Text`] node.
    pub fn text(&mut self, text: impl Into<String>) -> TypeId {
        self.add_type(TypeKind::Text(text.into()))
    }

    /// Adds a [`TypeKind::Array`] node.
    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.add_type(TypeKind::Array(element))
    }

    /// Adds a [`TypeKind::Union`] node.
    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        self.add_type(TypeKind::Union(members))
    }

    /// Adds a [`TypeKind::Intersection`] node.
    pub fn intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        self.add_type(TypeKind::Intersection(members))
    }

    /// Adds an anonymous object literal node.
    pub fn object(&mut self, properties: Vec<PropertyDecl>) -> TypeId {
        self.add_type(TypeKind::Object { properties })
    }

    /// Adds a reference to an interface without type arguments.
    pub fn interface_ref(&mut self, decl: InterfaceId) -> TypeId {
        self.add_type(TypeKind::Interface {
            decl,
            type_arguments: Vec::new(),
        })
    }

    /// Adds a reference to a type parameter.
    pub fn type_parameter(&mut self, name: Id) -> TypeId {
        self.add_type(TypeKind::Parameter(name))
    }

    /// Adds a reference to one member of an enum.
    pub fn enum_member_ref(&mut self, decl: EnumId, member: usize) -> TypeId {
        self.add_type(TypeKind::EnumMember { decl, member })
    }

    /// Reserves an interface declaration with no body.
    pub fn declare_interface(&mut self, name: Id, unit: UnitId) -> InterfaceId {
        let id = InterfaceId(self.graph.interfaces.len() as u32);
        self.graph.interfaces.push(InterfaceDecl {
            id,
            name,
            unit,
            type_parameters: Vec::new(),
            properties: Vec::new(),
            extends: Vec::new(),
            docs: Vec::new(),
        });
        id
    }

    /// Fills in the body of a declared interface.
    pub fn define_interface(
        &mut self,
        id: InterfaceId,
        properties: Vec<PropertyDecl>,
        extends: Vec<TypeId>,
        docs: Vec<DocComment>,
    ) {
        let decl = &mut self.graph.interfaces[id.0 as usize];
        decl.properties = properties;
        decl.extends = extends;
        decl.docs = docs;
    }

    /// Records the type parameters of a declared interface.
    pub fn set_type_parameters(&mut self, id: InterfaceId, type_parameters: Vec<TypeParameter>) {
        self.graph.interfaces[id.0 as usize].type_parameters = type_parameters;
    }

    /// Adds a complete enum declaration.
    pub fn add_enum(
        &mut self,
        name: Id,
        unit: UnitId,
        is_const: bool,
        members: Vec<EnumMember>,
        docs: Vec<DocComment>,
    ) -> EnumId {
        let id = EnumId(self.graph.enums.len() as u32);
        self.graph.enums.push(EnumDecl {
            id,
            name,
            unit,
            is_const,
            members,
            docs,
        });
        id
    }

    /// Returns the graph built so far, for lookups during construction.
    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    /// Finishes construction.
    pub fn build(self) -> TypeGraph {
        debug!(
            units = self.graph.units.len(),
            nodes = self.graph.nodes.len(),
            interfaces = self.graph.interfaces.len(),
            enums = self.graph.enums.len();
            "Type graph built"
        );
        self.graph
    }
}
