//! Recursive flattening of type nodes into a render tree.
//!
//! The [`Flattener`] replaces every named reference with its structural
//! expansion. The result is a [`Rendered`] tree that the
//! [`CodeWriter`](crate::render::CodeWriter) serializes in a separate pass.
//!
//! Expansion is eager and never deduplicated: a type referenced twice is
//! expanded twice. Re-entering a named interface or anonymous object that is
//! already being expanded on the current path, with the same type arguments,
//! is a cycle.
//!
//! Generic references bind their type arguments in a scope that lives as long
//! as the expansion of the referenced declaration. A type parameter flattens
//! to whatever its scope bound, evaluated in the scope the argument was
//! written in. Parameters of an entry itself stay unbound and render as their
//! name.

use log::trace;

use tsexplode_core::{
    graph::{
        EnumMember, EnumValue, InterfaceDecl, InterfaceId, PropertyDecl, TypeId, TypeParameter,
    },
    identifier::Id,
    provider::TypeGraphProvider,
};

use crate::{
    classify::{ShapeClass, classify},
    config::{EnumMode, ExplodeConfig},
    error::ExplodeError,
    resolve::resolve_properties,
};

/// Nesting deeper than this only comes from a type that keeps growing as it
/// expands, such as `interface N<T> { next: N<T[]> }`.
const MAX_DEPTH: usize = 128;

/// A flattened type, ready to be serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Verbatim text: primitives, enum literals and every form without
    /// structure to expand.
    Text(String),
    /// `Array<` element `>`
    Array(Box<Rendered>),
    /// An object block with its properties in declaration order.
    Block(Vec<RenderedProperty>),
    /// Union constituents. Never directly contains another union.
    Union(Vec<Rendered>),
    /// Intersection constituents. Never directly contains another
    /// intersection.
    Intersection(Vec<Rendered>),
}

/// One property line of an object block.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedProperty {
    pub name: String,
    pub optional: bool,
    /// Doc comment lines, empty unless doc comments are carried over.
    pub docs: Vec<String>,
    pub ty: Rendered,
}

/// A type argument and the scope it was written in.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Binding {
    ty: TypeId,
    scope: Option<usize>,
}

type Bindings = Vec<(Id, Binding)>;

/// An expansion currently in progress, with the bindings it runs under.
#[derive(Debug)]
enum Frame {
    Interface(InterfaceId, Bindings, String),
    Object(TypeId, Bindings, String),
}

impl Frame {
    fn same_node(&self, other: &Frame) -> bool {
        match (self, other) {
            (Frame::Interface(a, a_bindings, _), Frame::Interface(b, b_bindings, _)) => {
                a == b && a_bindings == b_bindings
            }
            (Frame::Object(a, a_bindings, _), Frame::Object(b, b_bindings, _)) => {
                a == b && a_bindings == b_bindings
            }
            _ => false,
        }
    }

    fn same_declaration(&self, other: &Frame) -> bool {
        match (self, other) {
            (Frame::Interface(a, ..), Frame::Interface(b, ..)) => a == b,
            (Frame::Object(a, ..), Frame::Object(b, ..)) => a == b,
            _ => false,
        }
    }

    fn label(&self) -> &str {
        match self {
            Frame::Interface(.., label) | Frame::Object(.., label) => label,
        }
    }
}

/// Flattens type nodes of one provider.
pub struct Flattener<'p, P> {
    provider: &'p P,
    enum_mode: EnumMode,
    include_doc_comments: bool,
    path: Vec<Frame>,
    /// Bindings of every generic expansion in progress, innermost last.
    scopes: Vec<Bindings>,
    /// The scope type parameters are currently looked up in.
    current: Option<usize>,
    depth: usize,
}

impl<'p, P: TypeGraphProvider> Flattener<'p, P> {
    pub fn new(provider: &'p P, config: &ExplodeConfig) -> Self {
        Self {
            provider,
            enum_mode: config.enum_mode(),
            include_doc_comments: config.include_doc_comments(),
            path: Vec::new(),
            scopes: Vec::new(),
            current: None,
            depth: 0,
        }
    }

    /// Flatten an interface into the object block of its effective
    /// properties, own properties first.
    ///
    /// # Errors
    ///
    /// Returns the first error met anywhere in the expansion.
    pub fn flatten_interface(
        &mut self,
        decl: &'p InterfaceDecl,
    ) -> Result<Rendered, ExplodeError> {
        self.flatten_properties(decl).map(Rendered::Block)
    }

    /// Flatten the effective properties of an interface without wrapping
    /// them in a block. Its own type parameters are left unbound.
    ///
    /// # Errors
    ///
    /// Returns the first error met anywhere in the expansion.
    pub fn flatten_properties(
        &mut self,
        decl: &'p InterfaceDecl,
    ) -> Result<Vec<RenderedProperty>, ExplodeError> {
        self.with_scope(Vec::new(), |this| this.interface_block(decl))
    }

    /// Flatten a type node.
    ///
    /// # Errors
    ///
    /// - [`ExplodeError::UnresolvedInterface`] for a named reference without a
    ///   reachable declaration.
    /// - [`ExplodeError::UnresolvedAncestor`] for an interface extending an
    ///   unreachable one.
    /// - [`ExplodeError::NotAnEnumMember`] for an enum-shaped node that does
    ///   not denote a single member.
    /// - [`ExplodeError::CyclicTypeReference`] when the expansion re-enters
    ///   itself or keeps growing.
    pub fn flatten(&mut self, ty: TypeId) -> Result<Rendered, ExplodeError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.runaway(ty));
        }
        self.depth += 1;
        let result = self.flatten_node(ty);
        self.depth -= 1;
        result
    }

    fn flatten_node(&mut self, ty: TypeId) -> Result<Rendered, ExplodeError> {
        if let Some(instantiation) = self.provider.instantiation(ty) {
            let bindings = self.bind(instantiation.type_parameters, instantiation.type_arguments);
            return self.with_scope(bindings, |this| this.flatten(instantiation.alias));
        }

        match classify(self.provider, ty) {
            ShapeClass::Parameter(name) => self.flatten_parameter(ty, name),
            ShapeClass::Array(element) => Ok(Rendered::Array(Box::new(self.flatten(element)?))),
            ShapeClass::Interface(Some(decl)) => {
                let bindings = self.bind(decl.type_parameters(), self.provider.type_arguments(ty));
                self.with_scope(bindings, |this| this.interface_block(decl))
                    .map(Rendered::Block)
            }
            ShapeClass::Interface(None) => Err(ExplodeError::UnresolvedInterface(
                self.provider.type_text(ty),
            )),
            ShapeClass::Object(properties) => {
                let canonical = self.provider.canonical(ty);
                let label = self.provider.type_text(ty);
                self.enter(Frame::Object(canonical, self.current_bindings(), label))?;
                let result = self.block(properties.iter().map(|property| (property, &[][..])));
                self.path.pop();
                result.map(Rendered::Block)
            }
            ShapeClass::Union(members) => {
                let mut flat = Vec::with_capacity(members.len());
                for &member in members {
                    match self.flatten(member)? {
                        Rendered::Union(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                Ok(Rendered::Union(flat))
            }
            ShapeClass::Intersection(members) => {
                let mut flat = Vec::with_capacity(members.len());
                for &member in members {
                    match self.flatten(member)? {
                        Rendered::Intersection(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                Ok(Rendered::Intersection(flat))
            }
            ShapeClass::EnumLiteral(Some((_, member))) => {
                Ok(Rendered::Text(self.enum_literal(member)))
            }
            ShapeClass::EnumLiteral(None) => {
                Err(ExplodeError::NotAnEnumMember(self.provider.type_text(ty)))
            }
            ShapeClass::Text => Ok(Rendered::Text(self.provider.type_text(ty))),
        }
    }

    fn flatten_parameter(&mut self, ty: TypeId, name: Id) -> Result<Rendered, ExplodeError> {
        let unchanged = Binding {
            ty,
            scope: self.current,
        };
        match self.lookup(self.current, name) {
            Some(binding) if binding != unchanged => {
                let outer = std::mem::replace(&mut self.current, binding.scope);
                let result = self.flatten(binding.ty);
                self.current = outer;
                result
            }
            _ => {
                trace!(parameter = name.to_string(); "Unbound type parameter");
                Ok(Rendered::Text(name.to_string()))
            }
        }
    }

    /// Expands the effective properties of `decl` in the current scope.
    fn interface_block(
        &mut self,
        decl: &'p InterfaceDecl,
    ) -> Result<Vec<RenderedProperty>, ExplodeError> {
        let frame = Frame::Interface(decl.id(), self.current_bindings(), decl.name().to_string());
        self.enter(frame)?;
        let result = resolve_properties(self.provider, decl).and_then(|properties| {
            self.block(
                properties
                    .iter()
                    .map(|resolved| (resolved.property, resolved.heritage.as_slice())),
            )
        });
        self.path.pop();
        result
    }

    fn block<'a>(
        &mut self,
        properties: impl Iterator<Item = (&'a PropertyDecl, &'a [TypeId])>,
    ) -> Result<Vec<RenderedProperty>, ExplodeError> {
        let mut rendered = Vec::new();
        for (property, heritage) in properties {
            let docs = if self.include_doc_comments {
                property
                    .docs()
                    .iter()
                    .flat_map(|doc| doc.render_lines())
                    .collect()
            } else {
                Vec::new()
            };

            rendered.push(RenderedProperty {
                name: property.name().to_string(),
                optional: property.is_optional(),
                docs,
                ty: self.flatten_inherited(property, heritage)?,
            });
        }
        Ok(rendered)
    }

    /// Flattens an inherited property under the bindings of each `extends`
    /// reference leading to its declaring interface.
    fn flatten_inherited(
        &mut self,
        property: &PropertyDecl,
        heritage: &[TypeId],
    ) -> Result<Rendered, ExplodeError> {
        let Some((&parent, rest)) = heritage.split_first() else {
            return self.flatten(property.ty());
        };
        let parameters = self
            .provider
            .interface_declaration(parent)
            .map(InterfaceDecl::type_parameters)
            .unwrap_or_default();
        let bindings = self.bind(parameters, self.provider.type_arguments(parent));
        self.with_scope(bindings, |this| this.flatten_inherited(property, rest))
    }

    /// Pairs parameters with arguments for a scope about to be pushed.
    ///
    /// Arguments belong to the current scope. A missing argument falls back
    /// to the parameter default, which belongs to the new scope; without a
    /// default the parameter stays unbound.
    fn bind(&self, parameters: &[TypeParameter], arguments: &[TypeId]) -> Bindings {
        let scope = self.scopes.len();
        parameters
            .iter()
            .enumerate()
            .filter_map(|(position, parameter)| {
                let binding = match arguments.get(position) {
                    Some(&ty) => self.chase(Binding {
                        ty,
                        scope: self.current,
                    }),
                    None => Binding {
                        ty: parameter.default()?,
                        scope: Some(scope),
                    },
                };
                Some((parameter.name(), binding))
            })
            .collect()
    }

    /// Follows a binding through parameters bound to other parameters, so
    /// equal instantiations carry equal bindings.
    fn chase(&self, mut binding: Binding) -> Binding {
        while let Some(next) = self
            .provider
            .type_parameter(binding.ty)
            .and_then(|name| self.lookup(binding.scope, name))
        {
            if next == binding {
                break;
            }
            binding = next;
        }
        binding
    }

    fn lookup(&self, scope: Option<usize>, name: Id) -> Option<Binding> {
        self.scopes
            .get(scope?)?
            .iter()
            .find(|(bound, _)| *bound == name)
            .map(|(_, binding)| *binding)
    }

    fn current_bindings(&self) -> Bindings {
        self.current
            .and_then(|scope| self.scopes.get(scope))
            .cloned()
            .unwrap_or_default()
    }

    fn with_scope<T>(
        &mut self,
        bindings: Bindings,
        expand: impl FnOnce(&mut Self) -> Result<T, ExplodeError>,
    ) -> Result<T, ExplodeError> {
        self.scopes.push(bindings);
        let outer = self.current.replace(self.scopes.len() - 1);
        let result = expand(self);
        self.current = outer;
        self.scopes.pop();
        result
    }

    fn enum_literal(&self, member: &EnumMember) -> String {
        match self.enum_mode {
            EnumMode::Name => member.name().to_string(),
            EnumMode::Value => match member.value() {
                EnumValue::String(value) => format!("\"{value}\""),
                value => value.to_string(),
            },
        }
    }

    fn enter(&mut self, frame: Frame) -> Result<(), ExplodeError> {
        if let Some(start) = self.path.iter().position(|open| open.same_node(&frame)) {
            let mut path: Vec<String> = self.path[start..]
                .iter()
                .map(|open| open.label().to_string())
                .collect();
            path.push(frame.label().to_string());
            return Err(ExplodeError::CyclicTypeReference { path });
        }

        trace!(depth = self.path.len(), node = frame.label(); "Expanding");
        self.path.push(frame);
        Ok(())
    }

    /// The error for an expansion past [`MAX_DEPTH`]: the path between the
    /// first two open expansions of one declaration.
    fn runaway(&self, ty: TypeId) -> ExplodeError {
        for (end, frame) in self.path.iter().enumerate() {
            if let Some(start) = self.path[..end]
                .iter()
                .position(|open| open.same_declaration(frame))
            {
                let path = self.path[start..=end]
                    .iter()
                    .map(|open| open.label().to_string())
                    .collect();
                return ExplodeError::CyclicTypeReference { path };
            }
        }
        ExplodeError::CyclicTypeReference {
            path: vec![self.provider.type_text(ty)],
        }
    }
}

#[cfg(test)]
mod tests {
    use tsexplode_core::graph::TypeGraph;
    use tsexplode_parser::build_graph;

    use super::*;

    fn graph(source: &str) -> TypeGraph {
        build_graph(&[("test.ts", source)]).expect("source should elaborate")
    }

    fn interface<'g>(graph: &'g TypeGraph, name: &str) -> &'g InterfaceDecl {
        graph
            .interfaces()
            .iter()
            .find(|decl| decl.name() == name)
            .expect("interface should exist")
    }

    fn flatten_entry(
        graph: &TypeGraph,
        name: &str,
        config: &ExplodeConfig,
    ) -> Result<Rendered, ExplodeError> {
        Flattener::new(graph, config).flatten_interface(interface(graph, name))
    }

    fn block(rendered: Rendered) -> Vec<RenderedProperty> {
        match rendered {
            Rendered::Block(properties) => properties,
            other => panic!("Expected a block, got {other:?}"),
        }
    }

    fn text(value: &str) -> Rendered {
        Rendered::Text(value.to_string())
    }

    fn field(name: &str, ty: Rendered) -> RenderedProperty {
        RenderedProperty {
            name: name.to_string(),
            optional: false,
            docs: vec![],
            ty,
        }
    }

    #[test]
    fn test_array_wraps_the_element_block() {
        let graph = graph(
            r#"
            interface T { a: string; b: number }
            interface Holder { one: T; many: T[] }
            "#,
        );

        let properties = block(flatten_entry(&graph, "Holder", &ExplodeConfig::default()).unwrap());
        assert_eq!(properties[1].ty, Rendered::Array(Box::new(properties[0].ty.clone())));
    }

    #[test]
    fn test_enum_value_and_name_modes() {
        let graph = graph(
            r#"
            enum PhoneType { CALL = "CELL", BUSINESS = "BUSINESS", HOME = "HOME" }
            enum Level { Low, High = 10 }
            interface Phone { type: PhoneType; level: Level.High }
            "#,
        );

        let by_value = block(flatten_entry(&graph, "Phone", &ExplodeConfig::default()).unwrap());
        assert_eq!(
            by_value[0].ty,
            Rendered::Union(vec![text("\"CELL\""), text("\"BUSINESS\""), text("\"HOME\"")])
        );
        assert_eq!(by_value[1].ty, text("10"));

        let config = ExplodeConfig::default().with_enum_mode(EnumMode::Name);
        let by_name = block(flatten_entry(&graph, "Phone", &config).unwrap());
        assert_eq!(
            by_name[0].ty,
            Rendered::Union(vec![text("CALL"), text("BUSINESS"), text("HOME")])
        );
        assert_eq!(by_name[1].ty, text("High"));
    }

    #[test]
    fn test_union_and_intersection_flatten_each_constituent() {
        let graph = graph(
            r#"
            interface X { x: string }
            interface Y { y: number }
            interface Both { either: X | Y; all: X & Y }
            "#,
        );

        let properties = block(flatten_entry(&graph, "Both", &ExplodeConfig::default()).unwrap());
        let x = Rendered::Block(vec![RenderedProperty {
            name: "x".into(),
            optional: false,
            docs: vec![],
            ty: text("string"),
        }]);
        let y = Rendered::Block(vec![RenderedProperty {
            name: "y".into(),
            optional: false,
            docs: vec![],
            ty: text("number"),
        }]);
        assert_eq!(properties[0].ty, Rendered::Union(vec![x.clone(), y.clone()]));
        assert_eq!(properties[1].ty, Rendered::Intersection(vec![x, y]));
    }

    #[test]
    fn test_enum_inside_union_is_spliced() {
        let graph = graph(
            r#"
            enum P { A = 'a', B = 'b' }
            type Level = 'low' | 'high';
            interface X { p: P | null; level?: Level | undefined }
            "#,
        );

        let properties = block(flatten_entry(&graph, "X", &ExplodeConfig::default()).unwrap());
        assert_eq!(
            properties[0].ty,
            Rendered::Union(vec![text("\"a\""), text("\"b\""), text("null")])
        );
        assert_eq!(
            properties[1].ty,
            Rendered::Union(vec![text("\"low\""), text("\"high\""), text("undefined")])
        );
    }

    #[test]
    fn test_intersection_alias_inside_intersection_is_spliced() {
        let graph = graph(
            r#"
            interface A { a: string }
            interface B { b: string }
            interface C { c: string }
            type AB = A & B;
            interface X { all: AB & C }
            "#,
        );

        let properties = block(flatten_entry(&graph, "X", &ExplodeConfig::default()).unwrap());
        match &properties[0].ty {
            Rendered::Intersection(members) => {
                assert_eq!(members.len(), 3);
                assert!(members.iter().all(|member| matches!(member, Rendered::Block(_))));
            }
            other => panic!("Expected an intersection, got {other:?}"),
        }
    }

    #[test]
    fn test_type_arguments_are_substituted() {
        let graph = graph(
            r#"
            interface G<T> { v: T }
            interface X { g: G<string>; many: G<number>[] }
            "#,
        );

        let properties = block(flatten_entry(&graph, "X", &ExplodeConfig::default()).unwrap());
        assert_eq!(properties[0].ty, Rendered::Block(vec![field("v", text("string"))]));
        assert_eq!(
            properties[1].ty,
            Rendered::Array(Box::new(Rendered::Block(vec![field("v", text("number"))])))
        );
    }

    #[test]
    fn test_arguments_pass_through_nested_generics() {
        let graph = graph(
            r#"
            interface W<T> { v: T }
            interface P<U> { w: W<U> }
            interface X { p: P<P<string>> }
            "#,
        );

        let properties = block(flatten_entry(&graph, "X", &ExplodeConfig::default()).unwrap());
        let inner = Rendered::Block(vec![field(
            "w",
            Rendered::Block(vec![field("v", text("string"))]),
        )]);
        let expected = Rendered::Block(vec![field(
            "w",
            Rendered::Block(vec![field("v", inner)]),
        )]);
        assert_eq!(properties[0].ty, expected);
    }

    #[test]
    fn test_generic_alias_defaults_and_inherited_arguments() {
        let graph = graph(
            r#"
            type Pair<K, V = K[]> = { key: K; value: V };
            interface Base<T> { id: T }
            interface Item extends Base<number> { pair: Pair<boolean> }
            interface X { item: Item }
            "#,
        );

        let properties = block(flatten_entry(&graph, "X", &ExplodeConfig::default()).unwrap());
        let pair = Rendered::Block(vec![
            field("key", text("boolean")),
            field("value", Rendered::Array(Box::new(text("boolean")))),
        ]);
        assert_eq!(
            properties[0].ty,
            Rendered::Block(vec![field("pair", pair), field("id", text("number"))])
        );
    }

    #[test]
    fn test_entry_type_parameters_stay_unbound() {
        let graph = graph("interface Box<T> { value: T }");

        let properties = block(flatten_entry(&graph, "Box", &ExplodeConfig::default()).unwrap());
        assert_eq!(properties[0].ty, text("T"));
    }

    #[test]
    fn test_generic_self_reference_is_a_cycle() {
        let graph = graph(
            r#"
            interface N<T> { value: T; next?: N<T> }
            interface X { n: N<string> }
            "#,
        );

        let err = flatten_entry(&graph, "X", &ExplodeConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ExplodeError::CyclicTypeReference { ref path } if path == &["N", "N"]
        ));
    }

    #[test]
    fn test_growing_instantiation_is_a_cycle() {
        let graph = graph(
            r#"
            interface Grow<T> { next?: Grow<T[]> }
            interface X { g: Grow<string> }
            "#,
        );

        let err = flatten_entry(&graph, "X", &ExplodeConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ExplodeError::CyclicTypeReference { ref path } if path == &["Grow", "Grow"]
        ));
    }

    #[test]
    fn test_nested_interfaces_inline_inherited_properties() {
        let graph = graph(
            r#"
            interface Base { id: string }
            interface Tag extends Base { name: string }
            interface Post { tag: Tag }
            "#,
        );

        let properties = block(flatten_entry(&graph, "Post", &ExplodeConfig::default()).unwrap());
        let tag = block(properties[0].ty.clone());
        let names: Vec<&str> = tag.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "id"]);
    }

    #[test]
    fn test_repeated_references_are_expanded_every_time() {
        let graph = graph(
            r#"
            interface Point { x: number }
            interface Line { from: Point; to: Point }
            "#,
        );

        let properties = block(flatten_entry(&graph, "Line", &ExplodeConfig::default()).unwrap());
        assert!(matches!(properties[0].ty, Rendered::Block(_)));
        assert_eq!(properties[0].ty, properties[1].ty);
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let graph = graph("interface Node { value: string; children?: Node[] }");

        let err = flatten_entry(&graph, "Node", &ExplodeConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ExplodeError::CyclicTypeReference { ref path } if path == &["Node", "Node"]
        ));
    }

    #[test]
    fn test_object_alias_cycle() {
        let graph = graph(
            r#"
            type List = { head: string; tail?: List };
            interface Holder { list: List }
            "#,
        );

        let err = flatten_entry(&graph, "Holder", &ExplodeConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ExplodeError::CyclicTypeReference { ref path } if path == &["List", "List"]
        ));
    }

    #[test]
    fn test_unresolved_reference() {
        let graph = graph("interface Holder { missing: Missing }");

        let err = flatten_entry(&graph, "Holder", &ExplodeConfig::default()).unwrap_err();
        assert!(matches!(err, ExplodeError::UnresolvedInterface(ref name) if name == "Missing"));
    }

    #[test]
    fn test_enum_with_computed_member_is_not_a_member() {
        let graph = graph(
            r#"
            enum Flags { A = 1 << 0, B = 1 << 1 }
            interface Holder { flags: Flags }
            "#,
        );

        let err = flatten_entry(&graph, "Holder", &ExplodeConfig::default()).unwrap_err();
        assert!(matches!(err, ExplodeError::NotAnEnumMember(ref name) if name == "Flags"));
    }

    #[test]
    fn test_fallback_text_and_optional_flag() {
        let graph = graph(
            r#"
            type Id = string;
            interface Holder {
                id?: Id;
                created: Date;
                callback: (value: string) => void;
            }
            "#,
        );

        let properties = block(flatten_entry(&graph, "Holder", &ExplodeConfig::default()).unwrap());
        assert!(properties[0].optional);
        assert_eq!(properties[0].ty, text("string"));
        assert_eq!(properties[1].ty, text("Date"));
        assert_eq!(properties[2].ty, text("(value: string) => void"));
    }

    #[test]
    fn test_property_docs_only_when_enabled() {
        let graph = graph(
            r#"
            interface Holder {
                /** The identifier. */
                id: string;
            }
            "#,
        );

        let without = block(flatten_entry(&graph, "Holder", &ExplodeConfig::default()).unwrap());
        assert!(without[0].docs.is_empty());

        let config = ExplodeConfig::default().with_doc_comments(true);
        let with = block(flatten_entry(&graph, "Holder", &config).unwrap());
        assert_eq!(with[0].docs, vec!["/** The identifier. */".to_string()]);
    }
}
