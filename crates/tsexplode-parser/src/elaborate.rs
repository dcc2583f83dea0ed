//! Elaboration phase: syntax trees to a [`TypeGraph`]
//!
//! All source units are elaborated together. Names live in one global table
//! where the first declaration wins, so a reference in one unit can resolve
//! to an interface, alias or enum declared in any other.
//!
//! Elaboration runs in three passes:
//!
//! 1. **Declare** - reserve a handle for every interface and alias, evaluate
//!    enum member values.
//! 2. **Check** - reject type aliases that resolve to themselves.
//! 3. **Lower** - turn every type expression into type graph nodes.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, info, trace};
use petgraph::{algo::tarjan_scc, graph::DiGraph};

use tsexplode_core::{
    docs::DocComment,
    graph::{
        EnumId, EnumMember, EnumValue, InterfaceId, PropertyDecl, TypeGraph, TypeGraphBuilder,
        TypeId, TypeKind, TypeParameter, UnitId,
    },
    identifier::Id,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, UnitError},
    parser_types as types,
    span::Spanned,
    tokens::write_quoted,
};

/// Keyword types and literal keywords, rendered verbatim.
const KEYWORD_TYPES: &[&str] = &[
    "any",
    "unknown",
    "never",
    "void",
    "undefined",
    "null",
    "string",
    "number",
    "boolean",
    "bigint",
    "symbol",
    "object",
    "true",
    "false",
    "this",
    "intrinsic",
];

/// Global types from the standard library, rendered verbatim instead of
/// being expanded.
const GLOBAL_TYPES: &[&str] = &[
    "Array",
    "ArrayBuffer",
    "ArrayLike",
    "AsyncGenerator",
    "AsyncIterable",
    "AsyncIterableIterator",
    "Awaited",
    "BigInt",
    "Boolean",
    "Capitalize",
    "ConstructorParameters",
    "DataView",
    "Date",
    "Error",
    "Exclude",
    "Extract",
    "Float32Array",
    "Float64Array",
    "Function",
    "Generator",
    "InstanceType",
    "Int8Array",
    "Int16Array",
    "Int32Array",
    "Iterable",
    "IterableIterator",
    "Iterator",
    "Lowercase",
    "Map",
    "NoInfer",
    "NonNullable",
    "Number",
    "Object",
    "Omit",
    "Parameters",
    "Partial",
    "Pick",
    "Promise",
    "PromiseLike",
    "ReadonlyArray",
    "ReadonlyMap",
    "ReadonlySet",
    "Readonly",
    "Record",
    "RegExp",
    "Required",
    "ReturnType",
    "Set",
    "String",
    "Symbol",
    "ThisType",
    "Uint8Array",
    "Uint8ClampedArray",
    "Uint16Array",
    "Uint32Array",
    "Uncapitalize",
    "Uppercase",
    "URL",
    "WeakMap",
    "WeakSet",
];

/// A declared name in the global table.
#[derive(Debug, Clone, Copy)]
enum Symbol {
    Interface(InterfaceId),
    /// Index into [`Builder::aliases`].
    Alias(usize),
    Enum(EnumId),
}

/// A type alias awaiting lowering.
#[derive(Clone, Copy)]
struct PendingAlias<'a> {
    unit: usize,
    decl: &'a types::TypeAliasDeclaration,
    node: TypeId,
}

/// An interface awaiting lowering.
#[derive(Clone, Copy)]
struct PendingInterface<'a> {
    unit: usize,
    decl: &'a types::InterfaceDeclaration,
    id: InterfaceId,
}

/// Builds a [`TypeGraph`] from parsed source units.
pub struct Builder<'a> {
    units: &'a [(String, types::Module)],
    graph: TypeGraphBuilder,
    names: IndexMap<Id, Symbol>,
    aliases: Vec<PendingAlias<'a>>,
    interfaces: Vec<PendingInterface<'a>>,
    /// Union types standing for whole literal enums, built on first use.
    enum_unions: HashMap<EnumId, TypeId>,
    collectors: Vec<DiagnosticCollector>,
}

impl<'a> Builder<'a> {
    pub fn new(units: &'a [(String, types::Module)]) -> Self {
        Self {
            units,
            graph: TypeGraphBuilder::new(),
            names: IndexMap::new(),
            aliases: Vec::new(),
            interfaces: Vec::new(),
            enum_unions: HashMap::new(),
            collectors: units.iter().map(|_| DiagnosticCollector::new()).collect(),
        }
    }

    // ============================================================================
    // Main Entry Methods
    // ============================================================================

    pub fn build(mut self) -> Result<TypeGraph, UnitError> {
        debug!(units = self.units.len(); "Elaborating source units");

        let units = self.units;
        for (index, (name, module)) in units.iter().enumerate() {
            let unit = self.graph.add_unit(name.as_str());
            self.declare_unit(index, unit, module);
        }

        self.check_alias_cycles();
        if self.collectors.iter().any(DiagnosticCollector::has_errors) {
            self.finish()?;
        }

        for index in 0..self.aliases.len() {
            self.lower_alias(index);
        }
        for index in 0..self.interfaces.len() {
            self.lower_interface(index);
        }

        self.finish()?;

        let graph = self.graph.build();
        info!(
            interfaces = graph.interfaces().len(),
            enums = graph.enums().len();
            "Elaboration completed successfully"
        );
        Ok(graph)
    }

    /// Drains the collectors, reporting the first unit with errors.
    fn finish(&mut self) -> Result<(), UnitError> {
        for (index, collector) in std::mem::take(&mut self.collectors).into_iter().enumerate() {
            collector
                .finish()
                .map_err(|error| UnitError::new(index, error))?;
        }
        Ok(())
    }

    fn emit(&mut self, unit: usize, diagnostic: Diagnostic) {
        self.collectors[unit].emit(diagnostic);
    }

    // ============================================================================
    // Declaration Pass
    // ============================================================================

    fn declare_unit(&mut self, index: usize, unit: UnitId, module: &'a types::Module) {
        trace!(unit = index, declarations = module.declarations.len(); "Declaring unit");

        for declaration in &module.declarations {
            match declaration {
                types::Declaration::Interface(decl) => {
                    let id = self.graph.declare_interface(*decl.name.inner(), unit);
                    self.interfaces.push(PendingInterface {
                        unit: index,
                        decl,
                        id,
                    });
                    // Duplicate interfaces are reported by discovery
                    self.names
                        .entry(*decl.name.inner())
                        .or_insert(Symbol::Interface(id));
                }
                types::Declaration::TypeAlias(decl) => {
                    let node = self.graph.reserve_type();
                    self.aliases.push(PendingAlias {
                        unit: index,
                        decl,
                        node,
                    });
                    let symbol = Symbol::Alias(self.aliases.len() - 1);
                    self.declare_name(index, &decl.name, symbol);
                }
                types::Declaration::Enum(decl) => {
                    let members = self.evaluate_enum(index, decl);
                    let docs = parse_docs(&decl.docs);
                    let id = self.graph.add_enum(
                        *decl.name.inner(),
                        unit,
                        decl.is_const,
                        members,
                        docs,
                    );
                    self.declare_name(index, &decl.name, Symbol::Enum(id));
                }
            }
        }
    }

    /// Adds a name to the global table, warning when it is already taken.
    fn declare_name(&mut self, unit: usize, name: &Spanned<Id>, symbol: Symbol) {
        if self.names.contains_key(name.inner()) {
            self.emit(unit, Diagnostic::duplicate_declaration(name, name.span()));
            return;
        }
        self.names.insert(*name.inner(), symbol);
    }

    /// Computes member values the way TypeScript does: numeric members
    /// without an initializer continue from the previous member.
    fn evaluate_enum(&mut self, unit: usize, decl: &types::EnumDeclaration) -> Vec<EnumMember> {
        let mut members: Vec<EnumMember> = Vec::with_capacity(decl.members.len());

        for member in &decl.members {
            let name = Id::new(member.name.inner());
            let value = match &member.initializer {
                Some(initializer) => match initializer.inner() {
                    types::EnumInitializer::String(value) => EnumValue::String(value.clone()),
                    types::EnumInitializer::Number(value) => EnumValue::Number(*value),
                    types::EnumInitializer::Expression(text) => {
                        constant_reference(decl, &members, text)
                            .unwrap_or_else(|| EnumValue::Computed(text.clone()))
                    }
                },
                None => match members.last() {
                    None => EnumValue::Number(0.0),
                    Some(previous) => match previous.value() {
                        EnumValue::Number(value) => EnumValue::Number(value + 1.0),
                        EnumValue::Computed(_) => {
                            EnumValue::Computed(format!("{} + 1", previous.name()))
                        }
                        EnumValue::String(_) => {
                            self.emit(
                                unit,
                                Diagnostic::missing_enum_initializer(
                                    &member.name,
                                    member.name.span(),
                                ),
                            );
                            EnumValue::Computed(member.name.inner().clone())
                        }
                    },
                },
            };
            members.push(EnumMember::new(name, value));
        }

        trace!(name = decl.name.to_string(), members = members.len(); "Evaluated enum");
        members
    }

    // ============================================================================
    // Alias Cycle Check
    // ============================================================================

    /// The alias a type alias refers to directly, without any structure in
    /// between: `type A = B;`
    fn direct_alias_target(&self, alias: &PendingAlias<'_>) -> Option<usize> {
        let types::TypeExpr::Reference(reference) = alias.decl.ty.unparenthesized() else {
            return None;
        };
        let name = reference.simple_name()?;
        let shadowed = alias
            .decl
            .type_parameters
            .iter()
            .any(|parameter| *parameter.name.inner() == name);
        if shadowed {
            return None;
        }
        match self.names.get(&name) {
            Some(Symbol::Alias(target)) => Some(*target),
            _ => None,
        }
    }

    fn check_alias_cycles(&mut self) {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<_> = (0..self.aliases.len())
            .map(|index| graph.add_node(index))
            .collect();
        for (index, alias) in self.aliases.iter().enumerate() {
            if let Some(target) = self.direct_alias_target(alias) {
                graph.add_edge(nodes[index], nodes[target], ());
            }
        }

        for component in tarjan_scc(&graph) {
            let cyclic = component.len() > 1
                || component
                    .first()
                    .is_some_and(|node| graph.contains_edge(*node, *node));
            if !cyclic {
                continue;
            }

            let mut names: Vec<String> = component
                .iter()
                .map(|node| self.aliases[graph[*node]].decl.name.to_string())
                .collect();
            names.sort();

            for node in &component {
                let alias = &self.aliases[graph[*node]];
                let (unit, name) = (alias.unit, &alias.decl.name);
                let diagnostic = Diagnostic::circular_alias(name, name.span(), &names);
                self.emit(unit, diagnostic);
            }
        }
    }

    // ============================================================================
    // Lowering Pass
    // ============================================================================

    fn lower_alias(&mut self, index: usize) {
        let decl = self.aliases[index].decl;
        let node = self.aliases[index].node;
        let scope: Vec<Id> = decl
            .type_parameters
            .iter()
            .map(|parameter| *parameter.name.inner())
            .collect();

        let type_parameters = self.lower_type_parameters(&decl.type_parameters, &scope);
        let target = self.lower(&decl.ty, &scope);
        self.graph.set_type(
            node,
            TypeKind::Alias {
                name: *decl.name.inner(),
                type_parameters,
                target,
            },
        );
    }

    fn lower_interface(&mut self, index: usize) {
        let PendingInterface { unit, decl, id } = self.interfaces[index];
        let scope: Vec<Id> = decl
            .type_parameters
            .iter()
            .map(|parameter| *parameter.name.inner())
            .collect();

        let type_parameters = self.lower_type_parameters(&decl.type_parameters, &scope);
        self.graph.set_type_parameters(id, type_parameters);

        let properties = self.lower_properties(&decl.members, &scope);
        let extends = decl
            .extends
            .iter()
            .map(|reference| self.lower_reference(reference, &scope))
            .collect();
        self.graph
            .define_interface(id, properties, extends, parse_docs(&decl.docs));

        trace!(
            unit,
            name = decl.name.to_string(),
            properties = decl.members.len();
            "Lowered interface"
        );
    }

    /// Lowers parameter defaults in the declaration's own scope, so a default
    /// may mention the parameters before it: `<T, U = T[]>`.
    fn lower_type_parameters(
        &mut self,
        parameters: &[types::TypeParameter],
        scope: &[Id],
    ) -> Vec<TypeParameter> {
        parameters
            .iter()
            .map(|parameter| {
                let lowered = TypeParameter::new(*parameter.name.inner());
                match &parameter.default {
                    Some(default) => lowered.with_default(self.lower(default, scope)),
                    None => lowered,
                }
            })
            .collect()
    }

    fn lower_properties(
        &mut self,
        members: &[types::PropertySignature],
        scope: &[Id],
    ) -> Vec<PropertyDecl> {
        members
            .iter()
            .map(|member| {
                let ty = self.lower(&member.ty, scope);
                PropertyDecl::new(member.name.inner().as_str(), ty)
                    .with_optional(member.optional)
                    .with_readonly(member.readonly)
                    .with_docs(parse_docs(&member.docs))
            })
            .collect()
    }

    fn lower(&mut self, ty: &types::TypeExpr, scope: &[Id]) -> TypeId {
        match ty {
            types::TypeExpr::Reference(reference) => self.lower_reference(reference, scope),
            types::TypeExpr::StringLiteral(value) => {
                let mut text = String::new();
                let _ = write_quoted(&mut text, value.inner());
                self.graph.text(text)
            }
            types::TypeExpr::Array(element) => {
                let element = self.lower(element, scope);
                self.graph.array(element)
            }
            types::TypeExpr::Union(members) => {
                let mut lowered = Vec::with_capacity(members.len());
                self.lower_flattened(members, scope, &mut lowered, |ty| match ty {
                    types::TypeExpr::Union(members) => Some(members),
                    _ => None,
                });
                self.graph.union(lowered)
            }
            types::TypeExpr::Intersection(members) => {
                let mut lowered = Vec::with_capacity(members.len());
                self.lower_flattened(members, scope, &mut lowered, |ty| match ty {
                    types::TypeExpr::Intersection(members) => Some(members),
                    _ => None,
                });
                self.graph.intersection(lowered)
            }
            types::TypeExpr::Object(properties) => {
                let properties = self.lower_properties(properties, scope);
                self.graph.object(properties)
            }
            types::TypeExpr::Parenthesized(inner) => self.lower(inner, scope),
            types::TypeExpr::Text(text) => self.graph.text(text.inner().as_str()),
        }
    }

    /// Lowers the members of a union or intersection, splicing in members of
    /// parenthesized operands of the same kind: `A | (B | C)` has three
    /// members.
    fn lower_flattened(
        &mut self,
        members: &[types::TypeExpr],
        scope: &[Id],
        lowered: &mut Vec<TypeId>,
        nested: fn(&types::TypeExpr) -> Option<&Vec<types::TypeExpr>>,
    ) {
        for member in members {
            match nested(member.unparenthesized()) {
                Some(inner) => self.lower_flattened(inner, scope, lowered, nested),
                None => lowered.push(self.lower(member, scope)),
            }
        }
    }

    fn lower_reference(&mut self, reference: &types::TypeReference, scope: &[Id]) -> TypeId {
        match reference.segments.as_slice() {
            [name] => self.lower_simple_reference(reference, *name.inner(), scope),
            [enum_name, member] => {
                let member_name = *member.inner();
                let found = match self.names.get(enum_name.inner()) {
                    Some(Symbol::Enum(decl)) => {
                        let decl = *decl;
                        self.graph
                            .graph()
                            .enum_decl(decl)
                            .members()
                            .iter()
                            .position(|member| member.name() == member_name)
                            .map(|index| (decl, index))
                    }
                    _ => None,
                };
                match found {
                    Some((decl, index)) => self.graph.enum_member_ref(decl, index),
                    None => self.unresolved(reference),
                }
            }
            _ => self.unresolved(reference),
        }
    }

    fn lower_simple_reference(
        &mut self,
        reference: &types::TypeReference,
        name: Id,
        scope: &[Id],
    ) -> TypeId {
        if scope.contains(&name) {
            return self.graph.type_parameter(name);
        }

        if let Some(symbol) = self.names.get(&name).copied() {
            return match symbol {
                Symbol::Interface(decl) => {
                    let type_arguments = reference
                        .type_arguments
                        .iter()
                        .map(|argument| self.lower(argument, scope))
                        .collect();
                    self.graph.add_type(TypeKind::Interface {
                        decl,
                        type_arguments,
                    })
                }
                Symbol::Alias(index) => self.alias_reference(reference, index, scope),
                Symbol::Enum(decl) => self.enum_type(decl),
            };
        }

        let text = name.to_string();
        if let ("Array" | "ReadonlyArray", [element]) =
            (text.as_str(), reference.type_arguments.as_slice())
        {
            let element = self.lower(element, scope);
            return self.graph.array(element);
        }
        if KEYWORD_TYPES.contains(&text.as_str()) || GLOBAL_TYPES.contains(&text.as_str()) {
            return self.graph.text(reference.text.as_str());
        }

        self.unresolved(reference)
    }

    /// A plain alias is referenced by its node; a generic one through an
    /// instantiation carrying the written arguments.
    fn alias_reference(
        &mut self,
        reference: &types::TypeReference,
        index: usize,
        scope: &[Id],
    ) -> TypeId {
        let PendingAlias { decl, node, .. } = self.aliases[index];
        if decl.type_parameters.is_empty() {
            return node;
        }
        let type_arguments = reference
            .type_arguments
            .iter()
            .map(|argument| self.lower(argument, scope))
            .collect();
        self.graph.add_type(TypeKind::Instantiation {
            alias: node,
            type_arguments,
        })
    }

    /// The type an enum name denotes: the union of its members when every
    /// member is a literal, the enum itself otherwise.
    fn enum_type(&mut self, decl: EnumId) -> TypeId {
        if let Some(ty) = self.enum_unions.get(&decl) {
            return *ty;
        }

        let enum_decl = self.graph.graph().enum_decl(decl);
        let (is_union, member_count) = (enum_decl.is_union_enum(), enum_decl.members().len());
        let ty = if is_union {
            let members = (0..member_count)
                .map(|index| self.graph.enum_member_ref(decl, index))
                .collect();
            self.graph.union(members)
        } else {
            self.graph.add_type(TypeKind::Enum(decl))
        };
        self.enum_unions.insert(decl, ty);
        ty
    }

    fn unresolved(&mut self, reference: &types::TypeReference) -> TypeId {
        debug!(reference = reference.text.as_str(); "Unresolved type reference");
        let name = reference
            .segments
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(".");
        self.graph.add_type(TypeKind::Unresolved {
            name: Id::new(&name),
            text: reference.text.clone(),
        })
    }
}

/// Resolves an initializer that names an earlier member of the same enum,
/// as `B = A` or `B = E.A`, to that member's value.
fn constant_reference(
    decl: &types::EnumDeclaration,
    members: &[EnumMember],
    text: &str,
) -> Option<EnumValue> {
    let enum_name = decl.name.to_string();
    let name = match text.split_once('.') {
        Some((qualifier, name)) if qualifier == enum_name => name,
        Some(_) => return None,
        None => text,
    };
    members
        .iter()
        .find(|member| member.name() == name)
        .map(|member| member.value().clone())
}

fn parse_docs(raw: &[String]) -> Vec<DocComment> {
    raw.iter().map(|doc| DocComment::parse(doc)).collect()
}

/// Elaborate parsed source units into a type graph.
///
/// Units are given as `(name, module)` pairs in load order; errors carry the
/// index of the unit their spans point into.
pub fn elaborate(units: &[(String, types::Module)]) -> Result<TypeGraph, UnitError> {
    Builder::new(units).build()
}
