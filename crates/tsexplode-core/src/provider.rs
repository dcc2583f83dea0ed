//! The query interface consumed by the flattener.
//!
//! [`TypeGraphProvider`] exposes the structural predicates and accessors the
//! flattening engine needs, without committing to how the type graph is
//! stored. [`TypeGraph`] is the in-memory implementation used by the
//! TypeScript front end.
//!
//! The predicates deliberately overlap the way a compiler's type queries do:
//! an array is also interface-like and object-like, and an interface
//! reference is object-like. Callers that need a single answer must apply a
//! fixed priority order.

use crate::{
    graph::{
        EnumDecl, EnumMember, InterfaceDecl, PropertyDecl, TypeGraph, TypeId, TypeKind,
        TypeParameter,
    },
    identifier::Id,
};

/// A generic type alias applied to type arguments.
#[derive(Debug, Clone, Copy)]
pub struct Instantiation<'a> {
    /// The alias node. Its canonical identity is the alias body.
    pub alias: TypeId,
    pub type_parameters: &'a [TypeParameter],
    pub type_arguments: &'a [TypeId],
}

/// Read-only access to a type graph for one run.
pub trait TypeGraphProvider {
    /// Returns every interface declaration across all source units, in discovery order.
    fn interfaces(&self) -> &[InterfaceDecl];

    /// Returns every enum declaration across all source units, in discovery order.
    fn enums(&self) -> &[EnumDecl];

    /// Returns `true` for array types.
    fn is_array(&self, ty: TypeId) -> bool;

    /// Returns the element type of an array.
    fn array_element(&self, ty: TypeId) -> Option<TypeId>;

    /// Returns `true` for interface-like types, including arrays and named
    /// references whose declaration could not be found.
    fn is_interface(&self, ty: TypeId) -> bool;

    /// Returns the interface declaration a reference points to, if one is reachable.
    fn interface_declaration(&self, ty: TypeId) -> Option<&InterfaceDecl>;

    /// Returns `true` for object-like types: arrays, interfaces and object literals.
    fn is_object(&self, ty: TypeId) -> bool;

    /// Returns the directly declared properties of an anonymous object literal.
    fn object_properties(&self, ty: TypeId) -> Option<&[PropertyDecl]>;

    fn is_union(&self, ty: TypeId) -> bool;

    /// Returns union constituents in declaration order.
    fn union_members(&self, ty: TypeId) -> Option<&[TypeId]>;

    fn is_intersection(&self, ty: TypeId) -> bool;

    /// Returns intersection constituents in declaration order.
    fn intersection_members(&self, ty: TypeId) -> Option<&[TypeId]>;

    /// Returns `true` for enum-shaped types, whether or not they denote a
    /// single member.
    fn is_enum_literal(&self, ty: TypeId) -> bool;

    /// Returns the enum and the specific member a literal denotes.
    fn enum_member(&self, ty: TypeId) -> Option<(&EnumDecl, &EnumMember)>;

    /// Returns the name of a type parameter reference.
    fn type_parameter(&self, ty: TypeId) -> Option<Id>;

    /// Returns the type arguments of an interface reference, in order.
    fn type_arguments(&self, ty: TypeId) -> &[TypeId];

    /// Returns the generic alias application reached from `ty` through plain
    /// aliases, if any.
    fn instantiation(&self, ty: TypeId) -> Option<Instantiation<'_>>;

    /// Returns the textual representation of a type.
    fn type_text(&self, ty: TypeId) -> String;

    /// Returns an alias-free identity for a type node.
    ///
    /// Two handles with the same canonical identity denote the same structure.
    fn canonical(&self, ty: TypeId) -> TypeId;
}

impl TypeGraphProvider for TypeGraph {
    fn interfaces(&self) -> &[InterfaceDecl] {
        TypeGraph::interfaces(self)
    }

    fn enums(&self) -> &[EnumDecl] {
        TypeGraph::enums(self)
    }

    fn is_array(&self, ty: TypeId) -> bool {
        matches!(self.kind_of(ty), TypeKind::Array(_))
    }

    fn array_element(&self, ty: TypeId) -> Option<TypeId> {
        match self.kind_of(ty) {
            TypeKind::Array(element) => Some(*element),
            _ => None,
        }
    }

    fn is_interface(&self, ty: TypeId) -> bool {
        matches!(
            self.kind_of(ty),
            TypeKind::Array(_) | TypeKind::Interface { .. } | TypeKind::Unresolved { .. }
        )
    }

    fn interface_declaration(&self, ty: TypeId) -> Option<&InterfaceDecl> {
        match self.kind_of(ty) {
            TypeKind::Interface { decl, .. } => Some(self.interface(*decl)),
            _ => None,
        }
    }

    fn is_object(&self, ty: TypeId) -> bool {
        matches!(
            self.kind_of(ty),
            TypeKind::Array(_) | TypeKind::Interface { .. } | TypeKind::Object { .. }
        )
    }

    fn object_properties(&self, ty: TypeId) -> Option<&[PropertyDecl]> {
        match self.kind_of(ty) {
            TypeKind::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    fn is_union(&self, ty: TypeId) -> bool {
        matches!(self.kind_of(ty), TypeKind::Union(_))
    }

    fn union_members(&self, ty: TypeId) -> Option<&[TypeId]> {
        match self.kind_of(ty) {
            TypeKind::Union(members) => Some(members),
            _ => None,
        }
    }

    fn is_intersection(&self, ty: TypeId) -> bool {
        matches!(self.kind_of(ty), TypeKind::Intersection(_))
    }

    fn intersection_members(&self, ty: TypeId) -> Option<&[TypeId]> {
        match self.kind_of(ty) {
            TypeKind::Intersection(members) => Some(members),
            _ => None,
        }
    }

    fn is_enum_literal(&self, ty: TypeId) -> bool {
        matches!(
            self.kind_of(ty),
            TypeKind::EnumMember { .. } | TypeKind::Enum(_)
        )
    }

    fn enum_member(&self, ty: TypeId) -> Option<(&EnumDecl, &EnumMember)> {
        match self.kind_of(ty) {
            TypeKind::EnumMember { decl, member } => {
                let decl = self.enum_decl(*decl);
                decl.members().get(*member).map(|member| (decl, member))
            }
            _ => None,
        }
    }

    fn type_parameter(&self, ty: TypeId) -> Option<Id> {
        match self.kind_of(ty) {
            TypeKind::Parameter(name) => Some(*name),
            _ => None,
        }
    }

    fn type_arguments(&self, ty: TypeId) -> &[TypeId] {
        match self.kind_of(ty) {
            TypeKind::Interface { type_arguments, .. } => type_arguments,
            _ => &[],
        }
    }

    fn instantiation(&self, ty: TypeId) -> Option<Instantiation<'_>> {
        let mut current = ty;
        for _ in 0..=self.node_count() {
            match self.node(current).kind() {
                TypeKind::Alias { target, .. } => current = *target,
                TypeKind::Instantiation {
                    alias,
                    type_arguments,
                } => {
                    let type_parameters = match self.node(*alias).kind() {
                        TypeKind::Alias {
                            type_parameters, ..
                        } => type_parameters.as_slice(),
                        _ => &[],
                    };
                    return Some(Instantiation {
                        alias: *alias,
                        type_parameters,
                        type_arguments,
                    });
                }
                _ => return None,
            }
        }
        None
    }

    fn type_text(&self, ty: TypeId) -> String {
        type_text(self, ty)
    }

    fn canonical(&self, ty: TypeId) -> TypeId {
        self.resolve(ty)
    }
}

impl TypeGraph {
    fn kind_of(&self, ty: TypeId) -> &TypeKind {
        self.node(self.resolve(ty)).kind()
    }
}

/// Renders the textual representation of a node the way a compiler would
/// print the type.
pub(crate) fn type_text(graph: &TypeGraph, ty: TypeId) -> String {
    match graph.node(ty).kind() {
        TypeKind::Text(text) => text.clone(),
        TypeKind::Parameter(name) => name.to_string(),
        TypeKind::Alias { name, target, .. } => match graph.node(graph.resolve(*target)).kind() {
            TypeKind::Text(text) => text.clone(),
            _ => name.to_string(),
        },
        TypeKind::Instantiation {
            alias,
            type_arguments,
        } => {
            let name = match graph.node(*alias).kind() {
                TypeKind::Alias { name, .. } => name.to_string(),
                _ => type_text(graph, *alias),
            };
            format!("{name}<{}>", join_text(graph, type_arguments, ", "))
        }
        TypeKind::Array(element) => {
            let element_text = type_text(graph, *element);
            let needs_parens = matches!(
                graph.node(graph.resolve(*element)).kind(),
                TypeKind::Union(_) | TypeKind::Intersection(_)
            ) && !matches!(
                graph.node(*element).kind(),
                TypeKind::Alias { .. } | TypeKind::Instantiation { .. }
            );
            if needs_parens {
                format!("({element_text})[]")
            } else {
                format!("{element_text}[]")
            }
        }
        TypeKind::Interface {
            decl,
            type_arguments,
        } => {
            let name = graph.interface(*decl).name();
            if type_arguments.is_empty() {
                name.to_string()
            } else {
                let arguments: Vec<String> = type_arguments
                    .iter()
                    .map(|argument| type_text(graph, *argument))
                    .collect();
                format!("{name}<{}>", arguments.join(", "))
            }
        }
        TypeKind::Object { properties } => object_text(graph, properties),
        TypeKind::Union(members) => join_text(graph, members, " | "),
        TypeKind::Intersection(members) => join_text(graph, members, " & "),
        TypeKind::EnumMember { decl, member } => {
            let decl = graph.enum_decl(*decl);
            match decl.members().get(*member) {
                Some(member) => decl.name().qualify(member.name()).to_string(),
                None => decl.name().to_string(),
            }
        }
        TypeKind::Enum(decl) => graph.enum_decl(*decl).name().to_string(),
        TypeKind::Unresolved { text, .. } => text.clone(),
    }
}

/// Prints an object literal the way the compiler does: `{ a: T; b?: U; }`
fn object_text(graph: &TypeGraph, properties: &[PropertyDecl]) -> String {
    if properties.is_empty() {
        return "{}".to_string();
    }
    let members: Vec<String> = properties
        .iter()
        .map(|property| {
            let optional = if property.is_optional() { "?" } else { "" };
            let ty = type_text(graph, property.ty());
            format!("{}{optional}: {};", property.name(), ty)
        })
        .collect();
    format!("{{ {} }}", members.join(" "))
}

fn join_text(graph: &TypeGraph, members: &[TypeId], separator: &str) -> String {
    members
        .iter()
        .map(|member| type_text(graph, *member))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::{EnumValue, TypeGraphBuilder},
        identifier::Id,
    };

    fn phone_type(builder: &mut TypeGraphBuilder) -> (TypeId, Vec<TypeId>) {
        let unit = builder.add_unit("phone.ts");
        let decl = builder.add_enum(
            Id::new("PhoneType"),
            unit,
            false,
            vec![
                EnumMember::new(Id::new("CALL"), EnumValue::String("CELL".into())),
                EnumMember::new(Id::new("BUSINESS"), EnumValue::String("BUSINESS".into())),
            ],
            vec![],
        );
        let members = vec![
            builder.enum_member_ref(decl, 0),
            builder.enum_member_ref(decl, 1),
        ];
        (builder.union(members.clone()), members)
    }

    #[test]
    fn test_array_is_interface_and_object() {
        let mut builder = TypeGraphBuilder::new();
        let string = builder.text("string");
        let array = builder.array(string);
        let graph = builder.build();

        assert!(graph.is_array(array));
        assert!(graph.is_interface(array));
        assert!(graph.is_object(array));
        assert_eq!(graph.array_element(array), Some(string));
        assert!(graph.interface_declaration(array).is_none());
        assert_eq!(graph.type_text(array), "string[]");
    }

    #[test]
    fn test_alias_is_transparent() {
        let mut builder = TypeGraphBuilder::new();
        let string = builder.text("string");
        let uuid = builder.add_type(TypeKind::Alias {
            name: Id::new("UUID"),
            type_parameters: Vec::new(),
            target: string,
        });
        let tag_object = builder.object(vec![PropertyDecl::new("name", string)]);
        let tag = builder.add_type(TypeKind::Alias {
            name: Id::new("Tag"),
            type_parameters: Vec::new(),
            target: tag_object,
        });
        let graph = builder.build();

        assert_eq!(graph.type_text(uuid), "string");
        assert_eq!(graph.canonical(uuid), string);
        assert!(graph.is_object(tag));
        assert!(!graph.is_interface(tag));
        assert_eq!(graph.object_properties(tag).map(<[_]>::len), Some(1));
        assert_eq!(graph.type_text(tag), "Tag");
        assert_eq!(graph.type_text(tag_object), "{ name: string; }");
    }

    #[test]
    fn test_enum_member_queries() {
        let mut builder = TypeGraphBuilder::new();
        let (union, members) = phone_type(&mut builder);
        let graph = builder.build();

        assert!(graph.is_union(union));
        assert_eq!(graph.union_members(union), Some(members.as_slice()));
        assert!(graph.is_enum_literal(members[0]));

        let (decl, member) = graph.enum_member(members[0]).expect("member literal");
        assert_eq!(decl.name(), "PhoneType");
        assert_eq!(member.name(), "CALL");
        assert_eq!(member.value(), &EnumValue::String("CELL".into()));
        assert_eq!(graph.type_text(union), "PhoneType.CALL | PhoneType.BUSINESS");
    }

    #[test]
    fn test_enum_type_has_no_member() {
        let mut builder = TypeGraphBuilder::new();
        let unit = builder.add_unit("flags.ts");
        let decl = builder.add_enum(
            Id::new("Flags"),
            unit,
            false,
            vec![EnumMember::new(
                Id::new("A"),
                EnumValue::Computed("1 << 0".into()),
            )],
            vec![],
        );
        let flags = builder.add_type(TypeKind::Enum(decl));
        let graph = builder.build();

        assert!(graph.is_enum_literal(flags));
        assert!(graph.enum_member(flags).is_none());
        assert_eq!(graph.type_text(flags), "Flags");
    }

    #[test]
    fn test_unresolved_reference_is_interface_like() {
        let mut builder = TypeGraphBuilder::new();
        let missing = builder.add_type(TypeKind::Unresolved {
            name: Id::new("Missing"),
            text: "Missing".into(),
        });
        let graph = builder.build();

        assert!(graph.is_interface(missing));
        assert!(!graph.is_object(missing));
        assert!(graph.interface_declaration(missing).is_none());
        assert_eq!(graph.type_text(missing), "Missing");
    }

    #[test]
    fn test_intersection_and_union_array_text() {
        let mut builder = TypeGraphBuilder::new();
        let string = builder.text("string");
        let number = builder.text("number");
        let union = builder.union(vec![string, number]);
        let array = builder.array(union);
        let intersection = builder.intersection(vec![string, number]);
        let graph = builder.build();

        assert_eq!(graph.type_text(array), "(string | number)[]");
        assert!(graph.is_intersection(intersection));
        assert_eq!(
            graph.intersection_members(intersection),
            Some([string, number].as_slice())
        );
        assert_eq!(graph.type_text(intersection), "string & number");
    }

    #[test]
    fn test_generic_queries() {
        let mut builder = TypeGraphBuilder::new();
        let unit = builder.add_unit("page.ts");
        let string = builder.text("string");
        let page = builder.declare_interface(Id::new("Page"), unit);
        let page_of_string = builder.add_type(TypeKind::Interface {
            decl: page,
            type_arguments: vec![string],
        });

        let parameter = builder.type_parameter(Id::new("T"));
        let body = builder.object(vec![PropertyDecl::new("value", parameter)]);
        let boxed = builder.add_type(TypeKind::Alias {
            name: Id::new("Boxed"),
            type_parameters: vec![TypeParameter::new(Id::new("T")).with_default(string)],
            target: body,
        });
        let applied = builder.add_type(TypeKind::Instantiation {
            alias: boxed,
            type_arguments: vec![string],
        });
        let named = builder.add_type(TypeKind::Alias {
            name: Id::new("Named"),
            type_parameters: Vec::new(),
            target: applied,
        });
        let graph = builder.build();

        assert_eq!(graph.type_arguments(page_of_string), [string]);
        assert_eq!(graph.type_text(page_of_string), "Page<string>");
        assert_eq!(graph.type_parameter(parameter), Some(Id::new("T")));
        assert_eq!(graph.type_text(parameter), "T");
        assert!(!graph.is_interface(parameter));

        let instantiation = graph.instantiation(named).expect("alias leads to an application");
        assert_eq!(instantiation.alias, boxed);
        assert_eq!(instantiation.type_arguments, [string]);
        assert_eq!(instantiation.type_parameters[0].default(), Some(string));
        assert_eq!(graph.type_text(applied), "Boxed<string>");
        assert_eq!(graph.canonical(applied), body);
        assert!(graph.instantiation(body).is_none());
    }
}
