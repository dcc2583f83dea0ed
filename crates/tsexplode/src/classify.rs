//! Shape classification of type nodes.
//!
//! The provider's predicates overlap: an array also answers `is_interface`
//! and `is_object`, and an interface reference answers `is_object`. The
//! classifier applies them in a fixed priority order and resolves the
//! accessors of the winning class, so the flattener only ever matches on a
//! closed [`ShapeClass`].

use log::trace;

use tsexplode_core::{
    graph::{EnumDecl, EnumMember, InterfaceDecl, PropertyDecl, TypeId},
    identifier::Id,
    provider::TypeGraphProvider,
};

/// The structural category of a type node.
#[derive(Debug, Clone, Copy)]
pub enum ShapeClass<'p> {
    /// A type parameter, substituted by whatever its reference bound.
    Parameter(Id),
    /// `T[]`, with its element node.
    Array(TypeId),
    /// A named interface reference. `None` when no declaration is reachable.
    Interface(Option<&'p InterfaceDecl>),
    /// An anonymous object type with its own declared properties.
    Object(&'p [PropertyDecl]),
    Union(&'p [TypeId]),
    Intersection(&'p [TypeId]),
    /// An enum-shaped node. `None` when it does not denote a single member.
    EnumLiteral(Option<(&'p EnumDecl, &'p EnumMember)>),
    /// Anything else, rendered by its provider text.
    Text,
}

/// Classify `ty`. First match wins:
/// type parameter, array, named interface, plain object, union,
/// intersection, enum member literal, text.
pub fn classify<P: TypeGraphProvider>(provider: &P, ty: TypeId) -> ShapeClass<'_> {
    let class = if let Some(name) = provider.type_parameter(ty) {
        ShapeClass::Parameter(name)
    } else if provider.is_array(ty) {
        match provider.array_element(ty) {
            Some(element) => ShapeClass::Array(element),
            None => ShapeClass::Text,
        }
    } else if provider.is_interface(ty) {
        ShapeClass::Interface(provider.interface_declaration(ty))
    } else if provider.is_object(ty) {
        match provider.object_properties(ty) {
            Some(properties) => ShapeClass::Object(properties),
            None => ShapeClass::Text,
        }
    } else if provider.is_union(ty) {
        ShapeClass::Union(provider.union_members(ty).unwrap_or_default())
    } else if provider.is_intersection(ty) {
        ShapeClass::Intersection(provider.intersection_members(ty).unwrap_or_default())
    } else if provider.is_enum_literal(ty) {
        ShapeClass::EnumLiteral(provider.enum_member(ty))
    } else {
        ShapeClass::Text
    };

    trace!(ty:?, class:?; "Classified type node");
    class
}
