//! Effective property lists of interfaces.

use log::trace;

use tsexplode_core::{
    graph::{InterfaceDecl, PropertyDecl, TypeId},
    provider::TypeGraphProvider,
};

use crate::error::ExplodeError;

/// A property of an interface's effective property list.
#[derive(Debug, Clone)]
pub struct ResolvedProperty<'p> {
    pub property: &'p PropertyDecl,
    /// The `extends` references leading to the declaring interface; empty for
    /// own properties. Type arguments of each one are written in the scope of
    /// the interface before it.
    pub heritage: Vec<TypeId>,
}

/// Returns the full ordered property list of `interface`.
///
/// Own properties come first in declaration order, followed by the effective
/// properties of each extended interface in extension-list order. Properties
/// repeated along the chain are all kept.
///
/// # Errors
///
/// - [`ExplodeError::UnresolvedAncestor`] if an extension entry does not name
///   a reachable interface.
/// - [`ExplodeError::CyclicTypeReference`] if an interface extends itself,
///   directly or indirectly.
pub fn resolve_properties<'p, P: TypeGraphProvider>(
    provider: &'p P,
    interface: &'p InterfaceDecl,
) -> Result<Vec<ResolvedProperty<'p>>, ExplodeError> {
    let mut properties = Vec::new();
    let mut chain = Vec::new();
    collect(provider, interface, &mut chain, &mut Vec::new(), &mut properties)?;
    trace!(
        interface = interface.name().to_string(),
        properties = properties.len();
        "Resolved properties"
    );
    Ok(properties)
}

fn collect<'p, P: TypeGraphProvider>(
    provider: &'p P,
    interface: &'p InterfaceDecl,
    chain: &mut Vec<&'p InterfaceDecl>,
    heritage: &mut Vec<TypeId>,
    properties: &mut Vec<ResolvedProperty<'p>>,
) -> Result<(), ExplodeError> {
    if chain.iter().any(|seen| seen.id() == interface.id()) {
        return Err(cycle_error(chain, interface));
    }

    properties.extend(
        interface
            .properties()
            .iter()
            .map(|property| ResolvedProperty {
                property,
                heritage: heritage.clone(),
            }),
    );

    chain.push(interface);
    for &parent in interface.extends() {
        let ancestor = provider.interface_declaration(parent).ok_or_else(|| {
            ExplodeError::UnresolvedAncestor {
                interface: interface.name().to_string(),
                ancestor: provider.type_text(parent),
            }
        })?;
        heritage.push(parent);
        collect(provider, ancestor, chain, heritage, properties)?;
        heritage.pop();
    }
    chain.pop();

    Ok(())
}

/// The path runs from the first occurrence of `repeated` back to itself.
fn cycle_error(chain: &[&InterfaceDecl], repeated: &InterfaceDecl) -> ExplodeError {
    let mut path: Vec<String> = chain
        .iter()
        .skip_while(|decl| decl.id() != repeated.id())
        .map(|decl| decl.name().to_string())
        .collect();
    path.push(repeated.name().to_string());
    ExplodeError::CyclicTypeReference { path }
}
