//! Run-start snapshot of every interface the provider knows about.

use log::{debug, warn};

use tsexplode_core::{graph::InterfaceDecl, provider::TypeGraphProvider};

/// Every interface declaration across all units, in discovery order.
///
/// Built once per run and passed by reference to the stages that need it.
#[derive(Debug)]
pub struct Discovery<'g> {
    interfaces: Vec<&'g InterfaceDecl>,
    duplicates: Vec<String>,
}

impl<'g> Discovery<'g> {
    /// Snapshot the provider's interfaces and report duplicate names.
    ///
    /// Each duplicated name is logged once at `warn` level. Duplicates never
    /// affect selection or rendering.
    pub fn new<P: TypeGraphProvider>(provider: &'g P) -> Self {
        let interfaces: Vec<&InterfaceDecl> = provider.interfaces().iter().collect();
        let duplicates = duplicate_names(&interfaces);

        for name in &duplicates {
            warn!(interface = name.as_str(); "Duplicate interface name");
        }
        debug!(
            interfaces = interfaces.len(),
            duplicates = duplicates.len();
            "Discovery snapshot built"
        );

        Self {
            interfaces,
            duplicates,
        }
    }

    /// Returns the interfaces in discovery order.
    pub fn interfaces(&self) -> &[&'g InterfaceDecl] {
        &self.interfaces
    }

    /// Returns each name declared by more than one interface, sorted.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

/// Sort the names and scan adjacent pairs; a run of equal names yields one entry.
fn duplicate_names(interfaces: &[&InterfaceDecl]) -> Vec<String> {
    let mut names: Vec<String> = interfaces.iter().map(|decl| decl.name().to_string()).collect();
    names.sort();

    let mut duplicates: Vec<String> = Vec::new();
    for pair in names.windows(2) {
        if pair[0] == pair[1] && duplicates.last() != Some(&pair[0]) {
            duplicates.push(pair[0].clone());
        }
    }
    duplicates
}
