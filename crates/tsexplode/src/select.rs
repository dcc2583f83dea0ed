//! Entry selection.

use log::debug;

use tsexplode_core::graph::InterfaceDecl;

/// Keep the interfaces whose doc comments carry the `marker` tag, in the
/// order given.
pub fn select_entries<'g>(
    interfaces: &[&'g InterfaceDecl],
    marker: &str,
) -> Vec<&'g InterfaceDecl> {
    let entries: Vec<&InterfaceDecl> = interfaces
        .iter()
        .copied()
        .filter(|decl| decl.docs().iter().any(|doc| doc.has_tag(marker)))
        .collect();

    debug!(
        marker,
        candidates = interfaces.len(),
        selected = entries.len();
        "Entries selected"
    );
    entries
}
