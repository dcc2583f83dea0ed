//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type used for declaration names, enum member
//! names and type parameter names throughout the type graph.

use std::{
    cmp::Ordering,
    fmt,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use tsexplode_core::identifier::Id;
///
/// let contact = Id::new("Contact");
/// let member = Id::new("PhoneType").qualify(Id::new("CELL"));
/// assert_eq!(contact, "Contact");
/// assert_eq!(member, "PhoneType.CELL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Creates a qualified ID by joining this ID and `member` with a `.` separator.
    ///
    /// Used for enum member references such as `PhoneType.CELL`.
    pub fn qualify(&self, member: Id) -> Self {
        with_interner(|interner| {
            let parent = interner
                .resolve(self.0)
                .expect("Parent ID should exist in interner");
            let child = interner
                .resolve(member.0)
                .expect("Member ID should exist in interner");
            let qualified = format!("{parent}.{child}");
            Self(interner.get_or_intern(qualified))
        })
    }

    /// Compares two identifiers by their string contents.
    ///
    /// Symbol order reflects interning order, not lexical order, so sorting
    /// by name must go through this method.
    pub fn cmp_by_name(&self, other: &Id) -> Ordering {
        with_interner(|interner| {
            let lhs = interner.resolve(self.0).expect("Symbol should exist in interner");
            let rhs = interner.resolve(other.0).expect("Symbol should exist in interner");
            lhs.cmp(rhs)
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                .to_string()
        });
        f.write_str(&name)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .is_some_and(|name| name == other)
        })
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
