//! Syntax tree for the TypeScript declaration subset.
//!
//! Names carry their spans so elaboration can point diagnostics at them.
//! Type forms the flattener never looks inside (function types, tuples,
//! `keyof`, conditional types and the like) are kept as normalized text.

use tsexplode_core::identifier::Id;

use crate::span::{Span, Spanned};

/// A parsed source unit.
#[derive(Debug, Default)]
pub struct Module {
    /// Module specifiers of `import ... from "x"` and `export ... from "x"`,
    /// in source order.
    pub imports: Vec<Spanned<String>>,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug)]
pub enum Declaration {
    Interface(InterfaceDeclaration),
    TypeAlias(TypeAliasDeclaration),
    Enum(EnumDeclaration),
}

impl Declaration {
    pub fn name(&self) -> &Spanned<Id> {
        match self {
            Declaration::Interface(decl) => &decl.name,
            Declaration::TypeAlias(decl) => &decl.name,
            Declaration::Enum(decl) => &decl.name,
        }
    }
}

/// `interface Name<T> extends A, B { ... }`
#[derive(Debug)]
pub struct InterfaceDeclaration {
    pub name: Spanned<Id>,
    pub type_parameters: Vec<TypeParameter>,
    pub extends: Vec<TypeReference>,
    pub members: Vec<PropertySignature>,
    /// Raw JSDoc comments preceding the declaration, delimiters included.
    pub docs: Vec<String>,
}

/// `type Name<T> = ...;`
#[derive(Debug)]
pub struct TypeAliasDeclaration {
    pub name: Spanned<Id>,
    pub type_parameters: Vec<TypeParameter>,
    pub ty: TypeExpr,
    pub docs: Vec<String>,
}

/// `[const] enum Name { ... }`
#[derive(Debug)]
pub struct EnumDeclaration {
    pub name: Spanned<Id>,
    pub is_const: bool,
    pub members: Vec<EnumMemberDeclaration>,
    pub docs: Vec<String>,
}

#[derive(Debug)]
pub struct EnumMemberDeclaration {
    pub name: Spanned<String>,
    pub initializer: Option<Spanned<EnumInitializer>>,
}

/// The right-hand side of an enum member.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumInitializer {
    String(String),
    Number(f64),
    /// Any other expression, as normalized source text.
    Expression(String),
}

#[derive(Debug)]
pub struct TypeParameter {
    pub name: Spanned<Id>,
    pub constraint: Option<TypeExpr>,
    pub default: Option<TypeExpr>,
}

/// A property signature of an interface or object type literal.
#[derive(Debug)]
pub struct PropertySignature {
    /// The name as written; string-literal names keep (double) quotes.
    pub name: Spanned<String>,
    pub optional: bool,
    pub readonly: bool,
    pub ty: TypeExpr,
    pub docs: Vec<String>,
}

/// A possibly qualified name with type arguments: `ns.Name<A, B>`.
#[derive(Debug)]
pub struct TypeReference {
    pub segments: Vec<Spanned<Id>>,
    pub type_arguments: Vec<TypeExpr>,
    /// Normalized source text of the whole reference.
    pub text: String,
    pub span: Span,
}

impl TypeReference {
    /// Returns the single name of an unqualified reference.
    pub fn simple_name(&self) -> Option<Id> {
        match self.segments.as_slice() {
            [name] => Some(*name.inner()),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum TypeExpr {
    Reference(TypeReference),
    StringLiteral(Spanned<String>),
    /// `T[]`
    Array(Box<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    /// `{ a: T; b?: U }`
    Object(Vec<PropertySignature>),
    Parenthesized(Box<TypeExpr>),
    /// A form kept verbatim as normalized source text.
    Text(Spanned<String>),
}

impl TypeExpr {
    /// Strips any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &TypeExpr {
        match self {
            TypeExpr::Parenthesized(inner) => inner.unparenthesized(),
            other => other,
        }
    }
}
