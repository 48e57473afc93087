#![deny(missing_docs)]
/*!
Core of `objreport`: static type descriptors, the [`Introspectable`] capability,
member resolution and the textual [`Reporter`].

Descriptors are generated in compile-time (see `objreport-macros`) or provided
by this crate for std types. Everything is meant to be consumed through
`&dyn Introspectable`, so the type of the inspected value may be erased.
*/

mod primitives;
mod report;
mod resolve;

pub use report::{
    generate_report, represent, Category, CategoryFilter, MatchMode, ReportOptions, Reporter,
    Section, UnknownCategory,
};
pub use resolve::{
    dir, getattr, members, mro, Attr, Member, MemberKind, TypeDescriptor, Visibility,
};

use std::any::Any;
use std::fmt::Debug;

/// Information about type fields (if there is any)
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Fields {
    /// Type is structure-like and has fields with names
    Named(&'static [Field]),

    /// Type is tuple-like, fields are exposed as members named by their index ("0", "1", ...)
    Indexed(&'static [Field]),

    /// Type is unit and doesn't have any fields
    Unit,
}

impl Fields {
    /// Fields in definition order
    pub fn as_slice(&self) -> &'static [Field] {
        match self {
            Fields::Named(fields) | Fields::Indexed(fields) => fields,
            Fields::Unit => &[],
        }
    }
}

/// Information about data contained within type
///
/// [`Data::Primitive`] is special case for fundamental rust types and std containers,
/// whose internals are not exposed as members.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Data {
    /// Fundamental type, which doesn't expose any fields
    Primitive,
    /// Struct-like, can be tuple struct or default struct
    Struct(Fields),
    /// Unit type, which means that type doesn't have any fields.
    Unit,
}

impl Data {
    /// Stored fields listed as members of the type
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Data::Struct(fields) => fields.as_slice(),
            Data::Primitive | Data::Unit => &[],
        }
    }
}

/// Field of type
///
/// Single structure for fields of tuple-like types and fields of structures
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Field {
    /// Member name of the field, index for tuple-like types
    pub name: &'static str,
    /// Associated info of field's type
    pub ty: &'static Type,
}

/// Invocable member of a type
///
/// Only the signature is recorded: reporting never calls anything.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Method {
    #[allow(missing_docs)]
    pub name: &'static str,
    /// Normalized signature, e.g. `fn(&self, x: i32) -> i32`
    pub signature: &'static str,
}

/// Information about type
///
/// if [`TypeInfo`] is implemented, comes as associated constant
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Type {
    /// Type name, exactly as in code (case and underscores are preserved)
    pub ident: &'static str,
    /// Fully qualified path, unique per type
    ///
    /// Two descriptors with equal paths describe the same type
    pub path: &'static str,
    /// Direct ancestors in declaration order
    ///
    /// Empty only for [`OBJECT`]; every other type reaches it through this list
    pub bases: &'static [&'static Type],
    /// Type of data that this type contains
    pub data: Data,
    /// Data members produced on read instead of borrowed from a field
    pub computed: &'static [&'static str],
    /// Invocable members declared on this type (not inherited ones)
    pub methods: &'static [Method],
}

impl Type {
    /// Whether this is the universal root of all ancestries
    pub fn is_root(&self) -> bool {
        self.bases.is_empty()
    }

    /// Method declared directly on this type
    pub fn method(&self, name: &str) -> Option<&'static Method> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Names of ancestors, in declaration order
    pub fn base_names(&self) -> Vec<&'static str> {
        self.bases.iter().map(|base| base.ident).collect()
    }
}

/// Universal root type
///
/// Contributes the members every value has: its type name, alignment, and
/// the reflective operations of [`Introspectable`] itself.
pub const OBJECT: Type = Type {
    ident: "Object",
    path: "objreport::Object",
    bases: &[],
    data: Data::Unit,
    computed: &["__align__", "__type__"],
    methods: &[
        Method {
            name: "__repr__",
            signature: "fn(&self) -> String",
        },
        Method {
            name: "__sizeof__",
            signature: "fn(&self) -> usize",
        },
        Method {
            name: "__type_info__",
            signature: "fn(&self) -> &'static Type",
        },
    ],
};

/// Lookup failure of a single member
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    /// Name is not accessible on the value
    #[error("`{ty}` has no member `{name}`")]
    NotFound {
        #[allow(missing_docs)]
        ty: &'static str,
        #[allow(missing_docs)]
        name: String,
    },
}

/// Failure of report generation
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// Size or ancestry of the value can't be determined
    #[error("metadata of `{ty}` is unavailable: {reason}")]
    MetadataUnavailable {
        #[allow(missing_docs)]
        ty: &'static str,
        #[allow(missing_docs)]
        reason: &'static str,
    },

    /// Enumerated member could not be resolved
    #[error(transparent)]
    Attribute(#[from] AttributeError),

    #[error("Failed to format report")]
    #[allow(missing_docs)]
    Fmt(#[from] std::fmt::Error),

    #[error("Failed to write report")]
    #[allow(missing_docs)]
    Io(#[from] std::io::Error),
}

/// Object-safe reflection capability
///
/// Implemented by `#[derive(Introspect)]` for user structs and by this crate for
/// primitives, strings, `Vec`, `Option` and fn pointers.
pub trait Introspectable: Any + Debug {
    /// Get [`Type`] information for this type
    ///
    /// Because it accepts reference to self, it can be called on [`dyn`] trait-objects
    fn get_type(&self) -> &'static Type;

    /// Borrow stored field by member name
    ///
    /// Covers own fields and fields inherited from embedded ancestors
    fn field(&self, name: &str) -> Option<&dyn Introspectable>;

    /// Produce data member which is not stored in a field
    fn computed(&self, name: &str) -> Option<Box<dyn Introspectable>> {
        let _ = name;
        None
    }

    /// Bytes owned on the heap, on top of the inline size
    ///
    /// Derived structs sum the heap bytes of their member and ancestor fields,
    /// skipped fields are not accounted. `None` if they can't be accounted
    fn heap_size(&self) -> Option<usize> {
        Some(0)
    }

    /// Whether the value itself can be invoked
    fn is_callable(&self) -> bool {
        false
    }
}

/// Static-type version of [`Introspectable`]
pub trait TypeInfo: Introspectable + Sized {
    #[allow(missing_docs)]
    const INFO: &'static Type;
}

/// Method table of a type, generated by the `#[methods]` attribute
pub trait HasMethods {
    #[allow(missing_docs)]
    const METHODS: &'static [Method];
}

mod __object_safety_check {
    use super::Introspectable;

    #[allow(dead_code)]
    fn __check_is_object_safe() -> Box<dyn Introspectable> {
        Box::new(100u32)
    }
}
