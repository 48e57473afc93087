use std::collections::BTreeSet;
use std::mem;
use std::ptr;

use crate::{AttributeError, Introspectable, Method, ReportError, Type};

const MAX_ANCESTRY_DEPTH: usize = 64;

/// Naming-convention visibility of a member
///
/// Purely advisory: private members are reachable like any other
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Visibility {
    #[allow(missing_docs)]
    Public,
    /// Name starts with [`Visibility::PRIVATE_PREFIX`]
    Private,
}

impl Visibility {
    /// Leading marker of private member names
    pub const PRIVATE_PREFIX: &'static str = "__";

    /// Classify member by its name
    pub fn of(name: &str) -> Self {
        if name.starts_with(Self::PRIVATE_PREFIX) {
            Visibility::Private
        } else {
            Visibility::Public
        }
    }
}

/// Whether member holds data or can be invoked
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MemberKind {
    #[allow(missing_docs)]
    Data,
    #[allow(missing_docs)]
    Invocable,
}

/// Resolved member, see [`getattr`]
#[derive(Debug)]
pub enum Attr<'a> {
    /// Borrowed stored field
    Value(&'a dyn Introspectable),
    /// Value produced on read
    Computed(Box<dyn Introspectable>),
    /// Method of the type or one of its ancestors
    Method(&'static Method),
}

impl<'a> Attr<'a> {
    /// Callability test: methods always, values only if they are callable themselves
    pub fn is_callable(&self) -> bool {
        match self.as_value() {
            Some(value) => value.is_callable(),
            None => true,
        }
    }

    /// Underlying value, unless this is a method
    pub fn as_value(&self) -> Option<&dyn Introspectable> {
        match self {
            Attr::Value(value) => Some(*value),
            Attr::Computed(value) => Some(value.as_ref()),
            Attr::Method(_) => None,
        }
    }

    /// Runtime type label of the member, `<type 'i32'>` or `<method 'fn(&self)'>`
    pub fn type_label(&self) -> String {
        match self {
            Attr::Value(value) => format!("<type '{}'>", value.get_type().ident),
            Attr::Computed(value) => format!("<type '{}'>", value.get_type().ident),
            Attr::Method(method) => format!("<method '{}'>", method.signature),
        }
    }
}

/// Single entry of member enumeration along with its classification
#[derive(Debug)]
pub struct Member<'a> {
    #[allow(missing_docs)]
    pub name: &'static str,
    #[allow(missing_docs)]
    pub attr: Attr<'a>,
    #[allow(missing_docs)]
    pub visibility: Visibility,
    #[allow(missing_docs)]
    pub kind: MemberKind,
}

impl<'a> Member<'a> {
    /// Classify resolved member
    pub fn new(name: &'static str, attr: Attr<'a>) -> Self {
        let kind = if attr.is_callable() {
            MemberKind::Invocable
        } else {
            MemberKind::Data
        };

        Self {
            name,
            visibility: Visibility::of(name),
            kind,
            attr,
        }
    }
}

/// Metadata of a value, computed fresh on every call
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TypeDescriptor {
    #[allow(missing_docs)]
    pub name: &'static str,
    /// Direct ancestors, in declaration order
    pub bases: Vec<&'static str>,
    /// Inline size plus owned heap bytes
    pub footprint: usize,
}

impl TypeDescriptor {
    /// Describe the value
    ///
    /// Fails with [`ReportError::MetadataUnavailable`] if ancestry can't be linearized
    /// or the footprint can't be accounted
    pub fn of(value: &dyn Introspectable) -> Result<Self, ReportError> {
        let ty = value.get_type();
        mro(ty)?;

        let heap = value
            .heap_size()
            .ok_or(ReportError::MetadataUnavailable {
                ty: ty.ident,
                reason: "heap size can't be accounted",
            })?;
        let footprint = mem::size_of_val(value)
            .checked_add(heap)
            .ok_or(ReportError::MetadataUnavailable {
                ty: ty.ident,
                reason: "footprint overflows usize",
            })?;

        Ok(Self {
            name: ty.ident,
            bases: ty.base_names(),
            footprint,
        })
    }
}

fn same_type(a: &Type, b: &Type) -> bool {
    ptr::eq(a, b) || a.path == b.path
}

fn visit(
    ty: &'static Type,
    path: &mut Vec<&'static Type>,
    order: &mut Vec<&'static Type>,
) -> Result<(), ReportError> {
    if path.len() >= MAX_ANCESTRY_DEPTH || path.iter().any(|seen| same_type(seen, ty)) {
        return Err(ReportError::MetadataUnavailable {
            ty: ty.ident,
            reason: "ancestry is cyclic or too deep",
        });
    }
    if order.iter().any(|seen| same_type(seen, ty)) {
        return Ok(());
    }

    order.push(ty);
    path.push(ty);
    for base in ty.bases {
        visit(base, path, order)?;
    }
    path.pop();

    Ok(())
}

/// Linearized ancestry of `ty`, starting with `ty` itself
///
/// Depth-first in declaration order, every type once, root last
pub fn mro(ty: &'static Type) -> Result<Vec<&'static Type>, ReportError> {
    let mut order = Vec::new();
    visit(ty, &mut Vec::new(), &mut order)?;

    let (roots, mut linear): (Vec<_>, Vec<_>) = order.into_iter().partition(|ty| ty.is_root());
    linear.extend(roots);
    Ok(linear)
}

/// Every member name accessible on the value, own and inherited
///
/// Sorted and deduplicated
pub fn dir(value: &dyn Introspectable) -> Result<Vec<&'static str>, ReportError> {
    let mut names = BTreeSet::new();

    for ty in mro(value.get_type())? {
        names.extend(ty.data.fields().iter().map(|field| field.name));
        names.extend(ty.computed.iter().copied());
        names.extend(ty.methods.iter().map(|method| method.name));
    }

    Ok(names.into_iter().collect())
}

fn intrinsic(value: &dyn Introspectable, name: &str) -> Option<Box<dyn Introspectable>> {
    match name {
        "__type__" => Some(Box::new(value.get_type().ident) as Box<dyn Introspectable>),
        "__align__" => Some(Box::new(mem::align_of_val(value)) as Box<dyn Introspectable>),
        _ => None,
    }
}

/// Resolve member by name
///
/// Stored fields win over methods, methods over computed values
pub fn getattr<'a>(value: &'a dyn Introspectable, name: &str) -> Result<Attr<'a>, ReportError> {
    if let Some(field) = value.field(name) {
        return Ok(Attr::Value(field));
    }

    for ty in mro(value.get_type())? {
        if let Some(method) = ty.method(name) {
            return Ok(Attr::Method(method));
        }
    }

    if let Some(computed) = value.computed(name).or_else(|| intrinsic(value, name)) {
        return Ok(Attr::Computed(computed));
    }

    Err(AttributeError::NotFound {
        ty: value.get_type().ident,
        name: name.to_owned(),
    }
    .into())
}

/// Enumerate and classify all members of the value
pub fn members(value: &dyn Introspectable) -> Result<Vec<Member<'_>>, ReportError> {
    let mut members = Vec::new();
    for name in dir(value)? {
        members.push(Member::new(name, getattr(value, name)?));
    }
    Ok(members)
}
