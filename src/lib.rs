/*!
Human-readable reports on the members of run-time values

Given any value implementing [`Introspectable`], a [`Reporter`] prints its type,
ancestors, approximate memory footprint and its members, split into public and
private data and public and private methods. Members whose name starts with `__`
are considered private.

Descriptors of your own types are generated in compile-time with
[`macro@Introspect`], methods are picked up with [`macro@methods`].

# Examples
```
#[derive(objreport::Introspect, Debug)]
#[introspect(methods)]
struct Foo {
    x: i32,
}

#[objreport::methods]
impl Foo {
    fn foo(&self) -> i32 {
        self.x
    }
}

# fn main() -> Result<(), objreport::ReportError> {
let foo = Foo { x: 5 };
objreport::generate_report(&foo, "methods")?;

let report = objreport::Reporter::default().render(&foo, &"methods".into())?;
assert!(report.contains("foo             <method 'fn(&self) -> i32'>"));
assert!(report.starts_with("<Foo object at 0x"));
assert!(!report.contains("x     "));
# Ok(())
# }
```
*/

pub use ::objreport_core::*;

/// Derive-able implementation of [`Introspectable`] and [`TypeInfo`]
///
/// Accepts structs only (named, tuple and unit)
///
/// *Note*: every non-skipped field type must implement [`TypeInfo`] too,
/// and the type itself must implement [`std::fmt::Debug`]
pub use objreport_macros::Introspect;

/// Attribute for an inherent `impl` block, generates [`HasMethods`]
pub use objreport_macros::methods;
