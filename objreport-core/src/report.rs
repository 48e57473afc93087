use std::fmt::{self, Write as _};
use std::io;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::resolve::{members, Member, MemberKind, TypeDescriptor, Visibility};
use crate::{Data, Introspectable, ReportError};

/// Requested subset of report sections
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    /// Every section
    All,
    /// Public data and public methods
    Public,
    /// Private data and private methods
    Private,
    /// Invocable members of both visibilities
    Methods,
    /// Data members of both visibilities
    Properties,
}

impl Category {
    #[allow(missing_docs)]
    pub const ALL: [Category; 5] = [
        Category::All,
        Category::Public,
        Category::Private,
        Category::Methods,
        Category::Properties,
    ];

    #[allow(missing_docs)]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Public => "public",
            Category::Private => "private",
            Category::Methods => "methods",
            Category::Properties => "properties",
        }
    }

    /// Whether section is part of this category
    pub fn selects(self, section: Section) -> bool {
        match self {
            Category::All => true,
            Category::Public => section.visibility() == Visibility::Public,
            Category::Private => section.visibility() == Visibility::Private,
            Category::Methods => section.kind() == MemberKind::Invocable,
            Category::Properties => section.kind() == MemberKind::Data,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category name that is not one of `all`, `public`, `private`, `methods`, `properties`
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown report category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// How a [`CategoryFilter`] is matched against sections
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum MatchMode {
    /// Filter must name a [`Category`]; anything else selects no section
    #[default]
    Exact,
    /// Filter selects a section if it is a substring of the section's phrase,
    /// e.g. `"al"` or `""` select everything
    Legacy,
}

/// Category as requested by the caller
///
/// Keeps the raw request, so unknown names degrade to an empty report body
/// instead of failing.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CategoryFilter {
    raw: String,
    category: Option<Category>,
}

impl CategoryFilter {
    #[allow(missing_docs)]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let category = raw.parse().ok();
        Self { raw, category }
    }

    /// Parsed category, `None` if the request names none
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    #[allow(missing_docs)]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether section must be emitted for this filter
    pub fn selects(&self, section: Section, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Exact => self
                .category
                .is_some_and(|category| category.selects(section)),
            MatchMode::Legacy => section.legacy_phrase().contains(self.raw.as_str()),
        }
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Category::All.into()
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        Self {
            raw: category.as_str().to_owned(),
            category: Some(category),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for CategoryFilter {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

/// One of four (visibility, kind) partitions of the report, in emission order
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Section {
    #[allow(missing_docs)]
    PublicProperties,
    #[allow(missing_docs)]
    PrivateProperties,
    #[allow(missing_docs)]
    PublicMethods,
    #[allow(missing_docs)]
    PrivateMethods,
}

impl Section {
    #[allow(missing_docs)]
    pub const ORDER: [Section; 4] = [
        Section::PublicProperties,
        Section::PrivateProperties,
        Section::PublicMethods,
        Section::PrivateMethods,
    ];

    /// Section holding members of this classification
    pub fn of(visibility: Visibility, kind: MemberKind) -> Self {
        match (visibility, kind) {
            (Visibility::Public, MemberKind::Data) => Section::PublicProperties,
            (Visibility::Private, MemberKind::Data) => Section::PrivateProperties,
            (Visibility::Public, MemberKind::Invocable) => Section::PublicMethods,
            (Visibility::Private, MemberKind::Invocable) => Section::PrivateMethods,
        }
    }

    #[allow(missing_docs)]
    pub fn visibility(self) -> Visibility {
        match self {
            Section::PublicProperties | Section::PublicMethods => Visibility::Public,
            Section::PrivateProperties | Section::PrivateMethods => Visibility::Private,
        }
    }

    #[allow(missing_docs)]
    pub fn kind(self) -> MemberKind {
        match self {
            Section::PublicProperties | Section::PrivateProperties => MemberKind::Data,
            Section::PublicMethods | Section::PrivateMethods => MemberKind::Invocable,
        }
    }

    /// Header line of the section
    pub fn header(self) -> &'static str {
        match self {
            Section::PublicProperties => "PUBLIC PROPERTIES",
            Section::PrivateProperties => "PRIVATE PROPERTIES",
            Section::PublicMethods => "PUBLIC METHODS",
            Section::PrivateMethods => "PRIVATE METHODS",
        }
    }

    /// Phrase searched by [`MatchMode::Legacy`]
    pub fn legacy_phrase(self) -> &'static str {
        match self {
            Section::PublicProperties => "all public properties",
            Section::PrivateProperties => "all private properties",
            Section::PublicMethods => "all public methods",
            Section::PrivateMethods => "all private methods",
        }
    }
}

/// Layout and matching configuration of [`Reporter`]
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ReportOptions {
    /// Data member representations longer than this (in chars) are cut
    pub value_width: usize,
    /// Member names are padded up to this width
    pub name_width: usize,
    /// Minimal gap after a member name, even if it overflows `name_width`
    pub min_gap: usize,
    /// Length of the separator line below the header
    pub rule_width: usize,
    #[allow(missing_docs)]
    pub match_mode: MatchMode,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            value_width: 30,
            name_width: 15,
            min_gap: 2,
            rule_width: 60,
            match_mode: MatchMode::Exact,
        }
    }
}

impl ReportOptions {
    #[allow(missing_docs)]
    pub fn with_value_width(mut self, value_width: usize) -> Self {
        self.value_width = value_width;
        self
    }

    #[allow(missing_docs)]
    pub fn with_name_width(mut self, name_width: usize, min_gap: usize) -> Self {
        self.name_width = name_width;
        self.min_gap = min_gap;
        self
    }

    #[allow(missing_docs)]
    pub fn with_rule_width(mut self, rule_width: usize) -> Self {
        self.rule_width = rule_width;
        self
    }

    #[allow(missing_docs)]
    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }
}

/// Debug representation of the value
///
/// If the `Debug` implementation fails, falls back to `<Type object at 0x...>`
pub fn represent(value: &dyn Introspectable) -> String {
    let mut repr = String::new();
    match write!(repr, "{:?}", value) {
        Ok(()) => repr,
        Err(_) => object_repr(value),
    }
}

fn object_repr(value: &dyn Introspectable) -> String {
    format!(
        "<{} object at {:p}>",
        value.get_type().ident,
        value as *const dyn Introspectable as *const ()
    )
}

// structs are named by type and address, member values stay out of the header
fn header_repr(value: &dyn Introspectable) -> String {
    match value.get_type().data {
        Data::Struct(_) => object_repr(value),
        Data::Primitive | Data::Unit => represent(value),
    }
}

fn truncate(text: &str, width: usize) -> &str {
    match text.char_indices().nth(width) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

/// Produces textual reports on [`Introspectable`] values
#[derive(Clone, Debug, Default)]
pub struct Reporter {
    options: ReportOptions,
}

impl Reporter {
    #[allow(missing_docs)]
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    #[allow(missing_docs)]
    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    fn padding(&self, name: &str) -> String {
        let gap = self
            .options
            .name_width
            .saturating_sub(name.chars().count())
            .max(self.options.min_gap);
        " ".repeat(gap)
    }

    fn write_member(&self, out: &mut String, member: &Member<'_>) -> fmt::Result {
        let padding = self.padding(member.name);

        match (member.kind, member.attr.as_value()) {
            (MemberKind::Data, Some(value)) => writeln!(
                out,
                "{}{} = {} {}",
                member.name,
                padding,
                truncate(&represent(value), self.options.value_width),
                member.attr.type_label()
            ),
            _ => writeln!(
                out,
                "{}{} {}",
                member.name,
                padding,
                member.attr.type_label()
            ),
        }
    }

    /// Build the report
    ///
    /// Header and type metadata are always present; member sections only if
    /// `filter` selects them.
    pub fn render(
        &self,
        value: &dyn Introspectable,
        filter: &CategoryFilter,
    ) -> Result<String, ReportError> {
        let descriptor = TypeDescriptor::of(value)?;
        let repr = header_repr(value);

        let mut out = String::new();
        writeln!(out, "{}", repr)?;
        writeln!(out, "{}", "-".repeat(self.options.rule_width))?;
        writeln!(out, "Object report on object = {}", repr)?;
        writeln!(out, "Object type    : <type '{}'>", descriptor.name)?;
        writeln!(out, "Parent types   : [{}]", descriptor.bases.join(", "))?;
        writeln!(out, "Occupied memory: {} bytes", descriptor.footprint)?;

        let members = members(value)?;
        let mut emitted = 0usize;

        for section in Section::ORDER {
            if !filter.selects(section, self.options.match_mode) {
                continue;
            }
            emitted += 1;

            writeln!(out, "{}", section.header())?;
            for member in &members {
                if Section::of(member.visibility, member.kind) == section {
                    self.write_member(&mut out, member)?;
                }
            }
        }

        if emitted == 0 {
            trace!(filter = filter.as_str(), "category selects no section");
        }
        debug!(
            ty = descriptor.name,
            members = members.len(),
            sections = emitted,
            "rendered object report"
        );

        Ok(out)
    }

    /// Write the report into `out`
    pub fn write_to<W: io::Write>(
        &self,
        out: &mut W,
        value: &dyn Introspectable,
        filter: &CategoryFilter,
    ) -> Result<(), ReportError> {
        let report = self.render(value, filter)?;
        out.write_all(report.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Print the report to stdout
    pub fn print(
        &self,
        value: &dyn Introspectable,
        filter: &CategoryFilter,
    ) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_to(&mut lock, value, filter)
    }
}

/// Print report on `value` to stdout using default [`ReportOptions`]
///
/// `category` is one of `all`, `public`, `private`, `methods`, `properties`;
/// anything else prints only the header and type metadata.
pub fn generate_report(
    value: &dyn Introspectable,
    category: impl Into<CategoryFilter>,
) -> Result<(), ReportError> {
    Reporter::default().print(value, &category.into())
}
