use std::collections::{BTreeMap, BTreeSet};

use objreport::*;

#[derive(objreport::Introspect, Debug)]
#[introspect(methods)]
pub struct Foo {
    pub x: i32,
}

#[objreport::methods]
impl Foo {
    pub fn foo(&self) {}
}

#[derive(objreport::Introspect, Debug)]
pub struct Note {
    pub text: String,
    pub short: String,
    __checksum: u32,
}

fn render(value: &dyn Introspectable, category: &str) -> String {
    Reporter::default()
        .render(value, &CategoryFilter::from(category))
        .unwrap()
}

// section header -> member names, compared as sets since order is not part of the contract
fn sections(report: &str) -> BTreeMap<String, BTreeSet<String>> {
    let headers: Vec<_> = Section::ORDER.iter().map(|s| s.header()).collect();
    let mut sections = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in report.lines() {
        if headers.contains(&line) {
            current = Some(line.to_owned());
            sections.insert(line.to_owned(), BTreeSet::new());
        } else if let Some(header) = &current {
            let name = line.split_whitespace().next().unwrap_or_default();
            sections
                .get_mut(header)
                .unwrap()
                .insert(name.to_owned());
        }
    }
    sections
}

#[test]
fn test_integer_properties() {
    let report = render(&7i64, "properties");
    let sections = sections(&report);

    assert_eq!(
        sections.keys().cloned().collect::<Vec<_>>(),
        vec!["PRIVATE PROPERTIES", "PUBLIC PROPERTIES"]
    );
    assert!(report.contains("Object type    : <type 'i64'>"));
    assert!(report.contains("Parent types   : [Object]"));
    assert!(report.contains("Occupied memory: 8 bytes"));
}

#[test]
fn test_methods_of_simple_struct() {
    let foo = Foo { x: 5 };
    let report = render(&foo, "methods");
    let sections = sections(&report);

    assert_eq!(sections.len(), 2);
    assert_eq!(
        sections["PUBLIC METHODS"],
        BTreeSet::from(["foo".to_owned()])
    );
    assert!(sections["PRIVATE METHODS"].contains("__repr__"));
    assert!(report.contains("foo             <method 'fn(&self)'>\n"));
    assert!(sections.values().all(|names| !names.contains("x")));
    // the header names the object, it does not list its fields
    assert!(!report.replace("0x", "").contains('x'));
}

#[test]
fn test_bogus_category() {
    let foo = Foo { x: 5 };
    let report = render(&foo, "bogus");

    assert!(sections(&report).is_empty());
    assert!(report.starts_with("<Foo object at 0x"));
    assert!(report.contains(&"-".repeat(60)));
    let first = report.lines().next().unwrap();
    assert!(report.contains(&format!("Object report on object = {}\n", first)));
    assert!(report.contains("Object type    : <type 'Foo'>\n"));
}

#[test]
fn test_every_member_in_exactly_one_section() {
    let note = Note {
        text: "x".repeat(50),
        short: "hi".to_owned(),
        __checksum: 7,
    };
    let report = render(&note, "all");
    let sections = sections(&report);
    assert_eq!(sections.len(), 4);

    for name in dir(&note).unwrap() {
        let hits = sections.values().filter(|names| names.contains(name)).count();
        assert_eq!(hits, 1, "{name}");
    }
    assert!(sections["PRIVATE PROPERTIES"].contains("__checksum"));
    assert!(sections["PUBLIC PROPERTIES"].contains("text"));
}

#[test]
fn test_footprint_counts_owned_strings() {
    let note = Note {
        text: String::with_capacity(40),
        short: "hi".to_owned(),
        __checksum: 7,
    };
    let expected = std::mem::size_of::<Note>() + note.text.capacity() + note.short.capacity();

    assert_eq!(note.heap_size(), Some(note.text.capacity() + note.short.capacity()));
    assert_eq!(TypeDescriptor::of(&note).unwrap().footprint, expected);

    let report = render(&note, "bogus");
    assert!(report.contains(&format!("Occupied memory: {} bytes\n", expected)));
    assert!(report.starts_with("<Note object at 0x"));
}

#[test]
fn test_truncation() {
    let note = Note {
        text: "x".repeat(50),
        short: "hi".to_owned(),
        __checksum: 7,
    };
    let report = render(&note, "public");

    let cut = format!("\"{}", "x".repeat(29));
    assert!(report.contains(&format!("text            = {} <type 'String'>\n", cut)));
    assert!(report.contains("short           = \"hi\" <type 'String'>\n"));
}

#[test]
fn test_private_filter_excludes_public() {
    let note = Note {
        text: String::new(),
        short: String::new(),
        __checksum: 1,
    };
    let sections = sections(&render(&note, "private"));

    assert_eq!(sections.len(), 2);
    assert!(sections
        .values()
        .flatten()
        .all(|name| name.starts_with("__")));
}

#[test]
fn test_idempotent() {
    let foo = Foo { x: 1 };
    assert_eq!(
        sections(&render(&foo, "all")),
        sections(&render(&foo, "all"))
    );
}

#[test]
fn test_legacy_matching() {
    let reporter = Reporter::new(ReportOptions::default().with_match_mode(MatchMode::Legacy));
    let report = reporter
        .render(&Foo { x: 1 }, &CategoryFilter::from("al"))
        .unwrap();
    assert_eq!(sections(&report).len(), 4);
}

#[test]
fn test_generate_report_prints() {
    generate_report(&Foo { x: 1 }, Category::All).unwrap();
    generate_report(&"text", "bogus").unwrap();
}
