use objreport::*;

#[derive(objreport::Introspect, Debug)]
pub struct Test {
    a: i32,
    b: u32,
}

#[derive(objreport::Introspect, Debug, Default)]
#[introspect(methods)]
pub struct Shape {
    pub sides: u8,
    __id: u64,
}

#[objreport::methods]
impl Shape {
    pub fn perimeter(&self, side: f64) -> f64 {
        side * f64::from(self.sides)
    }

    fn __rename(&mut self, id: u64) {
        self.__id = id;
    }

    pub fn describe<'a>(&'a self, prefix: &'a str) -> Vec<&'a str> {
        vec![prefix]
    }
}

#[derive(objreport::Introspect, Debug, Default)]
#[introspect(methods)]
pub struct Square {
    #[introspect(base)]
    shape: Shape,
    pub side: f64,
    #[introspect(skip)]
    scratch: Vec<u8>,
}

#[objreport::methods]
impl Square {
    pub fn area(&self) -> f64 {
        self.side * self.side
    }
}

#[derive(objreport::Introspect, Debug)]
pub struct Pair(i32, String);

#[derive(objreport::Introspect, Debug)]
pub struct Marker;

#[derive(objreport::Introspect, Debug)]
pub struct Handler {
    pub on_event: fn(u32) -> bool,
}

mod v1 {
    #[derive(objreport::Introspect, Debug, Default)]
    pub struct Config {}
}

#[derive(objreport::Introspect, Debug, Default)]
pub struct Config {
    #[introspect(base)]
    base: v1::Config,
    pub retries: u8,
}

fn is_even(x: u32) -> bool {
    x % 2 == 0
}

#[test]
pub fn test_name() {
    assert_eq!(Test::INFO.ident, "Test");
    assert_eq!(Test::INFO.base_names(), vec!["Object"]);
    let fields: Vec<_> = Test::INFO.data.fields().iter().map(|f| f.name).collect();
    assert_eq!(fields, vec!["a", "b"]);
}

#[test]
pub fn test_erased_field_access() {
    let test = Test { a: -3, b: 9 };
    let erased: &dyn Introspectable = &test;

    assert_eq!(erased.get_type().ident, "Test");
    let a = erased.field("a").unwrap();
    assert_eq!(format!("{:?}", a), "-3");
    assert_eq!(a.get_type().ident, "i32");
    assert!(erased.field("c").is_none());
}

#[test]
pub fn test_method_table() {
    let methods = <Shape as HasMethods>::METHODS;
    let find = |name: &str| methods.iter().find(|m| m.name == name).unwrap().signature;

    assert_eq!(find("perimeter"), "fn(&self, side: f64) -> f64");
    assert_eq!(find("__rename"), "fn(&mut self, id: u64)");
    assert_eq!(find("describe"), "fn(&'a self, prefix: &'a str) -> Vec<&'a str>");
    assert_eq!(Shape::INFO.methods.len(), 3);
}

#[test]
pub fn test_base_is_inherited() {
    let square = Square::default();

    assert_eq!(Square::INFO.base_names(), vec!["Shape"]);
    let order: Vec<_> = mro(Square::INFO)
        .unwrap()
        .iter()
        .map(|ty| ty.ident)
        .collect();
    assert_eq!(order, vec!["Square", "Shape", "Object"]);

    let names = dir(&square).unwrap();
    for inherited in ["sides", "__id", "perimeter", "__rename", "__repr__"] {
        assert!(names.contains(&inherited), "{inherited}");
    }
    assert!(!names.contains(&"shape"));
    assert!(!names.contains(&"scratch"));

    assert!(matches!(getattr(&square, "sides").unwrap(), Attr::Value(_)));
    assert!(matches!(
        getattr(&square, "perimeter").unwrap(),
        Attr::Method(Method {
            name: "perimeter",
            ..
        })
    ));
    assert!(getattr(&square, "scratch").is_err());
}

#[test]
pub fn test_tuple_and_unit_structs() {
    let pair = Pair(1, "one".to_owned());
    assert_eq!(dir(&pair).unwrap()[..2], ["0", "1"]);
    assert_eq!(format!("{:?}", pair.field("1").unwrap()), "\"one\"");

    assert_eq!(Marker::INFO.data, Data::Unit);
    assert!(Marker.field("0").is_none());
}

#[test]
pub fn test_callable_field_is_invocable() {
    let handler = Handler { on_event: is_even };
    let members = members(&handler).unwrap();
    let on_event = members.iter().find(|m| m.name == "on_event").unwrap();

    assert_eq!(on_event.kind, MemberKind::Invocable);
    assert_eq!(on_event.visibility, Visibility::Public);
    assert_eq!(on_event.attr.type_label(), "<type 'fn'>");
}

#[test]
pub fn test_same_name_in_other_module_is_distinct_base() {
    let config = Config::default();

    assert_ne!(Config::INFO.path, v1::Config::INFO.path);
    assert!(Config::INFO.path.ends_with("::Config"));
    assert!(v1::Config::INFO.path.ends_with("::v1::Config"));

    let order: Vec<_> = mro(Config::INFO)
        .unwrap()
        .iter()
        .map(|ty| ty.path)
        .collect();
    assert_eq!(
        order,
        vec![Config::INFO.path, v1::Config::INFO.path, "objreport::Object"]
    );

    let report = Reporter::default()
        .render(&config, &Category::All.into())
        .unwrap();
    assert!(report.contains("Parent types   : [Config]\n"));
    assert!(report.contains("retries         = 0 <type 'u8'>\n"));
}

#[test]
pub fn test_heap_size_sums_fields_and_bases() {
    let mut square = Square::default();
    square.scratch = Vec::with_capacity(128);
    assert_eq!(square.heap_size(), Some(0));

    let pair = Pair(1, String::with_capacity(12));
    assert_eq!(pair.heap_size(), Some(pair.1.capacity()));
    assert_eq!(Marker.heap_size(), Some(0));
}
