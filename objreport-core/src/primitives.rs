use std::fmt::Debug;
use std::mem;

use paste::paste;

use crate::{Data, Introspectable, Method, Type, TypeInfo, OBJECT};

macro_rules! impl_primitive {
    ($name:ident, computed: [$($computed:ident),*], methods: [$($method:ident => $signature:literal),* $(,)?]) => {
        paste! {
            const [<$name:upper _INFO>]: Type = Type {
                ident: std::stringify!($name),
                path: std::concat!("core::primitive::", std::stringify!($name)),
                bases: &[&OBJECT],
                data: Data::Primitive,
                computed: &[$(std::stringify!($computed)),*],
                methods: &[$(Method { name: std::stringify!($method), signature: $signature }),*],
            };

            #[automatically_derived]
            impl Introspectable for $name {
                fn get_type(&self) -> &'static Type {
                    &[<$name:upper _INFO>]
                }

                fn field(&self, _name: &str) -> Option<&dyn Introspectable> {
                    None
                }

                fn computed(&self, name: &str) -> Option<Box<dyn Introspectable>> {
                    match name {
                        $(std::stringify!($computed) => Some(Box::new(<$name>::$computed) as Box<dyn Introspectable>),)*
                        _ => None,
                    }
                }
            }

            #[automatically_derived]
            impl TypeInfo for $name {
                const INFO: &'static Type = &[<$name:upper _INFO>];
            }
        }
    };
}

macro_rules! impl_signed {
    ($($name:ident),*) => {
        $(impl_primitive!($name, computed: [BITS, MAX, MIN], methods: [
            abs => "fn(self) -> Self",
            checked_add => "fn(self, rhs: Self) -> Option<Self>",
            count_ones => "fn(self) -> u32",
            is_negative => "fn(self) -> bool",
            is_positive => "fn(self) -> bool",
            leading_zeros => "fn(self) -> u32",
            pow => "fn(self, exp: u32) -> Self",
            signum => "fn(self) -> Self",
            to_string => "fn(&self) -> String",
            trailing_zeros => "fn(self) -> u32",
        ]);)*
    };
}

macro_rules! impl_unsigned {
    ($($name:ident),*) => {
        $(impl_primitive!($name, computed: [BITS, MAX, MIN], methods: [
            checked_add => "fn(self, rhs: Self) -> Option<Self>",
            count_ones => "fn(self) -> u32",
            is_power_of_two => "fn(self) -> bool",
            leading_zeros => "fn(self) -> u32",
            pow => "fn(self, exp: u32) -> Self",
            to_string => "fn(&self) -> String",
            trailing_zeros => "fn(self) -> u32",
        ]);)*
    };
}

macro_rules! impl_float {
    ($($name:ident),*) => {
        $(impl_primitive!($name, computed: [EPSILON, MAX, MIN], methods: [
            abs => "fn(self) -> Self",
            ceil => "fn(self) -> Self",
            floor => "fn(self) -> Self",
            is_finite => "fn(self) -> bool",
            is_nan => "fn(self) -> bool",
            round => "fn(self) -> Self",
            sqrt => "fn(self) -> Self",
            to_string => "fn(&self) -> String",
        ]);)*
    };
}

impl_signed!(i8, i16, i32, i64, i128, isize);
impl_unsigned!(u8, u16, u32, u64, u128, usize);
impl_float!(f32, f64);

impl_primitive!(bool, computed: [], methods: [
    then_some => "fn(self, t: T) -> Option<T>",
    to_string => "fn(&self) -> String",
]);

impl_primitive!(char, computed: [MAX], methods: [
    is_alphabetic => "fn(self) -> bool",
    is_numeric => "fn(self) -> bool",
    is_whitespace => "fn(self) -> bool",
    len_utf8 => "fn(self) -> usize",
    to_ascii_uppercase => "fn(&self) -> char",
    to_string => "fn(&self) -> String",
]);

const STRING_INFO: Type = Type {
    ident: "String",
    path: "alloc::string::String",
    bases: &[&OBJECT],
    data: Data::Primitive,
    computed: &[],
    methods: &[
        Method {
            name: "capacity",
            signature: "fn(&self) -> usize",
        },
        Method {
            name: "chars",
            signature: "fn(&self) -> Chars<'_>",
        },
        Method {
            name: "is_empty",
            signature: "fn(&self) -> bool",
        },
        Method {
            name: "len",
            signature: "fn(&self) -> usize",
        },
        Method {
            name: "push_str",
            signature: "fn(&mut self, string: &str)",
        },
        Method {
            name: "to_uppercase",
            signature: "fn(&self) -> String",
        },
    ],
};

impl Introspectable for String {
    fn get_type(&self) -> &'static Type {
        &STRING_INFO
    }

    fn field(&self, _name: &str) -> Option<&dyn Introspectable> {
        None
    }

    fn heap_size(&self) -> Option<usize> {
        Some(self.capacity())
    }
}

impl TypeInfo for String {
    const INFO: &'static Type = &STRING_INFO;
}

const STR_INFO: Type = Type {
    ident: "&str",
    path: "core::primitive::str",
    bases: &[&OBJECT],
    data: Data::Primitive,
    computed: &[],
    methods: &[
        Method {
            name: "chars",
            signature: "fn(&self) -> Chars<'_>",
        },
        Method {
            name: "is_empty",
            signature: "fn(&self) -> bool",
        },
        Method {
            name: "len",
            signature: "fn(&self) -> usize",
        },
        Method {
            name: "to_owned",
            signature: "fn(&self) -> String",
        },
    ],
};

impl Introspectable for &'static str {
    fn get_type(&self) -> &'static Type {
        &STR_INFO
    }

    fn field(&self, _name: &str) -> Option<&dyn Introspectable> {
        None
    }
}

impl TypeInfo for &'static str {
    const INFO: &'static Type = &STR_INFO;
}

const UNIT_INFO: Type = Type {
    ident: "()",
    path: "core::primitive::unit",
    bases: &[&OBJECT],
    data: Data::Unit,
    computed: &[],
    methods: &[],
};

impl Introspectable for () {
    fn get_type(&self) -> &'static Type {
        &UNIT_INFO
    }

    fn field(&self, _name: &str) -> Option<&dyn Introspectable> {
        None
    }
}

impl TypeInfo for () {
    const INFO: &'static Type = &UNIT_INFO;
}

// Containers share one descriptor for every element type
const VEC_INFO: Type = Type {
    ident: "Vec",
    path: "alloc::vec::Vec",
    bases: &[&OBJECT],
    data: Data::Primitive,
    computed: &[],
    methods: &[
        Method {
            name: "capacity",
            signature: "fn(&self) -> usize",
        },
        Method {
            name: "is_empty",
            signature: "fn(&self) -> bool",
        },
        Method {
            name: "iter",
            signature: "fn(&self) -> Iter<'_, T>",
        },
        Method {
            name: "len",
            signature: "fn(&self) -> usize",
        },
        Method {
            name: "push",
            signature: "fn(&mut self, value: T)",
        },
    ],
};

impl<T: Debug + 'static> Introspectable for Vec<T> {
    fn get_type(&self) -> &'static Type {
        &VEC_INFO
    }

    fn field(&self, _name: &str) -> Option<&dyn Introspectable> {
        None
    }

    fn heap_size(&self) -> Option<usize> {
        self.capacity().checked_mul(mem::size_of::<T>())
    }
}

impl<T: Debug + 'static> TypeInfo for Vec<T> {
    const INFO: &'static Type = &VEC_INFO;
}

const OPTION_INFO: Type = Type {
    ident: "Option",
    path: "core::option::Option",
    bases: &[&OBJECT],
    data: Data::Primitive,
    computed: &[],
    methods: &[
        Method {
            name: "as_ref",
            signature: "fn(&self) -> Option<&T>",
        },
        Method {
            name: "is_none",
            signature: "fn(&self) -> bool",
        },
        Method {
            name: "is_some",
            signature: "fn(&self) -> bool",
        },
        Method {
            name: "unwrap_or",
            signature: "fn(self, default: T) -> T",
        },
    ],
};

impl<T: Debug + 'static> Introspectable for Option<T> {
    fn get_type(&self) -> &'static Type {
        &OPTION_INFO
    }

    fn field(&self, _name: &str) -> Option<&dyn Introspectable> {
        None
    }
}

impl<T: Debug + 'static> TypeInfo for Option<T> {
    const INFO: &'static Type = &OPTION_INFO;
}

const FN_INFO: Type = Type {
    ident: "fn",
    path: "core::primitive::fn",
    bases: &[&OBJECT],
    data: Data::Primitive,
    computed: &[],
    methods: &[],
};

macro_rules! impl_fn_pointer {
    ($($arg:ident),*) => {
        #[automatically_derived]
        impl<R: 'static, $($arg: 'static),*> Introspectable for fn($($arg),*) -> R {
            fn get_type(&self) -> &'static Type {
                &FN_INFO
            }

            fn field(&self, _name: &str) -> Option<&dyn Introspectable> {
                None
            }

            fn is_callable(&self) -> bool {
                true
            }
        }

        #[automatically_derived]
        impl<R: 'static, $($arg: 'static),*> TypeInfo for fn($($arg),*) -> R {
            const INFO: &'static Type = &FN_INFO;
        }
    };
}

impl_fn_pointer!();
impl_fn_pointer!(A);
impl_fn_pointer!(A, B);
impl_fn_pointer!(A, B, C);
