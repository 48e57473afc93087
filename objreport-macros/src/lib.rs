use proc_macro::TokenStream;
use quote::{format_ident, quote, ToTokens};

/// Part a field plays in the generated descriptor
#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Member,
    /// Embedded ancestor, its members are inherited
    Base,
    Skipped,
}

struct Field {
    name: String,
    access: proc_macro2::TokenStream,
    ty: syn::Type,
    role: Role,
}

enum Shape {
    Named,
    Indexed,
    Unit,
}

struct MetaType {
    ident: syn::Ident,
    info_ident: syn::Ident,
    shape: Shape,
    fields: Vec<Field>,
    has_methods: bool,
}

fn field_role(attrs: &[syn::Attribute]) -> syn::Result<Role> {
    let mut role = Role::Member;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("introspect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("base") {
                role = Role::Base;
                Ok(())
            } else if meta.path.is_ident("skip") {
                role = Role::Skipped;
                Ok(())
            } else {
                Err(meta.error("expected `base` or `skip`"))
            }
        })?;
    }
    Ok(role)
}

fn container_has_methods(attrs: &[syn::Attribute]) -> syn::Result<bool> {
    let mut has_methods = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("introspect")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("methods") {
                has_methods = true;
                Ok(())
            } else {
                Err(meta.error("expected `methods`"))
            }
        })?;
    }
    Ok(has_methods)
}

fn create_meta_fields<'a, I: Iterator<Item = &'a syn::Field>>(fields: I) -> syn::Result<Vec<Field>> {
    let mut new_fields = Vec::new();
    for (index, field) in fields.enumerate() {
        let (name, access) = match field.ident.as_ref() {
            Some(ident) => (ident.to_string(), quote! {self.#ident}),
            None => {
                let index = syn::Index::from(index);
                (index.index.to_string(), quote! {self.#index})
            }
        };

        new_fields.push(Field {
            name,
            access,
            ty: field.ty.clone(),
            role: field_role(&field.attrs)?,
        });
    }
    Ok(new_fields)
}

impl MetaType {
    pub fn new(input: &syn::DeriveInput) -> syn::Result<Self> {
        let ident = input.ident.clone();

        if !input.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &input.generics,
                "Introspect for generic types is currently not supported",
            ));
        }

        let (shape, fields) = match &input.data {
            syn::Data::Struct(syn::DataStruct { fields, .. }) => match fields {
                syn::Fields::Named(named) => (Shape::Named, create_meta_fields(named.named.iter())?),
                syn::Fields::Unnamed(unnamed) => {
                    (Shape::Indexed, create_meta_fields(unnamed.unnamed.iter())?)
                }
                syn::Fields::Unit => (Shape::Unit, Vec::new()),
            },
            syn::Data::Enum(_) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Introspect can only be derived for structs",
                ))
            }
            syn::Data::Union(_) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Unions are not supported",
                ))
            }
        };

        let info_ident = format_ident!("{}_TYPE_INFO", ident.to_string().to_ascii_uppercase());

        Ok(Self {
            ident,
            info_ident,
            shape,
            fields,
            has_methods: container_has_methods(&input.attrs)?,
        })
    }

    fn with_role(&self, role: Role) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(move |field| field.role == role)
    }
}

mod gen {
    use quote::quote;

    use super::{MetaType, Role, Shape};

    fn collect_fields(meta: &MetaType) -> proc_macro2::TokenStream {
        let definitions = meta.with_role(Role::Member).map(|field| {
            let name = &field.name;
            let ty = &field.ty;
            quote! {
                ::objreport::Field {
                    name: #name,
                    ty: <#ty as ::objreport::TypeInfo>::INFO,
                }
            }
        });

        match meta.shape {
            Shape::Named => quote! {
                ::objreport::Data::Struct(::objreport::Fields::Named(&[#(#definitions),*]))
            },
            Shape::Indexed => quote! {
                ::objreport::Data::Struct(::objreport::Fields::Indexed(&[#(#definitions),*]))
            },
            Shape::Unit => quote! {::objreport::Data::Unit},
        }
    }

    fn collect_bases(meta: &MetaType) -> proc_macro2::TokenStream {
        let bases = meta
            .with_role(Role::Base)
            .map(|field| {
                let ty = &field.ty;
                quote! {<#ty as ::objreport::TypeInfo>::INFO}
            })
            .collect::<Vec<_>>();

        // no declared ancestor means direct descendant of the root
        if bases.is_empty() {
            quote! {&[&::objreport::OBJECT]}
        } else {
            quote! {&[#(#bases),*]}
        }
    }

    pub fn create_const_definition(meta: &MetaType) -> proc_macro2::TokenStream {
        let const_ident = &meta.info_ident;
        let ty_ident = &meta.ident;
        let ty_name = meta.ident.to_string();
        let bases = collect_bases(meta);
        let data = collect_fields(meta);

        let methods = match meta.has_methods {
            true => quote! {<#ty_ident as ::objreport::HasMethods>::METHODS},
            false => quote! {&[]},
        };

        quote! {
            const #const_ident: ::objreport::Type = ::objreport::Type {
                ident: #ty_name,
                path: ::core::concat!(::core::module_path!(), "::", #ty_name),
                bases: #bases,
                data: #data,
                computed: &[],
                methods: #methods,
            };
        }
    }

    // fn field(&self, name: &str) -> Option<&dyn Introspectable>
    pub fn create_field_method(meta: &MetaType) -> proc_macro2::TokenStream {
        let mut patterns = Vec::new();
        let mut accesses = Vec::new();
        for field in meta.with_role(Role::Member) {
            patterns.push(&field.name);
            accesses.push(&field.access);
        }

        let inherited = meta.with_role(Role::Base).map(|field| {
            let access = &field.access;
            quote! {
                if let Some(found) = ::objreport::Introspectable::field(&#access, name) {
                    return Some(found);
                }
            }
        });

        quote! {
            fn field(&self, name: &str) -> Option<&dyn ::objreport::Introspectable> {
                match name {
                    #(#patterns => return Some(&#accesses as &dyn ::objreport::Introspectable),)*
                    _ => {}
                }
                #(#inherited)*
                None
            }
        }
    }

    // fn computed(&self, name: &str) -> Option<Box<dyn Introspectable>>
    pub fn create_computed_method(meta: &MetaType) -> proc_macro2::TokenStream {
        let inherited = meta
            .with_role(Role::Base)
            .map(|field| {
                let access = &field.access;
                quote! {
                    if let Some(found) = ::objreport::Introspectable::computed(&#access, name) {
                        return Some(found);
                    }
                }
            })
            .collect::<Vec<_>>();

        // only ancestors produce computed members, own ones are plain fields
        if inherited.is_empty() {
            return quote! {};
        }

        quote! {
            fn computed(&self, name: &str) -> Option<Box<dyn ::objreport::Introspectable>> {
                #(#inherited)*
                None
            }
        }
    }

    // fn heap_size(&self) -> Option<usize>
    pub fn create_heap_size_method(meta: &MetaType) -> proc_macro2::TokenStream {
        let accounted = meta
            .fields
            .iter()
            .filter(|field| field.role != Role::Skipped)
            .map(|field| {
                let access = &field.access;
                quote! {
                    total = total.checked_add(::objreport::Introspectable::heap_size(&#access)?)?;
                }
            })
            .collect::<Vec<_>>();

        if accounted.is_empty() {
            return quote! {};
        }

        quote! {
            fn heap_size(&self) -> Option<usize> {
                let mut total = 0usize;
                #(#accounted)*
                Some(total)
            }
        }
    }
}

/// Derive-able implementation of `Introspectable` and `TypeInfo`
///
/// Field attributes: `#[introspect(base)]` embeds an ancestor, `#[introspect(skip)]`
/// hides a field. Container attribute `#[introspect(methods)]` picks up the table
/// generated by `#[methods]`.
#[proc_macro_derive(Introspect, attributes(introspect))]
pub fn introspect_derive(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);

    let meta = match MetaType::new(&ast) {
        Ok(meta) => meta,
        Err(err) => return err.to_compile_error().into(),
    };

    let const_definition = gen::create_const_definition(&meta);
    let const_def_ident = &meta.info_ident;
    let ty_ident = &meta.ident;

    let field_method = gen::create_field_method(&meta);
    let computed_method = gen::create_computed_method(&meta);
    let heap_size_method = gen::create_heap_size_method(&meta);

    let tokens = quote! {
        const _: () = {
            #const_definition

            #[automatically_derived]
            impl ::objreport::Introspectable for #ty_ident {
                fn get_type(&self) -> &'static ::objreport::Type {
                    &#const_def_ident
                }

                #field_method
                #computed_method
                #heap_size_method
            }

            #[automatically_derived]
            impl ::objreport::TypeInfo for #ty_ident {
                const INFO: &'static ::objreport::Type = &#const_def_ident;
            }
        };
    };
    tokens.into()
}

// token streams print every token separated by a space
fn tidy(tokens: impl ToTokens) -> String {
    let mut text = tokens.to_token_stream().to_string();
    for (from, to) in [
        (" ,", ","),
        ("& ", "&"),
        (" <", "<"),
        ("< ", "<"),
        (" >", ">"),
        (" ::", "::"),
        (":: ", "::"),
        (" (", "("),
        ("( ", "("),
        (" )", ")"),
        ("[ ", "["),
        (" ]", "]"),
        (" ;", ";"),
    ] {
        text = text.replace(from, to);
    }
    text
}

fn render_receiver(receiver: &syn::Receiver) -> String {
    if receiver.colon_token.is_some() {
        return format!("self: {}", tidy(&receiver.ty));
    }

    let mutability = if receiver.mutability.is_some() {
        "mut "
    } else {
        ""
    };
    match &receiver.reference {
        Some((_, Some(lifetime))) => format!("&{} {}self", lifetime, mutability),
        Some((_, None)) => format!("&{}self", mutability),
        None => format!("{}self", mutability),
    }
}

fn render_signature(sig: &syn::Signature) -> String {
    let inputs = sig
        .inputs
        .iter()
        .map(|input| match input {
            syn::FnArg::Receiver(receiver) => render_receiver(receiver),
            syn::FnArg::Typed(typed) => format!("{}: {}", tidy(&typed.pat), tidy(&typed.ty)),
        })
        .collect::<Vec<_>>()
        .join(", ");

    match &sig.output {
        syn::ReturnType::Default => format!("fn({})", inputs),
        syn::ReturnType::Type(_, ty) => format!("fn({}) -> {}", inputs, tidy(ty)),
    }
}

/// Records every fn of an inherent `impl` block as invocable member
///
/// Pair with `#[derive(Introspect)]` and `#[introspect(methods)]` on the type
#[proc_macro_attribute]
pub fn methods(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        let args = proc_macro2::TokenStream::from(args);
        return syn::Error::new_spanned(args, "#[methods] takes no arguments")
            .to_compile_error()
            .into();
    }

    let item = syn::parse_macro_input!(input as syn::ItemImpl);
    if let Some((_, path, _)) = &item.trait_ {
        return syn::Error::new_spanned(path, "#[methods] must be placed on an inherent impl block")
            .to_compile_error()
            .into();
    }

    let self_ty = &item.self_ty;
    let entries = item.items.iter().filter_map(|item| match item {
        syn::ImplItem::Fn(method) => {
            let name = method.sig.ident.to_string();
            let signature = render_signature(&method.sig);
            Some(quote! {
                ::objreport::Method {
                    name: #name,
                    signature: #signature,
                }
            })
        }
        _ => None,
    });

    quote! {
        #item

        #[automatically_derived]
        impl ::objreport::HasMethods for #self_ty {
            const METHODS: &'static [::objreport::Method] = &[#(#entries),*];
        }
    }
    .into()
}
