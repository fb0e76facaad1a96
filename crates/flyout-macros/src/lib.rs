//! Proc-macros for flyout.
//!
//! Currently provided:
//! - `#[derive(WithBuilders)]`: generates `with_<field>(...)` builder-style methods
//!   for each named field of an options or config struct.
//!
//! ## Optional fields
//! Fields declared as `Option<T>` get a builder taking `T` and storing `Some(value)`,
//! so call sites read `OpenOptions::default().with_gap(8.0)` rather than
//! `.with_gap(Some(8.0))`. Mark a field `#[with_builders(raw)]` to keep the
//! `Option<T>` parameter (useful when callers need to clear a value).
//!
//! ## Skipping
//! `#[with_builders(skip)]` excludes a field from builder generation.
//!
//! ### Example
//! ```ignore
//! use flyout_macros::WithBuilders;
//!
//! #[derive(Clone, Debug, Default, WithBuilders)]
//! pub struct OpenOptions {
//!     pub gap: Option<f32>,
//!     pub important: bool,
//!     #[with_builders(skip)]
//!     pub generation: u64,
//! }
//!
//! let o = OpenOptions::default().with_gap(4.0).with_important(true);
//! // .with_generation(...) is NOT generated.
//! ```

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, spanned::Spanned, Data, DeriveInput, Fields, GenericArgument,
    PathArguments, Type,
};

/// Derive that generates `with_<field>` builder methods for structs with named fields.
///
/// Generated methods take `self` by value (builder style) and return `Self`.
///
/// Field attributes:
/// - `#[with_builders(skip)]`: do not generate a builder method for this field.
/// - `#[with_builders(raw)]`: for `Option<T>` fields, take the `Option<T>` as-is.
#[proc_macro_derive(WithBuilders, attributes(with_builders))]
pub fn derive_with_builders(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let ident = &input.ident;
    let generics = &input.generics;

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new(
            input.span(),
            "#[derive(WithBuilders)] only supports structs",
        )
        .to_compile_error()
        .into();
    };

    let Fields::Named(fields_named) = &data_struct.fields else {
        return syn::Error::new(
            data_struct.fields.span(),
            "#[derive(WithBuilders)] only supports structs with named fields",
        )
        .to_compile_error()
        .into();
    };

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut methods = Vec::with_capacity(fields_named.named.len());
    for field in fields_named.named.iter() {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };

        let attrs = FieldAttrs::parse(field);
        if attrs.skip {
            continue;
        }

        let method_ident = format_ident!("with_{}", field_ident);
        let doc = format!("Set `{}`.", field_ident);

        let method = match option_inner(&field.ty) {
            Some(inner) if !attrs.raw => quote! {
                #[doc = #doc]
                #[inline]
                pub fn #method_ident(mut self, value: #inner) -> Self {
                    self.#field_ident = ::core::option::Option::Some(value);
                    self
                }
            },
            _ => {
                let field_ty = &field.ty;
                quote! {
                    #[doc = #doc]
                    #[inline]
                    pub fn #method_ident(mut self, value: #field_ty) -> Self {
                        self.#field_ident = value;
                        self
                    }
                }
            }
        };
        methods.push(method);
    }

    quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            #(#methods)*
        }
    }
    .into()
}

#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    raw: bool,
}

impl FieldAttrs {
    fn parse(field: &syn::Field) -> Self {
        let mut attrs = FieldAttrs::default();
        for attr in &field.attrs {
            if !attr.path().is_ident("with_builders") {
                continue;
            }

            // Unknown nested items are ignored.
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                } else if meta.path.is_ident("raw") {
                    attrs.raw = true;
                }
                Ok(())
            });
        }
        attrs
    }
}

/// Returns `T` when `ty` is spelled `Option<T>` (or `std::option::Option<T>`).
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}
