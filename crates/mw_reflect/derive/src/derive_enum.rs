use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{DataEnum, DeriveInput, Fields, Ident};

use crate::attributes::{AttributeSite, ModelAttributes, first_duplicate};

/// Read the integer representation from `#[repr(..)]`, defaults to `isize`.
///
/// Returns the `EnumRepr` variant name and whether it is signed.
fn parse_repr(input: &DeriveInput) -> syn::Result<(Ident, bool)> {
    const REPRS: &[(&str, &str, bool)] = &[
        ("i8", "I8", true),
        ("i16", "I16", true),
        ("i32", "I32", true),
        ("i64", "I64", true),
        ("isize", "Isize", true),
        ("u8", "U8", false),
        ("u16", "U16", false),
        ("u32", "U32", false),
        ("u64", "U64", false),
        ("usize", "Usize", false),
    ];

    let mut found = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("repr") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            for (name, variant, signed) in REPRS {
                if meta.path.is_ident(name) {
                    found = Some((Ident::new(variant, meta.path.segments[0].ident.span()), *signed));
                }
            }
            // `C`, `align(..)` and friends do not change the discriminant type.
            if meta.input.peek(syn::token::Paren) {
                let _: proc_macro2::Group = meta.input.parse()?;
            }
            Ok(())
        })?;
    }

    Ok(found.unwrap_or_else(|| (Ident::new("Isize", proc_macro2::Span::call_site()), true)))
}

/// Generate `Typed`, `Reflect` and `Enum` for a fieldless enum.
pub(crate) fn impl_enum(
    input: &DeriveInput,
    data: &DataEnum,
    mw: &syn::Path,
) -> syn::Result<TokenStream> {
    let ident = &input.ident;

    if input.generics.params.iter().next().is_some() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "`Model` enums cannot be generic",
        ));
    }
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            ident,
            "`Model` enums must have at least one variant",
        ));
    }
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "`Model` only supports fieldless enums",
            ));
        }
    }

    let container = ModelAttributes::parse(&input.attrs, AttributeSite::Container)?;
    let (repr, signed) = parse_repr(input)?;

    let variant_idents: Vec<&Ident> = data.variants.iter().map(|v| &v.ident).collect();
    let names: Vec<String> = variant_idents.iter().map(|v| v.to_string()).collect();
    let indices: Vec<Literal> = (0..variant_idents.len())
        .map(Literal::usize_suffixed)
        .collect();

    let mut variant_infos = Vec::with_capacity(variant_idents.len());
    let mut keys = Vec::with_capacity(variant_idents.len());
    for variant in &data.variants {
        let attrs = ModelAttributes::parse(&variant.attrs, AttributeSite::Variant)?;
        keys.push(attrs.wire_key(&variant.ident));
        if let Some(index) = first_duplicate(&keys) {
            return Err(syn::Error::new_spanned(
                variant,
                format!("wire key `{}` is used by more than one variant", keys[index]),
            ));
        }
        let name = variant.ident.to_string();
        let variant_ident = &variant.ident;
        let discriminant = if signed {
            quote! { #mw::info::Discriminant::Signed(Self::#variant_ident as i64) }
        } else {
            quote! { #mw::info::Discriminant::Unsigned(Self::#variant_ident as u64) }
        };
        let with_key = attrs.with_key_tokens();
        let custom = attrs.custom.get_expression_with(mw);
        variant_infos.push(quote! {
            #mw::info::VariantInfo::new(#name, #discriminant) #with_key #custom
        });
    }
    let container_custom = container.custom.get_expression_with(mw);

    Ok(quote! {
        impl #mw::info::Typed for #ident {
            fn type_info() -> &'static #mw::info::TypeInfo {
                static CELL: #mw::impls::NonGenericTypeInfoCell = #mw::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| #mw::info::TypeInfo::Enum(
                    #mw::info::EnumInfo::new::<Self>(
                        #mw::info::EnumRepr::#repr,
                        &[ #(#variant_infos),* ],
                        |index| match index {
                            #( #indices => ::core::option::Option::Some(
                                #mw::Reflect::into_boxed_reflect(Self::#variant_idents)
                            ), )*
                            _ => ::core::option::Option::None,
                        },
                    ) #container_custom
                ))
            }
        }

        impl #mw::Reflect for #ident {
            #mw::impl_reflect_cast_fn!(Enum);
        }

        impl #mw::ops::Enum for #ident {
            fn variant_index(&self) -> usize {
                match self {
                    #( Self::#variant_idents => #indices, )*
                }
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    #( Self::#variant_idents => #names, )*
                }
            }
        }
    })
}
