use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{DataStruct, DeriveInput, Fields, parse_quote};

use crate::attributes::{AttributeSite, ModelAttributes, first_duplicate};

struct ModelField<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    attrs: ModelAttributes,
}

/// Generate `Typed`, `Reflect` and `Struct` for a named struct.
pub(crate) fn impl_struct(
    input: &DeriveInput,
    data: &DataStruct,
    mw: &syn::Path,
) -> syn::Result<TokenStream> {
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`Model` only supports structs with named fields",
        ));
    };

    let container = ModelAttributes::parse(&input.attrs, AttributeSite::Container)?;

    let mut fields = Vec::with_capacity(named.named.len());
    for field in &named.named {
        let attrs = ModelAttributes::parse(&field.attrs, AttributeSite::Field)?;
        if attrs.skip {
            continue;
        }
        fields.push(ModelField {
            // Named fields always carry an ident.
            ident: field.ident.as_ref().ok_or_else(|| {
                syn::Error::new_spanned(field, "expected a named field")
            })?,
            ty: &field.ty,
            attrs,
        });
    }

    let keys: Vec<String> = fields.iter().map(|f| f.attrs.wire_key(f.ident)).collect();
    if let Some(index) = first_duplicate(&keys) {
        return Err(syn::Error::new_spanned(
            fields[index].ident,
            format!("wire key `{}` is used by more than one field", keys[index]),
        ));
    }

    let ident = &input.ident;

    // Every type parameter must itself be reflectable, and the struct must be
    // constructible through `Default`.
    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#mw::Reflect));
        param.bounds.push(parse_quote!(#mw::info::Typed));
    }
    let (_, ty_generics, _) = input.generics.split_for_impl();
    generics
        .make_where_clause()
        .predicates
        .push(parse_quote!(#ident #ty_generics: ::core::default::Default));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let field_infos = fields.iter().map(|field| {
        let name = field.ident.to_string();
        let ty = field.ty;
        let with_key = field.attrs.with_key_tokens();
        let custom = field.attrs.custom.get_expression_with(mw);
        quote! {
            #mw::info::NamedField::new::<#ty>(#name) #with_key #custom
        }
    });
    let container_custom = container.custom.get_expression_with(mw);

    let info_tokens = quote! {
        #mw::info::TypeInfo::Struct(
            #mw::info::StructInfo::new::<Self>(&[ #(#field_infos),* ]) #container_custom
        )
    };

    let cell_tokens = if input.generics.type_params().next().is_some() {
        quote! {
            static CELL: #mw::impls::GenericTypeInfoCell = #mw::impls::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self>(|| #info_tokens)
        }
    } else {
        quote! {
            static CELL: #mw::impls::NonGenericTypeInfoCell = #mw::impls::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| #info_tokens)
        }
    };

    let names: Vec<String> = fields.iter().map(|f| f.ident.to_string()).collect();
    let idents: Vec<&syn::Ident> = fields.iter().map(|f| f.ident).collect();
    let indices: Vec<Literal> = (0..fields.len()).map(Literal::usize_suffixed).collect();
    let len = fields.len();

    Ok(quote! {
        impl #impl_generics #mw::info::Typed for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #mw::info::TypeInfo {
                #cell_tokens
            }
        }

        impl #impl_generics #mw::Reflect for #ident #ty_generics #where_clause {
            #mw::impl_reflect_cast_fn!(Struct);
        }

        impl #impl_generics #mw::ops::Struct for #ident #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<&dyn #mw::Reflect> {
                match name {
                    #( #names => ::core::option::Option::Some(#mw::Reflect::as_reflect(&self.#idents)), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn #mw::Reflect> {
                match name {
                    #( #names => ::core::option::Option::Some(#mw::Reflect::as_reflect_mut(&mut self.#idents)), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_at(&self, index: usize) -> ::core::option::Option<&dyn #mw::Reflect> {
                match index {
                    #( #indices => ::core::option::Option::Some(#mw::Reflect::as_reflect(&self.#idents)), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_at_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn #mw::Reflect> {
                match index {
                    #( #indices => ::core::option::Option::Some(#mw::Reflect::as_reflect_mut(&mut self.#idents)), )*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #len
            }
        }
    })
}
