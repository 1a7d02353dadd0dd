use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::ParseStream;
use syn::{Attribute, Expr, Ident, LitStr, Path, Token};

use crate::MODEL_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// CustomAttributes

/// A container for custom attribute expressions.
///
/// This corresponds to `mw_reflect::info::CustomAttributes`.
#[derive(Default)]
pub(crate) struct CustomAttributes {
    attributes: Vec<Expr>,
}

impl CustomAttributes {
    /// Parse `@` attribute.
    ///
    /// Examples:
    /// - `#[model(@Foo)]`
    /// - `#[model(@Bar::baz("qux"))]`
    fn parse_inner_stream(&mut self, input: ParseStream) -> syn::Result<()> {
        input.parse::<Token![@]>()?;
        self.attributes.push(input.parse()?);
        Ok(())
    }

    /// Returns an empty token stream if there are no attributes, otherwise:
    ///
    /// ```ignore
    /// .with_custom_attributes(
    ///     _path_::info::CustomAttributes::with_capacity(N)
    ///         (.with_attribute( ... ))*
    /// )
    /// ```
    pub fn get_expression_with(&self, mw_reflect_path: &Path) -> TokenStream {
        if self.attributes.is_empty() {
            return TokenStream::new();
        }

        let capacity = self.attributes.len();
        let with_attributes = self.attributes.iter().map(|value| {
            quote! {
                .with_attribute(#value)
            }
        });

        quote! {
            .with_custom_attributes(
                #mw_reflect_path::info::CustomAttributes::with_capacity(#capacity)
                    #(#with_attributes)*
            )
        }
    }
}

// -----------------------------------------------------------------------------
// ModelAttributes

/// Where a `#[model(..)]` attribute was found, decides which options apply.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttributeSite {
    Container,
    Field,
    Variant,
}

/// Parsed content of every `#[model(..)]` attribute on one item.
#[derive(Default)]
pub(crate) struct ModelAttributes {
    pub rename: Option<LitStr>,
    pub skip: bool,
    pub custom: CustomAttributes,
}

impl ModelAttributes {
    pub fn parse(attrs: &[Attribute], site: AttributeSite) -> syn::Result<Self> {
        let mut result = Self::default();
        for attr in attrs {
            if attr.path().is_ident(MODEL_ATTRIBUTE_NAME) {
                attr.parse_args_with(|input: ParseStream| result.parse_stream(input, site))?;
            }
        }
        Ok(result)
    }

    fn parse_stream(&mut self, input: ParseStream, site: AttributeSite) -> syn::Result<()> {
        while !input.is_empty() {
            if input.peek(Token![@]) {
                self.custom.parse_inner_stream(input)?;
            } else {
                let ident: Ident = input.parse()?;
                if ident == "rename" && site != AttributeSite::Container {
                    input.parse::<Token![=]>()?;
                    let name: LitStr = input.parse()?;
                    if self.rename.is_some() {
                        return Err(syn::Error::new(ident.span(), "duplicate `rename`"));
                    }
                    self.rename = Some(name);
                } else if ident == "skip" && site == AttributeSite::Field {
                    self.skip = true;
                } else {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unsupported `{MODEL_ATTRIBUTE_NAME}` option `{ident}` here"),
                    ));
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }
        Ok(())
    }

    /// The name used on the wire for an item declared as `ident`.
    pub fn wire_key(&self, ident: &Ident) -> String {
        match &self.rename {
            Some(name) => name.value(),
            None => ident.to_string(),
        }
    }

    /// Returns `.with_key("..")` if the item was renamed.
    pub fn with_key_tokens(&self) -> TokenStream {
        match &self.rename {
            Some(name) => quote! { .with_key(#name) },
            None => TokenStream::new(),
        }
    }
}

/// Returns the index of the first key already used by an earlier one.
pub(crate) fn first_duplicate(keys: &[String]) -> Option<usize> {
    (1..keys.len()).find(|&index| keys[..index].contains(&keys[index]))
}

#[cfg(test)]
mod tests {
    use quote::format_ident;
    use syn::parse_quote;

    use super::{AttributeSite, ModelAttributes, first_duplicate};

    #[test]
    fn rename_sets_the_wire_key() {
        let attrs: Vec<syn::Attribute> = vec![parse_quote!(#[model(rename = "b")])];
        let parsed = ModelAttributes::parse(&attrs, AttributeSite::Field).unwrap();
        assert_eq!(parsed.wire_key(&format_ident!("a")), "b");

        let plain = ModelAttributes::parse(&[], AttributeSite::Field).unwrap();
        assert_eq!(plain.wire_key(&format_ident!("a")), "a");
    }

    #[test]
    fn duplicate_keys_are_found() {
        let keys = |list: &[&str]| list.iter().map(|k| k.to_string()).collect::<Vec<_>>();
        assert_eq!(first_duplicate(&keys(&["a", "b", "c"])), None);
        assert_eq!(first_duplicate(&keys(&["b", "a", "b"])), Some(2));
        assert_eq!(first_duplicate(&[]), None);
    }
}
