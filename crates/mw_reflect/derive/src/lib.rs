//! See [`Model`].
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{Data, DeriveInput, parse_macro_input};

static MODEL_ATTRIBUTE_NAME: &str = "model";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod derive_enum;
mod derive_struct;
mod manifest;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `mw_reflect` crate.
///
/// 1. For crates that depend on `mw_reflect`, `::mw_reflect` is returned.
/// 2. For crates that depend on `modelwire`, `::modelwire::reflect` is returned.
/// 3. For other situations, `::mw_reflect` is returned, but this may be incorrect.
fn mw_reflect_path() -> syn::Path {
    manifest::Manifest::crate_path("mw_reflect")
}

// -----------------------------------------------------------------------------
// Macros

/// # Model Derivation
///
/// `#[derive(Model)]` implements `Typed`, `Reflect` and one ops trait:
///
/// - `Struct` for `struct T { ... }` (named fields only).
/// - `Enum` for `enum T { A, B = 3, ... }` (fieldless, at least one variant).
///
/// Structs must implement [`Default`]: deserialization starts from the
/// default value and fills in the members found on the wire. Generic type
/// parameters receive `Reflect + Typed` bounds.
///
/// ## Representation of enums
///
/// The `#[repr(..)]` integer type of an enum decides its `EnumRepr`;
/// enums without one are treated as `isize`.
///
/// ```rust, ignore
/// #[derive(Model)]
/// #[repr(u8)]
/// enum Level { Low = 1, High = 9 }
/// ```
///
/// ## Attributes
///
/// All options live in `#[model(..)]`:
///
/// - `rename = "wire_name"` (fields, variants): the key used on the wire.
/// - `skip` (fields): the field is not reflected and keeps its default value.
/// - `@expr` (types, fields, variants): a custom attribute, stored by its type
///   in `CustomAttributes`.
///
/// ```rust, ignore
/// #[derive(Model, Default)]
/// #[model(@Tag("user"))]
/// struct User {
///     #[model(rename = "userId")]
///     id: u64,
///     #[model(skip)]
///     session: Vec<u8>,
///     #[model(@StringEnum)]
///     role: Role,
/// }
/// ```
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let mw = mw_reflect_path();

    let result = match &ast.data {
        Data::Struct(data) => derive_struct::impl_struct(&ast, data, &mw),
        Data::Enum(data) => derive_enum::impl_enum(&ast, data, &mw),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &ast.ident,
            "`Model` cannot be derived for unions",
        )),
    };

    match result {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
