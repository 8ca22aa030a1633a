use proc_macro::TokenStream;

mod dto;
mod util;

/// Derive `Dto` and `FieldValue` for a struct with named fields.
///
/// Container attributes, all under `#[dto(...)]`:
/// - `name = "App\\UserDto"`: class path, defaults to the struct name
/// - `mutable`: public writable properties instead of a promoted constructor
/// - `implements = "Interface"`: repeatable
/// - `skip_to_array = "field"`: repeatable, skipped by `to_array`
/// - `rename_all = "camelCase"`: property naming (`camelCase`, `PascalCase`,
///   `snake_case`, `kebab-case`)
///
/// Field attributes: `default` (fall back to `Default::default()`) and
/// `rename = "name"`.
#[proc_macro_derive(Dto, attributes(dto))]
pub fn derive_dto(input: TokenStream) -> TokenStream {
    dto::derive_dto(input.into()).into()
}
