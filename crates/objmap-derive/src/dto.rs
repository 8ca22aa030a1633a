use crate::util::{RenameRule, unraw};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Error, Field, Fields, Ident, LitStr};

///
/// ContainerAttrs
///

#[derive(Default)]
struct ContainerAttrs {
    name: Option<String>,
    mutable: bool,
    implements: Vec<String>,
    skip_to_array: Vec<LitStr>,
    rename_all: Option<RenameRule>,
}

impl ContainerAttrs {
    fn parse(attrs: &[Attribute]) -> Result<Self, Error> {
        let mut out = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("dto")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    out.name = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("mutable") {
                    out.mutable = true;
                } else if meta.path.is_ident("implements") {
                    out.implements.push(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("skip_to_array") {
                    out.skip_to_array.push(meta.value()?.parse()?);
                } else if meta.path.is_ident("rename_all") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.rename_all = Some(RenameRule::parse(&lit)?);
                } else {
                    return Err(meta.error("unknown dto attribute"));
                }
                Ok(())
            })?;
        }

        Ok(out)
    }
}

///
/// FieldAttrs
///

#[derive(Default)]
struct FieldAttrs {
    default: bool,
    rename: Option<String>,
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> Result<Self, Error> {
        let mut out = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("dto")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("default") {
                    out.default = true;
                } else if meta.path.is_ident("rename") {
                    out.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                } else {
                    return Err(meta.error("unknown dto field attribute"));
                }
                Ok(())
            })?;
        }

        Ok(out)
    }
}

///
/// DtoField
/// One struct field and the property it maps to.
///

struct DtoField<'a> {
    ident: &'a Ident,
    field: &'a Field,
    property: String,
    default: bool,
}

// derive_dto
pub fn derive_dto(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(input: &DeriveInput) -> Result<TokenStream, Error> {
    let ident = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Dto cannot be derived for generic structs",
        ));
    }

    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            ident,
            "Dto can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(Error::new_spanned(
            &data.fields,
            "Dto can only be derived for structs with named fields",
        ));
    };

    let attrs = ContainerAttrs::parse(&input.attrs)?;
    let fields = named
        .named
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| Error::new_spanned(field, "expected a named field"))?;
            let field_attrs = FieldAttrs::parse(&field.attrs)?;
            let name = unraw(ident);
            let property = field_attrs.rename.unwrap_or_else(|| {
                attrs
                    .rename_all
                    .map_or_else(|| name.clone(), |rule| rule.apply(&name))
            });

            Ok::<_, Error>(DtoField {
                ident,
                field,
                property,
                default: field_attrs.default,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for skip in &attrs.skip_to_array {
        if !fields.iter().any(|f| f.property == skip.value()) {
            return Err(Error::new_spanned(
                skip,
                format!("skip_to_array names unknown property \"{}\"", skip.value()),
            ));
        }
    }

    let class_path = attrs.name.clone().unwrap_or_else(|| ident.to_string());
    let class_model = class_model(&attrs, &class_path, &fields);
    let to_object = fields.iter().map(|f| {
        let (field_ident, property) = (f.ident, &f.property);
        quote! {
            .with(#property, FieldValue::to_value(&self.#field_ident))
        }
    });
    let from_object = fields.iter().map(|f| {
        let (field_ident, property) = (f.ident, &f.property);
        if f.default {
            quote! {
                #field_ident: match object.get(#property) {
                    Some(_) => read_field(object, #property)?,
                    None => ::core::default::Default::default(),
                },
            }
        } else {
            quote! {
                #field_ident: read_field(object, #property)?,
            }
        }
    });

    Ok(quote! {
        impl ::objmap::core::dto::Dto for #ident {
            fn class_model() -> ::std::sync::Arc<::objmap::core::model::ClassModel> {
                #[allow(unused_imports)]
                use ::objmap::core::{
                    dto::FieldValue,
                    model::{ClassKind, ClassModel, FieldModel, ParamModel},
                };

                #class_model
            }

            fn to_object(&self) -> ::objmap::core::value::Object {
                use ::objmap::core::dto::{Dto, FieldValue};

                ::objmap::core::value::Object::new(<Self as Dto>::class_model())
                    #(#to_object)*
            }

            fn from_object(
                object: &::objmap::core::value::Object,
            ) -> ::std::result::Result<Self, ::objmap::core::error::MapError> {
                use ::objmap::core::dto::read_field;

                ::std::result::Result::Ok(Self {
                    #(#from_object)*
                })
            }
        }

        impl ::objmap::core::dto::FieldValue for #ident {
            fn to_value(&self) -> ::objmap::core::value::Value {
                ::objmap::core::value::Value::Object(::objmap::core::dto::Dto::to_object(self))
            }

            fn from_value(value: &::objmap::core::value::Value) -> ::std::option::Option<Self> {
                value
                    .as_object()
                    .filter(|object| object.is_instance_of(#class_path))
                    .and_then(|object| ::objmap::core::dto::Dto::from_object(object).ok())
            }

            fn field_ty() -> ::objmap::core::types::Ty {
                ::objmap::core::types::Ty::object(#class_path)
            }
        }
    })
}

fn class_model(attrs: &ContainerAttrs, class_path: &str, fields: &[DtoField<'_>]) -> TokenStream {
    let kind = if attrs.mutable {
        quote!(ClassKind::MutableDataTransferObject)
    } else {
        quote!(ClassKind::DataTransferObject)
    };
    let implements = &attrs.implements;
    let members = fields.iter().map(|f| {
        let (property, ty) = (&f.property, &f.field.ty);
        let ty_expr = quote!(<#ty as FieldValue>::field_ty());
        let default = f.default.then(|| {
            quote! {
                .with_default(FieldValue::to_value(&<#ty as ::core::default::Default>::default()))
            }
        });

        if attrs.mutable {
            quote! {
                .field(FieldModel::public(#property, #ty_expr) #default)
            }
        } else {
            quote! {
                .promoted(ParamModel::new(#property, #ty_expr) #default)
            }
        }
    });
    let skips = &attrs.skip_to_array;
    let skip_to_array = (!skips.is_empty()).then(|| quote!(.skip_to_array([#(#skips),*])));

    quote! {
        ClassModel::builder(#class_path)
            .kind(#kind)
            #(.implements(#implements))*
            #(#members)*
            #skip_to_array
            .build()
    }
}
