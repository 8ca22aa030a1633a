use objmap_core::{
    convert::{Converted, ConverterTable},
    domain::Domain,
    error::MapError,
    model::{ClassLookup, ClassModel, ClassRegistry},
    shape::FieldDescriptor,
    types::{ArrayKey, Ty},
    value::FieldMap,
};
use std::sync::Arc;

///
/// TypeDomain
///
/// The engine's type-level personality. Items are declared types, sources
/// are class models, converters carry their return type, and `valuesFn`
/// entries carry the union of their callable return types.
///

#[derive(Clone, Copy, Debug)]
pub struct TypeDomain<'r> {
    registry: &'r ClassRegistry,
}

impl<'r> TypeDomain<'r> {
    #[must_use]
    pub const fn new(registry: &'r ClassRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub const fn registry(&self) -> &'r ClassRegistry {
        self.registry
    }

    /// Constant array shape for a projected field map.
    #[must_use]
    pub fn shape_of(projected: FieldMap<Ty>) -> Ty {
        Ty::Array(
            projected
                .into_iter()
                .map(|(name, ty)| (ArrayKey::Text(name), ty))
                .collect(),
        )
    }

    fn single_class(&self, item: &Ty) -> Option<&'r Arc<ClassModel>> {
        match item.without_null() {
            Ty::Object(class) => self.registry.get(&class),
            _ => None,
        }
    }
}

impl Domain for TypeDomain<'_> {
    type Item = Ty;
    type Source = ClassModel;
    type Transform = Ty;
    type Computed = Ty;

    fn convertible_class(&self, item: &Ty) -> Option<Arc<ClassModel>> {
        self.single_class(item)
            .filter(|class| class.is_convertible())
            .cloned()
    }

    fn as_source<'a>(&'a self, item: &'a Ty) -> Option<&'a ClassModel> {
        self.single_class(item).map(AsRef::as_ref)
    }

    fn read_field(&self, _: &ClassModel, field: &FieldDescriptor) -> Option<Ty> {
        Some(field.ty.clone())
    }

    fn wrap_projection(&self, original: &Ty, projected: FieldMap<Ty>) -> Ty {
        let shape = Self::shape_of(projected);
        if original.contains_null() {
            Ty::union([shape, Ty::Null])
        } else {
            shape
        }
    }

    fn on_revisit(&self, item: &Ty) -> Option<Ty> {
        let widened = Ty::map(Ty::Mixed);

        Some(if item.contains_null() {
            Ty::union([widened, Ty::Null])
        } else {
            widened
        })
    }

    /// Sequences, including a nullable sequence such as `list<T>|null`.
    fn is_sequence(&self, item: &Ty) -> bool {
        matches!(
            item.without_null(),
            Ty::List(_) | Ty::Map(_) | Ty::Array(_)
        )
    }

    fn map_elements<F>(&self, item: Ty, mut f: F) -> Result<Ty, MapError>
    where
        F: FnMut(Ty) -> Result<Ty, MapError>,
    {
        if item.is_union() && item.contains_null() {
            let mapped = self.map_elements(item.without_null(), f)?;

            return Ok(Ty::union([mapped, Ty::Null]));
        }

        Ok(match item {
            Ty::List(inner) => Ty::list(f(*inner)?),
            Ty::Map(inner) => Ty::map(f(*inner)?),
            Ty::Array(entries) => Ty::Array(
                entries
                    .into_iter()
                    .map(|(key, ty)| f(ty).map(|ty| (key, ty)))
                    .collect::<Result<_, _>>()?,
            ),
            other => f(other)?,
        })
    }

    /// Subtract every matched class from the item and add the converter's
    /// return type in its place.
    fn convert(&self, table: &ConverterTable<Self>, item: Ty) -> Converted<Ty> {
        if item == Ty::Never {
            return Converted::unchanged(item);
        }
        for converter in table.iter() {
            let accept = Ty::object(converter.accept());
            let ret = converter.transform().clone();
            if !item.is_union() {
                if accept.accepts(&item, self.registry) {
                    return Converted::via(converter.accept().to_string(), ret);
                }
                continue;
            }

            let rest = item.remove(&accept, self.registry);
            if rest == Ty::Never {
                return Converted::via(converter.accept().to_string(), ret);
            }
            if rest == item {
                continue;
            }
            return Converted::via(converter.accept().to_string(), Ty::union([rest, ret]));
        }

        Converted::unchanged(item)
    }

    fn compute(&self, computed: &Ty, _: &ClassModel) -> Ty {
        computed.clone()
    }

    fn assignable(&self, declared: &Ty, item: &Ty) -> bool {
        declared.accepts(item, self.registry)
    }

    fn describe(&self, item: &Ty) -> String {
        item.describe()
    }
}

impl ClassLookup for TypeDomain<'_> {
    fn class(&self, path: &str) -> Option<&Arc<ClassModel>> {
        self.registry.get(path)
    }
}
