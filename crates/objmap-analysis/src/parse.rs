//! Static option parsing.
//!
//! Reads option parts from a constant option shape. Malformed entries another
//! rule already covers go through `suppressed`, so they abort inference but
//! are not reported twice.

use crate::domain::TypeDomain;
use objmap_core::{
    convert::Converter,
    error::{Diagnostic, MapError},
    model::{ClassLookup, ClassRegistry},
    options::OptionParts,
    report::ErrorReporter,
    types::{ArrayKey, Ty},
    value::FieldMap,
};

///
/// OptionsParser
///

#[derive(Debug)]
pub struct OptionsParser<'r> {
    registry: &'r ClassRegistry,
    entries: Vec<(String, Ty)>,
}

impl<'r> OptionsParser<'r> {
    /// Parser over the given option argument. Absent options parse as empty;
    /// options that are not a constant string-keyed shape are reported and
    /// yield `None`.
    pub fn new(
        registry: &'r ClassRegistry,
        options: Option<&Ty>,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Option<Self>, MapError> {
        let entries = match options {
            None => Vec::new(),
            Some(options) => {
                let Some(entries) = text_entries(options) else {
                    reporter.report(shape_error(
                        "options",
                        "a constant array with string keys",
                        options,
                    ))?;
                    return Ok(None);
                };
                entries
            }
        };

        Ok(Some(Self { registry, entries }))
    }

    fn get(&self, name: &str) -> Option<&Ty> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, ty)| ty)
    }

    pub fn bool(&self, name: &str, reporter: &mut dyn ErrorReporter) -> Result<bool, MapError> {
        match self.get(name) {
            None => Ok(false),
            Some(Ty::ConstBool(b)) => Ok(*b),
            Some(other) => {
                reporter.report(shape_error(name, "a constant boolean", other))?;
                Ok(false)
            }
        }
    }

    /// Constant list of constant strings.
    pub fn names(
        &self,
        name: &str,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Option<Vec<String>>, MapError> {
        let Some(ty) = self.get(name) else {
            return Ok(None);
        };
        let names = ty.constant_entries().and_then(|entries| {
            entries
                .iter()
                .map(|(_, item)| match item {
                    Ty::ConstText(s) => Some(s.clone()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
        });
        if names.is_none() {
            reporter.report(shape_error(name, "a constant list of strings", ty))?;
        }

        Ok(names)
    }

    /// Constant string-keyed shape of value types.
    pub fn values(
        &self,
        name: &str,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<FieldMap<Ty>, MapError> {
        let Some(ty) = self.get(name) else {
            return Ok(FieldMap::new());
        };
        match text_entries(ty) {
            Some(entries) => Ok(entries.into_iter().collect()),
            None => {
                reporter.report(shape_error(name, "a constant array with string keys", ty))?;
                Ok(FieldMap::new())
            }
        }
    }

    /// Constant shape of callables; each entry contributes the union of its
    /// signatures' return types. Keys already in `values` are rejected.
    pub fn values_fn(
        &self,
        name: &str,
        values: &FieldMap<Ty>,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Vec<(String, Ty)>, MapError> {
        let Some(ty) = self.get(name) else {
            return Ok(Vec::new());
        };
        let Some(entries) = text_entries(ty) else {
            reporter.report(shape_error(name, "a constant array with string keys", ty))?;
            return Ok(Vec::new());
        };

        let mut computed = Vec::with_capacity(entries.len());
        for (key, entry) in entries {
            if values.contains_key(&key) {
                reporter.error(MapError::DuplicateValueKey { key })?;
                continue;
            }
            match entry {
                Ty::Callable(signatures) if !signatures.is_empty() => {
                    let ret = Ty::union(signatures.into_iter().map(|s| s.ret));
                    computed.push((key, ret));
                }
                other => {
                    reporter.report(shape_error(name, "an array of callables", &other))?;
                }
            }
        }

        Ok(computed)
    }

    /// Constant list of `[class-string, callable]` pairs.
    pub fn converters(
        &self,
        name: &str,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Vec<Converter<TypeDomain<'r>>>, MapError> {
        let Some(ty) = self.get(name) else {
            return Ok(Vec::new());
        };
        let Some(entries) = ty.constant_entries().filter(|_| ty.is_constant_list()) else {
            reporter.report(shape_error(name, "a constant list", ty))?;
            return Ok(Vec::new());
        };

        let mut converters = Vec::with_capacity(entries.len());
        for (_, entry) in entries {
            if let Some(converter) = self.converter(name, entry, reporter)? {
                converters.push(converter);
            }
        }

        Ok(converters)
    }

    fn converter(
        &self,
        name: &str,
        entry: &Ty,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Option<Converter<TypeDomain<'r>>>, MapError> {
        let Some(pair) = entry
            .constant_entries()
            .filter(|_| entry.is_constant_list())
        else {
            reporter.report(shape_error(name, "a list of [class-string, callable] pairs", entry))?;
            return Ok(None);
        };
        let [(_, class), (_, callback), ..] = pair else {
            reporter.suppressed(shape_error(name, "a [class-string, callable] pair", entry).error)?;
            return Ok(None);
        };

        let Ty::ClassString(class) = class else {
            reporter.suppressed(shape_error(name, "a class-string", class).error)?;
            return Ok(None);
        };
        let class = match class.object_classes().as_slice() {
            [] => {
                reporter.error(MapError::ConverterTargetMissing {
                    option: name.to_string(),
                })?;
                return Ok(None);
            }
            [class] => (*class).to_string(),
            many => {
                reporter.error(MapError::AmbiguousConverterTarget {
                    option: name.to_string(),
                    classes: many.iter().map(ToString::to_string).collect(),
                })?;
                return Ok(None);
            }
        };

        let Ty::Callable(signatures) = callback else {
            reporter.suppressed(shape_error(name, "a callable", callback).error)?;
            return Ok(None);
        };
        let signature = match signatures.as_slice() {
            [] => {
                reporter.suppressed(shape_error(name, "a callable", callback).error)?;
                return Ok(None);
            }
            [signature] => signature,
            many => {
                reporter.error(MapError::ConverterSignature {
                    option: name.to_string(),
                    reason: format!(
                        "callable has {} variants, only a single signature is supported",
                        many.len()
                    ),
                })?;
                return Ok(None);
            }
        };
        if let Some(param) = signature.params.first() {
            let accepted = Ty::object(class.clone());
            if !param.accepts(&accepted, self.registry as &dyn ClassLookup) {
                reporter.error(MapError::ConverterSignature {
                    option: name.to_string(),
                    reason: format!("first parameter is {param}, which does not accept {class}"),
                })?;
                return Ok(None);
            }
        }

        Ok(Some(Converter::new(class, signature.ret.clone())))
    }
}

/// Option parts for `to_array`: values, pick, omit, deep, converters.
pub fn to_array_parts<'r>(
    registry: &'r ClassRegistry,
    options: Option<&Ty>,
    reporter: &mut dyn ErrorReporter,
) -> Result<Option<OptionParts<TypeDomain<'r>>>, MapError> {
    let Some(parser) = OptionsParser::new(registry, options, reporter)? else {
        return Ok(None);
    };

    Ok(Some(OptionParts {
        values: parser.values("values", reporter)?,
        pick: parser.names("pick", reporter)?,
        omit: parser.names("omit", reporter)?,
        deep: parser.bool("deep", reporter)?,
        converters: parser.converters("converters", reporter)?,
        ..OptionParts::default()
    }))
}

/// Option parts for `map`/`map_many`: values, valuesFn, converters,
/// allowNullableWithoutValue.
pub fn map_parts<'r>(
    registry: &'r ClassRegistry,
    options: Option<&Ty>,
    reporter: &mut dyn ErrorReporter,
) -> Result<Option<OptionParts<TypeDomain<'r>>>, MapError> {
    let Some(parser) = OptionsParser::new(registry, options, reporter)? else {
        return Ok(None);
    };
    let values = parser.values("values", reporter)?;
    let computed = parser.values_fn("valuesFn", &values, reporter)?;

    Ok(Some(OptionParts {
        values,
        computed,
        converters: parser.converters("converters", reporter)?,
        allow_nullable_without_value: parser.bool("allowNullableWithoutValue", reporter)?,
        ..OptionParts::default()
    }))
}

fn text_entries(ty: &Ty) -> Option<Vec<(String, Ty)>> {
    ty.constant_entries()?
        .iter()
        .map(|(key, ty)| match key {
            ArrayKey::Text(name) => Some((name.clone(), ty.clone())),
            ArrayKey::Int(_) => None,
        })
        .collect()
}

fn shape_error(option: &str, expected: &str, found: &Ty) -> Diagnostic {
    Diagnostic::new(MapError::InvalidOptionsShape {
        option: option.to_string(),
        expected: expected.to_string(),
        found: found.describe(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use objmap_core::{
        model::ClassModel,
        report::{Collector, FailFast},
    };

    fn registry() -> ClassRegistry {
        ClassRegistry::new()
            .with(ClassModel::builder("DateTimeInterface").build())
            .with(
                ClassModel::builder("DateTimeImmutable")
                    .implements("DateTimeInterface")
                    .build(),
            )
    }

    fn converters(entry: Ty) -> Ty {
        Ty::shape([("converters", Ty::tuple([entry]))])
    }

    fn collect(registry: &ClassRegistry, options: &Ty) -> Vec<String> {
        let mut reporter = Collector::new("dto");
        to_array_parts(registry, Some(options), &mut reporter).unwrap();

        reporter
            .into_diagnostics()
            .into_iter()
            .map(|d| d.identifier)
            .collect()
    }

    #[test]
    fn well_formed_converter_is_read() {
        let reg = registry();
        let options = converters(Ty::tuple([
            Ty::class_string("DateTimeInterface"),
            Ty::callable(vec![Ty::object("DateTimeInterface")], Ty::Text),
        ]));
        let parts = to_array_parts(&reg, Some(&options), &mut FailFast)
            .unwrap()
            .unwrap();

        assert_eq!(parts.converters.len(), 1);
        assert_eq!(parts.converters[0].accept(), "DateTimeInterface");
        assert_eq!(parts.converters[0].transform(), &Ty::Text);
    }

    #[test]
    fn converter_parameter_must_accept_the_class() {
        let reg = registry();
        let options = converters(Ty::tuple([
            Ty::class_string("DateTimeInterface"),
            Ty::callable(vec![Ty::object("DateTimeImmutable")], Ty::Text),
        ]));

        assert_eq!(
            collect(&reg, &options),
            ["dto.options.converters.parameterType"]
        );
    }

    #[test]
    fn class_string_must_name_one_class() {
        let reg = registry();
        let none = converters(Ty::tuple([
            Ty::ClassString(Box::new(Ty::Mixed)),
            Ty::callable(vec![], Ty::Text),
        ]));
        let many = converters(Ty::tuple([
            Ty::ClassString(Box::new(Ty::union([
                Ty::object("DateTimeInterface"),
                Ty::object("DateTimeImmutable"),
            ]))),
            Ty::callable(vec![], Ty::Text),
        ]));

        assert_eq!(
            collect(&reg, &none),
            ["dto.options.converters.classStringNoClass"]
        );
        assert_eq!(
            collect(&reg, &many),
            ["dto.options.converters.classStringMultipleClasses"]
        );
    }

    #[test]
    fn short_converter_entries_are_left_to_other_rules() {
        let reg = registry();
        let options = converters(Ty::tuple([Ty::class_string("DateTimeInterface")]));

        assert!(collect(&reg, &options).is_empty());
        assert!(to_array_parts(&reg, Some(&options), &mut FailFast).is_err());
    }

    #[test]
    fn non_constant_options_are_reported() {
        let reg = registry();

        assert_eq!(
            collect(&reg, &Ty::map(Ty::Mixed)),
            ["dto.options.invalidType"]
        );
    }

    #[test]
    fn values_fn_keys_may_not_repeat_values() {
        let reg = registry();
        let options = Ty::shape([
            ("values", Ty::shape([("name", Ty::Text)])),
            (
                "valuesFn",
                Ty::shape([
                    ("name", Ty::callable(vec![], Ty::Text)),
                    ("age", Ty::callable(vec![], Ty::Int)),
                ]),
            ),
        ]);
        let mut reporter = Collector::new("objectMapper");
        let parts = map_parts(&reg, Some(&options), &mut reporter)
            .unwrap()
            .unwrap();

        assert_eq!(parts.computed, [("age".to_string(), Ty::Int)]);
        assert_eq!(
            reporter.diagnostics()[0].identifier,
            "objectMapper.options.valuesFn.duplicateValueKey"
        );
    }
}
