//! The inferred `to_array` shape must describe what the runtime produces.

use objmap_analysis::ToArrayService;
use objmap_core::{
    config::MapperConfig,
    dto::ToArray,
    model::{ClassKind, ClassModel, ClassRegistry, ParamModel},
    options::Options,
    types::{ArrayKey, Ty},
    value::{FieldMap, Object, Value},
};
use proptest::prelude::*;
use std::sync::Arc;

const FIELDS: [&str; 4] = ["id", "name", "createdAt", "isActive"];

// ---- helpers ----

fn date_class() -> Arc<ClassModel> {
    ClassModel::builder("DateTimeImmutable")
        .implements("DateTimeInterface")
        .build()
}

fn user_class() -> Arc<ClassModel> {
    ClassModel::builder("App\\UserDto")
        .kind(ClassKind::DataTransferObject)
        .promoted(ParamModel::new("id", Ty::Int))
        .promoted(ParamModel::new("name", Ty::Text))
        .promoted(ParamModel::new("createdAt", Ty::object("DateTimeImmutable")))
        .promoted(ParamModel::new("isActive", Ty::Bool))
        .build()
}

fn user() -> Object {
    Object::new(user_class())
        .with("id", 1)
        .with("name", "Alice")
        .with("createdAt", Object::new(date_class()))
        .with("isActive", true)
}

fn holder_class() -> Arc<ClassModel> {
    ClassModel::builder("App\\HolderDto")
        .kind(ClassKind::DataTransferObject)
        .promoted(ParamModel::new(
            "dates",
            Ty::list(Ty::object("DateTimeImmutable")).nullable(),
        ))
        .promoted(ParamModel::new(
            "members",
            Ty::list(Ty::object("App\\UserDto")).nullable(),
        ))
        .build()
}

fn holder(filled: bool) -> Object {
    let (dates, members) = if filled {
        (
            Value::List(vec![Object::new(date_class()).into()]),
            Value::List(vec![user().into()]),
        )
    } else {
        (Value::Null, Value::Null)
    };

    Object::new(holder_class())
        .with("dates", dates)
        .with("members", members)
}

fn registry() -> ClassRegistry {
    ClassRegistry::new()
        .with(ClassModel::builder("DateTimeInterface").build())
        .with(date_class())
        .with(user_class())
        .with(holder_class())
}

fn date_converter_ty() -> Ty {
    Ty::tuple([Ty::tuple([
        Ty::class_string("DateTimeInterface"),
        Ty::callable(vec![Ty::object("DateTimeInterface")], Ty::Text),
    ])])
}

fn names_ty(names: &[&str]) -> Ty {
    Ty::tuple(names.iter().map(|n| Ty::ConstText((*n).to_string())))
}

fn assert_describes(inferred: &Ty, runtime: &FieldMap) {
    let Ty::Array(entries) = inferred else {
        panic!("expected a constant shape, got {inferred}");
    };
    let keys: Vec<_> = entries.iter().map(|(k, _)| k.to_string()).collect();
    let runtime_keys: Vec<_> = runtime.keys().map(ToString::to_string).collect();
    assert_eq!(keys, runtime_keys);

    for (key, ty) in entries {
        let ArrayKey::Text(name) = key else {
            panic!("unexpected numeric key {key}");
        };
        let value = runtime.get(name).unwrap();
        assert!(ty.accepts_value(value), "{ty} does not accept {value:?}");
    }
}

// ---- tests ----

#[test]
fn converters_agree_between_runtime_and_inference() {
    let reg = registry();
    let runtime = ToArray::new(&MapperConfig::default())
        .project(
            &user(),
            &Options::new().converter("DateTimeInterface", |_| "2023-01-01".into()),
        )
        .unwrap();
    let inferred = ToArrayService::new(&reg)
        .execute(
            &[user_class()],
            Some(&Ty::shape([("converters", date_converter_ty())])),
        )
        .unwrap();

    assert_describes(&inferred, &runtime);
}

#[test]
fn nullable_lists_are_converted_element_wise() {
    let reg = registry();
    let options = Options::new().converter("DateTimeInterface", |_| "2023-01-01".into());
    let inferred = ToArrayService::new(&reg)
        .execute(
            &[holder_class()],
            Some(&Ty::shape([("converters", date_converter_ty())])),
        )
        .unwrap();

    assert_eq!(
        inferred,
        Ty::shape([
            ("dates", Ty::list(Ty::Text).nullable()),
            ("members", Ty::list(Ty::object("App\\UserDto")).nullable()),
        ])
    );
    for filled in [true, false] {
        let runtime = ToArray::new(&MapperConfig::default())
            .project(&holder(filled), &options)
            .unwrap();
        assert_describes(&inferred, &runtime);
    }
}

#[test]
fn nullable_lists_are_projected_in_deep_mode() {
    let reg = registry();
    let inferred = ToArrayService::new(&reg)
        .execute(
            &[holder_class()],
            Some(&Ty::shape([("deep", Ty::ConstBool(true))])),
        )
        .unwrap();

    let Ty::Array(entries) = &inferred else {
        panic!("expected a constant shape, got {inferred}");
    };
    let members = &entries[1].1;
    assert!(members.contains_null());
    assert!(matches!(
        members.without_null(),
        Ty::List(inner) if matches!(*inner, Ty::Array(_))
    ));

    for filled in [true, false] {
        let runtime = ToArray::new(&MapperConfig::default())
            .project(&holder(filled), &Options::new().deep(true))
            .unwrap();
        assert_describes(&inferred, &runtime);
    }
}

proptest! {
    #[test]
    fn selection_agrees_between_runtime_and_inference(
        mask in prop::collection::vec(any::<bool>(), FIELDS.len()),
        use_pick in any::<bool>(),
    ) {
        let selected: Vec<&str> = FIELDS
            .iter()
            .zip(&mask)
            .filter(|(_, keep)| **keep)
            .map(|(name, _)| *name)
            .collect();
        let option = if use_pick { "pick" } else { "omit" };

        let options = if use_pick {
            Options::new().pick(selected.iter().copied())
        } else {
            Options::new().omit(selected.iter().copied())
        };
        let runtime = ToArray::new(&MapperConfig::default())
            .project(&user(), &options)
            .unwrap();

        let reg = registry();
        let inferred = ToArrayService::new(&reg)
            .execute(&[user_class()], Some(&Ty::shape([(option, names_ty(&selected))])))
            .unwrap();

        assert_describes(&inferred, &runtime);
    }
}
