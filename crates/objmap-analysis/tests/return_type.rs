use objmap_analysis::{CallSite, ToArrayReturnType, ToArrayService};
use objmap_core::{
    model::{ClassKind, ClassModel, ClassRegistry, FieldModel, ParamModel},
    types::Ty,
};
use std::sync::Arc;

// ---- helpers ----

fn user_dto() -> Arc<ClassModel> {
    ClassModel::builder("App\\UserDto")
        .kind(ClassKind::DataTransferObject)
        .promoted(ParamModel::new("id", Ty::Int))
        .promoted(ParamModel::new("name", Ty::Text))
        .promoted(ParamModel::new("createdAt", Ty::object("DateTimeImmutable")))
        .promoted(ParamModel::new("isActive", Ty::Bool))
        .build()
}

fn registry() -> ClassRegistry {
    ClassRegistry::new()
        .with(ClassModel::builder("DateTimeInterface").build())
        .with(
            ClassModel::builder("DateTimeImmutable")
                .implements("DateTimeInterface")
                .build(),
        )
        .with(user_dto())
        .with(
            ClassModel::builder("App\\TeamDto")
                .kind(ClassKind::DataTransferObject)
                .promoted(ParamModel::new("name", Ty::Text))
                .promoted(ParamModel::new("lead", Ty::object("App\\UserDto").nullable()))
                .promoted(ParamModel::new("members", Ty::list(Ty::object("App\\UserDto"))))
                .build(),
        )
        .with(
            ClassModel::builder("App\\Node")
                .kind(ClassKind::MutableDataTransferObject)
                .field(FieldModel::public("label", Ty::Text))
                .field(FieldModel::public("child", Ty::object("App\\Node").nullable()))
                .build(),
        )
        .with(
            ClassModel::builder("App\\TagDto")
                .kind(ClassKind::DataTransferObject)
                .promoted(ParamModel::new("tag", Ty::Text))
                .build(),
        )
        .with(
            ClassModel::builder("App\\CustomDto")
                .kind(ClassKind::DataTransferObject)
                .promoted(ParamModel::new("id", Ty::Int))
                .overrides_to_array()
                .build(),
        )
        .with(
            ClassModel::builder("App\\Plain")
                .field(FieldModel::public("id", Ty::Int))
                .build(),
        )
}

fn infer(registry: &ClassRegistry, call: &CallSite) -> Option<Ty> {
    ToArrayReturnType::new(ToArrayService::new(registry)).return_type(call)
}

fn to_array(receiver: &str) -> CallSite {
    CallSite::new(Ty::object(receiver), "toArray")
}

fn names(names: &[&str]) -> Ty {
    Ty::tuple(names.iter().map(|n| Ty::ConstText((*n).to_string())))
}

fn user_shape() -> Ty {
    Ty::shape([
        ("id", Ty::Int),
        ("name", Ty::Text),
        ("createdAt", Ty::object("DateTimeImmutable")),
        ("isActive", Ty::Bool),
    ])
}

fn date_converter() -> Ty {
    Ty::tuple([Ty::tuple([
        Ty::class_string("DateTimeInterface"),
        Ty::callable(vec![Ty::object("DateTimeInterface")], Ty::Text),
    ])])
}

// ---- shapes ----

#[test]
fn plain_call_infers_every_public_field() {
    let reg = registry();

    assert_eq!(infer(&reg, &to_array("App\\UserDto")), Some(user_shape()));
}

#[test]
fn omit_removes_keys_from_the_shape() {
    let reg = registry();
    let call = to_array("App\\UserDto").arg(Ty::shape([("omit", names(&["id", "isActive"]))]));

    assert_eq!(
        infer(&reg, &call),
        Some(Ty::shape([
            ("name", Ty::Text),
            ("createdAt", Ty::object("DateTimeImmutable")),
        ]))
    );
}

#[test]
fn static_values_are_appended_after_picked_fields() {
    let reg = registry();
    let options = Ty::shape([
        ("pick", names(&["name"])),
        ("values", Ty::shape([("source", Ty::ConstText("api".into()))])),
    ]);
    let call = to_array("App\\UserDto").named_arg("options", options);

    assert_eq!(
        infer(&reg, &call),
        Some(Ty::shape([
            ("name", Ty::Text),
            ("source", Ty::ConstText("api".into())),
        ]))
    );
}

#[test]
fn converters_replace_matching_field_types() {
    let reg = registry();
    let call = to_array("App\\UserDto").arg(Ty::shape([("converters", date_converter())]));
    let Some(Ty::Array(entries)) = infer(&reg, &call) else {
        panic!("expected a constant shape");
    };

    assert_eq!(entries[2].1, Ty::Text);
}

#[test]
fn first_declared_converter_wins_across_matching_classes() {
    let reg = registry();
    let interface = Ty::tuple([
        Ty::class_string("DateTimeInterface"),
        Ty::callable(vec![Ty::object("DateTimeInterface")], Ty::Text),
    ]);
    let concrete = Ty::tuple([
        Ty::class_string("DateTimeImmutable"),
        Ty::callable(vec![Ty::object("DateTimeImmutable")], Ty::Int),
    ]);
    let created_at = |converters: Ty| {
        let call = to_array("App\\UserDto").arg(Ty::shape([("converters", converters)]));
        let Some(Ty::Array(entries)) = infer(&reg, &call) else {
            panic!("expected a constant shape");
        };
        entries[2].1.clone()
    };

    assert_eq!(
        created_at(Ty::tuple([interface.clone(), concrete.clone()])),
        Ty::Text
    );
    assert_eq!(created_at(Ty::tuple([concrete, interface])), Ty::Int);
}

#[test]
fn deep_projection_keeps_nullability_and_lists() {
    let reg = registry();
    let call = to_array("App\\TeamDto").arg(Ty::shape([("deep", Ty::ConstBool(true))]));

    assert_eq!(
        infer(&reg, &call),
        Some(Ty::shape([
            ("name", Ty::Text),
            ("lead", Ty::union([user_shape(), Ty::Null])),
            ("members", Ty::list(user_shape())),
        ]))
    );
}

#[test]
fn self_referencing_classes_widen_on_revisit() {
    let reg = registry();
    let call = to_array("App\\Node").arg(Ty::shape([("deep", Ty::ConstBool(true))]));

    assert_eq!(
        infer(&reg, &call),
        Some(Ty::shape([
            ("label", Ty::Text),
            ("child", Ty::union([Ty::map(Ty::Mixed), Ty::Null])),
        ]))
    );
}

#[test]
fn union_receivers_infer_a_union_of_shapes() {
    let reg = registry();
    let receiver = Ty::union([Ty::object("App\\UserDto"), Ty::object("App\\TagDto")]);
    let call = CallSite::new(receiver, "toArray");

    assert_eq!(
        infer(&reg, &call),
        Some(Ty::union([user_shape(), Ty::shape([("tag", Ty::Text)])]))
    );
}

// ---- fallbacks ----

#[test]
fn non_strict_variant_is_an_untyped_array() {
    let reg = registry();
    let call = CallSite::new(Ty::object("App\\UserDto"), "toArrayNoStrict");

    assert_eq!(infer(&reg, &call), Some(Ty::map(Ty::Mixed)));
}

#[test]
fn overridden_to_array_falls_back_to_the_declared_type() {
    let reg = registry();

    assert_eq!(infer(&reg, &to_array("App\\CustomDto")), None);
}

#[test]
fn unknown_or_plain_receivers_are_not_inferred() {
    let reg = registry();

    assert_eq!(infer(&reg, &to_array("App\\Missing")), None);
    assert_eq!(infer(&reg, &to_array("App\\Plain")), None);
    assert_eq!(
        infer(&reg, &CallSite::new(Ty::object("App\\UserDto"), "cloneWith")),
        None
    );
}

#[test]
fn invalid_options_fall_back_to_the_declared_type() {
    let reg = registry();
    let conflicting = Ty::shape([("pick", names(&["id"])), ("omit", names(&["name"]))]);

    assert_eq!(infer(&reg, &to_array("App\\UserDto").arg(conflicting)), None);
    assert_eq!(
        infer(&reg, &to_array("App\\UserDto").arg(Ty::map(Ty::Mixed))),
        None
    );
}

#[test]
fn parent_calls_are_inferred_from_the_calling_class() {
    let reg = registry();
    let extension = ToArrayReturnType::new(ToArrayService::new(&reg));
    let scope = reg.get("App\\CustomDto").cloned().unwrap();
    let call = CallSite::new(Ty::object("App\\CustomDto"), "toArray");

    assert_eq!(
        extension.parent_call_return_type(&scope, &call),
        Some(Ty::shape([("id", Ty::Int)]))
    );
}
