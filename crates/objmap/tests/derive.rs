use objmap::{
    analysis::{CallSite, ToArrayReturnType, ToArrayService},
    core::error::ValueLocation,
    prelude::*,
};

// ---- fixtures ----

#[derive(Clone, Debug, Dto, PartialEq)]
#[dto(name = "App\\UserDto", rename_all = "camelCase")]
struct UserDto {
    id: i64,
    name: String,
    email: Option<String>,
    is_active: bool,
}

#[derive(Clone, Debug, Dto, PartialEq)]
#[dto(name = "App\\TeamDto")]
struct TeamDto {
    name: String,
    lead: Option<UserDto>,
    members: Vec<UserDto>,
}

#[derive(Clone, Debug, Dto, PartialEq)]
#[dto(name = "App\\Account", skip_to_array = "secret")]
struct Account {
    id: i64,
    secret: String,
}

#[derive(Clone, Debug, Dto, PartialEq)]
#[dto(name = "App\\Customer")]
struct Customer {
    name: String,
    age: i64,
}

#[derive(Clone, Debug, Dto, PartialEq)]
#[dto(name = "App\\PersonDto")]
struct PersonDto {
    name: String,
    #[dto(default)]
    age: i64,
    #[dto(default)]
    note: String,
}

#[derive(Clone, Debug, Dto, PartialEq)]
#[dto(name = "App\\DescribedDto")]
struct DescribedDto {
    name: String,
    description: Option<String>,
}

#[derive(Clone, Debug, Dto, PartialEq)]
#[dto(name = "App\\Profile", mutable)]
struct Profile {
    name: String,
    #[dto(default)]
    bio: String,
}

// ---- helpers ----

fn alice() -> UserDto {
    UserDto {
        id: 1,
        name: "Alice".into(),
        email: None,
        is_active: true,
    }
}

fn keys(map: &objmap::core::value::FieldMap) -> Vec<&str> {
    map.keys().collect()
}

// ---- to_array ----

#[test]
fn to_array_uses_renamed_properties_in_declaration_order() {
    let array = alice().to_array(&Options::new()).unwrap();

    assert_eq!(keys(&array), ["id", "name", "email", "isActive"]);
    assert_eq!(array.get("email"), Some(&Value::Null));
}

#[test]
fn to_array_honours_omit_and_static_values() {
    let array = alice()
        .to_array(&Options::new().omit(["id", "isActive"]).value("source", "api"))
        .unwrap();

    assert_eq!(keys(&array), ["name", "email", "source"]);
}

#[test]
fn skip_marker_hides_properties() {
    let account = Account {
        id: 7,
        secret: "hunter2".into(),
    };
    let array = account.to_array(&Options::new()).unwrap();

    assert_eq!(keys(&array), ["id"]);
}

#[test]
fn deep_to_array_projects_nested_dtos() {
    let team = TeamDto {
        name: "Core".into(),
        lead: Some(alice()),
        members: vec![alice()],
    };
    let array = team.to_array(&Options::new().deep(true)).unwrap();

    let Some(Value::Map(lead)) = array.get("lead") else {
        panic!("lead should be projected");
    };
    assert_eq!(lead.get("name"), Some(&Value::from("Alice")));

    let Some(Value::List(members)) = array.get("members") else {
        panic!("members should stay a list");
    };
    assert!(matches!(members[0], Value::Map(_)));
}

#[test]
fn to_array_serializes_to_json() {
    let array = alice().to_array(&Options::new().pick(["id", "name"])).unwrap();

    assert_eq!(
        serde_json::to_value(&array).unwrap(),
        serde_json::json!({ "id": 1, "name": "Alice" })
    );
}

// ---- clone_with ----

#[test]
fn clone_with_replaces_fields_and_keeps_the_rest() {
    let user = alice();
    let renamed = user.clone_with([("name", Value::from("Eve"))]).unwrap();

    assert_eq!(renamed.name, "Eve");
    assert_eq!(renamed.id, user.id);
    assert_eq!(user.clone_with(Vec::<(&str, Value)>::new()).unwrap(), user);
}

#[test]
fn clone_with_rejects_unknown_keys() {
    let err = alice()
        .clone_with([("nickname", Value::from("Al"))])
        .unwrap_err();

    assert!(matches!(err, MapError::UnknownFieldInClone { .. }));
}

// ---- mapping ----

#[test]
fn map_into_fills_defaults() {
    let customer = Customer {
        name: "Bob".into(),
        age: 40,
    };
    let person: PersonDto = customer
        .map_into(&DefaultObjectMapper::default(), &Options::new())
        .unwrap();

    assert_eq!(
        person,
        PersonDto {
            name: "Bob".into(),
            age: 40,
            note: String::new(),
        }
    );
}

#[test]
fn map_into_requires_nullable_values_unless_allowed() {
    let customer = Customer {
        name: "Dave".into(),
        age: 30,
    };
    let mapper = DefaultObjectMapper::default();

    let err = customer
        .map_into::<DescribedDto, _>(&mapper, &Options::new())
        .unwrap_err();
    assert!(matches!(
        err,
        MapError::MissingValue { location: ValueLocation::Parameter, nullable: true, .. }
    ));

    let described: DescribedDto = customer
        .map_into(&mapper, &Options::new().allow_nullable_without_value(true))
        .unwrap();
    assert_eq!(described.description, None);
}

#[test]
fn map_onto_a_mutable_instance_writes_matching_properties() {
    let customer = Customer {
        name: "Carol".into(),
        age: 25,
    };
    let profile = Profile {
        name: "old".into(),
        bio: "kept".into(),
    };
    let object = DefaultObjectMapper::default()
        .map(
            &customer.to_object(),
            MapTarget::Instance(profile.to_object()),
            &Options::new(),
        )
        .unwrap();

    assert_eq!(
        Profile::from_object(&object).unwrap(),
        Profile {
            name: "Carol".into(),
            bio: "kept".into(),
        }
    );
}

// ---- analysis over derived models ----

#[test]
fn derived_models_drive_return_type_inference() {
    let registry = ClassRegistry::new()
        .with(UserDto::class_model())
        .with(TeamDto::class_model());
    let extension = ToArrayReturnType::new(ToArrayService::new(&registry));
    let call = CallSite::new(Ty::object("App\\TeamDto"), "toArray")
        .arg(Ty::shape([("deep", Ty::ConstBool(true))]));
    let user = Ty::shape([
        ("id", Ty::Int),
        ("name", Ty::Text),
        ("email", Ty::Text.nullable()),
        ("isActive", Ty::Bool),
    ]);

    assert_eq!(
        extension.return_type(&call),
        Some(Ty::shape([
            ("name", Ty::Text),
            ("lead", Ty::union([user.clone(), Ty::Null])),
            ("members", Ty::list(user)),
        ]))
    );
}
