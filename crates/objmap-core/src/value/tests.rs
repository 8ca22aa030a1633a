use crate::{
    model::{ClassKind, ClassModel, FieldModel, ParamModel, Visibility},
    types::Ty,
    value::{FieldMap, Object, Value},
};

// ---- helpers -----------------------------------------------------------

fn v_txt(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn user() -> Object {
    let class = ClassModel::builder("App\\User")
        .kind(ClassKind::DataTransferObject)
        .promoted(ParamModel::new("name", Ty::Text))
        .field(FieldModel::public("secret", Ty::Text).with_visibility(Visibility::Private))
        .field(FieldModel::public("count", Ty::Int).as_static().with_default(3))
        .field(FieldModel::public("tags", Ty::list(Ty::Text)).with_default(Vec::<Value>::new()))
        .build();

    Object::new(class).with("secret", "s").with("name", "Bob")
}

// ---- field map ---------------------------------------------------------

#[test]
fn field_map_overwrite_keeps_position() {
    let mut map: FieldMap = [("a", Value::Int(1)), ("b", Value::Int(2))]
        .into_iter()
        .collect();
    let previous = map.insert("a", Value::Int(9));

    assert_eq!(previous, Some(Value::Int(1)));
    assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(map.get("a"), Some(&Value::Int(9)));
}

#[test]
fn field_map_remove_and_append() {
    let mut map: FieldMap = [("a", Value::Int(1)), ("b", Value::Int(2))]
        .into_iter()
        .collect();
    map.remove("a");
    map.insert("a", Value::Int(3));

    assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "a"]);
}

// ---- objects -----------------------------------------------------------

#[test]
fn new_object_applies_instance_defaults_only() {
    let object = user();

    assert_eq!(object.get("tags"), Some(&Value::List(vec![])));
    assert_eq!(object.get("count"), None);
}

#[test]
fn public_vars_follow_declaration_order() {
    let vars = user().public_vars();

    assert_eq!(vars.keys().collect::<Vec<_>>(), ["name", "tags"]);
}

#[test]
fn object_equality_ignores_assignment_order() {
    let a = user();
    let b = Object::new(a.class().clone())
        .with("name", "Bob")
        .with("secret", "s");

    assert_eq!(a, b);
    assert_ne!(a, b.with("name", "Alice"));
}

#[test]
fn instance_of_walks_ancestors() {
    let class = ClassModel::builder("App\\Admin")
        .extends("App\\User")
        .implements("Stringable")
        .build();
    let admin = Object::new(class);

    assert!(admin.is_instance_of("App\\Admin"));
    assert!(admin.is_instance_of("App\\User"));
    assert!(admin.is_instance_of("Stringable"));
    assert!(!admin.is_instance_of("App\\Guest"));
}

// ---- conversions & serialization --------------------------------------

#[test]
fn options_and_vectors_convert_into_values() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("x")), v_txt("x"));
    assert_eq!(
        Value::from(vec![1_i64, 2]),
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );
}

#[test]
fn values_serialize_like_json_arrays() {
    let map: FieldMap = [
        ("name", v_txt("Bob")),
        ("age", Value::Int(30)),
        ("email", Value::Null),
        ("tags", Value::List(vec![v_txt("a")])),
    ]
    .into_iter()
    .collect();
    let json = serde_json::to_string(&Value::Map(map)).unwrap();

    assert_eq!(json, r#"{"name":"Bob","age":30,"email":null,"tags":["a"]}"#);
}

#[test]
fn objects_serialize_their_public_fields() {
    let json = serde_json::to_string(&Value::Object(user())).unwrap();

    assert_eq!(json, r#"{"name":"Bob","tags":[]}"#);
}

#[test]
fn describe_names_the_runtime_kind() {
    assert_eq!(v_txt("x").describe(), "string");
    assert_eq!(Value::Float(1.5).describe(), "float");
    assert_eq!(Value::Object(user()).describe(), "App\\User");
}
