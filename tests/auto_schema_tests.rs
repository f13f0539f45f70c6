//! Auto-schema manager tests

mod common;

use std::sync::Arc;
use std::time::Duration;

use auto_schema::{
    AutoSchemaConfig, AutoSchemaError, AutoSchemaManager, AutoSchemaOutcome, Class, DataType,
    NestedProperty, Object, ObjectLookup, Principal, Property, Reference, StoreError,
};
use common::{RecordingStore, StaticLookup, StoreCall};
use serde_json::json;
use tokio::runtime::Runtime;
use uuid::Uuid;

const TARGET_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn manager(store: Arc<RecordingStore>, config: AutoSchemaConfig) -> AutoSchemaManager {
    AutoSchemaManager::new(store, None, config).unwrap()
}

fn beacon(class: Option<&str>, id: &str) -> String {
    let id = Uuid::parse_str(id).unwrap();
    Reference::local(class.map(str::to_string), id).to_string()
}

fn created_class(store: &RecordingStore) -> Class {
    match store.mutations().as_slice() {
        [StoreCall::AddClass(class)] => class.clone(),
        other => panic!("Expected a single AddClass, got {other:?}"),
    }
}

mod create_class_tests {
    use super::*;

    #[test]
    fn test_create_class_with_default_number() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new());
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json("Article", json!({"title": "Hello", "views": 42}));

            let outcome = manager
                .auto_schema(None, Some(&mut object), true)
                .await
                .unwrap();

            assert_eq!(
                outcome,
                AutoSchemaOutcome::ClassCreated {
                    class: "Article".to_string(),
                    properties: vec!["title".to_string(), "views".to_string()],
                }
            );

            let class = created_class(&store);
            assert_eq!(class.name, "Article");
            assert!(class.description.starts_with("This class was generated"));
            assert_eq!(class.property("title").unwrap().data_type, vec![DataType::Text]);
            assert_eq!(class.property("views").unwrap().data_type, vec![DataType::Number]);
            assert!(
                class
                    .property("title")
                    .unwrap()
                    .description
                    .starts_with("This property was generated by the auto-schema feature on ")
            );
        });
    }

    #[test]
    fn test_create_class_with_int_default_number() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new());
            let config = AutoSchemaConfig::builder()
                .default_number(DataType::Int)
                .build()
                .unwrap();
            let manager = manager(store.clone(), config);
            assert_eq!(manager.config().default_number, DataType::Int);
            let mut object = Object::from_json("Article", json!({"title": "Hello", "views": 42}));

            manager
                .auto_schema(None, Some(&mut object), true)
                .await
                .unwrap();

            let class = created_class(&store);
            assert_eq!(class.property("views").unwrap().data_type, vec![DataType::Int]);
        });
    }

    #[test]
    fn test_geo_coordinates_property() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new());
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json(
                "City",
                json!({"loc": {"latitude": 52.37, "longitude": 4.89}}),
            );

            manager
                .auto_schema(None, Some(&mut object), true)
                .await
                .unwrap();

            let class = created_class(&store);
            let loc = class.property("loc").unwrap();
            assert_eq!(loc.data_type, vec![DataType::GeoCoordinates]);
            assert!(loc.nested_properties.is_empty());
        });
    }

    #[test]
    fn test_nested_object_property() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new());
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json(
                "Order",
                json!({"lines": [{"sku": "A1"}, {"sku": "B2", "qty": 2}]}),
            );

            manager
                .auto_schema(None, Some(&mut object), true)
                .await
                .unwrap();

            let class = created_class(&store);
            let lines = class.property("lines").unwrap();
            assert_eq!(lines.data_type, vec![DataType::ObjectArray]);
            let names: Vec<_> = lines
                .nested_properties
                .iter()
                .map(|p| p.name.as_str())
                .collect();
            assert_eq!(names, vec!["sku", "qty"]);
        });
    }

    #[test]
    fn test_class_name_normalized_in_place() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new());
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json("article", json!({"title": "Hello"}));

            manager
                .auto_schema(Some(&Principal::new("alice")), Some(&mut object), true)
                .await
                .unwrap();

            assert_eq!(object.class, "Article");
            assert_eq!(created_class(&store).name, "Article");
        });
    }

    #[test]
    fn test_class_creation_not_allowed() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new());
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json("Article", json!({"title": "Hello"}));

            let err = manager
                .auto_schema(None, Some(&mut object), false)
                .await
                .unwrap_err();

            match err {
                AutoSchemaError::ClassNotAllowed { class } => assert_eq!(class, "Article"),
                other => panic!("Expected ClassNotAllowed, got {other:?}"),
            }
            assert!(store.mutations().is_empty());
        });
    }
}

mod update_class_tests {
    use super::*;

    fn person() -> Class {
        Class::new("Person").with_properties(vec![
            Property::new("name", vec![DataType::Text]),
            Property::new("address", vec![DataType::Object]).with_nested_properties(vec![
                NestedProperty::new("city", vec![DataType::Text]),
            ]),
        ])
    }

    #[test]
    fn test_merge_nested_property() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::with_classes(vec![person()]));
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json(
                "Person",
                json!({"address": {"city": "Berlin", "zip": "10115"}}),
            );

            let outcome = manager
                .auto_schema(None, Some(&mut object), true)
                .await
                .unwrap();

            assert_eq!(
                outcome,
                AutoSchemaOutcome::ClassUpdated {
                    class: "Person".to_string(),
                    added: vec![],
                    merged: vec!["address".to_string()],
                }
            );

            match store.mutations().as_slice() {
                [StoreCall::MergeProperty { class, property }] => {
                    assert_eq!(class, "Person");
                    let names: Vec<_> = property
                        .nested_properties
                        .iter()
                        .map(|p| p.name.as_str())
                        .collect();
                    assert_eq!(names, vec!["city", "zip"]);
                }
                other => panic!("Expected a single MergeProperty, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_existing_properties_never_retyped() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::with_classes(vec![person()]));
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json(
                "Person",
                json!({"Name": 12, "address": {"city": "Berlin"}}),
            );

            let outcome = manager
                .auto_schema(None, Some(&mut object), false)
                .await
                .unwrap();

            assert_eq!(
                outcome,
                AutoSchemaOutcome::ClassUpdated {
                    class: "Person".to_string(),
                    added: vec![],
                    merged: vec![],
                }
            );
            assert!(store.mutations().is_empty());
        });
    }

    #[test]
    fn test_adds_issued_before_merges() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::with_classes(vec![person()]));
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json(
                "Person",
                json!({"address": {"zip": "10115"}, "age": 30, "email": "a@b.c"}),
            );

            manager
                .auto_schema(None, Some(&mut object), false)
                .await
                .unwrap();

            let kinds: Vec<_> = store
                .mutations()
                .iter()
                .map(|call| match call {
                    StoreCall::AddProperty { property, .. } => format!("add {}", property.name),
                    StoreCall::MergeProperty { property, .. } => {
                        format!("merge {}", property.name)
                    }
                    other => panic!("Unexpected call {other:?}"),
                })
                .collect();
            assert_eq!(kinds, vec!["add age", "add email", "merge address"]);

            let stored = store.schema();
            let address = stored
                .get_class("Person")
                .and_then(|c| c.property("address"))
                .unwrap();
            assert_eq!(address.nested_properties.len(), 2);
        });
    }

    #[test]
    fn test_first_failure_aborts_remaining_requests() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::with_classes(vec![person()]).failing_on("b"));
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json("Person", json!({"a": 1, "b": 2, "c": 3}));

            let err = manager
                .auto_schema(None, Some(&mut object), false)
                .await
                .unwrap_err();

            match &err {
                AutoSchemaError::Store {
                    target, source, ..
                } => {
                    assert_eq!(target, "Person.b");
                    assert!(matches!(source, StoreError::BackendError(_)));
                }
                other => panic!("Expected Store, got {other:?}"),
            }

            let attempted: Vec<_> = store
                .mutations()
                .iter()
                .filter_map(|call| match call {
                    StoreCall::AddProperty { property, .. } => Some(property.name.clone()),
                    _ => None,
                })
                .collect();
            assert_eq!(attempted, vec!["a", "b"]);

            // Earlier mutations stay applied
            let stored = store.schema();
            assert!(stored.get_class("Person").unwrap().property("a").is_some());
        });
    }
}

mod reference_tests {
    use super::*;

    #[test]
    fn test_multi_target_references() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new());
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json(
                "Article",
                json!({"refs": [
                    {"beacon": beacon(Some("TargetA"), TARGET_ID)},
                    {"beacon": beacon(Some("TargetB"), TARGET_ID)},
                ]}),
            );

            manager
                .auto_schema(None, Some(&mut object), true)
                .await
                .unwrap();

            let class = created_class(&store);
            assert_eq!(
                class.property("refs").unwrap().data_type,
                vec![
                    DataType::CrossReference("TargetA".to_string()),
                    DataType::CrossReference("TargetB".to_string()),
                ]
            );
        });
    }

    #[test]
    fn test_class_less_beacon_resolved_by_lookup() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new());
            let id = Uuid::parse_str(TARGET_ID).unwrap();
            let lookup: Arc<dyn ObjectLookup> =
                Arc::new(StaticLookup::default().with_object(id, "Author"));
            let manager =
                AutoSchemaManager::new(store.clone(), Some(lookup), AutoSchemaConfig::default())
                    .unwrap();
            let mut object = Object::from_json(
                "Book",
                json!({
                    "author": [{"beacon": beacon(None, TARGET_ID)}],
                    "related": [{"beacon": beacon(None, &Uuid::nil().to_string())}],
                }),
            );

            manager
                .auto_schema(None, Some(&mut object), true)
                .await
                .unwrap();

            let class = created_class(&store);
            assert_eq!(
                class.property("author").unwrap().data_type,
                vec![DataType::CrossReference("Author".to_string())]
            );
            // Unknown targets fall through to plain objects
            assert_eq!(
                class.property("related").unwrap().data_type,
                vec![DataType::ObjectArray]
            );
        });
    }

    #[test]
    fn test_lowercase_beacon_class_survives_serialization() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new());
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json(
                "Comment",
                json!({"about": [{"beacon": beacon(Some("article"), TARGET_ID)}]}),
            );

            manager
                .auto_schema(None, Some(&mut object), true)
                .await
                .unwrap();

            let class = created_class(&store);
            let about = class.property("about").unwrap();
            assert_eq!(
                about.data_type,
                vec![DataType::CrossReference("article".to_string())]
            );

            let json = serde_json::to_string(&class).unwrap();
            let parsed: Class = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, class);
        });
    }

    #[test]
    fn test_mixed_reference_sequence_fails() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new());
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json(
                "Article",
                json!({"refs": [
                    {"beacon": beacon(Some("TargetA"), TARGET_ID)},
                    {"title": "plain"},
                ]}),
            );

            let err = manager
                .auto_schema(None, Some(&mut object), true)
                .await
                .unwrap_err();

            match &err {
                AutoSchemaError::Property { class, name, .. } => {
                    assert_eq!(class, "Article");
                    assert_eq!(name, "refs");
                }
                other => panic!("Expected Property, got {other:?}"),
            }
            assert!(err.is_type_conflict());
            assert!(store.mutations().is_empty());
        });
    }
}

mod manager_tests {
    use super::*;

    #[test]
    fn test_disabled_does_nothing() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new());
            let config = AutoSchemaConfig::builder().enabled(false).build().unwrap();
            let manager = manager(store.clone(), config);

            let outcome = manager.auto_schema(None, None, true).await.unwrap();

            assert_eq!(outcome, AutoSchemaOutcome::Disabled);
            assert!(store.calls().is_empty());
        });
    }

    #[test]
    fn test_missing_object_and_class() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new());
            let manager = manager(store.clone(), AutoSchemaConfig::default());

            let err = manager.auto_schema(None, None, true).await.unwrap_err();
            assert!(matches!(err, AutoSchemaError::Validation(ref m) if m == "no object present"));

            let mut object = Object::new("");
            let err = manager
                .auto_schema(None, Some(&mut object), true)
                .await
                .unwrap_err();
            assert!(
                matches!(err, AutoSchemaError::Validation(ref m) if m == "the given class is empty")
            );
            assert!(store.calls().is_empty());
        });
    }

    #[test]
    fn test_get_schema_failure_propagates() {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new().failing_get_schema());
            let manager = manager(store.clone(), AutoSchemaConfig::default());
            let mut object = Object::from_json("Article", json!({"title": "Hello"}));

            let err = manager
                .auto_schema(None, Some(&mut object), true)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                AutoSchemaError::Store {
                    source: StoreError::Unavailable(_),
                    ..
                }
            ));
        });
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AutoSchemaConfig {
            default_number: DataType::Boolean,
            ..Default::default()
        };
        let result = AutoSchemaManager::new(Arc::new(RecordingStore::new()), None, config);
        assert!(matches!(result, Err(AutoSchemaError::Config(_))));
    }

    #[test]
    fn test_concurrent_invocations_are_serialized() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let store = Arc::new(RecordingStore::new().with_read_delay(Duration::from_millis(10)));
            let manager = Arc::new(manager(store.clone(), AutoSchemaConfig::default()));

            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let manager = manager.clone();
                    tokio::spawn(async move {
                        let mut object =
                            Object::new("Article").with_property(format!("field{i}"), i as i64);
                        manager.auto_schema(None, Some(&mut object), true).await
                    })
                })
                .collect();

            let mut created = 0;
            for handle in handles {
                match handle.await.unwrap().unwrap() {
                    AutoSchemaOutcome::ClassCreated { .. } => created += 1,
                    AutoSchemaOutcome::ClassUpdated { added, .. } => assert_eq!(added.len(), 1),
                    other => panic!("Unexpected outcome {other:?}"),
                }
            }

            // Every caller saw the writes of the one before it
            assert_eq!(created, 1);
            let schema = store.schema();
            assert_eq!(schema.classes.len(), 1);
            assert_eq!(schema.classes[0].properties.len(), 4);
        });
    }
}
