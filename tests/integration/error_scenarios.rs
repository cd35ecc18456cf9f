use device_spinner::config::Config;
use device_spinner::core::user_friendly_error;
use device_spinner::test_utils::{ProbeCounter, TestEnvironment, sample_registry};
use device_spinner::{LookupError, Recipe, SpecStore, Spinner, SpinnerError, Target};

#[test]
fn test_misspelled_reference_gets_suggestion() {
    let specs = SpecStore::from_recipes([
        Recipe::new("my_hub", Target::class("wheels", "Hub")),
        Recipe::new("wheel", Target::class("wheels", "Wheel")).with_kwd_ref("hub", "my_hubb"),
    ])
    .unwrap();

    let err = Spinner::new(sample_registry()).build(&specs).unwrap_err();
    match &err {
        SpinnerError::MissingDependency {
            name,
            required_by,
            suggestions,
        } => {
            assert_eq!(name, "my_hubb");
            assert_eq!(required_by, "wheel");
            assert_eq!(suggestions, &vec!["my_hub".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }

    let ctx = user_friendly_error(err.into());
    assert!(ctx.suggestion.unwrap().contains("Did you mean 'my_hub'?"));
}

#[test]
fn test_three_way_cycle_lists_path() {
    let counter = ProbeCounter::new();
    let specs = SpecStore::from_yaml_str(
        r#"
camera: {module: test, class: Probe, kwds: {stage: stage}}
stage: {module: test, class: Probe, kwds: {laser: laser}}
laser: {module: test, class: Probe, kwds: {camera: camera}}
"#,
    )
    .unwrap();

    let err = Spinner::new(counter.registry()).build(&specs).unwrap_err();
    assert!(err.is_graph_error());
    let message = err.to_string();
    for name in ["camera", "stage", "laser"] {
        assert!(message.contains(name), "{message}");
    }
    assert_eq!(message.matches(" → ").count(), 3, "{message}");
    assert_eq!(counter.calls(), 0);
}

#[test]
fn test_unknown_module_and_symbol() {
    let registry = sample_registry();

    let specs = SpecStore::from_yaml_str("scope: {module: optics, class: Scope}").unwrap();
    match Spinner::new(&registry).build(&specs).unwrap_err() {
        SpinnerError::Lookup {
            instance,
            source: LookupError::ModuleNotFound {
                module,
            },
            ..
        } => {
            assert_eq!(instance, "scope");
            assert_eq!(module, "optics");
        }
        other => panic!("unexpected error: {other}"),
    }

    let specs = SpecStore::from_yaml_str("laser: {class: lab.Lazer, args: [COM3]}").unwrap();
    match Spinner::new(&registry).build(&specs).unwrap_err() {
        SpinnerError::Lookup {
            instance,
            target,
            source: LookupError::SymbolNotFound {
                suggestions,
                ..
            },
        } => {
            assert_eq!(instance, "laser");
            assert_eq!(target, "lab.Lazer");
            assert_eq!(suggestions, vec!["Laser".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_wrong_argument_type_names_instance() {
    let specs = SpecStore::from_yaml_str(
        r#"
my_bike: {module: vehicles, class: Bike, args: [front, 26]}
front: {module: vehicles, class: Wheel}
"#,
    )
    .unwrap();

    let err = Spinner::new(sample_registry()).build(&specs).unwrap_err();
    assert_eq!(err.instance(), Some("my_bike"));
    assert!(err.to_string().contains("vehicles.Bike"), "{err}");

    let chain = format!("{:#}", anyhow::Error::from(err));
    assert_eq!(chain.matches("expected an instance, got an integer").count(), 1, "{chain}");
}

#[test]
fn test_invalid_recipe_shapes() {
    let cases = [
        ("a: {module: m}", "a"),
        ("b: {class: NoDots}", "b"),
        ("c: {module: m, class: C, factory: f}", "c"),
        ("d: {module: m, class: C, arguments: [1]}", "d"),
        ("e: {module: m, class: C, skip_args: [x]}", "e"),
    ];

    for (yaml, instance) in cases {
        match SpecStore::from_yaml_str(yaml) {
            Err(SpinnerError::InvalidRecipe {
                instance: reported,
                ..
            }) => assert_eq!(reported, instance, "{yaml}"),
            other => panic!("{yaml}: unexpected result {other:?}"),
        }
    }
}

#[test]
fn test_user_friendly_config_errors() {
    let env = TestEnvironment::new().unwrap();

    let err = Config::open(env.path().join("missing.yaml")).unwrap_err();
    let ctx = user_friendly_error(err);
    assert!(matches!(ctx.error, SpinnerError::ConfigNotFound { .. }));
    assert!(ctx.suggestion.is_some());

    let path = env.create_file("broken.yaml", "devices: [unclosed").unwrap();
    let ctx = user_friendly_error(Config::open(&path).unwrap_err());
    assert!(matches!(ctx.error, SpinnerError::Yaml(_)));
    assert!(ctx.to_string().contains("Suggestion:"));
}
