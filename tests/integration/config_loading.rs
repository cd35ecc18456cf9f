use device_spinner::config::Config;
use device_spinner::constants::DEFAULT_SPEC_SECTION;
use device_spinner::test_utils::{
    Bike, ConfigFixture, Laser, Microscope, TestEnvironment, sample_registry,
};
use device_spinner::{Spinner, SpinnerError};

#[test]
fn test_microscope_from_yaml_and_toml() {
    for fixture in [ConfigFixture::lab_yaml(), ConfigFixture::lab_toml()] {
        let (_env, path) = TestEnvironment::with_fixture(&fixture).unwrap();
        let config = Config::open(&path).unwrap();
        let specs = config.specs(DEFAULT_SPEC_SECTION).unwrap();

        let devices = Spinner::new(sample_registry()).build(&specs).unwrap();
        let microscope = devices.get_as::<Microscope>("microscope").unwrap();

        let ports: Vec<&str> =
            microscope.lasers.iter().map(|laser| laser.serial_port.as_str()).collect();
        assert_eq!(ports, vec!["COM3", "COM4"], "{}", fixture.file_name());
        assert!(std::sync::Arc::ptr_eq(
            &microscope.lasers[0],
            &devices.get_arc::<Laser>("laser0").unwrap()
        ));
        assert!(std::sync::Arc::ptr_eq(&microscope.camera, &devices.get_arc("camera").unwrap()));
    }
}

#[test]
fn test_dotted_class_paths() {
    let (_env, path) = TestEnvironment::with_fixture(&ConfigFixture::vehicles_yaml()).unwrap();
    let specs = Config::open(&path).unwrap().specs(DEFAULT_SPEC_SECTION).unwrap();

    let devices = device_spinner::build(&specs, &sample_registry()).unwrap();
    assert!(devices.get_as::<Bike>("my_bike").is_some());
}

#[test]
fn test_edit_save_and_rebuild() {
    let (env, path) = TestEnvironment::with_fixture(&ConfigFixture::lab_yaml()).unwrap();
    let mut config = Config::open(&path).unwrap();

    // Point laser1 at a different port and save a TOML copy.
    let laser1 = config
        .document_mut()
        .get_mut("devices")
        .and_then(|devices| devices.get_mut("laser1"))
        .and_then(|laser| laser.get_mut("args"))
        .unwrap();
    *laser1 = device_spinner::Value::from(vec!["COM9"]);
    let saved = config.save(Some(env.path().join("edited.toml").as_path()), false).unwrap();

    let reopened = Config::open(&saved).unwrap();
    let devices = Spinner::new(sample_registry())
        .build(&reopened.specs(DEFAULT_SPEC_SECTION).unwrap())
        .unwrap();
    assert_eq!(devices.get_as::<Laser>("laser1").unwrap().serial_port, "COM9");

    // The original file is untouched until reloaded over.
    config.reload().unwrap();
    let specs = config.specs(DEFAULT_SPEC_SECTION).unwrap();
    let devices = Spinner::new(sample_registry()).build(&specs).unwrap();
    assert_eq!(devices.get_as::<Laser>("laser1").unwrap().serial_port, "COM4");
}

#[test]
fn test_missing_devices_section() {
    let (_env, path) = TestEnvironment::with_fixture(&ConfigFixture::without_devices()).unwrap();
    let err = Config::open(&path).unwrap().specs(DEFAULT_SPEC_SECTION).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SpinnerError>(),
        Some(SpinnerError::MissingConfigSection { .. })
    ));
}

#[test]
fn test_invalid_recipe_in_file() {
    let env = TestEnvironment::new().unwrap();
    let path = env
        .create_file(
            "bad.yaml",
            "devices:\n  camera: {module: lab, class: Camera, factory: make_camera}\n",
        )
        .unwrap();

    let err = Config::open(&path).unwrap().specs(DEFAULT_SPEC_SECTION).unwrap_err();
    match err.downcast_ref::<SpinnerError>() {
        Some(SpinnerError::InvalidRecipe {
            instance,
            ..
        }) => assert_eq!(instance, "camera"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(format!("{err:#}").contains("bad.yaml"));
}
