use std::collections::BTreeMap;

use device_spinner::test_utils::{Probe, ProbeCounter, sample_registry};
use device_spinner::{Argument, Recipe, SpecStore, Spinner, Target, Value};

fn probe(name: &str) -> Recipe {
    Recipe::new(name, Target::class("test", "Probe"))
}

#[test]
fn test_explicit_and_implicit_references_agree() {
    let counter = ProbeCounter::new();
    let specs = SpecStore::from_recipes([
        probe("camera"),
        probe("implicit").with_arg("camera"),
        probe("explicit").with_arg_ref("camera"),
        probe("yaml_ref").with_arg(Value::from(BTreeMap::from([(
            "$ref".to_string(),
            Value::from("camera"),
        )]))),
    ])
    .unwrap();

    let devices = Spinner::new(counter.registry()).build(&specs).unwrap();
    let camera = devices.get("camera").unwrap();
    for name in ["implicit", "explicit", "yaml_ref"] {
        let probe = devices.get_as::<Probe>(name).unwrap();
        assert!(probe.args.arg(0).unwrap().as_instance().unwrap().ptr_eq(camera), "{name}");
    }
    assert_eq!(counter.calls(), 4);
}

#[test]
fn test_ref_marker_only_at_top_level() {
    let counter = ProbeCounter::new();
    let specs = SpecStore::from_yaml_str(
        r#"
camera: {module: test, class: Probe}
scope:
  module: test
  class: Probe
  args: [[{"$ref": camera}]]
  kwds: {settings: {"$ref": camera, exposure: 10}}
"#,
    )
    .unwrap();

    let devices = Spinner::new(counter.registry()).build(&specs).unwrap();
    let scope = devices.get_as::<Probe>("scope").unwrap();

    let nested = scope.args.arg(0).unwrap().as_literal().unwrap();
    assert_eq!(nested.as_seq().unwrap()[0].get("$ref"), Some(&Value::from("camera")));

    // Two keys: a plain mapping, not a reference.
    let settings = scope.args.kwd("settings").unwrap().as_literal().unwrap();
    assert_eq!(settings.get("exposure"), Some(&Value::Int(10)));
}

#[test]
fn test_explicit_self_reference_is_literal() {
    let counter = ProbeCounter::new();
    let specs = SpecStore::from_recipes([probe("loop").with_kwd_ref("me", "loop")]).unwrap();

    let devices = Spinner::new(counter.registry()).build(&specs).unwrap();
    assert_eq!(devices.get_as::<Probe>("loop").unwrap().args.kwd_str("me").unwrap(), "loop");
}

#[test]
fn test_skip_lists_from_toml() {
    let counter = ProbeCounter::new();
    let specs = SpecStore::from_toml_str(
        r#"
[COM3]
module = "test"
class = "Probe"

[laser]
module = "test"
class = "Probe"
args = ["COM3", "COM3"]
kwds = { port = "COM3", backup = "COM3" }
skip_args = [1]
skip_kwds = ["port"]
"#,
    )
    .unwrap();

    let devices = Spinner::new(counter.registry()).build(&specs).unwrap();
    let laser = devices.get_as::<Probe>("laser").unwrap();
    assert!(laser.args.arg(0).unwrap().as_instance().is_some());
    assert_eq!(laser.args.str(1).unwrap(), "COM3");
    assert_eq!(laser.args.kwd_str("port").unwrap(), "COM3");
    assert!(laser.args.kwd("backup").unwrap().as_instance().is_some());
}

#[test]
fn test_skipping_avoids_cycle() {
    let counter = ProbeCounter::new();
    let specs = SpecStore::from_yaml_str(
        r#"
A: {module: test, class: Probe, args: [B]}
B: {module: test, class: Probe, args: [A], skip_args: [0]}
"#,
    )
    .unwrap();

    let devices = Spinner::new(counter.registry()).build(&specs).unwrap();
    let a = devices.get_as::<Probe>("A").unwrap();
    assert!(a.args.arg(0).unwrap().as_instance().unwrap().ptr_eq(devices.get("B").unwrap()));
    assert_eq!(devices.get_as::<Probe>("B").unwrap().args.str(0).unwrap(), "A");
}

#[test]
fn test_non_string_values_never_reference() {
    let counter = ProbeCounter::new();
    let specs = SpecStore::from_yaml_str(
        r#"
"1": {module: test, class: Probe}
"true": {module: test, class: Probe}
user: {module: test, class: Probe, args: [1, true, "1"]}
"#,
    )
    .unwrap();

    let devices = Spinner::new(counter.registry()).build(&specs).unwrap();
    let user = devices.get_as::<Probe>("user").unwrap();
    assert_eq!(user.args.arg(0).unwrap().as_literal(), Some(&Value::Int(1)));
    assert_eq!(user.args.arg(1).unwrap().as_literal(), Some(&Value::Bool(true)));
    assert!(user.args.arg(2).unwrap().as_instance().is_some());
}

#[test]
fn test_builtin_dict_and_str() {
    let specs = SpecStore::from_yaml_str(
        r#"
MyDict:
  class: builtins.dict
  kwds: {key0: MyVal, key1: plain}
MyVal:
  class: builtins.str
  args: [my_val]
"#,
    )
    .unwrap();

    let devices = Spinner::new(sample_registry()).build(&specs).unwrap();
    let my_dict = devices.get_as::<BTreeMap<String, Argument>>("MyDict").unwrap();

    let value = my_dict["key0"].as_instance().unwrap();
    assert!(value.ptr_eq(devices.get("MyVal").unwrap()));
    assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("my_val"));
    assert_eq!(my_dict["key1"].as_literal(), Some(&Value::from("plain")));
}

#[test]
fn test_builtin_to_dict_collects_keywords() {
    let specs = SpecStore::from_yaml_str(
        r#"
lasers:
  factory: device_spinner.builtins.to_dict
  kwds: {blue: laser_488, green: laser_561}
laser_488: {module: lab, class: Laser, args: [COM3]}
laser_561: {module: lab, class: Laser, args: [COM4]}
"#,
    )
    .unwrap();

    let devices = Spinner::new(sample_registry()).build(&specs).unwrap();
    let lasers = devices.get_as::<BTreeMap<String, Argument>>("lasers").unwrap();
    assert_eq!(lasers.keys().map(String::as_str).collect::<Vec<_>>(), vec!["blue", "green"]);
    assert!(lasers["green"].as_instance().unwrap().ptr_eq(devices.get("laser_561").unwrap()));
}
