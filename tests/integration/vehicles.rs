use device_spinner::test_utils::{Bike, SpokedWheel, init_test_logging, sample_registry};
use device_spinner::{SpecStore, Spinner};

const BIKE: &str = r#"
my_bike:
  module: vehicles
  class: Bike
  args: [my_front_wheel, my_back_wheel]
my_front_wheel: {module: vehicles, class: Wheel}
my_back_wheel: {module: vehicles, class: Wheel}
"#;

const SPOKED_WHEELS: &str = r#"
my_bike_wheel:
  module: wheels
  class: Wheel
  args: [rim_700mm, my_hub, spoke_list]
spoke_list:
  factory: device_spinner.builtins.to_list
  args: [spoke0, spoke1, spoke2, spoke3]
my_bike_wheel_star_args:
  module: wheels
  class: WheelStarArgs
  args: [rim_700mm, my_hub, spoke0, spoke1, spoke2, spoke3]
my_bike_wheel_star_kwargs:
  module: wheels
  class: WheelStarKwargs
  args: [rim_700mm, my_hub]
  kwds: {spokeA: spoke0, spokeB: spoke1, spokeC: spoke2, spokeD: spoke3}
rim_700mm: {module: wheels, class: Rim}
my_hub: {module: wheels, class: Hub}
spoke0: {module: wheels, class: Spoke}
spoke1: {module: wheels, class: Spoke}
spoke2: {module: wheels, class: Spoke}
spoke3: {module: wheels, class: Spoke}
"#;

#[test]
fn test_bike_gets_its_wheels() {
    init_test_logging(None);
    let specs = SpecStore::from_yaml_str(BIKE).unwrap();

    let devices = Spinner::new(sample_registry()).build(&specs).unwrap();
    assert_eq!(devices.len(), 3);

    let bike = devices.get_as::<Bike>("my_bike").unwrap();
    let front = devices.get_arc("my_front_wheel").unwrap();
    let back = devices.get_arc("my_back_wheel").unwrap();
    assert!(std::sync::Arc::ptr_eq(&bike.front, &front));
    assert!(std::sync::Arc::ptr_eq(&bike.back, &back));
    assert!(!std::sync::Arc::ptr_eq(&bike.front, &bike.back));
}

#[test]
fn test_spokes_shared_between_wheel_flavours() {
    init_test_logging(None);
    let specs = SpecStore::from_yaml_str(SPOKED_WHEELS).unwrap();

    let devices = Spinner::new(sample_registry()).build(&specs).unwrap();
    assert_eq!(devices.len(), 10);

    let by_list = devices.get_as::<SpokedWheel>("my_bike_wheel").unwrap();
    let by_args = devices.get_as::<SpokedWheel>("my_bike_wheel_star_args").unwrap();
    let by_kwds = devices.get_as::<SpokedWheel>("my_bike_wheel_star_kwargs").unwrap();

    for wheel in [by_list, by_args, by_kwds] {
        assert_eq!(wheel.spokes.len(), 4);
        assert!(std::sync::Arc::ptr_eq(&wheel.hub, &devices.get_arc("my_hub").unwrap()));
        assert!(std::sync::Arc::ptr_eq(&wheel.rim, &devices.get_arc("rim_700mm").unwrap()));
    }

    // Keyword spokes arrive sorted by key, which here matches spoke order.
    for (k, spoke) in by_list.spokes.iter().enumerate() {
        let expected = devices.get_arc(&format!("spoke{k}")).unwrap();
        assert!(std::sync::Arc::ptr_eq(spoke, &expected));
        assert!(std::sync::Arc::ptr_eq(&by_args.spokes[k], &expected));
        assert!(std::sync::Arc::ptr_eq(&by_kwds.spokes[k], &expected));
    }
}

#[test]
fn test_plan_orders_parts_before_wheels() {
    let specs = SpecStore::from_yaml_str(SPOKED_WHEELS).unwrap();
    let plan = Spinner::new(sample_registry()).plan(&specs).unwrap();
    let order = plan.order();
    let position = |name: &str| order.iter().position(|n| *n == name).unwrap();

    for k in 0..4 {
        assert!(position(&format!("spoke{k}")) < position("spoke_list"));
        assert!(position(&format!("spoke{k}")) < position("my_bike_wheel_star_args"));
    }
    assert!(position("spoke_list") < position("my_bike_wheel"));
    assert!(position("my_hub") < position("my_bike_wheel_star_kwargs"));
}
