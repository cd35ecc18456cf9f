use device_spinner::SpecStore;
use device_spinner::resolver::schedule;

const SPECS: &str = r#"
my_bike_wheel:
  module: wheels
  class: Wheel
  args: [rim_700mm, my_hub, spoke_list]
spoke_list:
  factory: builtins.to_list
  args: [spoke0, spoke1]
rim_700mm: {module: wheels, class: Rim, kwds: {hub: my_hub}}
my_hub: {module: wheels, class: Hub}
spoke0: {module: wheels, class: Spoke, args: [my_hub]}
spoke1: {module: wheels, class: Spoke}
"#;

#[test]
fn test_graph_queries() {
    let specs = SpecStore::from_yaml_str(SPECS).unwrap();
    let plan = schedule(&specs).unwrap();
    let graph = plan.graph();

    assert_eq!(graph.node_count(), 6);
    assert_eq!(graph.edge_count(), 7);
    assert_eq!(graph.direct_deps("my_bike_wheel"), vec!["my_hub", "rim_700mm", "spoke_list"]);
    assert_eq!(
        graph.transitive_deps("spoke_list").into_iter().collect::<Vec<_>>(),
        vec!["my_hub", "spoke0", "spoke1"]
    );
    assert!(graph.direct_deps("my_hub").is_empty());
}

#[test]
fn test_tree_rendering() {
    let specs = SpecStore::from_yaml_str(SPECS).unwrap();
    let plan = schedule(&specs).unwrap();

    let expected = "\
my_bike_wheel
├── my_hub
├── rim_700mm
│   └── my_hub
│       └── (already shown)
└── spoke_list
    ├── spoke0
    │   └── my_hub
    │       └── (already shown)
    └── spoke1
";
    assert_eq!(plan.graph().to_tree_string("my_bike_wheel"), expected);
}
