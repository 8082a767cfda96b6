use embody::{Context, EmbodyConfig, EmbodyError, Embodier, Path, Strategy, TemplateBuilder, value};
use embody_testhelpers::setup;

use crate::both;

#[test]
fn a_mapping_pointing_at_its_ancestor_fails() {
    setup();

    let mut b = TemplateBuilder::new();
    let root = b.mapping();
    let config = b.mapping();
    let name = b.scalar("${name}");
    b.insert(root, "config", config).unwrap();
    b.insert(config, "name", name).unwrap();
    b.insert(config, "parent", root).unwrap();
    let template = b.build(root).unwrap();

    let ctx = Context::new().with("name", "n");
    let err = both(&template, &ctx, EmbodyConfig::default()).unwrap_err();
    assert_eq!(
        err,
        EmbodyError::Cycle {
            path: Path::root().join("config").join("parent"),
            ancestor: Path::root(),
        }
    );
    assert_eq!(template.check_cycles(), Err(err));
}

#[test]
fn self_reference_is_a_cycle() {
    setup();

    let mut b = TemplateBuilder::new();
    let list = b.sequence();
    let one = b.scalar(1);
    b.push(list, one).unwrap();
    b.push(list, list).unwrap();
    let template = b.build(list).unwrap();

    for strategy in [Strategy::Recursive, Strategy::Compiled] {
        let config = EmbodyConfig::default().with_strategy(strategy);
        let err = Embodier::with_config(template.clone(), config)
            .embody(&Context::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cycle at [1]: the same node is already being embodied at <root>",
            "{strategy:?}"
        );
    }
}

#[test]
fn diamonds_are_not_cycles() {
    setup();

    let mut b = TemplateBuilder::new();
    let leaf = b.value(value!(["${x}"]));
    let left = b.mapping();
    let right = b.mapping();
    b.insert(left, "v", leaf).unwrap();
    b.insert(right, "v", leaf).unwrap();
    let root = b.sequence();
    b.push(root, left).unwrap();
    b.push(root, right).unwrap();
    let template = b.build(root).unwrap();

    assert_eq!(template.check_cycles(), Ok(()));
    let out = both(&template, &Context::new().with("x", 0), EmbodyConfig::default()).unwrap();
    assert_eq!(out, value!([{ "v": [0] }, { "v": [0] }]));
}
