use embody::{
    Context, EmbodyConfig, EmbodyError, Embodier, Path, PathSegment, Strategy, TemplateBuilder,
    Value,
};
use embody_testhelpers::{IPanic, setup};

const LEVELS: usize = 1000;

/// Builds `{"n": {"n": ... {"n": "${leaf}"}}}` node by node, without a deep `Value`.
fn chain(levels: usize) -> embody::Template {
    let mut b = TemplateBuilder::new();
    let mut inner = b.scalar("${leaf}");
    for i in 0..levels {
        let node = if i % 2 == 0 { b.mapping() } else { b.sequence() };
        if i % 2 == 0 {
            b.insert(node, "n", inner).unwrap();
        } else {
            b.push(node, inner).unwrap();
        }
        inner = node;
    }
    b.build(inner).unwrap()
}

fn leaf_path(levels: usize) -> Path {
    (0..levels)
        .rev()
        .map(|i| {
            if i % 2 == 0 {
                PathSegment::from("n")
            } else {
                PathSegment::Index(0)
            }
        })
        .collect()
}

#[test]
fn deep_templates_use_an_explicit_stack() -> Result<(), IPanic> {
    setup();

    let ctx = Context::new().with("leaf", "bottom");
    for strategy in [Strategy::Recursive, Strategy::Compiled] {
        let config = EmbodyConfig::default()
            .with_strategy(strategy)
            .with_max_recursion_depth(16);
        let embodier = Embodier::with_config(chain(LEVELS), config);
        assert_eq!(embodier.stats().max_depth, LEVELS);
        let out = embodier.embody(&ctx)?;
        assert_eq!(embody::resolve(&out, &leaf_path(LEVELS))?, &Value::from("bottom"));
    }
    Ok(())
}

#[test]
fn very_deep_results_drop_cleanly() -> Result<(), IPanic> {
    setup();

    const NESTED: usize = 30_000;
    let mut b = TemplateBuilder::new();
    let mut inner = b.scalar("${leaf}");
    for _ in 0..NESTED {
        let node = b.sequence();
        b.push(node, inner)?;
        inner = node;
    }
    let template = b.build(inner)?;

    let config = EmbodyConfig::default()
        .with_strategy(Strategy::Recursive)
        .with_max_recursion_depth(16);
    let out = Embodier::with_config(template, config).embody(&Context::new().with("leaf", 7))?;
    let bottom: Path = (0..NESTED).map(PathSegment::Index).collect();
    assert_eq!(embody::resolve(&out, &bottom)?, &Value::from(7));
    drop(out);
    Ok(())
}

#[test]
fn deep_errors_name_the_full_path() {
    setup();

    let config = EmbodyConfig::default()
        .with_strategy(Strategy::Recursive)
        .with_max_recursion_depth(8);
    let err = Embodier::with_config(chain(100), config)
        .embody(&Context::new())
        .unwrap_err();
    let EmbodyError::MissingParameter { name, path } = &err else {
        panic!("expected a missing parameter, got {err}");
    };
    assert_eq!(name, "leaf");
    assert_eq!(path, &leaf_path(100));
}
