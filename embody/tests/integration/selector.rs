use embody::{
    AutoThresholds, Context, EmbodyConfig, Embodier, Strategy, Template, TemplateStats, Value,
    select, value,
};
use embody_testhelpers::{IPanic, setup};

fn nested(levels: usize) -> Value {
    (0..levels).fold(Value::from("${leaf}"), |inner, _| value!({ "n": inner }))
}

#[test]
fn auto_picks_by_depth() -> Result<(), IPanic> {
    setup();

    let shallow = Embodier::new(Template::from(nested(5)));
    assert_eq!(shallow.stats().max_depth, 5);
    assert_eq!(shallow.strategy(), Strategy::Recursive);

    let deep = Embodier::new(Template::from(nested(6)));
    assert_eq!(deep.strategy(), Strategy::Compiled);

    let ctx = Context::new().with("leaf", 1);
    assert_eq!(embody::resolve(&deep.embody(&ctx)?, "n.n.n.n.n.n")?, &Value::from(1));
    assert!(deep.plan().is_some());
    assert!(shallow.plan().is_none());
    Ok(())
}

#[test]
fn auto_picks_by_placeholder_count_and_reuse() {
    setup();

    let wide: Value = (0..12).map(|i| format!("${{p{i}}}")).collect();
    let stats = TemplateStats::collect(&Template::from(wide), Default::default());
    assert_eq!(stats.placeholder_leaves, 12);
    assert_eq!(select(&EmbodyConfig::default(), &stats), Strategy::Compiled);

    let small_template = Template::from(value!({ "a": "${a}" }));
    let small = TemplateStats::collect(&small_template, Default::default());
    let config = EmbodyConfig::default();
    assert_eq!(select(&config, &small), Strategy::Recursive);
    assert_eq!(select(&config.clone().with_expected_reuse(10), &small), Strategy::Compiled);

    let patient = config.with_expected_reuse(10).with_auto_thresholds(AutoThresholds {
        reuse: 100,
        ..AutoThresholds::default()
    });
    assert_eq!(select(&patient, &small), Strategy::Recursive);
}

#[test]
fn both_choices_give_the_same_answer() -> Result<(), IPanic> {
    setup();

    let template = Template::from(nested(8));
    let ctx = Context::new().with("leaf", value!({ "deep": true }));
    let auto = Embodier::new(template.clone());
    let config = EmbodyConfig::default().with_strategy(Strategy::Recursive);
    let forced = Embodier::with_config(template, config);
    assert_ne!(auto.strategy(), forced.strategy());
    assert_eq!(auto.embody(&ctx)?, forced.embody(&ctx)?);
    Ok(())
}
