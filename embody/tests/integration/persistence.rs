use std::sync::Arc;

use embody::{
    CompiledPlan, Context, EmbodyConfig, Embodier, KeyCollision, Shape, Syntax, Template, value,
};
use embody_testhelpers::{IPanic, setup};

#[test]
fn plans_survive_a_round_trip() -> Result<(), IPanic> {
    setup();

    let template = Template::from(value!({
        "${env}_db": { "url": "pg://${host}/${db}", "pool": "${pool}" },
        "replicas": [1, "${n}"]
    }));
    let plan = CompiledPlan::compile(&template, Syntax::DollarBrace)?;
    let stored = serde_json::to_string(&plan)?;
    let loaded: CompiledPlan = serde_json::from_str(&stored)?;
    assert_eq!(loaded, plan);
    assert_eq!(
        loaded.shape_at(&embody::Path::parse_dot("${env}_db")),
        Some(Shape::Mapping { templated_keys: false })
    );
    assert_eq!(loaded.parameters(), ["env", "host", "db", "pool", "n"]);

    let ctx = Context::new()
        .with("env", "prod")
        .with("host", "h")
        .with("db", "app")
        .with("pool", value!({ "min": 1 }))
        .with("n", 2);
    let expected = value!({
        "prod_db": { "url": "pg://h/app", "pool": { "min": 1 } },
        "replicas": [1, 2]
    });
    assert_eq!(loaded.embody(&ctx, &EmbodyConfig::default())?, expected);

    let embodier = Embodier::new(template).with_plan(Arc::new(loaded));
    assert!(embodier.plan().is_some());
    assert_eq!(embodier.embody(&ctx)?, expected);
    Ok(())
}

#[test]
fn plans_keep_their_syntax() -> Result<(), IPanic> {
    setup();

    let template = Template::from(value!({ "a": "[[x]]" }));
    let plan = CompiledPlan::compile(&template, Syntax::DoubleBracket)?;
    let loaded: CompiledPlan = serde_json::from_str(&serde_json::to_string(&plan)?)?;
    assert_eq!(loaded.syntax(), Syntax::DoubleBracket);
    let config = EmbodyConfig::default().with_key_collision(KeyCollision::Namespace);
    assert_eq!(loaded.embody(&Context::new().with("x", true), &config)?, value!({ "a": true }));
    Ok(())
}

#[test]
fn tampered_plans_are_rejected() -> Result<(), IPanic> {
    setup();

    let plan = CompiledPlan::compile(&Template::from(value!([1, 2])), Syntax::DollarBrace)?;
    let stored = serde_json::to_value(&plan)?;
    let mut tampered = stored.clone();
    tampered["entries"][0]["kind"]["Sequence"]["children"] = serde_json::json!([2, 2]);
    let err = serde_json::from_value::<CompiledPlan>(tampered).unwrap_err();
    assert!(err.to_string().contains("two parents"), "{err}");
    Ok(())
}
