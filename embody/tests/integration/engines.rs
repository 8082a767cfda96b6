use embody::{
    Context, EmbodyConfig, Embodier, KeyCollision, Strategy, Template, TemplateBuilder, value,
};
use embody_testhelpers::{IPanic, setup};

use crate::both;

#[test]
fn engines_agree_on_mixed_templates() -> Result<(), IPanic> {
    setup();

    let ctx = Context::new()
        .with("env", "prod")
        .with("host", "db.internal")
        .with("port", 5432)
        .with("replicas", 3)
        .with("labels", value!({ "team": "core" }));
    let templates = [
        value!({
            "name": "${env}-api",
            "${env}_db": { "host": "${host}", "port": "${port}", "url": "pg://${host}:${port}" },
            "replicas": "${replicas}",
            "labels": "${labels}",
            "matrix": [[1, "${port}"], [], [{ "${env}": true }]]
        }),
        value!(["${env}", ["${env}", ["${env}", ["${env}"]]]]),
        value!("${labels}"),
        value!({ "0": "${port}", "1": ["${port}"], "10": { "2": "x" } }),
        value!({}),
    ];
    for template in templates {
        for policy in [KeyCollision::Error, KeyCollision::LastWins, KeyCollision::Namespace] {
            let config = EmbodyConfig::default().with_key_collision(policy);
            both(&Template::from(&template), &ctx, config)?;
        }
    }
    Ok(())
}

#[test]
fn numeric_looking_keys_stay_keys() -> Result<(), IPanic> {
    setup();

    let template = Template::from(value!({ "0": "a", "1": "${b}", "list": ["${b}"] }));
    let out = both(&template, &Context::new().with("b", "B"), EmbodyConfig::default())?;
    assert_eq!(out, value!({ "0": "a", "1": "B", "list": ["B"] }));
    assert!(out.as_object().is_some());
    Ok(())
}

#[test]
fn shared_subtrees_are_embodied_at_every_place() -> Result<(), IPanic> {
    setup();

    let mut b = TemplateBuilder::new();
    let shared = b.value(value!({ "host": "${host}" }));
    let root = b.mapping();
    b.insert(root, "primary", shared)?;
    b.insert(root, "replica", shared)?;
    let list = b.sequence();
    b.push(list, shared)?;
    b.push(list, shared)?;
    b.insert(root, "all", list)?;
    let template = b.build(root)?;

    let out = both(&template, &Context::new().with("host", "h"), EmbodyConfig::default())?;
    assert_eq!(
        out,
        value!({
            "primary": { "host": "h" },
            "replica": { "host": "h" },
            "all": [{ "host": "h" }, { "host": "h" }]
        })
    );
    Ok(())
}

#[test]
fn an_embodier_serves_many_contexts() -> Result<(), IPanic> {
    setup();

    for strategy in [Strategy::Recursive, Strategy::Compiled] {
        let embodier = Embodier::with_config(
            Template::from(value!({ "greeting": "hello ${who}", "who": "${who}" })),
            EmbodyConfig::default().with_strategy(strategy),
        );
        assert_eq!(embodier.strategy(), strategy);
        for who in ["ada", "bob"] {
            let out = embodier.embody(&Context::new().with("who", who))?;
            assert_eq!(out.get("who"), Some(&who.into()));
        }
    }
    Ok(())
}

#[test]
fn the_template_is_not_changed() -> Result<(), IPanic> {
    setup();

    let source = value!({ "a": "${x}", "b": ["${x}"] });
    let template = Template::from(&source);
    let config = EmbodyConfig::default().with_strategy(Strategy::Compiled);
    let embodier = Embodier::with_config(template, config);
    embodier.embody(&Context::new().with("x", 1))?;
    embodier.embody(&Context::new().with("x", 2))?;
    let again = Embodier::new(Template::from(&source)).embody(&Context::new().with("x", 3))?;
    assert_eq!(again, value!({ "a": 3, "b": [3] }));
    Ok(())
}
