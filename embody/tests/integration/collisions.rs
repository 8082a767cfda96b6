use embody::{Context, EmbodyConfig, EmbodyError, KeyCollision, Path, Template, value};
use embody_testhelpers::{IPanic, setup};

use crate::both;

fn template() -> Template {
    Template::from(value!({ "${e}_host": "A", "prod_host": "B" }))
}

#[test]
fn error_policy_names_both_sources() {
    setup();

    let ctx = Context::new().with("e", "prod");
    let err = both(&template(), &ctx, EmbodyConfig::default()).unwrap_err();
    assert_eq!(
        err,
        EmbodyError::KeyCollision {
            key: "prod_host".to_owned(),
            first: Path::root().join("${e}_host"),
            second: Path::root().join("prod_host"),
        }
    );
    insta::assert_snapshot!(err, @r#"keys at ${e}_host and prod_host both resolve to "prod_host""#);
}

#[test]
fn last_wins_takes_the_later_value() -> Result<(), IPanic> {
    setup();

    let ctx = Context::new().with("e", "prod");
    let config = EmbodyConfig::default().with_key_collision(KeyCollision::LastWins);
    let out = both(&template(), &ctx, config)?;
    assert_eq!(out, value!({ "prod_host": "B" }));
    Ok(())
}

#[test]
fn namespace_keeps_both() -> Result<(), IPanic> {
    setup();

    let ctx = Context::new().with("e", "prod");
    let config = EmbodyConfig::default().with_key_collision(KeyCollision::Namespace);
    let out = both(&template(), &ctx, config)?;
    assert_eq!(out, value!({ "prod_host": "A", "prod_host_1": "B" }));
    Ok(())
}

#[test]
fn no_collision_no_policy() -> Result<(), IPanic> {
    setup();

    let ctx = Context::new().with("e", "dev");
    for policy in [KeyCollision::Error, KeyCollision::LastWins, KeyCollision::Namespace] {
        let out = both(&template(), &ctx, EmbodyConfig::default().with_key_collision(policy))?;
        assert_eq!(out, value!({ "dev_host": "A", "prod_host": "B" }));
    }
    Ok(())
}

#[test]
fn non_string_keys_use_their_text() -> Result<(), IPanic> {
    setup();

    let template = Template::from(value!({ "${id}": "x", "${id}${id}": "y" }));
    let out = both(&template, &Context::new().with("id", 7), EmbodyConfig::default())?;
    assert_eq!(out, value!({ "7": "x", "77": "y" }));
    Ok(())
}

#[test]
fn collisions_inside_nested_mappings() {
    setup();

    let template = Template::from(value!({ "outer": [{ "${a}": 1, "${b}": 2 }] }));
    let ctx = Context::new().with("a", "k").with("b", "k");
    let err = both(&template, &ctx, EmbodyConfig::default()).unwrap_err();
    insta::assert_snapshot!(err, @"keys at outer[0].${a} and outer[0].${b} both resolve to \"k\"");
}
