use embody::{Context, EmbodyConfig, EmbodyError, Syntax, Template, Value, embody, value};
use embody_testhelpers::{IPanic, setup};

use crate::both;

#[test]
fn exact_placeholders_keep_their_type() -> Result<(), IPanic> {
    setup();

    let ctx = Context::new().with("n", 42);
    let out = embody(&Template::from(value!({ "count": "${n}" })), &ctx)?;
    assert_eq!(out, value!({ "count": 42 }));
    assert_eq!(out.get("count").and_then(Value::as_i64), Some(42));

    let out = embody(&Template::from(value!({ "m": "x=${n}" })), &ctx)?;
    assert_eq!(out, value!({ "m": "x=42" }));
    Ok(())
}

#[test]
fn exact_placeholders_can_be_containers() -> Result<(), IPanic> {
    setup();

    let ctx = Context::new()
        .with("db", value!({ "host": "h", "ports": [1, 2] }))
        .with("flag", false)
        .with("none", Value::Null);
    let template = Template::from(value!({
        "db": "${db}",
        "flag": "${flag}",
        "none": "${none}",
        "s": "${db}!"
    }));
    let out = both(&template, &ctx, EmbodyConfig::default())?;
    assert_eq!(
        out,
        value!({
            "db": { "host": "h", "ports": [1, 2] },
            "flag": false,
            "none": null,
            "s": r#"{"host":"h","ports":[1,2]}!"#
        })
    );
    Ok(())
}

#[test]
fn untemplated_input_comes_back_unchanged() -> Result<(), IPanic> {
    setup();

    let plain = value!({
        "name": "svc",
        "replicas": 3,
        "ratio": 0.5,
        "tags": ["a", "b", []],
        "meta": { "owner": null, "empty": {} },
        "almost": "$ {x} ${} ${1x}"
    });
    let out = both(&Template::from(&plain), &Context::new(), EmbodyConfig::default())?;
    assert_eq!(out, plain);
    Ok(())
}

#[test]
fn each_syntax_family_is_used_alone() -> Result<(), IPanic> {
    setup();

    let template = Template::from(value!(["${x}", "{x}", "[[x]]", "a{x}b"]));
    let ctx = Context::new().with("x", 1);
    let run = |syntax| both(&template, &ctx, EmbodyConfig::default().with_syntax(syntax));
    assert_eq!(run(Syntax::DollarBrace)?, value!([1, "{x}", "[[x]]", "a{x}b"]));
    assert_eq!(run(Syntax::Brace)?, value!(["$1", 1, "[[x]]", "a1b"]));
    assert_eq!(run(Syntax::DoubleBracket)?, value!(["${x}", "{x}", 1, "a{x}b"]));
    Ok(())
}

#[test]
fn missing_parameters_name_the_leaf() {
    setup();

    let template = Template::from(value!({ "svc": { "ports": [80, "${port}"] } }));
    let err = both(&template, &Context::new(), EmbodyConfig::default()).unwrap_err();
    insta::assert_snapshot!(err, @"missing parameter `port` at svc.ports[1]");
    assert_eq!(err.path().map(ToString::to_string).as_deref(), Some("svc.ports[1]"));

    let template = Template::from(value!({ "${env}_host": "h" }));
    let err = both(&template, &Context::new(), EmbodyConfig::default()).unwrap_err();
    assert!(matches!(err, EmbodyError::MissingParameter { ref name, .. } if name == "env"));
}

#[test]
fn lenient_mode_keeps_unbound_placeholders() -> Result<(), IPanic> {
    setup();

    let template =
        Template::from(value!({ "a": "${a}", "b": "${b}", "ab": "${a}/${b}", "${k}": 1 }));
    let ctx = Context::new().with("a", 1);
    let out = both(&template, &ctx, EmbodyConfig::default().with_strict(false))?;
    assert_eq!(out, value!({ "a": 1, "b": "${b}", "ab": "1/${b}", "${k}": 1 }));
    Ok(())
}

#[test]
fn opaque_values_pass_through() -> Result<(), IPanic> {
    setup();

    #[derive(Debug)]
    struct Handle(u32);

    let handle = Value::from(embody::VOpaque::new(Handle(7)));
    let template = Template::from(value!({ "h": "${h}", "literal": null }));
    let ctx = Context::new().with("h", handle.clone());
    let mut out = both(&template, &ctx, EmbodyConfig::default())?;
    assert_eq!(out.get("h"), Some(&handle));

    let held = out
        .as_object_mut()
        .and_then(|obj| obj.remove("h"))
        .and_then(|h| h.as_opaque().and_then(|o| o.downcast_ref::<Handle>()).map(|h| h.0));
    assert_eq!(held, Some(7));
    Ok(())
}
