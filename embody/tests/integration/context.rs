use embody::{Context, EmbodyConfig, Embodier, Strategy, Template, Value, value};
use embody_testhelpers::{Counter, IPanic, setup};

fn ticking(counter: &Counter) -> Context {
    let c = counter.clone();
    Context::new().with_resolver("tick", move || Value::from(c.bump()))
}

#[test]
fn resolvers_are_called_at_every_lookup() -> Result<(), IPanic> {
    setup();

    for strategy in [Strategy::Recursive, Strategy::Compiled] {
        let counter = Counter::new();
        let ctx = ticking(&counter);
        let embodier = Embodier::with_config(
            Template::from(value!(["${tick}", "${tick}", { "t": "${tick}" }, "at ${tick}"])),
            EmbodyConfig::default().with_strategy(strategy),
        );

        let first = embodier.embody(&ctx)?;
        assert_eq!(first, value!([1, 2, { "t": 3 }, "at 4"]));

        // Same context, second embodiment: nothing was cached.
        let second = embodier.embody(&ctx)?;
        assert_eq!(second, value!([5, 6, { "t": 7 }, "at 8"]));
        assert_eq!(counter.get(), 8);
    }
    Ok(())
}

#[test]
fn child_frames_override_without_copying() -> Result<(), IPanic> {
    setup();

    let base = Context::new().with("region", "eu").with("port", 80);
    let template = Template::from(value!({ "where": "${region}", "port": "${port}" }));
    let embodier = Embodier::new(template);

    let overridden = base.child([("port", 8080)]);
    assert_eq!(embodier.embody(&overridden)?, value!({ "where": "eu", "port": 8080 }));
    assert_eq!(embodier.embody(&base)?, value!({ "where": "eu", "port": 80 }));

    let deeper = overridden.child([("region", "us")]);
    assert_eq!(deeper.depth(), 3);
    assert_eq!(embodier.embody(&deeper)?, value!({ "where": "us", "port": 8080 }));
    Ok(())
}

#[test]
fn contains_never_resolves() {
    setup();

    let counter = Counter::new();
    let ctx = ticking(&counter).child([("other", 1)]);
    assert!(ctx.contains("tick"));
    assert!(!ctx.contains("nope"));
    let embodier = Embodier::new(Template::from(value!({ "a": "${tick}", "b": "${nope}" })));
    assert_eq!(embodier.missing_parameters(&ctx), ["nope"]);
    assert_eq!(counter.get(), 0);
}

#[test]
fn lookup_failure_is_a_missing_parameter() {
    setup();

    let err = Context::new().with("a", 1).lookup("b").unwrap_err();
    insta::assert_snapshot!(err, @"missing parameter `b` at <root>");
}
