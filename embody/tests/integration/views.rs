use std::collections::HashSet;

use embody::{
    Attr, Context, EmbodyConfig, Embodier, FlatView, FrozenView, MappingView, PathView, Template,
    Value, View, value,
};
use embody_testhelpers::{Counter, IPanic, setup};

fn template() -> Template {
    Template::from(value!({
        "service": { "name": "${name}", "ports": ["${port}", 443] },
        "stamp": "${tick}"
    }))
}

fn context(counter: &Counter) -> Context {
    let c = counter.clone();
    Context::new()
        .with("name", "api")
        .with("port", 80)
        .with_resolver("tick", move || Value::from(c.bump()))
}

#[test]
fn materialized_views_embody_once() -> Result<(), IPanic> {
    setup();

    let counter = Counter::new();
    let embodier = Embodier::new(template());
    let view = embodier.view(&context(&counter))?;
    assert!(!view.is_lazy());
    assert_eq!(counter.get(), 1);

    assert_eq!(view.keys(), ["service", "stamp"]);
    assert_eq!(view.len(), 2);
    assert_eq!(view.value("stamp")?, Value::from(1));
    assert_eq!(view.value("stamp")?, Value::from(1));

    let View::Materialized(attrs) = &view else {
        panic!("expected a materialized view");
    };
    let Some(Attr::Mapping(service)) = attrs.get("service") else {
        panic!("service should be a mapping");
    };
    assert_eq!(service.get("name").and_then(|a| a.as_leaf().cloned()), Some(Value::from("api")));
    assert_eq!(
        attrs.attr("service.ports").map(|a| a.to_value()),
        Some(value!([80, 443]))
    );
    Ok(())
}

#[test]
fn lazy_views_defer_and_do_not_cache() -> Result<(), IPanic> {
    setup();

    let counter = Counter::new();
    let embodier = Embodier::with_config(template(), EmbodyConfig::default().with_lazy(true));
    let view = embodier.view(&context(&counter))?;
    assert!(view.is_lazy());
    assert_eq!(counter.get(), 0);
    assert_eq!(view.keys(), ["service", "stamp"]);

    assert_eq!(view.value("service")?, value!({ "name": "api", "ports": [80, 443] }));
    assert_eq!(counter.get(), 0);
    assert_eq!(view.value("stamp")?, Value::from(1));
    assert_eq!(view.value("stamp")?, Value::from(2));

    let whole = view.materialize()?;
    assert_eq!(whole.get("stamp"), Some(&Value::from(3)));
    assert!(view.value("missing").is_err());
    Ok(())
}

#[test]
fn flat_and_path_views_cover_the_same_leaves() -> Result<(), IPanic> {
    setup();

    let counter = Counter::new();
    let result = Embodier::new(template()).embody(&context(&counter))?;

    let flat = FlatView::new(&result);
    assert_eq!(
        flat.keys(),
        ["service.name", "service.ports.0", "service.ports.1", "stamp"]
    );
    let paths = PathView::new(result.clone());
    for (dotted, leaf) in flat.iter() {
        assert_eq!(paths.get(dotted)?, leaf);
        let pointer = format!("/{}", dotted.replace('.', "/"));
        assert_eq!(paths.get(pointer.as_str())?, leaf);
    }
    assert_eq!(flat.unflatten()?, result);
    assert_eq!(flat.subtree("service.ports").keys(), ["0", "1"]);
    Ok(())
}

#[test]
fn frozen_views_key_caches() -> Result<(), IPanic> {
    setup();

    let embodier = Embodier::new(Template::from(value!({ "host": "${h}", "port": "${p}" })));
    let mut seen = HashSet::new();
    for (h, p) in [("a", 1), ("b", 1), ("a", 1)] {
        let ctx = Context::new().with("h", h).with("p", p);
        seen.insert(FrozenView::new(embodier.embody(&ctx)?));
    }
    assert_eq!(seen.len(), 2);

    let frozen = FrozenView::new(value!({ "host": "a", "port": 1 }));
    assert!(seen.contains(&frozen));
    assert_eq!(frozen.get("/port")?, &Value::from(1));
    assert_eq!(frozen.to_object()?.len(), 2);
    Ok(())
}
