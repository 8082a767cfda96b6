use std::sync::Arc;
use std::thread;

use embody::{Context, EmbodyConfig, Embodier, PlanCache, Strategy, Template, Value, value};
use embody_testhelpers::{Counter, IPanic, setup};

#[test]
fn one_plan_many_threads() -> Result<(), IPanic> {
    setup();

    let cache = PlanCache::new();
    let template = Arc::new(Template::from(value!({ "id": "${id}", "tag": "worker-${id}" })));
    let embodier = cache.embodier(
        Arc::clone(&template),
        EmbodyConfig::default().with_strategy(Strategy::Compiled),
    )?;

    thread::scope(|s| {
        for id in 0..8 {
            let embodier = &embodier;
            s.spawn(move || {
                for _ in 0..50 {
                    let out = embodier.embody(&Context::new().with("id", id)).unwrap();
                    assert_eq!(out, value!({ "id": id, "tag": (format!("worker-{id}")) }));
                }
            });
        }
    });

    let again = cache.get_or_compile(&template, EmbodyConfig::default().syntax)?;
    assert!(Arc::ptr_eq(&again, embodier.plan().unwrap()));
    assert_eq!(cache.len(), 1);
    Ok(())
}

#[test]
fn shared_contexts_keep_resolvers_live() {
    setup();

    let counter = Counter::new();
    let c = counter.clone();
    let ctx = Context::new().with_resolver("n", move || Value::from(c.bump()));
    let embodier = Embodier::with_config(
        Template::from(value!(["${n}", "${n}"])),
        EmbodyConfig::default().with_strategy(Strategy::Compiled),
    );

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let out = embodier.embody(&ctx).unwrap();
                let items = out.as_array().unwrap();
                let (a, b) = (items[0].as_i64().unwrap(), items[1].as_i64().unwrap());
                assert!(a < b, "lookups within one embodiment see increasing values");
            });
        }
    });
    assert_eq!(counter.get(), 8);
}
