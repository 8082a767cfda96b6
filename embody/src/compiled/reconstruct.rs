use embody_value::Value;

use super::plan::{CompiledPlan, EntryKind};
use crate::keys::{Keyed, settle};
use crate::substitute::{embody_key, embody_leaf};
use crate::{Context, EmbodyConfig, EmbodyError};

impl CompiledPlan {
    /// Embodies the plan against `ctx`.
    ///
    /// Keys and leaves are resolved first, in template order, then containers are
    /// rebuilt from the deepest paths up. The plan's own syntax applies; `config`
    /// supplies the collision policy and strictness.
    pub fn embody(&self, ctx: &Context, config: &EmbodyConfig) -> Result<Value, EmbodyError> {
        let entries = self.entries();
        let mut keys: Vec<Option<String>> = vec![None; entries.len()];
        let mut slots: Vec<Option<Value>> = (0..entries.len()).map(|_| None).collect();

        for (i, entry) in entries.iter().enumerate() {
            if let Some(descriptor) = &entry.key {
                let source = entry.source_key().unwrap_or_default();
                keys[i] = Some(embody_key(source, descriptor, ctx, config.strict, &entry.path)?);
            }
            if let EntryKind::Leaf { source, descriptor } = &entry.kind {
                slots[i] = Some(embody_leaf(source, descriptor, ctx, config.strict, &entry.path)?);
            }
        }

        for &i in self.rebuild_order() {
            let value = match &entries[i].kind {
                EntryKind::Leaf { .. } => continue,
                EntryKind::Sequence { children } => Value::Array(
                    children
                        .iter()
                        .map(|&c| slots[c].take().unwrap_or_default())
                        .collect(),
                ),
                EntryKind::Mapping {
                    children,
                    templated_keys: false,
                } => Value::Object(
                    children
                        .iter()
                        .map(|&c| {
                            let key = entries[c].source_key().unwrap_or_default();
                            (key, slots[c].take().unwrap_or_default())
                        })
                        .collect(),
                ),
                EntryKind::Mapping {
                    children,
                    templated_keys: true,
                } => {
                    let keyed = children
                        .iter()
                        .map(|&c| Keyed {
                            key: keys[c].take().unwrap_or_else(|| {
                                entries[c].source_key().unwrap_or_default().to_owned()
                            }),
                            source: entries[c].path.clone(),
                            value: slots[c].take().unwrap_or_default(),
                        })
                        .collect();
                    Value::Object(settle(keyed, config.key_collision)?.into_iter().collect())
                }
            };
            slots[i] = Some(value);
        }

        Ok(slots.first_mut().and_then(Option::take).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use crate::{CompiledPlan, Context, EmbodyConfig, KeyCollision, Syntax, Template};
    use embody_value::{Value, value};

    fn plan(v: Value) -> CompiledPlan {
        CompiledPlan::compile(&Template::from(v), Syntax::DollarBrace).unwrap()
    }

    #[test]
    fn rebuilds_the_template_shape() {
        let p = plan(value!({
            "count": "${n}",
            "msg": "x=${n}",
            "nested": { "list": ["${n}", [], {}] },
            "0": "numeric key"
        }));
        let out = p.embody(&Context::new().with("n", 42), &EmbodyConfig::default()).unwrap();
        assert_eq!(
            out,
            value!({
                "count": 42,
                "msg": "x=42",
                "nested": { "list": [42, [], {}] },
                "0": "numeric key"
            })
        );
    }

    #[test]
    fn scalar_root() {
        let p = plan(Value::from("${v}"));
        let out = p.embody(&Context::new().with("v", value!({ "a": 1 })), &EmbodyConfig::default());
        assert_eq!(out.unwrap(), value!({ "a": 1 }));
    }

    #[test]
    fn one_plan_many_contexts() {
        let p = plan(value!({ "${k}": "${v}" }));
        let config = EmbodyConfig::default().with_key_collision(KeyCollision::Namespace);
        for (k, v) in [("a", 1), ("b", 2)] {
            let out = p.embody(&Context::new().with("k", k).with("v", v), &config).unwrap();
            let mut expected = embody_value::VObject::new();
            expected.insert(k, v);
            assert_eq!(out, Value::Object(expected));
        }
    }

    #[test]
    fn missing_parameters_name_the_leaf() {
        let p = plan(value!({ "a": [{ "b": "${nope}" }] }));
        let err = p.embody(&Context::new(), &EmbodyConfig::default()).unwrap_err();
        insta::assert_snapshot!(err, @"missing parameter `nope` at a[0].b");
        let lenient = EmbodyConfig::default().with_strict(false);
        assert_eq!(
            p.embody(&Context::new(), &lenient).unwrap(),
            value!({ "a": [{ "b": "${nope}" }] })
        );
    }
}
