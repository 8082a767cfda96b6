//! Shape statistics and automatic engine selection.

use embody_value::Value;

use crate::tracing_macros::debug;
use crate::{EmbodyConfig, Node, NodeId, Strategy, Syntax, Template};

/// Shape of a template, as far as engine selection cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemplateStats {
    /// Longest chain of containers below the root: `0` for a scalar or an empty
    /// container, `1` for `{"a": 1}`.
    pub max_depth: usize,
    /// Leaves holding at least one placeholder.
    pub placeholder_leaves: usize,
    /// Placeholder spans in leaves and keys.
    pub placeholders: usize,
    /// Container nodes visited.
    pub containers: usize,
    /// Scalar nodes visited.
    pub leaves: usize,
}

impl TemplateStats {
    /// Walks `template` once, counting shared nodes at every place they appear and
    /// not following cycles.
    pub fn collect(template: &Template, syntax: Syntax) -> Self {
        let mut stats = TemplateStats::default();
        // (node, depth, ancestors on this branch)
        let mut stack: Vec<(NodeId, usize, Vec<NodeId>)> = vec![(template.root(), 0, Vec::new())];
        while let Some((id, depth, ancestors)) = stack.pop() {
            if ancestors.contains(&id) {
                continue;
            }
            match template.node(id) {
                Node::Scalar(value) => {
                    stats.leaves += 1;
                    if let Value::String(s) = value {
                        let spans = syntax.placeholders(s).count();
                        stats.placeholders += spans;
                        if spans > 0 {
                            stats.placeholder_leaves += 1;
                        }
                    }
                }
                Node::Sequence(children) => {
                    stats.containers += 1;
                    if !children.is_empty() {
                        stats.max_depth = stats.max_depth.max(depth + 1);
                    }
                    let mut below = ancestors;
                    below.push(id);
                    for child in children.iter().rev() {
                        stack.push((*child, depth + 1, below.clone()));
                    }
                }
                Node::Mapping(entries) => {
                    stats.containers += 1;
                    if !entries.is_empty() {
                        stats.max_depth = stats.max_depth.max(depth + 1);
                    }
                    let mut below = ancestors;
                    below.push(id);
                    for (key, child) in entries.iter().rev() {
                        stats.placeholders += syntax.placeholders(key).count();
                        stack.push((*child, depth + 1, below.clone()));
                    }
                }
            }
        }
        stats
    }
}

/// Resolves [`Strategy::Auto`] against `stats`. Explicit strategies are returned
/// unchanged.
pub fn select(config: &EmbodyConfig, stats: &TemplateStats) -> Strategy {
    if config.strategy != Strategy::Auto {
        return config.strategy;
    }
    let limits = &config.auto;
    let reuse = config.expected_reuse.unwrap_or(0);
    let chosen = if stats.max_depth > limits.max_depth
        || stats.placeholders > limits.max_placeholders
        || reuse > limits.reuse
    {
        Strategy::Compiled
    } else {
        Strategy::Recursive
    };
    debug!(
        strategy = %chosen,
        depth = stats.max_depth,
        placeholders = stats.placeholders,
        reuse,
        "selected engine"
    );
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AutoThresholds;
    use embody_value::value;

    fn stats(v: Value) -> TemplateStats {
        TemplateStats::collect(&Template::from(v), Syntax::DollarBrace)
    }

    #[test]
    fn counts_shape() {
        let s = stats(value!({
            "${k}": "${a}-${b}",
            "list": [1, "${c}", {}],
            "plain": "text"
        }));
        assert_eq!(
            s,
            TemplateStats {
                max_depth: 2,
                placeholder_leaves: 2,
                placeholders: 4,
                containers: 3,
                leaves: 4,
            }
        );
    }

    #[test]
    fn shallow_small_templates_stay_recursive() {
        let config = EmbodyConfig::default();
        let s = stats(value!({ "a": { "b": "${x}" } }));
        assert_eq!(select(&config, &s), Strategy::Recursive);
    }

    #[test]
    fn depth_placeholders_or_reuse_pick_compiled() {
        let config = EmbodyConfig::default();
        let deep = stats(value!({ "a": { "b": { "c": { "d": { "e": { "f": 1 } } } } } }));
        assert_eq!(deep.max_depth, 6);
        assert_eq!(select(&config, &deep), Strategy::Compiled);

        let many: Value = (0..11).map(|i| format!("${{p{i}}}")).collect();
        assert_eq!(select(&config, &stats(many)), Strategy::Compiled);

        let small = stats(value!({ "a": "${x}" }));
        assert_eq!(select(&config.clone().with_expected_reuse(1), &small), Strategy::Recursive);
        assert_eq!(select(&config.with_expected_reuse(2), &small), Strategy::Compiled);
    }

    #[test]
    fn thresholds_are_configurable() {
        let config = EmbodyConfig::default().with_auto_thresholds(AutoThresholds {
            max_depth: 0,
            ..AutoThresholds::default()
        });
        assert_eq!(select(&config, &stats(value!({ "a": 1 }))), Strategy::Compiled);
        let fixed = EmbodyConfig::default().with_strategy(Strategy::Recursive);
        let deep = stats(value!({ "a": { "b": { "c": { "d": { "e": { "f": 1 } } } } } }));
        assert_eq!(select(&fixed, &deep), Strategy::Recursive);
    }
}
