//! Two-phase embodiment: compile a template into a [`CompiledPlan`] once, then
//! rebuild results from it for any number of contexts.

mod plan;
mod reconstruct;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub use plan::{CompiledPlan, EntryKind, PlanEntry, Shape};

use crate::tracing_macros::trace;
use crate::{EmbodyConfig, EmbodyError, Embodier, Syntax, Template, TemplateId};

/// Plans keyed by template identity and syntax.
///
/// Plans are immutable and handed out as `Arc`s, so they can be embodied from
/// several threads at once. A template dropped by its owner keeps its plan here
/// until [`PlanCache::remove`] or [`PlanCache::clear`].
#[derive(Debug, Default)]
pub struct PlanCache {
    plans: RwLock<HashMap<(TemplateId, Syntax), Arc<CompiledPlan>>>,
}

impl PlanCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached plan for `template`, compiling it on first use.
    pub fn get_or_compile(
        &self,
        template: &Template,
        syntax: Syntax,
    ) -> Result<Arc<CompiledPlan>, EmbodyError> {
        let key = (template.id(), syntax);
        if let Some(plan) = self
            .plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            trace!(template = ?template.id(), "plan cache hit");
            return Ok(Arc::clone(plan));
        }

        // Compile outside the lock; if another thread got there first, keep theirs.
        let plan = Arc::new(CompiledPlan::compile(template, syntax)?);
        let mut plans = self.plans.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(plans.entry(key).or_insert(plan)))
    }

    /// An [`Embodier`] for `template` that runs the compiled engine on this
    /// cache's plan, whatever `config.strategy` says.
    pub fn embodier(
        &self,
        template: Arc<Template>,
        config: EmbodyConfig,
    ) -> Result<Embodier, EmbodyError> {
        let plan = self.get_or_compile(&template, config.syntax)?;
        Ok(Embodier::with_config(template, config).with_plan(plan))
    }

    /// Drops every plan of `template`. Returns how many were removed.
    pub fn remove(&self, template: TemplateId) -> usize {
        let mut plans = self.plans.write().unwrap_or_else(PoisonError::into_inner);
        let before = plans.len();
        plans.retain(|(id, _), _| *id != template);
        before - plans.len()
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        self.plans.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every plan.
    pub fn clear(&self) {
        self.plans.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Context, Strategy};
    use embody_value::value;

    #[test]
    fn one_plan_per_template_and_syntax() {
        let cache = PlanCache::new();
        let t = Template::from(value!({ "a": "${x}" }));
        let first = cache.get_or_compile(&t, Syntax::DollarBrace).unwrap();
        let again = cache.get_or_compile(&t.clone(), Syntax::DollarBrace).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        cache.get_or_compile(&t, Syntax::Brace).unwrap();
        let other = Template::from(value!({ "a": "${x}" }));
        cache.get_or_compile(&other, Syntax::DollarBrace).unwrap();
        assert_eq!(cache.len(), 3);

        assert_eq!(cache.remove(t.id()), 2);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn cached_embodiers_run_the_cached_plan() {
        let cache = PlanCache::new();
        let t = Arc::new(Template::from(value!({ "a": "${x}" })));
        let e = cache.embodier(Arc::clone(&t), EmbodyConfig::default()).unwrap();
        assert_eq!(e.strategy(), Strategy::Compiled);
        let cached = cache.get_or_compile(&t, Syntax::DollarBrace).unwrap();
        assert!(Arc::ptr_eq(e.plan().unwrap(), &cached));
        assert_eq!(e.embody(&Context::new().with("x", 3)).unwrap(), value!({ "a": 3 }));
    }
}
