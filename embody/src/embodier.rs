use std::sync::{Arc, OnceLock};

use embody_value::Value;

use crate::recursive::embody_recursive;
use crate::select::select;
use crate::tracing_macros::trace;
use crate::views::{AttrView, LazyView, View};
use crate::{CompiledPlan, Context, EmbodyConfig, EmbodyError, Strategy, Template, TemplateStats};

/// A template paired with settings, embodied as often as needed.
///
/// The engine is chosen once, at construction. A compiled plan is built on the
/// first call that needs it and reused afterwards.
///
/// ```
/// use embody::{Context, Embodier, Template, value};
///
/// let embodier = Embodier::new(Template::from(value!({ "count": "${n}", "msg": "n=${n}" })));
/// let out = embodier.embody(&Context::new().with("n", 42)).unwrap();
/// assert_eq!(out, value!({ "count": 42, "msg": "n=42" }));
/// ```
#[derive(Debug)]
pub struct Embodier {
    template: Arc<Template>,
    config: EmbodyConfig,
    stats: TemplateStats,
    strategy: Strategy,
    plan: OnceLock<Arc<CompiledPlan>>,
}

impl Embodier {
    /// An embodier with default settings.
    pub fn new(template: impl Into<Arc<Template>>) -> Self {
        Self::with_config(template, EmbodyConfig::default())
    }

    /// An embodier with `config`.
    pub fn with_config(template: impl Into<Arc<Template>>, config: EmbodyConfig) -> Self {
        let template = template.into();
        let stats = TemplateStats::collect(&template, config.syntax);
        let strategy = select(&config, &stats);
        Self {
            template,
            config,
            stats,
            strategy,
            plan: OnceLock::new(),
        }
    }

    /// Uses `plan` instead of compiling one, and switches to the compiled engine
    /// whatever strategy was chosen before. The plan's syntax applies.
    pub fn with_plan(self, plan: Arc<CompiledPlan>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(plan);
        Self {
            plan: cell,
            strategy: Strategy::Compiled,
            ..self
        }
    }

    /// The template.
    pub fn template(&self) -> &Arc<Template> {
        &self.template
    }

    /// The settings.
    pub fn config(&self) -> &EmbodyConfig {
        &self.config
    }

    /// The engine in use: never [`Strategy::Auto`].
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Shape statistics the engine was chosen from.
    pub fn stats(&self) -> &TemplateStats {
        &self.stats
    }

    /// Placeholder names the template uses.
    pub fn parameters(&self) -> Vec<String> {
        self.template.parameters(self.config.syntax)
    }

    /// Placeholder names `ctx` does not bind. Resolvers are not called.
    pub fn missing_parameters(&self, ctx: &Context) -> Vec<String> {
        self.parameters()
            .into_iter()
            .filter(|name| !ctx.contains(name))
            .collect()
    }

    /// Compiles the plan now if it has not been yet.
    pub fn compile(&self) -> Result<&Arc<CompiledPlan>, EmbodyError> {
        if let Some(plan) = self.plan.get() {
            trace!(template = ?self.template.id(), "reusing plan");
            return Ok(plan);
        }
        let plan = Arc::new(CompiledPlan::compile(&self.template, self.config.syntax)?);
        Ok(self.plan.get_or_init(|| plan))
    }

    /// The plan, if one has been compiled or supplied.
    pub fn plan(&self) -> Option<&Arc<CompiledPlan>> {
        self.plan.get()
    }

    /// Embodies the template against `ctx`.
    pub fn embody(&self, ctx: &Context) -> Result<Value, EmbodyError> {
        match self.strategy {
            Strategy::Compiled => self.compile()?.embody(ctx, &self.config),
            Strategy::Recursive | Strategy::Auto => {
                embody_recursive(&self.template, ctx, &self.config)
            }
        }
    }

    /// A read-only view of the result: lazy if the settings say so, otherwise
    /// embodied now.
    pub fn view(&self, ctx: &Context) -> Result<View, EmbodyError> {
        if self.config.lazy {
            let template = Arc::clone(&self.template);
            let view = LazyView::new(template, ctx.clone(), self.config.clone())?;
            Ok(View::Lazy(view))
        } else {
            Ok(View::Materialized(AttrView::new(self.embody(ctx)?)))
        }
    }
}

/// Embodies `template` once with default settings.
///
/// The engine is picked from the template's shape. Nothing is cached; use an
/// [`Embodier`] to embody the same template repeatedly.
pub fn embody(template: &Template, ctx: &Context) -> Result<Value, EmbodyError> {
    embody_with(template, ctx, &EmbodyConfig::default())
}

/// Embodies `template` once with `config`.
///
/// Like [`embody`], this never caches: when the compiled engine is picked, its
/// plan is built for this call and dropped afterwards. Plans are kept only by an
/// [`Embodier`] or a [`PlanCache`](crate::PlanCache).
pub fn embody_with(
    template: &Template,
    ctx: &Context,
    config: &EmbodyConfig,
) -> Result<Value, EmbodyError> {
    let stats = TemplateStats::collect(template, config.syntax);
    match select(config, &stats) {
        Strategy::Compiled => CompiledPlan::compile(template, config.syntax)?.embody(ctx, config),
        Strategy::Recursive | Strategy::Auto => embody_recursive(template, ctx, config),
    }
}
