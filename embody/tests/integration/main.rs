mod collisions;
mod concurrency;
mod context;
mod cycles;
mod deep;
mod engines;
mod persistence;
mod selector;
mod substitution;
mod views;

use embody::{Context, EmbodyConfig, EmbodyError, Strategy, Template, Value, embody_with};

/// Embodies `template` with both engines, checks they agree, and returns the result.
pub fn both(
    template: &Template,
    ctx: &Context,
    config: EmbodyConfig,
) -> Result<Value, EmbodyError> {
    let recursive = embody_with(template, ctx, &config.clone().with_strategy(Strategy::Recursive));
    let compiled = embody_with(template, ctx, &config.with_strategy(Strategy::Compiled));
    assert_eq!(recursive, compiled, "engines disagree");
    recursive
}
