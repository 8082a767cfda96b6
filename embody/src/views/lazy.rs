use std::sync::Arc;

use embody_path::Path;
use embody_value::Value;

use super::{MappingView, missing_key};
use crate::keys::{Keyed, settle};
use crate::recursive::embody_subtree;
use crate::substitute::embody_key;
use crate::{Context, EmbodyConfig, EmbodyError, Node, NodeId, Template, embody_with};

/// A view that embodies each top-level entry when it is read.
///
/// Keys are embodied, and collisions settled, when the view is built. Values are
/// embodied again on every read and never cached, so a resolver in the context is
/// called once per read.
#[derive(Debug, Clone)]
pub struct LazyView {
    template: Arc<Template>,
    ctx: Context,
    config: EmbodyConfig,
    /// Embodied key, template node, source path.
    entries: Vec<(String, NodeId, Path)>,
}

impl LazyView {
    /// Builds the view. A template whose root is not a mapping has no keys; its
    /// content is only reachable through [`LazyView::materialize`].
    pub fn new(
        template: Arc<Template>,
        ctx: Context,
        config: EmbodyConfig,
    ) -> Result<Self, EmbodyError> {
        let entries = match template.node(template.root()) {
            Node::Mapping(children) => {
                let mut keyed = Vec::with_capacity(children.len());
                for (source_key, child) in children {
                    let source = Path::root().join(source_key.as_str());
                    let descriptor = config.syntax.describe_str(source_key);
                    let key = embody_key(source_key, &descriptor, &ctx, config.strict, &source)?;
                    keyed.push(Keyed {
                        key,
                        source: source.clone(),
                        value: (*child, source),
                    });
                }
                settle(keyed, config.key_collision)?
                    .into_iter()
                    .map(|(key, (node, source))| (key, node, source))
                    .collect()
            }
            Node::Scalar(_) | Node::Sequence(_) => Vec::new(),
        };
        Ok(Self {
            template,
            ctx,
            config,
            entries,
        })
    }

    /// Embodies the entry under `key`.
    pub fn get(&self, key: &str) -> Result<Value, EmbodyError> {
        let (_, node, source) = self
            .entries
            .iter()
            .find(|(k, _, _)| k == key)
            .ok_or_else(|| missing_key(&Path::root(), key))?;
        let root = [(self.template.root(), Path::root())];
        embody_subtree(&self.template, &self.ctx, &self.config, *node, source.clone(), &root)
    }

    /// Embodies the whole template with the view's settings.
    pub fn materialize(&self) -> Result<Value, EmbodyError> {
        embody_with(&self.template, &self.ctx, &self.config)
    }

    /// The context reads are embodied against.
    pub fn context(&self) -> &Context {
        &self.ctx
    }
}

impl MappingView for LazyView {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _, _)| k.as_str()).collect()
    }

    fn value(&self, key: &str) -> Result<Value, EmbodyError> {
        self.get(key)
    }
}
