use anyhow::Context;
use std::sync::Arc;

use crate::module::{InitCtx, Migration, Module};

/// Core modules come up in this order and go down in reverse.
const CORE_MODULE_ORDER: &[&str] = &["db"];

#[derive(Clone, Copy, Debug)]
enum Phase {
    Init,
    Start,
    Stop,
}

impl Phase {
    fn verb(self) -> &'static str {
        match self {
            Phase::Init => "initialize",
            Phase::Start => "start",
            Phase::Stop => "stop",
        }
    }
}

/// Holds the core modules the application depends on and the library
/// modules plugged in on top of them.
#[derive(Default)]
pub struct ModuleRegistry {
    core_modules: Vec<Arc<dyn Module>>,
    custom_modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_core(&mut self, module: Arc<dyn Module>) {
        self.core_modules.push(module);
    }

    pub fn register_custom(&mut self, module: Arc<dyn Module>) {
        self.custom_modules.push(module);
    }

    /// Core modules first, then custom modules in registration order.
    pub fn modules(&self) -> Vec<&Arc<dyn Module>> {
        self.core_modules.iter().chain(&self.custom_modules).collect()
    }

    fn ordered_core(&self) -> impl DoubleEndedIterator<Item = &Arc<dyn Module>> {
        CORE_MODULE_ORDER
            .iter()
            .filter_map(|name| self.core_modules.iter().find(|m| m.name() == *name))
    }

    async fn run(
        phase: Phase,
        modules: impl Iterator<Item = &Arc<dyn Module>>,
        ctx: Option<&InitCtx<'_>>,
    ) -> anyhow::Result<()> {
        for module in modules {
            tracing::info!(module = module.name(), phase = ?phase, "module lifecycle");
            let outcome = match (phase, ctx) {
                (Phase::Init, Some(ctx)) => module.init(ctx).await,
                (Phase::Start, Some(ctx)) => module.start(ctx).await,
                (Phase::Stop, _) => module.stop().await,
                (_, None) => Err(anyhow::anyhow!("no init context")),
            };
            outcome.with_context(|| format!("failed to {} module '{}'", phase.verb(), module.name()))?;
        }
        Ok(())
    }

    pub async fn init_core_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Self::run(Phase::Init, self.ordered_core(), Some(ctx)).await
    }

    pub async fn init_custom_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Self::run(Phase::Init, self.custom_modules.iter(), Some(ctx)).await
    }

    /// Called once migrations have been applied.
    pub async fn start_core_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Self::run(Phase::Start, self.ordered_core(), Some(ctx)).await
    }

    pub async fn start_custom_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Self::run(Phase::Start, self.custom_modules.iter(), Some(ctx)).await
    }

    /// Stops custom modules in reverse registration order.
    pub async fn stop_custom_modules(&self) -> anyhow::Result<()> {
        Self::run(Phase::Stop, self.custom_modules.iter().rev(), None).await
    }

    pub async fn stop_core_modules(&self) -> anyhow::Result<()> {
        Self::run(Phase::Stop, self.ordered_core().rev(), None).await
    }

    /// Every module's migrations, sorted by module name then migration id.
    pub fn collect_migrations(&self) -> Vec<(String, Migration)> {
        let mut migrations: Vec<(String, Migration)> = self
            .modules()
            .into_iter()
            .flat_map(|module| {
                module
                    .migrations()
                    .into_iter()
                    .map(move |migration| (module.name().to_string(), migration))
            })
            .collect();
        migrations.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(b.1.id)));
        migrations
    }
}
