use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::{
    action::TypeRegistry,
    compile::CompilationService,
    config::JitConfig,
    context::{ScopeCounter, ScopeIdentifier},
};

/// Everything a construction call needs besides its own arguments.
///
/// Cloning is cheap and clones share the service, the scope counter and the
/// type registry.
#[derive(Clone)]
pub struct BuildContext {
    id: Uuid,
    config: Arc<JitConfig>,
    service: Arc<dyn CompilationService>,
    scopes: Arc<ScopeCounter>,
    types: Arc<TypeRegistry>,
}

impl BuildContext {
    /// Context on the process-wide scope counter with default settings.
    pub fn new(service: Arc<dyn CompilationService>) -> Self {
        Self::with_parts(
            service,
            JitConfig::default(),
            ScopeCounter::process_wide(),
            TypeRegistry::default_type_registry(),
        )
    }

    pub fn with_parts(
        service: Arc<dyn CompilationService>,
        config: JitConfig,
        scopes: Arc<ScopeCounter>,
        types: TypeRegistry,
    ) -> Self {
        let id = Uuid::new_v4();
        debug!(
            target: "jitframe",
            context = %id,
            prefix = %config.scope_prefix,
            "build context created"
        );
        Self {
            id,
            config: Arc::new(config),
            service,
            scopes,
            types: Arc::new(types),
        }
    }

    pub fn with_config(mut self, config: JitConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn with_type_registry(mut self, types: TypeRegistry) -> Self {
        self.types = Arc::new(types);
        self
    }

    pub fn with_scope_counter(mut self, scopes: Arc<ScopeCounter>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &JitConfig {
        &self.config
    }

    pub fn service(&self) -> &dyn CompilationService {
        self.service.as_ref()
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn scopes(&self) -> &ScopeCounter {
        &self.scopes
    }

    pub fn next_scope(&self) -> ScopeIdentifier {
        self.scopes.issue(&self.config.scope_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::_tests::fixtures::MockService;
    use std::{collections::HashSet, thread};

    #[test]
    fn clones_share_the_scope_counter() {
        let ctx = BuildContext::new(MockService::new())
            .with_scope_counter(Arc::new(ScopeCounter::new()))
            .with_config(JitConfig::with_prefix("__t_"));
        let other = ctx.clone();
        assert_eq!(ctx.next_scope().as_str(), "__t_0");
        assert_eq!(other.next_scope().as_str(), "__t_1");
        assert_eq!(ctx.id(), other.id());
    }

    #[test]
    fn contexts_on_threads_issue_distinct_scopes() {
        let ctx = BuildContext::new(MockService::new());
        let handles: Vec<_> = (0..4).map(|_| {
            let ctx = ctx.clone();
            thread::spawn(move || (0..100).map(|_| ctx.next_scope()).collect::<Vec<_>>())
        }).collect();
        let all: Vec<_> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        let unique: HashSet<_> = all.iter().cloned().collect();
        assert_eq!(unique.len(), all.len());
    }
}
