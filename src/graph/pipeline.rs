use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{
    action::{ActionBinder, ActionBooking, ResultHolder, TypeTag},
    catalog::{ColumnCatalog, ColumnNamespace, CustomColumn},
    context::BuildContext,
    graph::{NodeHandle, NodeKind, PipelineNode},
    jit_error::TypeRole,
    synth::{CodeSynthesizer, JittedNode, OperationKind, Transformation, EXPRESSION_SYMBOL},
    validator::ColumnValidator,
    JitError,
};

/// Action text waiting to be submitted, with the holder its code points into.
struct PendingAction {
    code: String,
    result: Arc<ResultHolder>,
}

/// Mirror of a lazily built pipeline graph.
///
/// Nodes live on the compilation service side; this type keeps their handles,
/// the custom columns valid on each branch and the action bindings not yet
/// submitted. A construction call mutates nothing here unless it fully
/// succeeded.
pub struct Pipeline {
    ctx: BuildContext,
    root: NodeHandle,
    nodes: IndexMap<NodeHandle, PipelineNode>,
    /// Schema and data source, plus the custom columns valid everywhere
    catalog: ColumnCatalog,
    default_columns: Vec<String>,
    /// Data-source columns already given a reader
    ds_materialized: Vec<String>,
    pending: Vec<PendingAction>,
    n_slots: usize,
}

impl Pipeline {
    pub fn new(
        ctx: BuildContext,
        root: NodeHandle,
        catalog: ColumnCatalog,
        default_columns: Vec<String>,
    ) -> Self {
        let loop_manager = ctx.config().loop_manager_type.clone();
        let mut nodes = IndexMap::new();
        nodes.insert(root, PipelineNode {
            handle: root,
            kind: NodeKind::LoopManager,
            parent: None,
            proxied_type_name: loop_manager.clone(),
            concrete_type_name: loop_manager,
            name: None,
            scope: None,
            custom_columns: catalog.custom_columns(),
        });
        Self {
            ctx,
            root,
            nodes,
            catalog,
            default_columns,
            ds_materialized: Vec::new(),
            pending: Vec::new(),
            n_slots: 1,
        }
    }

    pub fn with_slots(mut self, n_slots: usize) -> Self {
        self.n_slots = n_slots.max(1);
        self
    }

    pub fn root(&self) -> NodeHandle {
        self.root
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&PipelineNode> {
        self.nodes.get(&handle)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PipelineNode> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    /// The catalog as seen from `handle`: shared sources plus the custom
    /// columns defined upstream of it.
    pub fn catalog_at(&self, handle: NodeHandle) -> Option<ColumnCatalog> {
        self.nodes.get(&handle).map(|node| self.catalog.branch(&node.custom_columns))
    }

    pub fn materialized_ds_columns(&self) -> &[String] {
        &self.ds_materialized
    }

    pub fn pending_action_count(&self) -> usize {
        self.pending.len()
    }

    fn require_node(&self, handle: NodeHandle) -> Result<&PipelineNode, JitError> {
        self.nodes.get(&handle).ok_or_else(|| JitError::UnknownNode(handle.to_string()))
    }

    fn require_new_handle(&self, handle: NodeHandle) -> Result<(), JitError> {
        if self.nodes.contains_key(&handle) {
            warn!(target: "jitframe", node = %handle, "service returned a handle already booked");
            return JitError::DuplicateNode(handle.to_string()).err();
        }
        Ok(())
    }

    /// Keep the entries of `from` for which `expression` holds.
    pub fn filter(
        &mut self,
        from: NodeHandle,
        expression: &str,
        name: &str,
    ) -> Result<NodeHandle, JitError> {
        if ColumnValidator::at_least_one_empty_string(&[expression]) {
            return JitError::EmptyArgument("filter expression".into()).err();
        }
        let parent = self.require_node(from)?;
        let branch = self.catalog.branch(&parent.custom_columns);
        let custom_columns = parent.custom_columns.clone();
        let interface_type_name = self.ctx.config().interface_type(&parent.proxied_type_name);
        let filter_base = self.ctx.config().filter_base_type.clone();

        let request = Transformation {
            target: from,
            operation: OperationKind::Filter,
            interface_type_name: &interface_type_name,
            name,
            expression,
            result_type_name: &filter_base,
        };
        let jitted = CodeSynthesizer::jit_transformation(&self.ctx, &request, &branch)?;

        let node = PipelineNode {
            handle: jitted.handle,
            kind: NodeKind::Filter,
            parent: Some(from),
            proxied_type_name: filter_base.clone(),
            concrete_type_name: filter_base,
            name: (!name.is_empty()).then(|| name.to_string()),
            scope: Some(jitted.scope.clone()),
            custom_columns,
        };
        self.commit(node, &jitted, &branch)
    }

    /// Add the column `name`, computed from `expression`, downstream of `from`.
    ///
    /// The column is visible from the new node and its descendants only.
    pub fn define(
        &mut self,
        from: NodeHandle,
        name: &str,
        expression: &str,
    ) -> Result<NodeHandle, JitError> {
        if ColumnValidator::at_least_one_empty_string(&[name]) {
            return JitError::EmptyArgument("column name".into()).err();
        }
        if ColumnValidator::at_least_one_empty_string(&[expression]) {
            return JitError::EmptyArgument("column expression".into()).err();
        }
        let parent = self.require_node(from)?;
        let branch = self.catalog.branch(&parent.custom_columns);
        if branch.contains(name) {
            return JitError::ColumnAlreadyDefined(name.to_string()).err();
        }
        let mut custom_columns = parent.custom_columns.clone();
        let proxied = parent.proxied_type_name.clone();
        let interface_type_name = self.ctx.config().interface_type(&proxied);

        let request = Transformation {
            target: from,
            operation: OperationKind::Define,
            interface_type_name: &interface_type_name,
            name,
            expression,
            result_type_name: &proxied,
        };
        let jitted = CodeSynthesizer::jit_transformation(&self.ctx, &request, &branch)?;

        let type_name = self.ctx.service().type_name_of(&jitted.scope.qualify(EXPRESSION_SYMBOL));
        if type_name.is_none() {
            warn!(target: "jitframe", column = name, "service did not report the new column type");
        }
        custom_columns.push(CustomColumn { name: name.to_string(), type_name });

        // A define hands back an interface over the node it was called on.
        let node = PipelineNode {
            handle: jitted.handle,
            kind: NodeKind::Define,
            parent: Some(from),
            proxied_type_name: proxied.clone(),
            concrete_type_name: proxied,
            name: Some(name.to_string()),
            scope: Some(jitted.scope.clone()),
            custom_columns,
        };
        self.commit(node, &jitted, &branch)
    }

    /// Record a node built through the typed construction API.
    pub fn register_node(
        &mut self,
        parent: NodeHandle,
        kind: NodeKind,
        handle: NodeHandle,
        concrete_type_name: &str,
    ) -> Result<(), JitError> {
        let parent_node = self.require_node(parent)?;
        self.require_new_handle(handle)?;
        let proxied_type_name = match kind {
            NodeKind::Define => parent_node.proxied_type_name.clone(),
            _ => kind.base_type_name(self.ctx.config()).to_string(),
        };
        let custom_columns = parent_node.custom_columns.clone();
        self.nodes.insert(handle, PipelineNode {
            handle,
            kind,
            parent: Some(parent),
            proxied_type_name,
            concrete_type_name: concrete_type_name.to_string(),
            name: None,
            scope: None,
            custom_columns,
        });
        Ok(())
    }

    /// Validate the columns of an action, allocate its result and queue the
    /// binding code. The code is only submitted by `jit_pending_actions`.
    pub fn book_action(
        &mut self,
        from: NodeHandle,
        action_type: TypeTag,
        result_type: TypeTag,
        n_columns: usize,
        columns: &[String],
    ) -> Result<Arc<ResultHolder>, JitError> {
        let prev = self.require_node(from)?;
        let branch = self.catalog.branch(&prev.custom_columns);
        let selected = ColumnValidator::get_validated_column_names(
            &self.default_columns,
            n_columns,
            columns,
            &branch,
        )?;
        let result = self.ctx.types().construct(result_type).ok_or_else(|| {
            JitError::UnknownActionOrResultType {
                role: TypeRole::Result,
                type_name: result_type.rust_name.to_string(),
            }
        })?;

        let booking = ActionBooking {
            columns: &selected,
            prev_node_type_name: &prev.concrete_type_name,
            prev_node: from,
            result_type,
            action_type,
            result: &result,
            n_slots: self.n_slots,
        };
        let code = ActionBinder::jit_build_and_book(
            self.ctx.config(),
            self.ctx.types(),
            &booking,
            &branch,
        )?;

        self.materialize_ds_columns(&branch, &selected);
        let result = Arc::new(result);
        self.pending.push(PendingAction { code, result: Arc::clone(&result) });
        Ok(result)
    }

    /// Submit every queued action binding as one declaration unit.
    ///
    /// On failure the queue is kept so the caller can inspect or retry it.
    pub fn jit_pending_actions(&mut self) -> Result<usize, JitError> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let code = self.pending.iter().map(|p| p.code.as_str()).collect::<Vec<_>>().join("\n");
        if self.ctx.config().log_generated_code {
            debug!(target: "jitframe", "{}", code);
        }
        self.ctx.service().declare(&code).map_err(|diagnostic| {
            warn!(target: "jitframe", code = diagnostic.code, "action bindings refused");
            JitError::ActionCompilationError { code: code.clone(), diagnostic }
        })?;

        let n = self.pending.len();
        for pending in self.pending.drain(..) {
            debug!(target: "jitframe", address = pending.result.address(), "action bound");
        }
        info!(target: "jitframe", actions = n, "action bindings submitted");
        Ok(n)
    }

    fn commit(
        &mut self,
        node: PipelineNode,
        jitted: &JittedNode,
        branch: &ColumnCatalog,
    ) -> Result<NodeHandle, JitError> {
        let handle = node.handle;
        self.require_new_handle(handle)?;
        let names: Vec<String> = jitted.columns.iter().map(|c| c.name.clone()).collect();
        self.materialize_ds_columns(branch, &names);
        debug!(
            target: "jitframe",
            node = %handle,
            kind = ?node.kind,
            parent = ?node.parent,
            "node spliced"
        );
        self.nodes.insert(handle, node);
        Ok(handle)
    }

    /// Give a reader to every data-source column among `columns` that has
    /// none yet and is not shadowed on `branch`.
    fn materialize_ds_columns(&mut self, branch: &ColumnCatalog, columns: &[String]) {
        if branch.data_source().is_none() {
            return;
        }
        let mut defined = branch.custom_names();
        defined.extend(branch.schema_names());
        defined.extend(self.ds_materialized.iter().cloned());

        let must_define = ColumnValidator::find_undefined_ds_columns(columns, &defined);
        for (column, undefined) in columns.iter().zip(must_define) {
            if undefined && branch.is_in(column, ColumnNamespace::DataSource) {
                debug!(target: "jitframe", column = column.as_str(), "data-source column read");
                self.ds_materialized.push(column.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        _tests::fixtures::{catalog, EvalMode, MockService},
        action::TypeRegistry,
        config::JitConfig,
        context::ScopeCounter,
    };

    struct CountAction;

    fn pipeline(service: Arc<MockService>, c: ColumnCatalog) -> Pipeline {
        let mut types = TypeRegistry::default_type_registry();
        types.register_name::<CountAction>("ana::Count");
        let config = JitConfig::with_prefix("__p_");
        let ctx = BuildContext::with_parts(service, config, Arc::new(ScopeCounter::new()), types);
        Pipeline::new(ctx, NodeHandle(0x10), c, vec!["x".into(), "y".into()]).with_slots(2)
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn count(
        p: &mut Pipeline,
        from: NodeHandle,
        columns: &[&str],
    ) -> Result<Arc<ResultHolder>, JitError> {
        let columns = names(columns);
        p.book_action(from, TypeTag::of::<CountAction>(), TypeTag::of::<u64>(), 1, &columns)
    }

    #[test]
    fn filter_and_define_splice_new_nodes() {
        let service = MockService::new();
        service.set_type("::res", "double");
        let mut p = pipeline(service.clone(), catalog(&[("x", "int"), ("y", "float")], &[], &[]));

        let f = p.filter(p.root(), "x > 0", "positive").unwrap();
        let d = p.define(f, "z", "x * y").unwrap();
        assert_eq!(p.node_count(), 3);

        let filter_node = p.node(f).unwrap();
        assert_eq!(filter_node.kind, NodeKind::Filter);
        assert_eq!(filter_node.parent, Some(p.root()));
        assert_eq!(filter_node.name.as_deref(), Some("positive"));

        let define_node = p.node(d).unwrap();
        assert_eq!(define_node.proxied_type_name, "jitframe::FilterBase");
        let at_d = p.catalog_at(d).unwrap();
        assert_eq!(at_d.column_type_name("z").as_deref(), Some("double"));

        let define_call = service.evaluated().pop().unwrap();
        let expected = "jitframe::Interface<jitframe::FilterBase>(\
                        ((jitframe::Interface<jitframe::FilterBase>*)0x1000)->Define(\"z\"";
        assert!(define_call.starts_with(expected), "{define_call}");
    }

    #[test]
    fn custom_columns_are_scoped_to_their_branch() {
        let service = MockService::new();
        service.set_type("::res", "double");
        let mut p = pipeline(service.clone(), catalog(&[("x", "int")], &[], &[]));

        let f = p.filter(p.root(), "x > 0", "").unwrap();
        let d = p.define(f, "z", "x * 2").unwrap();

        // Sibling branch: z is not computed upstream of the root.
        p.filter(p.root(), "z > 1", "").unwrap();
        let sibling_call = service.evaluated().pop().unwrap();
        assert!(!sibling_call.contains("double& z"), "{sibling_call}");
        assert!(sibling_call.contains("[](){ return z > 1;}"), "{sibling_call}");

        let root = p.root();
        assert_eq!(count(&mut p, root, &["z"]).unwrap_err(), JitError::UnknownColumn {
            names: names(&["z"]),
        });
        assert_eq!(count(&mut p, f, &["z"]).unwrap_err(), JitError::UnknownColumn {
            names: names(&["z"]),
        });
        assert!(count(&mut p, d, &["z"]).is_ok());

        p.filter(d, "z > 1", "").unwrap();
        let downstream_call = service.evaluated().pop().unwrap();
        assert!(downstream_call.contains("[](double& z){ return z > 1;}"), "{downstream_call}");

        // The same name may be defined again on another branch, not below d.
        assert!(p.define(p.root(), "z", "x + 1").is_ok());
        assert_eq!(p.define(d, "z", "1"), Err(JitError::ColumnAlreadyDefined("z".into())));
        assert!(!p.catalog().contains("z"));
    }

    #[test]
    fn actions_on_define_nodes_bind_the_proxied_type() {
        let service = MockService::new();
        service.set_type("::res", "double");
        let mut p = pipeline(service.clone(), catalog(&[("x", "int")], &[], &[]));

        let d = p.define(p.root(), "z", "x * 2").unwrap();
        assert_eq!(p.node(d).unwrap().concrete_type_name, "jitframe::LoopManager");
        let define_call = service.evaluated().pop().unwrap();
        let expected = "jitframe::Interface<jitframe::LoopManager>(";
        assert!(define_call.starts_with(expected), "{define_call}");

        let holder = count(&mut p, d, &["z"]).unwrap();
        p.jit_pending_actions().unwrap();
        let declared = service.declared().pop().unwrap();
        assert_eq!(declared, format!(
            "jitframe::CallBuildAndBook<ana::Count, double>(\
             *reinterpret_cast<jitframe::LoopManager*>(0x1000), {{\"z\"}}, 2, \
             reinterpret_cast<unsigned long long*>({:#x}));",
            holder.address()
        ));
    }

    #[test]
    fn known_handles_are_never_booked_twice() {
        let service = MockService::new();
        service.set_type("::res", "double");
        let mut p = pipeline(service.clone(), catalog(&[("x", "int")], &[], &[]));
        let f = p.filter(p.root(), "x > 0", "").unwrap();
        let before: Vec<PipelineNode> = p.nodes().cloned().collect();

        service.set_eval_mode(EvalMode::Fixed(0x10));
        assert_eq!(p.filter(p.root(), "x > 0", ""), Err(JitError::DuplicateNode("0x10".into())));
        service.set_eval_mode(EvalMode::Fixed(0x1000));
        assert_eq!(p.define(f, "w", "x + 1"), Err(JitError::DuplicateNode("0x1000".into())));

        let after: Vec<PipelineNode> = p.nodes().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(p.node(p.root()).unwrap().kind, NodeKind::LoopManager);
        assert_eq!(p.node(p.root()).unwrap().parent, None);
        assert!(p.nodes().all(|n| !n.custom_columns.iter().any(|c| c.name == "w")));

        let err = p.register_node(p.root(), NodeKind::Range, f, "R").unwrap_err();
        assert_eq!(err, JitError::DuplicateNode(f.to_string()));
        assert_eq!(p.node(f).unwrap().kind, NodeKind::Filter);
    }

    #[test]
    fn failed_submissions_leave_the_graph_untouched() {
        let c = catalog(&[("x", "int")], &[], &[]);
        for breakage in ["int x;", "auto res", "eval-fail", "eval-null"] {
            let service = MockService::new();
            match breakage {
                "eval-fail" => service.set_eval_mode(EvalMode::Fail),
                "eval-null" => service.set_eval_mode(EvalMode::Null),
                marker => service.fail_declarations_containing(marker),
            }
            let mut p = pipeline(service, c.clone());
            let before: Vec<PipelineNode> = p.nodes().cloned().collect();

            assert!(p.filter(p.root(), "x > 1", "").is_err(), "{breakage}");
            assert!(p.define(p.root(), "w", "x + 1").is_err(), "{breakage}");

            let after: Vec<PipelineNode> = p.nodes().cloned().collect();
            assert_eq!(before, after, "{breakage}");
            assert!(p.catalog_at(p.root()).is_some_and(|c| !c.contains("w")));
        }
    }

    #[test]
    fn define_rejects_empty_and_existing_names() {
        let service = MockService::new();
        let mut p = pipeline(service.clone(), catalog(&[("x", "int")], &[("k0", "int")], &[]));
        let root = p.root();
        let empty = |what: &str| -> Result<NodeHandle, JitError> {
            Err(JitError::EmptyArgument(what.into()))
        };
        assert_eq!(p.define(root, "", "1"), empty("column name"));
        assert_eq!(p.define(root, "k", ""), empty("column expression"));
        assert_eq!(p.define(root, "x", "1"), Err(JitError::ColumnAlreadyDefined("x".into())));
        assert_eq!(p.define(root, "k0", "1"), Err(JitError::ColumnAlreadyDefined("k0".into())));
        assert_eq!(p.filter(root, "", ""), empty("filter expression"));
        assert!(service.submissions().is_empty());
    }

    #[test]
    fn unknown_parent_is_an_error() {
        let mut p = pipeline(MockService::new(), catalog(&[("x", "int")], &[], &[]));
        let err = p.filter(NodeHandle(0xdead), "x", "").unwrap_err();
        assert_eq!(err, JitError::UnknownNode("0xdead".into()));
        assert_eq!(p.node_count(), 1);
    }

    #[test]
    fn define_without_reported_type_cannot_be_used_downstream() {
        let service = MockService::new();
        let mut p = pipeline(service, catalog(&[("x", "int")], &[], &[]));
        let d = p.define(p.root(), "u", "x * 2").unwrap();
        let err = p.filter(d, "u > 3", "").unwrap_err();
        assert_eq!(err, JitError::UnresolvedColumnType { column: "u".into() });
        assert_eq!(p.node_count(), 2);
    }

    #[test]
    fn booked_actions_are_submitted_together() {
        let service = MockService::new();
        let mut p = pipeline(service.clone(), catalog(&[("x", "int"), ("y", "float")], &[], &[]));
        let root = p.root();
        let action = TypeTag::of::<CountAction>();
        let a = p.book_action(root, action, TypeTag::of::<u64>(), 1, &[]).unwrap();
        let b = p.book_action(root, action, TypeTag::of::<f64>(), 1, &names(&["y"])).unwrap();
        assert_eq!(p.pending_action_count(), 2);
        assert!(service.submissions().is_empty());

        assert_eq!(p.jit_pending_actions().unwrap(), 2);
        assert_eq!(p.pending_action_count(), 0);
        let declared = service.declared();
        assert_eq!(declared.len(), 1);
        assert!(declared[0].contains(&format!(
            "jitframe::CallBuildAndBook<ana::Count, int>(\
             *reinterpret_cast<jitframe::LoopManager*>(0x10), {{\"x\"}}, 2, \
             reinterpret_cast<unsigned long long*>({:#x}));",
            a.address()
        )));
        let b_tail = format!("{{\"y\"}}, 2, reinterpret_cast<double*>({:#x}));", b.address());
        assert!(declared[0].contains(&b_tail));
        assert_eq!(a.downcast_ref::<u64>(), Some(&0));
        assert_eq!(p.jit_pending_actions().unwrap(), 0);
    }

    #[test]
    fn failed_action_submission_keeps_the_queue() {
        let service = MockService::new();
        service.fail_declarations_containing("CallBuildAndBook");
        let mut p = pipeline(service, catalog(&[("x", "int")], &[], &[]));
        let root = p.root();
        count(&mut p, root, &[]).unwrap();
        assert!(matches!(p.jit_pending_actions(), Err(JitError::ActionCompilationError { .. })));
        assert_eq!(p.pending_action_count(), 1);
    }

    #[test]
    fn invalid_booking_queues_nothing() {
        let mut p = pipeline(MockService::new(), catalog(&[("x", "int")], &[], &[]));
        let root = p.root();
        let requested = names(&["x", "nope", "nada"]);
        let err = p
            .book_action(root, TypeTag::of::<CountAction>(), TypeTag::of::<u64>(), 2, &requested)
            .unwrap_err();
        assert_eq!(err, JitError::UnknownColumn { names: names(&["nope", "nada"]) });

        struct Unregistered;
        let err = p
            .book_action(root, TypeTag::of::<Unregistered>(), TypeTag::of::<u64>(), 1, &[])
            .unwrap_err();
        assert!(matches!(err, JitError::UnknownActionOrResultType { role: TypeRole::Action, .. }));
        let err = p
            .book_action(root, TypeTag::of::<CountAction>(), TypeTag::of::<Unregistered>(), 1, &[])
            .unwrap_err();
        assert!(matches!(err, JitError::UnknownActionOrResultType { role: TypeRole::Result, .. }));
        assert_eq!(p.pending_action_count(), 0);
    }

    #[test]
    fn data_source_columns_are_materialized_once() {
        let service = MockService::new();
        let ds = [("x", "float"), ("ds_a", "double"), ("ds_b", "int")];
        let mut p = pipeline(service, catalog(&[("x", "int")], &[], &ds));
        p.filter(p.root(), "ds_a > x", "").unwrap();
        assert_eq!(p.materialized_ds_columns(), &names(&["ds_a"])[..]);

        let requested = names(&["ds_a", "ds_b"]);
        p.book_action(p.root(), TypeTag::of::<CountAction>(), TypeTag::of::<u64>(), 2, &requested)
            .unwrap();
        assert_eq!(p.materialized_ds_columns(), &names(&["ds_a", "ds_b"])[..]);
    }

    #[test]
    fn typed_nodes_can_be_registered() {
        let mut p = pipeline(MockService::new(), catalog(&[("x", "int")], &[], &[]));
        let range = NodeHandle(0x99);
        p.register_node(p.root(), NodeKind::Range, range, "jitframe::Range<jitframe::LoopManager>")
            .unwrap();
        assert_eq!(p.node(range).unwrap().proxied_type_name, "jitframe::RangeBase");
        assert!(p.register_node(NodeHandle(0x5), NodeKind::Range, NodeHandle(0x98), "R").is_err());
        p.filter(range, "x", "").unwrap();
        assert_eq!(p.node_count(), 3);
    }
}
