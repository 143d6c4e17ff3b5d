//! Per-node side tables (§3 "annotates nodes with derived metadata … via a
//! side table keyed by node identity — never by mutating the syntax tree").

use rustc_hash::{FxHashMap, FxHashSet};
use starling_ast::NodeIndex;

use crate::ids::{FlowNodeId, ScopeId, SymbolId};

#[derive(Default)]
pub struct SideTables {
    scope_of: FxHashMap<NodeIndex, ScopeId>,
    declaration_symbol_of: FxHashMap<NodeIndex, SymbolId>,
    flow_node_of: FxHashMap<NodeIndex, FlowNodeId>,
    after_flow_node_of: FxHashMap<NodeIndex, FlowNodeId>,
    code_flow_references_of: FxHashMap<NodeIndex, FxHashSet<String>>,
}

impl SideTables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_scope(&mut self, node: NodeIndex, scope: ScopeId) {
        self.scope_of.insert(node, scope);
    }

    #[must_use]
    pub fn scope_of(&self, node: NodeIndex) -> Option<ScopeId> {
        self.scope_of.get(&node).copied()
    }

    pub fn set_declaration_symbol(&mut self, node: NodeIndex, symbol: SymbolId) {
        self.declaration_symbol_of.insert(node, symbol);
    }

    #[must_use]
    pub fn declaration_symbol_of(&self, node: NodeIndex) -> Option<SymbolId> {
        self.declaration_symbol_of.get(&node).copied()
    }

    pub fn set_flow_node(&mut self, node: NodeIndex, flow: FlowNodeId) {
        self.flow_node_of.insert(node, flow);
    }

    #[must_use]
    pub fn flow_node_of(&self, node: NodeIndex) -> Option<FlowNodeId> {
        self.flow_node_of.get(&node).copied()
    }

    pub fn set_after_flow_node(&mut self, node: NodeIndex, flow: FlowNodeId) {
        self.after_flow_node_of.insert(node, flow);
    }

    #[must_use]
    pub fn after_flow_node_of(&self, node: NodeIndex) -> Option<FlowNodeId> {
        self.after_flow_node_of.get(&node).copied()
    }

    pub fn add_code_flow_reference(&mut self, execution_scope_node: NodeIndex, key: String) {
        self.code_flow_references_of
            .entry(execution_scope_node)
            .or_default()
            .insert(key);
    }

    #[must_use]
    pub fn code_flow_references_of(&self, execution_scope_node: NodeIndex) -> &FxHashSet<String> {
        static EMPTY: std::sync::OnceLock<FxHashSet<String>> = std::sync::OnceLock::new();
        self.code_flow_references_of
            .get(&execution_scope_node)
            .unwrap_or_else(|| EMPTY.get_or_init(FxHashSet::default))
    }
}
