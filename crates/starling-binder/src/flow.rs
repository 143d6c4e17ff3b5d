//! The intraprocedural control-flow graph (C4, §3 "Flow node").

use rustc_hash::FxHashMap;
use starling_ast::NodeIndex;
use starling_common::Atom;

use crate::ids::{FlowNodeId, SymbolId};

#[derive(Clone, Debug)]
pub enum FlowNode {
    Start,
    Unreachable,
    BranchLabel {
        antecedents: Vec<FlowNodeId>,
    },
    LoopLabel {
        antecedents: Vec<FlowNodeId>,
    },
    Assignment {
        node: NodeIndex,
        antecedent: FlowNodeId,
        target_symbol: SymbolId,
        unbind: bool,
    },
    AssignmentAlias {
        antecedent: FlowNodeId,
        target_symbol: SymbolId,
        alias_symbol: SymbolId,
    },
    TrueCondition {
        expression: NodeIndex,
        antecedent: FlowNodeId,
    },
    FalseCondition {
        expression: NodeIndex,
        antecedent: FlowNodeId,
    },
    Call {
        node: NodeIndex,
        antecedent: FlowNodeId,
    },
    WildcardImport {
        node: NodeIndex,
        names: Vec<Atom>,
        antecedent: FlowNodeId,
    },
    PreFinallyGate {
        antecedent: FlowNodeId,
        gate_closed: bool,
    },
    PostFinally {
        antecedent: FlowNodeId,
        pre_finally_gate: FlowNodeId,
    },
}

impl FlowNode {
    #[must_use]
    pub const fn is_label(&self) -> bool {
        matches!(self, Self::BranchLabel { .. } | Self::LoopLabel { .. })
    }

    fn antecedents_mut(&mut self) -> Option<&mut Vec<FlowNodeId>> {
        match self {
            Self::BranchLabel { antecedents } | Self::LoopLabel { antecedents } => {
                Some(antecedents)
            }
            _ => None,
        }
    }
}

/// Owns every flow node allocated while binding one module. `Unreachable`
/// is allocated once, at construction, as the single shared sentinel (F3).
pub struct FlowNodeArena {
    nodes: Vec<FlowNode>,
    by_id: FxHashMap<FlowNodeId, usize>,
    pub unreachable: FlowNodeId,
}

impl FlowNodeArena {
    #[must_use]
    pub fn new() -> Self {
        let mut arena = Self {
            nodes: Vec::new(),
            by_id: FxHashMap::default(),
            unreachable: FlowNodeId::from_raw(0),
        };
        arena.unreachable = arena.alloc(FlowNode::Unreachable);
        arena
    }

    fn alloc(&mut self, node: FlowNode) -> FlowNodeId {
        let id = FlowNodeId::from_raw(crate::ids::FLOW_NODE_IDS.next());
        let index = self.nodes.len();
        self.nodes.push(node);
        self.by_id.insert(id, index);
        id
    }

    #[must_use]
    pub fn get(&self, id: FlowNodeId) -> &FlowNode {
        &self.nodes[self.by_id[&id]]
    }

    pub fn get_mut(&mut self, id: FlowNodeId) -> &mut FlowNode {
        let index = self.by_id[&id];
        &mut self.nodes[index]
    }

    pub fn create_start(&mut self) -> FlowNodeId {
        self.alloc(FlowNode::Start)
    }

    pub fn create_branch_label(&mut self) -> FlowNodeId {
        self.alloc(FlowNode::BranchLabel {
            antecedents: Vec::new(),
        })
    }

    pub fn create_loop_label(&mut self) -> FlowNodeId {
        self.alloc(FlowNode::LoopLabel {
            antecedents: Vec::new(),
        })
    }

    pub fn create_assignment(
        &mut self,
        node: NodeIndex,
        antecedent: FlowNodeId,
        target_symbol: SymbolId,
        unbind: bool,
    ) -> FlowNodeId {
        self.alloc(FlowNode::Assignment {
            node,
            antecedent,
            target_symbol,
            unbind,
        })
    }

    pub fn create_assignment_alias(
        &mut self,
        antecedent: FlowNodeId,
        target_symbol: SymbolId,
        alias_symbol: SymbolId,
    ) -> FlowNodeId {
        self.alloc(FlowNode::AssignmentAlias {
            antecedent,
            target_symbol,
            alias_symbol,
        })
    }

    pub fn create_true_condition(&mut self, expression: NodeIndex, antecedent: FlowNodeId) -> FlowNodeId {
        self.alloc(FlowNode::TrueCondition {
            expression,
            antecedent,
        })
    }

    pub fn create_false_condition(&mut self, expression: NodeIndex, antecedent: FlowNodeId) -> FlowNodeId {
        self.alloc(FlowNode::FalseCondition {
            expression,
            antecedent,
        })
    }

    pub fn create_call(&mut self, node: NodeIndex, antecedent: FlowNodeId) -> FlowNodeId {
        self.alloc(FlowNode::Call { node, antecedent })
    }

    pub fn create_wildcard_import(
        &mut self,
        node: NodeIndex,
        names: Vec<Atom>,
        antecedent: FlowNodeId,
    ) -> FlowNodeId {
        self.alloc(FlowNode::WildcardImport {
            node,
            names,
            antecedent,
        })
    }

    pub fn create_pre_finally_gate(&mut self, antecedent: FlowNodeId) -> FlowNodeId {
        self.alloc(FlowNode::PreFinallyGate {
            antecedent,
            gate_closed: false,
        })
    }

    pub fn create_post_finally(&mut self, antecedent: FlowNodeId, pre_finally_gate: FlowNodeId) -> FlowNodeId {
        self.alloc(FlowNode::PostFinally {
            antecedent,
            pre_finally_gate,
        })
    }

    /// F4: label antecedent lists are deduplicated by id. F3: appending an
    /// antecedent that is itself `Unreachable` is a no-op (the absorbing
    /// sink contributes no reachability to anything it flows into).
    pub fn add_antecedent(&mut self, label: FlowNodeId, antecedent: FlowNodeId) {
        if antecedent == self.unreachable {
            return;
        }
        if let Some(list) = self.get_mut(label).antecedents_mut() {
            if !list.contains(&antecedent) {
                list.push(antecedent);
            }
        }
    }

    /// `finish(label)` (§4.4 "Label finishing" / F2): reduces a label with
    /// zero antecedents to `Unreachable`, a label with exactly one
    /// antecedent to that antecedent directly (label elision), and leaves
    /// labels with two or more antecedents as-is.
    #[must_use]
    pub fn finish(&self, label: FlowNodeId) -> FlowNodeId {
        match self.get(label) {
            FlowNode::BranchLabel { antecedents } | FlowNode::LoopLabel { antecedents } => {
                match antecedents.as_slice() {
                    [] => self.unreachable,
                    [only] => *only,
                    _ => label,
                }
            }
            _ => label,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node allocated so far, in allocation order. Used by downstream
    /// narrowing passes that need to scan for a particular node kind rather
    /// than follow antecedent chains from a known starting point.
    pub fn iter(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.iter()
    }
}

impl Default for FlowNodeArena {
    fn default() -> Self {
        Self::new()
    }
}
