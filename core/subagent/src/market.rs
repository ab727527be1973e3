//! [`SubagentMarket`]: the named table `Task`/`CreateSubagent` resolve
//! against.
//!
//! Fixed definitions are loaded once and shared read-only; the dynamic
//! table is where `CreateSubagent` adds runtime-defined agents. A child
//! spawned from a *fixed* definition gets its own fresh dynamic table
//! (isolated recursion: agents it creates never leak back to the parent or
//! across to siblings); a child spawned from a *dynamic* definition shares
//! the parent's dynamic table (so siblings created by the same session can
//! see each other), per §4.I.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use crate::AgentDefinition;

#[derive(Clone)]
pub struct SubagentMarket {
    fixed: Arc<HashMap<String, Arc<AgentDefinition>>>,
    dynamic: Arc<RwLock<HashMap<String, Arc<AgentDefinition>>>>,
}

impl SubagentMarket {
    pub fn new(fixed: Vec<AgentDefinition>) -> Self {
        let fixed = fixed.into_iter().map(|d| (d.name.clone(), Arc::new(d))).collect();
        Self {
            fixed: Arc::new(fixed),
            dynamic: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Adds (or replaces) a dynamically created definition, visible to
    /// every holder of this market's dynamic table.
    pub fn register_dynamic(&self, definition: AgentDefinition) {
        self.dynamic
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(definition.name.clone(), Arc::new(definition));
    }

    pub fn get(&self, name: &str) -> Option<Arc<AgentDefinition>> {
        if let Some(def) = self.fixed.get(name) {
            return Some(def.clone());
        }
        self.dynamic.read().unwrap_or_else(|e| e.into_inner()).get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.fixed.keys().cloned().collect();
        names.extend(self.dynamic.read().unwrap_or_else(|e| e.into_inner()).keys().cloned());
        names
    }

    /// The market handed to a child spawned from a `Fixed` definition: same
    /// fixed table, a brand new empty dynamic table.
    pub fn isolated_child(&self) -> SubagentMarket {
        SubagentMarket {
            fixed: self.fixed.clone(),
            dynamic: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The market handed to a child spawned from a `Dynamic` definition:
    /// the same fixed and dynamic tables as this market.
    pub fn shared_child(&self) -> SubagentMarket {
        self.clone()
    }
}

impl Default for SubagentMarket {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AgentSource;

    #[test]
    fn fixed_definitions_are_visible_from_construction() {
        let market = SubagentMarket::new(vec![AgentDefinition::fixed("explore", "d", "p")]);
        assert!(market.get("explore").is_some());
        assert!(market.get("missing").is_none());
    }

    #[test]
    fn register_dynamic_is_visible_on_this_market() {
        let market = SubagentMarket::empty();
        market.register_dynamic(AgentDefinition::dynamic("scratch", "p"));
        let def = market.get("scratch").expect("registered");
        assert_eq!(def.source, AgentSource::Dynamic);
    }

    #[test]
    fn isolated_child_does_not_see_parent_dynamic_agents() {
        let market = SubagentMarket::empty();
        market.register_dynamic(AgentDefinition::dynamic("scratch", "p"));
        let child = market.isolated_child();
        assert!(child.get("scratch").is_none());
    }

    #[test]
    fn shared_child_sees_dynamic_agents_added_after_the_fact() {
        let market = SubagentMarket::empty();
        let child = market.shared_child();
        market.register_dynamic(AgentDefinition::dynamic("scratch", "p"));
        assert!(child.get("scratch").is_some());
    }

    #[test]
    fn isolated_child_still_sees_fixed_definitions() {
        let market = SubagentMarket::new(vec![AgentDefinition::fixed("explore", "d", "p")]);
        let child = market.isolated_child();
        assert!(child.get("explore").is_some());
    }
}
