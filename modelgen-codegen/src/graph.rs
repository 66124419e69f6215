//! Foreign-key reference graph.

use std::collections::{BTreeMap, BTreeSet};

use modelgen_schema::TableInfo;

/// Tables of one run grouped by strongly connected component of the
/// foreign-key graph. Tables in the same component reference each other
/// (directly or through other tables) and must use forward references.
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    /// Component id per table; only tables in a cycle of two or more.
    cyclic: BTreeMap<String, usize>,
}

impl ReferenceGraph {
    pub fn new(tables: &[TableInfo]) -> Self {
        let names: BTreeSet<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        let edges: BTreeMap<&str, Vec<&str>> = tables
            .iter()
            .map(|t| {
                let targets = t
                    .foreign_key_targets()
                    .into_iter()
                    .filter(|target| *target != t.name && names.contains(target))
                    .collect();
                (t.name.as_str(), targets)
            })
            .collect();

        let mut tarjan = Tarjan {
            edges: &edges,
            index: BTreeMap::new(),
            lowlink: BTreeMap::new(),
            stack: Vec::new(),
            on_stack: BTreeSet::new(),
            next_index: 0,
            components: Vec::new(),
        };
        for &name in &names {
            if !tarjan.index.contains_key(name) {
                tarjan.visit(name);
            }
        }

        let cyclic = tarjan
            .components
            .into_iter()
            .filter(|component| component.len() > 1)
            .enumerate()
            .flat_map(|(id, component)| {
                component.into_iter().map(move |name| (name.to_string(), id))
            })
            .collect();
        Self { cyclic }
    }

    /// Whether `from` and `to` reference each other through a cycle.
    pub fn is_mutual(&self, from: &str, to: &str) -> bool {
        match (self.cyclic.get(from), self.cyclic.get(to)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

struct Tarjan<'a> {
    edges: &'a BTreeMap<&'a str, Vec<&'a str>>,
    index: BTreeMap<&'a str, usize>,
    lowlink: BTreeMap<&'a str, usize>,
    stack: Vec<&'a str>,
    on_stack: BTreeSet<&'a str>,
    next_index: usize,
    components: Vec<Vec<&'a str>>,
}

impl<'a> Tarjan<'a> {
    fn visit(&mut self, node: &'a str) {
        self.index.insert(node, self.next_index);
        self.lowlink.insert(node, self.next_index);
        self.next_index += 1;
        self.stack.push(node);
        self.on_stack.insert(node);

        let edges = self.edges;
        for &next in edges.get(node).into_iter().flatten() {
            if !self.index.contains_key(next) {
                self.visit(next);
                let low = self.lowlink[node].min(self.lowlink[next]);
                self.lowlink.insert(node, low);
            } else if self.on_stack.contains(next) {
                let low = self.lowlink[node].min(self.index[next]);
                self.lowlink.insert(node, low);
            }
        }

        if self.lowlink[node] == self.index[node] {
            let mut component = Vec::new();
            while let Some(member) = self.stack.pop() {
                self.on_stack.remove(member);
                component.push(member);
                if member == node {
                    break;
                }
            }
            self.components.push(component);
        }
    }
}
