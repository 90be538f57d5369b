use crate::library::DeclId;
use crate::typespace::PrimitiveType;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use widl_diagnostics::{DiagnosticCode, Reporter, Span};
use widl_syntax::{Decl, TypeConstructor};

/// Appends `out` with every local declaration this type constructor embeds
/// *inline*. `vector`/`string`/`handle`/`client_end`/`server_end` box or
/// reference out-of-line storage, so referencing a type through one of them
/// never creates a sizing cycle and is not an edge. A nullable reference is
/// boxed too. `array` is the one built-in wrapper that stays inline.
fn walk_type_deps(tc: &TypeConstructor, name_to_id: &HashMap<String, DeclId>, out: &mut Vec<DeclId>) {
    if !tc.name.is_simple() {
        return;
    }
    let name = tc.name.last();
    match name {
        "array" => {
            if let Some(element) = &tc.element_type {
                walk_type_deps(element, name_to_id, out);
            }
        }
        "vector" | "string" | "handle" | "client_end" | "server_end" => {}
        _ if PrimitiveType::from_name(name).is_some() => {}
        _ => {
            if !tc.nullable {
                if let Some(id) = name_to_id.get(name) {
                    out.push(*id);
                }
            }
        }
    }
}

/// The local (same-library) declarations a declaration must already be
/// compiled before it can be. Table/union members are intentionally
/// excluded: wire envelopes box them out-of-line, so two tables may
/// reference each other (directly or through a cycle) without creating a
/// sizing problem, only a non-nullable struct member or array element does.
fn local_deps(decl: &Decl, name_to_id: &HashMap<String, DeclId>) -> Vec<DeclId> {
    let mut out = Vec::new();
    match decl {
        Decl::Const { ty, .. } => walk_type_deps(ty, name_to_id, &mut out),
        Decl::Struct { members, .. } => {
            for m in members {
                walk_type_deps(&m.ty, name_to_id, &mut out);
            }
        }
        Decl::TypeAlias { target, .. } => walk_type_deps(target, name_to_id, &mut out),
        Decl::Protocol { composes, .. } => {
            for c in composes {
                if c.is_simple() {
                    if let Some(id) = name_to_id.get(c.last()) {
                        out.push(*id);
                    }
                }
            }
        }
        Decl::Bits { .. } | Decl::Enum { .. } | Decl::Table { .. } | Decl::Union { .. } | Decl::Service { .. } | Decl::ResourceDefinition { .. } => {}
    }
    out
}

/// The local declaration-dependency graph, used to compile declarations in
/// an order where every dependency is already compiled, and to detect
/// illegal inline self-reference cycles (structs embedding themselves
/// directly or through an array).
pub struct DeclGraph {
    graph: DiGraph<DeclId, ()>,
    index: HashMap<DeclId, NodeIndex>,
}

impl DeclGraph {
    /// Builds the graph with nodes inserted in name-sorted order, so that
    /// when Tarjan's algorithm has no dependency to prefer between two
    /// declarations, the resulting order is still deterministic.
    pub fn build(decls: &[(DeclId, &Decl)], name_to_id: &HashMap<String, DeclId>) -> Self {
        let mut sorted: Vec<_> = decls.to_vec();
        sorted.sort_by_key(|(_, d)| d.name().text.clone());

        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for (id, _) in &sorted {
            index.insert(*id, graph.add_node(*id));
        }
        for (id, decl) in &sorted {
            for dep in local_deps(decl, name_to_id) {
                if let (Some(&from), Some(&to)) = (index.get(id), index.get(&dep)) {
                    graph.add_edge(from, to, ());
                }
            }
        }
        Self { graph, index }
    }

    /// A dependency-respecting compile order: dependencies of a declaration
    /// appear before it. Reports `WE06001` for any strongly connected
    /// component larger than one node, and for a singleton node with a
    /// self-loop (a struct embedding itself directly).
    pub fn compute_order(&self, span_of: impl Fn(DeclId) -> Span, reporter: &mut Reporter) -> Vec<DeclId> {
        let sccs = tarjan_scc(&self.graph);
        let mut order = Vec::with_capacity(self.graph.node_count());
        // `tarjan_scc` returns components in reverse topological order
        // (a component's dependencies come after it); compiling
        // dependency-first means consuming that list back to front.
        for scc in sccs.into_iter().rev() {
            if scc.len() > 1 || self.graph.find_edge(scc[0], scc[0]).is_some() {
                let names: Vec<String> = scc.iter().map(|&n| self.graph[n].0.to_string()).collect();
                let rep = self.graph[scc[0]];
                reporter.report(DiagnosticCode::WE06001, Some(&span_of(rep)), &[names.join(", ")]);
            }
            for node in scc {
                order.push(self.graph[node]);
            }
        }
        order
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use widl_diagnostics::{ByteRange, SourceFile};
    use widl_syntax::{Ident, StructMember};

    fn dummy_span() -> Span {
        let f = SourceFile::new("t", "x");
        f.span(ByteRange::new(0, 1))
    }

    fn struct_decl(name: &str, member_ty_name: &str) -> Decl {
        let span = dummy_span();
        let ident = Ident::new(member_ty_name, span.clone());
        let ty = TypeConstructor::simple(widl_syntax::CompoundIdentifier::new(vec![member_ty_name.to_string()], span.clone()), span.clone());
        Decl::Struct {
            name: Ident::new(name, span.clone()),
            members: vec![StructMember { name: ident, ty, default: None, attributes: vec![], doc: None, span: span.clone() }],
            resource: false,
            attributes: vec![],
            doc: None,
            span,
        }
    }

    #[test]
    fn detects_direct_self_reference_as_cycle() {
        let mut name_to_id = HashMap::new();
        name_to_id.insert("A".to_string(), DeclId(0));
        let a = struct_decl("A", "A");
        let decls: Vec<(DeclId, &Decl)> = vec![(DeclId(0), &a)];
        let graph = DeclGraph::build(&decls, &name_to_id);
        let mut reporter = Reporter::new();
        let order = graph.compute_order(|_| dummy_span(), &mut reporter);
        assert_eq!(order.len(), 1);
        assert!(reporter.has_errors());
    }

    #[test]
    fn orders_dependency_before_dependent() {
        let mut name_to_id = HashMap::new();
        name_to_id.insert("A".to_string(), DeclId(0));
        name_to_id.insert("B".to_string(), DeclId(1));
        let a = struct_decl("A", "B");
        let b_span = dummy_span();
        let b = Decl::Struct { name: Ident::new("B", b_span.clone()), members: vec![], resource: false, attributes: vec![], doc: None, span: b_span };
        let decls: Vec<(DeclId, &Decl)> = vec![(DeclId(0), &a), (DeclId(1), &b)];
        let graph = DeclGraph::build(&decls, &name_to_id);
        let mut reporter = Reporter::new();
        let order = graph.compute_order(|_| dummy_span(), &mut reporter);
        assert!(!reporter.has_errors());
        let pos_a = order.iter().position(|&id| id == DeclId(0)).unwrap();
        let pos_b = order.iter().position(|&id| id == DeclId(1)).unwrap();
        assert!(pos_b < pos_a);
    }
}
