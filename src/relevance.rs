use std::rc::Rc;

use fxhash::FxHashSet;

use crate::clause::Clause;
use crate::clauseset::ClauseSet;
use crate::unification::mgu;

// Every literal occurrence contributes two nodes, one per direction.
// An alternating path enters a clause through an "in" node and leaves
// it through the "out" node of a different literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    In,
    Out,
}

/// The alternating-path relevance graph over a clause set, in
/// adjacency-list form. Nodes are (clause, literal, direction)
/// triples; intra-clause edges join distinct literals of one clause
/// with opposite directions, inter-clause edges join opposite-polarity
/// literals with unifiable atoms.
pub struct RelevanceGraph {
    clauses: Vec<Rc<Clause>>,
    // (clause index, literal index, direction), densely numbered.
    nodes: Vec<(usize, usize, Direction)>,
    neighbours: Vec<Vec<usize>>,
}

impl RelevanceGraph {
    pub fn new(clause_set: &ClauseSet) -> RelevanceGraph {
        let clauses: Vec<Rc<Clause>> = clause_set.clauses.clone();

        let mut nodes = vec![];
        for (ci, clause) in clauses.iter().enumerate() {
            for li in 0..clause.len() {
                nodes.push((ci, li, Direction::In));
                nodes.push((ci, li, Direction::Out));
            }
        }

        let mut graph = RelevanceGraph {
            clauses,
            neighbours: vec![vec![]; nodes.len()],
            nodes,
        };
        graph.construct_inclause_edges();
        graph.construct_betweenclause_edges();
        graph
    }

    fn create_edge(&mut self, node1: usize, node2: usize) {
        self.neighbours[node1].push(node2);
        self.neighbours[node2].push(node1);
    }

    fn construct_inclause_edges(&mut self) {
        for i in 0..self.nodes.len() {
            let (ci, li, dir) = self.nodes[i];
            if dir != Direction::In {
                continue;
            }
            for j in 0..self.nodes.len() {
                let (cj, lj, dir_j) = self.nodes[j];
                if dir_j == Direction::Out && ci == cj && li != lj {
                    self.create_edge(i, j);
                }
            }
        }
    }

    fn construct_betweenclause_edges(&mut self) {
        for i in 0..self.nodes.len() {
            let (ci, li, dir) = self.nodes[i];
            if dir != Direction::Out {
                continue;
            }
            let out_lit = self.clauses[ci].get_literal(li).clone();
            for j in 0..self.nodes.len() {
                let (cj, lj, dir_j) = self.nodes[j];
                if dir_j != Direction::In {
                    continue;
                }
                let in_lit = self.clauses[cj].get_literal(lj);
                let different_signs = out_lit.is_negative() != in_lit.is_negative();
                if different_signs && mgu(&out_lit.atom, &in_lit.atom).is_some() {
                    self.create_edge(i, j);
                }
            }
        }
    }

    // All nodes belonging to the given clauses.
    fn clauses_to_nodes(&self, clauses: &[Rc<Clause>]) -> FxHashSet<usize> {
        let ids: FxHashSet<u64> = clauses.iter().map(|c| c.id).collect();
        (0..self.nodes.len())
            .filter(|&i| ids.contains(&self.clauses[self.nodes[i].0].id))
            .collect()
    }

    /// The clauses within the given alternating-path distance of
    /// from_clauses. Distance 0 keeps only the starting clauses
    /// themselves.
    pub fn rel_neighbourhood(&self, from_clauses: &[Rc<Clause>], distance: usize) -> ClauseSet {
        let mut neighbourhood = self.clauses_to_nodes(from_clauses);

        let rounds = if distance == 0 { 0 } else { 2 * distance - 1 };
        for _ in 0..rounds {
            let mut extension = vec![];
            for &node in &neighbourhood {
                extension.extend(self.neighbours[node].iter().copied());
            }
            neighbourhood.extend(extension);
        }

        // Emit the surviving clauses in their original order, so the
        // filtered problem replays deterministically.
        let clause_indices: FxHashSet<usize> =
            neighbourhood.iter().map(|&i| self.nodes[i].0).collect();
        let mut res = ClauseSet::new();
        for (ci, clause) in self.clauses.iter().enumerate() {
            if clause_indices.contains(&ci) {
                res.add_clause(clause.clone());
            }
        }
        res
    }
}

/// Restrict a clause set to the clauses within the given relevance
/// distance of its negated conjectures.
pub fn relevance_filter(cnf: &ClauseSet, distance: usize) -> ClauseSet {
    let graph = RelevanceGraph::new(cnf);
    let from_clauses = cnf.negated_conjectures();
    graph.rel_neighbourhood(&from_clauses, distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use indoc::indoc;

    const CHAIN: &str = indoc! {"
        cnf(a1, axiom, p(a)).
        cnf(a2, axiom, ~p(X)|q(X)).
        cnf(a3, axiom, ~q(X)|r(X)).
        cnf(g, negated_conjecture, ~r(a)).
    "};

    fn chain_set() -> ClauseSet {
        let mut set = ClauseSet::new();
        let mut lexer = Lexer::new(CHAIN);
        set.parse(&mut lexer).unwrap();
        set
    }

    #[test]
    fn test_distance_limits_neighbourhood() {
        let set = chain_set();
        assert_eq!(relevance_filter(&set, 0).len(), 1);
        assert_eq!(relevance_filter(&set, 1).len(), 2);
        assert_eq!(relevance_filter(&set, 2).len(), 3);
        assert_eq!(relevance_filter(&set, 3).len(), 4);
        // Beyond the chain length nothing more can be reached.
        assert_eq!(relevance_filter(&set, 10).len(), 4);
    }

    #[test]
    fn test_unreachable_clauses_are_dropped() {
        let spec = indoc! {"
            cnf(a1, axiom, p(a)).
            cnf(unrelated, axiom, s(b)|~t(b)).
            cnf(g, negated_conjecture, ~p(a)).
        "};
        let mut set = ClauseSet::new();
        let mut lexer = Lexer::new(spec);
        set.parse(&mut lexer).unwrap();

        let filtered = relevance_filter(&set, 5);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.clauses.iter().all(|c| c.name != "unrelated"));
    }

    #[test]
    fn test_no_conjecture_yields_empty_set() {
        let spec = "cnf(a1, axiom, p(a)).";
        let mut set = ClauseSet::new();
        let mut lexer = Lexer::new(spec);
        set.parse(&mut lexer).unwrap();
        assert_eq!(relevance_filter(&set, 2).len(), 0);
    }
}
