use hashbrown::HashSet;
use log::info;
use starroute_game::{Catalog, StarCount, StarIdx};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("prerequisite declarations form a cycle involving: {}", star_ids.join(", "))]
pub struct CycleError {
    pub star_ids: Vec<String>,
}

/// Read-only structures derived once from the catalog's prerequisite and
/// exclusivity relationships, consumed by the partition search.
#[derive(Debug)]
pub struct DependencyData {
    /// Decision order for the partition search: prerequisite-linked stars
    /// in topological order (every requirement before its dependants),
    /// followed by the remaining stars with 100 coin alternatives in
    /// catalog order. Contains regular stars only; a 100 coin star is
    /// decided jointly with the star it is combined with.
    pub special_order: Vec<StarIdx>,
    /// True for stars entangled in prerequisite or exclusivity
    /// relationships; all other stars can be picked freely by the greedy
    /// completion.
    pub is_special: Vec<bool>,
    /// Per star, every star that requires it directly or transitively,
    /// with the 100 coin alternative of each such star included.
    pub descendants: Vec<Vec<StarIdx>>,
    /// Per star, its star-count requirement raised to the maximum over all
    /// of its ancestors; a 100 coin star tracks the star it is combined
    /// with.
    pub effective_gate: Vec<StarCount>,
}

pub fn analyze_dependencies(catalog: &Catalog) -> Result<DependencyData, CycleError> {
    let num_stars = catalog.stars.len();

    let mut is_special = vec![false; num_stars];
    let mut in_graph = vec![false; num_stars];
    for idx in 0..num_stars {
        let linked = !catalog.requirements[idx].is_empty() || !catalog.dependants[idx].is_empty();
        in_graph[idx] = linked;
        is_special[idx] = linked
            || catalog.stars[idx].alt_star_idx.is_some()
            || catalog.stars[idx].base_star_idx.is_some();
    }

    // Kahn's algorithm over the prerequisite-linked stars. The heap keeps
    // zero-in-degree ties in catalog order so the decision order is
    // reproducible run to run.
    let mut in_degree: Vec<usize> = (0..num_stars)
        .map(|idx| catalog.requirements[idx].len())
        .collect();
    let mut ready: BinaryHeap<Reverse<StarIdx>> = BinaryHeap::new();
    for idx in 0..num_stars {
        if in_graph[idx] && in_degree[idx] == 0 {
            ready.push(Reverse(idx));
        }
    }
    let mut special_order: Vec<StarIdx> = Vec::new();
    while let Some(Reverse(idx)) = ready.pop() {
        special_order.push(idx);
        for &dependant in &catalog.dependants[idx] {
            in_degree[dependant] -= 1;
            if in_degree[dependant] == 0 {
                ready.push(Reverse(dependant));
            }
        }
    }
    let graph_size = in_graph.iter().filter(|&&linked| linked).count();
    if special_order.len() < graph_size {
        let mut star_ids: Vec<String> = (0..num_stars)
            .filter(|&idx| in_graph[idx] && in_degree[idx] > 0)
            .map(|idx| catalog.stars[idx].id.clone())
            .collect();
        star_ids.sort();
        return Err(CycleError { star_ids });
    }

    // Stars that are special only through a 100 coin pairing still need a
    // decision; they go after the sorted prefix, in catalog order.
    for idx in 0..num_stars {
        if is_special[idx] && !in_graph[idx] && catalog.stars[idx].base_star_idx.is_none() {
            special_order.push(idx);
        }
    }

    // Transitive descendants, dependants-first so each star unions the
    // already-final sets of its dependants. Excluding a star knocks out
    // everything in its set, so 100 coin alternatives ride along with
    // their combined star.
    let mut descendant_sets: Vec<HashSet<StarIdx>> = vec![HashSet::new(); num_stars];
    for &idx in special_order.iter().rev() {
        let mut set: HashSet<StarIdx> = HashSet::new();
        for &dependant in &catalog.dependants[idx] {
            set.insert(dependant);
            if let Some(alt_idx) = catalog.stars[dependant].alt_star_idx {
                set.insert(alt_idx);
            }
            for &descendant in &descendant_sets[dependant] {
                set.insert(descendant);
            }
        }
        descendant_sets[idx] = set;
    }
    let descendants: Vec<Vec<StarIdx>> = descendant_sets
        .iter()
        .map(|set| {
            let mut list: Vec<StarIdx> = set.iter().copied().collect();
            list.sort_unstable();
            list
        })
        .collect();

    // A star behind a gated ancestor is really gated at least as high as
    // that ancestor. Propagating along the topological order settles every
    // gate in one pass.
    let mut effective_gate: Vec<StarCount> = catalog
        .stars
        .iter()
        .map(|star| star.num_stars_required)
        .collect();
    for &idx in &special_order {
        for &dependant in &catalog.dependants[idx] {
            effective_gate[dependant] = effective_gate[dependant].max(effective_gate[idx]);
        }
    }
    for idx in 0..num_stars {
        if let Some(base_idx) = catalog.stars[idx].base_star_idx {
            effective_gate[idx] = effective_gate[base_idx];
        }
    }

    info!(
        "Dependency analysis: {} special stars, {} decisions, {} prerequisite-linked",
        is_special.iter().filter(|&&s| s).count(),
        special_order.len(),
        graph_size
    );

    Ok(DependencyData {
        special_order,
        is_special,
        descendants,
        effective_gate,
    })
}
