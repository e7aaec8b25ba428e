use log::{debug, info};
use starroute_game::{Catalog, Seconds, StarCount, StarIdx, ROUTE_STAR_COUNT};
use starroute_logic::DependencyData;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use thiserror::Error;

use crate::settings::OptimizerSettings;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error(
        "unable to form any {}-star route due to insufficient eligible stars",
        ROUTE_STAR_COUNT
    )]
    Unattainable,
}

/// A partition that cannot be completed. Recovered locally: the search
/// abandons the partition and moves on to the next branch.
#[derive(Debug, Error)]
enum InfeasiblePartition {
    #[error("ran out of eligible stars")]
    InsufficientRemainingStars,
    #[error("too many included stars")]
    TooManyIncludedStars,
    #[error("too many upper-level stars")]
    TooManyUpperLevelStars,
}

/// A complete 70-star selection and its summed time.
#[derive(Clone, Debug)]
pub struct Route {
    /// Selected stars in ascending catalog order.
    pub star_idxs: Vec<StarIdx>,
    pub total_time: Seconds,
}

/// Running optimum over every route the search completes. Lowest summed
/// time wins; the first route to reach a given time keeps it.
pub struct BestRouteTracker {
    best_time: Seconds,
    best_selected: Option<Vec<bool>>,
    num_completed: usize,
}

impl BestRouteTracker {
    pub fn new() -> Self {
        BestRouteTracker {
            best_time: Seconds::INFINITY,
            best_selected: None,
            num_completed: 0,
        }
    }

    pub fn offer(&mut self, total_time: Seconds, selected: Vec<bool>) {
        self.num_completed += 1;
        if total_time < self.best_time {
            debug!("New best route: {total_time:.2} seconds");
            self.best_time = total_time;
            self.best_selected = Some(selected);
        }
    }

    pub fn num_completed(&self) -> usize {
        self.num_completed
    }

    pub fn into_best(self) -> Option<Route> {
        let best_time = self.best_time;
        self.best_selected.map(|selected| Route {
            star_idxs: selected
                .iter()
                .enumerate()
                .filter(|&(_, &sel)| sel)
                .map(|(idx, _)| idx)
                .collect(),
            total_time: best_time,
        })
    }
}

impl Default for BestRouteTracker {
    fn default() -> Self {
        BestRouteTracker::new()
    }
}

// Includes preprocessing specific to the catalog and settings:
pub struct Optimizer<'a> {
    pub catalog: &'a Catalog,
    pub dependency_data: &'a DependencyData,
    pub settings: &'a OptimizerSettings,
    /// Candidate stars in ascending order of (average time, catalog
    /// index); the greedy completion consumes this front to back.
    star_time_seq: Vec<(Seconds, StarIdx)>,
}

impl<'a> Optimizer<'a> {
    pub fn new(
        catalog: &'a Catalog,
        dependency_data: &'a DependencyData,
        settings: &'a OptimizerSettings,
    ) -> Self {
        let mut star_time_seq: Vec<(Seconds, StarIdx)> = catalog
            .stars
            .iter()
            .enumerate()
            .filter(|(_, star)| !star.excluded)
            .filter_map(|(idx, star)| star.average_time.map(|time| (time, idx)))
            .collect();
        star_time_seq.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        Optimizer {
            catalog,
            dependency_data,
            settings,
            star_time_seq,
        }
    }

    /// Exhaustively enumerate the feasible include/exclude assignments of
    /// the special stars, greedily complete each one, and return the
    /// fastest completed route.
    pub fn find_optimal_route(&self) -> Result<Route, RouteError> {
        let num_stars = self.catalog.stars.len();
        let mandatory_idx = self.catalog.mandatory_star_idx;
        let mut tracker = BestRouteTracker::new();

        // Every branch starts from the mandatory star (or its 100 coin
        // alternative) already in the route.
        let no_exclusions = vec![false; num_stars];
        let seed_pairs = self.alternative_pairs(mandatory_idx, &no_exclusions);
        info!(
            "Searching partitions of {} special star decisions, {} candidates, {} seed choices",
            self.dependency_data.special_order.len(),
            self.star_time_seq.len(),
            seed_pairs.len()
        );
        for (seed_idx, seed_excluded) in seed_pairs {
            let mut included = vec![false; num_stars];
            included[seed_idx] = true;
            let mut excluded = vec![false; num_stars];
            if let Some(excluded_idx) = seed_excluded {
                excluded[excluded_idx] = true;
            }
            self.search_partitions(0, included, excluded, &mut tracker);
        }

        info!("Completed {} partitions", tracker.num_completed());
        tracker.into_best().ok_or(RouteError::Unattainable)
    }

    /// Depth-first enumeration, one decision per special star. At each
    /// index the feasible branches are: include the star, include its 100
    /// coin alternative, or exclude both along with every star downstream
    /// of them. Fully decided assignments are completed and offered to
    /// the tracker.
    fn search_partitions(
        &self,
        decision_idx: usize,
        included: Vec<bool>,
        excluded: Vec<bool>,
        tracker: &mut BestRouteTracker,
    ) {
        let order = &self.dependency_data.special_order;
        if decision_idx == order.len() {
            if let Ok((total_time, selected)) = self.complete_route(&included, &excluded) {
                tracker.offer(total_time, selected);
            }
            return;
        }

        let star_idx = order[decision_idx];
        if star_idx == self.catalog.mandatory_star_idx {
            // Decided before the search began.
            self.search_partitions(decision_idx + 1, included, excluded, tracker);
            return;
        }

        if self.requirements_satisfied(star_idx, &included) {
            for (include_idx, exclude_idx) in self.alternative_pairs(star_idx, &excluded) {
                let mut next_included = included.clone();
                next_included[include_idx] = true;
                let mut next_excluded = excluded.clone();
                if let Some(excluded_idx) = exclude_idx {
                    next_excluded[excluded_idx] = true;
                }
                self.search_partitions(decision_idx + 1, next_included, next_excluded, tracker);
            }
        }

        // Exclude both forms; everything that requires this star (and each
        // such star's alternative) goes with them.
        let mut next_excluded = excluded;
        next_excluded[star_idx] = true;
        if let Some(alt_idx) = self.catalog.stars[star_idx].alt_star_idx {
            next_excluded[alt_idx] = true;
        }
        for &descendant in &self.dependency_data.descendants[star_idx] {
            next_excluded[descendant] = true;
        }
        self.search_partitions(decision_idx + 1, included, next_excluded, tracker);
    }

    /// The ways to cover one star's event, each paired with the star it
    /// forces out: the star itself (excluding its alternative) and its
    /// alternative (excluding the star). Ineligible forms produce no
    /// branch.
    fn alternative_pairs(
        &self,
        star_idx: StarIdx,
        excluded: &[bool],
    ) -> Vec<(StarIdx, Option<StarIdx>)> {
        let star = &self.catalog.stars[star_idx];
        let base_ok = star.is_candidate() && !excluded[star_idx];
        let alt = star
            .alt_star_idx
            .filter(|&alt_idx| self.catalog.stars[alt_idx].is_candidate() && !excluded[alt_idx]);
        let mut pairs = Vec::new();
        if base_ok {
            pairs.push((star_idx, alt));
        }
        if let Some(alt_idx) = alt {
            pairs.push((alt_idx, base_ok.then_some(star_idx)));
        }
        pairs
    }

    /// A requirement is covered by the requirement star itself or by its
    /// 100 coin alternative; both represent the same underlying event.
    fn requirements_satisfied(&self, star_idx: StarIdx, included: &[bool]) -> bool {
        self.catalog.requirements[star_idx].iter().all(|&req_idx| {
            included[req_idx]
                || self.catalog.stars[req_idx]
                    .alt_star_idx
                    .is_some_and(|alt_idx| included[alt_idx])
        })
    }

    fn within_upper_cap(&self, star_idx: StarIdx, num_upper: StarCount) -> bool {
        if !self.catalog.stars[star_idx].location.is_upper_level() {
            return true;
        }
        match self.settings.max_upper_level_stars {
            Some(cap) => num_upper < cap,
            None => true,
        }
    }

    /// Greedily fill the partition out to a full route: seed with the
    /// included specials, then add the fastest remaining candidates. A
    /// candidate whose star-count gate is not yet met waits on a min-heap
    /// keyed by (gate, sequence position) until the running count catches
    /// up. Once the upper-level cap is reached, upstairs and tippy
    /// candidates are dropped from this completion entirely, whether met
    /// in the sequence or popped off the heap.
    fn complete_route(
        &self,
        included: &[bool],
        excluded: &[bool],
    ) -> Result<(Seconds, Vec<bool>), InfeasiblePartition> {
        let gates = &self.dependency_data.effective_gate;
        let target = ROUTE_STAR_COUNT as StarCount;

        let mut selected = included.to_vec();
        let mut total_time: Seconds = 0.0;
        let mut count: StarCount = 0;
        let mut num_upper: StarCount = 0;
        for (idx, star) in self.catalog.stars.iter().enumerate() {
            if !included[idx] {
                continue;
            }
            if let Some(time) = star.average_time {
                total_time += time;
            }
            count += 1;
            if star.location.is_upper_level() {
                num_upper += 1;
            }
        }
        if count > target {
            return Err(InfeasiblePartition::TooManyIncludedStars);
        }
        if let Some(cap) = self.settings.max_upper_level_stars {
            if num_upper > cap {
                return Err(InfeasiblePartition::TooManyUpperLevelStars);
            }
        }

        let mut deferred: BinaryHeap<Reverse<(StarCount, usize)>> = BinaryHeap::new();
        let mut seq_pos: usize = 0;
        while count < target {
            let (time, star_idx) = loop {
                // A deferred star whose gate has been met goes in ahead of
                // anything later in the sequence; it was deferred from an
                // earlier (cheaper) position.
                if let Some(&Reverse((gate, pos))) = deferred.peek() {
                    if gate <= count {
                        deferred.pop();
                        let (time, star_idx) = self.star_time_seq[pos];
                        if self.within_upper_cap(star_idx, num_upper) {
                            break (time, star_idx);
                        }
                        continue;
                    }
                }
                let Some(&(time, star_idx)) = self.star_time_seq.get(seq_pos) else {
                    return Err(InfeasiblePartition::InsufficientRemainingStars);
                };
                let pos = seq_pos;
                seq_pos += 1;
                if selected[star_idx]
                    || excluded[star_idx]
                    || !self.within_upper_cap(star_idx, num_upper)
                {
                    continue;
                }
                if gates[star_idx] <= count {
                    break (time, star_idx);
                }
                deferred.push(Reverse((gates[star_idx], pos)));
            };

            selected[star_idx] = true;
            total_time += time;
            count += 1;
            if self.catalog.stars[star_idx].location.is_upper_level() {
                num_upper += 1;
            }
        }

        Ok((total_time, selected))
    }
}
