use serde::{Deserialize, Serialize};
use starroute_game::{Catalog, Location, Seconds};

use crate::optimize::Route;

/// Everything a report renderer needs, with no recomputation: every
/// catalog star with its inclusion flag, the summed time, and per-course
/// and per-location counts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteSummary {
    pub total_time: Seconds,
    pub num_stars: usize,
    pub stars: Vec<StarSummary>,
    pub num_stars_per_course: Vec<CourseCount>,
    pub num_stars_per_location: Vec<LocationCount>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StarSummary {
    pub star_id: String,
    pub name: String,
    pub course_id: String,
    pub number: usize,
    pub location: Location,
    pub average_time: Option<Seconds>,
    pub included: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CourseCount {
    pub course_id: String,
    pub num_stars: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocationCount {
    pub location: Location,
    pub num_stars: usize,
}

pub fn summarize_route(catalog: &Catalog, route: &Route) -> RouteSummary {
    let mut selected = vec![false; catalog.stars.len()];
    for &star_idx in &route.star_idxs {
        selected[star_idx] = true;
    }

    let mut stars: Vec<StarSummary> = Vec::new();
    let mut num_stars_per_course: Vec<CourseCount> = Vec::new();
    for course in &catalog.courses {
        let mut course_count = 0;
        for &star_idx in &course.star_idxs {
            let star = &catalog.stars[star_idx];
            if selected[star_idx] {
                course_count += 1;
            }
            stars.push(StarSummary {
                star_id: star.id.clone(),
                name: star.name.clone(),
                course_id: course.id.clone(),
                number: star.number,
                location: star.location,
                average_time: star.average_time,
                included: selected[star_idx],
            });
        }
        num_stars_per_course.push(CourseCount {
            course_id: course.id.clone(),
            num_stars: course_count,
        });
    }

    let num_stars_per_location = Location::ALL
        .iter()
        .map(|&location| LocationCount {
            location,
            num_stars: route
                .star_idxs
                .iter()
                .filter(|&&star_idx| catalog.stars[star_idx].location == location)
                .count(),
        })
        .collect();

    RouteSummary {
        total_time: route.total_time,
        num_stars: route.star_idxs.len(),
        stars,
        num_stars_per_course,
        num_stars_per_location,
    }
}

/// Render a summed time as whole minutes and remaining seconds.
pub fn format_route_time(total_time: Seconds) -> String {
    let minutes = (total_time / 60.0).floor() as i64;
    let seconds = total_time - (minutes as Seconds) * 60.0;
    if minutes > 0 {
        format!("{minutes} minutes {seconds:.2} seconds")
    } else {
        format!("{seconds:.2} seconds")
    }
}
