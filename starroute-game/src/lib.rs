pub mod config;
pub mod course_data;

use hashbrown::HashMap;
use log::info;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use strum_macros::{EnumString, VariantNames};
use thiserror::Error;

use crate::config::{HundredCoinEntry, UserConfig};

/// Number of stars in a completed route.
pub const ROUTE_STAR_COUNT: usize = 70;

/// Star that must appear in every route (or be covered by its 100 coin
/// alternative). Assumed to have no prerequisites of its own.
pub const MANDATORY_STAR_ID: &str = "DDD1";

pub const CASTLE_COURSE_ID: &str = "CASTLE";

/// Menu number given to 100 coin stars, one past the six regular stars.
pub const COMBINED_STAR_NUMBER: usize = 7;

pub type StarIdx = usize; // Index into Catalog.star_isv.keys
pub type CourseIdx = usize; // Index into Catalog.course_isv.keys
pub type StarCount = i32; // Star-count gate thresholds and running totals
pub type Seconds = f64;

#[derive(Default, Clone, Debug)]
pub struct IndexedVec<T: Hash + Eq> {
    pub keys: Vec<T>,
    pub index_by_key: HashMap<T, usize>,
}

impl<T: Hash + Eq> IndexedVec<T> {
    pub fn add<U: ToOwned<Owned = T> + ?Sized>(&mut self, name: &U) -> usize {
        if !self.index_by_key.contains_key(&name.to_owned()) {
            let idx = self.keys.len();
            self.index_by_key.insert(name.to_owned(), self.keys.len());
            self.keys.push(name.to_owned());
            idx
        } else {
            self.index_by_key[&name.to_owned()]
        }
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumString,
    VariantNames,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Lobby,
    Courtyard,
    Basement,
    Upstairs,
    Tippy,
    CastleSecret,
}

impl Location {
    pub const ALL: [Location; 6] = [
        Location::Lobby,
        Location::Courtyard,
        Location::Basement,
        Location::Upstairs,
        Location::Tippy,
        Location::CastleSecret,
    ];

    /// The upstairs and tippy floors, which the route can cap.
    pub fn is_upper_level(self) -> bool {
        matches!(self, Location::Upstairs | Location::Tippy)
    }
}

#[derive(Clone, Debug)]
pub struct Star {
    pub id: String,
    pub name: String,
    pub number: usize,
    pub course_idx: CourseIdx,
    pub location: Location,
    /// Star count required before this star can be collected, as declared
    /// in the course table. The dependency analyzer raises this to the
    /// maximum over all ancestors.
    pub num_stars_required: StarCount,
    pub times: Vec<Seconds>,
    pub average_time: Option<Seconds>,
    /// 100 coin star covering the same event as this star, if one was
    /// declared. The two can never both be in a route.
    pub alt_star_idx: Option<StarIdx>,
    /// For a 100 coin star, the regular star it is combined with.
    pub base_star_idx: Option<StarIdx>,
    pub excluded: bool,
}

impl Star {
    /// A star can enter a route only if it has recorded times and was not
    /// excluded on the command line.
    pub fn is_candidate(&self) -> bool {
        self.average_time.is_some() && !self.excluded
    }

    pub fn is_combined(&self) -> bool {
        self.base_star_idx.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub number: usize,
    pub star_idxs: Vec<StarIdx>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown star id {0:?}")]
    UnknownStarId(String),
    #[error("unknown course id {0:?}")]
    UnknownCourseId(String),
    #[error("invalid time sample {time} for star {star_id:?}")]
    InvalidTimeSample { star_id: String, time: f64 },
    #[error(
        "100 coin star {combined_id:?} combined with {base_id:?} must be named {expected_id:?}"
    )]
    CombinedStarIdMismatch {
        combined_id: String,
        base_id: String,
        expected_id: String,
    },
    #[error("castle star {base_id:?} cannot have a 100 coin alternative {combined_id:?}")]
    CombinedStarOnCastleStar {
        combined_id: String,
        base_id: String,
    },
    #[error("100 coin star {0:?} cannot appear in a prerequisite declaration")]
    CombinedStarInPrerequisites(String),
    #[error("mandatory star {0:?} must not have prerequisites")]
    MandatoryStarHasPrerequisites(String),
    #[error("no times found for mandatory star {0:?} or a 100 coin alternative")]
    MandatoryStarMissingTimes(String),
    #[error("times exist for mandatory star {0:?} (or its 100 coin alternative) but all have been excluded")]
    MandatoryStarExcluded(String),
}

/// Immutable model of all stars and courses for one run: the built-in
/// course table, augmented with the user's 100 coin stars, annotated with
/// the user's times and prerequisite edges, and pruned by the command-line
/// exclusions.
#[derive(Debug)]
pub struct Catalog {
    pub star_isv: IndexedVec<String>,
    pub stars: Vec<Star>,
    pub course_isv: IndexedVec<String>,
    pub courses: Vec<Course>,
    /// Per star, the stars it requires (in declaration order). Only
    /// regular stars may appear on either end; 100 coin stars adopt the
    /// edges of the star they are combined with.
    pub requirements: Vec<Vec<StarIdx>>,
    /// Per star, the stars that require it.
    pub dependants: Vec<Vec<StarIdx>>,
    pub mandatory_star_idx: StarIdx,
}

impl Catalog {
    pub fn build(
        config: &UserConfig,
        excluded_course_ids: &[String],
        excluded_star_ids: &[String],
    ) -> Result<Catalog, ConfigError> {
        let mut star_isv: IndexedVec<String> = IndexedVec::default();
        let mut course_isv: IndexedVec<String> = IndexedVec::default();
        let mut stars: Vec<Star> = Vec::new();
        let mut courses: Vec<Course> = Vec::new();

        for course_entry in course_data::course_table() {
            let course_idx = course_isv.add(&course_entry.id);
            let mut star_idxs: Vec<StarIdx> = Vec::new();
            for star_entry in &course_entry.stars {
                let star_idx = star_isv.add(&star_entry.id);
                stars.push(Star {
                    id: star_entry.id.clone(),
                    name: star_entry.name.clone(),
                    number: star_entry.number,
                    course_idx,
                    location: star_entry.location,
                    num_stars_required: star_entry.num_stars_required,
                    times: Vec::new(),
                    average_time: None,
                    alt_star_idx: None,
                    base_star_idx: None,
                    excluded: false,
                });
                star_idxs.push(star_idx);
            }
            courses.push(Course {
                id: course_entry.id,
                name: course_entry.name,
                number: course_entry.number,
                star_idxs,
            });
        }

        // Attach the user's recorded times. The times table may only name
        // regular stars; 100 coin stars carry their times in their own
        // table below.
        for (star_id, times) in &config.times {
            let &star_idx = star_isv
                .index_by_key
                .get(star_id)
                .ok_or_else(|| ConfigError::UnknownStarId(star_id.clone()))?;
            validate_times(star_id, times)?;
            stars[star_idx].times = times.clone();
            stars[star_idx].average_time = average_time(times);
        }

        // Instantiate 100 coin stars, cloning the combined star's location
        // and star-count requirement. Sorted by id so catalog indices do
        // not depend on map iteration order.
        let mut combined_entries: Vec<(&String, &HundredCoinEntry)> =
            config.hundred_coin_times.iter().collect();
        combined_entries.sort_by(|a, b| a.0.cmp(b.0));
        for (combined_id, entry) in combined_entries {
            let &base_idx = star_isv
                .index_by_key
                .get(&entry.combined_with)
                .ok_or_else(|| ConfigError::UnknownStarId(entry.combined_with.clone()))?;
            let course_idx = stars[base_idx].course_idx;
            if courses[course_idx].id == CASTLE_COURSE_ID {
                return Err(ConfigError::CombinedStarOnCastleStar {
                    combined_id: combined_id.clone(),
                    base_id: entry.combined_with.clone(),
                });
            }
            let expected_id = format!("{}_100", courses[course_idx].id);
            if *combined_id != expected_id {
                return Err(ConfigError::CombinedStarIdMismatch {
                    combined_id: combined_id.clone(),
                    base_id: entry.combined_with.clone(),
                    expected_id,
                });
            }
            validate_times(combined_id, &entry.times)?;

            let star_idx = star_isv.add(combined_id);
            let base_name = stars[base_idx].name.clone();
            let base_location = stars[base_idx].location;
            let base_gate = stars[base_idx].num_stars_required;
            stars.push(Star {
                id: combined_id.clone(),
                name: format!("{base_name} + 100 Coins Star"),
                number: COMBINED_STAR_NUMBER,
                course_idx,
                location: base_location,
                num_stars_required: base_gate,
                times: entry.times.clone(),
                average_time: average_time(&entry.times),
                alt_star_idx: None,
                base_star_idx: Some(base_idx),
                excluded: false,
            });
            stars[base_idx].alt_star_idx = Some(star_idx);
            courses[course_idx].star_idxs.push(star_idx);
        }

        // Prerequisite edges, both directions.
        let num_stars = stars.len();
        let mut requirements: Vec<Vec<StarIdx>> = vec![Vec::new(); num_stars];
        let mut dependants: Vec<Vec<StarIdx>> = vec![Vec::new(); num_stars];
        for (dependant_id, requirement_ids) in &config.prerequisites {
            let &dependant_idx = star_isv
                .index_by_key
                .get(dependant_id)
                .ok_or_else(|| ConfigError::UnknownStarId(dependant_id.clone()))?;
            if stars[dependant_idx].is_combined() {
                return Err(ConfigError::CombinedStarInPrerequisites(
                    dependant_id.clone(),
                ));
            }
            if dependant_id == MANDATORY_STAR_ID && !requirement_ids.is_empty() {
                return Err(ConfigError::MandatoryStarHasPrerequisites(
                    dependant_id.clone(),
                ));
            }
            for requirement_id in requirement_ids {
                let &requirement_idx = star_isv
                    .index_by_key
                    .get(requirement_id)
                    .ok_or_else(|| ConfigError::UnknownStarId(requirement_id.clone()))?;
                if stars[requirement_idx].is_combined() {
                    return Err(ConfigError::CombinedStarInPrerequisites(
                        requirement_id.clone(),
                    ));
                }
                requirements[dependant_idx].push(requirement_idx);
                dependants[requirement_idx].push(dependant_idx);
            }
        }
        for list in &mut dependants {
            list.sort_unstable();
        }

        // Command-line exclusions prune candidates before any analysis.
        for course_id in excluded_course_ids {
            let &course_idx = course_isv
                .index_by_key
                .get(course_id)
                .ok_or_else(|| ConfigError::UnknownCourseId(course_id.clone()))?;
            for &star_idx in &courses[course_idx].star_idxs {
                stars[star_idx].excluded = true;
            }
        }
        for star_id in excluded_star_ids {
            let &star_idx = star_isv
                .index_by_key
                .get(star_id)
                .ok_or_else(|| ConfigError::UnknownStarId(star_id.clone()))?;
            stars[star_idx].excluded = true;
        }

        // The mandatory star (or its 100 coin alternative) must still be a
        // candidate, otherwise no route can exist and we fail before any
        // search starts.
        let mandatory_star_idx = star_isv.index_by_key[MANDATORY_STAR_ID];
        let alt_idx = stars[mandatory_star_idx].alt_star_idx;
        let mandatory_usable = stars[mandatory_star_idx].is_candidate()
            || alt_idx.is_some_and(|idx| stars[idx].is_candidate());
        if !mandatory_usable {
            let has_times = stars[mandatory_star_idx].average_time.is_some()
                || alt_idx.is_some_and(|idx| stars[idx].average_time.is_some());
            return Err(if has_times {
                ConfigError::MandatoryStarExcluded(MANDATORY_STAR_ID.to_string())
            } else {
                ConfigError::MandatoryStarMissingTimes(MANDATORY_STAR_ID.to_string())
            });
        }

        let catalog = Catalog {
            star_isv,
            stars,
            course_isv,
            courses,
            requirements,
            dependants,
            mandatory_star_idx,
        };
        info!(
            "Catalog: {} stars across {} courses, {} candidates",
            catalog.stars.len(),
            catalog.courses.len(),
            catalog.num_candidates()
        );
        Ok(catalog)
    }

    pub fn num_candidates(&self) -> usize {
        self.stars.iter().filter(|s| s.is_candidate()).count()
    }
}

fn average_time(times: &[Seconds]) -> Option<Seconds> {
    if times.is_empty() {
        None
    } else {
        Some(times.iter().sum::<Seconds>() / times.len() as Seconds)
    }
}

fn validate_times(star_id: &str, times: &[Seconds]) -> Result<(), ConfigError> {
    for &time in times {
        if !time.is_finite() || time < 0.0 {
            return Err(ConfigError::InvalidTimeSample {
                star_id: star_id.to_string(),
                time,
            });
        }
    }
    Ok(())
}
