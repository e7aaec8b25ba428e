use serde::{Deserialize, Serialize};
use starroute_game::StarCount;

/// Run-level knobs validated upstream of the search: exclusions prune the
/// catalog before dependency analysis, the cap bounds how many upstairs
/// and tippy stars a route may contain.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OptimizerSettings {
    #[serde(default)]
    pub excluded_course_ids: Vec<String>,
    #[serde(default)]
    pub excluded_star_ids: Vec<String>,
    pub max_upper_level_stars: Option<StarCount>,
}
