use crate::{Location, StarCount, CASTLE_COURSE_ID};

pub struct CourseData {
    pub id: String,
    pub name: String,
    pub number: usize,
    pub stars: Vec<StarData>,
}

pub struct StarData {
    pub id: String,
    pub name: String,
    pub number: usize,
    pub location: Location,
    pub num_stars_required: StarCount,
}

fn course(
    id: &str,
    name: &str,
    number: usize,
    location: Location,
    num_stars_required: StarCount,
    star_names: [&str; 6],
) -> CourseData {
    let stars = star_names
        .iter()
        .enumerate()
        .map(|(i, &star_name)| StarData {
            id: format!("{}{}", id, i + 1),
            name: star_name.to_string(),
            number: i + 1,
            location,
            num_stars_required,
        })
        .collect();
    CourseData {
        id: id.to_string(),
        name: name.to_string(),
        number,
        stars,
    }
}

fn castle_star(
    id: &str,
    name: &str,
    number: usize,
    location: Location,
    num_stars_required: StarCount,
) -> StarData {
    StarData {
        id: id.to_string(),
        name: name.to_string(),
        number,
        location,
        num_stars_required,
    }
}

/// The fixed course table: the 15 main courses plus the castle
/// pseudo-course holding the secret stars. Star ids follow the
/// `<COURSE><number>` convention; 100 coin stars are not listed here,
/// they are instantiated from the user config.
pub fn course_table() -> Vec<CourseData> {
    vec![
        course("BOB", "Bob-omb Battlefield", 1, Location::Lobby, 0, [
            "Big Bob-omb on the Summit",
            "Footrace with Koopa the Quick",
            "Shoot to the Island in the Sky",
            "Find the 8 Red Coins",
            "Mario Wings to the Sky",
            "Behind Chain Chomp's Gate",
        ]),
        course("WF", "Whomp's Fortress", 2, Location::Lobby, 1, [
            "Chip off Whomp's Block",
            "To the Top of the Fortress",
            "Shoot into the Wild Blue",
            "Red Coins on the Floating Isle",
            "Fall onto the Caged Island",
            "Blast Away the Wall",
        ]),
        course("JRB", "Jolly Roger Bay", 3, Location::Lobby, 3, [
            "Plunder in the Sunken Ship",
            "Can the Eel Come Out to Play?",
            "Treasure of the Ocean Cave",
            "Red Coins on the Ship Afloat",
            "Blast to the Stone Pillar",
            "Through the Jet Stream",
        ]),
        course("CCM", "Cool, Cool Mountain", 4, Location::Lobby, 3, [
            "Slip Slidin' Away",
            "Li'l Penguin Lost",
            "Big Penguin Race",
            "Frosty Slide for 8 Red Coins",
            "Snowman's Lost His Head",
            "Wall Kicks Will Work",
        ]),
        course("BBH", "Big Boo's Haunt", 5, Location::Courtyard, 12, [
            "Go on a Ghost Hunt",
            "Ride Big Boo's Merry-Go-Round",
            "Secret of the Haunted Books",
            "Seek the 8 Red Coins",
            "Big Boo's Balcony",
            "Eye to Eye in the Secret Room",
        ]),
        course("HMC", "Hazy Maze Cave", 6, Location::Basement, 0, [
            "Swimming Beast in the Cavern",
            "Elevate for 8 Red Coins",
            "Metal-Head Mario Can Move!",
            "Navigating the Toxic Maze",
            "A-Maze-Ing Emergency Exit",
            "Watch for Rolling Rocks",
        ]),
        course("LLL", "Lethal Lava Land", 7, Location::Basement, 0, [
            "Boil the Big Bully",
            "Bully the Bullies",
            "8-Coin Puzzle with 15 Pieces",
            "Red-Hot Log Rolling",
            "Hot-Foot-It into the Volcano",
            "Elevator Tour in the Volcano",
        ]),
        course("SSL", "Shifting Sand Land", 8, Location::Basement, 0, [
            "In the Talons of the Big Bird",
            "Shining Atop the Pyramid",
            "Inside the Ancient Pyramid",
            "Stand Tall on the Four Pillars",
            "Free Flying for 8 Red Coins",
            "Pyramid Puzzle",
        ]),
        course("DDD", "Dire, Dire Docks", 9, Location::Basement, 0, [
            "Board Bowser's Sub",
            "Chests in the Current",
            "Pole-Jumping for Red Coins",
            "Through the Jet Stream",
            "The Manta Ray's Reward",
            "Collect the Caps...",
        ]),
        course("SL", "Snowman's Land", 10, Location::Upstairs, 30, [
            "Snowman's Big Head",
            "Chill with the Bully",
            "In the Deep Freeze",
            "Whirl from the Freezing Pond",
            "Shell Shreddin' for Red Coins",
            "Into the Igloo",
        ]),
        course("WDW", "Wet-Dry World", 11, Location::Upstairs, 30, [
            "Shocking Arrow Lifts!",
            "Top o' the Town",
            "Secrets in the Shallows & Sky",
            "Express Elevator--Hurry Up!",
            "Go to Town for Red Coins",
            "Quick Race Through Downtown!",
        ]),
        course("TTM", "Tall, Tall Mountain", 12, Location::Upstairs, 30, [
            "Scale the Mountain",
            "Mystery of the Monkey Cage",
            "Scary 'Shrooms, Red Coins",
            "Mysterious Mountainside",
            "Breathtaking View from Bridge",
            "Blast to the Lonely Mushroom",
        ]),
        course("THI", "Tiny-Huge Island", 13, Location::Upstairs, 30, [
            "Pluck the Piranha Flower",
            "The Tip Top of the Huge Island",
            "Rematch with Koopa the Quick",
            "Five Itty Bitty Secrets",
            "Wiggler's Red Coins",
            "Make Wiggler Squirm",
        ]),
        course("TTC", "Tick Tock Clock", 14, Location::Tippy, 50, [
            "Roll into the Cage",
            "The Pit and the Pendulums",
            "Get a Hand",
            "Stomp on the Thwomp",
            "Timed Jumps on Moving Bars",
            "Stop Time for Red Coins",
        ]),
        course("RR", "Rainbow Ride", 15, Location::Tippy, 50, [
            "Cruiser Crossing the Rainbow",
            "The Big House in the Sky",
            "Coins Amassed in a Maze",
            "Swingin' in the Breeze",
            "Tricky Triangles!",
            "Somewhere over the Rainbow",
        ]),
        CourseData {
            id: CASTLE_COURSE_ID.to_string(),
            name: "Peach's Castle".to_string(),
            number: 16,
            stars: vec![
                castle_star("PSS1", "The Princess's Secret Slide", 1, Location::Lobby, 1),
                castle_star("PSS2", "The Princess's Secret Slide (Under 21\")", 2, Location::Lobby, 1),
                castle_star("SA", "The Secret Aquarium", 3, Location::Lobby, 3),
                castle_star("TOTWC", "Tower of the Wing Cap", 4, Location::Lobby, 10),
                castle_star("COTMC", "Cavern of the Metal Cap", 5, Location::Basement, 0),
                castle_star("VCUTM", "Vanish Cap Under the Moat", 6, Location::Basement, 0),
                castle_star("WMOTR", "Wing Mario over the Rainbow", 7, Location::Tippy, 50),
                castle_star("BITDW", "Bowser in the Dark World Red Coins", 8, Location::Lobby, 8),
                castle_star("BITFS", "Bowser in the Fire Sea Red Coins", 9, Location::Basement, 30),
                castle_star("BITS", "Bowser in the Sky Red Coins", 10, Location::Tippy, 70),
                castle_star("MIPS1", "MIPS the Rabbit", 11, Location::CastleSecret, 15),
                castle_star("MIPS2", "MIPS the Rabbit II", 12, Location::CastleSecret, 50),
                castle_star("TOAD1", "Toad's Gift (Hazy Maze Cave)", 13, Location::CastleSecret, 12),
                castle_star("TOAD2", "Toad's Gift (Tall, Tall Mountain)", 14, Location::CastleSecret, 25),
                castle_star("TOAD3", "Toad's Gift (Tick Tock Clock)", 15, Location::CastleSecret, 35),
            ],
        },
    ]
}
