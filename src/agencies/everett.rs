use crate::agencies::*;

// Used only for the schedule links, inadequate for route descriptions.
const MAIN_URL: &str = "https://everetttransit.org/101/Schedules";
const LINK_OPTIONS: [&str; 3] = ["1", "2", "2"];

pub fn initial_requests() -> Vec<Resource> {
    vec![Resource::get(MAIN_URL), trip_planner_resource()]
}

pub fn update(roster: &mut Roster, resources: &ResourceMap) -> Result<()> {
    let html = match resource_text(resources, &Resource::get(MAIN_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    let planner_json = match resource_text(resources, &trip_planner_resource()) {
        Some(text) => text,
        None => return Ok(()),
    };
    let mut signages: HashMap<String, Vec<String>> = HashMap::new();
    for line in trip_planner_lines(planner_json, "ET")? {
        let number = line.line_abbr.get(2..).unwrap_or("").to_string();
        signages.insert(number, line.signages());
    }
    for captures in regex!(r#"<a href="([^"]+)".*>Route (\d+)</span></a>"#).captures_iter(html) {
        let listing = match roster.claim(&captures[2]) {
            Some(listing) => listing,
            None => continue,
        };
        match signages.remove(&listing.number) {
            Some(directions) => set_signage_termini(listing, &directions),
            None => warn!("No trip planner line for Everett Transit route {}", listing.number),
        }
        // The trip planner data is wrong here and must be patched.
        if listing.number == "6" {
            listing.start = "Waterfront".to_string();
        }
        let piece = &captures[1];
        listing.set_links(LINK_OPTIONS.map(|option| format!("{}#page={}", piece, option)));
    }
    Ok(())
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    Some(RouteListing::new(Agency::Everett, number, ""))
}
