use crate::agencies::*;

const MAIN_URL: &str = "https://piercetransit.org/pierce-transit-routes/";

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
    // Pierce Transit's lineAbbr values do not match its route numbers, but the
    // signages all open with the number riders know.
    let mut signages: HashMap<String, Vec<String>> = HashMap::new();
    for line in trip_planner_lines(planner_json, "PT")? {
        let directions = line.signages();
        let number = match directions.first().and_then(|first| first.split(' ').next()) {
            Some(number) => number.to_string(),
            None => continue,
        };
        signages.insert(number, directions);
    }
    for captures in regex!(r#"<a href="([^"]+)">(?:Route )?(Stream|\d+) ([^<]*)</a></div>"#)
        .captures_iter(html)
    {
        let listing = match roster.claim(&captures[2]) {
            Some(listing) => listing,
            None => continue,
        };
        match signages.remove(&listing.number) {
            Some(directions) => set_signage_termini(listing, &directions),
            // The trolley is not in the trip planner; its page title will do.
            None => listing.start = captures[3].to_string(),
        }
        listing.set_link(&captures[1]);
    }
    Ok(())
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    let css_class = if number == "101" { "special" } else { "" };
    Some(RouteListing::new(Agency::Pierce, number, css_class))
}

pub fn display_number(listing: &RouteListing) -> String {
    if listing.number.parse::<i64>().is_ok() {
        listing.number.clone()
    } else {
        format!("<p class=\"smallnum\">{}</p>", listing.number)
    }
}
