use crate::agencies::*;

const MAIN_URL: &str = "https://www.ghtransit.com/routes";
// Covers 20P and the HarborFLEX routes the main page leaves out, but is a
// poor source for termini on its own.
const SECONDARY_URL: &str = "https://www.ghtransit.com/Bus-Schedules-Maps";

pub fn initial_requests() -> Vec<Resource> {
    vec![Resource::get(MAIN_URL), Resource::get(SECONDARY_URL)]
}

pub fn update(roster: &mut Roster, resources: &ResourceMap) -> Result<()> {
    let main_html = match resource_text(resources, &Resource::get(MAIN_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    let secondary_html = match resource_text(resources, &Resource::get(SECONDARY_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    let secondary_pattern = regex!(
        r#">(\w+)(?:</[a-z]+>)+\s+.*?>([^<]+?)(?:(?:</[a-z]+>)+| Dial)[\w\W]+?(https:[^"]*)"#
    );
    for captures in secondary_pattern.captures_iter(secondary_html) {
        let listing = match roster.claim(&captures[1]) {
            Some(listing) => listing,
            None => continue,
        };
        listing.start = captures[2].to_string();
        listing.set_link(&captures[3]);
    }
    let route_pattern = regex!(
        r#">(\w+)</span></h2>\s+</div>\s+</div>\s+.*?>(?:\w+(?: & | / ))?(\w[\w ]*)<(?:/s|br)[\w\W]*?(https[^"]*)"#
    );
    for captures in route_pattern.captures_iter(main_html) {
        let listing = match roster.get_mut(&captures[1]) {
            Some(listing) => listing,
            None => {
                warn!(
                    "Grays Harbor Transit route {} missing from the schedules page",
                    &captures[1]
                );
                continue;
            }
        };
        // The main page never states the inbound end.
        listing.start = "Aberdeen".to_string();
        if listing.number == "45" {
            listing.start = "Elma".to_string();
        }
        listing.dest = captures[2].to_string();
        if regex!(r"^The [A-Z]+$").is_match(&listing.dest) {
            // The circulators loop through one town instead of running
            // between two.
            listing.dest = String::new();
            match regex!(r">(\w+) circulator service").captures(&captures[0]) {
                Some(circulator) => listing.start = circulator[1].to_string(),
                None => warn!(
                    "No circulator description for Grays Harbor Transit route {}",
                    listing.number
                ),
            }
        }
        // The secondary link only covers the weekday schedule when a weekend
        // one also exists; this one is the whole PDF.
        listing.set_link(&captures[3]);
    }
    Ok(())
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    let css_class = if number.len() == 3 && number.parse::<i64>().is_ok() {
        "harborflex"
    } else {
        ""
    };
    Some(RouteListing::new(Agency::Grays, number, css_class))
}
