use crate::agencies::*;

const MAIN_URL: &str = "https://schedules.ridewta.com/data/wta-static-gtfs/routes.txt";
// The schedule page always takes a moment to load, at least on some browsers.
const LINK_BASE: &str = "https://schedules.ridewta.com/#route-details?routeNum=";

pub fn initial_requests() -> Vec<Resource> {
    vec![Resource::get(MAIN_URL)]
}

pub fn update(roster: &mut Roster, resources: &ResourceMap) -> Result<()> {
    let gtfs = match resource_text(resources, &Resource::get(MAIN_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    for captures in regex!(r"\n(.*?)(?:,\w*?){3}(?:([^,]+)&)?([^,]+)").captures_iter(gtfs) {
        let listing = match roster.claim(&captures[1]) {
            Some(listing) => listing,
            None => continue,
        };
        match captures.get(2) {
            Some(start) => {
                listing.start = start.as_str().to_string();
                listing.dest = captures[3].to_string();
            }
            None => {
                let termini: Vec<&str> = captures[3].split('/').collect();
                if let [start, dest] = termini[..] {
                    listing.start = start.to_string();
                    listing.dest = dest.to_string();
                } else {
                    // Only one terminus is the best we can do for some.
                    listing.start = captures[3].to_string();
                }
            }
        }
        listing.set_link(&format!("{}{}", LINK_BASE, listing.number));
    }
    Ok(())
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    // Shown by Sound Transit and Whatcom both, but belongs to Sound Transit.
    if number == "80X" {
        return None;
    }
    Some(RouteListing::new(Agency::Whatcom, number, ""))
}
