use crate::agencies::*;

const MAIN_URL: &str = "https://pacifictransit.org/route-schedule/";

pub fn initial_requests() -> Vec<Resource> {
    vec![Resource::get(MAIN_URL)]
}

pub fn update(roster: &mut Roster, resources: &ResourceMap) -> Result<()> {
    let html = match resource_text(resources, &Resource::get(MAIN_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    let route_pattern =
        regex!(r#"--route-color:(#\w+)"><summary>(\w+) - ([\w ]+)[\w /]+?([\w ]+) - "#);
    for captures in route_pattern.captures_iter(html) {
        // The page holds two copies of every route, so properties simply get
        // assigned twice.
        let listing = match roster.claim(&captures[2]) {
            Some(listing) => listing,
            None => continue,
        };
        listing.start = captures[3].to_string();
        listing.dest = captures[4].to_string();
        listing.color = Some(captures[1].to_string());
        listing.set_link(&format!("https://pacifictransit.org/{}-line/", listing.number));
    }
    Ok(())
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    Some(RouteListing::new(Agency::Pacific, number, ""))
}
