use crate::agencies::*;

// Used only for the schedule links, inadequate for route descriptions.
const MAIN_URL: &str = "https://www.intercitytransit.com/plan-your-trip/routes";

pub fn initial_requests() -> Vec<Resource> {
    vec![Resource::get(MAIN_URL)]
}

pub async fn update(roster: &mut Roster, resources: &ResourceMap, fetcher: &Fetcher) -> Result<()> {
    let html = match resource_text(resources, &Resource::get(MAIN_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    let (descriptions, timetable_requests) = collect_routes(roster, html);
    // Termini only appear on each route's own timetable page.
    let bodies = fetcher.fetch_all(&timetable_requests).await;
    for (resource, body) in timetable_requests.iter().zip(bodies) {
        let number = resource.url().rsplit('/').next().unwrap_or("");
        let listing = match roster.get_mut(number) {
            Some(listing) => listing,
            None => continue,
        };
        if let Some(body) = body {
            parse_termini(listing, &body, descriptions.get(number).map(String::as_str));
        }
    }
    Ok(())
}

/// Claims and links every route in the dropdown, returning the description
/// text per route and the timetable pages still to fetch.
fn collect_routes(roster: &mut Roster, html: &str) -> (HashMap<String, String>, Vec<Resource>) {
    let mut descriptions = HashMap::new();
    let mut timetable_requests = Vec::new();
    for captures in regex!(r#"value="(\w+)">(\w+).*\W ([\w\s/]*)<"#).captures_iter(html) {
        // Route options repeat their number in the dropdown text.
        if captures[1] != captures[2] {
            continue;
        }
        let listing = match roster.claim(&captures[1]) {
            Some(listing) => listing,
            None => continue,
        };
        let link = format!("{}/{}", MAIN_URL, listing.number);
        listing.set_link(&link);
        descriptions.insert(listing.number.clone(), captures[3].to_string());
        timetable_requests.push(Resource::get(&link));
    }
    (descriptions, timetable_requests)
}

fn parse_termini(listing: &mut RouteListing, body: &str, description: Option<&str>) {
    let terms_pattern = regex!(
        r#"Outbound Stops[\s\w/<>]*?<tbody>\s*<tr class="timepoint">\s*<th>\s*(.*?)(?: \[\wb\])?\n[\w\W]*<tr class="timepoint">\s*<th>\s*(.*?)(?: \[\wb\])?\n[\w\W]*</table>"#
    );
    let captures = match terms_pattern.captures(body) {
        Some(captures) => captures,
        None => return,
    };
    listing.start = captures[1].to_string();
    listing.dest = captures[2].to_string();
    // Routes out of downtown describe their far end better themselves.
    if listing.start == "Olympia Transit Center" {
        if let Some(description) = description {
            if !description.contains('/') {
                listing.dest = description.to_string();
            }
        }
    }
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    Some(RouteListing::new(Agency::Intercity, number, ""))
}

pub fn display_number(listing: &RouteListing) -> String {
    if listing.number == "ONE" {
        return r#"<div class="intercity-green"><p id="intercity-one">1</p>one</div>"#.to_string();
    }
    listing.number.clone()
}
