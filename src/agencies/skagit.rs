use crate::agencies::*;

const SITE_URL: &str = "https://www.skagittransit.org";
// Used only for the schedule links, inadequate for route descriptions.
const MAIN_URL: &str = concatcp!(SITE_URL, "/routes/");
const LINK_OPTIONS: [&str; 3] = [
    "#maincontent",
    "#CT_PageHeading_0_hschedule",
    "#CT_PageHeading_0_hschedule",
];

pub fn initial_requests() -> Vec<Resource> {
    vec![Resource::get(MAIN_URL)]
}

// The site's formatting is inconsistent from route to route, so anything the
// listing page does not give away has to come from the route's own page.
pub async fn update(roster: &mut Roster, resources: &ResourceMap, fetcher: &Fetcher) -> Result<()> {
    let html = match resource_text(resources, &Resource::get(MAIN_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    let timetable_requests = collect_routes(roster, html);
    for body in fetcher
        .fetch_all(&timetable_requests)
        .await
        .into_iter()
        .flatten()
    {
        apply_timetable(roster, &body);
    }
    Ok(())
}

/// Claims and links every listed route, picking termini off the listing page
/// where possible and returning the route pages still to fetch.
fn collect_routes(roster: &mut Roster, html: &str) -> Vec<Resource> {
    let route_pattern = regex!(
        r#"<a href="[^"]*?(/[^/]+/)"[^>]*>(\d+X?)[ \W]*((?:\s?[A-Z][a-z]+\.?(?: -)?)+)(?:\s?(?:to|[\w\s./]+?)\s?([\w\s.]*))?<"#
    );
    let mut timetable_requests = Vec::new();
    for captures in route_pattern.captures_iter(html) {
        let listing = match roster.claim(&captures[2]) {
            Some(listing) => listing,
            None => continue,
        };
        let piece = &captures[1];
        listing.set_links(LINK_OPTIONS.map(|option| format!("{}{}{}", SITE_URL, piece, option)));
        match captures.get(4) {
            Some(dest) if !dest.as_str().is_empty() => {
                listing.start = captures[3].to_string();
                listing.dest = dest.as_str().to_string();
            }
            _ if captures[3].ends_with("Connector") => {
                let words: Vec<&str> = captures[3].split_whitespace().collect();
                if let [start, dest, _] = words[..] {
                    listing.start = start.to_string();
                    listing.dest = dest.to_string();
                } else {
                    warn!("Unexpected Skagit Transit connector name: {:?}", &captures[3]);
                }
            }
            _ => timetable_requests.push(Resource::get(&format!("{}{}", SITE_URL, piece))),
        }
    }
    timetable_requests
}

fn apply_timetable(roster: &mut Roster, body: &str) {
    let terms_pattern = regex!(
        r"<h1>Route (\d+X?).*?</h1>\s*<h2>(?:Route \d+X? )?([\w&\s]+?)(?:\s?/[/\w&\s]*?\s?([\w&\s]+?))?(?:<|\svia)"
    );
    let captures = match terms_pattern.captures(body) {
        Some(captures) => captures,
        None => return,
    };
    let listing = match roster.get_mut(&captures[1]) {
        Some(listing) => listing,
        None => {
            warn!("Skagit Transit page for unlisted route {}", &captures[1]);
            return;
        }
    };
    listing.start = captures[2].to_string();
    if let Some(dest) = captures.get(3) {
        listing.dest = dest.as_str().to_string();
    }
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    let css_class = if number.ends_with('X') { "X" } else { "" };
    Some(RouteListing::new(Agency::Skagit, number, css_class))
}
