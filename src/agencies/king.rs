use crate::agencies::*;

const MAIN_URL: &str = concatcp!(
    "https://cdn.kingcounty.gov/-/media/king-county/depts/metro/",
    "fe-apps/schedule/08302025/js/find-a-schedule-js.js"
);
const TROLLEY_URL: &str = "https://metro.kingcounty.gov/up/rr/m-trolley.html";
const LINK_BASE: &str = "https://kingcounty.gov";
// The only agency whose listing order reliably matches route direction.
const LINK_OPTIONS: [&str; 3] = ["route-map", "weekday", "weekday-b"];

pub fn initial_requests() -> Vec<Resource> {
    vec![Resource::get(MAIN_URL), Resource::get(TROLLEY_URL)]
}

pub fn update(roster: &mut Roster, resources: &ResourceMap) -> Result<()> {
    let main_js = match resource_text(resources, &Resource::get(MAIN_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    // Missing trolley data only loses the visible trolley colors.
    let trolley_html = resource_text(resources, &Resource::get(TROLLEY_URL)).unwrap_or("");
    let route_pattern = regex!(
        r#"<option value="([^"]+)">(DART +)?([A-Z\d]+?)(?: Line| Shuttle)? - (.*?)</option>"#
    );
    for captures in route_pattern.captures_iter(main_js) {
        let number = match captures.get(2) {
            Some(dart) => format!("{}{}", dart.as_str().trim_end(), &captures[3]),
            None => captures[3].to_string(),
        };
        let listing = match roster.claim(&number) {
            Some(listing) => listing,
            None => continue,
        };
        parse_termini(listing, &captures[4]);
        let piece = &captures[1];
        listing.set_links(LINK_OPTIONS.map(|option| format!("{}{}#{}", LINK_BASE, piece, option)));
        if trolley_html.contains(&format!("Route {}", listing.number)) {
            listing.css_class = "trolley".to_string();
        }
    }
    Ok(())
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    // King County Metro has many edge cases, and not even all of them are here.
    if let Ok(numeric) = number.parse::<i64>() {
        let mut css_class = (numeric / 100).to_string();
        if (90..100).contains(&numeric) {
            css_class = "special".to_string();
        }
        if numeric >= 800 {
            css_class = "schools".to_string();
        }
        return Some(RouteListing::new(Agency::King, number, &css_class));
    }
    if number.starts_with("DART") {
        // 775 must keep the DART palette, so 7 is used for DART buses.
        return Some(RouteListing::new(Agency::King, number, "7"));
    }
    if let Some(rest) = number.strip_prefix('X') {
        let mut listing = RouteListing::new(Agency::King, rest, "nonbus");
        listing.existence = Existence::Active;
        return Some(listing);
    }
    Some(RouteListing::new(Agency::King, number, "rapidride"))
}

pub fn position(number: &str) -> Position {
    match number.strip_prefix("DART") {
        Some(rest) => Position::from_number(rest),
        None => Position::from_number(number),
    }
}

pub fn display_number(listing: &RouteListing) -> String {
    match listing.number.strip_prefix("DART") {
        Some(rest) => format!("<p class=\"king-dart\">DART</p>{}", rest),
        None => listing.number.clone(),
    }
}

/// Termini need more than a regex group here; the description is either a
/// service sentence or a comma-separated path.
fn parse_termini(listing: &mut RouteListing, description: &str) {
    if let Some(captures) = regex!(r"^Service between (.*) and (?:the | )(.*)").captures(description)
    {
        listing.start = captures[1].to_string();
        listing.dest = captures[2].to_string();
        return;
    }
    let mut points: Vec<&str> = description.split(',').collect();
    while points.len() > 1 && (points[0].starts_with("Serves") || points[0].contains("School")) {
        points.remove(0);
    }
    listing.start = points[0].trim().to_string();
    listing.dest = points[points.len() - 1].trim().to_string();
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN_JS: &str = concat!(
        r#"<option value="/metro/routes/010">10 - Capitol Hill, Downtown Seattle</option>"#,
        r#"<option value="/metro/routes/775">DART 775 - Serves Bothell, Woodinville</option>"#,
        r#"<option value="/metro/routes/a">A Line - Service between Tukwila and the Federal Way</option>"#,
        r#"<option value="/metro/routes/893">893 Shuttle - Kentlake High School, Kent</option>"#,
    );

    fn updated_roster() -> Result<Roster> {
        let mut resources = ResourceMap::new();
        resources.insert(Resource::get(MAIN_URL), Some(MAIN_JS.to_string()));
        resources.insert(
            Resource::get(TROLLEY_URL),
            Some("<li>Route 10</li>".to_string()),
        );
        let mut roster = Roster::new(Agency::King);
        update(&mut roster, &resources)?;
        Ok(roster)
    }

    #[test]
    fn test_update() -> Result<()> {
        let roster = updated_roster()?;
        assert_eq!(roster.listings.len(), 4);

        let local = &roster.listings["10"];
        assert_eq!(local.start, "Capitol Hill");
        assert_eq!(local.dest, "Downtown Seattle");
        assert_eq!(local.css_class, "trolley");
        assert_eq!(
            local.links[0].as_deref(),
            Some("https://kingcounty.gov/metro/routes/010#route-map")
        );
        assert_eq!(
            local.links[2].as_deref(),
            Some("https://kingcounty.gov/metro/routes/010#weekday-b")
        );

        let dart = &roster.listings["DART775"];
        assert_eq!(dart.css_class, "7");
        assert_eq!(dart.start, "Woodinville");

        let rapidride = &roster.listings["A"];
        assert_eq!(rapidride.start, "Tukwila");
        assert_eq!(rapidride.dest, "Federal Way");
        assert_eq!(rapidride.css_class, "rapidride");

        let school = &roster.listings["893"];
        assert_eq!(school.css_class, "schools");
        Ok(())
    }

    #[test]
    fn test_update_is_idempotent() -> Result<()> {
        let mut resources = ResourceMap::new();
        resources.insert(Resource::get(MAIN_URL), Some(MAIN_JS.to_string()));
        resources.insert(Resource::get(TROLLEY_URL), None);
        let mut roster = Roster::new(Agency::King);
        update(&mut roster, &resources)?;
        let first = roster.listings.clone();
        update(&mut roster, &resources)?;
        assert_eq!(roster.listings, first);
        Ok(())
    }

    #[test]
    fn test_update_without_resources() -> Result<()> {
        let mut resources = ResourceMap::new();
        resources.insert(Resource::get(MAIN_URL), None);
        resources.insert(Resource::get(TROLLEY_URL), None);
        let mut roster = Roster::new(Agency::King);
        update(&mut roster, &resources)?;
        assert!(roster.listings.is_empty());
        Ok(())
    }

    #[test]
    fn test_new_listing_classes() {
        assert_eq!(new_listing("10").unwrap().css_class, "0");
        assert_eq!(new_listing("245").unwrap().css_class, "2");
        assert_eq!(new_listing("90").unwrap().css_class, "special");
        assert_eq!(new_listing("893").unwrap().css_class, "schools");
        assert_eq!(new_listing("DART775").unwrap().css_class, "7");
        assert_eq!(new_listing("E").unwrap().css_class, "rapidride");
    }

    #[test]
    fn test_new_listing_nonbus() {
        let listing = new_listing("X90").unwrap();
        assert_eq!(listing.number, "90");
        assert_eq!(listing.css_class, "nonbus");
        assert_eq!(listing.existence, Existence::Active);
    }

    #[test]
    fn test_position() {
        assert_eq!(position("DART775"), position("775"));
        assert!(position("A") < position("10"));
    }

    #[test]
    fn test_display_number() {
        let dart = RouteListing::new(Agency::King, "DART775", "7");
        assert_eq!(display_number(&dart), "<p class=\"king-dart\">DART</p>775");
        let plain = RouteListing::new(Agency::King, "10", "0");
        assert_eq!(display_number(&plain), "10");
    }
}
