use crate::agencies::*;

const MAIN_URL: &str = "https://lewiscountytransit.org/bus-routes/";

pub fn initial_requests() -> Vec<Resource> {
    vec![Resource::get(MAIN_URL)]
}

pub fn update(roster: &mut Roster, resources: &ResourceMap) -> Result<()> {
    let html = match resource_text(resources, &Resource::get(MAIN_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    let route_pattern = regex!(
        r#"--route-color:(#\w+)"><summary>([\w ]+) - <span class="route_description">(?:[\w ]+ - )?([\w ]+?)(?: Route)?<"#
    );
    for captures in route_pattern.captures_iter(html) {
        let listing = match roster.claim(&captures[2]) {
            Some(listing) => listing,
            None => continue,
        };
        // The markup capitalizes the start stops inconsistently.
        listing.start = "Mellen Street e-Transit Station".to_string();
        if listing.number == "Brown East" {
            listing.start = "Morton e-Transit Station".to_string();
        }
        listing.dest = captures[3].to_string();
        listing.color = Some(captures[1].to_string());
        listing.set_link(MAIN_URL);
    }
    Ok(())
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    // Weekend entries restate existing routes rather than adding ones.
    if number.contains("Weekend") {
        return None;
    }
    Some(RouteListing::new(Agency::Lewis, number, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN_HTML: &str = concat!(
        "<details style=\"--route-color:#8a2432\"><summary>Red - <span ",
        "class=\"route_description\">Centralia - Chehalis Route</span></summary>",
        "<details style=\"--route-color:#5c3b6f\"><summary>Brown East - <span ",
        "class=\"route_description\">Packwood Route</span></summary>",
        "<details style=\"--route-color:#8a2432\"><summary>Red Weekend - <span ",
        "class=\"route_description\">Centralia - Chehalis Route</span></summary>",
    );

    #[test]
    fn test_update() -> Result<()> {
        let mut resources = ResourceMap::new();
        resources.insert(Resource::get(MAIN_URL), Some(MAIN_HTML.to_string()));
        let mut roster = Roster::new(Agency::Lewis);
        update(&mut roster, &resources)?;
        assert_eq!(roster.listings.len(), 2);

        let red = &roster.listings["Red"];
        assert_eq!(red.start, "Mellen Street e-Transit Station");
        assert_eq!(red.dest, "Chehalis");
        assert_eq!(red.color.as_deref(), Some("#8a2432"));
        assert_eq!(
            red.links[0].as_deref(),
            Some("https://lewiscountytransit.org/bus-routes/")
        );

        let brown = &roster.listings["Brown East"];
        assert_eq!(brown.start, "Morton e-Transit Station");
        assert_eq!(brown.dest, "Packwood");
        assert_eq!(brown.color.as_deref(), Some("#5c3b6f"));
        Ok(())
    }

    #[test]
    fn test_new_listing_rejects_weekend_variants() {
        assert!(new_listing("Red Weekend").is_none());
        assert!(new_listing("Red").is_some());
    }
}
