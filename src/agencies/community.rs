use crate::agencies::*;

const MAIN_URL: &str = concatcp!(
    "https://www.communitytransit.org/maps-and-schedules/",
    "maps-and-schedules-by-route"
);
const LINK_BASE: &str = "https://www.communitytransit.org/route/";
const LINK_OPTIONS: [&str; 3] = ["", "/table", "/0/table"];

pub fn initial_requests() -> Vec<Resource> {
    vec![Resource::get(MAIN_URL)]
}

pub fn update(roster: &mut Roster, resources: &ResourceMap) -> Result<()> {
    let html = match resource_text(resources, &Resource::get(MAIN_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    let route_pattern =
        regex!(r#""route_id":"(\d{3})","route_name":"([^"]*) \| ([^"]*)","route_short_name""#);
    for captures in route_pattern.captures_iter(html) {
        let listing = match roster.claim(&captures[1]) {
            Some(listing) => listing,
            None => continue,
        };
        listing.start = captures[2].to_string();
        listing.dest = captures[3].to_string();
        let number = &captures[1];
        listing.set_links(LINK_OPTIONS.map(|option| format!("{}{}{}", LINK_BASE, number, option)));
    }
    Ok(())
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    let mut series = match number.parse::<i64>() {
        Ok(numeric) => numeric / 100,
        Err(_) => return None,
    };
    if series == 5 {
        // The 500s are shown by Sound Transit and Community Transit both,
        // but belong to Sound Transit.
        return None;
    }
    if series == 4 {
        series = 9;
    }
    Some(RouteListing::new(
        Agency::Community,
        number,
        &series.to_string(),
    ))
}

pub fn display_number(listing: &RouteListing) -> String {
    if listing.css_class == "7" {
        return format!("<p class=\"community-swift\">Swift</p>{}", listing.number);
    }
    listing.number.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN_HTML: &str = concat!(
        r#""route_id":"112","route_name":"Ash Way P&R | Mountlake Terrace","route_short_name""#,
        r#""route_id":"701","route_name":"Everett Station | Aurora Village","route_short_name""#,
        r#""route_id":"512","route_name":"Everett | Seattle","route_short_name""#,
    );

    #[test]
    fn test_update() -> Result<()> {
        let mut resources = ResourceMap::new();
        resources.insert(Resource::get(MAIN_URL), Some(MAIN_HTML.to_string()));
        let mut roster = Roster::new(Agency::Community);
        update(&mut roster, &resources)?;
        assert_eq!(roster.listings.len(), 2);
        assert!(!roster.listings.contains_key("512"));

        let local = &roster.listings["112"];
        assert_eq!(local.start, "Ash Way P&R");
        assert_eq!(local.dest, "Mountlake Terrace");
        assert_eq!(local.css_class, "1");
        assert_eq!(
            local.links[1].as_deref(),
            Some("https://www.communitytransit.org/route/112/table")
        );

        let swift = &roster.listings["701"];
        assert_eq!(swift.css_class, "7");
        assert_eq!(
            display_number(swift),
            "<p class=\"community-swift\">Swift</p>701"
        );
        Ok(())
    }

    #[test]
    fn test_new_listing_series() {
        assert_eq!(new_listing("112").unwrap().css_class, "1");
        assert_eq!(new_listing("424").unwrap().css_class, "9");
        assert!(new_listing("512").is_none());
        assert!(new_listing("Swift").is_none());
    }
}
