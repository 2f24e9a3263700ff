use crate::agencies::*;

// This page's formatting is terrible and inconsistent, as the pattern shows,
// but it is seemingly the best resource there is.
const MAIN_URL: &str = "https://www.soundtransit.org/ride-with-us/schedules-maps";
const LINK_BASE: &str = "https://www.soundtransit.org/ride-with-us/routes-schedules/";
const LINK_OPTIONS: [&str; 3] = ["", "?direction=1", "?direction=0"];

pub fn initial_requests() -> Vec<Resource> {
    vec![Resource::get(MAIN_URL)]
}

pub fn update(roster: &mut Roster, resources: &ResourceMap) -> Result<()> {
    let html = match resource_text(resources, &Resource::get(MAIN_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    let route_pattern = regex!(
        r#"<a href="[^"]*?([^"/]+)"[^>]*>(?:Link |Sounder )?(\d+|\w)(?: Line)?.\(([\w /.]+) \W (?:[^)]* ?\W )?([\w /.]+?) ?\)"#
    );
    for captures in route_pattern.captures_iter(html) {
        let listing = match roster.claim(&captures[2]) {
            Some(listing) => listing,
            None => continue,
        };
        listing.start = captures[3].to_string();
        listing.dest = captures[4].to_string();
        let piece = &captures[1];
        listing.set_links(LINK_OPTIONS.map(|option| format!("{}{}{}", LINK_BASE, piece, option)));
    }
    Ok(())
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    let css_class = match number.parse::<i64>() {
        Ok(numeric) => (numeric / 100).to_string(),
        // Trains have the 0 palette.
        Err(_) => "0".to_string(),
    };
    Some(RouteListing::new(Agency::Sound, number, &css_class))
}

pub fn display_number(listing: &RouteListing) -> String {
    if listing.number.chars().count() != 1 {
        return listing.number.clone();
    }
    format!(
        "<span class=\"circle\" id=\"sound-c{}\">{}</span>",
        listing.number, listing.number
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN_HTML: &str = concat!(
        r#"<a href="/ride-with-us/routes-schedules/510-everett-seattle" class="x">510 (Everett – Seattle)</a>"#,
        "\n",
        r#"<a href="/ride-with-us/routes-schedules/1-line" aria-label="y">Link 1 Line (Lynnwood City Center – Angle Lake)</a>"#,
    );

    #[test]
    fn test_update() -> Result<()> {
        let mut resources = ResourceMap::new();
        resources.insert(Resource::get(MAIN_URL), Some(MAIN_HTML.to_string()));
        let mut roster = Roster::new(Agency::Sound);
        update(&mut roster, &resources)?;
        assert_eq!(roster.listings.len(), 2);

        let express = &roster.listings["510"];
        assert_eq!(express.start, "Everett");
        assert_eq!(express.dest, "Seattle");
        assert_eq!(express.css_class, "5");
        assert_eq!(
            express.links[1].as_deref(),
            Some("https://www.soundtransit.org/ride-with-us/routes-schedules/510-everett-seattle?direction=1")
        );

        let link = &roster.listings["1"];
        assert_eq!(link.start, "Lynnwood City Center");
        assert_eq!(link.dest, "Angle Lake");
        assert_eq!(link.existence, Existence::Active);
        Ok(())
    }

    #[test]
    fn test_new_listing_classes() {
        assert_eq!(new_listing("550").unwrap().css_class, "5");
        assert_eq!(new_listing("S").unwrap().css_class, "0");
    }

    #[test]
    fn test_display_number() {
        let line = RouteListing::new(Agency::Sound, "1", "0");
        assert_eq!(
            display_number(&line),
            "<span class=\"circle\" id=\"sound-c1\">1</span>"
        );
        let express = RouteListing::new(Agency::Sound, "510", "5");
        assert_eq!(display_number(&express), "510");
    }
}
