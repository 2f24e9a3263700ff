use crate::agencies::*;

const MAIN_URL: &str =
    "https://gtfs-api.trilliumtransit.com/gtfs-api/routes/by-feed/ellensburg-wa-us";

#[derive(Debug, Deserialize)]
struct CentralRoute {
    route_short_name: String,
    route_long_name: String,
    route_url: String,
}

pub fn initial_requests() -> Vec<Resource> {
    vec![Resource::get(MAIN_URL)]
}

pub fn update(roster: &mut Roster, resources: &ResourceMap) -> Result<()> {
    let json = match resource_text(resources, &Resource::get(MAIN_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    let routes: Vec<CentralRoute> =
        serde_json::from_str(json).context("Failed to parse Central Transit routes")?;
    for route in routes {
        let listing = match roster.claim(&route.route_short_name) {
            Some(listing) => listing,
            None => continue,
        };
        match regex!(r"^(.+?)(?: \(\w+\))? to (.+?)(?: \(\w+\))?(?: via .+)?$")
            .captures(&route.route_long_name)
        {
            Some(captures) => {
                listing.start = captures[1].to_string();
                listing.dest = captures[2].to_string();
            }
            None => warn!(
                "Unparseable Central Transit route name: {:?}",
                route.route_long_name
            ),
        }
        listing.set_link(&route.route_url);
    }
    Ok(())
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    Some(RouteListing::new(Agency::Central, number, ""))
}
