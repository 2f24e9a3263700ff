use crate::agencies::*;
use crate::tracker::{self, TrackerRoute};
use crate::utils::split_after;

// Badly out of date, but only the 400-series links rely on it.
const CONFIG_URL: &str = "https://kttracker.com/assets/ta/kitsaptransit/config.json";
const WORKER_DRIVER_URL: &str = "https://www.kitsaptransit.com/service/workerdriver-buses/";
const LINK_BASE: &str = "https://www.kitsaptransit.com/service";

#[derive(Debug, Deserialize)]
struct TrackerConfig {
    #[serde(rename = "map.infowindow.routeScheduleMap")]
    route_schedule_map: HashMap<String, String>,
}

pub fn initial_requests() -> Vec<Resource> {
    vec![Resource::get(CONFIG_URL), Resource::get(WORKER_DRIVER_URL)]
}

pub async fn update(roster: &mut Roster, resources: &ResourceMap, fetcher: &Fetcher) -> Result<()> {
    let config_json = match resource_text(resources, &Resource::get(CONFIG_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    let worker_driver = match resource_text(resources, &Resource::get(WORKER_DRIVER_URL)) {
        Some(text) => text,
        None => return Ok(()),
    };
    let tracker_routes = match tracker::fetch_current_routes(fetcher.client()).await {
        Some(routes) => routes,
        None => return Ok(()),
    };
    let config: TrackerConfig =
        serde_json::from_str(config_json).context("Failed to parse tracker config")?;
    // This Worker/Driver route is gone, but its menu entry is not.
    let worker_driver = worker_driver.replace("parkwood-east", "");
    let mut link_map = config.route_schedule_map;
    // Missing from the config; the route number is an educated guess.
    link_map.insert(
        "805".to_string(),
        "/routed-buses/nollwood-dial-a-ride".to_string(),
    );
    apply_tracker_routes(roster, &tracker_routes, &worker_driver);
    apply_link_map(roster, &link_map, &worker_driver);
    Ok(())
}

/// Describes and links every route the realtime tracker currently serves.
fn apply_tracker_routes(roster: &mut Roster, routes: &[TrackerRoute], worker_driver: &str) {
    for route in routes {
        let listing = match roster.claim(&route.rt) {
            Some(listing) => listing,
            None => continue,
        };
        listing.start = route.rtnm.clone();
        if listing.number.starts_with('6') {
            // Worker/Driver runs name a home area and implicitly end at the
            // base, except the one covering both bases.
            listing.start = drop_last_word(&listing.start);
            listing.dest = "Naval Base Kitsap-Bremerton".to_string();
            if listing.start == "SK/Bangor" {
                listing.start = "South Kitsap".to_string();
                listing.dest = "Naval Base Kitsap-Bangor".to_string();
            }
            let slug = listing
                .start
                .replace('/', " ")
                .replace('-', " ")
                .to_lowercase();
            let words: Vec<&str> = slug.split_whitespace().collect();
            let mut link = LINK_BASE.to_string();
            // Menu paths use between one and three words of the area name.
            for take in (1..=3).rev() {
                let needle = format!(
                    "/workerdriver-buses/{}",
                    words[..take.min(words.len())].join("-")
                );
                if let Some(rest) = split_after(worker_driver, &needle) {
                    link = format!("{}{}{}", LINK_BASE, needle, rest.split('"').next().unwrap_or(""));
                    break;
                }
            }
            listing.set_link(&link);
        } else {
            let name = listing.start.clone();
            match regex!(r"^(?:([\w\s]+)(?:[^\s\w]|\sto\s))?([\w\s]+?)(?:\sF\w\w\w\sFerry)?$")
                .captures(&name)
            {
                Some(captures) => match captures.get(1) {
                    Some(area) => {
                        listing.start = area.as_str().to_string();
                        listing.dest = captures[2].to_string();
                    }
                    // Some routes have no stated destination, and checking
                    // their individual pages would be too inconsistent.
                    None => listing.start = captures[2].to_string(),
                },
                None => warn!("Unparseable Kitsap Transit route name: {:?}", name),
            }
            let needle = format!("/routed-buses/{}", listing.number);
            // Routes missing from the menu fall back to the main service page.
            let link = match split_after(worker_driver, &needle) {
                Some(rest) => {
                    format!("{}{}{}", LINK_BASE, needle, rest.split('"').next().unwrap_or(""))
                }
                None => LINK_BASE.to_string(),
            };
            listing.set_link(&link);
        }
    }
}

/// Links the 400-series and up from the tracker config's schedule map, adding
/// listings the tracker does not serve.
fn apply_link_map(roster: &mut Roster, link_map: &HashMap<String, String>, worker_driver: &str) {
    for (number, path) in link_map.iter().sorted() {
        match number.parse::<i64>() {
            // The config predates the current numbering for regular buses.
            Ok(numeric) if numeric < 400 => continue,
            Ok(_) => {}
            Err(_) => continue,
        }
        if roster.get_mut(number).is_none() {
            let mut listing = match Agency::Kitsap.new_listing(number) {
                Some(listing) => listing,
                None => continue,
            };
            listing.existence = Existence::Active;
            // All we had was the number; the menu supplies a description.
            if let Some(rest) = split_after(worker_driver, &format!("{}\">", path)) {
                listing.start = rest.split('<').next().unwrap_or("").to_string();
            }
            roster.insert(listing);
        }
        if let Some(listing) = roster.get_mut(number) {
            listing.set_link(&format!("{}{}", LINK_BASE, path));
        }
    }
}

fn drop_last_word(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    words[..words.len().saturating_sub(1)].join(" ")
}

pub fn new_listing(number: &str) -> Option<RouteListing> {
    let mut series = match number.parse::<i64>() {
        Ok(numeric) => numeric / 100,
        Err(_) => return None,
    };
    if series == 1 {
        series = 0;
    } else if series == 5 {
        series = 4;
    }
    Some(RouteListing::new(Agency::Kitsap, number, &series.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKER_DRIVER_HTML: &str = concat!(
        r#"<li><a href="/service/routed-buses/217-clearwater-casino">217 Clearwater Casino</a></li>"#,
        r#"<li><a href="/service/workerdriver-buses/south-kitsap-bangor">South Kitsap-Bangor</a></li>"#,
        r#"<li><a href="/service/workerdriver-buses/poulsbo">Poulsbo</a></li>"#,
        r#"<li><a href="/service/dial-a-rides/annapolis">Annapolis Dial-A-Ride</a></li>"#,
    );

    fn tracker_route(rt: &str, rtnm: &str) -> TrackerRoute {
        TrackerRoute {
            rt: rt.to_string(),
            rtnm: rtnm.to_string(),
        }
    }

    #[test]
    fn test_apply_tracker_routes() {
        let routes = vec![
            tracker_route("217", "Clearwater Casino"),
            tracker_route("390", "North Viking TC to Silverdale"),
            tracker_route("332", "Annapolis/Bremerton Foot Ferry"),
            tracker_route("602", "SK/Bangor Express"),
            tracker_route("614", "Poulsbo Commuter"),
        ];
        let mut roster = Roster::new(Agency::Kitsap);
        apply_tracker_routes(&mut roster, &routes, WORKER_DRIVER_HTML);
        assert_eq!(roster.listings.len(), 5);

        let casino = &roster.listings["217"];
        assert_eq!(casino.start, "Clearwater Casino");
        assert_eq!(casino.dest, "");
        assert_eq!(
            casino.links[0].as_deref(),
            Some("https://www.kitsaptransit.com/service/routed-buses/217-clearwater-casino")
        );

        let viking = &roster.listings["390"];
        assert_eq!(viking.start, "North Viking TC");
        assert_eq!(viking.dest, "Silverdale");
        assert_eq!(
            viking.links[0].as_deref(),
            Some("https://www.kitsaptransit.com/service")
        );

        let ferry = &roster.listings["332"];
        assert_eq!(ferry.start, "Annapolis");
        assert_eq!(ferry.dest, "Bremerton");

        let bangor = &roster.listings["602"];
        assert_eq!(bangor.start, "South Kitsap");
        assert_eq!(bangor.dest, "Naval Base Kitsap-Bangor");
        assert_eq!(
            bangor.links[0].as_deref(),
            Some("https://www.kitsaptransit.com/service/workerdriver-buses/south-kitsap-bangor")
        );

        let poulsbo = &roster.listings["614"];
        assert_eq!(poulsbo.start, "Poulsbo");
        assert_eq!(poulsbo.dest, "Naval Base Kitsap-Bremerton");
        assert_eq!(
            poulsbo.links[0].as_deref(),
            Some("https://www.kitsaptransit.com/service/workerdriver-buses/poulsbo")
        );
    }

    #[test]
    fn test_apply_link_map() {
        let mut link_map = HashMap::new();
        link_map.insert("217".to_string(), "/routed-buses/217-stale".to_string());
        link_map.insert("801".to_string(), "/dial-a-rides/annapolis".to_string());
        link_map.insert("805".to_string(), "/routed-buses/nollwood-dial-a-ride".to_string());
        let mut roster = Roster::new(Agency::Kitsap);
        apply_tracker_routes(
            &mut roster,
            &[tracker_route("217", "Clearwater Casino")],
            WORKER_DRIVER_HTML,
        );
        apply_link_map(&mut roster, &link_map, WORKER_DRIVER_HTML);
        assert_eq!(roster.listings.len(), 3);

        // Regular buses keep their menu links over the stale config ones.
        let casino = &roster.listings["217"];
        assert_eq!(
            casino.links[0].as_deref(),
            Some("https://www.kitsaptransit.com/service/routed-buses/217-clearwater-casino")
        );

        let annapolis = &roster.listings["801"];
        assert_eq!(annapolis.existence, Existence::Active);
        assert_eq!(annapolis.start, "Annapolis Dial-A-Ride");
        assert_eq!(
            annapolis.links[0].as_deref(),
            Some("https://www.kitsaptransit.com/service/dial-a-rides/annapolis")
        );

        let guessed = &roster.listings["805"];
        assert_eq!(guessed.start, "");
        assert_eq!(
            guessed.links[0].as_deref(),
            Some("https://www.kitsaptransit.com/service/routed-buses/nollwood-dial-a-ride")
        );
    }

    #[test]
    fn test_new_listing_classes() -> Result<()> {
        assert_eq!(new_listing("26").context("26")?.css_class, "0");
        assert_eq!(new_listing("123").context("123")?.css_class, "0");
        assert_eq!(new_listing("217").context("217")?.css_class, "2");
        assert_eq!(new_listing("390").context("390")?.css_class, "3");
        assert_eq!(new_listing("532").context("532")?.css_class, "4");
        assert_eq!(new_listing("614").context("614")?.css_class, "6");
        assert!(new_listing("Stream").is_none());
        Ok(())
    }

    #[test]
    fn test_parse_tracker_config() -> Result<()> {
        let config: TrackerConfig = serde_json::from_str(
            r#"{"transit.agency": "kitsaptransit",
                "map.infowindow.routeScheduleMap": {"801": "/dial-a-rides/annapolis"}}"#,
        )?;
        assert_eq!(
            config.route_schedule_map.get("801").map(String::as_str),
            Some("/dial-a-rides/annapolis")
        );
        Ok(())
    }
}
