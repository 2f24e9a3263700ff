mod central;
mod community;
mod everett;
mod grays;
mod intercity;
mod king;
mod kitsap;
mod lewis;
mod pacific;
mod pierce;
mod skagit;
mod sound;
mod whatcom;

use crate::fetch::Fetcher;
use crate::imports::*;
use crate::macros::*;
use crate::types::*;

impl Agency {
    pub fn full_name(self) -> &'static str {
        match self {
            Agency::King => "King County Metro",
            Agency::Sound => "Sound Transit",
            Agency::Everett => "Everett Transit",
            Agency::Pierce => "Pierce Transit",
            Agency::Community => "Community Transit",
            Agency::Kitsap => "Kitsap Transit",
            Agency::Intercity => "Intercity Transit",
            Agency::Skagit => "Skagit Transit",
            Agency::Whatcom => "Whatcom Transportation Authority",
            Agency::Grays => "Grays Harbor Transit",
            Agency::Lewis => "Lewis County Transit",
            Agency::Pacific => "Pacific Transit",
            Agency::Central => "Central Transit",
        }
    }

    /// Resources the agency needs fetched before its update pass.
    pub fn initial_requests(self) -> Vec<Resource> {
        match self {
            Agency::King => king::initial_requests(),
            Agency::Sound => sound::initial_requests(),
            Agency::Everett => everett::initial_requests(),
            Agency::Pierce => pierce::initial_requests(),
            Agency::Community => community::initial_requests(),
            Agency::Kitsap => kitsap::initial_requests(),
            Agency::Intercity => intercity::initial_requests(),
            Agency::Skagit => skagit::initial_requests(),
            Agency::Whatcom => whatcom::initial_requests(),
            Agency::Grays => grays::initial_requests(),
            Agency::Lewis => lewis::initial_requests(),
            Agency::Pacific => pacific::initial_requests(),
            Agency::Central => central::initial_requests(),
        }
    }

    /// Builds a fresh listing for a route number, or None when the number is
    /// known not to belong to this agency's public bus network.
    pub fn new_listing(self, number: &str) -> Option<RouteListing> {
        match self {
            Agency::King => king::new_listing(number),
            Agency::Sound => sound::new_listing(number),
            Agency::Everett => everett::new_listing(number),
            Agency::Pierce => pierce::new_listing(number),
            Agency::Community => community::new_listing(number),
            Agency::Kitsap => kitsap::new_listing(number),
            Agency::Intercity => intercity::new_listing(number),
            Agency::Skagit => skagit::new_listing(number),
            Agency::Whatcom => whatcom::new_listing(number),
            Agency::Grays => grays::new_listing(number),
            Agency::Lewis => lewis::new_listing(number),
            Agency::Pacific => pacific::new_listing(number),
            Agency::Central => central::new_listing(number),
        }
    }

    pub fn position(self, number: &str) -> Position {
        match self {
            Agency::King => king::position(number),
            Agency::Lewis | Agency::Pacific => Position::Name(number.to_string()),
            _ => Position::from_number(number),
        }
    }

    /// HTML for the route number cell.
    pub fn display_number(self, listing: &RouteListing) -> String {
        match self {
            Agency::King => king::display_number(listing),
            Agency::Sound => sound::display_number(listing),
            Agency::Pierce => pierce::display_number(listing),
            Agency::Community => community::display_number(listing),
            Agency::Intercity => intercity::display_number(listing),
            Agency::Lewis | Agency::Pacific => colored_number(listing),
            _ => listing.number.clone(),
        }
    }

    pub async fn update(
        self,
        roster: &mut Roster,
        resources: &ResourceMap,
        fetcher: &Fetcher,
    ) -> Result<()> {
        let inner = async {
            match self {
                Agency::King => king::update(roster, resources),
                Agency::Sound => sound::update(roster, resources),
                Agency::Everett => everett::update(roster, resources),
                Agency::Pierce => pierce::update(roster, resources),
                Agency::Community => community::update(roster, resources),
                Agency::Kitsap => kitsap::update(roster, resources, fetcher).await,
                Agency::Intercity => intercity::update(roster, resources, fetcher).await,
                Agency::Skagit => skagit::update(roster, resources, fetcher).await,
                Agency::Whatcom => whatcom::update(roster, resources),
                Agency::Grays => grays::update(roster, resources),
                Agency::Lewis => lewis::update(roster, resources),
                Agency::Pacific => pacific::update(roster, resources),
                Agency::Central => central::update(roster, resources),
            }
        };
        inner
            .await
            .with_context(|| format!("Failed to update {} listings", self.full_name()))
    }
}

/// Looks up a fetched body, treating fetch failures the same as absence.
fn resource_text<'a>(resources: &'a ResourceMap, resource: &Resource) -> Option<&'a str> {
    resources.get(resource).and_then(|body| body.as_deref())
}

/// Route number rendered as a small colored label.
fn colored_number(listing: &RouteListing) -> String {
    format!(
        "<p class=\"smallnum\" style=\"color:{}\">{}</p>",
        listing.color.as_deref().unwrap_or("white"),
        listing.number
    )
}

// Trip planner data shared by Everett Transit and Pierce Transit. It could
// cover other agencies too, but it is less accurate and well-maintained than
// their own sites.
const TRIP_PLANNER_URL: &str = "https://tripplanner.kingcounty.gov/TI_FixedRoute_Line";
const TRIP_PLANNER_BODY: &str = r#"{"version": "1.1", "method": "GetLines"}"#;

fn trip_planner_resource() -> Resource {
    Resource::post(TRIP_PLANNER_URL, TRIP_PLANNER_BODY)
}

#[derive(Debug, Deserialize)]
struct TripPlannerReply {
    result: TripPlannerResult,
}

#[derive(Debug, Deserialize)]
struct TripPlannerResult {
    lines: Vec<TripPlannerLine>,
}

#[derive(Debug, Deserialize)]
struct TripPlannerLine {
    #[serde(rename = "agencyId")]
    agency_id: String,
    #[serde(rename = "lineAbbr")]
    line_abbr: String,
    directions: Vec<TripPlannerDirection>,
}

#[derive(Debug, Deserialize)]
struct TripPlannerDirection {
    signage: String,
}

impl TripPlannerLine {
    fn signages(self) -> Vec<String> {
        self.directions
            .into_iter()
            .map(|direction| direction.signage)
            .collect()
    }
}

fn trip_planner_lines(json: &str, agency_id: &str) -> Result<Vec<TripPlannerLine>> {
    let reply: TripPlannerReply =
        serde_json::from_str(json).context("Failed to parse trip planner reply")?;
    Ok(reply
        .result
        .lines
        .into_iter()
        .filter(|line| line.agency_id == agency_id)
        .collect())
}

/// Extracts the final terminus from a trip planner signage string.
fn signage_terminus(signage: &str) -> Option<String> {
    regex!(r"^.*(?:[Tt]o|-) (?:.*?/ )*?([^/]*?)(?: via .*)?$")
        .captures(signage)
        .map(|captures| captures[1].to_string())
}

/// Fills the termini from a line's direction signages, first direction as the
/// start and second as the destination.
fn set_signage_termini(listing: &mut RouteListing, signages: &[String]) {
    if let Some(start) = signages.first().and_then(|signage| signage_terminus(signage)) {
        listing.start = start;
    }
    if let Some(dest) = signages.get(1).and_then(|signage| signage_terminus(signage)) {
        listing.dest = dest;
    }
}
