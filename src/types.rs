use crate::imports::*;
use crate::macros::*;

use ::clap::Args;
use ::strum::IntoEnumIterator;
use ::strum_macros::{Display, EnumIter, EnumString};

#[derive(Args, Debug)]
pub struct Options {
    /// Transit agencies to include, in page order
    #[arg(
        short,
        long,
        value_name = "AGENCIES",
        value_delimiter = ',',
        default_values_t = Agency::iter()
    )]
    pub agencies: Vec<Agency>,

    /// Output HTML file path
    #[arg(short, long, value_name = "FILE", default_value = "index.html")]
    pub output: PathBuf,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECONDS", default_value_t = 30)]
    pub timeout: u64,

    /// Directory containing one subdirectory of route photos per agency
    #[arg(value_name = "IMAGES")]
    pub images: PathBuf,
}

#[derive(Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum Agency {
    King,
    Sound,
    Everett,
    Pierce,
    Community,
    Kitsap,
    Intercity,
    Skagit,
    Whatcom,
    Grays,
    Lewis,
    Pacific,
    Central,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Existence {
    Discontinued,
    Active,
    Delisted,
}

/// Sort key within an agency table.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Position {
    Index(i64),
    Name(String),
}

impl Position {
    /// Purely alphabetic numbers sort before numeric ones, and a lettered
    /// variant sorts directly after its base number.
    pub fn from_number(number: &str) -> Position {
        if let Ok(numeric) = number.parse::<i64>() {
            return Position::Index(numeric.saturating_mul(256));
        }
        if let Some(captures) = regex!(r"^(\d+)([A-Za-z])$").captures(number) {
            if let Ok(numeric) = captures[1].parse::<i64>() {
                let letter = captures[2].bytes().next().unwrap_or(0) as i64;
                return Position::Index(numeric.saturating_mul(256).saturating_add(letter));
            }
        }
        let initial = number.bytes().next().unwrap_or(0) as i64;
        Position::Index(initial - 65536)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Photo {
    pub path: PathBuf,
    pub taken: OffsetDateTime,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteListing {
    pub agency: Agency,
    pub number: String,
    pub css_class: String,
    pub start: String,
    pub dest: String,
    pub existence: Existence,
    pub links: [Option<String>; 3],
    pub color: Option<String>,
    pub photo: Option<Photo>,
    pub position: Position,
}

impl RouteListing {
    pub fn new(agency: Agency, number: &str, css_class: &str) -> RouteListing {
        RouteListing {
            agency,
            number: number.to_string(),
            css_class: css_class.to_string(),
            start: String::new(),
            dest: String::new(),
            existence: Existence::Discontinued,
            links: [None, None, None],
            color: None,
            photo: None,
            position: agency.position(number),
        }
    }

    /// Points the number, start, and destination cells at the same page.
    pub fn set_link(&mut self, link: &str) {
        self.links = [
            Some(link.to_string()),
            Some(link.to_string()),
            Some(link.to_string()),
        ];
    }

    pub fn set_links(&mut self, links: [String; 3]) {
        self.links = links.map(Some);
    }

    /// Strips scraping artifacts from the terminus names.
    pub fn sanitize(&mut self) {
        self.start = sanitize_terminus(&self.start);
        self.dest = sanitize_terminus(&self.dest);
    }
}

fn sanitize_terminus(text: &str) -> String {
    text.replace('\\', "").replace("amp;", "").trim_end().to_string()
}

impl fmt::Display for RouteListing {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        let photo_marker = if self.photo.is_some() { 'i' } else { '-' };
        let existence_marker = match self.existence {
            Existence::Discontinued => '!',
            Existence::Active => ' ',
            Existence::Delisted => '*',
        };
        write!(
            formatter,
            "{}{} {} {} ({}) {} <-> {}",
            photo_marker,
            existence_marker,
            self.agency,
            self.number,
            self.css_class,
            self.start,
            self.dest
        )
    }
}

#[derive(Debug)]
pub struct Roster {
    pub agency: Agency,
    pub listings: HashMap<String, RouteListing>,
}

impl Roster {
    pub fn new(agency: Agency) -> Roster {
        Roster {
            agency,
            listings: HashMap::new(),
        }
    }

    /// Fetches or creates the listing for a scraped route number and marks it
    /// active. Returns None when the agency rejects the number outright.
    pub fn claim(&mut self, number: &str) -> Option<&mut RouteListing> {
        if !self.listings.contains_key(number) {
            let listing = self.agency.new_listing(number)?;
            self.listings.insert(listing.number.clone(), listing);
        }
        let listing = self.listings.get_mut(number)?;
        listing.existence = Existence::Active;
        Some(listing)
    }

    pub fn get_mut(&mut self, number: &str) -> Option<&mut RouteListing> {
        self.listings.get_mut(number)
    }

    pub fn insert(&mut self, listing: RouteListing) {
        self.listings.insert(listing.number.clone(), listing);
    }

    pub fn sanitize(&mut self) {
        for listing in self.listings.values_mut() {
            listing.sanitize();
        }
    }

    /// Counts photographed routes against all routes still listed by the agency.
    pub fn completed(&self) -> (usize, usize) {
        let mut done = 0;
        let mut total = 0;
        for listing in self.listings.values() {
            if listing.existence != Existence::Discontinued {
                total += 1;
                if listing.photo.is_some() {
                    done += 1;
                }
            }
        }
        (done, total)
    }

    /// Listings in display order.
    pub fn sorted(&self) -> Vec<&RouteListing> {
        self.listings
            .values()
            .sorted_by(|a, b| (&a.position, &a.number).cmp(&(&b.position, &b.number)))
            .collect()
    }
}

/// A fetchable HTTP resource, deduplicated by identity.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Resource {
    Get(String),
    Post { url: String, body: String },
}

impl Resource {
    pub fn get(url: &str) -> Resource {
        Resource::Get(url.to_string())
    }

    pub fn post(url: &str, body: &str) -> Resource {
        Resource::Post {
            url: url.to_string(),
            body: body.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Resource::Get(url) => url,
            Resource::Post { url, .. } => url,
        }
    }
}

pub type ResourceMap = HashMap<Resource, Option<String>>;
