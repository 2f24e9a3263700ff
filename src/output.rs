use crate::imports::*;
use crate::types::*;
use crate::utils::*;

use ::std::env;
use ::std::io::Write;
use ::tempfile::NamedTempFile;

const CREDIT_URL: &str = "https://github.com/wa-buses/busroster";
const CREDIT: &str = concatcp!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

const NOTES: &str = "Only routes currently listed on each agency's website are counted as \
    active.<br>Routes with <span class=\"discontinued\">Discontinued</span> tag have been \
    discontinued since their completion.<br>Routes with <span class=\"delisted\">Delisted</span> \
    tag remain operational but are absent from public transit agency websites (possibly \
    intentionally).";

/// Attributes of one table cell beyond its contents.
#[derive(Default)]
struct TdOptions<'a> {
    css_class: &'a str,
    link: Option<&'a str>,
    same_tab: bool,
    span: bool,
}

fn td(data: &str, options: TdOptions) -> String {
    let mut element = String::from("td");
    if !options.css_class.is_empty() {
        element.push_str(&format!(" class=\"{}\"", options.css_class));
    }
    if let Some(link) = options.link {
        let target = if options.same_tab { "_self" } else { "_blank" };
        element.push_str(&format!(" onclick=\"window.open('{}', '{}')\"", link, target));
    }
    if options.span {
        element.push_str(" colspan=\"2\"");
    }
    format!("<{}>{}</td>", element, data)
}

fn existence_note(listing: &RouteListing) -> String {
    match listing.existence {
        Existence::Discontinued => td(
            "Discontinued",
            TdOptions {
                css_class: "discontinued",
                ..Default::default()
            },
        ),
        Existence::Active => td("", TdOptions::default()),
        Existence::Delisted => td(
            "Delisted",
            TdOptions {
                css_class: "delisted",
                ..Default::default()
            },
        ),
    }
}

/// One `<tr>` of six cells; an empty destination collapses into a spanned
/// start cell.
fn listing_row(listing: &RouteListing) -> String {
    let full_class = format!("{}-{}", listing.agency, listing.css_class);
    let number_class = format!("b-{}", full_class);
    let terminus_class = format!("n-{}", full_class);
    let number_td = td(
        &listing.agency.display_number(listing),
        TdOptions {
            css_class: &number_class,
            link: listing.links[0].as_deref(),
            ..Default::default()
        },
    );
    let start = escape_ampersands(&listing.start);
    let (start_td, dest_td) = if listing.dest.is_empty() {
        let start_td = td(
            &start,
            TdOptions {
                css_class: &terminus_class,
                link: listing.links[1].as_deref(),
                span: true,
                ..Default::default()
            },
        );
        (start_td, String::new())
    } else {
        let start_td = td(
            &start,
            TdOptions {
                css_class: &terminus_class,
                link: listing.links[1].as_deref(),
                ..Default::default()
            },
        );
        let dest_td = td(
            &escape_ampersands(&listing.dest),
            TdOptions {
                css_class: &terminus_class,
                link: listing.links[2].as_deref(),
                ..Default::default()
            },
        );
        (start_td, dest_td)
    };
    let (status_td, image_td) = match &listing.photo {
        Some(photo) => {
            // The src must hold forward slashes even when assembled on Windows.
            let image_link = photo.path.to_string_lossy().replace('\\', "/");
            let image = format!(
                "<img src=\"{}\" alt=\"{}\" title=\"{}\" width=100></img>",
                image_link, listing.number, listing.number
            );
            (
                td(
                    &format_timestamp(photo.taken),
                    TdOptions {
                        css_class: "complete",
                        ..Default::default()
                    },
                ),
                td(
                    &image,
                    TdOptions {
                        link: Some(&image_link),
                        same_tab: true,
                        ..Default::default()
                    },
                ),
            )
        }
        None => (
            td(
                "Incomplete",
                TdOptions {
                    css_class: "incomplete",
                    ..Default::default()
                },
            ),
            td("", TdOptions::default()),
        ),
    };
    format!(
        "      <tr>{}{}{}{}{}{}</tr>",
        number_td,
        start_td,
        dest_td,
        existence_note(listing),
        status_td,
        image_td
    )
}

fn roster_table(roster: &Roster) -> String {
    let listings = roster.sorted();
    for listing in &listings {
        debug!("{}", listing);
    }
    let rows = listings.iter().map(|listing| listing_row(listing)).join("\n");
    format!(
        "    <h3>{}</h3>\n    <table>\n{}\n    </table>",
        roster.agency.full_name(),
        rows
    )
}

/// Returns the percentage completeness heading, upgraded to a qualified
/// full-completeness heading when every counted route is photographed and to
/// an unqualified one when every listing is, snow shuttles included.
fn completeness_heading(rosters: &[Roster]) -> String {
    let date = format_date(now_pacific().date());
    let mut total = 0;
    let mut completed = 0;
    let mut all_photographed = true;
    for listing in rosters.iter().flat_map(|roster| roster.listings.values()) {
        if listing.photo.is_none() {
            all_photographed = false;
        }
        if listing.existence != Existence::Discontinued && listing.css_class != "special" {
            total += 1;
            if listing.photo.is_some() {
                completed += 1;
            }
        }
    }
    if all_photographed {
        return format!("<h2>Fully Complete on {}</h2>", date);
    }
    if completed == total {
        return format!(
            "<h2>Fully Complete* on {}</h2>\n      <h3>*Excluding Unavailable Snow Shuttle</h3>",
            date
        );
    }
    format!("<h2>{}% Complete, Updated {}</h2>", completed * 100 / total, date)
}

/// Renders the whole page, one table section per roster in input order.
pub fn render_page(rosters: &[Roster]) -> String {
    let tables = rosters.iter().map(roster_table).join("\n");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <link href="index.css" rel="stylesheet" type="text/css"/>
    <link rel="icon" href="icon.ico">
    <title>{}</title>
  </head>
  <body>
    <h1>Completed Buses</h1>
    {}
{}
    <p>{}</p>
    <span class="credit" onclick="window.open('{}', '_blank')">{}</span>
  </body>
</html>
"#,
        env!("CARGO_PKG_NAME"),
        completeness_heading(rosters),
        tables,
        NOTES,
        CREDIT_URL,
        CREDIT,
    )
}

/// Writes the page through a temporary file so a crash never leaves a
/// truncated page behind.
pub fn write_output(path: &Path, html: &str) -> Result<()> {
    info!("Writing HTML to: {:?}", path);
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => env::current_dir().context("Failed to get current directory")?,
    };
    let mut temp_file = NamedTempFile::new_in(&directory)
        .with_context(|| format!("Failed to create output file in: {:?}", directory))?;
    temp_file
        .write_all(html.as_bytes())
        .with_context(|| format!("Failed to write HTML to: {:?}", path))?;
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist temporary file to: {:?}", path))?;
    Ok(())
}
