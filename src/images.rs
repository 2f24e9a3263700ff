use crate::imports::*;
use crate::macros::*;
use crate::types::*;
use crate::utils::*;

use ::std::fs;

/// Seeds every roster with the photographs already on disk, keyed by filename.
/// A `*` prefix marks the route as delisted. Files that do not follow the
/// naming convention are ignored.
pub fn seed_rosters(image_root: &Path, rosters: &mut [Roster]) -> Result<()> {
    for roster in rosters.iter_mut() {
        let agency_dir = image_root.join(roster.agency.to_string());
        seed_roster(&agency_dir, roster)
            .with_context(|| format!("Failed to read image directory: {:?}", agency_dir))?;
    }
    Ok(())
}

fn seed_roster(agency_dir: &Path, roster: &mut Roster) -> Result<()> {
    let mut filenames = Vec::new();
    for entry in fs::read_dir(agency_dir)? {
        if let Ok(filename) = entry?.file_name().into_string() {
            filenames.push(filename);
        }
    }
    // Sorted so that duplicate stems resolve the same way on every run.
    filenames.sort();
    for filename in filenames {
        let captures =
            match regex!(r"^(\*?)(\w+)\.(apng|avif|bmp|gif|jpe?g|png|webp)$").captures(&filename) {
                Some(captures) => captures,
                None => continue,
            };
        let mut listing = match roster.agency.new_listing(&captures[2]) {
            Some(listing) => listing,
            None => continue,
        };
        if !captures[1].is_empty() {
            listing.existence = Existence::Delisted;
        }
        let path = agency_dir.join(&filename);
        let metadata = fs::metadata(&path)?;
        let taken = metadata.created().or_else(|_| metadata.modified())?;
        listing.photo = Some(Photo {
            path,
            taken: to_pacific(OffsetDateTime::from(taken)),
        });
        debug!("Seeded {} route {} from: {:?}", roster.agency, listing.number, filename);
        roster.insert(listing);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use ::std::fs::File;
    use ::tempfile::tempdir;

    fn touch(directory: &Path, filename: &str) -> Result<()> {
        File::create(directory.join(filename))?;
        Ok(())
    }

    #[test]
    fn test_seed_roster() -> Result<()> {
        let image_root = tempdir()?;
        let king_dir = image_root.path().join("king");
        fs::create_dir(&king_dir)?;
        touch(&king_dir, "10.jpg")?;
        touch(&king_dir, "*042.png")?;
        touch(&king_dir, "X90.gif")?;
        touch(&king_dir, "notes.txt")?;
        touch(&king_dir, "10.jpg.bak")?;

        let mut rosters = vec![Roster::new(Agency::King)];
        seed_rosters(image_root.path(), &mut rosters)?;
        let roster = &rosters[0];
        assert_eq!(roster.listings.len(), 3);

        let plain = &roster.listings["10"];
        assert_eq!(plain.existence, Existence::Discontinued);
        assert!(plain.photo.is_some());

        let delisted = &roster.listings["042"];
        assert_eq!(delisted.existence, Existence::Delisted);
        assert_eq!(delisted.css_class, "0");

        let nonbus = &roster.listings["90"];
        assert_eq!(nonbus.existence, Existence::Active);
        assert_eq!(nonbus.css_class, "nonbus");
        Ok(())
    }

    #[test]
    fn test_seed_roster_duplicate_stems() -> Result<()> {
        let image_root = tempdir()?;
        let sound_dir = image_root.path().join("sound");
        fs::create_dir(&sound_dir)?;
        touch(&sound_dir, "550.jpg")?;
        touch(&sound_dir, "550.png")?;

        let mut rosters = vec![Roster::new(Agency::Sound)];
        seed_rosters(image_root.path(), &mut rosters)?;
        let photo = rosters[0].listings["550"].photo.clone().unwrap();
        assert_eq!(photo.path, sound_dir.join("550.png"));
        Ok(())
    }

    #[test]
    fn test_seed_rosters_missing_directory() -> Result<()> {
        let image_root = tempdir()?;
        let mut rosters = vec![Roster::new(Agency::King)];
        assert!(seed_rosters(image_root.path(), &mut rosters).is_err());
        Ok(())
    }
}
