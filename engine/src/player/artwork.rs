//! Album cover lookup for the current track.
//!
//! Sources are tried in order and the first hit wins: ID3 picture frames,
//! then pictures embedded by any other tag format, then a `cover.jpg` /
//! `cover.jpeg` next to the track. A source that fails for any reason is a
//! miss, never an error.

use std::fs;
use std::path::Path;

use id3::frame::PictureType as Id3PictureType;
use id3::Tag;
use lofty::config::ParseOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use tracing::debug;

/// Cover image bytes and their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl Artwork {
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            data,
            mime_type: "image/jpeg".to_string(),
        }
    }
}

/// One cover lookup: `(track file, track directory) -> cover`.
pub type ArtworkSource = fn(&Path, &Path) -> Option<Artwork>;

pub const SOURCES: &[(&str, ArtworkSource)] = &[
    ("id3 tags", from_id3_tags),
    ("embedded pictures", from_embedded_pictures),
    ("cover file", from_cover_file),
];

const COVER_FILE_NAMES: [&str; 2] = ["cover.jpg", "cover.jpeg"];

/// Run every source in [`SOURCES`] until one finds a cover.
pub fn resolve(track: &Path, dir: &Path) -> Option<Artwork> {
    resolve_with(SOURCES, track, dir)
}

pub fn resolve_with(sources: &[(&str, ArtworkSource)], track: &Path, dir: &Path) -> Option<Artwork> {
    sources.iter().find_map(|(name, source)| {
        let found = source(track, dir);
        if found.is_none() {
            debug!("no artwork from {} for {}", name, track.display());
        }
        found
    })
}

/// `APIC` (ID3v2.3/2.4) and `PIC` (ID3v2.2) frames, front cover first.
pub fn from_id3_tags(track: &Path, _dir: &Path) -> Option<Artwork> {
    let tag = match Tag::read_from_path(track) {
        Ok(tag) => tag,
        Err(e) => {
            debug!("id3 read failed for {}: {}", track.display(), e);
            return None;
        }
    };

    let pictures: Vec<&id3::frame::Picture> = tag
        .frames()
        .filter(|f| f.id().starts_with("APIC") || f.id().starts_with("PIC"))
        .filter_map(|f| f.content().picture())
        .collect();

    let picture = pictures
        .iter()
        .find(|p| p.picture_type == Id3PictureType::CoverFront)
        .or_else(|| pictures.first())?;

    Some(Artwork {
        data: picture.data.clone(),
        mime_type: normalize_mime(&picture.mime_type),
    })
}

/// First picture of the first tag carrying one: FLAC picture blocks, MP4
/// `covr`, Vorbis comments, APE and so on.
pub fn from_embedded_pictures(track: &Path, _dir: &Path) -> Option<Artwork> {
    let tagged = Probe::open(track)
        .and_then(|probe| {
            probe
                .options(ParseOptions::new().read_properties(false))
                .read()
        })
        .map_err(|e| debug!("tag probe failed for {}: {}", track.display(), e))
        .ok()?;

    tagged.tags().iter().find_map(|tag| {
        tag.pictures().first().map(|picture| Artwork {
            data: picture.data().to_vec(),
            mime_type: picture
                .mime_type()
                .map(|m| normalize_mime(m.as_str()))
                .unwrap_or_else(|| "image/jpeg".to_string()),
        })
    })
}

/// `cover.jpg` or `cover.jpeg` in `dir`, matched case-insensitively.
pub fn from_cover_file(_track: &Path, dir: &Path) -> Option<Artwork> {
    let entries = fs::read_dir(dir)
        .map_err(|e| debug!("cannot list {}: {}", dir.display(), e))
        .ok()?;

    let mut candidates: Vec<(usize, std::path::PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_ascii_lowercase();
            let rank = COVER_FILE_NAMES.iter().position(|c| *c == name)?;
            Some((rank, entry.path()))
        })
        .filter(|(_, path)| path.is_file())
        .collect();
    candidates.sort();

    candidates.into_iter().find_map(|(_, path)| match fs::read(&path) {
        Ok(data) => Some(Artwork::jpeg(data)),
        Err(e) => {
            debug!("cannot read {}: {}", path.display(), e);
            None
        }
    })
}

fn normalize_mime(mime: &str) -> String {
    match mime.trim() {
        "" | "JPG" | "jpg" | "image/jpg" => "image/jpeg".to_string(),
        "PNG" | "png" => "image/png".to_string(),
        other => other.to_string(),
    }
}
