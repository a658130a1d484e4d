use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{PlayerError, Result};

/// Prefixed to every `--nowplaying` query. DeaDBeeF leaves it out when no
/// track is loaded, which is how "nothing playing" is told apart from a
/// track whose fields are all empty.
pub const SENTINEL: char = '$';

/// Placed between fields in the query and split on in the response.
pub const DIVIDER: &str = "::";

/// A now-playing attribute that DeaDBeeF can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Artist,
    Title,
    Album,
    Band,
    TrackNum,
    Numtracks,
    Length,
    PlaybackPos,
    Year,
    Genre,
    Comment,
    Composer,
    Copyright,
    Tags,
    Path,
    FullPath,
    Dir,
    FullDir,
    PlaylistNum,
    PlaylistLength,
    Channels,
    Version,
}

impl Attribute {
    pub const ALL: [Attribute; 22] = [
        Attribute::Artist,
        Attribute::Title,
        Attribute::Album,
        Attribute::Band,
        Attribute::TrackNum,
        Attribute::Numtracks,
        Attribute::Length,
        Attribute::PlaybackPos,
        Attribute::Year,
        Attribute::Genre,
        Attribute::Comment,
        Attribute::Composer,
        Attribute::Copyright,
        Attribute::Tags,
        Attribute::Path,
        Attribute::FullPath,
        Attribute::Dir,
        Attribute::FullDir,
        Attribute::PlaylistNum,
        Attribute::PlaylistLength,
        Attribute::Channels,
        Attribute::Version,
    ];

    /// The `%x` code DeaDBeeF's `--nowplaying` understands for this attribute.
    pub fn code(self) -> char {
        match self {
            Attribute::Artist => 'a',
            Attribute::Title => 't',
            Attribute::Album => 'b',
            Attribute::Band => 'B',
            Attribute::TrackNum => 'n',
            Attribute::Numtracks => 'N',
            Attribute::Length => 'l',
            Attribute::PlaybackPos => 'e',
            Attribute::Year => 'y',
            Attribute::Genre => 'g',
            Attribute::Comment => 'c',
            Attribute::Composer => 'C',
            Attribute::Copyright => 'r',
            Attribute::Tags => 'T',
            Attribute::Path => 'f',
            Attribute::FullPath => 'F',
            Attribute::Dir => 'd',
            Attribute::FullDir => 'D',
            Attribute::PlaylistNum => 'X',
            Attribute::PlaylistLength => 'L',
            Attribute::Channels => 'Z',
            Attribute::Version => 'V',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Artist => "artist",
            Attribute::Title => "title",
            Attribute::Album => "album",
            Attribute::Band => "band",
            Attribute::TrackNum => "track_num",
            Attribute::Numtracks => "numtracks",
            Attribute::Length => "length",
            Attribute::PlaybackPos => "playback_pos",
            Attribute::Year => "year",
            Attribute::Genre => "genre",
            Attribute::Comment => "comment",
            Attribute::Composer => "composer",
            Attribute::Copyright => "copyright",
            Attribute::Tags => "tags",
            Attribute::Path => "path",
            Attribute::FullPath => "full_path",
            Attribute::Dir => "dir",
            Attribute::FullDir => "full_dir",
            Attribute::PlaylistNum => "playlist_num",
            Attribute::PlaylistLength => "playlist_length",
            Attribute::Channels => "channels",
            Attribute::Version => "version",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self> {
        Attribute::ALL
            .iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or_else(|| PlayerError::UnknownAttribute(s.to_string()))
    }
}

/// Ordered set of attributes for one `--nowplaying` query.
///
/// Duplicates are dropped, keeping the position of the first occurrence, so
/// the response fields line up one-to-one with `attributes()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRequest {
    attrs: Vec<Attribute>,
}

impl AttributeRequest {
    pub fn new(attrs: impl IntoIterator<Item = Attribute>) -> Self {
        let mut out: Vec<Attribute> = Vec::new();
        for attr in attrs {
            if !out.contains(&attr) {
                out.push(attr);
            }
        }
        Self { attrs: out }
    }

    /// Build a request from attribute names, rejecting the first unknown one.
    pub fn parse<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let attrs = names
            .into_iter()
            .map(|n| n.as_ref().parse::<Attribute>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(attrs))
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// `$%a::%t::%b` style query string for `--nowplaying`.
    pub fn format_string(&self) -> String {
        let codes: Vec<String> = self.attrs.iter().map(|a| format!("%{}", a.code())).collect();
        format!("{SENTINEL}{}", codes.join(DIVIDER))
    }
}
