//! Input parsing for the two supported file formats.
//!
//! The artist-list format is plain UTF-8 text, one artist name per non-empty
//! line. The setlist format is a CSV whose header row must contain `artist`
//! and `song` columns, case-insensitively and in either order. Rows missing
//! either field are skipped and counted, never fatal; an input that yields
//! zero valid records is.

use std::{io::Read, path::Path};

use thiserror::Error;

use crate::types::QueryRecord;

/// Errors raised while turning an input file into query records.
///
/// Only these setup-time errors abort a run. Malformed CSV rows are not
/// errors; they are skipped and counted in [`Setlist::malformed`].
#[derive(Debug, Error)]
pub enum InputError {
    #[error("file '{0}' not found")]
    FileNotFound(String),

    #[error("no valid records found in input")]
    EmptyInput,

    #[error("CSV header must contain 'artist' and 'song' columns")]
    MalformedHeader,

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// A parsed setlist: the valid artist/song records plus the number of rows
/// that were rejected for missing one of the two fields.
#[derive(Debug, Clone)]
pub struct Setlist {
    pub records: Vec<QueryRecord>,
    pub malformed: usize,
}

/// Reads an artist-list file into `ArtistOnly` query records.
///
/// One trimmed, non-empty line becomes one record; blank lines are skipped.
/// The number of records always equals the number of non-blank lines.
///
/// # Errors
///
/// - [`InputError::FileNotFound`] when the path does not resolve
/// - [`InputError::EmptyInput`] when every line is blank
pub fn read_artist_file(path: &str) -> Result<Vec<QueryRecord>, InputError> {
    if !Path::new(path).is_file() {
        return Err(InputError::FileNotFound(path.to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    parse_artist_lines(&content)
}

/// Parses artist-list content that has already been read into memory.
pub fn parse_artist_lines(content: &str) -> Result<Vec<QueryRecord>, InputError> {
    let records: Vec<QueryRecord> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| QueryRecord::ArtistOnly {
            artist: line.to_string(),
        })
        .collect();

    if records.is_empty() {
        return Err(InputError::EmptyInput);
    }

    Ok(records)
}

/// Reads a setlist CSV file into `ArtistSong` query records.
///
/// # Errors
///
/// - [`InputError::FileNotFound`] when the path does not resolve
/// - [`InputError::MalformedHeader`] when the header row lacks `artist` or
///   `song`
/// - [`InputError::EmptyInput`] when no row carries both fields
pub fn read_setlist_csv(path: &str) -> Result<Setlist, InputError> {
    if !Path::new(path).is_file() {
        return Err(InputError::FileNotFound(path.to_string()));
    }

    let file = std::fs::File::open(path)?;
    parse_setlist_reader(file)
}

/// Parses setlist CSV content from any reader.
///
/// Header columns are matched case-insensitively and may appear in any
/// order. Each data row with both fields present and non-empty becomes one
/// `ArtistSong` record with trimmed values; every other row increments the
/// malformed count by exactly one.
pub fn parse_setlist_reader<R: Read>(reader: R) -> Result<Setlist, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let artist_col = find_column(&headers, "artist");
    let song_col = find_column(&headers, "song");

    let (artist_col, song_col) = match (artist_col, song_col) {
        (Some(a), Some(s)) => (a, s),
        _ => return Err(InputError::MalformedHeader),
    };

    let mut records = Vec::new();
    let mut malformed = 0;

    for row in rdr.records() {
        let row = match row {
            Ok(row) => row,
            Err(_) => {
                malformed += 1;
                continue;
            }
        };

        let artist = row.get(artist_col).map(str::trim).unwrap_or("");
        let song = row.get(song_col).map(str::trim).unwrap_or("");

        if artist.is_empty() || song.is_empty() {
            malformed += 1;
            continue;
        }

        records.push(QueryRecord::ArtistSong {
            artist: artist.to_string(),
            song: song.to_string(),
        });
    }

    if records.is_empty() {
        return Err(InputError::EmptyInput);
    }

    Ok(Setlist { records, malformed })
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}
