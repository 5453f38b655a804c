use std::io::Cursor;

use spotigen::input::{
    InputError, parse_artist_lines, parse_setlist_reader, read_artist_file, read_setlist_csv,
};
use spotigen::types::QueryRecord;

#[test]
fn test_artist_lines_one_record_per_non_blank_line() {
    let content = "Miles Davis\n\nJohn Coltrane\n";
    let records = parse_artist_lines(content).unwrap();

    // Blank line is skipped, record count equals non-blank line count
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0],
        QueryRecord::ArtistOnly {
            artist: "Miles Davis".to_string()
        }
    );
    assert_eq!(
        records[1],
        QueryRecord::ArtistOnly {
            artist: "John Coltrane".to_string()
        }
    );
}

#[test]
fn test_artist_lines_trims_whitespace() {
    let content = "  Radiohead  \n\t\n   \nBeyoncé";
    let records = parse_artist_lines(content).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0],
        QueryRecord::ArtistOnly {
            artist: "Radiohead".to_string()
        }
    );
}

#[test]
fn test_artist_lines_empty_input() {
    let result = parse_artist_lines("\n\n   \n");
    assert!(matches!(result, Err(InputError::EmptyInput)));
}

#[test]
fn test_artist_file_not_found() {
    let result = read_artist_file("/no/such/artists.txt");
    assert!(matches!(result, Err(InputError::FileNotFound(_))));
}

#[test]
fn test_setlist_file_not_found() {
    let result = read_setlist_csv("/no/such/setlist.csv");
    assert!(matches!(result, Err(InputError::FileNotFound(_))));
}

#[test]
fn test_setlist_basic_rows() {
    let csv = "artist,song\nMiles Davis,All Blues\nJohn Coltrane,Giant Steps\n";
    let setlist = parse_setlist_reader(Cursor::new(csv)).unwrap();

    assert_eq!(setlist.malformed, 0);
    assert_eq!(setlist.records.len(), 2);
    assert_eq!(
        setlist.records[1],
        QueryRecord::ArtistSong {
            artist: "John Coltrane".to_string(),
            song: "Giant Steps".to_string()
        }
    );
}

#[test]
fn test_setlist_header_order_independent() {
    // song column first, artist second
    let csv = "song,artist\nGiant Steps,John Coltrane\n";
    let setlist = parse_setlist_reader(Cursor::new(csv)).unwrap();

    assert_eq!(setlist.records.len(), 1);
    assert_eq!(
        setlist.records[0],
        QueryRecord::ArtistSong {
            artist: "John Coltrane".to_string(),
            song: "Giant Steps".to_string()
        }
    );
}

#[test]
fn test_setlist_header_case_insensitive() {
    let csv = "Song,ARTIST\nAll Blues,Miles Davis\n";
    let setlist = parse_setlist_reader(Cursor::new(csv)).unwrap();

    assert_eq!(setlist.records.len(), 1);
    assert_eq!(
        setlist.records[0],
        QueryRecord::ArtistSong {
            artist: "Miles Davis".to_string(),
            song: "All Blues".to_string()
        }
    );
}

#[test]
fn test_setlist_malformed_rows_counted_not_fatal() {
    let csv = "artist,song\n\
               Miles Davis,All Blues\n\
               ,Naima\n\
               Thelonious Monk,\n\
               John Coltrane,Giant Steps\n";
    let setlist = parse_setlist_reader(Cursor::new(csv)).unwrap();

    // Each row missing a field increments the count by exactly one
    assert_eq!(setlist.records.len(), 2);
    assert_eq!(setlist.malformed, 2);
}

#[test]
fn test_setlist_values_trimmed() {
    let csv = "artist,song\n  Miles Davis , All Blues \n";
    let setlist = parse_setlist_reader(Cursor::new(csv)).unwrap();

    assert_eq!(
        setlist.records[0],
        QueryRecord::ArtistSong {
            artist: "Miles Davis".to_string(),
            song: "All Blues".to_string()
        }
    );
}

#[test]
fn test_setlist_missing_column_rejected() {
    let csv = "artist,title\nMiles Davis,All Blues\n";
    let result = parse_setlist_reader(Cursor::new(csv));
    assert!(matches!(result, Err(InputError::MalformedHeader)));
}

#[test]
fn test_setlist_only_malformed_rows_is_empty_input() {
    let csv = "artist,song\n,\nMiles Davis,\n";
    let result = parse_setlist_reader(Cursor::new(csv));
    assert!(matches!(result, Err(InputError::EmptyInput)));
}
