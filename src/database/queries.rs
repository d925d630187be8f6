pub const COUNT_SONGS: &str = "
    SELECT COUNT(*) FROM songs
";

pub const INSERT_SONG: &str = "
    INSERT INTO songs (
        title,
        artist,
        audio,
        img
    ) VALUES (?1, ?2, ?3, ?4)
";

// Keyset step: one record per query so only a single payload is held at a time
pub const SCAN_NEXT: &str = "
    SELECT
        id,
        title,
        artist,
        audio,
        img
    FROM songs
    WHERE id > ?1
    ORDER BY id ASC
    LIMIT 1
";
