pub const CREATE_TABLES: &str = r"
    CREATE TABLE IF NOT EXISTS songs(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        artist TEXT NOT NULL,
        audio BLOB NOT NULL,
        img TEXT NOT NULL
    );
";
