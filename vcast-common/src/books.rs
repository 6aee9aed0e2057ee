//! Canonical book table
//!
//! One static table of the 66 books, identical across translations. The
//! short code is the translation-independent join key: corpus files, parsed
//! references and broadcast payloads all speak short codes, and display
//! labels are recovered from this table.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A canonical book entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Book {
    /// Full display name, e.g. "1 Corinthians"
    pub name: &'static str,
    /// Unique short code, stable across translations
    pub code: &'static str,
    /// Accepted input abbreviations (lowercase, no whitespace)
    pub aliases: &'static [&'static str],
}

/// The canonical book list, in scripture order
pub static BOOKS: &[Book] = &[
    // Old Testament
    Book { name: "Genesis", code: "gn", aliases: &["gen", "ge"] },
    Book { name: "Exodus", code: "ex", aliases: &["exo", "exod"] },
    Book { name: "Leviticus", code: "lv", aliases: &["lev"] },
    Book { name: "Numbers", code: "nm", aliases: &["num"] },
    Book { name: "Deuteronomy", code: "dt", aliases: &["deut", "deu"] },
    Book { name: "Joshua", code: "js", aliases: &["josh", "jos"] },
    Book { name: "Judges", code: "jud", aliases: &["jdg"] },
    Book { name: "Ruth", code: "rt", aliases: &["rut", "ru"] },
    Book { name: "1 Samuel", code: "1sm", aliases: &["1sam", "1sa", "1s"] },
    Book { name: "2 Samuel", code: "2sm", aliases: &["2sam", "2sa", "2s"] },
    Book { name: "1 Kings", code: "1kgs", aliases: &["1ki", "1k"] },
    Book { name: "2 Kings", code: "2kgs", aliases: &["2ki", "2k"] },
    Book { name: "1 Chronicles", code: "1ch", aliases: &["1chr", "1chron"] },
    Book { name: "2 Chronicles", code: "2ch", aliases: &["2chr", "2chron"] },
    Book { name: "Ezra", code: "ezr", aliases: &["ez"] },
    Book { name: "Nehemiah", code: "ne", aliases: &["neh"] },
    Book { name: "Esther", code: "et", aliases: &["est", "es"] },
    Book { name: "Job", code: "job", aliases: &["jb"] },
    Book { name: "Psalms", code: "ps", aliases: &["psalm", "psa", "pss"] },
    Book { name: "Proverbs", code: "prv", aliases: &["prov", "pro"] },
    Book { name: "Ecclesiastes", code: "ec", aliases: &["ecc", "eccl"] },
    Book { name: "Song of Solomon", code: "so", aliases: &["song", "sos", "songofsongs"] },
    Book { name: "Isaiah", code: "is", aliases: &["isa"] },
    Book { name: "Jeremiah", code: "jr", aliases: &["jer"] },
    Book { name: "Lamentations", code: "lm", aliases: &["lam"] },
    Book { name: "Ezekiel", code: "ez", aliases: &["eze", "ezek", "ezk"] },
    Book { name: "Daniel", code: "dn", aliases: &["dan", "da"] },
    Book { name: "Hosea", code: "ho", aliases: &["hos"] },
    Book { name: "Joel", code: "jl", aliases: &["joe"] },
    Book { name: "Amos", code: "am", aliases: &["amo"] },
    Book { name: "Obadiah", code: "ob", aliases: &["oba"] },
    Book { name: "Jonah", code: "jn", aliases: &["jon"] },
    Book { name: "Micah", code: "mi", aliases: &["mic"] },
    Book { name: "Nahum", code: "na", aliases: &["nah"] },
    Book { name: "Habakkuk", code: "hk", aliases: &["hab"] },
    Book { name: "Zephaniah", code: "zp", aliases: &["zeph", "zep"] },
    Book { name: "Haggai", code: "hg", aliases: &["hag"] },
    Book { name: "Zechariah", code: "zc", aliases: &["zech", "zec"] },
    Book { name: "Malachi", code: "ml", aliases: &["mal"] },
    // New Testament
    Book { name: "Matthew", code: "mt", aliases: &["matt", "mat"] },
    Book { name: "Mark", code: "mk", aliases: &["mar", "mrk", "mr"] },
    Book { name: "Luke", code: "lk", aliases: &["luk", "lu"] },
    Book { name: "John", code: "jo", aliases: &["joh", "jhn", "jn"] },
    Book { name: "Acts", code: "act", aliases: &["ac"] },
    Book { name: "Romans", code: "rm", aliases: &["rom", "ro"] },
    Book { name: "1 Corinthians", code: "1co", aliases: &["1cor"] },
    Book { name: "2 Corinthians", code: "2co", aliases: &["2cor"] },
    Book { name: "Galatians", code: "gl", aliases: &["gal", "ga"] },
    Book { name: "Ephesians", code: "eph", aliases: &["ep"] },
    Book { name: "Philippians", code: "ph", aliases: &["phil", "php", "pp"] },
    Book { name: "Colossians", code: "cl", aliases: &["col"] },
    Book { name: "1 Thessalonians", code: "1ts", aliases: &["1thess", "1th"] },
    Book { name: "2 Thessalonians", code: "2ts", aliases: &["2thess", "2th"] },
    Book { name: "1 Timothy", code: "1tm", aliases: &["1tim", "1ti"] },
    Book { name: "2 Timothy", code: "2tm", aliases: &["2tim", "2ti"] },
    Book { name: "Titus", code: "tt", aliases: &["tit", "ti"] },
    Book { name: "Philemon", code: "phm", aliases: &["phlm"] },
    Book { name: "Hebrews", code: "hb", aliases: &["heb"] },
    Book { name: "James", code: "jm", aliases: &["jas", "jam", "ja"] },
    Book { name: "1 Peter", code: "1pe", aliases: &["1pet", "1pt", "1p"] },
    Book { name: "2 Peter", code: "2pe", aliases: &["2pet", "2pt", "2p"] },
    Book { name: "1 John", code: "1jo", aliases: &["1joh", "1jn"] },
    Book { name: "2 John", code: "2jo", aliases: &["2joh", "2jn"] },
    Book { name: "3 John", code: "3jo", aliases: &["3joh", "3jn"] },
    Book { name: "Jude", code: "jd", aliases: &["jude"] },
    Book { name: "Revelation", code: "re", aliases: &["rev", "rv"] },
];

static BY_CODE: Lazy<HashMap<&'static str, &'static Book>> =
    Lazy::new(|| BOOKS.iter().map(|b| (b.code, b)).collect());

/// Strip all whitespace and case-fold, for designator comparison
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Look up a book by its short code
pub fn by_code(code: &str) -> Option<&'static Book> {
    BY_CODE.get(code).copied()
}

/// Resolve a free-text book designator to a canonical book.
///
/// Exact normalized equality only, checked against canonical names first,
/// then the alias sets, then short codes. Fuzzy matching belongs to the
/// rapid-selection engine, not here.
pub fn match_designator(text: &str) -> Option<&'static Book> {
    let query = normalize(text);
    if query.is_empty() {
        return None;
    }
    BOOKS
        .iter()
        .find(|b| normalize(b.name) == query)
        .or_else(|| BOOKS.iter().find(|b| b.aliases.contains(&query.as_str())))
        .or_else(|| BOOKS.iter().find(|b| b.code == query))
}
