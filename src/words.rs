use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum WordCategory {
    Animal,
    Plant,
    Object,
    Food,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Vietnamese,
}

/// Asset references for one word. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WordMedia {
    pub model: Option<String>,
    pub icon: Option<String>,
    pub pronounce_audio: Option<String>,
    pub sfx_audio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationNames {
    pub walk: String,
    pub attack: String,
}

impl Default for AnimationNames {
    fn default() -> Self {
        Self {
            walk: "Walk".to_string(),
            attack: "Attack".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WordEntry {
    pub id: String,
    pub category: WordCategory,
    pub english_name: String,
    pub vietnamese_name: String,
    #[serde(default)]
    pub pronunciation: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vietnamese_description: String,
    #[serde(default)]
    pub media: WordMedia,
    #[serde(default)]
    pub animations: AnimationNames,
}

impl WordEntry {
    pub fn new(
        id: impl Into<String>,
        category: WordCategory,
        english_name: impl Into<String>,
        vietnamese_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            english_name: english_name.into(),
            vietnamese_name: vietnamese_name.into(),
            pronunciation: String::new(),
            description: String::new(),
            vietnamese_description: String::new(),
            media: WordMedia::default(),
            animations: AnimationNames::default(),
        }
    }

    // Only animals ship with a rigged model.
    pub fn has_animations(&self) -> bool {
        self.category == WordCategory::Animal
    }

    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english_name,
            Language::Vietnamese => &self.vietnamese_name,
        }
    }

    pub fn description(&self, language: Language) -> &str {
        match language {
            Language::English => &self.description,
            Language::Vietnamese => &self.vietnamese_description,
        }
    }
}

#[derive(Debug)]
pub enum DatabaseError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    DuplicateId(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::Io(err) => write!(f, "failed to read word database: {}", err),
            DatabaseError::Parse(err) => write!(f, "failed to parse word database: {}", err),
            DatabaseError::DuplicateId(id) => write!(f, "duplicate word id '{}'", id),
        }
    }
}

impl std::error::Error for DatabaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatabaseError::Io(err) => Some(err),
            DatabaseError::Parse(err) => Some(err),
            DatabaseError::DuplicateId(_) => None,
        }
    }
}

impl From<std::io::Error> for DatabaseError {
    fn from(err: std::io::Error) -> Self {
        DatabaseError::Io(err)
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::Parse(err)
    }
}

/// Read-only vocabulary, keyed by word id. Ids are unique.
#[derive(Debug, Clone, Default)]
pub struct WordDatabase {
    words: Vec<WordEntry>,
    by_id: HashMap<String, usize>,
}

impl WordDatabase {
    pub fn new(words: Vec<WordEntry>) -> Result<Self, DatabaseError> {
        let mut by_id = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if by_id.insert(word.id.clone(), i).is_some() {
                warn!("Word id '{}' appears more than once", word.id);
                return Err(DatabaseError::DuplicateId(word.id.clone()));
            }
        }
        Ok(Self { words, by_id })
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, DatabaseError> {
        let words: Vec<WordEntry> = serde_json::from_reader(reader)?;
        Self::new(words)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let database = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!("Loaded {} words from {}", database.len(), path.display());
        Ok(database)
    }

    pub fn get(&self, id: &str) -> Option<&WordEntry> {
        self.by_id.get(id).map(|&i| &self.words[i])
    }

    pub fn all(&self) -> &[WordEntry] {
        &self.words
    }

    /// Case-insensitive substring match on the English or Vietnamese name.
    /// An empty query returns every word.
    pub fn search(&self, text: &str) -> Vec<&WordEntry> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return self.words.iter().collect();
        }
        self.words
            .iter()
            .filter(|w| {
                w.english_name.to_lowercase().contains(&needle)
                    || w.vietnamese_name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Up to `count` distinct words in random order.
    pub fn random_words<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&WordEntry> {
        self.words.choose_multiple(rng, count).collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn farm() -> WordDatabase {
        WordDatabase::new(vec![
            WordEntry::new("animal_cow", WordCategory::Animal, "Cow", "Con bò"),
            WordEntry::new("animal_dog", WordCategory::Animal, "Dog", "Con chó"),
            WordEntry::new("plant_rose", WordCategory::Plant, "Rose", "Hoa hồng"),
            WordEntry::new("food_apple", WordCategory::Food, "Apple", "Quả táo"),
        ])
        .unwrap()
    }

    #[test]
    fn lookup_by_id() {
        let db = farm();
        assert_eq!(db.get("animal_dog").map(|w| w.english_name.as_str()), Some("Dog"));
        assert!(db.get("animal_lion").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = WordDatabase::new(vec![
            WordEntry::new("animal_cow", WordCategory::Animal, "Cow", "Con bò"),
            WordEntry::new("animal_cow", WordCategory::Animal, "Calf", "Con bê"),
        ])
        .unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateId(id) if id == "animal_cow"));
    }

    #[test]
    fn search_matches_either_language() {
        let db = farm();
        let ids = |found: Vec<&WordEntry>| found.iter().map(|w| w.id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(db.search("DO")), vec!["animal_dog"]);
        assert_eq!(ids(db.search("hoa")), vec!["plant_rose"]);
        assert_eq!(ids(db.search("con")), vec!["animal_cow", "animal_dog"]);
        assert_eq!(db.search("  ").len(), 4);
        assert!(db.search("zebra").is_empty());
    }

    #[test]
    fn only_animals_animate() {
        let db = farm();
        assert!(db.get("animal_cow").unwrap().has_animations());
        assert!(!db.get("food_apple").unwrap().has_animations());
    }

    #[test]
    fn random_words_are_distinct_and_clamped() {
        let db = farm();
        let mut rng = StdRng::seed_from_u64(7);
        let picked = db.random_words(10, &mut rng);
        assert_eq!(picked.len(), 4);
        let unique: HashSet<_> = picked.iter().map(|w| &w.id).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn parses_json_with_defaults() {
        let json = r#"[
            {"id": "animal_cat", "category": "Animal", "english_name": "Cat", "vietnamese_name": "Con mèo",
             "pronunciation": "/kæt/", "media": {"icon": "icons/cat.png"}}
        ]"#;
        let db = WordDatabase::from_reader(json.as_bytes()).unwrap();
        let cat = db.get("animal_cat").unwrap();

        assert_eq!(cat.pronunciation, "/kæt/");
        assert_eq!(cat.media.icon.as_deref(), Some("icons/cat.png"));
        assert_eq!(cat.media.pronounce_audio, None);
        assert_eq!(cat.animations.walk, "Walk");
        assert_eq!(cat.name(Language::Vietnamese), "Con mèo");
    }
}
