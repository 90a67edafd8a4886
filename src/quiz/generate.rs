use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use super::{QuizError, QuizQuestion, ANSWER_COUNT};
use crate::words::{WordCategory, WordDatabase, WordEntry};

/// One correct answer plus three distractors, each from a different word.
pub const MIN_WORDS: usize = ANSWER_COUNT;

/// Builds up to `count` questions, one per randomly picked word, without
/// reusing a word. Fails when the database cannot supply four distinct words.
pub fn generate_questions<R: Rng + ?Sized>(
    database: &WordDatabase,
    count: usize,
    rng: &mut R,
) -> Result<Vec<QuizQuestion>, QuizError> {
    let words = database.all();
    if words.len() < MIN_WORDS {
        warn!(
            "Cannot generate a quiz from {} word(s), need at least {}",
            words.len(),
            MIN_WORDS
        );
        return Err(QuizError::NotEnoughWords {
            available: words.len(),
            required: MIN_WORDS,
        });
    }

    let picked = database.random_words(count, rng);
    let questions: Vec<QuizQuestion> = picked
        .into_iter()
        .map(|word| question_for(words, word, rng))
        .collect();

    debug!("Generated {} question(s) (asked for {})", questions.len(), count);
    Ok(questions)
}

fn question_for<R: Rng + ?Sized>(words: &[WordEntry], word: &WordEntry, rng: &mut R) -> QuizQuestion {
    let others: Vec<&WordEntry> = words.iter().filter(|w| w.id != word.id).collect();
    // choose_multiple already yields the distractors in random order, so
    // dropping the correct answer into a random slot gives a uniform shuffle
    let mut distractors = others
        .choose_multiple(rng, ANSWER_COUNT - 1)
        .map(|w| w.english_name.clone());

    let correct_index = rng.gen_range(0..ANSWER_COUNT);
    let answers: [String; ANSWER_COUNT] = std::array::from_fn(|slot| {
        if slot == correct_index {
            word.english_name.clone()
        } else {
            distractors.next().unwrap_or_default()
        }
    });

    let (question_en, question_vi) = prompt_for(word.category);
    QuizQuestion {
        image: word.media.icon.clone(),
        question_en: question_en.to_string(),
        question_vi: question_vi.to_string(),
        answers,
        correct_index,
        word_id: Some(word.id.clone()),
        hint_audio: word.media.pronounce_audio.clone(),
    }
}

fn prompt_for(category: WordCategory) -> (&'static str, &'static str) {
    match category {
        WordCategory::Animal => ("Which animal is this?", "Đây là con vật gì?"),
        WordCategory::Plant => ("Which plant is this?", "Đây là cây gì?"),
        WordCategory::Object => ("What is this object?", "Đây là đồ vật gì?"),
        WordCategory::Food => ("What food is this?", "Đây là món ăn gì?"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn database(names: &[&str]) -> WordDatabase {
        WordDatabase::new(
            names
                .iter()
                .map(|name| {
                    let mut entry = WordEntry::new(
                        format!("animal_{}", name.to_lowercase()),
                        WordCategory::Animal,
                        *name,
                        format!("Con {}", name),
                    );
                    entry.media.pronounce_audio = Some(format!("{}.wav", name.to_lowercase()));
                    entry
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn too_few_words() {
        let db = database(&["Cow", "Dog", "Cat"]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_questions(&db, 5, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            QuizError::NotEnoughWords { available: 3, required: 4 }
        ));
    }

    #[test]
    fn questions_are_well_formed() {
        let db = database(&["Cow", "Dog", "Cat", "Pig", "Duck", "Horse", "Goat"]);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let questions = generate_questions(&db, 5, &mut rng).unwrap();
            assert_eq!(questions.len(), 5);

            let sources: HashSet<_> = questions.iter().map(|q| q.word_id.clone()).collect();
            assert_eq!(sources.len(), 5, "a word was asked about twice");

            for question in &questions {
                let word = db.get(question.word_id.as_deref().unwrap()).unwrap();
                assert_eq!(question.correct_answer(), Some(word.english_name.as_str()));

                let unique: HashSet<_> = question.answers.iter().collect();
                assert_eq!(unique.len(), ANSWER_COUNT);
                for (i, answer) in question.answers.iter().enumerate() {
                    assert!(db.all().iter().any(|w| &w.english_name == answer));
                    if i != question.correct_index {
                        assert_ne!(answer, &word.english_name);
                    }
                }
                assert_eq!(question.hint_audio, word.media.pronounce_audio);
            }
        }
    }

    #[test]
    fn correct_slot_varies() {
        let db = database(&["Cow", "Dog", "Cat", "Pig"]);
        let mut rng = StdRng::seed_from_u64(42);
        let slots: HashSet<usize> = (0..50)
            .flat_map(|_| generate_questions(&db, 4, &mut rng).unwrap())
            .map(|q| q.correct_index)
            .collect();
        assert_eq!(slots.len(), ANSWER_COUNT);
    }

    #[test]
    fn prompt_follows_category() {
        let mut words = vec![WordEntry::new("food_apple", WordCategory::Food, "Apple", "Quả táo")];
        for name in ["Bread", "Rice", "Egg"] {
            words.push(WordEntry::new(format!("food_{name}"), WordCategory::Food, name, name));
        }
        let db = WordDatabase::new(words).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let questions = generate_questions(&db, 4, &mut rng).unwrap();
        assert!(questions.iter().all(|q| q.question_en == "What food is this?"));
        assert!(questions.iter().all(|q| q.image.is_none()));
    }
}
