//! Distractor selection for quiz questions (spec §4.6).

use crate::domain::{Item, QuestionType};
use rand::seq::SliceRandom;
use rand::Rng;

/// `(options[4], correct_index)` for a question about `item`.
pub fn synthesize(item: &Item, question_type: QuestionType, catalog: &[Item]) -> (Vec<String>, u8) {
    let correct_text = question_type.answer_field(item);

    let mut pool: Vec<&Item> = catalog.iter().filter(|i| i.number != item.number).collect();
    pool.shuffle(&mut rand::thread_rng());

    let mut distractors: Vec<String> = Vec::with_capacity(3);
    for candidate in &pool {
        if distractors.len() == 3 {
            break;
        }
        let text = question_type.answer_field(candidate);
        if text == correct_text || distractors.contains(&text) {
            continue;
        }
        distractors.push(text);
    }

    let mut placeholder = 0u8;
    while distractors.len() < 3 {
        let letter = (b'A' + placeholder) as char;
        distractors.push(format!("Variant {letter}"));
        placeholder += 1;
    }

    let correct_index = rand::thread_rng().gen_range(0..4u8);
    let mut options = Vec::with_capacity(4);
    let mut distractor_iter = distractors.into_iter();
    for i in 0..4u8 {
        if i == correct_index {
            options.push(correct_text.clone());
        } else {
            options.push(distractor_iter.next().expect("exactly 3 distractors"));
        }
    }

    (options, correct_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(n: usize) -> Vec<Item> {
        (1..=n)
            .map(|i| Item {
                number: i as u8,
                arabic: format!("arabic-{i}"),
                transliteration: format!("translit-{i}"),
                translation: format!("translation-{i}"),
                meaning: format!("meaning-{i}"),
                audio_ref: None,
            })
            .collect()
    }

    #[test]
    fn produces_four_distinct_options_containing_the_correct_answer() {
        let items = catalog(99);
        let target = items[4].clone();
        let (options, correct_index) =
            synthesize(&target, QuestionType::Translation, &items);
        assert_eq!(options.len(), 4);
        let unique: std::collections::HashSet<_> = options.iter().collect();
        assert_eq!(unique.len(), 4);
        assert_eq!(options[correct_index as usize], target.arabic);
    }

    #[test]
    fn falls_back_to_placeholders_when_catalog_is_too_small() {
        let items = catalog(1);
        let target = items[0].clone();
        let (options, correct_index) =
            synthesize(&target, QuestionType::Meaning, &items);
        assert_eq!(options.len(), 4);
        assert_eq!(options[correct_index as usize], target.transliteration);
        let placeholders: Vec<_> = options
            .iter()
            .filter(|o| o.starts_with("Variant "))
            .collect();
        assert_eq!(placeholders.len(), 3);
    }

    #[test]
    fn correct_index_is_always_in_range() {
        let items = catalog(50);
        for item in &items {
            let (_, idx) = synthesize(item, QuestionType::Arabic, &items);
            assert!(idx < 4);
        }
    }
}
