use crate::error::Result;
use crate::heuristics::fallback::FallbackChain;
use crate::heuristics::text::{contains_word, remove_words, strip_punctuation, title_case};
use crate::nlp::{EntityLabel, NlpModel};

/// Guess who created a collection from its title, then its short description.
pub fn infer_collection_creator<S: AsRef<str>>(
    nlp: &dyn NlpModel,
    noise_words: &[S],
    title: &str,
    description: &str,
) -> Result<String> {
    FallbackChain::new("collection_creator")
        .then("title_entities", || Ok(creator_from_title(nlp, noise_words, title)))
        .then("description_entities", || Ok(creator_from_description(nlp, description)))
        .resolve()
}

/// People and organizations named in the title, title-cased.
///
/// Organizations are ignored once a person has been seen. Several candidates
/// are joined with " and " when the title itself uses "and"; otherwise the
/// first person wins, then the first organization.
pub fn creator_from_title<S: AsRef<str>>(
    nlp: &dyn NlpModel,
    noise_words: &[S],
    title: &str,
) -> String {
    let cleaned = remove_words(&strip_punctuation(title), noise_words);
    let joined_by_and = contains_word(&cleaned, "and");

    let mut person_seen = false;
    let mut candidates: Vec<(String, bool)> = Vec::new();
    for entity in nlp.entities(&cleaned) {
        match entity.label {
            EntityLabel::Person => {
                person_seen = true;
                candidates.push((title_case(&entity.text), true));
            }
            EntityLabel::Organization if !person_seen => {
                candidates.push((title_case(&entity.text), false));
            }
            _ => {}
        }
    }

    if joined_by_and && candidates.len() >= 2 {
        return candidates
            .into_iter()
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
            .join(" and ");
    }
    candidates
        .iter()
        .find(|(_, is_person)| *is_person)
        .or_else(|| candidates.first())
        .map(|(name, _)| name.clone())
        .unwrap_or_default()
}

/// First person named in the description, else the last organization.
pub fn creator_from_description(nlp: &dyn NlpModel, description: &str) -> String {
    let mut last_org = String::new();
    for entity in nlp.entities(description) {
        match entity.label {
            EntityLabel::Person => return title_case(&entity.text),
            EntityLabel::Organization => last_org = entity.text,
            EntityLabel::Other(_) => {}
        }
    }
    last_org
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::Entity;
    use crate::test_support::FakeNlp;

    const NOISE: [&str; 4] = ["Collection", "The", "Sheet", "Music"];

    #[test]
    fn test_single_person_from_title() {
        let nlp = FakeNlp::new().entities_for(
            "Johann Bach",
            vec![Entity::new("Johann Bach", EntityLabel::Person)],
        );
        let creator =
            infer_collection_creator(&nlp, &NOISE, "The Johann Bach Collection", "").unwrap();
        assert_eq!(creator, "Johann Bach");
    }

    #[test]
    fn test_candidates_joined_when_title_uses_and() {
        let nlp = FakeNlp::new().entities_for(
            "Rodgers and Hammerstein",
            vec![
                Entity::new("rodgers", EntityLabel::Person),
                Entity::new("hammerstein", EntityLabel::Person),
            ],
        );
        let creator = creator_from_title(&nlp, &NOISE, "The Rodgers and Hammerstein Collection");
        assert_eq!(creator, "Rodgers and Hammerstein");
    }

    #[test]
    fn test_person_preferred_over_earlier_organization() {
        let nlp = FakeNlp::new().entities_for(
            "Aeolian Company Rolls Edited by Frank Milne",
            vec![
                Entity::new("Aeolian Company", EntityLabel::Organization),
                Entity::new("Frank Milne", EntityLabel::Person),
                Entity::new("Duo-Art", EntityLabel::Organization),
            ],
        );
        let creator = creator_from_title(
            &nlp,
            &NOISE,
            "Aeolian Company Rolls, Edited by Frank Milne",
        );
        assert_eq!(creator, "Frank Milne");
    }

    #[test]
    fn test_organization_alone() {
        let nlp = FakeNlp::new().entities_for(
            "Ampico Roll Company",
            vec![Entity::new("AMPICO ROLL COMPANY", EntityLabel::Organization)],
        );
        assert_eq!(
            creator_from_title(&nlp, &NOISE, "Ampico Roll Company"),
            "Ampico Roll Company"
        );
    }

    #[test]
    fn test_falls_back_to_description_person() {
        let description = "Collected by the Welte Society and Edwin Welte.";
        let nlp = FakeNlp::new().entities_for(
            description,
            vec![
                Entity::new("Welte Society", EntityLabel::Organization),
                Entity::new("edwin welte", EntityLabel::Person),
                Entity::new("Karl Bockisch", EntityLabel::Person),
            ],
        );
        let creator =
            infer_collection_creator(&nlp, &NOISE, "Piano Rolls", description).unwrap();
        assert_eq!(creator, "Edwin Welte");
    }

    #[test]
    fn test_description_last_organization() {
        let description = "Rolls from the Aeolian Company and QRS.";
        let nlp = FakeNlp::new().entities_for(
            description,
            vec![
                Entity::new("Aeolian Company", EntityLabel::Organization),
                Entity::new("QRS", EntityLabel::Organization),
            ],
        );
        assert_eq!(creator_from_description(&nlp, description), "QRS");
    }

    #[test]
    fn test_nothing_found() {
        let nlp = FakeNlp::new();
        let creator = infer_collection_creator(&nlp, &NOISE, "Piano Rolls", "Rolls.").unwrap();
        assert_eq!(creator, "");
    }
}
