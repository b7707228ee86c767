use crate::recipe_record::RecipeRecord;

/// Keeps the recipes whose ingredient text contains every term, ignoring case.
///
/// Terms match as substrings anywhere in the serialized ingredient list and
/// in any order, so "garlic" matches both "GARLIC" and "garlic powder".
/// An empty term list keeps every recipe. Row order is preserved.
pub fn filter_by_ingredients<'a, S: AsRef<str>>(
    recipes: &'a [RecipeRecord],
    terms: &[S],
) -> Vec<&'a RecipeRecord> {
    let lowered_terms: Vec<String> = terms.iter().map(|t| t.as_ref().to_lowercase()).collect();
    if lowered_terms.is_empty() {
        return recipes.iter().collect();
    }

    recipes
        .iter()
        .filter(|recipe| {
            let haystack = recipe.ingredient_parts.to_lowercase();
            lowered_terms.iter().all(|term| haystack.contains(term.as_str()))
        })
        .collect()
}

/// Splits free-form user input such as `"chicken, garlic ,"` into trimmed,
/// non-empty ingredient terms.
pub fn parse_ingredient_terms(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_record::Nutrients;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn recipe(id: i64, ingredients: &str) -> RecipeRecord {
        RecipeRecord {
            recipe_id: Some(id),
            name: format!("Recipe {}", id),
            cook_time: String::new(),
            prep_time: String::new(),
            total_time: String::new(),
            ingredient_parts: ingredients.to_string(),
            nutrients: Nutrients::default(),
            instructions: "c()".to_string(),
            images: None,
        }
    }

    #[test]
    fn test_all_terms_required_case_insensitive() {
        let data = vec![
            recipe(1, "Chicken breast, GARLIC, paprika"),
            recipe(2, "Chicken breast, paprika"),
        ];
        let filtered = filter_by_ingredients(&data, &["chicken", "garlic"]);
        let ids: Vec<Option<i64>> = filtered.iter().map(|r| r.recipe_id).collect();
        assert_eq!(ids, vec![Some(1)]);
    }

    #[test]
    fn test_term_order_does_not_matter() {
        let data = vec![recipe(1, r#"c("garlic powder", "chicken")"#)];
        assert_eq!(filter_by_ingredients(&data, &["Chicken", "garlic"]).len(), 1);
        assert_eq!(filter_by_ingredients(&data, &["garlic", "chicken"]).len(), 1);
    }

    #[test]
    fn test_empty_terms_keep_everything() {
        let data = vec![recipe(1, "egg"), recipe(2, "milk")];
        let terms: Vec<String> = Vec::new();
        assert_eq!(filter_by_ingredients(&data, &terms).len(), 2);
    }

    #[test]
    fn test_no_match_gives_empty_pool() {
        let data = vec![recipe(1, "egg"), recipe(2, "milk")];
        assert!(filter_by_ingredients(&data, &["saffron"]).is_empty());
    }

    #[test]
    fn test_filter_partitions_dataset() {
        let vocabulary = ["egg", "Milk", "FLOUR", "garlic", "onion", "butter"];
        let mut rng = StdRng::seed_from_u64(7);
        let data: Vec<RecipeRecord> = (0..50)
            .map(|i| {
                let picked: Vec<&str> = vocabulary.choose_multiple(&mut rng, 3).copied().collect();
                recipe(i, &picked.join(", "))
            })
            .collect();
        let terms = ["milk", "egg"];

        let kept = filter_by_ingredients(&data, &terms);
        let contains_all = |r: &RecipeRecord| {
            let text = r.ingredient_parts.to_lowercase();
            terms.iter().all(|t| text.contains(t))
        };
        assert!(kept.iter().all(|r| contains_all(*r)));

        let kept_ids: Vec<Option<i64>> = kept.iter().map(|r| r.recipe_id).collect();
        for r in data.iter().filter(|r| !kept_ids.contains(&r.recipe_id)) {
            assert!(!contains_all(r));
        }
    }

    #[test]
    fn test_parse_ingredient_terms() {
        assert_eq!(parse_ingredient_terms(" chicken, garlic ,, "), vec!["chicken", "garlic"]);
        assert!(parse_ingredient_terms("   ").is_empty());
    }
}
