use super::domain::{CategoricalField, FieldDistribution, Individual};
use std::collections::BTreeMap;

/// Value counts and ratios for every balanced field, in `fields` order.
///
/// Values are bucketed case-insensitively and displayed with the casing the
/// field declares (falling back to the first casing seen among `members`).
/// Must be re-run whenever a group's membership changes.
pub fn compute_distributions(
    members: &[Individual],
    fields: &[CategoricalField],
    balance_fields: &[String],
) -> Vec<FieldDistribution> {
    fields
        .iter()
        .filter(|field| balance_fields.contains(&field.key))
        .map(|field| distribution_for(members, field))
        .collect()
}

fn distribution_for(members: &[Individual], field: &CategoricalField) -> FieldDistribution {
    let mut by_key: BTreeMap<String, (String, usize)> = BTreeMap::new();

    for member in members {
        let Some(raw) = member.value(&field.key) else {
            continue;
        };
        let key = raw.to_lowercase();
        let entry = by_key.entry(key).or_insert_with_key(|key| {
            let display = field.declared_value(key).unwrap_or(raw);
            (display.to_string(), 0)
        });
        entry.1 += 1;
    }

    let size = members.len();
    let mut counts = BTreeMap::new();
    let mut ratios = BTreeMap::new();
    for (display, count) in by_key.into_values() {
        let ratio = if size > 0 {
            count as f64 / size as f64
        } else {
            0.0
        };
        ratios.insert(display.clone(), ratio);
        counts.insert(display, count);
    }

    FieldDistribution {
        key: field.key.clone(),
        label: field.label.clone(),
        counts,
        ratios,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(gender: &str, entity: &str) -> Individual {
        Individual::new("p")
            .with_criterion("gender", gender)
            .with_criterion("entity", entity)
    }

    fn fields() -> Vec<CategoricalField> {
        vec![
            CategoricalField::new("gender", "Gender", vec!["Female".into(), "Male".into()]),
            CategoricalField::new("entity", "Entity", vec!["MKT".into(), "OPS".into()]),
        ]
    }

    #[test]
    fn only_balanced_fields_are_reported_in_field_order() {
        let members = vec![person("Female", "MKT")];
        let metrics = compute_distributions(
            &members,
            &fields(),
            &["entity".to_string(), "gender".to_string(), "unknown".to_string()],
        );
        let keys: Vec<_> = metrics.iter().map(|metric| metric.key.as_str()).collect();
        assert_eq!(keys, vec!["gender", "entity"]);
    }

    #[test]
    fn missing_values_reduce_the_ratio_total() {
        let members = vec![person("Female", "MKT"), person("", "OPS"), person("Male", "")];
        let metrics = compute_distributions(&members, &fields(), &["gender".to_string()]);
        let gender = &metrics[0];

        assert_eq!(gender.total(), 2);
        assert_eq!(gender.count("Female"), 1);
        assert!((gender.ratio("Male") - 1.0 / 3.0).abs() < 1e-12);
        let ratio_sum: f64 = gender.ratios.values().sum();
        assert!(ratio_sum < 1.0);
    }

    #[test]
    fn values_differing_only_by_case_share_a_bucket() {
        let members = vec![person("female", "mkt"), person("FEMALE", "MKT")];
        let metrics = compute_distributions(&members, &fields(), &["entity".to_string()]);
        let entity = &metrics[0];

        assert_eq!(entity.counts.len(), 1);
        assert_eq!(entity.count("MKT"), 2);
        assert_eq!(entity.ratio("MKT"), 1.0);
    }

    #[test]
    fn empty_member_list_yields_empty_distributions() {
        let metrics = compute_distributions(&[], &fields(), &["gender".to_string()]);
        assert_eq!(metrics.len(), 1);
        assert!(metrics[0].counts.is_empty());
        assert!(metrics[0].ratios.is_empty());
    }
}
