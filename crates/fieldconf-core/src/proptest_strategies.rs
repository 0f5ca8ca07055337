//! Property-based testing strategies for generating test data
//!
//! Strategies for well-formed threshold configs, fields and contexts, plus
//! the properties that only make sense with access to crate internals.

#![cfg(test)]

use crate::context::OverrideContext;
use crate::thresholds::{Threshold, ThresholdsConfig, ThresholdsMode};
use crate::types::{DataFrame, Field};
use crate::validation::validate_thresholds;
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use serde_json::json;

/// Strategy for generating threshold modes other than field based
pub fn plain_mode_strategy() -> impl Strategy<Value = ThresholdsMode> {
    prop_oneof![Just(ThresholdsMode::Absolute), Just(ThresholdsMode::Percentage)]
}

/// Strategy for generating colors
pub fn color_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("green".to_string()),
        Just("red".to_string()),
        "#[0-9a-f]{6}",
    ]
}

/// Strategy for generating sorted, sentinel-led threshold configs
pub fn thresholds_strategy() -> impl Strategy<Value = ThresholdsConfig> {
    (
        plain_mode_strategy(),
        color_strategy(),
        vec((0.0f64..=1.0, color_strategy()), 0..6),
    )
        .prop_map(|(mode, base_color, mut rest)| {
            rest.sort_by(|a, b| a.0.total_cmp(&b.0));
            let mut steps = vec![Threshold::base(base_color)];
            steps.extend(rest.into_iter().map(|(v, c)| Threshold::new(v, c)));
            ThresholdsConfig::new(mode, steps)
        })
}

/// Strategy for generating a field with labels
pub fn labeled_field_strategy() -> impl Strategy<Value = Field> {
    (
        "[a-z]{1,8}",
        btree_map("[a-z_]{1,8}", "[a-zA-Z0-9-]{1,12}", 0..4),
    )
        .prop_map(|(name, labels)| Field {
            name,
            labels: Some(labels),
            ..Field::default()
        })
}

/// Strategy for generating a context with string-valued series fields
pub fn context_strategy() -> impl Strategy<Value = OverrideContext> {
    (
        labeled_field_strategy(),
        vec(vec(("[a-z]{1,8}", "[a-z0-9-]{0,10}"), 0..4), 0..3),
    )
        .prop_map(|(field, frames)| {
            let data = frames
                .into_iter()
                .map(|fields| {
                    DataFrame::new(
                        fields
                            .into_iter()
                            .map(|(name, first)| Field::new(name).with_values(vec![json!(first)]))
                            .collect(),
                    )
                })
                .collect();
            OverrideContext::new(field, data)
        })
}

proptest! {
    #[test]
    fn generated_thresholds_validate_clean(cfg in thresholds_strategy()) {
        let issues = validate_thresholds(&cfg)
            .into_iter()
            .filter(|i| i.severity == crate::Severity::Error)
            .count();
        prop_assert_eq!(issues, 0);
    }

    #[test]
    fn active_step_never_exceeds_reading(cfg in thresholds_strategy(), reading in -10.0f64..10.0) {
        let step = cfg.active_step(reading).unwrap();
        prop_assert!(step.is_base() || step.value <= reading);
    }

    #[test]
    fn every_label_resolves_to_itself(ctx in context_strategy()) {
        for (name, value) in ctx.field.labels.clone().unwrap_or_default() {
            let token = format!("&&({})", name);
            prop_assert_eq!(crate::template::resolve_field_tokens(&token, &ctx), value);
        }
    }
}
