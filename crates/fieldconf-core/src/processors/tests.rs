//! Tests for the override processor registry
//!
//! Covers each built-in processor, the dispatch table, settings decoding and
//! the validation stage wired into the pipeline.
//!
//! Copyright (c) 2025 Fieldconf Team
//! Licensed under the Apache-2.0 license

#[cfg(test)]
mod tests {
    use super::super::{
        built_in,
        FieldConfigKind, FieldConfigValue, OptionsLoader, OverridePipeline, OverrideRequest,
        ProcessorSettings, SelectFieldConfigSettings, StringFieldConfigSettings,
    };
    use crate::context::OverrideContext;
    use crate::error::{Error, Result};
    use crate::thresholds::{Threshold, ThresholdsConfig, ThresholdsMode};
    use crate::types::{DataFrame, Field, ScopedVar, ScopedVars, SelectableValue};
    use crate::validation::ValidationMode;
    use crate::variables::ScopedVarsReplacer;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn create_test_context() -> OverrideContext {
        let field = Field::new("cpu")
            .with_label("region", "us-east")
            .with_scoped_var("env", ScopedVar::new("prod", json!("prod")));

        OverrideContext::for_field(field).with_frame(DataFrame::new(vec![
            Field::new("host").with_values(vec![json!("node-7")]),
        ]))
    }

    fn string_settings(expand: bool) -> ProcessorSettings {
        ProcessorSettings::String(StringFieldConfigSettings {
            expand_template_vars: Some(expand),
            ..Default::default()
        })
    }

    fn settings(kind: FieldConfigKind) -> ProcessorSettings {
        ProcessorSettings::default_for(kind)
    }

    #[test]
    fn test_number_parses_numeric_strings() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();

        let value = pipeline.process(Some(&json!("3.14")), &ctx, &settings(FieldConfigKind::Number));
        assert_eq!(value, FieldConfigValue::Number(3.14));

        let value = pipeline.process(Some(&json!(42)), &ctx, &settings(FieldConfigKind::Number));
        assert_eq!(value, FieldConfigValue::Number(42.0));
    }

    #[test]
    fn test_number_nan_for_garbage() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();

        for input in [json!("abc"), json!(""), json!(true), json!({"a": 1})] {
            let value = pipeline.process(Some(&input), &ctx, &settings(FieldConfigKind::Number));
            assert!(value.is_nan(), "expected NaN for {}", input);
        }
    }

    #[test]
    fn test_number_absence_is_not_coerced() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();

        assert!(pipeline.process(None, &ctx, &settings(FieldConfigKind::Number)).is_undefined());
        assert!(pipeline
            .process(Some(&Value::Null), &ctx, &settings(FieldConfigKind::Number))
            .is_undefined());
    }

    #[test]
    fn test_parse_float_prefix_semantics() {
        assert_eq!(built_in::parse_float("  42px"), 42.0);
        assert_eq!(built_in::parse_float("3.5e2 units"), 350.0);
        assert_eq!(built_in::parse_float(".5"), 0.5);
        assert_eq!(built_in::parse_float("-7."), -7.0);
        assert_eq!(built_in::parse_float("1e"), 1.0);
        assert_eq!(built_in::parse_float("Infinity"), f64::INFINITY);
        assert_eq!(built_in::parse_float("-Infinity and beyond"), f64::NEG_INFINITY);
        assert!(built_in::parse_float("0x").eq(&0.0));
        assert!(built_in::parse_float("x1").is_nan());
        assert!(built_in::parse_float("inf").is_nan());
        assert_eq!(built_in::parse_float("1,2"), 1.0);
    }

    #[test]
    fn test_number_array_uses_joined_string() {
        let value = built_in::number_override_processor(
            Some(&json!([7, 8])),
            &OverrideContext::default(),
            &Default::default(),
        );
        assert_eq!(value, FieldConfigValue::Number(7.0));
    }

    #[test]
    fn test_string_resolves_labels_and_data() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();

        let value = pipeline.process(Some(&json!("&&(region)")), &ctx, &string_settings(false));
        assert_eq!(value, FieldConfigValue::String("us-east".to_string()));

        let value = pipeline.process(Some(&json!("&&(host)")), &ctx, &string_settings(false));
        assert_eq!(value, FieldConfigValue::String("node-7".to_string()));

        let value = pipeline.process(Some(&json!("&&(missing)")), &ctx, &string_settings(false));
        assert_eq!(value, FieldConfigValue::String("undefined".to_string()));
    }

    #[test]
    fn test_string_nullish_pass_through() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();

        assert_eq!(pipeline.process(None, &ctx, &string_settings(true)), FieldConfigValue::Undefined);
        assert_eq!(
            pipeline.process(Some(&Value::Null), &ctx, &string_settings(true)),
            FieldConfigValue::Null
        );
    }

    #[test]
    fn test_string_coerces_non_strings() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();

        let value = pipeline.process(Some(&json!(12.0)), &ctx, &string_settings(false));
        assert_eq!(value.as_str(), Some("12"));

        let value = pipeline.process(Some(&json!(false)), &ctx, &string_settings(false));
        assert_eq!(value.as_str(), Some("false"));
    }

    #[test]
    fn test_string_expansion_is_opt_in() {
        let pipeline = OverridePipeline::builder()
            .variable_replacer(ScopedVarsReplacer::new())
            .build();
        let ctx = create_test_context();
        let input = json!("&&(region)/$env");

        let value = pipeline.process(Some(&input), &ctx, &string_settings(false));
        assert_eq!(value.as_str(), Some("us-east/$env"));

        let value = pipeline.process(Some(&input), &ctx, &string_settings(true));
        assert_eq!(value.as_str(), Some("us-east/prod"));
    }

    #[test]
    fn test_string_expansion_without_replacer() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();

        let value = pipeline.process(Some(&json!("$env")), &ctx, &string_settings(true));
        assert_eq!(value.as_str(), Some("$env"));
    }

    #[test]
    fn test_replacer_receives_field_scoped_vars() {
        let pipeline = OverridePipeline::builder()
            .variable_replacer(|template: &str, vars: &ScopedVars| {
                format!("{}|{}", template, vars.len())
            })
            .build();

        let value = pipeline.process(Some(&json!("x")), &create_test_context(), &string_settings(true));
        assert_eq!(value.as_str(), Some("x|1"));

        let value = pipeline.process(Some(&json!("x")), &OverrideContext::default(), &string_settings(true));
        assert_eq!(value.as_str(), Some("x|0"));
    }

    #[test]
    fn test_string_is_idempotent_once_resolved() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();

        let first = pipeline.process(Some(&json!("at &&(host)")), &ctx, &string_settings(false));
        let second = pipeline.process(first.to_json().as_ref(), &ctx, &string_settings(false));
        assert_eq!(first, second);
    }

    #[test]
    fn test_thresholds_round_trip() {
        let pipeline = OverridePipeline::new();
        let cfg = ThresholdsConfig::new(
            ThresholdsMode::Absolute,
            vec![Threshold::base("green"), Threshold::new(80.0, "red")],
        );
        let raw = serde_json::to_value(&cfg).unwrap();

        let value = pipeline.process(Some(&raw), &create_test_context(), &settings(FieldConfigKind::Thresholds));
        assert_eq!(value.as_thresholds(), Some(&cfg));
    }

    #[test]
    fn test_thresholds_accept_unsorted_without_validation() {
        let pipeline = OverridePipeline::new();
        let raw = json!({
            "mode": "absolute",
            "steps": [{"value": 90, "color": "red"}, {"value": 10, "color": "green"}]
        });

        let value = pipeline.process(Some(&raw), &create_test_context(), &settings(FieldConfigKind::Thresholds));
        let cfg = value.as_thresholds().unwrap();
        assert_eq!(cfg.steps[0].value, 90.0);
        assert_eq!(cfg.steps[1].value, 10.0);
    }

    #[test]
    fn test_structural_kinds_fall_back_to_raw() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();
        let raw = json!("definitely not a list");

        for kind in [FieldConfigKind::DataLinks, FieldConfigKind::ValueMappings, FieldConfigKind::Thresholds] {
            let value = pipeline.process(Some(&raw), &ctx, &settings(kind));
            assert_eq!(value, FieldConfigValue::Raw(raw.clone()), "kind {}", kind);
        }
    }

    #[test]
    fn test_data_links_and_mappings_decode() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();

        let links = pipeline.process(
            Some(&json!([{"title": "Host", "url": "/d/host?var-host=${__value.raw}"}])),
            &ctx,
            &settings(FieldConfigKind::DataLinks),
        );
        match links {
            FieldConfigValue::Links(links) => assert_eq!(links[0].title, "Host"),
            other => panic!("expected links, got {:?}", other),
        }

        let mappings = pipeline.process(
            Some(&json!([{"id": 0, "operator": "", "text": "Off", "type": 1, "value": "0"}])),
            &ctx,
            &settings(FieldConfigKind::ValueMappings),
        );
        match mappings {
            FieldConfigValue::Mappings(mappings) => assert_eq!(mappings[0].text, "Off"),
            other => panic!("expected mappings, got {:?}", other),
        }
    }

    #[test]
    fn test_pass_through_kinds() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();
        let inputs = [json!("ms"), json!(5), json!({"nested": [1, 2]}), Value::Null];

        for kind in [
            FieldConfigKind::Identity,
            FieldConfigKind::Select,
            FieldConfigKind::Unit,
            FieldConfigKind::Color,
        ] {
            for input in &inputs {
                let value = pipeline.process(Some(input), &ctx, &settings(kind));
                assert_eq!(value, FieldConfigValue::Raw(input.clone()));
            }
            assert!(pipeline.process(None, &ctx, &settings(kind)).is_undefined());
        }
    }

    #[test]
    fn test_select_ignores_settings() {
        let pipeline = OverridePipeline::new();
        let select = ProcessorSettings::Select(SelectFieldConfigSettings::with_options(vec![
            SelectableValue::new(json!("a"), "A"),
        ]));

        let value = pipeline.process(Some(&json!("not-an-option")), &create_test_context(), &select);
        assert_eq!(value, FieldConfigValue::Raw(json!("not-an-option")));
    }

    #[test]
    fn test_boolean() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();

        assert_eq!(
            pipeline.process(Some(&json!(true)), &ctx, &settings(FieldConfigKind::Boolean)),
            FieldConfigValue::Boolean(true)
        );
        assert_eq!(
            pipeline.process(Some(&json!("yes")), &ctx, &settings(FieldConfigKind::Boolean)),
            FieldConfigValue::Raw(json!("yes"))
        );
    }

    #[test]
    fn test_every_kind_dispatches() {
        let pipeline = OverridePipeline::new();
        let ctx = create_test_context();

        for kind in FieldConfigKind::ALL {
            let settings = ProcessorSettings::default_for(kind);
            assert_eq!(settings.kind(), kind);
            assert!(pipeline.process(None, &ctx, &settings).is_undefined());
        }
        assert!(!FieldConfigKind::Color.has_processor());
        assert!(FieldConfigKind::Thresholds.has_processor());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("dataLinks".parse::<FieldConfigKind>().unwrap(), FieldConfigKind::DataLinks);
        assert_eq!("valuemappings".parse::<FieldConfigKind>().unwrap(), FieldConfigKind::ValueMappings);
        assert!(matches!("gauge".parse::<FieldConfigKind>(), Err(Error::UnknownKind { .. })));

        let kind: FieldConfigKind = serde_json::from_value(json!("valueMappings")).unwrap();
        assert_eq!(kind.to_string(), "valueMappings");
    }

    #[test]
    fn test_settings_decode() {
        let decoded = ProcessorSettings::decode(
            FieldConfigKind::String,
            Some(&json!({"expandTemplateVars": true, "maxLength": 20, "unknown": 1})),
        )
        .unwrap();
        match decoded {
            ProcessorSettings::String(s) => {
                assert!(s.expands_template_vars());
                assert_eq!(s.max_length, Some(20));
            }
            other => panic!("expected string settings, got {:?}", other),
        }

        let defaults = ProcessorSettings::decode(FieldConfigKind::Number, Some(&Value::Null)).unwrap();
        assert_eq!(defaults.kind(), FieldConfigKind::Number);

        let bad = ProcessorSettings::decode(FieldConfigKind::Number, Some(&json!({"min": "low"})));
        assert!(matches!(bad, Err(Error::Settings { .. })));
    }

    #[test]
    fn test_request_keeps_null_distinct_from_absent() {
        let with_null: OverrideRequest =
            serde_json::from_value(json!({"kind": "string", "value": null})).unwrap();
        assert_eq!(with_null.value, Some(Value::Null));

        let absent: OverrideRequest = serde_json::from_value(json!({"kind": "string"})).unwrap();
        assert_eq!(absent.value, None);
    }

    #[test]
    fn test_apply_request() {
        let request: OverrideRequest = serde_json::from_value(json!({
            "kind": "string",
            "value": "&&(site)",
            "settings": {"expandTemplateVars": false},
            "context": {
                "field": {"name": "temp", "labels": {"site": "lab-3"}},
                "data": []
            }
        }))
        .unwrap();

        let processed = OverridePipeline::new().apply_request(&request).unwrap();
        assert_eq!(processed.kind, FieldConfigKind::String);
        assert_eq!(processed.value.as_str(), Some("lab-3"));
        assert!(processed.report.is_clean());
    }

    #[test]
    fn test_strict_rejects_missing_sentinel() {
        let pipeline = OverridePipeline::builder().strict().build();
        let raw = json!({"mode": "absolute", "steps": [{"value": 10, "color": "red"}]});

        let result = pipeline.apply(Some(&raw), &create_test_context(), &settings(FieldConfigKind::Thresholds));
        match result {
            Err(Error::Validation { path, .. }) => assert_eq!(path, "steps[0].value"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_warn_reports_but_returns_value() {
        let pipeline = OverridePipeline::builder()
            .validation_mode(ValidationMode::Warn)
            .build();
        let raw = json!({"mode": "absolute", "steps": [{"value": 10, "color": "red"}]});

        let processed = pipeline
            .apply(Some(&raw), &create_test_context(), &settings(FieldConfigKind::Thresholds))
            .unwrap();
        assert!(processed.report.has_errors());
        assert!(processed.value.as_thresholds().is_some());
    }

    #[test]
    fn test_lenient_skips_checks() {
        let pipeline = OverridePipeline::new();
        assert_eq!(pipeline.validation_mode(), ValidationMode::Lenient);

        let processed = pipeline
            .apply(Some(&json!("garbage")), &create_test_context(), &settings(FieldConfigKind::DataLinks))
            .unwrap();
        assert!(processed.report.is_clean());
        assert_eq!(processed.value, FieldConfigValue::Raw(json!("garbage")));
    }

    #[test]
    fn test_strict_never_fails_on_nan_numbers() {
        let pipeline = OverridePipeline::builder().strict().build();
        let processed = pipeline
            .apply(Some(&json!("n/a")), &create_test_context(), &settings(FieldConfigKind::Number))
            .unwrap();
        assert!(processed.value.is_nan());
        assert!(!processed.report.has_errors());
        assert_eq!(processed.report.issues.len(), 1);
    }

    struct CountingLoader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl OptionsLoader for CountingLoader {
        async fn load_options(&self, context: &OverrideContext) -> Result<Vec<SelectableValue>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(context
                .data
                .iter()
                .flat_map(|frame| frame.fields.iter())
                .map(|field| SelectableValue::new(json!(field.name), field.name.clone()))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_select_loader_is_not_called_by_processor() {
        let loader = Arc::new(CountingLoader { calls: AtomicUsize::new(0) });
        let select = SelectFieldConfigSettings::default().with_loader(loader.clone());
        let ctx = create_test_context();

        let pipeline = OverridePipeline::new();
        pipeline.process(Some(&json!("host")), &ctx, &ProcessorSettings::Select(select.clone()));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 0);

        let options = select.options_for(&ctx).await.unwrap();
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert_eq!(options, vec![SelectableValue::new(json!("host"), "host")]);
    }

    #[tokio::test]
    async fn test_select_static_options_without_loader() {
        let select = SelectFieldConfigSettings::with_options(vec![SelectableValue::new(json!(1), "One")]);
        let options = select.options_for(&OverrideContext::default()).await.unwrap();
        assert_eq!(options.len(), 1);
    }
}
