//! Tests for feature encoding and inference
//!
//! Covers the encoder's degrade-to-default behaviour, the adapter's probability
//! and importance handling, and the linfa-backed artifact.

#[cfg(test)]
mod tests {
    use crate::artifact::{MLModel, ModelArtifact};
    use crate::encoder::{FIELD_RULES, RawInput, encode};
    use crate::error::{ModelError, ModelResult};
    use crate::inference::{
        Capabilities, ClassLabel, Classifier, FALLBACK_POSITIVE_INDEX, InferenceAdapter,
        ProbabilityTable, TOP_IMPORTANCES, positive_probability, rank_importances,
    };
    use crate::schema::{COLOR_FEATURES, FeatureSchema, TYPE_FEATURES};
    use linfa::DatasetBase;
    use linfa::traits::Fit;
    use linfa_logistic::LogisticRegression;
    use linfa_trees::DecisionTree;
    use ndarray::{Array1, Array2, ArrayView2, array};

    fn full_schema() -> FeatureSchema {
        let mut names: Vec<&str> = FIELD_RULES.iter().map(|(name, _)| *name).collect();
        names.extend(TYPE_FEATURES);
        names.extend(COLOR_FEATURES);
        FeatureSchema::new(names)
    }

    /// Classifier with fixed answers, optionally without probability support
    struct StubClassifier {
        feature_names: Vec<String>,
        label: ClassLabel,
        table: Option<(Vec<ClassLabel>, Vec<f64>)>,
        importances: Option<Vec<f64>>,
    }

    impl StubClassifier {
        fn new(schema: &FeatureSchema) -> Self {
            Self {
                feature_names: schema.names().to_vec(),
                label: ClassLabel::Bool(true),
                table: None,
                importances: None,
            }
        }

        fn with_probabilities(mut self, classes: Vec<ClassLabel>, row: Vec<f64>) -> Self {
            self.table = Some((classes, row));
            self
        }

        fn with_importances(mut self, weights: Vec<f64>) -> Self {
            self.importances = Some(weights);
            self
        }
    }

    impl Classifier for StubClassifier {
        fn kind(&self) -> String {
            "Stub".to_string()
        }

        fn feature_names(&self) -> &[String] {
            &self.feature_names
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities {
                predict_proba: self.table.is_some(),
                feature_importances: self.importances.clone(),
            }
        }

        fn predict(&self, rows: ArrayView2<'_, f64>) -> ModelResult<Vec<ClassLabel>> {
            Ok(vec![self.label.clone(); rows.nrows()])
        }

        fn predict_proba(&self, _rows: ArrayView2<'_, f64>) -> ModelResult<ProbabilityTable> {
            let (classes, row) = self.table.clone().ok_or(ModelError::EmptyPrediction)?;
            let columns = row.len();
            Ok(ProbabilityTable {
                classes,
                probabilities: Array2::from_shape_vec((1, columns), row)?,
            })
        }
    }

    // ============================================================================
    // Encoder tests
    // ============================================================================

    #[test]
    fn test_encode_empty_submission_uses_defaults() {
        let schema = full_schema();
        let encoded = encode(&RawInput::new(), &schema);

        assert_eq!(encoded.vector().len(), schema.len());
        assert_eq!(encoded.get("Total"), Some(0.0));
        assert_eq!(encoded.get("Speed"), Some(0.0));
        assert_eq!(encoded.get("Generation"), Some(1.0));
        assert_eq!(encoded.get("hasGender"), Some(0.0));
        assert_eq!(encoded.get("Pr_Male"), Some(0.5));
        assert_eq!(encoded.get("Height_m"), Some(1.0));
        assert_eq!(encoded.get("Weight_kg"), Some(10.0));
        assert_eq!(encoded.get("Catch_Rate"), Some(45.0));
        assert_eq!(encoded.get("Body_Style_new"), Some(1.0));
    }

    #[test]
    fn test_encode_malformed_numbers_fall_back() {
        let schema = full_schema();
        let raw: RawInput = [
            ("HP", "lots"),
            ("Weight_kg", "  "),
            ("Catch_Rate", "nan"),
            ("Height_m", "inf"),
            ("Generation", "two"),
        ]
        .into_iter()
        .collect();
        let encoded = encode(&raw, &schema);

        assert_eq!(encoded.get("HP"), Some(0.0));
        assert_eq!(encoded.get("Weight_kg"), Some(10.0));
        assert_eq!(encoded.get("Catch_Rate"), Some(45.0));
        assert_eq!(encoded.get("Height_m"), Some(1.0));
        assert_eq!(encoded.get("Generation"), Some(1.0));
    }

    #[test]
    fn test_encode_parses_numbers_and_truncates_generation() {
        let schema = full_schema();
        let raw: RawInput = [("Attack", " 49 "), ("Generation", "3.9"), ("Height_m", "0.7")]
            .into_iter()
            .collect();
        let encoded = encode(&raw, &schema);

        assert_eq!(encoded.get("Attack"), Some(49.0));
        assert_eq!(encoded.get("Generation"), Some(3.0));
        assert_eq!(encoded.get("Height_m"), Some(0.7));
    }

    #[test]
    fn test_encode_clamps_proportion() {
        let schema = full_schema();
        for (input, expected) in [("5", 1.0), ("-2", 0.0), ("0.875", 0.875), ("x", 0.5)] {
            let raw: RawInput = [("Pr_Male", input)].into_iter().collect();
            assert_eq!(encode(&raw, &schema).get("Pr_Male"), Some(expected), "{input}");
        }
    }

    #[test]
    fn test_encode_flags_need_sentinel() {
        let schema = full_schema();
        let raw: RawInput = [("hasGender", "on"), ("hasMegaEvolution", "true")]
            .into_iter()
            .collect();
        let encoded = encode(&raw, &schema);

        assert_eq!(encoded.get("hasGender"), Some(1.0));
        assert_eq!(encoded.get("hasMegaEvolution"), Some(0.0));
    }

    #[test]
    fn test_encode_multi_select_types() {
        let schema = full_schema();
        let raw: RawInput = [("types", "Fire"), ("types", "Water")].into_iter().collect();
        let encoded = encode(&raw, &schema);

        for name in TYPE_FEATURES {
            let expected = if name == "Fire" || name == "Water" { 1.0 } else { 0.0 };
            assert_eq!(encoded.get(name), Some(expected), "{name}");
        }
    }

    #[test]
    fn test_encode_unknown_type_is_ignored() {
        let schema = full_schema();
        let raw: RawInput = [("types", "Cosmic")].into_iter().collect();
        let encoded = encode(&raw, &schema);

        assert!(TYPE_FEATURES.iter().all(|t| encoded.get(t) == Some(0.0)));
        assert_eq!(encoded.vector().len(), schema.len());
    }

    #[test]
    fn test_encode_single_select_color() {
        let schema = full_schema();
        let raw: RawInput = [("color", "Blue")].into_iter().collect();
        let encoded = encode(&raw, &schema);
        let set: Vec<&str> = COLOR_FEATURES
            .into_iter()
            .filter(|c| encoded.get(c) == Some(1.0))
            .collect();
        assert_eq!(set, vec!["Blue"]);

        let none = encode(&RawInput::new(), &schema);
        assert!(COLOR_FEATURES.iter().all(|c| none.get(c) == Some(0.0)));

        let unknown: RawInput = [("color", "Teal")].into_iter().collect();
        let unknown = encode(&unknown, &schema);
        assert!(COLOR_FEATURES.iter().all(|c| unknown.get(c) == Some(0.0)));
    }

    #[test]
    fn test_encode_follows_schema_order() {
        // declared order differs from rule order; unknown names stay zero
        let schema = FeatureSchema::new(["Red", "Mystery", "HP", "Fire"]);
        let raw: RawInput = [
            ("HP", "45"),
            ("types", "Fire"),
            ("color", "Red"),
            ("Mystery", "9"),
            ("Attack", "49"),
        ]
        .into_iter()
        .collect();
        let encoded = encode(&raw, &schema);

        assert_eq!(encoded.vector(), &[1.0, 0.0, 45.0, 1.0]);
        let names: Vec<&str> = encoded.named_values().iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["Red", "Mystery", "HP", "Fire"]);
        assert_eq!(encoded.get("Attack"), None);
    }

    #[test]
    fn test_raw_input_first_value_wins() {
        let raw: RawInput = [("HP", "10"), ("HP", "99")].into_iter().collect();
        assert_eq!(raw.get("HP"), Some("10"));
        assert_eq!(raw.get_all("HP").len(), 2);
        assert!(raw.get_all("missing").is_empty());
    }

    // ============================================================================
    // Inference adapter tests
    // ============================================================================

    #[test]
    fn test_predict_without_probabilities_reports_absent() {
        let schema = full_schema();
        let adapter = InferenceAdapter::new(Box::new(StubClassifier::new(&schema)));
        let encoded = encode(&RawInput::new(), adapter.schema());

        let prediction = adapter.predict(encoded.vector()).unwrap();
        assert!(prediction.label);
        assert_eq!(prediction.probability, None);
    }

    #[test]
    fn test_predict_reads_positive_class_column() {
        let schema = full_schema();
        let stub = StubClassifier::new(&schema).with_probabilities(
            vec![ClassLabel::Bool(true), ClassLabel::Bool(false)],
            vec![0.82, 0.18],
        );
        let adapter = InferenceAdapter::new(Box::new(stub));
        let encoded = encode(&RawInput::new(), adapter.schema());

        let prediction = adapter.predict(encoded.vector()).unwrap();
        assert_eq!(prediction.probability, Some(0.82));
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let schema = full_schema();
        let adapter = InferenceAdapter::new(Box::new(StubClassifier::new(&schema)));

        let err = adapter.predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::SchemaMismatch { expected, actual: 2 } if expected == schema.len()
        ));
    }

    #[test]
    fn test_positive_probability_fallback_index() {
        let table = ProbabilityTable {
            classes: vec![ClassLabel::Text("no".into()), ClassLabel::Text("yes".into())],
            probabilities: array![[0.3, 0.7]],
        };
        assert_eq!(FALLBACK_POSITIVE_INDEX, 1);
        assert_eq!(positive_probability(&table).unwrap(), 0.7);

        let integer_classes = ProbabilityTable {
            classes: vec![ClassLabel::Int(1), ClassLabel::Int(0)],
            probabilities: array![[0.6, 0.4]],
        };
        assert_eq!(positive_probability(&integer_classes).unwrap(), 0.6);
    }

    #[test]
    fn test_positive_probability_single_column_errors() {
        let table = ProbabilityTable {
            classes: vec![ClassLabel::Bool(false)],
            probabilities: array![[1.0]],
        };
        assert!(matches!(
            positive_probability(&table),
            Err(ModelError::ProbabilityColumn { index: 1, columns: 1 })
        ));
    }

    #[test]
    fn test_class_label_truthiness() {
        assert!(ClassLabel::Bool(true).is_truthy());
        assert!(!ClassLabel::Int(0).is_truthy());
        assert!(ClassLabel::Int(3).is_truthy());
        assert!(!ClassLabel::Text("False".into()).is_truthy());
        assert!(ClassLabel::Text("Legendary".into()).is_truthy());
        assert!(!ClassLabel::Text(String::new()).is_truthy());
        assert!(ClassLabel::Int(1).is_positive());
        assert!(!ClassLabel::Text("True".into()).is_positive());
    }

    // ============================================================================
    // Importance ranking tests
    // ============================================================================

    #[test]
    fn test_rank_importances_sorted_and_truncated() {
        let names: Vec<String> = (0..20).map(|i| format!("f{i}")).collect();
        let schema = FeatureSchema::new(names);
        let weights: Vec<f64> = (0..20).map(|i| (i % 7) as f64).collect();

        let ranking = rank_importances(&schema, &weights);
        assert_eq!(ranking.len(), TOP_IMPORTANCES);
        assert!(ranking.windows(2).all(|w| w[0].weight >= w[1].weight));
        // ties keep schema order
        assert_eq!(ranking[0].name, "f6");
        assert_eq!(ranking[1].name, "f13");
    }

    #[test]
    fn test_importances_empty_on_length_mismatch() {
        let schema = full_schema();
        let stub = StubClassifier::new(&schema).with_importances(vec![0.5, 0.5]);
        let adapter = InferenceAdapter::new(Box::new(stub));
        assert!(adapter.importances().is_empty());

        let adapter = InferenceAdapter::new(Box::new(StubClassifier::new(&schema)));
        assert!(adapter.importances().is_empty());
    }

    #[test]
    fn test_importances_short_schema() {
        let schema = FeatureSchema::new(["a", "b", "c"]);
        let stub = StubClassifier::new(&schema).with_importances(vec![0.1, 0.7, 0.2]);
        let adapter = InferenceAdapter::new(Box::new(stub));

        let names: Vec<String> = adapter.importances().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    // ============================================================================
    // linfa artifact tests
    // ============================================================================

    fn training_set() -> (Array2<f64>, Array1<usize>) {
        let records = array![
            [0.0, 3.0],
            [0.5, 1.0],
            [1.0, 2.0],
            [1.5, 0.0],
            [8.0, 1.0],
            [8.5, 3.0],
            [9.0, 0.0],
            [9.5, 2.0],
        ];
        let targets = array![0, 0, 0, 0, 1, 1, 1, 1];
        (records, targets)
    }

    fn feature_names() -> Vec<String> {
        vec!["signal".to_string(), "noise".to_string()]
    }

    fn bool_classes() -> Vec<ClassLabel> {
        vec![ClassLabel::Bool(false), ClassLabel::Bool(true)]
    }

    #[test]
    fn test_decision_tree_artifact() {
        let (records, targets) = training_set();
        let ds = DatasetBase::from(records).with_targets(targets);
        let tree = DecisionTree::params().max_depth(Some(2)).fit(&ds).unwrap();
        let artifact = ModelArtifact::new(feature_names(), bool_classes(), MLModel::DecisionTree(tree));

        let bytes = artifact.to_json_vec().unwrap();
        let loaded = ModelArtifact::from_slice(&bytes).unwrap();
        let adapter = InferenceAdapter::new(Box::new(loaded));

        assert!(!adapter.capabilities().predict_proba);
        assert!(adapter.predict(&[9.0, 1.0]).unwrap().label);
        let low = adapter.predict(&[0.2, 1.0]).unwrap();
        assert!(!low.label);
        assert_eq!(low.probability, None);

        let ranking = adapter.importances();
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].name, "signal");
    }

    #[test]
    fn test_logistic_regression_artifact() {
        let (records, targets) = training_set();
        let ds = DatasetBase::from(records).with_targets(targets);
        let model = LogisticRegression::default()
            .max_iterations(200)
            .fit(&ds)
            .unwrap();
        let artifact = ModelArtifact::new(
            feature_names(),
            bool_classes(),
            MLModel::LogisticRegression(model),
        );
        let adapter = InferenceAdapter::new(Box::new(artifact));

        assert!(adapter.capabilities().predict_proba);
        assert!(adapter.importances().is_empty());

        let high = adapter.predict(&[9.5, 1.0]).unwrap();
        assert!(high.label);
        let p = high.probability.unwrap();
        assert!(p > 0.5 && p <= 1.0, "{p}");

        let low = adapter.predict(&[0.0, 1.0]).unwrap();
        assert!(!low.label);
        assert!(low.probability.unwrap() < 0.5);
    }

    #[test]
    fn test_artifact_unknown_class_id() {
        let (records, targets) = training_set();
        let ds = DatasetBase::from(records).with_targets(targets);
        let tree = DecisionTree::params().fit(&ds).unwrap();
        let artifact = ModelArtifact::new(
            feature_names(),
            vec![ClassLabel::Bool(false)],
            MLModel::DecisionTree(tree),
        );
        let adapter = InferenceAdapter::new(Box::new(artifact));

        let err = adapter.predict(&[9.0, 0.0]).unwrap_err();
        assert!(matches!(err, ModelError::UnknownClass { class_id: 1, .. }));
    }

    #[test]
    fn test_artifact_rejects_tree_wider_than_declared_names() {
        let records = array![[0.0, 0.0], [0.0, 1.0], [0.0, 8.0], [0.0, 9.0]];
        let targets = array![0, 0, 1, 1];
        let ds = DatasetBase::from(records).with_targets(targets);
        let tree = DecisionTree::params().fit(&ds).unwrap();
        let artifact = ModelArtifact::new(
            vec!["only".to_string()],
            bool_classes(),
            MLModel::DecisionTree(tree),
        );

        let bytes = artifact.to_json_vec().unwrap();
        assert!(matches!(
            ModelArtifact::from_slice(&bytes),
            Err(ModelError::SchemaMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_artifact_rejects_bad_documents() {
        assert!(matches!(
            ModelArtifact::from_slice(br#"{"feature_names":[],"model":{"type":"Forest"}}"#),
            Err(ModelError::Json(_))
        ));
        assert!(matches!(
            ModelArtifact::from_path("/definitely/not/here.json"),
            Err(ModelError::Io { .. })
        ));
    }
}
