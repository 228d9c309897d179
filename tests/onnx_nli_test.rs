//! Tests for the ONNX NLI provider.

#![cfg(feature = "local-inference")]

use std::path::PathBuf;
use std::sync::Arc;

use mt799_intent::oracle::{
    Device, EntailmentOracle, LocalNliModel, LocalNliProvider, NliModelInfo, NliOracle,
    OnnxNliProvider,
};
use mt799_intent::{MessageAnalyzer, NliLabel};

#[test]
fn test_local_nli_model_properties() {
    let base = LocalNliModel::NliDebertaV3Base;
    assert_eq!(base.name(), "nli-deberta-v3-base");
    assert_eq!(base.repo_id(), Some("cross-encoder/nli-deberta-v3-base"));

    let small = LocalNliModel::NliDebertaV3Small;
    assert_eq!(small.name(), "nli-deberta-v3-small");
    assert_eq!(small.repo_id(), Some("cross-encoder/nli-deberta-v3-small"));

    let xnli = LocalNliModel::MDebertaV3BaseXnli;
    assert_eq!(
        xnli.repo_id(),
        Some("MoritzLaurer/mDeBERTa-v3-base-mnli-xnli")
    );
}

#[test]
fn test_nli_model_info_from_model() {
    let info: NliModelInfo = (&LocalNliModel::NliDebertaV3Base).into();
    assert_eq!(info.name, "nli-deberta-v3-base");
    assert_eq!(info.labels, vec!["contradiction", "entailment", "neutral"]);
    assert!(info.uses_token_type_ids);

    let info: NliModelInfo = (&LocalNliModel::MDebertaV3BaseXnli).into();
    assert_eq!(info.labels, vec!["entailment", "neutral", "contradiction"]);
    assert!(!info.uses_token_type_ids);
}

#[test]
fn test_custom_model_keeps_declared_classes() {
    let custom = LocalNliModel::Custom {
        model_path: PathBuf::from("/models/guarantee-nli.onnx"),
        tokenizer_path: PathBuf::from("/models/tokenizer.json"),
        labels: vec!["entailment".into(), "neutral".into(), "contradiction".into()],
        token_type_ids: true,
    };
    let info: NliModelInfo = (&custom).into();
    assert_eq!(info.name, "guarantee-nli");
    assert!(info.uses_token_type_ids);
}

#[test]
fn test_custom_model_missing_files_fails() {
    let custom = LocalNliModel::Custom {
        model_path: PathBuf::from("/nonexistent/model.onnx"),
        tokenizer_path: PathBuf::from("/nonexistent/tokenizer.json"),
        labels: vec!["entailment".into(), "neutral".into(), "contradiction".into()],
        token_type_ids: false,
    };
    assert!(OnnxNliProvider::new(custom, Device::Cpu, None).is_err());
}

#[test]
fn test_device_default() {
    let device = Device::default();
    assert_eq!(device, Device::Cpu);
    assert_eq!(device.name(), "CPU");
}

// Live test - requires model download, run with --ignored
#[test]
#[ignore]
fn test_onnx_nli_inference() {
    // This test downloads the model on first run
    let mut provider =
        OnnxNliProvider::new(LocalNliModel::NliDebertaV3Small, Device::Cpu, None).unwrap();

    let result = provider
        .infer_nli("The cat is on the mat.", "There is a cat.")
        .unwrap();
    assert_eq!(result.label, NliLabel::Entailment);
    assert!(result.entailment > 0.5);

    let result = provider
        .infer_nli("The cat is black.", "The cat is white.")
        .unwrap();
    assert_eq!(result.label, NliLabel::Contradiction);
    assert!(result.contradiction > 0.5);
}

#[tokio::test]
#[ignore]
async fn test_local_oracle_scores_probabilities() {
    let provider = LocalNliProvider::new(LocalNliModel::default(), Device::Cpu, None).unwrap();
    let oracle = NliOracle::new(Arc::new(provider));

    let score = oracle
        .score(
            "Please extend the guarantee by 30 days.",
            "This part requests an extension",
        )
        .await
        .unwrap();
    assert!((0.0..=1.0).contains(&score));
    assert!(score > 0.5);
}

#[tokio::test]
#[ignore]
async fn test_local_analyzer_end_to_end() {
    let analyzer = MessageAnalyzer::builder()
        .local_nli(LocalNliModel::default())
        .build()
        .unwrap();

    let message = analyzer
        .analyze(
            ":20:REF123\n:77E:Please extend the deadline to 30 days if payment is not \
             received by March 1st, otherwise proceed with payment.\n-}",
            true,
        )
        .await
        .unwrap();
    assert!(!message.main_task.is_empty());
    assert!(!message.sub_tasks.is_empty());
}
