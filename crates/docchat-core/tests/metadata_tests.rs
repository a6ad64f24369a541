use docchat_core::config::DataConfig;
use docchat_core::metadata::HitNormalizer;
use docchat_core::references::aggregate;
use docchat_core::types::RawHit;
use serde_json::json;

fn raw(value: serde_json::Value) -> RawHit { serde_json::from_value(value).expect("raw hit") }

#[test]
fn full_metadata_is_rebased_onto_project_dirs() {
    let normalizer = HitNormalizer::new(&DataConfig::default()).expect("normalizer");
    let hit = normalizer.normalize(&raw(json!({
        "metadata": {
            "source_file_path": "/home/build/project/data/documents/manual.pdf",
            "image_path": "/home/build/project/data/images/manual.pdf/manual-img_p3_1.jpg",
            "page_num": 3,
            "parsed_text_markdown": "# Pump\nCheck seals."
        },
        "score": 0.82
    })));

    assert_eq!(hit.source_document_path.as_deref(), Some("./data/documents/manual.pdf"));
    assert_eq!(hit.image_path.as_deref(), Some("./data/images/manual.pdf/manual-img_p3_1.jpg"));
    assert_eq!(hit.page_number, "3");
    assert_eq!(hit.parsed_text, "# Pump\nCheck seals.");
    assert_eq!(hit.score, Some(0.82));
}

#[test]
fn missing_fields_degrade_to_defaults() {
    let normalizer = HitNormalizer::new(&DataConfig::default()).expect("normalizer");
    let hit = normalizer.normalize(&raw(json!({ "metadata": { "image_path": "elsewhere/pic.jpg", "page_num": null } })));

    assert_eq!(hit.source_document_path, None);
    assert_eq!(hit.image_path, None);
    assert_eq!(hit.page_number, "Unknown");
    assert_eq!(hit.parsed_text, "No parsed text found.");
    assert_eq!(hit.score, None);
}

#[test]
fn custom_directories_change_the_markers() {
    let data = DataConfig { documents_dir: "corpus/pdf".into(), images_dir: "/corpus/img/".into(), ..DataConfig::default() };
    let normalizer = HitNormalizer::new(&data).expect("normalizer");
    let hit = normalizer.normalize(&raw(json!({
        "metadata": { "source_file_path": "/x/corpus/pdf/a.pdf", "image_path": "/x/corpus/img/a.png" }
    })));

    assert_eq!(hit.source_document_path.as_deref(), Some("./corpus/pdf/a.pdf"));
    assert_eq!(hit.image_path.as_deref(), Some("./corpus/img/a.png"));
}

#[test]
fn normalized_batch_feeds_the_aggregator() {
    let normalizer = HitNormalizer::new(&DataConfig::default()).expect("normalizer");
    let raws: Vec<RawHit> = serde_json::from_value(json!([
        { "metadata": { "source_file_path": "/d/data/documents/a.pdf", "page_num": "2" }, "score": 0.3 },
        { "metadata": { "source_file_path": 17 }, "score": 0.9 },
        { "metadata": { "source_file_path": "/d/data/documents/a.pdf", "page_num": "1" }, "score": 0.6 }
    ]))
    .expect("raw hits");
    let out = aggregate(&normalizer.normalize_all(&raws));

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].page_numbers, vec!["1", "2"]);
    assert_eq!(out[0].score, Some(0.6));
}
