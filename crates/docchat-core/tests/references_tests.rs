use docchat_core::references::{aggregate, display_elements, operator_body, render_sources_markdown, ReferenceLayout};
use docchat_core::types::{Element, RetrievalHit};

fn doc(path: &str) -> RetrievalHit { RetrievalHit::for_document(format!("./data/documents/{path}")) }

#[test]
fn empty_input_yields_nothing() {
    assert!(aggregate(&[]).is_empty());
}

#[test]
fn single_full_hit() {
    let hits = vec![doc("a.pdf").with_page("3").with_text("alpha").with_score(0.75).with_image("./data/images/a.pdf/p3.jpg")];
    let out = aggregate(&hits);

    assert_eq!(out.len(), 1);
    let d = &out[0];
    assert_eq!(d.name, "pdf1");
    assert_eq!(d.path, "./data/documents/a.pdf");
    assert_eq!(d.page_numbers, vec!["3"]);
    assert_eq!(d.text, "alpha\n\n");
    assert_eq!(d.score, Some(0.75));
    assert_eq!(d.images.len(), 1);
    assert_eq!(d.images[0].name, "image1");
    assert_eq!(d.images[0].page_number, "3");
    assert_eq!(d.images[0].score, Some(0.75));
}

#[test]
fn same_document_merges_pages_text_and_score() {
    let hits = vec![
        doc("a.pdf").with_page("5").with_text("first"),
        doc("a.pdf").with_page("1").with_text("second").with_score(0.4),
        doc("a.pdf").with_page("5").with_text("third").with_score(0.2),
    ];
    let out = aggregate(&hits);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].page_numbers, vec!["1", "5"]);
    assert_eq!(out[0].text, "first\n\nsecond\n\nthird\n\n");
    assert_eq!(out[0].score, Some(0.4), "non-null wins over null, then max");
}

#[test]
fn score_stays_none_without_scored_hits() {
    let out = aggregate(&[doc("a.pdf"), doc("a.pdf")]);
    assert_eq!(out[0].score, None);
    assert_eq!(out[0].page_numbers, vec!["Unknown"]);
    assert_eq!(out[0].text, "No parsed text found.\n\nNo parsed text found.\n\n");
}

#[test]
fn unattributed_hits_are_dropped_without_consuming_ordinals() {
    let orphan = RetrievalHit { image_path: Some("./data/images/x.jpg".into()), ..RetrievalHit::default() }.with_score(0.99);
    let out = aggregate(&[orphan.clone(), doc("a.pdf"), orphan, doc("b.pdf")]);

    let names: Vec<&str> = out.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["pdf1", "pdf2"]);
    assert!(out.iter().all(|d| d.images.is_empty()));
}

#[test]
fn ordinals_follow_first_appearance_and_never_change() {
    let hits = vec![
        doc("a.pdf"),
        doc("b.pdf"),
        doc("a.pdf").with_page("2"),
        doc("c.pdf"),
        doc("b.pdf").with_page("9"),
        doc("a.pdf").with_page("4"),
    ];
    let out = aggregate(&hits);

    let named: Vec<(&str, &str)> = out.iter().map(|d| (d.name.as_str(), d.path.as_str())).collect();
    assert_eq!(
        named,
        vec![
            ("pdf1", "./data/documents/a.pdf"),
            ("pdf2", "./data/documents/b.pdf"),
            ("pdf3", "./data/documents/c.pdf"),
        ]
    );
}

#[test]
fn images_are_numbered_per_document() {
    let hits = vec![
        doc("a.pdf").with_image("./data/images/a/1.jpg"),
        doc("b.pdf").with_image("./data/images/b/1.jpg"),
        doc("a.pdf"),
        doc("a.pdf").with_image("./data/images/a/2.jpg").with_page("2"),
    ];
    let out = aggregate(&hits);

    let a: Vec<&str> = out[0].images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(a, vec!["image1", "image2"]);
    assert_eq!(out[0].images[1].page_number, "2");
    assert_eq!(out[1].images[0].name, "image1");
}

#[test]
fn repeated_calls_are_identical() {
    let hits = vec![doc("a.pdf").with_score(0.1), doc("b.pdf").with_page("2"), doc("a.pdf").with_score(0.3)];
    assert_eq!(aggregate(&hits), aggregate(&hits));
}

#[test]
fn page_labels_sort_as_strings() {
    let out = aggregate(&[doc("a.pdf").with_page("2"), doc("a.pdf").with_page("10"), doc("a.pdf").with_page("Unknown")]);
    assert_eq!(out[0].page_numbers, vec!["10", "2", "Unknown"]);
}

#[test]
fn sources_markdown_strips_directory_prefixes() {
    let hits = vec![
        doc("manual.pdf").with_page("2").with_score(0.5).with_image("./data/images/manual.pdf/p2.jpg"),
        doc("manual.pdf").with_page("1"),
        doc("notes.pdf"),
    ];
    let md = render_sources_markdown(&aggregate(&hits), &ReferenceLayout::default());

    let expected = "#### Sources:\n\
        **Score:** 0.5\n**File:** manual.pdf\n**Page:** 1, 2\n**Images:**\nmanual.pdf/p2.jpg\n\n\
        **Score:** None\n**File:** notes.pdf\n**Page:** Unknown\n\n\n";
    assert_eq!(md, expected);
}

#[test]
fn sources_markdown_without_images_ends_page_line_with_blank_lines() {
    let hits = vec![doc("a.pdf").with_page("4").with_score(0.25), doc("b.pdf").with_page("1")];
    let md = render_sources_markdown(&aggregate(&hits), &ReferenceLayout::default());

    assert_eq!(
        md,
        "#### Sources:\n\
        **Score:** 0.25\n**File:** a.pdf\n**Page:** 4\n\n\n\
        **Score:** None\n**File:** b.pdf\n**Page:** 1\n\n\n"
    );
}

#[test]
fn sources_markdown_prints_scores_at_full_precision() {
    let hits = vec![doc("a.pdf").with_score(1.0), doc("b.pdf").with_score(0.8234567891)];
    let md = render_sources_markdown(&aggregate(&hits), &ReferenceLayout::default());

    assert!(md.contains("**Score:** 1.0\n**File:** a.pdf"));
    assert!(md.contains("**Score:** 0.8234567891\n**File:** b.pdf"));
}

#[test]
fn elements_list_documents_then_their_images() {
    let hits = vec![
        doc("a.pdf").with_page("7").with_image("./data/images/a/7.jpg"),
        doc("a.pdf").with_page("3"),
        doc("b.pdf"),
    ];
    let elements = display_elements(&aggregate(&hits));

    assert_eq!(
        elements,
        vec![
            Element::Pdf { name: "pdf1".into(), path: "./data/documents/a.pdf".into(), page: "3".into() },
            Element::Image { name: "image1".into(), path: "./data/images/a/7.jpg".into() },
            Element::Pdf { name: "pdf2".into(), path: "./data/documents/b.pdf".into(), page: "Unknown".into() },
        ]
    );
}

#[test]
fn operator_body_joins_document_texts() {
    let out = aggregate(&[doc("a.pdf").with_text("one"), doc("b.pdf").with_text("two")]);
    assert_eq!(operator_body(&out), "one\n\n\n\ntwo\n\n");
    assert_eq!(operator_body(&[]), "");
}
