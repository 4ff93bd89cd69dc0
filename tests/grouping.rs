//! Grouping invariants over annotated documents.

use annex::{
    annotate, group_by, CandidateExtraction, Error, ExampleDocument, ExampleExtraction,
    MockOracle, UNGROUPED_LABEL,
};

fn examples() -> Vec<ExampleDocument> {
    vec![ExampleDocument::new(
        "Patient takes Aspirin 100mg daily.",
        vec![
            ExampleExtraction::new("medication", "Aspirin")
                .with_attribute("medication_group", "Aspirin"),
            ExampleExtraction::new("dosage", "100mg")
                .with_attribute("medication_group", "Aspirin"),
        ],
    )
    .unwrap()]
}

fn interleaved_document() -> annex::Document {
    // Interleaved mentions: Lisinopril and Metformin details alternate, the
    // way the oracle returns them in document order.
    let text = "He takes the Lisinopril 10mg daily for hypertension, but often misses \
                his Metformin 500mg dose which should be taken twice daily for diabetes.";
    let oracle = MockOracle::new().with_candidates(vec![
        CandidateExtraction::new("medication", "Lisinopril")
            .with_attribute("medication_group", "Lisinopril"),
        CandidateExtraction::new("dosage", "10mg")
            .with_attribute("medication_group", "Lisinopril"),
        CandidateExtraction::new("condition", "hypertension")
            .with_attribute("medication_group", "Lisinopril"),
        CandidateExtraction::new("medication", "Metformin")
            .with_attribute("medication_group", "Metformin"),
        CandidateExtraction::new("dosage", "500mg")
            .with_attribute("medication_group", "Metformin"),
        CandidateExtraction::new("frequency", "twice daily")
            .with_attribute("medication_group", "Metformin"),
        CandidateExtraction::new("condition", "diabetes"),
    ]);

    annotate(text, "Extract medications.", &examples(), &oracle).unwrap()
}

#[test]
fn groups_follow_first_occurrence_order() {
    let document = interleaved_document();
    let grouping = group_by(&document, "medication_group");

    let labels: Vec<&str> = grouping.groups().iter().map(|g| g.label()).collect();
    assert_eq!(labels, ["Lisinopril", "Metformin"]);
}

#[test]
fn group_members_are_subsequences_of_document_order() {
    let document = interleaved_document();
    let positions: Vec<&str> = document
        .extractions()
        .iter()
        .map(|e| e.extraction_text.as_str())
        .collect();

    let grouping = group_by(&document, "medication_group");
    for group in grouping.groups() {
        let mut cursor = 0;
        for member in group.members() {
            let found = positions[cursor..]
                .iter()
                .position(|text| *text == member.extraction_text)
                .expect("member must appear after the previous one");
            cursor += found + 1;
        }
    }
}

#[test]
fn grouping_twice_is_identical() {
    let document = interleaved_document();

    let first = group_by(&document, "medication_group");
    let second = group_by(&document, "medication_group");

    let snapshot = |grouping: &annex::Grouping<'_>| -> Vec<(String, Vec<String>)> {
        grouping
            .groups()
            .iter()
            .map(|g| {
                (
                    g.label().to_string(),
                    g.members()
                        .iter()
                        .map(|e| e.extraction_text.clone())
                        .collect(),
                )
            })
            .collect()
    };

    assert_eq!(snapshot(&first), snapshot(&second));
}

#[test]
fn missing_attribute_is_reported_not_dropped() {
    let document = interleaved_document();
    let grouping = group_by(&document, "medication_group");

    assert_eq!(grouping.ungrouped().label(), UNGROUPED_LABEL);
    assert_eq!(grouping.ungrouped().len(), 1);
    assert_eq!(grouping.ungrouped().members()[0].extraction_text, "diabetes");

    let grouped: usize = grouping.groups().iter().map(|g| g.len()).sum();
    assert_eq!(grouped + grouping.ungrouped().len(), document.len());
    assert_eq!(grouping.total_len(), document.len());
}

#[test]
fn append_after_grouping_is_frozen() {
    let mut document = interleaved_document();
    {
        let _grouping = group_by(&document, "medication_group");
    }

    let result = document.append(CandidateExtraction::new("dosage", "10mg"));
    assert!(matches!(result, Err(Error::DocumentFrozen(_))));

    // The grouping itself is unaffected.
    let grouping = group_by(&document, "medication_group");
    assert_eq!(grouping.total_len(), document.len());
}

#[test]
fn unresolved_extractions_still_group_by_attribute() {
    let oracle = MockOracle::new().with_candidates(vec![
        CandidateExtraction::new("medication", "Aspirin")
            .with_attribute("medication_group", "Aspirin"),
        // Not present in the text, but still carries the attribute.
        CandidateExtraction::new("brand", "Bayer")
            .with_attribute("medication_group", "Aspirin"),
    ]);
    let document = annotate(
        "Patient takes Aspirin daily.",
        "Extract medications.",
        &examples(),
        &oracle,
    )
    .unwrap();

    let grouping = group_by(&document, "medication_group");
    assert_eq!(grouping.groups().len(), 1);
    assert_eq!(grouping.groups()[0].len(), 2);
    assert!(grouping.ungrouped().is_empty());
}
