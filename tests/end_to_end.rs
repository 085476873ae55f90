//! End-to-end: config file -> corpus -> process -> lookups -> export -> reload.

use spanmark::{annotate, Config, Corpus, Document, Entity, EntityCatalog, Format};

fn entities() -> EntityCatalog {
    EntityCatalog::from_pairs([("Rust", "PL"), ("Python", "PL"), ("Mozilla", "ORG")]).unwrap()
}

fn triples(document: &Document) -> Vec<(usize, usize, String)> {
    document.annotations().iter().map(|a| a.as_tuple()).collect()
}

#[test]
fn test_concrete_scenario() {
    let mut corpus = Corpus::new(vec![Document::from("rust is made by Mozilla")], entities());
    corpus.process().unwrap();

    let document = &corpus.documents()[0];
    assert_eq!(
        triples(document),
        vec![(16, 23, "ORG".to_string()), (0, 4, "PL".to_string())]
    );

    let by_label = corpus.lookup_by_label("PL");
    assert_eq!(by_label.len(), 1);
    assert_eq!(by_label[0].text(), "rust is made by Mozilla");
    assert_eq!(corpus.lookup_by_entity("Mozilla").len(), 1);
    assert!(corpus.lookup_by_entity("Python").is_empty());
}

#[test]
fn test_free_annotate_matches_corpus() {
    let list: Vec<Entity> = entities().iter().cloned().collect();
    let insensitive = annotate("rust is made by Mozilla", &list, false).unwrap();
    assert_eq!(insensitive.len(), 2);
    assert_eq!(insensitive[0].label, "ORG");
    assert_eq!(insensitive[1].label, "PL");

    let sensitive = annotate("rust is made by Mozilla", &list, true).unwrap();
    assert_eq!(sensitive.len(), 1);
    assert_eq!(sensitive[0].label, "ORG");
}

#[test]
fn test_configured_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("spanmark.toml");
    std::fs::write(
        &config_path,
        r#"
[matching]
case_sensitive = false

[texts]
filter = true
[texts.filters]
min_length = 10

[entities]
excludes = ["Python"]

[export]
format = "jsonl"
chunk_size = 2
"#,
    )
    .unwrap();
    let config = Config::from_file(&config_path).unwrap();

    let documents = vec![
        Document::from("rust is made by Mozilla"),
        Document::from("short"),
        Document::from("Python and Rust, both loved"),
        Document::from("Mozilla Firefox is written partly in RUST"),
    ];
    let mut corpus = Corpus::with_config(documents, entities(), config);
    assert_eq!(corpus.documents().len(), 3);
    assert_eq!(corpus.entities().len(), 2);

    let stats = corpus.process().unwrap();
    assert_eq!(stats.annotations, 5);
    assert_eq!(corpus.lookup_by_entity("rust").len(), 3);
    assert!(corpus.lookup_by_entity("python").is_empty());
    assert_eq!(corpus.export_batches(None).unwrap().len(), 2);

    let written = corpus.save(dir.path().join("corpus")).unwrap();
    assert_eq!(written, vec![dir.path().join("corpus.jsonl")]);

    let reloaded = Corpus::from_jsonl(&written[0], corpus.config().clone()).unwrap();
    assert_eq!(reloaded.documents(), corpus.documents());
    assert_eq!(reloaded.index(), corpus.index());
}

#[test]
fn test_every_format_saves() {
    let mut corpus = Corpus::new(vec![Document::from("rust is made by Mozilla")], entities());
    corpus.process().unwrap();
    let dir = tempfile::tempdir().unwrap();

    for format in [Format::Jsonl, Format::Spacy, Format::Brat, Format::Conll] {
        let written = format
            .save(corpus.documents(), dir.path().join("out"))
            .unwrap();
        for path in &written {
            assert!(path.exists(), "{format:?} did not write {}", path.display());
        }
    }
}

#[test]
fn test_version_string() {
    assert!(spanmark::version().starts_with("spanmark v"));
}
