use serde_json::json;
use slidepack_core::{BuiltinLayouts, Error, ExportFormat, PresentationRecord, SlideRecord, ThemeRecord};
use slidepack_export::{ExportConfig, Exporter, MemoryStore, PLACEHOLDER_PNG};
use slidepack_pptx::PackageInspector;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

fn setup() -> (tempfile::TempDir, ExportConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = ExportConfig::under(dir.path());
    config.prepare().unwrap();
    (dir, config)
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn three_slide_record() -> PresentationRecord {
    let mut unresolved = SlideRecord::new(2, "image-left", json!({
        "title": "Gallery",
        "hero": { "__image_prompt__": "a lighthouse at dusk" }
    }));
    unresolved.speaker_note = Some("Pause here".into());

    PresentationRecord {
        id: "deck-a".into(),
        title: Some("Scenario A".into()),
        // stored out of order on purpose
        slides: vec![
            SlideRecord::new(1, "title-content", json!({ "bullets": ["one", "two", "three"] })),
            unresolved,
            SlideRecord::new(0, "title", json!({ "title": "Hello World" })),
        ],
        theme: Some(ThemeRecord {
            name: Some("Plain".into()),
            ..Default::default()
        }),
    }
}

#[test]
fn test_three_slide_deck_with_placeholder() {
    let (_dir, config) = setup();
    let layouts = BuiltinLayouts::new();
    let exporter = Exporter::new(&config, &layouts);

    let outcome = exporter.export(&three_slide_record(), ExportFormat::Pptx).unwrap();
    assert_eq!(outcome.presentation_id, "deck-a");
    assert_eq!(outcome.path, config.export_dir.join("Scenario_A.pptx"));

    let summary = PackageInspector::new().inspect_file(&outcome.path).unwrap();
    assert_eq!(summary.title.as_deref(), Some("Scenario A"));
    assert_eq!(summary.slide_count(), 3);
    assert_eq!(summary.slides[0].lines, vec!["Hello World".to_string()]);
    assert_eq!(summary.slides[1].lines.len(), 3);
    assert_eq!(summary.slides[2].pictures, 1);
    assert!(summary.slides[2].has_notes);
    assert!(!summary.slides[0].has_notes);

    let mut archive = ZipArchive::new(File::open(&outcome.path).unwrap()).unwrap();
    let mut media = Vec::new();
    archive
        .by_name("ppt/media/image1.png")
        .unwrap()
        .read_to_end(&mut media)
        .unwrap();
    assert_eq!(media, PLACEHOLDER_PNG);
    for n in 1..=3 {
        assert!(archive.by_name(&format!("ppt/slides/slide{}.xml", n)).is_ok());
    }
    assert!(archive.by_name("ppt/slides/slide4.xml").is_err());

    assert!(entries(&config.temp_root).is_empty());
}

#[test]
fn test_unsupported_format_writes_nothing() {
    let (_dir, config) = setup();
    let layouts = BuiltinLayouts::new();
    let exporter = Exporter::new(&config, &layouts);

    let err = exporter.export(&three_slide_record(), ExportFormat::Pdf).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
    assert!(entries(&config.export_dir).is_empty());
    assert!(entries(&config.temp_root).is_empty());

    assert!(matches!(
        slidepack_export::parse_format("odp"),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn test_concurrent_exports_are_isolated() {
    let (_dir, config) = setup();
    let layouts = BuiltinLayouts::new();

    let record = |id: &str, title: &str, slides: usize| PresentationRecord {
        id: id.to_string(),
        title: Some(title.to_string()),
        slides: (0..slides)
            .map(|i| SlideRecord::new(i, "title", json!({ "title": format!("{} {}", title, i) })))
            .collect(),
        theme: None,
    };
    let first = record("p1", "Alpha", 4);
    let second = record("p2", "Beta", 7);

    let (a, b) = std::thread::scope(|scope| {
        let a = scope.spawn(|| Exporter::new(&config, &layouts).export(&first, ExportFormat::Pptx));
        let b = scope.spawn(|| Exporter::new(&config, &layouts).export(&second, ExportFormat::Pptx));
        (a.join().unwrap().unwrap(), b.join().unwrap().unwrap())
    });

    let inspector = PackageInspector::new();
    let alpha = inspector.inspect_file(&a.path).unwrap();
    let beta = inspector.inspect_file(&b.path).unwrap();
    assert_eq!(alpha.slide_count(), 4);
    assert_eq!(beta.slide_count(), 7);
    assert_eq!(beta.slides[6].lines, vec!["Beta 6".to_string()]);
    assert_eq!(entries(&config.export_dir), vec!["Alpha.pptx", "Beta.pptx"]);
    assert!(entries(&config.temp_root).is_empty());
}

#[test]
fn test_export_by_id() {
    let (_dir, config) = setup();
    let layouts = BuiltinLayouts::new();
    let exporter = Exporter::new(&config, &layouts);
    let mut store = MemoryStore::new();
    store.insert(three_slide_record());

    let err = exporter
        .export_by_id(&store, "missing", ExportFormat::Pptx)
        .unwrap_err();
    assert!(matches!(err, Error::PresentationNotFound(ref id) if id == "missing"));
    assert!(entries(&config.export_dir).is_empty());

    let outcome = exporter.export_by_id(&store, "deck-a", ExportFormat::Pptx).unwrap();
    assert!(outcome.path.exists());
}

#[test]
fn test_sanitized_name_and_repeat_export() {
    let (_dir, config) = setup();
    let layouts = BuiltinLayouts::new();
    let exporter = Exporter::new(&config, &layouts);

    let mut record = three_slide_record();
    record.title = Some("My/Deck:2024".into());
    let first = exporter.export(&record, ExportFormat::Pptx).unwrap();
    let second = exporter.export(&record, ExportFormat::Pptx).unwrap();

    assert_eq!(first.path, config.export_dir.join("My_Deck_2024.pptx"));
    assert_eq!(first, second);
    assert_eq!(entries(&config.export_dir), vec!["My_Deck_2024.pptx"]);

    record.title = None;
    let untitled = exporter.export(&record, ExportFormat::Pptx).unwrap();
    assert_eq!(untitled.path, config.export_dir.join("presentation.pptx"));
}

#[test]
fn test_missing_placeholder_fails_without_output() {
    let (_dir, config) = setup();
    fs::remove_file(config.placeholder_path()).unwrap();
    let layouts = BuiltinLayouts::new();
    let exporter = Exporter::new(&config, &layouts);

    let err = exporter.export(&three_slide_record(), ExportFormat::Pptx).unwrap_err();
    assert!(matches!(err, Error::Packaging(_)));
    assert!(entries(&config.export_dir).is_empty());
    assert!(entries(&config.temp_root).is_empty());
}
