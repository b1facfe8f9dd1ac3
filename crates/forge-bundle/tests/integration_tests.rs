//! End-to-end tests for bundle generation.
//!
//! Each test drives `generate_bundle` (or an assembler) the way the export
//! route does and checks one property of the produced bundle.

use forge_bundle::{generate_bundle, read_archive, verify_archive, BundleAssembler, TELEMETRY_FILE};
use forge_core::{BundleContent, ExportConfig, ExportError, RenderOptions, Telemetry};
use forge_integrity::{sha256_hex, verify_bundle, Manifest};
use regex::Regex;
use serde_json::json;

fn content() -> BundleContent {
    serde_json::from_value(json!({
        "prompt": "Test prompt",
        "sevenD": {
            "domain": "fintech",
            "scale": "enterprise",
            "urgency": "planned",
            "complexity": "expert",
            "resources": "full_stack_org",
            "application": "audit",
            "output_format": "spec",
            "signature_7d": "abc123def456789"
        },
        "scores": {
            "clarity": 85, "execution": 90, "ambiguity": 80,
            "business_fit": 88, "composite": 86
        },
        "metadata": {
            "runId": "123e4567-e89b-12d3-a456-426614174000",
            "moduleId": "M07",
            "orgId": "org-123",
            "userId": "user-456",
            "createdAt": "2024-01-01T00:00:00Z",
            "version": "1.0.0"
        }
    }))
    .unwrap()
}

fn telemetry() -> Telemetry {
    Telemetry {
        tokens_used: 1532,
        duration_ms: 4210,
        cost_usd: 0.0231,
    }
}

fn names(bundle: &forge_bundle::Bundle) -> Vec<&str> {
    bundle.files.keys().map(String::as_str).collect()
}

// =============================================================================
// Determinism and change sensitivity
// =============================================================================

#[test]
fn test_same_input_same_checksums() {
    let formats = ["txt", "md", "json", "pdf"];
    let a = generate_bundle(&content(), &formats, false).unwrap();
    let b = generate_bundle(&content(), &formats, false).unwrap();

    assert_eq!(a.bundle_checksum, b.bundle_checksum);
    assert_eq!(a.manifest, b.manifest);
    assert_eq!(a.files, b.files);
}

#[test]
fn test_zip_bytes_are_deterministic() {
    let a = generate_bundle(&content(), &["zip"], false).unwrap();
    let b = generate_bundle(&content(), &["zip"], false).unwrap();
    assert_eq!(a.files, b.files);
}

const SINGLE_FORMATS: [&str; 5] = ["txt", "md", "json", "pdf", "zip"];

fn checksum(content: &BundleContent, format: &str) -> String {
    generate_bundle(content, &[format], false).unwrap().bundle_checksum
}

fn with_prompt(prompt: &str) -> BundleContent {
    let mut content = content();
    content.prompt = prompt.to_string();
    content
}

fn with_domain(domain: &str) -> BundleContent {
    let mut content = content();
    content.seven_d.domain = domain.to_string();
    content
}

/// Pairs of inputs that differ in exactly one detail
fn changed_pairs() -> Vec<(&'static str, BundleContent, BundleContent)> {
    let mut appended = content();
    appended.prompt.push('!');

    let mut urgency = content();
    urgency.seven_d.urgency = "crisis".to_string();

    let mut clarity = content();
    if let Some(s) = clarity.scores.as_mut() {
        s.clarity = 84;
    }

    let mut unscored = content();
    unscored.scores = None;

    vec![
        ("prompt appended", content(), appended),
        ("diacritics", with_prompt("Prețul este mic"), with_prompt("Preșul este mic")),
        ("cjk prompt", with_prompt("计划预算"), with_prompt("写一首诗")),
        ("tab vs spaces", with_prompt("a\tb"), with_prompt("a    b")),
        ("trailing space", with_prompt("done "), with_prompt("done")),
        ("7d value", content(), urgency),
        ("7d newline", with_domain("fin\ntech"), with_domain("fin tech")),
        ("7d pipe", with_domain("fin|tech"), with_domain("fin tech")),
        ("7d escaped pipe", with_domain("fin\\|tech"), with_domain("fin|tech")),
        ("score", content(), clarity),
        ("scores removed", content(), unscored),
    ]
}

#[test]
fn test_any_content_change_changes_checksum() {
    let formats = ["txt", "md", "json"];
    for (label, a, b) in changed_pairs() {
        let before = generate_bundle(&a, &formats, false).unwrap().bundle_checksum;
        let after = generate_bundle(&b, &formats, false).unwrap().bundle_checksum;
        assert_ne!(before, after, "{}", label);
    }
}

#[test]
fn test_each_single_format_is_change_sensitive() {
    for format in SINGLE_FORMATS {
        for (label, a, b) in changed_pairs() {
            assert_ne!(checksum(&a, format), checksum(&b, format), "{} with {}", label, format);
        }
    }
}

#[test]
fn test_bundle_id_is_checksum_prefix() {
    let bundle = generate_bundle(&content(), &["txt"], false).unwrap();
    assert_eq!(bundle.bundle_checksum.len(), 64);
    assert_eq!(bundle.manifest.bundle_id, bundle.bundle_checksum[..12]);
    assert_eq!(bundle.manifest.checksums.bundle, bundle.bundle_checksum);
}

// =============================================================================
// File sets
// =============================================================================

#[test]
fn test_txt_md_json_yields_five_files() {
    let bundle = generate_bundle(&content(), &["txt", "md", "json"], false).unwrap();
    assert_eq!(
        names(&bundle),
        vec!["checksum.txt", "manifest.json", "prompt.json", "prompt.md", "prompt.txt"]
    );
}

#[test]
fn test_telemetry_included_when_present() {
    let mut content = content();
    content.telemetry = Some(telemetry());
    let bundle = generate_bundle(&content, &["txt", "md", "json"], false).unwrap();

    assert_eq!(bundle.files.len(), 6);
    let value: serde_json::Value = serde_json::from_slice(&bundle.files[TELEMETRY_FILE]).unwrap();
    assert_eq!(value["performance"], serde_json::to_value(telemetry()).unwrap());
}

#[test]
fn test_zip_alone_yields_single_archive() {
    let bundle = generate_bundle(&content(), &["zip"], false).unwrap();
    assert_eq!(bundle.files.len(), 1);

    let name = names(&bundle)[0];
    assert!(Regex::new(r"^bundle_[a-f0-9]{12}\.zip$").unwrap().is_match(name));
    assert_eq!(name, format!("bundle_{}.zip", bundle.manifest.bundle_id));
    assert_eq!(bundle.archive_name(), Some(name));
}

#[test]
fn test_archive_holds_the_whole_bundle() {
    let mut content = content();
    content.telemetry = Some(telemetry());
    let bundle = generate_bundle(&content, &["zip"], false).unwrap();
    let archive = read_archive(bundle.files.values().next().unwrap()).unwrap();

    let entries: Vec<&str> = archive.keys().map(String::as_str).collect();
    assert_eq!(
        entries,
        vec![
            "checksum.txt",
            "manifest.json",
            "prompt.json",
            "prompt.md",
            "prompt.txt",
            "telemetry.json"
        ]
    );

    let stored = Manifest::from_json(&archive["manifest.json"]).unwrap();
    assert_eq!(stored, bundle.manifest);
}

// =============================================================================
// Content rules
// =============================================================================

#[test]
fn test_scores_absent_means_no_scores_section() {
    let mut content = content();
    content.scores = None;
    let bundle = generate_bundle(&content, &["txt"], false).unwrap();
    let txt = String::from_utf8(bundle.files["prompt.txt"].clone()).unwrap();

    assert!(txt.contains("# PROMPT"));
    assert!(txt.contains("# CONFIGURATION"));
    assert!(!txt.contains("# SCORES"));
    assert_eq!(bundle.manifest.metadata.score_total, None);
}

#[test]
fn test_white_label_leaks_no_brand() {
    let mut content = content();
    content.telemetry = Some(telemetry());
    content.prompt = "You are the PromptForge assistant.".to_string();

    let bundle = generate_bundle(&content, &["txt", "md", "json", "pdf"], true).unwrap();
    for (name, bytes) in &bundle.files {
        assert!(
            !String::from_utf8_lossy(bytes).contains("PromptForge"),
            "{} leaks the brand",
            name
        );
    }
    assert!(!bundle.manifest.metadata.license_notice.is_empty());
}

#[test]
fn test_white_label_archive_leaks_no_brand() {
    let bundle = generate_bundle(&content(), &["zip"], true).unwrap();
    let archive = read_archive(bundle.files.values().next().unwrap()).unwrap();
    for (name, bytes) in &archive {
        assert!(!String::from_utf8_lossy(bytes).contains("PromptForge"), "{} leaks the brand", name);
    }
}

#[test]
fn test_unknown_format_rejected_whole() {
    let err = generate_bundle(&content(), &["bogus"], false).unwrap_err();
    assert_eq!(err, ExportError::UnsupportedFormat("bogus".to_string()));
    assert!(err.to_string().contains("bogus"));

    let err = generate_bundle(&content(), &["txt", "bogus"], false).unwrap_err();
    assert!(matches!(err, ExportError::UnsupportedFormat(token) if token == "bogus"));
}

#[test]
fn test_empty_format_list_rejected() {
    let none: [&str; 0] = [];
    assert_eq!(generate_bundle(&content(), &none, false).unwrap_err(), ExportError::NoFormats);
}

// =============================================================================
// Integrity
// =============================================================================

#[test]
fn test_manifest_checksums_match_files() {
    let mut content = content();
    content.telemetry = Some(telemetry());
    let bundle = generate_bundle(&content, &["txt", "md", "json", "pdf"], false).unwrap();

    for entry in &bundle.manifest.files {
        let bytes = &bundle.files[&entry.name];
        assert_eq!(sha256_hex(bytes), entry.checksum);
        assert_eq!(bytes.len() as u64, entry.size);
        assert_eq!(bundle.manifest.checksums.individual[&entry.name], entry.checksum);
    }
    assert!(verify_bundle(&bundle.files, &bundle.manifest).valid);
}

#[test]
fn test_manifest_json_matches_returned_manifest() {
    for white_label in [false, true] {
        let bundle = generate_bundle(&content(), &["json"], white_label).unwrap();
        let stored = Manifest::from_json(&bundle.files["manifest.json"]).unwrap();
        assert_eq!(stored, bundle.manifest);
    }
}

#[test]
fn test_checksum_listing_contents() {
    let bundle = generate_bundle(&content(), &["txt", "md"], false).unwrap();
    let listing = String::from_utf8(bundle.files["checksum.txt"].clone()).unwrap();

    assert!(listing.starts_with("SHA256 Checksums"));
    for entry in &bundle.manifest.files {
        assert!(listing.contains(&format!("{}  {}", entry.checksum, entry.name)));
    }
    assert!(listing.contains(&format!("Bundle Checksum: {}", bundle.bundle_checksum)));
}

#[test]
fn test_archive_verifies() {
    let bundle = generate_bundle(&content(), &["zip"], false).unwrap();
    let report = verify_archive(bundle.files.values().next().unwrap()).unwrap();
    assert!(report.valid);
}

#[test]
fn test_tampered_bundle_detected() {
    let mut bundle = generate_bundle(&content(), &["txt", "md"], false).unwrap();
    bundle.files.insert("prompt.md".to_string(), b"# edited".to_vec());

    let report = verify_bundle(&bundle.files, &bundle.manifest);
    assert!(!report.valid);
    assert_eq!(report.corrupted_files, vec!["prompt.md".to_string()]);
}

// =============================================================================
// Example scenario
// =============================================================================

#[test]
fn test_fintech_txt_example() {
    let bundle = generate_bundle(&content(), &["txt"], false).unwrap();
    let txt = String::from_utf8(bundle.files["prompt.txt"].clone()).unwrap();

    assert!(txt.starts_with("# PROMPT\nTest prompt"));
    assert!(txt.contains("Domain: fintech"));
    assert!(txt.contains("Clarity: 85/100"));
}

#[test]
fn test_trial_watermark_in_json() {
    let assembler = BundleAssembler::new(ExportConfig::default()).unwrap();
    let watermark = assembler.config().trial_watermark.clone();
    let bundle = assembler
        .generate(&content(), &["json"], &RenderOptions::new().with_watermark(watermark.clone()))
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&bundle.files["prompt.json"]).unwrap();
    assert_eq!(value["metadata"]["watermark"], watermark);
}
