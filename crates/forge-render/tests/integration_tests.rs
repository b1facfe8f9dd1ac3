//! Integration tests for forge-render against the shipped template file.
//!
//! These go through the public API only: config in, RendererSet out,
//! rendered files checked for their layout contract.

use forge_core::{BundleContent, ExportConfig, ExportFormat, RenderOptions};
use forge_render::RendererSet;
use serde_json::json;

/// Path to the templates file relative to the crate root
const TEMPLATES_PATH: &str = "templates/export-templates.yaml";

fn templates_path() -> String {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    std::path::Path::new(&manifest_dir)
        .join(TEMPLATES_PATH)
        .to_string_lossy()
        .to_string()
}

fn healthcare_content() -> BundleContent {
    serde_json::from_value(json!({
        "prompt": "Summarize the patient intake form (name | DOB | allergies).",
        "sevenD": {
            "domain": "healthcare",
            "scale": "smb",
            "urgency": "crisis",
            "complexity": "intermediate",
            "resources": "lean_team",
            "application": "triage",
            "output_format": "table"
        },
        "metadata": {
            "runId": "run-9",
            "orgId": "org-1",
            "userId": "user-1",
            "createdAt": "2024-03-05T10:30:00Z",
            "version": "2.1.0"
        }
    }))
    .unwrap()
}

fn renderers() -> RendererSet {
    let config = ExportConfig {
        templates_path: Some(templates_path()),
        ..ExportConfig::default()
    };
    RendererSet::from_config(&config).unwrap()
}

fn render_text(format: ExportFormat, content: &BundleContent, options: &RenderOptions) -> String {
    let file = renderers().render(format, content, options).unwrap();
    String::from_utf8(file.bytes).unwrap()
}

// =============================================================================
// Template file
// =============================================================================

#[test]
fn test_file_templates_match_builtin() {
    let content = healthcare_content();
    let from_file = renderers();
    let builtin = RendererSet::builtin().unwrap();

    for format in [ExportFormat::Txt, ExportFormat::Md, ExportFormat::Json] {
        let a = from_file.render(format, &content, &RenderOptions::new()).unwrap();
        let b = builtin.render(format, &content, &RenderOptions::new()).unwrap();
        assert_eq!(a, b, "{} differs", format);
    }
}

#[test]
fn test_missing_templates_file_is_config_error() {
    let config = ExportConfig {
        templates_path: Some("/nonexistent/templates.yaml".to_string()),
        ..ExportConfig::default()
    };
    let err = RendererSet::from_config(&config).err().unwrap();
    assert_eq!(err.kind(), "config");
}

// =============================================================================
// Layout contracts
// =============================================================================

#[test]
fn test_txt_without_scores_or_module() {
    let text = render_text(ExportFormat::Txt, &healthcare_content(), &RenderOptions::new());

    assert!(text.contains("# PROMPT\nSummarize the patient intake form"));
    assert!(text.contains("Domain: healthcare"));
    assert!(text.contains("Resources: lean_team"));
    assert!(!text.contains("# SCORES"));
    assert!(!text.contains("Module:"));
    assert!(text.contains("Run: run-9"));
}

#[test]
fn test_signature_derived_when_absent() {
    let content = healthcare_content();
    let signature = content.seven_d.effective_signature();
    assert_eq!(signature.len(), 16);

    let text = render_text(ExportFormat::Txt, &content, &RenderOptions::new());
    assert!(text.contains(&format!("Signature: {}", signature)));
}

#[test]
fn test_md_escapes_pipes_in_table_only() {
    let mut content = healthcare_content();
    content.seven_d.application = "triage | intake".to_string();
    let text = render_text(ExportFormat::Md, &content, &RenderOptions::new());

    assert!(text.contains("| Application | triage \\| intake |"));
    // the prompt sits in a code fence, verbatim
    assert!(text.contains("(name | DOB | allergies)"));
}

#[test]
fn test_json_omits_scores_and_keeps_null_module() {
    let file = renderers()
        .render(ExportFormat::Json, &healthcare_content(), &RenderOptions::new())
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&file.bytes).unwrap();

    assert!(value.get("scores").is_none());
    assert!(value["metadata"]["module_id"].is_null());
    assert_eq!(value["metadata"]["version"], "2.1.0");
    assert_eq!(file.mime_type, "application/json");
}

#[test]
fn test_pdf_is_a_pdf() {
    let file = renderers()
        .render(ExportFormat::Pdf, &healthcare_content(), &RenderOptions::new())
        .unwrap();
    assert!(file.bytes.starts_with(b"%PDF-"));
    assert!(file.bytes.ends_with(b"%%EOF\n"));
    assert_eq!(file.name, "prompt.pdf");
}

#[test]
fn test_pdf_carries_exact_txt_rendering() {
    let mut content = healthcare_content();
    content.prompt = "Prețul este mic\t计划预算".to_string();
    let set = renderers();
    let options = RenderOptions::new();

    let txt = set.render(ExportFormat::Txt, &content, &options).unwrap();
    let pdf = set.render(ExportFormat::Pdf, &content, &options).unwrap();
    assert!(pdf.bytes.windows(txt.bytes.len()).any(|w| w == txt.bytes.as_slice()));
}

// =============================================================================
// White-label
// =============================================================================

#[test]
fn test_white_label_scrubs_every_format() {
    let mut content = healthcare_content();
    content.prompt = "Act like the PromptForge™ assistant".to_string();
    let set = renderers();
    let options = RenderOptions::new().white_label(true);

    for format in set.formats() {
        let file = set.render(format, &content, &options).unwrap();
        let text = String::from_utf8_lossy(&file.bytes);
        assert!(!text.contains("PromptForge"), "{} still branded", format);
        assert!(!set.branding().mentions_brand(&text), "{} still branded", format);
    }
}

#[test]
fn test_branded_by_default() {
    let text = render_text(ExportFormat::Md, &healthcare_content(), &RenderOptions::new());
    assert!(text.contains("Generated by PromptForge v3"));
}
