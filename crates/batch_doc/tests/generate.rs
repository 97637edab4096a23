//! Test both ways of generating documentation from a registry file.

use batch_doc::{
    generate_documentation, BatchDocumentationHandler, CommandRegistry, Dispatcher, Layout,
    RunParmFile,
};
use expect_test::expect;

const REGISTRY: &str = r#"[
    {"name": "VerifyProof", "documentation": "<p>Verifies all proofs.</p>"},
    {"name": "LoadFile", "documentation": "<p>Loads a Metamath file.</p>"},
    {"name": "loadfile", "documentation": "<p>Ignored duplicate.</p>"}
]"#;

fn load_registry(dir: &std::path::Path) -> CommandRegistry {
    let path = dir.join("commands.json");
    std::fs::write(&path, REGISTRY).unwrap();
    CommandRegistry::load(&path).unwrap()
}

#[test]
fn standalone_generation_writes_indexed_layout() {
    let dir = tempfile::tempdir().unwrap();
    let registry = load_registry(dir.path());
    let out = dir.path().join("docs.html");

    generate_documentation(&registry, Layout::Indexed, &out).unwrap();

    expect![[r##"
        <html>
        <article>
        <h1>Table of content</h1>
        <ul><li><a href="#command0">LoadFile</a>
        <li><a href="#command1">VerifyProof</a>
        </ul><br><h1>Content</h1>
        <br><hr>
        <h3 id="command0">LoadFile</h3>

        <p>Loads a Metamath file.</p>
        <br><hr>
        <h3 id="command1">VerifyProof</h3>

        <p>Verifies all proofs.</p>
        <br></article>
        </html>"##]]
    .assert_eq(&std::fs::read_to_string(&out).unwrap());
}

#[test]
fn runparm_generation_writes_plain_layout() {
    let dir = tempfile::tempdir().unwrap();
    let registry = load_registry(dir.path());
    let out = dir.path().join("plain.html");
    let runparms = RunParmFile::parse(&format!(
        "* Documentation only\ngeneratebatchdocumentation,{}\n",
        out.display()
    ))
    .unwrap();

    let unconsumed = Dispatcher::new()
        .with_handler(BatchDocumentationHandler::new(&registry))
        .run(&runparms)
        .unwrap();

    assert!(unconsumed.is_empty());
    expect![[r#"
        <html>
        <p>Verifies all proofs.</p><p>Loads a Metamath file.</p>
        </html>"#]]
    .assert_eq(&std::fs::read_to_string(&out).unwrap());
}

#[test]
fn missing_registry_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let result = CommandRegistry::load(dir.path().join("missing.json"));

    assert!(matches!(result, Err(batch_doc::DocError::Io(_))));
}
