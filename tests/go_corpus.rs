use go125_codegen::*;
use walkdir::WalkDir;

/// Parses every `.go` file under `GO125_CODEGEN_CORPUS` and renders the
/// model back. Files using constructs the model cannot express are counted
/// and skipped; anything the renderer emits must parse again.
#[test]
fn renders_go_corpus_if_configured() {
    let Some(root) = std::env::var_os("GO125_CODEGEN_CORPUS") else {
        eprintln!("GO125_CODEGEN_CORPUS not set; skipping corpus test");
        return;
    };

    let parser = SourceParser::new(&GoSyntax, &MarkerDecoder);
    let renderer = EntityRenderer::new(&GoSyntax);
    let mut total = 0usize;
    let mut unsupported = 0usize;

    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        if path.to_string_lossy().contains("testdata") {
            continue;
        }
        let Ok(src) = std::fs::read_to_string(path) else {
            continue;
        };
        total += 1;

        let name = path.display().to_string();
        let file = match parser.parse(&name, &src) {
            Ok(f) => f,
            Err(Error::Unsupported { .. }) => {
                unsupported += 1;
                continue;
            }
            Err(e) => panic!("{e}"),
        };

        let text = match renderer.render(&file) {
            Ok(t) => t,
            Err(e) => panic!("render failed for {name}: {e}"),
        };
        if let Err(e) = parser.parse(&name, &text) {
            panic!("rendered {name} does not parse: {e}\n{text}");
        }
    }

    eprintln!("Rendered {} of {total} Go files ({unsupported} unsupported).", total - unsupported);
}
