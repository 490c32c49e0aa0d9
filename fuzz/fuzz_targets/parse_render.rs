#![no_main]

use go125_codegen::{EntityRenderer, GoSyntax, MarkerDecoder, SourceParser};
use libfuzzer_sys::fuzz_target;

// Whatever the parser accepts must render to text that parses again.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let parser = SourceParser::new(&GoSyntax, &MarkerDecoder);
    let Ok(file) = parser.parse("fuzz.go", text) else {
        return;
    };
    let Ok(rendered) = EntityRenderer::new(&GoSyntax).render(&file) else {
        return;
    };
    let again = parser
        .parse("fuzz.go", &rendered)
        .expect("rendered text parses");
    assert_eq!(again.package_name, file.package_name);
    assert_eq!(again.funcs.len(), file.funcs.len(), "{rendered}");
});
