use go125_syntax::{format_source, parse_fragment};

#[test]
fn reindents_by_delimiter_depth() {
    let src = "package p\n\nfunc f(x int) int {\n      if x > 0 {\n  return 1\n        }\n    switch x {\n    case 1:\n  return 2\n  default:\n  }\nreturn 0\n}\n";
    let want = "package p\n\nfunc f(x int) int {\n\tif x > 0 {\n\t\treturn 1\n\t}\n\tswitch x {\n\tcase 1:\n\t\treturn 2\n\tdefault:\n\t}\n\treturn 0\n}\n";
    assert_eq!(format_source("f.go", src).unwrap(), want);
}

#[test]
fn blank_lines_are_normalized() {
    let src = "\n\npackage p   \n\n\n\nconst (\n\nA = 1\n\n)\n\n\n";
    let want = "package p\n\nconst (\n\tA = 1\n)\n";
    assert_eq!(format_source("f.go", src).unwrap(), want);
}

#[test]
fn raw_strings_and_block_comments_are_verbatim() {
    let src = "package p\n\nvar s = `line one\n   keep   \nend`\n\n/*\n   kept\n*/\nvar t = 1\n";
    let out = format_source("f.go", src).unwrap();
    assert!(out.contains("`line one\n   keep   \nend`"), "{out}");
    assert!(out.contains("/*\n   kept\n*/"), "{out}");
}

#[test]
fn line_opening_a_raw_string_keeps_its_tail() {
    let src = "package p\n\n   var s = `line one   \nline two`\n\n  /* open   \n  close */\nvar t = 1\n";
    let want = "package p\n\nvar s = `line one   \nline two`\n\n/* open   \n  close */\nvar t = 1\n";
    let out = format_source("f.go", src).unwrap();
    assert_eq!(out, want);
    assert_eq!(format_source("f.go", &out).unwrap(), want);
}

#[test]
fn formatting_is_idempotent() {
    let src = "package p\nimport (\n\"fmt\"\n)\ntype T struct {\nA int\nB struct {\nC string\n}\n}\nfunc (t T) String() string {\nreturn fmt.Sprint(t.A)\n}\n";
    let once = format_source("f.go", src).unwrap();
    let twice = format_source("f.go", &once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn format_rejects_invalid_files() {
    let err = format_source("gen.go", "package p\nfunc {\n").unwrap_err();
    assert_eq!(err.file, "gen.go");
    assert_eq!(err.first().unwrap().line, 2);
}

#[test]
fn fragments_accept_balanced_text() {
    for text in ["1", "a.B(c, d[0])", "x := map[string]int{\"a\": 1}\nreturn x", "", "// only comment"] {
        assert!(parse_fragment(text).is_ok(), "text={text:?}");
    }
}

#[test]
fn fragments_reject_bad_text() {
    let err = parse_fragment("f(x]").unwrap_err();
    assert_eq!(err.to_string(), "<fragment>:1:4: unexpected ']'");

    let err = parse_fragment("{ a").unwrap_err();
    assert_eq!(err.to_string(), "<fragment>:1:1: unclosed '{'");

    let err = parse_fragment("\"unterminated").unwrap_err();
    assert_eq!(err.first().unwrap().diag.message, "invalid token");
}
