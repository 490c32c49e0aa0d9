use go125_codegen::rename::rewrite_qualified;
use go125_codegen::*;
use proptest::prelude::*;

fn rename<E: walk::Walk>(entity: &mut E, old: &str, new: &str) -> Result<()> {
    EntityImportRenamer::new().rename(entity, old, new)
}

// ===== Raw text =====

#[test]
fn qualified_identifier_boundary() {
    assert_eq!(
        rewrite_qualified("(aExtra.F + a.F) * somea", "a", "b").as_deref(),
        Some("(aExtra.F + b.F) * somea")
    );
}

#[test]
fn raw_text_cases() {
    let cases = [
        ("a.F", Some("b.F")),
        ("a.F(a.G)", Some("b.F(b.G)")),
        ("a .F", Some("b .F")),
        ("a + 1", None),
        ("a", None),
        ("somea.F", None),
        ("a_.F", None),
        ("x.a.F", Some("x.b.F")),
        ("x.a", None),
        ("\"a.F\" + `a.F`", None),
        ("a.F // a.F", Some("b.F // a.F")),
        ("/* a.F */ a.F", Some("/* a.F */ b.F")),
        ("'a'", None),
        ("", None),
    ];
    for (text, want) in cases {
        assert_eq!(rewrite_qualified(text, "a", "b").as_deref(), want, "{text:?}");
    }
}

#[test]
fn lexing_errors_do_not_stop_rewriting() {
    assert_eq!(
        rewrite_qualified("# a.F", "a", "b").as_deref(),
        Some("# b.F")
    );
}

#[test]
fn multi_line_content() {
    let body = "v, err := json.Marshal(x)\nif err != nil {\n\treturn json.RawMessage(nil)\n}";
    assert_eq!(
        rewrite_qualified(body, "json", "enc").as_deref(),
        Some("v, err := enc.Marshal(x)\nif err != nil {\n\treturn enc.RawMessage(nil)\n}")
    );
}

// ===== Entities =====

fn sample_file() -> File {
    File {
        import_groups: vec![ImportGroup {
            imports: vec![
                Import::aliased("a", "example.com/alpha"),
                Import::new("example.com/a"),
                Import::new("fmt"),
            ],
            ..ImportGroup::default()
        }],
        const_groups: vec![ConstGroup {
            consts: vec![Const::typed("Size", Spec::qualified("a", "Size"), "a.Default * 2")],
            ..ConstGroup::default()
        }],
        var_groups: vec![VarGroup {
            vars: vec![Var::typed(
                "buf",
                Spec::array(Spec::qualified("a", "Cell"), "a.N"),
                "",
            )],
            ..VarGroup::default()
        }],
        type_groups: vec![TypeGroup {
            types: vec![Type::new(
                "Row",
                Spec::Struct(StructSpec {
                    fields: vec![
                        Field::unnamed(Spec::qualified("a", "Base")),
                        Field::new(
                            "Index",
                            Spec::map(Spec::qualified("a", "Key"), Spec::qualified("fmt", "Stringer")),
                        ),
                        Field::new(
                            "Visit",
                            Spec::Func(FuncSpec {
                                params: vec![Field::new("v", Spec::qualified("a", "Value"))],
                                ..FuncSpec::default()
                            }),
                        ),
                    ],
                }),
            )],
            ..TypeGroup::default()
        }],
        funcs: vec![Func {
            related: Some(Field::new("r", Spec::pointer("Row"))),
            ..Func::new("Print", "fmt.Println(a.Format(r), \"a.x\")\nsomea.Do()")
        }],
        ..File::new("row.go", "model")
    }
}

#[test]
fn rename_updates_every_reference() {
    let mut file = sample_file();
    rename(&mut file, "a", "alpha").unwrap();

    let imports = &file.import_groups[0].imports;
    assert_eq!(imports[0].alias, "alpha");
    // No explicit alias: left as is.
    assert_eq!(imports[1].alias, "");

    let c = &file.const_groups[0].consts[0];
    assert_eq!(c.value, "alpha.Default * 2");
    assert_eq!(c.spec, Some(Spec::qualified("alpha", "Size")));

    let v = &file.var_groups[0].vars[0];
    assert_eq!(v.spec, Some(Spec::array(Spec::qualified("alpha", "Cell"), "alpha.N")));

    let Spec::Struct(row) = &file.type_groups[0].types[0].spec else {
        panic!("expected a struct");
    };
    assert_eq!(row.fields[0].spec, Spec::qualified("alpha", "Base"));
    assert_eq!(
        row.fields[1].spec,
        Spec::map(Spec::qualified("alpha", "Key"), Spec::qualified("fmt", "Stringer"))
    );
    let Spec::Func(visit) = &row.fields[2].spec else {
        panic!("expected a func");
    };
    assert_eq!(visit.params[0].spec, Spec::qualified("alpha", "Value"));

    assert_eq!(
        file.funcs[0].content,
        "fmt.Println(alpha.Format(r), \"a.x\")\nsomea.Do()"
    );
    assert_eq!(file.funcs[0].related, Some(Field::new("r", Spec::pointer("Row"))));
}

#[test]
fn rename_file_content() {
    let mut file = File {
        content: "package p\n\nvar x = a.New()\n".into(),
        ..File::new("p.go", "p")
    };
    rename(&mut file, "a", "b").unwrap();
    assert_eq!(file.content, "package p\n\nvar x = b.New()\n");
}

#[test]
fn rename_requires_identifiers() {
    let original = sample_file();
    let mut file = sample_file();

    let err = rename(&mut file, "+a", "b").unwrap_err();
    assert_eq!(err.to_string(), "Variable 'OldAlias' must be a valid identifier");
    let err = rename(&mut file, "a", "func").unwrap_err();
    assert_eq!(err.to_string(), "Variable 'NewAlias' must be a valid identifier");
    let err = rename(&mut file, "", "b").unwrap_err();
    assert_eq!(err.to_string(), "Variable 'OldAlias' must be not empty");

    assert_eq!(file, original);
}

#[test]
fn rename_on_storage() {
    let mut storage = Storage {
        namespaces: vec![Namespace {
            files: vec![sample_file()],
            ..Namespace::new("model", "/src/model")
        }],
    };
    rename(&mut storage, "fmt", "format").unwrap();
    let file = &storage.namespaces[0].files[0];
    assert!(file.funcs[0].content.starts_with("format.Println("));
    // Only explicit aliases are renamed.
    assert_eq!(file.import_groups[0].imports[2].alias, "");
}

// ===== FetchImports =====

#[test]
fn fetch_resolves_by_last_segment() {
    let file = File {
        import_groups: vec![ImportGroup {
            imports: vec![Import::new("ns/pkg")],
            ..ImportGroup::default()
        }],
        ..File::new("a.go", "a")
    };
    let renamer = EntityImportRenamer::new();

    let found = renamer.fetch_imports(&Spec::qualified("pkg", "T"), &file).unwrap();
    assert_eq!(found, vec![&file.import_groups[0].imports[0]]);

    let found = renamer.fetch_imports(&Spec::qualified("other", "T"), &file).unwrap();
    assert!(found.is_empty());

    let found = renamer.fetch_imports(&Spec::simple("int"), &file).unwrap();
    assert!(found.is_empty());
}

#[test]
fn fetch_is_ordered_and_deduplicated() {
    let file = sample_file();
    let renamer = EntityImportRenamer::new();

    // Discovery order: a (Base), a (Key), fmt (Stringer), a (Value).
    let found = renamer
        .fetch_imports(&file.type_groups[0], &file)
        .unwrap();
    let paths: Vec<&str> = found.iter().map(|i| i.namespace.as_str()).collect();
    // Both the explicit alias and the path segment resolve `a`.
    assert_eq!(paths, ["example.com/alpha", "example.com/a", "fmt"]);

    let func = FuncSpec {
        params: vec![Field::new("w", Spec::qualified("fmt", "State"))],
        results: vec![Field::unnamed(Spec::qualified("fmt", "Stringer"))],
        ..FuncSpec::default()
    };
    let found = renamer.fetch_imports(&func, &file).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].namespace, "fmt");
}

#[test]
fn fetch_ignores_raw_text() {
    let file = sample_file();
    let found = EntityImportRenamer::new()
        .fetch_imports(&file.funcs[0], &file)
        .unwrap();
    assert!(found.is_empty());
}

// ===== Properties =====

fn ident() -> impl Strategy<Value = String> {
    // No Go keyword starts with 'z'.
    "z[a-z0-9_]{0,5}"
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn only_qualified_uses_change(old in ident(), new in ident(), other in ident()) {
        prop_assume!(old != other);
        let text = format!("({other}{old}.F + {old}.G) * {other}.H - {old} + {old}{other}.I");
        let want = format!("({other}{old}.F + {new}.G) * {other}.H - {old} + {old}{other}.I");
        let got = rewrite_qualified(&text, &old, &new);
        prop_assert_eq!(got.as_deref(), Some(want.as_str()));
    }

    #[test]
    fn text_without_selectors_is_untouched(words in prop::collection::vec(ident(), 0..8)) {
        let text = words.join(" + ");
        prop_assert_eq!(rewrite_qualified(&text, "zz", "q"), None);
    }

    #[test]
    fn rename_there_and_back(old in ident(), new in ident()) {
        prop_assume!(old != new);
        let text = format!("{old}.A({old}.B, \"{old}.C\")");
        let mut var = Var::typed("v", Spec::qualified(old.clone(), "T"), text.clone());
        rename(&mut var, &old, &new).unwrap();
        prop_assert_eq!(var.spec.as_ref(), Some(&Spec::qualified(new.clone(), "T")));
        rename(&mut var, &new, &old).unwrap();
        prop_assert_eq!(var.value, text);
    }
}
