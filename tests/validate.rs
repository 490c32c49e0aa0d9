use go125_codegen::*;

fn validate<E: Validate>(entity: &E) -> Result<()> {
    EntityValidator::new(&GoSyntax).validate(entity)
}

fn message<E: Validate>(entity: &E) -> String {
    match validate(entity) {
        Ok(()) => panic!("expected a validation error"),
        Err(err) => err.to_string(),
    }
}

fn user_type() -> Type {
    Type::new(
        "User",
        Spec::Struct(StructSpec {
            fields: vec![
                Field {
                    tag: "`json:\"id\"`".into(),
                    ..Field::new("ID", Spec::simple("int"))
                },
                Field::new("Tags", Spec::slice(Spec::simple("string"))),
                Field::unnamed(Spec::qualified("sync", "Mutex")),
            ],
        }),
    )
}

fn valid_file() -> File {
    File {
        import_groups: vec![ImportGroup {
            imports: vec![Import::new("sync"), Import::aliased("_", "embed")],
            ..ImportGroup::default()
        }],
        const_groups: vec![ConstGroup {
            consts: vec![Const::new("A", "iota"), Const::new("B", "")],
            ..ConstGroup::default()
        }],
        var_groups: vec![VarGroup {
            vars: vec![Var::typed("cache", Spec::map(Spec::simple("string"), Spec::simple("int")), "")],
            ..VarGroup::default()
        }],
        type_groups: vec![TypeGroup {
            types: vec![user_type()],
            ..TypeGroup::default()
        }],
        funcs: vec![Func {
            related: Some(Field::new("u", Spec::pointer("User"))),
            spec: Some(FuncSpec {
                results: vec![Field::unnamed(Spec::simple("int"))],
                ..FuncSpec::default()
            }),
            ..Func::new("ID", "return u.ID")
        }],
        ..File::new("user.go", "model")
    }
}

#[test]
fn valid_storage_passes() {
    let storage = Storage {
        namespaces: vec![Namespace {
            files: vec![valid_file(), File::new("doc.go", "model")],
            ..Namespace::new("model", "/src/model")
        }],
    };
    validate(&storage).unwrap();
}

// ===== Required fields and identifiers =====

#[test]
fn default_element_in_sequence() {
    let spec = StructSpec {
        fields: vec![Field::new("ID", Spec::simple("int")), Field::default()],
    };
    assert_eq!(message(&spec), "Fields[1].Spec: Variable 'TypeName' must be not empty");

    let group = ConstGroup {
        consts: vec![Const::new("A", "1"), Const::default()],
        ..ConstGroup::default()
    };
    assert_eq!(message(&group), "Consts[1]: Variable 'Name' must be not empty");
}

#[test]
fn empty_required_name() {
    assert_eq!(
        message(&Type::new("", Spec::simple("int"))),
        "Variable 'Name' must be not empty"
    );
    assert_eq!(message(&Import::new("")), "Variable 'Namespace' must be not empty");
    assert_eq!(message(&File::new("a.go", "")), "Variable 'PackageName' must be not empty");
}

#[test]
fn non_identifier_name() {
    assert_eq!(
        message(&Type::new("+invalid", Spec::simple("int"))),
        "Variable 'Name' must be a valid identifier"
    );
    assert_eq!(
        message(&Const::new("func", "1")),
        "Variable 'Name' must be a valid identifier"
    );
    assert_eq!(
        message(&Import::aliased("1x", "fmt")),
        "Variable 'Alias' must be a valid identifier"
    );
    assert_eq!(
        message(&Spec::qualified("a-b", "T")),
        "Variable 'PackageName' must be a valid identifier"
    );
}

#[test]
fn emptiness_is_reported_before_shape() {
    let spec = Spec::Simple(SimpleSpec::new("+bad", ""));
    assert_eq!(message(&spec), "Variable 'TypeName' must be not empty");
    assert_eq!(message(&Namespace::new("", "relative")), "Variable 'Name' must be not empty");
}

#[test]
fn special_import_aliases() {
    validate(&Import::aliased("_", "embed")).unwrap();
    validate(&Import::aliased(".", "math")).unwrap();
    assert_eq!(
        message(&Import::new("bad path")),
        "Variable 'Namespace' must be a valid import path"
    );
}

// ===== Func specs =====

#[test]
fn variadic_requires_trailing_slice() {
    let spec = FuncSpec {
        params: vec![Field::new("format", Spec::simple("string")), Field::new("args", Spec::simple("any"))],
        is_variadic: true,
        ..FuncSpec::default()
    };
    assert_eq!(
        message(&spec),
        "Params[1]: Last param must be a slice ArraySpec for variadic FuncSpec, found SimpleSpec"
    );

    let fixed = FuncSpec {
        params: vec![Field::new("args", Spec::array(Spec::simple("any"), "2"))],
        is_variadic: true,
        ..FuncSpec::default()
    };
    assert!(message(&fixed).ends_with("found ArraySpec"));

    let ok = FuncSpec {
        params: vec![Field::new("args", Spec::slice(Spec::simple("any")))],
        is_variadic: true,
        ..FuncSpec::default()
    };
    validate(&ok).unwrap();
}

#[test]
fn variadic_without_params() {
    let spec = FuncSpec {
        is_variadic: true,
        ..FuncSpec::default()
    };
    assert_eq!(message(&spec), "Params must be not empty for variadic FuncSpec");
}

#[test]
fn mixed_named_and_unnamed_results() {
    let spec = FuncSpec {
        results: vec![Field::new("n", Spec::simple("int")), Field::unnamed(Spec::simple("error"))],
        ..FuncSpec::default()
    };
    assert_eq!(message(&spec), "Results must be all named or all unnamed");

    let params = FuncSpec {
        params: vec![Field::unnamed(Spec::simple("int")), Field::new("b", Spec::simple("int"))],
        ..FuncSpec::default()
    };
    assert_eq!(message(&params), "Params must be all named or all unnamed");
}

// ===== Struct and interface members =====

#[test]
fn struct_members() {
    let anonymous_map = StructSpec {
        fields: vec![Field::unnamed(Spec::map(Spec::simple("string"), Spec::simple("int")))],
    };
    assert_eq!(
        message(&anonymous_map),
        "Fields[0]: Variable 'Name' must be not empty for MapSpec field"
    );

    let bad_tag = StructSpec {
        fields: vec![Field {
            tag: "json:\"id\"".into(),
            ..Field::new("ID", Spec::simple("int"))
        }],
    };
    assert_eq!(message(&bad_tag), "Fields[0]: Variable 'Tag' must be a string literal");

    let embedded_pointer = StructSpec {
        fields: vec![Field::unnamed(Spec::pointer("Base"))],
    };
    validate(&embedded_pointer).unwrap();
}

#[test]
fn interface_members() {
    let method = Field::new(
        "Close",
        Spec::Func(FuncSpec {
            results: vec![Field::unnamed(Spec::simple("error"))],
            ..FuncSpec::default()
        }),
    );
    let embedded = Field::unnamed(Spec::qualified("io", "Reader"));
    validate(&InterfaceSpec {
        fields: vec![embedded, method],
    })
    .unwrap();

    let unnamed_method = InterfaceSpec {
        fields: vec![Field::unnamed(Spec::Func(FuncSpec::default()))],
    };
    assert_eq!(message(&unnamed_method), "Fields[0]: Variable 'Name' must be not empty");

    let named_embed = InterfaceSpec {
        fields: vec![Field::new("r", Spec::simple("Reader"))],
    };
    assert_eq!(message(&named_embed), "Fields[0]: Name must be empty for embedded interface");

    let slice_elem = InterfaceSpec {
        fields: vec![Field::unnamed(Spec::slice(Spec::simple("int")))],
    };
    assert_eq!(message(&slice_elem), "Fields[0]: ArraySpec is not allowed in InterfaceSpec");
}

#[test]
fn tags_only_on_struct_fields() {
    let spec = FuncSpec {
        params: vec![Field {
            tag: "`x`".into(),
            ..Field::new("a", Spec::simple("int"))
        }],
        ..FuncSpec::default()
    };
    assert_eq!(message(&spec), "Params[0]: Tag is only allowed on struct fields");
}

// ===== Declarations =====

#[test]
fn const_spec_rules() {
    let pointer = Const::typed("A", Spec::pointer("int"), "nil");
    assert_eq!(message(&pointer), "Variable 'IsPointer' must be false for Const Spec");

    let slice = Const::typed("A", Spec::slice(Spec::simple("int")), "nil");
    assert_eq!(message(&slice), "Const Spec must be a SimpleSpec, found ArraySpec");

    validate(&Const::typed("A", Spec::simple("int"), "1 << 3")).unwrap();
}

#[test]
fn var_needs_spec_or_value() {
    assert_eq!(message(&Var::new("x", "")), "Var must have a Spec or a Value");
    validate(&Var::new("x", "make(map[string]int)")).unwrap();
    validate(&Var::typed("x", Spec::simple("int"), "")).unwrap();
}

#[test]
fn raw_text_errors_pass_through() {
    let err = validate(&Var::new("x", "f(1")).unwrap_err();
    let Error::Syntax(syntax) = &err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert_eq!(syntax.to_string(), "<fragment>:1:2: unclosed '('");

    // Nesting does not wrap syntax errors.
    let group = VarGroup {
        vars: vec![Var::new("ok", "1"), Var::new("x", "f(1")],
        ..VarGroup::default()
    };
    assert_eq!(message(&group), "<fragment>:1:2: unclosed '('");

    let func = Func::new("main", "if x {");
    assert!(matches!(validate(&func), Err(Error::Syntax(_))));
}

#[test]
fn receiver_rules() {
    let foreign = Func {
        related: Some(Field::new("t", Spec::qualified("time", "Time"))),
        ..Func::new("Unix2", "")
    };
    assert_eq!(
        message(&foreign),
        "Related.Spec: Variable 'PackageName' must be empty for receiver"
    );

    let slice = Func {
        related: Some(Field::new("s", Spec::slice(Spec::simple("int")))),
        ..Func::new("Len", "")
    };
    assert_eq!(message(&slice), "Related: Related Spec must be a SimpleSpec, found ArraySpec");
}

#[test]
fn file_content_is_parsed() {
    let file = File {
        content: "package model\n\nvar = 1\n".into(),
        ..File::new("broken.go", "model")
    };
    let err = validate(&file).unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "{err:?}");
    assert!(err.to_string().starts_with("broken.go:3:"), "{err}");
}

// ===== Containers =====

#[test]
fn nested_path_is_reported() {
    let mut file = valid_file();
    file.type_groups[0].types[0] = Type::new(
        "Pair",
        Spec::Struct(StructSpec {
            fields: vec![
                Field::new("Key", Spec::simple("string")),
                Field::new("Value", Spec::map(Spec::simple("string"), Spec::simple(""))),
            ],
        }),
    );
    let storage = Storage {
        namespaces: vec![Namespace {
            files: vec![file],
            ..Namespace::new("model", "/src/model")
        }],
    };

    let err = validate(&storage).unwrap_err();
    let Error::Invalid(invalid) = &err else {
        panic!("{err:?}");
    };
    assert_eq!(
        invalid.path(),
        "Namespaces[0].Files[0].TypeGroups[0].Types[0].Spec.Fields[1].Spec.Value"
    );
    assert_eq!(invalid.message(), "Variable 'TypeName' must be not empty");
}

#[test]
fn namespace_rules() {
    let relative = Namespace::new("model", "src/model");
    assert_eq!(message(&relative), "Variable 'Path' must be an absolute path");

    let duplicate = Namespace {
        files: vec![File::new("a.go", "model"), File::new("a.go", "model")],
        ..Namespace::new("model", "/src/model")
    };
    assert_eq!(message(&duplicate), "Files[1]: Duplicate file name 'a.go'");

    let mixed = Namespace {
        files: vec![File::new("a.go", "model"), File::new("b.go", "other")],
        ..Namespace::new("model", "/src/model")
    };
    assert_eq!(message(&mixed), "Files[1]: PackageName 'other' differs from 'model'");
}

#[test]
fn namespaces_sharing_a_path() {
    let storage = Storage {
        namespaces: vec![
            Namespace::new("a", "/src/shared"),
            Namespace::new("b", "/src/shared"),
        ],
    };
    assert_eq!(message(&storage), "Namespaces[1]: Duplicate namespace path '/src/shared'");

    let storage = Storage {
        namespaces: vec![Namespace::new("a", "/src/a"), Namespace::new("a", "/src/b")],
    };
    assert_eq!(message(&storage), "Namespaces[1]: Duplicate namespace name 'a'");
}
