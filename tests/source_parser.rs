use go125_codegen::*;

fn parse(text: &str) -> Result<File> {
    SourceParser::new(&GoSyntax, &MarkerDecoder).parse("model.go", text)
}

fn render(file: &File) -> String {
    EntityRenderer::new(&GoSyntax).render(file).unwrap()
}

const MODEL_GO: &str = r#"// Package model holds users.
// @Generated
package model

import (
	"fmt"
	j "encoding/json" // codec
	_ "embed"
)

// Limits.
const (
	// Max is the cap.
	Max = 10
	Ratio = 1.5
	Name string = "x"
	A, B = 1, 'b'
)

var cache = map[string]int{}

var x, y int

type (
	ID int64
	Alias = string
	User struct {
		ID   ID `json:"id"`
		Tags []string
		*Base
		io.Reader
	}
	Handler func(ctx context.Context, args ...string) (int, error)
	Store interface {
		io.Closer
		Get(key string) (*User, bool)
	}
)

// String renders the user.
func (u *User) String() string {
	return fmt.Sprint(u.ID)
}

func main() {}
"#;

#[test]
fn file_header() {
    let file = parse(MODEL_GO).unwrap();
    assert_eq!(file.name, "model.go");
    assert_eq!(file.package_name, "model");
    assert_eq!(file.comment, "Package model holds users.\n@Generated");
    assert_eq!(file.annotations.len(), 1);
    assert!(file.annotations[0].is::<GeneratedAnnotation>());
    assert!(file.content.is_empty());
}

#[test]
fn imports() {
    let file = parse(MODEL_GO).unwrap();
    assert_eq!(file.import_groups.len(), 1);
    let imports = &file.import_groups[0].imports;
    assert_eq!(imports.len(), 3);

    assert_eq!(imports[0], Import::new("fmt"));
    assert_eq!(
        imports[1],
        Import {
            comment: "codec".into(),
            ..Import::aliased("j", "encoding/json")
        }
    );
    assert_eq!(imports[2], Import::aliased("_", "embed"));
}

#[test]
fn consts_infer_literal_types() {
    let file = parse(MODEL_GO).unwrap();
    let group = &file.const_groups[0];
    assert_eq!(group.comment, "Limits.");

    let consts: Vec<(&str, &str, Option<String>)> = group
        .consts
        .iter()
        .map(|c| (c.name.as_str(), c.value.as_str(), c.spec.as_ref().map(Spec::to_string)))
        .collect();
    assert_eq!(
        consts,
        [
            ("Max", "10", Some("int".to_string())),
            ("Ratio", "1.5", Some("float64".to_string())),
            ("Name", "\"x\"", Some("string".to_string())),
            ("A", "1", Some("int".to_string())),
            ("B", "'b'", Some("rune".to_string())),
        ]
    );
    assert_eq!(group.consts[0].comment, "Max is the cap.");
    assert_eq!(group.consts[1].comment, "");
}

#[test]
fn literal_defaults() {
    use go125_syntax::ast::BasicLitKind;
    use go125_codegen::source::literal_type;

    assert_eq!(literal_type(BasicLitKind::Int), "int");
    assert_eq!(literal_type(BasicLitKind::Float), "float64");
    assert_eq!(literal_type(BasicLitKind::Imag), "complex128");
    assert_eq!(literal_type(BasicLitKind::Rune), "rune");
    assert_eq!(literal_type(BasicLitKind::String), "string");
}

#[test]
fn vars_expand_names() {
    let file = parse(MODEL_GO).unwrap();
    assert_eq!(file.var_groups.len(), 2);

    // Not a basic literal: no inferred type.
    assert_eq!(file.var_groups[0].vars, [Var::new("cache", "map[string]int{}")]);

    let shared = Spec::simple("int");
    assert_eq!(
        file.var_groups[1].vars,
        [
            Var::typed("x", shared.clone(), ""),
            Var::typed("y", shared, ""),
        ]
    );
}

#[test]
fn types() {
    let file = parse(MODEL_GO).unwrap();
    let types = &file.type_groups[0].types;
    assert_eq!(types.len(), 5);

    assert_eq!(types[0], Type::new("ID", Spec::simple("int64")));
    assert_eq!(
        types[1],
        Type {
            is_alias: true,
            ..Type::new("Alias", Spec::simple("string"))
        }
    );

    assert_eq!(
        types[2].spec,
        Spec::Struct(StructSpec {
            fields: vec![
                Field {
                    tag: "`json:\"id\"`".into(),
                    ..Field::new("ID", Spec::simple("ID"))
                },
                Field::new("Tags", Spec::slice(Spec::simple("string"))),
                Field::unnamed(Spec::pointer("Base")),
                Field::unnamed(Spec::qualified("io", "Reader")),
            ],
        })
    );

    assert_eq!(
        types[3].spec,
        Spec::Func(FuncSpec {
            params: vec![
                Field::new("ctx", Spec::qualified("context", "Context")),
                Field::new("args", Spec::slice(Spec::simple("string"))),
            ],
            results: vec![
                Field::unnamed(Spec::simple("int")),
                Field::unnamed(Spec::simple("error")),
            ],
            is_variadic: true,
        })
    );

    assert_eq!(
        types[4].spec.to_string(),
        "interface {\nio.Closer\nGet(key string) (*User, bool)\n}"
    );
}

#[test]
fn funcs() {
    let file = parse(MODEL_GO).unwrap();
    assert_eq!(file.funcs.len(), 2);

    let string = &file.funcs[0];
    assert_eq!(string.name, "String");
    assert_eq!(string.comment, "String renders the user.");
    assert_eq!(string.content, "return fmt.Sprint(u.ID)");
    assert_eq!(string.related, Some(Field::new("u", Spec::pointer("User"))));
    assert_eq!(
        string.spec,
        Some(FuncSpec {
            results: vec![Field::unnamed(Spec::simple("string"))],
            ..FuncSpec::default()
        })
    );

    assert_eq!(file.funcs[1], Func::new("main", ""));
}

#[test]
fn ungrouped_doc_belongs_to_member() {
    let file = parse("package p\n\n// Answer is fixed.\nconst Answer = 42\n").unwrap();
    let group = &file.const_groups[0];
    assert_eq!(group.comment, "");
    assert_eq!(group.consts[0].comment, "Answer is fixed.");
}

#[test]
fn member_annotations_are_decoded() {
    let file = parse("package p\n\ntype (\n\t// @Generated\n\tID int\n)\n").unwrap();
    let ty = &file.type_groups[0].types[0];
    assert_eq!(ty.comment, "@Generated");
    assert!(annotation::contains::<GeneratedAnnotation>(&ty.annotations));
    assert!(file.type_groups[0].annotations.is_empty());
}

#[test]
fn iota_sequence() {
    let file = parse("package p\n\nconst (\n\tX = iota\n\tY\n)\n").unwrap();
    assert_eq!(
        file.const_groups[0].consts,
        [Const::new("X", "iota"), Const::new("Y", "")]
    );
}

#[test]
fn unsupported_constructs() {
    let cases = [
        ("package p\ntype S[T any] struct{}\n", "unsupported generic type 'S'"),
        ("package p\nfunc F[T any]() {}\n", "unsupported generic function 'F'"),
        ("package p\nvar c chan int\n", "unsupported channel type"),
        ("package p\nvar a, b = f()\n", "unsupported assignment of 1 values to 2 names"),
        ("package p\nvar p *[]int\n", "unsupported pointer to ArraySpec"),
        ("package p\nfunc Asm(x int) int\n", "unsupported function 'Asm' without body"),
    ];
    for (text, want) in cases {
        let err = parse(text).unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }), "{text:?}: {err:?}");
        assert_eq!(err.to_string(), want, "{text:?}");
    }
}

#[test]
fn syntax_errors_pass_through() {
    let err = SourceParser::new(&GoSyntax, &MarkerDecoder)
        .parse("x.go", "var x")
        .unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "{err:?}");
    assert_eq!(err.to_string(), "x.go:1:1: expected 'package', found 'var'");
}

#[test]
fn parse_of_render_is_identity() {
    let file = parse(MODEL_GO).unwrap();
    let text = render(&file);
    let again = SourceParser::new(&GoSyntax, &MarkerDecoder)
        .parse("model.go", &text)
        .unwrap();
    assert_eq!(again, file, "{text}");
    assert_eq!(render(&again), text);
}

#[test]
fn parse_of_built_file() {
    let file = File {
        comment: "Package shapes.".into(),
        const_groups: vec![ConstGroup {
            comment: "Sides.".into(),
            consts: vec![
                Const::typed("Tri", Spec::simple("int"), "3"),
                Const::typed("Quad", Spec::simple("int"), "4"),
            ],
            ..ConstGroup::default()
        }],
        type_groups: vec![TypeGroup {
            types: vec![Type::new(
                "Shape",
                Spec::Interface(InterfaceSpec {
                    fields: vec![Field::new(
                        "Area",
                        Spec::Func(FuncSpec {
                            results: vec![Field::unnamed(Spec::simple("float64"))],
                            ..FuncSpec::default()
                        }),
                    )],
                }),
            )],
            ..TypeGroup::default()
        }],
        ..File::new("model.go", "shapes")
    };
    assert_eq!(parse(&render(&file)).unwrap(), file);
}
