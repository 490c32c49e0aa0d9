use std::path::PathBuf;

use go125_codegen::config::DEFAULT_DISCLAIMER;
use go125_codegen::driver::mark_generated;
use go125_codegen::*;

fn doc_file() -> File {
    File {
        const_groups: vec![ConstGroup {
            consts: vec![Const::new("A", "1")],
            ..ConstGroup::default()
        }],
        ..File::new("doc.go", "model")
    }
}

fn storage() -> Storage {
    Storage {
        namespaces: vec![
            Namespace {
                files: vec![doc_file(), File::new("empty.go", "model")],
                ..Namespace::new("model", "/src/model")
            },
            Namespace {
                files: vec![File::new("x.go", "internal")],
                is_ignored: true,
                ..Namespace::new("internal", "/src/internal")
            },
        ],
    }
}

#[test]
fn renders_every_namespace_in_order() {
    let renderer = Renderer::new(RenderConfig::default(), &GoSyntax);
    let mut storage = storage();
    let out = renderer.render(&mut storage).unwrap();

    let paths: Vec<PathBuf> = out.iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        paths,
        [PathBuf::from("/src/model/doc.go"), PathBuf::from("/src/model/empty.go")]
    );
    assert!(out.iter().all(|f| f.package == "model"));

    assert_eq!(
        out[0].text,
        format!("{DEFAULT_DISCLAIMER}\n\n// @Generated\npackage model\n\nconst A = 1\n")
    );
}

#[test]
fn marking_is_applied_in_place() {
    let renderer = Renderer::new(RenderConfig::default(), &GoSyntax);
    let mut storage = storage();
    renderer.render(&mut storage).unwrap();

    let model = &storage.namespaces[0];
    assert!(model.files.iter().all(|f| f.annotations.len() == 1));
    // Skipped namespaces are left alone.
    assert!(storage.namespaces[1].files[0].annotations.is_empty());

    // Rendering again does not stack markers.
    renderer.render(&mut storage).unwrap();
    assert_eq!(storage.namespaces[0].files[0].annotations.len(), 1);
}

#[test]
fn mark_generated_is_idempotent() {
    let mut file = File::new("a.go", "a");
    mark_generated(&mut file);
    mark_generated(&mut file);
    assert_eq!(file.annotations.len(), 1);
    assert!(file.annotations[0].is::<GeneratedAnnotation>());
}

#[test]
fn plain_config() {
    let config = RenderConfig {
        disclaimer: String::new(),
        mark_generated: false,
        skip_ignored: false,
        validate: true,
    };
    let renderer = Renderer::new(config, &GoSyntax);
    let mut storage = storage();
    let out = renderer.render(&mut storage).unwrap();

    assert_eq!(out.len(), 3);
    assert_eq!(out[0].text, "package model\n\nconst A = 1\n");
    assert_eq!(out[2].path, PathBuf::from("/src/internal/x.go"));
    assert_eq!(out[2].text, "package internal\n");
}

#[test]
fn disclaimer_is_not_doubled() {
    let disclaimer = "// Code generated by gen. DO NOT EDIT.";
    let config = RenderConfig {
        disclaimer: disclaimer.into(),
        mark_generated: false,
        ..RenderConfig::default()
    };
    let mut storage = Storage {
        namespaces: vec![Namespace {
            files: vec![File {
                content: format!("{disclaimer}\n\npackage model\n"),
                ..File::new("cached.go", "model")
            }],
            ..Namespace::new("model", "/src/model")
        }],
    };
    let out = Renderer::new(config, &GoSyntax).render(&mut storage).unwrap();
    assert_eq!(out[0].text, format!("{disclaimer}\n\npackage model\n"));
}

#[test]
fn invalid_storage_renders_nothing() {
    let mut storage = storage();
    storage.namespaces[0].path = "src/model".into();

    let renderer = Renderer::new(RenderConfig::default(), &GoSyntax);
    let err = renderer.render(&mut storage).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Namespaces[0]: Variable 'Path' must be an absolute path"
    );
    // Validation runs before anything is touched.
    assert!(storage.namespaces[0].files[0].annotations.is_empty());

    let config = RenderConfig {
        validate: false,
        ..RenderConfig::default()
    };
    let out = Renderer::new(config, &GoSyntax).render(&mut storage).unwrap();
    assert_eq!(out[0].path, PathBuf::from("src/model/doc.go"));
}

// ===== Config =====

#[test]
fn config_defaults() {
    let config = RenderConfig::default();
    assert_eq!(config.disclaimer, DEFAULT_DISCLAIMER);
    assert!(config.mark_generated && config.skip_ignored && config.validate);
    assert_eq!(RenderConfig::from_toml_str("").unwrap(), config);
}

#[test]
fn config_partial_toml() {
    let config = RenderConfig::from_toml_str("disclaimer = \"\"\nvalidate = false\n").unwrap();
    assert_eq!(
        config,
        RenderConfig {
            disclaimer: String::new(),
            validate: false,
            ..RenderConfig::default()
        }
    );
}

#[test]
fn config_rejects_unknown_keys() {
    let err = RenderConfig::from_toml_str("disclaimr = \"x\"\n").unwrap_err();
    assert!(matches!(err, Error::Config(_)), "{err:?}");
    assert!(err.to_string().starts_with("invalid config:"), "{err}");

    let err = RenderConfig::from_toml_str("validate = \"yes\"\n").unwrap_err();
    assert!(matches!(err, Error::Config(_)), "{err:?}");
}

#[test]
fn config_load() {
    let path = std::env::temp_dir().join(format!("go125_codegen_{}.toml", std::process::id()));
    std::fs::write(&path, "skip_ignored = false\n").unwrap();
    let config = RenderConfig::load(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(!config.unwrap().skip_ignored);

    let err = RenderConfig::load("/nonexistent/go125_codegen.toml").unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{err:?}");
}
