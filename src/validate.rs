//! Structural invariants of the declaration model.
//!
//! Validation stops at the first violation. Each entity checks, in order:
//! required fields, identifier shape, kind-specific rules, then its children.
//! Errors from children are prefixed with the child's location, so a failure
//! reads like `Namespaces[0].Files[1].TypeGroups[0].Types[2].Spec: ...`.
//! Raw text is handed to the [`SyntaxService`] and its errors pass through
//! untouched.

use std::collections::HashSet;
use std::path::Path;

use tracing::trace;

use crate::entity::*;
use crate::error::{Error, InvalidEntity, Result};
use crate::ident;
use crate::syntax::SyntaxService;

pub trait Validate {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()>;
}

pub struct EntityValidator<'s> {
    syntax: &'s dyn SyntaxService,
}

impl<'s> EntityValidator<'s> {
    pub fn new(syntax: &'s dyn SyntaxService) -> Self {
        Self { syntax }
    }

    pub fn validate<E: Validate + ?Sized>(&self, entity: &E) -> Result<()> {
        entity.validate_with(self)
    }

    fn each<T: Validate>(&self, items: &[T], segment: &str) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            item.validate_with(self)
                .map_err(|e| e.within(format_args!("{segment}[{i}]")))?;
        }
        Ok(())
    }

    fn fragment(&self, text: &str) -> Result<()> {
        if !text.is_empty() {
            self.syntax.parse_fragment(text)?;
        }
        Ok(())
    }
}

// =============================================================================
// Field checks
// =============================================================================

fn invalid(message: impl Into<String>) -> Error {
    InvalidEntity::new(message).into()
}

fn required(value: &str, variable: &str) -> Result<()> {
    if value.is_empty() {
        return Err(InvalidEntity::empty(variable).into());
    }
    Ok(())
}

fn identifier(value: &str, variable: &str) -> Result<()> {
    if !ident::is_identifier(value) {
        return Err(InvalidEntity::not_identifier(variable).into());
    }
    Ok(())
}

fn optional_identifier(value: &str, variable: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    identifier(value, variable)
}

fn within<T>(result: Result<T>, segment: &str) -> Result<T> {
    result.map_err(|e| e.within(segment))
}

fn check_tag(field: &Field) -> Result<()> {
    if !field.tag.is_empty() && !ident::is_string_literal(&field.tag) {
        return Err(invalid("Variable 'Tag' must be a string literal"));
    }
    Ok(())
}

fn no_tag(field: &Field) -> Result<()> {
    if !field.tag.is_empty() {
        return Err(invalid("Tag is only allowed on struct fields"));
    }
    Ok(())
}

fn uniform_naming(fields: &[Field], what: &str) -> Result<()> {
    let named = fields.iter().filter(|f| !f.name.is_empty()).count();
    if named != 0 && named != fields.len() {
        return Err(invalid(format!("{what} must be all named or all unnamed")));
    }
    Ok(())
}

// =============================================================================
// Specs
// =============================================================================

impl Validate for Spec {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        match self {
            Spec::Simple(s) => s.validate_with(v),
            Spec::Array(s) => s.validate_with(v),
            Spec::Map(s) => s.validate_with(v),
            Spec::Struct(s) => s.validate_with(v),
            Spec::Interface(s) => s.validate_with(v),
            Spec::Func(s) => s.validate_with(v),
        }
    }
}

impl Validate for SimpleSpec {
    fn validate_with(&self, _: &EntityValidator<'_>) -> Result<()> {
        required(&self.type_name, "TypeName")?;
        identifier(&self.type_name, "TypeName")?;
        optional_identifier(&self.package_name, "PackageName")
    }
}

impl Validate for ArraySpec {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        if self.length != "..." {
            v.fragment(&self.length)?;
        }
        within(self.value.validate_with(v), "Value")
    }
}

impl Validate for MapSpec {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        within(self.key.validate_with(v), "Key")?;
        within(self.value.validate_with(v), "Value")
    }
}

impl Validate for StructSpec {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        for (i, field) in self.fields.iter().enumerate() {
            let check = || -> Result<()> {
                // Only a (possibly pointer) type name can be embedded.
                if field.name.is_empty() && !matches!(field.spec, Spec::Simple(_)) {
                    return Err(invalid(format!(
                        "Variable 'Name' must be not empty for {} field",
                        field.spec.kind()
                    )));
                }
                check_tag(field)
            };
            within(check(), &format!("Fields[{i}]"))?;
        }
        v.each(&self.fields, "Fields")
    }
}

impl Validate for InterfaceSpec {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        for (i, field) in self.fields.iter().enumerate() {
            let check = || -> Result<()> {
                match &field.spec {
                    Spec::Func(_) => required(&field.name, "Name")?,
                    Spec::Simple(s) => {
                        if !field.name.is_empty() {
                            return Err(invalid("Name must be empty for embedded interface"));
                        }
                        if s.is_pointer {
                            return Err(invalid("Embedded interface must not be a pointer"));
                        }
                    }
                    other => {
                        return Err(invalid(format!(
                            "{} is not allowed in InterfaceSpec",
                            other.kind()
                        )));
                    }
                }
                no_tag(field)
            };
            within(check(), &format!("Fields[{i}]"))?;
        }
        v.each(&self.fields, "Fields")
    }
}

impl Validate for FuncSpec {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        if self.is_variadic {
            let Some(last) = self.params.last() else {
                return Err(invalid("Params must be not empty for variadic FuncSpec"));
            };
            if !last.spec.is_slice() {
                let i = self.params.len() - 1;
                return Err(invalid(format!(
                    "Last param must be a slice ArraySpec for variadic FuncSpec, found {}",
                    last.spec.kind()
                ))
                .within(format_args!("Params[{i}]")));
            }
        }
        uniform_naming(&self.params, "Params")?;
        uniform_naming(&self.results, "Results")?;

        for (segment, fields) in [("Params", &self.params), ("Results", &self.results)] {
            for (i, field) in fields.iter().enumerate() {
                within(no_tag(field), &format!("{segment}[{i}]"))?;
            }
        }

        v.each(&self.params, "Params")?;
        v.each(&self.results, "Results")
    }
}

impl Validate for Field {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        optional_identifier(&self.name, "Name")?;
        within(self.spec.validate_with(v), "Spec")
    }
}

// =============================================================================
// Declarations
// =============================================================================

impl Validate for Import {
    fn validate_with(&self, _: &EntityValidator<'_>) -> Result<()> {
        required(&self.namespace, "Namespace")?;
        if !matches!(self.alias.as_str(), "" | "_" | ".") {
            identifier(&self.alias, "Alias")?;
        }
        if self
            .namespace
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '`' || c == '\\')
        {
            return Err(invalid("Variable 'Namespace' must be a valid import path"));
        }
        Ok(())
    }
}

impl Validate for ImportGroup {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        v.each(&self.imports, "Imports")
    }
}

impl Validate for Const {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        required(&self.name, "Name")?;
        identifier(&self.name, "Name")?;
        if let Some(spec) = &self.spec {
            let Spec::Simple(simple) = spec else {
                return Err(invalid(format!(
                    "Const Spec must be a SimpleSpec, found {}",
                    spec.kind()
                )));
            };
            if simple.is_pointer {
                return Err(invalid("Variable 'IsPointer' must be false for Const Spec"));
            }
        }
        v.fragment(&self.value)?;
        within(self.spec.as_ref().map_or(Ok(()), |s| s.validate_with(v)), "Spec")
    }
}

impl Validate for ConstGroup {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        v.each(&self.consts, "Consts")
    }
}

impl Validate for Var {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        required(&self.name, "Name")?;
        identifier(&self.name, "Name")?;
        if self.spec.is_none() && self.value.is_empty() {
            return Err(invalid("Var must have a Spec or a Value"));
        }
        v.fragment(&self.value)?;
        within(self.spec.as_ref().map_or(Ok(()), |s| s.validate_with(v)), "Spec")
    }
}

impl Validate for VarGroup {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        v.each(&self.vars, "Vars")
    }
}

impl Validate for Type {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        required(&self.name, "Name")?;
        identifier(&self.name, "Name")?;
        within(self.spec.validate_with(v), "Spec")
    }
}

impl Validate for TypeGroup {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        v.each(&self.types, "Types")
    }
}

impl Validate for Func {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        required(&self.name, "Name")?;
        identifier(&self.name, "Name")?;
        if let Some(related) = &self.related {
            let receiver: Result<()> = match &related.spec {
                Spec::Simple(s) if !s.package_name.is_empty() => {
                    Err(InvalidEntity::new("Variable 'PackageName' must be empty for receiver")
                        .within("Spec")
                        .into())
                }
                Spec::Simple(_) => no_tag(related),
                other => Err(invalid(format!(
                    "Related Spec must be a SimpleSpec, found {}",
                    other.kind()
                ))),
            };
            within(receiver, "Related")?;
        }
        v.fragment(&self.content)?;
        within(self.related.as_ref().map_or(Ok(()), |r| r.validate_with(v)), "Related")?;
        within(self.spec.as_ref().map_or(Ok(()), |s| s.validate_with(v)), "Spec")
    }
}

// =============================================================================
// Containers
// =============================================================================

impl Validate for File {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        required(&self.name, "Name")?;
        required(&self.package_name, "PackageName")?;
        identifier(&self.package_name, "PackageName")?;
        if !self.content.is_empty() {
            v.syntax.parse_file(&self.name, &self.content)?;
        }

        v.each(&self.import_groups, "ImportGroups")?;
        v.each(&self.const_groups, "ConstGroups")?;
        v.each(&self.var_groups, "VarGroups")?;
        v.each(&self.type_groups, "TypeGroups")?;
        v.each(&self.funcs, "Funcs")
    }
}

impl Validate for Namespace {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        required(&self.name, "Name")?;
        required(&self.path, "Path")?;
        identifier(&self.name, "Name")?;
        if !Path::new(&self.path).is_absolute() {
            return Err(invalid("Variable 'Path' must be an absolute path"));
        }

        let mut names = HashSet::new();
        let package = self.files.first().map(|f| f.package_name.as_str());
        for (i, file) in self.files.iter().enumerate() {
            if !names.insert(file.name.as_str()) {
                return Err(invalid(format!("Duplicate file name '{}'", file.name))
                    .within(format_args!("Files[{i}]")));
            }
            match package {
                Some(package) if file.package_name != package => {
                    return Err(invalid(format!(
                        "PackageName '{}' differs from '{package}'",
                        file.package_name
                    ))
                    .within(format_args!("Files[{i}]")));
                }
                _ => {}
            }
        }

        v.each(&self.files, "Files")
    }
}

impl Validate for Storage {
    fn validate_with(&self, v: &EntityValidator<'_>) -> Result<()> {
        trace!(namespaces = self.namespaces.len(), "validating storage");

        let mut names = HashSet::new();
        let mut paths = HashSet::new();
        for (i, ns) in self.namespaces.iter().enumerate() {
            if !names.insert(ns.name.as_str()) {
                return Err(invalid(format!("Duplicate namespace name '{}'", ns.name))
                    .within(format_args!("Namespaces[{i}]")));
            }
            if !paths.insert(ns.path.as_str()) {
                return Err(invalid(format!("Duplicate namespace path '{}'", ns.path))
                    .within(format_args!("Namespaces[{i}]")));
            }
        }

        v.each(&self.namespaces, "Namespaces")
    }
}
