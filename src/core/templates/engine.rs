//! Template rendering for model scaffolding.
//!
//! The engine turns a directory of `.tpl` files into generated sources:
//!
//! 1. **Resolution**: map the template source to a local directory
//! 2. **Context Building**: compute every style variant of the type name once
//! 3. **Walking**: visit every file below the template directory
//! 4. **Rendering**: parse and render each `.tpl` file with Tera
//! 5. **Writing**: write `<type>_<template>` converted to the file style
//!
//! # Context Variables
//!
//! - `Type`: the type name exactly as given
//! - `TypeSnake`, `TypeCamel`, `TypePascal`, `TypeKebab`: style variants
//! - `PackageName`: base name of the output directory
//!
//! Templates written for Go's `text/template` reference these as
//! `{{.TypePascal}}`. Bare field references of that form (with optional
//! `{{-`/`-}}` trim markers) are rewritten to Tera expressions before
//! parsing, so template repositories shared with the Go tooling render
//! unchanged. Anything richer than a field reference must use Tera syntax.
//!
//! Symlinked templates and directories are followed.
//!
//! Generation stops at the first failure. Files written before the failure
//! are left in place.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::{debug, error, info};
use walkdir::WalkDir;

use super::source::TemplateResolver;
use crate::core::config::{OUTPUT_SUFFIX, TEMPLATE_SUFFIX};
use crate::core::error::{Error, Result};
use crate::core::naming::{self, Style};

static GO_FIELD_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{(-?)\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*(-?)\}\}")
        .expect("field reference pattern is valid")
});

/// Rewrite `{{.Field}}` references into `{{ Field }}`, keeping trim markers.
pub fn translate_field_refs(content: &str) -> Cow<'_, str> {
    GO_FIELD_REF.replace_all(content, "{{${1} ${2} ${3}}}")
}

/// Data made available to every template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateData {
    #[serde(rename = "Type")]
    pub type_name: String,
    #[serde(rename = "TypeSnake")]
    pub type_snake: String,
    #[serde(rename = "TypeCamel")]
    pub type_camel: String,
    #[serde(rename = "TypePascal")]
    pub type_pascal: String,
    #[serde(rename = "TypeKebab")]
    pub type_kebab: String,
    #[serde(rename = "PackageName")]
    pub package_name: String,
}

impl TemplateData {
    pub fn new(type_name: &str, output_dir: &Path) -> Self {
        Self {
            type_name: type_name.to_string(),
            type_snake: naming::convert(type_name, Style::Snake),
            type_camel: naming::convert(type_name, Style::Camel),
            type_pascal: naming::convert(type_name, Style::Pascal),
            type_kebab: naming::convert(type_name, Style::Kebab),
            package_name: package_name(output_dir),
        }
    }

    fn to_context(&self) -> Result<Context> {
        Context::from_serialize(self).map_err(|e| Error::Context(e.to_string()))
    }
}

/// Base name of the output directory, used as the Go package name
fn package_name(output_dir: &Path) -> String {
    output_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            fs::canonicalize(output_dir)
                .ok()
                .and_then(|p| p.file_name().map(|name| name.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| output_dir.to_string_lossy().into_owned())
}

/// Renders template directories into generated source files
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    file_style: Style,
    resolver: TemplateResolver,
    template_suffix: String,
    output_suffix: String,
}

impl TemplateEngine {
    /// Create an engine naming output files in `file_style`
    pub fn new(file_style: Style, resolver: TemplateResolver) -> Self {
        Self {
            file_style,
            resolver,
            template_suffix: TEMPLATE_SUFFIX.to_string(),
            output_suffix: OUTPUT_SUFFIX.to_string(),
        }
    }

    /// Use a different template file extension (without the dot)
    pub fn with_template_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.template_suffix = suffix.into();
        self
    }

    /// Use a different generated file extension (without the dot)
    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    /// Render every template found in `template_source` into `output_dir`.
    ///
    /// `output_dir` must already exist. Returns the paths written, in the
    /// order they were written.
    pub fn generate(
        &self,
        template_source: &str,
        output_dir: impl AsRef<Path>,
        type_name: &str,
    ) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir.as_ref();
        let template_dir = self.resolver.resolve(template_source)?;
        let data = TemplateData::new(type_name, output_dir);
        let context = data.to_context()?;

        info!(
            type_name = %type_name,
            template_dir = %template_dir.display(),
            output_dir = %output_dir.display(),
            "Generating from templates"
        );

        let mut written = Vec::new();
        let walker = WalkDir::new(&template_dir)
            .follow_links(true)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|source| Error::Walk {
                path: template_dir.clone(),
                source,
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            let Some(stem) = self.template_stem(&file_name) else {
                debug!("Skipping non-template file: {}", entry.path().display());
                continue;
            };

            let output_path = output_dir.join(self.output_file_name(type_name, stem));
            self.render_file(entry.path(), &output_path, &context)?;
            written.push(output_path);
        }

        info!(count = written.len(), "Generation finished");
        Ok(written)
    }

    /// Output file name for a template stem, e.g. `user` + `model` -> `user_model.go`
    pub fn output_file_name(&self, type_name: &str, stem: &str) -> String {
        let joined = format!("{type_name}_{stem}");
        format!(
            "{}.{}",
            naming::convert(&joined, self.file_style),
            self.output_suffix
        )
    }

    fn template_stem<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_suffix(self.template_suffix.as_str())
            .and_then(|rest| rest.strip_suffix('.'))
    }

    fn render_file(&self, template_path: &Path, output_path: &Path, context: &Context) -> Result<()> {
        debug!(
            "Rendering {} -> {}",
            template_path.display(),
            output_path.display()
        );

        let raw = fs::read_to_string(template_path)?;
        let content = translate_field_refs(&raw);
        let name = template_path.to_string_lossy();

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(&name, &content)
            .map_err(|source| Error::TemplateParse {
                path: template_path.to_path_buf(),
                source,
            })?;

        let file = File::create(output_path).map_err(|source| Error::OutputCreate {
            path: output_path.to_path_buf(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        tera.render_to(&name, context, &mut writer)
            .map_err(|source| {
                error!("Failed to render template {}: {}", template_path.display(), source);
                Error::TemplateRender {
                    path: template_path.to_path_buf(),
                    source,
                }
            })?;
        writer.flush().map_err(|source| Error::OutputCreate {
            path: output_path.to_path_buf(),
            source,
        })?;

        info!("Generated {}", output_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::shell::MockCommandExecutor;
    use std::sync::Arc;
    use tempfile::TempDir;

    const MODEL_TEMPLATE: &str = "package {{ PackageName }}\n\ntype {{ TypePascal }} struct {\n\tID string\n}\n";

    fn engine(style: Style, cache_root: &Path) -> TemplateEngine {
        let resolver = TemplateResolver::new(Arc::new(MockCommandExecutor::new()), cache_root);
        TemplateEngine::new(style, resolver)
    }

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let template_dir = temp.path().join("template");
        let output_dir = temp.path().join("models");
        fs::create_dir_all(&template_dir).unwrap();
        fs::create_dir_all(&output_dir).unwrap();
        (temp, template_dir, output_dir)
    }

    fn source(dir: &Path) -> String {
        dir.to_string_lossy().into_owned()
    }

    #[test]
    fn test_template_data_variants() {
        let data = TemplateData::new("UserProfile", Path::new("/work/internal/models"));

        assert_eq!(data.type_name, "UserProfile");
        assert_eq!(data.type_snake, "user_profile");
        assert_eq!(data.type_camel, "userProfile");
        assert_eq!(data.type_pascal, "UserProfile");
        assert_eq!(data.type_kebab, "user-profile");
        assert_eq!(data.package_name, "models");

        let json = data.to_context().unwrap().into_json();
        assert_eq!(json["TypePascal"], "UserProfile");
        assert_eq!(json["PackageName"], "models");
    }

    #[test]
    fn test_output_file_name_per_style() {
        let temp = TempDir::new().unwrap();
        let cases = [
            (Style::Snake, "user_model.go"),
            (Style::Camel, "userModel.go"),
            (Style::Pascal, "UserModel.go"),
            (Style::Kebab, "user-model.go"),
        ];

        for (style, expected) in cases {
            assert_eq!(engine(style, temp.path()).output_file_name("user", "model"), expected);
        }
    }

    #[test]
    fn test_generate_single_template() {
        let (temp, template_dir, output_dir) = setup();
        fs::write(template_dir.join("model.tpl"), MODEL_TEMPLATE).unwrap();

        let written = engine(Style::Snake, temp.path())
            .generate(&source(&template_dir), &output_dir, "user")
            .unwrap();

        assert_eq!(written, vec![output_dir.join("user_model.go")]);
        let entries: Vec<_> = fs::read_dir(&output_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);

        let content = fs::read_to_string(output_dir.join("user_model.go")).unwrap();
        assert!(content.contains("package models"));
        assert!(content.contains("type User struct"));
    }

    #[test]
    fn test_generate_walks_nested_directories_and_skips_assets() {
        let (temp, template_dir, output_dir) = setup();
        fs::create_dir_all(template_dir.join("dao")).unwrap();
        fs::write(template_dir.join("README.md"), "# templates").unwrap();
        fs::write(template_dir.join("model.tpl"), MODEL_TEMPLATE).unwrap();
        fs::write(
            template_dir.join("dao").join("repository.tpl"),
            "type {{ TypeCamel }}Repository struct{}\n",
        )
        .unwrap();

        let written = engine(Style::Pascal, temp.path())
            .generate(&source(&template_dir), &output_dir, "order_item")
            .unwrap();

        assert_eq!(written.len(), 2);
        assert!(output_dir.join("OrderItemModel.go").exists());
        assert!(output_dir.join("OrderItemRepository.go").exists());
        assert!(!output_dir.join("README.md").exists());

        let repo = fs::read_to_string(output_dir.join("OrderItemRepository.go")).unwrap();
        assert_eq!(repo, "type orderItemRepository struct{}\n");
    }

    #[test]
    fn test_generate_missing_template_dir() {
        let temp = TempDir::new().unwrap();

        let err = engine(Style::Snake, temp.path())
            .generate("invalid/path", temp.path(), "user")
            .unwrap_err();

        assert!(matches!(err, Error::Walk { .. }));
    }

    #[test]
    fn test_generate_invalid_output_dir() {
        let (temp, template_dir, _) = setup();
        fs::write(template_dir.join("model.tpl"), "invalid template").unwrap();

        let err = engine(Style::Snake, temp.path())
            .generate(&source(&template_dir), "/invalid/output", "user")
            .unwrap_err();

        assert!(matches!(err, Error::OutputCreate { .. }));
    }

    #[test]
    fn test_parse_failure_names_the_file() {
        let (temp, template_dir, output_dir) = setup();
        fs::write(template_dir.join("broken.tpl"), "{{ TypePascal ").unwrap();

        let err = engine(Style::Snake, temp.path())
            .generate(&source(&template_dir), &output_dir, "user")
            .unwrap_err();

        match err {
            Error::TemplateParse { path, .. } => assert!(path.ends_with("broken.tpl")),
            other => panic!("Expected TemplateParse, got {:?}", other),
        }
        assert!(!output_dir.join("user_broken.go").exists());
    }

    #[test]
    fn test_undefined_field_aborts_without_rollback() {
        let (temp, template_dir, output_dir) = setup();
        // Sorted walk: "a_model.tpl" renders before "b_broken.tpl"
        fs::write(template_dir.join("a_model.tpl"), MODEL_TEMPLATE).unwrap();
        fs::write(template_dir.join("b_broken.tpl"), "{{ TypeUnknown }}").unwrap();
        fs::write(template_dir.join("c_later.tpl"), MODEL_TEMPLATE).unwrap();

        let err = engine(Style::Snake, temp.path())
            .generate(&source(&template_dir), &output_dir, "user")
            .unwrap_err();

        match err {
            Error::TemplateRender { path, .. } => assert!(path.ends_with("b_broken.tpl")),
            other => panic!("Expected TemplateRender, got {:?}", other),
        }
        assert!(output_dir.join("user_a_model.go").exists());
        assert!(!output_dir.join("user_c_later.go").exists());
    }

    #[test]
    fn test_colliding_output_names_last_write_wins() {
        let (temp, template_dir, output_dir) = setup();
        fs::create_dir_all(template_dir.join("v1")).unwrap();
        fs::create_dir_all(template_dir.join("v2")).unwrap();
        fs::write(template_dir.join("v1").join("model.tpl"), "first").unwrap();
        fs::write(template_dir.join("v2").join("model.tpl"), "second").unwrap();

        let written = engine(Style::Snake, temp.path())
            .generate(&source(&template_dir), &output_dir, "user")
            .unwrap();

        assert_eq!(written.len(), 2);
        let content = fs::read_to_string(output_dir.join("user_model.go")).unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_custom_suffixes() {
        let (temp, template_dir, output_dir) = setup();
        fs::write(template_dir.join("model.tera"), "{{ TypeKebab }}").unwrap();
        fs::write(template_dir.join("model.tpl"), "ignored").unwrap();

        let written = engine(Style::Kebab, temp.path())
            .with_template_suffix("tera")
            .with_output_suffix("txt")
            .generate(&source(&template_dir), &output_dir, "UserAccount")
            .unwrap();

        assert_eq!(written, vec![output_dir.join("user-account-model.txt")]);
        let content = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(content, "user-account");
    }

    #[test]
    fn test_translate_field_refs() {
        assert_eq!(
            translate_field_refs("package {{.PackageName}}"),
            "package {{ PackageName }}"
        );
        assert_eq!(translate_field_refs("{{- .TypeSnake -}}"), "{{- TypeSnake -}}");
        assert_eq!(translate_field_refs("{{ TypeKebab }}"), "{{ TypeKebab }}");
        assert_eq!(translate_field_refs("{{ .x | upper }}"), "{{ .x | upper }}");
    }

    #[test]
    fn test_generate_go_style_field_references() {
        let (temp, template_dir, output_dir) = setup();
        fs::write(
            template_dir.join("model.tpl"),
            "package {{.PackageName}}\n\ntype {{.TypePascal}} struct {}\n\nconst name = \"{{- .TypeSnake -}}\"\n",
        )
        .unwrap();

        engine(Style::Snake, temp.path())
            .generate(&source(&template_dir), &output_dir, "user")
            .unwrap();

        let content = fs::read_to_string(output_dir.join("user_model.go")).unwrap();
        assert_eq!(
            content,
            "package models\n\ntype User struct {}\n\nconst name = \"user\"\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_follows_symlinked_templates() {
        let (temp, template_dir, output_dir) = setup();
        let shared = temp.path().join("shared");
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("dao.tpl"), "type {{ TypePascal }}Dao struct{}\n").unwrap();
        std::os::unix::fs::symlink(shared.join("dao.tpl"), template_dir.join("dao.tpl")).unwrap();

        let written = engine(Style::Snake, temp.path())
            .generate(&source(&template_dir), &output_dir, "user")
            .unwrap();

        assert_eq!(written, vec![output_dir.join("user_dao.go")]);
        let content = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(content, "type UserDao struct{}\n");
    }

    #[test]
    fn test_generate_from_cached_remote_source() {
        let (temp, _, output_dir) = setup();
        let cache_root = temp.path().join("cache");
        let cached = cache_root.join("go-gen");
        fs::create_dir_all(&cached).unwrap();
        fs::write(cached.join("model.tpl"), MODEL_TEMPLATE).unwrap();

        let url = "git@github.com:Lewinz/go-gen.git";
        let executor = Arc::new(
            MockCommandExecutor::new()
                .with_result(&format!("git ls-remote {url} HEAD"), 0, "abcdef1234567890\tHEAD\n", "")
                .with_result("git rev-parse HEAD", 0, "abcdef1234567890\n", ""),
        );
        let resolver = TemplateResolver::new(executor.clone(), &cache_root);
        let engine = TemplateEngine::new(Style::Snake, resolver);

        engine.generate(url, &output_dir, "user").unwrap();
        engine.generate(url, &output_dir, "user").unwrap();

        assert!(output_dir.join("user_model.go").exists());
        assert_eq!(executor.count("git clone"), 0);
        assert_eq!(executor.count("git ls-remote"), 2);
    }
}
