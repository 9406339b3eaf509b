//! Handlebars root template renderer

use super::helpers::{self, DEFAULT_ROOT_TEMPLATE_SOURCE};
use super::{TemplateError, TemplateRenderer};
use crate::config::DEFAULT_ROOT_TEMPLATE;
use crate::error::BoxError;
use async_trait::async_trait;
use handlebars::Handlebars;
use parking_lot::RwLock;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Configuration for the Handlebars root template renderer
#[derive(Debug, Clone)]
pub struct HandlebarsConfig {
    /// Directory containing template files (None = built-in root template only)
    pub template_dir: Option<PathBuf>,

    /// Template file extension (default: ".hbs")
    pub template_extension: String,

    /// Enable development mode (reload templates on every render)
    pub dev_mode: bool,

    /// Enable strict mode (error on missing variables)
    pub strict_mode: bool,
}

impl HandlebarsConfig {
    /// Create a new configuration with template directory
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: Some(template_dir.into()),
            ..Self::default()
        }
    }

    /// Set template file extension
    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.template_extension = ext.into();
        self
    }

    /// Enable development mode (no template caching)
    pub fn with_dev_mode(mut self, enable: bool) -> Self {
        self.dev_mode = enable;
        self
    }

    /// Enable strict mode (error on missing variables)
    pub fn with_strict_mode(mut self, enable: bool) -> Self {
        self.strict_mode = enable;
        self
    }
}

impl Default for HandlebarsConfig {
    fn default() -> Self {
        Self {
            template_dir: None,
            template_extension: ".hbs".to_string(),
            dev_mode: false,
            strict_mode: false,
        }
    }
}

/// Renders Inertia root templates with Handlebars.
///
/// The built-in `inertia` root template is always available; a template file
/// with the same name in the template directory replaces it.
#[derive(Clone)]
pub struct HandlebarsRenderer {
    handlebars: Arc<RwLock<Handlebars<'static>>>,
    config: HandlebarsConfig,
}

impl HandlebarsRenderer {
    pub fn new(config: HandlebarsConfig) -> Result<Self, TemplateError> {
        let handlebars = Self::build_registry(&config)?;

        Ok(Self {
            handlebars: Arc::new(RwLock::new(handlebars)),
            config,
        })
    }

    /// Renderer with only the built-in root template.
    pub fn builtin() -> Result<Self, TemplateError> {
        Self::new(HandlebarsConfig::default())
    }

    /// Fresh registry with helpers, the built-in root template and every
    /// template file from the configured directory.
    fn build_registry(config: &HandlebarsConfig) -> Result<Handlebars<'static>, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(config.strict_mode);
        helpers::register_inertia_helpers(&mut handlebars);

        register(&mut handlebars, DEFAULT_ROOT_TEMPLATE, DEFAULT_ROOT_TEMPLATE_SOURCE)?;

        if let Some(dir) = &config.template_dir {
            if !dir.exists() {
                return Err(TemplateError::Config(format!(
                    "Template directory not found: {:?}",
                    dir
                )));
            }
            let extension = config.template_extension.trim_start_matches('.');
            load_templates_from_dir(&mut handlebars, extension, dir, dir)?;
        }

        Ok(handlebars)
    }

    /// Register a template from string
    pub fn register_template(&self, name: &str, source: &str) -> Result<(), TemplateError> {
        register(&mut self.handlebars.write(), name, source)
    }

    /// Check if a template exists
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.read().has_template(name)
    }

    /// Reload all templates from disk
    ///
    /// The rebuilt registry is swapped in under a single write lock.
    pub fn reload_templates(&self) -> Result<(), TemplateError> {
        let handlebars = Self::build_registry(&self.config)?;
        *self.handlebars.write() = handlebars;
        Ok(())
    }

    /// Render a template synchronously
    pub fn render_sync(&self, template: &str, context: &Value) -> Result<String, TemplateError> {
        if self.config.dev_mode {
            self.reload_templates()?;
        }

        let handlebars = self.handlebars.read();
        if !handlebars.has_template(template) {
            return Err(TemplateError::TemplateNotFound(template.to_string()));
        }

        handlebars
            .render(template, context)
            .map_err(|e| TemplateError::Render(e.to_string()))
    }

    pub fn config(&self) -> &HandlebarsConfig {
        &self.config
    }
}

fn register(
    handlebars: &mut Handlebars<'static>,
    name: &str,
    source: &str,
) -> Result<(), TemplateError> {
    handlebars
        .register_template_string(name, source)
        .map_err(|e| TemplateError::Parse(e.to_string()))
}

fn load_templates_from_dir(
    handlebars: &mut Handlebars<'static>,
    extension: &str,
    root: &Path,
    dir: &Path,
) -> Result<(), TemplateError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            load_templates_from_dir(handlebars, extension, root, &path)?;
        } else if path.extension().is_some_and(|ext| ext == extension) {
            let name = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/");

            let source = fs::read_to_string(&path)?;
            debug!(template = %name, "Registering root template");
            register(handlebars, &name, &source)?;
        }
    }

    Ok(())
}

#[async_trait]
impl TemplateRenderer for HandlebarsRenderer {
    async fn render(&self, template: &str, context: &Value) -> Result<String, BoxError> {
        // Template rendering is CPU-bound; keep it off the async workers
        let renderer = self.clone();
        let template = template.to_string();
        let context = context.clone();

        tokio::task::spawn_blocking(move || renderer.render_sync(&template, &context))
            .await
            .map_err(|e| TemplateError::Render(e.to_string()))?
            .map_err(BoxError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_templates() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let templates_dir = temp_dir.path().join("templates");
        fs::create_dir_all(templates_dir.join("layouts")).unwrap();

        fs::write(
            templates_dir.join("app.hbs"),
            "<main>{{inertia page}}</main>",
        )
        .unwrap();
        fs::write(
            templates_dir.join("layouts").join("admin.hbs"),
            "<section>{{page.component}}</section>",
        )
        .unwrap();

        temp_dir
    }

    #[test]
    fn test_builtin_root_template() {
        let renderer = HandlebarsRenderer::builtin().unwrap();
        assert!(renderer.has_template(DEFAULT_ROOT_TEMPLATE));
    }

    #[test]
    fn test_loads_nested_templates() {
        let temp_dir = create_test_templates();
        let config = HandlebarsConfig::new(temp_dir.path().join("templates"));
        let renderer = HandlebarsRenderer::new(config).unwrap();

        assert!(renderer.has_template("app"));
        assert!(renderer.has_template("layouts/admin"));

        let html = renderer
            .render_sync("layouts/admin", &json!({"page": {"component": "Users"}}))
            .unwrap();
        assert_eq!(html, "<section>Users</section>");
    }

    #[test]
    fn test_missing_template_dir() {
        let config = HandlebarsConfig::new("/nonexistent/inertia/templates");
        let result = HandlebarsRenderer::new(config);
        assert!(matches!(result, Err(TemplateError::Config(_))));
    }

    #[test]
    fn test_file_overrides_builtin_root() {
        let temp_dir = create_test_templates();
        let templates_dir = temp_dir.path().join("templates");
        fs::write(templates_dir.join("inertia.hbs"), "custom {{page.url}}").unwrap();

        let renderer = HandlebarsRenderer::new(HandlebarsConfig::new(templates_dir)).unwrap();
        let html = renderer
            .render_sync("inertia", &json!({"page": {"url": "/home"}}))
            .unwrap();
        assert_eq!(html, "custom /home");
    }

    #[test]
    fn test_unknown_template() {
        let renderer = HandlebarsRenderer::builtin().unwrap();
        let result = renderer.render_sync("missing", &json!({}));
        assert!(matches!(result, Err(TemplateError::TemplateNotFound(_))));
    }

    #[test]
    fn test_strict_mode() {
        let renderer =
            HandlebarsRenderer::new(HandlebarsConfig::default().with_strict_mode(true)).unwrap();
        renderer.register_template("strict", "{{missing}}").unwrap();

        assert!(renderer.render_sync("strict", &json!({})).is_err());
    }

    #[tokio::test]
    async fn test_async_render_error_is_template_error() {
        let renderer = HandlebarsRenderer::builtin().unwrap();
        let err = TemplateRenderer::render(&renderer, "missing", &json!({}))
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<TemplateError>().is_some());
    }

    #[test]
    fn test_reload_is_never_observed_half_done() {
        let temp_dir = create_test_templates();
        let config = HandlebarsConfig::new(temp_dir.path().join("templates"));
        let renderer = HandlebarsRenderer::new(config).unwrap();
        let context = json!({"page": {"component": "Users"}});

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..200 {
                    renderer.reload_templates().unwrap();
                }
            });

            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        let html = renderer.render_sync("layouts/admin", &context).unwrap();
                        assert_eq!(html, "<section>Users</section>");
                    }
                });
            }
        });
    }

    #[tokio::test]
    async fn test_dev_mode_picks_up_changes() {
        let temp_dir = create_test_templates();
        let templates_dir = temp_dir.path().join("templates");
        let config = HandlebarsConfig::new(&templates_dir).with_dev_mode(true);
        let renderer = HandlebarsRenderer::new(config).unwrap();

        fs::write(templates_dir.join("app.hbs"), "v2").unwrap();
        let html = TemplateRenderer::render(&renderer, "app", &json!({"page": {}}))
            .await
            .unwrap();
        assert_eq!(html, "v2");
    }
}
