//! Handlebars helpers for Inertia root templates

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};

/// Element id the Inertia client mounts on by default.
pub const DEFAULT_ROOT_ELEMENT_ID: &str = "app";

/// Root template registered under [`DEFAULT_ROOT_TEMPLATE`](crate::config::DEFAULT_ROOT_TEMPLATE).
pub const DEFAULT_ROOT_TEMPLATE_SOURCE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body>
    {{inertia page}}
</body>
</html>
"#;

/// Register the Inertia helpers
pub fn register_inertia_helpers(handlebars: &mut Handlebars) {
    handlebars.register_helper("inertia", Box::new(inertia_helper));
}

/// Mount point helper: {{inertia page}} or {{inertia page id="root"}}
///
/// Writes `<div id="app" data-page="..."></div>` with the page JSON escaped
/// for use inside an HTML attribute.
fn inertia_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let page = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("inertia", 0))?;

    let id = h
        .hash_get("id")
        .and_then(|id| id.value().as_str())
        .unwrap_or(DEFAULT_ROOT_ELEMENT_ID);

    let json = serde_json::to_string(page.value()).map_err(RenderErrorReason::SerdeError)?;

    out.write(&format!(
        r#"<div id="{}" data-page="{}"></div>"#,
        handlebars::html_escape(id),
        handlebars::html_escape(&json)
    ))?;
    Ok(())
}
