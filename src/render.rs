//! Template rendering for message bodies.
//!
//! The host application owns its templates; messages only need something that
//! turns a template name and data into text. [`JinjaRenderer`] is the stock
//! implementation, and any `Fn(&str, &Value) -> Result<String, SendError>`
//! works as well.

use minijinja::{Environment, UndefinedBehavior};
use serde_json::Value;

use crate::errors::SendError;

pub trait TemplateRenderer {
    /// # Errors
    ///
    /// Returns [`SendError::Template`] if the template is unknown or fails to render.
    fn render(&self, template: &str, data: &Value) -> Result<String, SendError>;
}

impl<F> TemplateRenderer for F
where
    F: Fn(&str, &Value) -> Result<String, SendError>,
{
    fn render(&self, template: &str, data: &Value) -> Result<String, SendError> {
        self(template, data)
    }
}

/// Jinja-syntax renderer backed by `minijinja`.
///
/// Undefined variables are errors rather than empty strings.
#[derive(Debug, Clone)]
pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl Default for JinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl JinjaRenderer {
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }

    /// Register (or replace) a named template.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Template`] if the source does not parse.
    pub fn add_template(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), SendError> {
        self.env
            .add_template_owned(name.into(), source.into())
            .map_err(SendError::from)
    }

    /// Builder form of [`JinjaRenderer::add_template`].
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Template`] if the source does not parse.
    pub fn with_template(
        mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, SendError> {
        self.add_template(name, source)?;
        Ok(self)
    }
}

impl TemplateRenderer for JinjaRenderer {
    fn render(&self, template: &str, data: &Value) -> Result<String, SendError> {
        let template = self.env.get_template(template)?;
        Ok(template.render(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_registered_template() {
        let renderer = JinjaRenderer::new()
            .with_template("order_shipped", "Hi {{ name }}, order #{{ order }} shipped.")
            .expect("template parses");

        let text = renderer
            .render("order_shipped", &json!({"name": "Sam", "order": 1042}))
            .expect("renders");
        assert_eq!(text, "Hi Sam, order #1042 shipped.");
    }

    #[test]
    fn unknown_template_is_a_template_error() {
        let renderer = JinjaRenderer::new();
        let err = renderer.render("missing", &json!({})).unwrap_err();
        assert!(matches!(err, SendError::Template(_)));
    }

    #[test]
    fn undefined_variables_are_rejected() {
        let renderer = JinjaRenderer::new()
            .with_template("greeting", "Hello {{ who }}")
            .expect("template parses");
        assert!(renderer.render("greeting", &json!({})).is_err());
    }

    #[test]
    fn closures_act_as_renderers() {
        let renderer = |name: &str, data: &Value| -> Result<String, SendError> {
            Ok(format!("{name}:{}", data["n"]))
        };
        assert_eq!(renderer.render("t", &json!({"n": 3})).unwrap(), "t:3");
    }
}
