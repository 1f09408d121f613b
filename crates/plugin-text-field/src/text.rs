//! The `text` field handler.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use fieldhub_core::result::AppResult;
use fieldhub_core::traits::{ShortTagExpander, TemplateEngine, Translator};
use fieldhub_core::types::{FieldDefinition, HandlerDescriptor};
use fieldhub_core::types::field::value_as_text;
use fieldhub_core::validation::RuleContext;
use fieldhub_hooks::{FieldHandler, InvocationContext};

use crate::processing;
use crate::rules;
use crate::settings::{TextKind, TextSettings};

/// Type name the handler is registered under.
pub const FIELD_TYPE: &str = "text";

/// Translation domain of every user-facing message.
const DOMAIN: &str = "field";

const DISPLAY_TEMPLATE: &str = "Field.text_field_display";
const EDIT_TEMPLATE: &str = "Field.text_field_edit";
const FORMATTER_TEMPLATE: &str = "Field.text_field_formatter";
const SETTINGS_TEMPLATE: &str = "Field.text_field_settings";

/// Stores text data: textboxes and textareas.
#[derive(Debug, Clone)]
pub struct TextField {
    templates: Arc<dyn TemplateEngine>,
    translator: Arc<dyn Translator>,
    hooktags: Arc<dyn ShortTagExpander>,
}

impl TextField {
    /// Creates the handler around its view collaborators.
    pub fn new(
        templates: Arc<dyn TemplateEngine>,
        translator: Arc<dyn Translator>,
        hooktags: Arc<dyn ShortTagExpander>,
    ) -> Self {
        Self {
            templates,
            translator,
            hooktags,
        }
    }

    fn t(&self, message: &str, args: &[&str]) -> String {
        self.translator.translate(DOMAIN, message, args)
    }

    /// Renders with the context data plus the normalized `settings`.
    fn render(&self, template_id: &str, ctx: &InvocationContext<'_>) -> AppResult<String> {
        let settings = TextSettings::from_field(ctx.field)?;
        let mut data = ctx.template_data()?;
        if let Value::Object(map) = &mut data {
            map.insert("settings".to_string(), settings.to_template_value());
        }
        self.templates.render(template_id, &data)
    }

    /// Message reported when the validation pattern does not match.
    fn pattern_message(&self, field: &FieldDefinition, settings: &TextSettings) -> String {
        match &settings.validation_message {
            Some(message) => self.hooktags.expand(message),
            None => self.t("Invalid field.", &[&field.label]),
        }
    }
}

fn text_of(value: &Value) -> String {
    value_as_text(Some(value))
}

impl FieldHandler for TextField {
    fn info(&self) -> HandlerDescriptor {
        HandlerDescriptor {
            name: self.t("Text", &[]),
            description: self.t("Allow to store text data in database.", &[]),
            hidden: false,
        }
    }

    fn display(&self, ctx: &mut InvocationContext<'_>) -> AppResult<String> {
        let settings = TextSettings::from_field(ctx.field)?;

        if ctx.field.value.is_some() {
            let processed = processing::process(&ctx.field.value_text(), settings.text_processing);
            ctx.field.value = Some(Value::String(processed));
        }

        debug!(
            field = %ctx.field.name,
            mode = %settings.text_processing,
            "Rendering text field"
        );
        self.render(DISPLAY_TEMPLATE, ctx)
    }

    fn edit(&self, ctx: &mut InvocationContext<'_>) -> AppResult<String> {
        self.render(EDIT_TEMPLATE, ctx)
    }

    fn formatter(&self, ctx: &mut InvocationContext<'_>) -> AppResult<String> {
        self.render(FORMATTER_TEMPLATE, ctx)
    }

    fn settings(&self, ctx: &mut InvocationContext<'_>) -> AppResult<String> {
        self.render(SETTINGS_TEMPLATE, ctx)
    }

    fn before_validate(&self, ctx: &mut InvocationContext<'_>) -> AppResult<bool> {
        let settings = TextSettings::from_field(ctx.field)?;
        let path = ctx.field.rule_path();
        let required = ctx.field.metadata.required;
        let pattern_message = self.pattern_message(ctx.field, &settings);
        let validator = ctx.validator_mut()?;

        if required {
            let message = self.t("Field required.", &[]);
            let textarea = settings.kind == TextKind::Textarea;
            validator.allow_empty(&path, false, &message).add(
                &path,
                "validateRequired",
                &message,
                move |value: &Value, _: &RuleContext<'_>| rules::has_content(&text_of(value), textarea),
            );
        } else {
            validator.allow_empty(&path, true, "");
        }

        if let Some(max_len) = settings.length_limit() {
            let message = self.t("Max. %s characters length.", &[&max_len.to_string()]);
            validator.add(
                &path,
                "validateLen",
                &message,
                move |value: &Value, _: &RuleContext<'_>| rules::within_length(&text_of(value), max_len),
            );
        }

        if let Some(pattern) = settings.validation_rule {
            validator.add(
                &path,
                "validateReg",
                &pattern_message,
                move |value: &Value, _: &RuleContext<'_>| {
                    rules::matches_pattern(&pattern, &text_of(value))
                },
            );
        }

        Ok(true)
    }

    fn after_save(&self, ctx: &mut InvocationContext<'_>) -> AppResult<()> {
        ctx.field.value = ctx.post.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldhub_core::error::{AppError, ErrorKind};
    use fieldhub_core::validation::Validator;
    use indexmap::IndexMap;
    use serde_json::json;

    /// Echoes the template id and the field value it was given.
    #[derive(Debug)]
    struct EchoEngine;

    impl TemplateEngine for EchoEngine {
        fn exists(&self, _template_id: &str) -> bool {
            true
        }

        fn render(&self, template_id: &str, data: &Value) -> AppResult<String> {
            Ok(format!("{template_id}|{}", text_of(&data["field"]["value"])))
        }
    }

    #[derive(Debug)]
    struct Identity;

    impl Translator for Identity {
        fn translate(&self, _domain: &str, message: &str, args: &[&str]) -> String {
            args.iter()
                .fold(message.to_string(), |acc, arg| acc.replacen("%s", arg, 1))
        }
    }

    /// Upper-cases the whole text to show the expander ran.
    #[derive(Debug)]
    struct Shout;

    impl ShortTagExpander for Shout {
        fn expand(&self, text: &str) -> String {
            text.to_uppercase()
        }
    }

    fn handler() -> TextField {
        TextField::new(Arc::new(EchoEngine), Arc::new(Identity), Arc::new(Shout))
    }

    fn validate(field: &mut FieldDefinition, value: Value) -> Vec<(String, String)> {
        let mut validator = Validator::new();
        let mut ctx = InvocationContext::new(field).with_validator(&mut validator);
        assert!(handler().before_validate(&mut ctx).expect("no error"));

        let path = field.rule_path();
        let data: IndexMap<String, Value> = [(path.clone(), value)].into_iter().collect();
        validator
            .validate(&data)
            .for_path(&path)
            .iter()
            .map(|f| (f.rule.clone(), f.message.clone()))
            .collect()
    }

    #[test]
    fn test_info() {
        let info = handler().info();
        assert_eq!(info.name, "Text");
        assert!(!info.hidden);
    }

    #[test]
    fn test_display_processes_value_before_rendering() {
        let mut field = FieldDefinition::new("body", FIELD_TYPE)
            .with_settings(json!({ "text_processing": "plain" }))
            .with_value(json!("a < b"));
        let mut ctx = InvocationContext::new(&mut field);

        let out = handler().display(&mut ctx).expect("rendered");
        assert_eq!(out, "Field.text_field_display|a &lt; b");
        assert_eq!(field.value, Some(json!("a &lt; b")));
    }

    #[test]
    fn test_display_leaves_missing_value_alone() {
        let mut field = FieldDefinition::new("body", FIELD_TYPE);
        let mut ctx = InvocationContext::new(&mut field);
        handler().display(&mut ctx).expect("rendered");
        assert!(field.value.is_none());
    }

    #[test]
    fn test_render_phases_use_their_templates() {
        let mut field = FieldDefinition::new("body", FIELD_TYPE).with_value(json!("x"));
        let handler = handler();
        let mut ctx = InvocationContext::new(&mut field);

        assert_eq!(handler.edit(&mut ctx).expect("ok"), "Field.text_field_edit|x");
        assert_eq!(
            handler.formatter(&mut ctx).expect("ok"),
            "Field.text_field_formatter|x"
        );
        assert_eq!(
            handler.settings(&mut ctx).expect("ok"),
            "Field.text_field_settings|x"
        );
    }

    #[test]
    fn test_required_rules() {
        let mut field = FieldDefinition::new("title", FIELD_TYPE).required();

        assert_eq!(
            validate(&mut field, json!("")),
            vec![("_empty".to_string(), "Field required.".to_string())]
        );
        assert_eq!(
            validate(&mut field, json!("<p> </p>")),
            vec![("validateRequired".to_string(), "Field required.".to_string())]
        );
        assert!(validate(&mut field, json!("0")).is_empty());
    }

    #[test]
    fn test_required_text_rejects_blank_markup() {
        let mut field = FieldDefinition::new("title", FIELD_TYPE)
            .required()
            .with_settings(json!({ "type": "text" }));
        let required = vec![("validateRequired".to_string(), "Field required.".to_string())];

        assert_eq!(validate(&mut field, json!("   ")), required);
        assert_eq!(validate(&mut field, json!("<p></p>")), required);
    }

    fn combined_field() -> FieldDefinition {
        FieldDefinition::new("title", FIELD_TYPE)
            .required()
            .with_settings(json!({
                "type": "text",
                "max_len": 5,
                "validation_rule": "/^[a-z]+$/",
                "validation_message": "lowercase only"
            }))
    }

    #[test]
    fn test_all_rules_registered_and_evaluated_alone() {
        let mut field = combined_field();
        let mut validator = Validator::new();
        let mut ctx = InvocationContext::new(&mut field).with_validator(&mut validator);
        assert!(handler().before_validate(&mut ctx).expect("no error"));

        assert_eq!(
            validator.rule_names(":title"),
            vec!["validateRequired", "validateLen", "validateReg"]
        );

        let data = IndexMap::new();
        let context = RuleContext {
            path: ":title",
            data: &data,
        };
        let check = |name: &str, value: Value| {
            validator
                .rule(":title", name)
                .unwrap_or_else(|| panic!("rule {name} registered"))
                .check(&value, &context)
        };

        assert!(check("validateRequired", json!("ABCDEFGH")));
        assert!(!check("validateRequired", json!("<b> </b>")));
        assert!(check("validateLen", json!("AB12")));
        assert!(!check("validateLen", json!("abcdef")));
        assert!(check("validateReg", json!("abcdefgh")));
        assert!(!check("validateReg", json!("ab1")));

        let pattern = validator.rule(":title", "validateReg").expect("registered");
        assert_eq!(pattern.message, "LOWERCASE ONLY");
        assert!(validator.rule(":title", "validateEmail").is_none());
    }

    #[test]
    fn test_empty_required_value_reports_only_required_message() {
        let mut field = combined_field();
        let expected = vec![("_empty".to_string(), "Field required.".to_string())];

        assert_eq!(validate(&mut field, json!("")), expected);
        assert_eq!(validate(&mut field, Value::Null), expected);
    }

    #[test]
    fn test_required_textarea_decodes_entities() {
        let mut field = FieldDefinition::new("body", FIELD_TYPE)
            .required()
            .with_settings(json!({ "type": "textarea" }));
        assert_eq!(validate(&mut field, json!("<p>&nbsp;</p>")).len(), 1);
        assert!(validate(&mut field, json!("<p>Hi</p>")).is_empty());
    }

    #[test]
    fn test_optional_empty_value_skips_rules() {
        let mut field = FieldDefinition::new("code", FIELD_TYPE)
            .with_settings(json!({ "validation_rule": "/^[0-9]+$/" }));
        assert!(validate(&mut field, json!("")).is_empty());
        assert!(validate(&mut field, Value::Null).is_empty());
        assert_eq!(validate(&mut field, json!("abc")).len(), 1);
    }

    #[test]
    fn test_length_rule() {
        let mut field = FieldDefinition::new("title", FIELD_TYPE)
            .with_settings(json!({ "type": "text", "max_len": 5 }));

        assert!(validate(&mut field, json!(" abcde ")).is_empty());
        assert_eq!(
            validate(&mut field, json!("abcdef")),
            vec![(
                "validateLen".to_string(),
                "Max. 5 characters length.".to_string()
            )]
        );
    }

    #[test]
    fn test_length_rule_not_registered_for_textarea() {
        let mut field = FieldDefinition::new("body", FIELD_TYPE)
            .with_settings(json!({ "type": "textarea", "max_len": 5 }));
        let mut validator = Validator::new();
        let mut ctx = InvocationContext::new(&mut field).with_validator(&mut validator);
        handler().before_validate(&mut ctx).expect("ok");

        assert!(validator.rule_names(":body").is_empty());
    }

    #[test]
    fn test_pattern_message_runs_through_hooktags() {
        let mut field = FieldDefinition::new("zip", FIELD_TYPE).with_settings(json!({
            "validation_rule": "/^[0-9]{5}$/",
            "validation_message": "five digits"
        }));
        assert_eq!(
            validate(&mut field, json!("123")),
            vec![("validateReg".to_string(), "FIVE DIGITS".to_string())]
        );

        let mut field = FieldDefinition::new("zip", FIELD_TYPE)
            .with_settings(json!({ "validation_rule": "^[0-9]{5}$" }));
        assert_eq!(
            validate(&mut field, json!("123")),
            vec![("validateReg".to_string(), "Invalid field.".to_string())]
        );
    }

    #[test]
    fn test_rules_registered_in_order() {
        let mut field = FieldDefinition::new("title", FIELD_TYPE)
            .required()
            .with_settings(json!({ "max_len": 3, "validation_rule": "/^a/" }));
        let mut validator = Validator::new();
        let mut ctx = InvocationContext::new(&mut field).with_validator(&mut validator);
        handler().before_validate(&mut ctx).expect("ok");

        assert_eq!(
            validator.rule_names(":title"),
            vec!["validateRequired", "validateLen", "validateReg"]
        );
    }

    #[test]
    fn test_before_validate_requires_validator() {
        let mut field = FieldDefinition::new("title", FIELD_TYPE);
        let mut ctx = InvocationContext::new(&mut field);
        let err: AppError = handler().before_validate(&mut ctx).expect_err("no validator");
        assert_eq!(err.kind, ErrorKind::Internal);
    }

    #[test]
    fn test_bad_settings_fail_before_validation() {
        let mut field = FieldDefinition::new("title", FIELD_TYPE)
            .with_settings(json!({ "validation_rule": "/[/" }));
        let mut validator = Validator::new();
        let mut ctx = InvocationContext::new(&mut field).with_validator(&mut validator);
        let err = handler().before_validate(&mut ctx).expect_err("bad rule");
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_after_save_takes_post_value() {
        let mut field = FieldDefinition::new("title", FIELD_TYPE).with_value(json!("old"));
        let mut ctx = InvocationContext::new(&mut field).with_post(json!("new"));
        handler().after_save(&mut ctx).expect("ok");
        assert_eq!(field.value, Some(json!("new")));
    }

    #[test]
    fn test_gates_continue() {
        let handler = handler();
        let mut field = FieldDefinition::new("title", FIELD_TYPE);
        let mut ctx = InvocationContext::new(&mut field);
        assert!(handler.before_attach(&mut ctx).expect("ok"));
        assert!(handler.before_detach(&mut ctx).expect("ok"));
        assert!(handler.before_delete(&mut ctx).expect("ok"));
        assert!(handler.before_find(&mut ctx).expect("ok"));
        assert!(handler.after_validate(&mut ctx).expect("ok"));
    }
}
