use crate::{
    compile::{Include, Inverted, Output, Param, Scope, Section, Template, Tree},
    context::{is_empty, Context, Parents, Resolved},
    engine::Engine,
    escape::escape,
    globals::{Globals, Slot},
    helper::{Body, Call},
    log::{error_write, Error, MISSING_PARTIAL},
    partials::{Partial, Partials},
    pipe::Pipe,
    region::Region,
};

use serde_json::Value;
use std::fmt::Write;

/// Walks a compiled [`Template`], resolving expressions against context
/// data and writing output.
pub struct Renderer<'render> {
    /// The engine that compiled the template, consulted for its caches.
    pub(crate) engine: &'render Engine,
    /// The template being rendered.
    pub(crate) template: &'render Template,
    /// Fallback storage for this render.
    pub(crate) globals: &'render Globals,
    /// Partial templates available to this render.
    pub(crate) partials: &'render Partials,
}

impl<'render> Renderer<'render> {
    /// Create a new [`Renderer`].
    pub(crate) fn new(
        engine: &'render Engine,
        template: &'render Template,
        globals: &'render Globals,
        partials: &'render Partials,
    ) -> Self {
        Renderer {
            engine,
            template,
            globals,
            partials,
        }
    }

    /// Render the [`Template`] with the given data and return the output.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a referenced partial is missing, or a
    /// helper fails.
    pub(crate) fn render(&self, data: Value) -> Result<String, Error> {
        let context = Context::new(Some(data), self.globals);
        let mut buffer = String::with_capacity(self.template.source.len());
        let mut pipe = Pipe::new(&mut buffer);
        self.render_scope(&self.template.scope, &context, None, &mut pipe)?;

        Ok(buffer)
    }

    /// Render every instruction in the given [`Scope`].
    pub(crate) fn render_scope<'ctx>(
        &self,
        scope: &Scope,
        context: &Context<'ctx>,
        chain: Option<&Parents<'_, 'ctx>>,
        pipe: &mut Pipe<'_>,
    ) -> Result<(), Error> {
        for tree in &scope.data {
            match tree {
                Tree::Raw(region) => pipe
                    .write_str(region.literal(&self.template.source))
                    .map_err(|_| error_write())?,
                Tree::Output(output) => self.render_output(output, context, chain, pipe)?,
                Tree::Section(section) => self.render_section(section, context, chain, pipe)?,
                Tree::Inverted(inverted) => self.render_inverted(inverted, context, chain, pipe)?,
                Tree::Include(include) => self.render_include(include, context, chain, pipe)?,
            }
        }

        Ok(())
    }

    /// Render an [`Output`] instruction.
    ///
    /// A value that resolves to a helper is invoked with the tag's
    /// parameters; anything else passes through the output filter
    /// directly. Empty values emit nothing.
    fn render_output<'ctx>(
        &self,
        output: &Output,
        context: &Context<'ctx>,
        chain: Option<&Parents<'_, 'ctx>>,
        pipe: &mut Pipe<'_>,
    ) -> Result<(), Error> {
        match context.resolve(&output.path, chain) {
            Resolved::Helper(helper) => {
                let call = Call {
                    renderer: self,
                    context,
                    chain,
                    arguments: self.eval_params(&output.params, context, chain),
                    body: None,
                    inverse: None,
                };
                let slot = helper
                    .apply(&call)
                    .map_err(|error| self.decorate(error, output.region))?;
                self.write_filtered(slot.into(), output.escaped, pipe)
            }
            resolved => self.write_filtered(resolved, output.escaped, pipe),
        }
    }

    /// Render a [`Section`] instruction.
    ///
    /// A value that resolves to a helper is invoked once with the tag's
    /// parameters and the compiled bodies; the helper decides iteration.
    /// Anything else follows the default iteration rules: an empty value
    /// renders the else branch with the current context, `true` renders
    /// the body once with the current context, an array renders the body
    /// per element, and any other value renders the body once with that
    /// value as context.
    fn render_section<'ctx>(
        &self,
        section: &Section,
        context: &Context<'ctx>,
        chain: Option<&Parents<'_, 'ctx>>,
        pipe: &mut Pipe<'_>,
    ) -> Result<(), Error> {
        let link = Parents::link(chain, context);

        match context.resolve(&section.path, chain) {
            Resolved::Helper(helper) => {
                let call = Call {
                    renderer: self,
                    context,
                    chain,
                    arguments: self.eval_params(&section.params, context, chain),
                    body: Some(Body {
                        renderer: self,
                        scope: &section.then_branch,
                        chain: Some(&link),
                    }),
                    inverse: section.else_branch.as_ref().map(|scope| Body {
                        renderer: self,
                        scope,
                        chain: Some(&link),
                    }),
                };
                let slot = helper
                    .apply(&call)
                    .map_err(|error| self.decorate(error, section.region))?;

                self.write_slot(slot, pipe)
            }
            resolved if resolved.is_empty() => {
                if let Some(scope) = &section.else_branch {
                    self.render_scope(scope, context, Some(&link), pipe)?;
                }
                Ok(())
            }
            resolved => {
                let origin = section.path.to_string();
                match resolved.into_data().unwrap_or(Value::Null) {
                    Value::Bool(_) => {
                        // Only `true` reaches this point.
                        let child = Context::new(context.data().cloned(), self.globals)
                            .with_origin(origin);
                        self.render_scope(&section.then_branch, &child, Some(&link), pipe)?;
                    }
                    Value::Array(items) => {
                        for item in items {
                            let child = Context::new(Some(item), self.globals)
                                .with_origin(origin.clone());
                            self.render_scope(&section.then_branch, &child, Some(&link), pipe)?;
                        }
                    }
                    value => {
                        let child = Context::new(Some(value), self.globals).with_origin(origin);
                        self.render_scope(&section.then_branch, &child, Some(&link), pipe)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Render an [`Inverted`] instruction.
    ///
    /// The body fires when the value is empty, or when it is a helper
    /// whose zero-argument invocation yields an empty value. Otherwise
    /// the else branch fires, when present.
    ///
    /// The scope chain is not extended here.
    fn render_inverted<'ctx>(
        &self,
        inverted: &Inverted,
        context: &Context<'ctx>,
        chain: Option<&Parents<'_, 'ctx>>,
        pipe: &mut Pipe<'_>,
    ) -> Result<(), Error> {
        let fire = match context.resolve(&inverted.path, chain) {
            Resolved::Helper(helper) => {
                let call = Call {
                    renderer: self,
                    context,
                    chain,
                    arguments: vec![],
                    body: None,
                    inverse: None,
                };
                let slot = helper
                    .apply(&call)
                    .map_err(|error| self.decorate(error, inverted.region))?;
                Resolved::from(slot).is_empty()
            }
            resolved => resolved.is_empty(),
        };

        if fire {
            self.render_scope(&inverted.then_branch, context, chain, pipe)
        } else if let Some(scope) = &inverted.else_branch {
            self.render_scope(scope, context, chain, pipe)
        } else {
            Ok(())
        }
    }

    /// Render an [`Include`] instruction.
    ///
    /// The partial renders with the resolved argument as its context
    /// data, or the current context without one, and the same scope
    /// chain, globals, and partials as this render. Raw source compiles
    /// through the engine cache on first use.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the named partial was not supplied.
    fn render_include<'ctx>(
        &self,
        include: &Include,
        context: &Context<'ctx>,
        chain: Option<&Parents<'_, 'ctx>>,
        pipe: &mut Pipe<'_>,
    ) -> Result<(), Error> {
        let partial = self.partials.get(&include.name).ok_or_else(|| {
            Error::build(MISSING_PARTIAL)
                .with_pointer(&self.template.source, include.region)
                .with_help(format!(
                    "no partial named `{}` was supplied, add it with `Partials::insert`",
                    include.name
                ))
        })?;
        let template = match partial {
            Partial::Compiled(template) => template.clone(),
            Partial::Source(source) => self.engine.compile(source)?,
        };

        let data = match &include.arg {
            Some(path) => context.resolve(path, chain).into_data(),
            None => context.data().cloned(),
        };
        let child = Context::new(data, self.globals).with_origin(include.name.clone());

        let renderer = Renderer {
            engine: self.engine,
            template: template.as_ref(),
            globals: self.globals,
            partials: self.partials,
        };
        renderer.render_scope(&template.scope, &child, chain, pipe)
    }

    /// Evaluate the parameters of a tag for a helper invocation.
    ///
    /// Literals become strings, lookups resolve to their data, or null
    /// when nothing was found.
    fn eval_params<'ctx>(
        &self,
        params: &[Param],
        context: &Context<'ctx>,
        chain: Option<&Parents<'_, 'ctx>>,
    ) -> Vec<Value> {
        params
            .iter()
            .map(|param| match param {
                Param::Literal(text) => Value::String(text.clone()),
                Param::Lookup(path) => context
                    .resolve(path, chain)
                    .into_data()
                    .unwrap_or(Value::Null),
            })
            .collect()
    }

    /// Write a resolved value through the output filter.
    ///
    /// Empty values emit nothing. Pre-escaped text is written unchanged
    /// regardless of the escape flag.
    fn write_filtered(
        &self,
        resolved: Resolved,
        escaped: bool,
        pipe: &mut Pipe<'_>,
    ) -> Result<(), Error> {
        if resolved.is_empty() {
            return Ok(());
        }

        match resolved {
            Resolved::Safe(text) => pipe.write_str(&text).map_err(|_| error_write()),
            Resolved::Value(value) if escaped => {
                let mut plain = String::new();
                Pipe::new(&mut plain)
                    .write_value(&value)
                    .map_err(|_| error_write())?;
                pipe.write_str(&escape(&plain)).map_err(|_| error_write())
            }
            Resolved::Value(value) => pipe.write_value(&value).map_err(|_| error_write()),
            // A helper is not printable data.
            Resolved::Missing | Resolved::Helper(_) => Ok(()),
        }
    }

    /// Write the output of a section helper, unfiltered.
    ///
    /// Empty values emit nothing, so a helper that renders through its
    /// bodies may return null.
    fn write_slot(&self, slot: Slot, pipe: &mut Pipe<'_>) -> Result<(), Error> {
        match slot {
            Slot::Safe(text) => pipe.write_str(&text).map_err(|_| error_write()),
            Slot::Value(value) if !is_empty(&value) => {
                pipe.write_value(&value).map_err(|_| error_write())
            }
            _ => Ok(()),
        }
    }

    /// Attach a pointer at the given tag when a helper error carries no
    /// visualization of its own.
    fn decorate(&self, error: Error, region: Region) -> Error {
        if error.has_visual() {
            error
        } else {
            error.with_pointer(&self.template.source, region)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        globals::Slot,
        helper::Call,
        log::Error,
        partials::Partials,
        Engine, Globals,
    };
    use serde_json::{json, Value};

    #[test]
    fn test_expression() {
        assert_eq!(
            render("Hello, {{name}}!", json!({"name": "Ann"})),
            "Hello, Ann!"
        );
        assert_eq!(render("Hello, {{name}}!", json!({})), "Hello, !");
    }

    #[test]
    fn test_expression_escaped() {
        let data = json!({"raw": "<b>x</b>"});

        assert_eq!(render("{{raw}}", data.clone()), "&lt;b&gt;x&lt;/b&gt;");
        assert_eq!(render("{{{raw}}}", data.clone()), "<b>x</b>");
        assert_eq!(render("{{&raw}}", data), "<b>x</b>");
    }

    #[test]
    fn test_expression_escape_details() {
        // An ampersand that already begins an entity survives, quotes
        // pass through, and backslashes double.
        assert_eq!(
            render("{{text}}", json!({"text": r#"a & b &amp; "c" \"#})),
            r#"a &amp; b &amp; "c" \\"#
        );
    }

    #[test]
    fn test_expression_scalars() {
        assert_eq!(render("{{zero}}", json!({"zero": 0})), "0");
        assert_eq!(render("{{text}}", json!({"text": ""})), "");
        assert_eq!(render("{{ok}}", json!({"ok": true})), "true");
        // Empty values render as nothing at all.
        assert_eq!(render("{{gone}}", json!({"gone": null})), "");
        assert_eq!(render("{{gone}}", json!({"gone": false})), "");
        assert_eq!(render("{{gone}}", json!({"gone": []})), "");
    }

    #[test]
    fn test_expression_string_forms() {
        assert_eq!(render("{{list}}", json!({"list": [1, 2]})), "[1, 2]");
        assert_eq!(render("{{map}}", json!({"map": {"a": 1}})), "{a: 1}");
    }

    #[test]
    fn test_literal_text_preserved() {
        assert_eq!(
            render("a\n\n{{x}}b\r\nc \\ d", json!({"x": "-"})),
            "a\n\n-b\r\nc \\ d"
        );
        assert_eq!(render("a }} b", json!({})), "a }} b");
    }

    #[test]
    fn test_section_array() {
        let source = "{{#items}}{{.}},{{/items}}";

        assert_eq!(render(source, json!({"items": [1, 2, 3]})), "1,2,3,");
        assert_eq!(render(source, json!({"items": []})), "");
    }

    #[test]
    fn test_section_array_order() {
        assert_eq!(
            render(
                "{{#items}}{{name}} {{/items}}",
                json!({"items": [{"name": "a"}, {"name": "b"}, {"name": "c"}]})
            ),
            "a b c "
        );
    }

    #[test]
    fn test_section_bool() {
        let source = "{{#ok}}{{name}}{{/ok}}";

        // A true value renders the body once with the current context.
        assert_eq!(render(source, json!({"ok": true, "name": "x"})), "x");
        assert_eq!(render(source, json!({"ok": false, "name": "x"})), "");
    }

    #[test]
    fn test_section_value_as_context() {
        assert_eq!(
            render(
                "{{#user}}{{name}}{{/user}}",
                json!({"user": {"name": "ann"}})
            ),
            "ann"
        );
        assert_eq!(render("{{#word}}<{{.}}>{{/word}}", json!({"word": "hi"})), "<hi>");
    }

    #[test]
    fn test_section_else() {
        let source = "{{#items}}{{.}}{{^}}none{{/items}}";

        assert_eq!(render(source, json!({"items": []})), "none");
        assert_eq!(render(source, json!({})), "none");
        // A non-empty value renders only the then branch.
        assert_eq!(render(source, json!({"items": [1]})), "1");
    }

    #[test]
    fn test_section_parent_paths() {
        assert_eq!(
            render(
                "{{#user}}{{name}} of {{../company}}{{/user}}",
                json!({"user": {"name": "ann"}, "company": "acme"})
            ),
            "ann of acme"
        );
    }

    #[test]
    fn test_section_parent_paths_nested() {
        assert_eq!(
            render(
                "{{#a}}{{#b}}{{../../x}}{{/b}}{{/a}}",
                json!({"a": {"b": {}}, "x": "deep"})
            ),
            "deep"
        );
    }

    #[test]
    fn test_section_ascend_past_root() {
        // Ascending past the root of the chain resolves to nothing.
        assert_eq!(
            render("{{#a}}[{{../../x}}]{{/a}}", json!({"a": {}, "x": "top"})),
            "[]"
        );
    }

    #[test]
    fn test_inverted() {
        let source = "{{^items}}empty{{/items}}";

        assert_eq!(render(source, json!({"items": []})), "empty");
        assert_eq!(render(source, json!({"items": [1]})), "");
        assert_eq!(render(source, json!({})), "empty");
    }

    #[test]
    fn test_inverted_else() {
        let source = "{{^items}}empty{{^}}full{{/items}}";

        assert_eq!(render(source, json!({"items": []})), "empty");
        assert_eq!(render(source, json!({"items": [1]})), "full");
    }

    #[test]
    fn test_comment() {
        assert_eq!(render("a{{! ignore me }}b", json!({})), "ab");
    }

    #[test]
    fn test_path_segments() {
        assert_eq!(
            render("{{user/address/city}}", json!({"user": {"address": {"city": "rome"}}})),
            "rome"
        );
        // Digging through a missing or null value is soft.
        assert_eq!(render("{{user/address/city}}", json!({})), "");
        assert_eq!(render("{{user/address/city}}", json!({"user": null})), "");
    }

    #[test]
    fn test_path_array_index() {
        assert_eq!(
            render("{{items/0/name}}", json!({"items": [{"name": "first"}]})),
            "first"
        );
    }

    #[test]
    fn test_globals_fallback() {
        let engine = Engine::new();
        let template = engine.compile("{{name}}").unwrap();
        let globals = Globals::new().with_must("name", "fallback");

        // Consulted when the data comes up missing, and only then.
        let result = engine
            .render_with(&template, json!({}), &globals, &Partials::new())
            .unwrap();
        assert_eq!(result, "fallback");

        let result = engine
            .render_with(&template, json!({"name": "data"}), &globals, &Partials::new())
            .unwrap();
        assert_eq!(result, "data");
    }

    #[test]
    fn test_globals_fallback_single_segment_only() {
        let engine = Engine::new();
        let template = engine.compile("[{{outer/name}}]").unwrap();
        let globals = Globals::new().with_must("name", "fallback");
        let result = engine
            .render_with(&template, json!({}), &globals, &Partials::new())
            .unwrap();

        assert_eq!(result, "[]");
    }

    #[test]
    fn test_globals_safe() {
        let engine = Engine::new();
        let template = engine.compile("{{rule}}").unwrap();
        let globals = Globals::new().with_safe("rule", "<hr>");
        let result = engine
            .render_with(&template, json!({}), &globals, &Partials::new())
            .unwrap();

        // Pre-escaped text bypasses the output filter.
        assert_eq!(result, "<hr>");
    }

    #[test]
    fn test_helper_expression() {
        fn join(call: &Call<'_>) -> Result<Slot, Error> {
            let parts: Vec<String> = call
                .arguments()
                .iter()
                .map(|value| match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect();

            Ok(Slot::Value(json!(parts.join("-"))))
        }

        let engine = Engine::new();
        let template = engine.compile(r#"{{join "a" name missing}}"#).unwrap();
        let globals = Globals::new().with_helper("join", join);
        let result = engine
            .render_with(&template, json!({"name": "b"}), &globals, &Partials::new())
            .unwrap();

        // The missing lookup arrives as null.
        assert_eq!(result, "a-b-null");
    }

    #[test]
    fn test_helper_output_is_filtered() {
        fn markup(_: &Call<'_>) -> Result<Slot, Error> {
            Ok(Slot::Value(json!("<b>x</b>")))
        }

        let engine = Engine::new();
        let globals = Globals::new().with_helper("markup", markup);

        let escaped = engine.compile("{{markup}}").unwrap();
        let result = engine
            .render_with(&escaped, json!({}), &globals, &Partials::new())
            .unwrap();
        assert_eq!(result, "&lt;b&gt;x&lt;/b&gt;");

        let raw = engine.compile("{{{markup}}}").unwrap();
        let result = engine
            .render_with(&raw, json!({}), &globals, &Partials::new())
            .unwrap();
        assert_eq!(result, "<b>x</b>");
    }

    #[test]
    fn test_helper_section() {
        fn list(call: &Call<'_>) -> Result<Slot, Error> {
            let body = call
                .body()
                .ok_or_else(|| Error::build("helper `list` requires a block"))?;
            let mut out = String::from("<ul>");
            if let Some(Value::Array(items)) = call.arguments().first() {
                for item in items {
                    out.push_str("<li>");
                    out.push_str(&body.render(item)?);
                    out.push_str("</li>");
                }
            }
            out.push_str("</ul>");

            Ok(Slot::Safe(out))
        }

        let engine = Engine::new();
        let template = engine.compile("{{#list items}}{{name}}{{/list}}").unwrap();
        let globals = Globals::new().with_helper("list", list);
        let result = engine
            .render_with(
                &template,
                json!({"items": [{"name": "a"}, {"name": "b"}]}),
                &globals,
                &Partials::new(),
            )
            .unwrap();

        assert_eq!(result, "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_helper_section_inverse() {
        fn pick(call: &Call<'_>) -> Result<Slot, Error> {
            let chosen = match call.arguments().first() {
                Some(Value::Bool(true)) => call.body(),
                _ => call.inverse(),
            };
            match chosen {
                Some(body) => Ok(Slot::Safe(body.render(call.value())?)),
                None => Ok(Slot::Value(Value::Null)),
            }
        }

        let engine = Engine::new();
        let template = engine.compile("{{#pick flag}}yes{{^}}no{{/pick}}").unwrap();
        let globals = Globals::new().with_helper("pick", pick);

        let result = engine
            .render_with(&template, json!({"flag": true}), &globals, &Partials::new())
            .unwrap();
        assert_eq!(result, "yes");

        let result = engine
            .render_with(&template, json!({"flag": false}), &globals, &Partials::new())
            .unwrap();
        assert_eq!(result, "no");
    }

    #[test]
    fn test_helper_body_sees_parent_scope() {
        fn wrap(call: &Call<'_>) -> Result<Slot, Error> {
            let body = call
                .body()
                .ok_or_else(|| Error::build("helper `wrap` requires a block"))?;

            Ok(Slot::Safe(body.render(&json!({"inner": "x"}))?))
        }

        let engine = Engine::new();
        let template = engine
            .compile("{{#wrap}}{{inner}}/{{../title}}{{/wrap}}")
            .unwrap();
        let globals = Globals::new().with_helper("wrap", wrap);
        let result = engine
            .render_with(&template, json!({"title": "t"}), &globals, &Partials::new())
            .unwrap();

        assert_eq!(result, "x/t");
    }

    #[test]
    fn test_helper_get() {
        fn greet(call: &Call<'_>) -> Result<Slot, Error> {
            let name = call.get("user/name")?.unwrap_or(Value::Null);

            Ok(Slot::Value(json!(format!("hi, {}", name.as_str().unwrap_or("?")))))
        }

        let engine = Engine::new();
        let template = engine.compile("{{greet}}").unwrap();
        let globals = Globals::new().with_helper("greet", greet);
        let result = engine
            .render_with(
                &template,
                json!({"user": {"name": "ann"}}),
                &globals,
                &Partials::new(),
            )
            .unwrap();

        assert_eq!(result, "hi, ann");
    }

    #[test]
    fn test_helper_error_points_at_tag() {
        fn fail(_: &Call<'_>) -> Result<Slot, Error> {
            Err(Error::build("helper failure"))
        }

        let engine = Engine::new();
        let template = engine.compile("ok {{fail}}").unwrap();
        let globals = Globals::new().with_helper("fail", fail);
        let error = engine
            .render_with(&template, json!({}), &globals, &Partials::new())
            .unwrap_err();

        // The renderer attaches a pointer at the tag.
        assert!(format!("{error:#}").contains("{{fail}}"));
    }

    #[test]
    fn test_inverted_helper() {
        fn nothing(_: &Call<'_>) -> Result<Slot, Error> {
            Ok(Slot::Value(json!([])))
        }
        fn something(_: &Call<'_>) -> Result<Slot, Error> {
            Ok(Slot::Value(json!(1)))
        }

        let engine = Engine::new();
        let globals = Globals::new()
            .with_helper("nothing", nothing)
            .with_helper("something", something);

        let template = engine.compile("{{^nothing}}none{{/nothing}}").unwrap();
        let result = engine
            .render_with(&template, json!({}), &globals, &Partials::new())
            .unwrap();
        assert_eq!(result, "none");

        let template = engine.compile("{{^something}}none{{/something}}").unwrap();
        let result = engine
            .render_with(&template, json!({}), &globals, &Partials::new())
            .unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn test_partial() {
        let engine = Engine::new();
        let partials = Partials::new().with("card", "<b>{{name}}</b>");

        // With an argument the partial renders that value as context.
        let template = engine.compile("{{>card user}}").unwrap();
        let result = engine
            .render_with(
                &template,
                json!({"user": {"name": "ann"}}),
                &Globals::new(),
                &partials,
            )
            .unwrap();
        assert_eq!(result, "<b>ann</b>");

        // Without one it renders with the current context.
        let template = engine.compile("{{>card}}").unwrap();
        let result = engine
            .render_with(&template, json!({"name": "bob"}), &Globals::new(), &partials)
            .unwrap();
        assert_eq!(result, "<b>bob</b>");
    }

    #[test]
    fn test_partial_compiled() {
        let engine = Engine::new();
        let card = engine.compile("<b>{{name}}</b>").unwrap();
        let partials = Partials::new().with_compiled("card", card);
        let template = engine.compile("{{>card user}}").unwrap();
        let result = engine
            .render_with(
                &template,
                json!({"user": {"name": "ann"}}),
                &Globals::new(),
                &partials,
            )
            .unwrap();

        assert_eq!(result, "<b>ann</b>");
    }

    #[test]
    fn test_partial_sees_scope_chain() {
        let engine = Engine::new();
        let partials = Partials::new().with("info", "{{name}} ({{../title}})");
        let template = engine.compile("{{#user}}{{>info}}{{/user}}").unwrap();
        let result = engine
            .render_with(
                &template,
                json!({"user": {"name": "ann"}, "title": "dr"}),
                &Globals::new(),
                &partials,
            )
            .unwrap();

        assert_eq!(result, "ann (dr)");
    }

    #[test]
    fn test_partial_missing_is_fatal() {
        let engine = Engine::new();
        let template = engine.compile("{{>missing}}").unwrap();
        let error = engine.render(&template, json!({})).unwrap_err();

        assert!(format!("{error}").contains("missing partial"));
    }

    #[test]
    fn test_section_of_safe_value() {
        let engine = Engine::new();
        let template = engine.compile("{{#rule}}[{{.}}]{{/rule}}").unwrap();
        let globals = Globals::new().with_safe("rule", "<hr>");
        let result = engine
            .render_with(&template, json!({}), &globals, &Partials::new())
            .unwrap();

        // A non-empty safe value renders the body once; as context data
        // it is plain text again, so the expression escapes it.
        assert_eq!(result, "[&lt;hr&gt;]");
    }

    /// Compile and render the given source with the data, panicking on
    /// any error.
    fn render(source: &str, data: Value) -> String {
        let engine = Engine::new();
        let template = engine.compile(source).unwrap();

        engine.render(&template, data).unwrap()
    }
}
