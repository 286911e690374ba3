use crate::{
    compile::{
        tree::{Include, Inverted, Output, Param, Section, Tree},
        Scope, Template, CLOSE, CLOSE_BLOCK, ELSE,
    },
    log::{Error, INVALID_PARAMETER, INVALID_SYNTAX, MISMATCHED_CLOSE},
    path::{Path, PathStore},
    region::Region,
};

use morel::Finder;
use std::sync::Arc;

/// Compiles template source into a [`Template`].
///
/// Literal text is scanned with a [`Finder`] until a tag opening is
/// found; everything inside a tag is read one character at a time, the
/// way the template grammar demands: a `}}` inside a string literal does
/// not close the tag, and an unescaped tag consumes one extra `}`.
pub struct Parser<'source> {
    /// Reference to the source text.
    source: &'source str,
    /// Compiled [`Finder`] used to locate tag openings in the source
    /// text.
    finder: &'source Finder,
    /// Memoization table for path expressions.
    paths: &'source PathStore,
    /// Position within source.
    cursor: usize,
}

/// How a scope stopped compiling.
enum Terminal {
    /// The matching close tag was found.
    Close,
    /// A bare `{{^}}` was found, so an else branch follows.
    Else(Region),
    /// The source ran out.
    ///
    /// Not an error: an unclosed block's body runs to the end of the
    /// source.
    End,
}

/// Tag variants, recognized by the character after the opening marker.
#[derive(Clone, Copy, PartialEq)]
enum Kind {
    /// `{{! ... }}` - parsed, emits nothing.
    Comment,
    /// `{{#name}}` - opens a section.
    Section,
    /// `{{^name}}` - opens an inverted section.
    Inverted,
    /// `{{>name}}` - renders a partial.
    Include,
    /// `{{{name}}}` or `{{&name}}` - expression, written unescaped.
    Unescaped,
    /// `{{name}}` - expression, written escaped.
    Escaped,
}

/// A parameter as written in a tag, before paths are parsed.
struct RawParam {
    /// Accumulated text. Literals keep their quotes and escapes.
    text: String,
    /// True when the parameter is a quoted string literal.
    literal: bool,
    /// First byte of the parameter.
    begin: usize,
    /// Last byte of the parameter, exclusive.
    end: usize,
}

impl RawParam {
    /// Create a new empty [`RawParam`] at the given position.
    fn new(at: usize) -> Self {
        Self {
            text: String::new(),
            literal: false,
            begin: at,
            end: at,
        }
    }

    /// Return the [`Region`] spanning this parameter.
    fn region(&self) -> Region {
        Region::new(self.begin..self.end)
    }
}

impl<'source> Parser<'source> {
    /// Create a new [`Parser`] over the given source.
    #[inline]
    pub fn new(source: &'source str, finder: &'source Finder, paths: &'source PathStore) -> Self {
        Self {
            source,
            finder,
            paths,
            cursor: 0,
        }
    }

    /// Compile the source into a [`Template`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the source contains invalid syntax: a
    /// mismatched block close tag, a string literal begun in the middle
    /// of a parameter, a path that ascends after digging, or a second
    /// else boundary in one block.
    pub fn compile(mut self, name: Option<&str>) -> Result<Template, Error> {
        let (scope, _) = self.parse_scope(None)?;

        Ok(Template {
            name: name.map(str::to_owned),
            scope,
            source: self.source.to_owned(),
        })
    }

    /// Compile instructions until the end of the enclosing block, or the
    /// end of the source.
    ///
    /// When `enclosing` is set the scope ends at the matching close tag,
    /// and a bare `{{^}}` ends it early to begin an else branch. At the
    /// top level both sequences have no special meaning.
    fn parse_scope(&mut self, enclosing: Option<&str>) -> Result<(Scope, Terminal), Error> {
        let mut scope = Scope::new();

        loop {
            if self.source[self.cursor..].is_empty() {
                return Ok((scope, Terminal::End));
            }

            match self.finder.next(self.source, self.cursor) {
                Some((_, begin, end)) => {
                    if begin > self.cursor {
                        scope.data.push(Tree::Raw(Region::new(self.cursor..begin)));
                    }

                    if let Some(name) = enclosing {
                        if self.source[begin..].starts_with(ELSE) {
                            self.cursor = begin + ELSE.len();
                            return Ok((scope, Terminal::Else(Region::new(begin..self.cursor))));
                        }
                        if self.source[begin..].starts_with(CLOSE_BLOCK) {
                            self.cursor = begin;
                            self.parse_close(name)?;
                            return Ok((scope, Terminal::Close));
                        }
                    }

                    self.cursor = end;
                    if let Some(tree) = self.parse_tag(begin)? {
                        scope.data.push(tree);
                    }
                }
                None => {
                    if self.cursor < self.source.len() {
                        scope
                            .data
                            .push(Tree::Raw(Region::new(self.cursor..self.source.len())));
                        self.cursor = self.source.len();
                    }
                    return Ok((scope, Terminal::End));
                }
            }
        }
    }

    /// Consume the close tag for the named block.
    ///
    /// Assumes the cursor is on a `{{/` sequence.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] unless the tag reads exactly `{{/name}}`.
    fn parse_close(&mut self, name: &str) -> Result<(), Error> {
        let expected = format!("{CLOSE_BLOCK}{name}{CLOSE}");
        let begin = self.cursor;

        if self.source[begin..].starts_with(&expected) {
            self.cursor = begin + expected.len();
            return Ok(());
        }

        let end = self.source[begin..]
            .find(CLOSE)
            .map(|i| begin + i + CLOSE.len())
            .unwrap_or(self.source.len());

        Err(Error::build(MISMATCHED_CLOSE)
            .with_pointer(self.source, begin..end)
            .with_help(format!("expected `{expected}`")))
    }

    /// Parse one tag into a [`Tree`] instruction.
    ///
    /// Assumes the cursor is just past the opening marker, which begins
    /// at `begin`. Returns None for comments, and for a tag that runs
    /// off the end of the source, which emits nothing.
    fn parse_tag(&mut self, begin: usize) -> Result<Option<Tree>, Error> {
        let kind = match self.peek_char() {
            Some('!') => Kind::Comment,
            Some('#') => Kind::Section,
            Some('^') => Kind::Inverted,
            Some('>') => Kind::Include,
            Some('{') | Some('&') => Kind::Unescaped,
            Some(_) => Kind::Escaped,
            None => return Ok(None),
        };
        if kind != Kind::Escaped {
            self.take_char();
        }

        let params = match self.parse_params(kind)? {
            Some(params) => params,
            None => return Ok(None),
        };
        let region = Region::new(begin..self.cursor);
        let (name, params) = split_params(params);

        let tree = match kind {
            Kind::Comment => return Ok(None),
            Kind::Escaped | Kind::Unescaped => Tree::Output(Output {
                path: self.parse_path(&name)?,
                params: self.build_params(params)?,
                escaped: kind == Kind::Escaped,
                region,
            }),
            Kind::Section => {
                let path = self.parse_path(&name)?;
                let params = self.build_params(params)?;
                let (then_branch, terminal) = self.parse_scope(Some(&name.text))?;
                let else_branch = match terminal {
                    Terminal::Else(_) => Some(self.parse_else(&name.text)?),
                    _ => None,
                };

                Tree::Section(Section {
                    path,
                    params,
                    then_branch,
                    else_branch,
                    region,
                })
            }
            Kind::Inverted => {
                let path = self.parse_path(&name)?;
                let (then_branch, terminal) = self.parse_scope(Some(&name.text))?;
                let else_branch = match terminal {
                    Terminal::Else(_) => Some(self.parse_else(&name.text)?),
                    _ => None,
                };

                Tree::Inverted(Inverted {
                    path,
                    then_branch,
                    else_branch,
                    region,
                })
            }
            Kind::Include => Tree::Include(Include {
                arg: match params.last() {
                    Some(param) => Some(self.parse_path(param)?),
                    None => None,
                },
                name: name.text,
                region,
            }),
        };

        Ok(Some(tree))
    }

    /// Compile the else branch of the named block.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the branch contains another `{{^}}`, or
    /// closes with the wrong tag.
    fn parse_else(&mut self, name: &str) -> Result<Scope, Error> {
        let (scope, terminal) = self.parse_scope(Some(name))?;

        match terminal {
            Terminal::Else(region) => Err(Error::build(INVALID_SYNTAX)
                .with_pointer(self.source, region)
                .with_help("this block already has an else branch")),
            _ => Ok(scope),
        }
    }

    /// Read the parameters of a tag, up to and including the closing
    /// marker.
    ///
    /// Parameters are separated by spaces. A double-quoted parameter is
    /// a string literal: it may contain spaces, escaped quotes, and the
    /// closing marker. An unescaped tag consumes one extra `}` after the
    /// marker when present.
    ///
    /// Returns None when the source ends before the tag closes.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a string literal begins in the middle
    /// of another parameter.
    fn parse_params(&mut self, kind: Kind) -> Result<Option<Vec<RawParam>>, Error> {
        let mut params = vec![RawParam::new(self.cursor)];
        let mut in_string = false;

        loop {
            let at = self.cursor;
            let c = match self.take_char() {
                Some(c) => c,
                None => return Ok(None),
            };
            let current = params.last_mut().expect("parameter list is never empty");

            if in_string {
                current.text.push(c);
                current.end = self.cursor;
                if c == '\\' && self.peek_char() == Some('"') {
                    current.text.push('"');
                    self.take_char();
                    current.end = self.cursor;
                } else if c == '"' {
                    in_string = false;
                    params.push(RawParam::new(self.cursor));
                }
            } else if c == '"' {
                if !current.text.is_empty() {
                    return Err(Error::build(INVALID_PARAMETER)
                        .with_pointer(self.source, at..self.cursor)
                        .with_help(format!(
                            "already in the middle of parameter `{}`, close it \
                            before starting a string literal",
                            current.text
                        )));
                }
                in_string = true;
                current.literal = true;
                current.begin = at;
                current.text.push('"');
                current.end = self.cursor;
            } else if c == ' ' {
                if !current.text.is_empty() {
                    params.push(RawParam::new(self.cursor));
                }
            } else if c == '}' && self.peek_char() == Some('}') {
                self.take_char();
                if kind == Kind::Unescaped && self.peek_char() == Some('}') {
                    self.take_char();
                }
                return Ok(Some(params));
            } else if kind == Kind::Comment {
                // Contents are parsed but discarded.
            } else {
                if current.text.is_empty() {
                    current.begin = at;
                }
                current.text.push(c);
                current.end = self.cursor;
            }
        }
    }

    /// Parse the text of the given parameter as a [`Path`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] pointing at the parameter when it is not a
    /// valid path.
    fn parse_path(&self, param: &RawParam) -> Result<Arc<Path>, Error> {
        self.paths
            .parse(&param.text)
            .map_err(|error| error.with_pointer(self.source, param.region()))
    }

    /// Convert raw parameters into [`Param`] instances.
    ///
    /// Quoted literals are unescaped; everything else parses as a path.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a parameter is not a valid path.
    fn build_params(&self, params: Vec<RawParam>) -> Result<Vec<Param>, Error> {
        params
            .iter()
            .map(|param| {
                if param.literal {
                    Ok(Param::Literal(unescape_literal(&param.text)))
                } else {
                    Ok(Param::Lookup(self.parse_path(param)?))
                }
            })
            .collect()
    }

    /// Return the next character without advancing the cursor.
    fn peek_char(&self) -> Option<char> {
        self.source[self.cursor..].chars().next()
    }

    /// Return the next character and advance the cursor past it.
    fn take_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.cursor += c.len_utf8();

        Some(c)
    }
}

/// Separate the tag name from the remaining parameters.
///
/// The first parameter is the name, even when empty. Empty parameters
/// after it are discarded.
fn split_params(mut params: Vec<RawParam>) -> (RawParam, Vec<RawParam>) {
    let rest = params.split_off(1);
    let name = params
        .into_iter()
        .next()
        .expect("parameter list is never empty");

    (name, rest.into_iter().filter(|p| !p.text.is_empty()).collect())
}

/// Strip the quotes from a string literal and process its escapes.
///
/// `\n`, `\r`, and `\t` become control characters, while any other
/// escaped character stands for itself.
fn unescape_literal(raw: &str) -> String {
    let inner = raw.strip_prefix('"').unwrap_or(raw);
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => text.push('\n'),
            Some('r') => text.push('\r'),
            Some('t') => text.push('\t'),
            Some(other) => text.push(other),
            None => text.push('\\'),
        }
    }

    text
}
