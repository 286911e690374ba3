use crate::compile::{Scope, Tree};

use std::fmt::{Display, Formatter, Result};

/// A compiled template that can be rendered with context data.
#[derive(Debug, Clone)]
pub struct Template {
    /// The name of the [`Template`], when compiled under one.
    pub name: Option<String>,
    /// The instruction tree generated during compilation.
    pub scope: Scope,
    /// The source text from which this [`Template`] was generated.
    pub source: String,
}

impl Display for Template {
    /// Write the [`Template`] as an instruction listing, one instruction
    /// per line with block bodies indented.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write_scope(f, &self.scope, &self.source, 0)
    }
}

/// Write the instructions of the given [`Scope`] at the given indent
/// level.
fn write_scope(f: &mut Formatter<'_>, scope: &Scope, source: &str, level: usize) -> Result {
    let pad = "  ".repeat(level);

    for tree in &scope.data {
        match tree {
            Tree::Raw(region) => {
                writeln!(f, "{pad}text {:?}", region.literal(source))?;
            }
            Tree::Output(output) => {
                let form = if output.escaped { "" } else { " raw" };
                write!(f, "{pad}show{form} `{}`", output.path)?;
                for param in &output.params {
                    write!(f, " {param}")?;
                }
                writeln!(f)?;
            }
            Tree::Section(section) => {
                write!(f, "{pad}section `{}`", section.path)?;
                for param in &section.params {
                    write!(f, " {param}")?;
                }
                writeln!(f, ":")?;
                write_scope(f, &section.then_branch, source, level + 1)?;
                if let Some(scope) = &section.else_branch {
                    writeln!(f, "{pad}else:")?;
                    write_scope(f, scope, source, level + 1)?;
                }
                writeln!(f, "{pad}end")?;
            }
            Tree::Inverted(inverted) => {
                writeln!(f, "{pad}inverted `{}`:", inverted.path)?;
                write_scope(f, &inverted.then_branch, source, level + 1)?;
                if let Some(scope) = &inverted.else_branch {
                    writeln!(f, "{pad}else:")?;
                    write_scope(f, scope, source, level + 1)?;
                }
                writeln!(f, "{pad}end")?;
            }
            Tree::Include(include) => {
                write!(f, "{pad}include `{}`", include.name)?;
                if let Some(arg) = &include.arg {
                    write!(f, " with `{arg}`")?;
                }
                writeln!(f)?;
            }
        }
    }

    Ok(())
}
