//! HTML production for the four visitor-facing screens.
//!
//! Rendering sits behind a trait so the handlers never depend on how markup
//! is produced; tests substitute a fake renderer, and a future template
//! engine can slot in without touching handler code. The built-in renderer
//! keeps the markup inline, mirroring the original four-template set.

use std::fmt;

use crate::storage::Page;

/// The fixed set of screens the wiki renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Front,
    Login,
    Edit,
    View,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Front => "front",
            Template::Login => "login",
            Template::Edit => "edit",
            Template::View => "view",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template '{template}' requires a page")]
    MissingPage { template: &'static str },
}

/// Rendering seam consumed by the handlers: a template name and an optional
/// page in, HTML out.
pub trait Renderer: Send + Sync {
    fn render(&self, template: Template, page: Option<&Page>) -> Result<String, RenderError>;
}

/// Built-in renderer producing self-contained HTML.
#[derive(Debug, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn page_for(template: Template, page: Option<&Page>) -> Result<&Page, RenderError> {
        page.ok_or(RenderError::MissingPage {
            template: template.name(),
        })
    }

    fn shell(title: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
            escape(title),
            body
        )
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, template: Template, page: Option<&Page>) -> Result<String, RenderError> {
        match template {
            Template::Front => Ok(Self::shell(
                "wikid",
                "<h1>wikid</h1>\n\
                 <p>A tiny wiki. Pages live at <code>/view/&lt;Title&gt;</code>.</p>\n\
                 <p><a href=\"/view/Home\">Home page</a> &middot; <a href=\"/login\">Log in</a></p>",
            )),
            Template::Login => Ok(Self::shell(
                "Log in",
                "<h1>Log in</h1>\n\
                 <form action=\"/session/new\" method=\"POST\">\n\
                 <input type=\"submit\" value=\"Log in\">\n\
                 </form>\n\
                 <p><a href=\"/\">Front page</a></p>",
            )),
            Template::View => {
                let page = Self::page_for(template, page)?;
                let title = escape(&page.title);
                let body = escape(&String::from_utf8_lossy(&page.body));
                Ok(Self::shell(
                    &page.title,
                    &format!(
                        "<h1>{title}</h1>\n\
                         <p>[<a href=\"/edit/{title}\">edit</a>]</p>\n\
                         <div><pre>{body}</pre></div>"
                    ),
                ))
            }
            Template::Edit => {
                let page = Self::page_for(template, page)?;
                let title = escape(&page.title);
                let body = escape(&String::from_utf8_lossy(&page.body));
                Ok(Self::shell(
                    &format!("Editing {}", page.title),
                    &format!(
                        "<h1>Editing {title}</h1>\n\
                         <form action=\"/save/{title}\" method=\"POST\">\n\
                         <textarea name=\"body\" rows=\"20\" cols=\"80\">{body}</textarea><br>\n\
                         <input type=\"submit\" value=\"Save\">\n\
                         </form>"
                    ),
                ))
            }
        }
    }
}

/// Minimal HTML escaping for text and attribute positions.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
