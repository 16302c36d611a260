//! Issue body rendering.
//!
//! The body template understands a closed set of placeholders:
//!
//! | Placeholder | Renders as |
//! |---|---|
//! | `{{previousIssueNumber}}` | number of the previous issue, or nothing if there is none |
//! | `{{assignees}}` | assignees of the new issue, comma separated |
//!
//! A section wrapped in `{{#if previousIssueNumber}} ... {{/if}}` (or
//! `{{#if assignees}}`) is kept only when that value is non-empty. Sections do
//! not nest. Anything else between double braces is left in the output as
//! written.

use crate::IssueNumber;

const SECTION_END: &str = "{{/if}}";

/// Values available to the body template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub previous_issue_number: Option<IssueNumber>,
    pub assignees: &'a [String],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    PreviousIssueNumber,
    Assignees,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "previousIssueNumber" => Some(Self::PreviousIssueNumber),
            "assignees" => Some(Self::Assignees),
            _ => None,
        }
    }

    fn resolve(self, ctx: &TemplateContext<'_>) -> String {
        match self {
            Self::PreviousIssueNumber => ctx
                .previous_issue_number
                .map(|n| n.to_string())
                .unwrap_or_default(),
            Self::Assignees => ctx.assignees.join(", "),
        }
    }
}

/// Renders `template` against `ctx`.
///
/// An empty template renders to an empty body.
pub fn render_body(template: &str, ctx: &TemplateContext<'_>) -> String {
    render(template, ctx, true)
}

fn render(template: &str, ctx: &TemplateContext<'_>, sections: bool) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let inner = &rest[start + 2..];
        let Some(end) = inner.find("}}") else {
            // Unterminated tag: keep the remainder verbatim.
            out.push_str(&rest[start..]);
            return out;
        };
        let raw_tag = &rest[start..start + 2 + end + 2];
        let tag = inner[..end].trim();
        rest = &inner[end + 2..];

        if let Some(name) = tag.strip_prefix("#if ").filter(|_| sections) {
            let Some(placeholder) = Placeholder::parse(name.trim()) else {
                out.push_str(raw_tag);
                continue;
            };
            let (section, remainder) = match rest.find(SECTION_END) {
                Some(i) => (&rest[..i], &rest[i + SECTION_END.len()..]),
                None => (rest, ""),
            };
            if !placeholder.resolve(ctx).is_empty() {
                out.push_str(&render(section, ctx, false));
            }
            rest = remainder;
        } else if let Some(placeholder) = Placeholder::parse(tag) {
            out.push_str(&placeholder.resolve(ctx));
        } else {
            out.push_str(raw_tag);
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignees(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn substitutes_known_placeholders() {
        let people = assignees(&["alice", "bob"]);
        let ctx = TemplateContext {
            previous_issue_number: Some(IssueNumber::new(41)),
            assignees: &people,
        };
        assert_eq!(
            render_body("Previously: #{{previousIssueNumber}}, owners: {{ assignees }}", &ctx),
            "Previously: #41, owners: alice, bob"
        );
    }

    #[test]
    fn absent_previous_issue_renders_empty() {
        let ctx = TemplateContext {
            previous_issue_number: None,
            assignees: &[],
        };
        assert_eq!(render_body("[{{previousIssueNumber}}]", &ctx), "[]");
    }

    #[test]
    fn conditional_section_follows_previous_issue() {
        let template = "Agenda\n{{#if previousIssueNumber}}\nPreviously: #{{previousIssueNumber}}{{/if}}";
        let with = TemplateContext {
            previous_issue_number: Some(IssueNumber::new(7)),
            assignees: &[],
        };
        let without = TemplateContext {
            previous_issue_number: None,
            assignees: &[],
        };
        assert_eq!(render_body(template, &with), "Agenda\n\nPreviously: #7");
        assert_eq!(render_body(template, &without), "Agenda\n");
    }

    #[test]
    fn issue_zero_counts_as_present() {
        let ctx = TemplateContext {
            previous_issue_number: Some(IssueNumber::new(0)),
            assignees: &[],
        };
        assert_eq!(
            render_body("{{#if previousIssueNumber}}#{{previousIssueNumber}}{{/if}}", &ctx),
            "#0"
        );
    }

    #[test]
    fn unknown_placeholders_are_left_in_place() {
        let ctx = TemplateContext {
            previous_issue_number: None,
            assignees: &[],
        };
        assert_eq!(
            render_body("Hi {{name}} {{#if name}}x{{/if}}", &ctx),
            "Hi {{name}} {{#if name}}x{{/if}}"
        );
    }

    #[test]
    fn unterminated_tag_is_kept_verbatim() {
        let ctx = TemplateContext {
            previous_issue_number: Some(IssueNumber::new(3)),
            assignees: &[],
        };
        assert_eq!(
            render_body("#{{previousIssueNumber}} {{oops", &ctx),
            "#3 {{oops"
        );
    }

    #[test]
    fn empty_template_renders_empty_body() {
        let ctx = TemplateContext {
            previous_issue_number: Some(IssueNumber::new(3)),
            assignees: &[],
        };
        assert_eq!(render_body("", &ctx), "");
    }
}
