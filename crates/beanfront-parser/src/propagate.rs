//! `pushtag`/`poptag` and `pushmeta`/`popmeta` propagation.
//!
//! Push and pop scoping is textual: the markers and the directives are
//! replayed in file order, not date order, so this pass must run before
//! the chronological sort.

use beanfront_core::{
    metadata, Ast, Directive, Entry, InternedStr, MetaValue, Metadata, Position, Positioned,
    Pushmeta, RawString,
};

enum Step {
    Directive(usize),
    PushTag(InternedStr),
    PopTag(InternedStr),
    PushMeta(usize),
    PopMeta(InternedStr),
}

/// Apply the push/pop markers of `ast` to its directives.
///
/// Each transaction gets the active tags it does not already carry,
/// appended in push order. Each directive gets one string-valued metadata
/// entry per active key it does not already define, appended after its
/// own metadata. `poptag` removes the first matching active tag.
///
/// The marker collections themselves are left untouched.
pub fn propagate(ast: &mut Ast) {
    if ast.pushtags.is_empty() && ast.pushmetas.is_empty() {
        return;
    }

    let Ast {
        directives,
        pushtags,
        poptags,
        pushmetas,
        popmetas,
        ..
    } = ast;

    let mut steps: Vec<(Position, Step)> = Vec::with_capacity(
        directives.len() + pushtags.len() + poptags.len() + pushmetas.len() + popmetas.len(),
    );
    steps.extend(
        directives
            .iter()
            .enumerate()
            .map(|(i, d)| (d.position().clone(), Step::Directive(i))),
    );
    steps.extend(pushtags.iter().map(|p| (p.pos.clone(), Step::PushTag(p.tag.clone()))));
    steps.extend(poptags.iter().map(|p| (p.pos.clone(), Step::PopTag(p.tag.clone()))));
    steps.extend(pushmetas.iter().enumerate().map(|(i, p)| (p.pos.clone(), Step::PushMeta(i))));
    steps.extend(popmetas.iter().map(|p| (p.pos.clone(), Step::PopMeta(p.key.clone()))));
    steps.sort_by(|a, b| a.0.file_order(&b.0));

    let mut tags: Vec<InternedStr> = Vec::new();
    let mut meta: Vec<&Pushmeta> = Vec::new();
    let mut touched = 0usize;

    for (_, step) in steps {
        match step {
            Step::PushTag(tag) => tags.push(tag),
            Step::PopTag(tag) => {
                if let Some(i) = tags.iter().position(|t| *t == tag) {
                    tags.remove(i);
                }
            }
            Step::PushMeta(i) => {
                let push = &pushmetas[i];
                match meta.iter_mut().find(|m| m.key == push.key) {
                    Some(slot) => *slot = push,
                    None => meta.push(push),
                }
            }
            Step::PopMeta(key) => meta.retain(|m| m.key != key),
            Step::Directive(i) => {
                if tags.is_empty() && meta.is_empty() {
                    continue;
                }
                touched += 1;
                apply(&mut directives[i], &tags, &meta);
            }
        }
    }

    tracing::debug!("propagated push/pop markers onto {} directives", touched);
}

fn apply(directive: &mut Directive, tags: &[InternedStr], meta: &[&Pushmeta]) {
    if let Some(txn) = directive.as_transaction_mut() {
        for tag in tags {
            if !txn.has_tag(tag) {
                txn.tags.push(tag.clone());
            }
        }
    }
    for push in meta {
        if metadata::find(directive.meta(), &push.key).is_some() {
            continue;
        }
        let value = MetaValue::String(RawString::plain(push.value.to_plain_string()));
        directive.add_metadata(Metadata::new(push.pos.clone(), push.key.clone(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests_support::parse_ok;

    fn propagated(source: &str) -> Ast {
        let mut ast = parse_ok(source);
        propagate(&mut ast);
        ast
    }

    fn tags_of(ast: &Ast) -> Vec<Vec<String>> {
        ast.transactions()
            .map(|t| t.tags.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn test_pushtag_scope() {
        let ast = propagated(
            "pushtag #trip\n2024-01-01 * \"in\"\npoptag #trip\n2024-01-02 * \"out\"\n",
        );
        assert_eq!(tags_of(&ast), vec![vec!["trip".to_string()], vec![]]);
        assert_eq!(ast.pushtags.len(), 1);
    }

    #[test]
    fn test_existing_tag_not_duplicated() {
        let ast = propagated("pushtag #trip\n2024-01-01 * \"x\" #food #trip\n");
        assert_eq!(tags_of(&ast), vec![vec!["food".to_string(), "trip".to_string()]]);
    }

    #[test]
    fn test_poptag_removes_first_match() {
        let src = "pushtag #a\npushtag #b\npushtag #a\npoptag #a\n2024-01-01 * \"x\"\n";
        let ast = propagated(src);
        assert_eq!(tags_of(&ast), vec![vec!["b".to_string(), "a".to_string()]]);
    }

    #[test]
    fn test_file_order_not_date_order() {
        let src = "2024-06-01 * \"later\"\npushtag #t\n2024-01-01 * \"earlier\"\n";
        let ast = propagated(src);
        assert_eq!(tags_of(&ast), vec![vec![], vec!["t".to_string()]]);
    }

    #[test]
    fn test_pushmeta_on_every_directive() {
        let src = "pushmeta location: \"Paris\"\n\
                   2024-01-01 open Assets:Cash\n\
                   2024-01-02 * \"x\"\n  location: \"Lyon\"\n\
                   popmeta location:\n\
                   2024-01-03 close Assets:Cash\n";
        let ast = propagated(src);
        let open = ast.directives[0].meta();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].key, "location");
        assert_eq!(open[0].value, MetaValue::String(RawString::plain("Paris")));
        assert_eq!(open[0].pos.line, 1);

        let txn = ast.directives[1].meta();
        assert_eq!(txn.len(), 1);
        assert_eq!(txn[0].value.to_plain_string(), "Lyon");

        assert!(ast.directives[2].meta().is_empty());
    }

    #[test]
    fn test_pushmeta_replaces_and_stringifies() {
        let src = "pushmeta rate: 1\npushmeta rate: 2.5 USD\n2024-01-01 open Assets:Cash\n";
        let ast = propagated(src);
        let meta = ast.directives[0].meta();
        assert_eq!(meta.len(), 1);
        assert_eq!(meta[0].value, MetaValue::String(RawString::plain("2.5 USD")));
    }

    #[test]
    fn test_no_markers_is_noop() {
        let src = "2024-01-01 * \"x\"\n";
        assert_eq!(propagated(src), parse_ok(src));
    }
}
