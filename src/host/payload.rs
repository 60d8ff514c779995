//! Update payloads - host prop changes computed during completion.
//!
//! Completion of a reused host component diffs its previous props against
//! the new ones and stores the result on the fiber. Commit replays it.
//! Nothing here touches the host.

use crate::config::RootOptions;
use crate::element::{EventHandler, PropValue, Props, StyleMap};

use super::HostConfig;

/// One host-level change.
#[derive(Debug, Clone, PartialEq)]
pub enum PropChange {
    SetAttribute { name: String, value: String },
    RemoveAttribute { name: String },
    SetStyle { name: String, value: String },
    RemoveStyle { name: String },
    SetListener { event: String, handler: EventHandler },
    RemoveListener { event: String },
    SetTextContent(String),
    ResetTextContent,
}

/// Ordered host changes for one instance.
pub type UpdatePayload = Vec<PropChange>;

// =============================================================================
// Initial Props
// =============================================================================

/// Changes that bring a fresh instance from nothing to `props`.
pub fn initial_changes(props: &Props, options: &RootOptions) -> UpdatePayload {
    let mut changes = Vec::new();
    for (name, value) in &props.values {
        push_set(&mut changes, name, value, None, options);
    }
    if let Some(text) = props.text_content() {
        changes.push(PropChange::SetTextContent(text.to_string()));
    }
    changes
}

// =============================================================================
// Diff
// =============================================================================

/// Changes that bring an instance showing `old` to `new`.
pub fn diff_props(old: &Props, new: &Props, options: &RootOptions) -> UpdatePayload {
    let mut changes = Vec::new();

    for (name, old_value) in &old.values {
        if !new.values.contains_key(name) {
            push_removal(&mut changes, name, old_value, options);
        }
    }

    for (name, value) in &new.values {
        let previous = old.values.get(name);
        if previous == Some(value) {
            continue;
        }
        push_set(&mut changes, name, value, previous, options);
    }

    match (old.text_content(), new.text_content()) {
        (before, Some(after)) if before != Some(after) => {
            changes.push(PropChange::SetTextContent(after.to_string()));
        }
        (Some(_), None) => changes.push(PropChange::ResetTextContent),
        _ => {}
    }

    changes
}

fn push_set(
    changes: &mut UpdatePayload,
    name: &str,
    value: &PropValue,
    previous: Option<&PropValue>,
    options: &RootOptions,
) {
    match value {
        PropValue::Style(style) => {
            let empty = StyleMap::new();
            let old_style = match previous {
                Some(PropValue::Style(old)) => old,
                Some(other) => {
                    push_removal(changes, name, other, options);
                    &empty
                }
                None => &empty,
            };
            for key in old_style.keys() {
                if !style.contains_key(key) {
                    changes.push(PropChange::RemoveStyle {
                        name: options.style_aliases.resolve(key).to_string(),
                    });
                }
            }
            for (key, raw) in style {
                let value = raw.trim();
                if old_style.get(key).map(|old| old.trim()) == Some(value) {
                    continue;
                }
                changes.push(PropChange::SetStyle {
                    name: options.style_aliases.resolve(key).to_string(),
                    value: value.to_string(),
                });
            }
        }
        PropValue::Handler(handler) => {
            let Some(event) = options.events.get(name) else {
                tracing::warn!(prop = name, "handler prop has no host event, skipped");
                return;
            };
            if let Some(old) = previous {
                push_removal(changes, name, old, options);
            }
            changes.push(PropChange::SetListener {
                event: event.to_string(),
                handler: handler.clone(),
            });
        }
        plain => {
            if let Some(old @ (PropValue::Style(_) | PropValue::Handler(_))) = previous {
                push_removal(changes, name, old, options);
            }
            if let Some(value) = plain.as_attribute() {
                changes.push(PropChange::SetAttribute {
                    name: options.attribute_aliases.resolve(name).to_string(),
                    value,
                });
            }
        }
    }
}

fn push_removal(changes: &mut UpdatePayload, name: &str, old: &PropValue, options: &RootOptions) {
    match old {
        PropValue::Style(style) => {
            for key in style.keys() {
                changes.push(PropChange::RemoveStyle {
                    name: options.style_aliases.resolve(key).to_string(),
                });
            }
        }
        PropValue::Handler(_) => {
            if let Some(event) = options.events.get(name) {
                changes.push(PropChange::RemoveListener {
                    event: event.to_string(),
                });
            }
        }
        _ => changes.push(PropChange::RemoveAttribute {
            name: options.attribute_aliases.resolve(name).to_string(),
        }),
    }
}

// =============================================================================
// Apply
// =============================================================================

/// Replay changes against a host instance.
pub fn apply_changes<H: HostConfig>(host: &mut H, instance: &H::Instance, changes: &[PropChange]) {
    for change in changes {
        match change {
            PropChange::SetAttribute { name, value } => host.set_attribute(instance, name, value),
            PropChange::RemoveAttribute { name } => host.remove_attribute(instance, name),
            PropChange::SetStyle { name, value } => host.set_style_property(instance, name, value),
            PropChange::RemoveStyle { name } => host.remove_style_property(instance, name),
            PropChange::SetListener { event, handler } => {
                host.add_event_listener(instance, event, handler.clone())
            }
            PropChange::RemoveListener { event } => host.remove_event_listener(instance, event),
            PropChange::SetTextContent(text) => host.set_text_content(instance, text),
            PropChange::ResetTextContent => host.reset_text_content(instance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::style;

    #[test]
    fn test_initial_changes_translate_names() {
        let click = EventHandler::new(|_| {});
        let props = Props::new()
            .with("className", "box")
            .with("style", style([("float", " left "), ("color", "red")]))
            .with("onClick", click.clone())
            .with_children("hello");

        let changes = initial_changes(&props, &RootOptions::default());

        assert!(changes.contains(&PropChange::SetAttribute {
            name: "class".into(),
            value: "box".into()
        }));
        assert!(changes.contains(&PropChange::SetStyle {
            name: "cssFloat".into(),
            value: "left".into()
        }));
        assert!(changes.contains(&PropChange::SetListener {
            event: "click".into(),
            handler: click
        }));
        assert_eq!(
            changes.last(),
            Some(&PropChange::SetTextContent("hello".into()))
        );
    }

    #[test]
    fn test_unknown_handler_is_skipped() {
        let props = Props::new().with("onTeleport", EventHandler::new(|_| {}));
        assert!(initial_changes(&props, &RootOptions::default()).is_empty());
    }

    #[test]
    fn test_diff_removes_and_sets() {
        let old = Props::new()
            .with("id", "a")
            .with("title", "t")
            .with("style", style([("color", "red"), ("margin", "1")]));
        let new = Props::new()
            .with("id", "b")
            .with("style", style([("color", "red"), ("padding", "2")]));

        let changes = diff_props(&old, &new, &RootOptions::default());

        assert!(changes.contains(&PropChange::RemoveAttribute { name: "title".into() }));
        assert!(changes.contains(&PropChange::SetAttribute {
            name: "id".into(),
            value: "b".into()
        }));
        assert!(changes.contains(&PropChange::RemoveStyle { name: "margin".into() }));
        assert!(changes.contains(&PropChange::SetStyle {
            name: "padding".into(),
            value: "2".into()
        }));
        assert!(!changes.iter().any(|c| matches!(c, PropChange::SetStyle { name, .. } if name == "color")));
    }

    #[test]
    fn test_diff_text_content() {
        let old = Props::new().with_children("a");
        let new = Props::new().with_children("b");
        assert_eq!(
            diff_props(&old, &new, &RootOptions::default()),
            vec![PropChange::SetTextContent("b".into())]
        );

        let nested = Props::new().with_children(crate::element::Element::host("i"));
        assert_eq!(
            diff_props(&old, &nested, &RootOptions::default()),
            vec![PropChange::ResetTextContent]
        );
    }

    #[test]
    fn test_diff_replaces_listener() {
        let first = EventHandler::new(|_| {});
        let second = EventHandler::new(|_| {});
        let old = Props::new().with("onClick", first);
        let new = Props::new().with("onClick", second.clone());

        let changes = diff_props(&old, &new, &RootOptions::default());
        assert_eq!(
            changes,
            vec![
                PropChange::RemoveListener { event: "click".into() },
                PropChange::SetListener {
                    event: "click".into(),
                    handler: second
                },
            ]
        );
    }
}
