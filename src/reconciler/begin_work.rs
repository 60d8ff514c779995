//! Begin phase - per-kind dispatch that produces a fiber's children.
//!
//! Nothing here calls into the host. Classification errors surface from
//! this phase, so an unsupported element aborts the session before any
//! host instance is attached.

use std::cell::RefCell;
use std::rc::Rc;

use crate::element::component::{ClassInstance, UpdateQueue};
use crate::element::{Children, Element, ElementType, State, StateUpdater};
use crate::engine::{Fiber, FiberId, MemoizedState};
use crate::error::{RenderError, Result};
use crate::host::HostConfig;
use crate::types::FiberTag;

use super::child_fiber::reconcile_children;
use super::RenderSession;

// =============================================================================
// Classification
// =============================================================================

/// Build a fresh fiber for an element, classifying its kind.
pub fn create_fiber_from_element<I>(element: Element) -> Result<Fiber<I>> {
    let tag = match &element.element_type {
        ElementType::Host(name) if is_host_type_name(name) => FiberTag::HostComponent,
        ElementType::Host(name) => {
            return Err(RenderError::unsupported(format!("host type {name:?}")));
        }
        ElementType::Class(_) => FiberTag::ClassComponent,
        ElementType::Function(_) => FiberTag::FunctionComponent,
        other @ (ElementType::Fragment | ElementType::Portal) => {
            return Err(RenderError::unsupported(other.name()));
        }
    };
    Ok(Fiber::new(
        tag,
        element.key,
        Some(element.element_type),
        element.props,
    ))
}

fn is_host_type_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

// =============================================================================
// Dispatch
// =============================================================================

/// Run the begin phase on `wip`. Returns its first child, the next unit.
pub fn begin_work<H: HostConfig>(
    session: &mut RenderSession<'_, H>,
    wip: FiberId,
) -> Result<Option<FiberId>> {
    let tag = session.arena[wip].tag;
    tracing::trace!(fiber = %wip, %tag, label = session.arena[wip].label(), "begin");

    match tag {
        FiberTag::HostRoot => update_host_root(session, wip),
        FiberTag::ClassComponent => update_class_component(session, wip),
        FiberTag::FunctionComponent => update_function_component(session, wip),
        FiberTag::HostComponent => update_host_component(session, wip),
        FiberTag::HostText => Ok(None),
    }
}

fn update_host_root<H: HostConfig>(
    session: &mut RenderSession<'_, H>,
    wip: FiberId,
) -> Result<Option<FiberId>> {
    let children = match &session.arena[wip].memoized_state {
        MemoizedState::Element(element) => Children::from(element.clone()),
        _ => Children::None,
    };
    reconcile_children(session, wip, children)
}

fn update_class_component<H: HostConfig>(
    session: &mut RenderSession<'_, H>,
    wip: FiberId,
) -> Result<Option<FiberId>> {
    let Some(ElementType::Class(class)) = session.arena[wip].element_type.clone() else {
        return Err(RenderError::unsupported(session.arena[wip].label()));
    };

    let props = session.arena[wip].pending_props.merged_over(&class.default_props());
    session.arena[wip].pending_props = props.clone();

    let (instance, mut state) = match session.arena[wip].class_instance.clone() {
        Some(instance) => {
            let state = match &session.arena[wip].memoized_state {
                MemoizedState::Component(state) => state.clone(),
                _ => State::new(),
            };
            (instance, state)
        }
        None => {
            let updates: UpdateQueue = Rc::default();
            let updater = StateUpdater::new(updates.clone(), session.dirty.clone());
            let component = class.create(&props, updater);

            let mut state = class.initial_state(&props);
            if let Some(derived) = class.derive_state(&props, &state) {
                state.extend(derived);
            }

            let instance = Rc::new(RefCell::new(ClassInstance { component, updates }));
            session.arena[wip].class_instance = Some(instance.clone());
            tracing::debug!(fiber = %wip, component = class.name(), "constructed class instance");
            (instance, state)
        }
    };

    if instance.borrow().drain_updates(&mut state) {
        tracing::trace!(fiber = %wip, component = class.name(), "applied queued state");
    }
    session.arena[wip].memoized_state = MemoizedState::Component(state.clone());

    let children = instance.borrow_mut().component.render(&props, &state);
    reconcile_children(session, wip, children)
}

fn update_function_component<H: HostConfig>(
    session: &mut RenderSession<'_, H>,
    wip: FiberId,
) -> Result<Option<FiberId>> {
    let Some(ElementType::Function(function)) = session.arena[wip].element_type.clone() else {
        return Err(RenderError::unsupported(session.arena[wip].label()));
    };
    let children = function.call(&session.arena[wip].pending_props);
    reconcile_children(session, wip, children)
}

fn update_host_component<H: HostConfig>(
    session: &mut RenderSession<'_, H>,
    wip: FiberId,
) -> Result<Option<FiberId>> {
    let props = &session.arena[wip].pending_props;
    // Lone text is host content, not a child fiber.
    let children = if props.text_content().is_some() {
        Children::None
    } else {
        props.children.clone()
    };
    reconcile_children(session, wip, children)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::config::RootOptions;
    use crate::element::{ClassComponent, FunctionType, PropValue, Props};
    use crate::engine::FiberArena;
    use crate::host::{HostNodeId, MemoryHost};

    struct Greeting;

    impl ClassComponent for Greeting {
        fn create(_props: &Props, _updater: StateUpdater) -> Self {
            Greeting
        }

        fn default_props() -> Props {
            Props::new().with("name", "world").with("punct", "!")
        }

        fn derive_state_from_props(props: &Props, _state: &State) -> Option<State> {
            let mut state = State::new();
            state.insert("seen".into(), props.get("name")?.clone());
            Some(state)
        }

        fn render(&mut self, props: &Props, _state: &State) -> Children {
            let name = props.get("name").and_then(PropValue::as_str).unwrap_or("?");
            Element::host("b").with_children(format!("hi {name}")).into()
        }
    }

    fn pair(_: &Props) -> Children {
        crate::children![Element::host("i"), "x"]
    }

    fn session_parts() -> (FiberArena<HostNodeId>, MemoryHost, RootOptions) {
        (FiberArena::new(), MemoryHost::new(), RootOptions::default())
    }

    #[test]
    fn test_fragment_and_portal_unsupported() {
        for element_type in [ElementType::Fragment, ElementType::Portal] {
            let element = Element::new(element_type, Props::default());
            let err = create_fiber_from_element::<()>(element).unwrap_err();
            assert!(matches!(err, RenderError::UnsupportedElementKind { .. }));
        }
    }

    #[test]
    fn test_host_type_name_validation() {
        assert!(create_fiber_from_element::<()>(Element::host("my-widget2")).is_ok());
        assert!(create_fiber_from_element::<()>(Element::host("")).is_err());
        assert!(create_fiber_from_element::<()>(Element::host("di v")).is_err());
        assert!(create_fiber_from_element::<()>(Element::host("<div>")).is_err());
    }

    #[test]
    fn test_text_content_makes_no_child() {
        let (mut arena, mut host, options) = session_parts();
        let mut session = RenderSession::new(&mut arena, &mut host, &options, Rc::default());
        let fiber = create_fiber_from_element(Element::host("p").with_children("hello")).unwrap();
        let id = session.arena.allocate(fiber);

        assert_eq!(begin_work(&mut session, id).unwrap(), None);
        assert_eq!(session.arena[id].first_child, None);
    }

    #[test]
    fn test_class_first_encounter_merges_defaults_and_derives() {
        let (mut arena, mut host, options) = session_parts();
        let dirty = Rc::new(Cell::new(false));
        let mut session = RenderSession::new(&mut arena, &mut host, &options, dirty);
        let element = Element::class::<Greeting>(Props::new().with("name", "fiber"));
        let id = session.arena.allocate(create_fiber_from_element(element).unwrap());

        let child = begin_work(&mut session, id).unwrap().unwrap();

        let fiber = &session.arena[id];
        assert!(fiber.class_instance.is_some());
        assert_eq!(fiber.pending_props.get("punct"), Some(&PropValue::from("!")));
        match &fiber.memoized_state {
            MemoizedState::Component(state) => {
                assert_eq!(state.get("seen"), Some(&PropValue::from("fiber")));
            }
            other => panic!("expected component state, got {other:?}"),
        }
        assert_eq!(session.arena[child].label(), "b");
        assert_eq!(session.arena[child].pending_props.text_content(), Some("hi fiber"));
    }

    #[test]
    fn test_function_component_children_in_order() {
        let (mut arena, mut host, options) = session_parts();
        let mut session = RenderSession::new(&mut arena, &mut host, &options, Rc::default());
        let element = Element::function(FunctionType::new("Pair", pair), Props::default());
        let id = session.arena.allocate(create_fiber_from_element(element).unwrap());

        begin_work(&mut session, id).unwrap();

        let children = session.arena.children(id);
        assert_eq!(children.len(), 2);
        assert_eq!(session.arena[children[0]].tag, FiberTag::HostComponent);
        assert_eq!(session.arena[children[1]].tag, FiberTag::HostText);
        assert_eq!(session.arena[children[1]].index, 1);
    }
}
