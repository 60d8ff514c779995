//! Completion - host instance creation and update payloads.
//!
//! Runs on the way back up, so every child of a fiber has completed before
//! the fiber itself. A new host component therefore finds its children's
//! host nodes already built and appends them in document order.
//!
//! Instances built here are detached. Only commit attaches anything to the
//! container.

use crate::engine::FiberId;
use crate::host::payload::{apply_changes, diff_props, initial_changes};
use crate::host::HostConfig;
use crate::types::{EffectTag, FiberTag};

use super::RenderSession;

/// Run the completion step on `wip`.
pub fn complete_work<H: HostConfig>(session: &mut RenderSession<'_, H>, wip: FiberId) {
    match session.arena[wip].tag {
        FiberTag::HostComponent => complete_host_component(session, wip),
        FiberTag::HostText => complete_host_text(session, wip),
        FiberTag::HostRoot | FiberTag::ClassComponent | FiberTag::FunctionComponent => {}
    }
}

fn complete_host_component<H: HostConfig>(session: &mut RenderSession<'_, H>, wip: FiberId) {
    if session.arena[wip].instance.is_some() {
        if session.arena[wip].effect_tag.contains(EffectTag::UPDATE) {
            let fiber = &session.arena[wip];
            let before = fiber
                .alternate
                .and_then(|alternate| session.arena[alternate].memoized_props.clone())
                .unwrap_or_default();
            let payload = diff_props(&before, &fiber.pending_props, session.options);
            tracing::trace!(fiber = %wip, changes = payload.len(), "update payload");
            session.arena[wip].update_payload = Some(payload);
        }
        return;
    }

    let type_name = session.arena[wip].label().to_string();
    let instance = session.host.create_instance(&type_name);
    session.created.push(instance.clone());

    for child in session.arena.host_children(wip) {
        if let Some(child_instance) = &session.arena[child].instance {
            session.host.append_child(&instance, child_instance);
        }
    }

    let changes = initial_changes(&session.arena[wip].pending_props, session.options);
    apply_changes(&mut *session.host, &instance, &changes);

    tracing::trace!(fiber = %wip, host = type_name, "created instance");
    session.arena[wip].instance = Some(instance);
}

fn complete_host_text<H: HostConfig>(session: &mut RenderSession<'_, H>, wip: FiberId) {
    if session.arena[wip].instance.is_some() {
        return;
    }
    let text = session.arena[wip].text().unwrap_or_default().to_string();
    let instance = session.host.create_text_instance(&text);
    session.created.push(instance.clone());
    session.arena[wip].instance = Some(instance);
}
