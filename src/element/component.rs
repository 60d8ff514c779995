//! Component types - class and function components.
//!
//! # Class components
//!
//! A class component is any type implementing [`ClassComponent`]. The
//! reconciler constructs one instance per tree position on first encounter
//! and reuses it on every later render of that position. The instance lives
//! in a shared cell referenced from both fibers of the double buffer.
//!
//! ```ignore
//! struct Counter;
//!
//! impl ClassComponent for Counter {
//!     fn create(_props: &Props, _updater: StateUpdater) -> Self { Counter }
//!     fn render(&mut self, props: &Props, state: &State) -> Children {
//!         Element::host("span").with_children(format!("{:?}", state.get("count"))).into()
//!     }
//! }
//!
//! let element = Element::class::<Counter>(Props::new());
//! ```
//!
//! # Function components
//!
//! A plain `fn(&Props) -> Children` wrapped in [`FunctionType`]. Identity is
//! the function address, so the same `fn` item always matches itself.

use std::any::TypeId;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::{Children, PropMap, Props};

/// Component state. Same shape as props values.
pub type State = PropMap;

// =============================================================================
// Class Component Trait
// =============================================================================

/// A stateful component with a persistent instance.
pub trait ClassComponent: 'static {
    /// Construct the instance on first encounter. `props` already includes
    /// the defaults from [`default_props`](Self::default_props).
    fn create(props: &Props, updater: StateUpdater) -> Self
    where
        Self: Sized;

    /// Props laid under the explicit props of every element of this type.
    fn default_props() -> Props
    where
        Self: Sized,
    {
        Props::default()
    }

    /// State before any derivation.
    fn initial_state(_props: &Props) -> State
    where
        Self: Sized,
    {
        State::new()
    }

    /// Merged over the initial state on first encounter when it returns `Some`.
    fn derive_state_from_props(_props: &Props, _state: &State) -> Option<State>
    where
        Self: Sized,
    {
        None
    }

    /// Produce the children description.
    fn render(&mut self, props: &Props, state: &State) -> Children;

    /// Invoked when the instance's position is deleted, during commit.
    fn component_will_unmount(&mut self) {}
}

// =============================================================================
// Class Type (type-erased)
// =============================================================================

type CreateFn = fn(&Props, StateUpdater) -> Box<dyn ClassComponent>;
type DefaultPropsFn = fn() -> Props;
type InitialStateFn = fn(&Props) -> State;
type DeriveStateFn = fn(&Props, &State) -> Option<State>;

/// Element type handle for a [`ClassComponent`] implementor.
#[derive(Clone, Copy)]
pub struct ClassType {
    name: &'static str,
    type_id: TypeId,
    create: CreateFn,
    default_props: DefaultPropsFn,
    initial_state: InitialStateFn,
    derive_state: DeriveStateFn,
}

impl ClassType {
    pub fn of<C: ClassComponent>() -> Self {
        ClassType {
            name: short_type_name(std::any::type_name::<C>()),
            type_id: TypeId::of::<C>(),
            create: create_erased::<C>,
            default_props: C::default_props,
            initial_state: C::initial_state,
            derive_state: C::derive_state_from_props,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn create(&self, props: &Props, updater: StateUpdater) -> Box<dyn ClassComponent> {
        (self.create)(props, updater)
    }

    pub(crate) fn default_props(&self) -> Props {
        (self.default_props)()
    }

    pub(crate) fn initial_state(&self, props: &Props) -> State {
        (self.initial_state)(props)
    }

    pub(crate) fn derive_state(&self, props: &Props, state: &State) -> Option<State> {
        (self.derive_state)(props, state)
    }
}

impl PartialEq for ClassType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl fmt::Debug for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassType({})", self.name)
    }
}

fn create_erased<C: ClassComponent>(props: &Props, updater: StateUpdater) -> Box<dyn ClassComponent> {
    Box::new(C::create(props, updater))
}

fn short_type_name(full: &'static str) -> &'static str {
    full.rsplit("::").next().unwrap_or(full)
}

// =============================================================================
// Function Type
// =============================================================================

/// Render function of a function component.
pub type RenderFn = fn(&Props) -> Children;

/// Element type handle for a function component.
#[derive(Clone, Copy)]
pub struct FunctionType {
    name: &'static str,
    render: RenderFn,
}

impl FunctionType {
    pub fn new(name: &'static str, render: RenderFn) -> Self {
        FunctionType { name, render }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn call(&self, props: &Props) -> Children {
        (self.render)(props)
    }
}

impl PartialEq for FunctionType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::fn_addr_eq(self.render, other.render)
    }
}

impl fmt::Debug for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionType({})", self.name)
    }
}

// =============================================================================
// State Updates
// =============================================================================

/// Partial state objects waiting for the next reconciliation of a class
/// instance. Later entries win on key conflicts.
pub(crate) type UpdateQueue = Rc<RefCell<Vec<State>>>;

/// Handle a class instance uses to enqueue state changes.
///
/// Enqueueing never renders. It marks the owning root dirty; the next
/// [`Root::flush_updates`](crate::Root::flush_updates) or render applies it.
#[derive(Clone)]
pub struct StateUpdater {
    queue: UpdateQueue,
    dirty: Rc<Cell<bool>>,
}

impl StateUpdater {
    pub(crate) fn new(queue: UpdateQueue, dirty: Rc<Cell<bool>>) -> Self {
        StateUpdater { queue, dirty }
    }

    /// Enqueue a partial state object.
    pub fn set_state(&self, partial: State) {
        self.queue.borrow_mut().push(partial);
        self.dirty.set(true);
    }
}

impl fmt::Debug for StateUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateUpdater")
            .field("pending", &self.queue.borrow().len())
            .finish()
    }
}

/// A constructed class instance and its pending updates.
///
/// Shared (`Rc`) between both fibers of a double-buffered pair.
pub(crate) struct ClassInstance {
    pub(crate) component: Box<dyn ClassComponent>,
    pub(crate) updates: UpdateQueue,
}

impl ClassInstance {
    /// Fold pending partial states into `state`.
    pub(crate) fn drain_updates(&self, state: &mut State) -> bool {
        let pending: Vec<State> = self.updates.borrow_mut().drain(..).collect();
        let changed = !pending.is_empty();
        for partial in pending {
            state.extend(partial);
        }
        changed
    }
}

pub(crate) type ClassInstanceCell = Rc<RefCell<ClassInstance>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::PropValue;

    struct Widget;

    impl ClassComponent for Widget {
        fn create(_props: &Props, _updater: StateUpdater) -> Self {
            Widget
        }

        fn render(&mut self, _props: &Props, _state: &State) -> Children {
            Children::None
        }
    }

    struct Other;

    impl ClassComponent for Other {
        fn create(_props: &Props, _updater: StateUpdater) -> Self {
            Other
        }

        fn render(&mut self, _props: &Props, _state: &State) -> Children {
            Children::None
        }
    }

    fn first(_: &Props) -> Children {
        Children::None
    }

    fn second(_: &Props) -> Children {
        Children::from("two")
    }

    #[test]
    fn test_class_type_identity() {
        assert_eq!(ClassType::of::<Widget>(), ClassType::of::<Widget>());
        assert_ne!(ClassType::of::<Widget>(), ClassType::of::<Other>());
        assert_eq!(ClassType::of::<Widget>().name(), "Widget");
    }

    #[test]
    fn test_function_type_identity() {
        assert_eq!(FunctionType::new("A", first), FunctionType::new("A", first));
        assert_ne!(FunctionType::new("A", first), FunctionType::new("B", second));
    }

    #[test]
    fn test_updater_marks_dirty_and_queues() {
        let queue: UpdateQueue = Rc::new(RefCell::new(Vec::new()));
        let dirty = Rc::new(Cell::new(false));
        let updater = StateUpdater::new(queue.clone(), dirty.clone());

        let mut partial = State::new();
        partial.insert("count".into(), PropValue::from(1));
        updater.set_state(partial);

        assert!(dirty.get());
        assert_eq!(queue.borrow().len(), 1);
    }

    #[test]
    fn test_drain_updates_later_wins() {
        let queue: UpdateQueue = Rc::new(RefCell::new(Vec::new()));
        let dirty = Rc::new(Cell::new(false));
        let updater = StateUpdater::new(queue.clone(), dirty);
        let instance = ClassInstance {
            component: Box::new(Widget),
            updates: queue,
        };

        let mut a = State::new();
        a.insert("n".into(), PropValue::from(1));
        let mut b = State::new();
        b.insert("n".into(), PropValue::from(2));
        updater.set_state(a);
        updater.set_state(b);

        let mut state = State::new();
        assert!(instance.drain_updates(&mut state));
        assert_eq!(state.get("n"), Some(&PropValue::from(2)));
        assert!(!instance.drain_updates(&mut state));
    }
}
