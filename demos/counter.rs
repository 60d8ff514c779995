//! Counter demo: a class component driven by clicks on an in-memory host.
//!
//! Run with: RUST_LOG=spark_fiber=trace cargo run --example counter

use spark_fiber::{
    children, Children, ClassComponent, Element, EventHandler, MemoryHost, Node, PropValue,
    Props, Root, State, StateUpdater,
};
use spark_signals::effect;
use tracing_subscriber::EnvFilter;

struct Counter {
    updater: StateUpdater,
}

impl ClassComponent for Counter {
    fn create(_props: &Props, updater: StateUpdater) -> Self {
        Counter { updater }
    }

    fn initial_state(_props: &Props) -> State {
        let mut state = State::new();
        state.insert("count".into(), PropValue::from(0));
        state
    }

    fn render(&mut self, props: &Props, state: &State) -> Children {
        let count = state.get("count").and_then(PropValue::as_number).unwrap_or(0.0);
        let label = props.get("label").and_then(PropValue::as_str).unwrap_or("count");
        let updater = self.updater.clone();
        let increment = EventHandler::new(move |_| {
            let mut next = State::new();
            next.insert("count".into(), PropValue::from(count + 1.0));
            updater.set_state(next);
        });

        let mut items: Vec<Node> = vec![
            Element::host("span").with_children(format!("{label}: ")).into(),
            Element::host("button")
                .with_prop("onClick", increment)
                .with_children("+")
                .into(),
        ];
        // One list entry per click.
        for i in 0..count as i64 {
            items.push(Element::host("i").with_key(i).with_children(i).into());
        }
        Element::host("div")
            .with_prop("className", "counter")
            .with_children(items)
            .into()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .try_init();

    let mut host = MemoryHost::new();
    let container = host.create_container();
    let mut root = Root::new(host, container);

    let generation = root.generation_signal();
    let _stop = effect(move || println!("-- commit #{}", generation.get()));

    let app = Element::host("main").with_children(children![
        Element::host("h1").with_children("spark-fiber"),
        Element::class::<Counter>(Props::new().with("label", "clicks")),
    ]);
    let summary = root.render(app)?;
    println!("mounted with {} effect(s)", summary.effects.len());
    println!("{}", root.host().to_markup(container));

    for _ in 0..3 {
        let button = find_button(&root).ok_or("button not mounted")?;
        root.host().dispatch(button, "click");
        if let Some(summary) = root.flush_updates()? {
            for record in &summary.effects {
                println!("   {record}");
            }
        }
        println!("{}", root.host().to_markup(container));
    }

    let summary = root.unmount()?;
    println!("unmounted: {} deletion(s), {} fiber(s) swept", summary.deletions(), summary.swept);
    Ok(())
}

fn find_button(root: &Root<MemoryHost>) -> Option<spark_fiber::HostNodeId> {
    let host = root.host();
    let mut stack = vec![*root.container()];
    while let Some(node) = stack.pop() {
        if host.tag(node) == Some("button") {
            return Some(node);
        }
        stack.extend(host.children(node).iter().rev().copied());
    }
    None
}
