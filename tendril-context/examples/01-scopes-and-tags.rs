// note: this example assumes you've analyzed the previous one

use std::sync::atomic::{AtomicUsize, Ordering};
use tendril_context::component::{Component, Injectable};
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_context::filter::with_tag;
use tendril_context::scope::BindingScope;

static CREATED: AtomicUsize = AtomicUsize::new(0);

struct Counter;

impl Injectable for Counter {}

impl Component for Counter {
    fn create(_context: &Context) -> Result<Self, ResolutionError> {
        CREATED.fetch_add(1, Ordering::SeqCst);
        Ok(Self)
    }
}

fn main() {
    let mut context = Context::new();

    // transient bindings create a new value on each resolution, which is the default
    context
        .bind("transient")
        .to_class::<Counter>()
        .tag("counter")
        .register()
        .expect("error binding transient counter");

    // singletons are created once and cached
    context
        .bind("singleton")
        .to_class::<Counter>()
        .in_scope(BindingScope::Singleton)
        .tag_value("counter", "cached")
        .register()
        .expect("error binding singleton counter");

    for _ in 0..3 {
        context.get_sync::<Counter>("transient").unwrap();
        context.get_sync::<Counter>("singleton").unwrap();
    }

    // prints "Created 4 counters"
    println!("Created {} counters", CREATED.load(Ordering::SeqCst));

    // tags can be used to discover bindings; prints "transient: counter" and "singleton: cached"
    for binding in context.find(with_tag("counter")) {
        println!("{}: {}", binding.key(), binding.tag("counter").unwrap_or_default());
    }
}
