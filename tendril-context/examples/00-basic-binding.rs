use tendril_context::component::{Component, Injectable};
use tendril_context::context::Context;
use tendril_context::error::ResolutionError;
use tendril_context::instance::InstancePtr;

// values stored in the context need to be injectable
struct Greeting(String);

impl Injectable for Greeting {}

// components are created by the context and can depend on other values
struct Greeter {
    greeting: InstancePtr<Greeting>,
}

impl Injectable for Greeter {}

impl Component for Greeter {
    fn create(context: &Context) -> Result<Self, ResolutionError> {
        Ok(Self {
            greeting: context.get_sync("greeting")?,
        })
    }
}

impl Greeter {
    fn greet(&self) {
        println!("{}", self.greeting.0);
    }
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let mut context = Context::new();

    // constant bindings always resolve to the given value
    context
        .bind("greeting")
        .to(Greeting("Hello world!".to_string()))
        .register()
        .expect("error binding greeting");

    // class bindings create the component on resolution
    context
        .bind("greeter")
        .to_class::<Greeter>()
        .register()
        .expect("error binding greeter");

    let greeter = context
        .get_sync::<Greeter>("greeter")
        .expect("error resolving greeter");

    // prints "Hello world!"
    greeter.greet();
}
