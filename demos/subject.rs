//! # Example: subject
//!
//! A subject exposing two events and an observer that listens to both.
//!
//! Shows how to:
//! - Declare [`Event`] fields on a subject and fire them from setters.
//! - Register bound-method handlers with `+=` and remove them with `-=`.
//! - Let a [`Tracked`] observer unhook itself by being dropped.
//! - Read [`InvokeError`] when a handler panics under the default policy.
//!
//! ## Flow
//! ```text
//! Subject::set_x(7) ──► x_changed.invoke(&(id, XChangedArgs { x: 7 }))
//!                            └─► Observer::on_x
//! Subject::set_y(1) ──► y_changed.invoke(&1)
//!                            └─► Observer::on_y
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=trace cargo run --example subject
//! ```

use std::sync::Arc;

use eventslot::{Event, Handler, InvokeError, Lifeline, Tracked};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug)]
struct XChangedArgs {
    x: i32,
}

/// Owner of the events; fires them whenever its state changes.
#[derive(Default)]
struct Subject {
    name: &'static str,
    x_changed: Event<(&'static str, XChangedArgs)>,
    y_changed: Event<i32>,
    x: i32,
    y: i32,
}

impl Subject {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    fn set_x(&mut self, x: i32) -> Result<(), InvokeError> {
        self.x = x;
        self.x_changed.invoke(&(self.name, XChangedArgs { x: self.x }))
    }

    fn set_y(&mut self, y: i32) -> Result<(), InvokeError> {
        self.y = y;
        self.y_changed.invoke(&self.y)
    }
}

#[derive(Default)]
struct Observer {
    lifeline: Lifeline,
}

impl Observer {
    fn on_x(&self, (sender, args): &(&'static str, XChangedArgs)) {
        info!(sender, x = args.x, "x changed");
    }

    fn on_y(&self, y: &i32) {
        info!(y, "y changed");
    }
}

impl Tracked for Observer {
    fn lifeline(&self) -> &Lifeline {
        &self.lifeline
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut subject = Subject::new("subject-1");
    let observer = Arc::new(Observer::default());

    subject.x_changed += Handler::bound(&observer, Observer::on_x);
    subject.y_changed += Handler::bound(&observer, Observer::on_y);
    subject.set_x(7)?;
    subject.set_y(1)?;

    subject.x_changed -= Handler::bound(&observer, Observer::on_x);
    subject.y_changed -= Handler::bound(&observer, Observer::on_y);
    info!("unsubscribed; the next two sets reach nobody");
    subject.set_x(7)?;
    subject.set_y(1)?;

    subject.y_changed += Handler::tracked(&observer, Observer::on_y);
    subject.set_y(2)?;
    drop(observer);
    info!(handlers = subject.y_changed.len(), "observer dropped");
    subject.set_y(3)?;

    subject.y_changed += Handler::closure(|y: &i32| {
        if *y < 0 {
            panic!("negative y: {y}");
        }
    });
    if let Err(err) = subject.set_y(-1) {
        warn!(label = err.as_label(), "{}", err.as_message());
    }

    Ok(())
}
